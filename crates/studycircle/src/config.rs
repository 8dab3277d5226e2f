//! CLI configuration: a thin wrapper around `studycircle_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides (--url,
//! --insecure, --timeout) and opens the `Hub` for the active profile.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use studycircle_api::FileStorage;
use studycircle_core::{ClientConfig, Hub, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use studycircle_config::{
    Config, Profile, config_path, load_config_or_default, save_config,
};

/// Everything a backend-bound command needs about the active profile.
#[derive(Debug)]
pub struct ActiveProfile {
    pub name: String,
    pub profile: Profile,
    pub client: ClientConfig,
    pub state_path: PathBuf,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Pick the profile, apply flag overrides, and build the client config.
///
/// With no matching profile, `--url` alone is enough to run against an
/// ad-hoc backend.
pub fn resolve(global: &GlobalOpts) -> Result<ActiveProfile, CliError> {
    let cfg = load_config_or_default();
    let name = active_profile_name(global, &cfg);

    let mut profile = match (cfg.profiles.get(&name), &global.url) {
        (Some(profile), _) => profile.clone(),
        (None, Some(url)) => Profile {
            url: url.clone(),
            ..Profile::default()
        },
        (None, None) if global.profile.is_some() => {
            let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    // Flag > env > profile
    if let Some(url) = &global.url {
        profile.url.clone_from(url);
    }

    let mut client = studycircle_config::profile_to_client_config(&profile, &cfg.defaults)?;
    if global.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        client.timeout = Duration::from_secs(secs);
    }

    let state_path = studycircle_config::state_path(&profile, &name);
    Ok(ActiveProfile {
        name,
        profile,
        client,
        state_path,
    })
}

/// Open the hub for `active`, restoring any persisted login.
pub fn open_hub(active: &ActiveProfile) -> Result<Hub, CliError> {
    let storage = Arc::new(FileStorage::open(&active.state_path));
    Ok(Hub::new(active.client.clone(), storage)?)
}

/// The login password: resolved from env/keyring/config, else prompted.
pub fn login_password(active: &ActiveProfile) -> Result<SecretString, CliError> {
    match studycircle_config::resolve_password(&active.profile, &active.name) {
        Ok(pw) => Ok(pw),
        Err(studycircle_config::ConfigError::NoPassword { .. }) => prompt_password("Password: "),
        Err(e) => Err(e.into()),
    }
}

pub fn prompt_password(prompt: &str) -> Result<SecretString, CliError> {
    let pw = rpassword::prompt_password(prompt)?;
    if pw.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(SecretString::from(pw))
}
