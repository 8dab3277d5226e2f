//! Configuration for the StudyCircle CLI.
//!
//! TOML profiles (one per backend), environment overrides, password
//! resolution (env + keyring + plaintext), and translation to
//! `studycircle_core::ClientConfig`. The CLI layers its own flag overrides
//! on top of what this crate resolves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use studycircle_core::{ClientConfig, TlsVerification};

/// Keyring service name under which passwords are stored.
pub const KEYRING_SERVICE: &str = "studycircle";

/// Prefix for environment overrides (`STUDYCIRCLE_DEFAULTS__TIMEOUT=5`).
pub const ENV_PREFIX: &str = "STUDYCIRCLE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("no username configured for profile '{profile}'")]
    NoUsername { profile: String },

    #[error("no password configured for profile '{profile}'")]
    NoPassword { profile: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<keyring::Error> for ConfigError {
    fn from(err: keyring::Error) -> Self {
        Self::Keyring(err.to_string())
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile name to use: `explicit`, else `default_profile`, else
    /// `"default"`.
    pub fn profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(String::from)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named backend profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// API root (e.g. "http://localhost:8000/api").
    pub url: String,

    /// Account used by `login` when no username is passed.
    pub username: Option<String>,

    /// Password in plaintext. Prefer the keyring or `password_env`.
    pub password: Option<String>,

    /// Environment variable holding the password.
    pub password_env: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override the default insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override the default timeout (seconds).
    pub timeout: Option<u64>,

    /// Where login state is persisted. Defaults to [`state_path`].
    pub state_file: Option<PathBuf>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("edu", "studycircle", "studycircle")
}

fn home_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("studycircle");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Platform data directory for persisted client state.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

/// Persisted login state for `profile_name`.
///
/// The default profile keeps `<data dir>/state.json`; other profiles get
/// their own subdirectory so sessions never leak between backends.
pub fn state_path(profile: &Profile, profile_name: &str) -> PathBuf {
    if let Some(path) = &profile.state_file {
        return path.clone();
    }
    let dir = data_dir();
    if profile_name == "default" {
        dir.join("state.json")
    } else {
        dir.join(profile_name).join("state.json")
    }
}

// ── Loading & saving ────────────────────────────────────────────────

/// Load config from the canonical path plus environment overrides.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` plus `STUDYCIRCLE_` environment overrides.
///
/// Nested keys use a double underscore: `STUDYCIRCLE_DEFAULTS__OUTPUT=json`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), profiles = config.profiles.len(), "config loaded");
    Ok(config)
}

/// Load config, returning a default if it is missing or invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML at the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/password"),
    )?)
}

/// The username for `profile`: the profile's own, else
/// `STUDYCIRCLE_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var("STUDYCIRCLE_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoUsername {
            profile: profile_name.into(),
        })
}

/// Resolve the password without CLI flags.
///
/// Order: the profile's `password_env`, `STUDYCIRCLE_PASSWORD`, the system
/// keyring, then plaintext in the config.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Global env var
    if let Ok(pw) = std::env::var("STUDYCIRCLE_PASSWORD") {
        return Ok(SecretString::from(pw));
    }

    // 3. Keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoPassword {
        profile: profile_name.into(),
    })
}

/// Store `password` in the system keyring for `profile_name`.
pub fn store_password(profile_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password.expose_secret())?;
    debug!(profile = profile_name, "password stored in keyring");
    Ok(())
}

/// Remove a stored keyring password. A missing entry is not an error.
pub fn forget_password(profile_name: &str) -> Result<(), ConfigError> {
    match keyring_entry(profile_name)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ClientConfig` from a profile and the global defaults.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let base_url: url::Url = profile.url.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {}", profile.url),
    })?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "url".into(),
            reason: format!("unsupported scheme '{}'", base_url.scheme()),
        });
    }

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(ClientConfig {
        base_url,
        tls,
        timeout,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;

    fn profile(url: &str) -> Profile {
        Profile {
            url: url.into(),
            ..Profile::default()
        }
    }

    #[test]
    fn loads_profiles_with_env_overrides() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                default_profile = "campus"

                [defaults]
                output = "json"

                [profiles.campus]
                url = "https://campus.example.edu/api"
                username = "ada"
                "#,
            )?;
            jail.set_env("STUDYCIRCLE_DEFAULTS__TIMEOUT", "5");

            let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.profile_name(None), "campus");
            assert_eq!(cfg.defaults.output, "json");
            assert_eq!(cfg.defaults.timeout, 5);
            assert_eq!(cfg.defaults.color, "auto");
            let campus = cfg.profile("campus").map_err(|e| e.to_string())?;
            assert_eq!(campus.username.as_deref(), Some("ada"));
            Ok(())
        });
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_| {
            let cfg = load_config_from(Path::new("absent.toml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.profile_name(None), "default");
            assert!(cfg.profiles.is_empty());
            assert!(matches!(
                cfg.profile("default"),
                Err(ConfigError::UnknownProfile { .. })
            ));
            Ok(())
        });
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles
            .insert("default".into(), profile("http://localhost:8000/api"));

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(
            loaded.profile("default").unwrap().url,
            "http://localhost:8000/api"
        );
    }

    #[test]
    fn password_env_wins_over_plaintext() {
        Jail::expect_with(|jail| {
            jail.set_env("SC_TEST_PASSWORD", "from-env");
            let p = Profile {
                password_env: Some("SC_TEST_PASSWORD".into()),
                password: Some("plaintext".into()),
                ..profile("http://localhost:8000/api")
            };
            let pw = resolve_password(&p, "jail").map_err(|e| e.to_string())?;
            assert_eq!(pw.expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn username_is_required() {
        Jail::expect_with(|_| {
            let err = resolve_username(&profile("http://x/api"), "campus").unwrap_err();
            assert!(matches!(err, ConfigError::NoUsername { .. }));
            Ok(())
        });
    }

    #[test]
    fn client_config_translation() {
        let defaults = Defaults::default();
        let mut p = profile("http://localhost:8000/api");
        p.timeout = Some(7);

        let cfg = profile_to_client_config(&p, &defaults).unwrap();
        assert_eq!(cfg.base_url.as_str(), "http://localhost:8000/api");
        assert_eq!(cfg.timeout, Duration::from_secs(7));
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);

        p.insecure = Some(true);
        let cfg = profile_to_client_config(&p, &defaults).unwrap();
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn rejects_non_http_urls() {
        let defaults = Defaults::default();
        assert!(matches!(
            profile_to_client_config(&profile("not a url"), &defaults),
            Err(ConfigError::Validation { .. })
        ));
        assert!(matches!(
            profile_to_client_config(&profile("ftp://files.example.edu"), &defaults),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn state_path_is_per_profile() {
        let p = profile("http://x/api");
        assert!(state_path(&p, "default").ends_with("state.json"));
        assert!(state_path(&p, "campus").ends_with("campus/state.json"));

        let pinned = Profile {
            state_file: Some(PathBuf::from("/tmp/sc.json")),
            ..p
        };
        assert_eq!(state_path(&pinned, "campus"), PathBuf::from("/tmp/sc.json"));
    }
}
