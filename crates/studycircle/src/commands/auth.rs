//! Login, logout, registration, and identity.

use dialoguer::Input;
use secrecy::ExposeSecret;
use serde::Serialize;

use studycircle_core::Hub;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::{self, ActiveProfile};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Identity {
    user: String,
    username: String,
    session_expires: Option<String>,
}

pub async fn login(
    hub: &mut Hub,
    args: LoginArgs,
    active: &ActiveProfile,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = match args.username {
        Some(u) => u,
        None => match studycircle_config::resolve_username(&active.profile, &active.name) {
            Ok(u) => u,
            Err(_) => Input::new()
                .with_prompt("Username")
                .interact_text()
                .map_err(|e| CliError::Io(std::io::Error::other(e)))?,
        },
    };
    let password = config::login_password(active)?;

    hub.login(&username, &password).await?;

    if args.remember {
        studycircle_config::store_password(&active.name, &password)?;
    }
    output::success(&format!("Logged in as {username}"), &global.color, global.quiet);
    Ok(())
}

pub async fn logout(hub: &mut Hub, global: &GlobalOpts) -> Result<(), CliError> {
    if !hub.stores.auth.is_logged_in() {
        output::note("Not logged in", &global.color, global.quiet);
        return Ok(());
    }
    hub.logout().await;
    output::success("Logged out", &global.color, global.quiet);
    Ok(())
}

pub async fn register(hub: &mut Hub, username: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let password = config::prompt_password("Password: ")?;
    let again = config::prompt_password("Confirm password: ")?;
    if password.expose_secret() != again.expose_secret() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "passwords do not match".into(),
        });
    }

    let user = hub.stores.auth.register(username, &password).await?;
    output::print_output(user.as_str(), global.quiet);
    output::success(
        &format!("Account '{username}' created. Log in with: studycircle login {username}"),
        &global.color,
        global.quiet,
    );
    Ok(())
}

pub fn whoami(hub: &Hub, global: &GlobalOpts) -> Result<(), CliError> {
    let (Some(user), Some(session)) = (hub.stores.auth.current_user(), hub.session()) else {
        return Err(CliError::NotLoggedIn);
    };
    let identity = Identity {
        user: user.id.to_string(),
        username: user.username.clone(),
        session_expires: session.expiry.map(|e| e.to_rfc3339()),
    };
    let out = output::render_single(
        &global.output,
        &identity,
        |i| {
            format!(
                "User:      {}\nID:        {}\nExpires:   {}",
                i.username,
                i.user,
                i.session_expires.as_deref().unwrap_or("-")
            )
        },
        |i| i.user.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
