//! Shared helpers for command handlers.

use std::io::IsTerminal;

use chrono::{DateTime, Utc};

use studycircle_core::{EntityId, Hub, StoreStatus};

use crate::error::CliError;

/// The logged-in user's id, or `NotLoggedIn`.
pub fn require_user(hub: &Hub) -> Result<EntityId, CliError> {
    match (hub.stores.auth.user_id(), hub.session()) {
        (Some(user), Some(_)) => Ok(user.clone()),
        _ => Err(CliError::NotLoggedIn),
    }
}

/// Fetch operations record failures instead of returning them; surface a
/// recorded error as a command failure.
///
/// A rejected session maps to an authentication failure so the user is
/// told to log in again.
pub fn check_fetch(status: &StoreStatus) -> Result<(), CliError> {
    match status.error() {
        Some(message) if status.login_expired() => Err(CliError::AuthFailed {
            message: message.to_owned(),
        }),
        Some(message) => Err(CliError::Rejected {
            message: message.to_owned(),
        }),
        None => Ok(()),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to prompt on, `--yes` is required.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

pub fn not_found(resource_type: &str, identifier: &str, list_command: &str) -> CliError {
    CliError::NotFound {
        resource_type: resource_type.into(),
        identifier: identifier.into(),
        list_command: list_command.into(),
    }
}

pub fn fmt_date(date: Option<DateTime<Utc>>) -> String {
    date.map_or_else(|| "-".into(), |d| d.format("%Y-%m-%d %H:%M").to_string())
}

/// An image URL must be absolute http(s); empty clears the image.
pub fn check_image_url(raw: &str) -> Result<(), CliError> {
    if raw.is_empty() {
        return Ok(());
    }
    match url::Url::parse(raw) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => Ok(()),
        Ok(u) => Err(CliError::Validation {
            field: "thumbnail".into(),
            reason: format!("unsupported scheme '{}'", u.scheme()),
        }),
        Err(e) => Err(CliError::Validation {
            field: "thumbnail".into(),
            reason: e.to_string(),
        }),
    }
}

/// Cut `text` to at most `max` characters, marking the cut with `…`.
pub fn truncate(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}
