//! Study group command handlers (REST generation).

use chrono::{DateTime, SecondsFormat};
use tabled::Tabled;

use studycircle_api::rest::models::NewStudySession;
use studycircle_core::{CoreError, Hub, StudyGroup, StudySession};

use crate::cli::{GlobalOpts, GroupsArgs, GroupsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Members")]
    members: usize,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&StudyGroup> for GroupRow {
    fn from(g: &StudyGroup) -> Self {
        Self {
            id: g.id,
            name: g.name.clone(),
            subject: g.subject.clone(),
            members: g.members.len(),
            created: util::fmt_date(g.created_at),
        }
    }
}

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Group")]
    group: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Minutes")]
    minutes: u32,
    #[tabled(rename = "Where")]
    place: String,
}

impl From<&StudySession> for SessionRow {
    fn from(s: &StudySession) -> Self {
        let place = match (&s.location, s.is_online) {
            (Some(location), true) => format!("{location} (online)"),
            (Some(location), false) => location.clone(),
            (None, true) => "online".into(),
            (None, false) => "-".into(),
        };
        Self {
            id: s.id,
            group: s.group_id,
            title: s.title.clone(),
            when: s
                .scheduled_time
                .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
            minutes: s.duration_minutes,
            place,
        }
    }
}

/// Normalize a user-supplied start time to RFC 3339 in UTC.
fn parse_start(at: &str) -> Result<String, CliError> {
    DateTime::parse_from_rfc3339(at)
        .map(|t| t.to_utc().to_rfc3339_opts(SecondsFormat::Secs, true))
        .map_err(|e| CliError::Validation {
            field: "at".into(),
            reason: format!("expected an RFC 3339 timestamp: {e}"),
        })
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(hub: &mut Hub, args: GroupsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        GroupsCommand::List => {
            let store = &mut hub.stores.study_groups;
            store.fetch_study_groups().await;
            util::check_fetch(store.status())?;
            let out = output::render_list(
                &global.output,
                store.groups(),
                |g| GroupRow::from(g),
                |g| g.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GroupsCommand::Create {
            name,
            subject,
            description,
        } => {
            let group = hub
                .stores
                .study_groups
                .create_study_group(&name, &description, &subject)
                .await?;
            output::print_output(&group.id.to_string(), global.quiet);
            output::success(
                &format!("Study group '{}' created", group.name),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        GroupsCommand::Join { group } => {
            hub.stores.study_groups.join_study_group(group).await?;
            output::success("Joined study group", &global.color, global.quiet);
            Ok(())
        }

        GroupsCommand::Leave { group } => {
            hub.stores.study_groups.leave_study_group(group).await?;
            output::success("Left study group", &global.color, global.quiet);
            Ok(())
        }

        GroupsCommand::Sessions { group } => {
            let store = &mut hub.stores.study_groups;
            store.fetch_study_sessions(group).await;
            util::check_fetch(store.status())?;
            let out = output::render_list(
                &global.output,
                store.sessions(),
                |s| SessionRow::from(s),
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GroupsCommand::Schedule {
            group,
            title,
            at,
            duration,
            description,
            location,
            online,
        } => {
            let request = NewStudySession {
                group_id: group,
                title,
                description,
                scheduled_time: parse_start(&at)?,
                duration,
                location,
                is_online: online,
            };
            let created = hub.stores.study_groups.create_study_session(request).await?;
            output::print_output(&created.id.to_string(), global.quiet);
            output::success("Study session scheduled", &global.color, global.quiet);
            Ok(())
        }

        GroupsCommand::Cancel { session } => {
            if !util::confirm(
                &format!("Cancel study session {session}?"),
                "groups cancel",
                global.yes,
            )? {
                return Ok(());
            }
            hub.rest()
                .delete_study_session(session)
                .await
                .map_err(CoreError::from)?;
            output::success("Study session cancelled", &global.color, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn start_time_is_normalized_to_utc() {
        assert_eq!(
            parse_start("2026-10-20T18:00:00+02:00").unwrap(),
            "2026-10-20T16:00:00Z"
        );
    }

    #[test]
    fn malformed_start_time_is_a_validation_error() {
        let err = parse_start("tomorrow at six").unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "at"));
    }
}
