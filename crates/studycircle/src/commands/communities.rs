//! Community command handlers.

use tabled::Tabled;

use studycircle_core::{Community, EntityId, Hub, Membership, Role};

use crate::cli::{CommunitiesArgs, CommunitiesCommand, GlobalOpts, RoleArg};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CommunityRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Members")]
    members: usize,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Community> for CommunityRow {
    fn from(c: &Community) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            members: c.memberships.len(),
            created: util::fmt_date(c.creation_date),
            description: util::truncate(&c.description, 40),
        }
    }
}

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "Membership")]
    id: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Joined")]
    joined: String,
}

impl From<&Membership> for MemberRow {
    fn from(m: &Membership) -> Self {
        Self {
            id: m.id.to_string(),
            user: m.user.to_string(),
            role: m.role.to_string(),
            joined: util::fmt_date(m.join_date),
        }
    }
}

fn detail(c: &Community) -> String {
    [
        format!("ID:          {}", c.id),
        format!("Name:        {}", c.name),
        format!("Description: {}", c.description),
        format!("Created:     {}", util::fmt_date(c.creation_date)),
        format!("Members:     {}", c.memberships.len()),
    ]
    .join("\n")
}

impl From<RoleArg> for Role {
    fn from(r: RoleArg) -> Self {
        match r {
            RoleArg::Admin => Role::Admin,
            RoleArg::Member => Role::Member,
        }
    }
}

/// Load communities and memberships so the derived views have data.
///
/// Each fetch resets the store error, so check after every one.
async fn refresh(hub: &mut Hub) -> Result<(), CliError> {
    let store = &mut hub.stores.community;
    store.fetch_communities().await;
    util::check_fetch(store.status())?;
    store.fetch_memberships().await;
    util::check_fetch(store.status())
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    hub: &mut Hub,
    args: CommunitiesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CommunitiesCommand::List { mine, admin } => {
            refresh(hub).await?;
            let store = &hub.stores.community;
            let communities = if mine || admin {
                let me = util::require_user(hub)?;
                if admin {
                    store.admin_communities(&me)
                } else {
                    store.user_communities(&me)
                }
            } else {
                store.communities().as_slice().to_vec()
            };
            let out = output::render_list(
                &global.output,
                &communities,
                |r| CommunityRow::from(r),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CommunitiesCommand::Get { community } => {
            let id = EntityId::from(community);
            let store = &mut hub.stores.community;
            let found = store.fetch_community(&id).await.ok_or_else(|| {
                util::not_found("community", id.as_str(), "communities list")
            })?;
            let out = output::render_single(&global.output, &found, detail, |c| c.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CommunitiesCommand::Create { name, description } => {
            let me = util::require_user(hub)?;
            let created = hub
                .stores
                .community
                .create_community(hub.stores.auth.session(), &name, &description, &me)
                .await?;
            output::print_output(created.id.as_str(), global.quiet);
            output::success(
                &format!("Community '{}' created", created.name),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        CommunitiesCommand::Join { community } => {
            let me = util::require_user(hub)?;
            let membership = hub
                .stores
                .community
                .join_community(hub.stores.auth.session(), &community.into(), &me)
                .await?;
            output::print_output(membership.id.as_str(), global.quiet);
            output::success("Joined community", &global.color, global.quiet);
            Ok(())
        }

        CommunitiesCommand::Leave { community } => {
            let me = util::require_user(hub)?;
            hub.stores
                .community
                .leave_community(hub.stores.auth.session(), &community.into(), &me)
                .await?;
            output::success("Left community", &global.color, global.quiet);
            Ok(())
        }

        CommunitiesCommand::Update {
            community,
            name,
            description,
        } => {
            let me = util::require_user(hub)?;
            let id = EntityId::from(community);
            let store = &mut hub.stores.community;
            let current = store
                .fetch_community(&id)
                .await
                .ok_or_else(|| util::not_found("community", id.as_str(), "communities list"))?;
            let name = name.unwrap_or(current.name);
            let description = description.unwrap_or(current.description);
            hub.stores
                .community
                .update_community_details(hub.stores.auth.session(), &id, &name, &description, &me)
                .await?;
            output::success("Community updated", &global.color, global.quiet);
            Ok(())
        }

        CommunitiesCommand::Members { community } => {
            let store = &mut hub.stores.community;
            store.fetch_memberships().await;
            util::check_fetch(store.status())?;
            let members = store.community_members(&community.into());
            let out = output::render_list(
                &global.output,
                &members,
                |r| MemberRow::from(r),
                |m| m.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CommunitiesCommand::SetRole { membership, role } => {
            let me = util::require_user(hub)?;
            let role = Role::from(role);
            hub.stores
                .community
                .set_member_role(hub.stores.auth.session(), &membership.into(), role, &me)
                .await?;
            output::success(&format!("Role set to {role}"), &global.color, global.quiet);
            Ok(())
        }

        CommunitiesCommand::Delete { community } => {
            let me = util::require_user(hub)?;
            if !util::confirm(
                &format!("Delete community {community} and all its memberships?"),
                "communities delete",
                global.yes,
            )? {
                return Ok(());
            }
            hub.stores
                .community
                .delete_community(hub.stores.auth.session(), &community.into(), &me)
                .await?;
            output::success("Community deleted", &global.color, global.quiet);
            Ok(())
        }
    }
}
