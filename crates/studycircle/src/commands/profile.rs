//! Profile command handlers.

use tabled::Tabled;

use studycircle_core::{EntityId, Hub, UserProfile};

use crate::cli::{GlobalOpts, ProfileArgs, ProfileCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Display Name")]
    display_name: String,
    #[tabled(rename = "Bio")]
    bio: String,
}

impl From<&UserProfile> for ProfileRow {
    fn from(p: &UserProfile) -> Self {
        Self {
            id: p.id.to_string(),
            user: p.user.to_string(),
            display_name: p.display_name.clone(),
            bio: util::truncate(&p.bio, 40),
        }
    }
}

fn detail(p: &UserProfile) -> String {
    [
        format!("ID:         {}", p.id),
        format!("User:       {}", p.user),
        format!("Name:       {}", p.display_name),
        format!("Bio:        {}", if p.bio.is_empty() { "-" } else { &p.bio }),
        format!(
            "Thumbnail:  {}",
            if p.thumbnail_image_url.is_empty() {
                "-"
            } else {
                &p.thumbnail_image_url
            }
        ),
    ]
    .join("\n")
}

/// The logged-in user's profile, fetched fresh.
async fn own_profile(hub: &mut Hub) -> Result<UserProfile, CliError> {
    let me = util::require_user(hub)?;
    hub.stores
        .profile
        .fetch_profile_by_user(&me)
        .await?
        .ok_or_else(|| util::not_found("profile", me.as_str(), "profile create --name <NAME>"))
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(hub: &mut Hub, args: ProfileArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ProfileCommand::Show { user } => {
            let profile = match user {
                Some(user) => {
                    let user = EntityId::from(user);
                    hub.stores
                        .profile
                        .fetch_profile_by_user(&user)
                        .await?
                        .ok_or_else(|| util::not_found("profile", user.as_str(), "profile list"))?
                }
                None => own_profile(hub).await?,
            };
            let out = output::render_single(&global.output, &profile, detail, |p| p.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProfileCommand::List => {
            let store = &mut hub.stores.profile;
            store.fetch_all_profiles().await;
            util::check_fetch(store.status())?;
            let out = output::render_list(
                &global.output,
                store.profiles().as_slice(),
                |r| ProfileRow::from(r),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProfileCommand::Create {
            name,
            bio,
            thumbnail,
        } => {
            util::check_image_url(&thumbnail)?;
            let me = util::require_user(hub)?;
            let profile = hub
                .stores
                .profile
                .create_profile(hub.stores.auth.session(), &me, &name, &bio, &thumbnail)
                .await?;
            output::print_output(profile.id.as_str(), global.quiet);
            output::success("Profile created", &global.color, global.quiet);
            Ok(())
        }

        ProfileCommand::SetName { name } => {
            let profile = own_profile(hub).await?;
            hub.stores
                .profile
                .update_display_name(hub.stores.auth.session(), &profile.id, &name)
                .await?;
            output::success("Display name updated", &global.color, global.quiet);
            Ok(())
        }

        ProfileCommand::SetBio { bio } => {
            let profile = own_profile(hub).await?;
            hub.stores
                .profile
                .update_bio(hub.stores.auth.session(), &profile.id, &bio)
                .await?;
            output::success("Bio updated", &global.color, global.quiet);
            Ok(())
        }

        ProfileCommand::SetThumbnail { url } => {
            util::check_image_url(&url)?;
            let profile = own_profile(hub).await?;
            hub.stores
                .profile
                .update_thumbnail_image(hub.stores.auth.session(), &profile.id, &url)
                .await?;
            output::success("Thumbnail updated", &global.color, global.quiet);
            Ok(())
        }

        ProfileCommand::Delete => {
            let profile = own_profile(hub).await?;
            if !util::confirm("Delete your profile?", "profile delete", global.yes)? {
                return Ok(());
            }
            hub.stores
                .profile
                .delete_profile(hub.stores.auth.session(), &profile.id)
                .await?;
            output::success("Profile deleted", &global.color, global.quiet);
            Ok(())
        }
    }
}
