//! Enrollment command handlers.

use tabled::Tabled;

use studycircle_core::{Enrollment, EntityId, Hub};

use crate::cli::{EnrollmentsArgs, EnrollmentsCommand, GlobalOpts, VisibilityArg};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct EnrollmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Course")]
    course: String,
    #[tabled(rename = "Section")]
    section: String,
    #[tabled(rename = "Visible")]
    visible: String,
}

impl From<&Enrollment> for EnrollmentRow {
    fn from(e: &Enrollment) -> Self {
        Self {
            id: e.id.to_string(),
            course: e.course.to_string(),
            section: e.section.to_string(),
            visible: if e.visibility { "yes" } else { "no" }.into(),
        }
    }
}

pub async fn handle(
    hub: &mut Hub,
    args: EnrollmentsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        EnrollmentsCommand::List { user } => {
            let me = util::require_user(hub)?;
            let owner = user.map_or_else(|| me.clone(), EntityId::from);
            let store = &mut hub.stores.enrollment;
            store.fetch_enrollments_for_owner(&owner).await;
            util::check_fetch(store.status())?;

            // Other users only expose what they marked visible.
            let enrollments = if owner == me {
                store.user_enrollments(&owner)
            } else {
                store.user_visible_enrollments(&owner)
            };
            let out = output::render_list(
                &global.output,
                &enrollments,
                |e| EnrollmentRow::from(e),
                |e| e.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EnrollmentsCommand::Add {
            course,
            section,
            hidden,
        } => {
            let me = util::require_user(hub)?;
            let enrollment = hub
                .stores
                .enrollment
                .add_enrollment(
                    hub.stores.auth.session(),
                    &me,
                    &course.into(),
                    &section.into(),
                    !hidden,
                )
                .await?;
            output::print_output(enrollment.id.as_str(), global.quiet);
            output::success("Enrolled", &global.color, global.quiet);
            Ok(())
        }

        EnrollmentsCommand::Move {
            enrollment,
            section,
        } => {
            hub.stores
                .enrollment
                .update_enrollment_section(
                    hub.stores.auth.session(),
                    &enrollment.into(),
                    &section.into(),
                )
                .await?;
            output::success("Enrollment moved", &global.color, global.quiet);
            Ok(())
        }

        EnrollmentsCommand::Visibility {
            enrollment,
            visibility,
        } => {
            let visible = matches!(visibility, VisibilityArg::Visible);
            hub.stores
                .enrollment
                .set_enrollment_visibility(hub.stores.auth.session(), &enrollment.into(), visible)
                .await?;
            let state = if visible { "visible" } else { "hidden" };
            output::success(&format!("Enrollment is now {state}"), &global.color, global.quiet);
            Ok(())
        }

        EnrollmentsCommand::Remove { enrollment } => {
            if !util::confirm(
                &format!("Drop enrollment {enrollment}?"),
                "enrollments remove",
                global.yes,
            )? {
                return Ok(());
            }
            hub.stores
                .enrollment
                .remove_enrollment(hub.stores.auth.session(), &enrollment.into())
                .await?;
            output::success("Enrollment removed", &global.color, global.quiet);
            Ok(())
        }
    }
}
