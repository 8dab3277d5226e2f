//! Catalog command handlers: terms, courses, and sections.

use tabled::Tabled;

use studycircle_core::{Course, CourseDetails, EntityId, Hub, Section, SectionDetails, Term};

use crate::cli::{CatalogArgs, CatalogCommand, CourseOpts, GlobalOpts, SectionOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct TermRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Term")]
    name: String,
}

impl From<&Term> for TermRow {
    fn from(t: &Term) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name.clone(),
        }
    }
}

#[derive(Tabled)]
struct CourseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Department")]
    department: String,
}

impl From<&Course> for CourseRow {
    fn from(c: &Course) -> Self {
        Self {
            id: c.id.to_string(),
            number: c.course_number.clone(),
            name: c.course_name.clone(),
            department: c.department.clone(),
        }
    }
}

#[derive(Tabled)]
struct SectionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    class_type: String,
    #[tabled(rename = "Days")]
    days: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Instructor")]
    instructor: String,
}

impl From<&Section> for SectionRow {
    fn from(s: &Section) -> Self {
        Self {
            id: s.id.to_string(),
            class_type: s.class_type.clone(),
            days: s.days.join(", "),
            time: format!("{}-{}", s.start_time, s.end_time),
            location: s.location.clone(),
            instructor: s.instructor.clone(),
        }
    }
}

impl From<CourseOpts> for CourseDetails {
    fn from(o: CourseOpts) -> Self {
        Self {
            course_number: o.number,
            course_name: o.name,
            department: o.department,
        }
    }
}

impl From<SectionOpts> for SectionDetails {
    fn from(o: SectionOpts) -> Self {
        Self {
            class_type: o.class_type,
            days: o.days,
            start_time: o.start,
            end_time: o.end,
            location: o.location,
            instructor: o.instructor,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(hub: &mut Hub, args: CatalogArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        CatalogCommand::Terms => {
            let store = &mut hub.stores.catalog;
            store.fetch_terms().await;
            util::check_fetch(store.status())?;
            let terms = store.sorted_terms();
            let out = output::render_list(
                &global.output,
                &terms,
                |t| TermRow::from(t),
                |t| t.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CatalogCommand::Courses { term, department } => {
            let term = EntityId::from(term);
            let store = &mut hub.stores.catalog;
            store.fetch_courses_for_term(&term).await;
            util::check_fetch(store.status())?;
            let mut courses = store.sorted_courses(&term);
            if let Some(department) = &department {
                courses.retain(|c| &c.department == department);
            }
            let out = output::render_list(
                &global.output,
                &courses,
                |c| CourseRow::from(c),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CatalogCommand::Sections { course, instructor } => {
            let course = EntityId::from(course);
            let store = &mut hub.stores.catalog;
            store.fetch_sections_for_course(&course).await;
            util::check_fetch(store.status())?;
            let mut sections = store.sections_by_course(&course);
            if let Some(instructor) = &instructor {
                sections.retain(|s| &s.instructor == instructor);
            }
            let out = output::render_list(
                &global.output,
                &sections,
                |s| SectionRow::from(s),
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CatalogCommand::CreateTerm { name } => {
            let term = hub
                .stores
                .catalog
                .create_term(hub.stores.auth.session(), &name)
                .await?;
            output::print_output(term.id.as_str(), global.quiet);
            output::success(&format!("Term '{}' created", term.name), &global.color, global.quiet);
            Ok(())
        }

        CatalogCommand::RenameTerm { term, name } => {
            hub.stores
                .catalog
                .update_term_name(hub.stores.auth.session(), &term.into(), &name)
                .await?;
            output::success("Term renamed", &global.color, global.quiet);
            Ok(())
        }

        CatalogCommand::DeleteTerm { term } => {
            if !util::confirm(
                &format!("Delete term {term} with all its courses and sections?"),
                "catalog delete-term",
                global.yes,
            )? {
                return Ok(());
            }
            hub.stores
                .catalog
                .delete_term(hub.stores.auth.session(), &term.into())
                .await?;
            output::success("Term deleted", &global.color, global.quiet);
            Ok(())
        }

        CatalogCommand::CreateCourse { term, details } => {
            let course = hub
                .stores
                .catalog
                .create_course(hub.stores.auth.session(), &term.into(), &details.into())
                .await?;
            output::print_output(course.id.as_str(), global.quiet);
            output::success(
                &format!("Course {} created", course.course_number),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        CatalogCommand::UpdateCourse { course, details } => {
            hub.stores
                .catalog
                .update_course_details(hub.stores.auth.session(), &course.into(), &details.into())
                .await?;
            output::success("Course updated", &global.color, global.quiet);
            Ok(())
        }

        CatalogCommand::DeleteCourse { course } => {
            if !util::confirm(
                &format!("Delete course {course} and its sections?"),
                "catalog delete-course",
                global.yes,
            )? {
                return Ok(());
            }
            hub.stores
                .catalog
                .delete_course(hub.stores.auth.session(), &course.into())
                .await?;
            output::success("Course deleted", &global.color, global.quiet);
            Ok(())
        }

        CatalogCommand::CreateSection { course, details } => {
            let section = hub
                .stores
                .catalog
                .create_section(hub.stores.auth.session(), &course.into(), &details.into())
                .await?;
            output::print_output(section.id.as_str(), global.quiet);
            output::success("Section created", &global.color, global.quiet);
            Ok(())
        }

        CatalogCommand::EditSection { section, details } => {
            hub.stores
                .catalog
                .edit_section(hub.stores.auth.session(), &section.into(), &details.into())
                .await?;
            output::success("Section updated", &global.color, global.quiet);
            Ok(())
        }

        CatalogCommand::DeleteSection { section } => {
            if !util::confirm(
                &format!("Delete section {section}?"),
                "catalog delete-section",
                global.yes,
            )? {
                return Ok(());
            }
            hub.stores
                .catalog
                .delete_section(hub.stores.auth.session(), &section.into())
                .await?;
            output::success("Section deleted", &global.color, global.quiet);
            Ok(())
        }
    }
}
