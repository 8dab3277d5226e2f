//! Command dispatch: bridges CLI args -> store operations -> output formatting.

pub mod auth;
pub mod board;
pub mod catalog;
pub mod communities;
pub mod config_cmd;
pub mod enrollments;
pub mod groups;
pub mod profile;
pub mod util;

use studycircle_core::Hub;

use crate::cli::{Command, GlobalOpts};
use crate::config::ActiveProfile;
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    hub: &mut Hub,
    active: &ActiveProfile,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(hub, args, active, global).await,
        Command::Logout => auth::logout(hub, global).await,
        Command::Register { username } => auth::register(hub, &username, global).await,
        Command::Whoami => auth::whoami(hub, global),
        Command::Profile(args) => profile::handle(hub, args, global).await,
        Command::Communities(args) => communities::handle(hub, args, global).await,
        Command::Board(args) => board::handle(hub, args, global).await,
        Command::Catalog(args) => catalog::handle(hub, args, global).await,
        Command::Enrollments(args) => enrollments::handle(hub, args, global).await,
        Command::Groups(args) => groups::handle(hub, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
