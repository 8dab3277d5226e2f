//! Clap derive structures for the `studycircle` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// studycircle -- command-line client for university communities
#[derive(Debug, Parser)]
#[command(
    name = "studycircle",
    version,
    about = "Communities, course catalog, and study groups from the command line",
    long_about = "A command-line client for the StudyCircle platform.\n\n\
        Manage your profile, communities and their discussion boards, browse\n\
        the course catalog, track enrollments, and join study groups.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "STUDYCIRCLE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL (overrides profile)
    #[arg(long, short = 'u', env = "STUDYCIRCLE_URL", global = true)]
    pub url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "STUDYCIRCLE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "STUDYCIRCLE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "STUDYCIRCLE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and persist the session
    Login(LoginArgs),

    /// End the current session
    Logout,

    /// Create a new account
    Register {
        /// Username for the new account
        username: String,
    },

    /// Show the logged-in user
    Whoami,

    /// Manage your profile and look up others
    #[command(alias = "me")]
    Profile(ProfileArgs),

    /// Browse, join, and administer communities
    #[command(alias = "c")]
    Communities(CommunitiesArgs),

    /// Read and write community board postings
    #[command(alias = "b")]
    Board(BoardArgs),

    /// Browse and edit terms, courses, and sections
    Catalog(CatalogArgs),

    /// Track your course enrollments
    #[command(alias = "enr")]
    Enrollments(EnrollmentsArgs),

    /// Study groups and their sessions
    #[command(alias = "g")]
    Groups(GroupsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (defaults to the profile's username)
    pub username: Option<String>,

    /// Store the password in the system keyring after a successful login
    #[arg(long)]
    pub remember: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROFILE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show a profile (yours by default)
    Show {
        /// User id to look up
        #[arg(long)]
        user: Option<String>,
    },

    /// List every profile
    #[command(alias = "ls")]
    List,

    /// Create your profile
    Create {
        /// Display name
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        bio: String,

        /// Thumbnail image URL
        #[arg(long, default_value = "")]
        thumbnail: String,
    },

    /// Change your display name
    SetName { name: String },

    /// Change your bio
    SetBio { bio: String },

    /// Change your thumbnail image URL
    SetThumbnail { url: String },

    /// Delete your profile
    Delete,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMMUNITIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CommunitiesArgs {
    #[command(subcommand)]
    pub command: CommunitiesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CommunitiesCommand {
    /// List communities
    #[command(alias = "ls")]
    List {
        /// Only communities you belong to
        #[arg(long)]
        mine: bool,

        /// Only communities you administer
        #[arg(long, conflicts_with = "mine")]
        admin: bool,
    },

    /// Show community details
    Get { community: String },

    /// Create a community (you become its admin)
    Create {
        name: String,

        #[arg(long, short = 'd', default_value = "")]
        description: String,
    },

    /// Join a community
    Join { community: String },

    /// Leave a community
    Leave { community: String },

    /// Rename or re-describe a community
    Update {
        community: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, short = 'd')]
        description: Option<String>,
    },

    /// List a community's members
    Members { community: String },

    /// Change a member's role
    SetRole {
        /// Membership id
        membership: String,

        /// New role
        #[arg(value_enum)]
        role: RoleArg,
    },

    /// Delete a community
    Delete { community: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    Member,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BOARD
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BoardArgs {
    #[command(subcommand)]
    pub command: BoardCommand,
}

#[derive(Debug, Subcommand)]
pub enum BoardCommand {
    /// List a community's postings
    #[command(alias = "ls")]
    Posts {
        community: String,

        /// Only postings with this tag
        #[arg(long, short = 't')]
        tag: Option<String>,

        /// Only postings about this course
        #[arg(long)]
        course: Option<String>,
    },

    /// Publish a posting
    Post {
        community: String,

        #[arg(long)]
        title: String,

        #[arg(long)]
        body: String,

        /// Tag (repeatable)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,

        /// Related course id
        #[arg(long)]
        course: Option<String>,
    },

    /// Edit one of your postings
    Edit {
        posting: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        body: Option<String>,

        /// Replace the tags (repeatable)
        #[arg(long = "tag", short = 't')]
        tags: Option<Vec<String>>,

        #[arg(long)]
        course: Option<String>,
    },

    /// Delete a posting and its replies
    Delete { posting: String },

    /// Show the replies to a posting
    Replies { posting: String },

    /// Reply to a posting
    Reply { posting: String, body: String },

    /// Edit one of your replies
    EditReply { reply: String, body: String },

    /// Delete a reply
    DeleteReply { reply: String },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CATALOG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// List terms
    Terms,

    /// List a term's courses
    Courses {
        term: String,

        /// Only courses in this department
        #[arg(long)]
        department: Option<String>,
    },

    /// List a course's sections
    Sections {
        course: String,

        /// Only sections taught by this instructor
        #[arg(long)]
        instructor: Option<String>,
    },

    /// Create a term
    CreateTerm { name: String },

    /// Rename a term
    RenameTerm { term: String, name: String },

    /// Delete a term with its courses and sections
    DeleteTerm { term: String },

    /// Define a course in a term
    CreateCourse {
        term: String,

        #[command(flatten)]
        details: CourseOpts,
    },

    /// Replace a course's details
    UpdateCourse {
        course: String,

        #[command(flatten)]
        details: CourseOpts,
    },

    /// Remove a course with its sections
    DeleteCourse { course: String },

    /// Add a section to a course
    CreateSection {
        course: String,

        #[command(flatten)]
        details: SectionOpts,
    },

    /// Replace a section's details
    EditSection {
        section: String,

        #[command(flatten)]
        details: SectionOpts,
    },

    /// Remove a section
    DeleteSection { section: String },
}

#[derive(Debug, Args)]
pub struct CourseOpts {
    /// Course number (e.g. "CS 101")
    #[arg(long)]
    pub number: String,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub department: String,
}

#[derive(Debug, Args)]
pub struct SectionOpts {
    /// Lecture, Lab, Recitation, ...
    #[arg(long)]
    pub class_type: String,

    /// Meeting days, comma separated (e.g. "Mon,Wed")
    #[arg(long, value_delimiter = ',')]
    pub days: Vec<String>,

    #[arg(long)]
    pub start: String,

    #[arg(long)]
    pub end: String,

    #[arg(long, default_value = "")]
    pub location: String,

    #[arg(long, default_value = "")]
    pub instructor: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ENROLLMENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EnrollmentsArgs {
    #[command(subcommand)]
    pub command: EnrollmentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EnrollmentsCommand {
    /// List enrollments (yours by default)
    #[command(alias = "ls")]
    List {
        /// Another user's id; only their visible enrollments are shown
        #[arg(long)]
        user: Option<String>,
    },

    /// Enroll in a course section
    Add {
        course: String,
        section: String,

        /// Hide this enrollment from other users
        #[arg(long)]
        hidden: bool,
    },

    /// Move an enrollment to another section
    Move { enrollment: String, section: String },

    /// Show or hide an enrollment
    Visibility {
        enrollment: String,

        #[arg(value_enum)]
        visibility: VisibilityArg,
    },

    /// Drop an enrollment
    Remove { enrollment: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum VisibilityArg {
    Visible,
    Hidden,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  STUDY GROUPS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// List study groups
    #[command(alias = "ls")]
    List,

    /// Create a study group
    Create {
        name: String,

        #[arg(long)]
        subject: String,

        #[arg(long, short = 'd', default_value = "")]
        description: String,
    },

    /// Join a study group
    Join { group: i64 },

    /// Leave a study group
    Leave { group: i64 },

    /// List study sessions
    Sessions {
        /// Only sessions of this group
        #[arg(long)]
        group: Option<i64>,
    },

    /// Schedule a study session
    Schedule {
        group: i64,

        #[arg(long)]
        title: String,

        /// Start time (RFC 3339, e.g. 2026-10-20T18:00:00Z)
        #[arg(long)]
        at: String,

        /// Duration in minutes
        #[arg(long, default_value = "60")]
        duration: u32,

        #[arg(long, short = 'd', default_value = "")]
        description: String,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        online: bool,
    },

    /// Cancel a study session
    Cancel { session: i64 },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Display the current configuration (passwords masked)
    Show,

    /// Print the config file path
    Path,

    /// List profile names
    Profiles,

    /// Set the default profile
    Use { name: String },

    /// Store a profile's password in the system keyring
    SetPassword,

    /// Remove a profile's password from the system keyring
    ForgetPassword,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
