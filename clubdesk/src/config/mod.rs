//! Configuration system for the `ClubDesk` client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/clubdesk/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use clubdesk_model::{FilterSelection, FilterValue, Priority, Role, TaskStatus};

use crate::render::DEFAULT_DATE_FORMAT;
use crate::schema;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// A config file value is out of its allowed set.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// Dotted key, e.g. `member.role`.
        key: &'static str,
        /// Parse failure.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    store: StoreFileConfig,
    member: MemberFileConfig,
    display: DisplayFileConfig,
    filters: FiltersFileConfig,
}

/// `[store]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct StoreFileConfig {
    path: Option<PathBuf>,
}

/// `[member]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct MemberFileConfig {
    id: Option<String>,
    role: Option<String>,
}

/// `[display]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct DisplayFileConfig {
    date_format: Option<String>,
    max_task_title_len: Option<usize>,
}

/// `[filters]` section: the selection a task listing starts from.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct FiltersFileConfig {
    domain: Option<String>,
    priority: Option<String>,
    status: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// JSON store file.
    pub store_path: PathBuf,
    /// Signed-in member id.
    pub member_id: String,
    /// Signed-in member role.
    pub role: Role,
    /// Date display format (chrono format string).
    pub date_format: String,
    /// Maximum title length in characters.
    pub max_task_title_len: usize,
    /// Filter selection applied when none is given on the command line.
    pub default_filters: FilterSelection,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            member_id: "member".to_string(),
            role: Role::Member,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            max_task_title_len: clubdesk_model::task::MAX_TASK_TITLE_LENGTH,
            default_filters: FilterSelection::all(),
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an
    /// error. Otherwise the default path (`~/.config/clubdesk/config.toml`)
    /// is tried and silently ignored if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed,
    /// or holds an unknown role or filter value.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file)
    }

    /// Resolve a `ClientConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let file_role = parse_opt::<Role>("member.role", file.member.role.as_deref())?;
        let default_filters = FilterSelection {
            domain: parse_opt("filters.domain", file.filters.domain.as_deref())?
                .unwrap_or_default(),
            priority: parse_opt("filters.priority", file.filters.priority.as_deref())?
                .unwrap_or_default(),
            status: parse_opt("filters.status", file.filters.status.as_deref())?
                .unwrap_or_default(),
        };

        Ok(Self {
            store_path: cli
                .store
                .clone()
                .or_else(|| file.store.path.clone())
                .unwrap_or(defaults.store_path),
            member_id: cli
                .member
                .clone()
                .or_else(|| file.member.id.clone())
                .unwrap_or(defaults.member_id),
            role: cli.role.or(file_role).unwrap_or(defaults.role),
            date_format: cli
                .date_format
                .clone()
                .or_else(|| file.display.date_format.clone())
                .unwrap_or(defaults.date_format),
            max_task_title_len: file
                .display
                .max_task_title_len
                .unwrap_or(defaults.max_task_title_len),
            default_filters,
        })
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Role-aware society dashboard")]
pub struct CliArgs {
    /// Path to the JSON store file.
    #[arg(long, env = "CLUBDESK_STORE")]
    pub store: Option<PathBuf>,

    /// Your member id.
    #[arg(long, env = "CLUBDESK_MEMBER")]
    pub member: Option<String>,

    /// Your role (EB, EC, Core, Member).
    #[arg(long, env = "CLUBDESK_ROLE")]
    pub role: Option<Role>,

    /// Path to config file (default: `~/.config/clubdesk/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Date display format (chrono format string).
    #[arg(long)]
    pub date_format: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "CLUBDESK_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/clubdesk.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Dashboard commands. Without a command the task list is shown.
#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List tasks, optionally filtered.
    Tasks {
        /// Domain to show, or `All`.
        #[arg(long)]
        domain: Option<String>,
        /// Priority to show (High, Medium, Low, All).
        #[arg(long)]
        priority: Option<FilterValue<Priority>>,
        /// Status to show (Upcoming, Today, Completed, All).
        #[arg(long)]
        status: Option<FilterValue<TaskStatus>>,
    },
    /// List events, soonest first.
    Events,
    /// List announcements, newest first.
    Announcements,
    /// Show quick stats.
    Summary,
    /// Create a task.
    AddTask {
        title: String,
        #[arg(long)]
        domain: String,
        #[arg(long)]
        due: NaiveDate,
        #[arg(long, default_value = "Medium")]
        priority: Priority,
        #[arg(long, default_value = "Upcoming")]
        status: TaskStatus,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        assign: Option<String>,
    },
    /// Delete a task.
    DeleteTask {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Create an event.
    AddEvent {
        title: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, default_value = "")]
        time: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete an event.
    DeleteEvent {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Post an announcement.
    Announce {
        title: String,
        content: String,
        #[arg(long, default_value = "Medium")]
        priority: Priority,
    },
    /// Delete an announcement.
    DeleteAnnouncement {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

impl Command {
    /// Collections whose snapshot the command reads.
    ///
    /// Write commands read nothing up front; the session refreshes after
    /// the write.
    #[must_use]
    pub const fn required_collections(&self) -> &'static [&'static str] {
        match self {
            Self::Tasks { .. } => &[schema::TASKS],
            Self::Events => &[schema::EVENTS],
            Self::Announcements => &[schema::ANNOUNCEMENTS],
            Self::Summary => &[schema::TASKS, schema::EVENTS, schema::ANNOUNCEMENTS],
            Self::AddTask { .. }
            | Self::DeleteTask { .. }
            | Self::AddEvent { .. }
            | Self::DeleteEvent { .. }
            | Self::Announce { .. }
            | Self::DeleteAnnouncement { .. } => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn default_store_path() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from("clubdesk-store.json"),
        |dir| dir.join("clubdesk").join("store.json"),
    )
}

fn parse_opt<T>(key: &'static str, raw: Option<&str>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|s| {
        s.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            reason: e.to_string(),
        })
    })
    .transpose()
}

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("clubdesk").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
