use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::api::UploadKind;
use crate::models::{ArticleStatus, ArticleVisibility, UserRole};

/// CMS Console - command-line admin console for the CMS REST API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Base URL of the CMS API (e.g. https://api.example.org/api/v1)
    #[arg(short = 'u', long, env = "CMS_API_URL")]
    pub base_url: Option<String>,

    /// Path to the SQLite file holding the session token
    #[arg(short = 'd', long, env = "CMS_TOKEN_DB")]
    pub token_db: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// HTTP connect timeout in seconds
    #[arg(long, env = "HTTP_CONNECT_TIMEOUT", default_value = "10")]
    pub connect_timeout: u64,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Query cache TTL in seconds
    #[arg(long, env = "CACHE_TTL", default_value = "60")]
    pub cache_ttl: u64,

    /// Disable the client-side query cache
    #[arg(long, env = "NO_CACHE")]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session token
    Login {
        /// Account email (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// End the session and clear the stored token
    Logout,
    /// Show the currently signed-in account
    Whoami,
    /// Force an access token refresh
    Refresh,
    /// Change the password of the signed-in account
    ChangePassword,
    /// Article management
    Articles {
        #[command(subcommand)]
        command: ArticlesCommand,
    },
    /// User account management
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
    /// Site settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
    /// Upload an image
    Upload {
        /// Upload target
        #[arg(value_enum)]
        kind: UploadKind,
        /// Image file to upload
        file: PathBuf,
    },
    /// Admin dashboard statistics
    Dashboard,
}

#[derive(Subcommand, Debug)]
pub enum ArticlesCommand {
    /// List articles
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, value_enum)]
        status: Option<ArticleStatus>,
        #[arg(long, value_enum)]
        visibility: Option<ArticleVisibility>,
        #[arg(long)]
        search: Option<String>,
        /// Use the public listing instead of the admin one
        #[arg(long)]
        public: bool,
    },
    /// Show one article by id (or by slug with --public)
    Get {
        id: String,
        #[arg(long)]
        public: bool,
    },
    /// Create an article
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        slug: String,
        /// File containing the HTML body
        #[arg(long)]
        content_file: PathBuf,
        #[arg(long)]
        excerpt: Option<String>,
        #[arg(long)]
        thumbnail_url: Option<String>,
        #[arg(long, value_enum, default_value = "draft")]
        status: ArticleStatus,
        #[arg(long, value_enum, default_value = "public")]
        visibility: ArticleVisibility,
        #[arg(long)]
        meta_title: Option<String>,
        #[arg(long)]
        meta_description: Option<String>,
    },
    /// Update an article (absent flags leave fields untouched)
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        slug: Option<String>,
        /// File containing the new HTML body
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long)]
        excerpt: Option<String>,
        #[arg(long)]
        thumbnail_url: Option<String>,
        #[arg(long, value_enum)]
        status: Option<ArticleStatus>,
        #[arg(long, value_enum)]
        visibility: Option<ArticleVisibility>,
    },
    /// Delete an article
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List user accounts
    List {
        #[arg(long, value_enum)]
        role: Option<UserRole>,
        /// Filter by active state (true or false)
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Create a user account (password is prompted)
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long, value_enum, default_value = "editor")]
        role: UserRole,
    },
    /// Update a user account
    Update {
        id: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum)]
        role: Option<UserRole>,
    },
    /// Activate a user account
    Activate { id: String },
    /// Deactivate a user account
    Deactivate { id: String },
    /// Delete a user account
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// List settings
    List {
        /// Only the public settings
        #[arg(long)]
        public: bool,
    },
    /// Show one setting by key
    Get { key: String },
    /// Set one setting
    Set { key: String, value: String },
    /// Bulk-update settings from a JSON object file
    Import { file: PathBuf },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub token_db: PathBuf,
    pub log_level: String,
    pub connect_timeout: u64,
    pub request_timeout: u64,
    pub cache_ttl: u64,
    pub no_cache: bool,
}

impl Config {
    /// Resolve configuration with priority: CLI > ENV > defaults.
    /// `.env` is loaded by the caller before clap reads the environment.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let base_url = args
            .base_url
            .clone()
            .context("CMS_API_URL is required (use -u or set CMS_API_URL env var)")?;

        let token_db = match args.token_db.as_deref() {
            Some(path) => expand_tilde(path),
            None => default_token_db()?,
        };

        Ok(Config {
            base_url,
            token_db,
            log_level: args.log_level.clone(),
            connect_timeout: args.connect_timeout,
            request_timeout: args.request_timeout,
            cache_ttl: args.cache_ttl,
            no_cache: args.no_cache,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("CMS_API_URL must be an http(s) URL: {}", self.base_url);
        }
        if self.request_timeout == 0 {
            anyhow::bail!("HTTP_REQUEST_TIMEOUT must be greater than zero");
        }
        Ok(())
    }
}

/// Default location of the session token store, under the user data dir
fn default_token_db() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .context("Could not determine the user data directory (set CMS_TOKEN_DB instead)")?;
    Ok(base.join("cms-console").join("session.sqlite3"))
}

/// Expand tilde (~) in file paths to user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}
