use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "mediagate")]
#[command(about = "Register, resolve and inspect gated media uploads")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the asset database (falls back to MEDIAGATE_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Public base URL of the uploads tree (falls back to MEDIAGATE_UPLOADS_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub uploads_url: Option<String>,

    /// Uploads directory on disk (falls back to MEDIAGATE_UPLOADS_DIR)
    #[arg(long, global = true, value_name = "PATH")]
    pub uploads_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage registered assets
    Assets {
        #[command(subcommand)]
        command: AssetCommands,
    },
    /// Resolve an uploads path to its asset record
    Resolve {
        /// Requested path (`/2024/05/photo-300x200.jpg`) or a file under the uploads dir
        path: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the response the gate would send for a file
    Inspect {
        /// Requested path or file path
        path: String,
        /// Simulated If-None-Match header
        #[arg(long, value_name = "ETAG")]
        if_none_match: Option<String>,
        /// Simulated If-Modified-Since header
        #[arg(long, value_name = "DATE")]
        if_modified_since: Option<String>,
        /// Cache-Control max-age in seconds
        #[arg(long, value_name = "SECS", default_value = "86400")]
        max_age: u64,
    },
    /// Print the web server rewrite rule that routes uploads through the gate
    RewriteRules {
        /// Target web server
        #[arg(long, value_enum, default_value_t = ServerKind::Apache)]
        server: ServerKind,
        /// Uploads prefix (falls back to MEDIAGATE_UPLOADS_PREFIX)
        #[arg(long, value_name = "PREFIX")]
        prefix: Option<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AssetCommands {
    /// Register an upload as a gated asset
    Add {
        /// Requested path or a file under the uploads dir
        path: String,
        /// MIME type to record (derived from the extension when omitted)
        #[arg(long, value_name = "TYPE")]
        mime: Option<String>,
    },
    /// List registered assets, newest first
    List {
        /// Number of assets to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove an asset registration
    #[command(alias = "rm")]
    Remove {
        /// Asset ID
        id: String,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ServerKind {
    Apache,
    Nginx,
}
