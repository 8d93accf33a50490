//! CLI argument definitions for sspm.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sspm - Simple scientific project manager.
///
/// Start with `sspm init --location <dir>`, then `sspm project create`.
#[derive(Parser, Debug)]
#[command(name = "sspm")]
#[command(author, version, about = "Manage dated scientific project folders and their metadata", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version and build information
    Version,

    /// Configure where projects are stored
    Init {
        /// Root folder of the projects tree (created if missing)
        #[arg(long)]
        location: PathBuf,

        /// Root folder of the mirror data tree
        #[arg(long)]
        external_data: Option<PathBuf>,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Project management commands
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Project statistics
    Stats {
        #[command(subcommand)]
        command: StatsCommands,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the configuration file and every value
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key (e.g., projects.location)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// List the valid configuration keys
    Keys,

    /// Back up the configuration file and restore the defaults
    Reset,
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a new project
    Create {
        /// Project title
        #[arg(long)]
        title: String,

        /// Owner name
        #[arg(long)]
        user_name: String,

        /// Owner e-mail
        #[arg(long)]
        user_email: String,

        /// Owner group
        #[arg(long)]
        user_group: String,

        /// Short description (also written to metadata/description.md)
        #[arg(long, default_value = "")]
        short_descr: String,

        /// External git repositories added as submodules: "name|url;name|url"
        #[arg(long, default_value = "")]
        extern_git_repos: String,

        /// Start date as dd/mm/yyyy (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List projects
    List {
        /// Only projects whose folder name contains this (e.g., P_0007)
        id: Option<String>,
    },

    /// Get a metadata value of a project
    Get {
        /// Project ID (e.g., P_0007 or 7)
        id: String,

        /// Metadata key
        #[arg(default_value = "project.title")]
        key: String,
    },

    /// Set a metadata value of a project
    Set {
        /// Project ID (e.g., P_0007 or 7)
        id: String,
        /// Metadata key (e.g., user.collaborators)
        key: String,
        /// New value
        value: String,
    },

    /// List the valid metadata keys
    Keys,

    /// Close a project: set its end date and a final status
    Close {
        /// Project ID (e.g., P_0007 or 7)
        id: String,

        /// End date source: "now" (today) or "latest" (newest file in the project)
        #[arg(default_value = "now")]
        mode: String,

        /// Final status (default: completed)
        #[arg(long)]
        status: Option<String>,
    },

    /// Open a project folder in the file explorer
    Open {
        /// Project ID; the projects root when omitted
        id: Option<String>,

        /// Open the mirror data folder instead
        #[arg(long)]
        external: bool,

        /// Only print the folder that would be opened
        #[arg(long)]
        dry_run: bool,
    },
}

/// Statistics subcommands
#[derive(Subcommand, Debug)]
pub enum StatsCommands {
    /// Project counts per year and group
    Show,
}
