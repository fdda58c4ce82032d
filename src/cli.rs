use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::editing::AccessPolicy;

#[derive(Parser)]
#[command(name = "clipgate", about = "Policy-scoped clipboard access for editing frames")]
pub struct Cli {
    /// Platform clipboard backend
    #[arg(long, value_enum, default_value_t = Backend::X11)]
    pub backend: Backend,

    /// Path to the xclip binary used by the x11 backend
    #[arg(long, env = "CLIPGATE_XCLIP", default_value = "xclip")]
    pub xclip: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Backend {
    /// System CLIPBOARD selection via xclip
    X11,
    /// In-process clipboard (headless)
    Memory,
}

#[derive(Subcommand)]
pub enum Command {
    /// Report whether a paste is currently possible
    CanPaste {
        /// Evaluate as if the caret were outside editable content
        #[arg(long)]
        not_editable: bool,
    },

    /// List the types advertised by the system clipboard
    Types,

    /// Print the clipboard payload for a type
    Read {
        /// Type identifier, e.g. text/plain or UTF8_STRING
        #[arg(value_name = "TYPE")]
        ty: String,
    },

    /// Copy stdin onto the clipboard under a type
    Write {
        /// Type identifier, e.g. text/plain
        #[arg(value_name = "TYPE")]
        ty: String,

        /// Access policy of the clipboard reference
        #[arg(long, value_enum, default_value_t = AccessPolicy::ReadWrite)]
        policy: AccessPolicy,
    },

    /// Remove one type, or everything, from the clipboard
    Clear {
        /// Type identifier; clears every type when omitted
        #[arg(value_name = "TYPE")]
        ty: Option<String>,

        /// Access policy of the clipboard reference
        #[arg(long, value_enum, default_value_t = AccessPolicy::ReadWrite)]
        policy: AccessPolicy,
    },

    /// Follow paste availability until interrupted
    Watch {
        /// Re-evaluation interval in milliseconds
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,

        /// Evaluate as if the caret were outside editable content
        #[arg(long)]
        not_editable: bool,
    },
}
