use clap::{Parser, Subcommand, ValueEnum};

/// Plainly native host.
#[derive(Parser)]
#[command(name = "plainly")]
#[command(about = "Simplify and read aloud text selected in the browser")]
#[command(version)]
pub(crate) struct Cli {
    /// Profile to load from the config directory
    #[arg(short, long, default_value = "main", global = true)]
    pub profile: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Parent window handle passed by Chrome on Windows
    #[arg(long, hide = true)]
    pub parent_window: Option<i64>,

    /// Caller origin or manifest path passed by the browser
    #[arg(hide = true)]
    pub launcher_args: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Serve the page (default)
    Run {
        /// Talk to a websocket page bridge instead of stdin/stdout
        #[arg(long)]
        ws: Option<String>,
    },

    /// Show or change the feature flags
    Flags {
        /// Turn simplification on or off
        #[arg(long)]
        simplify: Option<Toggle>,

        /// Turn read-aloud on or off
        #[arg(long)]
        tts: Option<Toggle>,
    },

    /// Simplify one piece of text and print the result
    Simplify {
        /// Text to simplify
        text: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        matches!(self, Toggle::On)
    }
}
