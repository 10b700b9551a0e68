//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// VoiceLoop - push-to-talk voice chat with an AI agent
#[derive(Parser, Debug)]
#[command(name = "voice-loop")]
#[command(version = "1.0.0")]
#[command(about = "Push-to-talk terminal voice chat for conversational AI agents")]
#[command(long_about = None)]
pub struct Cli {
    /// Agent backend base URL
    #[arg(short = 's', long, value_name = "URL", env = "VOICE_LOOP_SERVER")]
    pub server: Option<String>,

    /// Conversation session identifier
    #[arg(short = 'S', long, value_name = "ID", env = "VOICE_LOOP_SESSION")]
    pub session: Option<String>,

    /// Max capture duration before auto-stop (e.g., 30s, 1m, 2m30s)
    #[arg(long, value_name = "TIME")]
    pub max_duration: Option<String>,

    /// Show desktop notifications
    #[arg(short = 'n', long)]
    pub notify: bool,

    /// Do not play the synthesized reply audio
    #[arg(long)]
    pub no_playback: bool,

    /// Do not play capture start/stop cues
    #[arg(long)]
    pub no_cues: bool,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "server_url",
    "session_id",
    "max_duration",
    "notify",
    "playback",
    "cues",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
