//! VoiceLoop CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_loop::cli::{
    app::{load_merged_config, run_chat, ChatOptions, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use voice_loop::domain::capture::Duration;
use voice_loop::domain::config::AppConfig;
use voice_loop::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        server_url: cli.server,
        session_id: cli.session,
        max_duration: cli.max_duration,
        notify: if cli.notify { Some(true) } else { None },
        playback: if cli.no_playback { Some(false) } else { None },
        cues: if cli.no_cues { Some(false) } else { None },
    };

    // Merge config
    let config = load_merged_config(cli_config).await;

    // Parse max duration
    let max_duration = match config.max_duration.as_ref() {
        Some(s) => match s.parse::<Duration>() {
            Ok(d) => d,
            Err(e) => {
                presenter.error(&format!("Invalid max-duration: {}", e));
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        },
        None => Duration::default_max_capture(),
    };

    let options = ChatOptions {
        server_url: config.server_url_or_default(),
        session_id: config.session_id_or_default(),
        max_duration,
        notify: config.notify_or_default(),
        playback: config.playback_or_default(),
        cues: config.cues_or_default(),
    };

    run_chat(options).await
}
