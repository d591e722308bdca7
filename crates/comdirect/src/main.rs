//! Command line client for the comdirect REST API.

use clap::{CommandFactory, Parser};
use color_eyre::eyre::Result;
use comdirect_cli::install_color_eyre;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::{
    prelude::__tracing_subscriber_SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter,
};

use crate::{command::*, render::CommandResult};

mod account;
mod auth;
mod command;
mod depot;
mod document;
mod instrument;
mod render;
mod report;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // the log level hierarchy is determined by:
    //    - if RUST_LOG is detected at runtime
    //    - if RUST_LOG is provided at compile time
    //    - default to INFO
    let filter = EnvFilter::builder()
        .with_default_directive(
            option_env!("RUST_LOG")
                .unwrap_or("info")
                .parse()
                .expect("should provide valid log level at compile time."),
        )
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    install_color_eyre(cli.color)?;
    let render_config = render::RenderConfig::new(&cli);

    let Some(command) = cli.command.clone() else {
        let mut cmd = Cli::command();
        cmd.print_help()?;
        return Ok(());
    };

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, cancelling");
                cancel.cancel();
            }
        }
    });

    let result = process_commands(command, CommandConfig::new(&cli), &cancel).await;

    render_config.render_result(result)
}

async fn process_commands(
    command: Commands,
    config: CommandConfig,
    cancel: &CancellationToken,
) -> CommandResult {
    match command {
        Commands::Login(args) => args.run(&config, cancel).await,
        Commands::Logout => auth::logout::run(&config, cancel).await,

        Commands::Account(args) => args.run(&config, cancel).await,
        Commands::Depot(args) => args.run(&config, cancel).await,
        Commands::Document(args) => args.run(&config, cancel).await,
        Commands::Instrument(args) => args.run(&config, cancel).await,
        Commands::Report => report::run(&config, cancel).await,

        Commands::Completion { shell } => {
            let Some(shell) = shell.or_else(clap_complete::Shell::from_env) else {
                return Ok("Couldn't autodetect a valid shell. Run `comdirect completion --help` for more info.".into());
            };

            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(().into())
        }
    }
}
