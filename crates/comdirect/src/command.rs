use std::time::Duration;

use clap::{Parser, Subcommand};
use comdirect_banking::PageRequest;
use comdirect_cli::Color;
use comdirect_core::{auth::ChallengeConfirmation, ClientSettings};

use crate::{
    account::AccountArgs, auth::LoginArgs, depot::DepotArgs, document::DocumentArgs,
    instrument::InstrumentArgs, render::Output,
};

pub const API_URL_ENV: &str = "COMDIRECT_API_URL";

#[derive(Parser, Clone)]
#[command(name = "comdirect", version, about = "Command line client for the comdirect REST API", long_about = None)]
pub struct Cli {
    // Optional so that running without arguments prints the help
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short = 'f', long, global = true, value_enum, default_value_t = Output::Markdown)]
    pub format: Output,

    #[arg(short = 'c', long, global = true, value_enum, default_value_t = Color::Auto)]
    pub color: Color,

    #[arg(long, global = true, default_value_t = 0, help = "Index of the first entry")]
    pub index: u64,

    #[arg(long, global = true, default_value_t = 20, help = "Number of entries per page")]
    pub count: u64,

    #[arg(
        short = 't',
        long,
        global = true,
        default_value_t = 30,
        help = "Timeout in seconds to confirm the session TAN"
    )]
    pub timeout: u64,

    #[arg(
        long,
        global = true,
        default_value_t = 30,
        help = "Timeout in seconds for a single HTTP request"
    )]
    pub http_timeout: u64,

    #[arg(long, global = true, env = API_URL_ENV, hide = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    #[command(long_about = "Log in and store the session in ~/.comdirect.")]
    Login(LoginArgs),

    #[command(long_about = "Revoke the token and delete the stored session.")]
    Logout,

    #[command(long_about = "List account balances and transactions.")]
    Account(AccountArgs),

    #[command(long_about = "List depots, positions and depot transactions.")]
    Depot(DepotArgs),

    #[command(long_about = "List and download postbox documents.")]
    Document(DocumentArgs),

    #[command(long_about = "Look up an instrument by WKN, ISIN or mnemonic.")]
    Instrument(InstrumentArgs),

    #[command(long_about = "Show the balances of all accounts and depots.")]
    Report,

    #[command(long_about = "Generate shell completion files.")]
    Completion {
        #[arg(value_enum)]
        shell: Option<clap_complete::Shell>,
    },
}

/// Global flags, resolved once and handed to every command.
#[derive(Debug, Clone)]
pub struct CommandConfig {
    pub paging: PageRequest,
    /// Deadline for the TAN confirmation during login.
    pub tan_timeout: Duration,
    pub http_timeout_secs: u64,
    pub api_url: Option<String>,
}

impl CommandConfig {
    pub fn new(cli: &Cli) -> Self {
        Self {
            paging: PageRequest {
                first: cli.index,
                count: cli.count,
            },
            tan_timeout: Duration::from_secs(cli.timeout),
            http_timeout_secs: cli.http_timeout,
            api_url: cli.api_url.clone(),
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        let defaults = ClientSettings::default();
        ClientSettings {
            api_url: self.api_url.clone().unwrap_or(defaults.api_url),
            timeout_secs: self.http_timeout_secs,
            ..defaults
        }
    }

    /// How login waits for the TAN confirmation: polling its status, or a fixed `wait`. Both are
    /// bounded by the TAN timeout.
    pub fn confirmation(&self, wait: Option<Duration>) -> ChallengeConfirmation {
        match wait {
            Some(wait) => ChallengeConfirmation::FixedDelay {
                wait: wait.min(self.tan_timeout),
            },
            None => match ChallengeConfirmation::default() {
                ChallengeConfirmation::Poll {
                    interval, fallback, ..
                } => ChallengeConfirmation::Poll {
                    interval,
                    timeout: self.tan_timeout,
                    fallback: fallback.min(self.tan_timeout),
                },
                fixed => fixed,
            },
        }
    }
}
