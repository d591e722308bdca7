use std::time::Duration;

use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::{command::CommandConfig, render::CommandResult};

mod login;

pub(crate) mod logout;
pub(crate) mod state;

#[derive(Args, Clone)]
pub struct LoginArgs {
    #[arg(short = 'u', long, env = "COMDIRECT_USERNAME", help = "Username (Zugangsnummer)")]
    pub username: Option<String>,

    #[arg(
        short = 'p',
        long,
        env = "COMDIRECT_PASSWORD",
        hide_env_values = true,
        help = "Password (PIN)"
    )]
    pub password: Option<String>,

    #[arg(short = 'i', long, env = "COMDIRECT_CLIENT_ID", help = "API client id")]
    pub client_id: Option<String>,

    #[arg(
        short = 's',
        long,
        env = "COMDIRECT_CLIENT_SECRET",
        hide_env_values = true,
        help = "API client secret"
    )]
    pub client_secret: Option<String>,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Wait a fixed time for the TAN confirmation instead of polling its status, capped by --timeout"
    )]
    pub wait: Option<u64>,
}

impl LoginArgs {
    pub async fn run(self, config: &CommandConfig, cancel: &CancellationToken) -> CommandResult {
        let confirmation = config.confirmation(self.wait.map(Duration::from_secs));

        let credentials = login::Credentials {
            username: self.username,
            password: self.password,
            client_id: self.client_id,
            client_secret: self.client_secret,
        };
        login::login(config, credentials, confirmation, cancel).await?;

        Ok("Successfully logged in!".into())
    }
}
