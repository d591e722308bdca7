use clap::Args;
use comdirect_banking::{BankingClientExt, Instrument};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::{
    auth::state::authenticated_client,
    command::CommandConfig,
    render::{CommandOutput, CommandResult, Tabular},
};

#[derive(Args, Clone)]
pub struct InstrumentArgs {
    #[arg(help = "WKN, ISIN or mnemonic")]
    pub instrument: String,
}

impl InstrumentArgs {
    pub async fn run(self, config: &CommandConfig, cancel: &CancellationToken) -> CommandResult {
        let client = authenticated_client(config, cancel).await?;
        let instruments = client
            .banking()
            .instruments()
            .lookup(&self.instrument, cancel)
            .await?;

        Ok(CommandOutput::table(Instruments(instruments)))
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct Instruments(Vec<Instrument>);

impl Tabular for Instruments {
    fn header(&self) -> Vec<&'static str> {
        vec!["WKN", "ISIN", "MNEMONIC", "NAME", "TYPE", "CURRENCY"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.0
            .iter()
            .map(|i| {
                vec![
                    i.wkn.clone(),
                    i.isin.clone(),
                    i.mnemonic.clone(),
                    i.name.clone(),
                    i.static_data.instrument_type.clone(),
                    i.static_data.currency.clone(),
                ]
            })
            .collect()
    }
}
