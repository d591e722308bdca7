use clap::{Args, Subcommand};
use comdirect_banking::{BankingClientExt, Depot, DepotPosition, DepotTransaction, Page};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::{
    auth::state::authenticated_client,
    command::CommandConfig,
    render::{CommandOutput, CommandResult, Tabular},
};

#[derive(Args, Clone)]
pub struct DepotArgs {
    #[command(subcommand)]
    pub command: Option<DepotCommands>,
}

#[derive(Subcommand, Clone)]
pub enum DepotCommands {
    #[command(long_about = "List the positions of a depot, or show a single one.")]
    Position {
        depot_id: String,
        position_id: Option<String>,
    },

    #[command(long_about = "List the executed transactions of a depot.")]
    Transaction { depot_id: String },
}

impl DepotArgs {
    pub async fn run(self, config: &CommandConfig, cancel: &CancellationToken) -> CommandResult {
        let client = authenticated_client(config, cancel).await?;
        let depots = client.banking().depots();

        match self.command {
            None => {
                let page = depots.depots(cancel).await?;
                Ok(CommandOutput::table(Depots(page.values)))
            }
            Some(DepotCommands::Position {
                depot_id,
                position_id: None,
            }) => {
                let positions = depots.positions(&depot_id, config.paging, cancel).await?;
                Ok(CommandOutput::table(Positions(positions.values)))
            }
            Some(DepotCommands::Position {
                depot_id,
                position_id: Some(position_id),
            }) => {
                let position = depots.position(&depot_id, &position_id, cancel).await?;
                Ok(CommandOutput::table(Positions(vec![position])))
            }
            Some(DepotCommands::Transaction { depot_id }) => {
                let page = depots.transactions(&depot_id, config.paging, cancel).await?;
                Ok(CommandOutput::table(Transactions(page)))
            }
        }
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct Depots(Vec<Depot>);

impl Tabular for Depots {
    fn header(&self) -> Vec<&'static str> {
        vec!["DEPOT ID", "DISPLAY ID", "HOLDER NAME", "CLIENT ID"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.0
            .iter()
            .map(|d| {
                vec![
                    d.depot_id.clone(),
                    d.depot_display_id.clone(),
                    d.holder_name.clone(),
                    d.client_id.clone(),
                ]
            })
            .collect()
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct Positions(Vec<DepotPosition>);

impl Tabular for Positions {
    fn header(&self) -> Vec<&'static str> {
        vec![
            "POSITION ID",
            "WKN",
            "QUANTITY",
            "CURRENT PRICE",
            "PREVDAY %",
            "PURCHASE %",
            "PURCHASE",
            "CURRENT",
        ]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.0
            .iter()
            .map(|p| {
                vec![
                    p.position_id.clone(),
                    p.wkn.clone(),
                    p.quantity.value.clone(),
                    p.current_price.price.to_string(),
                    p.profit_loss_prev_day_rel.clone(),
                    p.profit_loss_purchase_rel.clone(),
                    p.purchase_value.to_string(),
                    p.current_value.to_string(),
                ]
            })
            .collect()
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct Transactions(Page<DepotTransaction>);

impl Tabular for Transactions {
    fn header(&self) -> Vec<&'static str> {
        vec!["ID", "WKN", "NAME", "DIRECTION", "PRICE", "VALUE"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.0
            .values
            .iter()
            .map(|t| {
                vec![
                    t.transaction_id.clone(),
                    t.instrument.wkn.clone(),
                    t.instrument.name.clone(),
                    t.transaction_direction.clone(),
                    t.execution_price.to_string(),
                    t.transaction_value.to_string(),
                ]
            })
            .collect()
    }

    fn caption(&self) -> Option<String> {
        Some(format!(
            "{} out of {}",
            self.0.values.len(),
            self.0.paging.matches
        ))
    }
}
