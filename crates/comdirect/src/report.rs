use comdirect_banking::{BankingClientExt, Report, Reports};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::{
    auth::state::authenticated_client,
    command::CommandConfig,
    render::{CommandOutput, CommandResult, Tabular},
};

pub(crate) async fn run(config: &CommandConfig, cancel: &CancellationToken) -> CommandResult {
    let client = authenticated_client(config, cancel).await?;
    let reports = client.banking().reports().reports(cancel).await?;

    Ok(CommandOutput::table(ReportTable(reports)))
}

#[derive(Serialize)]
#[serde(transparent)]
struct ReportTable(Reports);

impl Tabular for ReportTable {
    fn header(&self) -> Vec<&'static str> {
        vec!["ID", "TYPE", "BALANCE"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.0
            .values
            .iter()
            .map(|r| vec![r.product_id.clone(), r.product_type.clone(), balance(r)])
            .collect()
    }

    fn caption(&self) -> Option<String> {
        Some(format!("TOTAL {}", self.0.aggregated.balance_eur))
    }
}

/// Depots have no cash balance, their previous day value is shown instead.
fn balance(report: &Report) -> String {
    let balance = &report.balance;
    if balance.balance.value.is_empty() {
        balance.prev_day_value.to_string()
    } else {
        balance.balance.to_string()
    }
}
