use comdirect_core::Client;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{request::get, Account, AmountValue, BankingError, Depot, Paging};

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Report {
    pub product_id: String,
    pub product_type: String,
    pub target_client_id: String,
    pub client_connection_type: String,
    pub balance: ReportBalance,
}

/// Balance of an account or a depot; only the fields of the respective product are set.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportBalance {
    pub account: Option<Account>,
    pub account_id: String,
    pub balance: AmountValue,
    #[serde(rename = "balanceEUR")]
    pub balance_eur: AmountValue,
    pub available_cash_amount: AmountValue,
    #[serde(rename = "availableCashAmountEUR")]
    pub available_cash_amount_eur: AmountValue,
    pub depot: Option<Depot>,
    pub depot_id: String,
    pub date_last_update: String,
    pub prev_day_value: AmountValue,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportAggregated {
    #[serde(rename = "balanceEUR")]
    pub balance_eur: AmountValue,
    #[serde(rename = "availableCashAmountEUR")]
    pub available_cash_amount_eur: AmountValue,
}

/// Balances of all products with their totals in EUR.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Reports {
    pub paging: Paging,
    #[serde(alias = "Aggregated")]
    pub aggregated: ReportAggregated,
    pub values: Vec<Report>,
}

#[allow(missing_docs)]
pub struct ReportsClient {
    pub(crate) client: Client,
}

impl ReportsClient {
    /// Balances of all accounts and depots of the customer.
    pub async fn reports(&self, cancel: &CancellationToken) -> Result<Reports, BankingError> {
        get(
            &self.client,
            "/api/reports/participants/user/v1/allbalances",
            &[],
            cancel,
        )
        .await
    }
}
