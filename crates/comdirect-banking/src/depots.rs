use comdirect_core::Client;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{
    request::{get, segment},
    AmountValue, BankingError, Instrument, Page, PageRequest, Paging,
};

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Depot {
    pub depot_id: String,
    pub depot_display_id: String,
    pub client_id: String,
    pub default_settlement_account_id: String,
    pub settlement_account_ids: Vec<String>,
    pub holder_name: String,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DepotPosition {
    pub depot_id: String,
    pub position_id: String,
    pub wkn: String,
    pub custody_type: String,
    pub quantity: AmountValue,
    pub available_quantity: AmountValue,
    pub current_price: Price,
    pub prev_day_price: Price,
    pub current_value: AmountValue,
    pub purchase_value: AmountValue,
    pub profit_loss_purchase_abs: AmountValue,
    pub profit_loss_purchase_rel: String,
    pub profit_loss_prev_day_abs: AmountValue,
    pub profit_loss_prev_day_rel: String,
    pub available_quantity_to_hedge: AmountValue,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Price {
    pub price: AmountValue,
    pub price_date_time: String,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DepotTransaction {
    pub transaction_id: String,
    pub instrument: Instrument,
    pub execution_price: AmountValue,
    pub transaction_value: AmountValue,
    pub transaction_direction: String,
    pub transaction_type: String,
    pub fx_rate: String,
}

/// Totals over all positions of a depot.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DepotAggregated {
    pub depot: Depot,
    pub prev_day_value: AmountValue,
    pub current_value: AmountValue,
    pub purchase_value: AmountValue,
    #[serde(alias = "ProfitLossPurchaseAbs")]
    pub profit_loss_purchase_abs: AmountValue,
    pub profit_loss_purchase_rel: String,
    pub profit_loss_prev_day_abs: AmountValue,
    pub profit_loss_prev_day_rel: String,
}

/// Positions of a depot together with their totals.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DepotPositions {
    pub paging: Paging,
    pub aggregated: DepotAggregated,
    pub values: Vec<DepotPosition>,
}

#[allow(missing_docs)]
pub struct DepotsClient {
    pub(crate) client: Client,
}

impl DepotsClient {
    /// All depots of the customer.
    pub async fn depots(&self, cancel: &CancellationToken) -> Result<Page<Depot>, BankingError> {
        get(
            &self.client,
            "/api/brokerage/clients/user/v3/depots",
            &[],
            cancel,
        )
        .await
    }

    /// Positions of a depot.
    pub async fn positions(
        &self,
        depot_id: &str,
        paging: PageRequest,
        cancel: &CancellationToken,
    ) -> Result<DepotPositions, BankingError> {
        get(
            &self.client,
            &format!("/api/brokerage/v3/depots/{}/positions", segment(depot_id)),
            &paging.query(),
            cancel,
        )
        .await
    }

    /// A single position of a depot.
    pub async fn position(
        &self,
        depot_id: &str,
        position_id: &str,
        cancel: &CancellationToken,
    ) -> Result<DepotPosition, BankingError> {
        get(
            &self.client,
            &format!(
                "/api/brokerage/v3/depots/{}/positions/{}",
                segment(depot_id),
                segment(position_id)
            ),
            &[],
            cancel,
        )
        .await
    }

    /// Executed transactions of a depot.
    pub async fn transactions(
        &self,
        depot_id: &str,
        paging: PageRequest,
        cancel: &CancellationToken,
    ) -> Result<Page<DepotTransaction>, BankingError> {
        get(
            &self.client,
            &format!("/api/brokerage/v3/depots/{}/transactions", segment(depot_id)),
            &paging.query(),
            cancel,
        )
        .await
    }
}
