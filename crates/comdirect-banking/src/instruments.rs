use comdirect_core::Client;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{
    request::{get, segment},
    BankingError, Page,
};

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Instrument {
    pub instrument_id: String,
    pub wkn: String,
    pub isin: String,
    pub mnemonic: String,
    pub name: String,
    pub short_name: String,
    pub static_data: StaticData,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticData {
    pub notation: String,
    pub currency: String,
    pub instrument_type: String,
    pub priips_relevant: bool,
    pub kid_available: bool,
    pub shipping_waiver_required: bool,
    pub fund_redemption_limited: bool,
}

#[allow(missing_docs)]
pub struct InstrumentsClient {
    pub(crate) client: Client,
}

impl InstrumentsClient {
    /// Look up instruments by WKN, ISIN or mnemonic.
    pub async fn lookup(
        &self,
        instrument: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Instrument>, BankingError> {
        let page: Page<Instrument> = get(
            &self.client,
            &format!("/api/brokerage/v1/instruments/{}", segment(instrument)),
            &[],
            cancel,
        )
        .await?;

        Ok(page.values)
    }
}
