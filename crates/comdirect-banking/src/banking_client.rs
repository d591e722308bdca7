use comdirect_core::Client;

use crate::{AccountsClient, DepotsClient, DocumentsClient, InstrumentsClient, ReportsClient};

#[allow(missing_docs)]
#[derive(Clone)]
pub struct BankingClient {
    pub(crate) client: Client,
}

impl BankingClient {
    fn new(client: Client) -> Self {
        Self { client }
    }

    /// Checking and savings accounts.
    pub fn accounts(&self) -> AccountsClient {
        AccountsClient {
            client: self.client.clone(),
        }
    }

    /// Securities depots.
    pub fn depots(&self) -> DepotsClient {
        DepotsClient {
            client: self.client.clone(),
        }
    }

    /// Postbox documents.
    pub fn documents(&self) -> DocumentsClient {
        DocumentsClient {
            client: self.client.clone(),
        }
    }

    /// Instrument lookup by WKN, ISIN or mnemonic.
    pub fn instruments(&self) -> InstrumentsClient {
        InstrumentsClient {
            client: self.client.clone(),
        }
    }

    /// Aggregated balances over all accounts and depots.
    pub fn reports(&self) -> ReportsClient {
        ReportsClient {
            client: self.client.clone(),
        }
    }
}

#[allow(missing_docs)]
pub trait BankingClientExt {
    fn banking(&self) -> BankingClient;
}

impl BankingClientExt for Client {
    fn banking(&self) -> BankingClient {
        BankingClient::new(self.clone())
    }
}
