//! Session-scoped data operations of the comdirect REST API.
//!
//! Every operation requires a [`Client`](comdirect_core::Client) holding a valid credential and
//! fails with [`BankingError::NotAuthenticated`] before any request is sent otherwise.

mod accounts;
mod banking_client;
mod de;
mod depots;
mod documents;
mod download;
mod error;
mod instruments;
mod paging;
mod reports;
mod request;

pub use accounts::{
    Account, AccountBalance, AccountTransaction, AccountType, AccountsClient, BookingStatus,
    Creditor, Remitter, TransactionQuery, TransactionType,
};
pub use banking_client::{BankingClient, BankingClientExt};
pub use depots::{
    Depot, DepotAggregated, DepotPosition, DepotPositions, DepotTransaction, DepotsClient, Price,
};
pub use documents::{Document, DocumentMetaData, DocumentsClient};
pub use download::{DownloadReport, DownloadThrottle};
pub use error::BankingError;
pub use instruments::{Instrument, InstrumentsClient, StaticData};
pub use paging::{AmountValue, Page, PageRequest, Paging};
pub use reports::{Report, ReportAggregated, ReportBalance, Reports, ReportsClient};
