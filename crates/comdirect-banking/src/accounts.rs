use chrono::NaiveDate;
use comdirect_core::Client;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    paging::paginate,
    request::{get, segment},
    AmountValue, BankingError, Page, PageRequest,
};

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountBalance {
    pub account: Account,
    pub account_id: String,
    pub balance: AmountValue,
    #[serde(rename = "balanceEUR")]
    pub balance_eur: AmountValue,
    pub available_cash_amount: AmountValue,
    #[serde(rename = "availableCashAmountEUR")]
    pub available_cash_amount_eur: AmountValue,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    pub account_id: String,
    pub account_display_id: String,
    pub currency: String,
    pub client_id: String,
    pub account_type: AccountType,
    pub iban: String,
    pub credit_limit: AmountValue,
}

/// Key and display text of the account type, e.g. `CA` / `Girokonto`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AccountType {
    pub key: String,
    pub text: String,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountTransaction {
    pub reference: String,
    pub booking_status: String,
    /// Missing for transactions that are not booked yet.
    #[serde(deserialize_with = "crate::de::optional_date")]
    pub booking_date: Option<NaiveDate>,
    pub amount: AmountValue,
    pub remitter: Option<Remitter>,
    pub deptor: Option<String>,
    pub creditor: Option<Creditor>,
    #[serde(deserialize_with = "crate::de::optional_date")]
    pub valuta_date: Option<NaiveDate>,
    pub direct_debit_creditor_id: Option<String>,
    pub direct_debit_mandate_id: Option<String>,
    pub end_to_end_reference: Option<String>,
    pub new_transaction: bool,
    pub remittance_info: String,
    pub transaction_type: TransactionType,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TransactionType {
    pub key: String,
    pub text: String,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Remitter {
    pub holder_name: String,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Creditor {
    pub holder_name: String,
    pub iban: String,
    pub bic: String,
}

/// Which transactions to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    #[allow(missing_docs)]
    Booked,
    #[allow(missing_docs)]
    NotBooked,
    #[allow(missing_docs)]
    Both,
}

impl BookingStatus {
    fn as_query(self) -> &'static str {
        match self {
            BookingStatus::Booked => "BOOKED",
            BookingStatus::NotBooked => "NOTBOOKED",
            BookingStatus::Both => "BOTH",
        }
    }
}

/// Parameters of [`AccountsClient::transactions`].
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    /// The window to fetch, or the first window and page size when `since` is set.
    pub paging: PageRequest,
    /// Only return transactions booked on or after this date, fetching as many pages as needed.
    pub since: Option<NaiveDate>,
    /// Server-side filter on the booking status. The server default is `Both`.
    pub booking_status: Option<BookingStatus>,
}

impl TransactionQuery {
    fn query(&self, paging: PageRequest) -> Vec<(&'static str, String)> {
        let mut query = paging.query();
        if let Some(status) = self.booking_status {
            query.push(("transactionState", status.as_query().to_owned()));
        }
        query
    }
}

#[allow(missing_docs)]
pub struct AccountsClient {
    pub(crate) client: Client,
}

impl AccountsClient {
    /// Balances of all accounts.
    pub async fn balances(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Page<AccountBalance>, BankingError> {
        get(
            &self.client,
            "/api/banking/clients/user/v2/accounts/balances",
            &[],
            cancel,
        )
        .await
    }

    /// Balance of a single account.
    pub async fn balance(
        &self,
        account_id: &str,
        cancel: &CancellationToken,
    ) -> Result<AccountBalance, BankingError> {
        get(
            &self.client,
            &format!("/api/banking/v2/accounts/{}/balances", segment(account_id)),
            &[],
            cancel,
        )
        .await
    }

    /// Transactions of an account.
    ///
    /// Without `query.since` a single window is fetched. With it, pages are fetched until one
    /// reaches past the cutoff, and transactions booked before the cutoff are dropped. Unbooked
    /// transactions without a booking date are kept.
    pub async fn transactions(
        &self,
        account_id: &str,
        query: &TransactionQuery,
        cancel: &CancellationToken,
    ) -> Result<Page<AccountTransaction>, BankingError> {
        let Some(since) = query.since else {
            return self.window(account_id, query, query.paging, cancel).await;
        };

        let mut page = paginate(
            query.paging,
            |paging| self.window(account_id, query, paging, cancel),
            |values| oldest_booking_date(values).is_some_and(|oldest| oldest < since),
        )
        .await?;

        let fetched = page.values.len();
        retain_since(&mut page.values, since);
        debug!(fetched, kept = page.values.len(), %since, "filtered transactions");

        Ok(page)
    }

    /// All transactions of an account, fetched `page_size` at a time.
    pub async fn all_transactions(
        &self,
        account_id: &str,
        page_size: u64,
        cancel: &CancellationToken,
    ) -> Result<Page<AccountTransaction>, BankingError> {
        let query = TransactionQuery {
            paging: PageRequest {
                first: 0,
                count: page_size,
            },
            ..Default::default()
        };

        paginate(
            query.paging,
            |paging| self.window(account_id, &query, paging, cancel),
            |_| false,
        )
        .await
    }

    async fn window(
        &self,
        account_id: &str,
        query: &TransactionQuery,
        paging: PageRequest,
        cancel: &CancellationToken,
    ) -> Result<Page<AccountTransaction>, BankingError> {
        get(
            &self.client,
            &format!("/api/banking/v1/accounts/{}/transactions", segment(account_id)),
            &query.query(paging),
            cancel,
        )
        .await
    }
}

fn oldest_booking_date(values: &[AccountTransaction]) -> Option<NaiveDate> {
    values.iter().filter_map(|t| t.booking_date).min()
}

fn retain_since(values: &mut Vec<AccountTransaction>, since: NaiveDate) {
    values.retain(|t| t.booking_date.is_none_or(|date| date >= since));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction(reference: &str, booking_date: Option<&str>) -> AccountTransaction {
        AccountTransaction {
            reference: reference.to_string(),
            booking_date: booking_date.map(|d| d.parse().unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn since_filter_keeps_cutoff_day_and_unbooked() {
        let mut values = vec![
            transaction("unbooked", None),
            transaction("new", Some("2024-03-02")),
            transaction("cutoff", Some("2024-03-01")),
            transaction("old", Some("2024-02-29")),
        ];

        retain_since(&mut values, "2024-03-01".parse().unwrap());

        let kept: Vec<_> = values.iter().map(|t| t.reference.as_str()).collect();
        assert_eq!(kept, vec!["unbooked", "new", "cutoff"]);
    }

    #[test]
    fn oldest_date_ignores_unbooked() {
        let values = vec![
            transaction("unbooked", None),
            transaction("a", Some("2024-03-02")),
            transaction("b", Some("2024-01-15")),
        ];

        assert_eq!(
            oldest_booking_date(&values),
            Some("2024-01-15".parse().unwrap())
        );
        assert_eq!(oldest_booking_date(&values[..1]), None);
    }

    #[test]
    fn decodes_transaction() {
        let transaction: AccountTransaction = serde_json::from_value(serde_json::json!({
            "reference": "3I2C21XS1ZXDAP4E/1",
            "bookingStatus": "BOOKED",
            "bookingDate": "2024-03-28",
            "amount": { "value": "-12.5", "unit": "EUR" },
            "remitter": null,
            "creditor": { "holderName": "Shop", "iban": "DE00", "bic": "ABC" },
            "valutaDate": "2024-03-28",
            "newTransaction": false,
            "remittanceInfo": "01Purchase",
            "transactionType": { "key": "DIRECT_DEBIT", "text": "Lastschrift" }
        }))
        .unwrap();

        assert_eq!(transaction.booking_date, Some("2024-03-28".parse().unwrap()));
        assert_eq!(transaction.amount.to_string(), "-12.5 EUR");
        assert_eq!(transaction.creditor.unwrap().holder_name, "Shop");
        assert!(transaction.remitter.is_none());
    }
}
