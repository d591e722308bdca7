use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use comdirect_banking::{
    AccountBalance, AccountTransaction, BankingClientExt, BookingStatus, Page, TransactionQuery,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::{
    auth::state::authenticated_client,
    command::CommandConfig,
    render::{CommandOutput, CommandResult, Tabular},
};

#[derive(Args, Clone)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: Option<AccountCommands>,
}

#[derive(Subcommand, Clone)]
pub enum AccountCommands {
    #[command(long_about = "Show the balance of one or all accounts.")]
    Balance { account_id: Option<String> },

    #[command(long_about = "List the transactions of an account.")]
    Transaction {
        account_id: String,

        #[arg(long, help = "Only transactions booked on or after this date (YYYY-MM-DD)")]
        since: Option<NaiveDate>,

        #[arg(long, conflicts_with = "since", help = "Fetch every page")]
        all: bool,

        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Booked,
    NotBooked,
    Both,
}

impl From<StatusArg> for BookingStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Booked => BookingStatus::Booked,
            StatusArg::NotBooked => BookingStatus::NotBooked,
            StatusArg::Both => BookingStatus::Both,
        }
    }
}

impl AccountArgs {
    pub async fn run(self, config: &CommandConfig, cancel: &CancellationToken) -> CommandResult {
        let client = authenticated_client(config, cancel).await?;
        let accounts = client.banking().accounts();

        match self.command {
            // Without a subcommand the accounts are listed
            None => {
                let page = accounts.balances(cancel).await?;
                Ok(CommandOutput::table(AccountList(page.values)))
            }
            Some(AccountCommands::Balance { account_id: None }) => {
                let page = accounts.balances(cancel).await?;
                Ok(CommandOutput::table(Balances(page.values)))
            }
            Some(AccountCommands::Balance {
                account_id: Some(account_id),
            }) => {
                let balance = accounts.balance(&account_id, cancel).await?;
                Ok(CommandOutput::table(Balances(vec![balance])))
            }
            Some(AccountCommands::Transaction {
                account_id,
                since,
                all,
                status,
            }) => {
                let page = if all {
                    accounts
                        .all_transactions(&account_id, config.paging.count, cancel)
                        .await?
                } else {
                    let query = TransactionQuery {
                        paging: config.paging,
                        since,
                        booking_status: status.map(Into::into),
                    };
                    accounts.transactions(&account_id, &query, cancel).await?
                };
                Ok(CommandOutput::table(Transactions(page)))
            }
        }
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct AccountList(Vec<AccountBalance>);

impl Tabular for AccountList {
    fn header(&self) -> Vec<&'static str> {
        vec!["ID", "TYPE", "IBAN", "CREDIT LIMIT"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.0
            .iter()
            .map(|a| {
                vec![
                    a.account_id.clone(),
                    a.account.account_type.text.clone(),
                    a.account.iban.clone(),
                    a.account.credit_limit.value.clone(),
                ]
            })
            .collect()
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct Balances(Vec<AccountBalance>);

impl Tabular for Balances {
    fn header(&self) -> Vec<&'static str> {
        vec!["ID", "TYPE", "IBAN", "BALANCE"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.0
            .iter()
            .map(|a| {
                vec![
                    a.account_id.clone(),
                    a.account.account_type.text.clone(),
                    a.account.iban.clone(),
                    a.balance.to_string(),
                ]
            })
            .collect()
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct Transactions(Page<AccountTransaction>);

impl Tabular for Transactions {
    fn header(&self) -> Vec<&'static str> {
        vec!["REMITTER", "CREDITOR", "BOOKING DATE", "STATUS", "TYPE", "AMOUNT"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.0.values.iter().map(transaction_row).collect()
    }

    fn caption(&self) -> Option<String> {
        Some(format!(
            "{} out of {}",
            self.0.values.len(),
            self.0.paging.matches
        ))
    }
}

fn transaction_row(t: &AccountTransaction) -> Vec<String> {
    vec![
        t.remitter
            .as_ref()
            .map(|r| r.holder_name.clone())
            .unwrap_or_default(),
        t.creditor
            .as_ref()
            .map(|c| c.holder_name.clone())
            .unwrap_or_default(),
        t.booking_date.map(|d| d.to_string()).unwrap_or_default(),
        t.booking_status.clone(),
        t.transaction_type.text.clone(),
        t.amount.to_string(),
    ]
}
