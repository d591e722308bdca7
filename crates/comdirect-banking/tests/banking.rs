//! Data operations against a mocked comdirect API.

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use comdirect_banking::{
    BankingClientExt, BankingError, Document, DownloadThrottle, PageRequest, TransactionQuery,
};
use comdirect_core::{
    auth::{AccessToken, Credential},
    Client, ClientSettings,
};
use comdirect_test::start_api_mock;
use tokio_util::sync::CancellationToken;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

const ACCOUNT_ID: &str = "ACC1";
const TRANSACTIONS_PATH: &str = "/api/banking/v1/accounts/ACC1/transactions";

fn credential(issued_ago: TimeDelta) -> Credential {
    Credential::new(
        AccessToken {
            access_token: "broad-token".to_string(),
            expires_in: 599,
            ..Default::default()
        },
        "0123456789abcdef0123456789abcdef".to_string(),
        Utc::now() - issued_ago,
    )
}

async fn setup(mocks: Vec<Mock>) -> (MockServer, Client) {
    let (server, config) = start_api_mock(mocks).await;

    let client = Client::with_credential(
        Some(ClientSettings {
            api_url: config.base_path,
            user_agent: config.user_agent.unwrap(),
            timeout_secs: 5,
        }),
        credential(TimeDelta::zero()),
        None,
    );

    (server, client)
}

fn transactions(first: u64, dates: &[&str], matches: u64) -> ResponseTemplate {
    let values: Vec<_> = dates
        .iter()
        .enumerate()
        .map(|(i, date)| {
            serde_json::json!({
                "reference": format!("REF{}", first + i as u64),
                "bookingStatus": if date.is_empty() { "NOTBOOKED" } else { "BOOKED" },
                "bookingDate": if date.is_empty() { serde_json::Value::Null } else { (*date).into() },
                "amount": { "value": "1.00", "unit": "EUR" }
            })
        })
        .collect();

    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "paging": { "index": first, "matches": matches },
        "values": values
    }))
}

fn transaction_page(first: u64, len: usize, matches: u64) -> Mock {
    let dates = vec!["2024-03-01"; len];
    Mock::given(matchers::method("GET"))
        .and(matchers::path(TRANSACTIONS_PATH))
        .and(matchers::query_param("paging-first", first.to_string()))
        .and(matchers::query_param("paging-count", "20"))
        .respond_with(transactions(first, &dates, matches))
        .expect(1)
}

#[tokio::test]
async fn test_balances_sends_identity_and_token() {
    let (server, client) = setup(vec![Mock::given(matchers::method("GET"))
        .and(matchers::path("/api/banking/clients/user/v2/accounts/balances"))
        .and(matchers::bearer_token("broad-token"))
        .and(matchers::header("accept", "application/json"))
        .and(matchers::header_exists("x-http-request-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "paging": { "index": 0, "matches": 1 },
            "values": [{
                "accountId": "ACC1",
                "account": {
                    "accountId": "ACC1",
                    "accountDisplayId": "1234567890",
                    "currency": "EUR",
                    "accountType": { "key": "CA", "text": "Girokonto" },
                    "iban": "DE00123456789012345678"
                },
                "balance": { "value": "100.50", "unit": "EUR" },
                "balanceEUR": { "value": "100.50", "unit": "EUR" },
                "availableCashAmount": { "value": "600.50", "unit": "EUR" },
                "availableCashAmountEUR": { "value": "600.50", "unit": "EUR" }
            }]
        })))
        .expect(1)])
    .await;

    let balances = client
        .banking()
        .accounts()
        .balances(&CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(balances.paging.matches, 1);
    assert_eq!(balances.values[0].account.account_type.text, "Girokonto");
    assert_eq!(balances.values[0].balance.to_string(), "100.50 EUR");

    let requests = server.received_requests().await.unwrap();
    let info: serde_json::Value =
        serde_json::from_slice(requests[0].headers["x-http-request-info"].as_bytes()).unwrap();
    assert_eq!(
        info["clientRequestId"]["sessionId"],
        "0123456789abcdef0123456789abcdef"
    );
    assert_eq!(
        info["clientRequestId"]["requestId"].as_str().unwrap().len(),
        9
    );
}

#[tokio::test]
async fn test_expired_credential_sends_nothing() {
    let (server, config) = start_api_mock(vec![]).await;
    let client = Client::with_credential(
        Some(ClientSettings {
            api_url: config.base_path,
            ..Default::default()
        }),
        credential(TimeDelta::seconds(599)),
        None,
    );

    let err = client
        .banking()
        .accounts()
        .balances(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, BankingError::NotAuthenticated(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_credential_is_rejected() {
    let client = Client::new(None);

    let err = client
        .banking()
        .depots()
        .depots(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, BankingError::NotAuthenticated(_)));
}

#[tokio::test]
async fn test_all_transactions_follows_matches() {
    let (_server, client) = setup(vec![
        transaction_page(0, 20, 45),
        transaction_page(20, 20, 45),
        transaction_page(40, 5, 45),
    ])
    .await;

    let page = client
        .banking()
        .accounts()
        .all_transactions(ACCOUNT_ID, 20, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(page.values.len(), 45);
    assert_eq!(page.values[44].reference, "REF44");
}

#[tokio::test]
async fn test_transactions_since_stops_at_cutoff() {
    let (_server, client) = setup(vec![
        Mock::given(matchers::method("GET"))
            .and(matchers::path(TRANSACTIONS_PATH))
            .and(matchers::query_param("paging-first", "0"))
            .and(matchers::query_param("transactionState", "BOTH"))
            .respond_with(transactions(0, &["", "2024-03-10", "2024-03-05"], 100))
            .expect(1),
        Mock::given(matchers::method("GET"))
            .and(matchers::path(TRANSACTIONS_PATH))
            .and(matchers::query_param("paging-first", "3"))
            .respond_with(transactions(3, &["2024-03-02", "2024-03-01", "2024-02-28"], 100))
            .expect(1),
        Mock::given(matchers::method("GET"))
            .and(matchers::path(TRANSACTIONS_PATH))
            .and(matchers::query_param("paging-first", "6"))
            .respond_with(transactions(6, &["2024-02-20"], 100))
            .expect(0),
    ])
    .await;

    let query = TransactionQuery {
        paging: PageRequest { first: 0, count: 3 },
        since: Some("2024-03-01".parse().unwrap()),
        booking_status: Some(comdirect_banking::BookingStatus::Both),
    };

    let page = client
        .banking()
        .accounts()
        .transactions(ACCOUNT_ID, &query, &CancellationToken::new())
        .await
        .unwrap();

    let references: Vec<_> = page.values.iter().map(|t| t.reference.as_str()).collect();
    assert_eq!(references, vec!["REF0", "REF1", "REF2", "REF3", "REF4"]);
    assert!(page.values[0].booking_date.is_none());
}

#[tokio::test]
async fn test_transactions_without_since_fetches_one_window() {
    let (_server, client) = setup(vec![transaction_page(20, 20, 45)]).await;

    let page = client
        .banking()
        .accounts()
        .transactions(
            ACCOUNT_ID,
            &TransactionQuery {
                paging: PageRequest {
                    first: 20,
                    count: 20,
                },
                ..Default::default()
            },
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(page.paging.index, 20);
    assert_eq!(page.values.len(), 20);
}

#[tokio::test]
async fn test_instrument_lookup() {
    let (_server, client) = setup(vec![Mock::given(matchers::method("GET"))
        .and(matchers::path("/api/brokerage/v1/instruments/A0RPWH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "values": [{
                "instrumentId": "INS1",
                "wkn": "A0RPWH",
                "isin": "IE00B4L5Y983",
                "name": "iShares Core MSCI World",
                "staticData": { "currency": "EUR", "instrumentType": "FUND" }
            }]
        })))])
    .await;

    let instruments = client
        .banking()
        .instruments()
        .lookup("A0RPWH", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(instruments.len(), 1);
    assert_eq!(instruments[0].isin, "IE00B4L5Y983");
    assert_eq!(instruments[0].static_data.instrument_type, "FUND");
}

#[tokio::test]
async fn test_reports_with_aggregate() {
    let (_server, client) = setup(vec![Mock::given(matchers::method("GET"))
        .and(matchers::path("/api/reports/participants/user/v1/allbalances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "paging": { "index": "0", "matches": "2" },
            "aggregated": {
                "balanceEUR": { "value": "1100.00", "unit": "EUR" },
                "availableCashAmountEUR": { "value": "600.00", "unit": "EUR" }
            },
            "values": [
                { "productId": "ACC1", "productType": "ACCOUNT", "balance": {
                    "accountId": "ACC1", "balanceEUR": { "value": "100.00", "unit": "EUR" } } },
                { "productId": "DEP1", "productType": "DEPOT", "balance": {
                    "depotId": "DEP1", "prevDayValue": { "value": "1000.00", "unit": "EUR" } } }
            ]
        })))])
    .await;

    let reports = client
        .banking()
        .reports()
        .reports(&CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(reports.paging.matches, 2);
    assert_eq!(reports.aggregated.balance_eur.value, "1100.00");
    assert_eq!(reports.values[1].balance.depot_id, "DEP1");
}

#[tokio::test]
async fn test_depot_positions() {
    let (_server, client) = setup(vec![Mock::given(matchers::method("GET"))
        .and(matchers::path("/api/brokerage/v3/depots/DEP1/positions"))
        .and(matchers::query_param("paging-count", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "paging": { "index": 0, "matches": 1 },
            "aggregated": {
                "currentValue": { "value": "1000.00", "unit": "EUR" },
                "ProfitLossPurchaseAbs": { "value": "50.00", "unit": "EUR" }
            },
            "values": [{
                "depotId": "DEP1",
                "positionId": "POS1",
                "wkn": "A0RPWH",
                "quantity": { "value": "10", "unit": "XXX" },
                "currentPrice": { "price": { "value": "100.00", "unit": "EUR" } }
            }]
        })))])
    .await;

    let positions = client
        .banking()
        .depots()
        .positions("DEP1", PageRequest::default(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(positions.aggregated.profit_loss_purchase_abs.value, "50.00");
    assert_eq!(positions.values[0].current_price.price.value, "100.00");
}

#[tokio::test]
async fn test_download_all_pauses_between_batches() {
    let documents: Vec<Document> = (0..25)
        .map(|i| Document {
            document_id: format!("DOC{i}"),
            name: format!("Report {i}"),
            date_creation: "2024-03-28".to_string(),
            mime_type: "application/pdf".to_string(),
            ..Default::default()
        })
        .collect();

    let (_server, client) = setup(vec![Mock::given(matchers::method("GET"))
        .and(matchers::path_regex("^/api/messages/v2/documents/DOC[0-9]+$"))
        .and(matchers::header("accept", "application/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .expect(25)])
    .await;

    let folder = std::env::temp_dir().join(format!(
        "comdirect-download-{}",
        Utc::now().timestamp_nanos_opt().unwrap()
    ));
    std::fs::create_dir_all(&folder).unwrap();

    let report = client
        .banking()
        .documents()
        .download_all(
            &documents,
            Some(&folder),
            DownloadThrottle {
                batch_size: 10,
                pause: Duration::from_millis(1),
            },
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(report.files.len(), 25);
    assert_eq!(report.pauses, 2);
    assert_eq!(
        std::fs::read(folder.join("2024-03-28-Report_0.pdf")).unwrap(),
        b"%PDF-1.4"
    );

    std::fs::remove_dir_all(&folder).unwrap();
}
