//! Feature stores over real adapters.
//!
//! Filters and tokens persist through [`FileStore`] across client instances,
//! and an unreachable backend surfaces as a retryable network error in the
//! store without disturbing loaded data.

use std::sync::Arc;
use std::time::Duration;

use payments_console::ApiClient;
use payments_console::domain::ErrorKind;
use payments_console::domain::entities::NewMerchant;
use payments_console::domain::filters::TransactionFilters;
use payments_console::domain::ports::{KeyValueStore, TRANSACTION_FILTERS_KEY};
use payments_console::outbound::http::ReqwestTransport;
use payments_console::outbound::storage::FileStore;
use payments_console::state::{MerchantStore, TransactionStore};
use payments_console::test_support::ScriptedTransport;
use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;
use url::Url;

fn file_client(dir: &TempDir, transport: Arc<ScriptedTransport>) -> ApiClient {
    let storage = FileStore::open(dir.path()).expect("open file store");
    ApiClient::builder(transport)
        .storage(Arc::new(storage))
        .build()
}

#[rstest]
#[tokio::test]
async fn transaction_filters_survive_a_restart() {
    let dir = TempDir::new().expect("temp dir");
    let first = file_client(&dir, Arc::new(ScriptedTransport::new()));
    let store = TransactionStore::transactions(&first);
    store.set_filters(TransactionFilters {
        merchant_code: Some("BP001".to_owned()),
        search: Some("REF-9".to_owned()),
        ..TransactionFilters::default()
    });
    drop(store);
    drop(first);

    let transport = Arc::new(ScriptedTransport::new());
    let second = file_client(&dir, transport.clone());
    let restored = TransactionStore::transactions(&second);
    transport.push_success(json!({ "transactions": [], "total": 0 }));
    restored.fetch().await.expect("fetch succeeds");

    let request = transport.last_request().expect("request recorded");
    assert_eq!(request.query.get("merchantCode"), Some("BP001"));
    assert_eq!(request.query.get("search"), Some("REF-9"));
    assert!(
        second
            .storage()
            .get(TRANSACTION_FILTERS_KEY)
            .expect("read filters")
            .is_some()
    );
}

#[rstest]
#[tokio::test]
async fn created_merchants_lead_the_list() {
    let transport = Arc::new(ScriptedTransport::new());
    let client = ApiClient::new(transport.clone());
    let store = MerchantStore::merchants(&client);
    transport
        .push_success(json!([
            { "merchantCode": "BP001", "businessName": "Bean Co", "status": "ACTIVE" }
        ]))
        .push_success(json!({
            "merchantCode": "BP002",
            "businessName": "Leaf Ltd",
            "status": "PENDING"
        }));

    store.fetch().await.expect("fetch succeeds");
    store
        .create(&NewMerchant {
            merchant_code: "BP002".to_owned(),
            business_name: "Leaf Ltd".to_owned(),
            email: "leaf@example.com".to_owned(),
            phone: "+2348000000002".to_owned(),
            partner_bank_code: None,
        })
        .await
        .expect("create succeeds");

    let state = store.state();
    let codes: Vec<&str> = state
        .items()
        .iter()
        .map(|merchant| merchant.merchant_code.as_str())
        .collect();
    assert_eq!(codes, ["BP002", "BP001"]);
    assert_eq!(state.meta().total, 2);
    assert!(!state.loading);
}

#[rstest]
#[tokio::test]
async fn unreachable_backends_are_retryable_network_errors() {
    let base = Url::parse("http://127.0.0.1:1/api/v1").expect("valid URL");
    let transport = ReqwestTransport::new(base, Duration::from_secs(2)).expect("client builds");
    let client = ApiClient::new(Arc::new(transport));
    let store = MerchantStore::merchants(&client);

    let error = store.fetch().await.expect_err("closed port fails");

    assert!(matches!(error.kind(), ErrorKind::Network(_)));
    assert!(error.is_retryable());
    assert_eq!(error.status_code(), None);
    let state = store.state();
    assert!(state.items().is_empty());
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some(error.message()));
}
