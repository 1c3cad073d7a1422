//! Tests for request preparation, envelope handling, and session side effects.

use std::sync::Arc;
use std::time::Duration;

use mockable::MockClock;
use pagination::{ListShape, PageRequest, PaginatedResponse};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockHttpTransport, MockSessionEvents};
use crate::domain::{BusinessCategory, ErrorKind, IDEMPOTENCY_KEY_HEADER};
use crate::outbound::storage::InMemoryStore;
use crate::test_support::{InstantSleeper, ScriptedTransport};

fn envelope(data: &Value) -> HttpResponse {
    HttpResponse::json(200, &json!({ "status": "success", "data": data }))
}

fn fixed_clock() -> Arc<MockClock> {
    let mut clock = MockClock::new();
    clock.expect_utc().returning(|| {
        chrono::DateTime::parse_from_rfc3339("2026-02-01T09:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&chrono::Utc)
    });
    Arc::new(clock)
}

#[fixture]
fn transport() -> Arc<ScriptedTransport> {
    Arc::new(ScriptedTransport::new())
}

fn token(raw: &str) -> AuthToken {
    AuthToken::new(raw).expect("valid token")
}

#[rstest]
#[tokio::test]
async fn protected_calls_carry_the_bearer_token(transport: Arc<ScriptedTransport>) {
    let client = ApiClient::new(transport.clone());
    client.set_token(token("abc"));
    transport.push_success(json!([]));

    let _: Value = client
        .get("/merchants", &QueryParams::new())
        .await
        .expect("call succeeds");

    let request = transport.last_request().expect("request recorded");
    assert_eq!(request.header("authorization"), Some("Bearer abc"));
}

#[rstest]
#[tokio::test]
async fn public_calls_never_carry_the_bearer_token(transport: Arc<ScriptedTransport>) {
    let client = ApiClient::new(transport.clone());
    client.set_token(token("abc"));
    transport.push_success(json!({ "accessToken": "next" }));

    let _: Value = client
        .post("/auth/login", &json!({ "email": "a@b.c", "password": "pw" }))
        .await
        .expect("call succeeds");

    let request = transport.last_request().expect("request recorded");
    assert_eq!(request.header("Authorization"), None);
}

#[rstest]
#[case("/auth/login", true)]
#[case("/auth/callback?code=1", true)]
#[case("/auth/forgot-password", true)]
#[case("/auth/me", false)]
#[case("/auth/login-history", false)]
#[case("/merchants", false)]
fn recognises_public_paths(#[case] path: &str, #[case] expected: bool) {
    assert_eq!(is_public_path(path), expected);
}

#[rstest]
#[tokio::test]
async fn only_state_changing_calls_carry_idempotency_keys(transport: Arc<ScriptedTransport>) {
    let client = ApiClient::new(transport.clone());
    transport
        .push_success(json!([]))
        .push_success(json!({}))
        .push_success(json!({}))
        .push_success(Value::Null);

    let _: Value = client.get("/merchants", &QueryParams::new()).await.expect("get");
    let _: Value = client.post("/merchants", &json!({})).await.expect("post");
    let _: Value = client.put("/merchants/BP001", &json!({})).await.expect("put");
    client.delete::<()>("/merchants/BP001").await.expect("delete");

    let keys: Vec<Option<String>> = transport
        .requests()
        .iter()
        .map(|request| request.header(IDEMPOTENCY_KEY_HEADER).map(str::to_owned))
        .collect();
    assert_eq!(keys.first(), Some(&None));
    let mutation_keys: Vec<String> = keys.iter().skip(1).flatten().cloned().collect();
    assert_eq!(mutation_keys.len(), 3);
    assert!(mutation_keys.iter().all(|key| key.parse::<IdempotencyKey>().is_ok()));
    assert_ne!(mutation_keys.first(), mutation_keys.get(1));
    assert_ne!(mutation_keys.get(1), mutation_keys.get(2));
}

#[tokio::test]
async fn unauthorised_envelopes_clear_the_session_and_notify() {
    let mut transport = MockHttpTransport::new();
    transport.expect_send().times(1).returning(|_| {
        Ok(HttpResponse::json(
            200,
            &json!({ "status": "error", "message": "Unauthorized", "statusCode": 401 }),
        ))
    });
    let mut events = MockSessionEvents::new();
    events
        .expect_on_unauthorized()
        .withf(|event| event.endpoint == "/transactions" && event.redirect_to == "/auth/login")
        .times(1)
        .return_const(());
    let storage = Arc::new(InMemoryStore::new());
    let client = ApiClient::builder(Arc::new(transport))
        .storage(storage.clone())
        .session_events(Arc::new(events))
        .build();
    client.set_token(token("expired"));

    let error = client
        .get::<Value>("/transactions", &QueryParams::new())
        .await
        .expect_err("401 fails");

    assert_eq!(error.message(), "Unauthorized");
    assert_eq!(error.business_category(), Some(BusinessCategory::Authentication));
    assert!(client.token().is_none());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn unauthorised_login_attempts_do_not_emit_session_events() {
    let mut transport = MockHttpTransport::new();
    transport.expect_send().returning(|_| {
        Ok(HttpResponse::json(
            401,
            &json!({ "status": "error", "message": "Invalid credentials", "statusCode": 401 }),
        ))
    });
    let mut events = MockSessionEvents::new();
    events.expect_on_unauthorized().never();
    let client = ApiClient::builder(Arc::new(transport))
        .session_events(Arc::new(events))
        .build();

    let error = client
        .post::<Value, _>("/auth/login", &json!({}))
        .await
        .expect_err("login fails");

    assert!(error.is_authentication());
    assert_eq!(error.message(), "Invalid credentials");
}

#[rstest]
#[tokio::test]
async fn tokens_are_rehydrated_from_storage(transport: Arc<ScriptedTransport>) {
    let storage = Arc::new(InMemoryStore::with_entries([(TOKEN_KEY, "persisted")]));
    let client = ApiClient::builder(transport.clone()).storage(storage).build();
    transport.push_success(json!({}));

    let _: Value = client.get("/auth/me", &QueryParams::new()).await.expect("call");

    let request = transport.last_request().expect("request recorded");
    assert_eq!(request.header("Authorization"), Some("Bearer persisted"));
}

#[rstest]
#[tokio::test]
async fn errors_carry_context_and_clock_time(transport: Arc<ScriptedTransport>) {
    let client = ApiClient::builder(transport.clone())
        .clock(fixed_clock())
        .build();
    transport.push_json(404, &json!({ "message": "Merchant not found" }));

    let error = client
        .get::<Value>("/merchants/BP404", &QueryParams::new())
        .await
        .expect_err("404 fails");

    assert_eq!(error.context().endpoint, "/merchants/BP404");
    assert_eq!(error.context().method, HttpMethod::Get);
    assert_eq!(error.timestamp().to_rfc3339(), "2026-02-01T09:00:00+00:00");
    assert_eq!(error.business_category(), Some(BusinessCategory::ResourceNotFound));
}

#[rstest]
#[tokio::test]
async fn retries_reuse_the_idempotency_key(transport: Arc<ScriptedTransport>) {
    let sleeper = Arc::new(InstantSleeper::default());
    let client = ApiClient::builder(transport.clone())
        .retry_policy(RetryPolicy::new(3, Duration::from_millis(100)))
        .sleeper(sleeper.clone())
        .build();
    transport
        .push_failure(503, "Service unavailable")
        .push_failure(503, "Service unavailable")
        .push_success(json!({ "id": "s-1" }));

    let _: Value = client
        .post("/settlements/s-1/process", &json!({}))
        .await
        .expect("third attempt succeeds");

    let keys: Vec<String> = transport
        .requests()
        .iter()
        .filter_map(|request| request.header(IDEMPOTENCY_KEY_HEADER).map(str::to_owned))
        .collect();
    assert_eq!(keys.len(), 3);
    assert!(keys.windows(2).all(|pair| pair.first() == pair.get(1)));
    assert_eq!(
        sleeper.delays(),
        vec![Duration::from_millis(100), Duration::from_millis(200)]
    );
}

#[rstest]
#[tokio::test]
async fn default_policy_never_retries(transport: Arc<ScriptedTransport>) {
    let client = ApiClient::new(transport.clone());
    transport.push_failure(503, "Service unavailable");

    let error = client
        .get::<Value>("/merchants", &QueryParams::new())
        .await
        .expect_err("503 fails");

    assert!(error.is_retryable());
    assert!(matches!(error.kind(), ErrorKind::Server));
    assert_eq!(transport.requests().len(), 1);
}

#[rstest]
#[tokio::test]
async fn validation_failures_are_not_retried(transport: Arc<ScriptedTransport>) {
    let client = ApiClient::builder(transport.clone())
        .retry_policy(RetryPolicy::new(3, Duration::ZERO))
        .sleeper(Arc::new(InstantSleeper::default()))
        .build();
    transport.push_json(
        422,
        &json!({ "message": "Invalid", "field": "email", "constraints": ["email must be valid"] }),
    );

    let error = client
        .post::<Value, _>("/users", &json!({ "email": "a@" }))
        .await
        .expect_err("422 fails");

    assert_eq!(
        error.field_errors().get("email"),
        Some(&vec!["email must be valid".to_owned()])
    );
    assert_eq!(transport.requests().len(), 1);
}

#[rstest]
#[tokio::test]
async fn cancelled_calls_end_with_a_cancelled_error(transport: Arc<ScriptedTransport>) {
    let cancel = CancellationToken::new();
    let client = ApiClient::new(transport.clone()).scoped(cancel.clone());
    transport.push_hang();

    let query = QueryParams::new();
    let call = client.get::<Value>("/transactions", &query);
    cancel.cancel();
    let error = call.await.expect_err("cancelled call fails");

    assert!(error.is_cancelled());
    assert!(!error.is_retryable());
}

#[rstest]
#[tokio::test]
async fn bare_array_lists_count_their_items(transport: Arc<ScriptedTransport>) {
    let client = ApiClient::new(transport.clone());
    transport.push_success(json!([{ "id": 1 }, { "id": 2 }, { "id": 3 }]));

    let page: PaginatedResponse<Value> = client
        .get_list(
            "/merchants",
            &QueryParams::new(),
            PageRequest::default(),
            ListShape::BareArray,
        )
        .await
        .expect("list succeeds");

    assert_eq!(page.meta.total, 3);
    assert_eq!(page.data.len(), 3);
}

#[rstest]
#[tokio::test]
async fn mismatched_list_shapes_are_decode_errors(transport: Arc<ScriptedTransport>) {
    let client = ApiClient::new(transport.clone());
    transport.push_success(json!({ "items": [] }));

    let error = client
        .get_list::<Value>(
            "/transactions",
            &QueryParams::new(),
            PageRequest::default(),
            ListShape::Keyed("transactions"),
        )
        .await
        .expect_err("shape mismatch fails");

    assert_eq!(error.code(), crate::domain::error::DECODE_ERROR_CODE);
}

#[rstest]
#[tokio::test]
async fn bare_endpoints_skip_the_envelope(transport: Arc<ScriptedTransport>) {
    let client = ApiClient::new(transport.clone());
    transport.push_json(200, &json!([{ "code": "044", "name": "Access" }]));

    let banks: Value = client
        .get_bare("/banks", &QueryParams::new())
        .await
        .expect("bare call succeeds");

    assert_eq!(banks, json!([{ "code": "044", "name": "Access" }]));
}

#[rstest]
#[case(503)]
#[case(429)]
#[tokio::test]
async fn failing_envelopes_behind_http_200_are_retried(
    transport: Arc<ScriptedTransport>,
    #[case] status: u16,
) {
    let client = ApiClient::builder(transport.clone())
        .retry_policy(RetryPolicy::new(3, Duration::ZERO))
        .sleeper(Arc::new(InstantSleeper::default()))
        .build();
    transport
        .push_json(
            200,
            &json!({ "status": "error", "message": "Busy", "statusCode": status }),
        )
        .push_success(json!({ "merchantCode": "BP001" }));

    let merchant: Value = client
        .get("/merchants/BP001", &QueryParams::new())
        .await
        .expect("second attempt succeeds");

    assert_eq!(merchant, json!({ "merchantCode": "BP001" }));
    assert_eq!(transport.requests().len(), 2);
}

#[rstest]
#[tokio::test]
async fn error_envelopes_on_failing_statuses_keep_their_details(
    transport: Arc<ScriptedTransport>,
) {
    let client = ApiClient::new(transport.clone());
    transport.push_json(
        422,
        &json!({
            "status": "error",
            "message": "Invalid user",
            "statusCode": 422,
            "data": { "field": "email", "constraints": ["bad"] }
        }),
    );

    let error = client
        .post::<Value, _>("/users", &json!({ "email": "a@" }))
        .await
        .expect_err("422 fails");

    assert_eq!(error.message(), "Invalid user");
    assert_eq!(error.field_errors().get("email"), Some(&vec!["bad".to_owned()]));
}

#[rstest]
#[case("/merchants/..")]
#[case("/merchants/%2E%2e")]
#[case("/merchants/./BP001")]
#[case("/merchants/")]
#[tokio::test]
async fn dot_and_empty_segments_are_never_sent(
    transport: Arc<ScriptedTransport>,
    #[case] path: &str,
) {
    let client = ApiClient::new(transport.clone());

    let error = client
        .delete::<Value>(path)
        .await
        .expect_err("unsafe path is refused");

    assert_eq!(error.code(), crate::domain::error::INVALID_PATH_CODE);
    assert!(transport.requests().is_empty());
}
