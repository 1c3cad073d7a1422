//! Tests for error accessors and retry classification.

use super::*;
use chrono::TimeZone;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn context() -> ErrorContext {
    ErrorContext::new(HttpMethod::Patch, "/merchants/BP001/status")
}

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 8, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

#[rstest]
fn display_is_the_message(context: ErrorContext) {
    let error = ApiError::server("gateway down", 502, context, at());
    assert_eq!(error.to_string(), "gateway down");
}

#[rstest]
fn business_errors_use_their_business_code(context: ErrorContext) {
    let error = ApiError::business(
        "Unauthorized",
        401,
        BusinessDetails {
            business_code: "TOKEN_EXPIRED".to_owned(),
            category: BusinessCategory::Authentication,
        },
        context,
        at(),
    );

    assert_eq!(error.code(), "TOKEN_EXPIRED");
    assert!(error.is_authentication());
    assert_eq!(error.business_category(), Some(BusinessCategory::Authentication));
}

#[rstest]
#[case(Some(429), true)]
#[case(Some(409), false)]
#[case(None, false)]
fn generic_errors_retry_only_on_rate_limits(
    context: ErrorContext,
    #[case] status: Option<u16>,
    #[case] retryable: bool,
) {
    let error = ApiError::generic("x", HTTP_ERROR_CODE, status, context, at());
    assert_eq!(error.is_retryable(), retryable);
}

#[rstest]
fn cancelled_errors_are_not_retryable(context: ErrorContext) {
    let error = ApiError::cancelled(context, at());
    assert!(error.is_cancelled());
    assert!(!error.is_retryable());
    assert_eq!(error.code(), CANCELLED_CODE);
}

#[rstest]
fn primary_field_merges_into_field_errors(context: ErrorContext) {
    let error = ApiError::validation(
        "Invalid input",
        400,
        ValidationDetails {
            field: Some("email".to_owned()),
            value: Some(json!("a@")),
            constraints: vec!["email must be valid".to_owned()],
            violations: vec![FieldViolation {
                field: "email".to_owned(),
                value: Some(json!("a@")),
                constraints: vec!["email must be valid".to_owned()],
            }],
        },
        context,
        at(),
    );

    assert_eq!(
        error.field_errors().get("email"),
        Some(&vec!["email must be valid".to_owned()])
    );
}

#[rstest]
fn field_errors_are_empty_for_other_kinds(context: ErrorContext) {
    let error = ApiError::server("boom", 500, context, at());
    assert!(error.field_errors().is_empty());
    assert!(error.violation_for("email").is_none());
}

#[test]
fn business_categories_render_in_screaming_case() {
    assert_eq!(
        BusinessCategory::ResourceNotFound.to_string(),
        "RESOURCE_NOT_FOUND"
    );
    assert_eq!(
        serde_json::to_value(BusinessCategory::Authorization).expect("serialises"),
        json!("AUTHORIZATION")
    );
}
