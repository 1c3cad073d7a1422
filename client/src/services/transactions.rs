//! Transaction browsing and analytics.

use async_trait::async_trait;
use pagination::{ListShape, PaginatedResponse};

use super::{ListSource, record_path};
use crate::client::ApiClient;
use crate::domain::entities::{Transaction, TransactionAnalytics};
use crate::domain::filters::{DateRange, ListFilter, TransactionFilters};
use crate::domain::{ApiError, QueryParams, Role, Session};

const BASE: &str = "/transactions";
const PLATFORM_ANALYTICS: &str = "/transactions/analytics";
const MERCHANT_ANALYTICS: &str = "/transactions/analytics/merchant";

/// Client for `/transactions`.
///
/// The list endpoint answers with `{ transactions: [...], total }`.
#[derive(Debug, Clone)]
pub struct TransactionService {
    client: ApiClient,
}

impl TransactionService {
    /// Service backed by `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// One page of transactions.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn list(
        &self,
        filters: &TransactionFilters,
    ) -> Result<PaginatedResponse<Transaction>, ApiError> {
        self.client
            .get_list(
                BASE,
                &filters.to_query(),
                filters.page_request(),
                ListShape::Keyed("transactions"),
            )
            .await
    }

    /// Transaction with `id`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn get(&self, id: &str) -> Result<Transaction, ApiError> {
        self.client
            .get(&record_path(BASE, id), &QueryParams::new())
            .await
    }

    /// Dashboard aggregates for `range`, scoped by the session's role.
    ///
    /// Platform staff read platform-wide figures; merchant users read their
    /// own merchant's figures.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn analytics(
        &self,
        session: &Session,
        range: DateRange,
    ) -> Result<TransactionAnalytics, ApiError> {
        let (path, query) = analytics_request(session, range);
        self.client.get(path, &query).await
    }
}

fn analytics_request(session: &Session, range: DateRange) -> (&'static str, QueryParams) {
    let query = range.apply(QueryParams::new());
    if session.role().is_platform_staff() {
        return (PLATFORM_ANALYTICS, query);
    }
    let scoped = match session.role() {
        Role::Merchant => query.with_text("merchantCode", session.user.merchant_code.as_deref()),
        _ => query,
    };
    (MERCHANT_ANALYTICS, scoped)
}

#[async_trait]
impl ListSource for TransactionService {
    type Record = Transaction;
    type Filters = TransactionFilters;

    async fn fetch(
        &self,
        filters: &TransactionFilters,
    ) -> Result<PaginatedResponse<Transaction>, ApiError> {
        self.list(filters).await
    }
}
