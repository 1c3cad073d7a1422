//! Per-resource list filters.
//!
//! Filters start from defaults, change with user input, and render as query
//! parameters. Unset values are never sent. Transaction and merchant filters
//! are also persisted between sessions, hence the serde derives.

use chrono::NaiveDate;
use pagination::{DEFAULT_PER_PAGE, PageRequest};
use serde::{Deserialize, Serialize};

use super::auth::Role;
use super::entities::{MerchantStatus, SettlementStatus, TransactionStatus, UserStatus};
use super::http::QueryParams;

/// Common behaviour of list filters.
pub trait ListFilter: Clone + Default + Send + Sync + 'static {
    /// Page position requested by this filter.
    fn page_request(&self) -> PageRequest;

    /// Query parameters for the list call.
    fn to_query(&self) -> QueryParams;

    /// Copy of this filter moved to `page`.
    #[must_use]
    fn at_page(&self, page: u32) -> Self;
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

/// Sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sort {
    /// Backend column name.
    pub field: String,
    /// Direction.
    pub direction: SortDirection,
}

impl Sort {
    fn param(&self) -> String {
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        format!("{}:{direction}", self.field)
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First day included.
    pub from: Option<NaiveDate>,
    /// Last day included.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Add `startDate`/`endDate` for the bounds that are set.
    #[must_use]
    pub fn apply(self, params: QueryParams) -> QueryParams {
        params
            .with_opt("startDate", self.from)
            .with_opt("endDate", self.to)
    }
}

fn wire_name<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => Some(name),
        _ => None,
    }
}

/// `page` plus the page size under `size_key`, from the clamped request.
fn paging(request: PageRequest, size_key: &str) -> QueryParams {
    QueryParams::new()
        .with("page", request.page())
        .with(size_key, request.per_page())
}

const fn default_page() -> u32 {
    1
}

const fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

/// Filters for the transactions list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilters {
    /// 1-based page.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Page size, sent as `limit`.
    #[serde(default = "default_per_page")]
    pub limit: u32,
    /// Free-text search over references and phone numbers.
    #[serde(default)]
    pub search: Option<String>,
    /// Status filter.
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    /// Merchant scope.
    #[serde(default)]
    pub merchant_code: Option<String>,
    /// Creation date range.
    #[serde(default)]
    pub date_range: DateRange,
    /// Sort order.
    #[serde(default)]
    pub sort: Option<Sort>,
}

impl Default for TransactionFilters {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_per_page(),
            search: None,
            status: None,
            merchant_code: None,
            date_range: DateRange::default(),
            sort: None,
        }
    }
}

impl ListFilter for TransactionFilters {
    fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    fn to_query(&self) -> QueryParams {
        let params = paging(self.page_request(), "limit")
            .with_text("search", self.search.as_deref())
            .with_opt("status", self.status.as_ref().and_then(wire_name))
            .with_text("merchantCode", self.merchant_code.as_deref())
            .with_opt("sort", self.sort.as_ref().map(Sort::param));
        self.date_range.apply(params)
    }

    fn at_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }
}

/// Filters for the merchants list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantFilters {
    /// 1-based page.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Page size.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Free-text search over codes and names.
    #[serde(default)]
    pub search: Option<String>,
    /// Status filter.
    #[serde(default)]
    pub status: Option<MerchantStatus>,
    /// Onboarding date range.
    #[serde(default)]
    pub date_range: DateRange,
}

impl Default for MerchantFilters {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            search: None,
            status: None,
            date_range: DateRange::default(),
        }
    }
}

impl ListFilter for MerchantFilters {
    fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }

    fn to_query(&self) -> QueryParams {
        let params = paging(self.page_request(), "perPage")
            .with_text("search", self.search.as_deref())
            .with_opt("status", self.status.as_ref().and_then(wire_name));
        self.date_range.apply(params)
    }

    fn at_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }
}

/// Filters for the settlements list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementFilters {
    /// 1-based page.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Merchant scope.
    pub merchant_code: Option<String>,
    /// Status filter.
    pub status: Option<SettlementStatus>,
    /// Settlement period range.
    pub date_range: DateRange,
}

impl Default for SettlementFilters {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            merchant_code: None,
            status: None,
            date_range: DateRange::default(),
        }
    }
}

impl ListFilter for SettlementFilters {
    fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }

    fn to_query(&self) -> QueryParams {
        let params = paging(self.page_request(), "perPage")
            .with_text("merchantCode", self.merchant_code.as_deref())
            .with_opt("status", self.status.as_ref().and_then(wire_name));
        self.date_range.apply(params)
    }

    fn at_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }
}

/// Filters for the users list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFilters {
    /// 1-based page.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Free-text search over names and emails.
    pub search: Option<String>,
    /// Role filter.
    pub role: Option<Role>,
    /// Status filter.
    pub status: Option<UserStatus>,
}

impl Default for UserFilters {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            search: None,
            role: None,
            status: None,
        }
    }
}

impl ListFilter for UserFilters {
    fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }

    fn to_query(&self) -> QueryParams {
        paging(self.page_request(), "perPage")
            .with_text("search", self.search.as_deref())
            .with_opt("role", self.role.as_ref().and_then(wire_name))
            .with_opt("status", self.status.as_ref().and_then(wire_name))
    }

    fn at_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }
}

/// Page and search filters for resources without dedicated filters
/// (partner banks, devices, telcos, commissions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFilters {
    /// 1-based page.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Free-text search.
    pub search: Option<String>,
}

impl Default for PageFilters {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            search: None,
        }
    }
}

impl ListFilter for PageFilters {
    fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }

    fn to_query(&self) -> QueryParams {
        paging(self.page_request(), "perPage")
            .with_text("search", self.search.as_deref())
    }

    fn at_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for query rendering.

    use super::*;

    #[test]
    fn default_transaction_filters_send_only_paging() {
        let params = TransactionFilters::default().to_query();
        assert_eq!(
            params.pairs(),
            &[
                ("page".to_owned(), "1".to_owned()),
                ("limit".to_owned(), "10".to_owned()),
            ]
        );
    }

    #[test]
    fn transaction_filters_render_every_set_value() {
        let filters = TransactionFilters {
            page: 3,
            limit: 50,
            search: Some("REF-1".to_owned()),
            status: Some(TransactionStatus::Failed),
            merchant_code: Some("BP001".to_owned()),
            date_range: DateRange {
                from: NaiveDate::from_ymd_opt(2026, 1, 1),
                to: NaiveDate::from_ymd_opt(2026, 1, 31),
            },
            sort: Some(Sort {
                field: "createdAt".to_owned(),
                direction: SortDirection::Desc,
            }),
        };
        let params = filters.to_query();

        assert_eq!(params.get("status"), Some("FAILED"));
        assert_eq!(params.get("merchantCode"), Some("BP001"));
        assert_eq!(params.get("startDate"), Some("2026-01-01"));
        assert_eq!(params.get("endDate"), Some("2026-01-31"));
        assert_eq!(params.get("sort"), Some("createdAt:desc"));
        assert_eq!(filters.page_request(), PageRequest::new(3, 50));
    }

    #[test]
    fn persisted_merchant_filters_fill_missing_fields() {
        let filters: MerchantFilters =
            serde_json::from_str(r#"{ "search": "bean" }"#).expect("filters decode");

        assert_eq!(filters.page, 1);
        assert_eq!(filters.per_page, DEFAULT_PER_PAGE);
        assert_eq!(filters.search.as_deref(), Some("bean"));
    }

    #[test]
    fn persisted_page_zero_is_sent_as_the_first_page() {
        let filters: TransactionFilters =
            serde_json::from_str(r#"{ "page": 0, "limit": 25 }"#).expect("filters decode");
        let params = filters.to_query();

        assert_eq!(params.get("page"), Some("1"));
        assert_eq!(params.get("limit"), Some("25"));
        assert_eq!(filters.page_request().page(), 1);
    }

    #[test]
    fn at_page_keeps_other_filters() {
        let filters = UserFilters {
            role: Some(Role::Admin),
            ..UserFilters::default()
        };
        let moved = filters.at_page(4);

        assert_eq!(moved.page, 4);
        assert_eq!(moved.role, Some(Role::Admin));
        assert_eq!(moved.to_query().get("role"), Some("ADMIN"));
    }
}
