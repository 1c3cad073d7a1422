//! Explicit adapters from backend list layouts to [`PaginatedResponse`].

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::page::{PageMeta, PageRequest, PaginatedResponse};

/// Layout a backend list endpoint uses for its `data` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape {
    /// A bare JSON array; the total is the array length.
    BareArray,
    /// `{ "data": [...], "total": n }`, with optional `page` and `limit`.
    DataTotal,
    /// `{ "<key>": [...], "total": n }`, with optional `page` and `limit`.
    Keyed(&'static str),
    /// Already canonical: `{ "data": [...], "meta": { ... } }`.
    Paginated,
}

/// Reasons a payload does not match its declared [`ListShape`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// A bare array was expected.
    #[error("expected a JSON array for a bare list payload")]
    NotAnArray,
    /// An object was expected.
    #[error("expected a JSON object for a {shape} list payload")]
    NotAnObject {
        /// Shape that was declared.
        shape: &'static str,
    },
    /// The object did not contain the records key.
    #[error("list payload is missing the `{key}` key")]
    MissingKey {
        /// Key that was declared.
        key: &'static str,
    },
    /// Records or metadata did not decode.
    #[error("list payload failed to decode: {message}")]
    Decode {
        /// Decoder message.
        message: String,
    },
}

impl ShapeError {
    fn decode(error: &serde_json::Error) -> Self {
        Self::Decode {
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LooseMeta {
    page: Option<u32>,
    #[serde(alias = "limit")]
    per_page: Option<u32>,
    total: Option<u64>,
}

impl LooseMeta {
    fn resolve(self, request: PageRequest, item_count: usize) -> PageMeta {
        let fallback_total = u64::try_from(item_count).unwrap_or(u64::MAX);
        PageMeta::new(
            self.page.unwrap_or(request.page()),
            self.per_page.unwrap_or(request.per_page()),
            self.total.unwrap_or(fallback_total),
        )
    }
}

impl ListShape {
    fn label(self) -> &'static str {
        match self {
            Self::BareArray => "bare",
            Self::DataTotal => "data/total",
            Self::Keyed(_) => "keyed",
            Self::Paginated => "paginated",
        }
    }

    /// Adapt `payload` into the canonical envelope.
    ///
    /// Metadata the payload omits is filled from `request`; a missing total
    /// falls back to the number of records received.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] when the payload does not have the declared
    /// layout or its records fail to decode as `T`.
    ///
    /// # Examples
    /// ```
    /// use pagination::{ListShape, PageRequest};
    /// use serde_json::json;
    ///
    /// let page = ListShape::Keyed("transactions")
    ///     .adapt::<u32>(json!({ "transactions": [1, 2], "total": 7 }), PageRequest::default())
    ///     .expect("payload matches shape");
    /// assert_eq!(page.meta.total, 7);
    /// ```
    pub fn adapt<T: DeserializeOwned>(
        self,
        payload: Value,
        request: PageRequest,
    ) -> Result<PaginatedResponse<T>, ShapeError> {
        match self {
            Self::BareArray => adapt_bare(payload, request),
            Self::DataTotal => adapt_keyed(self.object(payload)?, "data", request),
            Self::Keyed(key) => adapt_keyed(self.object(payload)?, key, request),
            Self::Paginated => adapt_paginated(self.object(payload)?, request),
        }
    }

    fn object(self, payload: Value) -> Result<Map<String, Value>, ShapeError> {
        match payload {
            Value::Object(map) => Ok(map),
            _ => Err(ShapeError::NotAnObject {
                shape: self.label(),
            }),
        }
    }
}

fn decode_items<T: DeserializeOwned>(items: Value) -> Result<Vec<T>, ShapeError> {
    if !items.is_array() {
        return Err(ShapeError::NotAnArray);
    }
    serde_json::from_value(items).map_err(|err| ShapeError::decode(&err))
}

fn adapt_bare<T: DeserializeOwned>(
    payload: Value,
    request: PageRequest,
) -> Result<PaginatedResponse<T>, ShapeError> {
    let data: Vec<T> = decode_items(payload)?;
    let total = u64::try_from(data.len()).unwrap_or(u64::MAX);
    Ok(PaginatedResponse::new(data, request, total))
}

fn adapt_keyed<T: DeserializeOwned>(
    mut object: Map<String, Value>,
    key: &'static str,
    request: PageRequest,
) -> Result<PaginatedResponse<T>, ShapeError> {
    let items = object.remove(key).ok_or(ShapeError::MissingKey { key })?;
    let data: Vec<T> = decode_items(items)?;
    let loose: LooseMeta =
        serde_json::from_value(Value::Object(object)).map_err(|err| ShapeError::decode(&err))?;
    let meta = loose.resolve(request, data.len());
    Ok(PaginatedResponse { data, meta })
}

fn adapt_paginated<T: DeserializeOwned>(
    mut object: Map<String, Value>,
    request: PageRequest,
) -> Result<PaginatedResponse<T>, ShapeError> {
    let items = object
        .remove("data")
        .ok_or(ShapeError::MissingKey { key: "data" })?;
    let data: Vec<T> = decode_items(items)?;
    let meta = match object.remove("meta") {
        Some(meta) => serde_json::from_value::<LooseMeta>(meta)
            .map_err(|err| ShapeError::decode(&err))?
            .resolve(request, data.len()),
        None => PageMeta::for_request(request, u64::try_from(data.len()).unwrap_or(u64::MAX)),
    };
    Ok(PaginatedResponse { data, meta })
}

#[cfg(test)]
mod tests {
    //! Coverage for each declared list layout.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn request() -> PageRequest {
        PageRequest::new(2, 5)
    }

    #[test]
    fn bare_arrays_count_their_items() {
        let page: PaginatedResponse<String> = ListShape::BareArray
            .adapt(json!(["a", "b", "c"]), request())
            .expect("bare array adapts");

        assert_eq!(page.data.len(), 3);
        assert_eq!(page.meta.total, 3);
        assert_eq!(page.meta.page, 2);
        assert_eq!(page.meta.per_page, 5);
    }

    #[test]
    fn data_total_prefers_the_reported_total() {
        let page: PaginatedResponse<u8> = ListShape::DataTotal
            .adapt(json!({ "data": [1, 2], "total": 12, "limit": 2 }), request())
            .expect("data/total adapts");

        assert_eq!(page.meta.total, 12);
        assert_eq!(page.meta.per_page, 2);
        assert_eq!(page.meta.total_pages, 6);
    }

    #[test]
    fn keyed_lists_read_the_declared_key() {
        let page: PaginatedResponse<u8> = ListShape::Keyed("transactions")
            .adapt(json!({ "transactions": [1], "total": 1, "page": 1 }), request())
            .expect("keyed adapts");

        assert_eq!(page.data, vec![1]);
        assert_eq!(page.meta.page, 1);
    }

    #[test]
    fn paginated_payloads_keep_their_meta() {
        let page: PaginatedResponse<u8> = ListShape::Paginated
            .adapt(
                json!({
                    "data": [1, 2, 3],
                    "meta": { "page": 3, "perPage": 3, "total": 9, "totalPages": 3 }
                }),
                request(),
            )
            .expect("paginated adapts");

        assert_eq!(page.meta, PageMeta::new(3, 3, 9));
    }

    #[rstest]
    #[case::bare_given_object(ListShape::BareArray, json!({ "data": [] }))]
    #[case::data_total_given_array(ListShape::DataTotal, json!([1, 2]))]
    #[case::keyed_missing_key(ListShape::Keyed("transactions"), json!({ "data": [] }))]
    #[case::records_not_array(ListShape::DataTotal, json!({ "data": { "id": 1 } }))]
    fn mismatched_payloads_are_rejected(#[case] shape: ListShape, #[case] payload: Value) {
        let result: Result<PaginatedResponse<u8>, _> = shape.adapt(payload, request());
        assert!(result.is_err(), "{shape:?} should reject the payload");
    }

    #[test]
    fn undecodable_records_report_decode_errors() {
        let error = ListShape::BareArray
            .adapt::<u8>(json!(["not a number"]), request())
            .expect_err("records must decode");

        assert!(matches!(error, ShapeError::Decode { .. }));
    }
}
