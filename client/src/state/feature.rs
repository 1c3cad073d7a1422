//! Generic list-backed feature store.
//!
//! Every action sets `loading`, calls the service, then either applies the
//! result or records the error message, and always clears `loading`. Calls
//! run on a client scoped to the store, so [`FeatureStore::detach`] (or
//! dropping the store) abandons them without touching the state.

use std::sync::Arc;

use pagination::{PageMeta, PaginatedResponse};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::cell::StateCell;
use crate::client::ApiClient;
use crate::domain::ApiError;
use crate::domain::entities::Identified;
use crate::domain::filters::ListFilter;
use crate::domain::ports::KeyValueStore;
use crate::services::{ListSource, RecordWriter};

/// State observed by one feature's subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureState<T, F> {
    /// Loaded page of records and its metadata.
    pub page: PaginatedResponse<T>,
    /// Record the user is looking at.
    pub selected: Option<T>,
    /// Whether an action is in flight.
    pub loading: bool,
    /// Message of the last failed action.
    pub error: Option<String>,
    /// Filters used for the next fetch.
    pub filters: F,
}

impl<T, F: ListFilter> FeatureState<T, F> {
    fn with_filters(filters: F) -> Self {
        Self {
            page: PaginatedResponse::empty(filters.page_request()),
            selected: None,
            loading: false,
            error: None,
            filters,
        }
    }

    /// Loaded records.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.page.data
    }

    /// Metadata of the loaded page.
    #[must_use]
    pub const fn meta(&self) -> &PageMeta {
        &self.page.meta
    }
}

impl<T, F: ListFilter> Default for FeatureState<T, F> {
    fn default() -> Self {
        Self::with_filters(F::default())
    }
}

struct FilterPersistence<F> {
    storage: Arc<dyn KeyValueStore>,
    key: &'static str,
    encode: fn(&F) -> Result<String, serde_json::Error>,
}

impl<F> FilterPersistence<F> {
    fn save(&self, filters: &F) {
        let saved = (self.encode)(filters)
            .map_err(|error| error.to_string())
            .and_then(|text| {
                self.storage
                    .set(self.key, &text)
                    .map_err(|error| error.to_string())
            });
        if let Err(error) = saved {
            warn!(key = self.key, %error, "failed to persist filters");
        }
    }

    fn clear(&self) {
        if let Err(error) = self.storage.remove(self.key) {
            warn!(key = self.key, %error, "failed to remove persisted filters");
        }
    }
}

fn encode_filters<F: Serialize>(filters: &F) -> Result<String, serde_json::Error> {
    serde_json::to_string(filters)
}

fn load_filters<F: ListFilter + DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> F {
    match storage.get(key) {
        Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|error| {
            warn!(key, %error, "ignoring unreadable persisted filters");
            F::default()
        }),
        Ok(None) => F::default(),
        Err(error) => {
            warn!(key, %error, "failed to read persisted filters");
            F::default()
        }
    }
}

/// Observable store for one list-backed feature.
pub struct FeatureStore<S: ListSource> {
    service: S,
    cell: StateCell<FeatureState<S::Record, S::Filters>>,
    lifetime: CancellationToken,
    persistence: Option<FilterPersistence<S::Filters>>,
}

impl<S: ListSource> FeatureStore<S> {
    /// Store whose service is built by `make` from a client scoped to this
    /// store.
    pub fn new(client: &ApiClient, make: impl FnOnce(ApiClient) -> S) -> Self {
        let lifetime = CancellationToken::new();
        Self {
            service: make(client.scoped(lifetime.clone())),
            cell: StateCell::new(FeatureState::default()),
            lifetime,
            persistence: None,
        }
    }

    /// Like [`FeatureStore::new`], with filters restored from and saved to
    /// `key` in the client's storage.
    pub fn with_persisted_filters(
        client: &ApiClient,
        key: &'static str,
        make: impl FnOnce(ApiClient) -> S,
    ) -> Self
    where
        S::Filters: Serialize + DeserializeOwned,
    {
        let storage = client.storage();
        let filters: S::Filters = load_filters(storage.as_ref(), key);
        let lifetime = CancellationToken::new();
        Self {
            service: make(client.scoped(lifetime.clone())),
            cell: StateCell::new(FeatureState::with_filters(filters)),
            lifetime,
            persistence: Some(FilterPersistence {
                storage,
                key,
                encode: encode_filters::<S::Filters>,
            }),
        }
    }

    /// Copy of the current state.
    #[must_use]
    pub fn state(&self) -> FeatureState<S::Record, S::Filters> {
        self.cell.snapshot()
    }

    /// Receiver observing every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FeatureState<S::Record, S::Filters>> {
        self.cell.subscribe()
    }

    /// Abandon outstanding and future calls.
    ///
    /// Abandoned calls end without changing items, and `loading` returns to
    /// false.
    pub fn detach(&self) {
        self.lifetime.cancel();
    }

    /// Whether [`FeatureStore::detach`] has been called.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    /// Load the page described by the current filters.
    ///
    /// # Errors
    ///
    /// Returns the call's [`ApiError`]; the error message is also stored.
    pub async fn fetch(&self) -> Result<(), ApiError> {
        let filters = self.cell.read(|state| state.filters.clone());
        self.begin();
        let page = self
            .service
            .fetch(&filters)
            .await
            .map_err(|error| self.fail(error))?;
        debug!(records = page.data.len(), total = page.meta.total, "feature list loaded");
        self.commit(|state| state.page = page);
        Ok(())
    }

    /// Replace the filters, persisting them when configured.
    pub fn set_filters(&self, filters: S::Filters) {
        if let Some(persistence) = &self.persistence {
            persistence.save(&filters);
        }
        self.cell.update(|state| state.filters = filters);
    }

    /// Move the filters to `page` and fetch it.
    ///
    /// # Errors
    ///
    /// Returns the call's [`ApiError`]; the error message is also stored.
    pub async fn go_to_page(&self, page: u32) -> Result<(), ApiError> {
        let filters = self.cell.read(|state| state.filters.at_page(page));
        self.set_filters(filters);
        self.fetch().await
    }

    /// Restore default filters and forget the persisted ones.
    pub fn reset_filters(&self) {
        if let Some(persistence) = &self.persistence {
            persistence.clear();
        }
        self.cell.update(|state| state.filters = S::Filters::default());
    }

    /// Select the loaded record with `id`; returns whether one was found.
    pub fn select(&self, id: &str) -> bool {
        let found = self.cell.read(|state| {
            state
                .items()
                .iter()
                .find(|record| record.record_id() == id)
                .cloned()
        });
        let is_found = found.is_some();
        self.cell.update(|state| state.selected = found);
        is_found
    }

    /// Forget the last error message.
    pub fn clear_error(&self) {
        self.cell.update(|state| state.error = None);
    }

    pub(super) const fn service(&self) -> &S {
        &self.service
    }

    pub(super) fn begin(&self) {
        self.cell.update(|state| {
            state.loading = true;
            state.error = None;
        });
    }

    pub(super) fn commit(&self, apply: impl FnOnce(&mut FeatureState<S::Record, S::Filters>)) {
        self.cell.update(|state| {
            state.loading = false;
            apply(state);
        });
    }

    pub(super) fn fail(&self, error: ApiError) -> ApiError {
        self.cell.update(|state| {
            state.loading = false;
            if !error.is_cancelled() {
                state.error = Some(error.message().to_owned());
            }
        });
        error
    }

    pub(super) fn replace_record(
        state: &mut FeatureState<S::Record, S::Filters>,
        record: S::Record,
    ) {
        let id = record.record_id().to_owned();
        if state
            .selected
            .as_ref()
            .is_some_and(|selected| selected.record_id() == id)
        {
            state.selected = Some(record.clone());
        }
        state
            .page
            .replace_where(record, |existing| existing.record_id() == id);
    }
}

impl<S: RecordWriter> FeatureStore<S> {
    /// Create a record and prepend it to the loaded page.
    ///
    /// # Errors
    ///
    /// Returns the call's [`ApiError`]; the error message is also stored.
    pub async fn create(&self, input: &S::Create) -> Result<S::Record, ApiError> {
        self.begin();
        let record = self
            .service
            .create_record(input)
            .await
            .map_err(|error| self.fail(error))?;
        let stored = record.clone();
        self.commit(|state| state.page.prepend(stored));
        Ok(record)
    }

    /// Update record `id` and replace it in the loaded page.
    ///
    /// # Errors
    ///
    /// Returns the call's [`ApiError`]; the error message is also stored.
    pub async fn update(&self, id: &str, input: &S::Update) -> Result<S::Record, ApiError> {
        self.begin();
        let record = self
            .service
            .update_record(id, input)
            .await
            .map_err(|error| self.fail(error))?;
        let stored = record.clone();
        self.commit(|state| Self::replace_record(state, stored));
        Ok(record)
    }

    /// Delete record `id` and remove it from the loaded page.
    ///
    /// # Errors
    ///
    /// Returns the call's [`ApiError`]; the error message is also stored.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.begin();
        self.service
            .delete_record(id)
            .await
            .map_err(|error| self.fail(error))?;
        self.commit(|state| {
            state.page.remove_where(|record| record.record_id() == id);
            if state
                .selected
                .as_ref()
                .is_some_and(|selected| selected.record_id() == id)
            {
                state.selected = None;
            }
        });
        Ok(())
    }
}

impl<S: ListSource> Drop for FeatureStore<S> {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
