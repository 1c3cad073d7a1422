//! Feature stores for the dashboard's list screens.

use crate::client::ApiClient;
use crate::domain::ApiError;
use crate::domain::entities::{Merchant, MerchantStatus, Settlement};
use crate::domain::ports::{MERCHANT_FILTERS_KEY, TRANSACTION_FILTERS_KEY};
use crate::services::{
    MerchantService, PartnerBankService, SettlementService, TransactionService, UserService,
};

use super::feature::FeatureStore;

/// Transactions screen; filters persist between sessions.
pub type TransactionStore = FeatureStore<TransactionService>;
/// Merchants screen; filters persist between sessions.
pub type MerchantStore = FeatureStore<MerchantService>;
/// Partner banks screen.
pub type PartnerBankStore = FeatureStore<PartnerBankService>;
/// Settlements screen.
pub type SettlementStore = FeatureStore<SettlementService>;
/// Users screen.
pub type UserStore = FeatureStore<UserService>;

impl FeatureStore<TransactionService> {
    /// Transactions store with persisted filters.
    #[must_use]
    pub fn transactions(client: &ApiClient) -> Self {
        Self::with_persisted_filters(client, TRANSACTION_FILTERS_KEY, TransactionService::new)
    }
}

impl FeatureStore<MerchantService> {
    /// Merchants store with persisted filters.
    #[must_use]
    pub fn merchants(client: &ApiClient) -> Self {
        Self::with_persisted_filters(client, MERCHANT_FILTERS_KEY, MerchantService::new)
    }

    /// Move merchant `code` to `status` and refresh it in the loaded page.
    ///
    /// # Errors
    ///
    /// Returns the call's [`ApiError`]; the error message is also stored.
    pub async fn update_status(
        &self,
        code: &str,
        status: MerchantStatus,
    ) -> Result<Merchant, ApiError> {
        self.begin();
        let merchant = self
            .service()
            .update_status(code, status)
            .await
            .map_err(|error| self.fail(error))?;
        let stored = merchant.clone();
        self.commit(|state| Self::replace_record(state, stored));
        Ok(merchant)
    }
}

impl FeatureStore<PartnerBankService> {
    /// Partner banks store.
    #[must_use]
    pub fn partner_banks(client: &ApiClient) -> Self {
        Self::new(client, PartnerBankService::new)
    }
}

impl FeatureStore<SettlementService> {
    /// Settlements store.
    #[must_use]
    pub fn settlements(client: &ApiClient) -> Self {
        Self::new(client, SettlementService::new)
    }

    /// Trigger payout of settlement `id` and refresh it in the loaded page.
    ///
    /// # Errors
    ///
    /// Returns the call's [`ApiError`]; the error message is also stored.
    pub async fn process(&self, id: &str) -> Result<Settlement, ApiError> {
        self.begin();
        let settlement = self
            .service()
            .process(id)
            .await
            .map_err(|error| self.fail(error))?;
        let stored = settlement.clone();
        self.commit(|state| Self::replace_record(state, stored));
        Ok(settlement)
    }
}

impl FeatureStore<UserService> {
    /// Users store.
    #[must_use]
    pub fn users(client: &ApiClient) -> Self {
        Self::new(client, UserService::new)
    }

    /// Send user `id` a password reset.
    ///
    /// # Errors
    ///
    /// Returns the call's [`ApiError`]; the error message is also stored.
    pub async fn reset_password(&self, id: &str) -> Result<(), ApiError> {
        self.begin();
        self.service()
            .reset_password(id)
            .await
            .map_err(|error| self.fail(error))?;
        self.commit(|_| {});
        Ok(())
    }
}
