//! Per-feature observable state.
//!
//! A [`StateCell`] wraps a watch channel; a [`FeatureStore`] pairs one with a
//! resource service and the fetch and mutation actions the screens drive.

mod cell;
mod feature;
mod stores;

pub use cell::StateCell;
pub use feature::{FeatureState, FeatureStore};
pub use stores::{MerchantStore, PartnerBankStore, SettlementStore, TransactionStore, UserStore};
