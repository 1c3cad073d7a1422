//! Backend resource records.
//!
//! Each record mirrors the backend schema in camelCase. The backend owns
//! them; the client only caches them in feature stores.

mod bank;
mod commission;
mod device;
mod merchant;
mod partner_bank;
mod settlement;
mod telco;
mod transaction;
mod user;

pub use bank::Bank;
pub use commission::{Commission, CommissionUpdate, NewCommission};
pub use device::{Device, DeviceAssignment, DeviceStatus, NewDevice};
pub use merchant::{Merchant, MerchantStatus, MerchantUpdate, NewMerchant};
pub use partner_bank::{NewPartnerBank, PartnerBank, PartnerBankUpdate};
pub use settlement::{
    NewSettlement, Settlement, SettlementSchedule, SettlementStatus, SettlementUpdate,
};
pub use telco::{NewTelco, TelcoManagement, TelcoUpdate};
pub use transaction::{Transaction, TransactionAnalytics, TransactionStatus};
pub use user::{NewUser, User, UserStatus, UserUpdate};

/// Records with a stable identifier, used to splice cached lists.
pub trait Identified {
    /// Identifier the backend uses in resource paths.
    fn record_id(&self) -> &str;
}
