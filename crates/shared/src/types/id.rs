//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `LotId` where an `AccountId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::{AssetSymbol, SourceEventId};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(TenantId, "Unique identifier for a tenant (company).");
typed_id!(
    AccountId,
    "Unique identifier for a chart of accounts entry."
);
typed_id!(LotId, "Unique identifier for an acquisition lot.");
typed_id!(JournalEntryId, "Unique identifier for a journal entry.");
typed_id!(FiscalYearId, "Unique identifier for a fiscal year.");

/// Namespace for name-based lot identifiers.
const LOT_NAMESPACE: Uuid = Uuid::from_u128(0x6c6f_7473_2d63_6f73_7462_6f6f_6b2d_6964);

impl LotId {
    /// Derives the lot id for the lot an acquisition event creates.
    ///
    /// The same (tenant, event, asset) triple always yields the same id, so a
    /// replayed history reproduces identical lots.
    #[must_use]
    pub fn for_source(tenant_id: TenantId, source: &SourceEventId, asset: &AssetSymbol) -> Self {
        let name = format!("{tenant_id}/{source}/{asset}");
        Self(Uuid::new_v5(&LOT_NAMESPACE, name.as_bytes()))
    }
}

/// Namespace for engine-created accounts.
const ACCOUNT_NAMESPACE: Uuid = Uuid::from_u128(0x6163_636f_756e_742d_7379_7374_656d_2d69);

impl AccountId {
    /// Derives the id of the system account the engine creates for a role.
    #[must_use]
    pub fn for_system(tenant_id: TenantId, role: &str) -> Self {
        let name = format!("{tenant_id}/{role}");
        Self(Uuid::new_v5(&ACCOUNT_NAMESPACE, name.as_bytes()))
    }
}
