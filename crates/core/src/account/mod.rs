//! Chart-of-accounts roles and their resolution for a tenant.
//!
//! Journal recipes never name accounts directly. They ask for a semantic
//! role (wallet, bank, realized gain, ...) and the resolver maps it to the
//! tenant's account, planning the mandatory system account on first use.

pub mod resolver;
pub mod types;

pub use resolver::{AccountResolver, ResolvedAccount};
pub use types::{Account, AccountRole, AccountSet, AccountType};
