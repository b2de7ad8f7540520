//! Data model for the legacy `.pkla` policy format.
//!
//! Canonical string forms:
//! - Identity: `unix-user:alice`, `unix-group:admins`, `unix-netgroup:ops`
//! - Result: `yes`, `no`, `auth_self`, `auth_self_keep`, `auth_admin`,
//!   `auth_admin_keep`
//!
//! Everything here is an immutable value type built by the parser and
//! consumed by the translator.

mod identity;
mod record;
mod result;

pub use identity::{Identity, IdentityKind};
pub use record::{AdminRecord, PolicyRecord, RuleRecord};
pub use result::AuthResult;
