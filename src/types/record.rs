//! Per-section policy records, one per configuration section.
//!
//! Records are transient values: the parser builds one, the translator
//! consumes it, nothing outlives the section being converted.

use serde::{Deserialize, Serialize};

use super::identity::Identity;
use super::result::AuthResult;

/// An admin-identity-list section: who may act as policy administrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminRecord {
    pub identities: Vec<Identity>,
}

/// A single authorization rule.
///
/// The parser guarantees `identities` and `actions` are non-empty and that
/// at least one of the three result fields is present. A present
/// `return_value` makes the record untranslatable; the parser keeps it so
/// the translator can report it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleRecord {
    pub identities: Vec<Identity>,
    pub actions: Vec<String>,
    pub result_active: Option<AuthResult>,
    pub result_inactive: Option<AuthResult>,
    pub result_any: Option<AuthResult>,
    pub return_value: Option<Vec<(String, String)>>,
}

/// One configuration section's worth of policy, exhaustively matched at the
/// translator boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PolicyRecord {
    AdminList(AdminRecord),
    Rule(RuleRecord),
}
