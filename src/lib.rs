// src/lib.rs
pub use document::convert_document;
pub use error::ConvertError;
pub use parser::{Section, parse_document, parse_section};
pub use translator::translate;
pub use types::{AdminRecord, AuthResult, Identity, IdentityKind, PolicyRecord, RuleRecord};

mod document;
mod error;
mod parser;
mod script;
mod translator;
mod types;
