//! Reader for the legacy INI-style `.pkla` grammar.
//!
//! Two layers: [`parse_document`] turns raw text into named [`Section`]s in
//! file order, and [`parse_section`] turns one section's key/value pairs
//! into a [`PolicyRecord`]. Key lookup is case-insensitive, matching the
//! configparser dialect the legacy files were written for.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConvertError;
use crate::types::{AdminRecord, AuthResult, Identity, PolicyRecord, RuleRecord};

/// One named configuration section. Keys are stored lowercased; a duplicate
/// key overwrites the earlier value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    entries: HashMap<String, String>,
}

impl Section {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Section {
            name: name.into(),
            entries: HashMap::new(),
        }
    }

    pub fn insert<K: AsRef<str>, V: Into<String>>(&mut self, key: K, value: V) {
        self.entries.insert(key.as_ref().to_lowercase(), value.into());
    }

    /// Case-insensitive lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&key.to_lowercase()).map(String::as_str)
    }
}

/// Parse a whole document into sections, preserving file order.
///
/// Recognized line forms: blank, full-line comment (`#` or `;`), `[name]`
/// section header, `key = value`. Anything else is an
/// [`ConvertError::InvalidConfiguration`] with the offending line number.
pub fn parse_document(text: &str) -> Result<Vec<Section>, ConvertError> {
    let mut sections: Vec<Section> = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        let lineno = idx + 1;

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let Some(name) = rest.strip_suffix(']') else {
                return Err(ConvertError::InvalidConfiguration(format!(
                    "line {lineno}: unterminated section header '{line}'"
                )));
            };
            sections.push(Section::new(name));
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(ConvertError::InvalidConfiguration(format!(
                "line {lineno}: expected 'key = value', got '{line}'"
            )));
        };
        let Some(section) = sections.last_mut() else {
            return Err(ConvertError::InvalidConfiguration(format!(
                "line {lineno}: key/value pair before any section header"
            )));
        };
        section.insert(key.trim_end(), value.trim_start());
    }

    debug!(event = "Parse", phase = "Document", sections = sections.len());
    Ok(sections)
}

/// Split a `;`-separated value, dropping empty tokens.
fn split_tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(';').filter(|token| !token.is_empty())
}

fn parse_identities(raw: &str) -> Result<Vec<Identity>, ConvertError> {
    split_tokens(raw).map(Identity::from_str).collect()
}

/// Construct the [`PolicyRecord`] for one section.
///
/// A non-empty `AdminIdentities` key selects the admin-list variant and
/// short-circuits; every other key in the section is then ignored. The rule
/// variant requires `Identity`, `Action`, and at least one of the three
/// result fields. `ReturnValue` is kept verbatim as key/value pairs; its
/// mere presence later fails translation, so it is not rejected here.
pub fn parse_section(section: &Section) -> Result<PolicyRecord, ConvertError> {
    if let Some(raw) = section.get("AdminIdentities") {
        if !raw.is_empty() {
            let identities = parse_identities(raw)?;
            debug!(
                event = "Parse",
                phase = "Section",
                section = %section.name,
                record = "AdminList",
                identities = identities.len()
            );
            return Ok(PolicyRecord::AdminList(AdminRecord { identities }));
        }
    }

    // Result fields are parsed before the presence check so that an
    // unrecognized token is reported as such, not as a missing field.
    let result_active = AuthResult::parse_result(section.get("ResultActive"))?;
    let result_inactive = AuthResult::parse_result(section.get("ResultInactive"))?;
    let result_any = AuthResult::parse_result(section.get("ResultAny"))?;

    let identity_raw = section.get("Identity").unwrap_or_default();
    let action_raw = section.get("Action").unwrap_or_default();

    if result_active.is_none() && result_inactive.is_none() && result_any.is_none() {
        return Err(ConvertError::InvalidConfiguration(format!(
            "section [{}] has none of ResultActive, ResultInactive, ResultAny",
            section.name
        )));
    }

    let identities = parse_identities(identity_raw)?;
    if identities.is_empty() {
        return Err(ConvertError::InvalidConfiguration(format!(
            "section [{}] is missing a non-empty Identity",
            section.name
        )));
    }

    let actions: Vec<String> = split_tokens(action_raw).map(str::to_string).collect();
    if actions.is_empty() {
        return Err(ConvertError::InvalidConfiguration(format!(
            "section [{}] is missing a non-empty Action",
            section.name
        )));
    }

    let return_value = match section.get("ReturnValue") {
        Some(raw) if !raw.is_empty() => Some(
            split_tokens(raw)
                .map(|entry| match entry.split_once('=') {
                    Some((key, value)) => (key.to_string(), value.to_string()),
                    None => (entry.to_string(), String::new()),
                })
                .collect(),
        ),
        _ => None,
    };

    debug!(
        event = "Parse",
        phase = "Section",
        section = %section.name,
        record = "Rule",
        identities = identities.len(),
        actions = actions.len()
    );

    Ok(PolicyRecord::Rule(RuleRecord {
        identities,
        actions,
        result_active,
        result_inactive,
        result_any,
        return_value,
    }))
}
