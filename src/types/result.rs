//! The six-valued authorization outcome of the legacy format.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display as StrumDisplay, EnumString};

use crate::error::ConvertError;

/// An authorization outcome. The legacy encoding is the lowercase token
/// (`auth_admin_keep`), the JavaScript encoding is the qualified constant
/// (`polkit.Result.AUTH_ADMIN_KEEP`).
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, StrumDisplay, EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum AuthResult {
    Yes,
    No,
    AuthSelf,
    AuthSelfKeep,
    AuthAdmin,
    AuthAdminKeep,
}

impl AuthResult {
    /// Parse an optional legacy result token. Absence is not an error, only
    /// a present-but-unrecognized token is.
    pub fn parse_result(token: Option<&str>) -> Result<Option<Self>, ConvertError> {
        match token {
            None => Ok(None),
            Some(t) => AuthResult::from_str(t)
                .map(Some)
                .map_err(|_| ConvertError::UnknownResultValue(t.to_string())),
        }
    }

    /// The qualified constant understood by the JavaScript rules engine.
    /// Total; every variant has one.
    pub fn js_constant(&self) -> &'static str {
        match self {
            AuthResult::Yes => "polkit.Result.YES",
            AuthResult::No => "polkit.Result.NO",
            AuthResult::AuthSelf => "polkit.Result.AUTH_SELF",
            AuthResult::AuthSelfKeep => "polkit.Result.AUTH_SELF_KEEP",
            AuthResult::AuthAdmin => "polkit.Result.AUTH_ADMIN",
            AuthResult::AuthAdminKeep => "polkit.Result.AUTH_ADMIN_KEEP",
        }
    }
}
