use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every way a `.pkla` document can fail to convert.
///
/// All failures are deterministic functions of the input; none are
/// transient. The driver reports them and exits, it never retries.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("unknown polkit identity type: '{0}'")]
    UnknownIdentityType(String),

    #[error("malformed identity token (expected type:name): '{0}'")]
    MalformedIdentityToken(String),

    #[error("unknown polkit result value: '{0}'")]
    UnknownResultValue(String),

    #[error("invalid input configuration: {0}")]
    InvalidConfiguration(String),

    #[error("globbing is only supported at the end of an action pattern: '{0}'")]
    UnsupportedGlob(String),

    #[error("automatic conversion of ReturnValue overrides is not supported")]
    UnsupportedFeature,
}
