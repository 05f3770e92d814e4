//! Public intake configuration.

use serde::{Deserialize, Serialize};

/// How structured ticket labels (priority/status/type) are validated on
/// admin submission.
///
/// The historical contract is lenient: an unrecognized label resolves to
/// unset instead of rejecting the request. Strict mode rejects with an
/// invalid-argument failure. Lenient stays the default so existing intake
/// forms keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    #[default]
    Lenient,
    Strict,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IntakeConfig {
    /// Label validation mode for structured ticket fields.
    #[serde(default)]
    pub validation: ValidationMode,
}
