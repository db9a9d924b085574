//! Error body returned by the Jobs API

use serde::{Deserialize, Serialize};

/// Body of a non-2xx Jobs API response
///
/// e.g. `{"error_code": "INVALID_PARAMETER_VALUE", "message": "..."}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
