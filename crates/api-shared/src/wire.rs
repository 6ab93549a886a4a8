//! JSON wire types for the MedPlat HTTP API.
//!
//! Field names mirror the JSON the frontend already consumes, so these structs are kept
//! separate from the core domain types and filled in at the API boundary.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Default for the `region` query parameter.
pub const AUTO_REGION_PARAM: &str = "auto";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Query parameters of `GET /api/guidelines`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GuidelinesQuery {
    /// Region display name (for example `Denmark`), or `auto` to detect it from the request.
    #[serde(default = "default_region")]
    #[param(default = "auto")]
    pub region: String,
    /// Free-text clinical topic echoed back in the response.
    #[serde(default)]
    pub topic: String,
}

fn default_region() -> String {
    AUTO_REGION_PARAM.to_string()
}

impl Default for GuidelinesQuery {
    fn default() -> Self {
        Self {
            region: default_region(),
            topic: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GuidelineEntryRes {
    pub society: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GuidelinesRes {
    pub ok: bool,
    pub region: String,
    pub topic: String,
    pub guidelines: Vec<GuidelineEntryRes>,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RegionRes {
    pub ok: bool,
    /// Lower-case region code, or `global` when it could not be detected.
    pub region: String,
    /// Guideline-table region name for the code, when the deployment maps it.
    pub display_name: Option<String>,
}

/// Body of every failed API call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub ok: bool,
    pub error: String,
}

impl ErrorRes {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}
