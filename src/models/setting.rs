// Site setting types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One key-value entry of the site settings store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub id: String,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<String>,
}

/// Body for `PATCH /settings/{key}`
#[derive(Debug, Clone, Serialize)]
pub struct SettingValueInput {
    pub value: String,
}

/// Body for the bulk `PATCH /settings`
#[derive(Debug, Clone, Serialize)]
pub struct BulkSettingsInput {
    pub settings: HashMap<String, String>,
}
