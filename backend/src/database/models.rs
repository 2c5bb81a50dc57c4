//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the hosted data API. Note that these may differ from API-specific
//! models.

use adapters::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PROFILES_TABLE: &str = "profiles";

/// Plan assigned to every profile created by bootstrap.
pub const DEFAULT_PLAN_TYPE: &str = "free";

/// Per-user metadata record, keyed 1:1 by the auth user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default = "default_plan_type")]
    pub plan_type: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

fn default_plan_type() -> String {
    DEFAULT_PLAN_TYPE.to_string()
}

/// Insert payload for a bootstrapped profile. Nullable columns are left out
/// so the table defaults apply.
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile<'a> {
    pub id: &'a UserId,
    pub is_active: bool,
    pub plan_type: &'a str,
}

impl<'a> NewProfile<'a> {
    pub fn for_user(id: &'a UserId) -> Self {
        Self {
            id,
            is_active: true,
            plan_type: DEFAULT_PLAN_TYPE,
        }
    }
}
