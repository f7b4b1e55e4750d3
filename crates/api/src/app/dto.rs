use serde::Deserialize;

use studio_auth::{Profile, Role};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct NavigationQuery {
    pub path: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListProfilesQuery {
    pub role: Option<String>,
    pub email: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExplainQuery {
    pub capability: Option<String>,
    pub role: Option<String>,
}

// -------------------------
// Response mapping
// -------------------------

pub fn profile_to_json(p: &Profile) -> serde_json::Value {
    serde_json::json!({
        "id": p.id.to_string(),
        "role": p.role_name(),
        "email": p.email,
        "full_name": p.full_name,
    })
}

pub fn parse_role(s: &str) -> Result<Role, axum::response::Response> {
    s.parse::<Role>().map_err(|_| {
        errors::json_error(
            axum::http::StatusCode::BAD_REQUEST,
            "invalid_role",
            "role must be one of: admin, staff, teacher, parent, student",
        )
    })
}
