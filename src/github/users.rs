//! Users
//!
//! See: https://docs.github.com/en/rest/users/users?apiVersion=2022-11-28
use anyhow::Result;

use super::{route, ApiRequest};

/// Get a GitHub user by username
pub fn get_user(username: &str) -> Result<ApiRequest> {
    Ok(ApiRequest::get(route(&["users", username])?))
}

/// Get the user the access token belongs to
pub fn get_authenticated_user() -> ApiRequest {
    ApiRequest::get("/user")
}
