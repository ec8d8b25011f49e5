//! Branches
//!
//! See: https://docs.github.com/en/rest/branches/branches?apiVersion=2022-11-28
use anyhow::Result;
use serde::Serialize;

use super::{repo_route, ApiRequest};
use crate::utils::RepoRef;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ListBranchesOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
}

pub fn list_branches(repo: &RepoRef, options: &ListBranchesOptions) -> Result<ApiRequest> {
    ApiRequest::get(repo_route(repo, &["branches"])?).with_query(options)
}

pub fn get_branch(repo: &RepoRef, branch: &str) -> Result<ApiRequest> {
    Ok(ApiRequest::get(repo_route(repo, &["branches", branch])?))
}
