//! Pull requests
//!
//! See: https://docs.github.com/en/rest/pulls/pulls?apiVersion=2022-11-28
use anyhow::Result;
use serde::Serialize;

use super::{repo_route, ApiRequest};
use crate::utils::RepoRef;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ListPullsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CreatePullOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainer_can_modify: Option<bool>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct MergePullOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_method: Option<String>,
}

fn pull_route(repo: &RepoRef, number: u64, rest: &[&str]) -> Result<String> {
    let number = number.to_string();
    let mut segments = vec!["pulls", number.as_str()];
    segments.extend_from_slice(rest);
    repo_route(repo, &segments)
}

pub fn list_pulls(repo: &RepoRef, options: &ListPullsOptions) -> Result<ApiRequest> {
    ApiRequest::get(repo_route(repo, &["pulls"])?).with_query(options)
}

pub fn get_pull(repo: &RepoRef, number: u64) -> Result<ApiRequest> {
    Ok(ApiRequest::get(pull_route(repo, number, &[])?))
}

pub fn create_pull(repo: &RepoRef, options: &CreatePullOptions) -> Result<ApiRequest> {
    ApiRequest::post(repo_route(repo, &["pulls"])?).with_body(options)
}

/// Merge a pull request
///
/// See: https://docs.github.com/en/rest/pulls/pulls?apiVersion=2022-11-28#merge-a-pull-request
pub fn merge_pull(repo: &RepoRef, number: u64, options: &MergePullOptions) -> Result<ApiRequest> {
    ApiRequest::put(pull_route(repo, number, &["merge"])?).with_body(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_pull_request() {
        let repo = "octo/hello".parse().unwrap();
        let request = merge_pull(
            &repo,
            42,
            &MergePullOptions {
                merge_method: Some("squash".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(request.method, http::Method::PUT);
        assert_eq!(request.route, "/repos/octo/hello/pulls/42/merge");
        assert_eq!(request.body, Some(json!({"merge_method": "squash"})));
    }

    #[test]
    fn test_list_pulls_without_filters_has_no_query() {
        let repo = "octo/hello".parse().unwrap();
        let request = list_pulls(&repo, &ListPullsOptions::default()).unwrap();
        assert_eq!(request.route, "/repos/octo/hello/pulls");
        assert_eq!(request.query, None);
    }
}
