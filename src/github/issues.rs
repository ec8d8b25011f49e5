//! Issues and issue comments
//!
//! See: https://docs.github.com/en/rest/issues/issues?apiVersion=2022-11-28
use anyhow::Result;
use serde::Serialize;

use super::{comma_separated, repo_route, ApiRequest};
use crate::utils::RepoRef;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ListIssuesOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentioned: Option<String>,
    #[serde(
        serialize_with = "comma_separated",
        skip_serializing_if = "Option::is_none"
    )]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CreateIssueOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<i64>,
}

/// Body for updating an issue. Only the fields that are set are changed.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct EditIssueOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<i64>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CommentOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

fn issue_route(repo: &RepoRef, number: u64, rest: &[&str]) -> Result<String> {
    let number = number.to_string();
    let mut segments = vec!["issues", number.as_str()];
    segments.extend_from_slice(rest);
    repo_route(repo, &segments)
}

pub fn list_issues(repo: &RepoRef, options: &ListIssuesOptions) -> Result<ApiRequest> {
    ApiRequest::get(repo_route(repo, &["issues"])?).with_query(options)
}

pub fn get_issue(repo: &RepoRef, number: u64) -> Result<ApiRequest> {
    Ok(ApiRequest::get(issue_route(repo, number, &[])?))
}

pub fn create_issue(repo: &RepoRef, options: &CreateIssueOptions) -> Result<ApiRequest> {
    ApiRequest::post(repo_route(repo, &["issues"])?).with_body(options)
}

pub fn edit_issue(repo: &RepoRef, number: u64, options: &EditIssueOptions) -> Result<ApiRequest> {
    if *options == EditIssueOptions::default() {
        anyhow::bail!("Nothing to change on issue #{number}");
    }
    ApiRequest::patch(issue_route(repo, number, &[])?).with_body(options)
}

pub fn create_comment(repo: &RepoRef, number: u64, options: &CommentOptions) -> Result<ApiRequest> {
    ApiRequest::post(issue_route(repo, number, &["comments"])?).with_body(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repo() -> RepoRef {
        "octo/hello".parse().unwrap()
    }

    #[test]
    fn test_list_issues_query() {
        let request = list_issues(
            &repo(),
            &ListIssuesOptions {
                state: Some("all".to_string()),
                labels: Some(vec!["bug".to_string(), "good first issue".to_string()]),
                page: Some(2),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(request.route, "/repos/octo/hello/issues");
        assert_eq!(
            request.query,
            Some(json!({"state": "all", "labels": "bug,good first issue", "page": 2}))
        );
    }

    #[test]
    fn test_create_issue_sends_arrays_as_arrays() {
        let request = create_issue(
            &repo(),
            &CreateIssueOptions {
                title: Some("Crash on start".to_string()),
                labels: Some(vec!["bug".to_string()]),
                milestone: Some(3),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            request.body,
            Some(json!({"title": "Crash on start", "labels": ["bug"], "milestone": 3}))
        );
    }

    #[test]
    fn test_edit_issue_requires_a_change() {
        let err = edit_issue(&repo(), 7, &EditIssueOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "Nothing to change on issue #7");

        let request = edit_issue(
            &repo(),
            7,
            &EditIssueOptions {
                state: Some("closed".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(request.method, http::Method::PATCH);
        assert_eq!(request.route, "/repos/octo/hello/issues/7");
        assert_eq!(request.body, Some(json!({"state": "closed"})));
    }

    #[test]
    fn test_comment_route() {
        let request = create_comment(
            &repo(),
            12,
            &CommentOptions {
                body: Some("LGTM".to_string()),
            },
        )
        .unwrap();
        assert_eq!(request.route, "/repos/octo/hello/issues/12/comments");
    }
}
