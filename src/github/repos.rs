//! Repositories
//!
//! See: https://docs.github.com/en/rest/repos/repos?apiVersion=2022-11-28
use anyhow::Result;
use serde::Serialize;

use super::{repo_route, route, ApiRequest};
use crate::utils::RepoRef;

/// Query for listing repositories of the authenticated user, another user, or
/// an organization. `user` and `org` select the route and are not sent.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ListReposOptions {
    #[serde(skip)]
    pub user: Option<String>,
    #[serde(skip)]
    pub org: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
}

/// Body for creating a repository. `org` selects the route and is not sent.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CreateRepoOptions {
    #[serde(skip)]
    pub org: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_issues: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_init: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gitignore_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_template: Option<String>,
}

pub fn get_repo(repo: &RepoRef) -> Result<ApiRequest> {
    Ok(ApiRequest::get(repo_route(repo, &[])?))
}

pub fn delete_repo(repo: &RepoRef) -> Result<ApiRequest> {
    Ok(ApiRequest::delete(repo_route(repo, &[])?))
}

pub fn list_repos(options: &ListReposOptions) -> Result<ApiRequest> {
    let route = match (&options.user, &options.org) {
        (Some(_), Some(_)) => anyhow::bail!("--user and --org cannot be combined"),
        (Some(user), None) => route(&["users", user.as_str(), "repos"])?,
        (None, Some(org)) => route(&["orgs", org.as_str(), "repos"])?,
        (None, None) => "/user/repos".to_string(),
    };
    ApiRequest::get(route).with_query(options)
}

pub fn create_repo(options: &CreateRepoOptions) -> Result<ApiRequest> {
    let route = match &options.org {
        Some(org) => route(&["orgs", org.as_str(), "repos"])?,
        None => "/user/repos".to_string(),
    };
    ApiRequest::post(route).with_body(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_repos_routes() {
        let mine = list_repos(&ListReposOptions::default()).unwrap();
        assert_eq!(mine.route, "/user/repos");
        assert_eq!(mine.query, None);

        let theirs = list_repos(&ListReposOptions {
            user: Some("octocat".to_string()),
            kind: Some("owner".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(theirs.route, "/users/octocat/repos");
        assert_eq!(theirs.query, Some(json!({"type": "owner"})));

        let org = list_repos(&ListReposOptions {
            org: Some("gitsudo-io".to_string()),
            per_page: Some(100),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(org.route, "/orgs/gitsudo-io/repos");
        assert_eq!(org.query, Some(json!({"per_page": 100})));
    }

    #[test]
    fn test_list_repos_rejects_user_and_org() {
        let err = list_repos(&ListReposOptions {
            user: Some("a".to_string()),
            org: Some("b".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "--user and --org cannot be combined");
    }

    #[test]
    fn test_create_repo_body_omits_route_fields() {
        let request = create_repo(&CreateRepoOptions {
            org: Some("gitsudo-io".to_string()),
            name: Some("ghcall".to_string()),
            private: Some(false),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(request.route, "/orgs/gitsudo-io/repos");
        assert_eq!(request.body, Some(json!({"name": "ghcall", "private": false})));
    }
}
