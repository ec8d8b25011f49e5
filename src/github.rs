//! The GitHub API layer: option structures, the requests built from them, and
//! their execution through Octocrab.
pub mod branches;
pub mod issues;
pub mod pulls;
pub mod repos;
pub mod users;

use anyhow::Result;
use http::{HeaderName, Method};
use http_body_util::BodyExt;
use log::debug;
use octocrab::{Octocrab, OctocrabBuilder};
use serde::{Serialize, Serializer};
use serde_json::Value;
use url::Url;

use crate::utils::RepoRef;

/// One REST call: what `--dry-run` prints and what [`execute`] sends
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    #[serde(serialize_with = "serialize_method")]
    pub method: Method,
    pub route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: Method, route: String) -> ApiRequest {
        ApiRequest {
            method,
            route,
            query: None,
            body: None,
        }
    }

    pub fn get(route: impl Into<String>) -> ApiRequest {
        Self::new(Method::GET, route.into())
    }

    pub fn post(route: impl Into<String>) -> ApiRequest {
        Self::new(Method::POST, route.into())
    }

    pub fn patch(route: impl Into<String>) -> ApiRequest {
        Self::new(Method::PATCH, route.into())
    }

    pub fn put(route: impl Into<String>) -> ApiRequest {
        Self::new(Method::PUT, route.into())
    }

    pub fn delete(route: impl Into<String>) -> ApiRequest {
        Self::new(Method::DELETE, route.into())
    }

    /// Sets the query string. An options value with nothing set adds no query.
    pub fn with_query<Q: Serialize>(mut self, query: &Q) -> Result<ApiRequest> {
        let value = serde_json::to_value(query)?;
        self.query = match &value {
            Value::Object(map) if map.is_empty() => None,
            _ => Some(value),
        };
        Ok(self)
    }

    pub fn with_body<B: Serialize>(mut self, body: &B) -> Result<ApiRequest> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

fn serialize_method<S: Serializer>(method: &Method, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(method.as_str())
}

/// Sends string arrays in a query string as one comma-joined value.
pub(crate) fn comma_separated<S: Serializer>(
    values: &Option<Vec<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match values {
        Some(values) => serializer.serialize_str(&values.join(",")),
        None => serializer.serialize_none(),
    }
}

/// Joins `segments` into a route, percent-encoding each one.
///
/// Empty, `.` and `..` segments are rejected since they would address a
/// different resource.
pub(crate) fn route(segments: &[&str]) -> Result<String> {
    let mut url = Url::parse("https://api.github.com/")?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| anyhow::anyhow!("API URL cannot take a path"))?;
        path.clear();
        for segment in segments {
            if matches!(*segment, "" | "." | "..") {
                anyhow::bail!("Invalid path segment `{segment}`");
            }
            path.push(segment);
        }
    }
    Ok(url.path().to_string())
}

/// A route below `/repos/{owner}/{name}`
pub(crate) fn repo_route(repo: &RepoRef, rest: &[&str]) -> Result<String> {
    let mut segments = vec!["repos", repo.owner.as_str(), repo.name.as_str()];
    segments.extend_from_slice(rest);
    route(&segments)
}

/// Build an Octocrab client for the REST API
pub fn client(access_token: &str, base_uri: Option<&str>) -> Result<Octocrab> {
    let mut builder = OctocrabBuilder::default()
        .personal_token(access_token.to_owned())
        .add_header(
            HeaderName::from_static("accept"),
            "application/vnd.github+json".to_string(),
        )
        .add_header(
            HeaderName::from_static("x-github-api-version"),
            "2022-11-28".to_string(),
        );
    if let Some(base_uri) = base_uri {
        debug!("Using API base URI {base_uri}");
        builder = builder.base_uri(base_uri)?;
    }
    Ok(builder.build()?)
}

/// Send a request and return the decoded response body, if there is one.
///
/// PUT and DELETE are read raw since GitHub answers many of them with
/// `204 No Content`.
pub async fn execute(octocrab: &Octocrab, request: &ApiRequest) -> Result<Option<Value>> {
    debug!("{} {}", request.method, request.route);
    let route = request.route.as_str();

    let method = &request.method;
    if *method == Method::GET {
        return Ok(Some(octocrab.get(route, request.query.as_ref()).await?));
    }
    if *method == Method::POST {
        return Ok(Some(octocrab.post(route, request.body.as_ref()).await?));
    }
    if *method == Method::PATCH {
        return Ok(Some(octocrab.patch(route, request.body.as_ref()).await?));
    }

    let response = if *method == Method::PUT {
        octocrab._put(route, request.body.as_ref()).await?
    } else if *method == Method::DELETE {
        octocrab._delete(route, request.body.as_ref()).await?
    } else {
        return Err(anyhow::anyhow!("Unsupported method {method}"));
    };

    let status = response.status();
    let body = response.into_body().collect().await?.to_bytes();
    debug!("{} {} -> {status}", request.method, request.route);

    if !status.is_success() {
        return Err(anyhow::anyhow!(
            "GitHub responded with {status}: {}",
            String::from_utf8_lossy(&body)
        ));
    }
    if body.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(&body)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize, Default)]
    struct Query {
        #[serde(skip_serializing_if = "Option::is_none")]
        state: Option<String>,
        #[serde(
            serialize_with = "comma_separated",
            skip_serializing_if = "Option::is_none"
        )]
        labels: Option<Vec<String>>,
    }

    #[test]
    fn test_empty_query_is_dropped() {
        let request = ApiRequest::get("/user/repos")
            .with_query(&Query::default())
            .unwrap();
        assert_eq!(request.query, None);
    }

    #[test]
    fn test_arrays_are_comma_joined_in_queries() {
        let query = Query {
            state: Some("open".to_string()),
            labels: Some(vec!["bug".to_string(), "ui".to_string()]),
        };
        let request = ApiRequest::get("/repos/o/r/issues")
            .with_query(&query)
            .unwrap();
        assert_eq!(request.query, Some(json!({"state": "open", "labels": "bug,ui"})));
    }

    #[test]
    fn test_request_serializes_for_dry_run() {
        let request = ApiRequest::delete("/repos/o/r");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"method": "DELETE", "route": "/repos/o/r"})
        );

        let request = ApiRequest::post("/user/repos")
            .with_body(&json!({"name": "r"}))
            .unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"method": "POST", "route": "/user/repos", "body": {"name": "r"}})
        );
    }

    #[test]
    fn test_route_segments_are_percent_encoded() {
        assert_eq!(
            route(&["repos", "o", "r", "branches", "feature/x?y#z"]).unwrap(),
            "/repos/o/r/branches/feature%2Fx%3Fy%23z"
        );
        assert_eq!(route(&["users", "a b%"]).unwrap(), "/users/a%20b%25");
    }

    #[test]
    fn test_route_rejects_dot_segments() {
        for segment in ["..", ".", ""] {
            let err = route(&["users", segment]).unwrap_err();
            assert_eq!(err.to_string(), format!("Invalid path segment `{segment}`"));
        }
        let repo: RepoRef = "../x".parse().unwrap();
        assert!(repo_route(&repo, &[]).is_err());
    }

    #[tokio::test]
    async fn test_client_rejects_invalid_base_uri() {
        assert!(client("token", Some("not a uri")).is_err());
        assert!(client("token", Some("https://github.example.com/api/v3")).is_ok());
    }
}
