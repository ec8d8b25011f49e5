use std::fmt;
use std::str::FromStr;

use anyhow::Result;

/// A repository addressed as `owner/name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (owner, name) = split_repo_full_name(s)?;
        Ok(RepoRef { owner, name })
    }
}

pub fn split_repo_full_name(repo_full_name: &str) -> Result<(String, String)> {
    let v: Vec<&str> = repo_full_name.split('/').collect();
    if v.len() != 2 || v.iter().any(|part| part.is_empty()) {
        return Err(anyhow::anyhow!(
            "Invalid repository name: {}",
            repo_full_name
        ));
    }
    Ok((v[0].to_string(), v[1].to_string()))
}
