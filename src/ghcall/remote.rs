//! Infers the repository to act on from the git remote of the current directory.
use std::process::Command;

use anyhow::{Context, Result};
use log::debug;
use url::Url;

use crate::utils::{split_repo_full_name, RepoRef};

const REMOTE: &str = "origin";

/// Resolve the `origin` remote of the current git checkout to a repository
pub fn infer_repo() -> Result<RepoRef> {
    let output = Command::new("git")
        .args(["remote", "get-url", REMOTE])
        .output()
        .context("Failed to run git")?;
    if !output.status.success() {
        anyhow::bail!(
            "Cannot determine the repository from the {REMOTE} remote; use --repo OWNER/NAME"
        );
    }
    let url = String::from_utf8(output.stdout)?;
    debug!("{REMOTE} remote is {}", url.trim());
    parse_remote_url(url.trim())
}

/// Parse `https://host/owner/name.git`, `ssh://git@host/owner/name.git` or
/// `git@host:owner/name.git` into a repository
pub fn parse_remote_url(remote: &str) -> Result<RepoRef> {
    let path = remote_path(remote)?;
    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, name) = split_repo_full_name(path)
        .with_context(|| format!("Unrecognized git remote URL: {remote}"))?;
    Ok(RepoRef { owner, name })
}

fn remote_path(remote: &str) -> Result<String> {
    if remote.contains("://") {
        let url = Url::parse(remote)
            .with_context(|| format!("Unrecognized git remote URL: {remote}"))?;
        return Ok(url.path().to_string());
    }
    // scp-like syntax, user@host:path
    match remote.split_once(':') {
        Some((host, path)) if !host.is_empty() && !host.contains('/') => Ok(path.to_string()),
        _ => anyhow::bail!("Unrecognized git remote URL: {remote}"),
    }
}
