use anyhow::Result;

use crate::binder::{Flag, FlagSet};
use crate::commands::{Endpoint, Group, NoArgs, RepoArgs};
use crate::github::repos::{self, CreateRepoOptions, ListReposOptions};
use crate::github::ApiRequest;

pub fn group() -> Group {
    Group::new("repo", "Manage repositories")
        .leaf(Endpoint::new("get", "Get a repository", FlagSet::new(), get))
        .leaf(Endpoint::new(
            "list",
            "List repositories of the authenticated user, a user, or an organization",
            list_flags(),
            list,
        ))
        .leaf(Endpoint::new(
            "create",
            "Create a repository",
            create_flags(),
            create,
        ))
        .leaf(Endpoint::new(
            "delete",
            "Delete a repository",
            FlagSet::new(),
            delete,
        ))
}

fn list_flags() -> FlagSet<ListReposOptions> {
    FlagSet::<ListReposOptions>::new()
        .string(
            Flag::new("user")
                .short('u')
                .help("List the public repositories of this user"),
            |o, v| o.user = Some(v),
        )
        .string(
            Flag::new("org")
                .short('o')
                .help("List the repositories of this organization"),
            |o, v| o.org = Some(v),
        )
        .string(
            Flag::new("visibility")
                .help("all, public or private")
                .transform("visibility"),
            |o, v| o.visibility = Some(v),
        )
        .string(
            Flag::new("affiliation")
                .help("Comma-separated list of owner, collaborator, organization_member"),
            |o, v| o.affiliation = Some(v),
        )
        .string(
            Flag::new("type").help("all, owner, public, private, member, forks or sources"),
            |o, v| o.kind = Some(v),
        )
        .string(
            Flag::new("sort").help("created, updated, pushed or full_name"),
            |o, v| o.sort = Some(v),
        )
        .string(
            Flag::new("direction").help("asc or desc").transform("direction"),
            |o, v| o.direction = Some(v),
        )
        .int(Flag::new("per-page").help("Results per page (max 100)"), |o, v| {
            o.per_page = Some(v)
        })
        .int(Flag::new("page").help("Page number of the results"), |o, v| {
            o.page = Some(v)
        })
}

fn create_flags() -> FlagSet<CreateRepoOptions> {
    FlagSet::<CreateRepoOptions>::new()
        .string(
            Flag::new("org")
                .short('o')
                .help("Create the repository in this organization"),
            |o, v| o.org = Some(v),
        )
        .string(
            Flag::new("name")
                .short('n')
                .help("Name of the repository")
                .required(),
            |o, v| o.name = Some(v),
        )
        .string(
            Flag::new("description")
                .short('d')
                .help("A short description of the repository"),
            |o, v| o.description = Some(v),
        )
        .string(
            Flag::new("homepage").help("A URL with more information about the repository"),
            |o, v| o.homepage = Some(v),
        )
        .bool(
            Flag::new("private")
                .short('p')
                .help("Whether the repository is private"),
            |o, v| o.private = Some(v),
        )
        .bool(Flag::new("has-issues").help("Enable issues"), |o, v| {
            o.has_issues = Some(v)
        })
        .bool(Flag::new("has-wiki").help("Enable the wiki"), |o, v| {
            o.has_wiki = Some(v)
        })
        .bool(
            Flag::new("auto-init").help("Create an initial commit with an empty README"),
            |o, v| o.auto_init = Some(v),
        )
        .string(
            Flag::new("gitignore-template").help("Name of the .gitignore template to apply"),
            |o, v| o.gitignore_template = Some(v),
        )
        .string(
            Flag::new("license-template").help("License keyword, e.g. mit or mpl-2.0"),
            |o, v| o.license_template = Some(v),
        )
}

fn get(args: RepoArgs, _: &()) -> Result<ApiRequest> {
    repos::get_repo(&args.resolve()?)
}

fn list(_: NoArgs, options: &ListReposOptions) -> Result<ApiRequest> {
    repos::list_repos(options)
}

fn create(_: NoArgs, options: &CreateRepoOptions) -> Result<ApiRequest> {
    repos::create_repo(options)
}

fn delete(args: RepoArgs, _: &()) -> Result<ApiRequest> {
    repos::delete_repo(&args.resolve()?)
}

#[cfg(test)]
mod tests {
    use crate::commands::tests::request;
    use serde_json::json;

    #[test]
    fn test_repo_get_and_delete() {
        let get = request(&["repo", "get", "-R", "gitsudo-io/ghcall"]);
        assert_eq!(get.method, http::Method::GET);
        assert_eq!(get.route, "/repos/gitsudo-io/ghcall");

        let delete = request(&["repo", "delete", "--repo", "gitsudo-io/ghcall"]);
        assert_eq!(delete.method, http::Method::DELETE);
        assert_eq!(delete.route, "/repos/gitsudo-io/ghcall");
    }

    #[test]
    fn test_repo_list_maps_flags_to_query() {
        let request = request(&[
            "repo",
            "list",
            "--org",
            "gitsudo-io",
            "--type",
            "forks",
            "--direction",
            "DESC",
            "--per-page",
            "50",
        ]);
        assert_eq!(request.route, "/orgs/gitsudo-io/repos");
        assert_eq!(
            request.query,
            Some(json!({"type": "forks", "direction": "desc", "per_page": 50}))
        );
    }

    #[test]
    fn test_repo_create_body() {
        let request = request(&[
            "repo",
            "create",
            "-n",
            "ghcall",
            "--private",
            "--auto-init=false",
            "-d",
            "A GitHub API client",
        ]);
        assert_eq!(request.method, http::Method::POST);
        assert_eq!(request.route, "/user/repos");
        assert_eq!(
            request.body,
            Some(json!({
                "name": "ghcall",
                "description": "A GitHub API client",
                "private": true,
                "auto_init": false
            }))
        );
    }
}
