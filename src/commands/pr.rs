use anyhow::Result;

use crate::binder::{Flag, FlagSet};
use crate::commands::{Endpoint, Group, NumberArgs, RepoArgs};
use crate::github::pulls::{self, CreatePullOptions, ListPullsOptions, MergePullOptions};
use crate::github::ApiRequest;

pub fn group() -> Group {
    Group::new("pr", "Manage pull requests")
        .leaf(Endpoint::new(
            "list",
            "List pull requests in a repository",
            list_flags(),
            list,
        ))
        .leaf(Endpoint::new("get", "Get a pull request", FlagSet::new(), get))
        .leaf(Endpoint::new(
            "create",
            "Open a pull request",
            create_flags(),
            create,
        ))
        .leaf(Endpoint::new(
            "merge",
            "Merge a pull request",
            merge_flags(),
            merge,
        ))
}

fn list_flags() -> FlagSet<ListPullsOptions> {
    FlagSet::<ListPullsOptions>::new()
        .string(
            Flag::new("state")
                .short('s')
                .help("open, closed or all")
                .transform("state"),
            |o, v| o.state = Some(v),
        )
        .string(
            Flag::new("head").help("Filter by head as user:ref-name"),
            |o, v| o.head = Some(v),
        )
        .string(Flag::new("base").help("Filter by base branch"), |o, v| {
            o.base = Some(v)
        })
        .string(
            Flag::new("sort").help("created, updated, popularity or long-running"),
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

fn create_flags() -> FlagSet<CreatePullOptions> {
    FlagSet::<CreatePullOptions>::new()
        .string(
            Flag::new("title")
                .short('t')
                .help("Pull request title")
                .required(),
            |o, v| o.title = Some(v),
        )
        .string(
            Flag::new("head")
                .help("Branch with the changes, as branch or user:branch")
                .required(),
            |o, v| o.head = Some(v),
        )
        .string(
            Flag::new("base")
                .help("Branch the changes are pulled into")
                .required(),
            |o, v| o.base = Some(v),
        )
        .string(Flag::new("body").short('b').help("Description"), |o, v| {
            o.body = Some(v)
        })
        .bool(
            Flag::new("draft").short('d').help("Open as a draft"),
            |o, v| o.draft = Some(v),
        )
        .bool(
            Flag::new("maintainer-can-modify").help("Allow maintainers to push to the head branch"),
            |o, v| o.maintainer_can_modify = Some(v),
        )
}

fn merge_flags() -> FlagSet<MergePullOptions> {
    FlagSet::<MergePullOptions>::new()
        .string(
            Flag::new("commit-title").help("Title of the merge commit"),
            |o, v| o.commit_title = Some(v),
        )
        .string(
            Flag::new("commit-message").help("Extra detail for the merge commit"),
            |o, v| o.commit_message = Some(v),
        )
        .string(
            Flag::new("sha").help("SHA the pull request head must match"),
            |o, v| o.sha = Some(v),
        )
        .string(
            Flag::new("merge-method")
                .short('m')
                .help("merge, squash or rebase")
                .transform("merge-method"),
            |o, v| o.merge_method = Some(v),
        )
}

fn list(args: RepoArgs, options: &ListPullsOptions) -> Result<ApiRequest> {
    pulls::list_pulls(&args.resolve()?, options)
}

fn get(args: NumberArgs, _: &()) -> Result<ApiRequest> {
    pulls::get_pull(&args.repo.resolve()?, args.number)
}

fn create(args: RepoArgs, options: &CreatePullOptions) -> Result<ApiRequest> {
    pulls::create_pull(&args.resolve()?, options)
}

fn merge(args: NumberArgs, options: &MergePullOptions) -> Result<ApiRequest> {
    pulls::merge_pull(&args.repo.resolve()?, args.number, options)
}
