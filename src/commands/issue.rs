use anyhow::Result;

use crate::binder::{Flag, FlagSet};
use crate::commands::{Endpoint, Group, NumberArgs, RepoArgs};
use crate::github::issues::{
    self, CommentOptions, CreateIssueOptions, EditIssueOptions, ListIssuesOptions,
};
use crate::github::ApiRequest;

pub fn group() -> Group {
    Group::new("issue", "Manage issues")
        .leaf(Endpoint::new(
            "list",
            "List issues in a repository",
            list_flags(),
            list,
        ))
        .leaf(Endpoint::new("get", "Get an issue", FlagSet::new(), get))
        .leaf(Endpoint::new(
            "create",
            "Create an issue",
            create_flags(),
            create,
        ))
        .leaf(Endpoint::new("edit", "Update an issue", edit_flags(), edit))
        .leaf(Endpoint::new(
            "comment",
            "Comment on an issue or pull request",
            FlagSet::<CommentOptions>::new().string(
                Flag::new("body")
                    .short('b')
                    .help("Comment text")
                    .required(),
                |o, v| o.body = Some(v),
            ),
            comment,
        ))
}

fn list_flags() -> FlagSet<ListIssuesOptions> {
    FlagSet::<ListIssuesOptions>::new()
        .string(
            Flag::new("milestone").help("Milestone number, `*` for any or `none`"),
            |o, v| o.milestone = Some(v),
        )
        .string(
            Flag::new("state")
                .short('s')
                .help("open, closed or all")
                .transform("state"),
            |o, v| o.state = Some(v),
        )
        .string(
            Flag::new("assignee")
                .short('a')
                .help("Username, `*` for any or `none`"),
            |o, v| o.assignee = Some(v),
        )
        .string(
            Flag::new("creator").help("Only issues created by this user"),
            |o, v| o.creator = Some(v),
        )
        .string(
            Flag::new("mentioned").help("Only issues mentioning this user"),
            |o, v| o.mentioned = Some(v),
        )
        .strings(
            Flag::new("labels")
                .short('l')
                .help("Label to filter by, repeat for more"),
            |o, v| o.labels = Some(v),
        )
        .string(
            Flag::new("sort").help("created, updated or comments"),
            |o, v| o.sort = Some(v),
        )
        .string(
            Flag::new("direction").help("asc or desc").transform("direction"),
            |o, v| o.direction = Some(v),
        )
        .string(
            Flag::new("since")
                .help("Only issues updated at or after this RFC 3339 timestamp")
                .transform("timestamp"),
            |o, v| o.since = Some(v),
        )
        .int(Flag::new("per-page").help("Results per page (max 100)"), |o, v| {
            o.per_page = Some(v)
        })
        .int(Flag::new("page").help("Page number of the results"), |o, v| {
            o.page = Some(v)
        })
}

fn create_flags() -> FlagSet<CreateIssueOptions> {
    FlagSet::<CreateIssueOptions>::new()
        .string(
            Flag::new("title")
                .short('t')
                .help("Issue title")
                .required(),
            |o, v| o.title = Some(v),
        )
        .string(Flag::new("body").short('b').help("Issue text"), |o, v| {
            o.body = Some(v)
        })
        .strings(
            Flag::new("assignees")
                .short('a')
                .help("User to assign, repeat for more"),
            |o, v| o.assignees = Some(v),
        )
        .strings(
            Flag::new("labels")
                .short('l')
                .help("Label to add, repeat for more"),
            |o, v| o.labels = Some(v),
        )
        .int(
            Flag::new("milestone").help("Number of the milestone to associate"),
            |o, v| o.milestone = Some(v),
        )
}

fn edit_flags() -> FlagSet<EditIssueOptions> {
    FlagSet::<EditIssueOptions>::new()
        .string(Flag::new("title").short('t').help("New title"), |o, v| {
            o.title = Some(v)
        })
        .string(Flag::new("body").short('b').help("New text"), |o, v| {
            o.body = Some(v)
        })
        .string(
            Flag::new("state")
                .short('s')
                .help("open or closed")
                .transform("state"),
            |o, v| o.state = Some(v),
        )
        .strings(
            Flag::new("assignees")
                .short('a')
                .help("Replace the assignees, repeat for more"),
            |o, v| o.assignees = Some(v),
        )
        .strings(
            Flag::new("labels")
                .short('l')
                .help("Replace the labels, repeat for more"),
            |o, v| o.labels = Some(v),
        )
        .int(Flag::new("milestone").help("Milestone number"), |o, v| {
            o.milestone = Some(v)
        })
}

fn list(args: RepoArgs, options: &ListIssuesOptions) -> Result<ApiRequest> {
    issues::list_issues(&args.resolve()?, options)
}

fn get(args: NumberArgs, _: &()) -> Result<ApiRequest> {
    issues::get_issue(&args.repo.resolve()?, args.number)
}

fn create(args: RepoArgs, options: &CreateIssueOptions) -> Result<ApiRequest> {
    issues::create_issue(&args.resolve()?, options)
}

fn edit(args: NumberArgs, options: &EditIssueOptions) -> Result<ApiRequest> {
    issues::edit_issue(&args.repo.resolve()?, args.number, options)
}

fn comment(args: NumberArgs, options: &CommentOptions) -> Result<ApiRequest> {
    issues::create_comment(&args.repo.resolve()?, args.number, options)
}

#[cfg(test)]
mod tests {
    use crate::commands::tests::{prepare, request};
    use serde_json::json;

    #[test]
    fn test_issue_list_maps_explicit_flags_only() {
        let request = request(&[
            "issue",
            "list",
            "-R",
            "octo/hello",
            "--state",
            "CLOSED",
            "-l",
            "bug",
            "--labels",
            "ui",
            "--per-page",
            "50",
        ]);
        assert_eq!(request.route, "/repos/octo/hello/issues");
        assert_eq!(
            request.query,
            Some(json!({"state": "closed", "labels": "bug,ui", "per_page": 50}))
        );
    }

    #[test]
    fn test_issue_list_keeps_comma_label_as_one_value() {
        let request = request(&["issue", "list", "-R", "o/r", "--labels", "bug,ui"]);
        assert_eq!(request.query, Some(json!({"labels": "bug,ui"})));
    }

    #[test]
    fn test_issue_list_since_is_normalized() {
        let request = request(&[
            "issue",
            "list",
            "-R",
            "o/r",
            "--since",
            "2024-01-01T09:00:00-05:00",
        ]);
        assert_eq!(request.query, Some(json!({"since": "2024-01-01T14:00:00Z"})));
    }

    #[test]
    fn test_issue_list_rejects_unknown_state() {
        let err = prepare(&["issue", "list", "-R", "o/r", "--state", "merged"]).unwrap_err();
        assert!(err.downcast_ref::<clap::Error>().is_some());
    }

    #[test]
    fn test_issue_create_body() {
        let request = request(&[
            "issue",
            "create",
            "-R",
            "o/r",
            "-t",
            "Crash",
            "-a",
            "alice",
            "-a",
            "bob",
            "--milestone",
            "2",
        ]);
        assert_eq!(request.route, "/repos/o/r/issues");
        assert_eq!(
            request.body,
            Some(json!({"title": "Crash", "assignees": ["alice", "bob"], "milestone": 2}))
        );
    }

    #[test]
    fn test_issue_edit_and_comment() {
        let edit = request(&["issue", "edit", "7", "-R", "o/r", "--state", "closed"]);
        assert_eq!(edit.method, http::Method::PATCH);
        assert_eq!(edit.route, "/repos/o/r/issues/7");
        assert_eq!(edit.body, Some(json!({"state": "closed"})));

        let comment = request(&["issue", "comment", "7", "-R", "o/r", "-b", "Fixed"]);
        assert_eq!(comment.method, http::Method::POST);
        assert_eq!(comment.route, "/repos/o/r/issues/7/comments");
        assert_eq!(comment.body, Some(json!({"body": "Fixed"})));
    }

    #[test]
    fn test_issue_get_requires_a_number() {
        assert!(prepare(&["issue", "get", "-R", "o/r"]).is_err());
        assert_eq!(
            request(&["issue", "get", "12", "-R", "o/r"]).route,
            "/repos/o/r/issues/12"
        );
    }
}
