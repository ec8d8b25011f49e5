use anyhow::Result;
use clap::Args;

use crate::binder::{Flag, FlagSet};
use crate::commands::{Endpoint, Group, RepoArgs};
use crate::github::branches::{self, ListBranchesOptions};
use crate::github::ApiRequest;

#[derive(Args, Debug)]
pub struct BranchArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    #[arg(help = "Branch name")]
    pub branch: String,
}

pub fn group() -> Group {
    Group::new("branch", "Inspect branches")
        .leaf(Endpoint::new(
            "list",
            "List branches",
            FlagSet::<ListBranchesOptions>::new()
                .bool(
                    Flag::new("protected").help("Only protected branches, or only unprotected with =false"),
                    |o, v| o.protected = Some(v),
                )
                .int(Flag::new("per-page").help("Results per page (max 100)"), |o, v| {
                    o.per_page = Some(v)
                })
                .int(Flag::new("page").help("Page number of the results"), |o, v| {
                    o.page = Some(v)
                }),
            list,
        ))
        .leaf(Endpoint::new("get", "Get a branch", FlagSet::new(), get))
}

fn list(args: RepoArgs, options: &ListBranchesOptions) -> Result<ApiRequest> {
    branches::list_branches(&args.resolve()?, options)
}

fn get(args: BranchArgs, _: &()) -> Result<ApiRequest> {
    branches::get_branch(&args.repo.resolve()?, &args.branch)
}

#[cfg(test)]
mod tests {
    use crate::commands::tests::request;
    use serde_json::json;

    #[test]
    fn test_branch_list_protected() {
        let request = request(&["branch", "list", "-R", "o/r", "--protected"]);
        assert_eq!(request.route, "/repos/o/r/branches");
        assert_eq!(request.query, Some(json!({"protected": true})));
    }

    #[test]
    fn test_branch_get() {
        let request = request(&["branch", "get", "main", "-R", "o/r"]);
        assert_eq!(request.route, "/repos/o/r/branches/main");
        assert_eq!(request.query, None);
    }
}
