//! This module defines the command tree, the global options, and the glue that
//! turns a parsed command line into an [`ApiRequest`].
//!
//! Positional arguments of each command are declared with clap's derive API;
//! its flags are declared with [`FlagSet`] and copied into the command's
//! options structure by the binder.
pub mod branch;
pub mod issue;
pub mod pr;
pub mod repo;
pub mod user;

use std::ffi::OsString;

use anyhow::{bail, Result};
use clap::{Arg, ArgMatches, Args, Command, FromArgMatches};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use log::debug;

use crate::binder::{FlagSet, InvalidFlagSet};
use crate::ghcall::remote;
use crate::github::ApiRequest;
use crate::utils::RepoRef;

/// Options accepted by every command
#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    #[arg(long = "access-token", global = true, help = "GitHub access token")]
    pub access_token: Option<String>,

    #[arg(
        long = "base-uri",
        global = true,
        value_name = "URL",
        help = "GitHub API base URL, for GitHub Enterprise"
    )]
    pub base_uri: Option<String>,

    #[arg(
        long = "dry-run",
        global = true,
        help = "Print the request that would be sent instead of sending it"
    )]
    pub dry_run: bool,

    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,
}

/// Commands that take no positional arguments
#[derive(Args, Debug)]
pub struct NoArgs {}

/// Selects the repository a command acts on
#[derive(Args, Debug)]
pub struct RepoArgs {
    #[arg(
        short = 'R',
        long = "repo",
        value_name = "OWNER/NAME",
        help = "Repository, defaults to the origin remote of the current directory"
    )]
    pub repo: Option<String>,
}

impl RepoArgs {
    pub fn resolve(&self) -> Result<RepoRef> {
        match &self.repo {
            Some(repo) => repo.parse(),
            None => remote::infer_repo(),
        }
    }
}

/// A repository plus an issue or pull request number
#[derive(Args, Debug)]
pub struct NumberArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    #[arg(help = "Issue or pull request number")]
    pub number: u64,
}

/// A command that ends in exactly one API request
pub trait Leaf {
    fn name(&self) -> &'static str;

    /// The clap command with positional arguments and flags registered.
    fn command(&self, inherited: &[Arg]) -> Result<Command, InvalidFlagSet>;

    /// Builds the request from this command's matches.
    fn prepare(&self, matches: &ArgMatches) -> Result<ApiRequest>;
}

/// A [`Leaf`] with positional arguments `P` and options `O`
pub struct Endpoint<P, O> {
    name: &'static str,
    about: &'static str,
    flags: FlagSet<O>,
    build: fn(P, &O) -> Result<ApiRequest>,
}

impl<P, O: 'static> Endpoint<P, O> {
    pub fn new(
        name: &'static str,
        about: &'static str,
        flags: FlagSet<O>,
        build: fn(P, &O) -> Result<ApiRequest>,
    ) -> Endpoint<P, O> {
        Endpoint {
            name,
            about,
            flags,
            build,
        }
    }
}

impl<P, O> Leaf for Endpoint<P, O>
where
    P: Args,
    O: Default + std::fmt::Debug + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn command(&self, inherited: &[Arg]) -> Result<Command, InvalidFlagSet> {
        let command = P::augment_args(Command::new(self.name).about(self.about));
        self.flags.register(command, inherited)
    }

    fn prepare(&self, matches: &ArgMatches) -> Result<ApiRequest> {
        let args = P::from_arg_matches(matches)?;
        let mut options = O::default();
        self.flags.map(matches, &mut options)?;
        if let Some(flag) = self.flags.missing_required(matches)?.first() {
            bail!("missing required flag --{flag}");
        }
        debug!("{} options: {:?}", self.name, options);
        (self.build)(args, &options)
    }
}

/// A named group of leaf commands, e.g. `issue`
pub struct Group {
    name: &'static str,
    about: &'static str,
    leaves: Vec<Box<dyn Leaf>>,
}

impl Group {
    pub fn new(name: &'static str, about: &'static str) -> Group {
        Group {
            name,
            about,
            leaves: Vec::new(),
        }
    }

    pub fn leaf(mut self, leaf: impl Leaf + 'static) -> Group {
        self.leaves.push(Box::new(leaf));
        self
    }
}

/// What a parsed command line asks for
#[derive(Debug, PartialEq)]
pub enum Invocation {
    Version,
    Call(ApiRequest),
}

/// The full command tree
pub struct Cli {
    command: Command,
    groups: Vec<Group>,
}

/// Builds the command tree, validating the flags of every command.
///
/// Fails with every invalid flag set in the tree, not just the first.
pub fn build() -> Result<Cli, Vec<InvalidFlagSet>> {
    let root = GlobalOpts::augment_args(
        Command::new("ghcall")
            .version(clap::crate_version!())
            .about("Call the GitHub REST API from the command line")
            .subcommand_required(true)
            .arg_required_else_help(true),
    );
    let inherited: Vec<Arg> = root
        .get_arguments()
        .filter(|arg| arg.is_global_set())
        .cloned()
        .collect();

    let groups = vec![
        repo::group(),
        issue::group(),
        pr::group(),
        branch::group(),
        user::group(),
    ];

    let mut errors = Vec::new();
    let mut root = root.subcommand(Command::new("version").about("Print the ghcall version"));
    for group in &groups {
        let mut command = Command::new(group.name)
            .about(group.about)
            .subcommand_required(true)
            .arg_required_else_help(true);
        for leaf in &group.leaves {
            match leaf.command(&inherited) {
                Ok(leaf_command) => command = command.subcommand(leaf_command),
                Err(e) => errors.push(e),
            }
        }
        root = root.subcommand(command);
    }

    if errors.is_empty() {
        Ok(Cli {
            command: root,
            groups,
        })
    } else {
        Err(errors)
    }
}

impl Cli {
    /// Parses a full command line, program name included.
    pub fn try_parse_from<I, T>(&mut self, args: I) -> Result<(GlobalOpts, ArgMatches), clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.try_get_matches_from_mut(args)?;
        let opts = GlobalOpts::from_arg_matches(&matches)?;
        Ok((opts, matches))
    }

    pub fn prepare(&self, matches: &ArgMatches) -> Result<Invocation> {
        let Some((group_name, group_matches)) = matches.subcommand() else {
            bail!("No command given");
        };
        if group_name == "version" {
            return Ok(Invocation::Version);
        }

        let group = self
            .groups
            .iter()
            .find(|group| group.name == group_name)
            .ok_or_else(|| anyhow::anyhow!("Unknown command: {group_name}"))?;
        let Some((leaf_name, leaf_matches)) = group_matches.subcommand() else {
            bail!("No {group_name} command given");
        };
        let leaf = group
            .leaves
            .iter()
            .find(|leaf| leaf.name() == leaf_name)
            .ok_or_else(|| anyhow::anyhow!("Unknown command: {group_name} {leaf_name}"))?;

        debug!("Preparing {group_name} {leaf_name}");
        Ok(Invocation::Call(leaf.prepare(leaf_matches)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn prepare(args: &[&str]) -> Result<Invocation> {
        let mut cli = build().map_err(|errors| anyhow::anyhow!("{errors:?}"))?;
        let (_, matches) = cli.try_parse_from(std::iter::once("ghcall").chain(args.iter().copied()))?;
        cli.prepare(&matches)
    }

    pub(crate) fn request(args: &[&str]) -> ApiRequest {
        match prepare(args).unwrap() {
            Invocation::Call(request) => request,
            other => panic!("expected an API call, got {other:?}"),
        }
    }

    #[test]
    fn test_command_tree_is_valid() {
        let cli = build().unwrap_or_else(|errors| panic!("{errors:?}"));
        cli.command.clone().debug_assert();
        assert_eq!(cli.command.get_name(), "ghcall");
        assert_eq!(cli.command.get_author(), None);
    }

    #[test]
    fn test_version() {
        assert_eq!(prepare(&["version"]).unwrap(), Invocation::Version);
    }

    #[test]
    fn test_global_options() {
        let mut cli = build().unwrap_or_else(|errors| panic!("{errors:?}"));
        let (opts, _) = cli
            .try_parse_from([
                "ghcall",
                "user",
                "me",
                "--dry-run",
                "--access-token",
                "t0ken",
                "-vv",
            ])
            .unwrap();
        assert!(opts.dry_run);
        assert_eq!(opts.access_token.as_deref(), Some("t0ken"));
        assert_eq!(opts.verbose.log_level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_unknown_flag_is_a_parse_error() {
        let err = prepare(&["issue", "list", "-R", "o/r", "--colour", "red"]).unwrap_err();
        assert!(err.downcast_ref::<clap::Error>().is_some());
    }

    #[test]
    fn test_missing_required_flag() {
        let err = prepare(&["issue", "create", "-R", "o/r", "--body", "text"]).unwrap_err();
        assert_eq!(err.to_string(), "missing required flag --title");
    }

    #[test]
    fn test_invalid_repo_argument() {
        let err = prepare(&["repo", "get", "-R", "not-a-repo"]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid repository name: not-a-repo");
    }

    #[test]
    fn test_dry_run_request_shape() {
        let request = request(&["user", "get", "octocat"]);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"method": "GET", "route": "/users/octocat"})
        );
    }
}
