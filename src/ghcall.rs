//! This module defines the code that executes ghcall commands.
pub mod config;
pub mod remote;

use std::env::VarError;
use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::Result;
use clap::ArgMatches;
use log::{debug, error};
use serde::Serialize;

use crate::commands::{self, Cli, GlobalOpts, Invocation};
use crate::github;
use config::Config;

/// A context object that holds the settings a command runs with
#[derive(Debug, Default, PartialEq)]
pub struct Context {
    pub access_token: Option<String>,
    pub base_uri: Option<String>,
    pub dry_run: bool,
}

/// Build a context object from the command-line arguments, the environment and
/// the configuration file, in that order of precedence
fn build_context(opts: &GlobalOpts) -> Result<Context> {
    let config = config::load()?;
    Ok(resolve_context(opts, github_token_env_var()?, config))
}

fn resolve_context(opts: &GlobalOpts, env_token: Option<String>, config: Config) -> Context {
    Context {
        access_token: opts
            .access_token
            .clone()
            .or(env_token)
            .or(config.access_token),
        base_uri: opts.base_uri.clone().or(config.base_uri),
        dry_run: opts.dry_run,
    }
}

fn github_token_env_var() -> Result<Option<String>> {
    non_empty_token(std::env::var("GITHUB_TOKEN"))
}

/// A set but empty variable counts as no token
fn non_empty_token(var: Result<String, VarError>) -> Result<Option<String>> {
    match var {
        Ok(access_token) if access_token.is_empty() => Ok(None),
        Ok(access_token) => Ok(Some(access_token)),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(anyhow::anyhow!(e)),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: &Cli, opts: &GlobalOpts, matches: &ArgMatches) -> Result<()> {
    let request = match cli.prepare(matches)? {
        Invocation::Version => {
            println!("ghcall version {}", clap::crate_version!());
            return Ok(());
        }
        Invocation::Call(request) => request,
    };

    let context = build_context(opts)?;
    if context.dry_run {
        debug!("Dry run, not sending {} {}", request.method, request.route);
        return print_json(&request);
    }

    let Some(access_token) = context.access_token.as_deref() else {
        return Err(anyhow::anyhow!(
            "No access token found; use --access-token, set GITHUB_TOKEN, or set access_token in {}",
            config::display_path()
        ));
    };
    let octocrab = github::client(access_token, context.base_uri.as_deref())?;

    if let Some(body) = github::execute(&octocrab, &request).await? {
        print_json(&body)?;
    }
    Ok(())
}

/// Run the ghcall CLI
pub async fn cli(args: impl IntoIterator<Item = OsString>) -> ExitCode {
    let mut cli = match commands::build() {
        Ok(cli) => cli,
        Err(invalid) => {
            for e in &invalid {
                eprintln!("ghcall: {e}");
            }
            return ExitCode::from(2);
        }
    };

    let (opts, matches) = match cli.try_parse_from(args) {
        Ok(parsed) => parsed,
        Err(e) => e.exit(),
    };

    env_logger::builder()
        .filter_level(opts.verbose.log_level_filter())
        .target(env_logger::Target::Stderr)
        .init();

    match run(&cli, &opts, &matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if log::log_enabled!(log::Level::Error) {
                error!("{e:#}");
            } else {
                eprintln!("ghcall: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
