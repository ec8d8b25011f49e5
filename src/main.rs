mod binder;
mod commands;
mod ghcall;
mod github;
mod utils;

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    ghcall::cli(std::env::args_os()).await
}
