use anyhow::Result;
use clap::Args;

use crate::binder::FlagSet;
use crate::commands::{Endpoint, Group, NoArgs};
use crate::github::{users, ApiRequest};

#[derive(Args, Debug)]
pub struct UserArgs {
    #[arg(help = "GitHub username")]
    pub username: String,
}

pub fn group() -> Group {
    Group::new("user", "Look up users")
        .leaf(Endpoint::new("get", "Get a user", FlagSet::new(), get))
        .leaf(Endpoint::new(
            "me",
            "Get the user the access token belongs to",
            FlagSet::new(),
            me,
        ))
}

fn get(args: UserArgs, _: &()) -> Result<ApiRequest> {
    users::get_user(&args.username)
}

fn me(_: NoArgs, _: &()) -> Result<ApiRequest> {
    Ok(users::get_authenticated_user())
}
