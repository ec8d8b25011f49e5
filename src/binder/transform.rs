//! Named value transforms for string flags.
//!
//! A flag declares a transform by name; registration installs it as the
//! flag's value parser, so values are checked and normalized while clap
//! parses the command line. The empty string (the registered default) always
//! passes through unchanged.
use chrono::{DateTime, SecondsFormat, Utc};
use clap::builder::ValueParser;

type Transform = fn(&str) -> Result<String, String>;

const TRANSFORMS: &[(&str, Transform)] = &[
    ("lowercase", lowercase),
    ("state", state),
    ("direction", direction),
    ("visibility", visibility),
    ("merge-method", merge_method),
    ("timestamp", timestamp),
];

fn find(name: &str) -> Option<Transform> {
    TRANSFORMS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, transform)| *transform)
}

pub fn is_known(name: &str) -> bool {
    find(name).is_some()
}

/// The value parser for transform `name`, if there is one.
pub fn value_parser(name: &str) -> Option<ValueParser> {
    find(name).map(ValueParser::new)
}

fn lowercase(value: &str) -> Result<String, String> {
    Ok(value.to_lowercase())
}

fn one_of(value: &str, allowed: &[&str]) -> Result<String, String> {
    let lowered = value.to_lowercase();
    if value.is_empty() || allowed.contains(&lowered.as_str()) {
        Ok(lowered)
    } else {
        Err(format!(
            "expected one of {}, got `{value}`",
            allowed.join(", ")
        ))
    }
}

fn state(value: &str) -> Result<String, String> {
    one_of(value, &["open", "closed", "all"])
}

fn direction(value: &str) -> Result<String, String> {
    one_of(value, &["asc", "desc"])
}

fn visibility(value: &str) -> Result<String, String> {
    one_of(value, &["all", "public", "private"])
}

fn merge_method(value: &str) -> Result<String, String> {
    one_of(value, &["merge", "squash", "rebase"])
}

fn timestamp(value: &str) -> Result<String, String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|t| {
            t.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        })
        .map_err(|e| format!("invalid RFC 3339 timestamp `{value}`: {e}"))
}
