//! Declarative binding between command-line flags and request options.
//!
//! A [`FlagSet`] lists the flags one command accepts. Every entry pairs a
//! [`FlagDescriptor`] (long name, short alias, help text, ...) with a typed
//! setter into the command's options structure. The set is used twice per
//! command: [`FlagSet::register`] adds the flags to a clap [`Command`] at
//! start-up, and [`FlagSet::map`] copies every flag the user explicitly passed
//! into a fresh options value after parsing.
//!
//! Only four value types can be bound: `i64`, `String`, `bool` and
//! `Vec<String>`. Binding anything else does not compile.
pub mod transform;

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

use clap::parser::{MatchesError, ValueSource};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{debug, trace};

/// The value type a flag was declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Int,
    String,
    Bool,
    StringArray,
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlagKind::Int => "int",
            FlagKind::String => "string",
            FlagKind::Bool => "bool",
            FlagKind::StringArray => "stringArray",
        };
        f.write_str(s)
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for i64 {}
    impl Sealed for String {}
    impl Sealed for bool {}
    impl Sealed for Vec<String> {}
}

/// A value type a flag can be bound to.
pub trait FlagType: sealed::Sealed + Sized + 'static {
    const KIND: FlagKind;

    /// Sets the action, zero-value default and value parser for this type.
    fn configure(arg: Arg) -> Arg;

    /// Reads the parsed value back out of the matches.
    fn fetch(matches: &ArgMatches, id: &str) -> Result<Option<Self>, MatchesError>;
}

impl FlagType for i64 {
    const KIND: FlagKind = FlagKind::Int;

    fn configure(arg: Arg) -> Arg {
        arg.action(ArgAction::Set)
            .value_parser(value_parser!(i64))
            .allow_negative_numbers(true)
            .default_value("0")
    }

    fn fetch(matches: &ArgMatches, id: &str) -> Result<Option<Self>, MatchesError> {
        Ok(matches.try_get_one::<i64>(id)?.copied())
    }
}

impl FlagType for String {
    const KIND: FlagKind = FlagKind::String;

    fn configure(arg: Arg) -> Arg {
        arg.action(ArgAction::Set)
            .value_parser(value_parser!(String))
            .default_value("")
            .hide_default_value(true)
    }

    fn fetch(matches: &ArgMatches, id: &str) -> Result<Option<Self>, MatchesError> {
        Ok(matches.try_get_one::<String>(id)?.cloned())
    }
}

impl FlagType for bool {
    const KIND: FlagKind = FlagKind::Bool;

    // Accepts both `--flag` and `--flag true|false`.
    fn configure(arg: Arg) -> Arg {
        arg.action(ArgAction::Set)
            .value_parser(value_parser!(bool))
            .num_args(0..=1)
            .default_value("false")
            .default_missing_value("true")
    }

    fn fetch(matches: &ArgMatches, id: &str) -> Result<Option<Self>, MatchesError> {
        Ok(matches.try_get_one::<bool>(id)?.copied())
    }
}

impl FlagType for Vec<String> {
    const KIND: FlagKind = FlagKind::StringArray;

    // Each occurrence appends one element. Values are never split on commas.
    fn configure(arg: Arg) -> Arg {
        arg.action(ArgAction::Append).value_parser(value_parser!(String))
    }

    fn fetch(matches: &ArgMatches, id: &str) -> Result<Option<Self>, MatchesError> {
        Ok(matches
            .try_get_many::<String>(id)?
            .map(|values| values.cloned().collect()))
    }
}

/// Everything known about one flag apart from where its value goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDescriptor {
    pub name: &'static str,
    pub short: Option<char>,
    pub kind: FlagKind,
    /// Advisory only. [`FlagSet::map`] never enforces it.
    pub required: bool,
    pub help: &'static str,
    pub transform: Option<&'static str>,
}

/// Builder for the untyped part of a flag declaration. The type comes from
/// the setter it is bound with.
#[derive(Debug, Clone)]
pub struct Flag {
    name: &'static str,
    short: Option<char>,
    required: bool,
    help: &'static str,
    transform: Option<&'static str>,
}

impl Flag {
    pub fn new(name: &'static str) -> Flag {
        Flag {
            name,
            short: None,
            required: false,
            help: "",
            transform: None,
        }
    }

    pub fn short(mut self, short: char) -> Flag {
        self.short = Some(short);
        self
    }

    pub fn help(mut self, help: &'static str) -> Flag {
        self.help = help;
        self
    }

    pub fn required(mut self) -> Flag {
        self.required = true;
        self
    }

    /// Names a transform from [`transform`] applied by the value parser.
    pub fn transform(mut self, transform: &'static str) -> Flag {
        self.transform = Some(transform);
        self
    }

    fn describe(self, kind: FlagKind) -> FlagDescriptor {
        FlagDescriptor {
            name: self.name,
            short: self.short,
            kind,
            required: self.required,
            help: self.help,
            transform: self.transform,
        }
    }
}

/// Errors in a flag set declaration, or in reading flag values back.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error("flag {flag:?}: names must be lowercase letters, digits and dashes")]
    InvalidName { flag: String },

    #[error("flag --{flag}: short alias {short:?} must be an ASCII letter or digit")]
    InvalidShort { flag: String, short: char },

    #[error("flag --{flag}: declared more than once")]
    DuplicateName { flag: String },

    #[error("flag --{flag}: short alias -{short} is already used by --{other}")]
    DuplicateShort {
        flag: String,
        short: char,
        other: String,
    },

    #[error("flag --{flag}: collides with existing argument {existing}")]
    Collision { flag: String, existing: String },

    #[error("flag --{flag}: unknown transform `{transform}`")]
    UnknownTransform { flag: String, transform: String },

    #[error("flag --{flag}: transform `{transform}` cannot apply to a {kind} flag")]
    TransformKind {
        flag: String,
        transform: String,
        kind: FlagKind,
    },

    #[error("flag --{flag}: cannot retrieve value: {source}")]
    Retrieval {
        flag: String,
        #[source]
        source: MatchesError,
    },

    #[error("flag --{flag}: set on the command line but has no value")]
    MissingValue { flag: String },
}

/// Every configuration error found while registering one command's flags
#[derive(Debug, thiserror::Error)]
#[error("invalid flags for `{command}`: {}", .errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct InvalidFlagSet {
    pub command: String,
    pub errors: Vec<BindError>,
}

type Assignment<O> = Box<dyn FnOnce(&mut O)>;

trait Binding<O> {
    fn descriptor(&self) -> &FlagDescriptor;

    fn arg(&self) -> Arg;

    /// Returns the pending assignment for an explicitly set flag.
    fn extract(&self, matches: &ArgMatches) -> Result<Option<Assignment<O>>, BindError>;
}

struct Typed<O, T> {
    descriptor: FlagDescriptor,
    set: fn(&mut O, T),
}

impl<O: 'static, T: FlagType> Binding<O> for Typed<O, T> {
    fn descriptor(&self) -> &FlagDescriptor {
        &self.descriptor
    }

    fn arg(&self) -> Arg {
        let d = &self.descriptor;
        let help = if d.required {
            format!("{} (required)", d.help)
        } else {
            d.help.to_string()
        };
        let mut arg = T::configure(Arg::new(d.name).long(d.name).help(help));
        if let Some(short) = d.short {
            arg = arg.short(short);
        }
        if let Some(parser) = d.transform.and_then(transform::value_parser) {
            arg = arg.value_parser(parser);
        }
        arg
    }

    fn extract(&self, matches: &ArgMatches) -> Result<Option<Assignment<O>>, BindError> {
        let name = self.descriptor.name;
        let retrieval = |source| BindError::Retrieval {
            flag: name.to_string(),
            source,
        };

        if !explicitly_set(matches, name).map_err(retrieval)? {
            return Ok(None);
        }
        let value = T::fetch(matches, name)
            .map_err(retrieval)?
            .ok_or_else(|| BindError::MissingValue {
                flag: name.to_string(),
            })?;
        trace!("--{name} was set on the command line");

        let set = self.set;
        Ok(Some(Box::new(move |options: &mut O| set(options, value))))
    }
}

/// Whether `id` got its value from the command line rather than a default.
fn explicitly_set(matches: &ArgMatches, id: &str) -> Result<bool, MatchesError> {
    // Unknown ids are reported here instead of panicking in `value_source`.
    matches.try_contains_id(id)?;
    Ok(matches.value_source(id) == Some(ValueSource::CommandLine))
}

/// The flags of one command, each bound to a field of the options type `O`.
pub struct FlagSet<O> {
    bindings: Vec<Box<dyn Binding<O>>>,
}

impl<O: 'static> Default for FlagSet<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: 'static> FlagSet<O> {
    pub fn new() -> FlagSet<O> {
        FlagSet {
            bindings: Vec::new(),
        }
    }

    /// Declares a flag of type `T` whose value is handed to `set`.
    pub fn bind<T: FlagType>(mut self, flag: Flag, set: fn(&mut O, T)) -> FlagSet<O> {
        self.bindings.push(Box::new(Typed {
            descriptor: flag.describe(T::KIND),
            set,
        }));
        self
    }

    pub fn int(self, flag: Flag, set: fn(&mut O, i64)) -> FlagSet<O> {
        self.bind(flag, set)
    }

    pub fn string(self, flag: Flag, set: fn(&mut O, String)) -> FlagSet<O> {
        self.bind(flag, set)
    }

    pub fn bool(self, flag: Flag, set: fn(&mut O, bool)) -> FlagSet<O> {
        self.bind(flag, set)
    }

    pub fn strings(self, flag: Flag, set: fn(&mut O, Vec<String>)) -> FlagSet<O> {
        self.bind(flag, set)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &FlagDescriptor> {
        self.bindings.iter().map(|binding| binding.descriptor())
    }

    /// Checks the declarations against each other and returns every problem found.
    pub fn validate(&self) -> Vec<BindError> {
        let mut errors = Vec::new();
        let mut names = HashSet::new();
        let mut shorts: HashMap<char, &str> = HashMap::new();

        for d in self.descriptors() {
            let flag = d.name.to_string();
            if !is_valid_name(d.name) {
                errors.push(BindError::InvalidName { flag: flag.clone() });
            }
            if !names.insert(d.name) {
                errors.push(BindError::DuplicateName { flag: flag.clone() });
            }
            if let Some(short) = d.short {
                if !short.is_ascii_alphanumeric() {
                    errors.push(BindError::InvalidShort {
                        flag: flag.clone(),
                        short,
                    });
                }
                match shorts.entry(short) {
                    Entry::Occupied(other) => errors.push(BindError::DuplicateShort {
                        flag: flag.clone(),
                        short,
                        other: other.get().to_string(),
                    }),
                    Entry::Vacant(slot) => {
                        slot.insert(d.name);
                    }
                }
            }
            if let Some(transform) = d.transform {
                if !transform::is_known(transform) {
                    errors.push(BindError::UnknownTransform {
                        flag,
                        transform: transform.to_string(),
                    });
                } else if !matches!(d.kind, FlagKind::String | FlagKind::StringArray) {
                    errors.push(BindError::TransformKind {
                        flag,
                        transform: transform.to_string(),
                        kind: d.kind,
                    });
                }
            }
        }

        errors
    }

    /// Adds every flag to `command`.
    ///
    /// `inherited` lists arguments the command receives from its parents
    /// (global options), which the flags must not collide with either. No
    /// flag is added unless the whole set is valid.
    pub fn register(&self, command: Command, inherited: &[Arg]) -> Result<Command, InvalidFlagSet> {
        let mut errors = self.validate();

        let existing: Vec<&Arg> = command.get_arguments().chain(inherited.iter()).collect();
        for d in self.descriptors() {
            if d.name == "help" || d.short == Some('h') {
                errors.push(BindError::Collision {
                    flag: d.name.to_string(),
                    existing: "--help".to_string(),
                });
            }
            for arg in &existing {
                if arg.get_id().as_str() == d.name || arg.get_long() == Some(d.name) {
                    errors.push(BindError::Collision {
                        flag: d.name.to_string(),
                        existing: format!("--{}", arg.get_long().unwrap_or(arg.get_id().as_str())),
                    });
                } else if d.short.is_some() && arg.get_short() == d.short {
                    errors.push(BindError::Collision {
                        flag: d.name.to_string(),
                        existing: format!("-{}", arg.get_short().unwrap_or_default()),
                    });
                }
            }
        }

        if !errors.is_empty() {
            return Err(InvalidFlagSet {
                command: command.get_name().to_string(),
                errors,
            });
        }

        debug!(
            "Registering {} flags on `{}`",
            self.bindings.len(),
            command.get_name()
        );
        Ok(self
            .bindings
            .iter()
            .fold(command, |command, binding| command.arg(binding.arg())))
    }

    /// Copies every explicitly set flag into `options` and returns how many
    /// fields were assigned.
    ///
    /// All values are retrieved before anything is assigned, so on error
    /// `options` is left exactly as it was.
    pub fn map(&self, matches: &ArgMatches, options: &mut O) -> Result<usize, BindError> {
        let assignments = self
            .bindings
            .iter()
            .filter_map(|binding| binding.extract(matches).transpose())
            .collect::<Result<Vec<_>, _>>()?;

        let count = assignments.len();
        for assign in assignments {
            assign(options);
        }
        debug!("Mapped {count} explicitly set flags");
        Ok(count)
    }

    /// Names of the flags declared required that were not set on the command line.
    pub fn missing_required(&self, matches: &ArgMatches) -> Result<Vec<&'static str>, BindError> {
        let mut missing = Vec::new();
        for d in self.descriptors().filter(|d| d.required) {
            let set = explicitly_set(matches, d.name).map_err(|source| BindError::Retrieval {
                flag: d.name.to_string(),
                source,
            })?;
            if !set {
                missing.push(d.name);
            }
        }
        Ok(missing)
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
