use crate::cli::schema::{OptionSpec, ParamKind};
use crate::config::defaults::APP_NAME;
use crate::error::Har2OapiError;
use anyhow::Result;
use clap::builder::{BoolishValueParser, PossibleValuesParser};
use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::{Map, Value};

/// Values given on the command line, keyed by parser key
pub type ShortKeyedValues = Map<String, Value>;

/// Result of parsing the command line
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ParseOutcome {
    /// Options to apply over the config layers
    Parsed {
        /// Only the options actually present on the command line
        values: ShortKeyedValues,
        /// The first unclassifiable token and everything after it
        ignored: Vec<String>,
    },
    /// `--help` was requested; rendered usage text
    Help(String),
    /// `--version` was requested; name and version
    Version(String),
}

/// Parse process arguments (program name first) against the option schema
///
/// Long names match case-insensitively, by parser key or canonical name.
/// Parsing stops at the first token that is not a known option, a value for
/// the preceding option, or the single positional argument.
///
/// # Errors
///
/// Returns a configuration error if a known option is used incorrectly
/// (missing value, value outside its choices, malformed boolean)
#[inline]
pub fn parse(argv: &[String], schema: &[OptionSpec]) -> Result<ParseOutcome> {
    let (program, args) = match argv.split_first() {
        Some((program, args)) => (program.clone(), args),
        None => (APP_NAME.to_owned(), argv),
    };

    let (normalized, ignored) = normalize(schema, args);
    let command_line = std::iter::once(program).chain(normalized);

    match build_command(schema).try_get_matches_from(command_line) {
        Ok(matches) => Ok(ParseOutcome::Parsed {
            values: collect_values(schema, &matches),
            ignored,
        }),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp => Ok(ParseOutcome::Help(err.to_string())),
            ErrorKind::DisplayVersion => Ok(ParseOutcome::Version(err.to_string())),
            _ => {
                let rendered = err.to_string();
                let message = rendered.trim().trim_start_matches("error: ");
                Err(Har2OapiError::configuration(format!("Invalid command line: {message}")).into())
            }
        },
    }
}

/// Build the `clap` command for an option schema
#[must_use]
#[inline]
pub fn build_command(schema: &[OptionSpec]) -> Command {
    schema.iter().fold(
        Command::new(APP_NAME)
            .version(env!("CARGO_PKG_VERSION"))
            .about("Generate an OpenAPI description from captured HAR traffic")
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true),
        |command, spec| command.arg(build_arg(spec)),
    )
}

fn build_arg(spec: &OptionSpec) -> Arg {
    let mut arg = Arg::new(spec.name)
        .long(spec.name)
        .help(spec.description)
        .help_heading(spec.group.heading());

    if let Some(alias) = spec.alias {
        arg = arg.short(alias);
    }
    if spec.long_name != spec.name {
        arg = arg.visible_alias(spec.long_name);
    }

    match spec.long_name {
        "help" => return arg.action(ArgAction::Help),
        "version" => return arg.action(ArgAction::Version),
        _ => {}
    }

    arg = match spec.kind {
        ParamKind::Flag => arg
            .action(ArgAction::Set)
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .value_name("BOOL")
            .value_parser(BoolishValueParser::new()),
        ParamKind::Text => arg
            .action(ArgAction::Set)
            .value_name("PATH")
            .value_parser(clap::value_parser!(String)),
        ParamKind::Choice(choices) => arg
            .action(ArgAction::Set)
            .value_name("FORMAT")
            .value_parser(PossibleValuesParser::new(choices.iter().copied())),
    };

    match default_text(&spec.default) {
        Some(text) => arg.default_value(text),
        None => arg,
    }
}

/// Default as shown in `--help`; empty text has nothing worth showing
fn default_text(default: &Value) -> Option<String> {
    match *default {
        Value::Bool(flag) => Some(flag.to_string()),
        Value::String(ref text) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}

fn collect_values(schema: &[OptionSpec], matches: &ArgMatches) -> ShortKeyedValues {
    let mut values = ShortKeyedValues::new();

    for spec in schema {
        if matches!(spec.long_name, "help" | "version")
            || matches.value_source(spec.name) != Some(ValueSource::CommandLine)
        {
            continue;
        }

        let value = match spec.kind {
            ParamKind::Flag => matches.get_one::<bool>(spec.name).copied().map(Value::Bool),
            ParamKind::Text | ParamKind::Choice(_) => matches
                .get_one::<String>(spec.name)
                .cloned()
                .map(Value::String),
        };

        if let Some(value) = value {
            values.insert(spec.name.to_owned(), value);
        }
    }

    values
}

/// Rewrite the arguments into canonical `--<parser key>` form
///
/// Returns the rewritten arguments and the unclassified tail.
fn normalize(schema: &[OptionSpec], args: &[String]) -> (Vec<String>, Vec<String>) {
    let mut normalized = Vec::with_capacity(args.len());
    let mut positional_taken = false;
    let mut index = 0;

    while let Some(arg) = args.get(index) {
        let next = args.get(index + 1);
        let consumed = if let Some(body) = arg.strip_prefix("--") {
            long_option(schema, body, next, &mut normalized, &mut positional_taken)
        } else if arg.len() > 1 && arg.starts_with('-') {
            short_cluster(schema, &arg[1..], next, &mut normalized, &mut positional_taken)
        } else if arg != "-" && !positional_taken {
            schema.iter().find(|spec| spec.positional).map(|spec| {
                positional_taken = true;
                normalized.push(format!("--{}={arg}", spec.name));
                1
            })
        } else {
            None
        };

        match consumed {
            Some(count) => index += count,
            None => return (normalized, args[index..].to_vec()),
        }
    }

    (normalized, Vec::new())
}

fn long_option(
    schema: &[OptionSpec],
    body: &str,
    next: Option<&String>,
    normalized: &mut Vec<String>,
    positional_taken: &mut bool,
) -> Option<usize> {
    let (name, inline) = match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };
    if name.is_empty() {
        return None;
    }

    let spec = schema.iter().find(|spec| {
        spec.name.eq_ignore_ascii_case(name) || spec.long_name.eq_ignore_ascii_case(name)
    })?;
    *positional_taken |= spec.positional;

    Some(push_option(spec, inline, next, normalized))
}

fn short_cluster(
    schema: &[OptionSpec],
    cluster: &str,
    next: Option<&String>,
    normalized: &mut Vec<String>,
    positional_taken: &mut bool,
) -> Option<usize> {
    let mut pending = Vec::new();

    for (offset, alias) in cluster.char_indices() {
        let spec = schema.iter().find(|spec| spec.alias == Some(alias))?;
        *positional_taken |= spec.positional;

        if spec.kind == ParamKind::Flag {
            pending.push(format!("--{}", spec.name));
            continue;
        }

        let rest = &cluster[offset + alias.len_utf8()..];
        let inline = (!rest.is_empty()).then_some(rest);
        let consumed = push_option(spec, inline, next, &mut pending);
        normalized.append(&mut pending);
        return Some(consumed);
    }

    normalized.append(&mut pending);
    Some(1)
}

/// Emit one option, taking its value inline or from the next argument
///
/// An option-looking next argument is never taken as a value: the option is
/// emitted bare so the missing value is reported as a usage error.
fn push_option(
    spec: &OptionSpec,
    inline: Option<&str>,
    next: Option<&String>,
    normalized: &mut Vec<String>,
) -> usize {
    let next = next.filter(|value| !value.starts_with('-') || value.as_str() == "-");
    match (spec.kind, inline, next) {
        (_, Some(value), _) => {
            normalized.push(format!("--{}={value}", spec.name));
            1
        }
        (ParamKind::Flag, None, _) | (_, None, None) => {
            normalized.push(format!("--{}", spec.name));
            1
        }
        (_, None, Some(value)) => {
            normalized.push(format!("--{}={value}", spec.name));
            2
        }
    }
}
