//! Declarative parameter schema
//!
//! Every configurable option is declared once in [`PARAM_DEFS`]. The option
//! schema handed to the parser is derived from these definitions plus the
//! default table, and the pair is checked for consistency at startup.

use crate::error::Har2OapiError;
use anyhow::Result;
use serde_json::{Map, Value};

/// Functional category of a parameter, used as the help heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamGroup {
    /// Options forwarded to the generation engine
    Generation,
    /// Options controlling the tool itself
    Application,
}

impl ParamGroup {
    /// Heading shown in `--help`
    #[must_use]
    #[inline]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Generation => "Generation options",
            Self::Application => "Application options",
        }
    }
}

/// Value kind a parameter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Boolean switch
    Flag,
    /// Free text, usually a path
    Text,
    /// One of a fixed set of values
    Choice(&'static [&'static str]),
}

impl ParamKind {
    /// Whether a default value has the JSON type this kind requires
    #[must_use]
    #[inline]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Flag => value.is_boolean(),
            Self::Text => value.is_string(),
            Self::Choice(choices) => value
                .as_str()
                .is_some_and(|text| choices.contains(&text)),
        }
    }
}

/// Definition of one configurable parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDef {
    /// Functional category
    pub group: ParamGroup,
    /// Single-character switch, if any
    pub alias: Option<char>,
    /// Parser key when it differs from the canonical name
    pub short_key: Option<&'static str>,
    /// Canonical name, used everywhere outside the parser
    pub long_key: &'static str,
    /// Accepted value kind
    pub kind: ParamKind,
    /// Help text
    pub description: &'static str,
    /// Absorbs a bare, unflagged argument
    pub positional: bool,
}

impl ParamDef {
    /// Key the parser stores this parameter's value under
    #[must_use]
    #[inline]
    pub const fn parser_key(&self) -> &'static str {
        match self.short_key {
            Some(key) => key,
            None => self.long_key,
        }
    }
}

/// Accepted output formats
pub const FORMATS: &[&str] = &["yaml", "yml", "json"];

const fn generation(
    alias: char,
    short_key: Option<&'static str>,
    long_key: &'static str,
    description: &'static str,
) -> ParamDef {
    ParamDef {
        group: ParamGroup::Generation,
        alias: Some(alias),
        short_key,
        long_key,
        kind: ParamKind::Flag,
        description,
        positional: false,
    }
}

const fn application(
    alias: Option<char>,
    long_key: &'static str,
    kind: ParamKind,
    description: &'static str,
) -> ParamDef {
    ParamDef {
        group: ParamGroup::Application,
        alias,
        short_key: None,
        long_key,
        kind,
        description,
        positional: false,
    }
}

/// Every configurable parameter
pub const PARAM_DEFS: &[ParamDef] = &[
    generation(
        'S',
        Some("inSameSpec"),
        "forceAllRequestsInSameSpec",
        "Treat every url as having the same domain.",
    ),
    generation(
        'P',
        Some("srvToPaths"),
        "addServersToPaths",
        "Add a servers entry to every path object.",
    ),
    generation(
        'A',
        Some("guessAuth"),
        "guessAuthenticationHeaders",
        "Try and guess common auth headers.",
    ),
    generation(
        'm',
        Some("relaxMtd"),
        "relaxedMethods",
        "Allow non-standard methods.",
    ),
    generation(
        'p',
        Some("relaxParse"),
        "relaxedContentTypeJsonParse",
        "Try and parse non application/json responses as json.",
    ),
    generation(
        'H',
        Some("filterStdHeads"),
        "filterStandardHeaders",
        "Filter out all standard headers from the parameter list in openapi.",
    ),
    generation('L', None, "logErrors", "Log errors to console."),
    generation(
        'q',
        Some("tryParamUrl"),
        "attemptToParameterizeUrl",
        "Try and parameterize an URL.",
    ),
    generation(
        'N',
        Some("drop404"),
        "dropPathsWithoutSuccessfulResponse",
        "Don't include paths without a response or with a non-2xx response.",
    ),
    application(
        Some('v'),
        "verbose",
        ParamKind::Flag,
        "Report on most performed operations.",
    ),
    application(Some('d'), "debug", ParamKind::Flag, "Print diagnostic messages."),
    application(Some('h'), "help", ParamKind::Flag, "Display help message."),
    application(Some('V'), "version", ParamKind::Flag, "Display version."),
    application(
        Some('C'),
        "configExport",
        ParamKind::Flag,
        "Print effective config to stderr.",
    ),
    application(Some('o'), "output", ParamKind::Text, "Output file path."),
    application(
        Some('F'),
        "format",
        ParamKind::Choice(FORMATS),
        "Output file format.",
    ),
    application(
        None,
        "stdout",
        ParamKind::Flag,
        "Output to STDOUT even when an output path is configured.",
    ),
    application(
        Some('s'),
        "safeOut",
        ParamKind::Flag,
        "Safe output - doesn't write to a non-empty file.",
    ),
    application(
        Some('a'),
        "append",
        ParamKind::Flag,
        "Append to an output file. Conflicts with --safeOut.",
    ),
    ParamDef {
        positional: true,
        ..application(Some('i'), "input", ParamKind::Text, "Input file path.")
    },
];

/// Parser-facing specification of one option
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    pub group: ParamGroup,
    pub kind: ParamKind,
    pub default: Value,
    pub alias: Option<char>,
    /// Key the parser uses (`--<name>`)
    pub name: &'static str,
    /// Canonical name, also accepted as `--<long_name>`
    pub long_name: &'static str,
    pub description: &'static str,
    pub positional: bool,
}

/// Build the parser's option schema from the definitions and the default table
///
/// # Errors
///
/// Returns a configuration error if:
/// - A definition's canonical name has no default
/// - A default's type does not match the definition's kind
/// - More than one definition is positional
/// - Two definitions share a parser key or alias
#[inline]
pub fn build_option_schema(
    defaults: &Map<String, Value>,
    defs: &[ParamDef],
) -> Result<Vec<OptionSpec>> {
    let mut schema = Vec::with_capacity(defs.len());

    for def in defs {
        let default = defaults.get(def.long_key).ok_or_else(|| {
            Har2OapiError::configuration(format!(
                "Parameter '{}' has no default value",
                def.long_key
            ))
        })?;

        if !def.kind.accepts(default) {
            return Err(Har2OapiError::configuration(format!(
                "Default for '{}' does not match its declared kind {:?}: {default}",
                def.long_key, def.kind
            ))
            .into());
        }

        schema.push(OptionSpec {
            group: def.group,
            kind: def.kind,
            default: default.clone(),
            alias: def.alias,
            name: def.parser_key(),
            long_name: def.long_key,
            description: def.description,
            positional: def.positional,
        });
    }

    let positional = schema.iter().filter(|spec| spec.positional).count();
    if positional > 1 {
        return Err(Har2OapiError::configuration(format!(
            "At most one parameter may be positional, found {positional}"
        ))
        .into());
    }

    for (index, spec) in schema.iter().enumerate() {
        for other in &schema[index + 1..] {
            let same_name = spec.name.eq_ignore_ascii_case(other.name)
                || spec.long_name.eq_ignore_ascii_case(other.long_name);
            let same_alias = spec.alias.is_some() && spec.alias == other.alias;
            if same_name || same_alias {
                return Err(Har2OapiError::configuration(format!(
                    "Parameters '{}' and '{}' collide",
                    spec.long_name, other.long_name
                ))
                .into());
            }
        }
    }

    Ok(schema)
}

/// Map parser-keyed values back to canonical names
///
/// Definitions without a distinct short key use the canonical name as the
/// parser key. Keys absent from `values` stay absent.
#[must_use]
#[inline]
pub fn rename(defs: &[ParamDef], values: &Map<String, Value>) -> Map<String, Value> {
    defs.iter()
        .filter_map(|def| {
            values
                .get(def.parser_key())
                .map(|value| (def.long_key.to_owned(), value.clone()))
        })
        .collect()
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "These are unit tests")]
mod tests {
    use super::*;
    use crate::config::RunParams;
    use crate::config::defaults::default_table;
    use serde_json::json;

    fn defaults() -> Map<String, Value> {
        default_table(&RunParams::default()).unwrap()
    }

    #[test]
    fn builtin_definitions_are_consistent() {
        let schema = build_option_schema(&defaults(), PARAM_DEFS).unwrap();
        assert_eq!(schema.len(), PARAM_DEFS.len());

        let input = schema.iter().find(|spec| spec.positional).unwrap();
        assert_eq!(input.long_name, "input");
        assert_eq!(input.alias, Some('i'));
    }

    #[test]
    fn option_takes_default_from_table() {
        let schema = build_option_schema(&defaults(), PARAM_DEFS).unwrap();
        let guess = schema
            .iter()
            .find(|spec| spec.long_name == "guessAuthenticationHeaders")
            .unwrap();

        assert_eq!(guess.name, "guessAuth");
        assert_eq!(guess.default, Value::Bool(true));
        assert_eq!(guess.group, ParamGroup::Generation);
    }

    #[test]
    fn missing_default_fails_fast() {
        let mut table = defaults();
        table.remove("relaxedMethods");

        let err = build_option_schema(&table, PARAM_DEFS).unwrap_err();
        assert!(err.to_string().contains("relaxedMethods"));
    }

    #[test]
    fn mismatched_default_kind_fails_fast() {
        let mut table = defaults();
        table.insert("logErrors".to_owned(), json!("yes"));

        let err = build_option_schema(&table, PARAM_DEFS).unwrap_err();
        assert!(err.to_string().contains("logErrors"));
    }

    #[test]
    fn choice_default_must_be_a_choice() {
        let mut table = defaults();
        table.insert("format".to_owned(), json!("xml"));
        assert!(build_option_schema(&table, PARAM_DEFS).is_err());
    }

    #[test]
    fn second_positional_is_rejected() {
        let defs = [
            PARAM_DEFS[PARAM_DEFS.len() - 1],
            ParamDef {
                positional: true,
                ..application(Some('o'), "output", ParamKind::Text, "Output file path.")
            },
        ];
        let err = build_option_schema(&defaults(), &defs).unwrap_err();
        assert!(err.to_string().contains("positional"));
    }

    #[test]
    fn rename_maps_short_keys_to_canonical_names() {
        let Value::Object(values) = json!({
            "inSameSpec": true,
            "logErrors": false,
            "output": "out.yaml"
        }) else {
            unreachable!()
        };

        let renamed = rename(PARAM_DEFS, &values);

        assert_eq!(renamed.get("forceAllRequestsInSameSpec"), Some(&json!(true)));
        assert_eq!(renamed.get("logErrors"), Some(&json!(false)));
        assert_eq!(renamed.get("output"), Some(&json!("out.yaml")));
        assert!(!renamed.contains_key("inSameSpec"));
        assert_eq!(renamed.len(), 3);
    }
}
