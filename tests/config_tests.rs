//! Parameter resolution tests: defaults, config layers and command line

use har2oapi::config::RunParams;
use har2oapi::error::Har2OapiError;
use har2oapi::system::MockSystem;
use har2oapi::cli::PARAM_DEFS;
use har2oapi::{Invocation, resolve_run_params, resolve_with_definitions};

const BUNDLED: &str = "/opt/har2oapi/defaults/config.jsonc";
const SHARED: &str = "/etc/har2oapi/config.jsonc";
const HOME: &str = "/home/ana/.config/har2oapi/config.jsonc";
const WORKDIR: &str = "/work/project/.har2oapi.config.config.jsonc";

fn system() -> MockSystem {
    MockSystem::new()
        .with_exe_dir("/opt/har2oapi")
        .unwrap()
        .with_home("/home/ana")
        .unwrap()
        .with_current_dir("/work/project")
        .unwrap()
}

fn argv(args: &[&str]) -> Vec<String> {
    std::iter::once("har2oapi")
        .chain(args.iter().copied())
        .map(str::to_owned)
        .collect()
}

fn resolve(system: &MockSystem, args: &[&str]) -> RunParams {
    match resolve_run_params(system, &argv(args)).unwrap() {
        Invocation::Run(params) => params,
        Invocation::Exit(text) => panic!("unexpected exit: {text}"),
    }
}

#[test]
fn test_no_config_files_gives_defaults() {
    let params = resolve(&system(), &[]);
    assert_eq!(params, RunParams::default());
}

#[test]
fn test_layer_precedence_for_one_key() {
    let layers = [
        ("bundled", BUNDLED),
        ("shared", SHARED),
        ("home", HOME),
        ("workdir", WORKDIR),
    ];

    // Each round adds the next layer; the newest one must win
    for count in 1..=layers.len() {
        let mut system = system();
        for (name, path) in &layers[..count] {
            let contents = format!(r#"{{ "output": "{name}.yaml" }}"#);
            system = system.with_file(path, contents.as_bytes()).unwrap();
        }

        let (expected, _) = layers[count - 1];
        assert_eq!(resolve(&system, &[]).output, format!("{expected}.yaml"));
    }
}

#[test]
fn test_cli_beats_every_layer() {
    let mut system = system();
    for path in [BUNDLED, SHARED, HOME, WORKDIR] {
        system = system
            .with_file(path, br#"{ "forceAllRequestsInSameSpec": false, "format": "json" }"#)
            .unwrap();
    }

    let params = resolve(
        &system,
        &["--forceAllRequestsInSameSpec", "--format", "yml"],
    );

    assert!(params.force_all_requests_in_same_spec);
    assert_eq!(params.format, "yml");
}

#[test]
fn test_layers_merge_per_key() {
    let system = system()
        .with_file(SHARED, br#"{ "relaxedMethods": true, "format": "json" }"#)
        .unwrap()
        .with_file(HOME, br#"{ "format": "yml" }"#)
        .unwrap();

    let params = resolve(&system, &[]);

    assert!(params.relaxed_methods, "shared value survives the home layer");
    assert_eq!(params.format, "yml");
}

#[test]
fn test_missing_and_empty_files_equal_absent() {
    let absent = resolve(&system(), &["-S"]);

    let empty = system()
        .with_file(BUNDLED, b"")
        .unwrap()
        .with_file(HOME, b"   \n")
        .unwrap();

    assert_eq!(resolve(&empty, &["-S"]), absent);
}

#[test]
fn test_comments_in_config_files() {
    let system = system()
        .with_file(
            WORKDIR,
            br#"
            // project settings
            {
                /* keep auth headers as parameters */
                "guessAuthenticationHeaders": false,
                "input": "capture.har", // default capture
            }
            "#,
        )
        .unwrap();

    let params = resolve(&system, &[]);

    assert!(!params.guess_authentication_headers);
    assert_eq!(params.input, "capture.har");
}

#[test]
fn test_malformed_layer_is_fatal_even_for_help() {
    let system = system().with_file(HOME, b"{ \"format\": ").unwrap();

    let err = resolve_run_params(&system, &argv(&["--help"])).unwrap_err();

    assert!(err.to_string().contains(HOME));
    assert!(matches!(
        err.downcast_ref::<Har2OapiError>(),
        Some(Har2OapiError::Configuration { .. })
    ));
}

#[test]
fn test_unknown_config_key_is_fatal() {
    let system = system()
        .with_file(WORKDIR, br#"{ "forceAllRequests": true }"#)
        .unwrap();

    assert!(resolve_run_params(&system, &argv(&[])).is_err());
}

#[test]
fn test_wrong_value_type_is_fatal() {
    let system = system()
        .with_file(SHARED, br#"{ "relaxedMethods": "yes" }"#)
        .unwrap();

    assert!(resolve_run_params(&system, &argv(&[])).is_err());
}

#[test]
fn test_unreadable_layer_is_fatal() {
    let system = system()
        .with_unreadable_file(BUNDLED, br#"{ "format": "json" }"#)
        .unwrap();

    let err = resolve_run_params(&system, &argv(&[])).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_trailing_tokens_are_ignored() {
    let params = resolve(&system(), &["-S", "--no-such-flag", "-P"]);

    assert!(params.force_all_requests_in_same_spec);
    assert!(!params.add_servers_to_paths);
}

#[test]
fn test_positional_input() {
    let params = resolve(&system(), &["capture.har", "-o", "out.yaml"]);

    assert_eq!(params.input, "capture.har");
    assert_eq!(params.output, "out.yaml");
}

#[test]
fn test_help_and_version_exit() {
    let help = resolve_run_params(&system(), &argv(&["-h"])).unwrap();
    assert!(matches!(help, Invocation::Exit(text) if text.contains("Generation options")));

    let version = resolve_run_params(&system(), &argv(&["-V"])).unwrap();
    assert!(matches!(version, Invocation::Exit(text) if text.contains(env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_help_requested_by_config_file() {
    let system = system().with_file(WORKDIR, br#"{ "help": true }"#).unwrap();

    let invocation = resolve_run_params(&system, &argv(&[])).unwrap();
    assert!(matches!(invocation, Invocation::Exit(text) if text.contains("--input")));
}

#[test]
fn test_invalid_format_choice_is_fatal() {
    let err = resolve_run_params(&system(), &argv(&["-F", "xml"])).unwrap_err();
    assert!(err.to_string().contains("Invalid command line"));
}

#[test]
fn test_value_option_before_a_flag_is_fatal() {
    let err = resolve_run_params(&system(), &argv(&["-o", "-S", "in.har"])).unwrap_err();
    assert!(err.to_string().contains("Invalid command line"));
}

#[test]
fn test_explicit_defaults_are_used() {
    let defaults = RunParams {
        format: "json".to_owned(),
        ..RunParams::default()
    };

    let invocation = resolve_with_definitions(&system(), &argv(&["-S"]), PARAM_DEFS, defaults)
        .unwrap();
    let Invocation::Run(params) = invocation else {
        panic!("unexpected exit");
    };

    assert_eq!(params.format, "json");
    assert!(params.force_all_requests_in_same_spec);
}
