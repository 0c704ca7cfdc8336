use clap::{CommandFactory, Parser};

use super::{CliArgs, OutputFormat};

#[test]
fn command_definition_is_consistent() {
    CliArgs::command().debug_assert();
}

#[test]
fn defaults_to_plain_output_and_stdin_script() {
    let parsed = CliArgs::parse_from(["typeahead"]);
    assert_eq!(parsed.output, OutputFormat::Plain);
    assert!(parsed.script.is_none());
    assert_eq!(parsed.verbose, 0);
    assert!(parsed.filters.is_none());
}

#[test]
fn filters_accept_commas_and_repetition() {
    let parsed = CliArgs::parse_from([
        "typeahead",
        "--filter",
        "fuel=electric,make=bmw",
        "-f",
        "doors=5",
    ]);
    assert_eq!(
        parsed.filters,
        Some(vec![
            "fuel=electric".to_string(),
            "make=bmw".to_string(),
            "doors=5".to_string(),
        ])
    );
}

#[test]
fn negative_coordinates_and_verbosity() {
    let parsed = CliArgs::parse_from([
        "typeahead",
        "-vv",
        "--latitude",
        "-33.86",
        "--longitude",
        "151.2",
        "-o",
        "json",
    ]);
    assert_eq!(parsed.verbose, 2);
    assert_eq!(parsed.latitude, Some(-33.86));
    assert_eq!(parsed.longitude, Some(151.2));
    assert_eq!(parsed.output, OutputFormat::Json);
}
