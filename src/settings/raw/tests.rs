use std::io::Write;
use std::time::Duration;

use clap::Parser;
use tempfile::NamedTempFile;
use typeahead::source::GeoPoint;

use super::RawConfig;
use crate::cli::CliArgs;
use crate::settings::load;

fn cli(args: &[&str]) -> CliArgs {
    let mut argv = vec!["typeahead", "--no-config"];
    argv.extend_from_slice(args);
    CliArgs::parse_from(argv)
}

#[test]
fn cli_overrides_take_precedence() {
    let cli = cli(&[
        "--quiet-ms",
        "150",
        "--suggest-min-chars",
        "3",
        "--results-min-chars",
        "5",
        "--suggest-before-results",
        "false",
        "--lang",
        "de",
        "--sort",
        "title",
        "--max-suggestions",
        "3",
        "--simulate-failure",
        "offline",
    ]);

    let mut raw = RawConfig::default();
    raw.search.quiet_ms = Some(900);
    raw.search.lang = Some("fr".into());
    raw.apply_cli_overrides(&cli);

    let config = raw.resolve(&cli).expect("resolve");
    assert_eq!(config.search.quiet_interval, Duration::from_millis(150));
    assert_eq!(config.search.selector.suggest_min_chars(), 3);
    assert_eq!(config.search.selector.results_min_chars(), 5);
    assert!(!config.search.selector.suggest_before_results());
    assert_eq!(config.search.lang, "de");
    assert_eq!(config.search.sort_key, "title");
    assert_eq!(config.source.max_suggestions, 3);
    assert_eq!(config.source.failure.as_deref(), Some("offline"));
}

#[test]
fn cli_filters_merge_over_configured_filters() {
    let cli = cli(&["--filter", "fuel=electric,brand=bmw"]);

    let mut raw = RawConfig::default();
    raw.search.filters = Some(
        [("fuel".to_string(), "diesel".to_string()), ("doors".to_string(), "5".to_string())]
            .into_iter()
            .collect(),
    );
    raw.apply_cli_overrides(&cli);

    let config = raw.resolve(&cli).expect("resolve");
    let filters: Vec<(String, String)> = config
        .search
        .filters
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    assert_eq!(
        filters,
        vec![
            ("brand".to_string(), "bmw".to_string()),
            ("doors".to_string(), "5".to_string()),
            ("fuel".to_string(), "electric".to_string()),
        ]
    );
}

#[test]
fn latitude_without_longitude_is_rejected() {
    let cli = cli(&["--latitude", "48.1"]);
    let mut raw = RawConfig::default();
    raw.apply_cli_overrides(&cli);

    let err = raw.resolve(&cli).expect_err("lone latitude");
    assert!(err.to_string().contains("latitude"));
}

#[test]
fn validation_errors_name_the_cli_flag() {
    let cli = cli(&["--results-min-chars", "1", "--suggest-min-chars", "2"]);
    let mut raw = RawConfig::default();
    raw.apply_cli_overrides(&cli);

    let err = raw.resolve(&cli).expect_err("inverted thresholds");
    assert!(err.to_string().contains("--results-min-chars"));
}

#[test]
fn single_character_suggestions_are_rejected() {
    let cli = cli(&["--suggest-min-chars", "1"]);
    let mut raw = RawConfig::default();
    raw.apply_cli_overrides(&cli);

    let err = raw.resolve(&cli).expect_err("threshold too low");
    assert!(err.to_string().contains("--suggest-min-chars"));
}

#[test]
fn equal_thresholds_are_rejected() {
    let cli = cli(&["--suggest-min-chars", "3", "--results-min-chars", "3"]);
    let mut raw = RawConfig::default();
    raw.apply_cli_overrides(&cli);

    let err = raw.resolve(&cli).expect_err("equal thresholds");
    assert!(err.to_string().contains("--results-min-chars"));
}

#[test]
fn loads_values_from_config_file() {
    let mut file = NamedTempFile::with_suffix(".toml").expect("temp file");
    writeln!(
        file,
        r#"
[search]
quiet_ms = 250
sort_key = "distance"
latitude = 52.52
longitude = -13.4

[search.filters]
segment = "compact"

[source]
max_suggestions = 5
results_latency_ms = 40
"#
    )
    .expect("write config");

    let path = file.path().to_string_lossy().into_owned();
    let cli = cli(&["--config", &path, "--lang", "nl"]);
    let config = load(&cli).expect("load");

    assert_eq!(config.search.quiet_interval, Duration::from_millis(250));
    assert_eq!(config.search.sort_key, "distance");
    assert_eq!(config.search.lang, "nl");
    assert_eq!(config.search.location, Some(GeoPoint::new(52.52, -13.4)));
    assert_eq!(config.search.filters.iter().count(), 1);
    assert_eq!(config.source.max_suggestions, 5);
    assert_eq!(config.source.results_latency, Duration::from_millis(40));
}
