use super::{ConfigError, ConfigSources, ResolvedConfig};

const MAX_QUIET_MS: u128 = 10_000;
/// Single-character queries never reach the data source.
const MIN_SUGGEST_CHARS: usize = 2;

pub(super) fn validate(
    config: &ResolvedConfig,
    sources: &ConfigSources,
) -> Result<(), ConfigError> {
    let search = &config.search;

    let quiet_ms = search.quiet_interval.as_millis();
    if quiet_ms > MAX_QUIET_MS {
        return Err(ConfigError::invalid(
            "search.quiet_ms",
            quiet_ms.to_string(),
            sources.source_for("search.quiet_ms"),
            format!("must not exceed {MAX_QUIET_MS}"),
        ));
    }

    let suggest_min = search.selector.suggest_min_chars();
    if suggest_min < MIN_SUGGEST_CHARS {
        return Err(ConfigError::invalid(
            "search.suggest_min_chars",
            suggest_min.to_string(),
            sources.source_for("search.suggest_min_chars"),
            format!("must be at least {MIN_SUGGEST_CHARS}"),
        ));
    }

    let results_min = search.selector.results_min_chars();
    if results_min <= suggest_min {
        return Err(ConfigError::invalid(
            "search.results_min_chars",
            results_min.to_string(),
            sources.source_for("search.results_min_chars"),
            format!("must be greater than search.suggest_min_chars ({suggest_min})"),
        ));
    }

    if search.sort_key.trim().is_empty() {
        return Err(ConfigError::invalid(
            "search.sort_key",
            search.sort_key.clone(),
            sources.source_for("search.sort_key"),
            "must not be empty",
        ));
    }

    if let Some(point) = search.location {
        if !(-90.0..=90.0).contains(&point.lat) {
            return Err(ConfigError::invalid(
                "search.latitude",
                point.lat.to_string(),
                sources.source_for("search.latitude"),
                "must be between -90 and 90",
            ));
        }
        if !(-180.0..=180.0).contains(&point.lon) {
            return Err(ConfigError::invalid(
                "search.longitude",
                point.lon.to_string(),
                sources.source_for("search.longitude"),
                "must be between -180 and 180",
            ));
        }
    }

    if config.source.max_suggestions == 0 {
        return Err(ConfigError::invalid(
            "source.max_suggestions",
            "0",
            sources.source_for("source.max_suggestions"),
            "must be greater than zero",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use typeahead::source::GeoPoint;
    use typeahead::{SearchConfig, StageSelector};

    use super::super::{SettingSource, SourceSettings};
    use super::*;

    fn config() -> ResolvedConfig {
        ResolvedConfig {
            search: SearchConfig::default(),
            source: SourceSettings {
                catalog: None,
                suggest_latency: Duration::ZERO,
                results_latency: Duration::ZERO,
                max_suggestions: 8,
                failure: None,
            },
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&config(), &ConfigSources::default()).is_ok());
    }

    #[test]
    fn rejects_inverted_thresholds_and_names_the_flag() {
        let mut config = config();
        config.search.selector = StageSelector::new(4, 3);
        let sources = ConfigSources {
            results_min_chars: Some(SettingSource::CliFlag("--results-min-chars")),
            ..ConfigSources::default()
        };

        let err = validate(&config, &sources).expect_err("thresholds inverted");
        assert_eq!(err.key, "search.results_min_chars");
        assert!(err.to_string().contains("CLI flag `--results-min-chars`"));
    }

    #[test]
    fn rejects_suggestions_for_single_characters() {
        let mut config = config();
        for suggest_min in [0, 1] {
            config.search.selector = StageSelector::new(suggest_min, 3);
            let err = validate(&config, &ConfigSources::default()).expect_err("threshold too low");
            assert_eq!(err.origin, SettingSource::ConfigKey("search.suggest_min_chars"));
        }
    }

    #[test]
    fn rejects_results_sharing_the_suggestions_threshold() {
        let mut config = config();
        config.search.selector = StageSelector::new(2, 2);
        let err = validate(&config, &ConfigSources::default()).expect_err("equal thresholds");
        assert_eq!(err.key, "search.results_min_chars");
        assert!(err.reason.contains("greater than"));
    }

    #[test]
    fn accepts_raised_thresholds() {
        let mut config = config();
        config.search.selector = StageSelector::new(3, 5);
        assert!(validate(&config, &ConfigSources::default()).is_ok());
    }

    #[test]
    fn rejects_long_quiet_interval() {
        let mut config = config();
        config.search.quiet_interval = Duration::from_secs(11);
        let err = validate(&config, &ConfigSources::default()).expect_err("too long");
        assert_eq!(err.key, "search.quiet_ms");
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let mut config = config();
        config.search.location = Some(GeoPoint::new(95.0, 0.0));
        let err = validate(&config, &ConfigSources::default()).expect_err("latitude");
        assert_eq!(err.key, "search.latitude");

        config.search.location = Some(GeoPoint::new(10.0, -181.0));
        let err = validate(&config, &ConfigSources::default()).expect_err("longitude");
        assert_eq!(err.key, "search.longitude");
    }

    #[test]
    fn rejects_zero_max_suggestions() {
        let mut config = config();
        config.source.max_suggestions = 0;
        assert!(validate(&config, &ConfigSources::default()).is_err());
    }
}
