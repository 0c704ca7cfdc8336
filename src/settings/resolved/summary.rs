use std::fmt::Write;

use super::ResolvedConfig;

pub(super) fn format_summary(config: &ResolvedConfig) -> String {
    let search = &config.search;
    let source = &config.source;
    let mut out = String::from("Effective configuration:\n");

    let _ = writeln!(out, "  Quiet interval: {} ms", search.quiet_interval.as_millis());
    let _ = writeln!(
        out,
        "  Suggestions from: {} chars",
        search.selector.suggest_min_chars()
    );
    let _ = writeln!(
        out,
        "  Results from: {} chars",
        search.selector.results_min_chars()
    );
    let _ = writeln!(
        out,
        "  Suggestions before results: {}",
        bool_to_word(search.selector.suggest_before_results())
    );
    let _ = writeln!(out, "  Language: {}", search.lang);
    let _ = writeln!(out, "  Sort key: {}", search.sort_key);
    if search.filters.is_empty() {
        let _ = writeln!(out, "  Filters: (none)");
    } else {
        let filters: Vec<String> = search
            .filters
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        let _ = writeln!(out, "  Filters: {}", filters.join(", "));
    }
    match search.location {
        Some(point) => {
            let _ = writeln!(out, "  Location: {}, {}", point.lat, point.lon);
        }
        None => {
            let _ = writeln!(out, "  Location: (none)");
        }
    }
    match &source.catalog {
        Some(path) => {
            let _ = writeln!(out, "  Catalog: {}", path.display());
        }
        None => {
            let _ = writeln!(out, "  Catalog: (empty)");
        }
    }
    let _ = writeln!(
        out,
        "  Latency: suggestions {} ms, results {} ms",
        source.suggest_latency.as_millis(),
        source.results_latency.as_millis()
    );
    let _ = writeln!(out, "  Max suggestions: {}", source.max_suggestions);
    if let Some(message) = &source.failure {
        let _ = writeln!(out, "  Simulated failure: {message}");
    }

    out
}

fn bool_to_word(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use typeahead::SearchConfig;
    use typeahead::source::{FilterSet, GeoPoint};

    use super::super::SourceSettings;
    use super::*;

    #[test]
    fn summary_lists_filters_and_location() {
        let mut filters = FilterSet::new();
        filters.insert("fuel", "electric");
        let config = ResolvedConfig {
            search: SearchConfig {
                filters,
                location: Some(GeoPoint::new(1.5, -2.0)),
                ..SearchConfig::default()
            },
            source: SourceSettings {
                catalog: None,
                suggest_latency: std::time::Duration::ZERO,
                results_latency: std::time::Duration::from_millis(250),
                max_suggestions: 8,
                failure: None,
            },
        };

        let summary = format_summary(&config);
        assert!(summary.contains("Quiet interval: 300 ms"));
        assert!(summary.contains("Filters: fuel=electric"));
        assert!(summary.contains("Location: 1.5, -2"));
        assert!(summary.contains("results 250 ms"));
        assert!(summary.contains("Catalog: (empty)"));
    }
}
