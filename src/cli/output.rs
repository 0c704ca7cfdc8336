use anyhow::Result;
use serde_json::json;

use crate::workflow::ReplayOutcome;

/// Print a plain-text representation of the final search state.
pub(crate) fn print_plain(outcome: &ReplayOutcome) {
    print!("{}", format_outcome_plain(outcome));
}

pub(crate) fn format_outcome_plain(outcome: &ReplayOutcome) -> String {
    let state = &outcome.state;
    let mut out = format!("Query: '{}'\n", state.live_query);

    if state.suggestions_open && !state.suggestions.is_empty() {
        out.push_str("Suggestions:\n");
        for suggestion in &state.suggestions {
            out.push_str(&format!("  {}\n", suggestion.text));
        }
    }

    if state.results.is_empty() {
        out.push_str("No results\n");
    } else {
        out.push_str(&format!("Results ({}):\n", state.results.len()));
        for result in &state.results {
            match result.distance_km {
                Some(km) => {
                    out.push_str(&format!("  {} [{}] {km:.1} km\n", result.title, result.id))
                }
                None => out.push_str(&format!("  {} [{}]\n", result.title, result.id)),
            }
        }
    }

    if let Some(error) = &state.last_error {
        out.push_str(&format!(
            "Error ({} for '{}'): {}\n",
            error.stage, error.query, error.message
        ));
    }

    out
}

/// Format the replay outcome as a JSON string.
pub(crate) fn format_outcome_json(outcome: &ReplayOutcome) -> Result<String> {
    let payload = json!({
        "steps": outcome.steps,
        "elapsed_ms": u64::try_from(outcome.elapsed.as_millis()).unwrap_or(u64::MAX),
        "state": outcome.state,
    });

    Ok(serde_json::to_string_pretty(&payload)?)
}

/// Print the JSON representation of the replay outcome.
pub(crate) fn print_json(outcome: &ReplayOutcome) -> Result<()> {
    println!("{}", format_outcome_json(outcome)?);
    Ok(())
}
