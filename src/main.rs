mod cli;
mod settings;
mod workflow;

use anyhow::Result;
use cli::{OutputFormat, parse_cli, print_json, print_plain};
use settings::ResolvedConfig;
use workflow::{ReplayWorkflow, ScriptStep, load_script};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = parse_cli();
    typeahead::logging::initialize(cli.verbose)?;

    let resolved = settings::load(&cli)?;

    if cli.print_config {
        resolved.print_summary();
    }

    let steps = load_script(cli.script.as_deref())?;
    run_replay(cli.output, resolved, steps).await
}

/// Replay the script and print the final state in the chosen format.
async fn run_replay(
    format: OutputFormat,
    settings: ResolvedConfig,
    steps: Vec<ScriptStep>,
) -> Result<()> {
    let workflow = ReplayWorkflow::from_config(settings, steps)?;
    let outcome = workflow.run().await;

    match format {
        OutputFormat::Plain => print_plain(&outcome),
        OutputFormat::Json => print_json(&outcome)?,
    }

    Ok(())
}
