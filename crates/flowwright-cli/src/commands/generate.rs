//! `flowwright generate` command implementation

use crate::CliError;
use crate::output::{self, OutputFormat, ProgressBar};
use colored::Colorize;
use flowwright_foundation::session::GenerateOutcome;
use flowwright_foundation::{Assistant, GoalIntake};
use std::path::Path;

/// Execute the `flowwright generate` command
pub async fn run(config: Option<&Path>, goal: String, format: OutputFormat) -> Result<(), CliError> {
    // Reject before touching settings or the network
    if GoalIntake::accept(goal.as_str()).is_none() {
        return Err(CliError::EmptyGoal);
    }

    let settings = super::load_settings(config)?;
    let mut assistant = super::build_assistant(&settings)?;

    generate_into(&mut assistant, goal).await?;
    println!("{}", output::render_workflow(assistant.workflow(), format)?);
    Ok(())
}

/// Run one generation with a spinner, mapping the outcome to a CLI result.
pub(crate) async fn generate_into(assistant: &mut Assistant, goal: String) -> Result<usize, CliError> {
    let spinner = ProgressBar::new_spinner("Designing workflow...");
    match assistant.generate_workflow(goal).await {
        GenerateOutcome::Generated(count) => {
            spinner.finish_with_message(&format!("Workflow ready: {count} steps"));
            Ok(count)
        }
        GenerateOutcome::Rejected => {
            spinner.abandon_with_message("No goal given");
            Err(CliError::EmptyGoal)
        }
        GenerateOutcome::Busy(e) => {
            spinner.abandon_with_message("Assistant busy");
            Err(CliError::Other(e.to_string()))
        }
        GenerateOutcome::Failed(e) => {
            spinner.abandon_with_message(&format!("{}", "Generation failed, please try again".red()));
            Err(CliError::Generation(e))
        }
    }
}
