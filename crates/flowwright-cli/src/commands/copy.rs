//! `flowwright copy` command implementation

use crate::CliError;
use colored::Colorize;
use flowwright_foundation::workflow::WorkflowStep;
use std::path::Path;
use tracing::warn;

/// Execute the `flowwright copy` command
pub fn run(file: &Path, step: usize) -> Result<(), CliError> {
    let content = std::fs::read_to_string(file)?;
    let steps: Vec<WorkflowStep> = serde_json::from_str(&content)?;
    copy_step(&steps, step)
}

/// Code snippet of the 1-based step `number`.
pub(crate) fn snippet(steps: &[WorkflowStep], number: usize) -> Result<(&WorkflowStep, &str), CliError> {
    let step = number
        .checked_sub(1)
        .and_then(|i| steps.get(i))
        .ok_or(CliError::StepOutOfRange {
            step: number,
            len: steps.len(),
        })?;
    let code = step
        .code_snippet
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .ok_or(CliError::NoCodeSnippet(number))?;
    Ok((step, code))
}

/// Best effort: without a usable clipboard the snippet is printed instead.
pub(crate) fn copy_step(steps: &[WorkflowStep], number: usize) -> Result<(), CliError> {
    let (step, code) = snippet(steps, number)?;
    match write_clipboard(code) {
        Ok(()) => println!(
            "{} Copied the code of step {number} ({}) to the clipboard",
            "✓".green(),
            step.title
        ),
        Err(e) => {
            warn!(error = %e, "clipboard unavailable; printing the snippet instead");
            println!("{code}");
        }
    }
    Ok(())
}

fn write_clipboard(text: &str) -> Result<(), arboard::Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_string())
}
