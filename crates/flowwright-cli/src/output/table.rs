//! Table formatting for CLI output

use comfy_table::{Cell, Color, ContentArrangement, Table};
use flowwright_foundation::workflow::WorkflowStep;

/// One row per step; long text wraps to the terminal width.
pub fn workflow_table(steps: &[WorkflowStep]) -> Table {
    let mut table = Table::new();
    table
        .set_header(vec![
            Cell::new("#"),
            Cell::new("Title"),
            Cell::new("Type"),
            Cell::new("Description"),
            Cell::new("LLM config"),
            Cell::new("Code"),
        ])
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);

    for (i, step) in steps.iter().enumerate() {
        let llm = step
            .llm_config
            .as_ref()
            .map(|c| c.summary())
            .unwrap_or_default();
        let code = if step.has_code() {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&step.title),
            Cell::new(step.node_type.label()).fg(Color::Cyan),
            Cell::new(&step.description),
            Cell::new(llm),
            code,
        ]);
    }
    table
}
