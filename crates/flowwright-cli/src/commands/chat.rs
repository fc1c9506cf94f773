//! `flowwright chat` command implementation
//!
//! Generates a workflow, prints it, then relays questions to a session
//! grounded in that workflow. Replies are printed as they stream in.

use super::copy;
use super::generate::generate_into;
use crate::CliError;
use crate::output::{self, OutputFormat};
use colored::Colorize;
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;
use flowwright_foundation::Assistant;
use flowwright_foundation::session::{AppStatus, TurnOutcome};
use std::io::Write;
use std::path::Path;

/// One line typed at the chat prompt
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ChatInput {
    Quit,
    Help,
    Steps,
    Copy(usize),
    New(String),
    Message(String),
    Invalid(String),
    Empty,
}

impl ChatInput {
    pub(crate) fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ChatInput::Empty;
        }
        let Some(command) = trimmed.strip_prefix('/') else {
            return ChatInput::Message(line.to_string());
        };
        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map(|(n, a)| (n, a.trim()))
            .unwrap_or((command, ""));

        match name {
            "quit" | "exit" | "q" => ChatInput::Quit,
            "help" | "?" => ChatInput::Help,
            "steps" => ChatInput::Steps,
            "copy" => match arg.parse() {
                Ok(n) => ChatInput::Copy(n),
                Err(_) => ChatInput::Invalid("usage: /copy <step number>".to_string()),
            },
            "new" if !arg.is_empty() => ChatInput::New(arg.to_string()),
            "new" => ChatInput::Invalid("usage: /new <goal>".to_string()),
            other => ChatInput::Invalid(format!("unknown command /{other}, try /help")),
        }
    }
}

const HELP: &str = "\
  /steps        show the current workflow
  /copy <n>     copy the code snippet of step n
  /new <goal>   design a new workflow (starts a fresh conversation)
  /quit         leave";

/// Execute the `flowwright chat` command
pub async fn run(
    config: Option<&Path>,
    goal: Option<String>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let settings = super::load_settings(config)?;
    let mut assistant = super::build_assistant(&settings)?;
    let theme = ColorfulTheme::default();

    let goal = match goal {
        Some(goal) => goal,
        None => Input::<String>::with_theme(&theme)
            .with_prompt("What should the workflow achieve?")
            .interact_text()?,
    };
    start_workflow(&mut assistant, goal, format).await?;
    println!("{}", "Type /help for commands.".dimmed());

    loop {
        let line: String = Input::with_theme(&theme)
            .with_prompt("you")
            .allow_empty(true)
            .interact_text()?;

        match ChatInput::parse(&line) {
            ChatInput::Empty => continue,
            ChatInput::Quit => break,
            ChatInput::Help => println!("{HELP}"),
            ChatInput::Invalid(msg) => println!("{}", msg.yellow()),
            ChatInput::Steps => {
                println!("{}", output::render_workflow(assistant.workflow(), format)?)
            }
            ChatInput::Copy(n) => {
                if let Err(e) = copy::copy_step(assistant.workflow(), n) {
                    println!("{}", e.to_string().yellow());
                }
            }
            ChatInput::New(goal) => {
                // keep chatting about the previous plan when the new one fails
                if let Err(e) = start_workflow(&mut assistant, goal, format).await {
                    println!("{}", e.to_string().red());
                }
            }
            ChatInput::Message(text) => relay(&mut assistant, text).await?,
        }
    }

    Ok(())
}

async fn start_workflow(
    assistant: &mut Assistant,
    goal: String,
    format: OutputFormat,
) -> Result<(), CliError> {
    generate_into(assistant, goal).await?;
    println!("{}", output::render_workflow(assistant.workflow(), format)?);
    if let Some(greeting) = assistant.state().last_reply() {
        println!("\n{} {}", "assistant:".green().bold(), greeting);
    }
    Ok(())
}

/// Stream one reply, printing only the part of the tail not yet shown.
async fn relay(assistant: &mut Assistant, text: String) -> Result<(), CliError> {
    print!("{} ", "assistant:".green().bold());
    std::io::stdout().flush()?;

    let mut shown = 0usize;
    let outcome = assistant
        .send_message(text, |state| {
            // the fallback after a failure is not a continuation of the tail
            if state.status == AppStatus::Chatting
                && let Some(reply) = state.last_reply()
                && reply.len() > shown
                && reply.is_char_boundary(shown)
            {
                print!("{}", &reply[shown..]);
                let _ = std::io::stdout().flush();
                shown = reply.len();
            }
        })
        .await;

    match outcome {
        TurnOutcome::Completed { .. } => println!(),
        TurnOutcome::Failed { .. } => {
            println!();
            if let Some(fallback) = assistant.state().last_reply() {
                println!("{}", fallback.yellow());
            }
        }
        TurnOutcome::NoSession => println!("{}", "No workflow yet; use /new <goal>.".yellow()),
        TurnOutcome::EmptyMessage => println!(),
        TurnOutcome::Busy(e) => println!("{}", e.to_string().yellow()),
    }
    Ok(())
}
