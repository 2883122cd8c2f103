//! Interactive prompt.
//!
//! Each line is split shell-style and parsed as one of the [`Commands`]. The
//! prompt keeps going after query errors and stops on cache errors, EOF or
//! `exit`. Ctrl-C prints a reminder to type `exit` instead of quitting.

use std::io::{BufRead, Write};

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::cli::{self, Commands, OutputFormat};
use crate::client::{ClientError, DsdaClient};
use crate::site::PageFetcher;

pub const HELP_TEXT: &str = include_str!("help.txt");

const BANNER: &str = concat!("DSDA command line client v", env!("CARGO_PKG_VERSION"), ".");

pub const INTERRUPT_WARNING: &str = r#"Please type "exit" or "e" to exit the application."#;

#[derive(Parser, Debug)]
#[command(multicall = true, disable_help_subcommand = true)]
struct PromptLine {
    #[command(subcommand)]
    command: Commands,
}

/// What the prompt should do with one line of input
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Nothing,
    Exit,
    Help,
    Run(Commands),
    /// Line was not a command; print this instead
    Reject(String),
}

/// Split a line into words; quotes group words, backslash escapes the next
/// character outside single quotes. `None` on an unclosed quote.
pub fn split_words(line: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') | (Some('"'), '"') => quote = None,
            (Some('"') | None, '\\') => {
                if let Some(next) = chars.next() {
                    word.push(next);
                }
                in_word = true;
            }
            (Some(_), c) => word.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            (None, c) => {
                word.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return None;
    }
    if in_word {
        words.push(word);
    }
    Some(words)
}

fn is_command(word: &str) -> bool {
    PromptLine::command()
        .get_subcommands()
        .any(|sub| sub.get_name_and_visible_aliases().contains(&word))
}

fn parse_line(line: &str) -> Action {
    let Some(mut words) = split_words(line) else {
        return Action::Reject("No closing quotation".to_string());
    };
    let Some(first) = words.first_mut() else {
        return Action::Nothing;
    };
    *first = first.to_lowercase();

    match first.as_str() {
        "exit" | "e" => return Action::Exit,
        "help" | "h" => return Action::Help,
        _ => {}
    }

    if !is_command(first) {
        return Action::Reject(format!("Unrecognized command: {}", line.trim()));
    }

    match PromptLine::try_parse_from(&words) {
        Ok(parsed) => Action::Run(parsed.command),
        Err(e) => match e.kind() {
            ErrorKind::MissingRequiredArgument => {
                Action::Reject(format!("Not enough options for {} command!", words[0]))
            }
            _ => Action::Reject(e.render().to_string().trim_end().to_string()),
        },
    }
}

/// Report a failed command; `Err` when the prompt must stop
fn report(e: anyhow::Error) -> anyhow::Result<()> {
    match e.downcast_ref::<ClientError>() {
        Some(client_error) if client_error.is_fatal() => Err(e),
        Some(ClientError::Query(query)) => {
            println!("{query}");
            Ok(())
        }
        _ => {
            eprintln!("Error: {e:#}");
            Ok(())
        }
    }
}

/// Run the prompt over `input` until EOF or `exit`
///
/// # Errors
///
/// Returns the first fatal error, a cache error, raised by a command.
/// Replace the default Ctrl-C exit with a warning and a fresh prompt.
///
/// Installed once per process, before [`run`] reads from a terminal.
pub fn warn_on_interrupt() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        print!("\n{INTERRUPT_WARNING}\n> ");
        let _ = std::io::stdout().flush();
    })?;
    Ok(())
}

pub fn run<F: PageFetcher, R: BufRead>(
    client: &mut DsdaClient<F>,
    input: R,
    format: OutputFormat,
) -> anyhow::Result<()> {
    println!("{BANNER}");
    println!("Type help for usage info.");

    let mut lines = input.lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        match parse_line(&line?) {
            Action::Nothing => {}
            Action::Exit => break,
            Action::Help => println!("{HELP_TEXT}"),
            Action::Reject(message) => println!("{message}"),
            Action::Run(command) => {
                if let Err(e) = cli::execute(client, command, format) {
                    report(e)?;
                }
            }
        }
    }

    Ok(())
}
