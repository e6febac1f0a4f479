//! Interactive chat shell.
//!
//! Line-oriented loop: anything that is not a command is a chat query.
//! `load <file>` stages a file for future ingestion, `bye` (or Ctrl-C /
//! Ctrl-D) says farewell, persists memory, and exits.

use hearth_config::HearthConfig;
use hearth_core::{ChatSession, OutputSink, StdoutSink};
use log::debug;
use rustyline::Editor;
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use std::path::Path;

const BANNER: &str = r" Welcome to
  _  _                 _    _
 | || | ___  __ _  _ _| |_ | |_
 | __ |/ -_)/ _` || '_|  _|| ' \
 |_||_|\___|\__,_||_|  \__||_||_|
";

const FAREWELL: &str = "Goodbye";

/// Run the interactive shell until the user leaves.
///
/// Memory is persisted on every exit path, including keyboard interrupts.
pub async fn run_shell(
    config: &HearthConfig,
    session: &mut ChatSession,
    sink: &mut StdoutSink,
) -> anyhow::Result<()> {
    let mut rl: Editor<ShellHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ShellHelper));

    println!("{BANNER}");
    let prompt = format!("{} ", config.bot.user_name);

    let mut fatal: Option<ReadlineError> = None;
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if input == "bye" {
                    break;
                }
                if let Some(rest) = parse_load(input) {
                    handle_load(rest, sink)?;
                    continue;
                }
                // The outcome carries the failure kind for logging; the
                // user-facing apology has already been rendered.
                let outcome = session.take_turn(input, sink).await;
                debug!("turn outcome: {outcome:?}");
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                fatal = Some(err);
                break;
            }
        }
    }

    crate::persist(session, &config.memory.dir);
    sink.line(FAREWELL)?;
    match fatal {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Split a `load` command off the input, if present.
fn parse_load(input: &str) -> Option<&str> {
    if input == "load" {
        return Some("");
    }
    input.strip_prefix("load ").map(str::trim)
}

/// Stage a file for future ingestion. Placeholder: ingestion into the
/// vector index is a separate offline step for now.
fn handle_load(file: &str, sink: &mut StdoutSink) -> std::io::Result<()> {
    if file.is_empty() {
        sink.line("Please provide a file. You can tab-complete.")
    } else {
        sink.line(&format!("Loading {file}..."))
    }
}

/// Readline helper providing filename completion for `load`.
struct ShellHelper;

const LOAD_PREFIX: &str = "load ";

/// Regular files in `dir` whose names contain `partial`, sorted.
fn matching_files(partial: &str, dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.contains(partial))
        .collect();
    names.sort();
    names
}

impl Completer for ShellHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if !line.starts_with(LOAD_PREFIX) || pos < LOAD_PREFIX.len() {
            return Ok((0, Vec::new()));
        }
        let partial = &line[LOAD_PREFIX.len()..pos];
        Ok((LOAD_PREFIX.len(), matching_files(partial, Path::new("."))))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}
impl Validator for ShellHelper {}
impl rustyline::Helper for ShellHelper {}

#[cfg(test)]
mod tests {
    use super::{matching_files, parse_load};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn parse_load_extracts_the_filename() {
        assert_eq!(parse_load("load notes.txt"), Some("notes.txt"));
        assert_eq!(parse_load("load   notes.txt "), Some("notes.txt"));
        assert_eq!(parse_load("load"), Some(""));
        assert_eq!(parse_load("loaded question"), None);
        assert_eq!(parse_load("what is rust?"), None);
    }

    #[test]
    fn completion_lists_matching_regular_files_only() {
        let temp = tempdir().expect("tempdir");
        std::fs::write(temp.path().join("alpha.txt"), "a").expect("write");
        std::fs::write(temp.path().join("beta.md"), "b").expect("write");
        std::fs::create_dir(temp.path().join("alpha-dir")).expect("mkdir");

        assert_eq!(matching_files("alpha", temp.path()), vec!["alpha.txt"]);
        let all = matching_files("", temp.path());
        assert_eq!(all, vec!["alpha.txt", "beta.md"]);
    }
}
