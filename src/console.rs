//! Console front end: one action per line on stdin, notices on stdout.
//!
//! Line format:
//!
//! ```text
//! <action> [key=value ...]
//! add-to-list list-name="Sunday night" film-id=603
//! ```
//!
//! Values containing spaces are double-quoted. `show`, `help` and `quit` are
//! handled here; everything else becomes an [`Action`] through
//! [`Action::from_trigger`].

use std::collections::HashMap;
use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use crate::controller::{Action, Controller, Interaction, Render};
use crate::error::AppError;

pub const HELP: &str = "\
Actions:
  add-list                                  create an empty list (prompts for a name)
  delete-list list-name=<name>              delete a list (asks to confirm)
  create-list film-id=<id>                  new list holding a catalog film
  add-to-list list-name=<name> film-id=<id> add a catalog film to a list
  remove-film list-name=<name> film-id=<id> remove a film from a list
  toggle-watchlist film-id=<id>             add to or remove from the watchlist
Other:
  show    print all lists
  help    print this help
  quit    exit";

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Help,
    Quit,
    Action(Action),
}

/// Terminal-backed [`Interaction`].
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Print `prompt` and read one line. `None` at end of input.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>, AppError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn print(&mut self, text: &str) -> Result<(), AppError> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Interaction for Console<R, W> {
    fn prompt_text(&mut self, message: &str) -> Option<String> {
        match self.read_line(&format!("{message} ")) {
            Ok(line) => line.map(|l| l.trim().to_string()),
            Err(e) => {
                warn!("console prompt failed: {e}");
                None
            }
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        match self.read_line(&format!("{message} [y/N] ")) {
            Ok(Some(answer)) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Ok(None) => false,
            Err(e) => {
                warn!("console confirm failed: {e}");
                false
            }
        }
    }

    fn notify(&mut self, message: &str) {
        if let Err(e) = writeln!(self.output, "! {message}") {
            warn!("console notify failed: {e}");
        }
    }
}

/// Parse one console line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, AppError> {
    let tokens = tokenize(line)?;
    let Some((head, rest)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match head.as_str() {
        "show" | "ls" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        identifier => {
            let mut attrs = HashMap::new();
            for token in rest {
                let (key, value) = token.split_once('=').ok_or_else(|| {
                    AppError::UnknownAction(format!("{identifier}: expected key=value, got '{token}'"))
                })?;
                attrs.insert(key.to_string(), value.to_string());
            }
            Command::Action(Action::from_trigger(identifier, &attrs)?)
        }
    };
    Ok(Some(command))
}

/// Split on whitespace, keeping double-quoted runs together.
fn tokenize(line: &str) -> Result<Vec<String>, AppError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    tokens.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if quoted {
        return Err(AppError::UnknownAction(format!("unterminated quote in '{line}'")));
    }
    if pending {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Read and dispatch lines until `quit` or end of input.
pub fn run<R, W, V>(controller: &mut Controller<Console<R, W>, V>) -> Result<(), AppError>
where
    R: BufRead,
    W: Write,
    V: Render,
{
    info!("console started");
    controller.ui_mut().print("Film lists. Type `help` for actions, `quit` to exit.")?;

    while let Some(line) = controller.ui_mut().read_line("> ")? {
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                controller.ui_mut().notify(&e.to_string());
                continue;
            }
        };
        debug!(?command, "console command");

        let result = match command {
            Command::Quit => break,
            Command::Help => controller.ui_mut().print(HELP),
            Command::Show => controller.refresh(),
            Command::Action(action) => controller.dispatch(action).map(|_| ()),
        };

        // A failed action ends that action, not the session.
        if let Err(e) = result {
            warn!("action failed: {e}");
            let hint = match &e {
                AppError::StorageParse { .. } => " (start with --reset-lists to discard stored lists)",
                _ => "",
            };
            controller.ui_mut().notify(&format!("error: {e}{hint}"));
        }
    }

    info!("console closed");
    Ok(())
}
