//! Interactive line-based shell.

use crate::render;
use anyhow::{Context, Result};
use derive_more::{Display, Error};
use derive_new::new;
use power_tictactoe::{Command, Event, Position, Session};
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

/// Help text listing the shell commands.
pub const HELP: &str = "\
Commands:
  place <row> <col>   place a mark (rows and columns start at 1)
  <row> <col>         same as place
  ai                  let the AI play the current turn
  undo                take back the last move (your last move against the AI)
  swap                exchange display symbols when the swap is available
  reset               start a new game
  help                show this help
  quit                leave";

/// A parsed line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Engine command.
    Game(ShellCommand),
    /// Print help.
    Help,
    /// Leave the shell.
    Quit,
}

/// Commands forwarded to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    /// Place at a zero-based position.
    Place(Position),
    /// AI plays the current turn.
    Ai,
    /// Take back.
    Undo,
    /// Swap symbols.
    Swap,
    /// New game.
    Reset,
}

impl From<ShellCommand> for Command {
    fn from(cmd: ShellCommand) -> Self {
        match cmd {
            ShellCommand::Place(pos) => Command::Place(pos),
            ShellCommand::Ai => Command::AiMove,
            ShellCommand::Undo => Command::Undo,
            ShellCommand::Swap => Command::Swap,
            ShellCommand::Reset => Command::Reset,
        }
    }
}

/// Input that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum InputError {
    /// Blank line.
    #[display("Type a command, or `help`")]
    Empty,

    /// First word is not a command.
    #[display("Unknown command: {}", _0)]
    Unknown(#[error(not(source))] String),

    /// Coordinates missing or extra words given.
    #[display("Expected a row and a column, like `place 1 3`")]
    Coordinates,

    /// Coordinate is not a number.
    #[display("Not a number: {}", _0)]
    NotANumber(#[error(not(source))] String),

    /// Coordinates are one-based.
    #[display("Rows and columns are numbered from 1")]
    ZeroIndex,
}

fn coordinate(word: &str) -> Result<usize, InputError> {
    let n: usize = word
        .parse()
        .map_err(|_| InputError::NotANumber(word.to_string()))?;
    n.checked_sub(1).ok_or(InputError::ZeroIndex)
}

fn position(words: &[&str]) -> Result<Position, InputError> {
    match words {
        [row, col] => Ok(Position::new(coordinate(row)?, coordinate(col)?)),
        _ => Err(InputError::Coordinates),
    }
}

impl FromStr for Input {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = words.first() else {
            return Err(InputError::Empty);
        };
        let game = |cmd| Ok(Input::Game(cmd));
        match first.to_ascii_lowercase().as_str() {
            "place" | "p" => game(ShellCommand::Place(position(&words[1..])?)),
            "ai" => game(ShellCommand::Ai),
            "undo" | "u" => game(ShellCommand::Undo),
            "swap" => game(ShellCommand::Swap),
            "reset" | "new" => game(ShellCommand::Reset),
            "help" | "h" | "?" => Ok(Input::Help),
            "quit" | "q" | "exit" => Ok(Input::Quit),
            _ if first.chars().all(|c| c.is_ascii_digit()) => {
                game(ShellCommand::Place(position(&words)?))
            }
            other => Err(InputError::Unknown(other.to_string())),
        }
    }
}

/// Reads commands from `input`, applies them to the session and writes
/// the game to `output` after each one.
#[derive(new)]
pub struct Shell<R, W> {
    session: Session,
    input: R,
    output: W,
    json: bool,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// The session being played.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs until `quit` or end of input.
    #[instrument(skip(self), fields(json = self.json))]
    pub fn run(&mut self) -> Result<()> {
        info!("Shell started");
        writeln!(self.output, "Power Tic-Tac-Toe. Type `help` for commands.\n")?;
        self.show()?;

        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            line.clear();
            let read = self.input.read_line(&mut line).context("Reading input")?;
            if read == 0 {
                debug!("End of input");
                break;
            }

            match line.parse::<Input>() {
                Ok(Input::Quit) => break,
                Ok(Input::Help) => writeln!(self.output, "{HELP}")?,
                Ok(Input::Game(cmd)) => {
                    self.execute(cmd)?;
                    self.show()?;
                }
                Err(InputError::Empty) => {}
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }

        writeln!(self.output, "Bye!")?;
        info!(moves = self.session.state().history().len(), "Shell finished");
        Ok(())
    }

    fn execute(&mut self, cmd: ShellCommand) -> Result<()> {
        debug!(?cmd, "Executing");
        match self.session.dispatch(cmd.into()) {
            Ok(event) => self.report(&event),
            Err(e) => {
                warn!(error = %e, "Command rejected");
                writeln!(self.output, "Error: {e}")?;
                Ok(())
            }
        }
    }

    fn report(&mut self, event: &Event) -> Result<()> {
        let state = self.session.state();
        match event {
            Event::Moved(reports) | Event::Reset(reports) => {
                if matches!(event, Event::Reset(_)) {
                    writeln!(self.output, "New game.")?;
                }
                for report in reports {
                    let line = render::move_line(
                        state,
                        &report.applied,
                        report.extra_turn,
                        report.swap_unlocked,
                    );
                    writeln!(self.output, "{line}")?;
                }
            }
            Event::Undone(moves) => {
                for mov in moves {
                    writeln!(self.output, "Undid {} at {}", mov.player, mov.position)?;
                }
            }
            Event::Swapped => writeln!(self.output, "Symbols swapped.")?,
        }
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let state = self.session.state();
        if self.json {
            let text = serde_json::to_string_pretty(state).context("Serializing game state")?;
            writeln!(self.output, "{text}")?;
        } else {
            writeln!(self.output, "{}\n", render::game(state))?;
        }
        Ok(())
    }
}

#[cfg(test)]
impl<R, W> Shell<R, W> {
    /// Consumes the shell, returning its output sink.
    pub fn into_output(self) -> W {
        self.output
    }
}
