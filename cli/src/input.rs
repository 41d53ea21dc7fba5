use std::io::{BufRead, Write};

use thiserror::Error;
use tripwire_core::{Board, Move, MoveAction};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error("expected a row and a column, like `3 4` or `f 3 4`")]
    MissingCoords,
    #[error("too many numbers, expected a row and a column")]
    TooManyCoords,
    #[error("`{0}` is not a number")]
    NotANumber(String),
}

/// Parses one line of player input.
///
/// `save` or `s` saves and quits. Otherwise the line holds a row and a column, and any `f` turns
/// the move into a flag toggle (`f 3 4`, `3,4 F`). A leading `r` reads as reveal.
pub fn parse_move(line: &str) -> Result<Move, ParseMoveError> {
    let line = line.trim().to_ascii_lowercase();
    if line == "save" || line == "s" {
        return Ok(Move::Save);
    }

    let action = if line.contains('f') {
        MoveAction::Flag
    } else {
        MoveAction::Reveal
    };

    let mut numbers = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|token| token.trim_matches(|c: char| c.is_ascii_alphabetic()))
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<i32>()
                .map_err(|_| ParseMoveError::NotANumber(token.to_string()))
        });

    let row = numbers.next().ok_or(ParseMoveError::MissingCoords)??;
    let col = numbers.next().ok_or(ParseMoveError::MissingCoords)??;
    if numbers.next().is_some() {
        return Err(ParseMoveError::TooManyCoords);
    }

    Ok(Move::Cell { action, row, col })
}

/// Reads moves from a line-based reader, re-prompting on malformed lines.
pub struct TerminalInput<R, W> {
    reader: R,
    prompt: W,
}

impl<R: BufRead, W: Write> TerminalInput<R, W> {
    pub fn new(reader: R, prompt: W) -> Self {
        Self { reader, prompt }
    }

    fn ask(&mut self, text: &str) {
        if let Err(err) = write!(self.prompt, "{}", text).and_then(|()| self.prompt.flush()) {
            log::warn!("Could not write prompt: {}", err);
        }
    }
}

impl<R: BufRead, W: Write> tripwire_core::MoveSource for TerminalInput<R, W> {
    fn next_move(&mut self, board: &Board) -> Option<Move> {
        self.ask(&format!(
            "Move (row col, prefix f to flag, `save` to quit) [{} mines left]: ",
            board.mines_left()
        ));

        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => {
                    log::error!("Could not read input: {}", err);
                    return None;
                }
            }

            match parse_move(&line) {
                Ok(next) => return Some(next),
                Err(err) => self.ask(&format!("Invalid input: {}. Try again: ", err)),
            }
        }
    }
}
