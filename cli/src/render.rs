use std::fmt::{self, Write as _};
use std::io::Write;

use tripwire_core::{CellView, GameOutcome, InvalidMove, Renderer};

fn cell_glyph(cell: CellView) -> char {
    match cell {
        CellView::Hidden => '-',
        CellView::Flagged => 'F',
        CellView::Revealed(count) => char::from(b'0' + count),
        CellView::Mine => 'X',
    }
}

/// Formats the grid with column indices on top and row indices on the left.
pub fn format_grid(rows: &[Vec<CellView>]) -> String {
    let width = rows.len().saturating_sub(1).to_string().len();
    let mut out = String::new();

    let _ = write!(out, "{:width$} ", "");
    for col in 0..rows.first().map_or(0, Vec::len) {
        let _ = write!(out, " {:>width$}", col);
    }
    out.push('\n');

    for (row, cells) in rows.iter().enumerate() {
        let _ = write!(out, "{:>width$} ", row);
        for &cell in cells {
            let _ = write!(out, " {:>width$}", cell_glyph(cell));
        }
        out.push('\n');
    }
    out
}

/// Prints the board and game messages to a terminal.
pub struct TextRenderer<W> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        if let Err(err) = self.out.write_fmt(args) {
            log::warn!("Could not write to the terminal: {}", err);
        }
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, rows: &[Vec<CellView>]) {
        self.emit(format_args!("\n{}", format_grid(rows)));
    }

    fn reject(&mut self, reason: InvalidMove) {
        self.emit(format_args!("Invalid move: {}\n", reason));
    }

    fn announce(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Won => self.emit(format_args!("You won!\n")),
            GameOutcome::Lost => self.emit(format_args!("You lost!\n")),
            GameOutcome::Saved | GameOutcome::Quit => {}
        }
    }
}
