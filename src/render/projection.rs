//! Pure projections of live game state for display.
//!
//! Views are frozen snapshots: nothing here reads back from markup and
//! nothing here mutates a session.

use crate::battleships::session::{GameSession, Side};
use crate::core::types::Coord;
use crate::memory::game::{CardState, MemorySession};
use crate::render::markup::escape_html;
use crate::render::theme::Theme;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Water,
    /// Own ship, or an enemy ship cell under a streak reveal
    Ship,
    Miss,
    Hit,
    Sunk,
    Revealed,
}

impl CellView {
    pub fn symbol(self) -> char {
        match self {
            CellView::Water => '.',
            CellView::Ship => 'S',
            CellView::Miss => 'o',
            CellView::Hit => 'X',
            CellView::Sunk => '#',
            CellView::Revealed => '?',
        }
    }

    fn class_suffix(self) -> Option<&'static str> {
        match self {
            CellView::Water => None,
            CellView::Ship => Some("cell-ship"),
            CellView::Miss => Some("cell-miss"),
            CellView::Hit => Some("cell-hit"),
            CellView::Sunk => Some("cell-sunk"),
            CellView::Revealed => Some("cell-revealed"),
        }
    }
}

/// One grid as the player is allowed to see it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub side: Side,
    pub size: usize,
    /// Row-major
    pub cells: Vec<CellView>,
}

impl BoardView {
    /// Project `side`'s grid. Opponent ships stay hidden unless hit or
    /// currently revealed.
    pub fn project(session: &GameSession, side: Side) -> Self {
        let board = session.board(side);
        let grid = board.grid();
        let revealed = session.reveal.map(|r| r.cell);

        let cells = grid
            .coords()
            .map(|at| {
                let Some(cell) = grid.cell(at) else {
                    return CellView::Water;
                };
                let sunk = cell
                    .ship
                    .and_then(|id| board.ship(id))
                    .is_some_and(|s| s.sunk);
                match (cell.hit, cell.ship.is_some()) {
                    (true, true) if sunk => CellView::Sunk,
                    (true, true) => CellView::Hit,
                    (true, false) => CellView::Miss,
                    (false, true) if side == Side::Player => CellView::Ship,
                    (false, true) if revealed == Some(at) => CellView::Revealed,
                    _ => CellView::Water,
                }
            })
            .collect();

        Self {
            side,
            size: grid.size(),
            cells,
        }
    }

    pub fn at(&self, at: Coord) -> Option<CellView> {
        at.in_bounds(self.size)
            .then(|| self.cells[at.row * self.size + at.col])
    }

    /// One line per row, e.g. `. . X o`
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.size * self.size * 2);
        for row in self.cells.chunks(self.size.max(1)) {
            let line: Vec<String> = row.iter().map(|c| c.symbol().to_string()).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }

    /// Grid cells as themed buttons carrying their coordinates
    pub fn to_markup(&self, theme: &Theme) -> String {
        let mut out = String::new();
        for (i, cell) in self.cells.iter().enumerate() {
            let (row, col) = (i / self.size, i % self.size);
            let mut class = theme.class("cell");
            if let Some(suffix) = cell.class_suffix() {
                class.push(' ');
                class.push_str(&theme.class(suffix));
            }
            let _ = write!(
                out,
                r#"<button type="button" class="{class}" data-row="{row}" data-col="{col}"></button>"#
            );
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardView {
    FaceDown { hinted: bool },
    FaceUp(String),
    Matched(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryView {
    pub cards: Vec<CardView>,
    pub moves: u32,
    pub matches: u32,
}

impl MemoryView {
    pub fn project(session: &MemorySession) -> Self {
        let cards = session
            .cards
            .iter()
            .enumerate()
            .map(|(i, card)| match card.state {
                CardState::Matched => CardView::Matched(card.label.clone()),
                CardState::FaceUp => CardView::FaceUp(card.label.clone()),
                CardState::Hidden if session.peeking => CardView::FaceUp(card.label.clone()),
                CardState::Hidden => CardView::FaceDown {
                    hinted: session.hint == Some(i),
                },
            })
            .collect();
        Self {
            cards,
            moves: session.moves,
            matches: session.matches,
        }
    }

    pub fn to_markup(&self, theme: &Theme) -> String {
        let mut out = String::new();
        for (i, card) in self.cards.iter().enumerate() {
            let (state, label) = match card {
                CardView::FaceDown { hinted: true } => ("card-hinted", ""),
                CardView::FaceDown { hinted: false } => ("card-down", ""),
                CardView::FaceUp(label) => ("card-up", label.as_str()),
                CardView::Matched(label) => ("card-matched", label.as_str()),
            };
            let _ = write!(
                out,
                r#"<button type="button" class="{} {}" data-index="{i}">{}</button>"#,
                theme.class("card"),
                theme.class(state),
                escape_html(label)
            );
        }
        out
    }
}
