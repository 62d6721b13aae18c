use crossterm::style::{Color, Stylize};

use std::fmt;

use crate::maze::Terrain;

/// One character cell of the rendered maze. Maze cells and the walls between them
/// each take one `GridCell`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridCell {
    Wall,
    /// An open cell or passage in a plain maze
    Open,
    /// An open cell in a weighted maze
    Ground(Terrain),
    /// Reached by the current search
    Visited,
    /// Part of the found path
    Route,
    Start,
    Goal,
}

impl GridCell {
    /// The width of each cell when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            GridCell::Wall => "⬜".with(Color::White),
            GridCell::Open => "  ".with(Color::Reset),
            GridCell::Ground(terrain) => match terrain {
                Terrain::Grass => "░░".with(Color::DarkGreen),
                Terrain::Mud => "▒▒".with(Color::DarkYellow),
                Terrain::Water => "≈≈".with(Color::Blue),
            },
            GridCell::Visited => "* ".with(Color::Cyan),
            GridCell::Route => "🟨".with(Color::Yellow),
            GridCell::Start => "🟩".with(Color::Green),
            GridCell::Goal => "🟥".with(Color::Red),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                GridCell::CELL_WIDTH as usize,
                "Each cell must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unicode_width::UnicodeWidthStr;

    #[test]
    fn test_every_cell_is_two_columns_wide() {
        let cells = [
            GridCell::Wall,
            GridCell::Open,
            GridCell::Ground(Terrain::Grass),
            GridCell::Ground(Terrain::Mud),
            GridCell::Ground(Terrain::Water),
            GridCell::Visited,
            GridCell::Route,
            GridCell::Start,
            GridCell::Goal,
        ];
        for cell in cells {
            // Display asserts the width in debug builds; check the visible text too
            let rendered = cell.to_string();
            assert!(rendered.width() >= GridCell::CELL_WIDTH as usize, "{:?}", cell);
        }
    }
}
