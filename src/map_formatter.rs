use std::fmt::{self, Debug, Display, Formatter};

use crate::data::{Contents, MapCell, Pos};
use crate::state::State;
use crate::vec2d::Vec2d;

/// Renders a grid, optionally with a state on top of it, in XSB format.
pub struct MapFormatter<'a> {
    grid: &'a Vec2d<MapCell>,
    state: Option<&'a State>,
}

impl<'a> MapFormatter<'a> {
    pub(crate) fn new(grid: &'a Vec2d<MapCell>, state: Option<&'a State>) -> Self {
        Self { grid, state }
    }

    fn write_to_formatter(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut contents = self.grid.scratchpad();
        if let Some(state) = self.state {
            for &b in state.boxes() {
                contents[b] = Contents::Box;
            }
            contents[state.player()] = Contents::Player;
        }

        for r in 0..self.grid.rows() {
            let line: String = (0..self.grid.cols())
                .map(|c| Pos::new(r as i32, c as i32))
                .map(|pos| symbol(self.grid[pos], contents[pos]))
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// XSB symbol of a cell. Walls never hold anything.
fn symbol(cell: MapCell, contents: Contents) -> char {
    match cell {
        MapCell::Wall => '#',
        MapCell::Empty => [' ', '$', '@'][contents as usize],
        MapCell::Goal => ['.', '*', '+'][contents as usize],
    }
}

impl<'a> Display for MapFormatter<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_to_formatter(f)
    }
}

impl<'a> Debug for MapFormatter<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
