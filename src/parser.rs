use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::data::{Contents, MapCell, Pos};
use crate::level::Level;
use crate::map::GoalMap;
use crate::state::State;
use crate::vec2d::Vec2d;

/// Reasons a level is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserErr {
    Pos(usize, usize),
    RowLength(usize),
    MultiplePlayers,
    NoPlayer,
}

impl Display for ParserErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ParserErr::Pos(r, c) => write!(f, "Invalid cell at pos: [{}, {}]", r, c),
            ParserErr::RowLength(r) => write!(f, "Row {} has a different length than row 0", r),
            ParserErr::MultiplePlayers => write!(f, "More than one player"),
            ParserErr::NoPlayer => write!(f, "No player"),
        }
    }
}

impl Error for ParserErr {}

impl FromStr for Level {
    type Err = ParserErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // trim so we can specify levels using raw strings more easily
        let level = s.trim_matches('\n');
        if level.is_empty() {
            return Err(ParserErr::NoPlayer);
        }
        parse_rows(level.lines())
    }
}

/// Cell and its contents for one XSB symbol. Letters and `-`/`_` are the
/// alternative symbols some level collections use.
fn decode_cell(symbol: char) -> Option<(MapCell, Contents)> {
    let decoded = match symbol {
        '#' => (MapCell::Wall, Contents::Empty),
        ' ' | '-' | '_' => (MapCell::Empty, Contents::Empty),
        '.' => (MapCell::Goal, Contents::Empty),
        '$' | 'b' => (MapCell::Empty, Contents::Box),
        '*' | 'B' => (MapCell::Goal, Contents::Box),
        '@' | 'p' => (MapCell::Empty, Contents::Player),
        '+' | 'P' => (MapCell::Goal, Contents::Player),
        _ => return None,
    };
    Some(decoded)
}

/// Parses (a subset of) the format described [here](http://www.sokobano.de/wiki/index.php?title=Level_format).
/// All rows must have the same number of cells.
pub(crate) fn parse_rows<'a, I>(rows: I) -> Result<Level, ParserErr>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut grid: Vec<Vec<MapCell>> = Vec::new();
    let mut goals = Vec::new();
    let mut boxes = Vec::new();
    let mut player_pos = None;

    for (r, row) in rows.into_iter().enumerate() {
        let mut cells = Vec::with_capacity(row.len());
        for (c, symbol) in row.chars().enumerate() {
            let (cell, contents) = decode_cell(symbol).ok_or(ParserErr::Pos(r, c))?;
            let pos = Pos::new(r as i32, c as i32);

            if cell == MapCell::Goal {
                goals.push(pos);
            }
            match contents {
                Contents::Empty => {}
                Contents::Box => boxes.push(pos),
                Contents::Player => {
                    if player_pos.replace(pos).is_some() {
                        return Err(ParserErr::MultiplePlayers);
                    }
                }
            }
            cells.push(cell);
        }

        if grid.first().map_or(false, |first| first.len() != cells.len()) {
            return Err(ParserErr::RowLength(r));
        }
        grid.push(cells);
    }

    let player_pos = player_pos.ok_or(ParserErr::NoPlayer)?;
    Ok(Level::new(
        GoalMap::new(Vec2d::new(grid), goals),
        State::new(player_pos, boxes),
    ))
}
