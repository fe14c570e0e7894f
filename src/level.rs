use std::fmt::{self, Debug, Display, Formatter};

use crate::map::GoalMap;
use crate::map_formatter::MapFormatter;
use crate::moves::Moves;
use crate::parser::{self, ParserErr};
use crate::solution_formatter::SolutionFormatter;
use crate::state::State;

#[derive(Clone, PartialEq, Eq)]
pub struct Level {
    pub map: GoalMap,
    pub state: State,
}

impl Level {
    pub(crate) fn new(map: GoalMap, state: State) -> Self {
        Level { map, state }
    }

    /// Builds a level from rows of equal length as read from a level file.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, ParserErr> {
        parser::parse_rows(rows.iter().map(AsRef::as_ref))
    }

    pub fn xsb(&self) -> MapFormatter<'_> {
        self.map.format_with_state(&self.state)
    }

    /// Renders the states along `moves`; `None` if the moves are not legal in this level.
    pub fn format_solution<'a>(
        &'a self,
        moves: &'a Moves,
        include_steps: bool,
    ) -> Option<SolutionFormatter<'a>> {
        SolutionFormatter::new(&self.map, &self.state, moves, include_steps)
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.xsb())
    }
}

impl Debug for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.xsb())
    }
}
