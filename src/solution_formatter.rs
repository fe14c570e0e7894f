use std::fmt::{self, Debug, Display, Formatter};

use crate::map::GoalMap;
use crate::moves::Moves;
use crate::solver::expand;
use crate::state::State;

/// Prints the initial state followed by the state after each push
/// (or after every move if `include_steps` is set).
pub struct SolutionFormatter<'a> {
    map: &'a GoalMap,
    moves: &'a Moves,
    states: Vec<State>,
    include_steps: bool,
}

impl<'a> SolutionFormatter<'a> {
    pub(crate) fn new(
        map: &'a GoalMap,
        initial_state: &'a State,
        moves: &'a Moves,
        include_steps: bool,
    ) -> Option<Self> {
        let states = expand::replay(map, initial_state, moves.dirs())?;
        Some(Self {
            map,
            moves,
            states,
            include_steps,
        })
    }
}

impl Display for SolutionFormatter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.map.format_with_state(&self.states[0]))?;
        for (mov, state) in self.moves.iter().zip(&self.states[1..]) {
            if mov.is_push || self.include_steps {
                writeln!(f, "{}", self.map.format_with_state(state))?;
            }
        }
        Ok(())
    }
}

impl Debug for SolutionFormatter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
