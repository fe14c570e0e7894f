use fnv::FnvHashMap;

use crate::moves::{Move, Moves};
use crate::state::State;

/// Maps every reached state to the state and move it was reached by.
/// The initial state maps to `None`.
pub(crate) type Prevs<'a> = FnvHashMap<&'a State, Option<(&'a State, Move)>>;

pub(crate) fn backtrack_moves<'a>(prevs: &Prevs<'a>, final_state: &'a State) -> Moves {
    let mut moves = Moves::default();
    let mut cur = final_state;
    while let Some(&Some((prev, mov))) = prevs.get(cur) {
        moves.add(mov);
        cur = prev;
    }
    moves.reverse();
    moves
}
