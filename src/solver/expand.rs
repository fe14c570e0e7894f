use crate::data::{Dir, DIRECTIONS};
use crate::map::GoalMap;
use crate::moves::Move;
use crate::solver::deadlocks::DeadlockDetector;
use crate::state::State;

/// All states reachable by one step or one push, in `DIRECTIONS` order.
///
/// Pushes that lead to a deadlock are dropped when a detector is given,
/// steps are never checked because moving the player alone can't deadlock a box.
pub(crate) fn successors(
    map: &GoalMap,
    state: &State,
    detector: Option<&DeadlockDetector>,
) -> Vec<(Move, State)> {
    let mut new_states = Vec::with_capacity(4);

    for &dir in &DIRECTIONS {
        let new_player_pos = state.player_pos + dir;
        if map.is_wall(new_player_pos) {
            continue;
        }

        match state.box_index(new_player_pos) {
            None => {
                new_states.push((Move::new(dir, false), state.with_step(new_player_pos)));
            }
            Some(box_index) => {
                let push_dest = new_player_pos + dir;
                if map.is_wall(push_dest) || state.has_box(push_dest) {
                    continue;
                }

                let new_state = state.with_push(box_index, push_dest);
                if let Some(detector) = detector {
                    if detector.is_deadlocked(map, &new_state) {
                        continue;
                    }
                }
                new_states.push((Move::new(dir, true), new_state));
            }
        }
    }

    new_states
}

/// Applies directions one by one without deadlock checks.
/// Returns all states including the initial one or `None` if some move is illegal.
pub(crate) fn replay<I>(map: &GoalMap, initial_state: &State, dirs: I) -> Option<Vec<State>>
where
    I: IntoIterator<Item = Dir>,
{
    let mut states = vec![initial_state.clone()];
    for dir in dirs {
        let cur = states.last()?;
        let (_, next) = successors(map, cur, None)
            .into_iter()
            .find(|(mov, _)| mov.dir == dir)?;
        states.push(next);
    }
    Some(states)
}
