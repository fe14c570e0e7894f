use log::debug;

use crate::data::{Dir, Pos, DIRECTIONS};
use crate::map::GoalMap;
use crate::state::State;
use crate::vec2d::Vec2d;

/// Rejects states from which the level can't be solved anymore.
///
/// Dead squares depend only on the map so they're computed once per level,
/// frozen boxes depend on the state so they're computed for every push.
#[derive(Debug, Clone)]
pub(crate) struct DeadlockDetector {
    pub(crate) dead_squares: Vec2d<bool>,
}

impl DeadlockDetector {
    pub(crate) fn new(map: &GoalMap) -> Self {
        let dead_squares = find_dead_squares(map);
        debug!(
            "Found {} dead squares",
            dead_squares.positions().filter(|&pos| dead_squares[pos]).count()
        );
        Self { dead_squares }
    }

    pub(crate) fn is_deadlocked(&self, map: &GoalMap, state: &State) -> bool {
        for &box_pos in &state.boxes {
            if map.is_goal(box_pos) {
                continue;
            }
            // the corner test is subsumed by dead squares unless the box started there
            if self.dead_squares[box_pos] || is_corner(map, box_pos) {
                return true;
            }
        }

        let frozen = frozen_boxes(map, state);
        state
            .boxes
            .iter()
            .zip(&frozen)
            .any(|(&box_pos, &is_frozen)| is_frozen && !map.is_goal(box_pos))
    }
}

fn is_corner(map: &GoalMap, pos: Pos) -> bool {
    (map.is_wall(pos + Dir::Up) || map.is_wall(pos + Dir::Down))
        && (map.is_wall(pos + Dir::Left) || map.is_wall(pos + Dir::Right))
}

/// Cells where a box can never reach a goal: corners and straight runs along a wall
/// between two corners without any goal on them.
#[inline(never)] // this is called only once and this way it's easier to see in callgrind
pub(crate) fn find_dead_squares(map: &GoalMap) -> Vec2d<bool> {
    let mut dead_squares = map.grid.scratchpad();

    let corners: Vec<_> = map
        .grid
        .positions()
        .filter(|&pos| !map.is_wall(pos) && !map.is_goal(pos) && is_corner(map, pos))
        .collect();

    for &corner in &corners {
        dead_squares[corner] = true;
        mark_dead_run(map, &mut dead_squares, corner, Dir::Right);
        mark_dead_run(map, &mut dead_squares, corner, Dir::Down);
    }

    dead_squares
}

fn mark_dead_run(map: &GoalMap, dead_squares: &mut Vec2d<bool>, corner: Pos, dir: Dir) {
    let (side_a, side_b) = match dir {
        Dir::Left | Dir::Right => (Dir::Up, Dir::Down),
        Dir::Up | Dir::Down => (Dir::Left, Dir::Right),
    };

    // the run is dead only if one whole side of it is wall
    let mut wall_a = map.is_wall(corner + side_a);
    let mut wall_b = map.is_wall(corner + side_b);

    let mut end = corner + dir;
    loop {
        if map.is_wall(end) || map.is_goal(end) {
            return;
        }
        wall_a &= map.is_wall(end + side_a);
        wall_b &= map.is_wall(end + side_b);
        if !wall_a && !wall_b {
            return;
        }
        if map.is_wall(end + dir) {
            // reached the opposite corner
            break;
        }
        end = end + dir;
    }

    let mut pos = corner;
    while pos != end {
        dead_squares[pos] = true;
        pos = pos + dir;
    }
    dead_squares[end] = true;
}

/// Fixed point over box indices. Every box starts frozen and becomes movable
/// once it can be pushed in some direction where both the cell behind it
/// (for the player) and the cell beyond it are free or hold a box
/// that is already known to be movable.
pub(crate) fn frozen_boxes(map: &GoalMap, state: &State) -> Vec<bool> {
    let mut frozen = vec![true; state.boxes.len()];

    let mut to_check: Vec<usize> = (0..state.boxes.len()).collect();
    while let Some(index) = to_check.pop() {
        if !frozen[index] {
            continue;
        }

        let box_pos = state.boxes[index];
        let movable = DIRECTIONS.iter().any(|&dir| {
            is_free_or_movable(map, state, &frozen, box_pos + dir)
                && is_free_or_movable(map, state, &frozen, box_pos - dir)
        });
        if !movable {
            continue;
        }

        frozen[index] = false;
        // only neighbors can depend on this box
        for &neighbor in &box_pos.neighbors() {
            if let Some(neighbor_index) = state.box_index(neighbor) {
                if frozen[neighbor_index] {
                    to_check.push(neighbor_index);
                }
            }
        }
    }

    frozen
}

fn is_free_or_movable(map: &GoalMap, state: &State, frozen: &[bool], pos: Pos) -> bool {
    if map.is_wall(pos) {
        return false;
    }
    match state.box_index(pos) {
        None => true,
        Some(index) => !frozen[index],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::level::Level;

    fn deadlocked(level: &str) -> bool {
        let level: Level = level.parse().unwrap();
        let detector = DeadlockDetector::new(&level.map);
        detector.is_deadlocked(&level.map, &level.state)
    }

    #[test]
    fn dead_squares() {
        let level = r"
######
#@  .#
#    #
######";
        let level: Level = level.parse().unwrap();
        let expected = r"
000000
010000
011110
000000
"
        .trim_start_matches('\n');
        assert_eq!(find_dead_squares(&level.map).to_string(), expected);
    }

    #[test]
    fn dead_squares_corridor() {
        // the bottom row can't be left because nothing can push up from below,
        // the right column leads to a goal
        let level = r"
#######
# ### #
#   #.#
#@    #
#######";
        let level: Level = level.parse().unwrap();
        let expected = r"
0000000
0100010
0101000
0111110
0000000
"
        .trim_start_matches('\n');
        assert_eq!(find_dead_squares(&level.map).to_string(), expected);
    }

    #[test]
    fn goals_are_never_dead() {
        let level = r"
#####
#. .#
# @ #
#. .#
#####";
        let level: Level = level.parse().unwrap();
        let dead_squares = find_dead_squares(&level.map);
        for &goal in level.map.goals() {
            assert!(!dead_squares[goal]);
        }
    }

    #[test]
    fn box_in_corner() {
        let level = r"
#####
#$  #
#  @#
#.  #
#####";
        assert!(deadlocked(level));
    }

    #[test]
    fn pushing_toward_movable_boxes() {
        // the middle box has walls above and below, both horizontal pushes
        // go into a box that can itself be moved out of the way
        let level = r"
#########
#   #   #
#  $$$  #
#   #   #
#  @ ...#
#########";
        let parsed: Level = level.parse().unwrap();
        assert_eq!(frozen_boxes(&parsed.map, &parsed.state), vec![false; 3]);
        assert!(!deadlocked(level));
    }

    #[test]
    fn box_surrounded_by_movable_boxes() {
        let level = r"
#########
#       #
#   $   #
#  $$$  #
#   $   #
#  @    #
#.....  #
#########";
        let parsed: Level = level.parse().unwrap();
        assert_eq!(frozen_boxes(&parsed.map, &parsed.state), vec![false; 5]);
        assert!(!deadlocked(level));
    }

    #[test]
    fn box_on_goal_in_corner() {
        let level = r"
#####
#*  #
#  @#
#   #
#####";
        assert!(!deadlocked(level));
    }

    #[test]
    fn box_along_dead_wall() {
        let level = r"
######
#@  .#
# $  #
######";
        assert!(deadlocked(level));
    }

    #[test]
    fn free_box() {
        let level = r"
######
#@   #
# $ .#
#    #
######";
        assert!(!deadlocked(level));
    }

    #[test]
    fn frozen_pair_against_wall() {
        // neither box is in a corner but they block each other
        let level = r"
#########
#       #
#  ##   #
#  $$   #
#  @    #
#  ..   #
#########";
        let parsed: Level = level.parse().unwrap();
        assert_eq!(parsed.state.boxes(), &[Pos::new(3, 3), Pos::new(3, 4)]);
        assert_eq!(frozen_boxes(&parsed.map, &parsed.state), vec![true, true]);
        assert!(deadlocked(level));
    }

    #[test]
    fn pair_with_one_box_free() {
        // the right box can be pushed down which frees the left one
        let level = r"
#########
#       #
#  #    #
#  $$   #
#  @    #
#  ..   #
#########";
        let parsed: Level = level.parse().unwrap();
        assert_eq!(frozen_boxes(&parsed.map, &parsed.state), vec![false, false]);
        assert!(!deadlocked(level));
    }

    #[test]
    fn frozen_pair_on_goals() {
        let level = r"
#########
#       #
#  ##   #
#  **   #
#  @    #
#       #
#########";
        assert!(!deadlocked(level));
    }

    #[test]
    fn frozen_pair_half_on_goal() {
        let level = r"
#########
#       #
#  ##   #
#  *$   #
#  @ .  #
#       #
#########";
        assert!(deadlocked(level));
    }
}
