pub(crate) mod expand;

mod a_star;
mod backtracking;
mod bfs;
mod deadlocks;
mod dfs;
mod heuristic;
mod stats;

use std::fmt::{self, Debug, Formatter};

use log::debug;

use crate::config::{Method, SolverConfig};
use crate::data::{Dir, Pos};
use crate::level::Level;
use crate::map::GoalMap;
use crate::moves::{Move, Moves};
use crate::state::State;
use crate::Solve;

use self::deadlocks::DeadlockDetector;
use self::heuristic::Heuristic;

pub use self::stats::Stats;

/// Whether generated pushes are checked for deadlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlockMode {
    Check,
    /// For replaying moves, never used by the search itself unless pruning is disabled.
    Skip,
}

pub struct SolverOk {
    /// `None` if the search space was exhausted without reaching the goal.
    pub moves: Option<Moves>,
    pub stats: Stats,
    pub method: Method,
}

impl SolverOk {
    fn new(moves: Option<Moves>, stats: Stats, method: Method) -> Self {
        Self {
            moves,
            stats,
            method,
        }
    }
}

impl Debug for SolverOk {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.moves {
            None => writeln!(f, "No solution")?,
            Some(ref moves) => writeln!(f, "{}: {}", self.method, moves)?,
        }
        write!(f, "{:?}", self.stats)
    }
}

/// Everything about a level that doesn't change during the search.
///
/// Dead squares are computed once here and shared by all strategies.
#[derive(Debug)]
pub struct Solver<'a> {
    map: &'a GoalMap,
    initial_state: &'a State,
    config: SolverConfig,
    detector: DeadlockDetector,
    heuristic: Heuristic,
}

impl<'a> Solver<'a> {
    /// The heuristic weights in `config` must pass `HeuristicWeights::validate`.
    pub fn new(level: &'a Level, config: SolverConfig) -> Self {
        debug_assert_eq!(config.weights.validate(), Ok(()));
        debug!("Processing level...");
        let detector = DeadlockDetector::new(&level.map);
        let heuristic = Heuristic::new(config.distance, config.weights);
        debug!("Processed level");

        Self {
            map: &level.map,
            initial_state: &level.state,
            config,
            detector,
            heuristic,
        }
    }

    pub fn map(&self) -> &'a GoalMap {
        self.map
    }

    pub fn initial_state(&self) -> &'a State {
        self.initial_state
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// States reachable by one step or push, in the order up, down, left, right.
    pub fn successors(&self, state: &State, mode: DeadlockMode) -> Vec<(Move, State)> {
        match mode {
            DeadlockMode::Check => expand::successors(self.map, state, Some(&self.detector)),
            DeadlockMode::Skip => expand::successors(self.map, state, None),
        }
    }

    /// Successors as the search strategies see them.
    pub(crate) fn expand(&self, state: &State) -> Vec<(Move, State)> {
        if self.config.prune_deadlocks {
            self.successors(state, DeadlockMode::Check)
        } else {
            self.successors(state, DeadlockMode::Skip)
        }
    }

    pub fn is_deadlocked(&self, state: &State) -> bool {
        self.detector.is_deadlocked(self.map, state)
    }

    pub fn is_dead_square(&self, pos: Pos) -> bool {
        self.map.is_inside_bounds(pos) && self.detector.dead_squares[pos]
    }

    /// The A* estimate including the tie-breaking terms.
    pub fn heuristic(&self, state: &State) -> f64 {
        self.heuristic.estimate(self.map, state)
    }

    /// Total distance of the optimal box-goal matching,
    /// never more than the number of pushes still needed.
    pub fn lower_bound(&self, state: &State) -> f64 {
        self.heuristic.lower_bound(self.map, state)
    }

    /// All states visited by following `dirs` from the initial state,
    /// `None` if some move isn't possible.
    pub fn replay<I: IntoIterator<Item = Dir>>(&self, dirs: I) -> Option<Vec<State>> {
        expand::replay(self.map, self.initial_state, dirs)
    }

    /// Shortest solution by move count.
    pub fn bfs(&self, print_status: bool) -> SolverOk {
        bfs::search(self, print_status)
    }

    /// Depth-first search that doesn't expand states deeper than `max_depth`.
    pub fn dfs(&self, max_depth: usize, print_status: bool) -> SolverOk {
        dfs::search(self, max_depth, print_status)
    }

    /// Best-first search on `moves + heuristic`.
    /// Only optimal with `HeuristicWeights::admissible`.
    pub fn a_star(&self, print_status: bool) -> SolverOk {
        a_star::search(self, print_status)
    }

    pub fn solve(&self, method: Method, print_status: bool) -> SolverOk {
        match method {
            Method::Bfs => self.bfs(print_status),
            Method::Dfs => self.dfs(self.config.max_depth, print_status),
            Method::AStar => self.a_star(print_status),
        }
    }
}

impl Solve for Level {
    fn solve(&self, method: Method, config: &SolverConfig, print_status: bool) -> SolverOk {
        Solver::new(self, *config).solve(method, print_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::{HashMap, HashSet, VecDeque};

    use crate::config::{DistanceMode, HeuristicWeights, METHODS};

    const WALK_AND_PUSH: &str = r"
#######
#@    #
# $  .#
#######";

    const ONE_WAY: &str = r"
###
#.#
# #
# #
#$#
#@#
###";

    const TWO_BOXES: &str = r"
#######
#     #
# $$  #
#@  ..#
#######";

    const EXTRA_GOAL: &str = r"
######
#@$ .#
#  . #
######";

    const UNREACHABLE_GOAL: &str = r"
#####
#@$ #
#####
#.  #
#####";

    fn solve(level: &str, method: Method) -> SolverOk {
        let level: Level = level.parse().unwrap();
        level.solve(method, &SolverConfig::default(), false)
    }

    /// Plain BFS without any pruning, returns the optimal move count.
    fn brute_force(level: &Level) -> Option<usize> {
        let mut depths = HashMap::new();
        let mut to_visit = VecDeque::new();
        depths.insert(level.state.clone(), 0);
        to_visit.push_back(level.state.clone());

        while let Some(cur) = to_visit.pop_front() {
            let depth = depths[&cur];
            if cur.is_goal_state(&level.map) {
                return Some(depth);
            }
            for (_, next) in expand::successors(&level.map, &cur, None) {
                if !depths.contains_key(&next) {
                    depths.insert(next.clone(), depth + 1);
                    to_visit.push_back(next);
                }
            }
        }
        None
    }

    /// Every state reachable from the start without any pruning.
    fn reachable_states(level: &Level) -> Vec<State> {
        let mut seen = HashSet::new();
        let mut to_visit = vec![level.state.clone()];
        seen.insert(level.state.clone());
        while let Some(cur) = to_visit.pop() {
            for (_, next) in expand::successors(&level.map, &cur, None) {
                if seen.insert(next.clone()) {
                    to_visit.push(next);
                }
            }
        }
        seen.into_iter().collect()
    }

    /// Fewest pushes needed to solve from `start`.
    /// 0-1 BFS: steps are free so they go to the front of the queue.
    fn min_pushes(map: &GoalMap, start: &State) -> Option<usize> {
        let mut pushes = HashMap::new();
        let mut to_visit = VecDeque::new();
        pushes.insert(start.clone(), 0);
        to_visit.push_back(start.clone());

        while let Some(cur) = to_visit.pop_front() {
            let cur_pushes = pushes[&cur];
            if cur.is_goal_state(map) {
                return Some(cur_pushes);
            }
            for (mov, next) in expand::successors(map, &cur, None) {
                let cost = if mov.is_push() { cur_pushes + 1 } else { cur_pushes };
                if pushes.get(&next).map_or(false, |&known| known <= cost) {
                    continue;
                }
                pushes.insert(next.clone(), cost);
                if mov.is_push() {
                    to_visit.push_back(next);
                } else {
                    to_visit.push_front(next);
                }
            }
        }
        None
    }

    #[test]
    fn counting_pushes() {
        let level: Level = WALK_AND_PUSH.parse().unwrap();
        assert_eq!(min_pushes(&level.map, &level.state), Some(3));
        let level: Level = EXTRA_GOAL.parse().unwrap();
        assert_eq!(min_pushes(&level.map, &level.state), None);
    }

    fn reaches_goal(level: &Level, moves: &Moves) -> bool {
        let solver = Solver::new(level, SolverConfig::default());
        match solver.replay(moves.dirs()) {
            Some(states) => states.last().map_or(false, |s| s.is_goal_state(&level.map)),
            None => false,
        }
    }

    #[test]
    fn bfs_walk_and_push() {
        let ok = solve(WALK_AND_PUSH, Method::Bfs);
        let moves = ok.moves.unwrap();
        assert_eq!(moves.to_string(), "dRRR");
        assert_eq!(moves.codes(), "DRRR");
        assert_eq!(moves.move_cnt(), 4);
        assert_eq!(moves.push_cnt(), 3);
        assert!(ok.stats.explored_nodes() > 0);
    }

    #[test]
    fn bfs_is_optimal() {
        for &level in &[WALK_AND_PUSH, ONE_WAY, TWO_BOXES] {
            let parsed: Level = level.parse().unwrap();
            let expected = brute_force(&parsed);
            let bfs = solve(level, Method::Bfs).moves.map(|m| m.move_cnt());
            assert_eq!(bfs, expected, "{}", level);
        }
    }

    #[test]
    fn bfs_not_longer_than_others() {
        for &level in &[WALK_AND_PUSH, ONE_WAY, TWO_BOXES] {
            let bfs = solve(level, Method::Bfs).moves.unwrap().move_cnt();
            let a_star = solve(level, Method::AStar).moves.unwrap().move_cnt();
            let dfs = solve(level, Method::Dfs).moves.unwrap().move_cnt();
            assert!(bfs <= a_star, "{}", level);
            assert!(bfs <= dfs, "{}", level);
        }
    }

    #[test]
    fn solutions_reach_goal() {
        for &level in &[WALK_AND_PUSH, ONE_WAY, TWO_BOXES] {
            let parsed: Level = level.parse().unwrap();
            for &method in &METHODS {
                let moves = solve(level, method).moves.unwrap();
                assert!(reaches_goal(&parsed, &moves), "{} {}", method, level);
            }
        }
    }

    #[test]
    fn deterministic() {
        for &method in &METHODS {
            let first = solve(TWO_BOXES, method);
            let second = solve(TWO_BOXES, method);
            assert_eq!(first.moves, second.moves);
            assert_eq!(
                first.stats.explored_nodes(),
                second.stats.explored_nodes()
            );
        }
    }

    #[test]
    fn one_way() {
        let ok = solve(ONE_WAY, Method::AStar);
        assert_eq!(ok.moves.unwrap().to_string(), "UUU");
    }

    #[test]
    fn no_solution_extra_goal() {
        for &method in &METHODS {
            let ok = solve(EXTRA_GOAL, method);
            assert!(ok.moves.is_none(), "{}", method);
            assert!(ok.stats.explored_nodes() > 0);
        }
    }

    #[test]
    fn no_solution_unreachable_goal() {
        for &method in &METHODS {
            let ok = solve(UNREACHABLE_GOAL, method);
            assert!(ok.moves.is_none());
            // the only push is into a corner
            assert_eq!(ok.stats.explored_nodes(), 1);
        }
    }

    #[test]
    fn no_pruning_explores_more() {
        let level: Level = UNREACHABLE_GOAL.parse().unwrap();
        let config = SolverConfig {
            prune_deadlocks: false,
            ..SolverConfig::default()
        };
        let ok = level.solve(Method::Bfs, &config, false);
        assert!(ok.moves.is_none());
        // the push into the corner and the step back out of it
        assert_eq!(ok.stats.explored_nodes(), 3);
    }

    #[test]
    fn dfs_depth_limit() {
        let level: Level = WALK_AND_PUSH.parse().unwrap();
        let solver = Solver::new(&level, SolverConfig::default());
        assert!(solver.dfs(2, false).moves.is_none());
        assert!(solver.dfs(3, false).moves.is_some());
        assert!(solver.dfs(1000, false).moves.is_some());
    }

    #[test]
    fn dfs_tries_directions_in_order() {
        // both up and right are possible from the start
        let ok = solve(TWO_BOXES, Method::Dfs);
        let moves = ok.moves.unwrap().to_string();
        assert!(moves.starts_with("uurD"), "{}", moves);

        let level: Level = TWO_BOXES.parse().unwrap();
        let solver = Solver::new(&level, SolverConfig::default());
        let first: Vec<_> = solver
            .successors(&level.state, DeadlockMode::Check)
            .into_iter()
            .map(|(mov, _)| mov.to_string())
            .collect();
        assert_eq!(first, vec!["u", "r"]);
    }

    #[test]
    fn lower_bound_is_admissible() {
        for &level in &[WALK_AND_PUSH, ONE_WAY, TWO_BOXES] {
            let parsed: Level = level.parse().unwrap();
            let states = reachable_states(&parsed);
            for &distance in &[DistanceMode::Manhattan, DistanceMode::Euclidean] {
                let config = SolverConfig {
                    distance,
                    ..SolverConfig::default()
                };
                let solver = Solver::new(&parsed, config);
                for state in &states {
                    if let Some(pushes) = min_pushes(&parsed.map, state) {
                        let bound = solver.lower_bound(state);
                        assert!(bound <= pushes as f64, "{} > {}\n{}", bound, pushes, level);
                    }
                }
            }
        }
    }

    #[test]
    fn admissible_a_star_is_optimal() {
        for &level in &[WALK_AND_PUSH, ONE_WAY, TWO_BOXES] {
            let parsed: Level = level.parse().unwrap();
            let config = SolverConfig {
                weights: HeuristicWeights::admissible(),
                ..SolverConfig::default()
            };
            let a_star = parsed.solve(Method::AStar, &config, false);
            let bfs = parsed.solve(Method::Bfs, &config, false);
            // the bound changes by at most 1 per move so it's consistent
            assert_eq!(
                a_star.moves.unwrap().move_cnt(),
                bfs.moves.unwrap().move_cnt(),
                "{}",
                level
            );
        }
    }

    #[test]
    fn solver_queries() {
        let level: Level = WALK_AND_PUSH.parse().unwrap();
        let solver = Solver::new(&level, SolverConfig::default());
        assert!(solver.is_dead_square(Pos::new(1, 1)));
        assert!(!solver.is_dead_square(Pos::new(2, 2)));
        assert!(!solver.is_dead_square(Pos::new(-1, 7)));
        assert!(!solver.is_deadlocked(&level.state));
        assert_eq!(solver.lower_bound(&level.state), 3.0);
        assert_eq!(solver.successors(&level.state, DeadlockMode::Check).len(), 2);
    }

    #[test]
    fn formatting_result() {
        let ok = solve(ONE_WAY, Method::Bfs);
        let out = format!("{:?}", ok);
        assert!(out.starts_with("bfs: UUU\n"));

        let ok = solve(EXTRA_GOAL, Method::Bfs);
        assert!(format!("{:?}", ok).starts_with("No solution\n"));
    }
}
