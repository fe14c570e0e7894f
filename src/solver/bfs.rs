use std::collections::VecDeque;
use std::time::Instant;

use log::{debug, info};
use typed_arena::Arena;

use crate::config::Method;
use crate::solver::backtracking::{backtrack_moves, Prevs};
use crate::solver::stats::Stats;
use crate::solver::{Solver, SolverOk};
use crate::state::State;

pub(crate) fn search(solver: &Solver<'_>, print_status: bool) -> SolverOk {
    debug!("BFS called");
    let started = Instant::now();

    let mut stats = Stats::new();

    // states live in the arena so the other collections only hold references
    let arena = Arena::new();
    let mut prevs = Prevs::default();
    let mut to_visit = VecDeque::new();

    let start: &State = arena.alloc(solver.initial_state.clone());
    stats.add_created(0);
    // BFS marks states as seen when they're discovered, a later path can't be shorter
    prevs.insert(start, None);
    to_visit.push_back((start, 0));

    while let Some((cur, depth)) = to_visit.pop_front() {
        if stats.add_explored(depth) && print_status {
            println!("Visited new depth: {}", depth);
            println!("{:?}", stats);
        }

        if cur.is_goal_state(solver.map) {
            debug!("Solved, backtracking path");
            let moves = backtrack_moves(&prevs, cur);
            stats.execution_time = started.elapsed();
            info!("BFS found a solution with {} moves", moves.move_cnt());
            return SolverOk::new(Some(moves), stats, Method::Bfs);
        }

        for (mov, new_state) in solver.expand(cur) {
            stats.add_created(depth + 1);
            if prevs.contains_key(&new_state) {
                stats.add_duplicate(depth + 1);
                continue;
            }

            let new_state: &State = arena.alloc(new_state);
            prevs.insert(new_state, Some((cur, mov)));
            to_visit.push_back((new_state, depth + 1));
        }
    }

    stats.execution_time = started.elapsed();
    info!("BFS exhausted {} states", stats.explored_nodes());
    SolverOk::new(None, stats, Method::Bfs)
}
