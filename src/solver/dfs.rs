use std::time::Instant;

use log::{debug, info};
use typed_arena::Arena;

use crate::config::Method;
use crate::moves::Move;
use crate::solver::backtracking::{backtrack_moves, Prevs};
use crate::solver::stats::Stats;
use crate::solver::{Solver, SolverOk};
use crate::state::State;

pub(crate) fn search(solver: &Solver<'_>, max_depth: usize, print_status: bool) -> SolverOk {
    debug!("DFS called with max depth {}", max_depth);
    let started = Instant::now();

    let mut stats = Stats::new();

    let arena = Arena::new();
    let mut prevs = Prevs::default();
    let mut to_visit: Vec<(&State, Option<(&State, Move)>, usize)> = Vec::new();

    let start: &State = arena.alloc(solver.initial_state.clone());
    stats.add_created(0);
    to_visit.push((start, None, 0));

    while let Some((cur, prev, depth)) = to_visit.pop() {
        if cur.is_goal_state(solver.map) {
            debug!("Solved, backtracking path");
            stats.add_explored(depth);
            prevs.insert(cur, prev);
            let moves = backtrack_moves(&prevs, cur);
            stats.execution_time = started.elapsed();
            info!("DFS found a solution with {} moves", moves.move_cnt());
            return SolverOk::new(Some(moves), stats, Method::Dfs);
        }

        // too deep, other branches can still succeed
        if depth > max_depth {
            continue;
        }

        if prevs.contains_key(cur) {
            stats.add_duplicate(depth);
            continue;
        }
        prevs.insert(cur, prev);

        if stats.add_explored(depth) && print_status {
            println!("Visited new depth: {}", depth);
            println!("{:?}", stats);
        }

        // reversed so the first direction is popped first
        for (mov, new_state) in solver.expand(cur).into_iter().rev() {
            stats.add_created(depth + 1);
            if prevs.contains_key(&new_state) {
                stats.add_duplicate(depth + 1);
                continue;
            }

            let new_state: &State = arena.alloc(new_state);
            to_visit.push((new_state, Some((cur, mov)), depth + 1));
        }
    }

    stats.execution_time = started.elapsed();
    info!("DFS exhausted {} states", stats.explored_nodes());
    SolverOk::new(None, stats, Method::Dfs)
}
