use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Instant;

use log::{debug, info};
use typed_arena::Arena;

use crate::config::Method;
use crate::moves::Move;
use crate::solver::backtracking::{backtrack_moves, Prevs};
use crate::solver::stats::Stats;
use crate::solver::{Solver, SolverOk};
use crate::state::State;

#[derive(Debug)]
struct SearchNode<'a> {
    state: &'a State,
    prev: Option<(&'a State, Move)>,
    dist: usize,
    /// `dist + heuristic`
    cost: f64,
}

impl<'a> SearchNode<'a> {
    fn new(state: &'a State, prev: Option<(&'a State, Move)>, dist: usize, h: f64) -> Self {
        Self {
            state,
            prev,
            dist,
            cost: dist as f64 + h,
        }
    }
}

impl Ord for SearchNode<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // never NaN as long as the weights are valid
        self.cost
            .partial_cmp(&other.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.dist.cmp(&other.dist))
            // the rest only makes the order deterministic
            .then_with(|| self.state.cmp(other.state))
            .then_with(|| self.prev.cmp(&other.prev))
    }
}

impl PartialOrd for SearchNode<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SearchNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode<'_> {}

pub(crate) fn search(solver: &Solver<'_>, print_status: bool) -> SolverOk {
    debug!("A* called");
    let started = Instant::now();

    let mut stats = Stats::new();

    let arena = Arena::new();
    // also serves as the closed set
    let mut prevs = Prevs::default();
    let mut to_visit = BinaryHeap::new();

    let start: &State = arena.alloc(solver.initial_state.clone());
    stats.add_created(0);
    to_visit.push(Reverse(SearchNode::new(
        start,
        None,
        0,
        solver.heuristic(start),
    )));

    while let Some(Reverse(cur_node)) = to_visit.pop() {
        if prevs.contains_key(cur_node.state) {
            stats.add_duplicate(cur_node.dist);
            continue;
        }

        // insert here and not as soon as we discover it
        // otherwise we overwrite the shortest path with longer ones
        prevs.insert(cur_node.state, cur_node.prev);

        if stats.add_explored(cur_node.dist) && print_status {
            println!("Visited new depth: {}", cur_node.dist);
            println!("{:?}", stats);
        }

        if cur_node.state.is_goal_state(solver.map) {
            debug!("Solved, backtracking path");
            let moves = backtrack_moves(&prevs, cur_node.state);
            stats.execution_time = started.elapsed();
            info!("A* found a solution with {} moves", moves.move_cnt());
            return SolverOk::new(Some(moves), stats, Method::AStar);
        }

        for (mov, new_state) in solver.expand(cur_node.state) {
            stats.add_created(cur_node.dist + 1);
            if prevs.contains_key(&new_state) {
                stats.add_duplicate(cur_node.dist + 1);
                continue;
            }

            let h = solver.heuristic(&new_state);
            let new_state: &State = arena.alloc(new_state);
            to_visit.push(Reverse(SearchNode::new(
                new_state,
                Some((cur_node.state, mov)),
                cur_node.dist + 1,
                h,
            )));
        }
    }

    stats.execution_time = started.elapsed();
    info!("A* exhausted {} states", stats.explored_nodes());
    SolverOk::new(None, stats, Method::AStar)
}
