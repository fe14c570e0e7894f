use crate::config::{DistanceMode, HeuristicWeights};
use crate::map::GoalMap;
use crate::state::State;

/// Estimates the remaining cost of a state for A*.
///
/// The base is the minimal total box-goal distance over all one-to-one
/// matchings, which never overestimates the number of remaining pushes.
/// The weighted terms added on top only break ties.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Heuristic {
    distance: DistanceMode,
    weights: HeuristicWeights,
}

impl Heuristic {
    pub(crate) fn new(distance: DistanceMode, weights: HeuristicWeights) -> Self {
        Self { distance, weights }
    }

    pub(crate) fn lower_bound(&self, map: &GoalMap, state: &State) -> f64 {
        self.assignment(map, state).cost
    }

    pub(crate) fn estimate(&self, map: &GoalMap, state: &State) -> f64 {
        let assignment = self.assignment(map, state);

        let nearest_box = state
            .boxes
            .iter()
            .map(|&box_pos| state.player_pos.dist(box_pos))
            .min()
            .unwrap_or(0);

        assignment.cost
            + self.weights.longest_match * assignment.longest
            + self.weights.nearest_box * f64::from(nearest_box)
    }

    fn assignment(&self, map: &GoalMap, state: &State) -> Assignment {
        let costs: Vec<Vec<f64>> = state
            .boxes
            .iter()
            .map(|&box_pos| {
                map.goals
                    .iter()
                    .map(|&goal| match self.distance {
                        DistanceMode::Manhattan => f64::from(box_pos.dist(goal)),
                        DistanceMode::Euclidean => box_pos.euclidean_dist(goal),
                    })
                    .collect()
            })
            .collect();
        min_cost_assignment(&costs)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Assignment {
    pub(crate) cost: f64,
    /// Largest single cost among the matched pairs.
    pub(crate) longest: f64,
}

pub(crate) fn min_cost_assignment(costs: &[Vec<f64>]) -> Assignment {
    let mut cost = 0.0;
    let mut longest: f64 = 0.0;
    for (r, c) in matching(costs) {
        cost += costs[r][c];
        longest = longest.max(costs[r][c]);
    }
    Assignment { cost, longest }
}

/// Minimum cost matching of a rectangular cost matrix as (row, column) pairs sorted by row.
/// Every row is matched if there are at most as many rows as columns,
/// otherwise every column is.
fn matching(costs: &[Vec<f64>]) -> Vec<(usize, usize)> {
    let rows = costs.len();
    let cols = costs.first().map_or(0, Vec::len);
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    let mut pairs = if rows <= cols {
        hungarian(rows, cols, |r, c| costs[r][c])
    } else {
        hungarian(cols, rows, |r, c| costs[c][r])
            .into_iter()
            .map(|(c, r)| (r, c))
            .collect()
    };
    pairs.sort();
    pairs
}

// Reference: Andrey Lopatin (https://cp-algorithms.com/graph/hungarian-algorithm.html).
// Requires n <= m. Returns the matched (row, column) pairs.
fn hungarian<F: Fn(usize, usize) -> f64>(n: usize, m: usize, a: F) -> Vec<(usize, usize)> {
    // 1-indexed with a dummy 0 element
    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; m + 1];
    let mut p = vec![0; m + 1];
    let mut way = vec![0; m + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0;
        let mut minv = vec![std::f64::INFINITY; m + 1];
        let mut used = vec![false; m + 1];

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = std::f64::INFINITY;
            let mut j1 = 0;

            for j in 1..=m {
                if !used[j] {
                    let cur = a(i0 - 1, j - 1) - u[i0] - v[j];
                    if cur < minv[j] {
                        minv[j] = cur;
                        way[j] = j0;
                    }
                    if minv[j] < delta {
                        delta = minv[j];
                        j1 = j;
                    }
                }
            }

            for j in 0..=m {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    (1..=m)
        .filter(|&j| p[j] != 0)
        .map(|j| (p[j] - 1, j - 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::level::Level;

    fn matrix(rows: &[&[i32]]) -> Vec<Vec<f64>> {
        rows.iter()
            .map(|row| row.iter().map(|&x| f64::from(x)).collect())
            .collect()
    }

    #[test]
    fn square_assignment() {
        let costs = matrix(&[&[8, 4, 7], &[5, 2, 3], &[9, 4, 8]]);
        let assignment = min_cost_assignment(&costs);
        assert_eq!(assignment.cost, 15.0);
        assert_eq!(assignment.longest, 8.0);
        assert_eq!(matching(&costs), vec![(0, 0), (1, 2), (2, 1)]);
    }

    #[test]
    fn rectangular_assignment() {
        let wide = matrix(&[&[3, 1, 4]]);
        assert_eq!(min_cost_assignment(&wide).cost, 1.0);
        assert_eq!(matching(&wide), vec![(0, 1)]);

        let tall = matrix(&[&[1, 5], &[2, 1], &[9, 3]]);
        let assignment = min_cost_assignment(&tall);
        assert_eq!(assignment.cost, 2.0);
        assert_eq!(assignment.longest, 1.0);
        assert_eq!(matching(&tall), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn empty_assignment() {
        let assignment = min_cost_assignment(&[]);
        assert_eq!(assignment.cost, 0.0);
        assert!(matching(&[]).is_empty());
    }

    #[test]
    fn manhattan_estimate() {
        let level = r"
#######
#@    #
# $  .#
#######";
        let level: Level = level.parse().unwrap();
        let heuristic = Heuristic::new(DistanceMode::Manhattan, HeuristicWeights::default());
        assert_eq!(heuristic.lower_bound(&level.map, &level.state), 3.0);
        // 3 + 0.2 * 3 + 0.5 * 2
        let estimate = heuristic.estimate(&level.map, &level.state);
        assert!((estimate - 4.6).abs() < 1e-9);

        let admissible = Heuristic::new(DistanceMode::Manhattan, HeuristicWeights::admissible());
        assert_eq!(admissible.estimate(&level.map, &level.state), 3.0);
    }

    #[test]
    fn euclidean_estimate() {
        let level = r"
#######
#@    #
# $   #
#    .#
#######";
        let level: Level = level.parse().unwrap();
        let heuristic = Heuristic::new(DistanceMode::Euclidean, HeuristicWeights::admissible());
        let bound = heuristic.lower_bound(&level.map, &level.state);
        assert!((bound - 10f64.sqrt()).abs() < 1e-9);

        let manhattan = Heuristic::new(DistanceMode::Manhattan, HeuristicWeights::admissible());
        assert!(bound < manhattan.lower_bound(&level.map, &level.state));
    }

    #[test]
    fn solved_state_costs_nothing() {
        let level = r"
#####
#@* #
#####";
        let level: Level = level.parse().unwrap();
        let heuristic = Heuristic::new(DistanceMode::Manhattan, HeuristicWeights::default());
        // only the player term remains
        assert_eq!(heuristic.estimate(&level.map, &level.state), 0.5);
    }
}
