use std::fmt::{self, Debug, Display, Formatter};
use std::time::Duration;

use separator::Separatable;

/// Search statistics, returned even when no solution exists.
///
/// Every generated state is counted as created at its depth, then later
/// either as explored (expanded) or as a duplicate (rejected as already seen).
/// The rest were still waiting in the frontier (or cut by the DFS depth limit)
/// when the search ended.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Stats {
    created_states: Vec<usize>,
    explored_states: Vec<usize>,
    duplicate_states: Vec<usize>,
    pub execution_time: Duration,
}

impl Stats {
    pub(crate) fn new() -> Self {
        Stats::default()
    }

    pub fn total_created(&self) -> usize {
        self.created_states.iter().sum()
    }

    /// Number of states the strategy actually expanded.
    pub fn explored_nodes(&self) -> usize {
        self.explored_states.iter().sum()
    }

    pub fn total_duplicates(&self) -> usize {
        self.duplicate_states.iter().sum()
    }

    /// Deepest level at which anything was explored.
    pub fn max_explored_depth(&self) -> Option<usize> {
        self.explored_states.iter().rposition(|&cnt| cnt > 0)
    }

    /// Returns true when this is the first state created at `depth`.
    pub(crate) fn add_created(&mut self, depth: usize) -> bool {
        Self::add(&mut self.created_states, depth)
    }

    /// Returns true when this is the first state explored at `depth`.
    pub(crate) fn add_explored(&mut self, depth: usize) -> bool {
        Self::add(&mut self.explored_states, depth)
    }

    pub(crate) fn add_duplicate(&mut self, depth: usize) -> bool {
        Self::add(&mut self.duplicate_states, depth)
    }

    fn add(counts: &mut Vec<usize>, depth: usize) -> bool {
        let mut ret = false;

        // while because some depths might be skipped (A* jumps around)
        while depth >= counts.len() {
            counts.push(0);
            ret = true;
        }
        counts[depth] += 1;
        ret
    }

    fn execution_ms(&self) -> u64 {
        // separator doesn't support u128
        self.execution_time.as_millis() as u64
    }
}

fn count_at(counts: &[usize], depth: usize) -> usize {
    counts.get(depth).cloned().unwrap_or(0)
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let created = self.total_created();
        let explored = self.explored_nodes();
        let duplicates = self.total_duplicates();
        let left = created.saturating_sub(explored + duplicates);
        writeln!(f, "States created total: {}", created.separated_string())?;
        writeln!(f, "Explored total: {}", explored.separated_string())?;
        writeln!(f, "Reached duplicates total: {}", duplicates.separated_string())?;
        writeln!(f, "Created but not reached total: {}", left.separated_string())?;
        writeln!(f, "Execution time: {} ms", self.execution_ms().separated_string())?;
        writeln!(f)?;

        writeln!(
            f,
            "{:<15}{:<15}{:<15}{:<15}{}",
            "Depth", "Created", "Explored", "Duplicates", "Unknown (not reached)"
        )?;
        // created_states is the longest because nothing is explored without being created
        for depth in 0..self.created_states.len() {
            let created = self.created_states[depth];
            let explored = count_at(&self.explored_states, depth);
            let duplicates = count_at(&self.duplicate_states, depth);
            let left = created.saturating_sub(explored + duplicates);
            writeln!(
                f,
                "{:<15}{:<15}{:<15}{:<15}{}",
                format!("{}:", depth),
                created.separated_string(),
                explored.separated_string(),
                duplicates.separated_string(),
                left.separated_string()
            )?;
        }
        Ok(())
    }
}

impl Debug for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "total created / explored / reached duplicates:")?;
        writeln!(
            f,
            "{:<16}{:<16}{}",
            self.total_created().separated_string(),
            self.explored_nodes().separated_string(),
            self.total_duplicates().separated_string()
        )
    }
}
