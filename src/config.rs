use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigErr {
    UnknownMethod(String),
    UnknownHeuristicMode(String),
    /// A heuristic weight that is negative, infinite or NaN.
    InvalidWeight(String),
}

impl Display for ConfigErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigErr::UnknownMethod(name) => write!(f, "Unknown search method: {}", name),
            ConfigErr::UnknownHeuristicMode(name) => write!(f, "Unknown heuristic mode: {}", name),
            ConfigErr::InvalidWeight(weight) => {
                write!(f, "Invalid weight {}: must be a non-negative number", weight)
            }
        }
    }
}

impl Error for ConfigErr {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Shortest path by move count.
    Bfs,
    /// Depth limited, no optimality.
    Dfs,
    /// Best-first on `g + h`, not guaranteed optimal (see `HeuristicWeights`).
    AStar,
}

pub const METHODS: [Method; 3] = [Method::Bfs, Method::Dfs, Method::AStar];

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Method::Bfs => write!(f, "bfs"),
            Method::Dfs => write!(f, "dfs"),
            Method::AStar => write!(f, "astar"),
        }
    }
}

impl FromStr for Method {
    type Err = ConfigErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" => Ok(Method::Bfs),
            "dfs" => Ok(Method::Dfs),
            "astar" | "a*" | "a-star" => Ok(Method::AStar),
            _ => Err(ConfigErr::UnknownMethod(s.to_string())),
        }
    }
}

/// Distance used to fill the box-goal cost matrix of the heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMode {
    Manhattan,
    Euclidean,
}

impl Default for DistanceMode {
    fn default() -> Self {
        DistanceMode::Manhattan
    }
}

impl Display for DistanceMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            DistanceMode::Manhattan => write!(f, "manhattan"),
            DistanceMode::Euclidean => write!(f, "euclidean"),
        }
    }
}

impl FromStr for DistanceMode {
    type Err = ConfigErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manhattan" => Ok(DistanceMode::Manhattan),
            "euclidean" => Ok(DistanceMode::Euclidean),
            _ => Err(ConfigErr::UnknownHeuristicMode(s.to_string())),
        }
    }
}

/// Weights of the tie-breaking terms added to the assignment lower bound.
///
/// With any non-zero weight the estimate can exceed the real remaining cost
/// so A* results are not guaranteed to be optimal. Set both to 0 to get
/// an admissible heuristic.
///
/// Both weights must be finite and non-negative, see `validate`.
/// A* orders its queue by the estimate so a NaN would corrupt the order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicWeights {
    /// Multiplies the longest single box-goal distance of the optimal matching.
    pub longest_match: f64,
    /// Multiplies the Manhattan distance from the player to the nearest box.
    pub nearest_box: f64,
}

impl HeuristicWeights {
    pub fn admissible() -> Self {
        HeuristicWeights {
            longest_match: 0.0,
            nearest_box: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigErr> {
        for &weight in &[self.longest_match, self.nearest_box] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigErr::InvalidWeight(weight.to_string()));
            }
        }
        Ok(())
    }
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        HeuristicWeights {
            longest_match: 0.2,
            nearest_box: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    pub distance: DistanceMode,
    pub weights: HeuristicWeights,
    /// DFS discards paths longer than this.
    pub max_depth: usize,
    /// When false, successors are generated without deadlock detection.
    pub prune_deadlocks: bool,
}

pub const DEFAULT_MAX_DEPTH: usize = 1000;

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            distance: DistanceMode::default(),
            weights: HeuristicWeights::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            prune_deadlocks: true,
        }
    }
}
