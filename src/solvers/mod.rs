mod dijkstra;
mod traversal;

use crate::maze::{Coord, CostProvider, Grid, Maze};
pub use dijkstra::{manhattan, solve_astar, solve_dijkstra};
pub use traversal::{solve_bfs, solve_dfs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Solver {
    Bfs,
    Dfs,
    Dijkstra,
    AStar,
}

impl Solver {
    /// Whether the solver accounts for per-cell costs.
    pub fn is_weighted(self) -> bool {
        matches!(self, Solver::Dijkstra | Solver::AStar)
    }
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Bfs => write!(f, "BFS"),
            Solver::Dfs => write!(f, "DFS"),
            Solver::Dijkstra => write!(f, "Dijkstra"),
            Solver::AStar => write!(f, "A* (A-Star)"),
        }
    }
}

/// Summary of a single search run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStats {
    pub solver: Solver,
    /// For BFS/DFS, every cell taken off the frontier (including the end cell).
    /// For Dijkstra/A*, every cell settled before the end cell was reached.
    pub nodes_visited: usize,
    pub found: bool,
    /// Total cost of the path, weighted solvers only
    pub total_cost: Option<u32>,
    /// `nodes_visited` as a percentage of all cells, weighted solvers only
    pub efficiency: Option<f64>,
    /// Whether costs came from terrain rather than a uniform step cost
    pub terrain_mode: bool,
}

impl std::fmt::Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.found {
            return write!(f, "{} Failed to find path.", self.solver);
        }
        writeln!(f, "Algorithm: {}", self.solver)?;
        writeln!(f, "----------------")?;
        writeln!(f, "Status: Finished")?;
        if let Some(cost) = self.total_cost {
            writeln!(f, "Total Cost: {}", cost)?;
        }
        writeln!(f, "Nodes Visited: {}", self.nodes_visited)?;
        if let Some(efficiency) = self.efficiency {
            writeln!(f, "Efficiency: {:.2}%", efficiency)?;
        }
        match (self.solver.is_weighted(), self.terrain_mode) {
            (false, _) => {
                writeln!(f, "Path Found: Yes")?;
                write!(f, "(Unweighted)")
            }
            (true, true) => write!(f, "(Map has Loops)"),
            (true, false) => write!(f, "(Uniform Cost)"),
        }
    }
}

/// Path and statistics produced by a search run. The path runs start to end and is
/// empty when the end was not reached.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub path: Vec<Coord>,
    pub stats: SearchStats,
}

/// Per-run parent links used to rebuild the path once the end is reached.
#[derive(Debug, Clone)]
pub struct CameFrom {
    parents: Grid<Option<Coord>>,
}

impl CameFrom {
    pub fn new(rows: usize, cols: usize) -> Self {
        CameFrom {
            parents: Grid::new(rows, cols, None),
        }
    }

    pub fn set(&mut self, child: Coord, parent: Coord) {
        self.parents[child] = Some(parent);
    }

    pub fn get(&self, child: Coord) -> Option<Coord> {
        self.parents[child]
    }

    /// Follows parent links from `end` back to `start` and returns the path in
    /// start to end order. Returns an empty path if the chain never reaches `start`.
    pub fn path(&self, start: Coord, end: Coord) -> Vec<Coord> {
        let mut path = vec![end];
        let mut current = end;
        while current != start {
            match self.get(current) {
                // A chain longer than the grid means the links are corrupt
                Some(parent) if path.len() < self.parents.len() => {
                    path.push(parent);
                    current = parent;
                }
                _ => return Vec::new(),
            }
        }
        path.reverse();
        path
    }
}

/// Runs `solver` from the maze's start to its end.
///
/// Search visitation is cleared before the run. `costs` prices each step for the
/// weighted solvers and is ignored by BFS/DFS. `on_step` is called as cells are
/// expanded.
pub fn solve_maze(
    maze: &mut Maze,
    solver: Solver,
    costs: &dyn CostProvider,
    on_step: &mut dyn FnMut(&Maze),
) -> SearchOutcome {
    maze.reset_search_state();
    let outcome = match solver {
        Solver::Bfs => solve_bfs(maze, on_step),
        Solver::Dfs => solve_dfs(maze, on_step),
        Solver::Dijkstra => solve_dijkstra(maze, costs, on_step),
        Solver::AStar => solve_astar(maze, costs, on_step),
    };
    tracing::debug!(
        "{} finished: found={} visited={} path_len={}",
        solver,
        outcome.stats.found,
        outcome.stats.nodes_visited,
        outcome.path.len()
    );
    outcome
}

#[cfg(test)]
pub(crate) mod test_utils {
    use crate::maze::{Coord, CostProvider, Maze};

    /// Every passage between in-bounds cells removed.
    pub fn open_maze(rows: usize, cols: usize) -> Maze {
        let mut maze = Maze::new(rows, cols);
        for coord in maze.coords() {
            let (r, c) = coord;
            if c + 1 < cols {
                maze.remove_wall_between(coord, (r, c + 1));
            }
            if r + 1 < rows {
                maze.remove_wall_between(coord, (r + 1, c));
            }
        }
        maze
    }

    /// Brute-force shortest path costs from the start: relax every edge until nothing
    /// changes. Entering a cell costs `costs.cost(cell)`.
    pub fn reference_costs(maze: &Maze, costs: &dyn CostProvider) -> Vec<Option<u32>> {
        let index = |(r, c): Coord| r * maze.cols() + c;
        let mut best = vec![None; maze.size()];
        best[index(maze.start())] = Some(0u32);
        let mut changed = true;
        while changed {
            changed = false;
            for cell in maze.coords() {
                let Some(here) = best[index(cell)] else {
                    continue;
                };
                for next in maze.neighbors_by_connectivity(cell) {
                    let candidate = here + costs.cost(next);
                    if best[index(next)].is_none_or(|known| candidate < known) {
                        best[index(next)] = Some(candidate);
                        changed = true;
                    }
                }
            }
        }
        best
    }

    /// Checks that `path` starts and ends at the maze endpoints and only steps
    /// through open passages.
    pub fn assert_valid_path(maze: &Maze, path: &[Coord]) {
        assert_eq!(path.first(), Some(&maze.start()));
        assert_eq!(path.last(), Some(&maze.end()));
        for pair in path.windows(2) {
            assert!(
                maze.neighbors_by_connectivity(pair[0]).any(|c| c == pair[1]),
                "No passage between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    /// Sum of entry costs along a path, excluding the start cell.
    pub fn path_cost(path: &[Coord], costs: &dyn CostProvider) -> u32 {
        path.iter().skip(1).map(|&c| costs.cost(c)).sum()
    }
}
