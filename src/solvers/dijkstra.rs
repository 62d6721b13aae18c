use std::{cmp::Reverse, collections::BinaryHeap};

use super::{CameFrom, SearchOutcome, SearchStats, Solver};
use crate::maze::{Coord, CostProvider, Grid, Maze};

/// Priority queue entry. Ordered by priority first, so wrapping in `Reverse` turns the
/// max-heap into a min-heap on priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct QueueEntry {
    /// Traveling cost so far, plus the heuristic estimate for A*
    priority: u32,
    /// Traveling cost from the start when this entry was queued
    cost: u32,
    coord: Coord,
}

/// Manhattan distance between two cells. Every step costs at least 1, so this never
/// overestimates the remaining cost.
pub fn manhattan(a: Coord, b: Coord) -> u32 {
    (a.0.abs_diff(b.0) + a.1.abs_diff(b.1)) as u32
}

/// Dijkstra's algorithm: lowest total cost path, exploring by cost so far.
pub fn solve_dijkstra(
    maze: &mut Maze,
    costs: &dyn CostProvider,
    on_step: &mut dyn FnMut(&Maze),
) -> SearchOutcome {
    relax(maze, costs, Solver::Dijkstra, on_step)
}

/// A*: lowest total cost path, exploring by cost so far plus Manhattan distance to the end.
pub fn solve_astar(
    maze: &mut Maze,
    costs: &dyn CostProvider,
    on_step: &mut dyn FnMut(&Maze),
) -> SearchOutcome {
    relax(maze, costs, Solver::AStar, on_step)
}

fn relax(
    maze: &mut Maze,
    costs: &dyn CostProvider,
    solver: Solver,
    on_step: &mut dyn FnMut(&Maze),
) -> SearchOutcome {
    let start = maze.start();
    let end = maze.end();
    let heuristic = |coord: Coord| match solver {
        Solver::AStar => manhattan(coord, end),
        _ => 0,
    };

    let mut came_from = CameFrom::new(maze.rows(), maze.cols());
    let mut distances = Grid::new(maze.rows(), maze.cols(), u32::MAX);
    distances[start] = 0;

    // Entries for the same cell may be queued more than once; outdated ones are skipped
    let mut queue = BinaryHeap::new();
    queue.push(Reverse(QueueEntry {
        priority: heuristic(start),
        cost: 0,
        coord: start,
    }));

    let mut nodes_visited = 0;
    let mut found = false;
    while let Some(Reverse(current)) = queue.pop() {
        if current.coord == end {
            found = true;
            break;
        }
        // A cheaper route to this cell was queued after this entry
        if current.cost > distances[current.coord] {
            continue;
        }
        if !maze.is_search_visited(current.coord) {
            maze.mark_search_visited(current.coord);
            nodes_visited += 1;
            on_step(maze);
        }

        let neighbors = maze
            .neighbors_by_connectivity(current.coord)
            .collect::<Vec<_>>();
        for next in neighbors {
            let new_cost = distances[current.coord].saturating_add(costs.cost(next));
            if new_cost < distances[next] {
                distances[next] = new_cost;
                came_from.set(next, current.coord);
                queue.push(Reverse(QueueEntry {
                    priority: new_cost.saturating_add(heuristic(next)),
                    cost: new_cost,
                    coord: next,
                }));
            }
        }
    }

    let (path, total_cost) = if found {
        (came_from.path(start, end), Some(distances[end]))
    } else {
        (Vec::new(), None)
    };
    let efficiency = nodes_visited as f64 / maze.size() as f64 * 100.0;
    SearchOutcome {
        path,
        stats: SearchStats {
            solver,
            nodes_visited,
            found,
            total_cost,
            efficiency: Some(efficiency),
            terrain_mode: false,
        },
    }
}
