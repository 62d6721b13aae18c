use std::collections::VecDeque;

use super::{CameFrom, SearchOutcome, SearchStats, Solver};
use crate::maze::{Coord, Maze};

/// Container of cells waiting to be expanded. Its pop order decides the search.
trait Frontier {
    fn push(&mut self, coord: Coord);
    fn pop(&mut self) -> Option<Coord>;
}

/// First in, first out: breadth-first.
impl Frontier for VecDeque<Coord> {
    fn push(&mut self, coord: Coord) {
        self.push_back(coord);
    }

    fn pop(&mut self) -> Option<Coord> {
        self.pop_front()
    }
}

/// Last in, first out: depth-first.
impl Frontier for Vec<Coord> {
    fn push(&mut self, coord: Coord) {
        Vec::push(self, coord);
    }

    fn pop(&mut self) -> Option<Coord> {
        Vec::pop(self)
    }
}

/// Breadth-first search. The path has the fewest possible steps.
pub fn solve_bfs(maze: &mut Maze, on_step: &mut dyn FnMut(&Maze)) -> SearchOutcome {
    traverse(maze, VecDeque::new(), Solver::Bfs, on_step)
}

/// Depth-first search. Finds some path, not necessarily the shortest.
pub fn solve_dfs(maze: &mut Maze, on_step: &mut dyn FnMut(&Maze)) -> SearchOutcome {
    traverse(maze, Vec::new(), Solver::Dfs, on_step)
}

fn traverse<F: Frontier>(
    maze: &mut Maze,
    mut frontier: F,
    solver: Solver,
    on_step: &mut dyn FnMut(&Maze),
) -> SearchOutcome {
    let start = maze.start();
    let end = maze.end();
    let mut came_from = CameFrom::new(maze.rows(), maze.cols());

    // Cells are marked when pushed, so each one enters the frontier at most once
    maze.mark_search_visited(start);
    frontier.push(start);

    let mut nodes_visited = 0;
    let mut found = false;
    while let Some(current) = frontier.pop() {
        nodes_visited += 1;
        if current == end {
            found = true;
            break;
        }

        let unvisited = maze
            .neighbors_by_connectivity(current)
            .filter(|&next| !maze.is_search_visited(next))
            .collect::<Vec<_>>();
        for next in unvisited {
            maze.mark_search_visited(next);
            came_from.set(next, current);
            frontier.push(next);
        }
        on_step(maze);
    }

    let path = if found {
        came_from.path(start, end)
    } else {
        Vec::new()
    };
    SearchOutcome {
        path,
        stats: SearchStats {
            solver,
            nodes_visited,
            found,
            total_cost: None,
            efficiency: None,
            terrain_mode: false,
        },
    }
}
