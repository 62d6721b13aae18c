use rand::Rng;
use rand_set::RandSetDefault;

use crate::maze::{Coord, Direction, Maze};

/// Carves a perfect maze with randomized Prim's algorithm, growing from the start cell.
///
/// Every wall is restored first, so any previous layout is discarded. When done, the
/// start cell's west wall and the end cell's east wall are opened as entrance and exit.
/// `on_step` is called after every carved passage.
pub fn randomized_prim<R: Rng>(maze: &mut Maze, rng: &mut R, on_step: &mut dyn FnMut(&Maze)) {
    maze.reset();

    let start = maze.start();
    maze.mark_visited(start);

    // Frontier cells border the maze but are not part of it yet
    let mut frontiers = maze
        .neighbors_by_adjacency(start)
        .collect::<RandSetDefault<Coord>>();

    while !frontiers.is_empty() {
        // Pick with the caller's rng so a seed reproduces the layout
        let frontier = frontiers.iter().as_slice()[rng.random_range(0..frontiers.len())];
        frontiers.remove(&frontier);

        // Connect the frontier cell to a random cell already in the maze
        let in_maze = maze
            .neighbors_by_adjacency(frontier)
            .filter(|&coord| maze.is_visited(coord))
            .collect::<Vec<_>>();
        if in_maze.is_empty() {
            continue;
        }
        let neighbor = in_maze[rng.random_range(0..in_maze.len())];
        maze.remove_wall_between(frontier, neighbor);
        maze.mark_visited(frontier);

        let new_frontiers = maze
            .neighbors_by_adjacency(frontier)
            .filter(|&coord| !maze.is_visited(coord))
            .collect::<Vec<_>>();
        for coord in new_frontiers {
            // The frontier is a set, so duplicates are ignored here
            frontiers.insert(coord);
        }

        on_step(maze);
    }

    let end = maze.end();
    maze.open_boundary(start, Direction::West);
    maze.open_boundary(end, Direction::East);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::get_rng;
    use std::collections::VecDeque;

    /// Counts how many times each cell is discovered by a BFS from the start that never
    /// walks straight back to the cell it came from. Any cycle shows up as a count above 1.
    fn discovery_counts(maze: &Maze) -> Vec<usize> {
        let index = |(r, c): Coord| r * maze.cols() + c;
        let mut counts = vec![0usize; maze.size()];
        counts[index(maze.start())] = 1;
        let mut queue = VecDeque::from([(maze.start(), None)]);
        while let Some((cell, parent)) = queue.pop_front() {
            for next in maze.neighbors_by_connectivity(cell) {
                if Some(next) == parent {
                    continue;
                }
                counts[index(next)] += 1;
                if counts[index(next)] == 1 {
                    queue.push_back((next, Some(cell)));
                }
            }
        }
        counts
    }

    #[test]
    fn test_randomized_prim_builds_spanning_tree() {
        for (rows, cols, seed) in [(1, 1, 1), (1, 5, 2), (4, 1, 3), (2, 2, 4), (7, 11, 5), (30, 40, 6)] {
            let mut maze = Maze::new(rows, cols);
            let mut rng = get_rng(Some(seed));
            let mut steps = 0;
            randomized_prim(&mut maze, &mut rng, &mut |_| steps += 1);

            assert_eq!(maze.open_passages(), rows * cols - 1, "{}x{}", rows, cols);
            assert_eq!(steps, rows * cols - 1);
            assert!(maze.cells().all(|cell| cell.visited));
            assert!(discovery_counts(&maze).iter().all(|&count| count == 1));
        }
    }

    #[test]
    fn test_randomized_prim_opens_entrance_and_exit() {
        let mut maze = Maze::new(5, 6);
        randomized_prim(&mut maze, &mut get_rng(Some(9)), &mut |_| {});
        assert!(!maze.has_wall(maze.start(), Direction::West));
        assert!(!maze.has_wall(maze.end(), Direction::East));
        assert!(maze.has_wall(maze.start(), Direction::North));
        assert!(maze.has_wall(maze.end(), Direction::South));
    }

    #[test]
    fn test_randomized_prim_same_seed_same_maze() {
        let build = |seed| {
            let mut maze = Maze::new(10, 10);
            randomized_prim(&mut maze, &mut get_rng(Some(seed)), &mut |_| {});
            maze
        };
        assert_eq!(build(42), build(42));
        assert_ne!(build(42), build(43));
    }

    #[test]
    fn test_randomized_prim_discards_previous_layout() {
        let mut maze = Maze::new(4, 4);
        let mut rng = get_rng(Some(11));
        randomized_prim(&mut maze, &mut rng, &mut |_| {});
        maze.remove_wall_between((1, 1), (1, 2));
        maze.remove_wall_between((2, 1), (2, 2));
        randomized_prim(&mut maze, &mut rng, &mut |_| {});
        assert_eq!(maze.open_passages(), 15);
    }
}
