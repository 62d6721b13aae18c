use rand::Rng;

use crate::maze::{Coord, Direction, Maze};

/// Whether `coord` is away from the outer edge of the maze.
fn is_interior(maze: &Maze, coord: Coord) -> bool {
    let (row, col) = coord;
    row >= 1 && col >= 1 && row + 1 < maze.rows() && col + 1 < maze.cols()
}

/// Number of standing walls that loop injection could still remove: walls between two
/// in-bounds cells where at least one of them is an interior cell.
pub fn removable_walls(maze: &Maze) -> usize {
    maze.coords()
        .map(|coord| {
            [Direction::East, Direction::South]
                .into_iter()
                .filter(|&d| {
                    let other = d.step(coord);
                    maze.is_in_bounds(other)
                        && maze.has_wall(coord, d)
                        && (is_interior(maze, coord) || is_interior(maze, other))
                })
                .count()
        })
        .sum()
}

/// Removes up to `count` extra walls to turn a perfect maze into one with cycles.
///
/// Repeatedly picks a random interior cell and one of its four walls, removing the
/// wall if it still stands. The target is capped by [`removable_walls`] so small
/// mazes terminate. Returns the number of walls removed.
pub fn inject_loops<R: Rng>(
    maze: &mut Maze,
    rng: &mut R,
    count: usize,
    on_step: &mut dyn FnMut(&Maze),
) -> usize {
    let target = count.min(removable_walls(maze));
    let mut removed = 0;
    while removed < target {
        let coord = (
            rng.random_range(1..maze.rows() - 1),
            rng.random_range(1..maze.cols() - 1),
        );
        let direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
        if !maze.has_wall(coord, direction) {
            continue;
        }
        let neighbor = direction.step(coord);
        // Interior cells always have four in-bounds neighbors
        if maze.is_in_bounds(neighbor) && maze.remove_wall_between(coord, neighbor) {
            removed += 1;
            on_step(maze);
        }
    }
    if target < count {
        tracing::debug!(
            "Only {} of {} requested loops fit in a {}x{} maze",
            target,
            count,
            maze.rows(),
            maze.cols()
        );
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{get_rng, randomized_prim};

    #[test]
    fn test_inject_loops_removes_requested_walls() {
        let mut maze = Maze::new(30, 40);
        let mut rng = get_rng(Some(3));
        randomized_prim(&mut maze, &mut rng, &mut |_| {});
        let mut steps = 0;
        let removed = inject_loops(&mut maze, &mut rng, 120, &mut |_| steps += 1);
        assert_eq!(removed, 120);
        assert_eq!(steps, 120);
        assert_eq!(maze.open_passages(), 30 * 40 - 1 + 120);
    }

    #[test]
    fn test_inject_loops_terminates_on_small_mazes() {
        for (rows, cols) in [(1, 1), (2, 5), (5, 2), (3, 3), (4, 4)] {
            let mut maze = Maze::new(rows, cols);
            let mut rng = get_rng(Some(8));
            randomized_prim(&mut maze, &mut rng, &mut |_| {});
            let available = removable_walls(&maze);
            let removed = inject_loops(&mut maze, &mut rng, 120, &mut |_| {});
            assert_eq!(removed, available);
            assert_eq!(removable_walls(&maze), 0);
            assert_eq!(maze.open_passages(), rows * cols - 1 + removed);
        }
    }

    #[test]
    fn test_removable_walls_on_closed_maze() {
        // 3x3: the center cell owns all 4 removable walls
        assert_eq!(removable_walls(&Maze::new(3, 3)), 4);
        assert_eq!(removable_walls(&Maze::new(2, 8)), 0);
    }
}
