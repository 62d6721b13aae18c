mod grid;
pub mod terrain;

pub use grid::{Coord, Grid};
pub use terrain::{CostProvider, Terrain, TerrainMap, UniformCost};

/// One of the four sides of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Returns the coordinate one step away in this direction.
    ///
    /// NOTE: Stepping off the top or left edge wraps to `usize::MAX`, which every
    /// bounds check rejects, so callers only need `is_in_bounds` afterwards.
    pub fn step(self, coord: Coord) -> Coord {
        let (row, col) = coord;
        match self {
            Direction::North => (row.wrapping_sub(1), col),
            Direction::East => (row, col.saturating_add(1)),
            Direction::South => (row.saturating_add(1), col),
            Direction::West => (row, col.wrapping_sub(1)),
        }
    }

    /// Direction of travel from `from` to an orthogonally adjacent `to`.
    /// Returns `None` if the two coordinates are not orthogonal neighbors.
    pub fn between(from: Coord, to: Coord) -> Option<Self> {
        Direction::ALL.into_iter().find(|&d| d.step(from) == to)
    }
}

/// A single maze cell: four walls plus generation and search visitation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    walls: [bool; 4],
    /// Part of the growing maze during generation
    pub visited: bool,
    /// Reached by the current search run
    pub search_visited: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            walls: [true; 4],
            visited: false,
            search_visited: false,
        }
    }
}

impl Cell {
    pub fn has_wall(&self, direction: Direction) -> bool {
        self.walls[direction.index()]
    }
}

/// A fixed-size maze of `rows x cols` cells. The start is the top left cell and
/// the end is the bottom right cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    cells: Grid<Cell>,
}

impl Maze {
    /// Creates a maze with every wall standing.
    ///
    /// Panics if either dimension is 0.
    pub fn new(rows: usize, cols: usize) -> Self {
        if rows == 0 || cols == 0 {
            panic!("Maze dimensions must be non-zero, got {}x{}", rows, cols);
        }
        Maze {
            cells: Grid::new(rows, cols, Cell::default()),
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.rows()
    }

    pub fn cols(&self) -> usize {
        self.cells.cols()
    }

    /// Total number of cells.
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn start(&self) -> Coord {
        (0, 0)
    }

    pub fn end(&self) -> Coord {
        (self.rows() - 1, self.cols() - 1)
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        self.cells.is_in_bounds(coord)
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        self.cells.coords()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Restores the blank state: all walls standing, nothing visited.
    pub fn reset(&mut self) {
        self.cells.fill(Cell::default());
    }

    pub fn has_wall(&self, coord: Coord, direction: Direction) -> bool {
        self.cells[coord].has_wall(direction)
    }

    /// Grid-adjacent cells, ignoring walls.
    pub fn neighbors_by_adjacency(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        // Index first so an out of range coordinate fails fast
        let _cell = self.cells[coord];
        Direction::ALL
            .into_iter()
            .map(move |d| d.step(coord))
            .filter(move |&c| self.is_in_bounds(c))
    }

    /// Grid-adjacent cells that are reachable through an absent wall.
    pub fn neighbors_by_connectivity(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        let cell = self.cells[coord];
        Direction::ALL
            .into_iter()
            .filter(move |&d| !cell.has_wall(d))
            .map(move |d| d.step(coord))
            .filter(move |&c| self.is_in_bounds(c))
    }

    /// Removes the wall shared by two orthogonally adjacent cells.
    /// Returns `true` if a wall was removed, `false` if the passage was already open.
    ///
    /// # Panics
    /// * If either coordinate is out of bounds
    /// * If the cells are not orthogonal neighbors
    pub fn remove_wall_between(&mut self, a: Coord, b: Coord) -> bool {
        if !self.is_in_bounds(a) || !self.is_in_bounds(b) {
            panic!(
                "IndexOutOfRange: cannot remove wall between {:?} and {:?} in a {}x{} maze",
                a,
                b,
                self.rows(),
                self.cols()
            );
        }
        let direction = match Direction::between(a, b) {
            Some(d) => d,
            None => panic!(
                "Cannot remove wall between non-adjacent cells {:?} and {:?}",
                a, b
            ),
        };
        let existed = self.cells[a].has_wall(direction);
        self.cells[a].walls[direction.index()] = false;
        self.cells[b].walls[direction.opposite().index()] = false;
        existed
    }

    /// Opens a wall on the outer boundary, e.g. the maze entrance.
    ///
    /// Panics if the wall does not face outside the maze.
    pub fn open_boundary(&mut self, coord: Coord, direction: Direction) {
        if self.is_in_bounds(direction.step(coord)) {
            panic!(
                "The {:?} wall of {:?} is not a boundary wall",
                direction, coord
            );
        }
        self.cells[coord].walls[direction.index()] = false;
    }

    pub fn is_visited(&self, coord: Coord) -> bool {
        self.cells[coord].visited
    }

    pub fn mark_visited(&mut self, coord: Coord) {
        self.cells[coord].visited = true;
    }

    pub fn is_search_visited(&self, coord: Coord) -> bool {
        self.cells[coord].search_visited
    }

    pub fn mark_search_visited(&mut self, coord: Coord) {
        self.cells[coord].search_visited = true;
    }

    /// Clears search visitation for every cell. Walls are untouched.
    pub fn reset_search_state(&mut self) {
        self.coords()
            .for_each(|coord| self.cells[coord].search_visited = false);
    }

    /// Number of open passages between two in-bounds cells. Boundary openings
    /// (entrance and exit) are not counted.
    pub fn open_passages(&self) -> usize {
        self.coords()
            .map(|coord| {
                [Direction::East, Direction::South]
                    .into_iter()
                    .filter(|&d| self.is_in_bounds(d.step(coord)) && !self.has_wall(coord, d))
                    .count()
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_maze_is_closed() {
        let maze = Maze::new(3, 4);
        assert_eq!(maze.size(), 12);
        assert_eq!(maze.open_passages(), 0);
        assert_eq!(maze.start(), (0, 0));
        assert_eq!(maze.end(), (2, 3));
        assert!(
            maze.coords()
                .all(|c| maze.neighbors_by_connectivity(c).next().is_none())
        );
    }

    #[test]
    fn test_neighbors_by_adjacency() {
        let maze = Maze::new(3, 3);
        let corner = maze.neighbors_by_adjacency((0, 0)).collect::<Vec<_>>();
        assert_eq!(corner, vec![(0, 1), (1, 0)]);
        let center = maze.neighbors_by_adjacency((1, 1)).collect::<Vec<_>>();
        assert_eq!(center, vec![(0, 1), (1, 2), (2, 1), (1, 0)]);
    }

    #[test]
    fn test_remove_wall_is_symmetric() {
        let mut maze = Maze::new(3, 3);
        assert!(maze.remove_wall_between((1, 1), (1, 2)));
        // Removing the same wall again reports nothing changed
        assert!(!maze.remove_wall_between((1, 2), (1, 1)));
        assert!(!maze.has_wall((1, 1), Direction::East));
        assert!(!maze.has_wall((1, 2), Direction::West));
        assert_eq!(
            maze.neighbors_by_connectivity((1, 2)).collect::<Vec<_>>(),
            vec![(1, 1)]
        );
        assert_eq!(maze.open_passages(), 1);
    }

    #[test]
    #[should_panic(expected = "non-adjacent")]
    fn test_remove_wall_diagonal_panics() {
        let mut maze = Maze::new(3, 3);
        maze.remove_wall_between((0, 0), (1, 1));
    }

    #[test]
    #[should_panic(expected = "IndexOutOfRange")]
    fn test_out_of_range_neighbors_panics() {
        let maze = Maze::new(3, 3);
        let _ = maze.neighbors_by_adjacency((3, 0)).count();
    }

    #[test]
    fn test_boundary_opening_is_not_a_passage() {
        let mut maze = Maze::new(2, 2);
        maze.open_boundary((0, 0), Direction::West);
        assert!(!maze.has_wall((0, 0), Direction::West));
        assert_eq!(maze.open_passages(), 0);
        assert!(maze.neighbors_by_connectivity((0, 0)).next().is_none());
    }

    #[test]
    fn test_reset_search_state_keeps_walls() {
        let mut maze = Maze::new(2, 2);
        maze.remove_wall_between((0, 0), (0, 1));
        maze.mark_search_visited((0, 1));
        maze.mark_visited((0, 1));
        maze.reset_search_state();
        assert!(!maze.is_search_visited((0, 1)));
        assert!(maze.is_visited((0, 1)));
        assert_eq!(maze.open_passages(), 1);
    }
}
