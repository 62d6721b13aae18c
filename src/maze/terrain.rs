use super::grid::{Coord, Grid};

/// Terrain type of a cell in weighted mode.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terrain {
    #[default]
    Grass,
    Mud,
    Water,
}

impl Terrain {
    pub const ALL: [Terrain; 3] = [Terrain::Grass, Terrain::Mud, Terrain::Water];
    /// The cheapest terrain, forced on the start and end cells.
    pub const CHEAPEST: Terrain = Terrain::Grass;

    /// Cost of stepping onto a cell of this terrain.
    pub fn cost(self) -> u32 {
        match self {
            Terrain::Grass => 1,
            Terrain::Mud => 5,
            Terrain::Water => 10,
        }
    }
}

impl std::fmt::Display for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Terrain::Grass => write!(f, "Grass"),
            Terrain::Mud => write!(f, "Mud"),
            Terrain::Water => write!(f, "Water"),
        }
    }
}

/// Anything that can price a step onto a cell.
///
/// Plain mazes are solved with [`UniformCost`], weighted mazes with their [`TerrainMap`].
pub trait CostProvider {
    /// Cost of entering `coord`. Must be at least 1.
    fn cost(&self, coord: Coord) -> u32;
}

/// Every step costs 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformCost;

impl CostProvider for UniformCost {
    fn cost(&self, _coord: Coord) -> u32 {
        1
    }
}

/// Per-cell terrain for a weighted maze.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMap {
    terrain: Grid<Terrain>,
}

impl TerrainMap {
    /// Creates a map covered in the cheapest terrain.
    pub fn new(rows: usize, cols: usize) -> Self {
        TerrainMap {
            terrain: Grid::new(rows, cols, Terrain::CHEAPEST),
        }
    }

    pub fn rows(&self) -> usize {
        self.terrain.rows()
    }

    pub fn cols(&self) -> usize {
        self.terrain.cols()
    }

    pub fn get(&self, coord: Coord) -> Terrain {
        self.terrain[coord]
    }

    pub fn set(&mut self, coord: Coord, terrain: Terrain) {
        self.terrain[coord] = terrain;
    }

    /// Number of cells covered by `terrain`.
    pub fn count(&self, terrain: Terrain) -> usize {
        self.terrain.iter().filter(|&&t| t == terrain).count()
    }
}

impl CostProvider for TerrainMap {
    fn cost(&self, coord: Coord) -> u32 {
        self.terrain[coord].cost()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_costs() {
        assert_eq!(Terrain::Grass.cost(), 1);
        assert_eq!(Terrain::Mud.cost(), 5);
        assert_eq!(Terrain::Water.cost(), 10);
        let cheapest = Terrain::ALL.into_iter().map(Terrain::cost).min();
        assert_eq!(cheapest, Some(Terrain::CHEAPEST.cost()));
    }

    #[test]
    fn test_terrain_map_costs() {
        let mut map = TerrainMap::new(2, 3);
        assert_eq!(map.count(Terrain::Grass), 6);
        map.set((1, 2), Terrain::Water);
        assert_eq!(map.cost((1, 2)), 10);
        assert_eq!(map.cost((0, 0)), 1);
        assert_eq!(UniformCost.cost((1, 2)), 1);
    }
}
