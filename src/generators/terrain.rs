use rand::Rng;

use crate::maze::{Coord, Terrain, TerrainMap};

/// Probability of each terrain type when drawing a cell's terrain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainDistribution {
    pub grass: f64,
    pub mud: f64,
    pub water: f64,
}

impl Default for TerrainDistribution {
    fn default() -> Self {
        Self {
            grass: 0.60,
            mud: 0.25,
            water: 0.15,
        }
    }
}

impl TerrainDistribution {
    /// Maps a uniform sample in `[0, 1)` onto a terrain type. Weights need not sum to 1.
    pub fn pick(&self, sample: f64) -> Terrain {
        let total = self.grass + self.mud + self.water;
        let scaled = sample * total;
        if scaled < self.grass {
            Terrain::Grass
        } else if scaled < self.grass + self.mud {
            Terrain::Mud
        } else {
            Terrain::Water
        }
    }
}

/// Draws an independent terrain for every cell, then forces `endpoints` to the
/// cheapest terrain.
pub fn assign_terrain<R: Rng>(
    terrain: &mut TerrainMap,
    rng: &mut R,
    distribution: &TerrainDistribution,
    endpoints: &[Coord],
) {
    for row in 0..terrain.rows() {
        for col in 0..terrain.cols() {
            terrain.set((row, col), distribution.pick(rng.random::<f64>()));
        }
    }
    for &coord in endpoints {
        terrain.set(coord, Terrain::CHEAPEST);
    }
}
