use rand::{SeedableRng, rngs::StdRng};

mod loops;
mod prim;
mod terrain;

pub use loops::{inject_loops, removable_walls};
pub use prim::randomized_prim;
pub use terrain::{TerrainDistribution, assign_terrain};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}
