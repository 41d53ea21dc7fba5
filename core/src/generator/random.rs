use alloc::vec::Vec;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

/// Uniformly random placement, reproducible from its seed.
#[derive(Clone, Debug)]
pub struct RandomPlacer {
    rng: SmallRng,
}

impl RandomPlacer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl MinePlacer for RandomPlacer {
    fn choose_mines(
        &mut self,
        size: Coord,
        mine_count: CellCount,
        excluded: &[Coord2],
    ) -> Vec<Coord2> {
        let candidates: Vec<Coord2> = (0..size)
            .flat_map(|row| (0..size).map(move |col| (row, col)))
            .filter(|coords| !excluded.contains(coords))
            .collect();

        let wanted = usize::from(mine_count);
        if wanted > candidates.len() {
            log::warn!(
                "Requested {} mines but only {} cells are eligible",
                wanted,
                candidates.len()
            );
        }

        let amount = wanted.min(candidates.len());
        rand::seq::index::sample(&mut self.rng, candidates.len(), amount)
            .into_iter()
            .map(|i| candidates[i])
            .collect()
    }
}
