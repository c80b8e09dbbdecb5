use std::collections::HashSet;

use crate::{Coords, GridInt};

use rand::Rng;
use rand::seq::SliceRandom;

/// Random draws before giving up on rejection sampling and picking from the
/// list of free cells instead. Only a nearly full board gets that far.
const MAX_SAMPLE_ATTEMPTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    position: Coords,
}

impl Food {
    pub fn at(position: Coords) -> Self {
        Food { position }
    }

    pub fn position(&self) -> Coords {
        self.position
    }

    /// Moves the food to a uniformly random cell of the grid that is not in
    /// `excluding`. Returns the new position, or `None` when every cell is
    /// excluded, in which case the food stays where it was.
    pub fn randomize(&mut self, grid: Coords, excluding: &HashSet<Coords>, rng: &mut impl Rng) -> Option<Coords> {
        let (width, height) = grid;

        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let pos = (rng.gen_range(0..width), rng.gen_range(0..height));
            if !excluding.contains(&pos) {
                self.position = pos;
                return Some(pos);
            }
        }

        let free = free_cells(grid, excluding);
        let pos = free.choose(rng).copied()?;
        self.position = pos;
        Some(pos)
    }
}

fn free_cells((width, height): Coords, excluding: &HashSet<Coords>) -> Vec<Coords> {
    (0..height)
        .flat_map(|y| (0..width).map(move |x: GridInt| (x, y)))
        .filter(|pos| !excluding.contains(pos))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_randomize_stays_on_grid_and_off_snake() {
        let grid = (10, 8);
        let excluding: HashSet<Coords> = [(0, 0), (1, 0), (2, 0), (3, 0)].iter().copied().collect();
        let mut rng = StdRng::seed_from_u64(7);
        let mut food = Food::at((0, 0));

        for _ in 0..500 {
            let pos = food.randomize(grid, &excluding, &mut rng).unwrap();
            assert_eq!(pos, food.position());
            assert!(pos.0 < grid.0 && pos.1 < grid.1);
            assert!(!excluding.contains(&pos));
        }
    }

    #[test]
    fn test_randomize_finds_last_free_cell() {
        let grid = (12, 12);
        let mut excluding = HashSet::new();
        for y in 0..12 {
            for x in 0..12 {
                excluding.insert((x, y));
            }
        }
        excluding.remove(&(11, 4));

        let mut rng = StdRng::seed_from_u64(3);
        let mut food = Food::at((0, 0));
        assert_eq!(food.randomize(grid, &excluding, &mut rng), Some((11, 4)));
        assert_eq!(food.position(), (11, 4));
    }

    #[test]
    fn test_randomize_on_full_grid_keeps_position() {
        let grid = (3, 2);
        let excluding: HashSet<Coords> = free_cells(grid, &HashSet::new()).into_iter().collect();
        assert_eq!(excluding.len(), 6);

        let mut rng = StdRng::seed_from_u64(1);
        let mut food = Food::at((2, 1));
        assert_eq!(food.randomize(grid, &excluding, &mut rng), None);
        assert_eq!(food.position(), (2, 1));
    }

    #[test]
    fn test_free_cells_skips_excluded() {
        let excluding: HashSet<Coords> = [(1, 0)].iter().copied().collect();
        assert_eq!(free_cells((2, 2), &excluding), vec![(0, 0), (0, 1), (1, 1)]);
    }
}
