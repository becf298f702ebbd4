//! Multi-source reachability flood fill over traversable cells.

use std::collections::VecDeque;

use skirmish_core::{CellCoord, CellId, GridDimensions};

/// Dense breadth-first distance grid seeded from a set of source cells.
///
/// Distances default to `u16::MAX` for unreached cells so callers can
/// distinguish obstacles and disconnected pockets from reachable tiles. The
/// flood fill reads traversability directly rather than the adjacency list,
/// so it stays valid while generation is still editing obstacles.
#[derive(Clone, Debug, Default)]
pub struct Reachability {
    dimensions: GridDimensions,
    distances: Vec<u16>,
    reached: usize,
}

impl Reachability {
    pub(crate) fn rebuild_with<F>(
        &mut self,
        dimensions: GridDimensions,
        seeds: &[CellId],
        mut is_open: F,
    ) where
        F: FnMut(CellCoord) -> bool,
    {
        let cell_count = dimensions.cell_count();
        self.dimensions = dimensions;
        self.reached = 0;

        if self.distances.len() != cell_count {
            self.distances = vec![u16::MAX; cell_count];
        } else {
            self.distances.fill(u16::MAX);
        }

        let mut queue = VecDeque::new();

        for &seed in seeds {
            let Some(cell) = dimensions.coord_of(seed) else {
                continue;
            };

            if !is_open(cell) || self.distances[seed.index()] == 0 {
                continue;
            }

            self.distances[seed.index()] = 0;
            self.reached += 1;
            queue.push_back(cell);
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current) = dimensions.index_of(cell) else {
                continue;
            };
            let next_distance = self.distances[current.index()].saturating_add(1);

            for neighbor in dimensions.neighbors(cell) {
                let Some(neighbor_id) = dimensions.index_of(neighbor) else {
                    continue;
                };

                if self.distances[neighbor_id.index()] != u16::MAX || !is_open(neighbor) {
                    continue;
                }

                self.distances[neighbor_id.index()] = next_distance;
                self.reached += 1;
                queue.push_back(neighbor);
            }
        }
    }

    /// Reports whether the flood fill visited the cell.
    #[must_use]
    pub fn is_reached(&self, id: CellId) -> bool {
        self.distances
            .get(id.index())
            .is_some_and(|distance| *distance != u16::MAX)
    }

    /// Number of steps from the nearest seed, if the cell was reached.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u16> {
        let id = self.dimensions.index_of(cell)?;
        self.distances
            .get(id.index())
            .copied()
            .filter(|distance| *distance != u16::MAX)
    }

    /// Number of cells visited, seeds included.
    #[must_use]
    pub fn reached_count(&self) -> usize {
        self.reached
    }

    /// Reports whether any of the provided cells was reached.
    #[must_use]
    pub fn reaches_any(&self, ids: &[CellId]) -> bool {
        ids.iter().any(|id| self.is_reached(*id))
    }
}
