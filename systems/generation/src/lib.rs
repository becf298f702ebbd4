#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural obstacle layout for the Skirmish grid.
//!
//! [`MapGenerator::generate`] runs seven steps in a fixed order: cluster
//! placement, row and column coverage, open-area suppression, left/right
//! separation, safe-zone connectivity, isolated-area elimination and the
//! final adjacency rebuild. Every loop is bounded; when a bound is hit the
//! run continues and the miss is recorded in the [`GenerationReport`].

mod config;
mod report;
mod shapes;

pub use config::{GenerationConfig, GenerationConfigError, MAX_WINDOW_SIZE};
pub use report::{Exhaustion, GenerationReport};
pub use shapes::{Shape, SHAPES};

use rand::{seq::SliceRandom, Rng};
use skirmish_core::{CellCoord, CellId};
use skirmish_system_pathfinding::shortest_path;
use skirmish_world::{query, Grid};

/// Seeded obstacle generator.
#[derive(Clone, Debug, Default)]
pub struct MapGenerator {
    config: GenerationConfig,
}

impl MapGenerator {
    /// Creates a generator after validating its configuration.
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration driving the generator.
    #[must_use]
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Writes an obstacle layout into a freshly created grid.
    ///
    /// Safe-zone cells are never turned into obstacles. On return the
    /// adjacency list reflects the final layout.
    pub fn generate<R>(&self, grid: &mut Grid, rng: &mut R) -> GenerationReport
    where
        R: Rng + ?Sized,
    {
        let mut run = Run {
            config: &self.config,
            grid,
            rng,
            report: GenerationReport::default(),
            protected: Vec::new(),
        };

        run.place_clusters();
        run.cover_rows_and_columns();
        run.suppress_open_areas();
        run.separate_zones();
        run.connect_zones();
        run.eliminate_pockets();
        run.grid.connect_nodes();

        tracing::debug!(
            clusters = run.report.clusters_placed,
            obstacles = query::obstacle_cells(run.grid).len(),
            exhausted = run.report.exhausted.len(),
            "map generated"
        );
        run.report
    }
}

/// Mutable state of one generation pass.
struct Run<'a, R: ?Sized> {
    config: &'a GenerationConfig,
    grid: &'a mut Grid,
    rng: &'a mut R,
    report: GenerationReport,
    protected: Vec<bool>,
}

impl<R> Run<'_, R>
where
    R: Rng + ?Sized,
{
    fn place_clusters(&mut self) {
        let dimensions = self.grid.dimensions();
        let target = self.rng.gen_range(self.config.cluster_range());
        self.report.clusters_target = target;

        while self.report.clusters_placed < target
            && self.report.cluster_attempts < self.config.cluster_attempts
        {
            self.report.cluster_attempts += 1;

            let shape = SHAPES[self.rng.gen_range(0..SHAPES.len())];
            let anchor = CellCoord::new(
                self.rng.gen_range(0..dimensions.rows()),
                self.rng.gen_range(0..dimensions.columns()),
            );
            let Some(cells) = shape.cover(anchor, dimensions) else {
                continue;
            };
            if cells.iter().any(|cell| self.is_safe(*cell)) {
                continue;
            }
            for cell in cells {
                self.block(cell);
            }
            self.report.clusters_placed += 1;
        }

        if self.report.clusters_placed < target {
            self.report.exhaust(Exhaustion::Clusters {
                placed: self.report.clusters_placed,
                target,
            });
        }
        tracing::debug!(
            placed = self.report.clusters_placed,
            target,
            attempts = self.report.cluster_attempts,
            "obstacle clusters placed"
        );
    }

    fn cover_rows_and_columns(&mut self) {
        let dimensions = self.grid.dimensions();

        for row in query::fully_open_rows(self.grid) {
            let candidates: Vec<_> = (0..dimensions.columns())
                .map(|column| CellCoord::new(row, column))
                .filter(|cell| self.may_block(*cell))
                .collect();
            match candidates.choose(&mut *self.rng) {
                Some(cell) => {
                    self.block(*cell);
                    self.report.coverage_cells += 1;
                }
                None => self.report.exhaust(Exhaustion::RowCoverage { row }),
            }
        }

        for column in query::fully_open_columns(self.grid) {
            let candidates: Vec<_> = (0..dimensions.rows())
                .map(|row| CellCoord::new(row, column))
                .filter(|cell| self.may_block(*cell))
                .collect();
            match candidates.choose(&mut *self.rng) {
                Some(cell) => {
                    self.block(*cell);
                    self.report.coverage_cells += 1;
                }
                None => self.report.exhaust(Exhaustion::ColumnCoverage { column }),
            }
        }

        tracing::debug!(cells = self.report.coverage_cells, "open rows and columns covered");
    }

    fn suppress_open_areas(&mut self) {
        let size = self.config.window_size;

        // Blocking only ever closes windows, so the initial list covers
        // every window that can still be open when its turn comes.
        for origin in query::open_windows(self.grid, size) {
            if !query::is_window_open(self.grid, origin, size) {
                continue;
            }

            let candidates: Vec<_> = query::window_cells(origin, size)
                .filter(|cell| self.may_block(*cell))
                .collect();
            if candidates.is_empty() {
                self.report.exhaust(Exhaustion::OpenArea { origin });
                continue;
            }
            let chosen: Vec<_> = candidates
                .choose_multiple(&mut *self.rng, self.config.window_fill as usize)
                .copied()
                .collect();
            for cell in chosen {
                self.block(cell);
                self.report.suppression_cells += 1;
            }
        }

        tracing::debug!(cells = self.report.suppression_cells, "open areas suppressed");
    }

    fn separate_zones(&mut self) {
        let dimensions = self.grid.dimensions();
        let zones = self.grid.safe_zones();
        let (Some(left), Some(right)) = (
            self.grid.coord_of(zones.representative_left()),
            self.grid.coord_of(zones.representative_right()),
        ) else {
            return;
        };

        for column in 1..dimensions.columns().saturating_sub(1) {
            if !self.column_is_open(column) {
                continue;
            }

            while self.report.separation_attempts < self.config.separation_attempts {
                self.report.separation_attempts += 1;

                let cell = CellCoord::new(self.rng.gen_range(0..dimensions.rows()), column);
                if !self.may_block(cell) {
                    continue;
                }

                self.block(cell);
                self.grid.connect_nodes();
                if shortest_path(self.grid, left, right).is_empty() {
                    self.unblock(cell);
                } else {
                    self.report.separation_cells += 1;
                    break;
                }
            }

            if self.column_is_open(column) {
                self.report.exhaust(Exhaustion::Separation { column });
            }
        }

        self.grid.connect_nodes();
        tracing::debug!(
            cells = self.report.separation_cells,
            attempts = self.report.separation_attempts,
            "interior columns separated"
        );
    }

    fn connect_zones(&mut self) {
        if self.zones_connected() {
            return;
        }

        let zones = self.grid.safe_zones();
        let (Some(left), Some(right)) = (
            self.grid.coord_of(zones.representative_left()),
            self.grid.coord_of(zones.representative_right()),
        ) else {
            return;
        };

        self.protected = vec![false; self.grid.dimensions().cell_count()];
        for cell in corridor(left, right) {
            let Some(id) = self.grid.index_of(cell) else {
                continue;
            };
            if self.grid.is_safe(id) {
                continue;
            }
            self.protected[id.index()] = true;
            if !self.grid.is_traversable_id(id) {
                self.unblock(cell);
                self.report.corridor_cells += 1;
            }
        }
        self.report.corridor_carved = true;
        tracing::debug!(cells = self.report.corridor_cells, "corridor carved between safe zones");

        self.cover_rows_and_columns();
        self.suppress_open_areas();

        if !self.zones_connected() {
            self.report.exhaust(Exhaustion::Corridor);
        }
    }

    fn eliminate_pockets(&mut self) {
        let seeds: Vec<CellId> = self.grid.safe_zones().all().collect();
        let reachability = self.grid.reachable_from(&seeds);
        let pockets: Vec<_> = self
            .grid
            .dimensions()
            .cells()
            .filter(|cell| {
                self.grid.index_of(*cell).is_some_and(|id| {
                    self.grid.is_traversable_id(id) && !reachability.is_reached(id)
                })
            })
            .collect();

        for cell in pockets {
            self.block(cell);
            self.report.pocket_cells += 1;
        }
        tracing::debug!(cells = self.report.pocket_cells, "isolated pockets filled");
    }

    fn zones_connected(&self) -> bool {
        let zones = self.grid.safe_zones();
        self.grid.reachable_from(zones.left()).reaches_any(zones.right())
    }

    fn column_is_open(&self, column: u32) -> bool {
        (0..self.grid.dimensions().rows())
            .all(|row| self.grid.is_traversable(CellCoord::new(row, column)).unwrap_or(false))
    }

    fn is_safe(&self, cell: CellCoord) -> bool {
        self.grid
            .index_of(cell)
            .map_or(true, |id| self.grid.is_safe(id))
    }

    /// Whether the cell is a traversable, non-safe, non-corridor cell.
    fn may_block(&self, cell: CellCoord) -> bool {
        self.grid.index_of(cell).is_some_and(|id| {
            self.grid.is_traversable_id(id)
                && !self.grid.is_safe(id)
                && !self.protected.get(id.index()).copied().unwrap_or(false)
        })
    }

    fn block(&mut self, cell: CellCoord) {
        if let Err(error) = self.grid.set_traversable(cell, false) {
            tracing::warn!(%error, "generator attempted to block a cell outside the grid");
        }
    }

    fn unblock(&mut self, cell: CellCoord) {
        if let Err(error) = self.grid.set_traversable(cell, true) {
            tracing::warn!(%error, "generator attempted to open a cell outside the grid");
        }
    }
}

/// Monotonic stepped line from `from` to `to`, inclusive of both ends.
///
/// Row and column steps are interleaved so that both advance at the same
/// relative pace.
fn corridor(from: CellCoord, to: CellCoord) -> Vec<CellCoord> {
    let total_rows = u64::from(from.row().abs_diff(to.row()));
    let total_columns = u64::from(from.column().abs_diff(to.column()));
    let (mut rows_done, mut columns_done) = (0_u64, 0_u64);
    let mut current = from;
    let mut cells = vec![from];

    while current != to {
        let columns_left = columns_done < total_columns;
        let rows_left = rows_done < total_rows;
        let step_column =
            columns_left && (!rows_left || columns_done * total_rows <= rows_done * total_columns);

        current = if step_column {
            columns_done += 1;
            let column = if to.column() > current.column() {
                current.column() + 1
            } else {
                current.column() - 1
            };
            CellCoord::new(current.row(), column)
        } else {
            rows_done += 1;
            let row = if to.row() > current.row() {
                current.row() + 1
            } else {
                current.row() - 1
            };
            CellCoord::new(row, current.column())
        };
        cells.push(current);
    }

    cells
}
