//! Counters describing a single generation run.

use serde::Serialize;
use skirmish_core::CellCoord;

/// Invariant the generator could not establish within its bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Exhaustion {
    /// Cluster placement ran out of attempts before hitting its target.
    Clusters {
        /// Clusters actually placed.
        placed: u32,
        /// Clusters the run aimed for.
        target: u32,
    },
    /// No cell of a fully open row could become an obstacle.
    RowCoverage {
        /// Row left open.
        row: u32,
    },
    /// No cell of a fully open column could become an obstacle.
    ColumnCoverage {
        /// Column left open.
        column: u32,
    },
    /// A fully open window had no cell that could become an obstacle.
    OpenArea {
        /// Upper-left corner of the window.
        origin: CellCoord,
    },
    /// The shared separation budget ran out before the column was blocked.
    Separation {
        /// Column left open.
        column: u32,
    },
    /// The safe zones remained disconnected after carving a corridor.
    Corridor,
}

/// Per-step outcome of [`crate::MapGenerator::generate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Clusters the run aimed for.
    pub clusters_target: u32,
    /// Clusters actually placed.
    pub clusters_placed: u32,
    /// Cluster attempts consumed.
    pub cluster_attempts: u32,
    /// Obstacles added while covering open rows and columns.
    pub coverage_cells: u32,
    /// Obstacles added inside open windows.
    pub suppression_cells: u32,
    /// Obstacles kept by the separation step.
    pub separation_cells: u32,
    /// Separation attempts consumed, including reverted ones.
    pub separation_attempts: u32,
    /// Whether a corridor had to be carved between the zones.
    pub corridor_carved: bool,
    /// Obstacles cleared to open the corridor.
    pub corridor_cells: u32,
    /// Unreachable cells turned into obstacles.
    pub pocket_cells: u32,
    /// Invariants that could not be established.
    pub exhausted: Vec<Exhaustion>,
}

impl GenerationReport {
    /// Reports whether every invariant was established.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.exhausted.is_empty()
    }

    pub(crate) fn exhaust(&mut self, exhaustion: Exhaustion) {
        tracing::warn!(?exhaustion, "map generation invariant exhausted");
        self.exhausted.push(exhaustion);
    }
}
