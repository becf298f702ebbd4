//! Obstacle cluster shapes expressed as relative offsets.

use skirmish_core::{CellCoord, GridDimensions};

/// Obstacle footprint anchored at its upper-left cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    name: &'static str,
    offsets: &'static [(u32, u32)],
}

impl Shape {
    const fn new(name: &'static str, offsets: &'static [(u32, u32)]) -> Self {
        Self { name, offsets }
    }

    /// Human-readable name of the shape.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// `(row, column)` offsets relative to the anchor.
    #[must_use]
    pub const fn offsets(&self) -> &'static [(u32, u32)] {
        self.offsets
    }

    /// Cells covered when anchored at `anchor`, or `None` if any of them
    /// falls outside the grid.
    #[must_use]
    pub fn cover(&self, anchor: CellCoord, dimensions: GridDimensions) -> Option<Vec<CellCoord>> {
        self.offsets
            .iter()
            .map(|&(row, column)| {
                let cell = CellCoord::new(
                    anchor.row().checked_add(row)?,
                    anchor.column().checked_add(column)?,
                );
                dimensions.contains(cell).then_some(cell)
            })
            .collect()
    }
}

/// The five cluster shapes the generator draws from.
pub const SHAPES: [Shape; 5] = [
    Shape::new("horizontal bar", &[(0, 0), (0, 1), (0, 2)]),
    Shape::new("vertical bar", &[(0, 0), (1, 0), (2, 0)]),
    Shape::new("l tromino", &[(0, 0), (1, 0), (1, 1)]),
    Shape::new("square", &[(0, 0), (0, 1), (1, 0), (1, 1)]),
    Shape::new("t tetromino", &[(0, 0), (0, 1), (0, 2), (1, 1)]),
];
