#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state for Skirmish.
//!
//! The [`Grid`] owns per-cell traversability and occupancy, the two spawn
//! [`SafeZones`], and the derived 4-connected adjacency list. Obstacles are
//! written once by the map generator; afterwards only occupancy changes, and
//! those flow through [`apply`].

mod navigation;
mod zones;

pub use navigation::Reachability;
pub use zones::{SafeZoneLayout, SafeZones};

use skirmish_core::{
    CellCoord, CellId, Command, ConfigError, Event, GridDimensions, GridError, PlacementError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cell {
    traversable: bool,
    occupied: bool,
}

impl Cell {
    const OPEN: Cell = Cell {
        traversable: true,
        occupied: false,
    };
}

/// Fixed-size node grid with traversability, occupancy and adjacency.
#[derive(Clone, Debug)]
pub struct Grid {
    dimensions: GridDimensions,
    cells: Vec<Cell>,
    zones: SafeZones,
    adjacency: Vec<Vec<CellId>>,
}

impl Grid {
    /// Creates the standard 13×25 grid with the standard spawn zones, fully
    /// open and with adjacency built.
    #[must_use]
    pub fn new() -> Self {
        Self::from_zones(GridDimensions::STANDARD, SafeZones::standard())
    }

    /// Creates a fully open grid after validating the safe-zone layout.
    pub fn with_layout(
        dimensions: GridDimensions,
        layout: &SafeZoneLayout,
    ) -> Result<Self, ConfigError> {
        let zones = SafeZones::from_layout(dimensions, layout)?;
        Ok(Self::from_zones(dimensions, zones))
    }

    fn from_zones(dimensions: GridDimensions, zones: SafeZones) -> Self {
        let mut grid = Self {
            dimensions,
            cells: vec![Cell::OPEN; dimensions.cell_count()],
            zones,
            adjacency: Vec::new(),
        };
        grid.connect_nodes();
        grid
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Validated spawn zones.
    #[must_use]
    pub const fn safe_zones(&self) -> &SafeZones {
        &self.zones
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        self.dimensions.contains(cell)
    }

    /// Converts a coordinate into its linear id.
    #[must_use]
    pub fn index_of(&self, cell: CellCoord) -> Option<CellId> {
        self.dimensions.index_of(cell)
    }

    /// Converts a linear id into its coordinate.
    #[must_use]
    pub fn coord_of(&self, id: CellId) -> Option<CellCoord> {
        self.dimensions.coord_of(id)
    }

    /// Reports whether a path may pass through the cell.
    pub fn is_traversable(&self, cell: CellCoord) -> Result<bool, GridError> {
        self.cell(cell).map(|cell| cell.traversable)
    }

    /// Reports whether a unit stands on the cell.
    pub fn is_occupied(&self, cell: CellCoord) -> Result<bool, GridError> {
        self.cell(cell).map(|cell| cell.occupied)
    }

    /// Traversability by id; unknown ids read as obstacles.
    #[must_use]
    pub fn is_traversable_id(&self, id: CellId) -> bool {
        self.cells.get(id.index()).is_some_and(|cell| cell.traversable)
    }

    /// Reports whether the cell belongs to either spawn zone.
    #[must_use]
    pub fn is_safe(&self, id: CellId) -> bool {
        self.zones.contains(id)
    }

    /// Marks the cell as occupied. Traversability is not checked.
    pub fn place(&mut self, cell: CellCoord) -> Result<(), GridError> {
        self.cell_mut(cell).map(|cell| cell.occupied = true)
    }

    /// Clears the occupancy flag of the cell.
    pub fn remove(&mut self, cell: CellCoord) -> Result<(), GridError> {
        self.cell_mut(cell).map(|cell| cell.occupied = false)
    }

    /// Overwrites the traversability of a cell.
    ///
    /// Adjacency is left untouched until [`Grid::connect_nodes`] runs.
    pub fn set_traversable(&mut self, cell: CellCoord, traversable: bool) -> Result<(), GridError> {
        self.cell_mut(cell).map(|cell| cell.traversable = traversable)
    }

    /// Traversable neighbors of the cell in up, down, left, right order.
    ///
    /// Unknown and obstacle ids have no neighbors.
    #[must_use]
    pub fn neighbors(&self, id: CellId) -> &[CellId] {
        self.adjacency.get(id.index()).map_or(&[], Vec::as_slice)
    }

    /// Full adjacency list indexed by cell id.
    #[must_use]
    pub fn adjacency(&self) -> &[Vec<CellId>] {
        &self.adjacency
    }

    /// Rebuilds the 4-connected adjacency list from the current
    /// traversability. Running it twice without edits yields the same list.
    pub fn connect_nodes(&mut self) {
        let dimensions = self.dimensions;
        let mut adjacency = vec![Vec::new(); dimensions.cell_count()];

        for cell in dimensions.cells() {
            let Some(id) = dimensions.index_of(cell) else {
                continue;
            };
            if !self.is_traversable_id(id) {
                continue;
            }

            adjacency[id.index()] = dimensions
                .neighbors(cell)
                .filter_map(|neighbor| dimensions.index_of(neighbor))
                .filter(|neighbor| self.is_traversable_id(*neighbor))
                .collect();
        }

        self.adjacency = adjacency;
    }

    /// Flood fills traversable cells from the provided seeds.
    #[must_use]
    pub fn reachable_from(&self, seeds: &[CellId]) -> Reachability {
        let mut reachability = Reachability::default();
        reachability.rebuild_with(self.dimensions, seeds, |cell| {
            self.is_traversable(cell).unwrap_or(false)
        });
        reachability
    }

    fn cell(&self, cell: CellCoord) -> Result<&Cell, GridError> {
        self.dimensions
            .index_of(cell)
            .and_then(|id| self.cells.get(id.index()))
            .ok_or(GridError::out_of_bounds(cell))
    }

    fn cell_mut(&mut self, cell: CellCoord) -> Result<&mut Cell, GridError> {
        self.dimensions
            .index_of(cell)
            .and_then(|id| self.cells.get_mut(id.index()))
            .ok_or(GridError::out_of_bounds(cell))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided occupancy command to the grid.
pub fn apply(grid: &mut Grid, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceUnit { cell } => match grid.place(cell) {
            Ok(()) => out_events.push(Event::UnitPlaced { cell }),
            Err(_) => out_events.push(Event::PlacementRejected {
                cell,
                reason: PlacementError::OutOfBounds,
            }),
        },
        Command::RemoveUnit { cell } => match grid.remove(cell) {
            Ok(()) => out_events.push(Event::UnitRemoved { cell }),
            Err(_) => out_events.push(Event::PlacementRejected {
                cell,
                reason: PlacementError::OutOfBounds,
            }),
        },
    }
}

/// Query functions that provide read-only access to the grid.
pub mod query {
    use skirmish_core::{CellCoord, ZoneSide};

    use super::Grid;

    /// Coordinates of every obstacle in row-major order.
    #[must_use]
    pub fn obstacle_cells(grid: &Grid) -> Vec<CellCoord> {
        grid.dimensions()
            .cells()
            .filter(|cell| !grid.is_traversable(*cell).unwrap_or(true))
            .collect()
    }

    /// Rows that contain no obstacle.
    #[must_use]
    pub fn fully_open_rows(grid: &Grid) -> Vec<u32> {
        let dimensions = grid.dimensions();
        (0..dimensions.rows())
            .filter(|row| {
                (0..dimensions.columns()).all(|column| {
                    grid.is_traversable(CellCoord::new(*row, column))
                        .unwrap_or(false)
                })
            })
            .collect()
    }

    /// Columns that contain no obstacle.
    #[must_use]
    pub fn fully_open_columns(grid: &Grid) -> Vec<u32> {
        let dimensions = grid.dimensions();
        (0..dimensions.columns())
            .filter(|column| {
                (0..dimensions.rows())
                    .all(|row| grid.is_traversable(CellCoord::new(row, *column)).unwrap_or(false))
            })
            .collect()
    }

    /// Reports whether the `size`×`size` window anchored at `origin` is
    /// entirely inside the grid and traversable.
    #[must_use]
    pub fn is_window_open(grid: &Grid, origin: CellCoord, size: u32) -> bool {
        window_cells(origin, size).all(|cell| grid.is_traversable(cell).unwrap_or(false))
    }

    /// Upper-left corners of every fully traversable `size`×`size` window.
    #[must_use]
    pub fn open_windows(grid: &Grid, size: u32) -> Vec<CellCoord> {
        let dimensions = grid.dimensions();
        if size == 0 || size > dimensions.rows() || size > dimensions.columns() {
            return Vec::new();
        }

        let mut corners = Vec::new();
        for row in 0..=dimensions.rows() - size {
            for column in 0..=dimensions.columns() - size {
                let origin = CellCoord::new(row, column);
                if is_window_open(grid, origin, size) {
                    corners.push(origin);
                }
            }
        }
        corners
    }

    /// Cells covered by the window anchored at `origin`, row-major.
    pub fn window_cells(origin: CellCoord, size: u32) -> impl Iterator<Item = CellCoord> {
        (0..size).flat_map(move |row| {
            (0..size).map(move |column| {
                CellCoord::new(origin.row() + row, origin.column() + column)
            })
        })
    }

    /// Reports whether some traversable cell is cut off from both spawn zones.
    #[must_use]
    pub fn has_isolated_pockets(grid: &Grid) -> bool {
        let seeds: Vec<_> = grid.safe_zones().all().collect();
        let reachability = grid.reachable_from(&seeds);
        grid.dimensions().cells().any(|cell| {
            grid.is_traversable(cell).unwrap_or(false)
                && grid
                    .index_of(cell)
                    .is_some_and(|id| !reachability.is_reached(id))
        })
    }

    /// One text line per row: `#` obstacle, `L`/`R` spawn zone, `o`
    /// occupied, `.` open.
    #[must_use]
    pub fn layout_rows(grid: &Grid) -> Vec<String> {
        let dimensions = grid.dimensions();
        (0..dimensions.rows())
            .map(|row| {
                (0..dimensions.columns())
                    .map(|column| {
                        let cell = CellCoord::new(row, column);
                        let side = grid.index_of(cell).and_then(|id| grid.safe_zones().side_of(id));
                        if grid.is_occupied(cell).unwrap_or(false) {
                            'o'
                        } else if !grid.is_traversable(cell).unwrap_or(false) {
                            '#'
                        } else {
                            match side {
                                Some(ZoneSide::Left) => 'L',
                                Some(ZoneSide::Right) => 'R',
                                None => '.',
                            }
                        }
                    })
                    .collect()
            })
            .collect()
    }
}
