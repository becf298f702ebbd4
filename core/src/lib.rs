#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Skirmish grid engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative grid, and pure systems. Adapters submit [`Command`] values
//! describing occupancy mutations, the world executes those commands via its
//! `apply` entry point and broadcasts [`Event`] values. Pathfinding and path
//! selection systems read the grid and answer with [`Path`] values.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of rows in the battlefield grid.
pub const GRID_ROWS: u32 = 13;

/// Number of columns in the battlefield grid.
pub const GRID_COLUMNS: u32 = 25;

/// Commands that express all permissible grid mutations after generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Marks the cell as occupied by a unit.
    PlaceUnit {
        /// Cell receiving the unit.
        cell: CellCoord,
    },
    /// Clears the occupancy flag of the cell.
    RemoveUnit {
        /// Cell the unit leaves.
        cell: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a cell became occupied.
    UnitPlaced {
        /// Cell that is now occupied.
        cell: CellCoord,
    },
    /// Confirms that a cell became free.
    UnitRemoved {
        /// Cell that is no longer occupied.
        cell: CellCoord,
    },
    /// Reports that an occupancy command was rejected.
    PlacementRejected {
        /// Cell named by the rejected command.
        cell: CellCoord,
        /// Specific reason the command failed.
        reason: PlacementError,
    },
}

/// Reasons an occupancy command may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The cell lies outside the grid bounds.
    OutOfBounds,
}

/// Cardinal directions in the fixed neighbor iteration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Neighbor iteration order used by every search: up, down, left, right.
    pub const ORDER: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Returns the neighboring coordinate in the given direction.
    ///
    /// Only the lower bound is checked here; upper bounds belong to
    /// [`GridDimensions`].
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::Up => self.row.checked_sub(1).map(|row| Self::new(row, self.column)),
            Direction::Down => self.row.checked_add(1).map(|row| Self::new(row, self.column)),
            Direction::Left => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(self.row, column)),
            Direction::Right => self
                .column
                .checked_add(1)
                .map(|column| Self::new(self.row, column)),
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.column)
    }
}

impl FromStr for CellCoord {
    type Err = ParseCoordError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim().trim_start_matches('(').trim_end_matches(')');
        let (row, column) = trimmed
            .split_once(',')
            .ok_or_else(|| ParseCoordError(value.to_owned()))?;
        let row = row
            .trim()
            .parse::<u32>()
            .map_err(|_| ParseCoordError(value.to_owned()))?;
        let column = column
            .trim()
            .parse::<u32>()
            .map_err(|_| ParseCoordError(value.to_owned()))?;
        Ok(Self::new(row, column))
    }
}

/// Error returned when a `row,column` string cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("could not parse cell coordinate '{0}', expected `row,column`")]
pub struct ParseCoordError(String);

/// Linear identifier of a cell, `row * columns + column`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(u32);

impl CellId {
    /// Creates a new cell identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Identifier as a slice offset.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Dimensions of the grid and the single place where coordinates and cell
/// identifiers are converted into each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    rows: u32,
    columns: u32,
}

impl GridDimensions {
    /// The fixed battlefield size.
    pub const STANDARD: GridDimensions = GridDimensions::new(GRID_ROWS, GRID_COLUMNS);

    /// Creates a dimension descriptor.
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Converts a coordinate into its linear identifier.
    #[must_use]
    pub fn index_of(&self, cell: CellCoord) -> Option<CellId> {
        if !self.contains(cell) {
            return None;
        }
        let id = cell.row().checked_mul(self.columns)?.checked_add(cell.column())?;
        Some(CellId::new(id))
    }

    /// Converts a linear identifier back into its coordinate.
    #[must_use]
    pub fn coord_of(&self, id: CellId) -> Option<CellCoord> {
        if self.columns == 0 || id.index() >= self.cell_count() {
            return None;
        }
        Some(CellCoord::new(id.get() / self.columns, id.get() % self.columns))
    }

    /// In-bounds 4-connected neighbors in up, down, left, right order.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        let dimensions = *self;
        Direction::ORDER
            .into_iter()
            .filter_map(move |direction| cell.step(direction))
            .filter(move |neighbor| dimensions.contains(*neighbor))
    }

    /// Iterates every coordinate in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows)
            .flat_map(move |row| (0..columns).map(move |column| CellCoord::new(row, column)))
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Ordered sequence of positions, first to last in walk order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    /// Creates an empty path, meaning "no route".
    #[must_use]
    pub const fn empty() -> Self {
        Self { cells: Vec::new() }
    }

    /// Wraps an ordered list of cells.
    #[must_use]
    pub fn from_cells(cells: Vec<CellCoord>) -> Self {
        Self { cells }
    }

    /// Cells in walk order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of cells in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether no route was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// First cell of the path.
    #[must_use]
    pub fn first(&self) -> Option<CellCoord> {
        self.cells.first().copied()
    }

    /// Last cell of the path.
    #[must_use]
    pub fn last(&self) -> Option<CellCoord> {
        self.cells.last().copied()
    }

    /// Reports whether the path terminates on the provided cell.
    #[must_use]
    pub fn ends_at(&self, cell: CellCoord) -> bool {
        self.last() == Some(cell)
    }

    /// Cells to walk when standing on `origin`, i.e. the path without a
    /// leading copy of the origin.
    #[must_use]
    pub fn steps_from(&self, origin: CellCoord) -> &[CellCoord] {
        match self.cells.split_first() {
            Some((first, rest)) if *first == origin => rest,
            _ => &self.cells,
        }
    }

    /// Appends a single cell.
    pub fn push(&mut self, cell: CellCoord) {
        self.cells.push(cell);
    }

    /// Appends every cell of `other`, skipping its first cell when it repeats
    /// the current tail.
    pub fn append(&mut self, other: &Path) {
        let skip = usize::from(self.last().is_some() && self.last() == other.first());
        self.cells.extend(other.cells.iter().skip(skip).copied());
    }

    /// Consumes the path, yielding the underlying cells.
    #[must_use]
    pub fn into_vec(self) -> Vec<CellCoord> {
        self.cells
    }
}

/// Team color of a unit; the color decides the movement class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitColor {
    /// Red units move precisely.
    Red,
    /// Blue units move precisely.
    Blue,
    /// Green units move erratically.
    Green,
    /// Yellow units move erratically.
    Yellow,
}

impl UnitColor {
    /// All colors in declaration order.
    pub const ALL: [UnitColor; 4] = [
        UnitColor::Red,
        UnitColor::Blue,
        UnitColor::Green,
        UnitColor::Yellow,
    ];

    /// Movement class associated with the color.
    #[must_use]
    pub const fn class(self) -> UnitClass {
        match self {
            Self::Red | Self::Blue => UnitClass::Precise,
            Self::Green | Self::Yellow => UnitClass::Erratic,
        }
    }
}

impl FromStr for UnitColor {
    type Err = ParseNameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Self::Red),
            "blue" => Ok(Self::Blue),
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            _ => Err(ParseNameError::new("unit color", value)),
        }
    }
}

/// Movement class that selects the exact-path strategy and its odds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitClass {
    /// Exact strategy is shortest-unweighted; lower base odds.
    Precise,
    /// Exact strategy is uniform-cost; higher base odds.
    Erratic,
}

impl UnitClass {
    /// Strategy used whenever the class resolves to an exact path.
    #[must_use]
    pub const fn exact_strategy(self) -> Strategy {
        match self {
            Self::Precise => Strategy::ShortestUnweighted,
            Self::Erratic => Strategy::UniformCost,
        }
    }
}

/// Interchangeable search strategies offered by the pathfinder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Breadth-first search with parent pointers.
    ShortestUnweighted,
    /// Priority-queue search with unit edge weights.
    UniformCost,
    /// Straight row or column walk.
    LineOfSight,
    /// Bounded random walk with line-of-sight retries.
    RandomWalk,
}

impl Strategy {
    /// Stable lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ShortestUnweighted => "shortest",
            Self::UniformCost => "uniform-cost",
            Self::LineOfSight => "line-of-sight",
            Self::RandomWalk => "random-walk",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ParseNameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "shortest" | "bfs" => Ok(Self::ShortestUnweighted),
            "uniform-cost" | "ucs" => Ok(Self::UniformCost),
            "line-of-sight" | "los" => Ok(Self::LineOfSight),
            "random-walk" | "random" => Ok(Self::RandomWalk),
            _ => Err(ParseNameError::new("strategy", value)),
        }
    }
}

/// One-shot power-ups that alter path selection or damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    /// Raises the odds of an exact movement path to 90%.
    MobilityPrecision,
    /// Replaces the line-of-sight trajectory with the exact strategy.
    AttackPrecision,
    /// Flags the next hit for amplified damage.
    AttackPower,
}

impl FromStr for Modifier {
    type Err = ParseNameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mobility-precision" | "mobility" => Ok(Self::MobilityPrecision),
            "attack-precision" | "precision" => Ok(Self::AttackPrecision),
            "attack-power" | "power" => Ok(Self::AttackPower),
            _ => Err(ParseNameError::new("modifier", value)),
        }
    }
}

/// Modifier flags held by a single player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    mobility_precision: bool,
    attack_precision: bool,
    attack_power: bool,
}

impl Modifiers {
    /// Creates an empty modifier set.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            mobility_precision: false,
            attack_precision: false,
            attack_power: false,
        }
    }

    /// Returns a copy with the modifier granted.
    #[must_use]
    pub fn with(mut self, modifier: Modifier) -> Self {
        self.grant(modifier);
        self
    }

    /// Activates the modifier.
    pub fn grant(&mut self, modifier: Modifier) {
        *self.slot(modifier) = true;
    }

    /// Reports whether the modifier is active.
    #[must_use]
    pub fn is_active(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::MobilityPrecision => self.mobility_precision,
            Modifier::AttackPrecision => self.attack_precision,
            Modifier::AttackPower => self.attack_power,
        }
    }

    /// Clears the modifier, returning whether it was active.
    pub fn consume(&mut self, modifier: Modifier) -> bool {
        std::mem::replace(self.slot(modifier), false)
    }

    fn slot(&mut self, modifier: Modifier) -> &mut bool {
        match modifier {
            Modifier::MobilityPrecision => &mut self.mobility_precision,
            Modifier::AttackPrecision => &mut self.attack_precision,
            Modifier::AttackPower => &mut self.attack_power,
        }
    }
}

/// Kind of action a path is requested for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Unit movement.
    Move,
    /// Projectile trajectory.
    Fire,
}

impl FromStr for Action {
    type Err = ParseNameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "move" => Ok(Self::Move),
            "fire" => Ok(Self::Fire),
            _ => Err(ParseNameError::new("action", value)),
        }
    }
}

/// Error returned when a named value cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseNameError {
    kind: &'static str,
    value: String,
}

impl ParseNameError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Which spawn area a safe zone guards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneSide {
    /// Spawn area on the left edge.
    Left,
    /// Spawn area on the right edge.
    Right,
}

impl fmt::Display for ZoneSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// Errors raised by grid queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The coordinate lies outside the grid.
    #[error("cell ({row},{column}) is outside the grid")]
    OutOfBounds {
        /// Requested row.
        row: u32,
        /// Requested column.
        column: u32,
    },
}

impl GridError {
    /// Builds an out-of-bounds error for the coordinate.
    #[must_use]
    pub const fn out_of_bounds(cell: CellCoord) -> Self {
        Self::OutOfBounds {
            row: cell.row(),
            column: cell.column(),
        }
    }
}

/// Errors raised while constructing a grid from a safe-zone layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A safe-zone id does not name a cell of the grid.
    #[error("{zone} safe zone lists cell id {} outside the grid", .id.get())]
    SafeZoneOutOfBounds {
        /// Zone listing the id.
        zone: ZoneSide,
        /// Offending identifier.
        id: CellId,
    },
    /// A cell is listed by both zones.
    #[error("cell id {} belongs to both safe zones", .0.get())]
    OverlappingSafeZones(CellId),
    /// A zone lists no cells.
    #[error("{0} safe zone is empty")]
    EmptySafeZone(ZoneSide),
}
