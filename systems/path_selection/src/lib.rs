#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Probabilistic choice of the path strategy for moves and shots.
//!
//! Moves draw from a [`Roll`] and take the class's exact strategy when the
//! draw does not exceed the threshold, otherwise a bounded random walk.
//! Shots fly along the line of sight unless an attack modifier says
//! otherwise. Modifiers are one-shot and consumed here.

mod roll;

pub use roll::{FixedRoll, Roll, RngRoll, DRAW_RANGE};

use rand::Rng;
use skirmish_core::{
    Action, CellCoord, Command, Event, GridError, Modifier, Modifiers, Path, Strategy, UnitClass,
    UnitColor,
};
use skirmish_system_pathfinding::find_path;
use skirmish_world::{apply, Grid};
use thiserror::Error;

/// Highest draw that still yields an exact path for a precise unit.
pub const PRECISE_THRESHOLD: u8 = 5;
/// Highest draw that still yields an exact path for an erratic unit.
pub const ERRATIC_THRESHOLD: u8 = 8;
/// Highest draw that still yields an exact path under mobility precision.
pub const MOBILITY_PRECISION_THRESHOLD: u8 = 9;

/// A single move or fire request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathRequest {
    /// Whether the unit moves or fires.
    pub action: Action,
    /// Cell the unit acts from.
    pub origin: CellCoord,
    /// Cell the player selected.
    pub destination: CellCoord,
    /// Color of the acting unit.
    pub color: UnitColor,
}

impl PathRequest {
    /// Creates a move request.
    #[must_use]
    pub const fn movement(color: UnitColor, origin: CellCoord, destination: CellCoord) -> Self {
        Self {
            action: Action::Move,
            origin,
            destination,
            color,
        }
    }

    /// Creates a fire request.
    #[must_use]
    pub const fn fire(color: UnitColor, origin: CellCoord, destination: CellCoord) -> Self {
        Self {
            action: Action::Fire,
            origin,
            destination,
            color,
        }
    }
}

/// Outcome of a path request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathPlan {
    /// Action the plan was computed for.
    pub action: Action,
    /// Cell the unit acts from.
    pub origin: CellCoord,
    /// Strategy that produced the path.
    pub strategy: Strategy,
    /// Cells produced by the strategy.
    pub path: Path,
    /// Whether the shot deals amplified damage.
    pub amplified: bool,
    /// Draw that decided the strategy; shots do not roll.
    pub roll: Option<u8>,
}

impl PathPlan {
    /// Cells entered after leaving the origin.
    #[must_use]
    pub fn steps(&self) -> &[CellCoord] {
        self.path.steps_from(self.origin)
    }

    /// Reports whether the path ends at `destination`.
    #[must_use]
    pub fn reaches(&self, destination: CellCoord) -> bool {
        self.path.ends_at(destination)
    }

    /// Cell the unit ends on: the last step, or the origin when the plan has
    /// no steps.
    #[must_use]
    pub fn landing(&self) -> CellCoord {
        self.steps().last().copied().unwrap_or(self.origin)
    }
}

/// Reasons a request is rejected before any path is computed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    /// The origin or destination lies outside the grid.
    #[error(transparent)]
    OutOfBounds(#[from] GridError),
    /// A move targets an obstacle.
    #[error("destination {cell} is an obstacle")]
    DestinationBlocked {
        /// Requested destination.
        cell: CellCoord,
    },
    /// A move targets a cell another unit stands on.
    #[error("destination {cell} is occupied")]
    DestinationOccupied {
        /// Requested destination.
        cell: CellCoord,
    },
    /// The roll source produced a value outside 1..=10.
    #[error("draw {draw} lies outside 1..=10")]
    DrawOutOfRange {
        /// Offending draw.
        draw: u8,
    },
}

/// Highest winning draw for a move by `class` under `modifiers`.
#[must_use]
pub fn exact_threshold(class: UnitClass, modifiers: &Modifiers) -> u8 {
    if modifiers.is_active(Modifier::MobilityPrecision) {
        return MOBILITY_PRECISION_THRESHOLD;
    }
    match class {
        UnitClass::Precise => PRECISE_THRESHOLD,
        UnitClass::Erratic => ERRATIC_THRESHOLD,
    }
}

/// Stateless policy translating requests into path plans.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathSelection;

impl PathSelection {
    /// Creates the policy.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates the request, picks a strategy and computes the path.
    ///
    /// Modifiers affecting the action are consumed on success; a rejected
    /// request leaves them untouched.
    pub fn plan<Ro, R>(
        &self,
        grid: &Grid,
        request: PathRequest,
        modifiers: &mut Modifiers,
        roll: &mut Ro,
        rng: &mut R,
    ) -> Result<PathPlan, PlanError>
    where
        Ro: Roll + ?Sized,
        R: Rng + ?Sized,
    {
        if !grid.contains(request.origin) {
            return Err(GridError::out_of_bounds(request.origin).into());
        }
        let destination_open = grid.is_traversable(request.destination)?;

        match request.action {
            Action::Move => {
                if !destination_open {
                    return Err(PlanError::DestinationBlocked {
                        cell: request.destination,
                    });
                }
                if grid.is_occupied(request.destination)? {
                    return Err(PlanError::DestinationOccupied {
                        cell: request.destination,
                    });
                }
                self.plan_move(grid, request, modifiers, roll, rng)
            }
            Action::Fire => Ok(self.plan_fire(grid, request, modifiers, rng)),
        }
    }

    fn plan_move<Ro, R>(
        &self,
        grid: &Grid,
        request: PathRequest,
        modifiers: &mut Modifiers,
        roll: &mut Ro,
        rng: &mut R,
    ) -> Result<PathPlan, PlanError>
    where
        Ro: Roll + ?Sized,
        R: Rng + ?Sized,
    {
        let class = request.color.class();
        let threshold = exact_threshold(class, modifiers);
        let draw = roll.draw();
        if !DRAW_RANGE.contains(&draw) {
            return Err(PlanError::DrawOutOfRange { draw });
        }
        let _ = modifiers.consume(Modifier::MobilityPrecision);

        let strategy = if draw <= threshold {
            class.exact_strategy()
        } else {
            Strategy::RandomWalk
        };
        tracing::trace!(?class, draw, threshold, %strategy, "movement roll");

        let mut path = find_path(strategy, grid, request.origin, request.destination, rng);
        if strategy == Strategy::RandomWalk {
            path = stop_before_units(grid, request.origin, path);
        }
        Ok(PathPlan {
            action: Action::Move,
            origin: request.origin,
            strategy,
            path,
            amplified: false,
            roll: Some(draw),
        })
    }

    fn plan_fire<R>(
        &self,
        grid: &Grid,
        request: PathRequest,
        modifiers: &mut Modifiers,
        rng: &mut R,
    ) -> PathPlan
    where
        R: Rng + ?Sized,
    {
        let strategy = if modifiers.consume(Modifier::AttackPrecision) {
            request.color.class().exact_strategy()
        } else {
            Strategy::LineOfSight
        };
        let amplified = modifiers.consume(Modifier::AttackPower);
        tracing::trace!(%strategy, amplified, "trajectory selected");

        let path = find_path(strategy, grid, request.origin, request.destination, rng);
        PathPlan {
            action: Action::Fire,
            origin: request.origin,
            strategy,
            path,
            amplified,
            roll: None,
        }
    }

    /// Moves the unit to the plan's landing cell.
    ///
    /// Shots and moves without steps leave the grid unchanged.
    pub fn commit(&self, grid: &mut Grid, plan: &PathPlan, out_events: &mut Vec<Event>) {
        if plan.action != Action::Move || plan.steps().is_empty() {
            return;
        }
        apply(grid, Command::RemoveUnit { cell: plan.origin }, out_events);
        apply(
            grid,
            Command::PlaceUnit {
                cell: plan.landing(),
            },
            out_events,
        );
    }
}

/// Cuts a walk trail before the first cell another unit stands on, so the
/// unit ends its turn next to the blocker.
fn stop_before_units(grid: &Grid, origin: CellCoord, path: Path) -> Path {
    let blocker = path
        .cells()
        .iter()
        .position(|cell| *cell != origin && grid.is_occupied(*cell).unwrap_or(false));
    let Some(index) = blocker else {
        return path;
    };

    let mut cells = path.into_vec();
    tracing::trace!(blocker = %cells[index], "walk stopped before an occupied cell");
    cells.truncate(index);
    Path::from_cells(cells)
}
