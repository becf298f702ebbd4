//! Straight-line and random-walk strategies.

use std::ops::RangeInclusive;

use rand::Rng;
use skirmish_core::{CellCoord, Direction, Path};
use skirmish_world::Grid;

/// Maximum number of line-of-sight attempts of a random walk.
pub const WALK_ROUNDS: usize = 4;

/// Number of random steps taken between two line-of-sight attempts.
pub const WALK_STEPS: RangeInclusive<usize> = 3..=7;

/// Straight walk along a shared row or column.
///
/// Returns every cell from `origin` to `destination` inclusive, in walk
/// order, or an empty path when the endpoints share neither a row nor a
/// column, lie outside the grid, or any cell on the line is an obstacle.
/// Diagonals are never attempted.
#[must_use]
pub fn line_of_sight(grid: &Grid, origin: CellCoord, destination: CellCoord) -> Path {
    if !grid.contains(origin) || !grid.contains(destination) {
        return Path::empty();
    }
    if origin.row() != destination.row() && origin.column() != destination.column() {
        return Path::empty();
    }

    let direction = if destination.row() < origin.row() {
        Direction::Up
    } else if destination.row() > origin.row() {
        Direction::Down
    } else if destination.column() < origin.column() {
        Direction::Left
    } else {
        Direction::Right
    };

    let length = origin.manhattan_distance(destination) as usize;
    let mut cells = Vec::with_capacity(length + 1);
    let mut current = origin;

    loop {
        if !grid.is_traversable(current).unwrap_or(false) {
            return Path::empty();
        }
        cells.push(current);
        if current == destination {
            break;
        }
        match current.step(direction) {
            Some(next) => current = next,
            None => return Path::empty(),
        }
    }

    Path::from_cells(cells)
}

/// Bounded random walk with line-of-sight retries.
///
/// Each of the [`WALK_ROUNDS`] rounds first looks for a clear line from the
/// current head to the destination and, if one exists, finishes along it.
/// Otherwise it wanders [`WALK_STEPS`] steps, each picked uniformly among
/// traversable neighbors and avoiding the cell it just left whenever another
/// choice exists. A dead end cuts the round short.
///
/// The returned trail lists the cells entered after `origin`; the origin
/// itself is not repeated. It ends at the destination only when a
/// line-of-sight attempt succeeded, so callers must handle trails that stop
/// at an intermediate cell.
pub fn random_walk<R>(grid: &Grid, origin: CellCoord, destination: CellCoord, rng: &mut R) -> Path
where
    R: Rng + ?Sized,
{
    let mut trail = Path::empty();
    if !grid.contains(origin) {
        return trail;
    }

    let mut head = origin;
    let mut previous = None;

    for round in 0..WALK_ROUNDS {
        let sight = line_of_sight(grid, head, destination);
        if !sight.is_empty() {
            for cell in sight.steps_from(head) {
                trail.push(*cell);
            }
            return trail;
        }

        let steps = rng.gen_range(WALK_STEPS);
        for _ in 0..steps {
            let Some(next) = next_step(grid, head, previous, rng) else {
                tracing::trace!(round, %head, "random walk hit a dead end");
                break;
            };
            previous = Some(head);
            head = next;
            trail.push(next);
        }
    }

    trail
}

fn next_step<R>(
    grid: &Grid,
    head: CellCoord,
    previous: Option<CellCoord>,
    rng: &mut R,
) -> Option<CellCoord>
where
    R: Rng + ?Sized,
{
    let id = grid.index_of(head)?;
    let mut candidates: Vec<CellCoord> = grid
        .neighbors(id)
        .iter()
        .filter_map(|neighbor| grid.coord_of(*neighbor))
        .collect();

    if candidates.len() > 1 {
        if let Some(previous) = previous {
            candidates.retain(|cell| *cell != previous);
        }
    }

    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.gen_range(0..candidates.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn line_of_sight_walks_open_row_in_order() {
        let grid = Grid::new();
        let path = line_of_sight(&grid, CellCoord::new(2, 2), CellCoord::new(2, 6));

        assert_eq!(
            path.cells(),
            &[
                CellCoord::new(2, 2),
                CellCoord::new(2, 3),
                CellCoord::new(2, 4),
                CellCoord::new(2, 5),
                CellCoord::new(2, 6),
            ]
        );
    }

    #[test]
    fn line_of_sight_fails_on_blocked_cell() {
        let mut grid = Grid::new();
        grid.set_traversable(CellCoord::new(2, 4), false)
            .expect("in bounds");

        assert!(line_of_sight(&grid, CellCoord::new(2, 2), CellCoord::new(2, 6)).is_empty());
    }

    #[test]
    fn line_of_sight_walks_columns_in_both_directions() {
        let grid = Grid::new();
        let upward = line_of_sight(&grid, CellCoord::new(5, 3), CellCoord::new(2, 3));

        assert_eq!(upward.len(), 4);
        assert_eq!(upward.first(), Some(CellCoord::new(5, 3)));
        assert!(upward.ends_at(CellCoord::new(2, 3)));
        assert_eq!(upward.cells()[1], CellCoord::new(4, 3));
    }

    #[test]
    fn line_of_sight_rejects_diagonals_and_outside_cells() {
        let grid = Grid::new();
        assert!(line_of_sight(&grid, CellCoord::new(1, 1), CellCoord::new(2, 2)).is_empty());
        assert!(line_of_sight(&grid, CellCoord::new(1, 1), CellCoord::new(1, 40)).is_empty());
    }

    #[test]
    fn line_of_sight_requires_traversable_endpoints() {
        let mut grid = Grid::new();
        grid.set_traversable(CellCoord::new(2, 6), false)
            .expect("in bounds");
        assert!(line_of_sight(&grid, CellCoord::new(2, 2), CellCoord::new(2, 6)).is_empty());
    }

    #[test]
    fn random_walk_never_reverses_when_alternatives_exist() {
        let mut grid = Grid::new();
        for cell in [CellCoord::new(0, 1), CellCoord::new(1, 0)] {
            grid.set_traversable(cell, false).expect("in bounds");
        }
        grid.connect_nodes();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let origin = CellCoord::new(6, 12);
        let unreachable_by_sight = CellCoord::new(0, 0);

        let trail = random_walk(&grid, origin, unreachable_by_sight, &mut rng);

        let mut cells = vec![origin];
        cells.extend_from_slice(trail.cells());
        for window in cells.windows(3) {
            if window[0] == window[2] {
                let middle = grid.index_of(window[1]).expect("in bounds");
                assert_eq!(grid.neighbors(middle).len(), 1, "reversal only at dead ends");
            }
        }
    }

    #[test]
    fn random_walk_stops_at_dead_end() {
        let mut grid = Grid::new();
        for cell in [CellCoord::new(0, 1), CellCoord::new(1, 0)] {
            grid.set_traversable(cell, false).expect("in bounds");
        }
        grid.connect_nodes();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let trail = random_walk(&grid, CellCoord::new(0, 0), CellCoord::new(5, 5), &mut rng);

        assert!(trail.is_empty());
    }
}
