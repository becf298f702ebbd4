#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Read-only search strategies over the Skirmish grid.
//!
//! Every strategy is a pure function of the grid, an origin and a
//! destination, and answers with a [`Path`]. An empty path means no route
//! exists; no strategy reports failure any other way. The random walk is the
//! only strategy that needs randomness and the only one whose result may stop
//! short of the destination.

mod walk;

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, VecDeque},
};

use rand::Rng;
use skirmish_core::{CellCoord, CellId, Path, Strategy};
use skirmish_world::Grid;

pub use walk::{line_of_sight, random_walk, WALK_ROUNDS, WALK_STEPS};

/// Cost of traversing one edge. Every edge currently weighs the same.
const UNIT_EDGE_COST: u32 = 1;

/// Dispatches a path request to the selected strategy.
pub fn find_path<R>(
    strategy: Strategy,
    grid: &Grid,
    origin: CellCoord,
    destination: CellCoord,
    rng: &mut R,
) -> Path
where
    R: Rng + ?Sized,
{
    let path = match strategy {
        Strategy::ShortestUnweighted => shortest_path(grid, origin, destination),
        Strategy::UniformCost => uniform_cost_path(grid, origin, destination),
        Strategy::LineOfSight => line_of_sight(grid, origin, destination),
        Strategy::RandomWalk => random_walk(grid, origin, destination, rng),
    };
    tracing::trace!(%strategy, %origin, %destination, cells = path.len(), "path computed");
    path
}

/// Breadth-first search returning a minimum edge-count path.
///
/// Neighbors are expanded in the adjacency order (up, down, left, right), so
/// the result is deterministic. Both endpoints are included; a request whose
/// origin equals the destination yields that single cell.
#[must_use]
pub fn shortest_path(grid: &Grid, origin: CellCoord, destination: CellCoord) -> Path {
    let (Some(start), Some(goal)) = (endpoint(grid, origin), endpoint(grid, destination)) else {
        return Path::empty();
    };
    if start == goal {
        return Path::from_cells(vec![origin]);
    }

    let cell_count = grid.dimensions().cell_count();
    let mut parents: Vec<Option<CellId>> = vec![None; cell_count];
    let mut visited = vec![false; cell_count];
    let mut frontier = VecDeque::new();

    visited[start.index()] = true;
    frontier.push_back(start);

    while let Some(current) = frontier.pop_front() {
        if current == goal {
            break;
        }

        for &neighbor in grid.neighbors(current) {
            if visited[neighbor.index()] {
                continue;
            }
            visited[neighbor.index()] = true;
            parents[neighbor.index()] = Some(current);
            frontier.push_back(neighbor);
        }
    }

    reconstruct(grid, &parents, start, goal)
}

/// Priority-queue search with unit edge weights.
///
/// On this graph it returns paths of the same length as [`shortest_path`].
/// Equal-cost entries leave the queue in insertion order.
#[must_use]
pub fn uniform_cost_path(grid: &Grid, origin: CellCoord, destination: CellCoord) -> Path {
    let (Some(start), Some(goal)) = (endpoint(grid, origin), endpoint(grid, destination)) else {
        return Path::empty();
    };
    if start == goal {
        return Path::from_cells(vec![origin]);
    }

    let cell_count = grid.dimensions().cell_count();
    let mut parents: Vec<Option<CellId>> = vec![None; cell_count];
    let mut best = vec![u32::MAX; cell_count];
    let mut queue = BinaryHeap::new();
    let mut sequence: u64 = 0;

    best[start.index()] = 0;
    queue.push(Reverse((0_u32, sequence, start)));

    while let Some(Reverse((cost, _, current))) = queue.pop() {
        if cost > best[current.index()] {
            continue;
        }
        if current == goal {
            break;
        }

        for &neighbor in grid.neighbors(current) {
            let candidate = cost.saturating_add(UNIT_EDGE_COST);
            if candidate >= best[neighbor.index()] {
                continue;
            }
            best[neighbor.index()] = candidate;
            parents[neighbor.index()] = Some(current);
            sequence += 1;
            queue.push(Reverse((candidate, sequence, neighbor)));
        }
    }

    reconstruct(grid, &parents, start, goal)
}

fn endpoint(grid: &Grid, cell: CellCoord) -> Option<CellId> {
    grid.index_of(cell).filter(|id| grid.is_traversable_id(*id))
}

fn reconstruct(grid: &Grid, parents: &[Option<CellId>], start: CellId, goal: CellId) -> Path {
    if parents[goal.index()].is_none() {
        return Path::empty();
    }

    let mut reversed = vec![goal];
    let mut current = goal;
    while current != start {
        let Some(parent) = parents[current.index()] else {
            return Path::empty();
        };
        reversed.push(parent);
        current = parent;
        if reversed.len() > parents.len() {
            return Path::empty();
        }
    }

    Path::from_cells(
        reversed
            .into_iter()
            .rev()
            .filter_map(|id| grid.coord_of(id))
            .collect(),
    )
}
