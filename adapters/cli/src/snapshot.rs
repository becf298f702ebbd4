#![allow(clippy::missing_errors_doc)]

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use skirmish_core::{CellId, ConfigError, GridDimensions};
use skirmish_world::{query, Grid, SafeZoneLayout};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "skirmish";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "skirmish:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Obstacle layout and spawn zones of a generated map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MapSnapshot {
    /// Number of rows in the grid.
    pub(crate) rows: u32,
    /// Number of columns in the grid.
    pub(crate) columns: u32,
    /// Obstacle ids in ascending order.
    pub(crate) obstacles: Vec<CellId>,
    /// Left spawn zone.
    pub(crate) left_zone: Vec<CellId>,
    /// Right spawn zone.
    pub(crate) right_zone: Vec<CellId>,
}

impl MapSnapshot {
    /// Captures the layout of the grid. Occupancy is not recorded.
    #[must_use]
    pub(crate) fn capture(grid: &Grid) -> Self {
        let dimensions = grid.dimensions();
        Self {
            rows: dimensions.rows(),
            columns: dimensions.columns(),
            obstacles: query::obstacle_cells(grid)
                .into_iter()
                .filter_map(|cell| grid.index_of(cell))
                .collect(),
            left_zone: grid.safe_zones().left().to_vec(),
            right_zone: grid.safe_zones().right().to_vec(),
        }
    }

    /// Rebuilds a grid with the captured layout and fresh adjacency.
    pub(crate) fn restore(&self) -> Result<Grid, SnapshotError> {
        let dimensions = GridDimensions::new(self.rows, self.columns);
        if dimensions != GridDimensions::STANDARD {
            return Err(SnapshotError::InvalidDimensions(format!(
                "{}x{}",
                self.rows, self.columns
            )));
        }
        let layout = SafeZoneLayout {
            left: self.left_zone.clone(),
            right: self.right_zone.clone(),
        };
        let mut grid = Grid::with_layout(dimensions, &layout)?;

        for &id in &self.obstacles {
            let cell = grid
                .coord_of(id)
                .ok_or(SnapshotError::ObstacleOutOfBounds(id))?;
            if grid.is_safe(id) {
                return Err(SnapshotError::BlockedSafeZone(id));
            }
            grid.set_traversable(cell, false)
                .map_err(|_| SnapshotError::ObstacleOutOfBounds(id))?;
        }
        grid.connect_nodes();
        Ok(grid)
    }

    /// Encodes the snapshot into a single-line string.
    pub(crate) fn encode(&self) -> Result<String, SnapshotError> {
        let payload = SerializableSnapshot {
            obstacles: self.obstacles.clone(),
            left_zone: self.left_zone.clone(),
            right_zone: self.right_zone.clone(),
        };
        let json = serde_json::to_vec(&payload).map_err(SnapshotError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
            self.rows, self.columns
        ))
    }

    /// Decodes a snapshot from its string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, SnapshotError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SnapshotError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(SnapshotError::MissingPrefix)?;
        let version = parts.next().ok_or(SnapshotError::MissingVersion)?;
        let dimensions = parts.next().ok_or(SnapshotError::MissingDimensions)?;
        let payload = parts.next().ok_or(SnapshotError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(SnapshotError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(version.to_owned()));
        }

        let (rows, columns) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(SnapshotError::InvalidEncoding)?;
        let decoded: SerializableSnapshot =
            serde_json::from_slice(&bytes).map_err(SnapshotError::InvalidPayload)?;

        Ok(Self {
            rows,
            columns,
            obstacles: decoded.obstacles,
            left_zone: decoded.left_zone,
            right_zone: decoded.right_zone,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableSnapshot {
    obstacles: Vec<CellId>,
    left_zone: Vec<CellId>,
    right_zone: Vec<CellId>,
}

/// Errors that can occur while decoding or restoring map snapshots.
#[derive(Debug, Error)]
pub(crate) enum SnapshotError {
    /// The provided string was empty or contained only whitespace.
    #[error("snapshot string was empty")]
    EmptyPayload,
    /// The prefix segment was missing.
    #[error("snapshot string is missing the prefix")]
    MissingPrefix,
    /// The version segment was missing.
    #[error("snapshot string is missing the version")]
    MissingVersion,
    /// The grid dimensions were missing.
    #[error("snapshot string is missing the grid dimensions")]
    MissingDimensions,
    /// The payload segment was missing.
    #[error("snapshot string is missing the payload")]
    MissingPayload,
    /// The prefix segment was not recognised.
    #[error("snapshot prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The version identifier was not recognised.
    #[error("snapshot version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed or are not 13x25.
    #[error("grid dimensions '{0}' are not 13x25")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode snapshot payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload could not be (de)serialised.
    #[error("could not parse snapshot payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The captured safe zones are invalid for the captured dimensions.
    #[error(transparent)]
    Zones(#[from] ConfigError),
    /// An obstacle id lies outside the grid.
    #[error("obstacle {} lies outside the grid", .0.get())]
    ObstacleOutOfBounds(CellId),
    /// An obstacle covers a safe-zone cell.
    #[error("obstacle {} covers a safe-zone cell", .0.get())]
    BlockedSafeZone(CellId),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), SnapshotError> {
    let invalid = || SnapshotError::InvalidDimensions(dimensions.to_owned());
    let (rows, columns) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;
    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;

    let standard = GridDimensions::STANDARD;
    if rows != standard.rows() || columns != standard.columns() {
        return Err(invalid());
    }

    Ok((rows, columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use skirmish_core::CellCoord;
    use skirmish_system_generation::MapGenerator;

    #[test]
    fn generated_map_survives_transfer() {
        let mut grid = Grid::new();
        let _ = MapGenerator::default().generate(&mut grid, &mut ChaCha8Rng::seed_from_u64(4));

        let encoded = MapSnapshot::capture(&grid).encode().expect("encodes");
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:13x25:")));

        let restored = MapSnapshot::decode(&encoded)
            .expect("snapshot decodes")
            .restore()
            .expect("snapshot restores");
        assert_eq!(query::layout_rows(&restored), query::layout_rows(&grid));
        assert_eq!(restored.adjacency(), grid.adjacency());
    }

    #[test]
    fn malformed_strings_are_rejected() {
        assert!(matches!(MapSnapshot::decode("  "), Err(SnapshotError::EmptyPayload)));
        assert!(matches!(
            MapSnapshot::decode("maze:v1:13x25:e30"),
            Err(SnapshotError::InvalidPrefix(_))
        ));
        assert!(matches!(
            MapSnapshot::decode("skirmish:v2:13x25:e30"),
            Err(SnapshotError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            MapSnapshot::decode("skirmish:v1:13by25:e30"),
            Err(SnapshotError::InvalidDimensions(_))
        ));
        assert!(matches!(
            MapSnapshot::decode("skirmish:v1:13x25"),
            Err(SnapshotError::MissingPayload)
        ));
        assert!(matches!(
            MapSnapshot::decode("skirmish:v1:13x25:!!"),
            Err(SnapshotError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn only_the_standard_grid_is_accepted() {
        let payload = MapSnapshot::capture(&Grid::new()).encode().expect("encodes");
        let body = payload.rsplit(FIELD_DELIMITER).next().expect("payload segment");

        for dimensions in ["4294967295x4294967295", "1x2", "0x25", "25x13"] {
            let value = format!("{SNAPSHOT_HEADER}:{dimensions}:{body}");
            assert!(
                matches!(MapSnapshot::decode(&value), Err(SnapshotError::InvalidDimensions(_))),
                "{dimensions} was accepted"
            );
        }
        let standard = format!("{SNAPSHOT_HEADER}:13X25:{body}");
        assert!(MapSnapshot::decode(&standard).is_ok());
    }

    #[test]
    fn obstacles_on_safe_cells_are_rejected() {
        let grid = Grid::new();
        let mut snapshot = MapSnapshot::capture(&grid);
        let safe = grid.index_of(CellCoord::new(4, 0)).expect("in bounds");
        snapshot.obstacles.push(safe);

        assert!(matches!(
            snapshot.restore(),
            Err(SnapshotError::BlockedSafeZone(id)) if id == safe
        ));
    }

    #[test]
    fn restoring_a_resized_snapshot_fails() {
        let mut snapshot = MapSnapshot::capture(&Grid::new());
        snapshot.rows = u32::MAX;
        snapshot.columns = u32::MAX;

        assert!(matches!(
            snapshot.restore(),
            Err(SnapshotError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn overlapping_zones_are_rejected() {
        let grid = Grid::new();
        let mut snapshot = MapSnapshot::capture(&grid);
        snapshot.right_zone.push(snapshot.left_zone[0]);

        assert!(matches!(
            snapshot.restore(),
            Err(SnapshotError::Zones(ConfigError::OverlappingSafeZones(_)))
        ));
    }
}
