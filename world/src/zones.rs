//! Spawn safe zones and their validation.

use skirmish_core::{CellCoord, CellId, ConfigError, GridDimensions, ZoneSide};

const STANDARD_ZONE_ROWS: std::ops::RangeInclusive<u32> = 4..=8;
const STANDARD_ZONE_WIDTH: u32 = 2;

/// Unvalidated safe-zone description supplied by configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SafeZoneLayout {
    /// Cell ids of the left spawn area.
    pub left: Vec<CellId>,
    /// Cell ids of the right spawn area.
    pub right: Vec<CellId>,
}

impl SafeZoneLayout {
    /// Two-column spawn pockets hugging the left and right edges of the grid.
    #[must_use]
    pub fn standard(dimensions: GridDimensions) -> Self {
        let columns = dimensions.columns();
        let mut left = Vec::new();
        let mut right = Vec::new();

        for row in STANDARD_ZONE_ROWS {
            for offset in 0..STANDARD_ZONE_WIDTH {
                if let Some(id) = dimensions.index_of(CellCoord::new(row, offset)) {
                    left.push(id);
                }
                let column = columns.saturating_sub(STANDARD_ZONE_WIDTH) + offset;
                if let Some(id) = dimensions.index_of(CellCoord::new(row, column)) {
                    right.push(id);
                }
            }
        }

        Self { left, right }
    }
}

/// Validated pair of disjoint safe zones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafeZones {
    left: Vec<CellId>,
    right: Vec<CellId>,
    membership: Vec<Option<ZoneSide>>,
    representative_left: CellId,
    representative_right: CellId,
}

impl SafeZones {
    /// Standard zones of the 13×25 grid: rows 4 to 8 of the two outermost
    /// columns on each side.
    #[must_use]
    pub fn standard() -> Self {
        let dimensions = GridDimensions::STANDARD;
        let columns = dimensions.columns();
        let right_start = columns - STANDARD_ZONE_WIDTH;
        let id = |row: u32, column: u32| CellId::new(row * columns + column);

        let mut membership = vec![None; dimensions.cell_count()];
        let mut left = Vec::new();
        let mut right = Vec::new();
        for row in STANDARD_ZONE_ROWS {
            for offset in 0..STANDARD_ZONE_WIDTH {
                left.push(id(row, offset));
                right.push(id(row, right_start + offset));
            }
        }
        for (side, ids) in [(ZoneSide::Left, &left), (ZoneSide::Right, &right)] {
            for cell in ids {
                if let Some(slot) = membership.get_mut(cell.index()) {
                    *slot = Some(side);
                }
            }
        }

        Self {
            left,
            right,
            membership,
            representative_left: id(*STANDARD_ZONE_ROWS.start(), STANDARD_ZONE_WIDTH - 1),
            representative_right: id(*STANDARD_ZONE_ROWS.end(), right_start),
        }
    }

    /// Validates the layout against the grid dimensions.
    ///
    /// Ids outside the grid, a cell listed by both zones, or an empty zone
    /// are configuration errors.
    pub fn from_layout(
        dimensions: GridDimensions,
        layout: &SafeZoneLayout,
    ) -> Result<Self, ConfigError> {
        let mut membership = vec![None; dimensions.cell_count()];

        for (side, ids) in [(ZoneSide::Left, &layout.left), (ZoneSide::Right, &layout.right)] {
            for &id in ids {
                let slot = membership
                    .get_mut(id.index())
                    .ok_or(ConfigError::SafeZoneOutOfBounds { zone: side, id })?;
                match *slot {
                    Some(existing) if existing != side => {
                        return Err(ConfigError::OverlappingSafeZones(id));
                    }
                    _ => *slot = Some(side),
                }
            }
        }

        let mut left = layout.left.clone();
        let mut right = layout.right.clone();
        left.sort_unstable();
        left.dedup();
        right.sort_unstable();
        right.dedup();

        let coord = |id: &CellId| dimensions.coord_of(*id).unwrap_or(CellCoord::new(0, 0));

        // Left representative: the innermost column, then the lowest row.
        let representative_left = left
            .iter()
            .min_by_key(|id| (std::cmp::Reverse(coord(id).column()), coord(id).row()))
            .copied()
            .ok_or(ConfigError::EmptySafeZone(ZoneSide::Left))?;
        // Right representative: the innermost column, then the highest row.
        let representative_right = right
            .iter()
            .min_by_key(|id| (coord(id).column(), std::cmp::Reverse(coord(id).row())))
            .copied()
            .ok_or(ConfigError::EmptySafeZone(ZoneSide::Right))?;

        Ok(Self {
            left,
            right,
            membership,
            representative_left,
            representative_right,
        })
    }

    /// Cells of the left zone in ascending id order.
    #[must_use]
    pub fn left(&self) -> &[CellId] {
        &self.left
    }

    /// Cells of the right zone in ascending id order.
    #[must_use]
    pub fn right(&self) -> &[CellId] {
        &self.right
    }

    /// Cells of both zones, left first.
    pub fn all(&self) -> impl Iterator<Item = CellId> + '_ {
        self.left.iter().chain(self.right.iter()).copied()
    }

    /// Zone that owns the cell, if any.
    #[must_use]
    pub fn side_of(&self, id: CellId) -> Option<ZoneSide> {
        self.membership.get(id.index()).copied().flatten()
    }

    /// Reports whether the cell belongs to either zone.
    #[must_use]
    pub fn contains(&self, id: CellId) -> bool {
        self.side_of(id).is_some()
    }

    /// Left cell used for connectivity checks and corridor carving.
    #[must_use]
    pub const fn representative_left(&self) -> CellId {
        self.representative_left
    }

    /// Right cell used for connectivity checks and corridor carving.
    #[must_use]
    pub const fn representative_right(&self) -> CellId {
        self.representative_right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_layout_is_valid_and_disjoint() {
        let dimensions = GridDimensions::STANDARD;
        let zones = SafeZones::from_layout(dimensions, &SafeZoneLayout::standard(dimensions))
            .expect("standard layout is valid");

        assert_eq!(zones.left().len(), 10);
        assert_eq!(zones.right().len(), 10);
        assert_eq!(
            dimensions.coord_of(zones.representative_left()),
            Some(CellCoord::new(4, 1))
        );
        assert_eq!(
            dimensions.coord_of(zones.representative_right()),
            Some(CellCoord::new(8, 23))
        );
    }

    #[test]
    fn standard_zones_match_the_validated_layout() {
        let dimensions = GridDimensions::STANDARD;
        let validated = SafeZones::from_layout(dimensions, &SafeZoneLayout::standard(dimensions))
            .expect("standard layout is valid");

        assert_eq!(SafeZones::standard(), validated);
    }

    #[test]
    fn out_of_bounds_ids_fail_fast() {
        let dimensions = GridDimensions::STANDARD;
        let layout = SafeZoneLayout {
            left: vec![CellId::new(0)],
            right: vec![CellId::new(325)],
        };

        assert_eq!(
            SafeZones::from_layout(dimensions, &layout),
            Err(ConfigError::SafeZoneOutOfBounds {
                zone: ZoneSide::Right,
                id: CellId::new(325),
            })
        );
    }

    #[test]
    fn overlapping_zones_are_rejected() {
        let layout = SafeZoneLayout {
            left: vec![CellId::new(3)],
            right: vec![CellId::new(3)],
        };

        assert_eq!(
            SafeZones::from_layout(GridDimensions::STANDARD, &layout),
            Err(ConfigError::OverlappingSafeZones(CellId::new(3)))
        );
    }

    #[test]
    fn empty_zone_is_rejected() {
        let layout = SafeZoneLayout {
            left: vec![CellId::new(3)],
            right: Vec::new(),
        };

        assert_eq!(
            SafeZones::from_layout(GridDimensions::STANDARD, &layout),
            Err(ConfigError::EmptySafeZone(ZoneSide::Right))
        );
    }
}
