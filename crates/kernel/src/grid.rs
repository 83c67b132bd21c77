use std::collections::BTreeSet;
use tilescape_common::{CellPos, SpaceId};

use crate::error::EngineError;

/// One rectangular map: a space id and a walkability flag per cell.
///
/// Cells are stored column-major (`x * height + y`), matching a host array
/// indexed `[x][y]`. Every access is bounds-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    width: i32,
    height: i32,
    spaces: Vec<SpaceId>,
    walkable: Vec<bool>,
}

impl GridMap {
    /// An all-empty, all-walkable map.
    pub fn new(width: i32, height: i32) -> Result<Self, EngineError> {
        let len = Self::checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            spaces: vec![SpaceId::EMPTY; len],
            walkable: vec![true; len],
        })
    }

    /// Build from a flat slice indexed `x * height + y`.
    pub fn from_cells(cells: &[i32], width: i32, height: i32) -> Result<Self, EngineError> {
        let len = Self::checked_len(width, height)?;
        if cells.len() != len {
            return Err(EngineError::GridSizeMismatch {
                expected: len,
                actual: cells.len(),
            });
        }
        let spaces: Vec<SpaceId> = cells.iter().copied().map(SpaceId).collect();
        let walkable = spaces.iter().map(|s| s.is_empty()).collect();
        Ok(Self {
            width,
            height,
            spaces,
            walkable,
        })
    }

    /// Build from columns indexed `[x][y]`. All columns must be equally long.
    pub fn from_columns(columns: &[Vec<i32>]) -> Result<Self, EngineError> {
        let width = i32::try_from(columns.len()).unwrap_or(i32::MAX);
        let height = columns.first().map_or(0, |c| i32::try_from(c.len()).unwrap_or(i32::MAX));
        let len = Self::checked_len(width, height)?;

        let mut cells = Vec::with_capacity(len);
        for column in columns {
            if column.len() != height as usize {
                return Err(EngineError::GridSizeMismatch {
                    expected: len,
                    actual: columns.iter().map(Vec::len).sum(),
                });
            }
            cells.extend_from_slice(column);
        }
        Self::from_cells(&cells, width, height)
    }

    fn checked_len(width: i32, height: i32) -> Result<usize, EngineError> {
        if width <= 0 || height <= 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        (width as usize)
            .checked_mul(height as usize)
            .ok_or(EngineError::InvalidDimensions { width, height })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        (0..self.width).contains(&x) && (0..self.height).contains(&y)
    }

    pub fn contains_pos(&self, pos: CellPos) -> bool {
        self.contains(pos.x, pos.y)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.contains(x, y)
            .then(|| x as usize * self.height as usize + y as usize)
    }

    fn checked_index(&self, x: i32, y: i32) -> Result<usize, EngineError> {
        self.index(x, y).ok_or(EngineError::OutOfBounds { x, y })
    }

    /// Space id at `(x, y)`, `None` outside the map.
    pub fn space(&self, x: i32, y: i32) -> Option<SpaceId> {
        self.index(x, y).map(|i| self.spaces[i])
    }

    /// Walkability at `(x, y)`; cells outside the map are never walkable.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.walkable[i])
    }

    /// Replace a cell's space id and reset its walkability to the default for
    /// that id (walkable only when empty).
    pub fn set_space(&mut self, x: i32, y: i32, space: SpaceId) -> Result<(), EngineError> {
        let i = self.checked_index(x, y)?;
        self.spaces[i] = space;
        self.walkable[i] = space.is_empty();
        Ok(())
    }

    /// Override a cell's walkability without touching its space id.
    pub fn set_walkable(&mut self, x: i32, y: i32, walkable: bool) -> Result<(), EngineError> {
        let i = self.checked_index(x, y)?;
        self.walkable[i] = walkable;
        Ok(())
    }

    /// Every distinct space id present in the grid.
    pub fn space_ids(&self) -> BTreeSet<SpaceId> {
        self.spaces.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_map_is_empty_and_walkable() {
        let g = GridMap::new(4, 3).unwrap();
        for x in 0..4 {
            for y in 0..3 {
                assert_eq!(g.space(x, y), Some(SpaceId::EMPTY));
                assert!(g.is_walkable(x, y));
            }
        }
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert!(matches!(GridMap::new(0, 3), Err(EngineError::InvalidDimensions { .. })));
        assert!(matches!(GridMap::new(3, -1), Err(EngineError::InvalidDimensions { .. })));
        assert_eq!(
            GridMap::from_cells(&[0, 0, 0], 2, 2),
            Err(EngineError::GridSizeMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn flat_layout_is_column_major() {
        // [[1, 2, 3], [4, 5, 6]] indexed [x][y]
        let g = GridMap::from_cells(&[1, 2, 3, 4, 5, 6], 2, 3).unwrap();
        assert_eq!(g.space(0, 2), Some(SpaceId(3)));
        assert_eq!(g.space(1, 0), Some(SpaceId(4)));
        assert_eq!(g, GridMap::from_columns(&[vec![1, 2, 3], vec![4, 5, 6]]).unwrap());
    }

    #[test]
    fn ragged_columns_rejected() {
        let err = GridMap::from_columns(&[vec![0, 0], vec![0]]).unwrap_err();
        assert!(matches!(err, EngineError::GridSizeMismatch { .. }));
        assert!(GridMap::from_columns(&[]).is_err());
    }

    #[test]
    fn walkability_defaults_to_empty_type() {
        let g = GridMap::from_cells(&[0, 9, 0, 0], 2, 2).unwrap();
        assert!(g.is_walkable(0, 0));
        assert!(!g.is_walkable(0, 1));
    }

    #[test]
    fn set_space_then_read_back() {
        let mut g = GridMap::new(3, 3).unwrap();
        for (x, y, t) in [(0, 0, 5), (2, 1, 0), (1, 2, -4)] {
            g.set_space(x, y, SpaceId(t)).unwrap();
            assert_eq!(g.space(x, y), Some(SpaceId(t)));
            assert_eq!(g.is_walkable(x, y), t == 0);
        }
    }

    #[test]
    fn walkable_override_survives_until_space_changes() {
        let mut g = GridMap::new(2, 2).unwrap();
        g.set_space(1, 1, SpaceId(3)).unwrap();
        g.set_walkable(1, 1, true).unwrap();
        assert!(g.is_walkable(1, 1));
        assert_eq!(g.space(1, 1), Some(SpaceId(3)));

        g.set_walkable(0, 0, false).unwrap();
        assert!(!g.is_walkable(0, 0));

        g.set_space(1, 1, SpaceId(3)).unwrap();
        assert!(!g.is_walkable(1, 1));
    }

    #[test]
    fn out_of_bounds_is_rejected_without_change() {
        let mut g = GridMap::new(3, 3).unwrap();
        let before = g.clone();
        for (x, y) in [(-1, 0), (0, -1), (3, 0), (0, 3), (i32::MAX, i32::MIN)] {
            assert_eq!(g.space(x, y), None);
            assert!(!g.is_walkable(x, y));
            assert_eq!(
                g.set_space(x, y, SpaceId(1)),
                Err(EngineError::OutOfBounds { x, y })
            );
            assert!(g.set_walkable(x, y, true).is_err());
        }
        assert_eq!(g, before);
    }

    #[test]
    fn distinct_space_ids() {
        let g = GridMap::from_cells(&[0, 9, 9, 2], 2, 2).unwrap();
        let ids: Vec<SpaceId> = g.space_ids().into_iter().collect();
        assert_eq!(ids, vec![SpaceId(0), SpaceId(2), SpaceId(9)]);
    }
}
