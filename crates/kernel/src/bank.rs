use std::rc::Rc;
use tilescape_render::BatchFactory;

use crate::error::EngineError;
use crate::grid::GridMap;
use crate::space::SpaceRegistry;

/// Index of a slot in the [`MapBank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapId(pub usize);

impl std::fmt::Display for MapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "map#{}", self.0)
    }
}

/// A loaded map: its grid plus the render resources of its space types.
#[derive(Debug)]
pub struct MapSlot {
    pub grid: GridMap,
    pub spaces: SpaceRegistry,
}

impl MapSlot {
    /// Wrap `grid`, registering every space id it contains.
    pub fn new(grid: GridMap, factory: Rc<dyn BatchFactory>) -> Self {
        let mut spaces = SpaceRegistry::new(factory);
        for id in grid.space_ids() {
            spaces.ensure(id);
        }
        Self { grid, spaces }
    }
}

/// Fixed number of map slots with at most one current selection.
#[derive(Debug)]
pub struct MapBank {
    slots: Vec<Option<MapSlot>>,
    current: Option<MapId>,
}

impl MapBank {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            current: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store `slot` in the lowest free index.
    pub fn add(&mut self, slot: MapSlot) -> Result<MapId, EngineError> {
        let Some(index) = self.slots.iter().position(Option::is_none) else {
            return Err(EngineError::MapBankFull(self.capacity()));
        };
        self.slots[index] = Some(slot);
        Ok(MapId(index))
    }

    /// Remove a map, dropping its registry and therefore its batches. Deleting
    /// the current map leaves no map selected.
    pub fn delete(&mut self, id: MapId) -> Result<(), EngineError> {
        let slot = self
            .slots
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(EngineError::UnknownMap(id))?;
        drop(slot);
        if self.current == Some(id) {
            self.current = None;
        }
        Ok(())
    }

    pub fn is_map(&self, id: MapId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: MapId) -> Option<&MapSlot> {
        self.slots.get(id.0)?.as_ref()
    }

    pub fn get_mut(&mut self, id: MapId) -> Option<&mut MapSlot> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    /// Select `id`. An unknown id is rejected and the selection is unchanged.
    pub fn set_current(&mut self, id: MapId) -> Result<(), EngineError> {
        if !self.is_map(id) {
            return Err(EngineError::UnknownMap(id));
        }
        self.current = Some(id);
        Ok(())
    }

    pub fn current_id(&self) -> Option<MapId> {
        self.current
    }

    pub fn current(&self) -> Option<&MapSlot> {
        self.get(self.current?)
    }

    pub fn current_mut(&mut self) -> Option<&mut MapSlot> {
        let id = self.current?;
        self.get_mut(id)
    }

    /// Occupied slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (MapId, &MapSlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (MapId(i), s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilescape_common::{SpaceId, SurfaceRef};
    use tilescape_render::{RecordingBackend, SpaceGeometry};

    use crate::space::SurfaceSlot;

    fn slot(backend: &Rc<RecordingBackend>) -> MapSlot {
        let grid = GridMap::from_cells(&[0, 1, 2, 1], 2, 2).unwrap();
        MapSlot::new(grid, backend.clone())
    }

    #[test]
    fn new_slot_registers_grid_spaces() {
        let backend = Rc::new(RecordingBackend::new());
        let s = slot(&backend);
        assert_eq!(s.spaces.len(), 3);
        for id in [0, 1, 2] {
            assert!(s.spaces.contains(SpaceId(id)));
        }
    }

    #[test]
    fn fills_lowest_free_slot_and_reports_full() {
        let backend = Rc::new(RecordingBackend::new());
        let mut bank = MapBank::with_capacity(3);
        for expected in 0..3 {
            assert_eq!(bank.add(slot(&backend)).unwrap(), MapId(expected));
        }
        assert!(matches!(
            bank.add(slot(&backend)),
            Err(EngineError::MapBankFull(3))
        ));

        bank.delete(MapId(1)).unwrap();
        assert!(!bank.is_map(MapId(1)));
        assert_eq!(bank.add(slot(&backend)).unwrap(), MapId(1));
        assert_eq!(bank.len(), 3);
    }

    #[test]
    fn delete_current_clears_selection() {
        let backend = Rc::new(RecordingBackend::new());
        let mut bank = MapBank::with_capacity(2);
        let a = bank.add(slot(&backend)).unwrap();
        let b = bank.add(slot(&backend)).unwrap();

        bank.set_current(b).unwrap();
        bank.delete(a).unwrap();
        assert_eq!(bank.current_id(), Some(b));

        bank.delete(b).unwrap();
        assert_eq!(bank.current_id(), None);
        assert!(bank.current().is_none());
        assert!(bank.is_empty());
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let backend = Rc::new(RecordingBackend::new());
        let mut bank = MapBank::with_capacity(2);
        let a = bank.add(slot(&backend)).unwrap();
        bank.set_current(a).unwrap();

        assert_eq!(bank.set_current(MapId(1)), Err(EngineError::UnknownMap(MapId(1))));
        assert_eq!(bank.set_current(MapId(99)), Err(EngineError::UnknownMap(MapId(99))));
        assert_eq!(bank.current_id(), Some(a));
        assert_eq!(bank.delete(MapId(7)), Err(EngineError::UnknownMap(MapId(7))));
        assert!(!bank.is_map(MapId(99)));
    }

    #[test]
    fn delete_releases_map_batches() {
        let backend = Rc::new(RecordingBackend::new());
        let mut bank = MapBank::with_capacity(1);
        let id = bank.add(slot(&backend)).unwrap();
        let map = bank.get_mut(id).unwrap();
        map.spaces.bind(SpaceId(1), SurfaceSlot::Wall, Some(SurfaceRef(1)));
        map.spaces.bind(SpaceId(2), SurfaceSlot::Wall, Some(SurfaceRef(2)));
        map.spaces.generate(&SpaceGeometry::default());
        assert_eq!(backend.live_batches(), 2);

        bank.delete(id).unwrap();
        assert_eq!(backend.live_batches(), 0);
    }

    #[test]
    fn iter_skips_free_slots() {
        let backend = Rc::new(RecordingBackend::new());
        let mut bank = MapBank::with_capacity(3);
        bank.add(slot(&backend)).unwrap();
        bank.add(slot(&backend)).unwrap();
        bank.delete(MapId(0)).unwrap();
        let ids: Vec<MapId> = bank.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![MapId(1)]);
    }
}
