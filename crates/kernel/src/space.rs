use std::collections::BTreeMap;
use std::rc::Rc;
use tilescape_common::{SpaceId, SurfaceRef};
use tilescape_render::{Batch, BatchFactory, SpaceGeometry};

/// Which surface of a space a binding targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceSlot {
    Floor,
    Ceiling,
    Wall,
}

/// Render resources for one space type.
#[derive(Debug)]
pub struct Space {
    id: SpaceId,
    floor: Option<SurfaceRef>,
    ceiling: Option<SurfaceRef>,
    wall: Option<SurfaceRef>,
    batch: Option<Batch>,
}

impl Space {
    fn new(id: SpaceId) -> Self {
        Self {
            id,
            floor: None,
            ceiling: None,
            wall: None,
            batch: None,
        }
    }

    pub fn id(&self) -> SpaceId {
        self.id
    }

    pub fn surface(&self, slot: SurfaceSlot) -> Option<SurfaceRef> {
        match slot {
            SurfaceSlot::Floor => self.floor,
            SurfaceSlot::Ceiling => self.ceiling,
            SurfaceSlot::Wall => self.wall,
        }
    }

    pub fn has_surfaces(&self) -> bool {
        self.floor.is_some() || self.ceiling.is_some() || self.wall.is_some()
    }

    /// The batch from the most recent generate pass. It keeps the surfaces
    /// bound at that time even if the bindings have changed since.
    pub fn batch(&self) -> Option<&Batch> {
        self.batch.as_ref()
    }
}

/// Sparse table of space id -> render resources for one map.
///
/// Entries are created on first reference and live until the registry is
/// dropped. Batches are only (re)built by [`generate`](Self::generate).
pub struct SpaceRegistry {
    factory: Rc<dyn BatchFactory>,
    spaces: BTreeMap<SpaceId, Space>,
}

impl SpaceRegistry {
    pub fn new(factory: Rc<dyn BatchFactory>) -> Self {
        Self {
            factory,
            spaces: BTreeMap::new(),
        }
    }

    /// Existing entry for `id`, or a fresh one with nothing bound.
    pub fn ensure(&mut self, id: SpaceId) -> &mut Space {
        self.spaces.entry(id).or_insert_with(|| {
            tracing::trace!(?id, "space registered");
            Space::new(id)
        })
    }

    pub fn get(&self, id: SpaceId) -> Option<&Space> {
        self.spaces.get(&id)
    }

    pub fn contains(&self, id: SpaceId) -> bool {
        self.spaces.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    /// Entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Space> {
        self.spaces.values()
    }

    /// Bind (`Some`) or clear (`None`) one surface of `id`, creating the entry
    /// if needed. The current batch is left as is.
    pub fn bind(&mut self, id: SpaceId, slot: SurfaceSlot, surface: Option<SurfaceRef>) {
        let space = self.ensure(id);
        match slot {
            SurfaceSlot::Floor => space.floor = surface,
            SurfaceSlot::Ceiling => space.ceiling = surface,
            SurfaceSlot::Wall => space.wall = surface,
        }
    }

    /// Rebuild the batch of every entry with at least one surface bound.
    /// Entries with nothing bound lose any stale batch. Returns the number of
    /// batches built.
    pub fn generate(&mut self, geometry: &SpaceGeometry) -> usize {
        let mut built = 0;
        for space in self.spaces.values_mut() {
            // release the old block before allocating its replacement
            space.batch = None;
            if !space.has_surfaces() {
                continue;
            }
            let quads = geometry.quads(space.floor, space.ceiling, space.wall);
            space.batch = Some(Batch::build(self.factory.clone(), quads));
            built += 1;
        }
        built
    }

    /// Number of entries currently holding a batch.
    pub fn batch_count(&self) -> usize {
        self.spaces.values().filter(|s| s.batch.is_some()).count()
    }
}

impl std::fmt::Debug for SpaceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpaceRegistry")
            .field("spaces", &self.spaces)
            .finish_non_exhaustive()
    }
}
