use glam::Vec3;
use std::rc::Rc;
use tilescape_common::{BatchId, Face, SurfaceRef};

use crate::geometry::Quad;

/// Allocates, fills and frees blocks of compiled face slots.
///
/// This is the only render capability a space registry holds. It is injected
/// at construction so registries never reach back into the engine that owns
/// them.
pub trait BatchFactory {
    /// Reserve `faces` consecutive slots and return the handle of the block.
    fn allocate(&self, faces: usize) -> BatchId;

    /// Compile `quad` into slot `face` of block `id`.
    fn compile(&self, id: BatchId, face: Face, quad: &Quad);

    /// Free a block previously returned by [`allocate`](Self::allocate).
    fn release(&self, id: BatchId, faces: usize);
}

/// Per-frame drawing interface. All renderers implement this trait.
///
/// Model-matrix operations follow fixed-function semantics: each translate or
/// rotate post-multiplies the current matrix, and push/pop save and restore it.
pub trait RenderBackend: BatchFactory {
    fn begin_draw(&self);
    fn end_draw(&self);

    fn translate(&self, offset: Vec3);
    /// Rotate by `degrees` around `axis`.
    fn rotate(&self, degrees: f32, axis: Vec3);
    /// Flush the current model matrix to the pipeline.
    fn update_model_matrix(&self);
    fn push_model_matrix(&self);
    fn pop_model_matrix(&self);

    /// Draw slot `face` of block `id` with the current model matrix.
    fn draw_face(&self, id: BatchId, face: Face);
}

/// A compiled set of faces for one space type.
///
/// Owns its slot block: the block is released when the batch is dropped,
/// whether that happens on regeneration, map deletion or engine teardown.
pub struct Batch {
    id: BatchId,
    surfaces: [Option<SurfaceRef>; Face::COUNT],
    factory: Rc<dyn BatchFactory>,
}

impl Batch {
    /// Allocate a block and compile every given quad into its face slot.
    pub fn build<I>(factory: Rc<dyn BatchFactory>, quads: I) -> Self
    where
        I: IntoIterator<Item = (Face, Quad)>,
    {
        let id = factory.allocate(Face::COUNT);
        let mut surfaces = [None; Face::COUNT];
        for (face, quad) in quads {
            factory.compile(id, face, &quad);
            surfaces[face.slot()] = Some(quad.surface);
        }
        tracing::trace!(?id, "batch built");
        Self {
            id,
            surfaces,
            factory,
        }
    }

    pub fn id(&self) -> BatchId {
        self.id
    }

    /// Surface compiled into `face`, if that slot was filled.
    pub fn surface(&self, face: Face) -> Option<SurfaceRef> {
        self.surfaces[face.slot()]
    }

    pub fn has_face(&self, face: Face) -> bool {
        self.surfaces[face.slot()].is_some()
    }

    /// Number of filled slots.
    pub fn face_count(&self) -> usize {
        self.surfaces.iter().filter(|s| s.is_some()).count()
    }
}

impl Drop for Batch {
    fn drop(&mut self) {
        self.factory.release(self.id, Face::COUNT);
        tracing::trace!(id = ?self.id, "batch released");
    }
}

impl std::fmt::Debug for Batch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Batch")
            .field("id", &self.id)
            .field("surfaces", &self.surfaces)
            .finish_non_exhaustive()
    }
}
