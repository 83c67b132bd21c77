use glam::{Mat4, Vec3};
use std::cell::RefCell;
use std::collections::BTreeMap;
use tilescape_common::{BatchId, Face, SurfaceRef};

use crate::geometry::Quad;
use crate::renderer::{BatchFactory, RenderBackend};

/// A call received by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    BeginDraw,
    EndDraw,
    Translate(Vec3),
    Rotate { degrees: f32, axis: Vec3 },
    UpdateModelMatrix,
    PushModelMatrix,
    PopModelMatrix,
    Allocate { id: BatchId, faces: usize },
    Compile { id: BatchId, face: Face, surface: SurfaceRef },
    Release { id: BatchId, faces: usize },
    DrawFace { id: BatchId, face: Face },
}

/// A face drawn during the last frame, with where it landed in view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnFace {
    pub batch: BatchId,
    pub face: Face,
    /// Surface compiled into the slot, `None` if the slot was never filled.
    pub surface: Option<SurfaceRef>,
    /// Cell centre transformed by the model matrix at draw time.
    pub origin: Vec3,
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    live: BTreeMap<BatchId, [Option<Quad>; Face::COUNT]>,
    model: Mat4,
    stack: Vec<Mat4>,
    calls: Vec<BackendCall>,
    drawn: Vec<DrawnFace>,
    frames: u64,
}

/// In-memory render backend.
///
/// Keeps a fixed-function style model-matrix stack, tracks live batches and
/// logs every call. Used headless by tests and the CLI.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    state: RefCell<State>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocated, not yet released blocks.
    pub fn live_batches(&self) -> usize {
        self.state.borrow().live.len()
    }

    pub fn is_live(&self, id: BatchId) -> bool {
        self.state.borrow().live.contains_key(&id)
    }

    pub fn compiled_surface(&self, id: BatchId, face: Face) -> Option<SurfaceRef> {
        let state = self.state.borrow();
        state.live.get(&id)?[face.slot()].map(|q| q.surface)
    }

    pub fn compiled_quad(&self, id: BatchId, face: Face) -> Option<Quad> {
        self.state.borrow().live.get(&id)?[face.slot()]
    }

    /// Faces drawn since the last `begin_draw`.
    pub fn drawn(&self) -> Vec<DrawnFace> {
        self.state.borrow().drawn.clone()
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.state.borrow().model
    }

    pub fn stack_depth(&self) -> usize {
        self.state.borrow().stack.len()
    }

    /// Completed `begin_draw`/`end_draw` pairs.
    pub fn frames(&self) -> u64 {
        self.state.borrow().frames
    }

    fn record(&self, call: BackendCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl BatchFactory for RecordingBackend {
    fn allocate(&self, faces: usize) -> BatchId {
        let id = {
            let mut state = self.state.borrow_mut();
            state.next_id += 1;
            let id = BatchId(state.next_id);
            // reserve the whole range like a display-list allocator would
            state.next_id += faces.saturating_sub(1) as u32;
            state.live.insert(id, [None; Face::COUNT]);
            id
        };
        self.record(BackendCall::Allocate { id, faces });
        id
    }

    fn compile(&self, id: BatchId, face: Face, quad: &Quad) {
        if let Some(slots) = self.state.borrow_mut().live.get_mut(&id) {
            slots[face.slot()] = Some(*quad);
        } else {
            tracing::warn!(?id, ?face, "compile into unknown batch");
        }
        self.record(BackendCall::Compile {
            id,
            face,
            surface: quad.surface,
        });
    }

    fn release(&self, id: BatchId, faces: usize) {
        if self.state.borrow_mut().live.remove(&id).is_none() {
            tracing::warn!(?id, "release of unknown batch");
        }
        self.record(BackendCall::Release { id, faces });
    }
}

impl RenderBackend for RecordingBackend {
    fn begin_draw(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.model = Mat4::IDENTITY;
            state.stack.clear();
            state.drawn.clear();
        }
        self.record(BackendCall::BeginDraw);
    }

    fn end_draw(&self) {
        self.state.borrow_mut().frames += 1;
        self.record(BackendCall::EndDraw);
    }

    fn translate(&self, offset: Vec3) {
        {
            let mut state = self.state.borrow_mut();
            state.model *= Mat4::from_translation(offset);
        }
        self.record(BackendCall::Translate(offset));
    }

    fn rotate(&self, degrees: f32, axis: Vec3) {
        {
            let mut state = self.state.borrow_mut();
            state.model *= Mat4::from_axis_angle(axis.normalize(), degrees.to_radians());
        }
        self.record(BackendCall::Rotate { degrees, axis });
    }

    fn update_model_matrix(&self) {
        self.record(BackendCall::UpdateModelMatrix);
    }

    fn push_model_matrix(&self) {
        {
            let mut state = self.state.borrow_mut();
            let model = state.model;
            state.stack.push(model);
        }
        self.record(BackendCall::PushModelMatrix);
    }

    fn pop_model_matrix(&self) {
        {
            let mut state = self.state.borrow_mut();
            match state.stack.pop() {
                Some(m) => state.model = m,
                None => tracing::warn!("model matrix stack underflow"),
            }
        }
        self.record(BackendCall::PopModelMatrix);
    }

    fn draw_face(&self, id: BatchId, face: Face) {
        {
            let mut state = self.state.borrow_mut();
            let surface = state
                .live
                .get(&id)
                .and_then(|slots| slots[face.slot()])
                .map(|q| q.surface);
            let origin = state.model.transform_point3(Vec3::ZERO);
            state.drawn.push(DrawnFace {
                batch: id,
                face,
                surface,
                origin,
            });
        }
        self.record(BackendCall::DrawFace { id, face });
    }
}
