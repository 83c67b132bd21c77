use glam::Vec3;
use tilescape_common::Face;
use tilescape_render::{FacingView, RenderBackend, ViewWindow};

use crate::bank::MapSlot;
use crate::movement::MovementController;

/// Counters from one view pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub cells_visited: usize,
    pub faces_drawn: usize,
}

/// Emit the camera transform and every face visible within `distance` cells.
///
/// Faces come from each space's last generated batch. Cells whose space has
/// no batch are visited but draw nothing.
pub fn render_view<B>(
    backend: &B,
    map: &MapSlot,
    camera: &MovementController,
    square_size: f32,
    distance: u32,
) -> DrawStats
where
    B: RenderBackend + ?Sized,
{
    let pos = camera.position();
    let facing = camera.facing();
    let view = FacingView::of(facing);

    let (walk_x, walk_y) = match camera.walk_direction() {
        Some(d) if d.is_x_axis() => (camera.walk_offset(), 0.0),
        Some(_) => (0.0, camera.walk_offset()),
        None => (0.0, 0.0),
    };

    backend.begin_draw();
    backend.translate(Vec3::new(0.0, 0.0, -square_size / 2.0));
    backend.rotate(facing.yaw_degrees() + camera.turn_offset(), Vec3::Y);
    backend.translate(Vec3::new(
        -(pos.x as f32 * square_size + walk_x),
        0.0,
        pos.y as f32 * square_size + walk_y,
    ));

    let window = ViewWindow::new(facing, pos, distance, map.grid.width(), map.grid.height());
    let mut stats = DrawStats::default();
    for cell in window.cells() {
        stats.cells_visited += 1;
        let batch = map
            .grid
            .space(cell.x, cell.y)
            .and_then(|id| map.spaces.get(id))
            .and_then(|space| space.batch());
        let Some(batch) = batch else { continue };

        let faces = [Face::Floor, Face::Ceiling]
            .into_iter()
            .chain(view.visible_walls(pos, cell))
            .filter(|face| batch.has_face(*face));

        backend.push_model_matrix();
        backend.translate(Vec3::new(
            cell.x as f32 * square_size,
            0.0,
            -(cell.y as f32) * square_size,
        ));
        backend.update_model_matrix();
        for face in faces {
            backend.draw_face(batch.id(), face);
            stats.faces_drawn += 1;
        }
        backend.pop_model_matrix();
    }
    backend.end_draw();
    stats
}
