//! Which cells and which wall faces a camera can see for each facing.
//!
//! A single table row per facing drives both the visited window and the
//! wall culling, so the four facings cannot drift apart.

use std::ops::Range;
use tilescape_common::{CellPos, Face, Facing};

/// Per-facing visibility parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacingView {
    pub facing: Facing,
    /// Grid delta of one cell "ahead".
    pub forward: (i32, i32),
    /// Grid delta of one cell to the camera's right.
    pub rightward: (i32, i32),
    /// Wall on the side of a cell nearest the camera.
    pub near_face: Face,
    /// Wall on the side of a cell away from the camera. Never visible.
    pub far_face: Face,
    /// Wall on the camera's left-hand side of a cell.
    pub left_face: Face,
    /// Wall on the camera's right-hand side of a cell.
    pub right_face: Face,
}

#[rustfmt::skip]
const VIEWS: [FacingView; 4] = [
    FacingView {
        facing: Facing::North, forward: (0, 1), rightward: (1, 0),
        near_face: Face::WallNear, far_face: Face::WallFar,
        left_face: Face::WallLeft, right_face: Face::WallRight,
    },
    FacingView {
        facing: Facing::East, forward: (1, 0), rightward: (0, -1),
        near_face: Face::WallLeft, far_face: Face::WallRight,
        left_face: Face::WallFar, right_face: Face::WallNear,
    },
    FacingView {
        facing: Facing::South, forward: (0, -1), rightward: (-1, 0),
        near_face: Face::WallFar, far_face: Face::WallNear,
        left_face: Face::WallRight, right_face: Face::WallLeft,
    },
    FacingView {
        facing: Facing::West, forward: (-1, 0), rightward: (0, 1),
        near_face: Face::WallRight, far_face: Face::WallLeft,
        left_face: Face::WallNear, right_face: Face::WallFar,
    },
];

impl FacingView {
    pub fn of(facing: Facing) -> &'static FacingView {
        &VIEWS[facing.index() as usize]
    }

    /// Signed distance of `cell` ahead of `camera`.
    pub fn ahead(&self, camera: CellPos, cell: CellPos) -> i32 {
        (cell.x - camera.x) * self.forward.0 + (cell.y - camera.y) * self.forward.1
    }

    /// Signed distance of `cell` to the right of `camera`.
    pub fn lateral(&self, camera: CellPos, cell: CellPos) -> i32 {
        (cell.x - camera.x) * self.rightward.0 + (cell.y - camera.y) * self.rightward.1
    }

    /// Wall faces of `cell` that can face the camera.
    ///
    /// The near wall shows for cells level with or ahead of the camera. A cell
    /// to the left shows its right-hand wall and vice versa; cells straight
    /// ahead show neither side.
    pub fn visible_walls(&self, camera: CellPos, cell: CellPos) -> impl Iterator<Item = Face> {
        let near = (self.ahead(camera, cell) >= 0).then_some(self.near_face);
        let side = match self.lateral(camera, cell) {
            l if l < 0 => Some(self.right_face),
            l if l > 0 => Some(self.left_face),
            _ => None,
        };
        near.into_iter().chain(side)
    }
}

/// The rectangle of cells visited for one draw pass, clipped to the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewWindow {
    pub xs: Range<i32>,
    pub ys: Range<i32>,
}

impl ViewWindow {
    /// Extends `distance` cells ahead, `distance / 2` behind and `distance`
    /// to either side of `camera`. Upper bounds are exclusive in grid order.
    pub fn new(facing: Facing, camera: CellPos, distance: u32, width: i32, height: i32) -> Self {
        let ahead = i32::try_from(distance).unwrap_or(i32::MAX);
        let behind = ahead / 2;

        let (xs, ys) = match facing {
            Facing::North => (
                span(camera.x, ahead, ahead, width),
                span(camera.y, behind, ahead, height),
            ),
            Facing::South => (
                span(camera.x, ahead, ahead, width),
                span(camera.y, ahead, behind, height),
            ),
            Facing::East => (
                span(camera.x, behind, ahead, width),
                span(camera.y, ahead, ahead, height),
            ),
            Facing::West => (
                span(camera.x, ahead, behind, width),
                span(camera.y, ahead, ahead, height),
            ),
        };
        Self { xs, ys }
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty() || self.ys.is_empty()
    }

    /// Cells in column-major order (x outer, y inner).
    pub fn cells(&self) -> impl Iterator<Item = CellPos> {
        let ys = self.ys.clone();
        self.xs
            .clone()
            .flat_map(move |x| ys.clone().map(move |y| CellPos::new(x, y)))
    }
}

/// `[center - below, center + above)` clipped to `[0, len)`.
fn span(center: i32, below: i32, above: i32, len: i32) -> Range<i32> {
    let start = center.saturating_sub(below).max(0);
    let end = center.saturating_add(above).min(len);
    start..end.max(start)
}
