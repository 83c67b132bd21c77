use glam::Vec3;
use tilescape_common::{Face, SurfaceRef};

/// One textured quad in cell-local space, centred on the cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub surface: SurfaceRef,
    pub normal: Vec3,
    /// Counter-clockwise, starting at texture coordinate (0,0).
    pub vertices: [Vec3; 4],
}

/// Dimensions shared by every cell of every map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceGeometry {
    pub square_size: f32,
    pub floor_height: f32,
    pub ceiling_height: f32,
}

impl Default for SpaceGeometry {
    fn default() -> Self {
        Self {
            square_size: 0.125,
            floor_height: -0.04,
            ceiling_height: 0.04,
        }
    }
}

impl SpaceGeometry {
    /// Build the quad for `face` textured with `surface`.
    pub fn quad(&self, face: Face, surface: SurfaceRef) -> Quad {
        let o = self.square_size / 2.0;
        let f = self.floor_height;
        let c = self.ceiling_height;

        #[rustfmt::skip]
        let vertices = match face {
            Face::Ceiling => [
                Vec3::new(-o, c, -o), Vec3::new( o, c, -o),
                Vec3::new( o, c,  o), Vec3::new(-o, c,  o),
            ],
            Face::Floor => [
                Vec3::new(-o, f, -o), Vec3::new( o, f, -o),
                Vec3::new( o, f,  o), Vec3::new(-o, f,  o),
            ],
            Face::WallNear => [
                Vec3::new(-o, f, o), Vec3::new( o, f, o),
                Vec3::new( o, c, o), Vec3::new(-o, c, o),
            ],
            Face::WallRight => [
                Vec3::new(o, f,  o), Vec3::new(o, f, -o),
                Vec3::new(o, c, -o), Vec3::new(o, c,  o),
            ],
            Face::WallFar => [
                Vec3::new( o, f, -o), Vec3::new(-o, f, -o),
                Vec3::new(-o, c, -o), Vec3::new( o, c, -o),
            ],
            Face::WallLeft => [
                Vec3::new(-o, f, -o), Vec3::new(-o, f,  o),
                Vec3::new(-o, c,  o), Vec3::new(-o, c, -o),
            ],
        };

        Quad {
            surface,
            normal: face.normal(),
            vertices,
        }
    }

    /// Quads for a space with the given bindings. Walls come as a set of four
    /// when `wall` is bound; floor and ceiling are independent.
    pub fn quads(
        &self,
        floor: Option<SurfaceRef>,
        ceiling: Option<SurfaceRef>,
        wall: Option<SurfaceRef>,
    ) -> Vec<(Face, Quad)> {
        let mut out = Vec::with_capacity(Face::COUNT);
        if let Some(s) = ceiling {
            out.push((Face::Ceiling, self.quad(Face::Ceiling, s)));
        }
        if let Some(s) = floor {
            out.push((Face::Floor, self.quad(Face::Floor, s)));
        }
        if let Some(s) = wall {
            for face in Face::WALLS {
                out.push((face, self.quad(face, s)));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_quads_lie_on_their_side() {
        let g = SpaceGeometry::default();
        let half = g.square_size / 2.0;
        for face in Face::WALLS {
            let q = g.quad(face, SurfaceRef(1));
            for v in q.vertices {
                // every vertex sits on the plane the normal points out of
                assert!((v.dot(q.normal) - half).abs() < 1e-6, "{face:?} {v:?}");
            }
        }
    }

    #[test]
    fn floor_and_ceiling_heights() {
        let g = SpaceGeometry {
            square_size: 1.0,
            floor_height: -0.5,
            ceiling_height: 0.5,
        };
        assert!(g.quad(Face::Floor, SurfaceRef(1)).vertices.iter().all(|v| v.y == -0.5));
        assert!(g.quad(Face::Ceiling, SurfaceRef(1)).vertices.iter().all(|v| v.y == 0.5));
        assert_eq!(g.quad(Face::Floor, SurfaceRef(1)).normal, Vec3::Y);
    }

    #[test]
    fn quads_follow_bindings() {
        let g = SpaceGeometry::default();
        assert!(g.quads(None, None, None).is_empty());

        let faces: Vec<Face> = g
            .quads(Some(SurfaceRef(1)), None, None)
            .into_iter()
            .map(|(f, _)| f)
            .collect();
        assert_eq!(faces, vec![Face::Floor]);

        let all = g.quads(Some(SurfaceRef(1)), Some(SurfaceRef(2)), Some(SurfaceRef(3)));
        assert_eq!(all.len(), Face::COUNT);
        assert!(all.iter().all(|(f, q)| q.normal == f.normal()));
    }
}
