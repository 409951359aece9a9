use super::*;
use crate::primitives::{create_cube, create_sphere};
use crate::solid::MeshSolid;
use std::f64::consts::PI;

/// Ball defined analytically, for extraction without mesh noise.
struct Ball {
    center: DVec3,
    radius: f64,
}

impl Solid for Ball {
    fn contains(&self, point: DVec3) -> bool {
        (point - self.center).length() < self.radius
    }

    fn bounds(&self) -> BoundingBox {
        BoundingBox::new(
            self.center - DVec3::splat(self.radius),
            self.center + DVec3::splat(self.radius),
        )
    }
}

struct Nothing;

impl Solid for Nothing {
    fn contains(&self, _point: DVec3) -> bool {
        false
    }

    fn bounds(&self) -> BoundingBox {
        BoundingBox::empty()
    }
}

/// Every undirected edge of a closed surface is shared by exactly two
/// triangles.
fn assert_closed(mesh: &Mesh) {
    let mut counts: HashMap<(u32, u32), usize> = HashMap::new();
    for tri in mesh.triangles() {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            *counts.entry((a.min(b), a.max(b))).or_default() += 1;
        }
    }
    assert!(!counts.is_empty());
    for (edge, count) in counts {
        assert_eq!(count, 2, "edge {edge:?} used {count} times");
    }
}

#[test]
fn test_ball_volume() {
    let ball = Ball {
        center: DVec3::new(0.3, -0.2, 1.0),
        radius: 1.0,
    };
    let mesh = extract_isosurface(&ball, 0.1, 8).unwrap();
    let expected = 4.0 / 3.0 * PI;
    let volume = mesh.signed_volume();
    assert!(
        (volume - expected).abs() / expected < 0.03,
        "volume {volume} vs {expected}"
    );
}

#[test]
fn test_ball_surface_is_closed() {
    let ball = Ball {
        center: DVec3::ZERO,
        radius: 0.5,
    };
    assert_closed(&extract_isosurface(&ball, 0.1, 6).unwrap());
}

#[test]
fn test_vertices_lie_near_surface() {
    let ball = Ball {
        center: DVec3::ZERO,
        radius: 1.0,
    };
    let delta = 0.2;
    let depth = 10;
    let mesh = extract_isosurface(&ball, delta, depth).unwrap();
    let tolerance = delta / (1 << depth) as f64 * 2.0;
    for v in mesh.vertices() {
        assert!((v.length() - 1.0).abs() < tolerance, "{v:?}");
    }
}

#[test]
fn test_mesh_solid_round_trip() {
    let sphere = create_sphere(DVec3::ZERO, 1.0, 32).unwrap();
    let solid = MeshSolid::new(&sphere);
    let mesh = extract_isosurface(&solid, 0.1, 8).unwrap();
    let expected = sphere.signed_volume();
    let volume = mesh.signed_volume();
    assert!(
        (volume - expected).abs() / expected < 0.05,
        "volume {volume} vs {expected}"
    );
    assert_closed(&mesh);
}

#[test]
fn test_cube_extent_is_preserved() {
    let cube = create_cube(DVec3::ZERO, DVec3::new(1.0, 1.0, 2.0)).unwrap();
    let mesh = extract_isosurface(&MeshSolid::new(&cube), 0.15, 8).unwrap();
    let bbox = mesh.bounding_box();
    assert!(bbox.min.cmpge(DVec3::splat(-0.01)).all(), "{bbox:?}");
    assert!(bbox.max.cmple(DVec3::new(1.01, 1.01, 2.01)).all(), "{bbox:?}");
    assert!(bbox.extent().z > 1.7);
}

#[test]
fn test_invalid_delta() {
    let ball = Ball {
        center: DVec3::ZERO,
        radius: 1.0,
    };
    for delta in [0.0, -1.0, f64::NAN] {
        assert!(matches!(
            extract_isosurface(&ball, delta, 4),
            Err(MeshError::InvalidResolution { .. })
        ));
    }
}

#[test]
fn test_empty_bounds() {
    assert!(matches!(
        extract_isosurface(&Nothing, 0.1, 4),
        Err(MeshError::InvalidBounds)
    ));
}

#[test]
fn test_lattice_too_large() {
    let ball = Ball {
        center: DVec3::ZERO,
        radius: 1000.0,
    };
    assert!(matches!(
        extract_isosurface(&ball, 0.01, 4),
        Err(MeshError::TooManyCells { .. })
    ));
}

#[test]
fn test_trait_object() {
    let ball: Box<dyn Solid> = Box::new(Ball {
        center: DVec3::ZERO,
        radius: 0.4,
    });
    let mesh = extract_isosurface(ball.as_ref(), 0.1, 4).unwrap();
    assert!(mesh.triangle_count() > 0);
}
