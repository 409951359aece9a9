use super::*;
use slicevox_mesh::primitives::{create_cube, create_sphere};
use slicevox_mesh::ExhaustiveCollider;

fn cube_engine(delta: f64) -> SliceEngine {
    let cube = create_cube(DVec3::ZERO, DVec3::new(1.0, 1.0, 2.0)).unwrap();
    SliceEngine::new(&cube, delta).unwrap()
}

#[test]
fn test_quadrants_cover_region() {
    let region = Region {
        x: 3,
        y: 5,
        w: 5,
        h: 3,
    };
    let quads = region.quadrants();
    assert_eq!(quads.iter().map(Region::area).sum::<usize>(), region.area());
    assert_eq!(quads[0], Region { x: 3, y: 5, w: 2, h: 1 });
    assert_eq!(quads[3], Region { x: 5, y: 6, w: 3, h: 2 });
}

#[test]
fn test_quadrants_of_thin_region() {
    let region = Region {
        x: 0,
        y: 0,
        w: 1,
        h: 4,
    };
    let quads = region.quadrants();
    assert_eq!(quads[0].area(), 0);
    assert_eq!(quads[1].area(), 2);
    assert_eq!(quads[2].area(), 0);
    assert_eq!(quads[3].area(), 2);
}

#[test]
fn test_box_dimensions() {
    let engine = cube_engine(0.5);
    assert_eq!(engine.width(), 2);
    assert_eq!(engine.height(), 2);
    assert_eq!(engine.num_frames(), 4);
    assert_eq!(engine.delta(), 0.5);
}

#[test]
fn test_odd_width_is_padded() {
    let cube = create_cube(DVec3::ZERO, DVec3::new(1.5, 1.0, 1.0)).unwrap();
    let engine = SliceEngine::new(&cube, 0.5).unwrap();
    assert_eq!(engine.width(), 4);
    assert_eq!(engine.height(), 2);
    let bounds = engine.bounds();
    assert!((bounds.min.x + 0.25).abs() < 1e-12);
    assert!((bounds.max.x - 1.75).abs() < 1e-12);
    assert_eq!(bounds.min.y, 0.0);
    assert_eq!(engine.slice(0).unwrap().width(), 4);
}

#[test]
fn test_frame_z_is_slab_center() {
    let engine = cube_engine(0.5);
    assert!((engine.frame_z(0) - 0.25).abs() < 1e-12);
    assert!((engine.frame_z(3) - 1.75).abs() < 1e-12);
}

#[test]
fn test_every_cube_pixel_is_inside() {
    let engine = cube_engine(0.25);
    for i in 0..engine.num_frames() {
        let frame = engine.slice(i).unwrap();
        assert_eq!(frame.inside_count(), engine.width() * engine.height());
    }
}

#[test]
fn test_index_out_of_range() {
    let engine = cube_engine(0.5);
    assert!(engine.slice(3).is_ok());
    for index in [4, 100, usize::MAX] {
        match engine.slice(index) {
            Err(SliceError::IndexOutOfRange { index: i, frames }) => {
                assert_eq!(i, index);
                assert_eq!(frames, 4);
            }
            other => panic!("expected out of range, got {other:?}"),
        }
    }
}

#[test]
fn test_rejects_bad_input() {
    let cube = create_cube(DVec3::ZERO, DVec3::ONE).unwrap();
    assert!(matches!(
        SliceEngine::new(&cube, 0.0),
        Err(SliceError::InvalidDelta(_))
    ));
    assert!(matches!(
        SliceEngine::new(&cube, f64::INFINITY),
        Err(SliceError::InvalidDelta(_))
    ));
    assert!(matches!(
        SliceEngine::new(&Mesh::new(), 0.1),
        Err(SliceError::EmptyMesh)
    ));
}

#[test]
fn test_large_frame_matches_reference() {
    // Big enough to take the parallel branch.
    let sphere = create_sphere(DVec3::ZERO, 1.0, 32).unwrap();
    let delta = 0.015;
    let engine = SliceEngine::new(&sphere, delta).unwrap();
    assert!(engine.width() * engine.height() >= PARALLEL_MIN_PIXELS);

    let solid = MeshSolid::new(&sphere);
    let reference =
        SliceEngine::with_parts(solid, ExhaustiveCollider, sphere.bounding_box(), delta).unwrap();
    let middle = engine.num_frames() / 2;
    assert_eq!(engine.slice(middle).unwrap(), reference.slice(middle).unwrap());
}
