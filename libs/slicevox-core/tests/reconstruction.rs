//! Slice-then-reconstruct round trips.

use glam::DVec3;
use slicevox_core::{Frame, SliceEngine, VolumeReconstructor};
use slicevox_mesh::primitives::create_sphere;
use slicevox_mesh::{extract_isosurface, Solid};

const DELTA: f64 = 0.1;
const RADIUS: f64 = 1.0;

/// Slices a sphere and feeds every `stride`-th frame to a reconstructor.
fn round_trip(stride: usize, smooth: usize) -> (SliceEngine, VolumeReconstructor) {
    let mesh = create_sphere(DVec3::ZERO, RADIUS, 48).unwrap();
    let engine = SliceEngine::new(&mesh, DELTA).unwrap();
    let mut recon = VolumeReconstructor::new(DELTA, stride, smooth).unwrap();
    for i in (0..engine.num_frames()).step_by(stride) {
        recon.add_frame(&engine.slice(i).unwrap());
    }
    (engine, recon)
}

/// Maps a world point into the reconstructor's frame of reference.
fn to_stack(engine: &SliceEngine, p: DVec3) -> DVec3 {
    let min = engine.bounds().min;
    DVec3::new(p.x - min.x, p.y - min.y, p.z - engine.frame_z(0))
}

#[test]
fn round_trip_agrees_away_from_surface() {
    let (engine, recon) = round_trip(1, 5);
    assert_eq!(recon.layer_count(), engine.num_frames());

    let margin = 3.0 * DELTA;
    let mut checked = 0;
    for k in 0..=20 {
        for j in 0..=20 {
            for i in 0..=20 {
                let p = DVec3::new(i as f64, j as f64, k as f64) * 0.13 - DVec3::splat(1.3);
                let r = p.length();
                if (r - RADIUS).abs() < margin {
                    continue;
                }
                let q = to_stack(&engine, p);
                if q.z < 0.0 || q.z > recon.max().z {
                    continue;
                }
                assert_eq!(recon.contains(q), r < RADIUS, "world point {p:?}");
                checked += 1;
            }
        }
    }
    assert!(checked > 1000);
}

#[test]
fn round_trip_with_stride() {
    let (engine, recon) = round_trip(2, 5);
    assert_eq!(recon.layer_count(), engine.num_frames().div_ceil(2));
    assert!((recon.layer_spacing() - 2.0 * DELTA).abs() < 1e-12);
    let center = to_stack(&engine, DVec3::ZERO);
    assert!(recon.contains(center));
    assert!(!recon.contains(to_stack(&engine, DVec3::new(0.9, 0.9, 0.0))));
}

#[test]
fn reconstructed_bounds_cover_the_sphere() {
    let (engine, recon) = round_trip(1, 0);
    let extent = engine.bounds().extent();
    assert!(recon.min().x <= 0.1 && recon.min().y <= 0.1);
    assert!(recon.max().x >= extent.x - 2.0 * DELTA);
    assert!(recon.max().y >= extent.y - 2.0 * DELTA);
    assert!((recon.max().z - (engine.num_frames() - 1) as f64 * DELTA).abs() < 1e-9);
}

#[test]
fn layer_count_tracks_frames_and_bounds_never_shrink() {
    let (engine, _) = round_trip(1, 0);
    let mut recon = VolumeReconstructor::new(DELTA, 1, 2).unwrap();
    let mut previous = (recon.min(), recon.max());
    for i in 0..engine.num_frames() {
        recon.add_frame(&engine.slice(i).unwrap());
        assert_eq!(recon.layer_count(), i + 1);
        let (min, max) = (recon.min(), recon.max());
        assert!(min.cmple(previous.0).all());
        assert!(max.cmpge(previous.1).all());
        previous = (min, max);
    }
}

#[test]
fn clamped_queries_match_edge_layers() {
    let (engine, recon) = round_trip(1, 5);
    let center = to_stack(&engine, DVec3::ZERO);
    let first = recon.layers()[0].signed_distance(center.truncate());
    let last = recon.layers()[recon.layer_count() - 1].signed_distance(center.truncate());
    let below = recon.distance(center.with_z(-0.35)).unwrap();
    let above = recon.distance(center.with_z(recon.max().z + 0.35)).unwrap();
    assert!((below - first).abs() < 1e-12);
    assert!((above - last).abs() < 1e-12);
}

#[test]
fn isosurface_of_reconstruction_approximates_sphere() {
    let (_, recon) = round_trip(1, 10);
    let mesh = extract_isosurface(&recon, DELTA, 8).unwrap();
    assert!(mesh.triangle_count() > 100);

    // The stack only spans frame centres, so the caps are trimmed by about
    // half a slab on each side.
    let volume = mesh.signed_volume();
    let sphere = 4.0 / 3.0 * std::f64::consts::PI;
    assert!(volume > 0.8 * sphere && volume < 1.05 * sphere, "{volume}");
}

#[test]
fn blank_frames_reconstruct_to_nothing() {
    let mut recon = VolumeReconstructor::new(DELTA, 1, 20).unwrap();
    for _ in 0..3 {
        recon.add_frame(&Frame::new(16, 16));
    }
    assert_eq!(recon.layer_count(), 3);
    assert!(!recon.contains(DVec3::new(0.8, 0.8, 0.1)));
}
