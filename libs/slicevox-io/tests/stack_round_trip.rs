//! Filesystem round trips through the public API.

use glam::DVec3;
use slicevox_core::{Frame, SliceEngine};
use slicevox_io::{
    load_stl, read_frames, save_stl, write_frames, write_stack_frame, IoError, StackInfo,
    StackReader,
};
use slicevox_mesh::primitives::create_sphere;

#[test]
fn sliced_frames_survive_png() {
    let mesh = create_sphere(DVec3::ZERO, 1.0, 24).unwrap();
    let engine = SliceEngine::new(&mesh, 0.1).unwrap();
    let frames: Vec<Frame> = (0..engine.num_frames())
        .map(|i| engine.slice(i).unwrap())
        .collect();

    let dir = tempfile::tempdir().unwrap();
    assert_eq!(write_frames(dir.path(), &frames).unwrap(), frames.len());
    assert_eq!(read_frames(dir.path(), None).unwrap(), frames);

    let limited = read_frames(dir.path(), Some(3)).unwrap();
    assert_eq!(limited.len(), 3);
    assert_eq!(limited[..], frames[..3]);
}

#[test]
fn stl_file_round_trip() {
    let mesh = create_sphere(DVec3::new(1.0, 2.0, 3.0), 0.5, 12).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sphere.stl");
    save_stl(&mesh, &path).unwrap();

    let loaded = load_stl(&path).unwrap();
    assert_eq!(loaded.triangle_count(), mesh.triangle_count());
    let (a, b) = (loaded.bounding_box(), mesh.bounding_box());
    assert!((a.min - b.min).abs().max_element() < 1e-6);
    assert!((a.max - b.max).abs().max_element() < 1e-6);
}

#[test]
fn missing_stl_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_stl(dir.path().join("absent.stl")),
        Err(IoError::FileNotFound { .. })
    ));
}

#[test]
fn empty_directory_is_an_empty_stack() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        read_frames(dir.path(), None),
        Err(IoError::EmptyStack { .. })
    ));
}

#[test]
fn mismatched_frame_sizes_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_stack_frame(dir.path(), 0, &Frame::new(4, 4)).unwrap();
    write_stack_frame(dir.path(), 1, &Frame::new(4, 6)).unwrap();

    let mut reader = StackReader::open(dir.path(), None).unwrap();
    assert_eq!(reader.remaining(), 2);
    assert!(reader.next().unwrap().is_ok());
    match reader.next().unwrap() {
        Err(IoError::FrameSizeMismatch { expected, got, .. }) => {
            assert_eq!(expected, (4, 4));
            assert_eq!(got, (4, 6));
        }
        other => panic!("expected size mismatch, got {other:?}"),
    }
    assert!(reader.next().is_none());
}

#[test]
fn stack_info_lives_beside_frames() {
    let dir = tempfile::tempdir().unwrap();
    write_frames(dir.path(), &[Frame::new(2, 2)]).unwrap();
    StackInfo::new(0.5, 1, 2, 2, 1, DVec3::ZERO).save(dir.path()).unwrap();

    // The sidecar is not mistaken for a frame.
    assert_eq!(read_frames(dir.path(), None).unwrap().len(), 1);
    assert_eq!(StackInfo::load(dir.path()).unwrap().frames, 1);
}
