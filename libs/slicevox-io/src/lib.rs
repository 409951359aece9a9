//! # slicevox IO
//!
//! Filesystem formats for the slicevox pipeline.
//!
//! ## Formats
//!
//! | Data          | Format                                  |
//! |---------------|-----------------------------------------|
//! | Meshes        | STL (ASCII or binary in, binary out)    |
//! | Frame stacks  | Directory of `frame_NNNNN.png`          |
//! | Stack info    | `stack.json` in the stack directory     |
//!
//! ## Usage
//!
//! ```no_run
//! use slicevox_io::{load_stl, read_frames, save_stl, write_frames};
//!
//! let mesh = load_stl("part.stl").unwrap();
//! save_stl(&mesh, "copy.stl").unwrap();
//!
//! let frames = read_frames("stack", None).unwrap();
//! write_frames("stack-copy", &frames).unwrap();
//! ```

pub mod error;
pub mod frames;
pub mod stack;
pub mod stl;

pub use error::{IoError, IoResult};
pub use frames::{
    frame_paths, read_frame, read_frames, write_frame, write_frames, write_stack_frame,
    StackReader,
};
pub use stack::StackInfo;
pub use stl::{load_stl, parse_stl, save_stl, write_stl};
