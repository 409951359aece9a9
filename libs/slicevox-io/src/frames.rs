//! Frame stacks on disk.
//!
//! A stack is a directory of 8-bit grayscale PNG images named
//! `frame_00000.png`, `frame_00001.png`, ... in Z order. Frames are read
//! back in order of the numeric index in their names, so stacks past
//! `frame_99999.png` stay ordered, and every frame must match the size of
//! the first one.

use std::path::{Path, PathBuf};

use config::constants::{frame_file_name, FRAME_FILE_EXTENSION, FRAME_FILE_PREFIX};
use image::GrayImage;
use slicevox_core::Frame;

use crate::error::{IoError, IoResult};

/// Writes `frame` as a grayscale PNG.
pub fn write_frame<P: AsRef<Path>>(frame: &Frame, path: P) -> IoResult<()> {
    let (w, h) = dimensions(frame)?;
    let image = GrayImage::from_raw(w, h, frame.pixels().to_vec())
        .ok_or_else(|| IoError::invalid_content("frame buffer does not match its size"))?;
    image.save(path.as_ref())?;
    Ok(())
}

/// Writes `frame` into `dir` as stack entry `index`, returning its path.
pub fn write_stack_frame<P: AsRef<Path>>(
    dir: P,
    index: usize,
    frame: &Frame,
) -> IoResult<PathBuf> {
    let path = dir.as_ref().join(frame_file_name(index));
    write_frame(frame, &path)?;
    log::trace!("wrote {}", path.display());
    Ok(path)
}

/// Writes frames as entries `0, 1, 2, ...` of a stack directory, creating
/// it if needed.
pub fn write_frames<'a, P, I>(dir: P, frames: I) -> IoResult<usize>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a Frame>,
{
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let mut count = 0;
    for (index, frame) in frames.into_iter().enumerate() {
        write_stack_frame(dir, index, frame)?;
        count += 1;
    }
    Ok(count)
}

/// Decodes one image into a frame. Color images are converted to luma.
pub fn read_frame<P: AsRef<Path>>(path: P) -> IoResult<Frame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let image = image::open(path)?.into_luma8();
    let (w, h) = image.dimensions();
    Ok(Frame::from_raw(w as usize, h as usize, image.into_raw())?)
}

/// Frame image paths of a stack directory, ordered by frame index.
///
/// Only `frame_<digits>.png` files count as frames.
pub fn frame_paths<P: AsRef<Path>>(dir: P) -> IoResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|e| IoError::from_open(e, dir))?;
    let mut frames = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if let Some(index) = frame_index(&path) {
            frames.push((index, path));
        }
    }
    frames.sort_by_key(|(index, _)| *index);
    Ok(frames.into_iter().map(|(_, path)| path).collect())
}

/// Stack index encoded in a frame file name.
fn frame_index(path: &Path) -> Option<usize> {
    let is_png = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(FRAME_FILE_EXTENSION));
    if !is_png {
        return None;
    }
    let digits = path.file_stem()?.to_str()?.strip_prefix(FRAME_FILE_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Streams the frames of a stack directory in order.
///
/// # Example
///
/// ```no_run
/// use slicevox_io::StackReader;
///
/// for frame in StackReader::open("frames", None).unwrap() {
///     let frame = frame.unwrap();
///     println!("{}x{}", frame.width(), frame.height());
/// }
/// ```
#[derive(Debug)]
pub struct StackReader {
    paths: std::vec::IntoIter<PathBuf>,
    size: Option<(usize, usize)>,
}

impl StackReader {
    /// Lists the frames of `dir`, keeping at most `max_frames` of them.
    ///
    /// # Errors
    ///
    /// [`IoError::EmptyStack`] when the directory holds no frames.
    pub fn open<P: AsRef<Path>>(dir: P, max_frames: Option<usize>) -> IoResult<Self> {
        let dir = dir.as_ref();
        let mut paths = frame_paths(dir)?;
        if let Some(max) = max_frames {
            paths.truncate(max);
        }
        if paths.is_empty() {
            return Err(IoError::EmptyStack {
                path: dir.to_path_buf(),
            });
        }
        log::debug!("found {} frames in {}", paths.len(), dir.display());
        Ok(Self {
            paths: paths.into_iter(),
            size: None,
        })
    }

    /// Frames not yet read.
    pub fn remaining(&self) -> usize {
        self.paths.len()
    }

    fn read_next(&mut self, path: PathBuf) -> IoResult<Frame> {
        let frame = read_frame(&path)?;
        let got = (frame.width(), frame.height());
        match self.size {
            None => self.size = Some(got),
            Some(expected) if expected != got => {
                return Err(IoError::FrameSizeMismatch {
                    path,
                    expected,
                    got,
                });
            }
            Some(_) => {}
        }
        Ok(frame)
    }
}

impl Iterator for StackReader {
    type Item = IoResult<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths.next()?;
        Some(self.read_next(path))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.paths.size_hint()
    }
}

/// Reads a whole stack directory into memory.
pub fn read_frames<P: AsRef<Path>>(dir: P, max_frames: Option<usize>) -> IoResult<Vec<Frame>> {
    StackReader::open(dir, max_frames)?.collect()
}

fn dimensions(frame: &Frame) -> IoResult<(u32, u32)> {
    let w = u32::try_from(frame.width())
        .map_err(|_| IoError::invalid_content("frame too wide for PNG"))?;
    let h = u32::try_from(frame.height())
        .map_err(|_| IoError::invalid_content("frame too tall for PNG"))?;
    Ok((w, h))
}
