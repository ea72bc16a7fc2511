//! Episode animation export.
//!
//! Frames are written as a looping GIF named `{prefix}{episode}.gif`. The
//! `dpi` argument scales frames relative to 72 dpi, so `dpi = 72` keeps the
//! rendered pixel size and `dpi = 144` doubles it.

use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::{self, FilterType};
use image::{Delay, DynamicImage, Frame, RgbImage};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Resolution at which frames are exported unscaled.
pub const BASE_DPI: u32 = 72;

const GIF_MAX_EDGE: u64 = u16::MAX as u64;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no frames to export")]
    NoFrames,
    #[error("fps must be positive")]
    InvalidFps,
    #[error("dpi must be positive")]
    InvalidDpi,
    #[error("frame {index} is {actual:?}, expected {expected:?} like frame 0")]
    FrameSizeMismatch {
        index: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("scaled frame size {width}x{height} is outside GIF limits")]
    UnsupportedFrameSize { width: u64, height: u64 },
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("GIF encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Output path for an episode: `dir/{prefix}{episode}.gif`.
pub fn gif_path(dir: &Path, prefix: &str, episode: usize) -> PathBuf {
    dir.join(format!("{prefix}{episode}.gif"))
}

fn scaled_size(width: u32, height: u32, dpi: u32) -> Result<(u32, u32), ExportError> {
    let scale = |v: u32| (u64::from(v) * u64::from(dpi) + u64::from(BASE_DPI) / 2) / u64::from(BASE_DPI);
    let (w, h) = (scale(width), scale(height));
    if w == 0 || h == 0 || w > GIF_MAX_EDGE || h > GIF_MAX_EDGE {
        return Err(ExportError::UnsupportedFrameSize {
            width: w,
            height: h,
        });
    }
    Ok((w as u32, h as u32))
}

/// Encodes `frames` in order as an endlessly looping GIF into `writer`.
///
/// Output depends only on the arguments, so identical inputs give identical bytes.
pub fn encode_gif<W: Write>(
    frames: &[RgbImage],
    fps: u32,
    dpi: u32,
    writer: W,
) -> Result<(), ExportError> {
    let first = frames.first().ok_or(ExportError::NoFrames)?;
    if fps == 0 {
        return Err(ExportError::InvalidFps);
    }
    if dpi == 0 {
        return Err(ExportError::InvalidDpi);
    }
    let expected = first.dimensions();
    if let Some((index, frame)) = frames
        .iter()
        .enumerate()
        .find(|(_, f)| f.dimensions() != expected)
    {
        return Err(ExportError::FrameSizeMismatch {
            index,
            expected,
            actual: frame.dimensions(),
        });
    }
    let (width, height) = scaled_size(expected.0, expected.1, dpi)?;
    let delay = Delay::from_numer_denom_ms(1000, fps);

    let mut encoder = GifEncoder::new(writer);
    encoder.set_repeat(Repeat::Infinite)?;
    encoder.encode_frames(frames.iter().map(|frame| {
        let frame = if (width, height) == expected {
            frame.clone()
        } else {
            imageops::resize(frame, width, height, FilterType::Nearest)
        };
        Frame::from_parts(DynamicImage::ImageRgb8(frame).into_rgba8(), 0, 0, delay)
    }))?;
    Ok(())
}

/// Writes `frames` to `dir/{prefix}{episode}.gif`, creating `dir` if needed.
pub fn save_frames_as_gif(
    frames: &[RgbImage],
    dir: &Path,
    prefix: &str,
    episode: usize,
    fps: u32,
    dpi: u32,
) -> Result<PathBuf, ExportError> {
    let path = gif_path(dir, prefix, episode);
    let io_err = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };
    if frames.is_empty() {
        return Err(ExportError::NoFrames);
    }
    std::fs::create_dir_all(dir).map_err(io_err)?;
    let mut writer = BufWriter::new(File::create(&path).map_err(io_err)?);
    encode_gif(frames, fps, dpi, &mut writer)?;
    writer.flush().map_err(io_err)?;

    info!(
        path = %path.display(),
        frames = frames.len(),
        fps,
        "Saved episode animation"
    );
    Ok(path)
}
