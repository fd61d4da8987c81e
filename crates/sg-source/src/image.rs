use std::path::Path;

use anyhow::{Context, Result};
use sg_core::error::CoreError;
use sg_core::frame::FrameBuffer;

/// Charge une image depuis le disque en RGBA8.
///
/// # Errors
/// Returns an error if the file is missing or is not a decodable image.
///
/// # Example
/// ```no_run
/// use sg_source::image::load_image;
/// use std::path::Path;
/// let frame = load_image(Path::new("photo.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<FrameBuffer> {
    if !path.exists() {
        return Err(CoreError::FileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    let img = image::open(path).with_context(|| format!("cannot load {}", path.display()))?;
    let frame = into_frame(&img);
    log::info!(
        "loaded {} ({}x{})",
        path.display(),
        frame.width,
        frame.height
    );
    Ok(frame)
}

/// Décode des octets d'image encodée (upload) en RGBA8.
///
/// # Errors
/// Returns an error if the bytes are not a supported image format.
///
/// # Example
/// ```
/// use sg_source::image::decode_image;
/// assert!(decode_image(b"not an image").is_err());
/// ```
pub fn decode_image(bytes: &[u8]) -> Result<FrameBuffer> {
    let img = image::load_from_memory(bytes).context("input is not a supported image")?;
    Ok(into_frame(&img))
}

fn into_frame(img: &image::DynamicImage) -> FrameBuffer {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    FrameBuffer {
        data: rgba.into_raw(),
        width,
        height,
    }
}
