//! Square preview rendering.
//!
//! A preview is cut from the embedded EXIF thumbnail when there is one, and
//! from the full image otherwise. The largest centered square is cropped,
//! turned upright according to the EXIF orientation and scaled to the
//! requested size, then encoded as JPEG.
//!
//! Thumbnails are assumed to be stored upright already; only the full image
//! honors the `Orientation` tag.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};

use crate::error::PreviewError;
use crate::metadata::MetadataResult;

/// Default preview edge length in pixels.
pub const DEFAULT_PREVIEW_SIZE: u32 = 100;

/// Default JPEG quality (1-100).
pub const DEFAULT_PREVIEW_QUALITY: u8 = 80;

/// Clockwise rotation in degrees, indexed by EXIF orientation.
const ORIENTATION_DEGREES: [i32; 9] = [0, 0, 0, 180, 0, 0, 90, 0, -90];

/// Rotation that makes an image with `orientation` upright.
///
/// Mirrored orientations (2, 4, 5, 7) and unknown values are left alone.
pub fn rotation_degrees(orientation: u16) -> i32 {
    ORIENTATION_DEGREES
        .get(usize::from(orientation))
        .copied()
        .unwrap_or(0)
}

/// Renders square JPEG previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewRenderer {
    width: u32,
    height: u32,
    quality: u8,
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self {
            width: DEFAULT_PREVIEW_SIZE,
            height: DEFAULT_PREVIEW_SIZE,
            quality: DEFAULT_PREVIEW_QUALITY,
        }
    }
}

impl PreviewRenderer {
    /// Create a renderer producing `width` x `height` previews.
    ///
    /// # Errors
    /// `InvalidSize` if either dimension is zero.
    pub fn new(width: u32, height: u32, quality: u8) -> Result<Self, PreviewError> {
        if width == 0 || height == 0 {
            return Err(PreviewError::InvalidSize { width, height });
        }

        Ok(Self {
            width,
            height,
            quality: quality.clamp(1, 100),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Render a preview for a file, preferring its embedded thumbnail.
    pub fn render(&self, metadata: &MetadataResult, image: &[u8]) -> Result<Bytes, PreviewError> {
        match metadata.thumbnail {
            Some(ref thumbnail) => self.render_jpeg(thumbnail, 1),
            None => self.render_jpeg(image, metadata.orientation().unwrap_or(1)),
        }
    }

    /// Render a preview from JPEG data stored with `orientation`.
    pub fn render_jpeg(&self, jpeg: &[u8], orientation: u16) -> Result<Bytes, PreviewError> {
        let img = ImageReader::with_format(Cursor::new(jpeg), ImageFormat::Jpeg)
            .decode()
            .map_err(|e| PreviewError::Decode {
                message: e.to_string(),
            })?;

        let square = center_square(&img);
        let upright = match rotation_degrees(orientation) {
            90 => square.rotate90(),
            180 => square.rotate180(),
            -90 => square.rotate270(),
            _ => square,
        };
        let preview = upright
            .resize_exact(self.width, self.height, FilterType::Triangle)
            .to_rgb8();

        let mut output = Vec::new();
        JpegEncoder::new_with_quality(&mut output, self.quality)
            .encode_image(&preview)
            .map_err(|e| PreviewError::Encode {
                message: e.to_string(),
            })?;

        Ok(Bytes::from(output))
    }
}

/// Largest square centered in the image.
fn center_square(img: &DynamicImage) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    if width > height {
        img.crop_imm((width - height) / 2, 0, height, height)
    } else {
        img.crop_imm(0, (height - width) / 2, width, width)
    }
}
