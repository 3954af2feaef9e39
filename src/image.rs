//! Template image decoding.
//!
//! Decoding sits behind [`ImageLoader`] so tests and embedders can supply
//! their own source of pixels. [`PngLoader`] is the filesystem default.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

use crate::error::ImageLoadFailure;

/// A decoded image, normalized to 8-bit RGBA.
#[derive(Clone, PartialEq, Eq)]
pub struct TemplateImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TemplateImage {
    /// `pixels` must hold `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageLoadFailure> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| format!("RGBA buffer for {width}x{height} exceeds addressable memory"))?;
        if pixels.len() != expected {
            return Err(format!(
                "RGBA buffer for {width}x{height} needs {expected} bytes, got {}",
                pixels.len()
            )
            .into());
        }
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA of the pixel at (x, y), if inside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.pixels[offset..offset + 4];
        Some([px[0], px[1], px[2], px[3]])
    }
}

// Pixel buffers are too large to be useful in debug output.
impl fmt::Debug for TemplateImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Source of decoded template images.
pub trait ImageLoader {
    fn load(&self, path: &Path) -> Result<TemplateImage, ImageLoadFailure>;
}

/// Decodes PNG files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngLoader;

impl ImageLoader for PngLoader {
    fn load(&self, path: &Path) -> Result<TemplateImage, ImageLoadFailure> {
        // The file handle lives only as long as the decoder in this scope.
        let file = File::open(path)?;
        let mut decoder = png::Decoder::new(BufReader::new(file));
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

        let mut reader = decoder.read_info()?;
        let size = reader
            .output_buffer_size()
            .ok_or("PNG dimensions exceed addressable memory")?;
        let mut buf = vec![0; size];
        let info = reader.next_frame(&mut buf)?;
        let data = &buf[..info.buffer_size()];

        let pixels = match info.color_type {
            png::ColorType::Rgba => data.to_vec(),
            png::ColorType::Rgb => {
                let mut rgba = Vec::with_capacity(data.len() / 3 * 4);
                for chunk in data.chunks_exact(3) {
                    rgba.extend_from_slice(chunk);
                    rgba.push(0xFF);
                }
                rgba
            }
            png::ColorType::Grayscale => data.iter().flat_map(|&g| [g, g, g, 0xFF]).collect(),
            png::ColorType::GrayscaleAlpha => data
                .chunks_exact(2)
                .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
                .collect(),
            other => {
                return Err(format!("unsupported PNG color type {other:?} after expansion").into())
            }
        };

        debug!(path = %path.display(), width = info.width, height = info.height, "Decoded template image");
        TemplateImage::new(info.width, info.height, pixels)
    }
}
