// Raster surfaces and the Stroke/Preview pair.
// Pixels are stored as bytes `[R, G, B, A]`, straight alpha, row-major.

use crate::error::Error;
use crate::types::Rgba;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use log::{debug, info};

/// How incoming pixels combine with what is already on the surface.
/// Passed to every draw call; surfaces never remember an operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeOp {
    /// Replace destination bytes verbatim.
    Copy,
    /// Paint over existing content using the source alpha.
    SourceOver,
    /// Keep the source only where the destination is opaque; alphas multiply.
    SourceIn,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    data: Vec<u8>, // width * height * 4
}

impl RasterSurface {
    /// Fully transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self, Error> {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Result<Self, Error> {
        let data = alloc_pixels(width, height, color)?;
        Ok(Self { width, height, data })
    }

    /// Wrap existing RGBA bytes; the length must be exactly `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, Error> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(Error::BufferLength { expected, actual: data.len() });
        }
        Ok(Self { width, height, data })
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

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[i..i + 4]);
        Some(Rgba(px))
    }

    pub fn fill(&mut self, color: Rgba) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&color.0);
        }
    }

    /// Nearest valid pixel for a pointer position, plus whether it had to move.
    /// An empty surface maps everything to the origin.
    pub fn clamp_point(&self, x: f32, y: f32) -> ((i32, i32), bool) {
        let clamp_axis = |v: f32, len: u32| -> (i32, bool) {
            let max = len.saturating_sub(1) as f32;
            let v = if v.is_nan() { 0.0 } else { v.floor() };
            let c = v.clamp(0.0, max);
            (c as i32, c != v)
        };
        let (cx, moved_x) = clamp_axis(x, self.width);
        let (cy, moved_y) = clamp_axis(y, self.height);
        ((cx, cy), moved_x || moved_y)
    }

    /// Blend one straight-alpha color into pixel `(x, y)` with source-over.
    /// Out-of-bounds coordinates are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, rgb: [u8; 3], alpha: f32) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        source_over(&mut self.data[i..i + 4], rgb, alpha);
    }

    /// Draw `src` over the whole surface at the origin with the given operator.
    pub fn draw(&mut self, src: &RasterSurface, op: CompositeOp) -> Result<(), Error> {
        if src.dimensions() != self.dimensions() {
            return Err(Error::DimensionMismatch {
                op: "draw",
                expected: self.dimensions(),
                actual: src.dimensions(),
            });
        }
        match op {
            CompositeOp::Copy => self.data.copy_from_slice(&src.data),
            CompositeOp::SourceOver => {
                for (d, s) in self.data.chunks_exact_mut(4).zip(src.data.chunks_exact(4)) {
                    source_over(d, [s[0], s[1], s[2]], s[3] as f32 / 255.0);
                }
            }
            CompositeOp::SourceIn => {
                for (d, s) in self.data.chunks_exact_mut(4).zip(src.data.chunks_exact(4)) {
                    source_in(d, s);
                }
            }
        }
        Ok(())
    }

    /// Encode the current pixels as PNG bytes. Does not touch the surface.
    pub fn encode_png(&self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        PngEncoder::new(&mut out).write_image(
            &self.data,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(out)
    }
}

fn byte_len(width: u32, height: u32) -> Result<usize, Error> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or(Error::Allocation { width, height })
}

fn alloc_pixels(width: u32, height: u32, color: Rgba) -> Result<Vec<u8>, Error> {
    let len = byte_len(width, height)?;
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| Error::Allocation { width, height })?;
    for _ in 0..len / 4 {
        data.extend_from_slice(&color.0);
    }
    Ok(data)
}

/// Straight-alpha source-over of one color into one destination pixel.
#[inline]
fn source_over(dst: &mut [u8], rgb: [u8; 3], alpha: f32) {
    let sa = alpha.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let keep = da * (1.0 - sa);
    let out_a = sa + keep;
    for c in 0..3 {
        let v = (rgb[c] as f32 * sa + dst[c] as f32 * keep) / out_a;
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Source-in: source color, alpha = source alpha * destination alpha.
#[inline]
fn source_in(dst: &mut [u8], src: &[u8]) {
    let a = (src[3] as u32 * dst[3] as u32 + 127) / 255;
    if a == 0 {
        dst.copy_from_slice(&[0, 0, 0, 0]);
        return;
    }
    dst[..3].copy_from_slice(&src[..3]);
    dst[3] = a as u8;
}

/// The Stroke Surface (where strokes accumulate) and the Preview Surface
/// (live masked result). Both always have the same size.
#[derive(Clone, Debug)]
pub struct SurfacePair {
    stroke: RasterSurface,
    preview: RasterSurface,
    background: Rgba,
}

impl SurfacePair {
    /// New pair in the cleared state.
    pub fn new(width: u32, height: u32, background: Rgba) -> Result<Self, Error> {
        Ok(Self {
            stroke: RasterSurface::filled(width, height, background)?,
            preview: RasterSurface::new(width, height)?,
            background,
        })
    }

    /// Reallocate both surfaces, discarding their contents. Both buffers are
    /// allocated before either is replaced, so on error the old pair stays.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        let stroke = RasterSurface::filled(width, height, self.background)?;
        let preview = RasterSurface::new(width, height)?;
        self.stroke = stroke;
        self.preview = preview;
        info!("surfaces resized to {width}x{height}");
        Ok(())
    }

    /// Stroke Surface back to the opaque background, Preview Surface to transparent.
    pub fn clear(&mut self) {
        self.stroke.fill(self.background);
        self.preview.fill(Rgba::TRANSPARENT);
        debug!("surfaces cleared");
    }

    /// Change the stroke background and clear.
    pub fn set_background(&mut self, background: Rgba) {
        self.background = background;
        self.clear();
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.stroke.dimensions()
    }

    pub fn stroke(&self) -> &RasterSurface {
        &self.stroke
    }

    pub fn preview(&self) -> &RasterSurface {
        &self.preview
    }

    pub(crate) fn stroke_mut(&mut self) -> &mut RasterSurface {
        &mut self.stroke
    }

    pub(crate) fn preview_mut(&mut self) -> &mut RasterSurface {
        &mut self.preview
    }
}
