// The decoded photo we cut the mask out of. Loaded once, never mutated.
use std::path::Path;

use crate::error::Error;
use crate::surface::RasterSurface;
use crate::types::Rgba;
use image::DynamicImage;
use log::info;

#[derive(Clone, Debug)]
pub struct SourcePhoto {
    pixels: RasterSurface,
}

impl SourcePhoto {
    /// Decode a photo from disk (any format the `image` crate reads).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let photo = Self::from_image(image::open(path)?)?;
        info!("loaded {} ({}x{})", path.display(), photo.width(), photo.height());
        Ok(photo)
    }

    /// Decode a photo from encoded bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_image(image::load_from_memory(bytes)?)
    }

    pub fn from_image(img: DynamicImage) -> Result<Self, Error> {
        let rgba = img.into_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self { pixels: RasterSurface::from_rgba(width, height, rgba.into_raw())? })
    }

    /// Single-color photo.
    pub fn solid(width: u32, height: u32, color: Rgba) -> Result<Self, Error> {
        Ok(Self { pixels: RasterSurface::filled(width, height, color)? })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &RasterSurface {
        &self.pixels
    }
}
