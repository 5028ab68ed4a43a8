// Core value types shared by the raster pipeline.

/// One pixel in surface byte order `[R, G, B, A]`, straight alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba([0, 0, 0, 0]);
    pub const BLACK: Rgba = Rgba([0, 0, 0, 255]);
    pub const WHITE: Rgba = Rgba([255, 255, 255, 255]);

    pub fn alpha(self) -> u8 {
        self.0[3]
    }
}

/// Brush bounds applied at paint time, in pixels. The largest brush
/// builds an 800x800 stamp.
pub const MIN_DIAMETER: f32 = 1.0;
pub const MAX_DIAMETER: f32 = 500.0;
pub const MAX_BLUR_RADIUS: f32 = 100.0;

/// Current brush settings. Replaced wholesale whenever a UI control changes
/// and handed to every paint call by value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushSpec {
    pub diameter: f32,    // disc size in pixels
    pub blur_radius: f32, // edge softness; 0 = hard edge
    pub opacity: f32,     // 0.0..=1.0
}

impl Default for BrushSpec {
    fn default() -> Self {
        Self { diameter: 35.0, blur_radius: 1.0, opacity: 1.0 }
    }
}

impl BrushSpec {
    /// Build from slider positions: size in pixels, hardness and opacity in percent.
    /// Hardness 100 is a hard edge, every step below adds one pixel of blur.
    pub fn from_sliders(size: u32, hardness: u32, opacity: u32) -> Self {
        Self {
            diameter: size as f32,
            blur_radius: (100 - hardness.min(100)) as f32,
            opacity: opacity.min(100) as f32 / 100.0,
        }
    }

    /// Settings as the rasterizer sees them: diameter within
    /// `MIN_DIAMETER..=MAX_DIAMETER`, blur within `0..=MAX_BLUR_RADIUS`,
    /// opacity in [0, 1].
    /// NaN collapses to the lower bound.
    pub fn clamped(&self) -> Self {
        let diameter = if self.diameter.is_nan() {
            MIN_DIAMETER
        } else {
            self.diameter.clamp(MIN_DIAMETER, MAX_DIAMETER)
        };
        let blur_radius = if self.blur_radius.is_nan() {
            0.0
        } else {
            self.blur_radius.clamp(0.0, MAX_BLUR_RADIUS)
        };
        let opacity = if self.opacity.is_nan() { 0.0 } else { self.opacity.clamp(0.0, 1.0) };
        Self { diameter, blur_radius, opacity }
    }
}

/// Whether strokes add to the mask or take away from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PaintMode {
    #[default]
    Mark,
    Erase,
}

impl PaintMode {
    pub fn toggle(self) -> Self {
        match self {
            PaintMode::Mark => PaintMode::Erase,
            PaintMode::Erase => PaintMode::Mark,
        }
    }
}

/// Fixed colors of the Stroke Surface. After the mask transform a pixel's
/// alpha is its blue byte, so `mark` and `background` decide what shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskStyle {
    pub background: Rgba, // opaque fill after clear
    pub mark: [u8; 3],    // ink while adding
    pub erase: [u8; 3],   // ink while subtracting
}

impl MaskStyle {
    /// Painted areas reveal the photo; untouched background is fully transparent.
    pub const REVEAL: MaskStyle = MaskStyle {
        background: Rgba::BLACK,
        mark: [255, 255, 255],
        erase: [0, 0, 0],
    };

    /// White page with black ink: the photo shows everywhere except where painted.
    pub const CUT_OUT: MaskStyle = MaskStyle {
        background: Rgba::WHITE,
        mark: [0, 0, 0],
        erase: [255, 255, 255],
    };

    pub fn ink(&self, mode: PaintMode) -> [u8; 3] {
        match mode {
            PaintMode::Mark => self.mark,
            PaintMode::Erase => self.erase,
        }
    }
}

impl Default for MaskStyle {
    fn default() -> Self {
        MaskStyle::REVEAL
    }
}

/// Precomputed disc we dab onto the Stroke Surface.
/// Cells cover pixel offsets `-extent..extent` on both axes around the center.
#[derive(Clone, Debug)]
pub struct Stamp {
    pub extent: i32,      // half side length in pixels
    pub fill: Vec<f32>,   // (2*extent)^2 hard-disc coverage, 0 or 1
    pub shadow: Vec<f32>, // same layout, blurred coverage in [0, 1]
}

impl Stamp {
    pub fn side(&self) -> i32 {
        2 * self.extent
    }
}
