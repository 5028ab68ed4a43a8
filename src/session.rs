// Stroke session controller.
//
// Samples paint immediately while a stroke is active; the mask transform and
// compositing run at most once per display refresh, always against the
// current Stroke Surface.

use crate::brush::{dab_stamp, make_disc_stamp};
use crate::compositor::render_preview;
use crate::error::Error;
use crate::mask::derive_mask_into;
use crate::photo::SourcePhoto;
use crate::surface::{RasterSurface, SurfacePair};
use crate::types::{BrushSpec, MaskStyle, PaintMode, Stamp};
use log::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    Active,
}

/// Idle/Active gate in front of the rasterizer.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrokeSession {
    state: StrokeState,
}

impl StrokeSession {
    /// Idle -> Active. Returns false if a stroke was already running.
    pub fn begin(&mut self) -> bool {
        let started = self.state == StrokeState::Idle;
        self.state = StrokeState::Active;
        started
    }

    /// Active -> Idle. Returns false if no stroke was running.
    pub fn end(&mut self) -> bool {
        let ended = self.state == StrokeState::Active;
        self.state = StrokeState::Idle;
        ended
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == StrokeState::Active
    }
}

/// Coalesces refresh requests: at most one pass is ever pending.
#[derive(Clone, Copy, Debug, Default)]
pub struct RefreshScheduler {
    pending: bool,
}

impl RefreshScheduler {
    /// Ask for a pass. Returns true only if none was pending yet.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    /// Consume the pending request, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Owns the surfaces, the photo and the stroke state; drives
/// rasterizer -> mask transform -> compositor.
pub struct MaskEditor {
    surfaces: SurfacePair,
    mask: RasterSurface, // reused destination of the mask transform
    photo: Option<SourcePhoto>,
    style: MaskStyle,
    session: StrokeSession,
    scheduler: RefreshScheduler,
    stamp: Option<(BrushSpec, Stamp)>,
    passes: u64,
}

impl MaskEditor {
    /// Editor with cleared surfaces and no photo.
    pub fn new(width: u32, height: u32, style: MaskStyle) -> Result<Self, Error> {
        Ok(Self {
            surfaces: SurfacePair::new(width, height, style.background)?,
            mask: RasterSurface::new(width, height)?,
            photo: None,
            style,
            session: StrokeSession::default(),
            scheduler: RefreshScheduler::default(),
            stamp: None,
            passes: 0,
        })
    }

    /// Make `photo` the current source: surfaces take its size and are cleared.
    /// On allocation failure nothing changes and the previous photo stays.
    pub fn load_photo(&mut self, photo: SourcePhoto) -> Result<(), Error> {
        let (w, h) = photo.dimensions();
        if self.surfaces.dimensions() == (w, h) {
            self.surfaces.clear();
        } else {
            let mask = RasterSurface::new(w, h)?;
            self.surfaces.resize(w, h)?;
            self.mask = mask;
        }
        self.session.end();
        self.photo = Some(photo);
        self.scheduler.request();
        info!("photo set, surfaces {w}x{h}");
        Ok(())
    }

    pub fn begin(&mut self) {
        if self.session.begin() {
            debug!("stroke begin");
        }
    }

    pub fn end(&mut self) {
        if self.session.end() {
            debug!("stroke end");
        }
    }

    /// Paint one disc at the pointer position if a stroke is active.
    /// Points outside the surface are clamped to the nearest pixel.
    /// Returns whether anything was painted.
    pub fn sample(&mut self, x: f32, y: f32, brush: &BrushSpec, mode: PaintMode) -> bool {
        if !self.session.is_active() {
            return false;
        }
        let brush = brush.clamped();
        let ((cx, cy), clamped) = self.surfaces.stroke().clamp_point(x, y);
        if clamped {
            warn!("sample ({x}, {y}) outside surface, clamped to ({cx}, {cy})");
        }

        if self.stamp.as_ref().is_some_and(|(spec, _)| *spec != brush) {
            self.stamp = None;
        }
        let (_, stamp) = self.stamp.get_or_insert_with(|| (brush, make_disc_stamp(&brush)));
        dab_stamp(self.surfaces.stroke_mut(), cx, cy, stamp, self.style.ink(mode), brush.opacity);
        self.scheduler.request();
        true
    }

    /// A click is a whole stroke made of a single sample.
    pub fn click(&mut self, x: f32, y: f32, brush: &BrushSpec, mode: PaintMode) -> bool {
        self.begin();
        let painted = self.sample(x, y, brush, mode);
        self.end();
        painted
    }

    /// Display-refresh callback. Runs the pending transform + composite pass,
    /// if any, and reports whether it ran.
    pub fn refresh(&mut self) -> Result<bool, Error> {
        if !self.scheduler.take() {
            return Ok(false);
        }
        derive_mask_into(self.surfaces.stroke(), &mut self.mask)?;
        render_preview(self.surfaces.preview_mut(), &self.mask, self.photo.as_ref())?;
        self.passes += 1;
        debug!("refresh pass {}", self.passes);
        Ok(true)
    }

    /// Wipe the mask; the preview follows on the next refresh.
    pub fn clear(&mut self) {
        self.surfaces.clear();
        self.scheduler.request();
    }

    /// Switch stroke colors. The current mask is discarded.
    pub fn set_style(&mut self, style: MaskStyle) {
        self.style = style;
        self.surfaces.set_background(style.background);
        self.scheduler.request();
        info!("mask style changed, surfaces cleared");
    }

    /// PNG of the masked cut-out (Preview Surface).
    pub fn export_preview_png(&self) -> Result<Vec<u8>, Error> {
        self.surfaces.preview().encode_png()
    }

    /// PNG of the raw painted mask (Stroke Surface).
    pub fn export_mask_png(&self) -> Result<Vec<u8>, Error> {
        self.surfaces.stroke().encode_png()
    }

    pub fn surfaces(&self) -> &SurfacePair {
        &self.surfaces
    }

    pub fn photo(&self) -> Option<&SourcePhoto> {
        self.photo.as_ref()
    }

    pub fn style(&self) -> MaskStyle {
        self.style
    }

    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    pub fn refresh_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Completed refresh passes since creation.
    pub fn passes(&self) -> u64 {
        self.passes
    }
}
