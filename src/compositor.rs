// Compositor: lay the mask onto the Preview Surface, then clip the photo to it.
use crate::error::Error;
use crate::photo::SourcePhoto;
use crate::surface::{CompositeOp, RasterSurface};

/// Render the live preview.
///
/// 1. The mask replaces the preview verbatim (this is the alpha shape).
/// 2. The photo is drawn at the origin with source-in, so only its pixels
///    under non-transparent mask survive, with alpha = photo alpha * mask alpha.
///
/// Without a photo only step 1 runs and the preview shows the raw mask.
pub fn render_preview(
    preview: &mut RasterSurface,
    mask: &RasterSurface,
    photo: Option<&SourcePhoto>,
) -> Result<(), Error> {
    preview.draw(mask, CompositeOp::Copy)?;
    if let Some(photo) = photo {
        preview.draw(photo.pixels(), CompositeOp::SourceIn)?;
    }
    Ok(())
}
