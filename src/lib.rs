// Brush a mask over a photo and cut it out.
//
// Pipeline per input sample:
//   brush  -> one disc dabbed onto the Stroke Surface (immediately)
//   mask   -> Stroke Surface bytes shifted so blue becomes alpha (once per refresh)
//   compositor -> mask copied into the Preview Surface, photo drawn source-in

pub mod brush;
pub mod compositor;
pub mod error;
pub mod mask;
pub mod photo;
pub mod session;
pub mod surface;
pub mod types;

pub use error::Error;
pub use photo::SourcePhoto;
pub use session::{MaskEditor, RefreshScheduler, StrokeSession, StrokeState};
pub use surface::{CompositeOp, RasterSurface, SurfacePair};
pub use types::{BrushSpec, MaskStyle, PaintMode, Rgba};
