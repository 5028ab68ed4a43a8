// One error type for the whole crate.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Surface size overflowed or the buffer could not be reserved.
    #[error("cannot allocate a {width}x{height} surface")]
    Allocation { width: u32, height: u32 },

    /// Two buffers that must share dimensions did not.
    #[error("{op}: size mismatch, expected {expected:?} got {actual:?}")]
    DimensionMismatch {
        op: &'static str,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Raw pixel bytes did not match width * height * 4.
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferLength { expected: usize, actual: usize },

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("window init error: {0}")]
    WindowInit(String),

    #[error("window update error: {0}")]
    WindowUpdate(String),
}
