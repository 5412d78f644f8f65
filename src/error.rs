use std::path::PathBuf;

use rug::Integer;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FeError>;

/// Crate-wide error type.
///
/// The crypto and tensor layers return structured failures; the pipeline
/// wraps them with window/channel context via [`FeError::Window`].
#[derive(Error, Debug)]
pub enum FeError {
    #[error("unknown kernel: {0}")]
    UnknownKernel(String),

    #[error("unsupported size {size} for kernel {kernel}")]
    UnsupportedKernelSize { kernel: &'static str, size: usize },

    #[error("index {idx} out of range: 0 - {max}")]
    IndexOutOfRange { idx: usize, max: usize },

    #[error("kernel offset must be 1 or 2, got {0}")]
    InvalidKernelOffset(usize),

    #[error("unsupported key length: {0} bits")]
    UnsupportedKeyLength(u32),

    #[error("sub-tensor out of bounds at ({row}, {col})")]
    WindowOutOfBounds { row: usize, col: usize },

    #[error("expected {expected} tiles for a {k}x{k} merge, got {got}")]
    TileCountMismatch { expected: usize, got: usize, k: usize },

    #[error("vector length {got} does not match the scheme length {expected}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("vector entry at index {idx} is not smaller than the scheme bound")]
    EntryOutOfBound { idx: usize },

    #[error("no safe prime of {bits} bits found within the retry budget")]
    SafePrimeGeneration { bits: u32 },

    #[error("invalid group parameters: {0}")]
    InvalidParams(String),

    #[error("discrete logarithm not found within bound {bound}")]
    BoundExhausted { bound: Integer },

    #[error("precomputation table needs at least 2 bits, got {0}")]
    PrecomputeTooSmall(u32),

    #[error("modular inverse does not exist")]
    NoInverse,

    #[error("malformed integer literal: {0}")]
    MalformedNumber(String),

    #[error("{channel} channel window at ({row}, {col}): {source}")]
    Window {
        channel: char,
        row: usize,
        col: usize,
        #[source]
        source: Box<FeError>,
    },

    #[error("empty image: {}", .0.display())]
    EmptyImage(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
