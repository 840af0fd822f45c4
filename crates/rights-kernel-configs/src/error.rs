//! Error types for the reference configurations.

use rights_kernel::KernelError;
use rights_kernel_core::CoreError;
use thiserror::Error;

/// Errors raised by configuration extensions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Kernel operation failed.
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    /// Amount algebra error.
    #[error("units error: {0}")]
    Core(#[from] CoreError),

    /// The extension was used before the kernel bound it to its role object.
    #[error("{0} extension used before it was bound")]
    Unbound(&'static str),

    /// The role object behind the extension has been dropped.
    #[error("the {0} behind this extension no longer exists")]
    Released(&'static str),

    /// Unwrapping an empty right.
    #[error("nothing to unwrap: the right is empty")]
    EmptyRight,

    /// The use object's holder no longer has the item.
    #[error("right no longer held: {0}")]
    NotHeld(String),

    /// A pixel outside the canvas.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} canvas")]
    OutOfCanvas { x: u32, y: u32, width: u32, height: u32 },

    /// Colours are `#rrggbb`.
    #[error("invalid colour: {0}")]
    InvalidColor(String),

    /// The shared canvas lock was poisoned.
    #[error("canvas unavailable: {0}")]
    Canvas(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
