//! Error types for the Stellar pipeline builder
//!
//! Every error is detected synchronously at the call that violates a
//! precondition. Nothing is deferred to `build()` except the two
//! completeness checks (`MissingFramebuffer`, `MissingRequiredShaderStage`).

use std::fmt;
use crate::binding_table::DescriptorKind;
use crate::shader::ShaderStage;

/// Result type for Stellar operations
pub type Result<T> = std::result::Result<T, Error>;

/// Stellar errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Vertex element tag or id that does not map to a known element kind
    UnsupportedVertexElement(String),

    /// Binding slot reused with an incompatible descriptor
    DuplicateBindingSlot {
        slot: u32,
        existing: DescriptorKind,
        requested: DescriptorKind,
    },

    /// Bindless image arrays requested without the device capability
    BindlessUnsupported,

    /// Bindless image array with no images
    EmptyBindlessArray { slot: u32 },

    /// Bindless image array longer than the device limit
    BindlessArrayTooLarge { slot: u32, count: usize, limit: u32 },

    /// Per-draw bindless index outside of the array bounds
    BindlessIndexOutOfRange { slot: u32, index: u32, len: usize },

    /// Neither a vertex nor a fragment stage was provided
    MissingRequiredShaderStage,

    /// No framebuffer / render target layout was set
    MissingFramebuffer,

    /// Push constant bytes would exceed the device limit
    PushConstantRangeOverflow {
        stage: ShaderStage,
        requested: u32,
        used: u32,
        limit: u32,
    },

    /// Invalid argument passed to a builder or device call
    InvalidArgument(String),

    /// Device-layer error
    BackendError(String),

    /// Unknown or stale resource handle
    InvalidResource(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedVertexElement(tag) => write!(f, "Unsupported vertex element: {}", tag),
            Error::DuplicateBindingSlot { slot, existing, requested } => write!(
                f,
                "Duplicate binding slot {}: already holds {:?}, requested {:?}",
                slot, existing, requested
            ),
            Error::BindlessUnsupported => write!(f, "Bindless image arrays are not supported by this device"),
            Error::EmptyBindlessArray { slot } => write!(f, "Bindless image array at slot {} is empty", slot),
            Error::BindlessArrayTooLarge { slot, count, limit } => write!(
                f,
                "Bindless image array at slot {} holds {} images (limit {})",
                slot, count, limit
            ),
            Error::BindlessIndexOutOfRange { slot, index, len } => write!(
                f,
                "Bindless index {} out of range for slot {} ({} images)",
                index, slot, len
            ),
            Error::MissingRequiredShaderStage => write!(f, "Missing required shader stage (vertex or fragment)"),
            Error::MissingFramebuffer => write!(f, "Missing framebuffer"),
            Error::PushConstantRangeOverflow { stage, requested, used, limit } => write!(
                f,
                "Push constant range overflow for {:?} stage: {} bytes requested, {} used, limit {}",
                stage, requested, used, limit
            ),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
