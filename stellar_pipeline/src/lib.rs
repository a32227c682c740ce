/*!
# Stellar Pipeline

Graphics pipeline description builder with bindless resource support.

The builder accumulates everything a GPU pipeline needs before it is
compiled, validates it against the device capabilities and produces an
immutable description. No GPU work happens here: a backend implementing
`GraphicsDevice` consumes the description.

## Architecture

- **PipelineDescriptionBuilder**: Fixed-function state, shader stages, vertex
  layout, resource bindings and push constants
- **VertexLayoutCalculator**: Locations and offsets of vertex attributes
- **ResourceBindingTable**: Descriptor slots, including bindless image arrays
- **PushConstantAllocator**: Non-overlapping per-stage push constant ranges
- **DescriptorSetTemplate**: Resolved descriptor set bound per draw batch
- **GraphicsDevice**: Device-layer contract (`MockGraphicsDevice` in memory)
*/

// Internal modules
mod binding_table;
mod bindless;
mod descriptor_set;
mod device;
mod error;
mod handle;
mod pipeline;
mod push_constant;
mod shader;
mod vertex;
pub mod log;
pub mod mock_graphics_device;

// Main stellar namespace module
pub mod stellar {
    // Error types
    pub use crate::error::{Error, Result};

    // Opaque resource handles
    pub use crate::handle::{
        BufferHandle, FramebufferHandle, ImageHandle, PipelineHandle, SamplerHandle,
    };

    // Shader stages
    pub use crate::shader::{ShaderBytecode, ShaderStage, ShaderStageFlags};

    // Pipeline builder and description
    pub use crate::pipeline::{
        CullMode, FillMode, FrontFace, MultisampleState, PipelineDescription,
        PipelineDescriptionBuilder, PrimitiveTopology, RasterizationState, SampleCount,
    };

    // Resources
    pub use crate::binding_table::{
        DescriptorKind, ResourceBinding, ResourceBindingTable, ResourceDescriptor,
    };
    pub use crate::bindless::{BindlessImageArray, BindlessIndex};
    pub use crate::descriptor_set::{BindingSlotDesc, DescriptorSetTemplate};
    pub use crate::push_constant::{PushConstantAllocator, PushConstantRange, PushConstantSlot};

    // Device layer
    pub use crate::device::{
        push_constant_value, DeviceCapabilities, GraphicsDevice,
        DEFAULT_MAX_BINDLESS_IMAGES, DEFAULT_MAX_PUSH_CONSTANT_SIZE,
    };
    pub use crate::mock_graphics_device::{MockBuffer, MockGraphicsDevice, MockImage, MockPipeline};

    // Vertex sub-module
    pub mod vertex {
        pub use crate::vertex::*;
    }

    // Logging sub-module (types and functions; macros live at the crate root)
    pub mod log {
        pub use crate::log::{
            log, log_detailed, reset_logger, set_logger, DefaultLogger, LogEntry, LogSeverity,
            Logger,
        };
    }
}

// Re-export math library at crate root
pub use glam;
