//! Opaque resource handles issued by the device layer.
//!
//! Handles are referenced by pipeline descriptions, never owned. Their
//! lifetime is managed by the device and must outlive every command buffer
//! recorded against a description that references them.

use slotmap::new_key_type;

new_key_type! {
    /// GPU buffer (uniform, vertex, index...)
    pub struct BufferHandle;

    /// GPU image (sampled texture)
    pub struct ImageHandle;

    /// Texture sampler
    pub struct SamplerHandle;

    /// Render target / framebuffer layout a pipeline renders into
    pub struct FramebufferHandle;

    /// Compiled pipeline object returned by `GraphicsDevice::compile_pipeline`
    pub struct PipelineHandle;
}
