//! Device-layer contract
//!
//! The builder never talks to a GPU. Whatever owns the device implements
//! `GraphicsDevice` and consumes the builder's outputs: the immutable
//! `PipelineDescription`, the resolved `DescriptorSetTemplate` and the
//! push-constant layout.

use bytemuck::Pod;
use crate::descriptor_set::DescriptorSetTemplate;
use crate::error::{Error, Result};
use crate::handle::PipelineHandle;
use crate::pipeline::PipelineDescription;
use crate::push_constant::PushConstantSlot;

/// Default push constant budget (guaranteed minimum on Vulkan)
pub const DEFAULT_MAX_PUSH_CONSTANT_SIZE: u32 = 128;

/// Default bindless array length limit when the capability is present
pub const DEFAULT_MAX_BINDLESS_IMAGES: u32 = 4096;

/// Device capabilities the builder validates against
///
/// Capabilities are declared when the device is created and handed to the
/// builder up front; nothing is discovered lazily.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCapabilities {
    /// Dynamically-indexed (non-uniform) descriptor arrays are available
    pub bindless_image_arrays: bool,
    /// Maximum number of images in one bindless array
    pub max_bindless_images: u32,
    /// Maximum push constant bytes across all stages
    pub max_push_constant_size: u32,
}

impl DeviceCapabilities {
    /// Capabilities of a device with descriptor indexing enabled
    pub fn bindless() -> Self {
        Self {
            bindless_image_arrays: true,
            max_bindless_images: DEFAULT_MAX_BINDLESS_IMAGES,
            max_push_constant_size: DEFAULT_MAX_PUSH_CONSTANT_SIZE,
        }
    }

    /// Override the push constant limit
    pub fn with_max_push_constant_size(mut self, size: u32) -> Self {
        self.max_push_constant_size = size;
        self
    }

    /// Override the bindless array length limit
    pub fn with_max_bindless_images(mut self, count: u32) -> Self {
        self.max_bindless_images = count;
        self
    }
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self {
            bindless_image_arrays: false,
            max_bindless_images: 0,
            max_push_constant_size: DEFAULT_MAX_PUSH_CONSTANT_SIZE,
        }
    }
}

/// Device layer consuming pipeline descriptions
///
/// Implemented by backend devices (and `MockGraphicsDevice` for tests).
pub trait GraphicsDevice: Send + Sync {
    /// Capabilities to build descriptions against
    fn capabilities(&self) -> DeviceCapabilities;

    /// Materialize a compiled pipeline object from a description
    fn compile_pipeline(&mut self, description: &PipelineDescription) -> Result<PipelineHandle>;

    /// Bind a resolved descriptor set for subsequent draws
    fn bind_descriptor_set(
        &mut self,
        pipeline: PipelineHandle,
        template: &DescriptorSetTemplate,
    ) -> Result<()>;

    /// Write push constant bytes at an absolute offset
    fn push_constant(
        &mut self,
        pipeline: PipelineHandle,
        stage: crate::shader::ShaderStage,
        offset: u32,
        bytes: &[u8],
    ) -> Result<()>;
}

/// Push a typed value into a slot returned by `add_push_constant`
///
/// Resolves the slot's absolute offset from the description and checks the
/// value fits the slot before forwarding the bytes to the device.
///
/// # Example
///
/// ```ignore
/// let texture_slot = builder.add_push_constant(ShaderStage::Fragment, 4)?;
/// // ...
/// push_constant_value(&mut device, pipeline, &description, &texture_slot, &BindlessIndex(5))?;
/// ```
pub fn push_constant_value<D, T>(
    device: &mut D,
    pipeline: PipelineHandle,
    description: &PipelineDescription,
    slot: &PushConstantSlot,
    value: &T,
) -> Result<()>
where
    D: GraphicsDevice + ?Sized,
    T: Pod,
{
    let bytes = bytemuck::bytes_of(value);
    if bytes.len() as u64 > slot.size as u64 {
        crate::stellar_bail!("stellar::Device", Error::InvalidArgument(format!(
            "push constant value is {} bytes but the {:?} slot at offset {} holds {}",
            bytes.len(), slot.stage, slot.offset, slot.size)));
    }

    let offset = description.push_constant_offset(slot).ok_or_else(|| {
        crate::stellar_err!("stellar::Device", Error::InvalidArgument(format!(
            "push constant slot {:?}+{} is not part of this pipeline", slot.stage, slot.offset)))
    })?;

    device.push_constant(pipeline, slot.stage, offset, bytes)
}

#[cfg(test)]
#[path = "device_tests.rs"]
mod tests;
