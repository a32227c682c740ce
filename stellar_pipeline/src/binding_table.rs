//! Resource binding table
//!
//! Ordered collection of the GPU-visible resources a pipeline consumes at
//! draw time, one descriptor per binding slot.
//!
//! Slot policy:
//! - an empty slot takes the new descriptor
//! - a slot holding a different descriptor kind is a `DuplicateBindingSlot`
//! - same kind and same stage mask: the resource reference is replaced
//!   (per-frame uniform buffers are rebound this way)
//! - same kind, different stage mask, same resource: visibility is merged
//! - same kind, different stage mask, different resource: `DuplicateBindingSlot`

use std::collections::BTreeMap;
use crate::bindless::BindlessImageArray;
use crate::device::DeviceCapabilities;
use crate::error::{Error, Result};
use crate::handle::{BufferHandle, ImageHandle, SamplerHandle};
use crate::shader::ShaderStageFlags;

const SOURCE: &str = "stellar::BindingTable";

/// Type of resource bound at a given slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    /// Uniform buffer (read-only structured data)
    UniformBuffer,
    /// Combined image sampler (texture + sampler in one binding)
    CombinedImageSampler,
    /// Standalone sampler
    Sampler,
    /// Variable-length, dynamically-indexed image array
    BindlessImageArray,
}

/// A concrete resource bound at one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceDescriptor {
    /// Uniform buffer binding starting at `offset` bytes
    UniformBuffer { buffer: BufferHandle, offset: u64 },
    /// Sampled image with its sampler
    CombinedImageSampler { image: ImageHandle, sampler: SamplerHandle },
    /// Sampler shared by separately bound images
    Sampler { sampler: SamplerHandle },
    /// Bindless image array
    BindlessImageArray(BindlessImageArray),
}

impl ResourceDescriptor {
    /// Descriptor kind of this resource
    pub fn kind(&self) -> DescriptorKind {
        match self {
            ResourceDescriptor::UniformBuffer { .. } => DescriptorKind::UniformBuffer,
            ResourceDescriptor::CombinedImageSampler { .. } => DescriptorKind::CombinedImageSampler,
            ResourceDescriptor::Sampler { .. } => DescriptorKind::Sampler,
            ResourceDescriptor::BindlessImageArray(_) => DescriptorKind::BindlessImageArray,
        }
    }

    /// Number of descriptors this resource occupies at its slot
    pub fn descriptor_count(&self) -> u32 {
        match self {
            ResourceDescriptor::BindlessImageArray(array) => array.len() as u32,
            _ => 1,
        }
    }
}

/// One slot of the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceBinding {
    /// Binding number (`layout(binding = N)` in GLSL)
    pub slot: u32,
    /// Shader stages that access this binding
    pub visibility: ShaderStageFlags,
    /// Bound resource
    pub descriptor: ResourceDescriptor,
}

/// Ordered collection of resource bindings, unique per slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceBindingTable {
    entries: BTreeMap<u32, ResourceBinding>,
    capabilities: DeviceCapabilities,
}

impl ResourceBindingTable {
    /// Create an empty table validating against `capabilities`
    pub fn new(capabilities: DeviceCapabilities) -> Self {
        Self {
            entries: BTreeMap::new(),
            capabilities,
        }
    }

    /// Bind a uniform buffer
    pub fn set_uniform_buffer(
        &mut self,
        slot: u32,
        stage: impl Into<ShaderStageFlags>,
        buffer: BufferHandle,
        offset: u64,
    ) -> Result<()> {
        self.insert(slot, stage.into(), ResourceDescriptor::UniformBuffer { buffer, offset })
    }

    /// Bind a combined image sampler
    pub fn set_image_sampler(
        &mut self,
        slot: u32,
        stage: impl Into<ShaderStageFlags>,
        image: ImageHandle,
        sampler: SamplerHandle,
    ) -> Result<()> {
        self.insert(slot, stage.into(), ResourceDescriptor::CombinedImageSampler { image, sampler })
    }

    /// Bind a standalone sampler
    pub fn set_sampler(
        &mut self,
        slot: u32,
        stage: impl Into<ShaderStageFlags>,
        sampler: SamplerHandle,
    ) -> Result<()> {
        self.insert(slot, stage.into(), ResourceDescriptor::Sampler { sampler })
    }

    /// Bind an array of images indexed per draw
    ///
    /// # Errors
    ///
    /// - `BindlessUnsupported` if the device lacks descriptor indexing
    /// - `EmptyBindlessArray` if `images` is empty
    /// - `BindlessArrayTooLarge` if `images` exceeds the device limit
    /// - `DuplicateBindingSlot` on a slot conflict
    pub fn set_bindless_image_array(
        &mut self,
        slot: u32,
        stage: impl Into<ShaderStageFlags>,
        images: &[ImageHandle],
    ) -> Result<()> {
        if !self.capabilities.bindless_image_arrays {
            crate::stellar_bail!(SOURCE, Error::BindlessUnsupported);
        }

        let array = BindlessImageArray::new(slot, images)
            .map_err(|e| crate::stellar_err!(SOURCE, e))?;

        if array.len() as u64 > self.capabilities.max_bindless_images as u64 {
            crate::stellar_bail!(SOURCE, Error::BindlessArrayTooLarge {
                slot,
                count: array.len(),
                limit: self.capabilities.max_bindless_images,
            });
        }

        self.insert(slot, stage.into(), ResourceDescriptor::BindlessImageArray(array))
    }

    fn insert(
        &mut self,
        slot: u32,
        visibility: ShaderStageFlags,
        descriptor: ResourceDescriptor,
    ) -> Result<()> {
        if visibility.is_empty() {
            crate::stellar_bail!(SOURCE, Error::InvalidArgument(format!(
                "binding slot {} has an empty shader stage mask", slot)));
        }

        let Some(existing) = self.entries.get_mut(&slot) else {
            crate::stellar_debug!(SOURCE, "slot {} <- {:?} ({:?})", slot, descriptor.kind(), visibility);
            self.entries.insert(slot, ResourceBinding { slot, visibility, descriptor });
            return Ok(());
        };

        let existing_kind = existing.descriptor.kind();
        let requested_kind = descriptor.kind();
        if existing_kind != requested_kind {
            crate::stellar_bail!(SOURCE, Error::DuplicateBindingSlot {
                slot,
                existing: existing_kind,
                requested: requested_kind,
            });
        }

        // Stages already allowed on the slot may rebind it; the mask is kept
        if existing.visibility.contains(visibility) {
            crate::stellar_trace!(SOURCE, "slot {} rebound ({:?})", slot, requested_kind);
            existing.descriptor = descriptor;
        } else if existing.descriptor == descriptor {
            existing.visibility |= visibility;
            crate::stellar_trace!(SOURCE, "slot {} visibility widened to {:?}", slot, existing.visibility);
        } else {
            crate::stellar_bail!(SOURCE, Error::DuplicateBindingSlot {
                slot,
                existing: existing_kind,
                requested: requested_kind,
            });
        }

        Ok(())
    }

    /// Binding at `slot`
    pub fn get(&self, slot: u32) -> Option<&ResourceBinding> {
        self.entries.get(&slot)
    }

    /// Bindless array at `slot`, if that slot holds one
    pub fn bindless_array(&self, slot: u32) -> Option<&BindlessImageArray> {
        match self.entries.get(&slot).map(|binding| &binding.descriptor) {
            Some(ResourceDescriptor::BindlessImageArray(array)) => Some(array),
            _ => None,
        }
    }

    /// Bindings in ascending slot order
    pub fn iter(&self) -> impl Iterator<Item = &ResourceBinding> {
        self.entries.values()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no slot is occupied
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Capabilities this table validates against
    pub fn capabilities(&self) -> &DeviceCapabilities {
        &self.capabilities
    }
}

#[cfg(test)]
#[path = "binding_table_tests.rs"]
mod tests;
