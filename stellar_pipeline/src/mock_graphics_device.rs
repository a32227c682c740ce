//! In-memory graphics device (no GPU required)
//!
//! `MockGraphicsDevice` issues resource handles, records every call it
//! receives and keeps the state a real device would hold: compiled pipeline
//! descriptions, the bound descriptor set and the pushed constant bytes of
//! each stage. Tests and the demo use it to observe what a shader would see.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use crate::bindless::BindlessIndex;
use crate::binding_table::ResourceDescriptor;
use crate::descriptor_set::DescriptorSetTemplate;
use crate::device::{DeviceCapabilities, GraphicsDevice};
use crate::error::{Error, Result};
use crate::handle::{BufferHandle, FramebufferHandle, ImageHandle, PipelineHandle, SamplerHandle};
use crate::pipeline::PipelineDescription;
use crate::push_constant::PushConstantSlot;
use crate::shader::ShaderStage;

const SOURCE: &str = "stellar::MockDevice";

// ============================================================================
// Mock resources
// ============================================================================

/// Buffer created on the mock device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockBuffer {
    pub name: String,
    pub size: u64,
}

/// Image created on the mock device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// Compiled pipeline and its per-stage push constant blocks
#[derive(Debug, Clone)]
pub struct MockPipeline {
    pub description: PipelineDescription,
    /// Bytes of each stage's push constant range, relative to the range start
    pub push_blocks: FxHashMap<ShaderStage, Vec<u8>>,
}

// ============================================================================
// Mock device
// ============================================================================

/// Graphics device keeping everything in memory
#[derive(Debug)]
pub struct MockGraphicsDevice {
    capabilities: DeviceCapabilities,
    buffers: SlotMap<BufferHandle, MockBuffer>,
    images: SlotMap<ImageHandle, MockImage>,
    samplers: SlotMap<SamplerHandle, String>,
    framebuffers: SlotMap<FramebufferHandle, String>,
    pipelines: SlotMap<PipelineHandle, MockPipeline>,
    bound: Option<(PipelineHandle, DescriptorSetTemplate)>,
    /// Every call received, in order
    pub commands: Vec<String>,
}

impl MockGraphicsDevice {
    /// Create a device exposing `capabilities`
    pub fn new(capabilities: DeviceCapabilities) -> Self {
        Self {
            capabilities,
            buffers: SlotMap::with_key(),
            images: SlotMap::with_key(),
            samplers: SlotMap::with_key(),
            framebuffers: SlotMap::with_key(),
            pipelines: SlotMap::with_key(),
            bound: None,
            commands: Vec::new(),
        }
    }

    // ===== RESOURCE CREATION =====

    /// Create a buffer of `size` bytes
    pub fn create_buffer(&mut self, name: &str, size: u64) -> BufferHandle {
        self.commands.push(format!("create_buffer({}, {})", name, size));
        self.buffers.insert(MockBuffer { name: name.to_string(), size })
    }

    /// Create a 2D image
    pub fn create_image(&mut self, name: &str, width: u32, height: u32) -> ImageHandle {
        self.commands.push(format!("create_image({}, {}x{})", name, width, height));
        self.images.insert(MockImage { name: name.to_string(), width, height })
    }

    /// Create a sampler
    pub fn create_sampler(&mut self, name: &str) -> SamplerHandle {
        self.commands.push(format!("create_sampler({})", name));
        self.samplers.insert(name.to_string())
    }

    /// Create a framebuffer layout
    pub fn create_framebuffer(&mut self, name: &str) -> FramebufferHandle {
        self.commands.push(format!("create_framebuffer({})", name));
        self.framebuffers.insert(name.to_string())
    }

    // ===== INSPECTION =====

    /// Buffer created for `handle`
    pub fn buffer(&self, handle: BufferHandle) -> Option<&MockBuffer> {
        self.buffers.get(handle)
    }

    /// Image created for `handle`
    pub fn image(&self, handle: ImageHandle) -> Option<&MockImage> {
        self.images.get(handle)
    }

    /// Pipeline compiled for `handle`
    pub fn pipeline(&self, handle: PipelineHandle) -> Option<&MockPipeline> {
        self.pipelines.get(handle)
    }

    /// Number of compiled pipelines
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    /// Currently bound pipeline and descriptor set
    pub fn bound(&self) -> Option<(PipelineHandle, &DescriptorSetTemplate)> {
        self.bound.as_ref().map(|(pipeline, template)| (*pipeline, template))
    }

    /// Bytes pushed so far for `stage` of `pipeline`
    pub fn pushed_bytes(&self, pipeline: PipelineHandle, stage: ShaderStage) -> Option<&[u8]> {
        self.pipelines
            .get(pipeline)
            .and_then(|mock| mock.push_blocks.get(&stage))
            .map(|block| block.as_slice())
    }

    /// Image `stage` would sample from the bindless array at `slot`
    ///
    /// The array index is read from the bytes pushed for `index_slot` on the
    /// bound pipeline, then resolved through the bound descriptor set.
    pub fn sampled_image(
        &self,
        stage: ShaderStage,
        slot: u32,
        index_slot: &PushConstantSlot,
    ) -> Result<ImageHandle> {
        let Some((pipeline, template)) = self.bound.as_ref() else {
            crate::stellar_bail!(SOURCE, Error::InvalidArgument(
                "no descriptor set is bound".to_string()));
        };

        let visible = template
            .binding(slot)
            .is_some_and(|binding| binding.visibility.contains_stage(stage));
        if !visible {
            crate::stellar_bail!(SOURCE, Error::InvalidArgument(format!(
                "slot {} is not visible to the {:?} stage", slot, stage)));
        }

        let block = self.pushed_bytes(*pipeline, index_slot.stage).unwrap_or(&[]);
        let start = index_slot.offset as usize;
        let end = start + std::mem::size_of::<BindlessIndex>();
        let Some(bytes) = block.get(start..end) else {
            crate::stellar_bail!(SOURCE, Error::InvalidArgument(format!(
                "no bindless index pushed for {:?} at +{}", index_slot.stage, index_slot.offset)));
        };

        let index: BindlessIndex = bytemuck::pod_read_unaligned(bytes);
        template.resolve_bindless(slot, index)
    }

    fn check_resources(&self, description: &PipelineDescription) -> Result<()> {
        if !self.framebuffers.contains_key(description.framebuffer()) {
            crate::stellar_bail!(SOURCE, Error::InvalidResource(
                "framebuffer was not created by this device".to_string()));
        }

        for binding in description.resources().iter() {
            let known = match &binding.descriptor {
                ResourceDescriptor::UniformBuffer { buffer, .. } => self.buffers.contains_key(*buffer),
                ResourceDescriptor::CombinedImageSampler { image, sampler } => {
                    self.images.contains_key(*image) && self.samplers.contains_key(*sampler)
                }
                ResourceDescriptor::Sampler { sampler } => self.samplers.contains_key(*sampler),
                ResourceDescriptor::BindlessImageArray(array) => {
                    array.images().iter().all(|image| self.images.contains_key(*image))
                }
            };
            if !known {
                crate::stellar_bail!(SOURCE, Error::InvalidResource(format!(
                    "slot {} references a resource unknown to this device", binding.slot)));
            }
        }

        Ok(())
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    fn compile_pipeline(&mut self, description: &PipelineDescription) -> Result<PipelineHandle> {
        self.check_resources(description)?;

        let push_blocks = description
            .push_constant_ranges()
            .iter()
            .map(|range| (range.stage, vec![0u8; range.size as usize]))
            .collect();

        let handle = self.pipelines.insert(MockPipeline {
            description: description.clone(),
            push_blocks,
        });
        self.commands.push(format!("compile_pipeline({} stages)", description.shader_stages().len()));
        crate::stellar_debug!(SOURCE, "pipeline compiled ({} total)", self.pipelines.len());
        Ok(handle)
    }

    fn bind_descriptor_set(
        &mut self,
        pipeline: PipelineHandle,
        template: &DescriptorSetTemplate,
    ) -> Result<()> {
        let Some(mock) = self.pipelines.get(pipeline) else {
            crate::stellar_bail!(SOURCE, Error::InvalidResource(
                "pipeline was not compiled by this device".to_string()));
        };

        if mock.description.descriptor_set_template().layout() != template.layout() {
            crate::stellar_bail!(SOURCE, Error::InvalidArgument(
                "descriptor set layout does not match the pipeline".to_string()));
        }

        self.bound = Some((pipeline, template.clone()));
        self.commands.push(format!("bind_descriptor_set({} bindings)", template.bindings().len()));
        Ok(())
    }

    fn push_constant(
        &mut self,
        pipeline: PipelineHandle,
        stage: ShaderStage,
        offset: u32,
        bytes: &[u8],
    ) -> Result<()> {
        let Some(mock) = self.pipelines.get_mut(pipeline) else {
            crate::stellar_bail!(SOURCE, Error::InvalidResource(
                "pipeline was not compiled by this device".to_string()));
        };

        let Some(range) = mock.description.push_constant_range(stage).copied() else {
            crate::stellar_bail!(SOURCE, Error::InvalidArgument(format!(
                "pipeline has no push constant range for {:?}", stage)));
        };

        let end = offset as u64 + bytes.len() as u64;
        if offset < range.offset || end > range.end() as u64 {
            crate::stellar_bail!(SOURCE, Error::InvalidArgument(format!(
                "push of {} bytes at {} is outside the {:?} range {}..{}",
                bytes.len(), offset, stage, range.offset, range.end())));
        }

        let start = (offset - range.offset) as usize;
        let block = mock
            .push_blocks
            .entry(stage)
            .or_insert_with(|| vec![0u8; range.size as usize]);
        block[start..start + bytes.len()].copy_from_slice(bytes);

        self.commands.push(format!("push_constant({:?}, {}, {} bytes)", stage, offset, bytes.len()));
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
