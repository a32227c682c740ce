//! Pipeline description and its builder
//!
//! `PipelineDescriptionBuilder` accumulates fixed-function state, shader
//! stages, the vertex layout, resource bindings and push constants, then
//! produces an immutable `PipelineDescription`. Building does not touch the
//! GPU: the description is handed to `GraphicsDevice::compile_pipeline`.

use crate::descriptor_set::DescriptorSetTemplate;
use crate::device::DeviceCapabilities;
use crate::error::{Error, Result};
use crate::handle::{BufferHandle, FramebufferHandle, ImageHandle, SamplerHandle};
use crate::binding_table::ResourceBindingTable;
use crate::push_constant::{PushConstantAllocator, PushConstantRange, PushConstantSlot};
use crate::shader::{ShaderBytecode, ShaderStage, ShaderStageFlags};
use crate::vertex::{
    self, VertexAttribute, VertexBinding, VertexDeclaration, VertexElementKind, VertexInputRate,
    VertexLayout, VertexLayoutCalculator,
};

const SOURCE: &str = "stellar::PipelineBuilder";

// ===== FIXED-FUNCTION ENUMS =====

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    /// Triangle list
    TriangleList,
    /// Triangle strip
    TriangleStrip,
    /// Line list
    LineList,
    /// Line strip
    LineStrip,
    /// Point list
    PointList,
}

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    /// No culling
    None,
    /// Cull front faces
    Front,
    /// Cull back faces
    Back,
    /// Cull every triangle
    FrontAndBack,
}

/// Front face winding order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontFace {
    /// Counter-clockwise vertices define front face
    CounterClockwise,
    /// Clockwise vertices define front face
    Clockwise,
}

/// Polygon fill mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    /// Fill polygons
    Solid,
    /// Draw edges only
    Wireframe,
    /// Draw vertices only
    Point,
}

/// Multisample count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleCount {
    /// 1 sample (no multisampling)
    S1,
    /// 2 samples
    S2,
    /// 4 samples
    S4,
    /// 8 samples
    S8,
}

impl SampleCount {
    /// Samples per pixel
    pub fn count(&self) -> u32 {
        match self {
            SampleCount::S1 => 1,
            SampleCount::S2 => 2,
            SampleCount::S4 => 4,
            SampleCount::S8 => 8,
        }
    }
}

// ===== FIXED-FUNCTION STATE =====

/// Rasterization fixed-function state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterizationState {
    /// Face culling mode
    pub cull_mode: CullMode,
    /// Front face winding order
    pub front_face: FrontFace,
    /// Polygon fill mode
    pub fill_mode: FillMode,
}

impl Default for RasterizationState {
    fn default() -> Self {
        Self {
            cull_mode: CullMode::Front,
            front_face: FrontFace::CounterClockwise,
            fill_mode: FillMode::Solid,
        }
    }
}

/// Multisampling state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultisampleState {
    /// Number of samples per pixel
    pub sample_count: SampleCount,
    /// Enable alpha-to-coverage
    pub alpha_to_coverage: bool,
}

impl Default for MultisampleState {
    fn default() -> Self {
        Self {
            sample_count: SampleCount::S1,
            alpha_to_coverage: false,
        }
    }
}

// ===== PIPELINE DESCRIPTION =====

/// Complete, immutable description of a graphics pipeline
///
/// Produced by `PipelineDescriptionBuilder::build`. Resource handles are
/// referenced, not owned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineDescription {
    framebuffer: FramebufferHandle,
    topology: PrimitiveTopology,
    rasterization: RasterizationState,
    multisample: MultisampleState,
    shader_stages: Vec<ShaderBytecode>,
    vertex_layout: VertexLayout,
    resources: ResourceBindingTable,
    push_constant_ranges: Vec<PushConstantRange>,
}

impl PipelineDescription {
    /// Render target layout the pipeline draws into
    pub fn framebuffer(&self) -> FramebufferHandle {
        self.framebuffer
    }

    /// Primitive topology
    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    /// Rasterization state
    pub fn rasterization(&self) -> &RasterizationState {
        &self.rasterization
    }

    /// Multisample state
    pub fn multisample(&self) -> &MultisampleState {
        &self.multisample
    }

    /// Non-empty shader stages, one per stage
    pub fn shader_stages(&self) -> &[ShaderBytecode] {
        &self.shader_stages
    }

    /// Bytecode for `stage`
    pub fn shader(&self, stage: ShaderStage) -> Option<&ShaderBytecode> {
        self.shader_stages.iter().find(|shader| shader.stage == stage)
    }

    /// Vertex bindings and attributes
    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.vertex_layout
    }

    /// Resource binding table
    pub fn resources(&self) -> &ResourceBindingTable {
        &self.resources
    }

    /// Push constant ranges, one per stage
    pub fn push_constant_ranges(&self) -> &[PushConstantRange] {
        &self.push_constant_ranges
    }

    /// Push constant range of `stage`
    pub fn push_constant_range(&self, stage: ShaderStage) -> Option<&PushConstantRange> {
        self.push_constant_ranges.iter().find(|range| range.stage == stage)
    }

    /// Absolute byte offset of a slot returned by `add_push_constant`
    ///
    /// Returns None if the slot does not fit this description's ranges.
    pub fn push_constant_offset(&self, slot: &PushConstantSlot) -> Option<u32> {
        let range = self.push_constant_range(slot.stage)?;
        if slot.offset as u64 + slot.size as u64 > range.size as u64 {
            return None;
        }
        Some(range.offset + slot.offset)
    }

    /// Resolve the descriptor set bound with this pipeline
    pub fn descriptor_set_template(&self) -> DescriptorSetTemplate {
        DescriptorSetTemplate::from_table(&self.resources)
    }
}

// ===== BUILDER =====

/// Builder accumulating the state of one pipeline description
///
/// Defaults: TriangleList, solid fill, front-face culling, counter-clockwise
/// front faces, no multisampling.
///
/// # Example
///
/// ```ignore
/// let mut builder = PipelineDescriptionBuilder::new(device.capabilities());
/// builder
///     .set_framebuffer(framebuffer)
///     .add_shader_stage(ShaderBytecode::new(ShaderStage::Vertex, vs))
///     .add_shader_stage(ShaderBytecode::new(ShaderStage::Fragment, fs))
///     .add_vertex_binding(0, VertexInputRate::Vertex, 20);
/// builder.add_vertex_attributes_from::<VertexPositionTexture>(0)?;
/// builder.set_uniform_buffer(0, ShaderStage::Vertex, camera_buffer, 0)?;
/// builder.set_bindless_image_array(1, ShaderStage::Fragment, &textures)?;
/// let model_slot = builder.add_push_constant(ShaderStage::Vertex, 64)?;
/// let description = builder.build()?;
/// ```
#[derive(Debug, Clone)]
pub struct PipelineDescriptionBuilder {
    framebuffer: Option<FramebufferHandle>,
    topology: PrimitiveTopology,
    rasterization: RasterizationState,
    multisample: MultisampleState,
    shader_stages: Vec<ShaderBytecode>,
    vertex_layout: VertexLayout,
    vertex_calculator: VertexLayoutCalculator,
    resources: ResourceBindingTable,
    push_constants: PushConstantAllocator,
}

impl PipelineDescriptionBuilder {
    /// Create a builder validating against `capabilities`
    pub fn new(capabilities: DeviceCapabilities) -> Self {
        Self {
            framebuffer: None,
            topology: PrimitiveTopology::TriangleList,
            rasterization: RasterizationState::default(),
            multisample: MultisampleState::default(),
            shader_stages: Vec::new(),
            vertex_layout: VertexLayout::default(),
            vertex_calculator: VertexLayoutCalculator::new(),
            resources: ResourceBindingTable::new(capabilities),
            push_constants: PushConstantAllocator::new(capabilities.max_push_constant_size),
        }
    }

    // ===== FIXED-FUNCTION STATE =====

    /// Set the render target layout
    pub fn set_framebuffer(&mut self, framebuffer: FramebufferHandle) -> &mut Self {
        self.framebuffer = Some(framebuffer);
        self
    }

    /// Set the primitive topology
    pub fn set_primitive_topology(&mut self, topology: PrimitiveTopology) -> &mut Self {
        self.topology = topology;
        self
    }

    /// Set the polygon fill mode
    pub fn set_fill_mode(&mut self, mode: FillMode) -> &mut Self {
        self.rasterization.fill_mode = mode;
        self
    }

    /// Set the face culling mode
    pub fn set_cull_mode(&mut self, mode: CullMode) -> &mut Self {
        self.rasterization.cull_mode = mode;
        self
    }

    /// Set the front face winding order
    pub fn set_front_face(&mut self, front_face: FrontFace) -> &mut Self {
        self.rasterization.front_face = front_face;
        self
    }

    /// Set the multisample count
    pub fn set_sample_count(&mut self, sample_count: SampleCount) -> &mut Self {
        self.multisample.sample_count = sample_count;
        self
    }

    /// Enable or disable alpha-to-coverage
    pub fn set_alpha_to_coverage(&mut self, enabled: bool) -> &mut Self {
        self.multisample.alpha_to_coverage = enabled;
        self
    }

    // ===== SHADERS =====

    /// Add a shader stage
    ///
    /// Empty bytecode is ignored. A second blob for the same stage replaces
    /// the first one in place.
    pub fn add_shader_stage(&mut self, bytecode: ShaderBytecode) -> &mut Self {
        if bytecode.is_empty() {
            crate::stellar_debug!(SOURCE, "ignoring empty {:?} shader bytecode", bytecode.stage);
            return self;
        }

        match self.shader_stages.iter_mut().find(|shader| shader.stage == bytecode.stage) {
            Some(existing) => {
                crate::stellar_debug!(SOURCE, "replacing {:?} shader", bytecode.stage);
                *existing = bytecode;
            }
            None => self.shader_stages.push(bytecode),
        }
        self
    }

    // ===== VERTEX INPUT =====

    /// Declare a vertex buffer stream
    ///
    /// Redeclaring a binding replaces its rate and stride.
    pub fn add_vertex_binding(&mut self, binding: u32, input_rate: VertexInputRate, stride: u32) -> &mut Self {
        let description = VertexBinding { binding, stride, input_rate };
        match self.vertex_layout.bindings.iter_mut().find(|b| b.binding == binding) {
            Some(existing) => *existing = description,
            None => self.vertex_layout.bindings.push(description),
        }
        self
    }

    /// Add the next vertex attribute on `binding`
    pub fn add_vertex_attribute(&mut self, kind: VertexElementKind, binding: u32) -> VertexAttribute {
        let attribute = self.vertex_calculator.add_attribute(kind, binding);
        self.vertex_layout.attributes.push(attribute);
        attribute
    }

    /// Add the next vertex attribute from a semantic tag
    pub fn add_vertex_attribute_tagged(&mut self, tag: &str, binding: u32) -> Result<VertexAttribute> {
        let attribute = self.vertex_calculator.add_attribute_tagged(tag, binding)?;
        self.vertex_layout.attributes.push(attribute);
        Ok(attribute)
    }

    /// Add one attribute per tagged field of `V`, in declaration order
    ///
    /// Untagged fields are skipped. If any tag is unrecognized the call fails
    /// with `UnsupportedVertexElement` and no attribute is added.
    pub fn add_vertex_attributes_from<V: VertexDeclaration>(&mut self, binding: u32) -> Result<Vec<VertexAttribute>> {
        let kinds = vertex::element_kinds::<V>()?;
        Ok(kinds
            .into_iter()
            .map(|kind| self.add_vertex_attribute(kind, binding))
            .collect())
    }

    // ===== RESOURCES =====

    /// Bind a uniform buffer
    pub fn set_uniform_buffer(
        &mut self,
        slot: u32,
        stage: impl Into<ShaderStageFlags>,
        buffer: BufferHandle,
        offset: u64,
    ) -> Result<&mut Self> {
        self.resources.set_uniform_buffer(slot, stage, buffer, offset)?;
        Ok(self)
    }

    /// Bind a combined image sampler
    pub fn set_image_sampler(
        &mut self,
        slot: u32,
        stage: impl Into<ShaderStageFlags>,
        image: ImageHandle,
        sampler: SamplerHandle,
    ) -> Result<&mut Self> {
        self.resources.set_image_sampler(slot, stage, image, sampler)?;
        Ok(self)
    }

    /// Bind a standalone sampler
    pub fn set_sampler(
        &mut self,
        slot: u32,
        stage: impl Into<ShaderStageFlags>,
        sampler: SamplerHandle,
    ) -> Result<&mut Self> {
        self.resources.set_sampler(slot, stage, sampler)?;
        Ok(self)
    }

    /// Bind a bindless image array
    pub fn set_bindless_image_array(
        &mut self,
        slot: u32,
        stage: impl Into<ShaderStageFlags>,
        images: &[ImageHandle],
    ) -> Result<&mut Self> {
        self.resources.set_bindless_image_array(slot, stage, images)?;
        Ok(self)
    }

    // ===== PUSH CONSTANTS =====

    /// Declare `size` bytes of push constants for `stage`
    ///
    /// The offset is computed so that stage ranges never overlap.
    pub fn add_push_constant(&mut self, stage: ShaderStage, size: u32) -> Result<PushConstantSlot> {
        self.push_constants.add(stage, size)
    }

    // ===== INSPECTION =====

    /// Framebuffer set so far
    pub fn framebuffer(&self) -> Option<FramebufferHandle> {
        self.framebuffer
    }

    /// Shader stages added so far
    pub fn shader_stages(&self) -> &[ShaderBytecode] {
        &self.shader_stages
    }

    /// Vertex layout accumulated so far
    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.vertex_layout
    }

    /// Resource bindings accumulated so far
    pub fn resources(&self) -> &ResourceBindingTable {
        &self.resources
    }

    /// Push constant ranges accumulated so far
    pub fn push_constant_ranges(&self) -> Vec<PushConstantRange> {
        self.push_constants.ranges()
    }

    // ===== BUILD =====

    /// Produce the immutable pipeline description
    ///
    /// Does not modify the builder; calling it twice without intervening
    /// mutation yields equal descriptions.
    ///
    /// # Errors
    ///
    /// - `MissingFramebuffer` if no framebuffer was set (checked first)
    /// - `MissingRequiredShaderStage` if neither a vertex nor a fragment stage
    ///   was added
    pub fn build(&self) -> Result<PipelineDescription> {
        let Some(framebuffer) = self.framebuffer else {
            crate::stellar_bail!(SOURCE, Error::MissingFramebuffer);
        };

        let has_stage = |stage: ShaderStage| self.shader_stages.iter().any(|shader| shader.stage == stage);
        let has_vertex = has_stage(ShaderStage::Vertex);
        let has_fragment = has_stage(ShaderStage::Fragment);
        if !has_vertex && !has_fragment {
            crate::stellar_bail!(SOURCE, Error::MissingRequiredShaderStage);
        }
        if !has_vertex {
            crate::stellar_warn!(SOURCE, "pipeline has a fragment stage but no vertex stage");
        }

        self.check_vertex_layout();

        let description = PipelineDescription {
            framebuffer,
            topology: self.topology,
            rasterization: self.rasterization,
            multisample: self.multisample,
            shader_stages: self.shader_stages.clone(),
            vertex_layout: self.vertex_layout.clone(),
            resources: self.resources.clone(),
            push_constant_ranges: self.push_constants.ranges(),
        };

        crate::stellar_info!(SOURCE,
            "pipeline built: {} stages, {} vertex attributes, {} resource bindings, {} push constant ranges",
            description.shader_stages.len(),
            description.vertex_layout.attributes.len(),
            description.resources.len(),
            description.push_constant_ranges.len());

        Ok(description)
    }

    /// Warn about vertex layouts the device would reject or misread
    fn check_vertex_layout(&self) {
        for binding in &self.vertex_layout.bindings {
            let extent = self.vertex_calculator.extent(binding.binding);
            if binding.stride < extent {
                crate::stellar_warn!(SOURCE,
                    "vertex binding {} stride {} is smaller than its attributes ({} bytes)",
                    binding.binding, binding.stride, extent);
            }
        }

        for attribute in &self.vertex_layout.attributes {
            if self.vertex_layout.binding(attribute.binding).is_none() {
                crate::stellar_warn!(SOURCE,
                    "vertex attribute at location {} uses undeclared binding {}",
                    attribute.location, attribute.binding);
            }
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
