//! Shader stages, stage visibility masks and bytecode blobs

use bitflags::bitflags;

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment (pixel) shader
    Fragment,
    /// Compute shader
    Compute,
    /// Geometry shader
    Geometry,
}

impl ShaderStage {
    /// All stages, in pipeline order
    pub const ALL: [ShaderStage; 4] = [
        ShaderStage::Vertex,
        ShaderStage::Geometry,
        ShaderStage::Fragment,
        ShaderStage::Compute,
    ];
}

bitflags! {
    /// Set of shader stages allowed to access a resource or push constant range
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStageFlags: u32 {
        const VERTEX = 0x01;
        const FRAGMENT = 0x02;
        const COMPUTE = 0x04;
        const GEOMETRY = 0x08;
        const VERTEX_FRAGMENT = Self::VERTEX.bits() | Self::FRAGMENT.bits();
        const ALL_GRAPHICS = Self::VERTEX.bits() | Self::FRAGMENT.bits() | Self::GEOMETRY.bits();
    }
}

impl ShaderStageFlags {
    /// Create from a slice of ShaderStage
    pub fn from_stages(stages: &[ShaderStage]) -> Self {
        stages.iter().fold(Self::empty(), |flags, &stage| flags | ShaderStageFlags::from(stage))
    }

    /// Whether `stage` is part of this mask
    pub fn contains_stage(&self, stage: ShaderStage) -> bool {
        self.contains(ShaderStageFlags::from(stage))
    }
}

impl From<ShaderStage> for ShaderStageFlags {
    fn from(stage: ShaderStage) -> Self {
        match stage {
            ShaderStage::Vertex => ShaderStageFlags::VERTEX,
            ShaderStage::Fragment => ShaderStageFlags::FRAGMENT,
            ShaderStage::Compute => ShaderStageFlags::COMPUTE,
            ShaderStage::Geometry => ShaderStageFlags::GEOMETRY,
        }
    }
}

/// Compiled shader bytecode for one stage
///
/// Compilation happens outside of this crate; the blob is carried as-is to
/// the device layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderBytecode {
    /// Pipeline stage this blob runs in
    pub stage: ShaderStage,
    /// Entry point name (default "main")
    pub entry_point: String,
    /// Raw bytecode (SPIR-V, DXIL...)
    pub code: Vec<u8>,
}

impl ShaderBytecode {
    /// Create a blob with the default `main` entry point
    pub fn new(stage: ShaderStage, code: impl Into<Vec<u8>>) -> Self {
        Self {
            stage,
            entry_point: "main".to_string(),
            code: code.into(),
        }
    }

    /// Override the entry point
    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = entry_point.into();
        self
    }

    /// Whether the blob carries no code
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
