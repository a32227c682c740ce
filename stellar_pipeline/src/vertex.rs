//! Vertex input layout: element kinds, formats and the layout calculator
//!
//! The calculator hands out attribute locations and byte offsets in the
//! exact order attributes are declared. Callers must declare them in the
//! order the vertex shader expects them; nothing is reordered.

use std::str::FromStr;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};

// ===== FORMATS =====

/// GPU data format of a vertex attribute
///
/// Defines the data type and component count of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum VertexFormat {
    // Float formats
    R32_SFLOAT,          // float (4 bytes)
    R32G32_SFLOAT,       // vec2 (8 bytes)
    R32G32B32_SFLOAT,    // vec3 (12 bytes)
    R32G32B32A32_SFLOAT, // vec4 (16 bytes)

    // Integer formats (signed)
    R32_SINT,
    R32G32_SINT,
    R32G32B32_SINT,
    R32G32B32A32_SINT,

    // Integer formats (unsigned)
    R32_UINT,
    R32G32_UINT,
    R32G32B32_UINT,
    R32G32B32A32_UINT,
}

impl VertexFormat {
    /// Returns size in bytes for this format
    pub fn size_bytes(&self) -> u32 {
        match self {
            VertexFormat::R32_SFLOAT | VertexFormat::R32_SINT | VertexFormat::R32_UINT => 4,
            VertexFormat::R32G32_SFLOAT | VertexFormat::R32G32_SINT | VertexFormat::R32G32_UINT => 8,
            VertexFormat::R32G32B32_SFLOAT | VertexFormat::R32G32B32_SINT | VertexFormat::R32G32B32_UINT => 12,
            VertexFormat::R32G32B32A32_SFLOAT | VertexFormat::R32G32B32A32_SINT | VertexFormat::R32G32B32A32_UINT => 16,
        }
    }
}

// ===== ELEMENT KINDS =====

/// Semantic kind of a vertex element
///
/// Sizes and formats are fixed lookup constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexElementKind {
    /// Object-space position (vec3)
    Position,
    /// Normal vector (vec3)
    Normal,
    /// Texture coordinate (vec2)
    TextureCoordinate,
    /// RGB vertex color (vec3)
    Color,
}

impl VertexElementKind {
    /// Size in bytes of one element of this kind
    pub const fn size_bytes(&self) -> u32 {
        match self {
            VertexElementKind::Position => 12,
            VertexElementKind::Normal => 12,
            VertexElementKind::TextureCoordinate => 8,
            VertexElementKind::Color => 12,
        }
    }

    /// GPU format of this kind
    pub const fn format(&self) -> VertexFormat {
        match self {
            VertexElementKind::Position => VertexFormat::R32G32B32_SFLOAT,
            VertexElementKind::Normal => VertexFormat::R32G32B32_SFLOAT,
            VertexElementKind::TextureCoordinate => VertexFormat::R32G32_SFLOAT,
            VertexElementKind::Color => VertexFormat::R32G32B32_SFLOAT,
        }
    }
}

impl FromStr for VertexElementKind {
    type Err = Error;

    /// Parse a semantic tag (case insensitive)
    fn from_str(tag: &str) -> Result<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "position" => Ok(VertexElementKind::Position),
            "normal" => Ok(VertexElementKind::Normal),
            "texcoord" | "texture_coordinate" | "texturecoordinate" | "uv" => {
                Ok(VertexElementKind::TextureCoordinate)
            }
            "color" | "colour" => Ok(VertexElementKind::Color),
            _ => Err(Error::UnsupportedVertexElement(tag.to_string())),
        }
    }
}

impl TryFrom<u32> for VertexElementKind {
    type Error = Error;

    /// Raw element id as used by shader reflection tables
    fn try_from(id: u32) -> Result<Self> {
        match id {
            0 => Ok(VertexElementKind::Position),
            1 => Ok(VertexElementKind::Normal),
            2 => Ok(VertexElementKind::TextureCoordinate),
            3 => Ok(VertexElementKind::Color),
            other => Err(Error::UnsupportedVertexElement(format!("element id {}", other))),
        }
    }
}

// ===== LAYOUT TYPES =====

/// Vertex input rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexInputRate {
    /// Data is per-vertex
    Vertex,
    /// Data is per-instance
    Instance,
}

/// Vertex attribute description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Binding index
    pub binding: u32,
    /// Attribute location in shader
    pub location: u32,
    /// Format of the attribute (data type and component count)
    pub format: VertexFormat,
    /// Offset in bytes from the start of the vertex within its binding
    pub offset: u32,
}

/// Vertex binding description (one per vertex buffer stream)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBinding {
    /// Binding index
    pub binding: u32,
    /// Stride in bytes between consecutive elements
    pub stride: u32,
    /// Input rate (per-vertex or per-instance)
    pub input_rate: VertexInputRate,
}

/// Vertex input layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexLayout {
    /// Vertex bindings
    pub bindings: Vec<VertexBinding>,
    /// Vertex attributes, in location order
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    /// Binding description for `binding`, if declared
    pub fn binding(&self, binding: u32) -> Option<&VertexBinding> {
        self.bindings.iter().find(|b| b.binding == binding)
    }

    /// Attributes sourced from `binding`
    pub fn attributes_for(&self, binding: u32) -> impl Iterator<Item = &VertexAttribute> {
        self.attributes.iter().filter(move |a| a.binding == binding)
    }
}

// ===== CALCULATOR =====

/// Running location/offset counters for one pipeline description
///
/// The location counter is shared by all bindings; offsets are tracked per
/// binding.
#[derive(Debug, Clone, Default)]
pub struct VertexLayoutCalculator {
    next_location: u32,
    offsets: FxHashMap<u32, u32>,
}

impl VertexLayoutCalculator {
    /// Create a calculator starting at location 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Describe the next attribute of `kind` on `binding`
    pub fn add_attribute(&mut self, kind: VertexElementKind, binding: u32) -> VertexAttribute {
        let offset = self.offsets.entry(binding).or_insert(0);
        let attribute = VertexAttribute {
            binding,
            location: self.next_location,
            format: kind.format(),
            offset: *offset,
        };

        *offset += kind.size_bytes();
        self.next_location += 1;

        crate::stellar_trace!("stellar::VertexLayout",
            "{:?} -> binding {} location {} offset {}",
            kind, binding, attribute.location, attribute.offset);

        attribute
    }

    /// Describe the next attribute from a semantic tag
    ///
    /// Fails with `UnsupportedVertexElement` (and leaves the counters
    /// untouched) if the tag is not recognized.
    pub fn add_attribute_tagged(&mut self, tag: &str, binding: u32) -> Result<VertexAttribute> {
        let kind = tag.parse::<VertexElementKind>()
            .map_err(|e| crate::stellar_err!("stellar::VertexLayout", e))?;
        Ok(self.add_attribute(kind, binding))
    }

    /// Location the next attribute will receive
    pub fn next_location(&self) -> u32 {
        self.next_location
    }

    /// Accumulated attribute bytes on `binding` (minimum stride)
    pub fn extent(&self, binding: u32) -> u32 {
        self.offsets.get(&binding).copied().unwrap_or(0)
    }
}

// ===== VERTEX DECLARATIONS =====

/// One field of a vertex structure and its optional semantic tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexField {
    /// Field name (diagnostics only)
    pub name: &'static str,
    /// Semantic tag; untagged fields are not part of the vertex input
    pub tag: Option<&'static str>,
}

impl VertexField {
    /// Field carrying a semantic tag
    pub const fn tagged(name: &'static str, tag: &'static str) -> Self {
        Self { name, tag: Some(tag) }
    }

    /// Field without a tag (skipped)
    pub const fn untagged(name: &'static str) -> Self {
        Self { name, tag: None }
    }
}

/// Static description of a vertex structure's fields, in declaration order
///
/// # Example
///
/// ```
/// use stellar_pipeline::stellar::vertex::{VertexDeclaration, VertexField};
///
/// #[repr(C)]
/// struct VertexPositionTexture {
///     position: [f32; 3],
///     uv: [f32; 2],
/// }
///
/// impl VertexDeclaration for VertexPositionTexture {
///     const FIELDS: &'static [VertexField] = &[
///         VertexField::tagged("position", "position"),
///         VertexField::tagged("uv", "texcoord"),
///     ];
/// }
/// ```
pub trait VertexDeclaration {
    /// Fields in declaration order
    const FIELDS: &'static [VertexField];
}

/// Resolve the element kinds of a vertex declaration
///
/// Untagged fields are skipped. The first unrecognized tag fails the whole
/// resolution with `UnsupportedVertexElement`.
pub fn element_kinds<V: VertexDeclaration>() -> Result<Vec<VertexElementKind>> {
    let mut kinds = Vec::with_capacity(V::FIELDS.len());
    for field in V::FIELDS {
        let Some(tag) = field.tag else {
            continue;
        };
        let kind = tag.parse::<VertexElementKind>().map_err(|_| {
            crate::stellar_err!("stellar::VertexLayout",
                Error::UnsupportedVertexElement(format!("field '{}' tagged '{}'", field.name, tag)))
        })?;
        kinds.push(kind);
    }
    Ok(kinds)
}

#[cfg(test)]
#[path = "vertex_tests.rs"]
mod tests;
