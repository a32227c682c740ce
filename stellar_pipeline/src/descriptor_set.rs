//! Descriptor set template
//!
//! The resolved form of a pipeline's resource binding table: the layout the
//! device creates its descriptor set layout from, plus the concrete
//! resources written into the set. Bound once per draw batch; bindless
//! arrays are then indexed per draw through push constants.

use crate::binding_table::{DescriptorKind, ResourceBinding, ResourceBindingTable, ResourceDescriptor};
use crate::bindless::BindlessIndex;
use crate::error::{Error, Result};
use crate::handle::ImageHandle;
use crate::shader::ShaderStageFlags;

/// Description of a single binding slot within a descriptor set layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingSlotDesc {
    /// Binding number
    pub binding: u32,
    /// Type of resource at this binding
    pub kind: DescriptorKind,
    /// Number of descriptors at this binding (>1 for arrays)
    pub count: u32,
    /// Shader stages that access this binding
    pub stage_flags: ShaderStageFlags,
    /// Binding is a variable-count, partially-bound array (bindless)
    pub variable_count: bool,
}

/// Layout + writes for one descriptor set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorSetTemplate {
    layout: Vec<BindingSlotDesc>,
    bindings: Vec<ResourceBinding>,
}

impl DescriptorSetTemplate {
    /// Resolve a binding table into a template
    pub fn from_table(table: &ResourceBindingTable) -> Self {
        let layout = table
            .iter()
            .map(|binding| BindingSlotDesc {
                binding: binding.slot,
                kind: binding.descriptor.kind(),
                count: binding.descriptor.descriptor_count(),
                stage_flags: binding.visibility,
                variable_count: binding.descriptor.kind() == DescriptorKind::BindlessImageArray,
            })
            .collect();

        Self {
            layout,
            bindings: table.iter().cloned().collect(),
        }
    }

    /// Layout entries in ascending binding order
    pub fn layout(&self) -> &[BindingSlotDesc] {
        &self.layout
    }

    /// Resources to write, in ascending binding order
    pub fn bindings(&self) -> &[ResourceBinding] {
        &self.bindings
    }

    /// Resource bound at `slot`
    pub fn binding(&self, slot: u32) -> Option<&ResourceBinding> {
        self.bindings.iter().find(|binding| binding.slot == slot)
    }

    /// Image a shader reads from the bindless array at `slot` for `index`
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `slot` does not hold a bindless array
    /// - `BindlessIndexOutOfRange` if `index` is past the end of the array
    pub fn resolve_bindless(&self, slot: u32, index: BindlessIndex) -> Result<ImageHandle> {
        let array = match self.binding(slot).map(|binding| &binding.descriptor) {
            Some(ResourceDescriptor::BindlessImageArray(array)) => array,
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "slot {} does not hold a bindless image array", slot)));
            }
        };

        array.get(index).ok_or(Error::BindlessIndexOutOfRange {
            slot,
            index: index.raw(),
            len: array.len(),
        })
    }
}

#[cfg(test)]
#[path = "descriptor_set_tests.rs"]
mod tests;
