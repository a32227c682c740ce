//! Bindless image arrays
//!
//! A bindless array binds a variable-length list of images to a single
//! descriptor slot. Shaders select the element to sample with a small
//! per-draw index pushed as a constant, so one descriptor set bind covers a
//! whole batch of draws that each read a different texture.
//!
//! Requires dynamically-indexed descriptor arrays on the device, declared up
//! front through `DeviceCapabilities::bindless_image_arrays`.

use bytemuck::{Pod, Zeroable};
use crate::error::{Error, Result};
use crate::handle::ImageHandle;

/// Per-draw index into a bindless image array
///
/// Pushed as a 4-byte constant; `#[repr(transparent)]` over `u32` so it can
/// be written with `bytemuck::bytes_of`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(transparent)]
pub struct BindlessIndex(pub u32);

impl BindlessIndex {
    /// Creates new index
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Gets raw index
    pub const fn raw(&self) -> u32 {
        self.0
    }
}

impl From<u32> for BindlessIndex {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

/// Ordered, non-empty array of images bound to one slot
///
/// Element `i` is the image a shader reads when `BindlessIndex(i)` is pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindlessImageArray {
    images: Vec<ImageHandle>,
}

impl BindlessImageArray {
    /// Create an array from images in index order
    ///
    /// `slot` is only used for error reporting.
    pub fn new(slot: u32, images: &[ImageHandle]) -> Result<Self> {
        if images.is_empty() {
            return Err(Error::EmptyBindlessArray { slot });
        }
        Ok(Self { images: images.to_vec() })
    }

    /// Number of images
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Always false: arrays hold at least one image
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Image selected by `index`
    pub fn get(&self, index: BindlessIndex) -> Option<ImageHandle> {
        self.images.get(index.0 as usize).copied()
    }

    /// Index a draw must push to sample `image` (first occurrence)
    pub fn index_of(&self, image: ImageHandle) -> Option<BindlessIndex> {
        self.images
            .iter()
            .position(|&candidate| candidate == image)
            .map(|position| BindlessIndex(position as u32))
    }

    /// Images in index order
    pub fn images(&self) -> &[ImageHandle] {
        &self.images
    }

    /// Iterate images in index order
    pub fn iter(&self) -> impl Iterator<Item = (BindlessIndex, ImageHandle)> + '_ {
        self.images
            .iter()
            .enumerate()
            .map(|(i, &image)| (BindlessIndex(i as u32), image))
    }
}

#[cfg(test)]
#[path = "bindless_tests.rs"]
mod tests;
