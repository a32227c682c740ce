//! Push constant range allocation
//!
//! Each stage owns one contiguous region. Constants declared for a stage
//! are packed back to back inside its region, and regions are laid out in
//! the order their stage was first declared, so ranges of distinct stages
//! never overlap. Offsets are always computed here, never supplied by the
//! caller.

use crate::error::{Error, Result};
use crate::shader::{ShaderStage, ShaderStageFlags};

const SOURCE: &str = "stellar::PushConstants";

/// Push constant offsets and sizes must be multiples of 4
const PUSH_CONSTANT_ALIGNMENT: u32 = 4;

/// Push constant range of one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushConstantRange {
    /// Stage owning the range
    pub stage: ShaderStage,
    /// Offset in bytes
    pub offset: u32,
    /// Size in bytes
    pub size: u32,
}

impl PushConstantRange {
    /// Stage mask of this range
    pub fn stage_flags(&self) -> ShaderStageFlags {
        self.stage.into()
    }

    /// One past the last byte of the range
    pub fn end(&self) -> u32 {
        self.offset + self.size
    }
}

/// One declared constant within a stage's region
///
/// `offset` is relative to the start of the stage's region; use
/// `PipelineDescription::push_constant_offset` for the absolute offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushConstantSlot {
    /// Stage the constant is visible to
    pub stage: ShaderStage,
    /// Offset in bytes within the stage's region
    pub offset: u32,
    /// Size in bytes (rounded up to 4)
    pub size: u32,
}

/// Per-stage push constant accumulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushConstantAllocator {
    // (stage, region size) in first-declaration order
    regions: Vec<(ShaderStage, u32)>,
    limit: u32,
}

impl PushConstantAllocator {
    /// Create an allocator for a device exposing `limit` push constant bytes
    pub fn new(limit: u32) -> Self {
        Self {
            regions: Vec::new(),
            limit,
        }
    }

    /// Declare `size` bytes of constants for `stage`
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `size` is 0
    /// - `PushConstantRangeOverflow` if all regions together would exceed
    ///   the device limit; nothing is recorded in that case
    pub fn add(&mut self, stage: ShaderStage, size: u32) -> Result<PushConstantSlot> {
        if size == 0 {
            crate::stellar_bail!(SOURCE, Error::InvalidArgument(format!(
                "push constant for {:?} stage has zero size", stage)));
        }

        let used = self.used();
        let aligned = align_up(size as u64);
        if used as u64 + aligned > self.limit as u64 {
            crate::stellar_bail!(SOURCE, Error::PushConstantRangeOverflow {
                stage,
                requested: size,
                used,
                limit: self.limit,
            });
        }
        let aligned = aligned as u32;

        let slot = match self.regions.iter_mut().find(|(region_stage, _)| *region_stage == stage) {
            Some((_, region_size)) => {
                let offset = *region_size;
                *region_size += aligned;
                PushConstantSlot { stage, offset, size: aligned }
            }
            None => {
                self.regions.push((stage, aligned));
                PushConstantSlot { stage, offset: 0, size: aligned }
            }
        };

        crate::stellar_debug!(SOURCE, "{:?} constant: {} bytes at +{}", stage, slot.size, slot.offset);
        Ok(slot)
    }

    /// Bytes used by all regions
    pub fn used(&self) -> u32 {
        self.regions.iter().map(|(_, size)| size).sum()
    }

    /// Device limit
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// One range per declared stage, in declaration order
    pub fn ranges(&self) -> Vec<PushConstantRange> {
        let mut offset = 0;
        self.regions
            .iter()
            .map(|&(stage, size)| {
                let range = PushConstantRange { stage, offset, size };
                offset += size;
                range
            })
            .collect()
    }
}

fn align_up(size: u64) -> u64 {
    let alignment = PUSH_CONSTANT_ALIGNMENT as u64;
    size.div_ceil(alignment) * alignment
}

#[cfg(test)]
#[path = "push_constant_tests.rs"]
mod tests;
