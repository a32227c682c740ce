//! Unit tests for push_constant.rs

use crate::error::Error;
use crate::push_constant::{PushConstantAllocator, PushConstantRange, PushConstantSlot};
use crate::shader::{ShaderStage, ShaderStageFlags};

// ============================================================================
// ALLOCATION TESTS
// ============================================================================

#[test]
fn test_two_vertex_constants_are_contiguous() {
    let mut alloc = PushConstantAllocator::new(128);

    let first = alloc.add(ShaderStage::Vertex, 64).unwrap();
    let second = alloc.add(ShaderStage::Vertex, 64).unwrap();

    assert_eq!(first, PushConstantSlot { stage: ShaderStage::Vertex, offset: 0, size: 64 });
    assert_eq!(second, PushConstantSlot { stage: ShaderStage::Vertex, offset: 64, size: 64 });
    assert_eq!(alloc.ranges(), vec![
        PushConstantRange { stage: ShaderStage::Vertex, offset: 0, size: 128 },
    ]);
}

#[test]
fn test_stage_regions_do_not_overlap() {
    let mut alloc = PushConstantAllocator::new(128);

    alloc.add(ShaderStage::Vertex, 64).unwrap();
    alloc.add(ShaderStage::Fragment, 4).unwrap();
    let late_vertex = alloc.add(ShaderStage::Vertex, 16).unwrap();

    // Vertex region grows in place; fragment region moves after it
    assert_eq!(late_vertex.offset, 64);
    let ranges = alloc.ranges();
    assert_eq!(ranges.len(), 2);
    assert_eq!(ranges[0], PushConstantRange { stage: ShaderStage::Vertex, offset: 0, size: 80 });
    assert_eq!(ranges[1], PushConstantRange { stage: ShaderStage::Fragment, offset: 80, size: 4 });
    assert!(ranges[0].end() <= ranges[1].offset);
    assert_eq!(ranges[1].stage_flags(), ShaderStageFlags::FRAGMENT);
}

#[test]
fn test_sizes_are_rounded_to_four_bytes() {
    let mut alloc = PushConstantAllocator::new(128);

    let a = alloc.add(ShaderStage::Fragment, 3).unwrap();
    let b = alloc.add(ShaderStage::Fragment, 4).unwrap();

    assert_eq!(a.size, 4);
    assert_eq!(b.offset, 4);
    assert_eq!(alloc.used(), 8);
}

#[test]
fn test_zero_size_is_rejected() {
    let mut alloc = PushConstantAllocator::new(128);
    let result = alloc.add(ShaderStage::Vertex, 0);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert!(alloc.ranges().is_empty());
}

// ============================================================================
// OVERFLOW TESTS
// ============================================================================

#[test]
fn test_overflow_is_detected_at_add() {
    let mut alloc = PushConstantAllocator::new(128);

    alloc.add(ShaderStage::Vertex, 64).unwrap();
    alloc.add(ShaderStage::Vertex, 64).unwrap();
    let result = alloc.add(ShaderStage::Vertex, 4);

    assert_eq!(result, Err(Error::PushConstantRangeOverflow {
        stage: ShaderStage::Vertex,
        requested: 4,
        used: 128,
        limit: 128,
    }));
    assert_eq!(alloc.used(), 128);
    assert_eq!(alloc.used(), alloc.limit());
}

#[test]
fn test_overflow_counts_all_stages() {
    let mut alloc = PushConstantAllocator::new(64);
    assert_eq!(alloc.limit(), 64);

    alloc.add(ShaderStage::Vertex, 60).unwrap();
    let result = alloc.add(ShaderStage::Fragment, 8);

    assert!(matches!(result, Err(Error::PushConstantRangeOverflow { stage: ShaderStage::Fragment, .. })));
    assert_eq!(alloc.ranges().len(), 1);
}

#[test]
fn test_huge_size_does_not_wrap() {
    let mut alloc = PushConstantAllocator::new(128);
    let result = alloc.add(ShaderStage::Vertex, u32::MAX);
    assert!(matches!(result, Err(Error::PushConstantRangeOverflow { .. })));
}
