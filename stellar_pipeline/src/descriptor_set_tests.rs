//! Unit tests for descriptor_set.rs

use slotmap::SlotMap;
use crate::binding_table::{DescriptorKind, ResourceBindingTable};
use crate::bindless::BindlessIndex;
use crate::descriptor_set::DescriptorSetTemplate;
use crate::device::DeviceCapabilities;
use crate::error::Error;
use crate::handle::{BufferHandle, ImageHandle, SamplerHandle};
use crate::shader::{ShaderStage, ShaderStageFlags};

fn bindless_table(image_count: usize) -> (ResourceBindingTable, Vec<ImageHandle>) {
    let mut buffers: SlotMap<BufferHandle, ()> = SlotMap::with_key();
    let mut image_keys: SlotMap<ImageHandle, ()> = SlotMap::with_key();
    let mut samplers: SlotMap<SamplerHandle, ()> = SlotMap::with_key();
    let images: Vec<ImageHandle> = (0..image_count).map(|_| image_keys.insert(())).collect();

    let mut table = ResourceBindingTable::new(DeviceCapabilities::bindless());
    table.set_uniform_buffer(0, ShaderStage::Vertex, buffers.insert(()), 0).unwrap();
    table.set_bindless_image_array(1, ShaderStage::Fragment, &images).unwrap();
    table.set_sampler(2, ShaderStage::Fragment, samplers.insert(())).unwrap();

    (table, images)
}

#[test]
fn test_layout_mirrors_table() {
    let (table, _) = bindless_table(8);
    let template = DescriptorSetTemplate::from_table(&table);

    let layout = template.layout();
    assert_eq!(layout.len(), 3);

    assert_eq!(layout[0].binding, 0);
    assert_eq!(layout[0].kind, DescriptorKind::UniformBuffer);
    assert_eq!(layout[0].count, 1);
    assert_eq!(layout[0].stage_flags, ShaderStageFlags::VERTEX);
    assert!(!layout[0].variable_count);

    assert_eq!(layout[1].binding, 1);
    assert_eq!(layout[1].kind, DescriptorKind::BindlessImageArray);
    assert_eq!(layout[1].count, 8);
    assert!(layout[1].variable_count);

    assert_eq!(layout[2].kind, DescriptorKind::Sampler);
    assert_eq!(template.bindings().len(), 3);
}

#[test]
fn test_resolve_bindless_by_index() {
    let (table, images) = bindless_table(8);
    let template = DescriptorSetTemplate::from_table(&table);

    assert_eq!(template.resolve_bindless(1, BindlessIndex(5)).unwrap(), images[5]);
    assert_eq!(template.resolve_bindless(1, BindlessIndex(0)).unwrap(), images[0]);
    assert_ne!(
        template.resolve_bindless(1, BindlessIndex(5)).unwrap(),
        template.resolve_bindless(1, BindlessIndex(0)).unwrap()
    );
}

#[test]
fn test_resolve_bindless_out_of_range() {
    let (table, _) = bindless_table(8);
    let template = DescriptorSetTemplate::from_table(&table);

    assert_eq!(
        template.resolve_bindless(1, BindlessIndex(8)),
        Err(Error::BindlessIndexOutOfRange { slot: 1, index: 8, len: 8 })
    );
}

#[test]
fn test_resolve_bindless_on_regular_slot_fails() {
    let (table, _) = bindless_table(2);
    let template = DescriptorSetTemplate::from_table(&table);

    assert!(matches!(
        template.resolve_bindless(0, BindlessIndex(0)),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        template.resolve_bindless(9, BindlessIndex(0)),
        Err(Error::InvalidArgument(_))
    ));
}
