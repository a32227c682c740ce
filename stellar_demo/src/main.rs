//! Bindless cubes
//!
//! Builds a textured-cube pipeline whose fragment stage picks its texture
//! from a bindless array through a push constant, then runs one frame of
//! draws against the in-memory device.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use stellar_pipeline::stellar::vertex::{VertexDeclaration, VertexField, VertexInputRate};
use stellar_pipeline::stellar::{
    push_constant_value, BindlessIndex, DeviceCapabilities, GraphicsDevice, ImageHandle,
    MockGraphicsDevice, PipelineDescriptionBuilder, Result, ShaderBytecode, ShaderStage,
};
use stellar_pipeline::stellar_info;

const SOURCE: &str = "stellar::Demo";
const TEXTURE_COUNT: u32 = 8;
const CUBE_COUNT: u32 = 24;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct VertexPositionTexture {
    position: [f32; 3],
    uv: [f32; 2],
}

impl VertexDeclaration for VertexPositionTexture {
    const FIELDS: &'static [VertexField] = &[
        VertexField::tagged("position", "position"),
        VertexField::tagged("uv", "texcoord"),
    ];
}

/// One face of a unit cube (the other five are rotations of it)
const FACE: [VertexPositionTexture; 6] = [
    VertexPositionTexture { position: [-0.5, -0.5, 0.5], uv: [0.0, 1.0] },
    VertexPositionTexture { position: [0.5, -0.5, 0.5], uv: [1.0, 1.0] },
    VertexPositionTexture { position: [0.5, 0.5, 0.5], uv: [1.0, 0.0] },
    VertexPositionTexture { position: [-0.5, -0.5, 0.5], uv: [0.0, 1.0] },
    VertexPositionTexture { position: [0.5, 0.5, 0.5], uv: [1.0, 0.0] },
    VertexPositionTexture { position: [-0.5, 0.5, 0.5], uv: [0.0, 0.0] },
];

fn cube_vertices() -> Vec<VertexPositionTexture> {
    let rotations = [
        Quat::IDENTITY,
        Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        Quat::from_rotation_y(std::f32::consts::PI),
        Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2),
        Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
        Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
    ];

    rotations
        .iter()
        .flat_map(|rotation| {
            FACE.iter().map(move |vertex| VertexPositionTexture {
                position: (*rotation * Vec3::from(vertex.position)).to_array(),
                uv: vertex.uv,
            })
        })
        .collect()
}

fn main() -> Result<()> {
    let mut device = MockGraphicsDevice::new(DeviceCapabilities::bindless());

    // ===== RESOURCES =====

    let vertices = cube_vertices();
    let vertex_bytes: &[u8] = bytemuck::cast_slice(&vertices);
    let _vertex_buffer = device.create_buffer("cube_vertices", vertex_bytes.len() as u64);

    let framebuffer = device.create_framebuffer("swapchain");
    let camera = device.create_buffer("camera", std::mem::size_of::<Mat4>() as u64 * 2);
    let sampler = device.create_sampler("linear_repeat");
    let textures: Vec<ImageHandle> = (0..TEXTURE_COUNT)
        .map(|i| device.create_image(&format!("crate_{}", i), 256, 256))
        .collect();

    // ===== PIPELINE =====

    let mut builder = PipelineDescriptionBuilder::new(device.capabilities());
    builder
        .set_framebuffer(framebuffer)
        .add_shader_stage(ShaderBytecode::new(ShaderStage::Vertex, placeholder_spirv()))
        .add_shader_stage(ShaderBytecode::new(ShaderStage::Fragment, placeholder_spirv()))
        .add_vertex_binding(
            0,
            VertexInputRate::Vertex,
            std::mem::size_of::<VertexPositionTexture>() as u32,
        );
    builder.add_vertex_attributes_from::<VertexPositionTexture>(0)?;
    builder
        .set_uniform_buffer(0, ShaderStage::Vertex, camera, 0)?
        .set_bindless_image_array(1, ShaderStage::Fragment, &textures)?
        .set_sampler(2, ShaderStage::Fragment, sampler)?;
    let model_slot = builder.add_push_constant(ShaderStage::Vertex, std::mem::size_of::<Mat4>() as u32)?;
    let texture_slot = builder.add_push_constant(ShaderStage::Fragment, std::mem::size_of::<BindlessIndex>() as u32)?;

    let description = builder.build()?;
    let pipeline = device.compile_pipeline(&description)?;
    device.bind_descriptor_set(pipeline, &description.descriptor_set_template())?;

    // ===== DRAW =====

    for cube in 0..CUBE_COUNT {
        let angle = cube as f32 / CUBE_COUNT as f32 * std::f32::consts::TAU;
        let model = Mat4::from_rotation_translation(
            Quat::from_rotation_y(angle),
            Vec3::new(angle.cos() * 6.0, 0.0, angle.sin() * 6.0),
        );
        let texture = BindlessIndex::new(cube % TEXTURE_COUNT);

        push_constant_value(&mut device, pipeline, &description, &model_slot, &model)?;
        push_constant_value(&mut device, pipeline, &description, &texture_slot, &texture)?;

        let sampled = device.sampled_image(ShaderStage::Fragment, 1, &texture_slot)?;
        let name = device.image(sampled).map(|image| image.name.as_str()).unwrap_or("?");
        stellar_info!(SOURCE, "cube {:2} samples {}", cube, name);
    }

    stellar_info!(SOURCE, "{} device calls recorded", device.commands.len());
    Ok(())
}

/// SPIR-V magic number, standing in for compiled shader modules
fn placeholder_spirv() -> Vec<u8> {
    0x0723_0203u32.to_le_bytes().to_vec()
}
