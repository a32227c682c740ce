//! Unit tests for vertex.rs
//!
//! Tests element kind constants, tag parsing, the layout calculator and
//! vertex declarations.

use crate::error::Error;
use crate::vertex::{
    element_kinds, VertexDeclaration, VertexElementKind, VertexField, VertexFormat,
    VertexLayoutCalculator,
};

// ============================================================================
// HELPERS
// ============================================================================

struct VertexPositionTexture;

impl VertexDeclaration for VertexPositionTexture {
    const FIELDS: &'static [VertexField] = &[
        VertexField::tagged("position", "position"),
        VertexField::untagged("padding"),
        VertexField::tagged("uv", "texcoord"),
    ];
}

struct VertexWithTangent;

impl VertexDeclaration for VertexWithTangent {
    const FIELDS: &'static [VertexField] = &[
        VertexField::tagged("position", "position"),
        VertexField::tagged("tangent", "tangent"),
    ];
}

// ============================================================================
// ELEMENT KIND TESTS
// ============================================================================

#[test]
fn test_element_kind_sizes() {
    assert_eq!(VertexElementKind::Position.size_bytes(), 12);
    assert_eq!(VertexElementKind::Normal.size_bytes(), 12);
    assert_eq!(VertexElementKind::TextureCoordinate.size_bytes(), 8);
    assert_eq!(VertexElementKind::Color.size_bytes(), 12);
}

#[test]
fn test_element_kind_formats_match_sizes() {
    for kind in [
        VertexElementKind::Position,
        VertexElementKind::Normal,
        VertexElementKind::TextureCoordinate,
        VertexElementKind::Color,
    ] {
        assert_eq!(kind.format().size_bytes(), kind.size_bytes());
    }
    assert_eq!(VertexElementKind::TextureCoordinate.format(), VertexFormat::R32G32_SFLOAT);
    assert_eq!(VertexElementKind::Position.format(), VertexFormat::R32G32B32_SFLOAT);
}

#[test]
fn test_parse_known_tags() {
    assert_eq!("position".parse::<VertexElementKind>().unwrap(), VertexElementKind::Position);
    assert_eq!("Normal".parse::<VertexElementKind>().unwrap(), VertexElementKind::Normal);
    assert_eq!("uv".parse::<VertexElementKind>().unwrap(), VertexElementKind::TextureCoordinate);
    assert_eq!("TEXCOORD".parse::<VertexElementKind>().unwrap(), VertexElementKind::TextureCoordinate);
    assert_eq!("colour".parse::<VertexElementKind>().unwrap(), VertexElementKind::Color);
}

#[test]
fn test_parse_unknown_tag_fails() {
    let result = "tangent".parse::<VertexElementKind>();
    assert_eq!(result, Err(Error::UnsupportedVertexElement("tangent".to_string())));
}

#[test]
fn test_element_kind_from_raw_id() {
    assert_eq!(VertexElementKind::try_from(0).unwrap(), VertexElementKind::Position);
    assert_eq!(VertexElementKind::try_from(3).unwrap(), VertexElementKind::Color);
    assert!(matches!(
        VertexElementKind::try_from(4),
        Err(Error::UnsupportedVertexElement(_))
    ));
}

// ============================================================================
// CALCULATOR TESTS
// ============================================================================

#[test]
fn test_position_then_texcoord() {
    let mut calc = VertexLayoutCalculator::new();

    let position = calc.add_attribute(VertexElementKind::Position, 0);
    let uv = calc.add_attribute(VertexElementKind::TextureCoordinate, 0);

    assert_eq!(position.location, 0);
    assert_eq!(position.offset, 0);
    assert_eq!(position.format, VertexFormat::R32G32B32_SFLOAT);

    assert_eq!(uv.location, 1);
    assert_eq!(uv.offset, 12);
    assert_eq!(uv.format, VertexFormat::R32G32_SFLOAT);

    assert_eq!(calc.extent(0), 20);
}

#[test]
fn test_locations_follow_call_order_and_offsets_are_per_binding() {
    let mut calc = VertexLayoutCalculator::new();
    let sequence = [
        (VertexElementKind::Position, 0),
        (VertexElementKind::Color, 1),
        (VertexElementKind::Normal, 0),
        (VertexElementKind::TextureCoordinate, 1),
        (VertexElementKind::TextureCoordinate, 0),
    ];

    let mut expected_offsets = [0u32; 2];
    for (index, (kind, binding)) in sequence.iter().enumerate() {
        let attribute = calc.add_attribute(*kind, *binding);
        assert_eq!(attribute.location, index as u32);
        assert_eq!(attribute.binding, *binding);
        assert_eq!(attribute.offset, expected_offsets[*binding as usize]);
        expected_offsets[*binding as usize] += kind.size_bytes();
    }

    assert_eq!(calc.extent(0), 12 + 12 + 8);
    assert_eq!(calc.extent(1), 12 + 8);
    assert_eq!(calc.extent(7), 0);
    assert_eq!(calc.next_location(), 5);
}

#[test]
fn test_duplicate_kinds_are_not_deduplicated() {
    let mut calc = VertexLayoutCalculator::new();
    let first = calc.add_attribute(VertexElementKind::TextureCoordinate, 0);
    let second = calc.add_attribute(VertexElementKind::TextureCoordinate, 0);

    assert_eq!(first.location, 0);
    assert_eq!(second.location, 1);
    assert_eq!(second.offset, 8);
}

#[test]
fn test_tagged_attribute_failure_leaves_counters_untouched() {
    let mut calc = VertexLayoutCalculator::new();
    calc.add_attribute(VertexElementKind::Position, 0);

    let result = calc.add_attribute_tagged("bitangent", 0);
    assert!(matches!(result, Err(Error::UnsupportedVertexElement(_))));
    assert_eq!(calc.next_location(), 1);
    assert_eq!(calc.extent(0), 12);

    let uv = calc.add_attribute_tagged("texcoord", 0).unwrap();
    assert_eq!(uv.location, 1);
    assert_eq!(uv.offset, 12);
}

// ============================================================================
// VERTEX DECLARATION TESTS
// ============================================================================

#[test]
fn test_element_kinds_skip_untagged_fields() {
    let kinds = element_kinds::<VertexPositionTexture>().unwrap();
    assert_eq!(kinds, vec![VertexElementKind::Position, VertexElementKind::TextureCoordinate]);
}

#[test]
fn test_element_kinds_unrecognized_tag_fails() {
    let result = element_kinds::<VertexWithTangent>();
    match result {
        Err(Error::UnsupportedVertexElement(msg)) => {
            assert!(msg.contains("tangent"));
        }
        other => panic!("expected UnsupportedVertexElement, got {:?}", other),
    }
}
