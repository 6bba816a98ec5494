//! World-space position reconstruction from cell properties.

use std::sync::Arc;

use bitstream::{BitReader, BitWriter};
use entity::{
    encode_value, write_field_index, write_field_list_end, DecodeLimits, Entity, EntityError,
    IndexPool, PropertyValue, Vector,
};
use schema::{FloatCodec, PropCodec, PropEntry, ServerClass};

fn positioned_class() -> Arc<ServerClass> {
    Arc::new(
        ServerClass::builder(12, "CDynamicProp")
            .entry(PropEntry::new("m_cellbits", PropCodec::int(6)))
            .entry(PropEntry::new("m_cellX", PropCodec::int(16)))
            .entry(PropEntry::new("m_cellY", PropCodec::int(16)))
            .entry(PropEntry::new("m_cellZ", PropCodec::int(16)))
            .entry(PropEntry::new(
                "m_vecOrigin",
                PropCodec::vector(FloatCodec::Raw),
            ))
            .build()
            .unwrap(),
    )
}

fn apply(entity: &mut Entity, updates: &[(usize, PropertyValue)]) {
    let mut writer = BitWriter::new();
    writer.write_bit(true);
    let mut last = None;
    for &(index, _) in updates {
        write_field_index(&mut writer, last, index, true).unwrap();
        last = Some(index);
    }
    write_field_list_end(&mut writer, true).unwrap();
    for (index, value) in updates {
        encode_value(&entity.class().entries()[*index].codec, value, &mut writer).unwrap();
    }
    let bytes = writer.finish();
    let mut reader = BitReader::new(&bytes);
    entity
        .apply_update(&mut reader, &IndexPool::new(), &DecodeLimits::default())
        .unwrap();
}

#[test]
fn position_from_cell_and_offset() {
    let mut prop = Entity::new(positioned_class(), 90);
    apply(
        &mut prop,
        &[
            (0, PropertyValue::Int(5)),
            (1, PropertyValue::Int(10)),
            (2, PropertyValue::Int(0)),
            (3, PropertyValue::Int(0)),
            (4, PropertyValue::Vector(Vector::new(1.5, 0.0, 0.0))),
        ],
    );

    // Cell width 32: x = 10 * 32 - 16384 + 1.5.
    let position = prop.position().unwrap();
    assert_eq!(position, Vector::new(-16062.5, -16384.0, -16384.0));
}

#[test]
fn position_at_grid_center() {
    let mut prop = Entity::new(positioned_class(), 90);
    apply(
        &mut prop,
        &[
            (0, PropertyValue::Int(5)),
            (1, PropertyValue::Int(512)),
            (2, PropertyValue::Int(512)),
            (3, PropertyValue::Int(512)),
            (4, PropertyValue::Vector(Vector::ZERO)),
        ],
    );

    assert_eq!(prop.position().unwrap(), Vector::new(0.0, 0.0, 0.0));
}

#[test]
fn position_without_cell_props_is_missing_property() {
    let class = Arc::new(
        ServerClass::builder(13, "CNoCell")
            .entry(PropEntry::new("m_iHealth", PropCodec::int(10)))
            .build()
            .unwrap(),
    );
    let bare = Entity::new(class, 1);
    let err = bare.position().unwrap_err();
    assert!(matches!(err, EntityError::MissingProperty { .. }));
}

#[test]
fn position_with_huge_cell_exponent_is_rejected() {
    let class = Arc::new(
        ServerClass::builder(14, "CBadCell")
            .entry(PropEntry::new("m_cellbits", PropCodec::int(32)))
            .entry(PropEntry::new("m_cellX", PropCodec::int(16)))
            .entry(PropEntry::new("m_cellY", PropCodec::int(16)))
            .entry(PropEntry::new("m_cellZ", PropCodec::int(16)))
            .entry(PropEntry::new(
                "m_vecOrigin",
                PropCodec::vector(FloatCodec::Raw),
            ))
            .build()
            .unwrap(),
    );
    let mut prop = Entity::new(class, 1);
    apply(&mut prop, &[(0, PropertyValue::Int(63))]);

    let err = prop.position().unwrap_err();
    assert!(matches!(
        err,
        EntityError::InvalidCellExponent { exponent: 63 }
    ));
}
