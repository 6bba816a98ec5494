//! Baseline capture and re-application.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use bitstream::{BitReader, BitWriter};
use entity::{
    encode_value, write_field_index, write_field_list_end, DecodeLimits, Entity, IndexPool,
    PropertyValue,
};
use schema::{PropCodec, PropEntry, ServerClass};

fn weapon_class() -> Arc<ServerClass> {
    Arc::new(
        ServerClass::builder(55, "CWeaponAK47")
            .entry(PropEntry::new("m_iClip1", PropCodec::int(8)))
            .entry(PropEntry::new("m_iPrimaryReserve", PropCodec::int(10)))
            .entry(PropEntry::new("m_szPrintName", PropCodec::string()))
            .build()
            .unwrap(),
    )
}

fn author_update(class: &ServerClass, updates: &[(usize, PropertyValue)]) -> Vec<u8> {
    let mut writer = BitWriter::new();
    writer.write_bit(true);
    let mut last = None;
    for &(index, _) in updates {
        write_field_index(&mut writer, last, index, true).unwrap();
        last = Some(index);
    }
    write_field_list_end(&mut writer, true).unwrap();
    for (index, value) in updates {
        encode_value(&class.entries()[*index].codec, value, &mut writer).unwrap();
    }
    writer.finish()
}

#[test]
fn captured_baseline_holds_touched_values_only() {
    let class = weapon_class();
    let bytes = author_update(
        &class,
        &[
            (0, PropertyValue::Int(30)),
            (2, PropertyValue::String("AK-47".to_owned())),
        ],
    );

    let mut scratch = Entity::new(Arc::clone(&class), 0);
    let mut reader = BitReader::new(&bytes);
    let baseline = scratch
        .capture_baseline(&mut reader, &IndexPool::new(), &DecodeLimits::default())
        .unwrap();

    assert_eq!(baseline.len(), 2);
    assert_eq!(baseline.get(0), Some(&PropertyValue::Int(30)));
    assert_eq!(baseline.get(1), None);
    assert_eq!(
        baseline.get(2),
        Some(&PropertyValue::String("AK-47".to_owned()))
    );
}

#[test]
fn capture_removes_all_handlers_including_preexisting() {
    let class = weapon_class();
    let bytes = author_update(&class, &[(0, PropertyValue::Int(30))]);

    let mut scratch = Entity::new(Arc::clone(&class), 0);
    let fired = Rc::new(Cell::new(0));
    let sink = Rc::clone(&fired);
    scratch
        .find_property_mut("m_iClip1")
        .unwrap()
        .unwrap()
        .on_update(move |_| sink.set(sink.get() + 1));

    let mut reader = BitReader::new(&bytes);
    scratch
        .capture_baseline(&mut reader, &IndexPool::new(), &DecodeLimits::default())
        .unwrap();
    // The pre-existing observer fired during capture.
    assert_eq!(fired.get(), 1);

    // A later direct update no longer reaches it.
    let bytes = author_update(&class, &[(0, PropertyValue::Int(29))]);
    let mut reader = BitReader::new(&bytes);
    scratch
        .apply_update(&mut reader, &IndexPool::new(), &DecodeLimits::default())
        .unwrap();
    assert_eq!(fired.get(), 1);
}

#[test]
fn apply_baseline_matches_decoding_but_fires_nothing() {
    let class = weapon_class();
    let updates = [
        (0, PropertyValue::Int(30)),
        (1, PropertyValue::Int(90)),
        (2, PropertyValue::String("AK-47".to_owned())),
    ];
    let bytes = author_update(&class, &updates);

    let mut scratch = Entity::new(Arc::clone(&class), 0);
    let mut reader = BitReader::new(&bytes);
    let baseline = scratch
        .capture_baseline(&mut reader, &IndexPool::new(), &DecodeLimits::default())
        .unwrap();

    // Decode the same record directly on a second entity.
    let mut decoded = Entity::new(Arc::clone(&class), 1);
    let mut reader = BitReader::new(&bytes);
    decoded
        .apply_update(&mut reader, &IndexPool::new(), &DecodeLimits::default())
        .unwrap();

    // Seed a third entity from the baseline, with an observer attached.
    let mut seeded = Entity::new(Arc::clone(&class), 2);
    let fired = Rc::new(Cell::new(0));
    let sink = Rc::clone(&fired);
    seeded
        .find_property_mut("m_iClip1")
        .unwrap()
        .unwrap()
        .on_update(move |_| sink.set(sink.get() + 1));
    seeded.apply_baseline(&baseline).unwrap();

    assert_eq!(fired.get(), 0, "baseline seeding must not fire observers");
    for (a, b) in decoded.properties().iter().zip(seeded.properties()) {
        assert_eq!(a.value(), b.value(), "property {}", a.name());
    }
}

#[test]
fn baseline_applies_to_many_instances() {
    let class = weapon_class();
    let bytes = author_update(&class, &[(1, PropertyValue::Int(120))]);

    let mut scratch = Entity::new(Arc::clone(&class), 0);
    let mut reader = BitReader::new(&bytes);
    let baseline = scratch
        .capture_baseline(&mut reader, &IndexPool::new(), &DecodeLimits::default())
        .unwrap();

    for id in 1..=4 {
        let mut instance = Entity::new(Arc::clone(&class), id);
        instance.apply_baseline(&baseline).unwrap();
        assert_eq!(
            instance
                .find_property("m_iPrimaryReserve")
                .unwrap()
                .unwrap()
                .value(),
            &PropertyValue::Int(120)
        );
    }
}
