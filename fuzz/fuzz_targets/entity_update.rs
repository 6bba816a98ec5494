#![no_main]

use std::sync::Arc;

use bitstream::BitReader;
use entity::{DecodeLimits, Entity, IndexPool};
use libfuzzer_sys::fuzz_target;
use schema::{FloatCodec, PropCodec, PropEntry, ServerClass};

fn mixed_class() -> Arc<ServerClass> {
    Arc::new(
        ServerClass::builder(1, "CFuzzEntity")
            .entry(PropEntry::new("m_iHealth", PropCodec::int(10)))
            .entry(PropEntry::new("m_iAccount", PropCodec::sint(16)))
            .entry(PropEntry::new(
                "m_flStamina",
                PropCodec::quantized_float(10, 0.0, 100.0),
            ))
            .entry(PropEntry::new("m_szName", PropCodec::string()))
            .entry(PropEntry::new(
                "m_vecOrigin",
                PropCodec::vector(FloatCodec::Raw),
            ))
            .entry(PropEntry::new(
                "m_iAmmo",
                PropCodec::array(8, PropCodec::int(9)),
            ))
            .build()
            .unwrap(),
    )
}

fuzz_target!(|data: &[u8]| {
    let class = mixed_class();
    let pool = IndexPool::new();
    let limits = DecodeLimits::for_testing();

    // Every byte slice is a candidate update record; decoding may fail but
    // must never panic or leave the pool unusable.
    let mut target = Entity::new(Arc::clone(&class), 1);
    let mut reader = BitReader::new(data);
    let _ = target.apply_update(&mut reader, &pool, &limits);

    let mut scratch = Entity::new(class, 2);
    let mut reader = BitReader::new(data);
    if let Ok(baseline) = scratch.capture_baseline(&mut reader, &pool, &limits) {
        let _ = target.apply_baseline(&baseline);
    }
});
