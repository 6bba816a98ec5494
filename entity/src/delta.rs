//! Field index delta coding.
//!
//! An update record names its changed properties as a strictly ascending
//! index sequence. Each index is sent as a prefix-coded variable-length
//! delta from the previous one, terminated by the reserved offset `0xFFF`.
//! Under the `new_way` stream flag a single bit encodes the consecutive
//! index case, which dominates bulk updates.

use bitstream::{BitReader, BitWriter};

use crate::error::{EntityError, EntityResult};

/// Raw offset reserved as the end-of-list marker.
const FIELD_INDEX_END: u64 = 0xFFF;

/// Decodes the next changed property index.
///
/// `last` is the previously decoded index (`None` at the start of a record).
/// Returns `Ok(None)` when the end-of-list marker is read.
pub fn read_field_index(
    reader: &mut BitReader<'_>,
    last: Option<usize>,
    new_way: bool,
) -> EntityResult<Option<usize>> {
    if new_way && reader.read_bit()? {
        // Consecutive-index shortcut.
        return Ok(Some(next_index(last, 0)));
    }

    let offset = if new_way && reader.read_bit()? {
        reader.read_bits(3)?
    } else {
        let raw = reader.read_bits(7)?;
        match raw & 0x60 {
            0x20 => (raw & !0x60) | (reader.read_bits(2)? << 5),
            0x40 => (raw & !0x60) | (reader.read_bits(4)? << 5),
            0x60 => (raw & !0x60) | (reader.read_bits(7)? << 5),
            _ => raw,
        }
    };

    if offset == FIELD_INDEX_END {
        return Ok(None);
    }
    Ok(Some(next_index(last, offset as usize)))
}

/// Encodes the next changed property index.
///
/// The mirror of [`read_field_index`]; `index` must ascend strictly past
/// `last`, and the resulting delta must stay below the reserved marker.
pub fn write_field_index(
    writer: &mut BitWriter,
    last: Option<usize>,
    index: usize,
    new_way: bool,
) -> EntityResult<()> {
    let floor = next_index(last, 0);
    if index < floor {
        return Err(EntityError::IndexNotAscending {
            previous: last.unwrap_or(0),
            index,
        });
    }
    let delta = index - floor;
    if delta as u64 >= FIELD_INDEX_END {
        return Err(EntityError::DeltaOutOfRange { delta });
    }

    if new_way {
        if delta == 0 {
            writer.write_bit(true);
            return Ok(());
        }
        writer.write_bit(false);
        if delta < 8 {
            writer.write_bit(true);
            writer.write_bits(delta as u64, 3)?;
            return Ok(());
        }
        writer.write_bit(false);
    }
    write_offset(writer, delta as u64)
}

/// Encodes the end-of-list marker that terminates an index sequence.
pub fn write_field_list_end(writer: &mut BitWriter, new_way: bool) -> EntityResult<()> {
    if new_way {
        writer.write_bit(false);
        writer.write_bit(false);
    }
    write_offset(writer, FIELD_INDEX_END)
}

const fn next_index(last: Option<usize>, delta: usize) -> usize {
    match last {
        Some(index) => index + 1 + delta,
        None => delta,
    }
}

/// Writes a raw offset in the 7-bit form with its extension patterns.
fn write_offset(writer: &mut BitWriter, offset: u64) -> EntityResult<()> {
    let low = offset & 0x1F;
    let high = offset >> 5;
    if high == 0 {
        writer.write_bits(low, 7)?;
    } else if high < 4 {
        writer.write_bits(low | 0x20, 7)?;
        writer.write_bits(high, 2)?;
    } else if high < 16 {
        writer.write_bits(low | 0x40, 7)?;
        writer.write_bits(high, 4)?;
    } else {
        writer.write_bits(low | 0x60, 7)?;
        writer.write_bits(high, 7)?;
    }
    Ok(())
}
