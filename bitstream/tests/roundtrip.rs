use bitstream::{BitReader, BitWriter};

#[test]
fn interleaved_roundtrip() {
    let mut writer = BitWriter::new();
    writer.write_bit(true);
    writer.write_bits(0x1F, 5).unwrap();
    writer.write_signed_bits(-1000, 12).unwrap();
    writer.write_bit(false);
    writer.write_f32(std::f32::consts::PI);
    writer.write_bytes(b"prop");
    writer.write_bits(0xFFF, 12).unwrap();
    let bytes = writer.finish();

    let mut reader = BitReader::new(&bytes);
    assert!(reader.read_bit().unwrap());
    assert_eq!(reader.read_bits(5).unwrap(), 0x1F);
    assert_eq!(reader.read_signed_bits(12).unwrap(), -1000);
    assert!(!reader.read_bit().unwrap());
    assert!((reader.read_f32().unwrap() - std::f32::consts::PI).abs() < f32::EPSILON);
    assert_eq!(reader.read_bytes(4).unwrap(), b"prop");
    assert_eq!(reader.read_bits(12).unwrap(), 0xFFF);
}

#[test]
fn position_tracks_reads() {
    let mut writer = BitWriter::new();
    writer.write_bits(0b101, 3).unwrap();
    writer.write_bits(0xAA, 8).unwrap();
    let bytes = writer.finish();

    let mut reader = BitReader::new(&bytes);
    assert_eq!(reader.bit_position(), 0);
    reader.read_bits(3).unwrap();
    assert_eq!(reader.bit_position(), 3);
    reader.read_bits(8).unwrap();
    assert_eq!(reader.bit_position(), 11);
    assert_eq!(reader.bits_remaining(), 5);
}

#[test]
fn truncated_stream_reports_remaining_bits() {
    let mut writer = BitWriter::new();
    writer.write_bits(0x7, 3).unwrap();
    let bytes = writer.finish();

    let mut reader = BitReader::new(&bytes);
    reader.read_bits(3).unwrap();
    // The padded tail is readable; past it the reader errors.
    let err = reader.read_bits(6).unwrap_err();
    assert!(matches!(
        err,
        bitstream::BitError::EndOfBuffer {
            requested: 6,
            available: 5,
        }
    ));
}
