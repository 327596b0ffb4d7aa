use super::*;

#[test]
fn test_simple_integer_writing() {
    let mut writer_builder = BinaryWriterBuilder::new();

    writer_builder.push_bits(5, 3);
    writer_builder.push_bits(10, 4);
    writer_builder.push_bits(5, 3);

    let written = writer_builder.build().os;
    let mut binary_reader = BinaryReader::new(written);

    assert_eq!(binary_reader.read_int(3).unwrap(), 5);
    assert_eq!(binary_reader.read_int(4).unwrap(), 10);
    assert_eq!(binary_reader.read_int(3).unwrap(), 5);
}

#[test]
fn test_msb_first_packing() {
    let written = BinaryWriter::pack([true, false, true, true, false, false, false, true, true]);

    assert_eq!(written.os.as_ref(), &[0b1011_0001, 0b1000_0000]);
    assert_eq!(written.written_bits, 9);
}

#[test]
fn test_no_trailing_byte_when_aligned() {
    let mut writer_builder = BinaryWriterBuilder::new();

    writer_builder.push_bits(0xAB, 8);
    writer_builder.push_bits(0xCD, 8);

    let written = writer_builder.build();

    assert_eq!(written.os.as_ref(), &[0xAB, 0xCD]);
    assert_eq!(written.written_bits, 16);
}

#[test]
fn test_empty_stream() {
    let written = BinaryWriterBuilder::new().build();

    assert!(written.is_empty());
    assert_eq!(written.written_bits, 0);
}

#[test]
fn test_push_bits_across_byte_boundary() {
    let mut writer_builder = BinaryWriterBuilder::new();

    writer_builder.push_bits(0b101, 3);
    writer_builder.push_bits(0x3FF, 10);
    writer_builder.push_bits(u64::MAX, 64);

    assert_eq!(writer_builder.written_bits, 77);

    let mut binary_reader = BinaryReader::new(writer_builder.build().os);

    assert_eq!(binary_reader.read_int(3).unwrap(), 0b101);
    assert_eq!(binary_reader.read_int(10).unwrap(), 0x3FF);
    assert_eq!(binary_reader.read_int(64).unwrap(), u64::MAX);
    assert_eq!(binary_reader.read_bits, 77);
}

#[test]
fn test_read_past_end_is_truncation() {
    let mut binary_reader = BinaryReader::new(vec![0xFF].into_boxed_slice());

    assert_eq!(binary_reader.read_int(8).unwrap(), 0xFF);
    assert!(binary_reader.is_exhausted());
    assert!(matches!(
        binary_reader.read_bit(),
        Err(CodecError::TruncatedStream { read_bits: 8 })
    ));
}

#[test]
fn test_partial_int_read_is_truncation() {
    let mut binary_reader = BinaryReader::new(vec![0x0F].into_boxed_slice());

    binary_reader.read_int(4).unwrap();

    assert!(matches!(
        binary_reader.read_int(8),
        Err(CodecError::TruncatedStream { read_bits: 8 })
    ));
}

#[test]
fn test_reposition() {
    let written = BinaryWriter::pack((0..24).map(|i| i % 3 == 0));
    let mut binary_reader = BinaryReader::new(written.os);

    binary_reader.set_position(9);
    assert_eq!(binary_reader.bit_position(), 9);
    assert_eq!(binary_reader.position, 1);
    assert_eq!(binary_reader.bit_index, 6);
    assert!(binary_reader.read_bit().unwrap());
    assert!(!binary_reader.read_bit().unwrap());

    binary_reader.set_position(0);
    assert!(binary_reader.read_bit().unwrap());
}

#[test]
fn test_cursor_in_the_middle_of_a_byte() {
    let mut binary_reader = BinaryReader::with_cursor(vec![0b0000_0100, 0b1000_0000].into_boxed_slice(), 0, 2);

    assert!(binary_reader.read_bit().unwrap());
    assert!(!binary_reader.read_bit().unwrap());
    assert!(!binary_reader.read_bit().unwrap());
    assert_eq!(binary_reader.position, 1);
    assert!(binary_reader.read_bit().unwrap());
}

#[test]
fn test_reader_iterates_bits() {
    let bits = vec![true, true, false, true, false, false, true, false, true, true];
    let written = BinaryWriter::pack(bits.clone());

    let read: Vec<bool> = BinaryReader::new(written.os).take(bits.len()).collect();

    assert_eq!(read, bits);
}
