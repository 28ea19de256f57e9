//! Bundle serialization round-trip and rejection tests.

use inkfont_codec::{
    BitDepth, CodecError, CodepointInterval, FontBundle, GlyphRecord, HEADER_LEN, LineMetrics,
};

fn sample_bundle() -> FontBundle {
    FontBundle {
        metrics: LineMetrics { advance_y: 16, ascender: 12, descender: -4 },
        bit_depth: BitDepth::Two,
        intervals: vec![CodepointInterval { first: 0x41, last: 0x42, glyph_offset: 0 }],
        glyphs: vec![
            GlyphRecord {
                width: 2,
                height: 2,
                advance_x: 3,
                left: 0,
                top: 2,
                data_length: 1,
                data_offset: 0,
            },
            GlyphRecord {
                width: 1,
                height: 1,
                advance_x: 2,
                left: -1,
                top: 1,
                data_length: 1,
                data_offset: 1,
            },
        ],
        bitmap: vec![0xE4, 0xC0],
    }
}

#[rustfmt::skip]
const SAMPLE_BYTES: &[u8] = &[
    // magic + header
    0x43, 0x50, 0x46, 0x01,                         // "CPF\x01"
    0x10,                                           // advanceY 16
    0x0C, 0x00, 0x00, 0x00,                         // ascender 12
    0xFC, 0xFF, 0xFF, 0xFF,                         // descender -4
    0x01,                                           // 2-bit flag
    0x01, 0x00, 0x00, 0x00,                         // interval count
    0x02, 0x00, 0x00, 0x00,                         // glyph count
    0x02, 0x00, 0x00, 0x00,                         // bitmap size
    // interval table
    0x41, 0x00, 0x00, 0x00, 0x42, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // glyph table
    0x02, 0x02, 0x03, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x01, 0x01, 0x02, 0x00, 0xFF, 0xFF, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00,
    0x01, 0x00, 0x00, 0x00,
    // bitmap payload
    0xE4, 0xC0,
];

#[test]
fn encodes_to_exact_layout() {
    let encoded = sample_bundle().encode().unwrap();
    assert_eq!(encoded.len(), sample_bundle().encoded_len());
    assert_eq!(encoded, SAMPLE_BYTES);
}

#[test]
fn encoding_is_deterministic() {
    assert_eq!(sample_bundle().encode().unwrap(), sample_bundle().encode().unwrap());
}

#[test]
fn decode_reproduces_every_field() {
    let bundle = sample_bundle();
    let decoded = FontBundle::decode(&bundle.encode().unwrap()).unwrap();
    assert_eq!(decoded, bundle);
}

#[test]
fn empty_tables_round_trip() {
    let bundle = FontBundle {
        metrics: LineMetrics { advance_y: 10, ascender: 8, descender: -2 },
        bit_depth: BitDepth::One,
        intervals: vec![],
        glyphs: vec![],
        bitmap: vec![],
    };
    let encoded = bundle.encode().unwrap();
    assert_eq!(encoded.len(), HEADER_LEN);
    assert_eq!(FontBundle::decode(&encoded).unwrap(), bundle);
}

#[test]
fn rejects_bad_magic() {
    let mut bytes = sample_bundle().encode().unwrap();
    bytes[0] = b'X';
    assert!(matches!(FontBundle::decode(&bytes), Err(CodecError::BadMagic)));
}

#[test]
fn rejects_truncation() {
    let bytes = sample_bundle().encode().unwrap();
    assert!(matches!(
        FontBundle::decode(&bytes[..bytes.len() - 1]),
        Err(CodecError::LengthMismatch { .. })
    ));
}

#[test]
fn rejects_trailing_garbage() {
    let mut bytes = sample_bundle().encode().unwrap();
    bytes.push(0);
    assert!(matches!(FontBundle::decode(&bytes), Err(CodecError::LengthMismatch { .. })));
}

#[test]
fn rejects_unknown_bit_depth_flag() {
    let mut bytes = sample_bundle().encode().unwrap();
    bytes[13] = 2;
    assert!(matches!(FontBundle::decode(&bytes), Err(CodecError::Inconsistent(_))));
}

#[test]
fn encode_refuses_inconsistent_bundle() {
    let mut bundle = sample_bundle();
    bundle.intervals[0].glyph_offset = 1;
    assert!(matches!(bundle.encode(), Err(CodecError::Inconsistent(_))));
}
