//! Property tests for the CIP value codec

#![allow(clippy::disallowed_methods)] // Integration test - unwrap is acceptable

use proptest::prelude::*;
use voltage_cip::{element_width, CipNumber, CipType, CipValue, DeviceContext};

/// Fixed-width numeric kinds (BITS is bit-addressed and checked separately)
const FIXED_NUMERIC: [CipType; 11] = [
    CipType::Bool,
    CipType::Sint,
    CipType::Int,
    CipType::Dint,
    CipType::Lint,
    CipType::Usint,
    CipType::Uint,
    CipType::Udint,
    CipType::Ulint,
    CipType::Real,
    CipType::Lreal,
];

fn fixed_kind() -> impl Strategy<Value = CipType> {
    prop::sample::select(FIXED_NUMERIC.to_vec())
}

fn device() -> impl Strategy<Value = DeviceContext> {
    prop_oneof![Just(DeviceContext::rockwell()), Just(DeviceContext::omron())]
}

/// Kind, device, and a payload holding 1..=16 whole elements
fn numeric_payload() -> impl Strategy<Value = (CipType, DeviceContext, Vec<u8>)> {
    (fixed_kind(), device(), 1usize..=16).prop_flat_map(|(kind, ctx, count)| {
        let len = count * element_width(kind, &ctx);
        (Just(kind), Just(ctx), prop::collection::vec(any::<u8>(), len))
    })
}

proptest! {
    #[test]
    fn prop_numeric_decode_encode_round_trip((kind, ctx, payload) in numeric_payload()) {
        let value = CipValue::from_wire_bytes(kind, &payload, &ctx).unwrap();
        let width = element_width(kind, &ctx);
        prop_assert_eq!(value.element_count(), Some((payload.len() / width) as u16));

        let wire = value.to_bytes().unwrap();
        prop_assert_eq!(wire.len(), value.encoded_size());
        prop_assert_eq!(&wire[4..], &payload[..]);

        let decoded = CipValue::from_wire(&wire, &ctx).unwrap();
        prop_assert_eq!(&decoded, &value);
    }

    #[test]
    fn prop_empty_then_set_round_trip(
        kind in fixed_kind(),
        ctx in device(),
        values in prop::collection::vec(any::<i32>(), 1..8),
    ) {
        let mut value = CipValue::new_empty(kind, values.len() as u16, &ctx).unwrap();
        for (i, v) in values.iter().enumerate() {
            value.set(i, *v).unwrap();
        }
        let decoded = CipValue::from_wire(&value.to_bytes().unwrap(), &ctx).unwrap();
        prop_assert_eq!(&decoded, &value);
        prop_assert_eq!(decoded.to_string(), value.to_string());
    }

    #[test]
    fn prop_set_truncates_to_native_width(v in any::<i64>(), f in -1.0e6f64..1.0e6) {
        let ctx = DeviceContext::default();

        let mut int = CipValue::new_empty(CipType::Int, 1, &ctx).unwrap();
        int.set(0, v).unwrap();
        prop_assert_eq!(int.get_number(0).unwrap(), CipNumber::Int(v as i16));

        let mut uint = CipValue::new_empty(CipType::Uint, 1, &ctx).unwrap();
        uint.set(0, v).unwrap();
        prop_assert_eq!(uint.get_number(0).unwrap(), CipNumber::Dint(v as u16 as i32));

        let mut udint = CipValue::new_empty(CipType::Udint, 1, &ctx).unwrap();
        udint.set(0, v).unwrap();
        prop_assert_eq!(udint.get_number(0).unwrap(), CipNumber::Lint(v as u32 as i64));

        let mut dint = CipValue::new_empty(CipType::Dint, 1, &ctx).unwrap();
        dint.set(0, f).unwrap();
        prop_assert_eq!(dint.get_number(0).unwrap(), CipNumber::Dint(f as i64 as i32));

        let mut real = CipValue::new_empty(CipType::Real, 1, &ctx).unwrap();
        real.set(0, f).unwrap();
        prop_assert_eq!(real.get_number(0).unwrap(), CipNumber::Real(f as f32));
    }

    #[test]
    fn prop_bool_follows_nonzero(v in any::<i32>(), ctx in device()) {
        let mut value = CipValue::new_empty(CipType::Bool, 1, &ctx).unwrap();
        value.set(0, v).unwrap();
        let expected: &[u8] = match (ctx.is_omron(), v != 0) {
            (true, true) => &[0x01, 0x00],
            (true, false) => &[0x00, 0x00],
            (false, true) => &[0xFF],
            (false, false) => &[0x00],
        };
        prop_assert_eq!(value.payload(), expected);
    }

    #[test]
    fn prop_bits_set_clear_isolated(
        payload in prop::collection::vec(any::<u8>(), 1..13),
        k in any::<prop::sample::Index>(),
    ) {
        let ctx = DeviceContext::default();
        let mut value = CipValue::from_wire_bytes(CipType::Bits, &payload, &ctx).unwrap();
        let bit = k.index(payload.len() * 8);

        value.set(bit, 1).unwrap();
        prop_assert!(value.get_bit(bit).unwrap());
        value.set(bit, 0).unwrap();
        prop_assert!(!value.get_bit(bit).unwrap());

        let mut expected = payload.clone();
        expected[bit / 8] &= !(1 << (bit % 8));
        prop_assert_eq!(value.payload(), &expected[..]);
        prop_assert_eq!(value.payload().len(), payload.len());
    }

    #[test]
    fn prop_omron_string_round_trip(text in "\\PC{0,64}") {
        let value = CipValue::from_strings(CipType::OmronString, &[text.as_str()]).unwrap();
        prop_assert_eq!(value.get_omron_string().unwrap(), text.clone());
        prop_assert_eq!(
            u16::from_le_bytes([value.payload()[0], value.payload()[1]]) as usize,
            text.len()
        );
        let ctx = DeviceContext::omron();
        let decoded = CipValue::from_wire(&value.to_bytes().unwrap(), &ctx).unwrap();
        prop_assert_eq!(decoded.get_string().unwrap(), text);
    }

    #[test]
    fn prop_struct_strings_symmetric(texts in prop::collection::vec("[ -~]{0,20}", 1..6)) {
        let value = CipValue::from_strings(CipType::StructString, &texts).unwrap();
        prop_assert_eq!(value.element_count(), Some(texts.len() as u16));
        prop_assert_eq!(value.payload().len() % 2, 0);
        prop_assert_eq!(value.get_strings(texts.len()).unwrap(), texts.clone());
        prop_assert_eq!(value.get_string().unwrap(), texts[0].clone());
    }
}

// ============================================================================
// Boundary cases the properties above do not pin down
// ============================================================================

#[test]
fn test_bits_partial_word_boundaries() {
    let ctx = DeviceContext::default();
    // 31 addressable bits are not expressible; a 3-byte payload gives 24
    let mut value = CipValue::from_wire_bytes(CipType::Bits, &[0u8; 3], &ctx).unwrap();
    assert_eq!(value.element_count(), Some(24));
    value.set(23, 1).unwrap();
    assert_eq!(value.payload(), &[0, 0, 0x80]);
    assert!(value.set(24, 1).is_err());

    // second word of a 5-byte payload is a single byte
    let mut value = CipValue::from_wire_bytes(CipType::Bits, &[0u8; 5], &ctx).unwrap();
    value.set(32, 1).unwrap();
    value.set(39, 1).unwrap();
    assert_eq!(value.payload(), &[0, 0, 0, 0, 0x81]);
    assert_eq!(value.get_number(32).unwrap(), CipNumber::Sint(-127));
}

#[test]
fn test_bits_empty_allocates_words() {
    let ctx = DeviceContext::default();
    let mut value = CipValue::new_empty(CipType::Bits, 1, &ctx).unwrap();
    assert_eq!(value.element_count(), Some(1));
    assert_eq!(value.payload().len(), 4);
    value.set(31, 1).unwrap();
    assert_eq!(value.payload(), &[0, 0, 0, 0x80]);
}

#[test]
fn test_ulint_high_values_read_negative() {
    let ctx = DeviceContext::default();
    let mut value = CipValue::new_empty(CipType::Ulint, 1, &ctx).unwrap();
    value.set(0, u64::MAX).unwrap();
    assert_eq!(value.payload(), &[0xFF; 8]);
    assert_eq!(value.get_number(0).unwrap(), CipNumber::Lint(-1));
}

#[test]
fn test_struct_string_count_needs_caller() {
    let ctx = DeviceContext::default();
    let data = [0xCE, 0x0F, 2, 0, 0, 0, b'o', b'k', 0, 0];
    let value = CipValue::from_wire_bytes(CipType::Struct, &data, &ctx).unwrap();
    assert_eq!(value.element_count(), None);
    assert_eq!(value.get_strings(1).unwrap(), vec!["ok"]);
    assert!(value.get_strings(0).is_err());
}

#[test]
fn test_set_string_needs_read_value() {
    let ctx = DeviceContext::default();
    // no constructor produces an empty STRUCT; only a value read back can be rewritten
    assert!(CipValue::new_empty(CipType::Struct, 1, &ctx).is_err());

    let mut data = vec![0xCE, 0x0F, 0, 0, 0, 0];
    data.resize(88, 0);
    let mut value = CipValue::from_wire_bytes(CipType::Struct, &data, &ctx).unwrap();
    value.set_string("written").unwrap();
    assert_eq!(value.get_string().unwrap(), "written");
    assert_eq!(value.payload().len(), 88);
}
