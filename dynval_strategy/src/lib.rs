use bytes::Bytes;
use dynval::{
    network::{Inet, FAMILY_V4},
    numeric::Numeric,
    prelude::*,
    temporal::{Interval, TimeTz, USECS_PER_DAY, USECS_PER_HOUR},
};
use num_bigint::BigInt;
use proptest::prelude::*;

/// arbitrary Numeric with up to 8 fractional digits, for use with proptest
pub fn arb_numeric() -> impl Strategy<Value = Numeric> {
    (any::<i64>(), 0u32..8).prop_map(|(digits, scale)| Numeric::new(BigInt::from(digits), scale))
}

/// arbitrary IPv4 inet, for use with proptest
pub fn arb_inet() -> impl Strategy<Value = Inet> {
    (any::<[u8; 4]>(), 0u8..33).prop_map(|(o, bits)| {
        let mut addr = [0u8; 16];
        addr[..4].copy_from_slice(&o);
        Inet { family: FAMILY_V4, bits, is_cidr: false, addr }
    })
}

/// arbitrary Interval with non-negative parts, for use with proptest
pub fn arb_interval() -> impl Strategy<Value = Interval> {
    (0..USECS_PER_DAY, 0i32..1000, 0i32..1200).prop_map(|(time, day, month)| Interval { time, day, month })
}

/// arbitrary text without NUL, which the text syntax cannot carry
pub fn arb_text(max: usize) -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[^\\x00]{{0,{}}}", max)).unwrap()
}

/// arbitrary object key, for use with proptest
pub fn arb_key() -> impl Strategy<Value = Key> { arb_text(12).prop_map(Key::from) }

/// arbitrary Scalar for use with proptest
///
/// Only kinds whose printed form reads back as the same kind are generated, so every value
/// survives a trip through text.
pub fn arb_scalar() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        Just(Scalar::Null),
        any::<bool>().prop_map(Scalar::Bool),
        arb_text(24).prop_map(|s| Scalar::String(Bytes::from(s))),
        any::<i64>().prop_map(Scalar::Integer),
        any::<f64>().prop_filter("finite", |f| f.is_finite()).prop_map(Scalar::Float),
        arb_numeric().prop_map(|n| Scalar::from_numeric(&n)),
        (-3_000_000_000_000_000i64..3_000_000_000_000_000).prop_map(Scalar::Timestamp),
        (-3_000_000_000_000_000i64..3_000_000_000_000_000).prop_map(Scalar::TimestampTz),
        (-100_000i32..100_000).prop_map(Scalar::Date),
        (0..USECS_PER_DAY).prop_map(Scalar::Time),
        (0..USECS_PER_DAY, -12i32..13).prop_map(|(time, h)| Scalar::TimeTz(TimeTz {
            time,
            zone: h * (USECS_PER_HOUR / 1_000_000) as i32
        })),
        arb_interval().prop_map(Scalar::Interval),
        arb_inet().prop_map(Scalar::Inet),
        arb_inet().prop_map(|i| Scalar::Cidr(i.network())),
        any::<[u8; 6]>().prop_map(Scalar::Mac),
    ]
}

/// arbitrary Dynamic for use with proptest
pub fn arb_dynamic() -> impl Strategy<Value = Dynamic> {
    let leaf = arb_scalar().prop_map(Dynamic::Scalar);
    leaf.prop_recursive(
        8,  // max depth
        64, // max nodes
        10, // max items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..10).prop_map(Dynamic::Array),
                prop::collection::vec((arb_key(), inner), 0..10)
                    .prop_map(|pairs| Dynamic::Object(VecMap::from(pairs)))
            ]
        },
    )
}

/// arbitrary Dynamic holding only JSON scalars, for use with proptest
pub fn arb_json() -> impl Strategy<Value = Dynamic> {
    let leaf = prop_oneof![
        Just(Dynamic::null()),
        any::<bool>().prop_map(Dynamic::from),
        arb_text(24).prop_map(Dynamic::from),
        any::<i64>().prop_map(Dynamic::from),
    ];
    leaf.prop_recursive(6, 48, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Dynamic::Array),
            prop::collection::vec((arb_key(), inner), 0..8).prop_map(|pairs| Dynamic::Object(VecMap::from(pairs)))
        ]
    })
}
