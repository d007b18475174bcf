use dynval::{
    algebra::{
        compare::compare,
        hash::{hash, hash_extended},
    },
    prelude::*,
    temporal::date_to_timestamp,
};
use dynval_strategy::*;
use proptest::prelude::*;
use std::cmp::Ordering;

/// Rewrites integers as numerics and dates as midnight timestamps.
fn respell(d: &Dynamic) -> Dynamic {
    match d {
        Dynamic::Scalar(Scalar::Integer(i)) => Dynamic::from(Numeric::from(*i)),
        Dynamic::Scalar(Scalar::Date(days)) => Dynamic::Scalar(Scalar::Timestamp(date_to_timestamp(*days))),
        Dynamic::Scalar(_) => d.clone(),
        Dynamic::Array(v) => Dynamic::Array(v.iter().map(respell).collect()),
        Dynamic::Object(o) => Dynamic::Object(o.iter().map(|(k, v)| (k.clone(), respell(v))).collect()),
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 500, ..ProptestConfig::default() })]

    #[test]
    fn equal_values_hash_equal(d in arb_dynamic(), seed in any::<u64>()) {
        let a = pack(&d).unwrap();
        let b = pack(&respell(&d)).unwrap();

        prop_assert_eq!(compare(&a, &b).unwrap(), Ordering::Equal);
        prop_assert_eq!(hash(&a).unwrap(), hash(&b).unwrap());
        prop_assert_eq!(hash_extended(&a, seed).unwrap(), hash_extended(&b, seed).unwrap());
        prop_assert_eq!(hash_extended(&a, 0).unwrap(), hash_extended(&b, 0).unwrap());
    }

    #[test]
    fn deterministic(d in arb_dynamic(), seed in any::<u64>()) {
        let packed = pack(&d).unwrap();
        let copy = pack(&unpack(&packed).unwrap()).unwrap();
        prop_assert_eq!(hash(&packed).unwrap(), hash(&copy).unwrap());
        prop_assert_eq!(hash_extended(&packed, seed).unwrap(), hash_extended(&copy, seed).unwrap());
    }
}

#[test]
fn seeds_change_the_hash() {
    let packed = pack(&parse(r#"{"a": [1, "two", 3.5]}"#).unwrap()).unwrap();
    let hashes: Vec<u64> = (1..5).map(|seed| hash_extended(&packed, seed).unwrap()).collect();
    for i in 1..hashes.len() {
        assert_ne!(hashes[i - 1], hashes[i]);
    }
}

#[test]
fn times_hash_by_their_utc_instant() {
    let p = |t: &str| pack(&parse(t).unwrap()).unwrap();
    let (plain, utc, shifted) = (p(r#""08:00"::time"#), p(r#""08:00+00"::timetz"#), p(r#""10:00+02"::timetz"#));

    assert_eq!(compare(&plain, &utc).unwrap(), Ordering::Equal);
    assert_eq!(hash(&plain).unwrap(), hash(&utc).unwrap());
    assert_eq!(hash_extended(&plain, 7).unwrap(), hash_extended(&utc, 7).unwrap());

    assert_ne!(compare(&utc, &shifted).unwrap(), Ordering::Equal);
    assert_ne!(hash(&utc).unwrap(), hash(&shifted).unwrap());
}
