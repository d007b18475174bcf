use dynval::{
    algebra::compare::{compare, scalar_eq},
    prelude::*,
};
use dynval_strategy::*;
use proptest::prelude::*;
use std::cmp::Ordering;

fn packed(d: &Dynamic) -> Vec<u8> { pack(d).unwrap() }

proptest! {
    #![proptest_config(ProptestConfig { cases: 500, ..ProptestConfig::default() })]

    #[test]
    fn reflexive(a in arb_dynamic()) {
        let a = packed(&a);
        prop_assert_eq!(compare(&a, &a).unwrap(), Ordering::Equal);
    }

    #[test]
    fn antisymmetric(a in arb_dynamic(), b in arb_dynamic()) {
        let (a, b) = (packed(&a), packed(&b));
        prop_assert_eq!(compare(&a, &b).unwrap(), compare(&b, &a).unwrap().reverse());
    }

    #[test]
    fn transitive(v in prop::collection::vec(arb_dynamic(), 3..12)) {
        let mut v: Vec<Vec<u8>> = v.iter().map(packed).collect();
        v.sort_by(|a, b| compare(a, b).unwrap());
        for i in 0..v.len() {
            for j in i..v.len() {
                prop_assert_ne!(compare(&v[i], &v[j]).unwrap(), Ordering::Greater);
            }
        }
    }

    #[test]
    fn agrees_with_scalar_equality(x in arb_scalar(), y in arb_scalar()) {
        let ord = compare(&packed(&Dynamic::Scalar(x.clone())), &packed(&Dynamic::Scalar(y.clone()))).unwrap();
        if scalar_eq(&x, &y) {
            prop_assert_eq!(ord, Ordering::Equal);
        } else if x.kind() == y.kind() {
            prop_assert_ne!(ord, Ordering::Equal);
        }
    }

    #[test]
    fn singletons_order_like_their_scalars(x in arb_scalar(), y in arb_scalar()) {
        let (sx, sy) = (packed(&Dynamic::Array(vec![Dynamic::Scalar(x.clone())])), packed(&Dynamic::Array(vec![Dynamic::Scalar(y.clone())])));
        let (rx, ry) = (packed(&Dynamic::Scalar(x)), packed(&Dynamic::Scalar(y)));
        prop_assert_eq!(compare(&sx, &sy).unwrap(), compare(&rx, &ry).unwrap());
    }
}

#[test]
fn kinds_order_by_priority() {
    let p = |t: &str| pack(&parse(t).unwrap()).unwrap();
    let mut v = vec![p("null"), p("[]"), p("1"), p(r#""s""#), p("{}"), p("true")];
    v.sort_by(|a, b| compare(a, b).unwrap());
    let printed: Vec<String> = v.iter().map(|d| to_text(d).unwrap()).collect();
    assert_eq!(printed, vec!["{}", "[]", r#""s""#, "true", "1", "null"]);
}

#[test]
fn times_with_and_without_zone_order_consistently() {
    let p = |t: &str| pack(&parse(t).unwrap()).unwrap();
    let times = [
        p(r#""08:30"::time"#),
        p(r#""09:00+02"::timetz"#),
        p(r#""08:00+00"::timetz"#),
        p(r#""08:00"::time"#),
        p(r#""23:00-05"::timetz"#),
    ];
    for a in &times {
        for b in &times {
            for c in &times {
                let (ab, bc, ac) = (compare(a, b).unwrap(), compare(b, c).unwrap(), compare(a, c).unwrap());
                if ab != Ordering::Greater && bc != Ordering::Greater {
                    assert_ne!(ac, Ordering::Greater, "{} {} {}", to_text(a).unwrap(), to_text(b).unwrap(), to_text(c).unwrap());
                }
            }
        }
    }
    assert_eq!(compare(&times[2], &times[3]).unwrap(), Ordering::Equal);
}
