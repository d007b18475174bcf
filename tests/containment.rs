use dynval::{algebra::contains::contains, prelude::*};
use dynval_strategy::*;
use proptest::prelude::*;

/// A copy of `d` with some array elements and object members dropped at every level.
fn prune(d: &Dynamic, mask: &mut u64) -> Dynamic {
    let mut keep = || {
        *mask = mask.rotate_left(1);
        *mask & 1 == 1
    };
    match d {
        Dynamic::Scalar(_) => d.clone(),
        Dynamic::Array(v) => {
            let kept: Vec<&Dynamic> = v.iter().filter(|_| keep()).collect();
            Dynamic::Array(kept.into_iter().map(|e| prune(e, mask)).collect())
        }
        Dynamic::Object(o) => {
            let kept: Vec<&(Key, Dynamic)> = o.iter().filter(|_| keep()).collect();
            Dynamic::Object(kept.into_iter().map(|(k, v)| (k.clone(), prune(v, mask))).collect())
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 500, ..ProptestConfig::default() })]

    #[test]
    fn reflexive(d in arb_dynamic()) {
        let packed = pack(&d).unwrap();
        prop_assert!(contains(&packed, &packed).unwrap());
    }

    #[test]
    fn pruned_copy_is_contained(d in arb_dynamic(), mask in any::<u64>()) {
        let mut mask = mask;
        let pruned = prune(&d, &mut mask);
        prop_assert!(contains(&pack(&d).unwrap(), &pack(&pruned).unwrap()).unwrap());
    }

    #[test]
    fn unknown_key_is_not_contained(pairs in prop::collection::vec((arb_key(), arb_dynamic()), 0..8)) {
        let whole = Dynamic::Object(VecMap::from(pairs.clone()));
        let mut extra = pairs;
        // longer than any generated key
        extra.push((Key::from("a-key-nobody-generates"), Dynamic::null()));
        let bigger = Dynamic::Object(VecMap::from(extra));

        let (whole, bigger) = (pack(&whole).unwrap(), pack(&bigger).unwrap());
        prop_assert!(!contains(&whole, &bigger).unwrap());
        prop_assert!(contains(&bigger, &whole).unwrap());
    }
}

#[test]
fn nested_members() {
    let p = |t: &str| pack(&parse(t).unwrap()).unwrap();
    assert!(contains(&p(r#"{"x": {"y": 1, "z": 2}}"#), &p(r#"{"x": {"y": 1}}"#)).unwrap());
    assert!(!contains(&p(r#"{"x": {"y": 1}}"#), &p(r#"{"x": {"y": 1, "z": 2}}"#)).unwrap());
    assert!(contains(&p(r#"[1, [2, 3], {"a": 4}]"#), &p(r#"[[3], {}]"#)).unwrap());
    assert!(!contains(&p(r#"[1, 2]"#), &p(r#"[[1]]"#)).unwrap());
}
