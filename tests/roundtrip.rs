use dynval::{
    encoding::{
        container::{ContainerRef, Node},
        iter::{DynIter, Token},
    },
    prelude::*,
    wire,
};
use dynval_strategy::*;
use failure::Error;
use proptest::prelude::*;

/// The tokens a walk of the packed form of `d` should produce; begin tokens carry no scalar.
fn expected_tokens(d: &Dynamic) -> Vec<(Token, Option<Scalar>)> {
    fn walk(d: &Dynamic, token: Token, out: &mut Vec<(Token, Option<Scalar>)>) {
        match d {
            Dynamic::Scalar(s) => out.push((token, Some(s.clone()))),
            Dynamic::Array(v) => {
                out.push((Token::BeginArray, None));
                for e in v {
                    walk(e, Token::Element, out);
                }
                out.push((Token::EndArray, None));
            }
            Dynamic::Object(o) => {
                out.push((Token::BeginObject, None));
                for (k, v) in o {
                    out.push((Token::Key, Some(Scalar::String(k.0.clone()))));
                    walk(v, Token::Value, out);
                }
                out.push((Token::EndObject, None));
            }
        }
    }

    let mut out = Vec::new();
    match d {
        Dynamic::Scalar(s) => {
            out.push((Token::BeginArray, None));
            out.push((Token::Element, Some(s.clone())));
            out.push((Token::EndArray, None));
        }
        container => walk(container, Token::Element, &mut out),
    }
    out
}

fn actual_tokens(packed: &[u8]) -> Result<Vec<(Token, Option<Scalar>)>, Error> {
    let mut out = Vec::new();
    for item in DynIter::new(packed)? {
        let (tok, node) = item?;
        let scalar = match node {
            Some(Node::Scalar(s)) => Some(s.to_scalar()),
            _ => None,
        };
        out.push((tok, scalar));
    }
    Ok(out)
}

/// Checks that consecutive children tile the data area, and recurses.
fn check_offsets(c: ContainerRef) -> Result<(), Error> {
    for i in 0..c.entries() {
        assert_eq!(c.child_offset(i)? + c.child_length(i)?, c.child_offset(i + 1)?);
    }
    for i in 0..c.len() {
        let child = if c.is_object() { c.get_object_value(i)? } else { c.get(i)? };
        if let Some(Node::Container(inner)) = child {
            check_offsets(inner)?;
        }
    }
    Ok(())
}

fn check_key_order(c: ContainerRef) -> Result<(), Error> {
    if c.is_object() {
        for i in 1..c.len() {
            let (a, b) = (c.key_at(i - 1)?.unwrap(), c.key_at(i)?.unwrap());
            assert!((a.len(), a) < (b.len(), b), "keys out of order: {:?} {:?}", a, b);
        }
    }
    for i in 0..c.len() {
        let child = if c.is_object() { c.get_object_value(i)? } else { c.get(i)? };
        if let Some(Node::Container(inner)) = child {
            check_key_order(inner)?;
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 500, ..ProptestConfig::default() })]

    #[test]
    fn unpack_pack(d in arb_dynamic()) {
        let packed = pack(&d).unwrap();
        let back = unpack(&packed).unwrap();
        prop_assert_eq!(pack(&back).unwrap(), packed);
    }

    #[test]
    fn text(d in arb_dynamic()) {
        let packed = pack(&d).unwrap();
        let compact = to_text(&packed).unwrap();
        let indented = to_text_indent(&packed).unwrap();

        prop_assert_eq!(pack(&parse(&compact).unwrap()).unwrap(), packed.clone());
        prop_assert_eq!(pack(&parse(&indented).unwrap()).unwrap(), packed);
    }

    #[test]
    fn wire_messages(d in arb_dynamic()) {
        let packed = pack(&d).unwrap();
        prop_assert_eq!(wire::recv(&wire::send(&packed).unwrap()).unwrap(), packed);
    }

    #[test]
    fn json_interop(d in arb_json()) {
        let packed = pack(&d).unwrap();
        let ours = to_text(&packed).unwrap();
        let theirs: serde_json::Value = serde_json::from_str(&ours).unwrap();
        let reparsed = parse(&serde_json::to_string(&theirs).unwrap()).unwrap();
        prop_assert_eq!(pack(&reparsed).unwrap(), packed);
    }

    #[test]
    fn iterator_follows_tree(d in arb_dynamic()) {
        let packed = pack(&d).unwrap();
        prop_assert_eq!(actual_tokens(&packed).unwrap(), expected_tokens(&d));
    }

    #[test]
    fn layout(d in arb_dynamic()) {
        let packed = pack(&d).unwrap();
        let root = ContainerRef::root(&packed).unwrap();
        check_offsets(root).unwrap();
        check_key_order(root).unwrap();
    }

    #[test]
    fn last_duplicate_wins(pairs in prop::collection::vec((arb_key(), any::<i64>()), 0..20)) {
        let obj = Dynamic::object(pairs.iter().map(|(k, v)| (k.clone(), Dynamic::from(*v))).collect());
        let packed = pack(&obj).unwrap();
        let root = ContainerRef::root(&packed).unwrap();

        for (k, _) in &pairs {
            let last = pairs.iter().rev().find(|(k2, _)| k2 == k).map(|(_, v)| *v).unwrap();
            let found = root.find_key(k.as_bytes()).unwrap().and_then(|n| n.scalar());
            prop_assert_eq!(found, Some(ScalarRef::Integer(last)));
        }

        let mut distinct: Vec<&Key> = pairs.iter().map(|(k, _)| k).collect();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(root.len(), distinct.len());
    }
}

#[test]
fn corrupted_input_is_rejected() {
    let packed = pack(&parse(r#"{"a": [1, 2, 3], "b": "text"}"#).unwrap()).unwrap();
    for cut in 1..packed.len() {
        let mut short = packed[..cut].to_vec();
        // keep the size word truthful so the walk reaches the missing bytes
        let size = (short.len() as u32).to_le_bytes();
        if short.len() >= 4 {
            short[..4].copy_from_slice(&size);
        }
        let _ = unpack(&short);
    }
    assert!(unpack(&packed[..3]).is_err());
}
