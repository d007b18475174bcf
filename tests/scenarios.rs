use dynval::{
    algebra::{compare::compare, contains::contains, ops},
    encoding::iter::{DynIter, Token},
    numeric::Numeric,
    prelude::*,
};
use std::cmp::Ordering;

fn p(text: &str) -> Vec<u8> { pack(&parse(text).unwrap()).unwrap() }

#[test]
fn duplicate_keys_keep_the_last() {
    let packed = p(r#"{"b": 2, "a": 1, "b": 3}"#);
    assert_eq!(to_text(&packed).unwrap(), r#"{"a": 1, "b": 3}"#);
}

#[test]
fn iterate_mixed_numbers() {
    let packed = p(r#"[1, 2.0, "3"::numeric]"#);
    let tokens: Vec<(Token, Option<Scalar>)> = DynIter::new(&packed)
        .unwrap()
        .map(|t| {
            let (tok, node) = t.unwrap();
            (tok, node.and_then(|n| n.scalar()).map(|s| s.to_scalar()))
        })
        .collect();

    assert_eq!(tokens, vec![
        (Token::BeginArray, None),
        (Token::Element, Some(Scalar::Integer(1))),
        (Token::Element, Some(Scalar::Float(2.0))),
        (Token::Element, Some(Scalar::from_numeric(&Numeric::from(3)))),
        (Token::EndArray, None),
    ]);
}

#[test]
fn object_concatenation_right_wins() {
    let merged = ops::add(&p(r#"{"a":1}"#), &p(r#"{"a":2,"b":3}"#)).unwrap();
    assert_eq!(merged, p(r#"{"a":2,"b":3}"#));
}

#[test]
fn array_concatenation() {
    let joined = ops::add(&p("[1,2]"), &p("[3]")).unwrap();
    assert_eq!(joined, p("[1,2,3]"));
}

#[test]
fn shorter_object_sorts_first() {
    assert_eq!(compare(&p(r#"{"a":1}"#), &p(r#"{"a":1,"b":2}"#)).unwrap(), Ordering::Less);
}

#[test]
fn nested_containment() {
    assert!(contains(&p(r#"{"x":{"y":1,"z":2}}"#), &p(r#"{"x":{"y":1}}"#)).unwrap());
}

#[test]
fn cidr_annotation_survives() {
    assert_eq!(to_text(&p("10.0.0.0/8::cidr")).unwrap(), "10.0.0.0/8::cidr");
}

#[test]
fn integer_division_by_zero() {
    let err = ops::div(&p("1"), &p("0")).unwrap_err();
    assert_eq!(err.downcast_ref::<DynError>(), Some(&DynError::DivisionByZero));
    assert_eq!(err.to_string(), "division by zero");
}
