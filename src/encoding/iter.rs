//! Forward-only token walk over a packed datum.

use super::container::{ContainerRef, Node};
use failure::Error;
use smallvec::SmallVec;

/// What a call to [`DynIter::next`] produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// Start of an array; the node is the array itself.
    BeginArray,
    /// End of the innermost array.
    EndArray,
    /// An array element.
    Element,
    /// Start of an object; the node is the object itself.
    BeginObject,
    /// End of the innermost object.
    EndObject,
    /// An object key.
    Key,
    /// The value following the last key.
    Value,
    /// The walk is finished.
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    ArrayStart,
    ArrayElem,
    ObjectStart,
    ObjectKey,
    ObjectValue,
}

#[derive(Clone, Copy, Debug)]
struct Frame<'a> {
    container: ContainerRef<'a>,
    state: State,
    curr_index: usize,
    curr_data_offset: usize,
    curr_value_offset: usize,
}

impl<'a> Frame<'a> {
    fn new(container: ContainerRef<'a>) -> Result<Self, Error> {
        let (state, curr_value_offset) = if container.is_object() {
            (State::ObjectStart, container.child_offset(container.len())?)
        } else {
            (State::ArrayStart, 0)
        };
        Ok(Frame { container, state, curr_index: 0, curr_data_offset: 0, curr_value_offset })
    }
}

/// Walks a packed tree one token at a time without materializing it.
///
/// Nested containers are entered in place: where a container child sits, the walk yields its
/// `BeginArray` or `BeginObject` token instead of `Element` or `Value`, unless the caller asks
/// to skip nested containers.
///
/// # Example
///
/// ```
/// use dynval::{encoding::iter::{DynIter, Token}, prelude::*};
///
/// let packed = pack(&parse(r#"[1, {"a": null}]"#).unwrap()).unwrap();
/// let tokens: Vec<Token> = DynIter::new(&packed)
///     .unwrap()
///     .map(|t| t.unwrap().0)
///     .collect();
///
/// assert_eq!(tokens, vec![
///     Token::BeginArray,
///     Token::Element,
///     Token::BeginObject,
///     Token::Key,
///     Token::Value,
///     Token::EndObject,
///     Token::EndArray,
/// ]);
/// ```
#[derive(Clone, Debug)]
pub struct DynIter<'a> {
    frames: SmallVec<[Frame<'a>; 8]>,
    finished: bool,
}

impl<'a> DynIter<'a> {
    /// Starts a walk at the root of a packed datum.
    pub fn new(datum: &'a [u8]) -> Result<Self, Error> { Self::from_container(ContainerRef::root(datum)?) }

    /// Starts a walk at any container.
    pub fn from_container(container: ContainerRef<'a>) -> Result<Self, Error> {
        let mut frames = SmallVec::new();
        frames.push(Frame::new(container)?);
        Ok(DynIter { frames, finished: false })
    }

    /// Nesting depth of the token last returned, the root container being depth 1.
    pub fn depth(&self) -> usize { self.frames.len() }

    /// Advances the walk.
    ///
    /// `BeginArray` and `BeginObject` come with the container node, `Key`, `Element` and
    /// `Value` with the child node, the rest with `None`. With `skip_nested` set, container
    /// children are returned as `Element` or `Value` nodes and not entered.
    pub fn next(&mut self, skip_nested: bool) -> Result<(Token, Option<Node<'a>>), Error> {
        let frame = match self.frames.last_mut() {
            Some(frame) => frame,
            None => {
                self.finished = true;
                return Ok((Token::Done, None));
            }
        };
        let c = frame.container;

        match frame.state {
            State::ArrayStart => {
                frame.state = State::ArrayElem;
                Ok((Token::BeginArray, Some(Node::Container(c))))
            }
            State::ObjectStart => {
                frame.state = State::ObjectKey;
                Ok((Token::BeginObject, Some(Node::Container(c))))
            }
            State::ArrayElem => {
                if frame.curr_index >= c.len() {
                    self.frames.pop();
                    return Ok((Token::EndArray, None));
                }
                let i = frame.curr_index;
                let node = c.child_at(i, frame.curr_data_offset)?;
                frame.curr_data_offset = c.advance(i, frame.curr_data_offset)?;
                frame.curr_index += 1;
                self.descend(Token::Element, node, skip_nested)
            }
            State::ObjectKey => {
                if frame.curr_index >= c.len() {
                    self.frames.pop();
                    return Ok((Token::EndObject, None));
                }
                let i = frame.curr_index;
                let node = c.child_at(i, frame.curr_data_offset)?;
                frame.curr_data_offset = c.advance(i, frame.curr_data_offset)?;
                frame.state = State::ObjectValue;
                Ok((Token::Key, Some(node)))
            }
            State::ObjectValue => {
                let i = frame.curr_index + c.len();
                let node = c.child_at(i, frame.curr_value_offset)?;
                frame.curr_value_offset = c.advance(i, frame.curr_value_offset)?;
                frame.curr_index += 1;
                frame.state = State::ObjectKey;
                self.descend(Token::Value, node, skip_nested)
            }
        }
    }

    fn descend(&mut self, token: Token, node: Node<'a>, skip_nested: bool) -> Result<(Token, Option<Node<'a>>), Error> {
        match node {
            Node::Container(child) if !skip_nested => {
                self.frames.push(Frame::new(child)?);
                self.next(false)
            }
            _ => Ok((token, Some(node))),
        }
    }
}

impl<'a> Iterator for DynIter<'a> {
    type Item = Result<(Token, Option<Node<'a>>), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match DynIter::next(self, false) {
            Ok((Token::Done, _)) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
            ok => Some(ok),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encoding::ser::pack, parser::parse, scalar::ScalarRef};

    fn walk(text: &str, skip_nested: bool) -> Vec<(Token, Option<ScalarRef<'static>>)> {
        let packed: &'static [u8] = Box::leak(pack(&parse(text).unwrap()).unwrap().into_boxed_slice());
        let mut it = DynIter::new(packed).unwrap();
        let mut out = Vec::new();
        loop {
            let (tok, node) = it.next(skip_nested).unwrap();
            out.push((tok, node.and_then(Node::scalar)));
            if tok == Token::Done {
                return out;
            }
        }
    }

    #[test]
    fn objects_alternate_keys_and_values() {
        use Token::*;
        let toks = walk(r#"{"bb": [true], "a": 1}"#, false);
        assert_eq!(toks, vec![
            (BeginObject, None),
            (Key, Some(ScalarRef::String(&b"a"[..]))),
            (Value, Some(ScalarRef::Integer(1))),
            (Key, Some(ScalarRef::String(&b"bb"[..]))),
            (BeginArray, None),
            (Element, Some(ScalarRef::Bool(true))),
            (EndArray, None),
            (EndObject, None),
            (Done, None),
        ]);
    }

    #[test]
    fn skipping_nested_containers() {
        use Token::*;
        let toks: Vec<Token> = walk(r#"[[1, 2], {"a": 3}, 4]"#, true).into_iter().map(|t| t.0).collect();
        assert_eq!(toks, vec![BeginArray, Element, Element, Element, EndArray, Done]);
    }

    #[test]
    fn long_arrays_cross_strides() {
        let text = format!("[{}]", (0..100).map(|i| i.to_string()).collect::<Vec<_>>().join(", "));
        let elems: Vec<i64> = walk(&text, false)
            .into_iter()
            .filter_map(|(_, s)| match s {
                Some(ScalarRef::Integer(i)) => Some(i),
                _ => None,
            })
            .collect();
        assert_eq!(elems, (0..100).collect::<Vec<i64>>());
    }

    #[test]
    fn done_repeats() {
        let packed = pack(&parse("[]").unwrap()).unwrap();
        let mut it = DynIter::new(&packed).unwrap();
        assert_eq!(it.next(false).unwrap().0, Token::BeginArray);
        assert_eq!(it.next(false).unwrap().0, Token::EndArray);
        assert_eq!(it.next(false).unwrap().0, Token::Done);
        assert_eq!(it.next(false).unwrap().0, Token::Done);
    }
}
