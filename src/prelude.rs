pub use crate::{
    config::Config,
    encoding::{
        de::{unpack, unpack_with},
        ser::{pack, pack_with},
    },
    errors::DynError,
    numeric::Numeric,
    parser::{parse, parse_with},
    printer::{to_text, to_text_indent},
    scalar::{Kind, Scalar, ScalarRef},
    vecmap::VecMap,
    Dynamic, Key,
};
pub use bytes::Bytes;
pub use std::str::FromStr;
