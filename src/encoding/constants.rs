/// Container header: opaque binary payload, 0x80000000
pub(crate) const F_BINARY: u32 = 0x8000_0000;
/// Container header: array, 0x40000000
pub(crate) const F_ARRAY: u32 = 0x4000_0000;
/// Container header: object, 0x20000000
pub(crate) const F_OBJECT: u32 = 0x2000_0000;
/// Container header: raw-scalar pseudo-array, 0x10000000
pub(crate) const F_SCALAR: u32 = 0x1000_0000;
/// Container header: element or pair count
pub(crate) const COUNT_MASK: u32 = 0x0FFF_FFFF;

/// Entry word: the low bits hold an end offset rather than a length
pub(crate) const JE_HAS_OFF: u32 = 0x8000_0000;
/// Entry word: type bits
pub(crate) const JE_TYPE_MASK: u32 = 0x7000_0000;
/// Entry word: offset or length bits
pub(crate) const JE_OFFLEN_MASK: u32 = 0x0FFF_FFFF;

pub(crate) const JE_STRING: u32 = 0x0000_0000;
pub(crate) const JE_NUMERIC: u32 = 0x1000_0000;
pub(crate) const JE_FALSE: u32 = 0x2000_0000;
pub(crate) const JE_TRUE: u32 = 0x3000_0000;
pub(crate) const JE_NULL: u32 = 0x4000_0000;
pub(crate) const JE_CONTAINER: u32 = 0x5000_0000;
pub(crate) const JE_EXTENDED: u32 = 0x6000_0000;

/// Every `STRIDE`th entry word stores an offset.
pub const STRIDE: usize = 32;

/// Largest length or offset an entry word can hold.
pub const MAX_LEN: usize = JE_OFFLEN_MASK as usize;
/// Largest count a container header can hold.
pub const MAX_COUNT: usize = COUNT_MASK as usize;

pub(crate) const TAG_INTEGER: u32 = 0x00;
pub(crate) const TAG_FLOAT: u32 = 0x01;
pub(crate) const TAG_TIMESTAMP: u32 = 0x02;
pub(crate) const TAG_TIMESTAMPTZ: u32 = 0x03;
pub(crate) const TAG_DATE: u32 = 0x04;
pub(crate) const TAG_TIME: u32 = 0x05;
pub(crate) const TAG_TIMETZ: u32 = 0x06;
pub(crate) const TAG_INTERVAL: u32 = 0x07;
pub(crate) const TAG_INET: u32 = 0x09;
pub(crate) const TAG_CIDR: u32 = 0x0A;
pub(crate) const TAG_MAC: u32 = 0x0B;
pub(crate) const TAG_MAC8: u32 = 0x0C;
pub(crate) const TAG_POINT: u32 = 0x0D;
pub(crate) const TAG_PATH: u32 = 0x0E;
pub(crate) const TAG_LSEG: u32 = 0x0F;
pub(crate) const TAG_LINE: u32 = 0x10;
pub(crate) const TAG_POLYGON: u32 = 0x11;
pub(crate) const TAG_CIRCLE: u32 = 0x12;
pub(crate) const TAG_BOX: u32 = 0x13;
pub(crate) const TAG_TSVECTOR: u32 = 0x18;
pub(crate) const TAG_TSQUERY: u32 = 0x19;
/// First range tag; the element kind's index is added.
pub(crate) const TAG_RANGE: u32 = 0x1A;
/// First multirange tag; the element kind's index is added.
pub(crate) const TAG_MULTIRANGE: u32 = 0x1F;
pub(crate) const TAG_BYTEA: u32 = 0x24;
