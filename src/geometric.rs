//! Plane geometry: points, segments, lines, boxes, paths, polygons and circles.
//!
//! Fixed-size kinds pack as consecutive little-endian `f64`s. Paths and polygons pack as a
//! variable body described on [`Path`] and [`Polygon`].

use crate::{
    errors::DynError,
    util::{float_cmp, format_f64, read_f64, read_i32, Endian},
};
use byteorder::ByteOrder;
use failure::Error;
use std::{cmp::Ordering, fmt};

#[derive(Copy, Clone, Debug, PartialEq, Default)]
/// A point `(x,y)`.
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// A line segment between two points.
pub struct Lseg(pub Point, pub Point);

#[derive(Copy, Clone, Debug, PartialEq)]
/// An infinite line `Ax + By + C = 0`.
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// An axis-aligned box, stored upper-right corner first.
pub struct GeoBox {
    pub high: Point,
    pub low: Point,
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// A circle `<(x,y),r>`.
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// An open or closed sequence of points.
///
/// Packed body: point count, closed flag and a reserved word (three `i32`s), then the
/// points.
pub struct Path {
    pub closed: bool,
    pub points: Vec<Point>,
}

#[derive(Clone, Debug, PartialEq)]
/// A closed polygon.
///
/// Packed body: point count (`i32`), the bounding box, then the points.
pub struct Polygon {
    pub points: Vec<Point>,
}

pub const POINT_SIZE: usize = 16;
pub const LSEG_SIZE: usize = 32;
pub const LINE_SIZE: usize = 24;
pub const CIRCLE_SIZE: usize = 24;
pub const BOX_SIZE: usize = 32;

fn put_f64s(out: &mut Vec<u8>, fs: &[f64]) {
    for f in fs {
        let mut buf = [0u8; 8];
        Endian::write_f64(&mut buf, *f);
        out.extend_from_slice(&buf);
    }
}

fn put_i32(out: &mut Vec<u8>, v: i32) {
    let mut buf = [0u8; 4];
    Endian::write_i32(&mut buf, v);
    out.extend_from_slice(&buf);
}

fn read_point(b: &[u8], at: usize) -> Result<Point, Error> {
    Ok(Point { x: read_f64(b, at)?, y: read_f64(b, at + 8)? })
}

fn point_cmp(a: &Point, b: &Point) -> Ordering { float_cmp(a.x, b.x).then_with(|| float_cmp(a.y, b.y)) }

fn points_cmp(a: &[Point], b: &[Point]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        a.iter()
            .zip(b)
            .map(|(p, q)| point_cmp(p, q))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    })
}

fn division_by_zero() -> Error { DynError::DivisionByZero.into() }

impl Point {
    /// Packed form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(POINT_SIZE);
        put_f64s(&mut out, &[self.x, self.y]);
        out
    }

    /// Reads the packed form.
    pub fn from_bytes(b: &[u8]) -> Result<Point, Error> { read_point(b, 0) }

    /// Field-wise total order.
    pub fn total_cmp(&self, other: &Point) -> Ordering { point_cmp(self, other) }

    pub fn add(&self, p: &Point) -> Point { Point { x: self.x + p.x, y: self.y + p.y } }

    pub fn sub(&self, p: &Point) -> Point { Point { x: self.x - p.x, y: self.y - p.y } }

    /// Element-wise product.
    pub fn mul(&self, p: &Point) -> Point { Point { x: self.x * p.x, y: self.y * p.y } }

    /// Element-wise quotient.
    pub fn div(&self, p: &Point) -> Result<Point, Error> {
        if p.x == 0.0 || p.y == 0.0 {
            return Err(division_by_zero());
        }
        Ok(Point { x: self.x / p.x, y: self.y / p.y })
    }

    /// Euclidean distance.
    pub fn distance(&self, p: &Point) -> f64 { (self.x - p.x).hypot(self.y - p.y) }

    /// `?|`: the two points lie on a vertical line.
    pub fn is_vertical(&self, p: &Point) -> bool { self.x == p.x }
}

impl Lseg {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(LSEG_SIZE);
        put_f64s(&mut out, &[self.0.x, self.0.y, self.1.x, self.1.y]);
        out
    }

    pub fn from_bytes(b: &[u8]) -> Result<Lseg, Error> { Ok(Lseg(read_point(b, 0)?, read_point(b, 16)?)) }

    pub fn total_cmp(&self, other: &Lseg) -> Ordering {
        point_cmp(&self.0, &other.0).then_with(|| point_cmp(&self.1, &other.1))
    }

    fn contains_point(&self, p: &Point) -> bool {
        let d = self.0.distance(p) + p.distance(&self.1) - self.0.distance(&self.1);
        d.abs() <= 1e-10
    }

    /// Whether the two segments share at least one point.
    pub fn intersects(&self, other: &Lseg) -> bool {
        fn side(a: &Point, b: &Point, p: &Point) -> f64 { (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x) }

        let (d1, d2) = (side(&other.0, &other.1, &self.0), side(&other.0, &other.1, &self.1));
        let (d3, d4) = (side(&self.0, &self.1, &other.0), side(&self.0, &self.1, &other.1));
        if d1 * d2 < 0.0 && d3 * d4 < 0.0 {
            return true;
        }
        other.contains_point(&self.0)
            || other.contains_point(&self.1)
            || self.contains_point(&other.0)
            || self.contains_point(&other.1)
    }
}

impl Line {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(LINE_SIZE);
        put_f64s(&mut out, &[self.a, self.b, self.c]);
        out
    }

    pub fn from_bytes(b: &[u8]) -> Result<Line, Error> {
        Ok(Line { a: read_f64(b, 0)?, b: read_f64(b, 8)?, c: read_f64(b, 16)? })
    }

    pub fn total_cmp(&self, other: &Line) -> Ordering {
        float_cmp(self.a, other.a)
            .then_with(|| float_cmp(self.b, other.b))
            .then_with(|| float_cmp(self.c, other.c))
    }
}

impl GeoBox {
    /// A box from two opposite corners, in any order.
    pub fn new(p: Point, q: Point) -> GeoBox {
        GeoBox {
            high: Point { x: p.x.max(q.x), y: p.y.max(q.y) },
            low: Point { x: p.x.min(q.x), y: p.y.min(q.y) },
        }
    }

    fn bounding(points: &[Point]) -> GeoBox {
        let first = match points.first() {
            Some(p) => *p,
            None => return GeoBox { high: Point::default(), low: Point::default() },
        };
        points.iter().fold(GeoBox { high: first, low: first }, |b, p| GeoBox {
            high: Point { x: b.high.x.max(p.x), y: b.high.y.max(p.y) },
            low: Point { x: b.low.x.min(p.x), y: b.low.y.min(p.y) },
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(BOX_SIZE);
        put_f64s(&mut out, &[self.high.x, self.high.y, self.low.x, self.low.y]);
        out
    }

    pub fn from_bytes(b: &[u8]) -> Result<GeoBox, Error> {
        Ok(GeoBox { high: read_point(b, 0)?, low: read_point(b, 16)? })
    }

    pub fn total_cmp(&self, other: &GeoBox) -> Ordering {
        point_cmp(&self.high, &other.high).then_with(|| point_cmp(&self.low, &other.low))
    }

    pub fn translate(&self, p: &Point) -> GeoBox { GeoBox::new(self.high.add(p), self.low.add(p)) }

    pub fn scale(&self, p: &Point) -> GeoBox { GeoBox::new(self.high.mul(p), self.low.mul(p)) }

    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.low.x && p.x <= self.high.x && p.y >= self.low.y && p.y <= self.high.y
    }

    pub fn contains_box(&self, b: &GeoBox) -> bool {
        self.contains_point(&b.high) && self.contains_point(&b.low)
    }

    /// `<<`
    pub fn left_of(&self, b: &GeoBox) -> bool { self.high.x < b.low.x }

    /// `>>`
    pub fn right_of(&self, b: &GeoBox) -> bool { self.low.x > b.high.x }

    /// `&&`
    pub fn overlaps(&self, b: &GeoBox) -> bool {
        self.high.x >= b.low.x && b.high.x >= self.low.x && self.high.y >= b.low.y && b.high.y >= self.low.y
    }
}

impl Circle {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(CIRCLE_SIZE);
        put_f64s(&mut out, &[self.center.x, self.center.y, self.radius]);
        out
    }

    pub fn from_bytes(b: &[u8]) -> Result<Circle, Error> {
        Ok(Circle { center: read_point(b, 0)?, radius: read_f64(b, 16)? })
    }

    pub fn total_cmp(&self, other: &Circle) -> Ordering {
        point_cmp(&self.center, &other.center).then_with(|| float_cmp(self.radius, other.radius))
    }

    pub fn translate(&self, p: &Point) -> Circle { Circle { center: self.center.add(p), radius: self.radius } }

    pub fn contains_point(&self, p: &Point) -> bool { self.center.distance(p) <= self.radius }

    pub fn contains_circle(&self, c: &Circle) -> bool {
        self.center.distance(&c.center) + c.radius <= self.radius
    }

    /// `&&`: the discs share a point.
    pub fn overlaps(&self, c: &Circle) -> bool { self.center.distance(&c.center) <= self.radius + c.radius }

    /// Smallest box enclosing the circle.
    pub fn bounding_box(&self) -> GeoBox {
        let r = Point { x: self.radius, y: self.radius };
        GeoBox::new(self.center.add(&r), self.center.sub(&r))
    }
}

fn points_body_len(n: usize) -> usize { n * POINT_SIZE }

fn read_points(b: &[u8], at: usize, n: usize) -> Result<Vec<Point>, Error> {
    (0..n).map(|i| read_point(b, at + i * POINT_SIZE)).collect()
}

fn point_count(b: &[u8]) -> Result<usize, Error> {
    let n = read_i32(b, 0)?;
    if n < 0 {
        return Err(DynError::TruncatedPayload { needed: 0, at: 0, len: b.len() }.into());
    }
    Ok(n as usize)
}

fn inside_polygon(points: &[Point], p: &Point) -> bool {
    let n = points.len();
    if n == 0 {
        return false;
    }
    let mut inside = false;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        if Lseg(a, b).contains_point(p) {
            return true;
        }
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
    }
    inside
}

impl Path {
    pub fn to_body(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(12 + points_body_len(self.points.len()));
        put_i32(&mut out, self.points.len() as i32);
        put_i32(&mut out, self.closed as i32);
        put_i32(&mut out, 0);
        for p in &self.points {
            put_f64s(&mut out, &[p.x, p.y]);
        }
        out
    }

    pub fn from_body(b: &[u8]) -> Result<Path, Error> {
        let n = point_count(b)?;
        Ok(Path { closed: read_i32(b, 4)? != 0, points: read_points(b, 12, n)? })
    }

    pub fn total_cmp(&self, other: &Path) -> Ordering {
        points_cmp(&self.points, &other.points).then(self.closed.cmp(&other.closed))
    }

    pub fn translate(&self, p: &Point) -> Path {
        Path { closed: self.closed, points: self.points.iter().map(|q| q.add(p)).collect() }
    }

    pub fn scale(&self, p: &Point) -> Path {
        Path { closed: self.closed, points: self.points.iter().map(|q| q.mul(p)).collect() }
    }

    /// A closed path contains the points inside it; an open one the points on it.
    pub fn contains_point(&self, p: &Point) -> bool {
        if self.closed {
            inside_polygon(&self.points, p)
        } else {
            self.points.windows(2).any(|w| Lseg(w[0], w[1]).contains_point(p))
        }
    }
}

impl Polygon {
    pub fn bounding_box(&self) -> GeoBox { GeoBox::bounding(&self.points) }

    pub fn to_body(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + BOX_SIZE + points_body_len(self.points.len()));
        put_i32(&mut out, self.points.len() as i32);
        out.extend_from_slice(&self.bounding_box().to_bytes());
        for p in &self.points {
            put_f64s(&mut out, &[p.x, p.y]);
        }
        out
    }

    pub fn from_body(b: &[u8]) -> Result<Polygon, Error> {
        let n = point_count(b)?;
        Ok(Polygon { points: read_points(b, 4 + BOX_SIZE, n)? })
    }

    pub fn total_cmp(&self, other: &Polygon) -> Ordering { points_cmp(&self.points, &other.points) }

    pub fn contains_point(&self, p: &Point) -> bool { inside_polygon(&self.points, p) }

    fn edges(&self) -> impl Iterator<Item = Lseg> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| Lseg(self.points[i], self.points[(i + 1) % n]))
    }

    /// `&&`: the polygons share a point, either along an edge or because one lies inside
    /// the other.
    pub fn overlaps(&self, other: &Polygon) -> bool {
        if self.points.is_empty() || other.points.is_empty() {
            return false;
        }
        if !self.bounding_box().overlaps(&other.bounding_box()) {
            return false;
        }
        if self.edges().any(|e| other.edges().any(|f| e.intersects(&f))) {
            return true;
        }
        other.contains_point(&self.points[0]) || self.contains_point(&other.points[0])
    }
}

/// Splits text into its numbers, recording which bracket characters enclosed it.
struct Scanner<'a> {
    text: &'a str,
    kind: &'static str,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str, kind: &'static str) -> Self { Scanner { text, kind } }

    fn bad(&self) -> Error { DynError::invalid_text(self.kind, self.text).into() }

    fn numbers(&self) -> Result<Vec<f64>, Error> {
        self.text
            .split(|c: char| "()[]{}<>,".contains(c))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f64>().map_err(|_| self.bad()))
            .collect()
    }

    fn points(&self) -> Result<Vec<Point>, Error> {
        let nums = self.numbers()?;
        if nums.is_empty() || nums.len() % 2 != 0 {
            return Err(self.bad());
        }
        Ok(nums.chunks(2).map(|c| Point { x: c[0], y: c[1] }).collect())
    }

    fn fixed_points(&self, n: usize) -> Result<Vec<Point>, Error> {
        let pts = self.points()?;
        if pts.len() != n {
            return Err(self.bad());
        }
        Ok(pts)
    }
}

pub fn parse_point(text: &str) -> Result<Point, Error> {
    Ok(Scanner::new(text, "point").fixed_points(1)?[0])
}

pub fn parse_lseg(text: &str) -> Result<Lseg, Error> {
    let pts = Scanner::new(text, "lseg").fixed_points(2)?;
    Ok(Lseg(pts[0], pts[1]))
}

pub fn parse_line(text: &str) -> Result<Line, Error> {
    let sc = Scanner::new(text, "line");
    let nums = sc.numbers()?;
    match nums.len() {
        3 if text.trim_start().starts_with('{') => {
            if nums[0] == 0.0 && nums[1] == 0.0 {
                return Err(sc.bad());
            }
            Ok(Line { a: nums[0], b: nums[1], c: nums[2] })
        }
        4 => {
            let (p, q) = (Point { x: nums[0], y: nums[1] }, Point { x: nums[2], y: nums[3] });
            if p == q {
                return Err(sc.bad());
            }
            // line through two points
            let a = q.y - p.y;
            let b = p.x - q.x;
            // adding zero turns a negative zero positive
            Ok(Line { a, b, c: 0.0 - (a * p.x + b * p.y) })
        }
        _ => Err(sc.bad()),
    }
}

pub fn parse_box(text: &str) -> Result<GeoBox, Error> {
    let pts = Scanner::new(text, "box").fixed_points(2)?;
    Ok(GeoBox::new(pts[0], pts[1]))
}

pub fn parse_circle(text: &str) -> Result<Circle, Error> {
    let sc = Scanner::new(text, "circle");
    let nums = sc.numbers()?;
    if nums.len() != 3 || nums[2] < 0.0 {
        return Err(sc.bad());
    }
    Ok(Circle { center: Point { x: nums[0], y: nums[1] }, radius: nums[2] })
}

/// `[...]` is open; `(...)` and a bare list are closed.
pub fn parse_path(text: &str) -> Result<Path, Error> {
    let points = Scanner::new(text, "path").points()?;
    Ok(Path { closed: !text.trim_start().starts_with('['), points })
}

pub fn parse_polygon(text: &str) -> Result<Polygon, Error> {
    Ok(Polygon { points: Scanner::new(text, "polygon").points()? })
}

fn fmt_num(f: f64) -> String { format_f64(f, false) }

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", fmt_num(self.x), fmt_num(self.y))
    }
}

fn join_points(points: &[Point]) -> String {
    points.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(",")
}

impl fmt::Display for Lseg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "[{},{}]", self.0, self.1) }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{},{},{}}}", fmt_num(self.a), fmt_num(self.b), fmt_num(self.c))
    }
}

impl fmt::Display for GeoBox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{},{}", self.high, self.low) }
}

impl fmt::Display for Circle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{},{}>", self.center, fmt_num(self.radius))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.closed {
            write!(f, "({})", join_points(&self.points))
        } else {
            write!(f, "[{}]", join_points(&self.points))
        }
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "({})", join_points(&self.points)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_forms() {
        assert_eq!(parse_point("(1, 2.5)").unwrap().to_string(), "(1,2.5)");
        assert_eq!(parse_lseg("[(0,0),(1,1)]").unwrap().to_string(), "[(0,0),(1,1)]");
        assert_eq!(parse_line("{1,-1,0}").unwrap().to_string(), "{1,-1,0}");
        assert_eq!(parse_line("[(0,0),(1,1)]").unwrap().to_string(), "{1,-1,0}");
        assert_eq!(parse_box("(0,0),(2,3)").unwrap().to_string(), "(2,3),(0,0)");
        assert_eq!(parse_circle("<(1,1),2>").unwrap().to_string(), "<(1,1),2>");
        assert_eq!(parse_path("[(0,0),(1,1)]").unwrap().to_string(), "[(0,0),(1,1)]");
        assert_eq!(parse_path("((0,0),(1,1))").unwrap().to_string(), "((0,0),(1,1))");
        assert_eq!(parse_polygon("(0,0),(4,0),(0,4)").unwrap().to_string(), "((0,0),(4,0),(0,4))");
        assert!(parse_point("(1)").is_err());
        assert!(parse_circle("<(1,1),-2>").is_err());
        assert!(parse_line("{0,0,1}").is_err());
    }

    #[test]
    fn bodies() {
        let path = parse_path("((0,0),(1,1))").unwrap();
        let body = path.to_body();
        assert_eq!(body.len(), 12 + 32);
        assert_eq!(&body[..12], &[2, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(Path::from_body(&body).unwrap(), path);
        let poly = parse_polygon("((0,0),(4,0),(0,4))").unwrap();
        let body = poly.to_body();
        assert_eq!(GeoBox::from_bytes(&body[4..]).unwrap(), parse_box("(4,4),(0,0)").unwrap());
        assert_eq!(Polygon::from_body(&body).unwrap(), poly);
        assert!(Path::from_body(&body[..20]).is_err());
        let c = parse_circle("<(1,2),3>").unwrap();
        assert_eq!(Circle::from_bytes(&c.to_bytes()).unwrap(), c);
    }

    #[test]
    fn arithmetic_is_element_wise() {
        let p = Point { x: 2.0, y: 3.0 };
        let q = Point { x: 4.0, y: 6.0 };
        assert_eq!(p.mul(&q), Point { x: 8.0, y: 18.0 });
        assert_eq!(q.div(&p).unwrap(), Point { x: 2.0, y: 2.0 });
        assert!(q.div(&Point { x: 1.0, y: 0.0 }).is_err());
        let b = parse_box("(0,0),(1,1)").unwrap().translate(&p);
        assert_eq!(b.to_string(), "(3,4),(2,3)");
        assert!(p.is_vertical(&Point { x: 2.0, y: -1.0 }));
    }

    #[test]
    fn containment() {
        let b = parse_box("(0,0),(4,4)").unwrap();
        assert!(b.contains_point(&Point { x: 4.0, y: 2.0 }));
        assert!(b.contains_box(&parse_box("(1,1),(2,2)").unwrap()));
        let poly = parse_polygon("((0,0),(4,0),(0,4))").unwrap();
        assert!(poly.contains_point(&Point { x: 1.0, y: 1.0 }));
        assert!(!poly.contains_point(&Point { x: 3.0, y: 3.0 }));
        let open = parse_path("[(0,0),(2,2)]").unwrap();
        assert!(open.contains_point(&Point { x: 1.0, y: 1.0 }));
        assert!(!open.contains_point(&Point { x: 1.0, y: 0.0 }));
        let c = parse_circle("<(0,0),5>").unwrap();
        assert!(c.contains_circle(&parse_circle("<(1,1),1>").unwrap()));
        assert!(b.left_of(&parse_box("(5,0),(6,1)").unwrap()));
        assert!(b.overlaps(&c.bounding_box()));
    }

    #[test]
    fn overlap() {
        let tri = parse_polygon("((0,0),(4,0),(0,4))").unwrap();
        assert!(tri.overlaps(&parse_polygon("((1,1),(5,1),(1,5))").unwrap()));
        assert!(tri.overlaps(&parse_polygon("((0.5,0.5),(1,0.5),(0.5,1))").unwrap()));
        assert!(!tri.overlaps(&parse_polygon("((3,3),(5,3),(3,5))").unwrap()));
        let a = Lseg(Point { x: 0.0, y: 0.0 }, Point { x: 2.0, y: 2.0 });
        assert!(a.intersects(&Lseg(Point { x: 0.0, y: 2.0 }, Point { x: 2.0, y: 0.0 })));
        assert!(!a.intersects(&Lseg(Point { x: 3.0, y: 0.0 }, Point { x: 4.0, y: 0.0 })));
        let c = parse_circle("<(0,0),1>").unwrap();
        assert!(c.overlaps(&parse_circle("<(2,0),1>").unwrap()));
        assert!(!c.overlaps(&parse_circle("<(3,0),1>").unwrap()));
    }

    #[test]
    fn ordering() {
        let p = Point { x: 1.0, y: f64::NAN };
        let q = Point { x: 1.0, y: 1e300 };
        assert_eq!(p.total_cmp(&q), Ordering::Greater);
        let short = parse_path("[(9,9)]").unwrap();
        let long = parse_path("[(0,0),(1,1)]").unwrap();
        assert_eq!(short.total_cmp(&long), Ordering::Less);
    }
}
