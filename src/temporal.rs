//! Dates, times and intervals.
//!
//! Instants count microseconds from `2000-01-01 00:00:00`; dates count days from the same
//! epoch. `i64::MIN`/`i64::MAX` (and `i32::MIN`/`i32::MAX` for dates) stand for
//! `-infinity`/`infinity`. Time zones are stored as seconds *west* of UTC.

use crate::errors::DynError;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use failure::Error;
use std::{cmp::Ordering, fmt};

pub const USECS_PER_SEC: i64 = 1_000_000;
pub const USECS_PER_MINUTE: i64 = 60 * USECS_PER_SEC;
pub const USECS_PER_HOUR: i64 = 60 * USECS_PER_MINUTE;
pub const USECS_PER_DAY: i64 = 24 * USECS_PER_HOUR;
pub const DAYS_PER_MONTH: i64 = 30;

pub const TIMESTAMP_NOBEGIN: i64 = i64::min_value();
pub const TIMESTAMP_NOEND: i64 = i64::max_value();
pub const DATE_NOBEGIN: i32 = i32::min_value();
pub const DATE_NOEND: i32 = i32::max_value();

fn epoch_date() -> NaiveDate { NaiveDate::from_ymd(2000, 1, 1) }

fn epoch() -> NaiveDateTime { epoch_date().and_hms(0, 0, 0) }

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Time of day with a zone offset.
pub struct TimeTz {
    /// Microseconds since midnight.
    pub time: i64,
    /// Seconds west of UTC.
    pub zone: i32,
}

impl TimeTz {
    /// `time` in the UTC zone.
    pub fn utc(time: i64) -> TimeTz { TimeTz { time, zone: 0 } }

    /// The same instant expressed in UTC.
    pub fn utc_time(&self) -> i64 { self.time + self.zone as i64 * USECS_PER_SEC }

    /// Order by UTC-equivalent time, then by zone.
    pub fn total_cmp(&self, other: &TimeTz) -> Ordering {
        self.utc_time()
            .cmp(&other.utc_time())
            .then(self.zone.cmp(&other.zone))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
/// A span of months, days and microseconds.
pub struct Interval {
    /// Microseconds.
    pub time: i64,
    /// Days.
    pub day: i32,
    /// Months.
    pub month: i32,
}

impl Interval {
    /// Length with a month counted as 30 days, in microseconds.
    pub fn span(&self) -> i128 {
        self.time as i128
            + (self.month as i128 * DAYS_PER_MONTH as i128 + self.day as i128) * USECS_PER_DAY as i128
    }

    /// Total order by [`Interval::span`].
    pub fn total_cmp(&self, other: &Interval) -> Ordering { self.span().cmp(&other.span()) }

    /// Component-wise sum.
    pub fn add(&self, other: &Interval) -> Result<Interval, Error> {
        Ok(Interval {
            time: self.time.checked_add(other.time).ok_or_else(interval_overflow)?,
            day: self.day.checked_add(other.day).ok_or_else(interval_overflow)?,
            month: self.month.checked_add(other.month).ok_or_else(interval_overflow)?,
        })
    }

    /// Component-wise difference.
    pub fn sub(&self, other: &Interval) -> Result<Interval, Error> { self.add(&other.neg()?) }

    /// Negation.
    pub fn neg(&self) -> Result<Interval, Error> {
        Ok(Interval {
            time: self.time.checked_neg().ok_or_else(interval_overflow)?,
            day: self.day.checked_neg().ok_or_else(interval_overflow)?,
            month: self.month.checked_neg().ok_or_else(interval_overflow)?,
        })
    }

    /// Scales by `factor`, cascading fractional months into days and fractional days
    /// into microseconds.
    pub fn mul(&self, factor: f64) -> Result<Interval, Error> {
        let months = self.month as f64 * factor;
        let month = months.trunc();
        let days = self.day as f64 * factor + (months - month) * DAYS_PER_MONTH as f64;
        let day = days.trunc();
        let time = (self.time as f64 * factor + (days - day) * USECS_PER_DAY as f64).round();
        let fits_i32 = |f: f64| f.is_finite() && f >= i32::min_value() as f64 && f <= i32::max_value() as f64;
        if !fits_i32(month) || !fits_i32(day) || !time.is_finite() || time.abs() >= 9.2e18 {
            return Err(interval_overflow());
        }
        Ok(Interval { time: time as i64, day: day as i32, month: month as i32 })
    }

    /// Divides by `divisor`.
    pub fn div(&self, divisor: f64) -> Result<Interval, Error> {
        if divisor == 0.0 {
            return Err(DynError::DivisionByZero.into());
        }
        self.mul(1.0 / divisor)
    }
}

fn interval_overflow() -> Error { DynError::NumericOverflow { what: "interval" }.into() }

fn timestamp_overflow() -> Error { DynError::NumericOverflow { what: "timestamp" }.into() }

/// Splits `2020-01-01 10:00:00+02` into the local part and the zone in seconds east.
fn split_zone(s: &str) -> Result<(&str, Option<i32>), Error> {
    let s = s.trim();
    if s.ends_with('Z') || s.ends_with('z') {
        return Ok((&s[..s.len() - 1], Some(0)));
    }
    if s.len() > 3 && s.to_ascii_uppercase().ends_with("UTC") {
        return Ok((s[..s.len() - 3].trim_end(), Some(0)));
    }
    // skip the date part so its dashes are not taken for a zone sign
    let search_from = s.find(|c| c == ' ' || c == 'T' || c == ':').unwrap_or(s.len());
    let start = match s[search_from..].rfind(|c| c == '+' || c == '-') {
        Some(i) => search_from + i,
        None => return Ok((s, None)),
    };
    let sign = if s.as_bytes()[start] == b'-' { -1 } else { 1 };
    let zone = &s[start + 1..];
    let parts: Vec<&str> = if zone.contains(':') {
        zone.split(':').collect()
    } else if zone.len() > 2 {
        let (h, rest) = zone.split_at(2);
        if rest.len() > 2 {
            let (m, sec) = rest.split_at(2);
            vec![h, m, sec]
        } else {
            vec![h, rest]
        }
    } else {
        vec![zone]
    };
    let mut secs = 0i32;
    for (i, p) in parts.iter().enumerate() {
        let v: i32 = p.parse().map_err(|_| DynError::invalid_text("time zone", zone))?;
        secs += v * [3600, 60, 1].get(i).cloned().unwrap_or(0);
    }
    if parts.len() > 3 || secs > 15 * 3600 + 59 * 60 + 59 {
        return Err(DynError::invalid_text("time zone", zone).into());
    }
    Ok((s[..start].trim_end(), Some(sign * secs)))
}

fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    if s == "24:00:00" || s == "24:00" {
        return None;
    }
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

fn parse_naive_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn parse_naive_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    match s.find(|c| c == ' ' || c == 'T') {
        Some(i) => {
            let date = parse_naive_date(&s[..i])?;
            let time = parse_time_of_day(&s[i + 1..])?;
            Some(date.and_time(time))
        }
        None => parse_naive_date(s).map(|d| d.and_hms(0, 0, 0)),
    }
}

fn micros_since_epoch(dt: NaiveDateTime) -> Result<i64, Error> {
    dt.signed_duration_since(epoch())
        .num_microseconds()
        .ok_or_else(timestamp_overflow)
}

fn special_instant(s: &str) -> Option<i64> {
    match s.trim().to_ascii_lowercase().as_str() {
        "infinity" | "+infinity" => Some(TIMESTAMP_NOEND),
        "-infinity" => Some(TIMESTAMP_NOBEGIN),
        "epoch" => Some(micros_since_epoch(NaiveDate::from_ymd(1970, 1, 1).and_hms(0, 0, 0)).unwrap_or(0)),
        _ => None,
    }
}

/// Parses a timestamp without time zone; a trailing zone is ignored.
pub fn parse_timestamp(text: &str) -> Result<i64, Error> {
    if let Some(v) = special_instant(text) {
        return Ok(v);
    }
    let (local, _) = split_zone(text)?;
    let dt = parse_naive_datetime(local).ok_or_else(|| DynError::invalid_text("timestamp", text))?;
    micros_since_epoch(dt)
}

/// Parses a timestamp with time zone into UTC microseconds; no zone means UTC.
pub fn parse_timestamptz(text: &str) -> Result<i64, Error> {
    if let Some(v) = special_instant(text) {
        return Ok(v);
    }
    let (local, zone) = split_zone(text)?;
    let dt = parse_naive_datetime(local)
        .ok_or_else(|| DynError::invalid_text("timestamp with time zone", text))?;
    let offset = zone.unwrap_or(0) as i64 * USECS_PER_SEC;
    micros_since_epoch(dt)?
        .checked_sub(offset)
        .ok_or_else(timestamp_overflow)
}

fn format_micros(us: i64) -> Option<String> {
    let dt = epoch().checked_add_signed(Duration::microseconds(us))?;
    let mut out = dt.format("%Y-%m-%d %H:%M:%S").to_string();
    push_fraction(&mut out, (dt.nanosecond() / 1000) as i64);
    Some(out)
}

fn push_fraction(out: &mut String, micros: i64) {
    if micros != 0 {
        let frac = format!("{:06}", micros);
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS[.ffffff]`.
pub fn format_timestamp(us: i64) -> String {
    match us {
        TIMESTAMP_NOBEGIN => "-infinity".into(),
        TIMESTAMP_NOEND => "infinity".into(),
        _ => format_micros(us).unwrap_or_else(|| "infinity".into()),
    }
}

/// Formats a timestamp with time zone in UTC, suffixed `+00`.
pub fn format_timestamptz(us: i64) -> String {
    match us {
        TIMESTAMP_NOBEGIN | TIMESTAMP_NOEND => format_timestamp(us),
        _ => format!("{}+00", format_timestamp(us)),
    }
}

/// Parses `YYYY-MM-DD` into days since the epoch.
pub fn parse_date(text: &str) -> Result<i32, Error> {
    match text.trim().to_ascii_lowercase().as_str() {
        "infinity" | "+infinity" => return Ok(DATE_NOEND),
        "-infinity" => return Ok(DATE_NOBEGIN),
        _ => {}
    }
    let (local, _) = split_zone(text)?;
    let date = parse_naive_datetime(local)
        .map(|dt| dt.date())
        .ok_or_else(|| DynError::invalid_text("date", text))?;
    Ok(date.signed_duration_since(epoch_date()).num_days() as i32)
}

/// Formats days since the epoch as `YYYY-MM-DD`.
pub fn format_date(days: i32) -> String {
    match days {
        DATE_NOBEGIN => "-infinity".into(),
        DATE_NOEND => "infinity".into(),
        _ => epoch_date()
            .checked_add_signed(Duration::days(days as i64))
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "infinity".into()),
    }
}

/// The instant of midnight at the start of `days`.
pub fn date_to_timestamp(days: i32) -> i64 {
    match days {
        DATE_NOBEGIN => TIMESTAMP_NOBEGIN,
        DATE_NOEND => TIMESTAMP_NOEND,
        _ => days as i64 * USECS_PER_DAY,
    }
}

/// The day containing the instant.
pub fn timestamp_to_date(us: i64) -> Result<i32, Error> {
    match us {
        TIMESTAMP_NOBEGIN => Ok(DATE_NOBEGIN),
        TIMESTAMP_NOEND => Ok(DATE_NOEND),
        _ => {
            let days = us.div_euclid(USECS_PER_DAY);
            if days.abs() >= DATE_NOEND as i64 {
                Err(DynError::NumericOverflow { what: "date" }.into())
            } else {
                Ok(days as i32)
            }
        }
    }
}

/// Parses a time of day into microseconds since midnight.
pub fn parse_time(text: &str) -> Result<i64, Error> {
    let (local, _) = split_zone(text)?;
    time_micros(local).ok_or_else(|| DynError::invalid_text("time", text).into())
}

fn time_micros(s: &str) -> Option<i64> {
    let s = s.trim();
    if s == "24:00:00" || s == "24:00" {
        return Some(USECS_PER_DAY);
    }
    // a leading date is allowed and ignored
    let s = match s.find(' ') {
        Some(i) if parse_naive_date(&s[..i]).is_some() => &s[i + 1..],
        _ => s,
    };
    let t = parse_time_of_day(s)?;
    Some(t.num_seconds_from_midnight() as i64 * USECS_PER_SEC + (t.nanosecond() / 1000) as i64)
}

/// Formats microseconds since midnight as `HH:MM:SS[.ffffff]`.
pub fn format_time(us: i64) -> String {
    let secs = us / USECS_PER_SEC;
    let mut out = format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60);
    push_fraction(&mut out, us % USECS_PER_SEC);
    out
}

/// Parses a time of day with a zone; no zone means UTC.
pub fn parse_timetz(text: &str) -> Result<TimeTz, Error> {
    let (local, zone) = split_zone(text)?;
    let time = time_micros(local)
        .ok_or_else(|| DynError::invalid_text("time with time zone", text))?;
    Ok(TimeTz { time, zone: -zone.unwrap_or(0) })
}

fn format_zone(west: i32) -> String {
    let east = -west;
    let sign = if east < 0 { '-' } else { '+' };
    let e = east.abs();
    let mut out = format!("{}{:02}", sign, e / 3600);
    if e % 3600 != 0 {
        out.push_str(&format!(":{:02}", e / 60 % 60));
        if e % 60 != 0 {
            out.push_str(&format!(":{:02}", e % 60));
        }
    }
    out
}

/// Formats a time with zone, e.g. `10:00:00+02`.
pub fn format_timetz(t: &TimeTz) -> String { format!("{}{}", format_time(t.time), format_zone(t.zone)) }

fn add_months(dt: NaiveDateTime, months: i32) -> Result<NaiveDateTime, Error> {
    if months == 0 {
        return Ok(dt);
    }
    let total = dt.year() as i64 * 12 + dt.month0() as i64 + months as i64;
    let year = total.div_euclid(12) as i32;
    let month = total.rem_euclid(12) as u32 + 1;
    let mut day = dt.day();
    loop {
        if let Some(d) = NaiveDate::from_ymd_opt(year, month, day) {
            return Ok(d.and_time(dt.time()));
        }
        if day <= 28 {
            return Err(timestamp_overflow());
        }
        day -= 1;
    }
}

/// Adds an interval to an instant with calendar semantics for months and days.
pub fn timestamp_add_interval(us: i64, span: &Interval) -> Result<i64, Error> {
    if us == TIMESTAMP_NOBEGIN || us == TIMESTAMP_NOEND {
        return Ok(us);
    }
    let dt = epoch()
        .checked_add_signed(Duration::microseconds(us))
        .ok_or_else(timestamp_overflow)?;
    let dt = add_months(dt, span.month)?;
    let dt = dt
        .checked_add_signed(Duration::days(span.day as i64))
        .and_then(|d| d.checked_add_signed(Duration::microseconds(span.time)))
        .ok_or_else(timestamp_overflow)?;
    micros_since_epoch(dt)
}

/// Subtracts an interval from an instant.
pub fn timestamp_sub_interval(us: i64, span: &Interval) -> Result<i64, Error> {
    timestamp_add_interval(us, &span.neg()?)
}

/// Difference of two instants as an interval of days and microseconds.
pub fn timestamp_diff(a: i64, b: i64) -> Result<Interval, Error> {
    let diff = a.checked_sub(b).ok_or_else(interval_overflow)?;
    Ok(Interval { time: diff % USECS_PER_DAY, day: (diff / USECS_PER_DAY) as i32, month: 0 })
}

/// Adds an interval's time part to a time of day, wrapping around midnight.
pub fn time_add_interval(us: i64, span: &Interval) -> i64 {
    (us + span.time % USECS_PER_DAY).rem_euclid(USECS_PER_DAY)
}

const UNITS: &[(&str, char)] = &[
    ("years", 'y'), ("year", 'y'), ("yrs", 'y'), ("yr", 'y'), ("y", 'y'),
    ("months", 'M'), ("month", 'M'), ("mons", 'M'), ("mon", 'M'),
    ("weeks", 'w'), ("week", 'w'), ("w", 'w'),
    ("days", 'd'), ("day", 'd'), ("d", 'd'),
    ("hours", 'h'), ("hour", 'h'), ("hrs", 'h'), ("hr", 'h'), ("h", 'h'),
    ("minutes", 'm'), ("minute", 'm'), ("mins", 'm'), ("min", 'm'), ("m", 'm'),
    ("seconds", 's'), ("second", 's'), ("secs", 's'), ("sec", 's'), ("s", 's'),
    ("milliseconds", 'l'), ("millisecond", 'l'), ("msecs", 'l'), ("msec", 'l'), ("ms", 'l'),
    ("microseconds", 'u'), ("microsecond", 'u'), ("usecs", 'u'), ("usec", 'u'), ("us", 'u'),
];

#[derive(Default)]
struct IntervalAccum {
    month: f64,
    day: f64,
    time: f64,
}

impl IntervalAccum {
    fn add(&mut self, value: f64, unit: char) {
        match unit {
            'y' => self.month += value * 12.0,
            'M' => self.month += value,
            'w' => self.day += value * 7.0,
            'd' => self.day += value,
            'h' => self.time += value * USECS_PER_HOUR as f64,
            'm' => self.time += value * USECS_PER_MINUTE as f64,
            's' => self.time += value * USECS_PER_SEC as f64,
            'l' => self.time += value * 1000.0,
            _ => self.time += value,
        }
    }

    fn finish(self, negate: bool) -> Result<Interval, Error> {
        let sign = if negate { -1.0 } else { 1.0 };
        let month = self.month.trunc();
        let days = self.day + (self.month - month) * DAYS_PER_MONTH as f64;
        let day = days.trunc();
        let time = self.time + (days - day) * USECS_PER_DAY as f64;
        Interval { time: time.round() as i64, day: day as i32, month: month as i32 }.mul(sign)
    }
}

fn parse_clock(s: &str) -> Option<f64> {
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }
    let h: f64 = parts[0].parse().ok()?;
    let m: f64 = parts[1].parse().ok()?;
    let sec: f64 = match parts.get(2) {
        Some(p) => p.parse().ok()?,
        None => 0.0,
    };
    let us = (h * 3600.0 + m * 60.0 + sec) * USECS_PER_SEC as f64;
    Some(if negative { -us } else { us })
}

fn parse_iso_interval(text: &str, s: &str) -> Result<Interval, Error> {
    let bad = || -> Error { DynError::invalid_text("interval", text).into() };
    let mut acc = IntervalAccum::default();
    let mut in_time = false;
    let mut num = String::new();
    for c in s[1..].chars() {
        match c {
            'T' | 't' => in_time = true,
            '0'..='9' | '.' | '-' | '+' => num.push(c),
            _ => {
                let v: f64 = num.parse().map_err(|_| bad())?;
                num.clear();
                let unit = match (c.to_ascii_uppercase(), in_time) {
                    ('Y', false) => 'y',
                    ('M', false) => 'M',
                    ('W', false) => 'w',
                    ('D', false) => 'd',
                    ('H', true) => 'h',
                    ('M', true) => 'm',
                    ('S', true) => 's',
                    _ => return Err(bad()),
                };
                acc.add(v, unit);
            }
        }
    }
    if !num.is_empty() {
        return Err(bad());
    }
    acc.finish(false)
}

/// Parses an interval: unit groups such as `1 year 2 mons`, an optional clock
/// `HH:MM:SS`, an optional trailing `ago`, or ISO-8601 `P1Y2M3DT4H5M6S`.
pub fn parse_interval(text: &str) -> Result<Interval, Error> {
    let bad = || -> Error { DynError::invalid_text("interval", text).into() };
    let s = text.trim();
    if s.starts_with('P') || s.starts_with('p') {
        return parse_iso_interval(text, s);
    }
    let mut acc = IntervalAccum::default();
    let mut ago = false;
    let mut pending: Option<f64> = None;
    let mut seen = false;
    for word in s.split_whitespace() {
        let lower = word.to_ascii_lowercase();
        let lower = lower.trim_end_matches(',');
        if lower == "@" {
            continue;
        }
        if lower == "ago" {
            ago = true;
            continue;
        }
        if lower.contains(':') {
            if pending.is_some() {
                return Err(bad());
            }
            acc.add(parse_clock(lower).ok_or_else(bad)?, 'u');
            seen = true;
            continue;
        }
        // "3days" splits into number and unit
        let split = lower
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or_else(|| lower.len());
        let (num, unit) = lower.split_at(split);
        if !num.is_empty() {
            if pending.is_some() {
                return Err(bad());
            }
            pending = Some(num.parse().map_err(|_| bad())?);
        }
        if !unit.is_empty() {
            let value = pending.take().ok_or_else(bad)?;
            let code = UNITS
                .iter()
                .find(|(name, _)| *name == unit)
                .map(|(_, code)| *code)
                .ok_or_else(bad)?;
            acc.add(value, code);
            seen = true;
        }
    }
    // a bare number is seconds
    if let Some(v) = pending {
        acc.add(v, 's');
        seen = true;
    }
    if !seen {
        return Err(bad());
    }
    acc.finish(ago)
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{} {}", n, unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut parts = Vec::new();
        let years = self.month / 12;
        let mons = self.month % 12;
        if years != 0 {
            parts.push(plural(years as i64, "year"));
        }
        if mons != 0 {
            parts.push(plural(mons as i64, "mon"));
        }
        if self.day != 0 {
            parts.push(plural(self.day as i64, "day"));
        }
        if self.time != 0 || parts.is_empty() {
            let sign = if self.time < 0 { "-" } else { "" };
            parts.push(format!("{}{}", sign, format_time(self.time.abs())));
        }
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps() {
        assert_eq!(parse_timestamp("2000-01-01 00:00:00").unwrap(), 0);
        assert_eq!(parse_timestamp("2000-01-02").unwrap(), USECS_PER_DAY);
        let ts = parse_timestamp("2020-02-29T13:45:01.25").unwrap();
        assert_eq!(format_timestamp(ts), "2020-02-29 13:45:01.25");
        assert_eq!(parse_timestamp("infinity").unwrap(), TIMESTAMP_NOEND);
        assert_eq!(format_timestamp(TIMESTAMP_NOBEGIN), "-infinity");
        assert!(parse_timestamp("2020-13-01").is_err());
    }

    #[test]
    fn timestamptz_is_utc() {
        let a = parse_timestamptz("2000-01-01 02:00:00+02").unwrap();
        assert_eq!(a, 0);
        let b = parse_timestamptz("2000-01-01T00:00:00Z").unwrap();
        assert_eq!(b, 0);
        assert_eq!(format_timestamptz(3 * USECS_PER_HOUR), "2000-01-01 03:00:00+00");
        assert_eq!(parse_timestamptz("1999-12-31 19:30:00-04:30").unwrap(), 0);
    }

    #[test]
    fn dates_and_times() {
        assert_eq!(parse_date("2000-01-31").unwrap(), 30);
        assert_eq!(parse_date("1999-12-31").unwrap(), -1);
        assert_eq!(format_date(366), "2001-01-01");
        assert_eq!(date_to_timestamp(1), USECS_PER_DAY);
        assert_eq!(timestamp_to_date(-1).unwrap(), -1);
        assert_eq!(parse_time("04:05:06.5").unwrap(), 4 * USECS_PER_HOUR + 5 * USECS_PER_MINUTE + 6_500_000);
        assert_eq!(format_time(USECS_PER_HOUR + 1), "01:00:00.000001");
        let t = parse_timetz("10:00:00+02").unwrap();
        assert_eq!(t.zone, -7200);
        assert_eq!(format_timetz(&t), "10:00:00+02");
        assert_eq!(format_timetz(&parse_timetz("10:00-05:30").unwrap()), "10:00:00-05:30");
    }

    #[test]
    fn timetz_order() {
        let a = parse_timetz("10:00:00+02").unwrap();
        let b = parse_timetz("09:00:00+01").unwrap();
        // same instant, ordered by zone
        assert_eq!(a.utc_time(), b.utc_time());
        assert_eq!(a.total_cmp(&b), Ordering::Less);
    }

    #[test]
    fn intervals() {
        let i = parse_interval("1 year 2 mons 3 days 04:05:06").unwrap();
        assert_eq!(i, Interval { month: 14, day: 3, time: 14_706_000_000 });
        assert_eq!(i.to_string(), "1 year 2 mons 3 days 04:05:06");
        assert_eq!(parse_interval("1 day ago").unwrap().to_string(), "-1 days");
        assert_eq!(parse_interval("1.5 days").unwrap(), Interval { month: 0, day: 1, time: 12 * USECS_PER_HOUR });
        assert_eq!(parse_interval("P1Y2M3DT4H5M6S").unwrap(), i);
        assert_eq!(parse_interval("30").unwrap().time, 30 * USECS_PER_SEC);
        assert_eq!(Interval::default().to_string(), "00:00:00");
        assert!(parse_interval("3 fortnights").is_err());
        assert!(parse_interval("").is_err());
    }

    #[test]
    fn interval_order_uses_30_day_months() {
        let month = Interval { month: 1, day: 0, time: 0 };
        let days = Interval { month: 0, day: 30, time: 0 };
        assert_eq!(month.total_cmp(&days), Ordering::Equal);
        assert_eq!(month.mul(0.5).unwrap(), Interval { month: 0, day: 15, time: 0 });
        assert!(month.div(0.0).is_err());
    }

    #[test]
    fn calendar_arithmetic() {
        let jan31 = parse_timestamp("2001-01-31").unwrap();
        let plus = timestamp_add_interval(jan31, &Interval { month: 1, day: 0, time: 0 }).unwrap();
        assert_eq!(format_timestamp(plus), "2001-02-28 00:00:00");
        assert_eq!(time_add_interval(23 * USECS_PER_HOUR, &Interval { time: 2 * USECS_PER_HOUR, day: 0, month: 0 }), USECS_PER_HOUR);
        let d = timestamp_diff(USECS_PER_DAY + 5, 0).unwrap();
        assert_eq!((d.day, d.time), (1, 5));
    }
}
