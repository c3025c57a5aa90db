// src/pac/temporal.rs
//! `weekdayRange`, `dateRange` and `timeRange`.
//!
//! All three take a loosely typed positional argument list whose meaning
//! depends on how many arguments there are and what each one looks like.
//! A trailing `"GMT"` switches every clock reading from local time to UTC.
//!
//! Arguments are parsed the way a JavaScript host would see them: `dateRange`
//! classifies each value with `parseInt` semantics, `timeRange` compares with
//! `ToNumber` semantics. Date fields are set one at a time with the overflow
//! rules of the JavaScript `Date` setters, so `APR 31` is `MAY 1`.

use crate::context::PacContext;
use crate::error::{PacError, Result};
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike,
};
use std::fmt;

const WEEKDAYS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];
const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// One positional argument as handed over by the script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemporalArg {
    Int(i64),
    Text(String),
}

impl TemporalArg {
    fn is_gmt(&self) -> bool {
        matches!(self, TemporalArg::Text(s) if s == "GMT")
    }

    /// JavaScript `parseInt(value)`.
    fn parse_int(&self) -> Option<i64> {
        match self {
            TemporalArg::Int(n) => Some(*n),
            TemporalArg::Text(s) => parse_int(s),
        }
    }

    /// JavaScript `ToNumber(value)`; `None` stands for `NaN`.
    fn to_number(&self) -> Option<f64> {
        match self {
            TemporalArg::Int(n) => Some(*n as f64),
            TemporalArg::Text(s) => to_number(s),
        }
    }

    fn text(&self) -> Option<&str> {
        match self {
            TemporalArg::Text(s) => Some(s),
            TemporalArg::Int(_) => None,
        }
    }
}

impl From<i64> for TemporalArg {
    fn from(n: i64) -> Self {
        TemporalArg::Int(n)
    }
}

impl From<i32> for TemporalArg {
    fn from(n: i32) -> Self {
        TemporalArg::Int(n.into())
    }
}

impl From<&str> for TemporalArg {
    fn from(s: &str) -> Self {
        TemporalArg::Text(s.to_string())
    }
}

impl From<String> for TemporalArg {
    fn from(s: String) -> Self {
        TemporalArg::Text(s)
    }
}

impl fmt::Display for TemporalArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemporalArg::Int(n) => write!(f, "{}", n),
            TemporalArg::Text(s) => write!(f, "{:?}", s),
        }
    }
}

fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (radix, s) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(rest) => (16, rest),
        None => (10, s),
    };
    let end = s.find(|c: char| !c.is_digit(radix)).unwrap_or(s.len());
    let digits = &s[..end];
    if digits.is_empty() {
        return None;
    }
    // Only overflow can fail here; JavaScript would give a huge number.
    let value = i64::from_str_radix(digits, radix).unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

fn to_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok().map(|n| n as f64);
    }
    // Rust accepts "inf" and "nan", JavaScript does not.
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    s.parse::<f64>().ok()
}

/// How `dateRange` reads a single argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Not a number: a month name, possibly an unknown one.
    Name(String),
    /// Below 32: a day of the month.
    SmallInt(i64),
    /// 32 and above: a year.
    LargeInt(i64),
}

pub fn classify(arg: &TemporalArg) -> Token {
    match arg.parse_int() {
        Some(n) if n < 32 => Token::SmallInt(n),
        Some(n) => Token::LargeInt(n),
        None => Token::Name(arg.text().unwrap_or_default().to_string()),
    }
}

fn weekday_index(arg: &TemporalArg) -> Option<u32> {
    let name = arg.text()?;
    WEEKDAYS.iter().position(|d| *d == name).map(|i| i as u32)
}

fn month_index(name: &str) -> Option<u32> {
    MONTHS.iter().position(|m| *m == name).map(|i| i as u32)
}

/// Strip a trailing `"GMT"` marker.
fn split_gmt(args: &[TemporalArg]) -> (&[TemporalArg], bool) {
    match args.split_last() {
        Some((last, rest)) if last.is_gmt() => (rest, true),
        _ => (args, false),
    }
}

/// Wall-clock reading of `now`, in local time or in UTC.
fn wall_clock(now: DateTime<FixedOffset>, gmt: bool) -> NaiveDateTime {
    let reading = if gmt { now.naive_utc() } else { now.naive_local() };
    reading.with_nanosecond(0).unwrap_or(reading)
}

/// `weekdayRange(wd1, [wd2], ["GMT"])`
///
/// The range never wraps: `weekdayRange("FRI", "MON")` is false every day.
pub fn weekday_range(ctx: &PacContext, args: &[TemporalArg]) -> bool {
    if args.is_empty() {
        return false;
    }
    let (args, gmt) = split_gmt(args);
    let today = wall_clock(ctx.now(), gmt).weekday().num_days_from_sunday();

    let first = args.first().and_then(weekday_index);
    let last = if args.len() == 2 {
        weekday_index(&args[1])
    } else {
        first
    };

    match (first, last) {
        (Some(first), Some(last)) => first <= today && today <= last,
        _ => false,
    }
}

/// Argument shapes accepted by `dateRange`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateShape {
    /// One value compared against a single field of today's date.
    Single(Token),
    /// The first half of the arguments moves the start bound, the second half
    /// the end bound.
    Range { start: Vec<Token>, end: Vec<Token> },
}

impl DateShape {
    pub fn parse(args: &[TemporalArg]) -> Self {
        if let [only] = args {
            return DateShape::Single(classify(only));
        }
        let (start, end) = args.split_at(args.len() / 2);
        DateShape::Range {
            start: start.iter().map(classify).collect(),
            end: end.iter().map(classify).collect(),
        }
    }
}

/// Build a date from possibly out-of-range fields, carrying overflow into the
/// next larger field the way `Date` does.
fn compose(year: i64, month0: i64, day: i64, time: NaiveTime) -> Option<NaiveDateTime> {
    let year = year.checked_add(month0.div_euclid(12))?;
    let month = u32::try_from(month0.rem_euclid(12)).ok()? + 1;
    let first = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, 1)?;
    let date = first.checked_add_signed(TimeDelta::try_days(day.checked_sub(1)?)?)?;
    Some(date.and_time(time))
}

fn set_year(dt: NaiveDateTime, year: i64) -> Option<NaiveDateTime> {
    compose(year, dt.month0().into(), dt.day().into(), dt.time())
}

fn set_month(dt: NaiveDateTime, month0: i64) -> Option<NaiveDateTime> {
    compose(dt.year().into(), month0, dt.day().into(), dt.time())
}

fn set_day(dt: NaiveDateTime, day: i64) -> Option<NaiveDateTime> {
    compose(dt.year().into(), dt.month0().into(), day, dt.time())
}

fn apply(dt: NaiveDateTime, token: &Token) -> Option<NaiveDateTime> {
    match token {
        // An unknown name becomes month -1: December of the previous year.
        Token::Name(name) => set_month(dt, month_index(name).map_or(-1, i64::from)),
        Token::SmallInt(day) => set_day(dt, *day),
        Token::LargeInt(year) => set_year(dt, *year),
    }
}

/// `dateRange(...)`, see the module docs for the accepted shapes.
pub fn date_range(ctx: &PacContext, args: &[TemporalArg]) -> bool {
    if args.is_empty() {
        return false;
    }
    let (args, gmt) = split_gmt(args);
    let now = ctx.now();
    let today = wall_clock(now, gmt);

    match DateShape::parse(args) {
        DateShape::Single(Token::Name(name)) => month_index(&name) == Some(today.month0()),
        DateShape::Single(Token::SmallInt(day)) => i64::from(today.day()) == day,
        DateShape::Single(Token::LargeInt(year)) => i64::from(today.year()) == year,
        DateShape::Range { start, end } => {
            within_dates(wall_clock(now, false), today, &start, &end, args.len() <= 2)
                .unwrap_or(false)
        }
    }
}

/// `None` when a bound falls outside the representable calendar.
fn within_dates(
    local: NaiveDateTime,
    today: NaiveDateTime,
    start: &[Token],
    end: &[Token],
    short_form: bool,
) -> Option<bool> {
    let year = i64::from(local.year());
    let mut date1 = compose(year, 0, 1, NaiveTime::MIN)?;
    let mut date2 = compose(year, 11, 31, NaiveTime::from_hms_opt(23, 59, 59)?)?;

    let mut same_month = false;
    for token in start {
        if matches!(token, Token::SmallInt(_)) {
            same_month = short_form;
        }
        date1 = apply(date1, token)?;
    }
    for token in end {
        date2 = apply(date2, token)?;
    }

    // dateRange(day1, day2) ranges over the current month.
    if same_month {
        date1 = set_month(date1, local.month0().into())?;
        date2 = set_month(date2, local.month0().into())?;
    }

    Some(date1 <= today && today <= date2)
}

/// Argument shapes accepted by `timeRange`.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeShape {
    /// `timeRange(hour)`
    Hour(Option<f64>),
    /// `timeRange(hour1, hour2)`
    Hours(Option<f64>, Option<f64>),
    /// Four or six arguments, as seconds since midnight. `None` when a field
    /// is not a finite number.
    Window { start: Option<i64>, end: Option<i64> },
}

impl TimeShape {
    pub fn parse(args: &[TemporalArg]) -> Result<Self> {
        let n = |i: usize| args[i].to_number();
        match args.len() {
            1 => Ok(TimeShape::Hour(n(0))),
            2 => Ok(TimeShape::Hours(n(0), n(1))),
            4 => Ok(TimeShape::Window {
                start: seconds_of_day(n(0), n(1), Some(0.0)),
                end: seconds_of_day(n(2), n(3), Some(59.0)),
            }),
            6 => Ok(TimeShape::Window {
                start: seconds_of_day(n(0), n(1), n(2)),
                end: seconds_of_day(n(3), n(4), n(5)),
            }),
            count => Err(PacError::BadArgumentCount {
                function: "timeRange",
                count,
            }),
        }
    }
}

fn seconds_of_day(hour: Option<f64>, minute: Option<f64>, second: Option<f64>) -> Option<i64> {
    let field = |v: Option<f64>| v.filter(|n| n.is_finite()).map(|n| n.trunc() as i64);
    Some(
        field(hour)?
            .saturating_mul(3600)
            .saturating_add(field(minute)?.saturating_mul(60))
            .saturating_add(field(second)?),
    )
}

/// `timeRange(...)`
///
/// Unlike every other primitive this one fails loudly: an argument count
/// other than 1, 2, 4 or 6 (not counting `"GMT"`) is an error for the script.
///
/// Windows compare seconds since midnight of the chosen clock, so with
/// `"GMT"` a window never shifts by a day around local midnight.
pub fn time_range(ctx: &PacContext, args: &[TemporalArg]) -> Result<bool> {
    if args.is_empty() {
        return Ok(false);
    }
    let (args, gmt) = split_gmt(args);
    let now = wall_clock(ctx.now(), gmt);
    let hour = f64::from(now.hour());
    let second = i64::from(now.num_seconds_from_midnight());

    let matched = match TimeShape::parse(args)? {
        TimeShape::Hour(h) => h == Some(hour),
        TimeShape::Hours(Some(from), Some(to)) => from <= hour && hour <= to,
        TimeShape::Hours(..) => false,
        TimeShape::Window {
            start: Some(start),
            end: Some(end),
        } => start <= second && second <= end,
        TimeShape::Window { .. } => false,
    };
    Ok(matched)
}
