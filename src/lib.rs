use std::{borrow::Cow, fmt::Display};

use logos::Logos;
use miette::Diagnostic;
use thiserror::Error;
use time::{
    format_description::{well_known::Iso8601, FormatItem},
    macros::format_description,
    PrimitiveDateTime,
};
use tracing::warn;

pub const DEGREE_SYMBOL: &str = "°C";

/// `Tuesday 06 July 2021`
const DATE_DISPLAY: &[FormatItem<'static>] =
    format_description!("[weekday] [day] [month repr:long] [year]");

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t]+")] // Ignore this regex pattern between tokens
enum Token {
    #[token(",")]
    Comma,

    #[regex(r"-?[0-9]+(\.[0-9]+)?", priority = 3)]
    Number,

    // Anything else up to the next separator or padding, e.g. an ISO-8601
    // timestamp. Whitespace is left to the skip rule so a padded number
    // still lexes as `Number`.
    #[regex(r"[^,\s]+")]
    Field,
}

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("cannot interpret `{0}` as a number")]
    Number(String),
    #[error("invalid date: {0}")]
    Date(#[from] time::error::Parse),
    #[error("cannot format date: {0}")]
    Format(#[from] time::error::Format),
}

#[derive(Debug, Error, Diagnostic)]
pub enum ReportError {
    #[error("no readings to report on")]
    EmptyData,
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// One day of weather: the date as found in the source and the recorded
/// minimum and maximum temperatures, in Fahrenheit.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub date: String,
    pub min_temp: f64,
    pub max_temp: f64,
}

/// Output of [`parse_readings`]. Rows that could not be understood are
/// dropped but counted.
#[derive(Debug, Default)]
pub struct ReadingSet {
    pub readings: Vec<Reading>,
    pub skipped_rows: usize,
}

/// A value that can be read as a temperature, either a number or a
/// numeric string.
pub trait Coerce {
    fn coerce(&self) -> Result<f64, ParseError>;
}

impl Coerce for f64 {
    fn coerce(&self) -> Result<f64, ParseError> {
        Ok(*self)
    }
}

impl Coerce for f32 {
    fn coerce(&self) -> Result<f64, ParseError> {
        Ok(f64::from(*self))
    }
}

impl Coerce for i32 {
    fn coerce(&self) -> Result<f64, ParseError> {
        Ok(f64::from(*self))
    }
}

impl Coerce for str {
    fn coerce(&self) -> Result<f64, ParseError> {
        self.trim()
            .parse()
            .map_err(|_| ParseError::Number(self.to_string()))
    }
}

impl Coerce for String {
    fn coerce(&self) -> Result<f64, ParseError> {
        self.as_str().coerce()
    }
}

impl<T: Coerce + ?Sized> Coerce for &T {
    fn coerce(&self) -> Result<f64, ParseError> {
        (**self).coerce()
    }
}

/// Renders a temperature with the degree-Celsius suffix, e.g. `9.4°C`.
/// The value is interpolated as-is, nothing is checked.
pub fn format_temperature(value: impl Display) -> String {
    format!("{value}{DEGREE_SYMBOL}")
}

/// Converts an ISO-8601 date-time into a human-readable date like
/// `Tuesday 06 July 2021`. The time of day and the offset are parsed but
/// not displayed.
pub fn convert_date(iso_string: &str) -> Result<String, ParseError> {
    // Some sources write the UTC offset as a bare `Z`
    let normalized = match iso_string.strip_suffix('Z') {
        Some(rest) => Cow::Owned(format!("{rest}+00:00")),
        None => Cow::Borrowed(iso_string),
    };
    let date = PrimitiveDateTime::parse(&normalized, &Iso8601::DEFAULT)?;
    Ok(date.format(DATE_DISPLAY)?)
}

/// Fahrenheit to Celsius, rounded to one decimal place. Ties round to
/// even, like python's `round`.
pub fn convert_f_to_c(value: impl Coerce) -> Result<f64, ParseError> {
    let fahrenheit = value.coerce()?;
    let celsius = (fahrenheit - 32.0) * 5.0 / 9.0;
    Ok((celsius * 10.0).round_ties_even() / 10.0)
}

/// An extremal value and the index of its last occurrence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremum {
    pub value: f64,
    pub index: usize,
}

fn scan_extremum<T: Coerce>(
    values: &[T],
    prefer: fn(f64, f64) -> bool,
) -> Result<Option<Extremum>, ParseError> {
    let mut found: Option<Extremum> = None;
    for (index, raw) in values.iter().enumerate() {
        // Every element must coerce, even the ones past the extremum
        let value = raw.coerce()?;
        match &found {
            Some(current) if !prefer(value, current.value) => (),
            _ => found = Some(Extremum { value, index }),
        }
    }
    Ok(found)
}

/// Smallest value in the sequence. On ties the last occurrence wins,
/// which is why the comparison is non-strict.
pub fn find_min<T: Coerce>(values: &[T]) -> Result<Option<Extremum>, ParseError> {
    scan_extremum(values, |candidate, current| candidate <= current)
}

/// Largest value in the sequence. On ties the last occurrence wins.
pub fn find_max<T: Coerce>(values: &[T]) -> Result<Option<Extremum>, ParseError> {
    scan_extremum(values, |candidate, current| candidate >= current)
}

/// Keeps the values that coerce to a number and counts the ones that
/// don't.
pub fn collect_numbers<T: Coerce>(values: &[T]) -> (Vec<f64>, usize) {
    let mut numbers = Vec::with_capacity(values.len());
    let mut discarded = 0;
    for value in values {
        match value.coerce() {
            Ok(number) => numbers.push(number),
            Err(_) => discarded += 1,
        }
    }
    (numbers, discarded)
}

/// Mean of the coercible subset of `values`. Returns 0.0 when nothing
/// survives, never an error.
pub fn calculate_mean<T: Coerce>(values: &[T]) -> f64 {
    let (numbers, _) = collect_numbers(values);
    if numbers.is_empty() {
        return 0.0;
    }
    numbers.iter().sum::<f64>() / numbers.len() as f64
}

fn parse_row(line: &str) -> Option<Reading> {
    let mut row = Token::lexer(line);
    let date = match row.next() {
        Some(Ok(Token::Field | Token::Number)) => row.slice().to_string(),
        _ => return None,
    };
    if !matches!(row.next(), Some(Ok(Token::Comma))) {
        return None;
    }
    let min_temp = match row.next() {
        Some(Ok(Token::Number)) => row.slice().parse().ok()?,
        _ => return None,
    };
    if !matches!(row.next(), Some(Ok(Token::Comma))) {
        return None;
    }
    let max_temp = match row.next() {
        Some(Ok(Token::Number)) => row.slice().parse().ok()?,
        _ => return None,
    };
    // Columns past the third are ignored
    Some(Reading {
        date,
        min_temp,
        max_temp,
    })
}

/// Reads `date,min,max` rows out of a CSV document. The header row and
/// fully empty rows are ignored; rows whose temperature fields are not
/// numeric are dropped and counted in `skipped_rows`. The date field is
/// kept verbatim, a bad date only surfaces once a report asks for it.
pub fn parse_readings(input: &str) -> ReadingSet {
    let mut set = ReadingSet::default();
    let mut lines = input.lines();
    lines.next(); // header

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(line) {
            Some(reading) => set.readings.push(reading),
            None => {
                warn!("skipping malformed row: `{line}`");
                set.skipped_rows += 1;
            }
        }
    }
    set
}

fn in_celsius(fahrenheit: f64) -> Result<String, ParseError> {
    let celsius = convert_f_to_c(fahrenheit)?;
    Ok(format_temperature(format!("{celsius:.1}")))
}

/// Multi-day overview: extreme temperatures with their dates of
/// occurrence, plus the period averages, everything in Celsius.
pub fn generate_summary(readings: &[Reading]) -> Result<String, ReportError> {
    let lows: Vec<f64> = readings.iter().map(|reading| reading.min_temp).collect();
    let highs: Vec<f64> = readings.iter().map(|reading| reading.max_temp).collect();

    let coldest = find_min(&lows)?.ok_or(ReportError::EmptyData)?;
    let hottest = find_max(&highs)?.ok_or(ReportError::EmptyData)?;

    let coldest_date = convert_date(&readings[coldest.index].date)?;
    let hottest_date = convert_date(&readings[hottest.index].date)?;

    // Plain column means: the columns are numeric by construction, so the
    // skip-invalid aggregator has nothing to add here. Averaged in
    // Fahrenheit and converted once, so only a single rounding applies.
    let average_low = lows.iter().sum::<f64>() / lows.len() as f64;
    let average_high = highs.iter().sum::<f64>() / highs.len() as f64;

    let mut summary = String::new();
    summary.push_str(&format!("{} Day Overview\n", readings.len()));
    summary.push_str(&format!(
        "  The lowest temperature will be {}, and will occur on {}.\n",
        in_celsius(coldest.value)?,
        coldest_date
    ));
    summary.push_str(&format!(
        "  The highest temperature will be {}, and will occur on {}.\n",
        in_celsius(hottest.value)?,
        hottest_date
    ));
    summary.push_str(&format!(
        "  The average low this week is {}.\n",
        in_celsius(average_low)?
    ));
    summary.push_str(&format!(
        "  The average high this week is {}.\n",
        in_celsius(average_high)?
    ));
    Ok(summary)
}

/// Per-day breakdown, one three-line block per reading in input order.
/// The output ends with two newlines; downstream consumers rely on that
/// trailing whitespace, so it stays.
pub fn generate_daily_summary(readings: &[Reading]) -> Result<String, ReportError> {
    if readings.is_empty() {
        return Err(ReportError::EmptyData);
    }

    let mut lines = Vec::with_capacity(readings.len() * 4 + 1);
    for reading in readings {
        lines.push(format!("---- {} ----", convert_date(&reading.date)?));
        lines.push(format!(
            "  Minimum Temperature: {}",
            in_celsius(reading.min_temp)?
        ));
        lines.push(format!(
            "  Maximum Temperature: {}",
            in_celsius(reading.max_temp)?
        ));
        lines.push(String::new());
    }
    lines.push(String::new());
    Ok(lines.join("\n"))
}
