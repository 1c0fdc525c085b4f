use chrono::TimeDelta;
use thiserror::Error;

const MAX_DURATION_INPUT_LEN: usize = 100;

const MS_PER_SECOND: f64 = 1_000.0;
const MS_PER_MINUTE: f64 = MS_PER_SECOND * 60.0;
const MS_PER_HOUR: f64 = MS_PER_MINUTE * 60.0;
const MS_PER_DAY: f64 = MS_PER_HOUR * 24.0;
const MS_PER_WEEK: f64 = MS_PER_DAY * 7.0;
const MS_PER_YEAR: f64 = MS_PER_DAY * 365.25;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UtilError {
    #[error("Invalid format: {0}")]
    Format(String),
}

/// Parse a human readable duration such as `"1 day"`, `"2 hours"` or `"90s"`.
///
/// The input is a non-negative decimal number followed by an optional unit
/// (case-insensitive, optional whitespace in between). Without a unit the
/// number is taken as milliseconds. Years are 365.25 days.
pub fn parse_duration(input: &str) -> Result<TimeDelta, UtilError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_DURATION_INPUT_LEN {
        return Err(UtilError::Format(format!(
            "Duration must be between 1 and {MAX_DURATION_INPUT_LEN} characters"
        )));
    }

    let split_at = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split_at);

    let value: f64 = number
        .parse()
        .map_err(|_| UtilError::Format(format!("Invalid duration value in '{trimmed}'")))?;

    let factor = unit_factor(unit.trim_start())
        .ok_or_else(|| UtilError::Format(format!("Unknown duration unit in '{trimmed}'")))?;

    let millis = (value * factor).round();
    if !millis.is_finite() || millis > i64::MAX as f64 {
        return Err(UtilError::Format(format!("Duration '{trimmed}' is out of range")));
    }

    TimeDelta::try_milliseconds(millis as i64)
        .ok_or_else(|| UtilError::Format(format!("Duration '{trimmed}' is out of range")))
}

fn unit_factor(unit: &str) -> Option<f64> {
    let factor = match unit.to_ascii_lowercase().as_str() {
        "" | "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 1.0,
        "s" | "sec" | "secs" | "second" | "seconds" => MS_PER_SECOND,
        "m" | "min" | "mins" | "minute" | "minutes" => MS_PER_MINUTE,
        "h" | "hr" | "hrs" | "hour" | "hours" => MS_PER_HOUR,
        "d" | "day" | "days" => MS_PER_DAY,
        "w" | "week" | "weeks" => MS_PER_WEEK,
        "y" | "yr" | "yrs" | "year" | "years" => MS_PER_YEAR,
        _ => return None,
    };
    Some(factor)
}

/// Lowercase hex encoding.
pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
