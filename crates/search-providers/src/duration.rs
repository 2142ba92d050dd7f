/// Marker for a duration that could not be determined.
pub const UNKNOWN_DURATION: i64 = -1;

const SECOND_MS: f64 = 1_000.0;
const MINUTE_MS: f64 = 60.0 * SECOND_MS;
const HOUR_MS: f64 = 60.0 * MINUTE_MS;
const DAY_MS: f64 = 24.0 * HOUR_MS;

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("Invalid ISO 8601 duration: {0:?}")]
pub struct DurationParseError(String);

/// Converts milliseconds into whole seconds. Negative input maps to [`UNKNOWN_DURATION`].
pub fn normalize_millis(millis: i64) -> i64 {
    if millis < 0 {
        UNKNOWN_DURATION
    } else {
        millis / 1000
    }
}

/// Normalizes an ISO 8601 duration (`PT4M13S`) into whole seconds, or
/// [`UNKNOWN_DURATION`] when the value can't be parsed.
pub fn normalize_iso8601(value: &str) -> i64 {
    match parse_iso8601_millis(value) {
        Ok(millis) => normalize_millis(millis),
        Err(_) => UNKNOWN_DURATION,
    }
}

/// Parses `[-]P[nY][nM][nW][nD][T[nH][nM][nS]]` into milliseconds.
///
/// Years and months are approximated as 365 and 30 days.
pub fn parse_iso8601_millis(value: &str) -> Result<i64, DurationParseError> {
    let invalid = || DurationParseError(value.to_string());

    let (sign, rest) = match value.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, value),
    };
    let rest = rest.strip_prefix('P').ok_or_else(invalid)?;

    let mut millis = 0.0;
    let mut in_time_part = false;
    let mut components = 0;
    let mut number = String::new();

    for c in rest.chars() {
        match c {
            'T' if !in_time_part && number.is_empty() => in_time_part = true,
            '0'..='9' | '.' => number.push(c),
            ',' => number.push('.'),
            unit => {
                let amount = number.parse::<f64>().map_err(|_| invalid())?;
                number.clear();

                let unit_ms = match (in_time_part, unit) {
                    (false, 'Y') => 365.0 * DAY_MS,
                    (false, 'M') => 30.0 * DAY_MS,
                    (false, 'W') => 7.0 * DAY_MS,
                    (false, 'D') => DAY_MS,
                    (true, 'H') => HOUR_MS,
                    (true, 'M') => MINUTE_MS,
                    (true, 'S') => SECOND_MS,
                    _ => return Err(invalid()),
                };

                millis += amount * unit_ms;
                components += 1;
            }
        }
    }

    if !number.is_empty() || components == 0 {
        return Err(invalid());
    }

    Ok((sign * millis).round() as i64)
}
