// src/config/duration.rs

//! Duration values as written in the config file.

use crate::errors::DurationError;

const SECOND: u64 = 1000;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;

/// Parse a duration like `"90s"`, `"1h 30m"` or `"1500"` into milliseconds.
///
/// The value is a sequence of `<number><unit>` groups which are summed.
/// Whitespace may appear between groups and between a number and its unit.
/// Units are `s`, `m`, `h`, `d` and `w`; a trailing number without a unit is
/// taken as milliseconds.
pub fn parse_duration(s: &str) -> Result<u64, DurationError> {
    let mut rest = s.trim_start();
    if rest.is_empty() {
        return Err(DurationError::Empty);
    }

    let mut total: u64 = 0;
    let mut pending: Option<u64> = None;

    loop {
        rest = rest.trim_start();
        let Some(c) = rest.chars().next() else {
            break;
        };

        match pending {
            None => {
                let end = rest
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(rest.len());
                if end == 0 {
                    return Err(DurationError::InvalidNumber);
                }
                let n = rest[..end]
                    .parse::<u64>()
                    .map_err(|_| DurationError::Overflow)?;
                pending = Some(n);
                rest = &rest[end..];
            }
            Some(n) => {
                let scale = unit_scale(c).ok_or(DurationError::InvalidUnit(c))?;
                total = n
                    .checked_mul(scale)
                    .and_then(|ms| total.checked_add(ms))
                    .ok_or(DurationError::Overflow)?;
                pending = None;
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    if let Some(n) = pending {
        total = total.checked_add(n).ok_or(DurationError::Overflow)?;
    }

    Ok(total)
}

fn unit_scale(c: char) -> Option<u64> {
    match c {
        's' => Some(SECOND),
        'm' => Some(MINUTE),
        'h' => Some(HOUR),
        'd' => Some(DAY),
        'w' => Some(WEEK),
        _ => None,
    }
}
