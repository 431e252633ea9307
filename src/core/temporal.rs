// Byte-literal parsing for temporal columns delivered as text.
use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time};

use crate::core::cell::ZERO_TIMESTAMP;

pub(crate) enum TemporalBytes {
    Parsed(PrimitiveDateTime),
    /// A well-formed literal that denotes the zero timestamp itself.
    Zero,
    Unrecognized,
}

/// `YYYY-MM-DD HH:MM:SS[.fraction]` or a bare `YYYY-MM-DD`.
pub(crate) fn parse_standard(text: &str) -> Option<PrimitiveDateTime> {
    parse_datetime(text).or_else(|| {
        Date::parse(text, format_description!("[year]-[month]-[day]"))
            .ok()
            .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT))
    })
}

pub(crate) fn parse_datetime(text: &str) -> Option<PrimitiveDateTime> {
    PrimitiveDateTime::parse(
        text,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            text,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
        )
    })
    .ok()
}

// Time-of-day literals may carry a single-digit hour.
fn parse_time_of_day(text: &str) -> Option<PrimitiveDateTime> {
    let literal = format!("0001-01-01 {text}");
    PrimitiveDateTime::parse(
        &literal,
        format_description!("[year]-[month]-[day] [hour padding:none]:[minute]:[second]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            &literal,
            format_description!(
                "[year]-[month]-[day] [hour padding:none]:[minute]:[second].[subsecond]"
            ),
        )
    })
    .ok()
}

/// Interprets temporal bytes according to the column's declared type.
/// `TIME` values land on 0001-01-01; `YEAR` values on January 1st, midnight.
/// A standard literal equal to the zero timestamp still goes through the
/// `TIME`/`YEAR` rules before it is accepted as [`TemporalBytes::Zero`].
pub(crate) fn parse_temporal_bytes(
    declared_type: &str,
    text: &str,
) -> Result<TemporalBytes, String> {
    let standard = parse_standard(text);
    if let Some(parsed) = standard.filter(|parsed| *parsed != ZERO_TIMESTAMP) {
        return Ok(TemporalBytes::Parsed(parsed));
    }
    match declared_type {
        "TIME" => {
            parse_time_of_day(text)
                .map(TemporalBytes::Parsed)
                .ok_or_else(|| format!("invalid TIME literal {text:?}"))
        }
        "YEAR" => {
            let literal = format!("{text}-01-01 00:00:00");
            parse_datetime(&literal)
                .map(TemporalBytes::Parsed)
                .ok_or_else(|| format!("invalid YEAR literal {text:?}"))
        }
        _ if standard.is_some() => Ok(TemporalBytes::Zero),
        _ => Ok(TemporalBytes::Unrecognized),
    }
}
