use jiff::{SignedDuration, SpanRelativeTo};

/// Accepts ISO 8601 (`PT1.5S`), friendly (`500ms`, `1m 30s`) or a plain number of seconds.
pub fn parse_duration(input: &str) -> Result<SignedDuration, String> {
    let duration = if let Ok(duration) = input.parse::<SignedDuration>() {
        duration
    } else if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        duration
    } else if let Ok(seconds) = input.parse::<f64>() {
        SignedDuration::try_from_secs_f64(seconds).map_err(|error| error.to_string())?
    } else {
        return Err(format!("Invalid duration `{input}`"));
    };

    if duration.is_negative() {
        return Err(format!("Duration `{input}` must not be negative"));
    }

    Ok(duration)
}
