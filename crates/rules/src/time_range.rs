//! `parse_time_range` - ported from the original `rules_policy_engine`
//! helper. Accepts `"<N> <unit>"` where unit is hour/day/week/month
//! (singular or plural); months are approximated as 30 days, exactly as
//! the original does.

use chrono::Duration;

use crate::error::RuleError;

pub fn parse_time_range(time_range: &str) -> Result<Duration, RuleError> {
    let parts: Vec<&str> = time_range.split_whitespace().collect();
    let [value_str, unit] = parts.as_slice() else {
        return Err(RuleError::InvalidTimeRange(time_range.to_string(), "expected \"<N> <unit>\""));
    };

    let value: i64 = value_str
        .parse()
        .map_err(|_| RuleError::InvalidTimeRange(time_range.to_string(), "N must be an integer"))?;

    match unit.to_lowercase().as_str() {
        "month" | "months" => Ok(Duration::days(value * 30)),
        "week" | "weeks" => Ok(Duration::days(value * 7)),
        "day" | "days" => Ok(Duration::days(value)),
        "hour" | "hours" => Ok(Duration::hours(value)),
        _ => Err(RuleError::InvalidTimeRange(time_range.to_string(), "unknown time unit")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_each_unit() {
        assert_eq!(parse_time_range("1 hour").unwrap(), Duration::hours(1));
        assert_eq!(parse_time_range("3 days").unwrap(), Duration::days(3));
        assert_eq!(parse_time_range("2 week").unwrap(), Duration::days(14));
        assert_eq!(parse_time_range("1 month").unwrap(), Duration::days(30));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse_time_range("garbage").is_err());
        assert!(parse_time_range("1 fortnight").is_err());
        assert!(parse_time_range("abc day").is_err());
    }
}
