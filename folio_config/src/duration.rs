use std::ops::Deref;

use serde::Deserialize;

/// Human readable duration such as `"10s"`, `"1h"` or `"1d 2h 3m 4s"`.
///
/// Supported units are `ms`, `s`, `m`, `h` and `d`; whitespace separated
/// parts are added up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(pub std::time::Duration);

impl From<Duration> for std::time::Duration {
    fn from(value: Duration) -> Self {
        value.0
    }
}

impl Deref for Duration {
    type Target = std::time::Duration;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::str::FromStr for Duration {
    type Err = InvalidDuration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .try_fold(std::time::Duration::ZERO, |total, part| {
                let split = part
                    .find(|c: char| !c.is_ascii_digit())
                    .ok_or(InvalidDuration)?;
                let (value, unit) = part.split_at(split);
                let value = value.parse::<u64>().map_err(|_| InvalidDuration)?;
                let millis = match unit {
                    "ms" => 1,
                    "s" => 1000,
                    "m" => 60 * 1000,
                    "h" => 60 * 60 * 1000,
                    "d" => 24 * 60 * 60 * 1000,
                    _ => return Err(InvalidDuration),
                };
                value
                    .checked_mul(millis)
                    .map(std::time::Duration::from_millis)
                    .and_then(|part| total.checked_add(part))
                    .ok_or(InvalidDuration)
            })
            .map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDuration;

impl std::fmt::Display for InvalidDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Invalid duration")
    }
}

impl std::error::Error for InvalidDuration {}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}
