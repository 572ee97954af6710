//! Validation of user supplied `modifiedTime` values.
//!
//! Two layouts are accepted, both in UTC with a trailing `Z` designator:
//!
//! ```text
//! YYYY-MM-DDTHH:MM:SS.ffffffZ   (one to six fractional digits)
//! YYYY-MM-DDTHH:MM:SSZ
//! ```
//!
//! Offset forms such as `+05:00` are rejected.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use jiff::civil::{Date, Time};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Example of an accepted timestamp, used in error messages.
pub const TIMESTAMP_EXAMPLE: &str = "2025-10-20T09:20:25.000Z";

static TIMESTAMP_LAYOUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})T([0-9]{2}):([0-9]{2}):([0-9]{2})(?:\.[0-9]{1,6})?Z$")
        .expect("timestamp layout regex is valid")
});

/// Returns whether `value` matches one of the accepted timestamp layouts
/// and denotes a real calendar date and time of day.
pub fn validate_timestamp(value: &str) -> bool {
    let Some(captures) = TIMESTAMP_LAYOUT.captures(value) else {
        return false;
    };

    let field = |index: usize| captures[index].parse::<i16>().ok();
    let (Some(year), Some(month), Some(day), Some(hour), Some(minute), Some(second)) =
        (field(1), field(2), field(3), field(4), field(5), field(6))
    else {
        return false;
    };

    // Every field but the year has two digits, so the narrowing casts cannot overflow.
    Date::new(year, month as i8, day as i8).is_ok()
        && Time::new(hour as i8, minute as i8, second as i8, 0).is_ok()
}

/// A validated target modification time.
///
/// The original string is kept verbatim and sent to the service unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModifiedTime(String);

impl ModifiedTime {
    /// Parses and validates a timestamp.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::InvalidInput`](crate::ErrorKind::InvalidInput) error when
    /// the value does not match an accepted layout.
    pub fn parse(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if validate_timestamp(&value) {
            Ok(Self(value))
        } else {
            Err(Error::invalid_input().with_message(format!(
                "invalid modified time '{value}', expected RFC 3339 UTC like {TIMESTAMP_EXAMPLE}"
            )))
        }
    }

    /// Returns the timestamp as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ModifiedTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ModifiedTime {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<ModifiedTime> for String {
    fn from(value: ModifiedTime) -> Self {
        value.0
    }
}

impl AsRef<str> for ModifiedTime {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModifiedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
