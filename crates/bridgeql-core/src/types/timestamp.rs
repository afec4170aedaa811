use derive_more::Deref;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use thiserror::Error as ThisError;
use time::{Date, Month, PrimitiveDateTime, Time, format_description::well_known::Iso8601};

///
/// TimestampError
///

#[derive(Debug, ThisError)]
pub enum TimestampError {
    #[error(transparent)]
    ComponentRange(#[from] time::error::ComponentRange),

    #[error(transparent)]
    Parse(#[from] time::error::Parse),
}

///
/// Timestamp
///
/// Calendar datetime scalar with no offset component.
/// `Display` renders the unquoted ISO-8601 form used by query-language
/// literals; sub-second precision is emitted only when non-zero.
///

#[derive(Clone, Copy, Debug, Deref, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Timestamp(PrimitiveDateTime);

impl Timestamp {
    pub const MIN: Self = Self(PrimitiveDateTime::MIN);
    pub const MAX: Self = Self(PrimitiveDateTime::MAX);

    /// Wrap an existing datetime.
    #[must_use]
    pub const fn new(datetime: PrimitiveDateTime) -> Self {
        Self(datetime)
    }

    /// Construct from calendar components at midnight.
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self, TimestampError> {
        Self::from_ymd_hms(year, month, day, 0, 0, 0)
    }

    /// Construct from calendar and clock components.
    pub fn from_ymd_hms(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, TimestampError> {
        let date = Date::from_calendar_date(year, Month::try_from(month)?, day)?;
        let time = Time::from_hms(hour, minute, second)?;

        Ok(Self(PrimitiveDateTime::new(date, time)))
    }

    /// Parse an ISO-8601 datetime string.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        Ok(Self(PrimitiveDateTime::parse(s, &Iso8601::DEFAULT)?))
    }

    /// Return the wrapped datetime.
    #[must_use]
    pub const fn get(&self) -> PrimitiveDateTime {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day(),
            self.0.hour(),
            self.0.minute(),
            self.0.second(),
        )?;

        let micros = self.0.microsecond();
        if micros != 0 {
            write!(f, ".{micros:06}")?;
        }

        Ok(())
    }
}

impl From<PrimitiveDateTime> for Timestamp {
    fn from(datetime: PrimitiveDateTime) -> Self {
        Self(datetime)
    }
}

impl std::str::FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;

        Self::parse(&s).map_err(de::Error::custom)
    }
}
