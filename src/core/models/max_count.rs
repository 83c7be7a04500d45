use std::str::FromStr;

use crate::core::errors::{Result, ViError};

/// Number of events requested per page.
///
/// The server takes an `xsd:int`. Anything that is not an integer in that
/// range is rejected locally, before any call is made. Range checks such
/// as negative counts are left to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MaxCount(i32);

impl MaxCount {
    pub fn get(self) -> i32 {
        self.0
    }

    /// The smaller of `self` and `remaining`, where `remaining` may exceed
    /// the `xsd:int` range.
    pub fn capped(self, remaining: usize) -> MaxCount {
        match i32::try_from(remaining) {
            Ok(remaining) => MaxCount(self.0.min(remaining)),
            Err(_) => self,
        }
    }
}

impl TryFrom<i64> for MaxCount {
    type Error = ViError;

    fn try_from(value: i64) -> Result<Self> {
        i32::try_from(value).map(MaxCount).map_err(|_| {
            ViError::parameter(format!(
                "max_count should be an integer between {} and {}, got {value}",
                i32::MIN,
                i32::MAX
            ))
        })
    }
}

impl From<i32> for MaxCount {
    fn from(value: i32) -> Self {
        MaxCount(value)
    }
}

impl TryFrom<u32> for MaxCount {
    type Error = ViError;

    fn try_from(value: u32) -> Result<Self> {
        MaxCount::try_from(i64::from(value))
    }
}

impl TryFrom<usize> for MaxCount {
    type Error = ViError;

    fn try_from(value: usize) -> Result<Self> {
        let value = i64::try_from(value).unwrap_or(i64::MAX);
        MaxCount::try_from(value)
    }
}

impl TryFrom<&str> for MaxCount {
    type Error = ViError;

    fn try_from(value: &str) -> Result<Self> {
        value.parse()
    }
}

impl FromStr for MaxCount {
    type Err = ViError;

    fn from_str(s: &str) -> Result<Self> {
        let parsed: i64 = s
            .trim()
            .parse()
            .map_err(|_| ViError::parameter(format!("max_count should be an integer, got '{s}'")))?;
        MaxCount::try_from(parsed)
    }
}

impl std::fmt::Display for MaxCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
