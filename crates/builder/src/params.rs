//! Typed builder parameters.
//!
//! [`MetadataParams`] enumerates every field the builder accepts. Composite
//! values (resolution, timestep range, timestamp) parse from the string forms
//! a user types, so any parameter source (CLI flags, a config file, an API
//! call) can fill the structure the same way.

use crate::catalog::DEFAULT_ARCHITECTURE;
use chrono::{Local, NaiveDate, TimeZone};
use modelspec_core::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Date format accepted for the timestamp parameter.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of the stored `modelspec.date` value (ISO-8601, local time).
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Every parameter the metadata builder recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataParams {
    /// Architecture catalog key
    pub architecture: String,
    /// Adapter catalog key
    pub adapter: Option<String>,
    /// Implementation catalog key; defaults by `native_checkpoint`
    pub implementation: Option<String>,
    /// `false` when the checkpoint is not in the native format
    pub native_checkpoint: bool,
    /// Title; synthesized when absent
    pub title: Option<String>,
    /// Author
    pub author: Option<String>,
    /// Description
    pub description: Option<String>,
    /// License
    pub license: Option<String>,
    /// Tags
    pub tags: Option<String>,
    /// Models this one was merged from
    pub merged_from: Option<String>,
    /// Usage hint
    pub usage_hint: Option<String>,
    /// Trigger phrase(s)
    pub trigger_phrase: Option<String>,
    /// Image to embed as the thumbnail
    pub thumbnail: Option<PathBuf>,
    /// Creation time; defaults to now
    pub timestamp: Option<TimestampInput>,
    /// Training resolution
    pub resolution: Option<Resolution>,
    /// Prediction type catalog key; defaults to `epsilon`
    pub prediction_type: Option<String>,
    /// Timestep range
    pub timestep_range: Option<TimestepRange>,
    /// Encoder layer (clip skip); zero is a real value
    pub encoder_layer: Option<u32>,
}

impl MetadataParams {
    /// Parameters for the given architecture with everything else unset.
    pub fn new(architecture: impl Into<String>) -> Self {
        Self {
            architecture: architecture.into(),
            ..Self::default()
        }
    }
}

impl Default for MetadataParams {
    fn default() -> Self {
        Self {
            architecture: DEFAULT_ARCHITECTURE.to_string(),
            adapter: None,
            implementation: None,
            native_checkpoint: true,
            title: None,
            author: None,
            description: None,
            license: None,
            tags: None,
            merged_from: None,
            usage_hint: None,
            trigger_phrase: None,
            thumbnail: None,
            timestamp: None,
            resolution: None,
            prediction_type: None,
            timestep_range: None,
            encoder_layer: None,
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Training resolution, stored as `"<w>x<h>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Resolution {
    /// Square resolution.
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }
}

impl From<u32> for Resolution {
    fn from(size: u32) -> Self {
        Self::square(size)
    }
}

impl From<(u32, u32)> for Resolution {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl FromStr for Resolution {
    type Err = Error;

    /// Parses `"512"` or `"512,768"`.
    fn from_str(s: &str) -> Result<Self> {
        match parse_one_or_two("resolution", s)? {
            (w, None) => Ok(Self::square(w)),
            (width, Some(height)) => Ok(Self { width, height }),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ============================================================================
// TimestepRange
// ============================================================================

/// Timestep range, stored as `"<lo>,<hi>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestepRange {
    /// Lower bound
    pub lo: u32,
    /// Upper bound
    pub hi: u32,
}

impl TimestepRange {
    /// Range with both bounds equal.
    pub fn single(step: u32) -> Self {
        Self { lo: step, hi: step }
    }
}

impl From<u32> for TimestepRange {
    fn from(step: u32) -> Self {
        Self::single(step)
    }
}

impl From<(u32, u32)> for TimestepRange {
    fn from((lo, hi): (u32, u32)) -> Self {
        Self { lo, hi }
    }
}

impl FromStr for TimestepRange {
    type Err = Error;

    /// Parses `"20"` or `"0,50"`.
    fn from_str(s: &str) -> Result<Self> {
        match parse_one_or_two("timestep_range", s)? {
            (step, None) => Ok(Self::single(step)),
            (lo, Some(hi)) => Ok(Self { lo, hi }),
        }
    }
}

impl fmt::Display for TimestepRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lo, self.hi)
    }
}

fn parse_one_or_two(field: &str, s: &str) -> Result<(u32, Option<u32>)> {
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|e| Error::input(field, format!("'{}' is not an integer: {}", part.trim(), e)))
    };
    let parts: Vec<&str> = s.split(',').collect();
    match parts.as_slice() {
        [one] => Ok((parse(one)?, None)),
        [first, second] => Ok((parse(first)?, Some(parse(second)?))),
        _ => Err(Error::input(
            field,
            format!("expected one value or two comma-separated values, got '{}'", s),
        )),
    }
}

// ============================================================================
// Timestamp
// ============================================================================

/// Creation time as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampInput {
    /// Seconds since the Unix epoch
    EpochSeconds(i64),
    /// Integer seconds or a `YYYY-MM-DD` date, as typed
    Text(String),
}

impl TimestampInput {
    /// Resolve to seconds since the epoch.
    ///
    /// A date is taken as local midnight.
    ///
    /// # Errors
    ///
    /// Returns an input error if text is neither an integer nor a date.
    pub fn epoch_seconds(&self) -> Result<i64> {
        match self {
            TimestampInput::EpochSeconds(secs) => Ok(*secs),
            TimestampInput::Text(text) => {
                let text = text.trim();
                if let Ok(secs) = text.parse::<i64>() {
                    return Ok(secs);
                }
                let date = NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| {
                    Error::input(
                        "timestamp",
                        format!("'{}' is neither epoch seconds nor a YYYY-MM-DD date", text),
                    )
                })?;
                let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
                    Error::input("timestamp", format!("'{}' has no midnight", text))
                })?;
                Local
                    .from_local_datetime(&midnight)
                    .earliest()
                    .map(|dt| dt.timestamp())
                    .ok_or_else(|| {
                        Error::input("timestamp", format!("'{}' does not exist in local time", text))
                    })
            }
        }
    }
}

impl From<i64> for TimestampInput {
    fn from(secs: i64) -> Self {
        TimestampInput::EpochSeconds(secs)
    }
}

impl From<&str> for TimestampInput {
    fn from(text: &str) -> Self {
        TimestampInput::Text(text.to_string())
    }
}

/// Render epoch seconds as an ISO-8601 local time string.
pub fn format_local_iso(secs: i64) -> Result<String> {
    Local
        .timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.format(ISO_FORMAT).to_string())
        .ok_or_else(|| Error::input("timestamp", format!("{} is out of range", secs)))
}

/// Current time in seconds since the epoch.
pub fn now_epoch_seconds() -> i64 {
    Local::now().timestamp()
}
