//! `tp` (timepoint) and `td` (timeperiod) scalars.
//!
//! `tp`/`td` have a catalog-defined epoch and scale; the POSIX epoch is
//! never hardcoded. The wire/text forms both carry a scalar count of
//! `scale` units since `epoch`; [`CatalogEpoch`] is what a `Catalog` (or,
//! absent one, the default DTN epoch below) supplies to interpret that
//! scalar as a calendar instant for ISO-8601 formatting.

use chrono::{DateTime, Duration, TimeZone, Utc};

/// A timepoint: a signed count of `scale` units since `epoch`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timepoint {
    pub ticks: i64,
}

/// A timeperiod: a signed count of `scale` units, not anchored to an
/// epoch.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeperiod {
    pub ticks: i64,
}

/// The epoch and tick scale a catalog declares for interpreting `tp`/`td`
/// scalars. Distinct from `time::TimeFormat` (the text-codec *rendering*
/// option) — this is *what the number means*, not how it's printed.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEpoch {
    /// Epoch instant, as a Unix timestamp in seconds.
    pub epoch_unix_secs: i64,
    /// Ticks per second (e.g. 1 for whole seconds, 1_000_000 for
    /// microseconds).
    pub ticks_per_second: i64,
}

impl CatalogEpoch {
    /// The DTN epoch (2000-01-01T00:00:00Z), used when no catalog-specific
    /// epoch is configured. This is the conventional DTNMA default, not a
    /// POSIX fallback.
    pub const DTN_EPOCH: CatalogEpoch = CatalogEpoch {
        epoch_unix_secs: 946_684_800,
        ticks_per_second: 1,
    };

    pub fn to_datetime(&self, tp: Timepoint) -> Option<DateTime<Utc>> {
        let secs = tp
            .ticks
            .checked_div(self.ticks_per_second)?
            .checked_add(self.epoch_unix_secs)?;
        let remainder_ticks = tp.ticks % self.ticks_per_second;
        let nanos = remainder_ticks
            .checked_mul(1_000_000_000 / self.ticks_per_second.max(1))
            .unwrap_or(0);
        Utc.timestamp_opt(secs, nanos.unsigned_abs() as u32).single()
    }

    pub fn from_datetime(&self, dt: DateTime<Utc>) -> Timepoint {
        let delta = dt.timestamp() - self.epoch_unix_secs;
        Timepoint {
            ticks: delta.saturating_mul(self.ticks_per_second),
        }
    }

    pub fn duration_to_ticks(&self, d: Duration) -> Timeperiod {
        Timeperiod {
            ticks: d.num_seconds().saturating_mul(self.ticks_per_second),
        }
    }

    pub fn ticks_to_duration(&self, td: Timeperiod) -> Duration {
        Duration::seconds(td.ticks / self.ticks_per_second.max(1))
    }
}

impl Default for CatalogEpoch {
    fn default() -> Self {
        Self::DTN_EPOCH
    }
}
