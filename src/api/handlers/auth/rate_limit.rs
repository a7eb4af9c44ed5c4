//! Issuance rate limiting policy for OTP requests.

use chrono::{DateTime, Duration, Utc};

/// Per-email limits applied before a new code is issued.
#[derive(Clone, Copy, Debug)]
pub(super) struct OtpRatePolicy {
    min_interval_seconds: i64,
    max_per_hour: i64,
    max_per_day: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum RateDecision {
    Allowed { daily_count: i64 },
    Rejected(RateRejection),
}

/// Why an issuance request was refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum RateRejection {
    Wait { seconds: i64 },
    HourlyLimit { count: i64 },
    DailyLimit { count: i64 },
}

impl OtpRatePolicy {
    pub(super) const fn new(min_interval_seconds: i64, max_per_hour: i64, max_per_day: i64) -> Self {
        Self {
            min_interval_seconds,
            max_per_hour,
            max_per_day,
        }
    }

    pub(super) const fn min_interval_seconds(&self) -> i64 {
        self.min_interval_seconds
    }

    pub(super) const fn max_per_hour(&self) -> i64 {
        self.max_per_hour
    }

    pub(super) const fn max_per_day(&self) -> i64 {
        self.max_per_day
    }

    pub(super) fn hour_window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::hours(1)
    }

    pub(super) fn day_window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::hours(24)
    }

    /// Decide whether a new code may be issued.
    ///
    /// Checks run in a fixed order: cooldown since the last send, then the
    /// hourly cap, then the daily cap. The cooldown wins when several apply
    /// since its wait time is the most actionable feedback.
    pub(super) fn evaluate(
        &self,
        now: DateTime<Utc>,
        last_sent_at: Option<DateTime<Utc>>,
        hourly_count: i64,
        daily_count: i64,
    ) -> RateDecision {
        if let Some(last) = last_sent_at {
            let elapsed_ms = (now - last).num_milliseconds();
            let min_ms = self.min_interval_seconds * 1000;
            if elapsed_ms < min_ms {
                // Round the remaining wait up to whole seconds
                let seconds = (min_ms - elapsed_ms + 999) / 1000;
                return RateDecision::Rejected(RateRejection::Wait { seconds });
            }
        }

        if hourly_count >= self.max_per_hour {
            return RateDecision::Rejected(RateRejection::HourlyLimit {
                count: hourly_count,
            });
        }

        if daily_count >= self.max_per_day {
            return RateDecision::Rejected(RateRejection::DailyLimit { count: daily_count });
        }

        RateDecision::Allowed { daily_count }
    }
}
