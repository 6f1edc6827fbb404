use chrono::{Duration, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::error::ValidationError;

pub const DEFAULT_RANGE_DAYS: i64 = 30;

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

/// The range as sent to the backend: UTC instants with millisecond precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBounds {
    pub start: String,
    pub end: String,
}

impl DateRange {
    /// Rejects ranges that end before they start or reach past `today`.
    pub fn new(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Result<DateRange, ValidationError> {
        if start > end {
            return Err(ValidationError::StartAfterEnd);
        }
        if start > today || end > today {
            return Err(ValidationError::FutureDate);
        }

        Ok(DateRange { start, end })
    }

    /// The last `DEFAULT_RANGE_DAYS` days up to and including `today`.
    pub fn trailing(today: NaiveDate) -> DateRange {
        DateRange {
            start: today - Duration::days(DEFAULT_RANGE_DAYS),
            end: today,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// First instant of the start day through the last second of the end day, both read
    /// as wall-clock time in `tz`.
    pub fn bounds<Tz: TimeZone>(&self, tz: &Tz) -> Result<QueryBounds, ValidationError> {
        let start = self.start.and_hms_opt(0, 0, 0);
        let end = self.end.and_hms_opt(23, 59, 59);

        Ok(QueryBounds {
            start: instant(tz, start, self.start)?,
            end: instant(tz, end, self.end)?,
        })
    }
}

fn instant<Tz: TimeZone>(tz: &Tz, local: Option<NaiveDateTime>, day: NaiveDate) -> Result<String, ValidationError> {
    let local = local.ok_or(ValidationError::UnrepresentableDay(day))?;
    let at = tz
        .from_local_datetime(&local)
        .earliest()
        .ok_or(ValidationError::UnrepresentableDay(day))?;

    Ok(at.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Report form state: a customer and two days, any of which may still be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub customer_id: Option<i64>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ReportQuery {
    pub fn validate(&self, today: NaiveDate) -> Result<(i64, DateRange), ValidationError> {
        match (self.customer_id, self.start, self.end) {
            (Some(customer_id), Some(start), Some(end)) if customer_id != 0 => {
                Ok((customer_id, DateRange::new(start, end, today)?))
            },
            _ => Err(ValidationError::MissingFields),
        }
    }
}
