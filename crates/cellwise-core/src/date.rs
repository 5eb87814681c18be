//! Spreadsheet serial dates
//!
//! Spreadsheets store dates as serial day numbers with the time of day as the
//! fractional part. In the 1900 date system serial 1 is 1900-01-01 and serial
//! 60 is the non-existent 1900-02-29, so every later serial is one day ahead
//! of a plain day count. In the 1904 system serial 0 is 1904-01-01.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Largest serial that still maps to a date (9999-12-31)
const MAX_SERIAL: f64 = 2_958_465.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Date system of the source workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateSystem {
    /// 1900 system (default), including the 1900 leap-year bug
    #[default]
    Excel1900,
    /// 1904 system (legacy Mac workbooks)
    Excel1904,
}

impl DateSystem {
    /// Convert a serial to a date-time; `None` for negative or out-of-range serials
    pub fn serial_to_datetime(self, serial: f64) -> Option<NaiveDateTime> {
        if !serial.is_finite() || serial < 0.0 || serial > MAX_SERIAL + 1.0 {
            return None;
        }

        let mut days = serial.floor() as i64;
        let mut millis = ((serial - serial.floor()) * MILLIS_PER_DAY).round() as i64;
        if millis >= MILLIS_PER_DAY as i64 {
            days += 1;
            millis = 0;
        }

        let base = match self {
            DateSystem::Excel1900 if days < 60 => NaiveDate::from_ymd_opt(1899, 12, 31)?,
            DateSystem::Excel1900 => NaiveDate::from_ymd_opt(1899, 12, 30)?,
            DateSystem::Excel1904 => NaiveDate::from_ymd_opt(1904, 1, 1)?,
        };

        base.and_time(NaiveTime::MIN)
            .checked_add_signed(Duration::days(days))?
            .checked_add_signed(Duration::milliseconds(millis))
    }

    /// Convert a date-time back to its serial
    pub fn datetime_to_serial(self, value: NaiveDateTime) -> f64 {
        let midnight = value.date().and_time(NaiveTime::MIN);
        let fraction = (value - midnight).num_milliseconds() as f64 / MILLIS_PER_DAY;

        let days = match self {
            DateSystem::Excel1900 => {
                let Some(epoch) = NaiveDate::from_ymd_opt(1899, 12, 30) else {
                    return f64::NAN;
                };
                let Some(leap_bug) = NaiveDate::from_ymd_opt(1900, 3, 1) else {
                    return f64::NAN;
                };
                let days = (value.date() - epoch).num_days();
                // Before the phantom 1900-02-29 the plain count is one too high.
                if value.date() < leap_bug {
                    days - 1
                } else {
                    days
                }
            }
            DateSystem::Excel1904 => match NaiveDate::from_ymd_opt(1904, 1, 1) {
                Some(epoch) => (value.date() - epoch).num_days(),
                None => return f64::NAN,
            },
        };

        days as f64 + fraction
    }
}
