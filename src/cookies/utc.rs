//! Loose date/time input to UTC cookie date strings.
//!
//! Accepts `D/M/YYYY hh:mm:ss`, `D-M-YYYY hh:mm:ss` or a bare `hh:mm:ss`
//! anywhere in the input. Missing components come from the current local
//! date/time, and the resulting wall-clock value is stamped as GMT.

use regex::Regex;
use std::sync::LazyLock;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time};

static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:(?:(?P<sa>[0-9]+)/(?P<sb>[0-9]+)/(?P<sy>[0-9]+)|(?P<da>[0-9]+)-(?P<db>[0-9]+)-(?P<dy>[0-9]+))\s)?(?P<hour>[0-9]+):(?P<minute>[0-9]+):(?P<second>[0-9]+)",
    )
    .expect("date/time pattern is valid")
});

const UTC_STRING: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

/// Order of the two leading date components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateOrder {
    /// `10/05/2030` is the 10th of May.
    #[default]
    DayMonthYear,
    /// `05/10/2030` is the 10th of May.
    MonthDayYear,
}

/// Resolves loose date/time strings into `Thu, 01 Jan 1970 00:00:00 GMT` form.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateResolver {
    order: DateOrder,
}

impl DateResolver {
    pub fn new(order: DateOrder) -> Self {
        Self { order }
    }

    /// Resolve `input` against the current local date/time.
    pub fn resolve(&self, input: &str) -> String {
        self.resolve_at(input, local_now())
    }

    /// Resolve `input`, taking missing components from `now`.
    pub fn resolve_at(&self, input: &str, now: PrimitiveDateTime) -> String {
        let mut parts = DateParts::from(now);

        let Some(caps) = DATE_TIME.captures(input) else {
            tracing::debug!(input = %input, "no time component found, using current time");
            return format_utc(now);
        };

        let date = caps
            .name("sa")
            .map(|_| ("sa", "sb", "sy"))
            .or_else(|| caps.name("da").map(|_| ("da", "db", "dy")));

        let mut fields: Vec<(&str, &mut i64)> = vec![
            ("hour", &mut parts.hour),
            ("minute", &mut parts.minute),
            ("second", &mut parts.second),
        ];
        if let Some((a, b, year)) = date {
            let (day, month) = match self.order {
                DateOrder::DayMonthYear => (a, b),
                DateOrder::MonthDayYear => (b, a),
            };
            fields.push((day, &mut parts.day));
            fields.push((month, &mut parts.month));
            fields.push((year, &mut parts.year));
        }

        for (group, slot) in fields {
            let Some(text) = caps.name(group) else {
                continue;
            };
            match text.as_str().parse::<i64>() {
                Ok(value) => *slot = value,
                Err(_) => {
                    tracing::debug!(input = %input, "date component out of range, using current time");
                    return format_utc(now);
                }
            }
        }

        if date.is_some() {
            // Written months are 1-based.
            parts.month -= 1;
            if (0..=99).contains(&parts.year) {
                parts.year += 1900;
            }
        }

        match parts.to_datetime() {
            Some(datetime) => format_utc(datetime),
            None => {
                tracing::debug!(input = %input, "date not representable, using current time");
                format_utc(now)
            }
        }
    }
}

/// Calendar components with a zero-based month, allowed to be out of range.
#[derive(Debug, Clone, Copy)]
struct DateParts {
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
}

impl From<PrimitiveDateTime> for DateParts {
    fn from(now: PrimitiveDateTime) -> Self {
        Self {
            year: i64::from(now.year()),
            month: i64::from(u8::from(now.month())) - 1,
            day: i64::from(now.day()),
            hour: i64::from(now.hour()),
            minute: i64::from(now.minute()),
            second: i64::from(now.second()),
        }
    }
}

impl DateParts {
    /// Normalize overflowing components the way `Date.UTC` does:
    /// month 12 is January of the next year, day 0 is the last day of the
    /// previous month.
    fn to_datetime(self) -> Option<PrimitiveDateTime> {
        let months = self.year.checked_mul(12)?.checked_add(self.month)?;
        let year = i32::try_from(months.div_euclid(12)).ok()?;
        let month = Month::try_from(u8::try_from(months.rem_euclid(12) + 1).ok()?).ok()?;
        let first = Date::from_calendar_date(year, month, 1).ok()?;

        let secs = (self.day.checked_sub(1)?)
            .checked_mul(86_400)?
            .checked_add(self.hour.checked_mul(3_600)?)?
            .checked_add(self.minute.checked_mul(60)?)?
            .checked_add(self.second)?;

        PrimitiveDateTime::new(first, Time::MIDNIGHT).checked_add(Duration::seconds(secs))
    }
}

fn local_now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    PrimitiveDateTime::new(now.date(), now.time())
}

fn format_utc(datetime: PrimitiveDateTime) -> String {
    datetime.format(UTC_STRING).unwrap_or_default()
}
