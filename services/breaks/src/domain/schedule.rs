//! Resolution of recurring daily break windows against a reference instant.
//!
//! "Local" always means the time zone of the reference instant handed in by the
//! caller. The service passes `chrono::Local`; tests pin a fixed offset.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike, Utc};

use canteen_domain::time_of_day::TimeOfDay;

use crate::domain::types::{BreakDefinition, ResolvedWindow};

/// Local minute of day of `instant`, seconds truncated.
pub fn time_of_day<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> TimeOfDay {
    let local = instant.with_timezone(tz);
    TimeOfDay::from_minutes_wrapping(local.hour() * 60 + local.minute())
}

/// The instant at which `time` occurs on the local calendar `day`.
///
/// Ambiguous local times (clocks turned back) take the earlier instant; local
/// times skipped by a forward transition roll over to the next hour.
pub fn anchor_to_day<Tz: TimeZone>(day: NaiveDate, time: TimeOfDay, tz: &Tz) -> DateTime<Utc> {
    let naive = day.and_time(NaiveTime::MIN)
        + TimeDelta::minutes(i64::from(time.minutes_since_midnight()));
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(naive + TimeDelta::hours(1)))
                .earliest()
        })
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// The instant at which `time` occurs on the local day containing `reference`.
pub fn anchor_to_reference_day<Tz: TimeZone>(
    time: TimeOfDay,
    reference: &DateTime<Tz>,
) -> DateTime<Utc> {
    anchor_to_day(reference.date_naive(), time, &reference.timezone())
}

/// Resolve the occurrence of `definition` that is active at `reference`, or
/// the one that most recently ended. Never returns a window that starts after
/// `reference`.
///
/// A window whose end time of day is not after its start ends on the following
/// day. Zero-length definitions are rejected when breaks are authored; here
/// they resolve to a 24 hour window.
pub fn resolve_window<Tz: TimeZone>(
    definition: &BreakDefinition,
    reference: &DateTime<Tz>,
) -> ResolvedWindow {
    let tz = reference.timezone();
    let day = reference.date_naive();

    let mut start_time = anchor_to_day(day, time_of_day(definition.start_time, &tz), &tz);
    let mut end_time = anchor_to_day(day, time_of_day(definition.end_time, &tz), &tz);

    if end_time <= start_time {
        end_time += TimeDelta::hours(24);
    }

    if start_time > reference.with_timezone(&Utc) {
        start_time -= TimeDelta::hours(24);
        end_time -= TimeDelta::hours(24);
    }

    ResolvedWindow {
        start_time,
        end_time,
    }
}

/// `true` if `reference` lies in `[start, end)` of the resolved window.
pub fn is_active_at<Tz: TimeZone>(definition: &BreakDefinition, reference: &DateTime<Tz>) -> bool {
    resolve_window(definition, reference).contains(reference.with_timezone(&Utc))
}

/// Display ordering by local start time of day, independent of the stored
/// dates. Ties fall back to end time, then name, then id.
pub fn compare_by_schedule<Tz: TimeZone>(
    a: &BreakDefinition,
    b: &BreakDefinition,
    tz: &Tz,
) -> Ordering {
    time_of_day(a.start_time, tz)
        .cmp(&time_of_day(b.start_time, tz))
        .then_with(|| time_of_day(a.end_time, tz).cmp(&time_of_day(b.end_time, tz)))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}
