/*!
# Resolution

Merges a fully-populated [`Record`] into the caller's date value. The
ten-step order here is observable and must be preserved exactly.
*/

use crate::engine::Ctx;
use crate::error::ErrorKind;
use crate::fields::days_in_month;
use crate::fields::DateFields;
use crate::record::Record;
use crate::ParseOptions;

/// The ten-step field-to-date merge. A null-date guard has no Rust
/// equivalent here — `date: &mut D` can't be null — so that step is
/// omitted entirely.
///
/// Every step mutates a clone of `date`, not `date` itself. A failure partway
/// through (validation, a disagreeing day-of-week) discards that clone, so
/// `date` is left exactly as the caller passed it in — no partial writes on
/// failure. The clone is only written back over `*date` once every step has
/// succeeded.
pub(crate) fn resolve<D: DateFields>(
  record: &Record, date: &mut D, opts: &ParseOptions, ctx: &Ctx,
) -> Result<(), ErrorKind> {
  let mut scratch = date.clone();
  resolve_onto(record, &mut scratch, opts, ctx)?;
  *date = scratch;
  Ok(())
}

fn resolve_onto<D: DateFields>(
  record: &Record, date: &mut D, opts: &ParseOptions, ctx: &Ctx,
) -> Result<(), ErrorKind> {
  // Step 2: BCE normalization.
  let year = match (record.era, record.year) {
    (Some(0), Some(y)) if y > 0 => Some(-(y - 1)),
    (_, y) => y,
  };

  // Step 3: year.
  if let Some(y) = year {
    date.set_full_year(y);
  }

  // Step 4: month/day dance.
  let original_day = date.day();
  date.set_day(1);
  if let Some(m) = record.month {
    date.set_month(m);
  }
  let resolved_day = match record.day {
    Some(d) => d,
    None => original_day.min(days_in_month(date.full_year(), date.month())).max(1),
  };
  date.set_day(resolved_day);

  // Steps 5–6: time-of-day fields, only when the adapter supports them.
  let mut resolved_hours = None;
  if date.supports_time() {
    let mut hours = record.hours.unwrap_or_else(|| date.hours());
    if record.ampm == Some(1) && hours < 12 {
      hours += 12;
    }
    date.set_hours(hours);
    resolved_hours = Some(hours);

    if let Some(minutes) = record.minutes {
      date.set_minutes(minutes);
    }
    if let Some(seconds) = record.seconds {
      date.set_seconds(seconds);
    }
    if let Some(milliseconds) = record.milliseconds {
      date.set_milliseconds(milliseconds);
    }
  }

  // Step 7: validation.
  if opts.validate {
    if let Some(y) = year {
      if date.full_year() != y {
        return Err(ErrorKind::ValidationFailed);
      }
    }
    if let Some(m) = record.month {
      if date.month() != m {
        return Err(ErrorKind::ValidationFailed);
      }
    }
    if let Some(d) = record.day {
      if date.day() != d {
        return Err(ErrorKind::ValidationFailed);
      }
    }
    if resolved_hours.is_some_and(|h| h >= 24) {
      return Err(ErrorKind::ValidationFailed);
    }
    if record.minutes.is_some_and(|m| m >= 60) {
      return Err(ErrorKind::ValidationFailed);
    }
    if record.seconds.is_some_and(|s| s >= 60) {
      return Err(ErrorKind::ValidationFailed);
    }
    if record.milliseconds.is_some_and(|ms| ms >= 1000) {
      return Err(ErrorKind::ValidationFailed);
    }
  }

  // Step 8: timezone shift.
  if let Some(tz_offset) = record.tz_offset {
    let delta_ms = i64::from(tz_offset - date.timezone_offset()) * 60_000;
    date.set_time(date.time() + delta_ms);
  }

  // Step 9: ambiguous-year fixup.
  if record.ambiguous_year {
    let cutoff_year = ctx.clock.now_year() - ctx.century_window;
    if date.full_year() < cutoff_year {
      date.set_full_year(date.full_year() + 100);
    }
  }

  // Step 10: day-of-week handling.
  if let Some(day_of_week) = record.day_of_week {
    if record.day.is_none() {
      nudge_to_day_of_week(date, day_of_week);
    } else if date.day_of_week() != day_of_week {
      return Err(ErrorKind::WeekdayMismatch);
    }
  }

  Ok(())
}

/// Shift `date` to the nearest instance of `day_of_week`, undoing any
/// accidental month crossing.
fn nudge_to_day_of_week<D: DateFields>(date: &mut D, day_of_week: u32) {
  let original_month = date.month();
  let mut adjustment = (7 + day_of_week as i64 - date.day_of_week() as i64) % 7;
  if adjustment > 3 {
    adjustment -= 7;
  }

  let shifted_time = date.time() + adjustment * 86_400_000;
  date.set_time(shifted_time);

  if date.month() != original_month {
    let undo = if adjustment > 0 { -7 } else { 7 };
    date.set_time(shifted_time + undo * 86_400_000);
  }
}
