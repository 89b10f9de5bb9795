/*!
# Intermediate record

Every attribute a parse can populate, held as an `Option` so presence vs.
absence is never conflated with a sentinel value.
*/

/// The scratch record accumulated while parsing, before [`crate::resolve`]
/// merges it into the caller's date value.
///
/// A single record rather than a date/time split, since fields like era,
/// day-of-week, and the two-digit-year ambiguity marker don't divide
/// cleanly along a date/time line.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Record {
  pub era: Option<u8>,
  pub year: Option<i64>,
  /// Zero-based, `0..=11`.
  pub month: Option<u32>,
  pub day: Option<u32>,
  pub hours: Option<u32>,
  pub minutes: Option<u32>,
  pub seconds: Option<u32>,
  pub milliseconds: Option<u32>,
  /// `0` = AM, `1` = PM.
  pub ampm: Option<u8>,
  /// Minutes east of UTC, captured with the sign already flipped.
  pub tz_offset: Option<i32>,
  /// `0..=6`, Sunday = 0.
  pub day_of_week: Option<u32>,
  /// Set when the two-digit year equaled the century-window cutoff.
  pub ambiguous_year: bool,
}

macro_rules! set_fields {
  ($($fn_name:ident($field:ident: $ty:ty)),* $(,)?) => {
    impl Record {
      $(
        pub(crate) fn $fn_name(&mut self, value: $ty) {
          self.$field = Some(value);
        }
      )*
    }
  };
}

set_fields!(
  set_era(era: u8),
  set_year(year: i64),
  set_month(month: u32),
  set_day(day: u32),
  set_hours(hours: u32),
  set_minutes(minutes: u32),
  set_seconds(seconds: u32),
  set_milliseconds(milliseconds: u32),
  set_ampm(ampm: u8),
  set_tz_offset(tz_offset: i32),
  set_day_of_week(day_of_week: u32),
);
