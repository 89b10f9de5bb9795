#![cfg(test)]

use assert2::check;
use assert2::let_assert;

use crate::fields::DateFields;
use crate::fields::SimpleDateTime;
use crate::locale::Symbols;
use crate::ErrorKind;
use crate::FixedClock;
use crate::ParseResult;
use crate::Parser;

fn parse(pattern: &str, text: &str) -> ParseResult<SimpleDateTime> {
  let parser = Parser::new(pattern)?;
  let mut date = SimpleDateTime::new(1970, 0, 1);
  parser.parse(text, &mut date)?;
  Ok(date)
}

#[test]
fn parses_an_iso_like_date() -> ParseResult<()> {
  let date = parse("yyyy-MM-dd", "2012-04-21")?;
  check!(date.full_year() == 2012);
  check!(date.month() == 3);
  check!(date.day() == 21);
  Ok(())
}

#[test]
fn abutting_run_decomposes_into_its_fields() -> ParseResult<()> {
  // `HHmmss` with no separators relies on the abutting-run algorithm to
  // split "123456" into 12, 34, 56.
  let date = parse("HHmmss", "123456")?;
  check!(date.hours() == 12);
  Ok(())
}

#[test]
fn abutting_run_shrinks_the_head_when_trailing_fields_would_not_fit() -> ParseResult<()> {
  // Only 5 digits for three width-2 fields: the head can't keep its full
  // width-2 match, because that would leave the trailing `ss` field only
  // one leftover digit, short of its declared width. The head must retry
  // down to width 1 so `mm` and `ss` each get their full two digits.
  let date = parse("HHmmss", "12345")?;
  check!(date.hours() == 1);
  check!(date.minutes() == 23);
  check!(date.seconds() == 45);
  Ok(())
}

#[test]
fn abutting_run_fails_when_no_head_width_lets_every_field_fit() {
  // 4 digits can't satisfy three width-2 fields under any head width: at
  // head width 2, "mm" takes the remaining two digits and "ss" is left
  // with none; at head width 1, "mm" takes two of the remaining three and
  // "ss" is left with only one. Neither head width lets every field hit
  // its exact declared width, so the run must fail outright rather than
  // silently handing the last field a partial match.
  let mut d = SimpleDateTime::new(1970, 0, 1);
  let err = Parser::new("HHmmss").unwrap().parse("1234", &mut d).unwrap_err();
  check!(err.kind == ErrorKind::AbutExhausted);
}

#[test]
fn abutting_run_exhaustion_fails_rather_than_silently_truncating() {
  // `Hm` compiles to two distinct single-digit numeric fields forming an
  // abut run. A single leftover digit can satisfy the head, but leaves
  // nothing for `m`; since the head's width can't shrink below 1 (its
  // declared count), the run has nowhere left to retry and must fail.
  let mut d = SimpleDateTime::new(1970, 0, 1);
  let err = Parser::new("Hm").unwrap().parse("1", &mut d).unwrap_err();
  check!(err.kind == ErrorKind::AbutExhausted);
}

#[test]
fn yyyymmdd_abut_run_splits_a_four_digit_head_from_two_two_digit_fields() -> ParseResult<()> {
  let date = parse("yyyyMMdd", "19960710")?;
  check!(date.full_year() == 1996);
  check!(date.month() == 6);
  check!(date.day() == 10);
  Ok(())
}

#[test]
fn two_digit_year_resolves_against_the_century_window() -> ParseResult<()> {
  let parser = Parser::new("MM/dd/yy")?.clock(FixedClock(1997));
  let mut date = SimpleDateTime::new(1970, 0, 1);
  parser.parse("04/21/12", &mut date)?;
  check!(date.full_year() == 2012);

  let mut date = SimpleDateTime::new(1970, 0, 1);
  parser.parse("04/21/85", &mut date)?;
  check!(date.full_year() == 1985);
  Ok(())
}

#[test]
fn four_digit_year_is_never_run_through_the_century_window() -> ParseResult<()> {
  let date = parse("yyyy/MM/dd", "0099/04/21")?;
  check!(date.full_year() == 99);
  Ok(())
}

#[test]
fn era_field_negates_bce_years() -> ParseResult<()> {
  let date = parse("GG yyyy-MM-dd", "BC 0044-03-15")?;
  check!(date.full_year() == -43);
  Ok(())
}

#[test]
fn am_pm_folds_into_24_hour_time() -> ParseResult<()> {
  let date = parse("yyyy-MM-dd hh:mm a", "2012-04-21 11:30 PM")?;
  check!(date.hours() == 23);
  let date = parse("yyyy-MM-dd hh:mm a", "2012-04-21 11:30 AM")?;
  check!(date.hours() == 11);
  Ok(())
}

#[test]
fn noon_hour_folds_to_zero_before_the_pm_refold() -> ParseResult<()> {
  // `h` folds a parsed 12 down to 0 first; PM then adds 12 back, landing on
  // noon (12), not midnight (0) or 24. This is the one input where getting
  // the fold order wrong is invisible for every other hour value.
  let date = parse("h:mm a", "12:08 PM")?;
  check!(date.hours() == 12);
  check!(date.minutes() == 8);
  Ok(())
}

#[test]
fn textual_timezone_shifts_the_resolved_instant() -> ParseResult<()> {
  let date = parse("yyyy-MM-dd HH:mm Z", "2012-04-21 11:00 -0500")?;
  // -0500 means local time is 5 hours behind UTC; shifting to the UTC
  // adapter's own zero offset should advance by 5 hours.
  check!(date.hours() == 16);
  Ok(())
}

#[test]
fn longest_match_prefers_full_month_name_over_an_abbreviation_prefix() -> ParseResult<()> {
  let date = parse("MMMM d, yyyy", "June 10, 1996")?;
  check!(date.month() == 5);
  check!(date.day() == 10);
  Ok(())
}

#[test]
fn validation_rejects_a_day_that_rolled_into_the_next_month() {
  let parser = Parser::new("yyyy-MM-dd").unwrap().validate(true);
  let mut date = SimpleDateTime::new(1970, 0, 1);
  let err = parser.parse("1996-02-30", &mut date).unwrap_err();
  check!(err.kind == ErrorKind::ValidationFailed);
}

#[test]
fn a_validation_failure_leaves_the_date_value_untouched() {
  // Resolution gets as far as setting year/month/day before validation
  // catches the rolled-over day; none of that partial work should be
  // visible on a failed parse.
  let parser = Parser::new("yyyy-MM-dd").unwrap().validate(true);
  let before = SimpleDateTime::new(1970, 0, 1);
  let mut date = before;
  let err = parser.parse("1996-02-30", &mut date).unwrap_err();
  check!(err.kind == ErrorKind::ValidationFailed);
  check!(date == before);
}

#[test]
fn a_weekday_mismatch_leaves_the_date_value_untouched() {
  // Resolution runs the timezone shift and ambiguous-year fixup before the
  // day-of-week check can fail; a failure there must still roll back
  // everything resolution already wrote.
  let parser = Parser::new("EEEE, yyyy-MM-dd").unwrap();
  let before = SimpleDateTime::new(1970, 0, 1);
  let mut date = before;
  // 1996-07-10 was a Wednesday, not a Monday.
  let err = parser.parse("Monday, 1996-07-10", &mut date).unwrap_err();
  check!(err.kind == ErrorKind::WeekdayMismatch);
  check!(date == before);
}

#[test]
fn without_validation_a_rolled_over_day_is_accepted_verbatim() -> ParseResult<()> {
  let date = parse("yyyy-MM-dd", "1996-02-30")?;
  check!(date.day() == 30);
  Ok(())
}

#[test]
fn quoted_literal_text_must_match_exactly() {
  let mut date = SimpleDateTime::new(1970, 0, 1);
  let err = Parser::new("yyyy 'at' HH").unwrap().parse("2012 on 11", &mut date).unwrap_err();
  check!(err.kind == ErrorKind::LiteralMismatch);
}

#[test]
fn parse_exact_rejects_trailing_input() {
  let parser = Parser::new("yyyy-MM-dd").unwrap();
  let mut date = SimpleDateTime::new(1970, 0, 1);
  let err = parser.parse_exact("2012-04-21T11:00", &mut date).unwrap_err();
  check!(err.kind == ErrorKind::TrailingInput);
}

#[test]
fn parse_returns_consumed_character_count() -> ParseResult<()> {
  let parser = Parser::new("yyyy-MM-dd")?;
  let mut date = SimpleDateTime::new(1970, 0, 1);
  let consumed = parser.parse("2012-04-21T11:00", &mut date)?;
  check!(consumed == "2012-04-21".chars().count());
  Ok(())
}

#[test]
fn standard_pattern_index_compiles_and_parses() -> ParseResult<()> {
  let parser = Parser::standard(3)?; // M/d/yy
  let mut date = SimpleDateTime::new(1970, 0, 1);
  parser.parse("4/21/12", &mut date)?;
  check!(date.month() == 3);
  check!(date.day() == 21);
  Ok(())
}

#[test]
fn out_of_range_standard_index_folds_to_combined_medium() {
  let_assert!(Ok(_) = Parser::standard(99));
}

#[test]
fn custom_symbols_are_honored_for_textual_fields() -> ParseResult<()> {
  let mut symbols = Symbols::english();
  symbols.months = &[
    "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
    "octubre", "noviembre", "diciembre",
  ];
  let parser = crate::Parser::with_symbols(crate::PatternSource::Literal("d 'de' MMMM"), symbols)?;
  let mut date = SimpleDateTime::new(1970, 0, 1);
  parser.parse("21 de abril", &mut date)?;
  check!(date.month() == 3);
  check!(date.day() == 21);
  Ok(())
}

#[test]
fn day_of_year_field_consumes_digits_without_affecting_resolution() {
  // `D` has no corresponding record attribute; it must still parse (and
  // discard) its digits rather than panicking or being misrouted to the
  // textual dispatcher.
  let date = parse("yyyy-MM-dd DDD", "2012-04-21 112").unwrap();
  check!(date.full_year() == 2012);
  check!(date.month() == 3);
  check!(date.day() == 21);
}

#[test]
fn unterminated_quote_is_a_compile_error() {
  let err = Parser::new("yyyy 'oops").unwrap_err();
  check!(err.kind == ErrorKind::UnterminatedQuote);
}
