/*!
# Parse engine

Consumes input text against a compiled element list, accumulating field
values into a [`Record`], then hands the record to [`crate::resolve`] for
the final merge into the caller's date value.
*/

use crate::clock::Clock;
use crate::error::ErrorKind;
use crate::error::ParseError;
use crate::fields::DateFields;
use crate::locale::longest_match;
use crate::locale::Symbols;
use crate::pattern::Element;
use crate::record::Record;
use crate::resolve;
use crate::ParseOptions;

/// A re-seekable view over the input, in characters. A plain
/// `Peekable<Chars>` can't rewind; the abutting-run retry loop needs to
/// reset to the position at the start of the run on every failed width
/// guess.
pub(crate) struct Cursor<'a> {
  chars: &'a [char],
  pos: usize,
}

impl<'a> Cursor<'a> {
  fn new(chars: &'a [char]) -> Self {
    Self { chars, pos: 0 }
  }

  fn remaining(&self) -> &'a [char] {
    &self.chars[self.pos..]
  }

  fn remaining_str(&self) -> String {
    self.remaining().iter().collect()
  }

  fn is_empty(&self) -> bool {
    self.pos >= self.chars.len()
  }

  fn save(&self) -> usize {
    self.pos
  }

  fn restore(&mut self, pos: usize) {
    self.pos = pos;
  }

  fn advance(&mut self, n: usize) {
    self.pos += n;
  }

  fn pos(&self) -> usize {
    self.pos
  }
}

/// Bundles the read-only collaborators a parse needs, so per-letter
/// sub-parsers don't carry a long, repetitive parameter list.
pub(crate) struct Ctx<'a> {
  pub(crate) symbols: &'a Symbols,
  pub(crate) clock: &'a dyn Clock,
  pub(crate) century_window: i64,
}

/// Drive `elements` against `text`, accumulating into a fresh [`Record`],
/// then resolve against `date`. Returns the count of characters consumed
/// from `text` on success.
pub(crate) fn run<D: DateFields>(
  elements: &[Element], text: &str, date: &mut D, opts: &ParseOptions, symbols: &Symbols,
) -> Result<usize, ParseError> {
  let chars: Vec<char> = text.chars().collect();
  let mut cursor = Cursor::new(&chars);
  let ctx = Ctx { symbols, clock: opts.clock.as_ref(), century_window: opts.century_window };
  let mut record = Record::default();

  let to_err = |cursor: &Cursor, kind: ErrorKind| ParseError::new(text, kind).at_index(cursor.pos());

  let mut i = 0;
  while i < elements.len() {
    match &elements[i] {
      Element::Literal(literal) => {
        match_literal(&mut cursor, literal).map_err(|k| to_err(&cursor, k))?;
        i += 1;
      },
      Element::Whitespace => {
        match_whitespace(&mut cursor).map_err(|k| to_err(&cursor, k))?;
        i += 1;
      },
      Element::Field { abut_start: true, .. } => {
        let start = cursor.pos();
        let consumed_elements = run_abut(&mut cursor, elements, i, &mut record, &ctx)
          .map_err(|k| ParseError::new(text, k).at_index(start))?;
        i += consumed_elements;
      },
      Element::Field { letter, count, numeric: true, .. } => {
        parse_numeric_field(&mut cursor, *letter, *count, 0, &mut record, &ctx)
          .map_err(|k| to_err(&cursor, k))?;
        i += 1;
      },
      Element::Field { letter, numeric: false, .. } => {
        parse_textual_field(&mut cursor, *letter, &mut record, &ctx)
          .map_err(|k| to_err(&cursor, k))?;
        i += 1;
      },
    }
  }

  resolve::resolve(&record, date, opts, &ctx).map_err(|k| ParseError::new(text, k))?;

  Ok(cursor.pos())
}

fn match_literal(cursor: &mut Cursor, literal: &str) -> Result<(), ErrorKind> {
  let wanted: Vec<char> = literal.chars().collect();
  let remaining = cursor.remaining();
  if remaining.len() >= wanted.len() && remaining[..wanted.len()] == wanted[..] {
    cursor.advance(wanted.len());
    Ok(())
  } else {
    Err(ErrorKind::LiteralMismatch)
  }
}

fn match_whitespace(cursor: &mut Cursor) -> Result<(), ErrorKind> {
  let n = cursor.remaining().iter().take_while(|c| c.is_whitespace()).count();
  if n == 0 {
    Err(ErrorKind::WhitespaceExpected)
  } else {
    cursor.advance(n);
    Ok(())
  }
}

/// Skip any whitespace at the current position without requiring any;
/// per-letter sub-parsers skip leading input whitespace first.
fn skip_whitespace(cursor: &mut Cursor) {
  let n = cursor.remaining().iter().take_while(|c| c.is_whitespace()).count();
  cursor.advance(n);
}

/// Result of the integer-parsing primitive.
struct ParsedInt {
  value: i64,
  /// Characters consumed, including a leading sign if present.
  consumed: usize,
  /// Digit characters consumed (excludes any leading sign).
  digits: usize,
}

fn normalize_digit(c: char, zero_digit: Option<char>) -> char {
  if let Some(zero) = zero_digit {
    let diff = c as i64 - zero as i64;
    if (0..=9).contains(&diff) {
      return char::from_u32('0' as u32 + diff as u32).unwrap_or(c);
    }
  }
  c
}

/// The core integer-parsing primitive: an optional leading sign followed
/// by up to `max_chars` digits (unbounded when `max_chars` is `0`).
fn parse_int(
  cursor: &mut Cursor, max_chars: usize, allow_signed: bool, zero_digit: Option<char>,
) -> Option<ParsedInt> {
  let remaining = cursor.remaining();
  let limit = if max_chars > 0 { max_chars.min(remaining.len()) } else { remaining.len() };
  let view = &remaining[..limit];

  let mut idx = 0usize;
  let mut sign = 1i64;
  if allow_signed {
    match view.first() {
      Some('+') => idx = 1,
      Some('-') => {
        sign = -1;
        idx = 1;
      },
      _ => {},
    }
  }

  let mut digits = String::new();
  while idx < view.len() {
    let normalized = normalize_digit(view[idx], zero_digit);
    if normalized.is_ascii_digit() {
      digits.push(normalized);
      idx += 1;
    } else {
      break;
    }
  }
  if digits.is_empty() {
    return None;
  }

  let value: i64 = digits.parse().ok()?;
  let consumed = idx;
  let digit_count = digits.len();
  cursor.advance(consumed);
  Some(ParsedInt { value: value * sign, consumed, digits: digit_count })
}

/// Resolve a two-digit year against the moving century window, returning
/// `(full_year, ambiguous)`.
fn resolve_two_digit_year(yy: i64, now_year: i64, window: i64) -> (i64, bool) {
  let century_start_year = now_year - window;
  let cutoff_yy = century_start_year.rem_euclid(100);
  let ambiguous = yy == cutoff_yy;
  let full_year =
    century_start_year.div_euclid(100) * 100 + yy + if yy < cutoff_yy { 100 } else { 0 };
  (full_year, ambiguous)
}

/// Parse a `y` field, resolving a two-digit year against the century
/// window when the field width and match length both equal two.
///
/// Returns the number of characters consumed, so a caller running this
/// inside an abutting run can check it against the field's declared width.
fn parse_year_field(
  cursor: &mut Cursor, count: u8, digit_count: usize, record: &mut Record, ctx: &Ctx,
) -> Result<usize, ErrorKind> {
  let zero_digit = ctx.symbols.zero_digit;
  let parsed = parse_int(cursor, digit_count, false, zero_digit)
    .or_else(|| parse_int(cursor, 0, true, zero_digit))
    .ok_or(ErrorKind::NumberExpected)?;

  if parsed.value >= 0 && parsed.consumed == 2 && count == 2 {
    let (full_year, ambiguous) = resolve_two_digit_year(parsed.value, ctx.clock.now_year(), ctx.century_window);
    record.set_year(full_year);
    record.ambiguous_year = ambiguous;
  } else {
    record.set_year(parsed.value);
  }
  Ok(parsed.consumed)
}

/// Parse an `S` field and round/pad it to millisecond precision regardless
/// of how many fractional digits were actually present. Returns the
/// milliseconds value alongside the characters consumed (see
/// [`parse_year_field`] for why the latter matters).
fn parse_fractional_seconds(
  cursor: &mut Cursor, digit_count: usize, zero_digit: Option<char>,
) -> Result<(u32, usize), ErrorKind> {
  let parsed = parse_int(cursor, digit_count, false, zero_digit).ok_or(ErrorKind::NumberExpected)?;
  let l = parsed.digits as i64;
  let ms = match l.cmp(&3) {
    std::cmp::Ordering::Less => parsed.value * 10i64.pow((3 - l) as u32),
    std::cmp::Ordering::Greater => {
      let divisor = 10i64.pow((l - 3) as u32);
      (parsed.value + divisor / 2) / divisor
    },
    std::cmp::Ordering::Equal => parsed.value,
  };
  Ok((ms.max(0) as u32, parsed.consumed))
}

/// Parse a `z`/`Z`/`v` field: an optional `GMT` prefix, then a signed
/// offset in either `+HH:MM` or packed `+HHMM` shape.
fn parse_timezone_field(cursor: &mut Cursor, zero_digit: Option<char>) -> Result<i32, ErrorKind> {
  const GMT: [char; 3] = ['G', 'M', 'T'];
  if cursor.remaining().len() >= 3 && cursor.remaining()[..3] == GMT {
    cursor.advance(3);
  }

  if cursor.is_empty() {
    return Ok(0);
  }

  let first = parse_int(cursor, 0, true, zero_digit).ok_or(ErrorKind::NumberExpected)?;

  let offset_minutes = if cursor.remaining().first() == Some(&':') {
    cursor.advance(1);
    let second = parse_int(cursor, 0, false, zero_digit).ok_or(ErrorKind::NumberExpected)?;
    first.value * 60 + second.value
  } else {
    let n = first.digits as i64;
    if first.value < 24 && n <= 3 {
      first.value * 60
    } else {
      // No bounds check on the packed minutes component here; a value
      // like +0199 packs through unchanged rather than erroring.
      (first.value % 100) + (first.value / 100) * 60
    }
  };

  Ok(-(offset_minutes as i32))
}

/// Per-letter dispatch for numeric fields, used both for a non-abutting
/// field (`digit_count = 0`) and for a member of an abutting run
/// (`digit_count` = that element's effective width).
///
/// Returns the number of characters actually consumed. A non-abutting
/// caller ignores this; the abutting-run loop in [`run_abut`] compares it
/// against the field's declared width to decide whether this element
/// really satisfied its fixed width or needs to force a retry.
fn parse_numeric_field(
  cursor: &mut Cursor, letter: char, count: u8, digit_count: usize, record: &mut Record, ctx: &Ctx,
) -> Result<usize, ErrorKind> {
  skip_whitespace(cursor);
  let zero_digit = ctx.symbols.zero_digit;
  let consumed = match letter {
    'y' => parse_year_field(cursor, count, digit_count, record, ctx)?,
    'M' | 'L' => {
      let parsed =
        parse_int(cursor, digit_count, false, zero_digit).ok_or(ErrorKind::NumberExpected)?;
      record.set_month((parsed.value - 1).max(0) as u32);
      parsed.consumed
    },
    'd' => {
      // Outside an abutting run this always reports success; a missing or
      // unparsable day just leaves the field unset. Inside a run, zero
      // characters consumed still falls short of the declared width and
      // the caller treats it as a failed element.
      match parse_int(cursor, digit_count, false, zero_digit) {
        Some(parsed) => {
          record.set_day(parsed.value.max(0) as u32);
          parsed.consumed
        },
        None => 0,
      }
    },
    'S' => {
      let (ms, consumed) = parse_fractional_seconds(cursor, digit_count, zero_digit)?;
      record.set_milliseconds(ms);
      consumed
    },
    'D' => {
      // Day-of-year is classified numeric (per the compiler's abut-marking
      // rules) but the intermediate record has no day-of-year attribute to
      // populate — resolution never consults it. Still required to consume
      // a valid integer so abutting-run width negotiation behaves the same
      // as any other numeric field in the run.
      let parsed =
        parse_int(cursor, digit_count, false, zero_digit).ok_or(ErrorKind::NumberExpected)?;
      parsed.consumed
    },
    'h' => {
      let parsed =
        parse_int(cursor, digit_count, false, zero_digit).ok_or(ErrorKind::NumberExpected)?;
      let hours = if parsed.value == 12 { 0 } else { parsed.value };
      record.set_hours(hours.max(0) as u32);
      parsed.consumed
    },
    'K' | 'H' | 'k' => {
      let parsed =
        parse_int(cursor, digit_count, false, zero_digit).ok_or(ErrorKind::NumberExpected)?;
      record.set_hours(parsed.value.max(0) as u32);
      parsed.consumed
    },
    'm' => {
      let parsed =
        parse_int(cursor, digit_count, false, zero_digit).ok_or(ErrorKind::NumberExpected)?;
      record.set_minutes(parsed.value.max(0) as u32);
      parsed.consumed
    },
    's' => {
      let parsed =
        parse_int(cursor, digit_count, false, zero_digit).ok_or(ErrorKind::NumberExpected)?;
      record.set_seconds(parsed.value.max(0) as u32);
      parsed.consumed
    },
    _ => unreachable!("non-numeric letter routed to the numeric dispatcher"),
  };
  Ok(consumed)
}

/// Per-letter dispatch for textual fields. Textual fields never participate
/// in an abutting run (they are never classified numeric), so this is only
/// reached from the main element loop.
fn parse_textual_field(
  cursor: &mut Cursor, letter: char, record: &mut Record, ctx: &Ctx,
) -> Result<(), ErrorKind> {
  skip_whitespace(cursor);
  let symbols = ctx.symbols;
  match letter {
    'G' => {
      if let Some((idx, len)) = longest_match(symbols.eras, &cursor.remaining_str()) {
        record.set_era(idx as u8);
        cursor.advance(len);
      }
      // No match just leaves `era` unset rather than failing the parse.
      Ok(())
    },
    'a' => {
      if let Some((idx, len)) = longest_match(symbols.am_pms, &cursor.remaining_str()) {
        record.set_ampm(idx as u8);
        cursor.advance(len);
      }
      Ok(())
    },
    'E' => {
      let remaining = cursor.remaining_str();
      if let Some((idx, len)) = longest_match(symbols.weekdays, &remaining) {
        record.set_day_of_week(idx as u32);
        cursor.advance(len);
        return Ok(());
      }
      if let Some((idx, len)) = longest_match(symbols.short_weekdays, &remaining) {
        record.set_day_of_week(idx as u32);
        cursor.advance(len);
        return Ok(());
      }
      Err(ErrorKind::NoLongestMatch)
    },
    'Q' => {
      let remaining = cursor.remaining_str();
      let matched = longest_match(symbols.quarters, &remaining)
        .or_else(|| longest_match(symbols.short_quarters, &remaining));
      match matched {
        Some((idx, len)) => {
          record.set_month((idx as u32) * 3);
          record.set_day(1);
          cursor.advance(len);
          Ok(())
        },
        None => Err(ErrorKind::NoLongestMatch),
      }
    },
    'M' | 'L' => {
      let candidates: Vec<&str> = symbols
        .months
        .iter()
        .chain(symbols.standalone_months.iter())
        .chain(symbols.short_months.iter())
        .chain(symbols.standalone_short_months.iter())
        .copied()
        .collect();
      let remaining = cursor.remaining_str();
      match longest_match(&candidates, &remaining) {
        Some((idx, len)) => {
          record.set_month((idx as u32) % 12);
          cursor.advance(len);
          Ok(())
        },
        None => Err(ErrorKind::NoLongestMatch),
      }
    },
    'z' | 'Z' | 'v' => {
      let offset = parse_timezone_field(cursor, symbols.zero_digit)?;
      record.set_tz_offset(offset);
      Ok(())
    },
    _ => unreachable!("numeric letter routed to the textual dispatcher"),
  }
}

/// The abutting-run sub-algorithm. `head` is the index of the run's first
/// element in `elements`. On each retry the head field's width shrinks by
/// one; every other member of the run keeps its declared width — and every
/// member, head included, must consume exactly the width attempted for it
/// this pass. A sub-parse that only finds fewer digits than that (because
/// input ran out) is treated the same as an outright parse failure: it
/// forces a reset back to `head` with the head's width shrunk by one.
/// Returns the number of elements the run consumed on success.
fn run_abut(
  cursor: &mut Cursor, elements: &[Element], head: usize, record: &mut Record, ctx: &Ctx,
) -> Result<usize, ErrorKind> {
  let entry_pos = cursor.save();
  let mut abut_pass: i32 = 0;
  let mut i = head;

  loop {
    let Some(element) = elements.get(i) else {
      return Ok(i - head);
    };
    let Element::Field { letter, count, .. } = element else {
      return Ok(i - head);
    };
    if !element.is_numeric_field() {
      return Ok(i - head);
    }

    let width = if i == head {
      let w = *count as i32 - abut_pass;
      abut_pass += 1;
      if w <= 0 {
        return Err(ErrorKind::AbutExhausted);
      }
      w as u8
    } else {
      *count
    };

    match parse_numeric_field(cursor, *letter, *count, width as usize, record, ctx) {
      Ok(consumed) if consumed == width as usize => i += 1,
      _ => {
        cursor.restore(entry_pos);
        i = head;
      },
    }
  }
}
