/*!
# Pattern compilation

Turns an ICU/JDK-style letter pattern into an ordered, immutable list of
[`Element`]s. This is the one-shot step that runs at [`crate::Parser`]
construction time.
*/

use crate::error::ErrorKind;
use crate::error::ParseError;
use crate::locale::Symbols;

/// All ASCII letters that carry pattern meaning. Anything else is a literal.
pub(crate) const FIELD_LETTERS: &str = "GyMLdkHmsSEDahKzZvQ";

/// A single compiled unit of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Element {
  /// A run of literal text (unquoted punctuation/spacing-free characters, or
  /// the contents of a quoted run) that must match byte-for-byte.
  Literal(String),
  /// A run of one or more input whitespace characters.
  Whitespace,
  /// A pattern letter field.
  Field {
    letter: char,
    count: u8,
    numeric: bool,
    abut_start: bool,
  },
}

impl Element {
  /// True for a [`Element::Field`] classified numeric at compile time.
  pub(crate) fn is_numeric_field(&self) -> bool {
    matches!(self, Self::Field { numeric: true, .. })
  }
}

/// Numeric-vs-textual classification for a pattern letter at a given repeat
/// count.
fn is_numeric(letter: char, count: u8) -> bool {
  match letter {
    'M' | 'L' => count < 3,
    'y' | 'd' | 'h' | 'H' | 'm' | 's' | 'S' | 'D' | 'k' | 'K' => true,
    'G' | 'E' | 'a' | 'z' | 'Z' | 'v' | 'Q' => false,
    _ => false,
  }
}

/// Compile a pattern string into an ordered element list.
///
/// Never fails on syntactically well-formed input. The one failure mode —
/// an unterminated quote — is reported as an error rather than panicking
/// or truncating silently.
pub(crate) fn compile(pattern: &str) -> Result<Vec<Element>, ParseError> {
  let mut elements = Vec::new();
  let mut buffer = String::new();
  let mut in_quote = false;
  let chars: Vec<char> = pattern.chars().collect();
  let mut i = 0;

  macro_rules! flush {
    () => {
      if !buffer.is_empty() {
        elements.push(Element::Literal(std::mem::take(&mut buffer)));
      }
    };
  }

  while i < chars.len() {
    let ch = chars[i];

    if in_quote {
      if ch == '\'' {
        // A doubled apostrophe emits a literal apostrophe; a lone one ends
        // the quote.
        if chars.get(i + 1) == Some(&'\'') {
          buffer.push('\'');
          i += 2;
        } else {
          in_quote = false;
          i += 1;
        }
      } else {
        buffer.push(ch);
        i += 1;
      }
      continue;
    }

    if ch == ' ' {
      flush!();
      elements.push(Element::Whitespace);
      i += 1;
      while chars.get(i) == Some(&' ') {
        i += 1;
      }
      continue;
    }

    if ch == '\'' {
      if chars.get(i + 1) == Some(&'\'') {
        buffer.push('\'');
        i += 2;
      } else {
        in_quote = true;
        i += 1;
      }
      continue;
    }

    if FIELD_LETTERS.contains(ch) {
      flush!();
      let mut count: u8 = 0;
      while chars.get(i) == Some(&ch) {
        count += 1;
        i += 1;
      }
      let numeric = is_numeric(ch, count);
      elements.push(Element::Field { letter: ch, count, numeric, abut_start: false });
      continue;
    }

    buffer.push(ch);
    i += 1;
  }

  if in_quote {
    return Err(ParseError::new(pattern, ErrorKind::UnterminatedQuote));
  }
  flush!();

  mark_abut_starts(&mut elements);
  Ok(elements)
}

/// Walk the element list and mark each numeric field that begins an
/// abutting run: `abut_start` is true for a field element iff it is
/// numeric, the element immediately following it is also a numeric
/// field, and the preceding element is not a numeric field.
fn mark_abut_starts(elements: &mut [Element]) {
  let numeric_at = |elements: &[Element], idx: usize| -> bool {
    elements.get(idx).map(Element::is_numeric_field).unwrap_or(false)
  };
  for i in 0..elements.len() {
    let is_self_numeric = numeric_at(elements, i);
    if !is_self_numeric {
      continue;
    }
    let next_numeric = numeric_at(elements, i + 1);
    let prev_numeric = i > 0 && numeric_at(elements, i - 1);
    if next_numeric && !prev_numeric {
      if let Element::Field { abut_start, .. } = &mut elements[i] {
        *abut_start = true;
      }
    }
  }
}

/// Resolve one of the twelve standard pattern indices into a literal
/// pattern string, folding any out-of-range value to index 10
/// (combined-medium).
pub(crate) fn standard_pattern(index: i64, symbols: &Symbols) -> String {
  let index = if (0..=11).contains(&index) { index as usize } else { 10 };
  match index {
    0..=3 => symbols.date_formats[index].to_string(),
    4..=7 => symbols.time_formats[index - 4].to_string(),
    8..=11 => {
      let combined = symbols.date_time_formats[index - 8];
      let time = symbols.time_formats[index - 8];
      let date = symbols.date_formats[index - 8];
      combined.replacen("{1}", date, 1).replacen("{0}", time, 1)
    },
    _ => unreachable!("index folded to a valid range above"),
  }
}
