use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// Errors occurring during pattern compilation or parsing.
#[derive(Debug, Clone)]
pub struct ParseError {
  /// An owned copy of the input string (the pattern, for compile errors; the
  /// date/time text, for parse errors).
  pub src: String,
  /// The byte index in `src` where the error occurred, if known.
  pub index: Option<usize>,
  /// A machine-readable explanation of the error.
  pub kind: ErrorKind,
}

impl ParseError {
  pub(crate) fn new(src: impl Into<String>, kind: ErrorKind) -> Self {
    Self { src: src.into(), index: None, kind }
  }

  pub(crate) fn at_index(mut self, index: usize) -> Self {
    self.index = Some(index);
    self
  }
}

impl Display for ParseError {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    write!(
      f,
      "{}\n{}\n{}",
      self.src,
      match self.index {
        Some(ix) => format!("{}^-----", " ".repeat(ix)),
        None => String::new(),
      },
      self.kind
    )
  }
}

impl Error for ParseError {}

/// Potential errors that occur during pattern compilation or parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
  /// A quoted literal run in the pattern was never closed.
  UnterminatedQuote,
  /// A text literal in the pattern did not match the input at this position.
  LiteralMismatch,
  /// The pattern required one or more whitespace characters here, but none
  /// were found.
  WhitespaceExpected,
  /// A numeric field could not consume a valid integer of the required
  /// shape.
  NumberExpected,
  /// A textual field (month/weekday/era/am-pm/quarter name) had no viable
  /// longest match against the locale symbol table.
  NoLongestMatch,
  /// An abutting numeric run exhausted every head width down to one digit
  /// without the whole run succeeding.
  AbutExhausted,
  /// Resolved fields failed to round-trip against the mutated date
  /// (`ParseOptions::validate`).
  ValidationFailed,
  /// The pattern consumed successfully but input remained (`parse_exact`).
  TrailingInput,
  /// `dayOfWeek` was specified along with an explicit day, and the two
  /// disagree once the date is resolved.
  WeekdayMismatch,
}

impl Display for ErrorKind {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    write!(f, "{}", match self {
      Self::UnterminatedQuote => "pattern contains an unterminated quoted literal",
      Self::LiteralMismatch => "input does not match the literal text required by the pattern",
      Self::WhitespaceExpected => "pattern requires whitespace here, but input has none",
      Self::NumberExpected => "pattern requires a number here, but input does not contain one",
      Self::NoLongestMatch => "no locale symbol matched the input at this position",
      Self::AbutExhausted => "an abutting numeric run could not be decomposed",
      Self::ValidationFailed => "parsed fields do not round-trip against the resolved date",
      Self::TrailingInput => "parsing finished, but input remains",
      Self::WeekdayMismatch => "parsed day-of-week disagrees with the resolved date",
    })
  }
}
