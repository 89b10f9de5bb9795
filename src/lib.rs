//! A locale-sensitive date and time parser, independent of any Rust date and time library.
//!
//! This crate interprets a human-readable date/time string against an ICU/JDK-style letter
//! pattern (`y`, `M`, `d`, `H`, `m`, `s`, `E`, `a`, `z`, `Z`, ...) and writes the parsed fields
//! into a caller-owned value through the [`DateFields`] trait, so no calendar implementation is
//! bundled here — bring your own date type, or use the built-in [`SimpleDateTime`].

mod clock;
mod engine;
mod error;
mod fields;
mod locale;
mod pattern;
mod record;
mod resolve;
#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use error::ErrorKind;
pub use error::ParseError;
pub use fields::DateFields;
pub use fields::SimpleDateTime;
pub use locale::Symbols;

/// A result returned from pattern compilation or date/time parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Where a [`Parser`]'s pattern comes from.
///
/// A literal pattern is compiled as-is. A standard index selects one of
/// the locale's twelve predefined patterns; any value outside `0..=11`
/// folds to 10 (combined-medium).
#[derive(Debug, Clone, Copy)]
pub enum PatternSource<'p> {
  Literal(&'p str),
  Standard(i64),
}

/// A compiled date/time pattern parser.
///
/// The element list is built once at construction and never changes
/// afterward, so a `Parser` is cheap to share across threads.
#[derive(Clone)]
pub struct Parser {
  elements: Vec<pattern::Element>,
  symbols: Symbols,
  opts: ParseOptions,
}

impl Parser {
  /// Compile a literal pattern using the built-in English/Gregorian locale.
  pub fn new(pattern: impl AsRef<str>) -> ParseResult<Self> {
    Self::with_symbols(PatternSource::Literal(pattern.as_ref()), Symbols::default())
  }

  /// Compile one of the twelve standard patterns using the built-in
  /// English/Gregorian locale.
  pub fn standard(index: i64) -> ParseResult<Self> {
    Self::with_symbols(PatternSource::Standard(index), Symbols::default())
  }

  /// Compile a pattern against a caller-supplied locale symbol table.
  pub fn with_symbols(source: PatternSource<'_>, symbols: Symbols) -> ParseResult<Self> {
    let standard_pattern_owner;
    let pattern: &str = match source {
      PatternSource::Literal(pattern) => pattern,
      PatternSource::Standard(index) => {
        standard_pattern_owner = pattern::standard_pattern(index, &symbols);
        &standard_pattern_owner
      },
    };
    let elements = pattern::compile(pattern)?;
    Ok(Self { elements, symbols, opts: ParseOptions::default() })
  }

  /// Enforce round-trip validation of the resolved date.
  #[must_use]
  pub fn validate(mut self, validate: bool) -> Self {
    self.opts.validate = validate;
    self
  }

  /// Override the century-window offset used for two-digit-year
  /// disambiguation (default 80).
  #[must_use]
  pub fn century_window(mut self, years: i64) -> Self {
    self.opts.century_window = years;
    self
  }

  /// Override the wall clock used for two-digit-year disambiguation
  /// (default [`SystemClock`]).
  #[must_use]
  pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
    self.opts.clock = Arc::new(clock);
    self
  }

  /// Parse `text` against the compiled pattern, writing matched fields into
  /// `date`.
  ///
  /// Returns the count of characters consumed from `text` on success.
  /// Never panics on malformed input; every structural, abut-exhaustion, or
  /// validation failure surfaces as `Err` instead.
  pub fn parse<D: DateFields>(&self, text: &str, date: &mut D) -> ParseResult<usize> {
    engine::run(&self.elements, text, date, &self.opts, &self.symbols)
  }

  /// Like [`Parser::parse`], but fails with [`ErrorKind::TrailingInput`]
  /// unless the entire input was consumed.
  pub fn parse_exact<D: DateFields>(&self, text: &str, date: &mut D) -> ParseResult<usize> {
    let consumed = self.parse(text, date)?;
    if consumed == text.chars().count() {
      Ok(consumed)
    } else {
      Err(ParseError::new(text, ErrorKind::TrailingInput).at_index(consumed))
    }
  }

  /// Equivalent to `self.validate(true).parse(text, date)`.
  #[deprecated(note = "use `Parser::validate(true)` and `Parser::parse` instead")]
  pub fn parse_strict<D: DateFields>(&self, text: &str, date: &mut D) -> ParseResult<usize> {
    let opts = ParseOptions { validate: true, ..self.opts.clone() };
    engine::run(&self.elements, text, date, &opts, &self.symbols)
  }
}

/// Options governing a [`Parser`]'s behavior.
#[derive(Clone)]
pub struct ParseOptions {
  /// Enforce round-trip validation of the resolved date.
  pub validate: bool,
  /// The century-window offset for two-digit-year disambiguation. Default
  /// 80.
  pub century_window: i64,
  /// The wall-clock collaborator used to disambiguate two-digit years.
  pub clock: Arc<dyn Clock>,
}

impl Default for ParseOptions {
  fn default() -> Self {
    Self { validate: false, century_window: 80, clock: Arc::new(SystemClock) }
  }
}
