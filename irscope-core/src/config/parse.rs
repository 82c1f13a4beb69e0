//! Board configuration parser
//!
//! The document is lexed and parsed by `toml_parser` without allocating;
//! a push receiver applies each `key = value` of the four known sections
//! onto a default [`ScopeConfig`]. The rules mirror the build-time check
//! in the firmware's build script:
//!
//! - Keys that are absent keep their default value
//! - Unknown sections and keys are ignored
//! - Known keys must hold a value of the right type within range
//! - The I2C bus clock must stay below the logic clock

use heapless::{String, Vec};
use toml_parser::decoder::{Encoding, ScalarKind};
use toml_parser::lexer::Token;
use toml_parser::parser::{parse_document, EventReceiver, ValidateWhitespace};
use toml_parser::{ErrorSink, ParseError, Raw, Source, Span};

use crate::menu::MenuItem;
use crate::thermal::{Palette, TempUnit};

use super::types::{FrameRate, ScopeConfig};

/// Tokens the parser buffers for one document
pub const MAX_TOKENS: usize = 256;

/// Longest key or string value that is decoded
const MAX_TEXT: usize = 24;

/// Parse error, with the 1-based line it occurred on where one applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Document is not valid TOML
    Syntax(usize),
    /// Value of the wrong type or unparsable
    InvalidValue(usize),
    /// Value outside the allowed range
    OutOfRange(usize),
    /// I2C bus clock not below the logic clock
    ClockOrder,
    /// Document longer than the token buffer
    TooLarge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Sensor,
    Display,
    Loop,
    Menu,
    /// Unknown or nested table; its keys are skipped
    Other,
}

/// A decoded scalar value
#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Integer(i64),
    Boolean(bool),
    Text(String<MAX_TEXT>),
    /// Float, date-time, array or inline table
    Unsupported,
}

/// Decoded text collected into a fixed buffer
///
/// Text that does not fit sets `overflow` instead of failing the decode,
/// so an overlong value only matters when its key is known.
#[derive(Default)]
struct TextBuilder {
    text: String<MAX_TEXT>,
    overflow: bool,
}

impl toml_parser::decoder::StringBuilder<'_> for TextBuilder {
    fn clear(&mut self) {
        self.text.clear();
        self.overflow = false;
    }

    fn push_str(&mut self, append: &str) -> bool {
        self.overflow |= self.text.push_str(append).is_err();
        true
    }

    fn push_char(&mut self, append: char) -> bool {
        self.overflow |= self.text.push(append).is_err();
        true
    }
}

/// Remembers the first error the lexer, parser or decoder reports
#[derive(Default)]
struct FirstError {
    span: Option<Span>,
}

impl ErrorSink for FirstError {
    fn report_error(&mut self, error: ParseError) {
        if self.span.is_none() {
            self.span = Some(error.unexpected().or(error.context()).unwrap_or_default());
        }
    }
}

/// Push receiver that applies values as the parser emits them
struct Receiver<'i> {
    source: Source<'i>,
    config: ScopeConfig,
    section: Section,
    /// Inside a `[header]` or `[[header]]`
    in_header: bool,
    header: Option<(Span, Option<Encoding>)>,
    header_dotted: bool,
    key: Option<(Span, Option<Encoding>)>,
    key_dotted: bool,
    /// Array and inline-table nesting of the current value
    depth: u8,
    result: Result<(), ConfigError>,
}

impl<'i> Receiver<'i> {
    fn new(source: Source<'i>) -> Self {
        Self {
            source,
            config: ScopeConfig::default(),
            section: Section::Root,
            in_header: false,
            header: None,
            header_dotted: false,
            key: None,
            key_dotted: false,
            depth: 0,
            result: Ok(()),
        }
    }

    fn fail(&mut self, error: ConfigError) {
        if self.result.is_ok() {
            self.result = Err(error);
        }
    }

    fn line(&self, span: Span) -> usize {
        line_of(self.source.input(), span)
    }

    fn raw(&self, span: Span, encoding: Option<Encoding>) -> Raw<'i> {
        let text = self.source.input().get(span.start()..span.end()).unwrap_or_default();
        Raw::new_unchecked(text, encoding, span)
    }

    /// Decode a key or table name
    fn text(&mut self, (span, encoding): (Span, Option<Encoding>)) -> Option<String<MAX_TEXT>> {
        let mut out = TextBuilder::default();
        let mut errors = FirstError::default();
        self.raw(span, encoding).decode_key(&mut out, &mut errors);
        match errors.span {
            Some(at) => {
                let line = self.line(at);
                self.fail(ConfigError::Syntax(line));
                None
            }
            None if out.overflow => None,
            None => Some(out.text),
        }
    }

    fn decode(&mut self, span: Span, encoding: Option<Encoding>) -> Value {
        let mut out = TextBuilder::default();
        let mut errors = FirstError::default();
        let kind = self.raw(span, encoding).decode_scalar(&mut out, &mut errors);
        if let Some(at) = errors.span {
            let line = self.line(at);
            self.fail(ConfigError::Syntax(line));
            return Value::Unsupported;
        }
        if out.overflow {
            return Value::Unsupported;
        }
        match kind {
            ScalarKind::Integer(radix) => i64::from_str_radix(&out.text, radix.value())
                .map(Value::Integer)
                .unwrap_or(Value::Unsupported),
            ScalarKind::Boolean(b) => Value::Boolean(b),
            ScalarKind::String => Value::Text(out.text),
            ScalarKind::Float | ScalarKind::DateTime => Value::Unsupported,
        }
    }

    /// Resolve the section a finished header names
    fn close_header(&mut self, array: bool) {
        let name = match (self.header.take(), self.header_dotted, array) {
            (Some(key), false, false) => self.text(key),
            _ => None,
        };
        self.section = match name.as_deref() {
            Some("sensor") => Section::Sensor,
            Some("display") => Section::Display,
            Some("loop") => Section::Loop,
            Some("menu") => Section::Menu,
            _ => Section::Other,
        };
        self.in_header = false;
        self.header_dotted = false;
    }

    fn apply(&mut self, value: Value, value_span: Span) {
        let Some(key) = self.key.take() else {
            return;
        };
        if core::mem::take(&mut self.key_dotted) {
            return;
        }
        let Some(key) = self.text(key) else {
            return;
        };
        let line = self.line(value_span);
        if let Err(e) = apply_value(&mut self.config, self.section, &key, value, line) {
            self.fail(e);
        }
    }
}

impl EventReceiver for Receiver<'_> {
    fn std_table_open(&mut self, _span: Span, _error: &mut dyn ErrorSink) {
        self.in_header = true;
        self.header = None;
    }

    fn std_table_close(&mut self, _span: Span, _error: &mut dyn ErrorSink) {
        self.close_header(false);
    }

    fn array_table_open(&mut self, _span: Span, _error: &mut dyn ErrorSink) {
        self.in_header = true;
        self.header = None;
    }

    fn array_table_close(&mut self, _span: Span, _error: &mut dyn ErrorSink) {
        self.close_header(true);
    }

    fn inline_table_open(&mut self, span: Span, _error: &mut dyn ErrorSink) -> bool {
        if self.depth == 0 {
            self.apply(Value::Unsupported, span);
        }
        self.depth = self.depth.saturating_add(1);
        true
    }

    fn inline_table_close(&mut self, _span: Span, _error: &mut dyn ErrorSink) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn array_open(&mut self, span: Span, _error: &mut dyn ErrorSink) -> bool {
        if self.depth == 0 {
            self.apply(Value::Unsupported, span);
        }
        self.depth = self.depth.saturating_add(1);
        true
    }

    fn array_close(&mut self, _span: Span, _error: &mut dyn ErrorSink) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn simple_key(&mut self, span: Span, kind: Option<Encoding>, _error: &mut dyn ErrorSink) {
        if self.in_header {
            if self.header.is_some() {
                self.header_dotted = true;
            }
            self.header = Some((span, kind));
        } else if self.depth == 0 {
            if self.key.is_some() {
                self.key_dotted = true;
            }
            self.key = Some((span, kind));
        }
    }

    fn scalar(&mut self, span: Span, kind: Option<Encoding>, _error: &mut dyn ErrorSink) {
        if self.depth == 0 {
            let value = self.decode(span, kind);
            self.apply(value, span);
        }
    }
}

/// 1-based line of the start of `span`
fn line_of(input: &str, span: Span) -> usize {
    let end = span.start().min(input.len());
    input.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Parse a configuration document
pub fn parse_config(input: &str) -> Result<ScopeConfig, ConfigError> {
    let source = Source::new(input);

    let mut tokens: Vec<Token, MAX_TOKENS> = Vec::new();
    for token in source.lex() {
        tokens.push(token).map_err(|_| ConfigError::TooLarge)?;
    }

    let mut receiver = Receiver::new(source);
    let mut errors = FirstError::default();
    {
        let mut validated = ValidateWhitespace::new(&mut receiver, source);
        parse_document(&tokens, &mut validated, &mut errors);
    }

    if let Some(span) = errors.span {
        return Err(ConfigError::Syntax(line_of(input, span)));
    }
    receiver.result?;

    let config = receiver.config;
    check_clocks(&config)?;
    Ok(config)
}

/// Cross-key check: the bus clock must be below the logic clock
pub fn check_clocks(config: &ScopeConfig) -> Result<(), ConfigError> {
    if config.sensor.i2c_frequency >= config.sensor.i2c_logic_clock {
        return Err(ConfigError::ClockOrder);
    }
    Ok(())
}

fn apply_value(
    config: &mut ScopeConfig,
    section: Section,
    key: &str,
    value: Value,
    line: usize,
) -> Result<(), ConfigError> {
    match (section, key) {
        (Section::Sensor, "i2c_frequency") => {
            config.sensor.i2c_frequency = ranged(&value, 10_000, 400_000, line)? as u32;
        }
        (Section::Sensor, "i2c_logic_clock") => {
            config.sensor.i2c_logic_clock = ranged(&value, 1_000_000, 48_000_000, line)? as u32;
        }
        (Section::Sensor, "timeout_iterations") => {
            config.sensor.timeout_iterations = ranged(&value, 1, u32::MAX as i64, line)? as u32;
        }
        (Section::Sensor, "frame_rate") => {
            let hz = ranged(&value, 1, 10, line)?;
            config.sensor.frame_rate = FrameRate::from_hz(hz).ok_or(ConfigError::OutOfRange(line))?;
        }

        (Section::Display, "rotation") => {
            config.display.rotation = ranged(&value, 0, 3, line)? as u8;
        }
        (Section::Display, "backlight") => match value {
            Value::Boolean(on) => config.display.backlight = on,
            _ => return Err(ConfigError::InvalidValue(line)),
        },
        (Section::Display, "spi_prescaler") => {
            let prescaler = ranged(&value, 2, 256, line)? as u16;
            if !prescaler.is_power_of_two() {
                return Err(ConfigError::OutOfRange(line));
            }
            config.display.spi_prescaler = prescaler;
        }

        (Section::Loop, "frame_interval_ms") => {
            config.timing.frame_interval_ms = ranged(&value, 1, 60_000, line)? as u32;
        }
        (Section::Loop, "tick_interval_ms") => {
            config.timing.tick_interval_ms = ranged(&value, 1, 1_000, line)? as u32;
        }

        (Section::Menu, "unit") => {
            config.menu.unit = text(&value)
                .and_then(parse_unit)
                .ok_or(ConfigError::InvalidValue(line))?;
        }
        (Section::Menu, "palette") => {
            config.menu.palette = text(&value)
                .and_then(parse_palette)
                .ok_or(ConfigError::InvalidValue(line))?;
        }
        (Section::Menu, "offset") => {
            config.menu.offset = menu_value(MenuItem::Offset, &value, line)?;
        }
        (Section::Menu, "gain") => {
            config.menu.gain = menu_value(MenuItem::Gain, &value, line)?;
        }

        _ => {
            #[cfg(feature = "defmt")]
            defmt::warn!("scope.toml line {}: ignoring unknown key {=str}", line, key);
        }
    }
    Ok(())
}

fn ranged(value: &Value, min: i64, max: i64, line: usize) -> Result<i64, ConfigError> {
    let Value::Integer(n) = *value else {
        return Err(ConfigError::InvalidValue(line));
    };
    if n < min || n > max {
        return Err(ConfigError::OutOfRange(line));
    }
    Ok(n)
}

fn menu_value(item: MenuItem, value: &Value, line: usize) -> Result<i8, ConfigError> {
    let limits = item.limits();
    ranged(value, limits.min as i64, limits.max as i64, line).map(|n| n as i8)
}

fn text(value: &Value) -> Option<&str> {
    match value {
        Value::Text(s) => Some(s.as_str()),
        _ => None,
    }
}

fn parse_unit(value: &str) -> Option<TempUnit> {
    match value {
        "C" | "c" | "celsius" => Some(TempUnit::Celsius),
        "F" | "f" | "fahrenheit" => Some(TempUnit::Fahrenheit),
        _ => None,
    }
}

fn parse_palette(value: &str) -> Option<Palette> {
    match value {
        "R" | "red" => Some(Palette::Red),
        "G" | "green" => Some(Palette::Green),
        "B" | "blue" => Some(Palette::Blue),
        "W" | "white" => Some(Palette::White),
        _ => None,
    }
}
