//! Decoder-facing event model.
//!
//! The decoder is push-style: it walks the document and calls into a
//! [`DecodeSink`] as it goes. [`EventSource`] abstracts over where the
//! document comes from; [`ScriptSource`] replays a pre-recorded event
//! script and is what the tests drive the pipeline with.

use std::fmt;

/// A decoded scalar.
///
/// The document format is dynamically typed, so consumers coerce rather
/// than match exactly: an integer where a float is expected (or the other
/// way around) is accepted.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f32),
    Str(String),
}

impl Value {
    pub fn as_int(&self) -> i64 {
        match self {
            Value::Int(v) => *v,
            Value::Float(v) => *v as i64,
            Value::Bool(true) => 1,
            Value::Bool(false) | Value::Null | Value::Str(_) => 0,
        }
    }

    pub fn as_float(&self) -> f32 {
        match self {
            Value::Float(v) => *v,
            Value::Int(v) => *v as f32,
            Value::Bool(true) => 1.0,
            Value::Bool(false) | Value::Null | Value::Str(_) => 0.0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Value::Str(s) => s,
            _ => "",
        }
    }

    /// Boolean coercion: any non-zero numeric (or `true`) counts.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Float(v) => *v != 0.0,
            other => other.as_int() != 0,
        }
    }
}

/// Consumer side of the push decoder.
///
/// `enter_section`/`exit_section` bracket keyed sub-documents and arrays
/// alike. Within an array, `should_decode_element` is called before each
/// element's content and `element_done` after it; returning `false` skips
/// the element wholesale.
pub trait DecodeSink {
    fn enter_section(&mut self, name: &str);

    /// Gate a keyed value before it is decoded. Default: decode everything.
    fn should_decode_value(&mut self, _key: &str) -> bool {
        true
    }

    fn value(&mut self, key: &str, value: &Value);

    fn should_decode_element(&mut self, index: usize) -> bool;

    fn element_done(&mut self, index: usize);

    fn exit_section(&mut self, name: &str);
}

/// One step of a recorded decode, for replay through [`ScriptSource`].
#[derive(Clone, Debug, PartialEq)]
pub enum DecodeEvent {
    Enter(String),
    Value { key: String, value: Value },
    BeginElement(usize),
    EndElement(usize),
    Exit(String),
}

impl DecodeEvent {
    pub fn enter(name: &str) -> Self {
        DecodeEvent::Enter(name.to_string())
    }

    pub fn exit(name: &str) -> Self {
        DecodeEvent::Exit(name.to_string())
    }

    pub fn int(key: &str, value: i64) -> Self {
        DecodeEvent::Value { key: key.to_string(), value: Value::Int(value) }
    }

    pub fn float(key: &str, value: f32) -> Self {
        DecodeEvent::Value { key: key.to_string(), value: Value::Float(value) }
    }

    pub fn str(key: &str, value: &str) -> Self {
        DecodeEvent::Value { key: key.to_string(), value: Value::Str(value.to_string()) }
    }

    pub fn bool(key: &str, value: bool) -> Self {
        DecodeEvent::Value { key: key.to_string(), value: Value::Bool(value) }
    }
}

/// Failure to stream a beat document.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceError {
    /// The named resource does not exist.
    NotFound(String),
    /// The resource exists but could not be decoded.
    Malformed(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NotFound(path) => write!(f, "resource not found: {path}"),
            SourceError::Malformed(path) => write!(f, "malformed document: {path}"),
        }
    }
}

impl std::error::Error for SourceError {}

/// Where beat documents come from.
///
/// An implementation backed by a real on-disk decoder lives outside this
/// crate; the session and reader only ever see the event stream.
pub trait EventSource {
    fn stream(&mut self, path: &str, sink: &mut dyn DecodeSink) -> Result<(), SourceError>;
}

/// Replays a fixed event script into the sink.
///
/// Honors the sink's skip decisions the way a real decoder would:
/// a gated value is dropped, and a refused array element is fast-forwarded
/// to its matching `EndElement`.
pub struct ScriptSource {
    events: Option<Vec<DecodeEvent>>,
}

impl ScriptSource {
    pub fn new(events: Vec<DecodeEvent>) -> Self {
        Self { events: Some(events) }
    }

    /// A source whose resource does not exist, for missing-file paths.
    pub fn absent() -> Self {
        Self { events: None }
    }
}

impl EventSource for ScriptSource {
    fn stream(&mut self, path: &str, sink: &mut dyn DecodeSink) -> Result<(), SourceError> {
        let Some(events) = &self.events else {
            return Err(SourceError::NotFound(path.to_string()));
        };

        let mut skip_until: Option<usize> = None;
        for event in events {
            if let Some(index) = skip_until {
                if matches!(event, DecodeEvent::EndElement(i) if *i == index) {
                    skip_until = None;
                }
                continue;
            }
            match event {
                DecodeEvent::Enter(name) => sink.enter_section(name),
                DecodeEvent::Value { key, value } => {
                    if sink.should_decode_value(key) {
                        sink.value(key, value);
                    }
                }
                DecodeEvent::BeginElement(index) => {
                    if !sink.should_decode_element(*index) {
                        skip_until = Some(*index);
                    }
                }
                DecodeEvent::EndElement(index) => sink.element_done(*index),
                DecodeEvent::Exit(name) => sink.exit_section(name),
            }
        }
        Ok(())
    }
}
