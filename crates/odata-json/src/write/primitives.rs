//! Terminal encoders for scalar values. Each performs exactly one call
//! into the token sink.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::SecondsFormat;

use crate::error::{Error, Result};
use crate::sink::JsonSink;
use crate::value::Value;
use crate::write::registry::{ValueKind, ValueWriter};
use crate::write::session::WriterSession;

fn kind_mismatch(expected: &'static str, got: &Value) -> Error {
    Error::Message(format!(
        "{} writer received a {} value",
        expected,
        ValueKind::of(got).name()
    ))
}

pub(crate) struct NullWriter;

impl ValueWriter for NullWriter {
    fn write(
        &self,
        value: &Value,
        _session: &mut WriterSession<'_>,
        sink: &mut dyn JsonSink,
    ) -> Result<()> {
        match value {
            Value::Null => sink.null_value(),
            other => Err(kind_mismatch("null", other)),
        }
    }
}

pub(crate) struct BooleanWriter;

impl ValueWriter for BooleanWriter {
    fn write(
        &self,
        value: &Value,
        _session: &mut WriterSession<'_>,
        sink: &mut dyn JsonSink,
    ) -> Result<()> {
        match value {
            Value::Boolean(b) => sink.bool_value(*b),
            other => Err(kind_mismatch("boolean", other)),
        }
    }
}

pub(crate) struct Int32Writer;

impl ValueWriter for Int32Writer {
    fn write(
        &self,
        value: &Value,
        _session: &mut WriterSession<'_>,
        sink: &mut dyn JsonSink,
    ) -> Result<()> {
        match value {
            Value::Int32(v) => sink.int32_value(*v),
            other => Err(kind_mismatch("int32", other)),
        }
    }
}

pub(crate) struct Int64Writer;

impl ValueWriter for Int64Writer {
    fn write(
        &self,
        value: &Value,
        session: &mut WriterSession<'_>,
        sink: &mut dyn JsonSink,
    ) -> Result<()> {
        match value {
            Value::Int64(v) if session.options.ieee754_compatible => {
                sink.string_value(&v.to_string())
            }
            Value::Int64(v) => sink.int64_value(*v),
            other => Err(kind_mismatch("int64", other)),
        }
    }
}

pub(crate) struct DoubleWriter;

impl ValueWriter for DoubleWriter {
    fn write(
        &self,
        value: &Value,
        _session: &mut WriterSession<'_>,
        sink: &mut dyn JsonSink,
    ) -> Result<()> {
        match value {
            Value::Double(v) if v.is_nan() => sink.string_value("NaN"),
            Value::Double(v) if v.is_infinite() => {
                sink.string_value(if *v > 0.0 { "INF" } else { "-INF" })
            }
            Value::Double(v) => sink.double_value(*v),
            other => Err(kind_mismatch("double", other)),
        }
    }
}

pub(crate) struct DecimalWriter;

impl ValueWriter for DecimalWriter {
    fn write(
        &self,
        value: &Value,
        session: &mut WriterSession<'_>,
        sink: &mut dyn JsonSink,
    ) -> Result<()> {
        match value {
            Value::Decimal(v) if session.options.ieee754_compatible => sink.string_value(v),
            Value::Decimal(v) => sink.raw_number(v),
            other => Err(kind_mismatch("decimal", other)),
        }
    }
}

pub(crate) struct StringWriter;

impl ValueWriter for StringWriter {
    fn write(
        &self,
        value: &Value,
        _session: &mut WriterSession<'_>,
        sink: &mut dyn JsonSink,
    ) -> Result<()> {
        match value {
            Value::String(v) => sink.string_value(v),
            other => Err(kind_mismatch("string", other)),
        }
    }
}

pub(crate) struct BinaryWriter;

impl ValueWriter for BinaryWriter {
    fn write(
        &self,
        value: &Value,
        _session: &mut WriterSession<'_>,
        sink: &mut dyn JsonSink,
    ) -> Result<()> {
        match value {
            Value::Binary(bytes) => sink.string_value(&URL_SAFE_NO_PAD.encode(bytes)),
            other => Err(kind_mismatch("binary", other)),
        }
    }
}

pub(crate) struct DateTimeOffsetWriter;

impl ValueWriter for DateTimeOffsetWriter {
    fn write(
        &self,
        value: &Value,
        _session: &mut WriterSession<'_>,
        sink: &mut dyn JsonSink,
    ) -> Result<()> {
        match value {
            Value::DateTimeOffset(dt) => {
                sink.string_value(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            other => Err(kind_mismatch("datetimeoffset", other)),
        }
    }
}
