use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use fieldgate_core::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

const TRUE_VALUES: &[&str] = &["t", "T", "y", "Y", "yes", "Yes", "YES", "true", "True", "TRUE", "on", "On", "ON", "1"];
const FALSE_VALUES: &[&str] = &["f", "F", "n", "N", "no", "No", "NO", "false", "False", "FALSE", "off", "Off", "OFF", "0"];
const NULL_VALUES: &[&str] = &["null", "Null", "NULL", "none", "None", "NONE", ""];

/// Output field kinds understood by the serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Boolean value.
    Boolean,
    /// Boolean value that may be null.
    NullBoolean,
    /// UTF-8 text.
    Char,
    /// Email address rendered as text.
    Email,
    /// Pattern-constrained text.
    Regex,
    /// Slug rendered as text.
    Slug,
    /// URL rendered as text.
    Url,
    /// Integer number.
    Integer,
    /// Floating point number.
    Float,
    /// Fixed-point decimal.
    Decimal,
    /// ISO-8601 date.
    Date,
    /// ISO-8601 date-time.
    DateTime,
    /// ISO-8601 time.
    Time,
    /// One value out of a declared choice list.
    Choice,
    /// Several values out of a declared choice list.
    MultipleChoice,
    /// File reference.
    File,
    /// Image reference.
    Image,
    /// Homogeneous list.
    List,
    /// Value rendered unchanged.
    ReadOnly,
    /// Write-only value that is never rendered.
    Hidden,
    /// Opaque model value rendered unchanged.
    Model,
    /// Value computed by a serializer method.
    SerializerMethod,
    /// Nested serializer.
    Nested,
    /// Nested list serializer.
    NestedList,
}

impl FieldKind {
    /// Returns a stable name for the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::NullBoolean => "null_boolean",
            Self::Char => "char",
            Self::Email => "email",
            Self::Regex => "regex",
            Self::Slug => "slug",
            Self::Url => "url",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Time => "time",
            Self::Choice => "choice",
            Self::MultipleChoice => "multiple_choice",
            Self::File => "file",
            Self::Image => "image",
            Self::List => "list",
            Self::ReadOnly => "read_only",
            Self::Hidden => "hidden",
            Self::Model => "model",
            Self::SerializerMethod => "serializer_method",
            Self::Nested => "nested",
            Self::NestedList => "nested_list",
        }
    }
}

/// Per-field rendering options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Decimal places used to quantize decimal values.
    pub decimal_places: Option<u32>,
    /// Renders decimals as numbers instead of strings when `false`.
    pub coerce_to_string: Option<bool>,
    /// `chrono` format string used for temporal kinds.
    pub format: Option<String>,
}

/// Renders a non-null primitive value for `kind`.
pub(crate) fn render_primitive(
    kind: FieldKind,
    value: &Value,
    options: &RenderOptions,
) -> AppResult<Value> {
    match kind {
        FieldKind::Boolean => Ok(Value::Bool(render_boolean(value))),
        FieldKind::NullBoolean => Ok(render_null_boolean(value)),
        FieldKind::Char
        | FieldKind::Email
        | FieldKind::Regex
        | FieldKind::Slug
        | FieldKind::Url
        | FieldKind::Choice => render_text(kind, value),
        FieldKind::Integer => render_integer(value),
        FieldKind::Float => render_float(value),
        FieldKind::Decimal => render_decimal(value, options),
        FieldKind::Date | FieldKind::DateTime | FieldKind::Time => {
            render_temporal(kind, value, options)
        }
        FieldKind::MultipleChoice => Ok(render_multiple_choice(value)),
        FieldKind::File | FieldKind::Image => render_file(kind, value),
        FieldKind::List
        | FieldKind::ReadOnly
        | FieldKind::Hidden
        | FieldKind::Model
        | FieldKind::SerializerMethod
        | FieldKind::Nested
        | FieldKind::NestedList => Ok(value.clone()),
    }
}

fn render_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) if TRUE_VALUES.contains(&text.as_str()) => true,
        Value::String(text) if FALSE_VALUES.contains(&text.as_str()) => false,
        Value::String(text) => !text.is_empty(),
        Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
    }
}

fn render_null_boolean(value: &Value) -> Value {
    match value {
        Value::String(text) if NULL_VALUES.contains(&text.as_str()) => Value::Null,
        _ => Value::Bool(render_boolean(value)),
    }
}

fn render_text(kind: FieldKind, value: &Value) -> AppResult<Value> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Number(number) => Ok(Value::String(number.to_string())),
        Value::Bool(flag) => Ok(Value::String(flag.to_string())),
        _ => Err(mismatch(kind, value)),
    }
}

fn render_integer(value: &Value) -> AppResult<Value> {
    match value {
        Value::Number(number) if number.is_i64() || number.is_u64() => Ok(value.clone()),
        Value::Number(number) => number
            .as_f64()
            .filter(|float| {
                float.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(float)
            })
            .map(|float| Value::from(float as i64))
            .ok_or_else(|| mismatch(FieldKind::Integer, value)),
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| mismatch(FieldKind::Integer, value)),
        _ => Err(mismatch(FieldKind::Integer, value)),
    }
}

fn render_float(value: &Value) -> AppResult<Value> {
    let float = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    float
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| mismatch(FieldKind::Float, value))
}

fn render_decimal(value: &Value, options: &RenderOptions) -> AppResult<Value> {
    let parsed = match value {
        Value::String(text) => Decimal::from_str(text.trim()).ok(),
        Value::Number(number) => Decimal::from_str(number.to_string().as_str())
            .or_else(|_| Decimal::from_scientific(number.to_string().as_str()))
            .ok(),
        _ => None,
    };
    let mut decimal = parsed.ok_or_else(|| mismatch(FieldKind::Decimal, value))?;

    if let Some(places) = options.decimal_places {
        decimal = decimal.round_dp(places);
        decimal.rescale(places);
    }

    if options.coerce_to_string.unwrap_or(true) {
        return Ok(Value::String(decimal.to_string()));
    }

    decimal
        .to_string()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| mismatch(FieldKind::Decimal, value))
}

fn render_temporal(kind: FieldKind, value: &Value, options: &RenderOptions) -> AppResult<Value> {
    let Value::String(text) = value else {
        return Err(mismatch(kind, value));
    };
    let Some(format) = options.format.as_deref() else {
        return Ok(value.clone());
    };

    let formatted = match kind {
        FieldKind::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(|date| date.format(format).to_string())
            .ok(),
        FieldKind::Time => NaiveTime::from_str(text)
            .map(|time| time.format(format).to_string())
            .ok(),
        _ => DateTime::parse_from_rfc3339(text)
            .map(|date_time| date_time.format(format).to_string())
            .or_else(|_| {
                NaiveDateTime::from_str(text).map(|date_time| date_time.format(format).to_string())
            })
            .ok(),
    };

    formatted
        .map(Value::String)
        .ok_or_else(|| mismatch(kind, value))
}

fn render_multiple_choice(value: &Value) -> Value {
    let Value::Array(items) = value else {
        return Value::Array(vec![value.clone()]);
    };

    let mut unique: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(item) {
            unique.push(item.clone());
        }
    }

    Value::Array(unique)
}

fn render_file(kind: FieldKind, value: &Value) -> AppResult<Value> {
    match value {
        Value::String(text) if text.is_empty() => Ok(Value::Null),
        Value::String(_) => Ok(value.clone()),
        _ => Err(mismatch(kind, value)),
    }
}

fn mismatch(kind: FieldKind, value: &Value) -> AppError {
    AppError::Validation(format!(
        "value '{value}' cannot be rendered as field kind '{}'",
        kind.as_str()
    ))
}
