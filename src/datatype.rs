// used for persistence
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

// used for timestamps in the database
use chrono::{NaiveDate, NaiveDateTime};
// used for decimal numbers
use bigdecimal::BigDecimal;

// used when parsing strings into the typed scalars
use std::str::FromStr;
// used to print out readable forms of a scalar
use std::fmt;
// used to overload common operations for datatypes
use std::ops;

use crate::error::{MsrswdbError, Result};

/// Storage format for timestamps, matching the source documents.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// The scalar type a descriptor declares for an attribute or for the
/// inner text of a terminal kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Text,
    Timestamp,
    Decimal,
    HexBlob,
}

impl ScalarKind {
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Text => "Text",
            ScalarKind::Timestamp => "Timestamp",
            ScalarKind::Decimal => "Decimal",
            ScalarKind::HexBlob => "HexBlob",
        }
    }
}

/// A coerced scalar as it will be written to the database.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Text(String),
    Timestamp(NaiveDateTime),
    Decimal(Decimal),
    Blob(Vec<u8>),
}

impl ScalarValue {
    /// Apply the coercion a descriptor declares. Text is kept raw,
    /// the other kinds are trimmed before parsing.
    pub fn coerce(kind: ScalarKind, raw: &str) -> Result<ScalarValue> {
        match kind {
            ScalarKind::Text => Ok(ScalarValue::Text(raw.to_owned())),
            ScalarKind::Timestamp => parse_timestamp(raw.trim()).map(ScalarValue::Timestamp),
            ScalarKind::Decimal => match BigDecimal::from_str(raw.trim()) {
                Ok(decimal) => Ok(ScalarValue::Decimal(Decimal(decimal))),
                Err(e) => Err(MsrswdbError::ScalarCoercion {
                    value: raw.to_owned(),
                    target: kind.name(),
                    message: e.to_string(),
                }),
            },
            ScalarKind::HexBlob => unhexlify(raw.trim()).map(ScalarValue::Blob),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScalarValue::Text(s) => write!(f, "{}", s),
            ScalarValue::Timestamp(t) => write!(f, "{}", t.format(TIMESTAMP_FORMAT)),
            ScalarValue::Decimal(d) => write!(f, "{}", d),
            ScalarValue::Blob(b) => {
                for byte in b {
                    write!(f, "{:02X}", byte)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&ScalarValue> for rusqlite::types::Value {
    fn from(value: &ScalarValue) -> Self {
        match value {
            ScalarValue::Text(s) => rusqlite::types::Value::Text(s.clone()),
            ScalarValue::Timestamp(t) => {
                rusqlite::types::Value::Text(t.format(TIMESTAMP_FORMAT).to_string())
            }
            ScalarValue::Decimal(d) => rusqlite::types::Value::Text(d.0.to_string()),
            ScalarValue::Blob(b) => rusqlite::types::Value::Blob(b.clone()),
        }
    }
}

impl ToSql for ScalarValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            ScalarValue::Text(s) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes()))),
            ScalarValue::Timestamp(t) => {
                Ok(ToSqlOutput::from(t.format(TIMESTAMP_FORMAT).to_string()))
            }
            ScalarValue::Decimal(d) => Ok(ToSqlOutput::from(d.0.to_string())),
            ScalarValue::Blob(b) => Ok(ToSqlOutput::Borrowed(ValueRef::Blob(b))),
        }
    }
}

/// Timestamps appear in the documents both with a 'T' separator and
/// with a space, and occasionally as a bare date.
fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    if let Ok(t) = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        return Ok(t);
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(t);
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(d) => Ok(d.and_hms_opt(0, 0, 0).unwrap()),
        Err(e) => Err(MsrswdbError::ScalarCoercion {
            value: raw.to_owned(),
            target: ScalarKind::Timestamp.name(),
            message: e.to_string(),
        }),
    }
}

fn unhexlify(raw: &str) -> Result<Vec<u8>> {
    let malformed = |message: &str| MsrswdbError::ScalarCoercion {
        value: raw.to_owned(),
        target: ScalarKind::HexBlob.name(),
        message: message.to_owned(),
    };
    let digits: Vec<char> = raw.chars().collect();
    if digits.len() % 2 != 0 {
        return Err(malformed("odd number of hex digits"));
    }
    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for pair in digits.chunks(2) {
        let high = pair[0].to_digit(16).ok_or_else(|| malformed("not a hex digit"))?;
        let low = pair[1].to_digit(16).ok_or_else(|| malformed("not a hex digit"))?;
        bytes.push((high * 16 + low) as u8);
    }
    Ok(bytes)
}

#[derive(Eq, PartialEq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct Decimal(BigDecimal);

impl Decimal {
    pub fn from_str(s: &str) -> Option<Decimal> {
        match BigDecimal::from_str(s) {
            Ok(decimal) => Some(Decimal(decimal)),
            _ => None,
        }
    }
}
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl FromSql for Decimal {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        BigDecimal::from_str(text)
            .map(Decimal)
            .map_err(|e| rusqlite::types::FromSqlError::Other(Box::new(e)))
    }
}
impl ToSql for Decimal {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.to_string()))
    }
}
impl ops::Deref for Decimal {
    type Target = BigDecimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
