pub mod query;
pub mod serializer;

use crate::error::ValueError;
use serde::Serialize;
use std::collections::BTreeMap;

pub use query::Query;
pub use serializer::to_value;

/// JSON-like data a template is rendered against.
///
/// `Null` doubles as "absent": a query that lands on it finds nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// 空记录，通常作为渲染上下文的根
    pub fn record() -> Self {
        Value::Map(BTreeMap::new())
    }

    /// 解析 JSON 文本
    pub fn from_json(json: &str) -> Result<Self, ValueError> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        to_value(&parsed)
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, Value::Null)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        match self {
            Value::Map(m) => m.get(field),
            _ => None,
        }
    }

    /// Set a field on a record. Returns `false` (and does nothing) on any other shape.
    pub fn set(&mut self, field: &str, value: Value) -> bool {
        match self {
            Value::Map(m) => {
                m.insert(field.to_string(), value);
                true
            }
            _ => false,
        }
    }

    /// Remove a field from a record, returning its old value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        match self {
            Value::Map(m) => m.remove(field),
            _ => None,
        }
    }

    /// Text form used by `<? echo ?>`: records and arrays come out as compact JSON.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::I64(n) => n.to_string(),
            Value::U64(n) => n.to_string(),
            Value::F64(n) => n.to_string(),
            Value::Str(s) => s.clone(),
            Value::List(_) | Value::Map(_) => serde_json::to_string(self).unwrap_or_default(),
        }
    }

    /// Generic boolean conversion. Empty records and arrays are false.
    pub fn to_bool(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::I64(n) => *n != 0,
            Value::U64(n) => *n != 0,
            Value::F64(n) => *n != 0.0,
            Value::Str(s) => !(s.is_empty() || s == "false" || s == "0"),
            Value::List(items) => !items.is_empty(),
            Value::Map(m) => !m.is_empty(),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}
impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I64(v as i64)
    }
}
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}
impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}
impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}
impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}
impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Map(v)
    }
}
