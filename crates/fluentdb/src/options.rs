//! The mutable clause aggregate behind a [`Query`](crate::Query).

use crate::clause::{Field, Group, Join, LockMode, Order, Partition, Predicate, Raw, Table};
use crate::value::Value;
use indexmap::IndexMap;

/// A value written by insert/update/replace.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveValue {
    Value(Value),
    /// SQL expression written verbatim.
    Raw(Raw),
    /// `` `field` + :fipN ``, named when the statement is built.
    Increment(Value),
    /// `` `field` - :fdpN ``, named when the statement is built.
    Decrement(Value),
}

impl From<Value> for SaveValue {
    fn from(v: Value) -> Self {
        SaveValue::Value(v)
    }
}

impl From<Raw> for SaveValue {
    fn from(raw: Raw) -> Self {
        SaveValue::Raw(raw)
    }
}

/// Ordered field → value payload for write statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveData {
    fields: IndexMap<String, SaveValue>,
}

impl SaveData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, SaveValue::Value(value.into()));
        self
    }

    /// Builder-style raw expression setter.
    pub fn set_raw(mut self, field: impl Into<String>, raw: Raw) -> Self {
        self.insert(field, SaveValue::Raw(raw));
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: SaveValue) {
        self.fields.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&SaveValue> {
        self.fields.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SaveValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for SaveData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = SaveData::new();
        for (k, v) in iter {
            data.insert(k, SaveValue::Value(v.into()));
        }
        data
    }
}

impl TryFrom<serde_json::Value> for SaveData {
    type Error = crate::error::DbError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect()),
            other => Err(crate::error::DbError::invalid_argument(format!(
                "save data must be a JSON object, got {other}"
            ))),
        }
    }
}

/// Clause collections and settings for one query under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub table: Table,
    pub distinct: bool,
    pub fields: Vec<Field>,
    pub wheres: Vec<Predicate>,
    pub joins: Vec<Join>,
    pub orders: Vec<Order>,
    pub groups: Vec<Group>,
    pub havings: Vec<Predicate>,
    pub partition: Option<Partition>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub lock: Option<LockMode>,
    pub save_data: SaveData,
    /// Free-form flags; `ignore` turns inserts into `insert ignore`.
    pub extra: IndexMap<String, Value>,
}

impl QueryOptions {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            table: Table::with_prefix(prefix),
            ..Self::default()
        }
    }

    pub(crate) fn flag(&self, name: &str) -> bool {
        self.extra.get(name).is_some_and(Value::is_truthy)
    }
}
