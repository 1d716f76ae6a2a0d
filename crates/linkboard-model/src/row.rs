use crate::value::Value;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Read access to the cells of a single record.
///
/// Every engine in the workspace reads rows exclusively through this trait, so callers can
/// hand in [`Row`]s, plain hash maps, or their own record types.
pub trait CellLookup {
    /// Returns the cell stored under `column`, or `None` when the column is absent.
    fn cell(&self, column: &str) -> Option<&Value>;
}

impl<T: CellLookup + ?Sized> CellLookup for &T {
    fn cell(&self, column: &str) -> Option<&Value> {
        (**self).cell(column)
    }
}

impl CellLookup for HashMap<String, Value> {
    fn cell(&self, column: &str) -> Option<&Value> {
        self.get(column)
    }
}

impl CellLookup for BTreeMap<String, Value> {
    fn cell(&self, column: &str) -> Option<&Value> {
        self.get(column)
    }
}

/// A schema-less record: column names mapped to scalars, in insertion order.
///
/// Rows are small (tens of columns) so lookups scan linearly instead of maintaining an index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    cells: Vec<(Arc<str>, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Inserts or replaces a cell. A replaced cell keeps its original position.
    pub fn insert(&mut self, column: impl Into<Arc<str>>, value: impl Into<Value>) -> Option<Value> {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(c, _)| *c == column) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.cells.push((column, value));
                None
            }
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(c, _)| &**c == column)
            .map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| &**c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(c, v)| (&**c, v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl CellLookup for Row {
    fn cell(&self, column: &str) -> Option<&Value> {
        self.get(column)
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<Arc<str>>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(&**column, value)?;
        }
        map.end()
    }
}

struct RowVisitor;

impl<'de> Visitor<'de> for RowVisitor {
    type Value = Row;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a flat object of scalar cells")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Row, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut row = Row {
            cells: Vec::with_capacity(access.size_hint().unwrap_or(0)),
        };
        while let Some((column, value)) = access.next_entry::<String, Value>()? {
            row.insert(column, value);
        }
        Ok(row)
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RowVisitor)
    }
}
