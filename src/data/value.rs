use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// Value – a single cell in a site or horizon column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common data-frame dtypes.
/// Identities and unique-value indices live in `BTreeMap` / `BTreeSet`, so
/// `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// ISO-8601 date string kept as text for simplicity.
    Date(String),
    Null,
}

/// How a value participates in aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    Numeric,
    Categorical,
    Opaque,
    Missing,
}

// Total order: variants by rank, floats by `total_cmp`.

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) | Value::Date(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Try to interpret the value as an `f64` (depths, weighted means).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Date(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) | Value::Float(_) => ValueKind::Numeric,
            Value::Text(_) | Value::Bool(_) => ValueKind::Categorical,
            Value::Date(_) => ValueKind::Opaque,
            Value::Null => ValueKind::Missing,
        }
    }

    /// Parse a raw text cell, guessing the narrowest type.
    pub fn guess(s: &str) -> Value {
        if s.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Value::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
        if s == "true" || s == "false" {
            return Value::Bool(s == "true");
        }
        Value::Text(s.to_string())
    }
}

/// Kind of a whole column: the common kind of its non-null values.
/// Mixed numeric/categorical columns and date columns are `Opaque`; a column
/// of nothing but nulls is `Missing`.
pub fn column_kind<'a>(values: impl IntoIterator<Item = &'a Value>) -> ValueKind {
    let mut kind = ValueKind::Missing;
    for v in values {
        match (kind, v.kind()) {
            (_, ValueKind::Missing) => {}
            (ValueKind::Missing, k) => kind = k,
            (a, b) if a == b => {}
            _ => return ValueKind::Opaque,
        }
    }
    kind
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guess_prefers_narrowest_type() {
        assert_eq!(Value::guess(""), Value::Null);
        assert_eq!(Value::guess("42"), Value::Integer(42));
        assert_eq!(Value::guess("4.5"), Value::Float(4.5));
        assert_eq!(Value::guess("true"), Value::Bool(true));
        assert_eq!(Value::guess("Bt1"), Value::from("Bt1"));
    }

    #[test]
    fn ordering_groups_by_type_first() {
        let mut vals = vec![
            Value::from("a"),
            Value::Integer(3),
            Value::Null,
            Value::Float(1.5),
            Value::Bool(false),
        ];
        vals.sort();
        assert_eq!(
            vals,
            vec![
                Value::Null,
                Value::Bool(false),
                Value::Integer(3),
                Value::Float(1.5),
                Value::from("a"),
            ]
        );
    }

    #[test]
    fn column_kind_ignores_nulls_and_flags_mixtures() {
        let numeric = [Value::Integer(1), Value::Null, Value::Float(2.0)];
        assert_eq!(column_kind(&numeric), ValueKind::Numeric);

        let labels = [Value::from("A"), Value::from("Bt")];
        assert_eq!(column_kind(&labels), ValueKind::Categorical);

        let mixed = [Value::from("A"), Value::Integer(1)];
        assert_eq!(column_kind(&mixed), ValueKind::Opaque);

        assert_eq!(column_kind(&[Value::Null]), ValueKind::Missing);
    }
}
