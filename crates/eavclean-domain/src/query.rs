//! Structured query model
//!
//! Sweeps never build SQL text. They describe what they want with [`Select`]
//! and [`Predicate`], and the store adapter renders that description into its
//! own dialect with every value bound as a parameter.
//!
//! Byte-exact comparison is an explicit predicate ([`Predicate::BinaryEq`])
//! rather than an accident of a store's default collation.

use std::fmt;

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL
    Null,
    /// 64-bit signed integer
    Integer(i64),
    /// Floating point number
    Real(f64),
    /// UTF-8 text
    Text(String),
    /// Raw bytes
    Blob(Vec<u8>),
}

impl Value {
    /// Whether this is SQL NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Byte-exact equality
    ///
    /// Both sides must hold the same variant with identical payload bytes.
    /// NULL equals NULL here, unlike SQL `=`. No numeric widening, no
    /// case folding, no trimming.
    pub fn binary_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Real(a), Value::Real(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a.as_bytes() == b.as_bytes(),
            (Value::Blob(a), Value::Blob(b)) => a == b,
            _ => false,
        }
    }

    /// Integer payload, if any
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Text payload, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => f.write_str(s),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Row filter
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every row
    True,
    /// `column = value` (NULL value means `IS NULL`)
    Eq(String, Value),
    /// `column <> value` (NULL value means `IS NOT NULL`)
    Ne(String, Value),
    /// Byte-exact, type-exact equality (NULL value means `IS NULL`)
    BinaryEq(String, Value),
    /// `column IS NULL`
    IsNull(String),
    /// `column IS NOT NULL`
    IsNotNull(String),
    /// `column IN (values)`; an empty list matches nothing
    In(String, Vec<Value>),
    /// `column NOT IN (values)`; an empty list matches everything
    NotIn(String, Vec<Value>),
    /// `column IN (subquery)`
    InSelect(String, Box<Select>),
    /// `column NOT IN (subquery)`; the anti-join used for orphan detection
    NotInSelect(String, Box<Select>),
    /// Conjunction
    And(Vec<Predicate>),
}

impl Predicate {
    /// `column = value`
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Eq(column.into(), value.into())
    }

    /// `column <> value`
    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Ne(column.into(), value.into())
    }

    /// Byte-exact equality
    pub fn binary_eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::BinaryEq(column.into(), value.into())
    }

    /// `column IS NULL`
    pub fn is_null(column: impl Into<String>) -> Self {
        Predicate::IsNull(column.into())
    }

    /// `column IS NOT NULL`
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Predicate::IsNotNull(column.into())
    }

    /// `column IN (values)`
    pub fn is_in<V: Into<Value>>(column: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Predicate::In(column.into(), values.into_iter().map(Into::into).collect())
    }

    /// `column NOT IN (values)`
    pub fn not_in<V: Into<Value>>(column: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Predicate::NotIn(column.into(), values.into_iter().map(Into::into).collect())
    }

    /// `column IN (subquery)`
    pub fn in_select(column: impl Into<String>, select: Select) -> Self {
        Predicate::InSelect(column.into(), Box::new(select))
    }

    /// `column NOT IN (subquery)`
    pub fn not_in_select(column: impl Into<String>, select: Select) -> Self {
        Predicate::NotInSelect(column.into(), Box::new(select))
    }

    /// Conjoin two predicates, flattening nested `And`s and dropping `True`
    pub fn and(self, other: Predicate) -> Predicate {
        let mut parts = match self {
            Predicate::True => Vec::new(),
            Predicate::And(parts) => parts,
            p => vec![p],
        };
        match other {
            Predicate::True => {}
            Predicate::And(more) => parts.extend(more),
            p => parts.push(p),
        }
        match parts.len() {
            0 => Predicate::True,
            1 => parts.remove(0),
            _ => Predicate::And(parts),
        }
    }

    /// Conjoin every predicate in `predicates`
    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
        predicates.into_iter().fold(Predicate::True, Predicate::and)
    }

    /// Column names referenced at this level (subqueries excluded)
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Predicate::True => Vec::new(),
            Predicate::Eq(c, _)
            | Predicate::Ne(c, _)
            | Predicate::BinaryEq(c, _)
            | Predicate::IsNull(c)
            | Predicate::IsNotNull(c)
            | Predicate::In(c, _)
            | Predicate::NotIn(c, _)
            | Predicate::InSelect(c, _)
            | Predicate::NotInSelect(c, _) => vec![c.as_str()],
            Predicate::And(parts) => parts.iter().flat_map(|p| p.columns()).collect(),
        }
    }
}

/// A single-table read
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// Resolved (physical) table name
    pub table: String,
    /// Projected columns; empty selects every column
    pub columns: Vec<String>,
    /// Collapse identical projected rows
    pub distinct: bool,
    /// Row filter
    pub filter: Predicate,
}

impl Select {
    /// Select every column of `table`
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            distinct: false,
            filter: Predicate::True,
        }
    }

    /// Project the given columns
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Return distinct rows only
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Add a filter, conjoined with any existing one
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = std::mem::replace(&mut self.filter, Predicate::True).and(predicate);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_binary_eq_is_exact() {
        assert!(Value::from("red").binary_eq(&Value::from("red")));
        assert!(!Value::from("red").binary_eq(&Value::from("Red")));
        assert!(!Value::from("red").binary_eq(&Value::from("red ")));
        assert!(!Value::from("5").binary_eq(&Value::Integer(5)));
        assert!(Value::Null.binary_eq(&Value::Null));
        assert!(!Value::Null.binary_eq(&Value::from("")));
    }

    #[test]
    fn test_and_flattens() {
        let p = Predicate::eq("a", 1)
            .and(Predicate::True)
            .and(Predicate::eq("b", 2).and(Predicate::is_null("c")));
        match p {
            Predicate::And(parts) => assert_eq!(parts.len(), 3),
            other => panic!("expected And, got {:?}", other),
        }
        assert_eq!(Predicate::True.and(Predicate::True), Predicate::True);
        assert_eq!(Predicate::all(vec![Predicate::is_null("x")]), Predicate::is_null("x"));
    }

    #[test]
    fn test_select_builder() {
        let select = Select::from("core_config_data")
            .columns(&["path", "value"])
            .distinct()
            .filter(Predicate::eq("scope_id", 0))
            .filter(Predicate::is_not_null("path"));
        assert!(select.distinct);
        assert_eq!(select.columns, vec!["path", "value"]);
        assert_eq!(select.filter.columns(), vec!["scope_id", "path"]);
    }

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    }

    proptest! {
        #[test]
        fn prop_binary_eq_reflexive_for_text(s in ".*") {
            let v = Value::from(s.clone());
            prop_assert!(v.binary_eq(&Value::Text(s)));
        }

        #[test]
        fn prop_text_never_equals_null(s in ".*") {
            prop_assert!(!Value::from(s).binary_eq(&Value::Null));
        }
    }
}
