//! Rendering of the structured query model into SQLite SQL
//!
//! Identifiers are validated and double-quoted; every value is a bound
//! parameter. Nothing supplied by a caller is ever spliced into SQL text.

use crate::StoreError;
use eavclean_domain::{Predicate, Select, Value};
use rusqlite::types::Value as SqlValue;

/// SQL text plus its positional parameters
#[derive(Debug)]
pub(crate) struct Rendered {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl Rendered {
    fn new() -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
        }
    }
}

/// Validate and quote an identifier
fn ident(name: &str) -> Result<String, StoreError> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(StoreError::InvalidIdentifier(name.to_string()));
    }
    Ok(format!("\"{}\"", name))
}

/// Convert a domain value into a bindable SQLite value
pub(crate) fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Real(r) => SqlValue::Real(*r),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Blob(b) => SqlValue::Blob(b.clone()),
    }
}

/// Convert a column value read from SQLite into a domain value
///
/// TEXT that is not valid UTF-8 comes back as a blob of its raw bytes, so two
/// different byte sequences never decode to the same string.
pub(crate) fn from_sql(value: rusqlite::types::ValueRef<'_>) -> Value {
    use rusqlite::types::ValueRef;
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) => match std::str::from_utf8(t) {
            Ok(text) => Value::Text(text.to_string()),
            Err(_) => Value::Blob(t.to_vec()),
        },
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

pub(crate) fn render_select(select: &Select) -> Result<Rendered, StoreError> {
    let mut out = Rendered::new();
    write_select(select, &mut out)?;
    Ok(out)
}

pub(crate) fn render_count(table: &str, filter: &Predicate) -> Result<Rendered, StoreError> {
    let mut out = Rendered::new();
    out.sql.push_str("SELECT COUNT(*) FROM ");
    out.sql.push_str(&ident(table)?);
    write_where(filter, &mut out)?;
    Ok(out)
}

pub(crate) fn render_delete(table: &str, filter: &Predicate) -> Result<Rendered, StoreError> {
    let mut out = Rendered::new();
    out.sql.push_str("DELETE FROM ");
    out.sql.push_str(&ident(table)?);
    write_where(filter, &mut out)?;
    Ok(out)
}

fn write_select(select: &Select, out: &mut Rendered) -> Result<(), StoreError> {
    out.sql.push_str("SELECT ");
    if select.distinct {
        out.sql.push_str("DISTINCT ");
    }
    if select.columns.is_empty() {
        out.sql.push('*');
    } else {
        let cols = select
            .columns
            .iter()
            .map(|c| ident(c))
            .collect::<Result<Vec<_>, _>>()?;
        out.sql.push_str(&cols.join(", "));
    }
    out.sql.push_str(" FROM ");
    out.sql.push_str(&ident(&select.table)?);
    write_where(&select.filter, out)
}

fn write_where(filter: &Predicate, out: &mut Rendered) -> Result<(), StoreError> {
    if *filter == Predicate::True {
        return Ok(());
    }
    out.sql.push_str(" WHERE ");
    write_predicate(filter, out)
}

fn write_predicate(predicate: &Predicate, out: &mut Rendered) -> Result<(), StoreError> {
    match predicate {
        Predicate::True => out.sql.push_str("1"),
        Predicate::Eq(col, Value::Null) | Predicate::IsNull(col) => {
            out.sql.push_str(&format!("{} IS NULL", ident(col)?));
        }
        Predicate::Ne(col, Value::Null) | Predicate::IsNotNull(col) => {
            out.sql.push_str(&format!("{} IS NOT NULL", ident(col)?));
        }
        Predicate::Eq(col, value) => {
            out.sql.push_str(&format!("{} = ?", ident(col)?));
            out.params.push(to_sql(value));
        }
        Predicate::Ne(col, value) => {
            out.sql.push_str(&format!("{} <> ?", ident(col)?));
            out.params.push(to_sql(value));
        }
        Predicate::BinaryEq(col, Value::Null) => {
            out.sql.push_str(&format!("{} IS NULL", ident(col)?));
        }
        Predicate::BinaryEq(col, value) => {
            // Neither affinity conversion nor collation may make two values equal.
            let col = ident(col)?;
            out.sql.push_str(&format!(
                "(typeof({col}) = typeof(?) AND CAST({col} AS BLOB) = CAST(? AS BLOB))"
            ));
            out.params.push(to_sql(value));
            out.params.push(to_sql(value));
        }
        Predicate::In(col, values) => {
            if values.is_empty() {
                out.sql.push('0');
            } else {
                out.sql.push_str(&format!("{} IN ({})", ident(col)?, placeholders(values.len())));
                out.params.extend(values.iter().map(to_sql));
            }
        }
        Predicate::NotIn(col, values) => {
            if values.is_empty() {
                out.sql.push('1');
            } else {
                out.sql.push_str(&format!("{} NOT IN ({})", ident(col)?, placeholders(values.len())));
                out.params.extend(values.iter().map(to_sql));
            }
        }
        Predicate::InSelect(col, select) => {
            out.sql.push_str(&format!("{} IN (", ident(col)?));
            write_select(select, out)?;
            out.sql.push(')');
        }
        Predicate::NotInSelect(col, select) => {
            out.sql.push_str(&format!("{} NOT IN (", ident(col)?));
            write_select(select, out)?;
            out.sql.push(')');
        }
        Predicate::And(parts) => {
            if parts.is_empty() {
                out.sql.push('1');
            }
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    out.sql.push_str(" AND ");
                }
                out.sql.push('(');
                write_predicate(part, out)?;
                out.sql.push(')');
            }
        }
    }
    Ok(())
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::types::ValueRef;

    #[test]
    fn test_from_sql_keeps_invalid_text_bytes() {
        assert_eq!(from_sql(ValueRef::Text(b"red")), Value::Text("red".to_string()));
        assert_eq!(from_sql(ValueRef::Text(&[0xFF])), Value::Blob(vec![0xFF]));
        assert!(!from_sql(ValueRef::Text(&[0xFF])).binary_eq(&from_sql(ValueRef::Text(&[0xFE]))));
    }

    #[test]
    fn test_render_select_with_filters() {
        let select = Select::from("catalog_product_entity_varchar")
            .filter(Predicate::ne("store_id", 0))
            .filter(Predicate::is_not_null("value"))
            .filter(Predicate::is_in("store_id", [1, 2]));
        let r = render_select(&select).unwrap();
        assert_eq!(
            r.sql,
            "SELECT * FROM \"catalog_product_entity_varchar\" WHERE (\"store_id\" <> ?) AND (\"value\" IS NOT NULL) AND (\"store_id\" IN (?, ?))"
        );
        assert_eq!(r.params.len(), 3);
    }

    #[test]
    fn test_render_anti_join() {
        let definitions = Select::from("eav_attribute")
            .columns(&["attribute_id"])
            .filter(Predicate::eq("entity_type_id", 4))
            .filter(Predicate::eq("backend_type", "int"));
        let r = render_count("catalog_product_entity_int", &Predicate::not_in_select("attribute_id", definitions)).unwrap();
        assert_eq!(
            r.sql,
            "SELECT COUNT(*) FROM \"catalog_product_entity_int\" WHERE \"attribute_id\" NOT IN (SELECT \"attribute_id\" FROM \"eav_attribute\" WHERE (\"entity_type_id\" = ?) AND (\"backend_type\" = ?))"
        );
        assert_eq!(r.params, vec![SqlValue::Integer(4), SqlValue::Text("int".into())]);
    }

    #[test]
    fn test_binary_eq_null_is_is_null() {
        let r = render_delete("core_config_data", &Predicate::binary_eq("value", Value::Null)).unwrap();
        assert_eq!(r.sql, "DELETE FROM \"core_config_data\" WHERE \"value\" IS NULL");
        assert!(r.params.is_empty());
    }

    #[test]
    fn test_empty_lists() {
        let filter = Predicate::is_in("attribute_id", Vec::<i64>::new())
            .and(Predicate::not_in("store_id", Vec::<i64>::new()));
        let r = render_count("t", &filter).unwrap();
        assert_eq!(r.sql, "SELECT COUNT(*) FROM \"t\" WHERE (0) AND (1)");
    }

    #[test]
    fn test_rejects_injected_identifier() {
        let select = Select::from("core_config_data; DROP TABLE store");
        assert!(matches!(render_select(&select), Err(StoreError::InvalidIdentifier(_))));

        let filter = Predicate::eq("path\" OR 1=1 --", "x");
        assert!(render_delete("core_config_data", &filter).is_err());
    }
}
