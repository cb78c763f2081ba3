//! Capture results from a SQLite connection.

use crate::{ResultSet, Result};
use rusqlite::Connection;
use rusqlite::types::ValueRef;

/// Run a query and capture every row it returns.
pub fn query(conn: &Connection, sql: &str) -> Result<ResultSet> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let n_cols = columns.len();
    let mut rs = ResultSet::new(columns);

    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(n_cols);
        for i in 0..n_cols {
            cells.push(raw_cell(row.get_ref(i)?));
        }
        rs.push_row(cells);
    }
    Ok(rs)
}

/// Run a statement that returns no rows and capture its effect.
pub fn execute(conn: &Connection, sql: &str) -> Result<ResultSet> {
    let affected = conn.execute(sql, [])?;
    Ok(ResultSet::exec(affected as u64, conn.last_insert_rowid()))
}

fn raw_cell(value: ValueRef<'_>) -> Option<Vec<u8>> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string().into_bytes()),
        ValueRef::Real(f) => Some(f.to_string().into_bytes()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(t.to_vec()),
    }
}
