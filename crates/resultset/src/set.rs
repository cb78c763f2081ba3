//! The concrete result container.

use crate::{DigestOptions, Error, ResultData};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io;

const NULL_TAG: u8 = 0;
const VALUE_TAG: u8 = 1;

/// Effect summary of a statement that returned no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_id: i64,
}

/// Rows and columns returned by a statement, or its exec summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Option<Vec<u8>>>>,
    exec: Option<ExecResult>,
}

impl ResultSet {
    /// Create an empty row-bearing result with the given column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            exec: None,
        }
    }

    /// Create an exec result.
    pub fn exec(rows_affected: u64, last_insert_id: i64) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            exec: Some(ExecResult {
                rows_affected,
                last_insert_id,
            }),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn exec_result(&self) -> Option<&ExecResult> {
        self.exec.as_ref()
    }

    /// Append a row of raw cells.
    ///
    /// Missing trailing cells are stored as NULL and cells beyond the last
    /// column are dropped.
    pub fn push_row<I>(&mut self, row: I)
    where
        I: IntoIterator<Item = Option<Vec<u8>>>,
    {
        let mut row: Vec<_> = row.into_iter().take(self.columns.len()).collect();
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    /// Append a row of text cells.
    pub fn push_text_row<'a, I>(&mut self, row: I)
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        self.push_row(row.into_iter().map(|c| c.map(|s| s.as_bytes().to_vec())));
    }

    fn cell_text(&self, row: usize, col: usize) -> String {
        match self.raw_value(row, col) {
            Some(raw) => String::from_utf8_lossy(raw).into_owned(),
            None => "NULL".to_string(),
        }
    }
}

impl ResultData for ResultSet {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>, Error> {
        postcard::to_stdvec(self).map_err(Error::Encode)
    }

    fn decode(raw: &[u8]) -> Result<Self, Error> {
        postcard::from_bytes(raw).map_err(Error::Decode)
    }

    fn is_exec_result(&self) -> bool {
        self.exec.is_some()
    }

    fn n_rows(&self) -> usize {
        self.rows.len()
    }

    fn n_cols(&self) -> usize {
        self.columns.len()
    }

    fn raw_value(&self, row: usize, col: usize) -> Option<&[u8]> {
        self.rows.get(row)?.get(col)?.as_deref()
    }

    fn data_digest(&self, opts: &DigestOptions) -> String {
        let mut rows: Vec<Vec<u8>> = self.rows.iter().map(|row| encode_row(row)).collect();
        if opts.sort {
            rows.sort_unstable();
        }

        let mut hasher = Sha256::new();
        hasher.update((self.columns.len() as u64).to_le_bytes());
        for row in &rows {
            hasher.update((row.len() as u64).to_le_bytes());
            hasher.update(row);
        }
        let digest = hasher.finalize();
        let mut out = String::with_capacity(digest.len() * 2);
        for byte in digest {
            out.push_str(&format!("{byte:02x}"));
        }
        out
    }

    fn pretty_print(&self, w: &mut dyn io::Write) -> io::Result<()> {
        if self.is_exec_result() {
            return writeln!(w, "{self}");
        }

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        let cells: Vec<Vec<String>> = (0..self.n_rows())
            .map(|i| (0..self.n_cols()).map(|j| self.cell_text(i, j)).collect())
            .collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let border: String = widths
            .iter()
            .map(|n| format!("+{}", "-".repeat(n + 2)))
            .collect::<String>()
            + "+";
        let line = |values: &[String]| -> String {
            let mut out = String::new();
            for (value, &width) in values.iter().zip(&widths) {
                out.push_str(&format!("| {value:<width$} "));
            }
            out.push('|');
            out
        };

        writeln!(w, "{border}")?;
        writeln!(w, "{}", line(&self.columns))?;
        writeln!(w, "{border}")?;
        for row in &cells {
            writeln!(w, "{}", line(row))?;
        }
        writeln!(w, "{border}")
    }
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.exec {
            Some(exec) => write!(
                f,
                "affected rows: {}, last insert id: {}",
                exec.rows_affected, exec.last_insert_id
            ),
            None => write!(f, "{} rows in set ({} cols)", self.n_rows(), self.n_cols()),
        }
    }
}

fn encode_row(row: &[Option<Vec<u8>>]) -> Vec<u8> {
    let mut out = Vec::new();
    for cell in row {
        match cell {
            None => out.push(NULL_TAG),
            Some(raw) => {
                out.push(VALUE_TAG);
                out.extend_from_slice(&(raw.len() as u64).to_le_bytes());
                out.extend_from_slice(raw);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[Option<&str>]]) -> ResultSet {
        let mut rs = ResultSet::new(["id", "name"]);
        for row in data {
            rs.push_text_row(row.iter().copied());
        }
        rs
    }

    #[test]
    fn test_exec_result_has_no_rows() {
        let rs = ResultSet::exec(3, 7);
        assert!(rs.is_exec_result());
        assert_eq!(rs.n_rows(), 0);
        assert_eq!(rs.n_cols(), 0);
        assert_eq!(rs.to_string(), "affected rows: 3, last insert id: 7");
    }

    #[test]
    fn test_raw_value_null_and_out_of_range() {
        let rs = rows(&[&[Some("1"), None]]);
        assert_eq!(rs.raw_value(0, 0), Some(&b"1"[..]));
        assert_eq!(rs.raw_value(0, 1), None);
        assert_eq!(rs.raw_value(5, 0), None);
    }

    #[test]
    fn test_short_row_is_padded_with_nulls() {
        let rs = rows(&[&[Some("1")]]);
        assert_eq!(rs.n_cols(), 2);
        assert_eq!(rs.raw_value(0, 1), None);
    }

    #[test]
    fn test_wide_row_is_truncated() {
        let wide = rows(&[&[Some("1"), Some("a"), Some("extra")]]);
        let exact = rows(&[&[Some("1"), Some("a")]]);
        assert_eq!(wide.n_cols(), 2);
        assert_eq!(wide.raw_value(0, 2), None);
        let opts = DigestOptions::default();
        assert_eq!(wide.data_digest(&opts), exact.data_digest(&opts));
    }

    #[test]
    fn test_encode_decode_preserves_digest() {
        let rs = rows(&[&[Some("1"), Some("a")], &[Some("2"), None]]);
        let decoded = ResultSet::decode(&rs.encode().unwrap()).unwrap();
        assert_eq!(decoded, rs);
        let opts = DigestOptions::default();
        assert_eq!(decoded.data_digest(&opts), rs.data_digest(&opts));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(ResultSet::decode(&[0xff, 0xff, 0xff]), Err(Error::Decode(_))));
    }

    #[test]
    fn test_digest_sort_ignores_row_order() {
        let a = rows(&[&[Some("1"), Some("a")], &[Some("2"), Some("b")]]);
        let b = rows(&[&[Some("2"), Some("b")], &[Some("1"), Some("a")]]);
        let sorted = DigestOptions { sort: true };
        assert_eq!(a.data_digest(&sorted), b.data_digest(&sorted));
        assert_ne!(
            a.data_digest(&DigestOptions::default()),
            b.data_digest(&DigestOptions::default())
        );
    }

    #[test]
    fn test_digest_distinguishes_null_from_empty() {
        let a = rows(&[&[Some("1"), None]]);
        let b = rows(&[&[Some("1"), Some("")]]);
        let opts = DigestOptions::default();
        assert_ne!(a.data_digest(&opts), b.data_digest(&opts));
    }

    #[test]
    fn test_digest_is_hex_sha256() {
        let digest = rows(&[]).data_digest(&DigestOptions::default());
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_pretty_print_table() {
        let rs = rows(&[&[Some("1"), Some("alice")], &[Some("22"), None]]);
        let mut out = Vec::new();
        rs.pretty_print(&mut out).unwrap();
        let expected = "\
+----+-------+
| id | name  |
+----+-------+
| 1  | alice |
| 22 | NULL  |
+----+-------+
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }
}
