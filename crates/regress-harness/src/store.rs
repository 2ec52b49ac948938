//! Read-only access to the analyzer's SQLite result store.
//!
//! Each analysis writes its findings into `<kind>_results`, one row per
//! check with at least a `line` and a `status` column. Only the table of the
//! requested kind is ever read, so rows left behind by other analyses in the
//! shared store cannot leak into a test.

use std::path::Path;

use regress_error::Result;
use rusqlite::{Connection, OpenFlags, params};

use crate::verdict::{AnalysisKind, FindingStatus};

#[derive(Debug)]
pub struct ResultStore {
    conn: Connection,
}

impl ResultStore {
    /// Open the store the analyzer just wrote.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Number of findings for `kind` recorded with `status`.
    pub fn count_findings(&self, kind: AnalysisKind, status: &FindingStatus) -> Result<u64> {
        // The table name comes from a closed enum; values are bound.
        let table = kind.results_table();
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {table} WHERE status = ?1"),
            params![status.as_str()],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Every status recorded for `line`, in storage order. A NULL status is
    /// kept as an unrecognised one.
    pub fn line_statuses(&self, kind: AnalysisKind, line: u32) -> Result<Vec<FindingStatus>> {
        let table = kind.results_table();
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT status FROM {table} WHERE line = ?1"))?;
        let rows = stmt.query_map(params![line], |row| row.get::<_, Option<String>>(0))?;

        let mut statuses = Vec::new();
        for status in rows {
            statuses.push(status?.map_or_else(
                || FindingStatus::Other(String::new()),
                FindingStatus::from,
            ));
        }
        Ok(statuses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn seed(path: &Path, table: &str, rows: &[(u32, &str)]) {
        let conn = Connection::open(path).expect("store should open for writing");
        conn.execute_batch(&format!(
            "CREATE TABLE {table} (id INTEGER PRIMARY KEY, line INTEGER, status TEXT)"
        ))
        .expect("table should be created");
        for (line, status) in rows {
            conn.execute(
                &format!("INSERT INTO {table} (line, status) VALUES (?1, ?2)"),
                params![line, status],
            )
            .expect("row should be inserted");
        }
    }

    #[test]
    fn test_counts_filter_by_status() {
        let temp = tempdir().expect("tempdir should be created");
        let path = temp.path().join("out.db");
        seed(
            &path,
            "dbz_results",
            &[(3, "ok"), (5, "warning"), (5, "error"), (8, "warning")],
        );

        let store = ResultStore::open(&path).expect("store should open");
        let kind = AnalysisKind::Dbz;
        assert_eq!(
            store
                .count_findings(kind, &FindingStatus::Warning)
                .expect("count"),
            2
        );
        assert_eq!(
            store
                .count_findings(kind, &FindingStatus::Error)
                .expect("count"),
            1
        );
        assert_eq!(
            store
                .count_findings(kind, &FindingStatus::Unreachable)
                .expect("count"),
            0
        );
    }

    #[test]
    fn test_line_statuses_only_for_requested_line() {
        let temp = tempdir().expect("tempdir should be created");
        let path = temp.path().join("out.db");
        seed(
            &path,
            "uva_results",
            &[(5, "warning"), (5, "ok"), (6, "error"), (5, "weird")],
        );

        let store = ResultStore::open(&path).expect("store should open");
        let statuses = store
            .line_statuses(AnalysisKind::Uva, 5)
            .expect("line query should succeed");
        assert_eq!(
            statuses,
            vec![
                FindingStatus::Warning,
                FindingStatus::Ok,
                FindingStatus::Other("weird".to_owned()),
            ]
        );
        assert!(
            store
                .line_statuses(AnalysisKind::Uva, 99)
                .expect("line query should succeed")
                .is_empty()
        );
    }

    #[test]
    fn test_null_status_reduces_to_unknown() {
        let temp = tempdir().expect("tempdir should be created");
        let path = temp.path().join("out.db");
        seed(&path, "dbz_results", &[(7, "ok")]);
        Connection::open(&path)
            .expect("store should open for writing")
            .execute("INSERT INTO dbz_results (line, status) VALUES (7, NULL)", [])
            .expect("null row should be inserted");

        let store = ResultStore::open(&path).expect("store should open");
        let statuses = store
            .line_statuses(AnalysisKind::Dbz, 7)
            .expect("a NULL status must not abort the query");
        assert_eq!(
            statuses,
            vec![FindingStatus::Ok, FindingStatus::Other(String::new())]
        );
        assert_eq!(
            crate::verdict::reduce_line(&statuses),
            crate::verdict::LineVerdict::Unknown,
            "case=null_status"
        );
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let temp = tempdir().expect("tempdir should be created");
        let path = temp.path().join("out.db");
        seed(&path, "boa_results", &[(1, "ok")]);

        let store = ResultStore::open(&path).expect("store should open");
        let err = store
            .count_findings(AnalysisKind::Nullity, &FindingStatus::Error)
            .expect_err("querying an absent table must fail");
        assert!(
            err.to_string().contains("nullity_results"),
            "case=missing_table err={err}"
        );
    }
}
