//! LMDB database integrity checks.
//!
//! Run on startup to detect corruption early, before the node begins
//! serving requests. Besides checking that every database can be read, each
//! article is decoded and its vote-state invariants are verified.

use std::path::Path;

use heed::types::Bytes;
use heed::Env;

use verity_store::ArticleRecord;

use crate::environment::{ARTICLES_DB, META_DB, USERS_DB};
use crate::LmdbError;

/// Summary of an integrity check run.
#[derive(Debug, Default)]
pub struct IntegrityReport {
    pub databases_checked: u32,
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Database names that we expect to exist in a valid environment.
const EXPECTED_DATABASES: &[&str] = &[ARTICLES_DB, USERS_DB, META_DB];

/// Check LMDB database integrity on startup.
///
/// Read failures, undecodable articles and articles whose tallies disagree
/// with their voter set are recorded in the report rather than causing a hard
/// error.
pub fn check_integrity(env: &Env) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport::default();
    let rtxn = env.read_txn()?;

    for &db_name in EXPECTED_DATABASES {
        match env.open_database::<Bytes, Bytes>(&rtxn, Some(db_name)) {
            Ok(Some(db)) => {
                report.databases_checked += 1;
                match db.len(&rtxn) {
                    Ok(count) => report.total_entries += count,
                    Err(e) => report
                        .errors
                        .push(format!("failed to read database '{}': {}", db_name, e)),
                }
                if db_name == ARTICLES_DB {
                    check_articles(&db, &rtxn, &mut report);
                }
            }
            Ok(None) => {
                report
                    .errors
                    .push(format!("database '{}' is missing", db_name));
            }
            Err(e) => {
                report
                    .errors
                    .push(format!("failed to open database '{}': {}", db_name, e));
            }
        }
    }

    Ok(report)
}

fn check_articles(
    db: &heed::Database<Bytes, Bytes>,
    rtxn: &heed::RoTxn,
    report: &mut IntegrityReport,
) {
    let iter = match db.iter(rtxn) {
        Ok(iter) => iter,
        Err(e) => {
            report.errors.push(format!("failed to iterate articles: {}", e));
            return;
        }
    };
    for entry in iter {
        let (key, bytes) = match entry {
            Ok(kv) => kv,
            Err(e) => {
                report.errors.push(format!("failed to read article: {}", e));
                continue;
            }
        };
        let key = String::from_utf8_lossy(key);
        match bincode::deserialize::<ArticleRecord>(bytes) {
            Ok(article) if !article.invariants_hold() => report
                .errors
                .push(format!("article '{}' violates vote-state invariants", key)),
            Ok(_) => {}
            Err(e) => report
                .errors
                .push(format!("article '{}' cannot be decoded: {}", key, e)),
        }
    }
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent) directory. Returns an error
/// if the directory exists but `data.mdb` is missing, which suggests
/// corruption or misconfiguration.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    let data_file = path.join("data.mdb");
    if !data_file.exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}
