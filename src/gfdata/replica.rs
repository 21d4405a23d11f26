//! Client/server replica comparison.
//!
//! Every data table exists twice, once for the client and once for the server,
//! and the two copies must match field for field. Nothing enforces that on
//! disk; this module only detects divergence and reports where it starts.
//! Healing a divergent pair is left to the caller.
//!
//! Writing a pair is two independent atomic writes. A failure between them
//! leaves the copies inconsistent and needs manual reconciliation.

use std::fmt;
use std::path::Path;

use encoding_rs::Encoding;
use log::{info, warn};

use crate::gfdata::format::rows;
use crate::gfdata::types::error::{GfError, Result};
use crate::gfdata::types::models::{ReadOptions, Row, RowSet};

/// Number of leading fields included in divergence previews.
pub const PREVIEW_FIELDS: usize = 6;

/// Outcome of comparing two row sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaReport {
    pub identical: bool,
    /// Row counts differ. No divergence search is done in that case.
    pub length_mismatch: bool,
    pub len_a: usize,
    pub len_b: usize,
    pub first_divergent_index: Option<usize>,
    pub preview_a: Vec<String>,
    pub preview_b: Vec<String>,
}

impl ReplicaReport {
    /// Converts a divergent report into `GfError::ReplicaDivergence`.
    pub fn into_result(self) -> Result<Self> {
        if self.identical {
            Ok(self)
        } else {
            Err(GfError::ReplicaDivergence(self.to_string()))
        }
    }
}

impl fmt::Display for ReplicaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.identical {
            return write!(f, "{} identical rows", self.len_a);
        }
        if self.length_mismatch {
            return write!(f, "row counts differ: {} vs {}", self.len_a, self.len_b);
        }
        match self.first_divergent_index {
            Some(index) => write!(
                f,
                "rows differ at index {}: [{}] vs [{}]",
                index,
                self.preview_a.join("|"),
                self.preview_b.join("|")
            ),
            None => write!(f, "rows differ"),
        }
    }
}

/// Compares two row sequences in order.
///
/// Pure function, O(rows × width).
pub fn compare(a: &[Row], b: &[Row]) -> ReplicaReport {
    let mut report = ReplicaReport {
        identical: false,
        length_mismatch: false,
        len_a: a.len(),
        len_b: b.len(),
        first_divergent_index: None,
        preview_a: Vec::new(),
        preview_b: Vec::new(),
    };

    if a.len() != b.len() {
        report.length_mismatch = true;
        return report;
    }

    match a.iter().zip(b).position(|(ra, rb)| ra != rb) {
        Some(index) => {
            report.first_divergent_index = Some(index);
            report.preview_a = preview(&a[index]);
            report.preview_b = preview(&b[index]);
        }
        None => report.identical = true,
    }
    report
}

fn preview(row: &Row) -> Vec<String> {
    row.iter().take(PREVIEW_FIELDS).cloned().collect()
}

/// A client and a server copy of the same table, read together.
#[derive(Debug, Clone)]
pub struct ReplicaPair {
    pub client: RowSet,
    pub server: RowSet,
    pub report: ReplicaReport,
}

impl ReplicaPair {
    /// Reads both copies with the same options and compares their rows.
    pub fn read(
        client_path: impl AsRef<Path>,
        server_path: impl AsRef<Path>,
        options: &ReadOptions,
    ) -> Result<Self> {
        let client = rows::read_detailed(client_path.as_ref(), options)?;
        let server = rows::read_detailed(server_path.as_ref(), options)?;
        let report = compare(&client.rows, &server.rows);
        if report.identical {
            info!("Replicas match ({} rows)", client.rows.len());
        } else {
            warn!(
                "Replicas {} and {} diverge: {}",
                client_path.as_ref().display(),
                server_path.as_ref().display(),
                report
            );
        }
        Ok(Self { client, server, report })
    }

    /// Writes the same rows to both copies, client first.
    ///
    /// # Errors
    /// Stops at the first failing write. If that is the server write, the
    /// client copy has already been replaced.
    pub fn write(
        rows: &[Row],
        client_path: impl AsRef<Path>,
        server_path: impl AsRef<Path>,
        encoding: &'static Encoding,
    ) -> Result<()> {
        rows::write(client_path.as_ref(), rows, encoding)?;
        rows::write(server_path.as_ref(), rows, encoding).map_err(|e| {
            warn!(
                "Server copy {} not written; {} was already replaced",
                server_path.as_ref().display(),
                client_path.as_ref().display()
            );
            e
        })
    }

    pub fn is_consistent(&self) -> bool {
        self.report.identical
    }
}
