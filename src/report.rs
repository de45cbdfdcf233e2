//! Human-readable and JSON renderings of a reconstruction.

use crate::{Reconstruction, Share};
use serde::Serialize;
use std::fs::{create_dir_all, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

fn join_shares(shares: &[Share]) -> String {
    if shares.is_empty() {
        return "none".to_string();
    }
    shares
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders the report lines for one case.
///
/// The last line is the short verdict: `No wrong shares` or
/// `Wrong shares: x1, x2, ...` listing the x-coordinates of invalid shares.
pub fn render_lines(label: &str, result: &Reconstruction) -> Vec<String> {
    let mut lines = Vec::with_capacity(result.tally.len() + 7);
    lines.push(format!("case: {label}"));
    lines.push(format!("secret: {}", result.secret));
    lines.push(format!(
        "support: {} of {} combinations ({} skipped)",
        result.support, result.evaluated, result.skipped
    ));
    lines.push("tally:".to_string());
    for entry in &result.tally {
        lines.push(format!(
            "  secret {} reconstructed {} times",
            entry.secret, entry.count
        ));
    }
    lines.push(format!("valid shares: {}", join_shares(&result.valid)));
    lines.push(format!("invalid shares: {}", join_shares(&result.invalid)));
    if result.invalid.is_empty() {
        lines.push("No wrong shares".to_string());
    } else {
        let xs = result
            .invalid
            .iter()
            .map(|s| s.x().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Wrong shares: {xs}"));
    }
    lines
}

/// Share coordinates as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharePoint {
    /// x-coordinate.
    pub x: String,
    /// y-coordinate.
    pub y: String,
}

impl From<&Share> for SharePoint {
    fn from(share: &Share) -> Self {
        Self {
            x: share.x().to_string(),
            y: share.y().to_string(),
        }
    }
}

/// One frequency-table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallyEntry {
    /// Secret as a decimal string.
    pub secret: String,
    /// Number of producing combinations.
    pub count: usize,
}

/// Serializable report of a reconstruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    /// Case label, usually the input path.
    pub case: String,
    /// Winning secret as a decimal string.
    pub secret: String,
    /// Votes for the winning secret.
    pub support: usize,
    /// Combinations that produced a secret.
    pub evaluated: usize,
    /// Combinations skipped.
    pub skipped: usize,
    /// Frequency table in first-seen order.
    pub tally: Vec<TallyEntry>,
    /// Valid shares.
    pub valid: Vec<SharePoint>,
    /// Invalid shares.
    pub invalid: Vec<SharePoint>,
}

impl ReportDocument {
    /// Builds the document for a labelled reconstruction.
    pub fn new(label: &str, result: &Reconstruction) -> Self {
        Self {
            case: label.to_string(),
            secret: result.secret.to_string(),
            support: result.support,
            evaluated: result.evaluated,
            skipped: result.skipped,
            tally: result
                .tally
                .iter()
                .map(|t| TallyEntry {
                    secret: t.secret.to_string(),
                    count: t.count,
                })
                .collect(),
            valid: result.valid.iter().map(SharePoint::from).collect(),
            invalid: result.invalid.iter().map(SharePoint::from).collect(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Writes report lines to `dir/<stem>.report.txt`, creating `dir` if needed.
///
/// `stem` is the case file's stem, so `case1.json` reports land in
/// `case1.report.txt` next to other cases' reports. The `.report` infix
/// keeps them from colliding with a same-named input; reruns overwrite.
pub fn write_report(dir: impl AsRef<Path>, stem: &str, lines: &[String]) -> io::Result<PathBuf> {
    let dir = dir.as_ref();
    create_dir_all(dir)?;
    let path = dir.join(format!("{stem}.report.txt"));
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(path)
}
