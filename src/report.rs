//! Human-readable summaries of the three reports.
//!
//! Problem listings are capped so output stays scannable however many files
//! are affected.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use crate::completeness::CompletenessReport;
use crate::generator::{Outcome, RunReport};
use crate::validate::{ValidationReport, Verdict};

/// Missing files listed before the remainder is summarized.
pub const MISSING_PREVIEW: usize = 20;
/// Failed files listed before the remainder is summarized.
pub const FAILURE_PREVIEW: usize = 10;

const RULE: &str = "============================================================";

fn write_preview<I, T>(
    f: &mut Formatter<'_>,
    title: &str,
    items: I,
    total: usize,
    limit: usize,
) -> fmt::Result
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    if total == 0 {
        return Ok(());
    }
    writeln!(f)?;
    writeln!(f, "{title}:")?;
    for item in items.into_iter().take(limit) {
        writeln!(f, "   - {item}")?;
    }
    if total > limit {
        writeln!(f, "   ... and {} more", total - limit)?;
    }
    Ok(())
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}m {}s", secs / 60, secs % 60)
}

impl Display for RunReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "Audio generation summary")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "   Backend: {}", self.backend)?;
        for phase in &self.phases {
            writeln!(
                f,
                "   {:<28} {} written, {} skipped, {} failed",
                phase.category.description(),
                phase.written(),
                phase.skipped(),
                phase.failed()
            )?;
        }
        writeln!(f, "   Total files generated: {}", self.succeeded())?;
        if self.skipped() > 0 {
            writeln!(f, "   Already present: {}", self.skipped())?;
        }
        writeln!(f, "   Failed: {}", self.failed())?;
        if self.mislabeled() > 0 {
            writeln!(
                f,
                "   Mislabeled: {} (container does not match the file extension)",
                self.mislabeled()
            )?;
        }
        writeln!(f, "   Time elapsed: {}", format_elapsed(self.elapsed))?;

        let failures = self.failures().filter_map(|record| match &record.outcome {
            Outcome::Failed(e) => Some(format!("{}: {e}", record.path)),
            _ => None,
        });
        write_preview(f, "Failed assets", failures, self.failed(), FAILURE_PREVIEW)
    }
}

impl Display for CompletenessReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "Audio completeness check")?;
        writeln!(f, "{RULE}")?;
        for category in &self.categories {
            let mark = if category.is_complete() { "ok" } else { "MISSING" };
            writeln!(
                f,
                "   {:<28} {}/{} {mark}",
                category.category.description(),
                category.found(),
                category.expected
            )?;
        }
        writeln!(f, "   Expected files: {}", self.expected())?;
        writeln!(f, "   Found files: {}", self.found())?;
        writeln!(f, "   Missing files: {}", self.missing_count())?;
        write_preview(
            f,
            "Missing files",
            self.missing(),
            self.missing_count(),
            MISSING_PREVIEW,
        )
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "Audio format validation")?;
        writeln!(f, "{RULE}")?;
        for group in self.by_category() {
            let label = group
                .category
                .map(|c| c.description())
                .unwrap_or("Other files");
            writeln!(f, "   {:<28} {}/{} passed", label, group.passed, group.checked)?;
        }
        let checked = self.checked();
        writeln!(f, "   Total files checked: {checked}")?;
        writeln!(
            f,
            "   Passed: {} ({:.1}%)",
            self.passed(),
            percent(self.passed(), checked)
        )?;
        writeln!(
            f,
            "   Failed: {} ({:.1}%)",
            self.failed(),
            percent(self.failed(), checked)
        )?;

        let issues = self.issues().map(|file| match &file.verdict {
            Verdict::Violations(v) => {
                let details: Vec<String> = v.iter().map(ToString::to_string).collect();
                format!("{}: {}", file.path, details.join("; "))
            }
            Verdict::Unreadable(reason) => format!("{}: unreadable: {reason}", file.path),
            Verdict::Pass => file.path.to_string(),
        });
        write_preview(f, "Failed files", issues, self.failed(), FAILURE_PREVIEW)
    }
}
