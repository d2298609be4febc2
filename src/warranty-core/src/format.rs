//! Plugin text output.

use crate::classify::{Severity, Verdict};

/// Renders a [`Verdict`] as monitoring-plugin text.
///
/// The first line is always the summary. Verbose mode adds one line per
/// service level in ascending end-date order, and a support link adds a
/// trailing HTML anchor.
#[derive(Debug, Clone, Default)]
pub struct VerdictFormatter {
    verbose: bool,
    support_link: Option<(String, String)>,
}

impl VerdictFormatter {
    /// Create a formatter.
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            support_link: None,
        }
    }

    /// Append an HTML link to `base_url` followed by `asset_id`.
    #[must_use]
    pub fn with_support_link(mut self, base_url: impl Into<String>, asset_id: impl Into<String>) -> Self {
        self.support_link = Some((base_url.into(), asset_id.into()));
        self
    }

    /// The summary line.
    #[must_use]
    pub fn summary(&self, verdict: &Verdict) -> String {
        let severity = verdict.overall_severity;
        if severity == Severity::Unknown {
            let reason = verdict.message.as_deref().unwrap_or("check did not complete");
            return format!("{severity}: {reason}");
        }

        if verdict.distant_only {
            return match &verdict.distant {
                Some(d) => format!(
                    "{severity}: Longest service contract ends in {} days",
                    d.days_left
                ),
                None => format!("{severity}: No service contracts found"),
            };
        }

        let next = verdict
            .next_expiry_days
            .map_or_else(|| "none".to_string(), |d| format!("{d} days"));
        format!(
            "{severity}: {} of {} service contracts are expiring (Next: {next})",
            verdict.expiring_count, verdict.category_count
        )
    }

    /// All output lines, summary first.
    #[must_use]
    pub fn render(&self, verdict: &Verdict) -> Vec<String> {
        let mut lines = vec![self.summary(verdict)];

        if self.verbose {
            lines.extend(verdict.categories.iter().map(|c| {
                format!(
                    "{}: '{}' support ends in {} days",
                    c.severity, c.label, c.days_left
                )
            }));
        }

        if let Some((base, asset)) = &self.support_link {
            lines.push(format!(
                "<a href=\"{base}{asset}\" target=\"_blank\">Support for {asset}</a>"
            ));
        }

        lines
    }
}
