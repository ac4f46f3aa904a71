//! Summary report generator for shell output.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::history::{ScaScanHistory, ScanHistory};
use crate::model::{BuildHistory, HistorySnapshot, SeverityLevel};
use std::fmt::Write as _;

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Signed delta with an explicit `+` for increases.
fn signed(value: i64) -> String {
    if value > 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    colored: bool,
}

impl SummaryReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn delta_color(&self, value: i64) -> String {
        let text = signed(value);
        match value {
            v if v > 0 => self.color(&text, "red"),
            v if v < 0 => self.color(&text, "green"),
            _ => self.color(&text, "dim"),
        }
    }

    fn write_flaws(&self, out: &mut String, history: &ScanHistory) -> Result<(), ReportError> {
        writeln!(out, "{}", self.color("Flaws by severity:", "bold"))?;
        writeln!(
            out,
            "  {:<14} {:>7} {:>7} {:>7}  Mitigated",
            "Severity", "Count", "Net", "New"
        )?;
        for level in SeverityLevel::descending() {
            let net = history.net_change_at(level);
            // pad before coloring so ANSI codes don't break alignment
            let net_cell = format!("{:>7}", signed(net));
            let net_cell = if net == 0 {
                net_cell
            } else {
                self.color(&net_cell, if net > 0 { "red" } else { "green" })
            };
            writeln!(
                out,
                "  {:<14} {:>7} {} {:>7}  {}",
                level.label(),
                history.flaws_count_at(level),
                net_cell,
                history.new_flaws_at(level),
                if history.is_mitigated_at(level) { "yes" } else { "" }
            )?;
        }
        writeln!(
            out,
            "{}  {} flaws, {} new, net {}",
            self.color("Totals:", "cyan"),
            history.total_flaws_count(),
            history.total_new_flaws_count(),
            self.delta_color(history.total_net_change_count())
        )?;
        Ok(())
    }

    fn write_sca(&self, out: &mut String, sca: &ScaScanHistory) -> Result<(), ReportError> {
        writeln!(out)?;
        writeln!(out, "{}", self.color("Composition analysis:", "bold"))?;
        if !sca.is_subscribed() {
            writeln!(out, "  {}", self.color("Not subscribed for this build", "dim"))?;
            return Ok(());
        }

        let components = sca.sca_components();
        let new_components = components.iter().filter(|c| c.is_new()).count();
        writeln!(
            out,
            "  Max CVSS: {:.1}  Blacklisted: {}  Components: {} ({} new)",
            sca.max_cvss_score(),
            sca.blacklisted_components_count(),
            components.len(),
            new_components
        )?;
        for counts in sca.finding_counts().rev() {
            if counts.count() == 0 && counts.net_count() == 0 {
                continue;
            }
            writeln!(
                out,
                "  {:<14} {:>7} {:>7} {:>7}",
                counts.severity().label(),
                counts.count(),
                signed(counts.net_count()),
                counts.new_count()
            )?;
        }
        writeln!(
            out,
            "  Vulnerabilities: {} total, {} new, net {}",
            sca.total_vul_count(),
            sca.total_new_vul_count(),
            self.delta_color(sca.total_net_vul_count())
        )?;

        let flagged: Vec<_> = components
            .iter()
            .filter(|c| c.is_blacklisted() || c.violates_policy())
            .collect();
        for component in flagged {
            let mut tags = Vec::new();
            if component.is_blacklisted() {
                tags.push("blacklisted");
            }
            if component.violates_policy() {
                tags.push("violates policy");
            }
            if component.is_new() {
                tags.push("new");
            }
            writeln!(
                out,
                "  {} {} ({})",
                self.color("!", "red"),
                component.name(),
                tags.join(", ")
            )?;
        }
        Ok(())
    }

    fn write_series(
        &self,
        out: &mut String,
        title: &str,
        snapshots: &[HistorySnapshot],
    ) -> Result<(), ReportError> {
        writeln!(out, "{}", self.color(title, "bold"))?;
        let mut previous: Option<i64> = None;
        for snapshot in snapshots {
            let date = snapshot.date().unwrap_or("-");
            match snapshot.count() {
                Some(count) => {
                    let delta = previous.map(|p| self.delta_color(count - p));
                    writeln!(
                        out,
                        "  {:<20} {:>7} {}",
                        date,
                        count,
                        delta.unwrap_or_default()
                    )?;
                    previous = Some(count);
                }
                None => writeln!(out, "  {:<20} {:>7}", date, self.color("n/a", "dim"))?,
            }
        }
        Ok(())
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate_history_report(
        &self,
        history: &ScanHistory,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut out = String::new();

        let title = config.title.as_deref().unwrap_or("Scan History Summary");
        writeln!(out, "{}", self.color(title, "bold"))?;
        writeln!(out, "{}", self.color("─".repeat(40).as_str(), "dim"))?;

        writeln!(
            out,
            "{}  {} (app {}, account {})",
            self.color("Build:", "cyan"),
            history.build_id(),
            history.app_id(),
            history.account_id()
        )?;
        writeln!(
            out,
            "{}  {}",
            self.color("Analysis:", "cyan"),
            history.outcome().label()
        )?;

        let status = history.policy_compliance_status();
        let status_color = if crate::gate::is_passing_status(status) {
            "green"
        } else {
            "red"
        };
        writeln!(
            out,
            "{}  {} ({})",
            self.color("Policy:", "cyan"),
            history.policy_name(),
            self.color(status, status_color)
        )?;
        writeln!(
            out,
            "{}  {}  {} {}",
            self.color("Level:", "cyan"),
            history.veracode_level(),
            self.color("Score:", "cyan"),
            history.score()
        )?;
        if history.is_scan_overdue() {
            writeln!(out, "{}", self.color("Scan is overdue", "yellow"))?;
        }
        writeln!(out)?;

        self.write_flaws(&mut out, history)?;

        if let Ok(Some(sca)) = history.sca_history() {
            self.write_sca(&mut out, sca)?;
            if config.include_history && sca.has_vul_count_history() {
                writeln!(out)?;
                self.write_series(
                    &mut out,
                    "Vulnerability trend:",
                    sca.vul_count_history().unwrap_or_default(),
                )?;
            }
        }

        if config.include_history && history.has_flaws_count_history() {
            writeln!(out)?;
            self.write_series(&mut out, "Flaw trend:", history.flaws_count_history())?;
        }

        Ok(out)
    }

    fn generate_trend_report(
        &self,
        trend: &BuildHistory,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut out = String::new();
        let title = config
            .title
            .clone()
            .unwrap_or_else(|| format!("{} Trend", trend.scan_type()));
        writeln!(out, "{}", self.color(&title, "bold"))?;
        writeln!(out, "{}", self.color("─".repeat(40).as_str(), "dim"))?;
        if trend.has_count_history() {
            self.write_series(&mut out, "Builds:", trend.snapshots())?;
        } else {
            writeln!(out, "  {}", self.color("No count history", "dim"))?;
        }
        Ok(out)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FindingCounts, ScaComponent};

    fn history() -> ScanHistory {
        let sca = ScaScanHistory::full(
            9.8,
            1,
            vec![FindingCounts::new(SeverityLevel::High, 2, 1, 1, false)],
            vec![ScaComponent::new("log4j-core", true, true, true)],
            Vec::new(),
        )
        .unwrap();
        ScanHistory::builder()
            .ids("acct-1", "app-7", "build-42")
            .policy("Veracode Recommended High", "Did Not Pass", "VL3")
            .score(83)
            .scan_overdue(true)
            .flaws_count([0, 0, 3, 22, 1, 1])
            .mitigate_flag([0, 0, 0, 1, 0, 0])
            .net_change([0, 0, -1, 3, 0, 1])
            .total_flaws_count(27)
            .flaws_count_history(vec![
                HistorySnapshot::new("build-41", 24),
                HistorySnapshot::new("build-42", 27),
            ])
            .sca_history(sca)
            .build()
            .unwrap()
    }

    #[test]
    fn test_summary_contents() {
        let report = SummaryReporter::new()
            .no_color()
            .generate_history_report(&history(), &ReportConfig::with_history())
            .unwrap();

        assert!(report.contains("build-42"));
        assert!(report.contains("Did Not Pass"));
        assert!(report.contains("Scan is overdue"));
        assert!(report.contains("27 flaws, 4 new, net +3"));
        assert!(report.contains("log4j-core (blacklisted, violates policy, new)"));
        assert!(report.contains("Flaw trend:"));
        assert!(!report.contains("\x1b["));
    }

    #[test]
    fn test_summary_without_history_section() {
        let report = SummaryReporter::new()
            .no_color()
            .generate_history_report(&history(), &ReportConfig::default())
            .unwrap();
        assert!(!report.contains("Flaw trend:"));
    }

    #[test]
    fn test_trend_report() {
        let trend = BuildHistory::new(
            "Static Analysis",
            vec![
                HistorySnapshot::new("b1", 10),
                HistorySnapshot::without_count("b2"),
                HistorySnapshot::new("b3", 12),
            ],
        );
        let report = SummaryReporter::new()
            .no_color()
            .generate_trend_report(&trend, &ReportConfig::default())
            .unwrap();
        assert!(report.contains("Static Analysis Trend"));
        assert!(report.contains("+2"));
        assert!(report.contains("n/a"));
    }

    #[test]
    fn test_signed() {
        assert_eq!(signed(3), "+3");
        assert_eq!(signed(0), "0");
        assert_eq!(signed(-2), "-2");
    }
}
