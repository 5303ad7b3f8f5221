use colored::Colorize;

use crate::driver::{Finding, MemberRow, Report, Severity};
use tsmix_runtime::Source;

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render_report(&self, report: &Report) -> String {
        let mut out = String::new();
        out.push_str(&self.bold(&report.composite));
        out.push('\n');
        out.push_str(&format!("  constructor: {}\n", report.constructor_args));
        out.push_str(&format!("  instance:    {}\n", report.instance_type));
        out.push_str(&format!("  mixins:      {}\n", report.mixins.join(", ")));

        if report.members.is_empty() {
            return out;
        }
        out.push('\n');

        let headers = ["KEY", "SOURCE", "COMPONENT", "VALUE", "TYPE"];
        let cells: Vec<[String; 5]> = report.members.iter().map(Self::cells).collect();
        let mut widths = headers.map(str::len);
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header: Vec<String> = headers
            .iter()
            .zip(widths)
            .map(|(h, w)| format!("{h:<w$}"))
            .collect();
        out.push_str(&format!("  {}\n", self.bold(header.join("  ").trim_end())));

        for (row, member) in cells.iter().zip(&report.members) {
            let mut line = String::from("  ");
            for (index, (cell, width)) in row.iter().zip(widths).enumerate() {
                let padded = format!("{cell:<width$}");
                if index == 1 {
                    line.push_str(&self.paint_source(member.source, &padded));
                } else {
                    line.push_str(&padded);
                }
                line.push_str("  ");
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }

    pub fn render_findings(&self, findings: &[Finding]) -> String {
        let mut out = String::new();
        for finding in findings {
            out.push_str(&format!(
                "{} {}: {}\n",
                self.format_severity(finding.severity),
                self.bold(&finding.key),
                finding.message
            ));
        }

        let errors = findings.iter().filter(|f| f.severity == Severity::Error).count();
        let warnings = findings.len() - errors;
        if findings.is_empty() {
            out.push_str("runtime composite and composite type agree\n");
        } else {
            out.push_str(&format!(
                "\n{} error(s), {} warning(s)\n",
                errors, warnings
            ));
        }
        out
    }

    fn cells(member: &MemberRow) -> [String; 5] {
        let value = match &member.returns {
            Some(returns) => format!("{} -> {}", member.value, returns),
            None => member.value.clone(),
        };
        [
            member.key.clone(),
            member
                .source
                .map_or_else(|| "(absent)".to_string(), |s| s.to_string()),
            member.component.clone().unwrap_or_default(),
            value,
            member.declared_type.clone().unwrap_or_else(|| "-".to_string()),
        ]
    }

    fn paint_source(&self, source: Option<Source>, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        match source {
            None => text.red().to_string(),
            Some(s) if s.is_prototype() => text.cyan().to_string(),
            Some(_) => text.green().to_string(),
        }
    }

    fn format_severity(&self, severity: Severity) -> String {
        let label = match severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };

        if !self.color {
            return label.to_string();
        }

        match severity {
            Severity::Error => label.red().bold().to_string(),
            Severity::Warning => label.yellow().bold().to_string(),
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
#[path = "tests/reporter_tests.rs"]
mod tests;
