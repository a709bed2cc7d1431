//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use eavclean_janitor::{
    ConfigActionKind, ConfigReport, MediaReport, OrphanValueReport, ScopedValueReport, UnusedAttributeReport,
};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the orphan-value purge result.
    pub fn orphan_values(&self, report: &OrphanValueReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(report),
            OutputFormat::Quiet => Ok(report.total().to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Entity type", "Backend", "Table", "Rows"]);
                for partition in report.partitions.iter().filter(|p| p.count > 0) {
                    builder.push_record([
                        partition.entity_type.clone(),
                        partition.backend_type.clone(),
                        partition.table.clone(),
                        partition.count.to_string(),
                    ]);
                }

                let mut lines = Vec::new();
                if report.total() > 0 {
                    lines.push(table(builder));
                }
                for code in &report.skipped_entity_types {
                    lines.push(self.warning(&format!("Entity type '{}' is not registered; skipped", code)));
                }
                lines.push(self.summary(report.dry_run, report.total(), "orphaned value(s)"));
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format the unused-attribute purge result.
    pub fn unused_attributes(&self, report: &UnusedAttributeReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(report),
            OutputFormat::Quiet => Ok(report.deleted().to_string()),
            OutputFormat::Table => {
                let mut lines = Vec::new();
                if !report.removed.is_empty() {
                    let mut builder = Builder::default();
                    builder.push_record(["ID", "Code", "Backend", "Values", "Assignments", "Reason"]);
                    for attribute in &report.removed {
                        builder.push_record([
                            attribute.attribute_id.to_string(),
                            attribute.code.clone(),
                            attribute.backend_type.clone(),
                            attribute.value_count.to_string(),
                            attribute
                                .assignment_count
                                .map(|c| c.to_string())
                                .unwrap_or_else(|| "-".to_string()),
                            attribute.reason.as_str().to_string(),
                        ]);
                    }
                    lines.push(table(builder));
                }
                for code in &report.skipped {
                    lines.push(self.warning(&format!("Attribute '{}' has no value table; skipped", code)));
                }
                lines.push(self.summary(report.dry_run, report.deleted(), "attribute(s)"));
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format the scoped-value reconciliation result.
    pub fn scoped_values(&self, report: &ScopedValueReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(report),
            OutputFormat::Quiet => Ok(report.total().to_string()),
            OutputFormat::Table => {
                let mut lines = Vec::new();
                if !report.removed_per_attribute.is_empty() {
                    let mut builder = Builder::default();
                    builder.push_record(["Attribute", "Overrides"]);
                    for (attribute_id, count) in &report.removed_per_attribute {
                        builder.push_record([attribute_id.to_string(), count.to_string()]);
                    }
                    lines.push(table(builder));
                }
                for partition in report.null_overrides.iter().filter(|p| p.count > 0) {
                    lines.push(self.info(&format!("{} NULL override(s) in {}", partition.count, partition.table)));
                }
                for anomaly in &report.anomalies {
                    lines.push(self.warning(&format!(
                        "{} {}={} attribute {} has {} default rows; value {} left alone",
                        anomaly.table,
                        anomaly.key_column,
                        anomaly.key,
                        anomaly.attribute_id,
                        anomaly.default_rows,
                        anomaly.override_value_id
                    )));
                }
                lines.push(self.summary(report.dry_run, report.total(), "override(s)"));
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format the config reconciliation result.
    pub fn config_values(&self, report: &ConfigReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(report),
            OutputFormat::Quiet => Ok(report.removed.to_string()),
            OutputFormat::Table => {
                let mut lines = Vec::new();
                if !report.actions.is_empty() {
                    let mut builder = Builder::default();
                    builder.push_record(["Path", "Value", "Action", "Rows"]);
                    for action in &report.actions {
                        let label = match action.kind {
                            ConfigActionKind::DuplicatesCollapsed { .. } => "duplicates",
                            ConfigActionKind::MatchesSystemDefault { .. } => "system default",
                        };
                        builder.push_record([
                            action.path.clone(),
                            action.value.clone().unwrap_or_else(|| "NULL".to_string()),
                            label.to_string(),
                            action.count().to_string(),
                        ]);
                    }
                    lines.push(table(builder));
                }
                lines.push(self.summary(report.dry_run, report.removed, "config entr(ies)"));
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format the media purge result.
    pub fn media(&self, report: &MediaReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(report),
            OutputFormat::Quiet => Ok(report.removed.join("\n")),
            OutputFormat::Table => {
                let mut lines: Vec<String> = report.removed.iter().map(|p| format!("## REMOVING: {}", p)).collect();
                for failure in &report.failures {
                    lines.push(self.error(&format!("{}: {}", failure.path, failure.message)));
                }
                let verb = if report.dry_run { "Would remove" } else { "Removed" };
                lines.push(self.success(&format!(
                    "{} {} file(s), {:.2} MB",
                    verb,
                    report.files,
                    report.megabytes()
                )));
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn summary(&self, dry_run: bool, count: u64, noun: &str) -> String {
        if dry_run {
            self.info(&format!("Dry run: would remove {} {}", count, noun))
        } else {
            self.success(&format!("Removed {} {}", count, noun))
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn json<T: Serialize>(report: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn table(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eavclean_janitor::{ConfigAction, MediaFailure, PartitionCount};

    fn orphans() -> OrphanValueReport {
        OrphanValueReport {
            dry_run: true,
            partitions: vec![
                PartitionCount {
                    entity_type: "catalog_product".to_string(),
                    backend_type: "varchar".to_string(),
                    table: "catalog_product_entity_varchar".to_string(),
                    count: 3,
                },
                PartitionCount {
                    entity_type: "catalog_product".to_string(),
                    backend_type: "int".to_string(),
                    table: "catalog_product_entity_int".to_string(),
                    count: 0,
                },
            ],
            skipped_entity_types: vec!["customer".to_string()],
        }
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.orphan_values(&orphans()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["dry_run"], true);
        assert_eq!(parsed["partitions"][0]["count"], 3);
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(formatter.orphan_values(&orphans()).unwrap(), "3");
    }

    #[test]
    fn test_table_format_hides_empty_partitions() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.orphan_values(&orphans()).unwrap();
        assert!(output.contains("catalog_product_entity_varchar"));
        assert!(!output.contains("catalog_product_entity_int"));
        assert!(output.contains("Entity type 'customer' is not registered"));
        assert!(output.ends_with("Dry run: would remove 3 orphaned value(s)"));
    }

    #[test]
    fn test_config_actions_render_null() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut report = ConfigReport::default();
        report.record(ConfigAction {
            path: "design/head/includes".to_string(),
            value: None,
            kind: ConfigActionKind::DuplicatesCollapsed { count: 2 },
        });
        let output = formatter.config_values(&report).unwrap();
        assert!(output.contains("NULL"));
        assert!(output.contains("duplicates"));
        assert!(output.ends_with("Removed 2 config entr(ies)"));
    }

    #[test]
    fn test_media_megabytes() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let report = MediaReport {
            dry_run: false,
            scanned: 4,
            files: 2,
            bytes: 3 * 1024 * 1024 / 2,
            removed: vec!["/a/b/ab.jpg".to_string(), "/c/d/cd.jpg".to_string()],
            failures: vec![MediaFailure {
                path: "/e/f/ef.jpg".to_string(),
                message: "Permission denied".to_string(),
            }],
        };
        let output = formatter.media(&report).unwrap();
        assert!(output.contains("## REMOVING: /a/b/ab.jpg"));
        assert!(output.contains("✗ /e/f/ef.jpg: Permission denied"));
        assert!(output.ends_with("Removed 2 file(s), 1.50 MB"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let msg = formatter.success("test");
        assert_eq!(msg, "✓ test");
    }
}
