//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::ops::{OperationDescriptor, OpsParams};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

const UNSET: &str = "-";

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render a submitted operation as a two-column summary table
    pub fn render_operation(
        &self,
        descriptor: &OperationDescriptor,
        request_name: Option<&str>,
    ) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("FIELD").set_alignment(CellAlignment::Left),
                Cell::new("VALUE").set_alignment(CellAlignment::Left),
            ]);

        let ops_type = descriptor.ops_type();
        table.add_row(vec![
            Cell::new("Operation"),
            Cell::new(ops_type.as_str()).fg(self.theme.get_ops_color(ops_type)),
        ]);
        for (field, value) in summary_rows(descriptor, request_name) {
            let color = self.theme.get_value_color(&value);
            table.add_row(vec![Cell::new(field), Cell::new(value).fg(color)]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ OpsRequest {} ─╮\n",
            format!("[{} {}]", StatusIcon::PENDING, ops_type)
                .bright_black()
                .to_string()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output
    }
}

fn or_unset(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(UNSET)
        .to_string()
}

fn join_or_unset(values: &[String]) -> String {
    if values.is_empty() {
        UNSET.to_string()
    } else {
        values.join(",")
    }
}

/// Field rows below the operation kind, in display order
fn summary_rows(
    descriptor: &OperationDescriptor,
    request_name: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Name", or_unset(request_name)),
        ("Cluster", descriptor.cluster_name().to_string()),
        ("Namespace", descriptor.namespace().to_string()),
        ("Components", join_or_unset(descriptor.component_names())),
    ];
    if let Some(ttl) = descriptor.ttl_seconds_after_succeed {
        rows.push(("TTL After Succeed", format!("{}s", ttl)));
    }

    match descriptor.params() {
        OpsParams::Restart => {}
        OpsParams::Upgrade(params) => {
            rows.push(("Cluster Version", params.cluster_version_ref.clone()));
        }
        OpsParams::VerticalScale(params) => {
            rows.push(("Requests CPU", or_unset(params.requests_cpu.as_deref())));
            rows.push(("Requests Memory", or_unset(params.requests_memory.as_deref())));
            rows.push(("Limits CPU", or_unset(params.limits_cpu.as_deref())));
            rows.push(("Limits Memory", or_unset(params.limits_memory.as_deref())));
        }
        OpsParams::HorizontalScale(params) => {
            rows.push(("Replicas", params.replicas.to_string()));
        }
        OpsParams::VolumeExpand(params) => {
            rows.push(("Volume Claim Templates", join_or_unset(&params.vct_names)));
            rows.push(("Storage", params.storage.clone()));
        }
        OpsParams::Reconfigure(params) => {
            rows.push(("Template", or_unset(params.template_name.as_deref())));
            rows.push(("Config File", or_unset(params.config_file.as_deref())));
            match &params.local_file {
                Some(path) => rows.push(("Local File", path.display().to_string())),
                None => {
                    let parameters: Vec<String> = params
                        .key_values
                        .iter()
                        .map(|(k, v)| format!("{}={}", k, v))
                        .collect();
                    rows.push(("Parameters", join_or_unset(&parameters)));
                }
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ops::{HorizontalScaleParams, ReconfigureParams};

    #[test]
    fn test_render_horizontal_scaling() {
        let descriptor = OperationDescriptor::new(
            "test-cluster",
            "default",
            OpsParams::HorizontalScale(HorizontalScaleParams { replicas: 3 }),
        )
        .with_components(["mysql"]);

        let output = TableRenderer::new().render_operation(&descriptor, Some("test-cluster-hs-1"));
        assert!(output.contains("HorizontalScaling"));
        assert!(output.contains("test-cluster-hs-1"));
        assert!(output.contains("mysql"));
        assert!(output.contains("Replicas"));
    }

    #[test]
    fn test_summary_rows_reconfigure() {
        let descriptor = OperationDescriptor::new(
            "c",
            "demo",
            OpsParams::Reconfigure(ReconfigureParams {
                key_values: [
                    ("a".to_string(), "1".to_string()),
                    ("b".to_string(), "2".to_string()),
                ]
                .into(),
                template_name: Some("mysql-tpl".to_string()),
                ..Default::default()
            }),
        );

        let rows = summary_rows(&descriptor, None);
        assert!(rows.contains(&("Name", "-".to_string())));
        assert!(rows.contains(&("Components", "-".to_string())));
        assert!(rows.contains(&("Template", "mysql-tpl".to_string())));
        assert!(rows.contains(&("Config File", "-".to_string())));
        assert!(rows.contains(&("Parameters", "a=1,b=2".to_string())));
    }
}
