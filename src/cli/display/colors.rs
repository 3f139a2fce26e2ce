//! Color theme for CLI output

use crate::domain::ops::OpsType;
use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Get color for an operation kind
    ///
    /// Operations that restart pods are highlighted as warnings.
    pub fn get_ops_color(&self, ops_type: OpsType) -> TableColor {
        match ops_type {
            OpsType::Restart | OpsType::Upgrade => self.warning,
            OpsType::VolumeExpansion => self.success,
            _ => self.info,
        }
    }

    /// Get color for a field value, muted when unset
    pub fn get_value_color(&self, value: &str) -> TableColor {
        if value.is_empty() || value == "-" {
            self.muted
        } else {
            self.info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = ColorTheme::default();
        assert_eq!(theme.success, TableColor::Green);
        assert_eq!(theme.warning, TableColor::Yellow);
        assert_eq!(theme.error, TableColor::Red);
    }

    #[test]
    fn test_get_ops_color() {
        let theme = ColorTheme::default();
        assert_eq!(theme.get_ops_color(OpsType::Restart), TableColor::Yellow);
        assert_eq!(theme.get_ops_color(OpsType::VolumeExpansion), TableColor::Green);
        assert_eq!(theme.get_ops_color(OpsType::Reconfiguring), TableColor::Cyan);
    }

    #[test]
    fn test_get_value_color() {
        let theme = ColorTheme::default();
        assert_eq!(theme.get_value_color("-"), TableColor::DarkGrey);
        assert_eq!(theme.get_value_color("3"), TableColor::Cyan);
    }
}
