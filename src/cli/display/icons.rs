//! Status icons for CLI output

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    /// Success icon (request created)
    pub const SUCCESS: &'static str = "✓";

    /// Error icon (validation or submission failed)
    pub const ERROR: &'static str = "✗";

    /// Pending icon (request submitted, not yet processed)
    pub const PENDING: &'static str = "⏳";
}
