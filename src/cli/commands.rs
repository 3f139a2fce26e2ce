// CLI command definitions

use super::ops::{
    ConfigureCommand, HorizontalScaleCommand, RestartCommand, UpgradeCommand,
    VerticalScaleCommand, VolumeExpandCommand,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "cluster-ops",
    version,
    about = "Cluster operations tool for Kubernetes",
    long_about = "A CLI tool that validates cluster maintenance operations and submits them as OpsRequests"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Restart the specified components in the cluster
    Restart(RestartCommand),

    /// Upgrade the cluster version
    Upgrade(UpgradeCommand),

    /// Vertically scale the specified components in the cluster
    #[command(name = "vscale")]
    VerticalScale(VerticalScaleCommand),

    /// Horizontally scale the specified components in the cluster
    #[command(name = "hscale")]
    HorizontalScale(HorizontalScaleCommand),

    /// Expand volume with the specified components and volumeClaimTemplates in the cluster
    #[command(name = "volume-expand")]
    VolumeExpand(VolumeExpandCommand),

    /// Reconfigure parameters with the specified components in the cluster
    Configure(ConfigureCommand),
}
