//! Cluster operation commands

use crate::cli::display::{StatusIcon, TableRenderer};
use crate::domain::ops::{
    validate_flags, HorizontalScaleParams, OperationDescriptor, OpsParams, OpsRunner,
    PromptConfirmation, ReconfigureParams, UpgradeParams, VerticalScaleParams,
    VolumeExpandParams, REPLICAS_UNSET,
};
use anyhow::Context;
use clap::{Args, Parser};
use colored::Colorize;
use std::path::PathBuf;

/// Flags shared by every operation command
#[derive(Args, Debug, Clone)]
pub struct ClusterArgs {
    /// Cluster name
    pub cluster_name: Option<String>,

    /// Kubernetes namespace
    #[arg(long, short = 'n', default_value = "default")]
    pub namespace: String,

    /// Path to kubeconfig file
    /// If not specified, uses default kubeconfig resolution (KUBECONFIG env or ~/.kube/config)
    #[arg(long)]
    pub kubeconfig: Option<String>,

    /// Kubernetes context to use
    #[arg(long)]
    pub context: Option<String>,

    /// OpsRequest name. If not specified, it will be randomly generated
    #[arg(long = "ops-request")]
    pub ops_request: Option<String>,

    /// Time to live after the OpsRequest succeed
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    pub ttl_seconds_after_succeed: Option<i64>,
}

impl ClusterArgs {
    fn descriptor(&self, params: OpsParams) -> OperationDescriptor {
        let mut descriptor = OperationDescriptor::new(
            self.cluster_name.clone().unwrap_or_default(),
            self.namespace.clone(),
            params,
        );
        descriptor.ops_request_name = self.ops_request.clone();
        descriptor.ttl_seconds_after_succeed = self.ttl_seconds_after_succeed;
        descriptor
    }

    async fn run(&self, descriptor: OperationDescriptor) -> anyhow::Result<()> {
        // Lookup-free checks run before any client exists
        validate_flags(&descriptor)?;

        let mut runner = OpsRunner::new_with_config(
            self.kubeconfig.clone(),
            self.context.clone(),
            Box::new(PromptConfirmation::stdin()),
        )
        .await
        .context("Failed to create Kubernetes client")?;

        let operation = runner.prepare(descriptor).await?;
        let summary = operation.descriptor().clone();
        let created = runner
            .submit(operation)
            .await
            .context("Failed to create OpsRequest")?;

        let name = created.metadata.name.unwrap_or_default();
        println!(
            "{} OpsRequest {} created successfully, you can view the progress:",
            StatusIcon::SUCCESS.green(),
            name.bold()
        );
        println!("\tkubectl get opsrequests {} -n {}", name, summary.namespace());
        println!("{}", TableRenderer::new().render_operation(&summary, Some(&name)));
        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub struct ComponentArgs {
    /// Component names to this operation, separate with commas when more than one
    #[arg(long = "component-names", value_delimiter = ',')]
    pub component_names: Vec<String>,
}

/// Restart the specified components in the cluster
///
/// Without --component-names all restartable components are restarted.
#[derive(Parser, Debug, Clone)]
pub struct RestartCommand {
    #[command(flatten)]
    pub cluster: ClusterArgs,

    #[command(flatten)]
    pub components: ComponentArgs,
}

impl RestartCommand {
    pub fn to_descriptor(&self) -> OperationDescriptor {
        self.cluster
            .descriptor(OpsParams::Restart)
            .with_components(self.components.component_names.clone())
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        self.cluster.run(self.to_descriptor()).await
    }
}

/// Upgrade the cluster version
#[derive(Parser, Debug, Clone)]
pub struct UpgradeCommand {
    #[command(flatten)]
    pub cluster: ClusterArgs,

    /// Reference cluster version (required)
    #[arg(long = "cluster-version", default_value = "")]
    pub cluster_version: String,
}

impl UpgradeCommand {
    pub fn to_descriptor(&self) -> OperationDescriptor {
        self.cluster.descriptor(OpsParams::Upgrade(UpgradeParams {
            cluster_version_ref: self.cluster_version.clone(),
        }))
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        self.cluster.run(self.to_descriptor()).await
    }
}

/// Vertically scale the specified components in the cluster
#[derive(Parser, Debug, Clone)]
pub struct VerticalScaleCommand {
    #[command(flatten)]
    pub cluster: ClusterArgs,

    #[command(flatten)]
    pub components: ComponentArgs,

    /// CPU size requested by the component
    #[arg(long = "requests.cpu")]
    pub requests_cpu: Option<String>,

    /// Memory size requested by the component
    #[arg(long = "requests.memory")]
    pub requests_memory: Option<String>,

    /// CPU size limited by the component
    #[arg(long = "limits.cpu")]
    pub limits_cpu: Option<String>,

    /// Memory size limited by the component
    #[arg(long = "limits.memory")]
    pub limits_memory: Option<String>,
}

impl VerticalScaleCommand {
    pub fn to_descriptor(&self) -> OperationDescriptor {
        self.cluster
            .descriptor(OpsParams::VerticalScale(VerticalScaleParams {
                requests_cpu: self.requests_cpu.clone(),
                requests_memory: self.requests_memory.clone(),
                limits_cpu: self.limits_cpu.clone(),
                limits_memory: self.limits_memory.clone(),
            }))
            .with_components(self.components.component_names.clone())
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        self.cluster.run(self.to_descriptor()).await
    }
}

/// Horizontally scale the specified components in the cluster
#[derive(Parser, Debug, Clone)]
pub struct HorizontalScaleCommand {
    #[command(flatten)]
    pub cluster: ClusterArgs,

    #[command(flatten)]
    pub components: ComponentArgs,

    /// Replicas with the specified components
    #[arg(long, default_value_t = REPLICAS_UNSET, allow_hyphen_values = true)]
    pub replicas: i32,
}

impl HorizontalScaleCommand {
    pub fn to_descriptor(&self) -> OperationDescriptor {
        self.cluster
            .descriptor(OpsParams::HorizontalScale(HorizontalScaleParams {
                replicas: self.replicas,
            }))
            .with_components(self.components.component_names.clone())
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        self.cluster.run(self.to_descriptor()).await
    }
}

/// Expand volume with the specified components and volumeClaimTemplates in the cluster
#[derive(Parser, Debug, Clone)]
pub struct VolumeExpandCommand {
    #[command(flatten)]
    pub cluster: ClusterArgs,

    #[command(flatten)]
    pub components: ComponentArgs,

    /// VolumeClaimTemplate names in components (required)
    #[arg(long = "volume-claim-template-names", value_delimiter = ',')]
    pub vct_names: Vec<String>,

    /// Volume storage size (required)
    #[arg(long, default_value = "")]
    pub storage: String,
}

impl VolumeExpandCommand {
    pub fn to_descriptor(&self) -> OperationDescriptor {
        self.cluster
            .descriptor(OpsParams::VolumeExpand(VolumeExpandParams {
                vct_names: self.vct_names.clone(),
                storage: self.storage.clone(),
            }))
            .with_components(self.components.component_names.clone())
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        self.cluster.run(self.to_descriptor()).await
    }
}

/// Reconfigure parameters with the specified components in the cluster
///
/// Example: configure mycluster --component-name=mysql --template-name=mysql-3node-tpl
///          --configure-file=my.cnf --set max_connections=1000,general_log=OFF
#[derive(Parser, Debug, Clone)]
pub struct ConfigureCommand {
    #[command(flatten)]
    pub cluster: ClusterArgs,

    /// Name of the component to update. May be omitted when the cluster has only one component
    #[arg(long = "component-name", value_delimiter = ',')]
    pub component_names: Vec<String>,

    /// Updated parameters, KEY=VALUE[,KEY=VALUE...]
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub parameters: Vec<String>,

    /// Name of the configuration template to update
    #[arg(long = "template-name")]
    pub template_name: Option<String>,

    /// Name of the configuration file to update (e.g. my.cnf)
    #[arg(long = "configure-file")]
    pub configure_file: Option<String>,

    /// Local file whose content replaces the configuration file
    #[arg(long = "local-file", value_name = "PATH")]
    pub local_file: Option<PathBuf>,
}

impl ConfigureCommand {
    pub fn to_descriptor(&self) -> OperationDescriptor {
        self.cluster
            .descriptor(OpsParams::Reconfigure(ReconfigureParams {
                parameters: self.parameters.clone(),
                template_name: self.template_name.clone(),
                config_file: self.configure_file.clone(),
                local_file: self.local_file.clone(),
                ..Default::default()
            }))
            .with_components(self.component_names.clone())
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        self.cluster.run(self.to_descriptor()).await
    }
}
