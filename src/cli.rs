use clap::Parser;

/// Interactively scaffold a Helm chart: Chart.yaml, values.yaml and
/// templated deployment/serviceaccount/RBAC manifests.
#[derive(Debug, Parser)]
#[clap(name = "chartsmith", version)]
pub(crate) struct App {}
