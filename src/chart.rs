use crate::values::{EnvVar, ProbeSettings, Resources, SecurityContext};

/// Everything the operator answered, before any derivation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ChartRequest {
    pub chart_name: String,
    pub namespace: String,
    pub image: String,
    pub replicas: u32,
    pub env_vars: Vec<EnvVar>,
    pub args: Vec<String>,
    pub resources: Option<Resources>,
    pub security_context: Option<SecurityContext>,
    pub image_pull_secrets: Vec<String>,
    pub probes: Option<ProbeSettings>,
    pub rbac: RbacMode,
}

impl Default for ChartRequest {
    fn default() -> Self {
        Self {
            chart_name: "my-chart".to_owned(),
            namespace: "default".to_owned(),
            image: "my-image".to_owned(),
            replicas: 1,
            env_vars: Vec::new(),
            args: Vec::new(),
            resources: None,
            security_context: None,
            image_pull_secrets: Vec::new(),
            probes: None,
            rbac: RbacMode::None,
        }
    }
}

/// Which access-control manifest variant to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RbacMode {
    None,
    Cluster,
    Namespaced,
}

impl RbacMode {
    /// `"1"` and `"2"` are the only recognised selectors; everything else,
    /// including the default `"0"`, means no RBAC.
    pub fn from_answer(answer: &str) -> Self {
        match answer {
            "1" => RbacMode::Cluster,
            "2" => RbacMode::Namespaced,
            _ => RbacMode::None,
        }
    }
}

/// Named bundles installed by the yes/no prompts. Looked up by name so new
/// bundles are data additions rather than new branches in the collector.
pub(crate) mod presets {
    use crate::values::{ProbeSettings, ResourceSpec, Resources, SecurityContext};

    pub const STANDARD: &str = "standard";

    pub fn resources(name: &str) -> Option<Resources> {
        match name {
            STANDARD => Some(Resources {
                requests: Some(ResourceSpec {
                    cpu: "100m".to_owned(),
                    memory: "256Mi".to_owned(),
                }),
                limits: Some(ResourceSpec {
                    cpu: "0.5".to_owned(),
                    memory: "512Mi".to_owned(),
                }),
            }),
            _ => None,
        }
    }

    pub fn security_context(name: &str) -> Option<SecurityContext> {
        match name {
            STANDARD => Some(SecurityContext {
                allow_privilege_escalation: Some(false),
                read_only_root_filesystem: Some(true),
                run_as_non_root: Some(true),
                run_as_user: Some(1000),
            }),
            _ => None,
        }
    }

    pub fn probes(name: &str) -> Option<ProbeSettings> {
        match name {
            STANDARD => Some(ProbeSettings {
                liveness_probe_initial_delay_seconds: 180,
                readiness_probe_initial_delay_seconds: 180,
            }),
            _ => None,
        }
    }
}
