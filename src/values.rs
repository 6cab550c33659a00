use serde::Serialize;

use crate::chart::ChartRequest;

/// The `values.yaml` document. Field order here is the order keys appear in
/// the serialized file.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValuesDocument {
    pub namespace: String,
    pub replica_count: u32,
    pub image: ImageValues,
    pub resources: Resources,
    pub security_context: SecurityContext,
    pub automount_service_account_token: bool,
    pub image_pull_secrets: Vec<SecretRef>,
    pub name_override: String,
    pub fullname_override: String,
    pub service_account: ServiceAccountValues,
    pub probes: Probes,
    pub env: Vec<EnvVar>,
    pub args: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageValues {
    pub repository: String,
    pub pull_policy: String,
    pub tag: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct EnvVar {
    pub name: String,
    pub value: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct SecretRef {
    pub name: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct ServiceAccountValues {
    pub name: String,
}

/// Serializes as `{}` when neither side is set, so a declined prompt still
/// leaves a `resources:` key in the document.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub(crate) struct Resources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests: Option<ResourceSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<ResourceSpec>,
}

impl Resources {
    pub fn is_empty(&self) -> bool {
        self.requests.is_none() && self.limits.is_none()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct ResourceSpec {
    pub cpu: String,
    pub memory: String,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SecurityContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_privilege_escalation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only_root_filesystem: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_as_non_root: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_as_user: Option<i64>,
}

impl SecurityContext {
    pub fn is_empty(&self) -> bool {
        self == &SecurityContext::default()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct Probes {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<ProbeSettings>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProbeSettings {
    pub liveness_probe_initial_delay_seconds: u32,
    pub readiness_probe_initial_delay_seconds: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DerivedNames {
    pub deployment: String,
    // Derived alongside the others but no manifest references it yet.
    #[allow(dead_code)]
    pub service: String,
    pub service_account: String,
}

pub(crate) fn derived_names(chart_name: &str) -> DerivedNames {
    DerivedNames {
        deployment: format!("{chart_name}-deployment"),
        service: format!("{chart_name}-service"),
        service_account: format!("{chart_name}-serviceaccount"),
    }
}

/// Fold the collected answers into the values document. Pure; absent optional
/// blocks default to empty mappings and `args`/`env` are always lists.
pub(crate) fn assemble(request: &ChartRequest) -> ValuesDocument {
    let names = derived_names(&request.chart_name);

    ValuesDocument {
        namespace: request.namespace.clone(),
        replica_count: request.replicas,
        image: ImageValues {
            repository: request.image.clone(),
            pull_policy: "Always".to_owned(),
            tag: "latest".to_owned(),
        },
        resources: request.resources.clone().unwrap_or_default(),
        security_context: request.security_context.clone().unwrap_or_default(),
        automount_service_account_token: false,
        image_pull_secrets: request
            .image_pull_secrets
            .iter()
            .map(|name| SecretRef { name: name.clone() })
            .collect(),
        name_override: names.deployment.clone(),
        fullname_override: names.deployment,
        service_account: ServiceAccountValues {
            name: names.service_account,
        },
        probes: match &request.probes {
            Some(settings) => Probes {
                enabled: true,
                settings: Some(settings.clone()),
            },
            None => Probes {
                enabled: false,
                settings: None,
            },
        },
        env: request.env_vars.clone(),
        args: request.args.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::presets;

    fn request(chart_name: &str) -> ChartRequest {
        ChartRequest {
            chart_name: chart_name.to_owned(),
            ..ChartRequest::default()
        }
    }

    #[test]
    fn derived_names_follow_chart_name() {
        let names = derived_names("demo");
        assert_eq!(names.deployment, "demo-deployment");
        assert_eq!(names.service, "demo-service");
        assert_eq!(names.service_account, "demo-serviceaccount");
    }

    #[test]
    fn args_is_always_a_list() {
        let values = assemble(&request("demo"));
        assert!(values.args.is_empty());

        let yaml = serde_yaml::to_string(&values).unwrap();
        assert!(yaml.contains("args: []"), "{yaml}");
    }

    #[test]
    fn env_entries_keep_their_order() {
        let mut req = request("demo");
        req.env_vars = vec![
            EnvVar {
                name: "B".to_owned(),
                value: "2".to_owned(),
            },
            EnvVar {
                name: "A".to_owned(),
                value: "1".to_owned(),
            },
        ];

        let values = assemble(&req);
        assert_eq!(values.env[0].name, "B");
        assert_eq!(values.env[1].name, "A");

        let yaml = serde_yaml::to_string(&values).unwrap();
        assert!(yaml.find("name: B").unwrap() < yaml.find("name: A").unwrap());
    }

    #[test]
    fn declined_blocks_serialize_as_empty_mappings() {
        let yaml = serde_yaml::to_string(&assemble(&request("demo"))).unwrap();
        assert!(yaml.contains("resources: {}"), "{yaml}");
        assert!(yaml.contains("securityContext: {}"), "{yaml}");
        assert!(yaml.contains("enabled: false"), "{yaml}");
        assert!(!yaml.contains("settings:"), "{yaml}");
    }

    #[test]
    fn accepted_presets_carry_the_fixed_values() {
        let mut req = request("demo");
        req.resources = presets::resources(presets::STANDARD);
        req.security_context = presets::security_context(presets::STANDARD);
        req.probes = presets::probes(presets::STANDARD);

        let yaml = serde_yaml::to_string(&assemble(&req)).unwrap();
        assert!(yaml.contains("cpu: 100m"), "{yaml}");
        assert!(yaml.contains("memory: 256Mi"), "{yaml}");
        assert!(yaml.contains("cpu: '0.5'") || yaml.contains("cpu: 0.5"), "{yaml}");
        assert!(yaml.contains("memory: 512Mi"), "{yaml}");
        assert!(yaml.contains("runAsUser: 1000"), "{yaml}");
        assert!(yaml.contains("readOnlyRootFilesystem: true"), "{yaml}");
        assert!(yaml.contains("livenessProbeInitialDelaySeconds: 180"), "{yaml}");
        assert!(yaml.contains("readinessProbeInitialDelaySeconds: 180"), "{yaml}");
    }

    #[test]
    fn document_keys_appear_in_declaration_order() {
        let yaml = serde_yaml::to_string(&assemble(&request("demo"))).unwrap();
        let position = |key: &str| yaml.find(key).unwrap_or_else(|| panic!("missing {key}"));
        assert!(position("namespace:") < position("replicaCount:"));
        assert!(position("replicaCount:") < position("image:"));
        assert!(position("image:") < position("resources:"));
        assert!(position("serviceAccount:") < position("probes:"));
        assert!(position("env:") < position("args:"));
    }

    #[test]
    fn pull_secrets_become_name_references() {
        let mut req = request("demo");
        req.image_pull_secrets = vec!["regcred".to_owned()];

        let values = assemble(&req);
        assert_eq!(
            values.image_pull_secrets,
            vec![SecretRef {
                name: "regcred".to_owned()
            }]
        );
    }
}
