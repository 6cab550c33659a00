use anyhow::{Context as anyhowContext, Result};
use std::path::PathBuf;

use crate::chart::RbacMode;
use crate::values::ValuesDocument;

/// One generated file: its content and its path relative to the chart root.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RenderedArtifact {
    pub path: PathBuf,
    pub content: String,
}

impl RenderedArtifact {
    fn new(path: &str, content: String) -> Self {
        Self {
            path: PathBuf::from(path),
            content,
        }
    }
}

/// Render all five artifacts. The manifest templates keep their
/// `{{ .Values.* }}` placeholders; helm resolves those later, not this tool.
pub(crate) fn render_chart(
    chart_name: &str,
    values: &ValuesDocument,
    rbac: RbacMode,
) -> Result<Vec<RenderedArtifact>> {
    Ok(vec![
        RenderedArtifact::new("Chart.yaml", render_chart_descriptor(chart_name)),
        RenderedArtifact::new("values.yaml", render_values(values)?),
        RenderedArtifact::new("templates/deployment.yaml", render_deployment(values)),
        RenderedArtifact::new(
            "templates/serviceaccount.yaml",
            render_service_account(values),
        ),
        RenderedArtifact::new("templates/rbac.yaml", render_rbac(rbac).to_owned()),
    ])
}

fn render_chart_descriptor(chart_name: &str) -> String {
    format!(
        "apiVersion: v2\n\
         name: {chart_name}\n\
         description: A Helm chart for Kubernetes\n\
         version: 0.1.0\n"
    )
}

fn render_values(values: &ValuesDocument) -> Result<String> {
    serde_yaml::to_string(values).context("serializing values.yaml")
}

const DEPLOYMENT_HEAD: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: {{ .Values.nameOverride | default .Chart.Name }}
  namespace: {{ .Values.namespace }}
spec:
  replicas: {{ .Values.replicaCount }}
  selector:
    matchLabels:
      app: {{ .Values.nameOverride | default .Chart.Name }}
  template:
    metadata:
      labels:
        app: {{ .Values.nameOverride | default .Chart.Name }}
    spec:
      containers:
      - name: {{ .Values.nameOverride | default .Chart.Name }}
        image: {{ .Values.image.repository }}:{{ .Values.image.tag }}
        imagePullPolicy: {{ .Values.image.pullPolicy }}
"#;

const ENV_BLOCK: &str = r#"        {{- if .Values.env }}
        env:
        {{- range .Values.env }}
        - name: {{ .name }}
          value: {{ .value }}
        {{- end }}
        {{- end }}
"#;

const ARGS_BLOCK: &str = r#"        {{- if .Values.args }}
        args:
        {{- range .Values.args }}
        - {{ . }}
        {{- end }}
        {{- end }}
"#;

const RESOURCES_BLOCK: &str = r#"        {{- if .Values.resources }}
        resources:
          requests:
            memory: {{ .Values.resources.requests.memory }}
            cpu: {{ .Values.resources.requests.cpu }}
          limits:
            memory: {{ .Values.resources.limits.memory }}
            cpu: {{ .Values.resources.limits.cpu }}
        {{- end }}
"#;

const SECURITY_CONTEXT_BLOCK: &str = r#"        {{- if .Values.securityContext }}
        securityContext:
          {{- toYaml .Values.securityContext | nindent 10 }}
        {{- end }}
"#;

const PROBES_BLOCK: &str = r#"        {{- if .Values.probes.enabled }}
        livenessProbe:
          initialDelaySeconds: {{ .Values.probes.settings.livenessProbeInitialDelaySeconds }}
        readinessProbe:
          initialDelaySeconds: {{ .Values.probes.settings.readinessProbeInitialDelaySeconds }}
        {{- end }}
"#;

const SERVICE_ACCOUNT_LINES: &str = r#"      serviceAccountName: {{ .Values.serviceAccount.name }}
      automountServiceAccountToken: {{ .Values.automountServiceAccountToken }}
"#;

const PULL_SECRETS_BLOCK: &str = r#"      {{- if .Values.imagePullSecrets }}
      imagePullSecrets:
      {{- range .Values.imagePullSecrets }}
      - name: {{ .name }}
      {{- end }}
      {{- end }}
"#;

/// Optional sections are emitted only when the corresponding value was
/// actually collected; each keeps its own template guard for helm.
fn render_deployment(values: &ValuesDocument) -> String {
    let mut manifest = String::from(DEPLOYMENT_HEAD);
    if !values.env.is_empty() {
        manifest.push_str(ENV_BLOCK);
    }
    if !values.args.is_empty() {
        manifest.push_str(ARGS_BLOCK);
    }
    if !values.resources.is_empty() {
        manifest.push_str(RESOURCES_BLOCK);
    }
    if !values.security_context.is_empty() {
        manifest.push_str(SECURITY_CONTEXT_BLOCK);
    }
    if values.probes.enabled {
        manifest.push_str(PROBES_BLOCK);
    }
    manifest.push_str(SERVICE_ACCOUNT_LINES);
    if !values.image_pull_secrets.is_empty() {
        manifest.push_str(PULL_SECRETS_BLOCK);
    }
    manifest
}

const SERVICE_ACCOUNT_MANIFEST: &str = r#"apiVersion: v1
kind: ServiceAccount
metadata:
  name: {{ .Values.serviceAccount.name }}
  namespace: {{ .Values.namespace }}
"#;

fn render_service_account(values: &ValuesDocument) -> String {
    if values.service_account.name.is_empty() {
        String::new()
    } else {
        SERVICE_ACCOUNT_MANIFEST.to_owned()
    }
}

const CLUSTER_RBAC_MANIFEST: &str = r#"apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRole
metadata:
  name: {{ .Values.serviceAccount.name }}
rules:
  - apiGroups: [""]
    resources: ["services","endpoints","pods"]
    verbs: ["get","watch","list"]
  - apiGroups: ["extensions","networking.k8s.io"]
    resources: ["ingresses"]
    verbs: ["get","watch","list"]
  - apiGroups: [""]
    resources: ["nodes"]
    verbs: ["list"]
---
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRoleBinding
metadata:
  name: {{ .Values.serviceAccount.name }}-binding
roleRef:
  apiGroup: rbac.authorization.k8s.io
  kind: ClusterRole
  name: {{ .Values.serviceAccount.name }}
subjects:
  - kind: ServiceAccount
    name: {{ .Values.serviceAccount.name }}
    namespace: {{ .Values.namespace }}
"#;

const NAMESPACED_RBAC_MANIFEST: &str = r#"apiVersion: rbac.authorization.k8s.io/v1
kind: Role
metadata:
  name: {{ .Values.serviceAccount.name }}
  namespace: {{ .Values.namespace }}
rules:
  - apiGroups: [""]
    resources: ["services","endpoints","pods"]
    verbs: ["get","watch","list"]
  - apiGroups: ["extensions","networking.k8s.io"]
    resources: ["ingresses"]
    verbs: ["get","watch","list"]
  - apiGroups: [""]
    resources: ["nodes"]
    verbs: ["list"]
---
apiVersion: rbac.authorization.k8s.io/v1
kind: RoleBinding
metadata:
  name: {{ .Values.serviceAccount.name }}-binding
roleRef:
  apiGroup: rbac.authorization.k8s.io
  kind: Role
  name: {{ .Values.serviceAccount.name }}
subjects:
  - kind: ServiceAccount
    name: {{ .Values.serviceAccount.name }}
    namespace: {{ .Values.namespace }}
"#;

fn render_rbac(mode: RbacMode) -> &'static str {
    match mode {
        RbacMode::Cluster => CLUSTER_RBAC_MANIFEST,
        RbacMode::Namespaced => NAMESPACED_RBAC_MANIFEST,
        RbacMode::None => "",
    }
}
