use anyhow::{bail, Context as anyhowContext, Result};
use log::debug;
use std::io::{BufRead, Write};

use crate::chart::{presets, ChartRequest, RbacMode};
use crate::values::EnvVar;

/// Asks the fixed question sequence on an interactive channel. Generic over
/// the channel so tests can script answers.
pub(crate) struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String> {
        match default {
            Some(default) => write!(self.output, "{question} (default: {default}): ")?,
            None => write!(self.output, "{question}: ")?,
        }
        self.output.flush()?;

        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .with_context(|| format!("reading answer to {question:?}"))?;
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }

        if line.is_empty() {
            Ok(default.unwrap_or("").to_owned())
        } else {
            Ok(line)
        }
    }

    /// Only a literal (case-insensitive) `yes` is affirmative; the default is no.
    fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.ask(&format!("{question} (yes/no)"), Some("no"))?;
        Ok(answer.eq_ignore_ascii_case("yes"))
    }

    pub fn collect(&mut self) -> Result<ChartRequest> {
        let chart_name = self.ask("Enter the name of the Helm chart", Some("my-chart"))?;
        validate_chart_name(&chart_name)?;

        let namespace = self.ask("Enter the Kubernetes namespace", Some("default"))?;
        let image = self.ask("Enter the Docker image", Some("my-image"))?;

        let replicas = self.ask("Enter the number of replicas", Some("1"))?;
        let replicas: u32 = replicas
            .parse()
            .with_context(|| format!("replica count {replicas:?} is not a positive integer"))?;

        let mut env_vars = Vec::new();
        if self.confirm("Do you want to add environment variables?")? {
            loop {
                let entry = self.ask(
                    "Enter environment variable (key=value) or leave empty to finish",
                    None,
                )?;
                if entry.is_empty() {
                    break;
                }
                let (name, value) = entry.split_once('=').with_context(|| {
                    format!("environment variable entry {entry:?} is not in key=value form")
                })?;
                env_vars.push(EnvVar {
                    name: name.to_owned(),
                    value: value.to_owned(),
                });
            }
        }

        let mut args = Vec::new();
        if self.confirm("Do you want to add container arguments?")? {
            loop {
                let arg = self.ask("Enter an argument (or leave empty to finish)", None)?;
                if arg.is_empty() {
                    break;
                }
                args.push(arg);
            }
        }

        let resources = if self.confirm("Do you want to add resource requests/limits?")? {
            presets::resources(presets::STANDARD)
        } else {
            None
        };

        let security_context = if self.confirm("Do you want to add security context?")? {
            presets::security_context(presets::STANDARD)
        } else {
            None
        };

        let mut image_pull_secrets = Vec::new();
        if self.confirm("Do you need any image pull secrets?")? {
            let secret = self.ask("Enter the image pull secret name", None)?;
            if !secret.is_empty() {
                image_pull_secrets.push(secret);
            }
        }

        let probes = if self.confirm("Do you want to add readiness and liveness probes?")? {
            presets::probes(presets::STANDARD)
        } else {
            None
        };

        let rbac = RbacMode::from_answer(&self.ask(
            "Do you need RBAC controls? Press 1 for ClusterRole, 2 for Role, 0 for None",
            Some("0"),
        )?);

        let request = ChartRequest {
            chart_name,
            namespace,
            image,
            replicas,
            env_vars,
            args,
            resources,
            security_context,
            image_pull_secrets,
            probes,
            rbac,
        };
        debug!("collected {request:?}");
        Ok(request)
    }
}

/// The chart name is interpolated into Chart.yaml and used as a directory
/// name, so characters that are significant in YAML, Go templates or paths
/// are rejected up front.
fn validate_chart_name(name: &str) -> Result<()> {
    let forbidden = |c: char| {
        c.is_whitespace()
            || c.is_control()
            || matches!(c, '{' | '}' | ':' | '#' | '"' | '\'' | '/' | '\\')
    };
    if name.is_empty() || name.chars().any(forbidden) {
        bail!("chart name {name:?} contains characters that cannot appear in generated manifests");
    }
    Ok(())
}
