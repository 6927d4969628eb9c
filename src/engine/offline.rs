//! Offline engine backed by the Argos Translate command-line tools.
//!
//! `argospm` manages language-pair packages named `translate-<from>_<to>`;
//! `argos-translate` performs the translation. Every invocation runs under a
//! timeout and the child is killed if the timeout fires.

use crate::config::Config;
use crate::engine::{AvailablePackage, PackageManager, TranslationEngine};
use crate::error::EngineError;
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

const ENGINE: &str = "offline";

fn package_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\btranslate-([a-z]{2,3})_([a-z]{2,3})\b").expect("package pattern is valid")
    })
}

/// Pull every `translate-<from>_<to>` package name out of `argospm` output.
fn parse_packages(output: &str) -> Vec<AvailablePackage> {
    output
        .lines()
        .filter_map(|line| package_pattern().captures(line))
        .map(|caps| AvailablePackage {
            from_code: caps[1].to_string(),
            to_code: caps[2].to_string(),
            handle: caps[0].to_string(),
        })
        .collect()
}

pub struct ArgosCli {
    translate_bin: String,
    package_bin: String,
    call_timeout: Duration,
    install_timeout: Duration,
}

impl ArgosCli {
    pub fn new(config: &Config) -> Self {
        Self {
            translate_bin: config.argos_translate_bin.clone(),
            package_bin: config.argospm_bin.clone(),
            call_timeout: config.request_timeout(),
            install_timeout: config.install_timeout(),
        }
    }

    async fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<String, EngineError> {
        debug!("Executing {} {:?}", program, args);

        let mut command = Command::new(program);
        command.args(args).kill_on_drop(true);

        let output = tokio::time::timeout(timeout, command.output())
            .await
            .map_err(|_| EngineError::Timeout {
                engine: ENGINE,
                after: timeout,
            })?
            .map_err(|e| EngineError::Process {
                engine: ENGINE,
                detail: format!("failed to execute {}: {}", program, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Process {
                engine: ENGINE,
                detail: format!("{} exited with {}: {}", program, output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn installed_languages(&self) -> Result<HashSet<String>, EngineError> {
        Ok(self
            .installed_pairs()
            .await?
            .into_iter()
            .flat_map(|(from, to)| [from, to])
            .collect())
    }
}

#[async_trait]
impl TranslationEngine for ArgosCli {
    fn name(&self) -> &'static str {
        ENGINE
    }

    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, EngineError> {
        let languages = self.installed_languages().await?;
        if !languages.contains(from) || !languages.contains(to) {
            return Err(EngineError::LanguageNotInstalled {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        // "--" keeps text such as "-urgent" from being parsed as an option.
        let stdout = self
            .run(
                &self.translate_bin,
                &["--from", from, "--to", to, "--", text],
                self.call_timeout,
            )
            .await?;
        Ok(stdout.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[async_trait]
impl PackageManager for ArgosCli {
    async fn installed_pairs(&self) -> Result<HashSet<(String, String)>, EngineError> {
        let stdout = self
            .run(&self.package_bin, &["list"], self.call_timeout)
            .await?;
        Ok(parse_packages(&stdout)
            .into_iter()
            .map(|p| (p.from_code, p.to_code))
            .collect())
    }

    async fn update_index(&self) -> Result<(), EngineError> {
        self.run(&self.package_bin, &["update"], self.install_timeout)
            .await
            .map(|_| ())
    }

    async fn available_packages(&self) -> Result<Vec<AvailablePackage>, EngineError> {
        let stdout = self
            .run(&self.package_bin, &["search"], self.call_timeout)
            .await?;
        Ok(parse_packages(&stdout))
    }

    async fn install(&self, package: &AvailablePackage) -> Result<(), EngineError> {
        info!("Installing offline package {}", package.handle);
        self.run(
            &self.package_bin,
            &["install", &package.handle],
            self.install_timeout,
        )
        .await
        .map(|_| ())
    }
}
