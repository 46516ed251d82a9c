use async_trait::async_trait;
use tracing::debug;

use super::{BadgeProbe, ProbeContext};

/// npm package card from nodei.co. Always available for public packages.
pub struct NodeIco;

#[async_trait]
impl BadgeProbe for NodeIco {
    fn name(&self) -> &'static str {
        "nodei.co"
    }

    async fn probe(&self, ctx: &ProbeContext) -> Option<String> {
        if ctx.data.is_private() {
            debug!("private package, skipping nodei.co badge");
            return None;
        }
        let name = &ctx.data.name;
        Some(format!(
            "[![NPM](https://nodei.co/npm/{name}.png)](https://nodei.co/npm/{name}/)"
        ))
    }
}

/// Stability index badge, when the manifest declares a stability label.
pub struct StabilityBadge;

#[async_trait]
impl BadgeProbe for StabilityBadge {
    fn name(&self) -> &'static str {
        "stability"
    }

    async fn probe(&self, ctx: &ProbeContext) -> Option<String> {
        let Some(stability) = ctx.data.stability else {
            debug!("stability not specified in package.json");
            return None;
        };
        let label = stability.label();
        let color = stability.color();
        Some(format!(
            "[![{label}](https://img.shields.io/badge/stability-{label}-{color}.svg)](https://github.com/dominictarr/stability#{label})"
        ))
    }
}

/// Build status badge, when the repository is known and a CI config file exists.
pub struct ContinuousIntegration;

#[async_trait]
impl BadgeProbe for ContinuousIntegration {
    fn name(&self) -> &'static str {
        "ci"
    }

    async fn probe(&self, ctx: &ProbeContext) -> Option<String> {
        let repository = ctx.repository.as_ref()?;
        let ci_file = ctx.base_path.join(&ctx.settings.ci_file);
        let configured = tokio::fs::try_exists(&ci_file).await.unwrap_or(false);
        if !configured {
            debug!(file = %ci_file.display(), "ci not configured");
            return None;
        }
        let path = &repository.path;
        Some(format!(
            "[![Build Status](https://api.travis-ci.org/{path}.svg?branch=master)](https://travis-ci.org/{path})"
        ))
    }
}

/// Maintainability badge, when the metrics service knows the repository.
pub struct Maintainability;

#[async_trait]
impl BadgeProbe for Maintainability {
    fn name(&self) -> &'static str {
        "maintainability"
    }

    async fn probe(&self, ctx: &ProbeContext) -> Option<String> {
        let repository = ctx.repository.as_ref()?;
        let Some(metrics) = ctx.metrics.as_ref() else {
            debug!("metrics lookup disabled");
            return None;
        };
        let token = metrics.badge_token(&repository.path).await?;
        let api = metrics.api();
        let host = repository.host_key();
        let path = &repository.path;
        Some(format!(
            "[![Maintainability]({api}/badges/{token}/maintainability)](https://codeclimate.com/{host}/{path}/maintainability)"
        ))
    }
}
