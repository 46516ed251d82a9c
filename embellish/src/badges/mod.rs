//! Badge probes and the aggregator that turns their results into paragraphs.
//!
//! Probes run concurrently; grouping and ordering follow the declared entry
//! list, never completion order.

pub mod metrics;
pub mod probes;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, info, warn};

use mdoc::{DocumentNode, parse_inline_fragment};

use crate::manifest::PackageData;
use crate::repository::Repository;
use crate::settings::Settings;

use self::metrics::MetricsClient;
use self::probes::{ContinuousIntegration, Maintainability, NodeIco, StabilityBadge};

/// Everything a probe may consult. Shared read-only by all probes of a run.
pub struct ProbeContext {
    pub data: PackageData,
    pub base_path: PathBuf,
    pub settings: Settings,
    pub repository: Option<Repository>,
    /// `None` when offline or when no HTTP client could be built.
    pub metrics: Option<MetricsClient>,
}

impl ProbeContext {
    pub fn new(data: PackageData, base_path: impl Into<PathBuf>, settings: Settings) -> Self {
        let repository = Repository::from_package(&data);
        if repository.is_none() {
            debug!("no recognised repository url, repository badges unavailable");
        }
        let metrics = if settings.offline {
            None
        } else {
            MetricsClient::new(&settings.metrics_api, settings.probe_timeout())
        };
        ProbeContext {
            data,
            base_path: base_path.into(),
            settings,
            repository,
            metrics,
        }
    }
}

/// Produces one markdown badge fragment, or declines with `None`.
#[async_trait]
pub trait BadgeProbe: Send + Sync {
    fn name(&self) -> &'static str;

    async fn probe(&self, ctx: &ProbeContext) -> Option<String>;
}

/// One slot of the declared badge layout.
pub enum BadgeEntry {
    Probe(Box<dyn BadgeProbe>),
    /// Starts a new visually separate badge paragraph.
    GroupBreak,
}

impl BadgeEntry {
    pub fn probe(probe: impl BadgeProbe + 'static) -> Self {
        BadgeEntry::Probe(Box::new(probe))
    }
}

/// The standard layout: package badge, then a row of status badges.
pub fn default_entries() -> Vec<BadgeEntry> {
    vec![
        BadgeEntry::probe(NodeIco),
        BadgeEntry::GroupBreak,
        BadgeEntry::probe(StabilityBadge),
        BadgeEntry::probe(ContinuousIntegration),
        BadgeEntry::probe(Maintainability),
    ]
}

/// Settled result for one entry, in declared position.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Badge(Option<String>),
    GroupBreak,
}

/// Run every probe concurrently and render the non-empty groups as paragraphs,
/// top to bottom in declared order.
pub async fn generate_badges(entries: &[BadgeEntry], ctx: &ProbeContext) -> Vec<DocumentNode> {
    info!(probes = entries.len(), "generating badges");
    let timeout = ctx.settings.probe_timeout();

    let outcomes = join_all(entries.iter().map(|entry| async move {
        match entry {
            BadgeEntry::GroupBreak => ProbeOutcome::GroupBreak,
            BadgeEntry::Probe(probe) => {
                ProbeOutcome::Badge(run_probe(probe.as_ref(), ctx, timeout).await)
            }
        }
    }))
    .await;

    group_badges(outcomes)
        .into_iter()
        .map(|group| render_group(&group))
        .collect()
}

async fn run_probe(probe: &dyn BadgeProbe, ctx: &ProbeContext, timeout: Duration) -> Option<String> {
    match tokio::time::timeout(timeout, probe.probe(ctx)).await {
        Ok(Some(badge)) if !badge.trim().is_empty() => {
            info!(probe = probe.name(), "badge available");
            Some(badge)
        }
        Ok(_) => {
            debug!(probe = probe.name(), "no badge");
            None
        }
        Err(_) => {
            warn!(probe = probe.name(), timeout_secs = timeout.as_secs(), "probe timed out");
            None
        }
    }
}

/// Split outcomes into groups at each break, dropping absent badges and empty groups.
pub fn group_badges(outcomes: Vec<ProbeOutcome>) -> Vec<Vec<String>> {
    let mut groups: Vec<Vec<String>> = vec![Vec::new()];
    for outcome in outcomes {
        match outcome {
            ProbeOutcome::GroupBreak => groups.push(Vec::new()),
            ProbeOutcome::Badge(Some(badge)) if !badge.trim().is_empty() => {
                if let Some(current) = groups.last_mut() {
                    current.push(badge);
                }
            }
            ProbeOutcome::Badge(_) => {}
        }
    }
    groups.retain(|group| !group.is_empty());
    groups
}

/// One paragraph per group, badges separated by a single space.
pub fn render_group(group: &[String]) -> DocumentNode {
    DocumentNode::paragraph(parse_inline_fragment(&group.join(" ")))
}
