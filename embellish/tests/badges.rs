use std::time::Duration;

use async_trait::async_trait;

use embellish::badges::{
    BadgeEntry, BadgeProbe, ProbeContext, ProbeOutcome, default_entries, generate_badges,
    group_badges,
};
use embellish::patcher::is_badge_paragraph;
use embellish::{PackageData, Settings};

struct Fixed(&'static str);

#[async_trait]
impl BadgeProbe for Fixed {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn probe(&self, _ctx: &ProbeContext) -> Option<String> {
        Some(self.0.to_string())
    }
}

struct Absent;

#[async_trait]
impl BadgeProbe for Absent {
    fn name(&self) -> &'static str {
        "absent"
    }

    async fn probe(&self, _ctx: &ProbeContext) -> Option<String> {
        None
    }
}

/// Finishes after `delay`, so completion order differs from declared order.
struct Delayed(&'static str, Duration);

#[async_trait]
impl BadgeProbe for Delayed {
    fn name(&self) -> &'static str {
        "delayed"
    }

    async fn probe(&self, _ctx: &ProbeContext) -> Option<String> {
        tokio::time::sleep(self.1).await;
        Some(self.0.to_string())
    }
}

fn package(json: &str) -> PackageData {
    PackageData::from_json(json, "package.json").unwrap()
}

fn offline() -> Settings {
    Settings {
        offline: true,
        ..Settings::default()
    }
}

fn context(json: &str, base: &std::path::Path) -> ProbeContext {
    ProbeContext::new(package(json), base, offline())
}

fn badge(n: u32) -> String {
    format!("[![b{n}](https://img.example/{n}.svg)](https://example.com/{n})")
}

const A: &str = "[![a](https://img.example/a.svg)](https://example.com/a)";
const B: &str = "[![b](https://img.example/b.svg)](https://example.com/b)";
const C: &str = "[![c](https://img.example/c.svg)](https://example.com/c)";

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

#[test]
fn groups_split_at_breaks_and_drop_absent() {
    let groups = group_badges(vec![
        ProbeOutcome::Badge(Some(badge(1))),
        ProbeOutcome::GroupBreak,
        ProbeOutcome::Badge(None),
        ProbeOutcome::Badge(Some(badge(3))),
    ]);
    assert_eq!(groups, vec![vec![badge(1)], vec![badge(3)]]);
}

#[test]
fn empty_groups_are_dropped() {
    let groups = group_badges(vec![
        ProbeOutcome::Badge(None),
        ProbeOutcome::GroupBreak,
        ProbeOutcome::GroupBreak,
        ProbeOutcome::Badge(Some(badge(1))),
        ProbeOutcome::Badge(Some(String::new())),
        ProbeOutcome::Badge(Some(badge(2))),
        ProbeOutcome::GroupBreak,
    ]);
    assert_eq!(groups, vec![vec![badge(1), badge(2)]]);
}

#[test]
fn nothing_present_means_no_groups() {
    assert!(group_badges(vec![ProbeOutcome::GroupBreak, ProbeOutcome::Badge(None)]).is_empty());
    assert!(group_badges(Vec::new()).is_empty());
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn paragraphs_follow_declared_order() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(r#"{"name":"demo","author":"Jane Doe"}"#, dir.path());
    let entries = vec![
        BadgeEntry::probe(Fixed(A)),
        BadgeEntry::GroupBreak,
        BadgeEntry::probe(Absent),
        BadgeEntry::probe(Fixed(C)),
    ];

    let paragraphs = generate_badges(&entries, &ctx).await;
    let rendered: Vec<String> = paragraphs.iter().map(|p| p.to_string()).collect();
    assert_eq!(rendered, vec![A.to_string(), C.to_string()]);
    assert!(paragraphs.iter().all(is_badge_paragraph));
}

#[tokio::test(start_paused = true)]
async fn completion_order_does_not_matter() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(r#"{"name":"demo","author":"Jane Doe"}"#, dir.path());
    let entries = vec![
        BadgeEntry::probe(Delayed(A, Duration::from_millis(300))),
        BadgeEntry::probe(Delayed(B, Duration::from_millis(100))),
        BadgeEntry::probe(Fixed(C)),
    ];

    let paragraphs = generate_badges(&entries, &ctx).await;
    assert_eq!(paragraphs.len(), 1);
    assert_eq!(paragraphs[0].to_string(), format!("{A} {B} {C}"));
}

#[tokio::test(start_paused = true)]
async fn slow_probe_times_out_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        probe_timeout_secs: 1,
        ..offline()
    };
    let ctx = ProbeContext::new(package(r#"{"name":"demo","author":"x"}"#), dir.path(), settings);
    let entries = vec![
        BadgeEntry::probe(Delayed(A, Duration::from_secs(3600))),
        BadgeEntry::probe(Fixed(B)),
    ];

    let paragraphs = generate_badges(&entries, &ctx).await;
    assert_eq!(paragraphs.len(), 1);
    assert_eq!(paragraphs[0].to_string(), B);
}

// ---------------------------------------------------------------------------
// Standard probes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn without_repository_only_package_and_stability_badges() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".travis.yml"), "language: node_js\n").unwrap();
    let ctx = context(
        r#"{"name":"demo","author":"Jane Doe","stability":"experimental"}"#,
        dir.path(),
    );

    let rendered: Vec<String> = generate_badges(&default_entries(), &ctx)
        .await
        .iter()
        .map(|p| p.to_string())
        .collect();
    assert_eq!(
        rendered,
        vec![
            "[![NPM](https://nodei.co/npm/demo.png)](https://nodei.co/npm/demo/)".to_string(),
            "[![experimental](https://img.shields.io/badge/stability-experimental-red.svg)](https://github.com/dominictarr/stability#experimental)".to_string(),
        ]
    );
}

#[tokio::test]
async fn ci_badge_needs_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let json = r#"{"name":"demo","author":"Jane Doe","repository":{"type":"git","url":"git+https://github.com/jane/demo.git"}}"#;

    let ctx = context(json, dir.path());
    let rendered: Vec<String> = generate_badges(&default_entries(), &ctx)
        .await
        .iter()
        .map(|p| p.to_string())
        .collect();
    assert_eq!(rendered.len(), 1);

    std::fs::write(dir.path().join(".travis.yml"), "language: rust\n").unwrap();
    let ctx = context(json, dir.path());
    let rendered: Vec<String> = generate_badges(&default_entries(), &ctx)
        .await
        .iter()
        .map(|p| p.to_string())
        .collect();
    assert_eq!(
        rendered[1],
        "[![Build Status](https://api.travis-ci.org/jane/demo.svg?branch=master)](https://travis-ci.org/jane/demo)"
    );
}

#[tokio::test]
async fn private_package_has_no_package_badge() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(
        r#"{"name":"demo","author":"Jane Doe","private":true,"stability":"locked"}"#,
        dir.path(),
    );
    let rendered: Vec<String> = generate_badges(&default_entries(), &ctx)
        .await
        .iter()
        .map(|p| p.to_string())
        .collect();
    assert_eq!(
        rendered,
        vec!["[![locked](https://img.shields.io/badge/stability-locked-00bbff.svg)](https://github.com/dominictarr/stability#locked)".to_string()]
    );
}

#[tokio::test]
async fn offline_skips_maintainability_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(
        r#"{"name":"demo","author":"Jane Doe","private":true,"repository":"https://github.com/jane/demo"}"#,
        dir.path(),
    );
    assert!(ctx.repository.is_some());
    assert!(ctx.metrics.is_none());
    assert!(generate_badges(&default_entries(), &ctx).await.is_empty());
}
