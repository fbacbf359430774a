//! Image reference audit for catalog products.

use std::collections::BTreeMap;
use std::path::Path;

use fpvdb_core::AppConfig;
use fpvdb_store::{Catalog, CatalogStore};
use futures::stream::{self, StreamExt};
use reqwest::StatusCode;

/// Placeholder images the storefront falls back to; a product pointing at
/// one still needs a real picture.
const GENERIC_IMAGES: &[&str] = &[
    "generic-drone.png",
    "generic-radio.png",
    "generic-goggles.png",
    "generic-vtx.png",
    "generic-tool.png",
    "generic-lipo.png",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ImageIssue {
    Missing,
    Generic,
    FileNotFound,
    UnknownLocalPath,
    RemoteStatus(u16),
    RemoteError(String),
}

impl ImageIssue {
    fn reason(&self) -> &'static str {
        match self {
            ImageIssue::Missing => "no imageUrl",
            ImageIssue::Generic => "generic placeholder image",
            ImageIssue::FileNotFound => "local file not found",
            ImageIssue::UnknownLocalPath => "local path outside the images prefix",
            ImageIssue::RemoteStatus(_) | ImageIssue::RemoteError(_) => "remote image unreachable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Finding {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub issue: ImageIssue,
}

#[derive(Debug, Default)]
pub(super) struct Audit {
    pub findings: Vec<Finding>,
    /// `(id, name, url)` of products still pointing at a remote image.
    pub remote: Vec<(String, String, String)>,
}

fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//")
}

/// Checks every product's `imageUrl` without touching the network.
pub(super) fn audit_local(catalog: &Catalog, images_dir: &Path, url_prefix: &str) -> Audit {
    let prefix = format!("{}/", url_prefix.trim_end_matches('/'));
    let mut audit = Audit::default();

    for product in &catalog.products {
        let url = product.image_url.trim();
        let issue = if url.is_empty() {
            Some(ImageIssue::Missing)
        } else if is_remote(url) {
            audit
                .remote
                .push((product.id.clone(), product.name.clone(), url.to_owned()));
            None
        } else if let Some(file) = url.strip_prefix(&prefix) {
            if GENERIC_IMAGES.contains(&file) || file.contains("placeholder") {
                Some(ImageIssue::Generic)
            } else if images_dir.join(file).is_file() {
                None
            } else {
                Some(ImageIssue::FileNotFound)
            }
        } else {
            Some(ImageIssue::UnknownLocalPath)
        };

        if let Some(issue) = issue {
            audit.findings.push(Finding {
                id: product.id.clone(),
                name: product.name.clone(),
                image_url: product.image_url.clone(),
                issue,
            });
        }
    }

    audit
}

/// `HEAD`s every remote image with bounded concurrency; anything but 200 is
/// a finding.
pub(super) async fn check_remote(
    client: &reqwest::Client,
    targets: Vec<(String, String, String)>,
    concurrency: usize,
) -> Vec<Finding> {
    let checks = stream::iter(targets.into_iter().map(|(id, name, url)| {
        let client = client.clone();
        async move {
            let request_url = if url.starts_with("//") {
                format!("https:{url}")
            } else {
                url.clone()
            };
            let result = client.head(&request_url).send().await;
            (id, name, url, result)
        }
    }))
    .buffer_unordered(concurrency.max(1))
    .collect::<Vec<_>>()
    .await;

    let mut findings = Vec::new();
    for (id, name, url, result) in checks {
        let issue = match result {
            Ok(resp) if resp.status() == StatusCode::OK => continue,
            Ok(resp) => ImageIssue::RemoteStatus(resp.status().as_u16()),
            Err(e) => ImageIssue::RemoteError(e.to_string()),
        };
        tracing::warn!(id = %id, url = %url, issue = ?issue, "image URL verification failed");
        findings.push(Finding {
            id,
            name,
            image_url: url,
            issue,
        });
    }
    findings
}

pub(super) async fn run_verify_images<C: CatalogStore>(
    config: &AppConfig,
    store: &C,
    concurrency: usize,
    remote: bool,
) -> anyhow::Result<()> {
    let catalog = store.load()?;
    let Audit {
        mut findings,
        remote: remote_targets,
    } = audit_local(&catalog, &config.images_dir, &config.image_url_prefix);

    if remote && !remote_targets.is_empty() {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(12))
            .user_agent(config.scraper_user_agent.as_str())
            .build()?;
        findings.extend(check_remote(&client, remote_targets, concurrency).await);
    } else if !remote_targets.is_empty() {
        println!(
            "{} product(s) still use remote images (run localize-images, or pass --check-remote)",
            remote_targets.len()
        );
    }

    print_report(catalog.products.len(), &findings);
    Ok(())
}

fn print_report(total: usize, findings: &[Finding]) {
    if findings.is_empty() {
        println!("all {total} product image(s) OK");
        return;
    }

    let mut by_reason: BTreeMap<&'static str, Vec<&Finding>> = BTreeMap::new();
    for finding in findings {
        by_reason
            .entry(finding.issue.reason())
            .or_default()
            .push(finding);
    }

    for (reason, group) in &by_reason {
        println!("\n{reason} ({}):", group.len());
        for finding in group {
            match &finding.issue {
                ImageIssue::RemoteStatus(status) => println!(
                    "  [{}] {} -> {} (HTTP {status})",
                    finding.id, finding.name, finding.image_url
                ),
                ImageIssue::RemoteError(e) => println!(
                    "  [{}] {} -> {} ({e})",
                    finding.id, finding.name, finding.image_url
                ),
                _ => println!("  [{}] {} -> {}", finding.id, finding.name, finding.image_url),
            }
        }
    }
    println!("\ntotal products needing attention: {} of {total}", findings.len());
}
