use std::sync::LazyLock;

use regex::Regex;

use crate::manifest::PackageData;

/// Hosting providers recognised in repository URLs.
const KNOWN_HOSTS: &[&str] = &["github.com", "bitbucket.org", "gitlab.com"];

/// `https://github.com/o/r.git`, `git+ssh://git@github.com/o/r`, `git@github.com:o/r.git`, ...
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let hosts: Vec<String> = KNOWN_HOSTS.iter().map(|h| regex::escape(h)).collect();
    Regex::new(&format!(r"(?i)({})[/:]([^?#]+)", hosts.join("|")))
        .expect("repository url pattern is valid")
});

/// npm shorthand: `github:o/r`, `gitlab:o/r`, `bitbucket:o/r`.
static SHORTHAND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(github|bitbucket|gitlab):([^?#]+)$").expect("shorthand pattern is valid")
});

/// Normalized source-control location: `{ host: "github.com", path: "owner/repo" }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub host: String,
    pub path: String,
}

impl Repository {
    pub fn from_package(data: &PackageData) -> Option<Repository> {
        let field = data.repository.as_ref()?;
        Repository::parse(field.url())
    }

    /// Match a repository URL against the known providers.
    pub fn parse(url: &str) -> Option<Repository> {
        let url = url.trim();

        if let Some(caps) = SHORTHAND_PATTERN.captures(url) {
            let key = &caps[1];
            let host = KNOWN_HOSTS
                .iter()
                .find(|h| h.split('.').next() == Some(key))?;
            return Some(Repository {
                host: host.to_string(),
                path: normalize_path(&caps[2])?,
            });
        }

        let caps = URL_PATTERN.captures(url)?;
        Some(Repository {
            host: caps[1].to_ascii_lowercase(),
            path: normalize_path(&caps[2])?,
        })
    }

    /// Host without its top-level domain (`github`), as used in service URLs.
    pub fn host_key(&self) -> &str {
        self.host.split('.').next().unwrap_or(&self.host)
    }
}

/// Keep exactly the first two segments, dropping a `.git` suffix.
fn normalize_path(raw: &str) -> Option<String> {
    let mut segments = raw.split('/').filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let repo = segments.next()?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        return None;
    }
    Some(format!("{}/{}", owner, repo))
}
