//! Remote URL parsing and legacy-location rewriting.
//!
//! Remote URLs are parsed into their structural parts and compared
//! field by field. Only the three forms GitHub hands out for cloning are
//! recognized; anything else is left alone.

use std::fmt;

pub const LEGACY_HOST: &str = "github.com";
pub const LEGACY_ORG: &str = "snakewarhead";
pub const LEGACY_REPO: &str = "oh-my-zsh";

/// Where remotes pointing at the legacy location are moved to.
pub const CANONICAL_URL: &str = "https://github.com/ohmyzsh/ohmyzsh.git";

const GIT_SUFFIX: &str = ".git";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// `https://host/org/repo`
    Https,
    /// `git@host:org/repo`
    Ssh,
    /// `git://host/org/repo`
    Git,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrl {
    pub scheme: Scheme,
    pub host: String,
    pub org: String,
    pub repo: String,
    pub has_git_suffix: bool,
}

impl RemoteUrl {
    /// Parses a remote URL of one of the supported forms.
    #[must_use]
    pub fn parse(url: &str) -> Option<Self> {
        let (scheme, host, path) = if let Some(rest) = url.strip_prefix("https://") {
            let (host, path) = rest.split_once('/')?;
            (Scheme::Https, host, path)
        } else if let Some(rest) = url.strip_prefix("git://") {
            let (host, path) = rest.split_once('/')?;
            (Scheme::Git, host, path)
        } else if let Some(rest) = url.strip_prefix("git@") {
            let (host, path) = rest.split_once(':')?;
            (Scheme::Ssh, host, path)
        } else {
            return None;
        };

        let (org, repo) = path.split_once('/')?;
        let (repo, has_git_suffix) = match repo.strip_suffix(GIT_SUFFIX) {
            Some(stripped) => (stripped, true),
            None => (repo, false),
        };

        if [host, org, repo]
            .iter()
            .any(|part| part.is_empty() || part.contains('/'))
        {
            return None;
        }

        Some(Self {
            scheme,
            host: host.to_string(),
            org: org.to_string(),
            repo: repo.to_string(),
            has_git_suffix,
        })
    }

    /// Whether this remote points at the legacy repository location.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        self.host == LEGACY_HOST && self.org == LEGACY_ORG && self.repo == LEGACY_REPO
    }
}

impl fmt::Display for RemoteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = if self.has_git_suffix { GIT_SUFFIX } else { "" };
        match self.scheme {
            Scheme::Https => write!(f, "https://{}/{}/{}{suffix}", self.host, self.org, self.repo),
            Scheme::Ssh => write!(f, "git@{}:{}/{}{suffix}", self.host, self.org, self.repo),
            Scheme::Git => write!(f, "git://{}/{}/{}{suffix}", self.host, self.org, self.repo),
        }
    }
}

/// Returns the canonical URL if `url` points at the legacy location.
#[must_use]
pub fn canonical_replacement(url: &str) -> Option<&'static str> {
    RemoteUrl::parse(url)
        .filter(RemoteUrl::is_legacy)
        .map(|_| CANONICAL_URL)
}
