//! Terminal capability detection.
//!
//! Decides whether standard output is an interactive terminal and whether
//! that terminal understands OSC 8 hyperlinks and 24-bit color. Detection is
//! a pure function of the interactivity flag and an environment lookup, so
//! it can be exercised without touching the real process environment.

use std::io::IsTerminal;
use std::sync::OnceLock;

static IS_INTERACTIVE: OnceLock<bool> = OnceLock::new();

/// Terminal programs known to render OSC 8 hyperlinks.
const HYPERLINK_PROGRAMS: &[&str] = &["Hyper", "iTerm.app", "terminology", "WezTerm", "vscode"];

/// First VTE release with hyperlink support (0.50.0).
const VTE_HYPERLINK_VERSION: u32 = 5000;

const TRUECOLOR_TERMS: &[&str] = &[
    "iterm",
    "tmux-truecolor",
    "linux-truecolor",
    "xterm-truecolor",
    "screen-truecolor",
];

/// Returns whether standard output is a terminal.
///
/// The first call probes stdout and every later call returns that same answer.
/// Call it early in `main`, before any output is captured or redirected.
pub fn is_interactive_output() -> bool {
    *IS_INTERACTIVE.get_or_init(|| std::io::stdout().is_terminal())
}

/// Capabilities of the output terminal, computed once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub is_interactive: bool,
    pub supports_hyperlinks: bool,
    pub supports_truecolor: bool,
}

impl Capabilities {
    /// Detects capabilities from the process environment.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_env(is_interactive_output(), |key| std::env::var(key).ok())
    }

    /// Detects capabilities from an arbitrary environment lookup.
    pub fn from_env<F>(is_interactive: bool, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);
        let caps = Self {
            is_interactive,
            supports_hyperlinks: supports_hyperlinks(is_interactive, &env),
            supports_truecolor: supports_truecolor(&env),
        };
        tracing::debug!(?caps, "detected terminal capabilities");
        caps
    }

    /// Capabilities for output that is not a terminal.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            is_interactive: false,
            supports_hyperlinks: false,
            supports_truecolor: false,
        }
    }
}

/// Environment lookup that treats empty values as unset.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.is_empty())
    }

    fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

fn supports_hyperlinks<F>(is_interactive: bool, env: &Env<F>) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(force) = env.get("FORCE_HYPERLINK") {
        return force != "0";
    }

    if !is_interactive {
        return false;
    }

    // DomTerm
    if env.is_set("DOMTERM") {
        return true;
    }

    // VTE-based terminals (GNOME Terminal, Tilix, ...)
    if let Some(version) = env.get("VTE_VERSION") {
        return version
            .trim()
            .parse::<u32>()
            .is_ok_and(|v| v >= VTE_HYPERLINK_VERSION);
    }

    if env
        .get("TERM_PROGRAM")
        .is_some_and(|program| HYPERLINK_PROGRAMS.contains(&program.as_str()))
    {
        return true;
    }

    if env.get("TERM").as_deref() == Some("xterm-kitty") {
        return true;
    }

    // Windows Terminal, Konsole
    env.is_set("WT_SESSION") || env.is_set("KONSOLE_VERSION")
}

fn supports_truecolor<F>(env: &Env<F>) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    if matches!(env.get("COLORTERM").as_deref(), Some("truecolor" | "24bit")) {
        return true;
    }

    env.get("TERM")
        .is_some_and(|term| TRUECOLOR_TERMS.contains(&term.as_str()))
}
