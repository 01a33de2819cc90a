//! Styled terminal output: palette, links, banner, and progress.
//!
//! Everything here is driven by the [`Capabilities`] detected at startup.
//! When output is not a terminal every escape code collapses to an empty
//! string and links fall back to plain text.

use crate::config::Config;
use crate::constants::PROGRESS_TICK_MS;
use crate::terminal::Capabilities;
use crate::update::{UpdateCallbacks, UpdateOutcome, UpdateResult, UpdateStep};
use colored::{Color, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const ESC: &str = "\x1b";

const TRUECOLOR_RAINBOW: [(u8, u8, u8); 7] = [
    (255, 0, 0),
    (255, 97, 0),
    (247, 255, 0),
    (0, 255, 30),
    (77, 0, 255),
    (168, 0, 255),
    (245, 0, 172),
];

const ANSI256_RAINBOW: [u8; 7] = [196, 202, 226, 82, 21, 93, 163];

/// Banner art, one entry per line, split into one segment per rainbow color.
const BANNER: [[&str; 7]; 6] = [
    ["         ", "__      ", "           ", "        ", "       ", "     ", "__   "],
    ["  ____  ", "/ /_    ", " ____ ___  ", "__  __  ", " ____  ", "_____", "/ /_  "],
    [" / __ \\", "/ __ \\  ", " / __ `__ \\", "/ / / / ", " /_  / ", "/ ___/", " __ \\ "],
    ["/ /_/ /", " / / / ", " / / / / / /", " /_/ / ", "   / /_", "(__  )", " / / / "],
    ["\\____/", "_/ /_/ ", " /_/ /_/ /_/", "\\__, / ", "   /___/", "____/", "_/ /_/  "],
    ["    ", "        ", "           ", " /____/ ", "       ", "     ", "          "],
];

const UPDATING_MESSAGE: &str = "Updating Oh My Zsh";
const UP_TO_DATE_MESSAGE: &str = "Hooray! Oh My Zsh is already up to date.";
const UPDATED_MESSAGE: &str = "Hooray! Oh My Zsh has been updated!";
const FAILURE_MESSAGE: &str = "There was an error updating. Try again later?";

/// Community links shown after a successful update: (lead-in, text, url).
const COMMUNITY_LINKS: [(&str, &str, &str); 3] = [
    (
        "To keep up with the latest news and updates, follow us on Twitter:",
        "@ohmyzsh",
        "https://twitter.com/ohmyzsh",
    ),
    (
        "Want to get involved in the community? Join our Discord:",
        "Discord server",
        "https://discord.gg/ohmyzsh",
    ),
    (
        "Get your Oh My Zsh swag at:",
        "Planet Argon Shop",
        "https://shop.planetargon.com/collections/oh-my-zsh",
    ),
];

fn sgr(code: &str) -> String {
    format!("{ESC}[{code}m")
}

fn fg(color: Color) -> String {
    sgr(&color.to_fg_str())
}

/// Escape codes selected once for the run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    pub rainbow: [String; 7],
    pub info: String,
    pub error: String,
    pub warn: String,
    pub bold: String,
    pub reset: String,
}

impl Palette {
    #[must_use]
    pub fn new(caps: &Capabilities) -> Self {
        if !caps.is_interactive {
            return Self::default();
        }

        let rainbow = if caps.supports_truecolor {
            TRUECOLOR_RAINBOW.map(|(r, g, b)| sgr(&format!("38;2;{r};{g};{b}")))
        } else {
            ANSI256_RAINBOW.map(|n| sgr(&format!("38;5;{n:03}")))
        };

        Self {
            rainbow,
            info: fg(Color::Blue),
            error: fg(Color::Red),
            warn: fg(Color::Yellow),
            bold: sgr("1"),
            reset: sgr("0"),
        }
    }
}

/// How [`Formatter::render_link`] degrades without hyperlink support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkFallback {
    /// Show only the link text.
    Text,
    /// Show the URL, underlined.
    #[default]
    Url,
}

#[derive(Debug, Clone)]
pub struct Formatter {
    caps: Capabilities,
    palette: Palette,
}

impl Formatter {
    #[must_use]
    pub fn new(caps: Capabilities) -> Self {
        Self {
            palette: Palette::new(&caps),
            caps,
        }
    }

    #[must_use]
    pub fn render_link(&self, text: &str, url: &str, fallback: LinkFallback) -> String {
        if self.caps.supports_hyperlinks {
            return format!("{ESC}]8;;{url}{ESC}\\{text}{ESC}]8;;{ESC}\\");
        }
        match fallback {
            LinkFallback::Text => text.to_string(),
            LinkFallback::Url => self.render_underline(url),
        }
    }

    #[must_use]
    pub fn render_underline(&self, text: &str) -> String {
        if self.caps.is_interactive {
            format!("{}{text}{}", sgr("4"), sgr("24"))
        } else {
            text.to_string()
        }
    }

    #[must_use]
    pub fn render_banner(&self) -> String {
        let p = &self.palette;
        BANNER
            .iter()
            .map(|line| {
                let mut out: String = line
                    .iter()
                    .zip(&p.rainbow)
                    .map(|(segment, color)| format!("{color}{segment}"))
                    .collect();
                out.push_str(&p.reset);
                out
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[must_use]
    pub fn render_message(&self, message: &str) -> String {
        format!("{}{message}{}", self.palette.info, self.palette.reset)
    }

    #[must_use]
    pub fn render_error(&self, message: &str) -> String {
        format!("{}{message}{}", self.palette.error, self.palette.reset)
    }

    #[must_use]
    pub fn render_warning(&self, message: &str) -> String {
        format!("{}{message}{}", self.palette.warn, self.palette.reset)
    }

    #[must_use]
    pub fn render_community_links(&self) -> Vec<String> {
        let p = &self.palette;
        COMMUNITY_LINKS
            .iter()
            .map(|(lead, text, url)| {
                format!(
                    "{}{}{lead} {}{}",
                    p.info,
                    p.bold,
                    self.render_link(text, url, LinkFallback::Url),
                    p.reset
                )
            })
            .collect()
    }
}

/// Lines of the final status report for `result`.
///
/// Success prints the banner, the status message, and the community links;
/// quiet mode keeps only the status message. Failure prints the error line
/// followed by the failing step and cause.
#[must_use]
pub fn render_outcome(formatter: &Formatter, result: &UpdateResult, config: &Config) -> Vec<String> {
    let message = match &result.outcome {
        UpdateOutcome::UpToDate => UP_TO_DATE_MESSAGE,
        UpdateOutcome::Updated { .. } => UPDATED_MESSAGE,
        UpdateOutcome::Failed(failure) => {
            let mut lines = vec![formatter.render_error(FAILURE_MESSAGE)];
            if !config.is_quiet() {
                lines.push(
                    formatter.render_warning(&format!("{}: {}", failure.step, failure.error)),
                );
            }
            return lines;
        }
    };

    if config.is_quiet() {
        return vec![formatter.render_message(message)];
    }

    let mut lines: Vec<String> = formatter
        .render_banner()
        .lines()
        .map(str::to_string)
        .collect();
    lines.push(String::new());
    lines.push(formatter.render_message(message));
    lines.push(String::new());
    lines.extend(formatter.render_community_links());
    lines
}

/// Prints the final status for `result` to stdout.
pub fn print_outcome(formatter: &Formatter, result: &UpdateResult, config: &Config) {
    for line in render_outcome(formatter, result, config) {
        println!("{line}");
    }
}

/// No-op callbacks for when progress tracking is not needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpCallbacks;

impl UpdateCallbacks for NoOpCallbacks {
    fn on_step(&self, _step: &UpdateStep) {}
}

/// Terminal callbacks: a spinner while pulling, step traces in verbose mode.
pub struct ConsoleCallbacks {
    spinner: Option<ProgressBar>,
    formatter: Formatter,
    config: Config,
}

impl ConsoleCallbacks {
    #[must_use]
    pub fn new(config: &Config, caps: &Capabilities) -> Self {
        let spinner = if caps.is_interactive && !config.is_quiet() && !config.is_verbose() {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                    .template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            Some(spinner)
        } else {
            None
        };
        Self {
            spinner,
            formatter: Formatter::new(*caps),
            config: config.clone(),
        }
    }

    /// Line announcing the pull when no spinner is shown.
    fn pull_notice(&self) -> Option<String> {
        if self.spinner.is_some() || self.config.is_quiet() {
            return None;
        }
        Some(self.formatter.render_message(UPDATING_MESSAGE))
    }
}

impl UpdateCallbacks for ConsoleCallbacks {
    fn on_step(&self, step: &UpdateStep) {
        if self.config.is_verbose() {
            eprintln!("  {}...", step.to_string().dimmed());
        }

        if *step == UpdateStep::Pulling {
            if let Some(notice) = self.pull_notice() {
                println!("{notice}");
            }
        }

        let Some(spinner) = &self.spinner else {
            return;
        };
        if *step == UpdateStep::Pulling {
            spinner.set_message(format!("{UPDATING_MESSAGE}..."));
            spinner.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
        } else if !spinner.is_finished() && !spinner.message().is_empty() {
            spinner.finish_and_clear();
        }
    }
}
