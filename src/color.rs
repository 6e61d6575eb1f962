#![allow(clippy::module_name_repetitions)]
//! Color mode selection and ANSI painting for CLI stderr messages.
//!
//! Only the binary's own one-line messages are painted. Compose stdout is
//! passed through untouched.

use clap::ValueEnum;
use once_cell::sync::OnceCell;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

static COLOR_MODE: OnceCell<ColorMode> = OnceCell::new();

/// Record the `--color` choice. First call wins.
pub fn set_color_mode(mode: ColorMode) {
    let _ = COLOR_MODE.set(mode);
}

pub fn parse_color_mode(s: &str) -> Option<ColorMode> {
    match s.trim().to_ascii_lowercase().as_str() {
        "auto" => Some(ColorMode::Auto),
        "always" | "on" | "true" | "yes" => Some(ColorMode::Always),
        "never" | "off" | "false" | "no" => Some(ColorMode::Never),
        _ => None,
    }
}

/// Decide whether to paint, given the stream's tty state.
///
/// Order: `NO_COLOR`, then the explicit mode, then `DOCKWRAP_COLOR`, then tty.
pub fn color_enabled_for(
    is_tty: bool,
    no_color: bool,
    explicit: Option<ColorMode>,
    env_pref: Option<ColorMode>,
) -> bool {
    // https://no-color.org/
    if no_color {
        return false;
    }
    match explicit.or(env_pref).unwrap_or(ColorMode::Auto) {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => is_tty,
    }
}

pub fn color_enabled_stderr() -> bool {
    let env_pref = std::env::var("DOCKWRAP_COLOR")
        .ok()
        .and_then(|v| parse_color_mode(&v));
    color_enabled_for(
        atty::is(atty::Stream::Stderr),
        std::env::var_os("NO_COLOR").is_some(),
        COLOR_MODE.get().copied(),
        env_pref,
    )
}

/// Wrap with an ANSI color code when enabled; otherwise return unchanged.
pub fn paint(enabled: bool, code: &str, s: &str) -> String {
    if enabled {
        format!("{code}{s}\x1b[0m")
    } else {
        s.to_string()
    }
}

pub fn log_warn_stderr(use_color: bool, msg: &str) {
    eprintln!("{}", paint(use_color, "\x1b[33m", msg));
}

pub fn log_error_stderr(use_color: bool, msg: &str) {
    eprintln!("{}", paint(use_color, "\x1b[31;1m", msg));
}
