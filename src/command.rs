//! Command line parsing helpers.

use anyhow::{Context, Result, bail};

/// Split a command line into an argv vector.
///
/// This uses Unix shell-style quoting rules. Callers should treat the returned
/// vector as an executable + arguments (not as a shell script).
pub fn parse_command_line(command_line: &str) -> Result<Vec<String>> {
    let trimmed = command_line.trim();
    if trimmed.is_empty() {
        bail!("Command line is empty");
    }

    let argv = shell_words::split(trimmed).context("Failed to parse command line")?;
    if argv.is_empty() {
        bail!("Command line produced no argv items");
    }

    Ok(argv)
}

/// Build the argv that opens `url`.
///
/// A configured browser command gets the URL appended as its last argument;
/// otherwise the platform opener is used.
pub fn open_argv(url: &str, browser: Option<&str>) -> Result<Vec<String>> {
    let mut argv = browser.map_or_else(
        || Ok(platform_opener().iter().map(ToString::to_string).collect()),
        |command_line| {
            parse_command_line(command_line)
                .with_context(|| format!("Invalid browser command: {command_line}"))
        },
    )?;
    argv.push(url.to_string());
    Ok(argv)
}

#[cfg(target_os = "macos")]
const fn platform_opener() -> &'static [&'static str] {
    &["open"]
}

#[cfg(windows)]
const fn platform_opener() -> &'static [&'static str] {
    &["cmd", "/C", "start", ""]
}

#[cfg(not(any(target_os = "macos", windows)))]
const fn platform_opener() -> &'static [&'static str] {
    &["xdg-open"]
}
