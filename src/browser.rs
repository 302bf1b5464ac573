//! Opening links in a web browser.

use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::command::open_argv;

/// Open `url` with the configured browser command, or the platform opener.
///
/// The browser is spawned and left running; only a failure to launch it is
/// reported.
///
/// # Errors
///
/// Returns an error if the browser command is invalid or cannot be spawned.
pub fn open_url(url: &str, browser: Option<&str>) -> Result<()> {
    let argv = open_argv(url, browser)?;
    let Some((program, args)) = argv.split_first() else {
        bail!("Browser command produced no argv items");
    };

    debug!(program = %program, url = %url, "Opening link");
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to launch {program}"))?;
    Ok(())
}
