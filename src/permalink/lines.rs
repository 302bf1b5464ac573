//! Line selections and their URL anchors.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A 1-indexed line selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedLines {
    start: u32,
    end: Option<u32>,
}

/// Why a line selection could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinesError {
    /// Line numbers start at 1.
    #[error("Line numbers start at 1")]
    Zero,
    /// The selection ends before it starts.
    #[error("Line range {start}-{end} ends before it starts")]
    Reversed {
        /// First line.
        start: u32,
        /// Last line.
        end: u32,
    },
    /// Not a number.
    #[error("Invalid line selection '{0}', expected N or N-M")]
    Invalid(String),
}

impl SelectedLines {
    /// A single line.
    ///
    /// # Errors
    ///
    /// Returns an error if `line` is zero.
    pub const fn single(line: u32) -> Result<Self, LinesError> {
        Self::range(line, line)
    }

    /// An inclusive range of lines.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is zero or `end` is before `start`.
    pub const fn range(start: u32, end: u32) -> Result<Self, LinesError> {
        if start == 0 {
            return Err(LinesError::Zero);
        }
        if end < start {
            return Err(LinesError::Reversed { start, end });
        }
        Ok(Self {
            start,
            end: Some(end),
        })
    }

    /// First selected line.
    #[must_use]
    pub const fn start(&self) -> u32 {
        self.start
    }

    /// Last selected line, only when it differs from the first.
    #[must_use]
    pub const fn end(&self) -> Option<u32> {
        match self.end {
            Some(end) if end != self.start => Some(end),
            _ => None,
        }
    }

    /// `#L10` or `#L10-L15` style anchor, without the `#`.
    #[must_use]
    pub fn github_anchor(&self) -> String {
        self.end().map_or_else(
            || format!("L{}", self.start),
            |end| format!("L{}-L{end}", self.start),
        )
    }

    /// `#file.rs-10` or `#file.rs-10:15` style anchor, without the `#`.
    #[must_use]
    pub fn bitbucket_anchor(&self, file_path: &str) -> String {
        let basename = file_path.rsplit('/').next().unwrap_or(file_path);
        self.end().map_or_else(
            || format!("{basename}-{}", self.start),
            |end| format!("{basename}-{}:{end}", self.start),
        )
    }

    /// `#10` or `#10-15` style anchor, without the `#`.
    #[must_use]
    pub fn bitbucket_server_anchor(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SelectedLines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)?;
        if let Some(end) = self.end() {
            write!(f, "-{end}")?;
        }
        Ok(())
    }
}

impl FromStr for SelectedLines {
    type Err = LinesError;

    /// Parse `10`, `10-15` or `L10-L15`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .trim_start_matches(['L', 'l'])
                .parse::<u32>()
                .map_err(|_| LinesError::Invalid(s.to_string()))
        };

        match s.split_once('-') {
            Some((start, end)) => Self::range(parse(start)?, parse(end)?),
            None => Self::single(parse(s)?),
        }
    }
}
