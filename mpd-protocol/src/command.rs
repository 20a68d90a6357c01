//! Command values handed to `Connection::issue`

use std::fmt;

use crate::subsystem::Subsystem;

/// Half-open range of queue positions, `start..end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaylistRange {
    pub start: u32,
    pub end: u32,
}

impl PlaylistRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Number of positions the range spans (zero when `end <= start`)
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for PlaylistRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// A single protocol command: a name plus positional arguments
///
/// `Display` renders the line the way it goes on the wire, with every
/// argument quoted.
///
/// # Example
///
/// ```rust
/// use mpd_protocol::{Command, PlaylistRange};
///
/// let cmd = Command::playlist_info(Some(PlaylistRange::new(0, 5)));
/// assert_eq!(cmd.to_string(), "playlistinfo \"0:5\"");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn status() -> Self {
        Self::new("status")
    }

    pub fn ping() -> Self {
        Self::new("ping")
    }

    /// `playlistinfo`, the whole queue when `range` is `None`
    pub fn playlist_info(range: Option<PlaylistRange>) -> Self {
        match range {
            Some(range) => Self::new("playlistinfo").arg(range.to_string()),
            None => Self::new("playlistinfo"),
        }
    }

    /// `idle`, restricted to `subsystems` unless the slice is empty
    pub fn idle(subsystems: &[Subsystem]) -> Self {
        subsystems
            .iter()
            .fold(Self::new("idle"), |cmd, subsystem| cmd.arg(subsystem.as_str()))
    }

    pub fn no_idle() -> Self {
        Self::new("noidle")
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, arg: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in arg.chars() {
        if ch == '"' || ch == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{}", ch)?;
    }
    f.write_str("\"")
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for arg in &self.args {
            f.write_str(" ")?;
            write_quoted(f, arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_command() {
        assert_eq!(Command::status().to_string(), "status");
        assert_eq!(Command::playlist_info(None).to_string(), "playlistinfo");
    }

    #[test]
    fn test_idle_lists_subsystems() {
        let cmd = Command::idle(&[Subsystem::Player, Subsystem::Mixer]);
        assert_eq!(cmd.args, vec!["player".to_string(), "mixer".to_string()]);
        assert_eq!(cmd.to_string(), "idle \"player\" \"mixer\"");
    }

    #[test]
    fn test_arguments_are_escaped() {
        let cmd = Command::new("find").arg("title").arg(r#"say "hi" \o/"#);
        assert_eq!(cmd.to_string(), r#"find "title" "say \"hi\" \\o/""#);
    }

    #[test]
    fn test_range_len() {
        assert_eq!(PlaylistRange::new(2, 5).len(), 3);
        assert!(PlaylistRange::new(5, 2).is_empty());
    }
}
