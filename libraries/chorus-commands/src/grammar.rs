//! Command grammar
//!
//! A chat line is `<prefix><command> [flags] [links or queries]`. Flags come
//! from a fixed table and may be interleaved with the link tokens; the
//! remaining tokens are re-joined and split on commas into a batch.
//!
//! ```text
//! %queue-add -s -l 10 https://open.spotify.com/playlist/x, sp track daft punk
//!  ^^^^^^^^^ ^^^^^^^^ ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^  ^^^^^^^^^^^^^^^^^^
//!  command    flags    batch item 1                          batch item 2
//! ```

use chorus_core::FetchScope;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Grammar errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarError {
    /// The line does not start with the command prefix
    #[error("Not a command")]
    NotACommand,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Unknown flag: {0}")]
    UnknownFlag(String),

    #[error("Flag {0} needs a value")]
    MissingValue(String),

    #[error("Invalid value for {flag}: {value}")]
    InvalidValue { flag: String, value: String },
}

/// Recognized commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    Help,
    QueueAdd,
    QueuePlayNext,
    QueuePlay,
    QueueList,
    QueueDelete,
    QueueClear,
    QueueShuffle,
    QueueSkip,
    QueueVoteSkip,
    QueueMove,
    QueueStop,
    QueueStatus,
    QueueNowPlaying,
    QueuePause,
    QueueResume,
    Search,
    Info,
}

impl CommandName {
    pub const ALL: [CommandName; 18] = [
        Self::Help,
        Self::QueueAdd,
        Self::QueuePlayNext,
        Self::QueuePlay,
        Self::QueueList,
        Self::QueueDelete,
        Self::QueueClear,
        Self::QueueShuffle,
        Self::QueueSkip,
        Self::QueueVoteSkip,
        Self::QueueMove,
        Self::QueueStop,
        Self::QueueStatus,
        Self::QueueNowPlaying,
        Self::QueuePause,
        Self::QueueResume,
        Self::Search,
        Self::Info,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::QueueAdd => "queue-add",
            Self::QueuePlayNext => "queue-playnext",
            Self::QueuePlay => "queue-play",
            Self::QueueList => "queue-list",
            Self::QueueDelete => "queue-delete",
            Self::QueueClear => "queue-clear",
            Self::QueueShuffle => "queue-shuffle",
            Self::QueueSkip => "queue-skip",
            Self::QueueVoteSkip => "queue-voteskip",
            Self::QueueMove => "queue-move",
            Self::QueueStop => "queue-stop",
            Self::QueueStatus => "queue-status",
            Self::QueueNowPlaying => "queue-nowplaying",
            Self::QueuePause => "queue-pause",
            Self::QueueResume => "queue-resume",
            Self::Search => "search",
            Self::Info => "info",
        }
    }

    /// Argument synopsis shown by `help <command>`
    pub fn usage(self) -> &'static str {
        match self {
            Self::Help => "[command]",
            Self::QueueAdd | Self::QueuePlayNext => "[-s] [-r] [-t|-P] [-l N] [-p N] <link>[, <link>...]",
            Self::QueuePlay => "[-s] [-r] [-t|-P] [-l N] [<link>[, <link>...]]",
            Self::QueueList => "[-l N]",
            Self::QueueDelete => "[-a|-f] [-A] [-t|-P] <link or positions>[, ...]",
            Self::QueueClear => "[queue|cache|all]",
            Self::QueueMove => "[-a|-f] -p N <link or positions>",
            Self::Search => "[-l N] <sp|sc|yt|bc|am> <type> <text>",
            Self::Info => "<link>",
            Self::QueueShuffle
            | Self::QueueSkip
            | Self::QueueVoteSkip
            | Self::QueueStop
            | Self::QueueStatus
            | Self::QueueNowPlaying
            | Self::QueuePause
            | Self::QueueResume => "",
        }
    }

    /// One-line description shown by `help`
    pub fn summary(self) -> &'static str {
        match self {
            Self::Help => "List commands or show usage of one",
            Self::QueueAdd => "Add tracks to the end of the queue",
            Self::QueuePlayNext => "Add tracks to play after the current one",
            Self::QueuePlay => "Add tracks, then start or resume playback",
            Self::QueueList => "Show the upcoming tracks",
            Self::QueueDelete => "Remove tracks from the queue",
            Self::QueueClear => "Empty the queue and/or the track cache",
            Self::QueueShuffle => "Shuffle the queue",
            Self::QueueSkip => "Skip the current track",
            Self::QueueVoteSkip => "Vote to skip the current track",
            Self::QueueMove => "Move tracks to another position",
            Self::QueueStop => "Stop playback",
            Self::QueueStatus => "Show player state and queue length",
            Self::QueueNowPlaying => "Show the current track",
            Self::QueuePause => "Pause playback",
            Self::QueueResume => "Resume playback",
            Self::Search => "Search a service",
            Self::Info => "Show details of a link",
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandName {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == lower)
            .ok_or_else(|| GrammarError::UnknownCommand(s.to_string()))
    }
}

/// Options collected from the flag tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandFlags {
    /// `-s`: shuffle the added tracks
    pub shuffle: bool,
    /// `-l N`/`--limit N`: maximum tracks per collection (0 = unlimited)
    pub limit: Option<usize>,
    /// `-t` (tracks, default) or `-P` (playlists) of a user/artist/channel
    pub scope: FetchScope,
    /// `-p N`/`--position N`: insertion or move target
    pub position: Option<i64>,
    /// `-r`: reverse collection order
    pub reverse: bool,
    /// `-a`/`--all`: act on every duplicate match
    pub all: bool,
    /// `-A`/`--all-artist-tracks`: delete every queued track by the same artist
    pub all_artist_tracks: bool,
    /// `-f`/`--first`: act on the earliest duplicate match only
    pub first: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagEffect {
    Shuffle,
    Limit,
    TracksOnly,
    PlaylistsOnly,
    Position,
    Reverse,
    All,
    AllArtistTracks,
    First,
}

struct FlagSpec {
    short: char,
    long: Option<&'static str>,
    takes_value: bool,
    effect: FlagEffect,
}

const FLAGS: &[FlagSpec] = &[
    FlagSpec { short: 's', long: Some("shuffle"), takes_value: false, effect: FlagEffect::Shuffle },
    FlagSpec { short: 'l', long: Some("limit"), takes_value: true, effect: FlagEffect::Limit },
    FlagSpec { short: 't', long: Some("tracks"), takes_value: false, effect: FlagEffect::TracksOnly },
    FlagSpec { short: 'P', long: Some("playlists"), takes_value: false, effect: FlagEffect::PlaylistsOnly },
    FlagSpec { short: 'p', long: Some("position"), takes_value: true, effect: FlagEffect::Position },
    FlagSpec { short: 'r', long: Some("reverse"), takes_value: false, effect: FlagEffect::Reverse },
    FlagSpec { short: 'a', long: Some("all"), takes_value: false, effect: FlagEffect::All },
    FlagSpec { short: 'A', long: Some("all-artist-tracks"), takes_value: false, effect: FlagEffect::AllArtistTracks },
    FlagSpec { short: 'f', long: Some("first"), takes_value: false, effect: FlagEffect::First },
];

impl FlagSpec {
    fn lookup(token: &str) -> Option<&'static FlagSpec> {
        if let Some(long) = token.strip_prefix("--") {
            return FLAGS.iter().find(|f| f.long == Some(long));
        }
        let mut chars = token.strip_prefix('-')?.chars();
        let short = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        FLAGS.iter().find(|f| f.short == short)
    }
}

impl CommandFlags {
    fn apply(&mut self, spec: &FlagSpec, flag: &str, value: Option<&str>) -> Result<(), GrammarError> {
        let invalid = |value: &str| GrammarError::InvalidValue {
            flag: flag.to_string(),
            value: value.to_string(),
        };
        match spec.effect {
            FlagEffect::Shuffle => self.shuffle = true,
            FlagEffect::TracksOnly => self.scope = FetchScope::Tracks,
            FlagEffect::PlaylistsOnly => self.scope = FetchScope::Playlists,
            FlagEffect::Reverse => self.reverse = true,
            FlagEffect::All => self.all = true,
            FlagEffect::AllArtistTracks => self.all_artist_tracks = true,
            FlagEffect::First => self.first = true,
            FlagEffect::Limit => {
                let value = value.ok_or_else(|| GrammarError::MissingValue(flag.to_string()))?;
                self.limit = Some(value.parse().map_err(|_| invalid(value))?);
            }
            FlagEffect::Position => {
                let value = value.ok_or_else(|| GrammarError::MissingValue(flag.to_string()))?;
                self.position = Some(value.parse().map_err(|_| invalid(value))?);
            }
        }
        Ok(())
    }
}

/// A tokenized command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: CommandName,
    pub flags: CommandFlags,
    /// Comma-separated batch items, trimmed, chat url tags removed
    pub args: Vec<String>,
}

impl ParsedCommand {
    pub fn new(name: CommandName) -> Self {
        Self {
            name,
            flags: CommandFlags::default(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: CommandFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Parse a chat line starting with `prefix`
pub fn parse(line: &str, prefix: &str) -> Result<ParsedCommand, GrammarError> {
    let body = line
        .trim()
        .strip_prefix(prefix)
        .ok_or(GrammarError::NotACommand)?;
    let mut tokens = tokenize(body).into_iter();
    let name: CommandName = tokens.next().ok_or(GrammarError::NotACommand)?.parse()?;

    let mut flags = CommandFlags::default();
    let mut rest: Vec<String> = Vec::new();
    while let Some(token) = tokens.next() {
        if !looks_like_flag(&token) {
            rest.push(token);
            continue;
        }
        let (flag, inline) = match token.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (token.clone(), None),
        };
        let spec = FlagSpec::lookup(&flag).ok_or_else(|| GrammarError::UnknownFlag(flag.clone()))?;
        let value = if spec.takes_value {
            inline.or_else(|| tokens.next())
        } else {
            None
        };
        flags.apply(spec, &flag, value.as_deref())?;
    }

    Ok(ParsedCommand {
        name,
        flags,
        args: split_batch(&rest.join(" ")),
    })
}

/// Split on whitespace, dropping `[URL]` chat tags
pub fn tokenize(text: &str) -> Vec<String> {
    strip_url_tags(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Comma-separated batch items
pub fn split_batch(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_url_tags(text: &str) -> String {
    ["[URL]", "[/URL]", "[url]", "[/url]"]
        .iter()
        .fold(text.to_string(), |acc, tag| acc.replace(tag, ""))
}

/// `-x`, `--word`; a bare `-` or a negative number is not a flag
fn looks_like_flag(token: &str) -> bool {
    token.len() > 1
        && token.starts_with('-')
        && !token[1..].starts_with(|c: char| c.is_ascii_digit())
}
