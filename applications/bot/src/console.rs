//! Console chat transport
//!
//! Reads chat lines of the form `<user>: <message>` and writes the bot's
//! replies, one line per message line. Lines starting with `/` drive the
//! simulated channel and player:
//!
//! ```text
//! /join <user>            user enters the channel
//! /leave <user>           user leaves the channel
//! /members                list the channel members
//! /ended                  the player finished the current track
//! /progress <pos> <len>   player reports position/length in seconds
//! ```

use crate::error::{BotError, Result};
use chorus_commands::{grammar, format, CommandContext, CommandExecutor, GrammarError};
use chorus_playback::QueueEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const REPLY_BUFFER: usize = 64;

/// One chat channel bound to a command executor
pub struct Console {
    executor: Arc<CommandExecutor>,
    prefix: String,
    members: Vec<String>,
    replies: mpsc::Sender<String>,
}

impl Console {
    /// Create a console; replies arrive on the returned receiver
    pub fn new(
        executor: Arc<CommandExecutor>,
        prefix: impl Into<String>,
        members: Vec<String>,
    ) -> (Self, mpsc::Receiver<String>) {
        let (replies, receiver) = mpsc::channel(REPLY_BUFFER);
        let console = Self {
            executor,
            prefix: prefix.into(),
            members,
            replies,
        };
        (console, receiver)
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Handle one input line
    ///
    /// Chat commands run on their own task, which is returned. Control lines
    /// and replies to malformed input are handled before returning.
    pub async fn handle_line(&mut self, line: &str) -> Option<JoinHandle<()>> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if let Some(control) = line.strip_prefix('/') {
            self.control(control).await;
            return None;
        }

        let Some((user, message)) = line.split_once(':') else {
            self.reply(format!("Expected '<user>: <message>', got '{line}'"))
                .await;
            return None;
        };
        let user = user.trim().to_string();

        let command = match grammar::parse(message, &self.prefix) {
            Ok(command) => command,
            Err(GrammarError::NotACommand) => return None,
            Err(e) => {
                self.reply(format!("@{user} {e}")).await;
                return None;
            }
        };

        let ctx = CommandContext::new(user, self.members.clone());
        let executor = Arc::clone(&self.executor);
        let replies = self.replies.clone();
        Some(tokio::spawn(async move {
            let outcome = executor.execute(&command, &ctx).await;
            for event in executor.drain_events().await {
                debug!(?event, "Queue event");
            }
            let marker = if outcome.success { "" } else { "(!) " };
            let text = format!("@{} {marker}{}", ctx.user, outcome.message);
            if replies.send(text).await.is_err() {
                warn!("Reply dropped, console closed");
            }
        }))
    }

    async fn control(&mut self, control: &str) {
        let mut words = control.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some("join"), Some(user), None) => {
                if !self.members.iter().any(|m| m == user) {
                    self.members.push(user.to_string());
                }
                info!(user, "Member joined");
                self.reply(format!("* {user} joined")).await;
            }
            (Some("leave"), Some(user), None) => {
                self.members.retain(|m| m != user);
                info!(user, "Member left");
                self.reply(format!("* {user} left")).await;
            }
            (Some("members"), None, None) => {
                let text = format!("* members: {}", self.members.join(", "));
                self.reply(text).await;
            }
            (Some("ended"), None, None) => {
                self.executor.track_ended().await;
                self.announce().await;
            }
            (Some("progress"), Some(position), Some(length)) => {
                match (position.parse::<u64>(), length.parse::<u64>()) {
                    (Ok(position), Ok(length)) => {
                        self.executor
                            .update_progress(
                                Duration::from_secs(position),
                                Duration::from_secs(length),
                            )
                            .await;
                    }
                    _ => self.reply("Usage: /progress <seconds> <seconds>").await,
                }
            }
            _ => self.reply(format!("Unknown control line: /{control}")).await,
        }
    }

    /// Post what the player did on its own
    async fn announce(&self) {
        for event in self.executor.drain_events().await {
            match event {
                QueueEvent::TrackStarted { track } => {
                    self.reply(format!("Now playing: {}", format::track_line(&track)))
                        .await;
                }
                QueueEvent::StateChanged { state } => debug!(%state, "Player state"),
                QueueEvent::TrackEnded { .. } | QueueEvent::QueueCleared => {}
            }
        }
        if self.executor.state().queue.read().await.now_playing().is_none() {
            self.reply("Queue finished").await;
        }
    }

    async fn reply(&self, text: impl Into<String>) {
        if self.replies.send(text.into()).await.is_err() {
            warn!("Reply dropped, console closed");
        }
    }
}

/// Run the console until `reader` is exhausted
///
/// Waits for every spawned command before returning the writer.
pub async fn run<R, W>(
    mut console: Console,
    replies: mpsc::Receiver<String>,
    reader: R,
    writer: W,
) -> Result<W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let writer_task = tokio::spawn(write_replies(replies, writer));

    let mut pending: Vec<JoinHandle<()>> = Vec::new();
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        pending.retain(|task| !task.is_finished());
        if let Some(task) = console.handle_line(&line).await {
            pending.push(task);
        }
    }

    for task in pending {
        if let Err(e) = task.await {
            warn!(error = %e, "Command task failed");
        }
    }
    drop(console);

    let writer = writer_task
        .await
        .map_err(|e| BotError::Io(std::io::Error::other(e)))??;
    Ok(writer)
}

async fn write_replies<W>(mut replies: mpsc::Receiver<String>, mut writer: W) -> Result<W>
where
    W: AsyncWrite + Unpin,
{
    while let Some(reply) = replies.recv().await {
        for line in reply.lines() {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
        writer.flush().await?;
    }
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chorus_commands::{BotSettings, BotState};
    use chorus_resolver::{LinkResolver, ServiceRegistry};

    fn console(members: &[&str]) -> (Console, mpsc::Receiver<String>) {
        let resolver = LinkResolver::new(ServiceRegistry::new());
        let state = Arc::new(BotState::new(resolver, BotSettings::default()));
        let executor = Arc::new(CommandExecutor::new(state));
        Console::new(
            executor,
            "%",
            members.iter().map(|m| (*m).to_string()).collect(),
        )
    }

    #[tokio::test]
    async fn join_and_leave_update_members() {
        let (mut console, mut replies) = console(&["alice"]);

        assert!(console.handle_line("/join bob").await.is_none());
        assert!(console.handle_line("/join bob").await.is_none());
        assert_eq!(console.members(), ["alice", "bob"]);

        console.handle_line("/leave alice").await;
        assert_eq!(console.members(), ["bob"]);

        assert_eq!(replies.recv().await.unwrap(), "* bob joined");
    }

    #[tokio::test]
    async fn chatter_is_ignored_and_bad_commands_answered() {
        let (mut console, mut replies) = console(&["alice"]);

        assert!(console.handle_line("alice: hello there").await.is_none());
        assert!(console.handle_line("alice: %dance").await.is_none());
        assert_eq!(
            replies.recv().await.unwrap(),
            "@alice Unknown command: dance"
        );
    }

    #[tokio::test]
    async fn commands_run_on_tasks() {
        let (mut console, mut replies) = console(&["alice"]);

        let task = console.handle_line("alice: %queue-shuffle").await.unwrap();
        task.await.unwrap();
        let reply = replies.recv().await.unwrap();
        assert!(reply.starts_with("@alice (!) "), "{reply}");
    }
}
