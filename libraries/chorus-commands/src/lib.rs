//! Chorus - Chat Commands
//!
//! Parses chat lines into commands and executes them against the shared bot
//! state: link resolution, queue mutation, vote-skip, and reply formatting.
//!
//! # Example
//!
//! ```rust,no_run
//! use chorus_commands::{grammar, BotSettings, BotState, CommandContext, CommandExecutor};
//! use chorus_resolver::{LinkResolver, ServiceRegistry};
//! use std::sync::Arc;
//!
//! # async fn run() {
//! let resolver = LinkResolver::new(ServiceRegistry::new());
//! let state = Arc::new(BotState::new(resolver, BotSettings::default()));
//! let executor = CommandExecutor::new(state);
//!
//! let command = grammar::parse("%queue-status", "%").unwrap();
//! let outcome = executor
//!     .execute(&command, &CommandContext::new("alice", vec!["alice".into()]))
//!     .await;
//! println!("{}", outcome.message);
//! # }
//! ```

pub mod executor;
pub mod format;
pub mod grammar;
mod outcome;
mod state;

pub use executor::{AddRequest, ClearScope, CommandContext, CommandExecutor, MatchPolicy, Selector};
pub use grammar::{parse, CommandFlags, CommandName, GrammarError, ParsedCommand};
pub use outcome::{CommandOutcome, Payload};
pub use state::{BotSettings, BotState};
