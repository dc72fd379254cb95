//! Chorus bot host
//!
//! Wires configuration, the Odesli-backed service adapters and the command
//! executor together, and runs the console chat transport.

pub mod config;
pub mod console;
pub mod error;
pub mod odesli;

use chorus_commands::{BotState, CommandExecutor};
use chorus_core::ServiceType;
use chorus_resolver::{LinkResolver, ServiceRegistry};
use crate::config::BotConfig;
use crate::error::Result;
use crate::odesli::{LookupAdapter, OdesliAdapter, OdesliClient};
use std::sync::Arc;
use std::time::Duration;

/// Registry with the aggregator adapter and one lookup adapter per playable service
pub fn build_registry(config: &BotConfig) -> Result<ServiceRegistry> {
    let client = Arc::new(OdesliClient::new(
        config.odesli.api_url.clone(),
        Duration::from_secs(config.odesli.timeout_secs),
    )?);

    let mut registry =
        ServiceRegistry::new().with(Arc::new(OdesliAdapter::new(Arc::clone(&client))));
    for service in ServiceType::PLAYABLE {
        registry.register(Arc::new(LookupAdapter::new(Arc::clone(&client), service)));
    }
    Ok(registry)
}

/// Executor over fresh bot state
pub fn build_executor(config: &BotConfig) -> Result<CommandExecutor> {
    let resolver =
        LinkResolver::with_priority(build_registry(config)?, config.mirror_priority()?);
    let state = Arc::new(BotState::new(resolver, config.executor_settings()));
    Ok(CommandExecutor::new(state))
}
