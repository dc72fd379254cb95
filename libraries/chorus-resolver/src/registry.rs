//! Adapter lookup by service

use chorus_core::{ChorusError, Result, ServiceAdapter, ServiceType};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Maps each `ServiceType` to the adapter resolving its links
#[derive(Clone, Default)]
pub struct ServiceRegistry {
    adapters: HashMap<ServiceType, Arc<dyn ServiceAdapter>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its own service type
    ///
    /// Returns the adapter it replaced, if any.
    pub fn register(
        &mut self,
        adapter: Arc<dyn ServiceAdapter>,
    ) -> Option<Arc<dyn ServiceAdapter>> {
        let service = adapter.service_type();
        debug!(%service, "Registering service adapter");
        self.adapters.insert(service, adapter)
    }

    /// Builder-style [`register`](Self::register)
    #[must_use]
    pub fn with(mut self, adapter: Arc<dyn ServiceAdapter>) -> Self {
        self.register(adapter);
        self
    }

    /// Adapter for `service`
    ///
    /// # Errors
    /// `ServiceNotRegistered` when no adapter handles the service
    pub fn get(&self, service: ServiceType) -> Result<Arc<dyn ServiceAdapter>> {
        self.adapters
            .get(&service)
            .cloned()
            .ok_or(ChorusError::ServiceNotRegistered(service))
    }

    pub fn contains(&self, service: ServiceType) -> bool {
        self.adapters.contains_key(&service)
    }

    /// Registered services, in a stable order
    pub fn services(&self) -> Vec<ServiceType> {
        let mut services: Vec<ServiceType> = self.adapters.keys().copied().collect();
        services.sort_by_key(|s| s.to_string());
        services
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.services())
            .finish()
    }
}
