//! Tool Registry
//!
//! The [`ToolRegistry`] aggregates tool providers and implements
//! [`ToolSessionPort`]. It owns the session's provider connections, builds
//! the namespaced [`ToolCatalog`], and routes invocations.
//!
//! # Usage
//!
//! ```ignore
//! let mut registry = ToolRegistry::new()
//!     .register(McpServerProvider::new(files_config))
//!     .register(LocalInsightsProvider::new());
//!
//! let report = registry.discover().await?;
//! let text = registry.invoke("files__read", &args).await?;
//! registry.shutdown().await;
//! ```
//!
//! # Discovery
//!
//! 1. Every provider is listed concurrently; results are merged in
//!    registration order, so the catalog order is stable
//! 2. Each operation is exposed as `<provider>__<operation>`
//! 3. A qualified name already taken keeps its first owner; the duplicate is
//!    noted in the [`DiscoveryReport`]
//! 4. Unreachable providers are reported, never silently dropped

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use conductor_application::ports::tool_invoker::{InvokeError, ToolInvokerPort, ToolSessionPort};
use conductor_domain::{
    ArgumentSchema, DiscoveryError, DiscoveryReport, ProviderError, ToolCatalog, ToolDescriptor,
    ToolProvider, flatten_segments,
};
use futures::future::join_all;
use serde_json::{Map, Value};

/// Tool registry that aggregates multiple providers
pub struct ToolRegistry {
    /// Registered providers, in registration order
    providers: Vec<Arc<dyn ToolProvider>>,
    /// Tools found by the last discovery
    catalog: ToolCatalog,
    /// Qualified name -> index into `providers`
    routes: HashMap<String, usize>,
    /// Per-call deadline; `None` waits indefinitely
    tool_timeout: Option<Duration>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            catalog: ToolCatalog::new(),
            routes: HashMap::new(),
            tool_timeout: None,
        }
    }

    /// Register a tool provider
    pub fn register<P: ToolProvider + 'static>(self, provider: P) -> Self {
        self.register_arc(Arc::new(provider))
    }

    /// Register a tool provider (Arc version)
    pub fn register_arc(mut self, provider: Arc<dyn ToolProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.tool_timeout = timeout;
        self
    }

    /// Get a list of registered provider IDs
    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    fn provider_for(&self, qualified_name: &str) -> Option<&Arc<dyn ToolProvider>> {
        self.routes.get(qualified_name).map(|&i| &self.providers[i])
    }

    async fn call_provider(
        &self,
        provider: &Arc<dyn ToolProvider>,
        descriptor: &ToolDescriptor,
        arguments: &Map<String, Value>,
    ) -> Result<String, ProviderError> {
        let call = provider.call(descriptor.local_name(), arguments);
        let segments = match self.tool_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ProviderError::Timeout(limit))??,
            None => call.await?,
        };
        Ok(flatten_segments(&segments))
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolInvokerPort for ToolRegistry {
    fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    async fn invoke(
        &self,
        qualified_name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<String, InvokeError> {
        let (Some(provider), Some(descriptor)) = (
            self.provider_for(qualified_name),
            self.catalog.get(qualified_name),
        ) else {
            return Err(InvokeError::UnknownTool(qualified_name.to_string()));
        };

        tracing::debug!(
            tool = qualified_name,
            provider = provider.id(),
            "Invoking tool"
        );

        self.call_provider(provider, descriptor, arguments)
            .await
            .map_err(|e| {
                tracing::warn!(tool = qualified_name, error = %e, "Tool call failed");
                InvokeError::Execution(e.to_string())
            })
    }
}

#[async_trait]
impl ToolSessionPort for ToolRegistry {
    async fn discover(&mut self) -> Result<DiscoveryReport, DiscoveryError> {
        if self.providers.is_empty() {
            return Err(DiscoveryError::NoProviders);
        }

        let listings = join_all(self.providers.iter().map(|p| p.list_operations())).await;

        let mut catalog = ToolCatalog::new();
        let mut routes = HashMap::new();
        let mut report = DiscoveryReport::new();

        for (index, (provider, listing)) in self.providers.iter().zip(listings).enumerate() {
            let id = provider.id();
            if id.is_empty() {
                report.unreachable(id, "provider id is empty");
                continue;
            }

            let operations = match listing {
                Ok(operations) => operations,
                Err(e) => {
                    tracing::warn!(provider = id, error = %e, "Provider unreachable");
                    report.unreachable(id, e.to_string());
                    continue;
                }
            };

            let mut registered = 0;
            let mut duplicates = Vec::new();
            for op in operations {
                let descriptor = ToolDescriptor::new(
                    id,
                    op.name,
                    op.description.unwrap_or_default(),
                    ArgumentSchema::from_json(op.input_schema.as_ref()),
                );
                let name = descriptor.qualified_name().to_string();
                if catalog.register(descriptor) {
                    tracing::debug!(tool = %name, provider = id, "Registered tool");
                    routes.insert(name, index);
                    registered += 1;
                } else {
                    tracing::warn!(tool = %name, provider = id, "Duplicate tool name, keeping first");
                    duplicates.push(name);
                }
            }
            report.reachable(id, registered, duplicates);
        }

        self.catalog = catalog;
        self.routes = routes;

        if report.reachable_count() == 0 {
            return Err(DiscoveryError::ProviderUnreachable { report });
        }

        tracing::debug!(
            providers = report.reachable_count(),
            tools = self.catalog.len(),
            "Catalog rebuilt"
        );
        Ok(report)
    }

    async fn shutdown(&mut self) {
        let results = join_all(self.providers.iter().map(|p| p.shutdown())).await;
        for (provider, result) in self.providers.iter().zip(results) {
            if let Err(e) = result {
                tracing::warn!(provider = provider.id(), error = %e, "Provider shutdown failed");
            }
        }
        self.catalog = ToolCatalog::new();
        self.routes.clear();
    }
}
