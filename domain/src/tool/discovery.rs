//! Discovery outcome per provider

use serde::Serialize;
use thiserror::Error;

/// Whether a configured provider made it into the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProviderStatus {
    Reachable {
        tool_count: usize,
        /// Qualified names dropped because another tool already held them.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        duplicates: Vec<String>,
    },
    Unreachable { reason: String },
}

/// Per-provider result of one discovery pass, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryReport {
    pub providers: Vec<(String, ProviderStatus)>,
}

impl DiscoveryReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reachable(&mut self, provider_id: impl Into<String>, tool_count: usize, duplicates: Vec<String>) {
        self.providers.push((
            provider_id.into(),
            ProviderStatus::Reachable {
                tool_count,
                duplicates,
            },
        ));
    }

    pub fn unreachable(&mut self, provider_id: impl Into<String>, reason: impl Into<String>) {
        self.providers.push((
            provider_id.into(),
            ProviderStatus::Unreachable {
                reason: reason.into(),
            },
        ));
    }

    pub fn reachable_count(&self) -> usize {
        self.providers
            .iter()
            .filter(|(_, s)| matches!(s, ProviderStatus::Reachable { .. }))
            .count()
    }

    /// `(provider id, reason)` for every provider that could not be used.
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.providers
            .iter()
            .filter_map(|(id, status)| match status {
                ProviderStatus::Unreachable { reason } => Some((id.as_str(), reason.as_str())),
                ProviderStatus::Reachable { .. } => None,
            })
            .collect()
    }
}

/// Session-fatal discovery failure.
#[derive(Debug, Clone, Error)]
pub enum DiscoveryError {
    #[error("No tool providers configured")]
    NoProviders,

    #[error("No tool provider reachable ({})", summarize(.report))]
    ProviderUnreachable { report: DiscoveryReport },
}

fn summarize(report: &DiscoveryReport) -> String {
    report
        .failures()
        .iter()
        .map(|(id, reason)| format!("{id}: {reason}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = DiscoveryReport::new();
        report.reachable("files", 3, vec![]);
        report.unreachable("web", "command not found: npx");

        assert_eq!(report.reachable_count(), 1);
        assert_eq!(report.failures(), vec![("web", "command not found: npx")]);
    }

    #[test]
    fn test_unreachable_error_lists_reasons() {
        let mut report = DiscoveryReport::new();
        report.unreachable("files", "spawn failed");
        report.unreachable("web", "handshake timed out");

        let err = DiscoveryError::ProviderUnreachable { report };
        assert_eq!(
            err.to_string(),
            "No tool provider reachable (files: spawn failed; web: handshake timed out)"
        );
    }
}
