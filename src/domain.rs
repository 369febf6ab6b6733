//! Domain metadata lookup.
//!
//! The remote cluster addresses workflows by domain *name*, while replication
//! tasks carry the domain *ID*. [`DomainResolver`] bridges the two.

use crate::error::{BoxFuture, CollaboratorError};
use dashmap::DashMap;

/// Metadata for one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    pub id: String,
    pub name: String,
}

impl DomainEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Resolves domain IDs to domain metadata.
///
/// Shared by concurrent resends; implementations must be thread safe.
/// Unknown IDs should be reported with [`ErrorKind::NotFound`](crate::ErrorKind::NotFound).
pub trait DomainResolver: Send + Sync {
    fn get_domain_by_id(&self, domain_id: &str) -> BoxFuture<'_, DomainEntry>;
}

/// In-memory domain registry.
///
/// Useful for standalone deployments with a fixed domain set, and for tests.
#[derive(Debug, Default)]
pub struct StaticDomainResolver {
    domains: DashMap<String, DomainEntry>,
}

impl StaticDomainResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `(id, name)` pairs.
    pub fn with_domains<I, K, V>(domains: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let resolver = Self::new();
        for (id, name) in domains {
            resolver.register(id, name);
        }
        resolver
    }

    /// Add or replace a domain.
    pub fn register(&self, id: impl Into<String>, name: impl Into<String>) {
        let entry = DomainEntry::new(id, name);
        self.domains.insert(entry.id.clone(), entry);
    }

    pub fn remove(&self, id: &str) -> Option<DomainEntry> {
        self.domains.remove(id).map(|(_, entry)| entry)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl DomainResolver for StaticDomainResolver {
    fn get_domain_by_id(&self, domain_id: &str) -> BoxFuture<'_, DomainEntry> {
        let result = self
            .domains
            .get(domain_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| CollaboratorError::not_found(format!("domain {} not found", domain_id)));
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_static_resolver_lookup() {
        let resolver = StaticDomainResolver::with_domains([("d1", "orders"), ("d2", "billing")]);
        assert_eq!(resolver.len(), 2);

        let entry = resolver.get_domain_by_id("d1").await.unwrap();
        assert_eq!(entry.name, "orders");
        assert_eq!(entry.id, "d1");
    }

    #[tokio::test]
    async fn test_static_resolver_unknown_domain() {
        let resolver = StaticDomainResolver::new();
        assert!(resolver.is_empty());

        let err = resolver.get_domain_by_id("missing").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.contains("missing"));
    }

    #[tokio::test]
    async fn test_static_resolver_register_replaces() {
        let resolver = StaticDomainResolver::new();
        resolver.register("d1", "old-name");
        resolver.register("d1", "new-name");

        assert_eq!(resolver.len(), 1);
        assert_eq!(resolver.get_domain_by_id("d1").await.unwrap().name, "new-name");
    }

    #[tokio::test]
    async fn test_static_resolver_remove() {
        let resolver = StaticDomainResolver::with_domains([("d1", "orders")]);
        let removed = resolver.remove("d1").unwrap();
        assert_eq!(removed.name, "orders");
        assert!(resolver.remove("d1").is_none());
        assert!(resolver.get_domain_by_id("d1").await.is_err());
    }
}
