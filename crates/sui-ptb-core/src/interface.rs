//! Module interface cache.
//!
//! Package interfaces (the function signatures a package exposes) are fetched from a
//! fullnode by the host and stored here keyed by `(package id, network)`. Entries
//! expire after a fixed TTL and can be invalidated explicitly, e.g. after the user
//! republishes a package. The validator reads the cache through [`InterfaceLookup`]
//! to flag Move calls whose arity disagrees with the published signature.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};
use sui_ptb_types::{normalize_address, Network};
use tracing::debug;

/// Shape of one public function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    /// Number of generic type parameters.
    pub type_parameters: usize,
    /// Parameter types as Move type strings, excluding the trailing `&mut TxContext`.
    pub parameters: Vec<String>,
}

/// Functions of a package, grouped by module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInterface {
    pub modules: BTreeMap<String, BTreeMap<String, FunctionSignature>>,
}

impl PackageInterface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_function(
        mut self,
        module: impl Into<String>,
        function: impl Into<String>,
        signature: FunctionSignature,
    ) -> Self {
        self.modules
            .entry(module.into())
            .or_default()
            .insert(function.into(), signature);
        self
    }

    pub fn function(&self, module: &str, function: &str) -> Option<&FunctionSignature> {
        self.modules.get(module)?.get(function)
    }
}

/// Read access to known function signatures.
pub trait InterfaceLookup {
    fn function(&self, package: &str, module: &str, function: &str) -> Option<FunctionSignature>;
}

struct CacheEntry {
    interface: Arc<PackageInterface>,
    inserted_at: Instant,
}

/// TTL cache of package interfaces keyed by package id and network.
pub struct ModuleInterfaceCache {
    ttl: Duration,
    entries: HashMap<(String, Network), CacheEntry>,
}

impl ModuleInterfaceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn insert(&mut self, package: &str, network: Network, interface: PackageInterface) {
        self.insert_at(package, network, interface, Instant::now());
    }

    pub fn insert_at(
        &mut self,
        package: &str,
        network: Network,
        interface: PackageInterface,
        now: Instant,
    ) {
        let key = (normalize_address(package), network);
        debug!(package = %key.0, network = %network, "cache package interface");
        self.entries.insert(
            key,
            CacheEntry {
                interface: Arc::new(interface),
                inserted_at: now,
            },
        );
    }

    pub fn get(&mut self, package: &str, network: Network) -> Option<Arc<PackageInterface>> {
        self.get_at(package, network, Instant::now())
    }

    /// Look up a live entry; an expired entry is dropped and reported as a miss.
    pub fn get_at(
        &mut self,
        package: &str,
        network: Network,
        now: Instant,
    ) -> Option<Arc<PackageInterface>> {
        let key = (normalize_address(package), network);
        let expired = {
            let entry = self.entries.get(&key)?;
            now.saturating_duration_since(entry.inserted_at) >= self.ttl
        };
        if expired {
            debug!(package = %key.0, network = %network, "package interface expired");
            self.entries.remove(&key);
            return None;
        }
        self.entries.get(&key).map(|e| Arc::clone(&e.interface))
    }

    /// Drop one package's entry. Returns whether anything was cached.
    pub fn invalidate(&mut self, package: &str, network: Network) -> bool {
        let key = (normalize_address(package), network);
        let removed = self.entries.remove(&key).is_some();
        if removed {
            debug!(package = %key.0, network = %network, "invalidated package interface");
        }
        removed
    }

    /// Drop every entry for `network`.
    pub fn invalidate_network(&mut self, network: Network) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, n), _| *n != network);
        let removed = before - self.entries.len();
        debug!(network = %network, removed, "invalidated network interfaces");
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove expired entries, returning how many were dropped.
    pub fn purge_expired_at(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.inserted_at) < ttl);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, "purged expired package interfaces");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-only view of the entries live on `network` right now.
    pub fn view(&self, network: Network) -> CachedInterfaces<'_> {
        self.view_at(network, Instant::now())
    }

    pub fn view_at(&self, network: Network, now: Instant) -> CachedInterfaces<'_> {
        CachedInterfaces {
            cache: self,
            network,
            now,
        }
    }
}

/// A cache view bound to one network and instant.
pub struct CachedInterfaces<'a> {
    cache: &'a ModuleInterfaceCache,
    network: Network,
    now: Instant,
}

impl InterfaceLookup for CachedInterfaces<'_> {
    fn function(&self, package: &str, module: &str, function: &str) -> Option<FunctionSignature> {
        let key = (normalize_address(package), self.network);
        let entry = self.cache.entries.get(&key)?;
        if self.now.saturating_duration_since(entry.inserted_at) >= self.cache.ttl {
            return None;
        }
        entry.interface.function(module, function).cloned()
    }
}

impl InterfaceLookup for PackageInterface {
    fn function(&self, _package: &str, module: &str, function: &str) -> Option<FunctionSignature> {
        PackageInterface::function(self, module, function).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin_interface() -> PackageInterface {
        PackageInterface::new().with_function(
            "coin",
            "split",
            FunctionSignature {
                type_parameters: 1,
                parameters: vec!["&mut 0x2::coin::Coin<T0>".into(), "u64".into()],
            },
        )
    }

    #[test]
    fn test_get_normalizes_package_id() {
        let mut cache = ModuleInterfaceCache::new(Duration::from_secs(60));
        cache.insert("0x2", Network::Testnet, coin_interface());
        let full = format!("0x{:0>64}", "2");
        assert!(cache.get(&full, Network::Testnet).is_some());
        assert!(cache.get("0x2", Network::Mainnet).is_none());
    }

    #[test]
    fn test_entries_expire() {
        let mut cache = ModuleInterfaceCache::new(Duration::from_secs(10));
        let start = Instant::now();
        cache.insert_at("0x2", Network::Testnet, coin_interface(), start);

        assert!(cache
            .get_at("0x2", Network::Testnet, start + Duration::from_secs(9))
            .is_some());
        assert!(cache
            .get_at("0x2", Network::Testnet, start + Duration::from_secs(10))
            .is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidation() {
        let mut cache = ModuleInterfaceCache::new(Duration::from_secs(60));
        cache.insert("0x2", Network::Testnet, coin_interface());
        cache.insert("0x3", Network::Testnet, coin_interface());
        cache.insert("0x2", Network::Devnet, coin_interface());

        assert!(cache.invalidate("0x2", Network::Testnet));
        assert!(!cache.invalidate("0x2", Network::Testnet));
        assert_eq!(cache.invalidate_network(Network::Testnet), 1);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let mut cache = ModuleInterfaceCache::new(Duration::from_secs(10));
        let start = Instant::now();
        cache.insert_at("0x2", Network::Testnet, coin_interface(), start);
        cache.insert_at(
            "0x3",
            Network::Testnet,
            coin_interface(),
            start + Duration::from_secs(5),
        );
        assert_eq!(cache.purge_expired_at(start + Duration::from_secs(12)), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_view_lookup() {
        let mut cache = ModuleInterfaceCache::new(Duration::from_secs(10));
        let start = Instant::now();
        cache.insert_at("0x2", Network::Testnet, coin_interface(), start);

        let view = cache.view_at(Network::Testnet, start);
        let sig = view.function("0x2", "coin", "split").unwrap();
        assert_eq!(sig.parameters.len(), 2);
        assert!(view.function("0x2", "coin", "join").is_none());

        let later = cache.view_at(Network::Testnet, start + Duration::from_secs(11));
        assert!(later.function("0x2", "coin", "split").is_none());
    }
}
