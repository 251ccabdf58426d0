//! Process-wide cache of resolved kernels

use log::debug;
use std::collections::HashMap;
use std::mem::Discriminant;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};

use super::kernels::{resolve, Kernel};
use crate::core::dtype::Dtype;
use crate::groupby::ReducerKind;

type CacheKey = (Discriminant<ReducerKind>, Dtype);

/// Kernel lookups keyed by reducer kind and column dtype
struct KernelCache {
    kernels: Mutex<HashMap<CacheKey, Option<Kernel>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Kernel cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to resolve a kernel
    pub misses: u64,
    /// Cached `(reducer, dtype)` combinations
    pub entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

static KERNEL_CACHE: OnceLock<KernelCache> = OnceLock::new();

fn cache() -> &'static KernelCache {
    KERNEL_CACHE.get_or_init(|| KernelCache {
        kernels: Mutex::new(HashMap::new()),
        hits: AtomicU64::new(0),
        misses: AtomicU64::new(0),
    })
}

impl KernelCache {
    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, Option<Kernel>>> {
        // Entries are plain fn pointers, a poisoned map is still consistent
        self.kernels.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Kernel for `kind` over `dtype`, through the cache when `use_cache` is set
pub(crate) fn lookup(kind: &ReducerKind, dtype: Dtype, use_cache: bool) -> Option<Kernel> {
    if !use_cache {
        return resolve(kind, dtype);
    }
    let cache = cache();
    let key = (std::mem::discriminant(kind), dtype);
    let mut entries = cache.entries();
    if let Some(kernel) = entries.get(&key) {
        cache.hits.fetch_add(1, Ordering::Relaxed);
        return *kernel;
    }
    cache.misses.fetch_add(1, Ordering::Relaxed);
    let kernel = resolve(kind, dtype);
    debug!(
        "kernel cache miss for {} over {}: {}",
        kind.name(),
        dtype,
        if kernel.is_some() { "resolved" } else { "unsupported" }
    );
    entries.insert(key, kernel);
    kernel
}

/// Current kernel cache counters
pub fn kernel_cache_stats() -> CacheStats {
    let cache = cache();
    CacheStats {
        hits: cache.hits.load(Ordering::Relaxed),
        misses: cache.misses.load(Ordering::Relaxed),
        entries: cache.entries().len(),
    }
}

/// Drop all cached kernels and reset the counters
pub fn clear_kernel_cache() {
    let cache = cache();
    cache.entries().clear();
    cache.hits.store(0, Ordering::Relaxed);
    cache.misses.store(0, Ordering::Relaxed);
}
