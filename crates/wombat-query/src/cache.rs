//! Process-wide compile cache.
//!
//! Keyed by the raw selector text and the configuration it was compiled
//! under. Entries are only ever inserted; [`clear_cache`] drops them all.
//! Failed compilations are not cached.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use crate::config::QueryConfig;
use crate::error::QueryError;
use crate::pseudo::with_global_registry;
use crate::selector::{SelectorList, compile_with_registry};

type CacheKey = (String, QueryConfig);

static CACHE: LazyLock<RwLock<HashMap<CacheKey, Arc<SelectorList>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Compile `text` under `config`, reusing an earlier compilation of the same
/// pair when there is one.
///
/// # Errors
///
/// Whatever [`compile_with`](crate::compile_with) reports.
pub fn compile_cached(text: &str, config: &QueryConfig) -> Result<Arc<SelectorList>, QueryError> {
    let key = (text.to_string(), config.clone());
    if let Some(list) = CACHE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Ok(Arc::clone(list));
    }

    // The registry stays read-locked until the entry is stored, so a
    // concurrent registration either precedes this compile or clears it.
    with_global_registry(|registry| {
        let list = Arc::new(compile_with_registry(text, config, registry)?);
        let mut cache = CACHE.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(key).or_insert(list)))
    })
}

/// Drop every cached compilation.
pub fn clear_cache() {
    CACHE.write().unwrap_or_else(PoisonError::into_inner).clear();
}

/// Number of cached compilations.
pub fn cached_len() -> usize {
    CACHE.read().unwrap_or_else(PoisonError::into_inner).len()
}
