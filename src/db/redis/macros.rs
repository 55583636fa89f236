/// Read-through caching: returns the cached value for `$key` when present,
/// otherwise awaits `$fetch`, queues the result for storage with `$ttl`
/// seconds to live, and returns it.
///
/// Evaluates to an `AppResult`; cache read errors propagate with `?`.
///
/// ```rust,ignore
/// let categories: Vec<Disease> =
///     cached!(self.cache, CacheKey::Categories, ttl, inner.list_categories())?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $fetch:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await? {
            Some(hit) => {
                tracing::trace!(key = %key, "Cache hit");
                Ok(hit)
            }
            None => {
                tracing::trace!(key = %key, "Cache miss");
                let value = $fetch.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
