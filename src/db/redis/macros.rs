/// Read-through caching against Redis.
///
/// Returns the cached value for `$key` when present. Otherwise awaits
/// `$block`, queues the result for a background write with `$ttl` seconds to
/// live, and returns it. A failed lookup (Redis down, unreadable value) is
/// logged and treated as a miss. Errors from the block are propagated with
/// `?`, so failed computations are never cached.
///
/// # Arguments
/// * `$cache`: a [`Cache`](crate::db::Cache) (or reference to one).
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) to read and write.
/// * `$ttl`: time-to-live of the stored value in seconds.
/// * `$block`: a future producing `AppResult<T>` on a cache miss.
///
/// # Example
/// ```rust,ignore
/// let movies: Vec<Movie> = cached!(cache, key, 3600, fetch_page(path, params))?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache.get_from_cache(&$key).await {
            Ok(Some(cached)) => Ok(cached),
            lookup => {
                if let Err(e) = lookup {
                    tracing::warn!(error = %e, key = %$key, "Cache lookup failed, reading through");
                }
                let value = $block.await?;
                $cache.set_in_background(&$key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
