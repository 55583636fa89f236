use std::sync::Arc;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::AppResult,
    models::Disease,
    services::catalog::CategoryLookup,
};

/// Category lookup that serves the category list from redis.
///
/// Name resolution goes through the default trait method, so it is answered
/// from the cached list as well.
pub struct CachedCategories {
    inner: Arc<dyn CategoryLookup>,
    cache: Cache,
    ttl_secs: u64,
}

impl CachedCategories {
    pub fn new(inner: Arc<dyn CategoryLookup>, cache: Cache, ttl_secs: u64) -> Self {
        Self {
            inner,
            cache,
            ttl_secs,
        }
    }
}

#[async_trait::async_trait]
impl CategoryLookup for CachedCategories {
    async fn list_categories(&self) -> AppResult<Vec<Disease>> {
        cached!(
            self.cache,
            CacheKey::Categories,
            self.ttl_secs,
            self.inner.list_categories()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_redis_client;
    use crate::services::catalog::MockCategoryLookup;
    use redis::AsyncCommands;

    // Requires redis at REDIS_URL
    #[tokio::test]
    #[ignore]
    async fn test_second_listing_is_served_from_cache() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let client = create_redis_client(&redis_url).unwrap();
        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(CacheKey::Categories.to_string()).await.unwrap();
        let (cache, handle) = Cache::new(client);

        let mut inner = MockCategoryLookup::new();
        inner
            .expect_list_categories()
            .times(1)
            .returning(|| Ok(vec![Disease::new(1, "Diabetes")]));

        let cached = CachedCategories::new(Arc::new(inner), cache, 30);
        let first = cached.list_categories().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        let ids = cached
            .resolve_category_ids_by_names(&["diabetes".to_string()])
            .await
            .unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(ids, vec![1]);
        handle.shutdown().await;
    }
}
