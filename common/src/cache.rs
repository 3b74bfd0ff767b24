//! クエリキャッシュ
//!
//! キー（"search" など）とパラメータ（検索文字列）ごとにレスポンスを保持する。
//! 更新系の処理は `invalidate` でキー単位に捨て、世代番号を進める。
//! 読む側は世代番号の変化で再取得を判断する。

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// 名前検索のキャッシュキー
pub const SEARCH_QUERY_KEY: &str = "search";

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<(String, String), serde_json::Value>,
    generations: HashMap<String, u64>,
}

/// 共有キャッシュ（clone しても同じ中身を指す）
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    inner: Arc<RwLock<Inner>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// キャッシュ済みの値を取り出す
    pub fn get<T: DeserializeOwned>(&self, key: &str, param: &str) -> Option<T> {
        let inner = self.inner.read().ok()?;
        let value = inner.entries.get(&(key.to_string(), param.to_string()))?;
        serde_json::from_value(value.clone()).ok()
    }

    /// 値を保存する
    pub fn put<T: Serialize>(&self, key: &str, param: &str, value: &T) {
        let Ok(json) = serde_json::to_value(value) else {
            return;
        };
        if let Ok(mut inner) = self.inner.write() {
            inner.entries.insert((key.to_string(), param.to_string()), json);
        }
    }

    /// キー配下をすべて破棄する
    pub fn invalidate(&self, key: &str) {
        if let Ok(mut inner) = self.inner.write() {
            let before = inner.entries.len();
            inner.entries.retain(|(k, _), _| k != key);
            let removed = before - inner.entries.len();
            *inner.generations.entry(key.to_string()).or_insert(0) += 1;
            tracing::debug!(key, removed, "query cache invalidated");
        }
    }

    /// キーの世代番号（invalidate のたびに増える）
    pub fn generation(&self, key: &str) -> u64 {
        self.inner
            .read()
            .ok()
            .and_then(|inner| inner.generations.get(key).copied())
            .unwrap_or(0)
    }

    /// キー配下の件数
    pub fn len(&self, key: &str) -> usize {
        self.inner
            .read()
            .map(|inner| inner.entries.keys().filter(|(k, _)| k == key).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self, key: &str) -> bool {
        self.len(key) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let cache = QueryCache::new();
        cache.put(SEARCH_QUERY_KEY, "rex", &vec!["a".to_string()]);

        let hit: Option<Vec<String>> = cache.get(SEARCH_QUERY_KEY, "rex");
        assert_eq!(hit, Some(vec!["a".to_string()]));

        let miss: Option<Vec<String>> = cache.get(SEARCH_QUERY_KEY, "mia");
        assert!(miss.is_none());
    }

    #[test]
    fn test_invalidate_only_drops_that_key() {
        let cache = QueryCache::new();
        cache.put(SEARCH_QUERY_KEY, "rex", &1);
        cache.put(SEARCH_QUERY_KEY, "mia", &2);
        cache.put("other", "x", &3);

        cache.invalidate(SEARCH_QUERY_KEY);

        assert!(cache.is_empty(SEARCH_QUERY_KEY));
        assert_eq!(cache.len("other"), 1);
        assert_eq!(cache.generation(SEARCH_QUERY_KEY), 1);
        assert_eq!(cache.generation("other"), 0);
    }

    #[test]
    fn test_clone_shares_state() {
        let cache = QueryCache::new();
        let injected = cache.clone();
        cache.put(SEARCH_QUERY_KEY, "rex", &1);

        injected.invalidate(SEARCH_QUERY_KEY);

        assert!(cache.get::<i32>(SEARCH_QUERY_KEY, "rex").is_none());
        assert_eq!(cache.generation(SEARCH_QUERY_KEY), 1);
    }
}
