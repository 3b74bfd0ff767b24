//! 画面全体で共有するクエリキャッシュ
//!
//! `QueryCache` の世代番号をシグナルに写し、無効化されたら購読側のエフェクトが再取得する。

use leptos::prelude::*;
use patient_records_common::QueryCache;

#[derive(Clone)]
pub struct QueryClient {
    pub cache: QueryCache,
    epoch: RwSignal<u64>,
}

impl QueryClient {
    pub fn new() -> Self {
        Self {
            cache: QueryCache::new(),
            epoch: RwSignal::new(0),
        }
    }

    /// キャッシュ側で無効化されたキーを画面へ知らせる
    pub fn sync(&self, key: &str) {
        let generation = self.cache.generation(key);
        if self.epoch.get_untracked() != generation {
            self.epoch.set(generation);
        }
    }

    /// 無効化のたびに変わる値（エフェクト内で読むと購読になる）
    pub fn epoch(&self) -> u64 {
        self.epoch.get()
    }
}

pub fn provide_query_client() -> QueryClient {
    let client = QueryClient::new();
    provide_context(client.clone());
    client
}

pub fn use_query_client() -> QueryClient {
    expect_context::<QueryClient>()
}
