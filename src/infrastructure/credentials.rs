//! 凭证存储 - 基础设施层
//!
//! 以注入的方式提供给传输层和错误分类器，不依赖全局状态

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

pub const ACCESS_TOKEN: &str = "access_token";
pub const REFRESH_TOKEN: &str = "refresh_token";
pub const USER_INFO: &str = "userInfo";

/// 凭证存储能力
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: String);

    fn remove(&self, key: &str);

    /// 清空全部本地凭证
    fn clear(&self);
}

/// 进程内凭证存储
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用已有的令牌创建
    pub fn with_tokens(access_token: Option<String>, refresh_token: Option<String>) -> Self {
        let store = Self::new();
        if let Some(token) = access_token {
            store.set(ACCESS_TOKEN, token);
        }
        if let Some(token) = refresh_token {
            store.set(REFRESH_TOKEN, token);
        }
        store
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().map(|e| e.is_empty()).unwrap_or(true)
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), value);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }

    fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            debug!("清空本地凭证 ({} 项)", entries.len());
            entries.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_purges_every_key() {
        let store = MemoryCredentialStore::with_tokens(Some("a".into()), Some("r".into()));
        store.set(USER_INFO, "{}".into());
        assert_eq!(store.get(ACCESS_TOKEN).as_deref(), Some("a"));

        store.clear();
        assert!(store.is_empty());
        assert!(store.get(REFRESH_TOKEN).is_none());
    }

    #[test]
    fn remove_only_touches_one_key() {
        let store = MemoryCredentialStore::with_tokens(Some("a".into()), Some("r".into()));
        store.remove(ACCESS_TOKEN);
        assert!(store.get(ACCESS_TOKEN).is_none());
        assert_eq!(store.get(REFRESH_TOKEN).as_deref(), Some("r"));
    }
}
