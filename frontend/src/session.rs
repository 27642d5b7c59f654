//! 会话存储
//!
//! 会话（token + 用户）同时保存在持久化存储与内存中。
//! token 与 user 总是成对写入、成对清除。

use rateboard_shared::{Role, User};
use thiserror::Error;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// 持久化键值存储的抽象
///
/// 浏览器中由 `web::LocalStorage` 实现，测试中使用内存实现。
pub trait SessionStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn delete(&self, key: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Your browser blocked saving the session. Enable site storage and sign in again.")]
    StorageUnavailable,
}

/// 已认证的身份
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// 内存中的会话状态
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub session: Option<Session>,
    /// 是否仍在从持久化存储恢复
    pub is_loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            session: None,
            is_loading: true,
        }
    }
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| !session.token.is_empty())
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|session| &session.user)
    }

    /// 已认证用户的角色；未认证时为空
    pub fn role(&self) -> Option<Role> {
        if self.is_authenticated() {
            self.user().map(|user| user.role)
        } else {
            None
        }
    }
}

/// 会话的持久化与状态迁移
#[derive(Debug, Clone, Copy)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// 当前持久化的 token，空字符串视为不存在
    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    /// 读取持久化的会话
    ///
    /// 只有 token 与 user 都存在且 user 可解析时才返回会话；
    /// 残缺或损坏的数据会被一并清除。
    pub fn load(&self) -> Option<Session> {
        let token = self.token();
        let raw_user = self.storage.get(USER_KEY);

        match (token, raw_user) {
            (Some(token), Some(raw_user)) => match serde_json::from_str::<User>(&raw_user) {
                Ok(user) => Some(Session { token, user }),
                Err(e) => {
                    log::warn!("[Session] Stored user record is corrupt, clearing: {}", e);
                    self.clear();
                    None
                }
            },
            (None, None) => None,
            _ => {
                log::warn!("[Session] Found half-written session, clearing.");
                self.clear();
                None
            }
        }
    }

    /// 启动时恢复会话，同步完成
    pub fn rehydrate(&self) -> SessionState {
        let session = self.load();
        if let Some(session) = &session {
            log::info!(
                "[Session] Restored session for {} ({})",
                session.user.email,
                session.user.role
            );
        }
        SessionState {
            session,
            is_loading: false,
        }
    }

    /// 写入 token 与 user；任一写入失败则整体回滚
    pub fn persist(&self, session: &Session) -> bool {
        let raw_user = match serde_json::to_string(&session.user) {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("[Session] Failed to serialize user: {}", e);
                return false;
            }
        };
        let saved =
            self.storage.set(TOKEN_KEY, &session.token) && self.storage.set(USER_KEY, &raw_user);
        if !saved {
            log::warn!("[Session] Durable storage unavailable, session not saved.");
            self.clear();
        }
        saved
    }

    /// 清除持久化的会话，可重复调用
    pub fn clear(&self) {
        self.storage.delete(TOKEN_KEY);
        self.storage.delete(USER_KEY);
    }

    /// 请求只从持久化存储读取 token，写入失败即登录失败，状态保持未认证
    pub fn login(&self, state: &mut SessionState, session: Session) -> Result<(), SessionError> {
        state.is_loading = false;
        if !self.persist(&session) {
            state.session = None;
            return Err(SessionError::StorageUnavailable);
        }
        log::info!(
            "[Session] Logged in as {} ({})",
            session.user.email,
            session.user.role
        );
        state.session = Some(session);
        Ok(())
    }

    pub fn logout(&self, state: &mut SessionState) {
        self.clear();
        if state.session.take().is_some() {
            log::info!("[Session] Logged out.");
        }
        state.is_loading = false;
    }

    /// 用服务端返回的最新资料替换用户记录，token 不变
    ///
    /// 只重写 user 键；写入失败时保留旧记录，已存的 token 不受影响。
    pub fn refresh(&self, state: &mut SessionState, user: User) {
        let Some(session) = state.session.as_mut() else {
            return;
        };
        match serde_json::to_string(&user) {
            Ok(raw) => {
                if !self.storage.set(USER_KEY, &raw) {
                    log::warn!("[Session] Could not save refreshed profile.");
                }
            }
            Err(e) => log::error!("[Session] Failed to serialize user: {}", e),
        }
        session.user = user;
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    /// 内存存储，克隆后共享同一份数据
    #[derive(Clone, Default)]
    pub struct MemoryStorage {
        pub(crate) items: Rc<RefCell<HashMap<String, String>>>,
        pub read_only: bool,
    }

    impl MemoryStorage {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn contains(&self, key: &str) -> bool {
            self.items.borrow().contains_key(key)
        }

        pub fn is_empty(&self) -> bool {
            self.items.borrow().is_empty()
        }
    }

    impl SessionStorage for MemoryStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.items.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) -> bool {
            if self.read_only {
                return false;
            }
            self.items
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            true
        }

        fn delete(&self, key: &str) -> bool {
            self.items.borrow_mut().remove(key);
            true
        }
    }

    pub fn sample_user(role: Role) -> User {
        User {
            id: "u-1".to_string(),
            name: "Nora Normalperson Example".to_string(),
            email: "nora@example.com".to_string(),
            address: "12 Rating Road".to_string(),
            role,
        }
    }

    pub fn sample_session(role: Role) -> Session {
        Session {
            token: "jwt-token".to_string(),
            user: sample_user(role),
        }
    }

    #[test]
    fn test_rehydrate_without_data_is_unauthenticated() {
        let store = SessionStore::new(MemoryStorage::new());
        let state = store.rehydrate();
        assert!(!state.is_loading);
        assert!(!state.is_authenticated());
        assert_eq!(state.role(), None);
    }

    #[test]
    fn test_login_persists_and_rehydrates() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(storage.clone());
        let mut state = SessionState::default();

        store.login(&mut state, sample_session(Role::StoreOwner)).unwrap();
        assert!(state.is_authenticated());
        assert_eq!(state.role(), Some(Role::StoreOwner));
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("jwt-token"));

        let restored = SessionStore::new(storage).rehydrate();
        assert_eq!(restored.session, state.session);
    }

    #[test]
    fn test_login_then_logout_clears_both_keys() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(storage.clone());
        let mut state = SessionState::default();

        store.login(&mut state, sample_session(Role::NormalUser)).unwrap();
        store.logout(&mut state);

        assert!(!storage.contains(TOKEN_KEY));
        assert!(!storage.contains(USER_KEY));
        assert!(!state.is_authenticated());

        // 再次注销不会出错
        store.logout(&mut state);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_half_written_session_is_discarded() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "orphan-token");
        let store = SessionStore::new(storage.clone());

        assert!(store.load().is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_corrupt_user_record_is_discarded() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "t");
        storage.set(USER_KEY, "{not json");
        let state = SessionStore::new(storage.clone()).rehydrate();

        assert!(!state.is_authenticated());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let state = SessionState {
            session: Some(Session {
                token: String::new(),
                user: sample_user(Role::Admin),
            }),
            is_loading: false,
        };
        assert!(!state.is_authenticated());
        assert_eq!(state.role(), None);
    }

    #[test]
    fn test_refresh_replaces_user_and_keeps_token() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(storage.clone());
        let mut state = SessionState::default();
        store.login(&mut state, sample_session(Role::NormalUser)).unwrap();

        let mut updated = sample_user(Role::NormalUser);
        updated.address = "99 New Street".to_string();
        store.refresh(&mut state, updated.clone());

        assert_eq!(state.user(), Some(&updated));
        let restored = store.load().unwrap();
        assert_eq!(restored.token, "jwt-token");
        assert_eq!(restored.user.address, "99 New Street");
    }

    #[test]
    fn test_refresh_without_session_is_ignored() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(storage.clone());
        let mut state = store.rehydrate();

        store.refresh(&mut state, sample_user(Role::Admin));
        assert!(state.session.is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_failed_persist_fails_login() {
        let storage = MemoryStorage {
            read_only: true,
            ..MemoryStorage::new()
        };
        let store = SessionStore::new(storage.clone());
        let mut state = SessionState::default();

        let result = store.login(&mut state, sample_session(Role::Admin));

        assert_eq!(result, Err(SessionError::StorageUnavailable));
        assert!(!state.is_authenticated());
        assert!(!state.is_loading);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_failed_refresh_keeps_stored_session() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(storage.clone());
        let mut state = SessionState::default();
        store.login(&mut state, sample_session(Role::NormalUser)).unwrap();

        let locked = SessionStore::new(MemoryStorage {
            read_only: true,
            ..storage.clone()
        });
        let mut updated = sample_user(Role::NormalUser);
        updated.name = "Nora Renamedperson Example".to_string();
        locked.refresh(&mut state, updated.clone());

        assert_eq!(state.user(), Some(&updated));
        let restored = store.load().unwrap();
        assert_eq!(restored.token, "jwt-token");
        assert_eq!(restored.user, sample_user(Role::NormalUser));
    }
}
