//! 认证模块
//!
//! 管理用户会话状态，与路由系统解耦。
//! 路由服务通过注入的访问信号来检查认证状态与角色。

use leptos::prelude::*;
use rateboard_shared::AuthResponse;

use crate::api::Api;
use crate::config::AppConfig;
use crate::session::{Session, SessionError, SessionState, SessionStore};
use crate::web::route::Access;
use crate::web::{FetchTransport, LocalStorage};

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 会话状态（只读）
    pub state: ReadSignal<SessionState>,
    /// 设置会话状态（写入）
    pub set_state: WriteSignal<SessionState>,
    store: SessionStore<LocalStorage>,
}

impl AuthContext {
    /// 创建新的认证上下文，初始为加载中
    pub fn new() -> Self {
        let (state, set_state) = signal(SessionState::default());
        Self {
            state,
            set_state,
            store: SessionStore::new(LocalStorage),
        }
    }

    /// 获取访问状态信号（用于路由服务注入）
    pub fn access_signal(&self) -> Signal<Access> {
        let state = self.state;
        Signal::derive(move || state.with(|s| Access::from(s)))
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 从 LocalStorage 恢复会话
pub fn init_auth(ctx: &AuthContext) {
    let restored = ctx.store.rehydrate();
    ctx.set_state.set(restored);
}

/// 登录或注册成功后保存会话
///
/// 导航由路由服务的访问状态监听自动处理。
/// 会话无法写入存储时返回错误，状态保持未认证。
pub fn login(ctx: &AuthContext, res: AuthResponse) -> Result<(), SessionError> {
    let session = Session {
        token: res.token,
        user: res.user,
    };
    let store = ctx.store;
    let mut result = Ok(());
    ctx.set_state.update(|state| result = store.login(state, session));
    result
}

/// 注销并清除状态
pub fn logout(ctx: &AuthContext) {
    let store = ctx.store;
    ctx.set_state.update(|state| store.logout(state));
}

/// 从服务端拉取最新资料并替换本地用户记录
///
/// 失败时保留现有记录；401 已由客户端处理。
pub async fn refresh_profile(ctx: &AuthContext, api: &Api) {
    match api.get_profile().await {
        Ok(user) => {
            let store = ctx.store;
            ctx.set_state.update(|state| store.refresh(state, user));
        }
        Err(e) => log::warn!("[Auth] Profile refresh failed: {}", e),
    }
}

// =========================================================
// API 客户端注入
// =========================================================

/// 创建 API 客户端并放入 Context
///
/// 客户端收到 401 时已清除持久化会话，这里同步清空内存状态，
/// 路由服务随之把用户带回登录页。
pub fn provide_api(ctx: &AuthContext) -> Api {
    let config = AppConfig::from_env();
    log::info!("[Auth] Using API at {}", config.api_base_url);

    let set_state = ctx.set_state;
    let api = Api::new(
        config.api_base_url,
        FetchTransport,
        SessionStore::new(LocalStorage),
    )
    .on_session_invalidated(end_session(set_state));

    provide_context(api.clone());
    api
}

/// 401 后清空内存会话，访问状态随之变为匿名
fn end_session(set_state: WriteSignal<SessionState>) -> impl Fn() + Send + Sync + 'static {
    move || {
        set_state.update(|state| {
            state.session = None;
            state.is_loading = false;
        });
    }
}

/// 从 Context 获取 API 客户端
pub fn use_api() -> Api {
    use_context::<Api>().expect("Api should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{MockHttpClient, create_client};
    use crate::session::tests::{MemoryStorage, sample_session};
    use crate::web::route::{AppRoute, Guard, resolve};
    use rateboard_shared::Role;
    use rateboard_shared::protocol::{HttpMethod, ListStoresRequest, Sort, StoreSortField};
    use serde_json::json;

    #[tokio::test]
    async fn test_unauthorized_response_sends_user_to_login() {
        let owner = Owner::new();
        owner.set();

        let ctx = AuthContext::new();
        ctx.set_state.set(SessionState {
            session: Some(sample_session(Role::NormalUser)),
            is_loading: false,
        });
        let access = ctx.access_signal();
        assert_eq!(resolve(AppRoute::Stores, access.get_untracked()), Guard::Render(AppRoute::Stores));

        let transport = MockHttpClient::new();
        transport.mock_response(HttpMethod::Get, "/stores", 401, json!({ "message": "Token expired" }));
        let client = create_client(transport, MemoryStorage::new())
            .on_session_invalidated(end_session(ctx.set_state));

        let err = client
            .list_stores(&ListStoresRequest {
                search: String::new(),
                sort: Sort::new(StoreSortField::Name),
            }).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert!(!ctx.state.get_untracked().is_authenticated());
        assert_eq!(
            resolve(AppRoute::Stores, access.get_untracked()),
            Guard::Redirect(AppRoute::Login)
        );
    }
}
