//! API 客户端
//!
//! 每个请求自动附带 `Authorization: Bearer <token>`（若已登录）。
//! 收到 401 时清除持久化会话并触发 `on_session_invalidated` 回调，
//! 然后把错误照常返回给调用方；导航交给路由服务处理。

use std::sync::Arc;

use rateboard_shared::protocol::{
    AdminListStoresRequest, AdminStoresPage, ApiRequest, CreateStoreRequest, CreateUserRequest,
    DashboardStatsRequest, HttpMethod, ListStoresRequest, ListUsersRequest, LoginRequest,
    MessageResponse, MyRatingsRequest, MyStoreRequest, ProfileRequest, SignupRequest,
    StoreDetailsRequest, SubmitRatingRequest, UpdatePasswordRequest, UsersPage,
};
use rateboard_shared::{
    AuthResponse, DashboardStats, HEADER_AUTHORIZATION, Rating, Store, StoreDetails, User,
};

use crate::error::ApiError;
use crate::session::{SessionStorage, SessionStore};
use crate::web::{FetchTransport, LocalStorage};

// =========================================================
// 传输层抽象 (HTTP Interface Abstraction)
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(&'static str, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: String) -> Self {
        Self {
            method,
            url,
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    #[cfg(test)]
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait::async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError>;
}

// =========================================================
// 客户端 (API Client)
// =========================================================

/// 会话失效回调
pub type InvalidationHook = Arc<dyn Fn() + Send + Sync>;

/// 浏览器中使用的客户端
pub type Api = ApiClient<FetchTransport, LocalStorage>;

pub struct ApiClient<T, S> {
    base_url: String,
    transport: Arc<T>,
    sessions: SessionStore<S>,
    on_invalidated: Option<InvalidationHook>,
}

impl<T, S: Clone> Clone for ApiClient<T, S> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            transport: Arc::clone(&self.transport),
            sessions: self.sessions.clone(),
            on_invalidated: self.on_invalidated.clone(),
        }
    }
}

impl<T: HttpTransport, S: SessionStorage> ApiClient<T, S> {
    pub fn new(base_url: impl Into<String>, transport: T, sessions: SessionStore<S>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport: Arc::new(transport),
            sessions,
            on_invalidated: None,
        }
    }

    /// 注册会话失效回调（收到 401 时调用）
    pub fn on_session_invalidated(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_invalidated = Some(Arc::new(hook));
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送类型化请求
    pub async fn call<R: ApiRequest>(&self, req: &R) -> Result<R::Response, ApiError> {
        let mut http = HttpRequest::new(R::METHOD, self.url(&req.path()));
        http.query = req.query();

        if let Some(token) = self.sessions.token() {
            http = http.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        if R::METHOD != HttpMethod::Get {
            let body = serde_json::to_string(req).map_err(|e| ApiError::Request(e.to_string()))?;
            http = http
                .with_header("Content-Type", "application/json")
                .with_body(body);
        }

        log::debug!("[Api] {} {}", R::METHOD.as_str(), http.url);
        let res = self.transport.send(http).await.inspect_err(|e| {
            log::warn!("[Api] {} {} failed: {}", R::METHOD.as_str(), req.path(), e);
        })?;

        if !res.ok() {
            let err = ApiError::from_response(res.status, &res.body);
            if err.is_unauthorized() {
                self.invalidate_session();
            } else {
                log::warn!(
                    "[Api] {} {} returned {}",
                    R::METHOD.as_str(),
                    req.path(),
                    res.status
                );
            }
            return Err(err);
        }

        serde_json::from_str(&res.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn invalidate_session(&self) {
        log::warn!("[Api] Received 401, invalidating session.");
        self.sessions.clear();
        if let Some(hook) = &self.on_invalidated {
            hook();
        }
    }

    // --- Auth ---

    pub async fn signup(&self, req: &SignupRequest) -> Result<AuthResponse, ApiError> {
        self.call(req).await
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.call(req).await
    }

    pub async fn update_password(
        &self,
        req: &UpdatePasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.call(req).await
    }

    pub async fn get_profile(&self) -> Result<User, ApiError> {
        Ok(self.call(&ProfileRequest).await?.user)
    }

    // --- Stores ---

    pub async fn list_stores(&self, req: &ListStoresRequest) -> Result<Vec<Store>, ApiError> {
        Ok(self.call(req).await?.stores)
    }

    pub async fn get_store(&self, id: &str) -> Result<StoreDetails, ApiError> {
        let req = StoreDetailsRequest { id: id.to_string() };
        Ok(self.call(&req).await?.store)
    }

    pub async fn get_my_store(&self) -> Result<StoreDetails, ApiError> {
        Ok(self.call(&MyStoreRequest).await?.store)
    }

    pub async fn create_store(&self, req: &CreateStoreRequest) -> Result<MessageResponse, ApiError> {
        self.call(req).await
    }

    // --- Ratings ---

    /// 提交评分（服务端按用户和商店 upsert）
    pub async fn submit_rating(&self, store_id: &str, rating: u8) -> Result<MessageResponse, ApiError> {
        let req = SubmitRatingRequest {
            store_id: store_id.to_string(),
            rating,
        };
        self.call(&req).await
    }

    pub async fn list_my_ratings(&self) -> Result<Vec<Rating>, ApiError> {
        Ok(self.call(&MyRatingsRequest).await?.ratings)
    }

    // --- Admin ---

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        Ok(self.call(&DashboardStatsRequest).await?.stats)
    }

    pub async fn list_users(&self, req: &ListUsersRequest) -> Result<UsersPage, ApiError> {
        self.call(req).await
    }

    pub async fn create_user(&self, req: &CreateUserRequest) -> Result<MessageResponse, ApiError> {
        self.call(req).await
    }

    pub async fn list_admin_stores(
        &self,
        req: &AdminListStoresRequest,
    ) -> Result<AdminStoresPage, ApiError> {
        self.call(req).await
    }
}
