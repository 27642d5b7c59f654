//! Rateboard 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义与守卫（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `session` / `auth`: 会话持久化与认证状态
//! - `api`: 类型化的 REST 客户端
//! - `views`: 与 DOM 无关的页面状态
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod admin {
        pub mod dashboard;
        pub mod stores;
        pub mod users;
    }
    mod form_state;
    pub mod layout;
    pub mod login;
    pub mod my_ratings;
    pub mod my_store;
    pub mod profile;
    pub mod signup;
    mod star_rating;
    pub mod stores;
    mod widgets;
}
mod config;
mod error;
mod session;
mod views;

use crate::auth::{AuthContext, init_auth, provide_api};
use crate::components::admin::dashboard::AdminDashboardPage;
use crate::components::admin::stores::AdminStoresPage;
use crate::components::admin::users::AdminUsersPage;
use crate::components::layout::Layout;
use crate::components::login::LoginPage;
use crate::components::my_ratings::MyRatingsPage;
use crate::components::my_store::MyStorePage;
use crate::components::profile::ProfilePage;
use crate::components::signup::SignupPage;
use crate::components::stores::StoresPage;

use leptos::prelude::*;

// 浏览器 API 封装模块
pub(crate) mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::FetchTransport;
    pub use storage::LocalStorage;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 只接收守卫放行的路由；受保护页面包裹在共享布局中。
fn route_matcher(route: AppRoute) -> AnyView {
    let page = match route {
        AppRoute::Login => return view! { <LoginPage /> }.into_any(),
        AppRoute::Signup => return view! { <SignupPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::Stores => view! { <StoresPage /> }.into_any(),
        AppRoute::MyRatings => view! { <MyRatingsPage /> }.into_any(),
        AppRoute::MyStore => view! { <MyStorePage /> }.into_any(),
        AppRoute::AdminDashboard => view! { <AdminDashboardPage /> }.into_any(),
        AppRoute::AdminUsers => view! { <AdminUsersPage /> }.into_any(),
        AppRoute::AdminStores => view! { <AdminStoresPage /> }.into_any(),
        // 守卫总是重定向这两个路由
        AppRoute::Root | AppRoute::NotFound => ().into_any(),
    };

    view! { <Layout>{page}</Layout> }.into_any()
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 同步恢复会话，首次渲染前完成
    init_auth(&auth_ctx);

    // 3. API 客户端：401 时清空内存会话
    provide_api(&auth_ctx);

    // 4. 访问状态信号，注入路由服务（解耦！）
    let access = auth_ctx.access_signal();

    view! {
        <Router access=access>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
