//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{Access, AppRoute, Guard, resolve};

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 写入 History 状态
///
/// `use_push` 为 false 时使用 replaceState，重定向不会留下历史记录。
fn write_history(path: &str, use_push: bool) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let result = if use_push {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))
    } else {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))
    };
    if result.is_err() {
        log::warn!("[Router] Failed to update history for {}", path);
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入访问信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 访问状态（注入的信号，实现解耦）
    access: Signal<Access>,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// # Arguments
    /// * `access` - 访问状态信号，由外部注入实现解耦
    fn new(access: Signal<Access>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            access,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 当前路由的守卫判定（响应式）
    pub fn guard(&self) -> Guard {
        resolve(self.current_route.get(), self.access.get())
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate_to(&self, route: AppRoute) {
        self.navigate_to_route(route, true);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target_route` - 目标路由
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let access = self.access.get_untracked();

        match resolve(target_route, access) {
            // 会话尚未恢复：先记录目标，恢复后由认证 Effect 重新判定
            Guard::Pending => {
                write_history(target_route.to_path(), use_push);
                self.set_route.set(target_route);
            }
            Guard::Render(route) => {
                write_history(route.to_path(), use_push);
                self.set_route.set(route);
            }
            Guard::Redirect(redirect) => {
                log::info!("[Router] {} is not available, redirecting to {}", target_route, redirect);
                write_history(redirect.to_path(), use_push);
                self.set_route.set(redirect);
            }
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target_route = AppRoute::from_path(&current_path());
            // popstate 时也执行守卫逻辑，重定向不新增历史记录
            router.navigate_to_route(target_route, false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 访问状态变化时重新判定当前路由
    ///
    /// 覆盖登录、注销以及 401 导致的会话失效。
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let access = self.access;

        Effect::new(move |_| {
            let access = access.get();
            let route = current_route.get_untracked();

            if let Guard::Redirect(redirect) = resolve(route, access) {
                log::info!(
                    "[Router] Access changed ({:?}), redirecting {} -> {}",
                    access.role,
                    route,
                    redirect
                );
                write_history(redirect.to_path(), false);
                set_route.set(redirect);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(access: Signal<Access>) -> RouterService {
    let router = RouterService::new(access);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 访问状态信号
    access: Signal<Access>,
    children: Children,
) -> impl IntoView {
    provide_router(access);

    children()
}

/// 路由出口组件
///
/// 只有守卫判定为 `Render` 时才渲染页面，其他情况显示加载占位，
/// 受保护内容不会在重定向前闪现。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || match router.guard() {
        Guard::Render(route) => matcher(route),
        Guard::Pending | Guard::Redirect(_) => view! {
            <div class="flex items-center justify-center min-h-screen">
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </div>
        }
        .into_any(),
    }
}

/// 站内链接，点击时走路由服务而非整页跳转
#[component]
pub fn Link(
    to: AppRoute,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: web_sys::MouseEvent| {
        // 保留新标签页打开等浏览器行为
        if ev.ctrl_key() || ev.meta_key() || ev.shift_key() || ev.button() != 0 {
            return;
        }
        ev.prevent_default();
        router.navigate_to(to);
    };

    let is_active = move || router.current_route().get() == to;
    let class = move || {
        if is_active() {
            format!("{} active", class)
        } else {
            class.clone()
        }
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
