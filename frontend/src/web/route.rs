//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、各路由允许的角色以及守卫判定。

use std::fmt::Display;

use rateboard_shared::Role;

use crate::session::SessionState;

/// 重定向链的最大跳数
const MAX_REDIRECTS: usize = 4;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    Login,
    Signup,
    /// 仅用于按角色分发，不渲染内容
    #[default]
    Root,
    Profile,
    Stores,
    MyRatings,
    MyStore,
    AdminDashboard,
    AdminUsers,
    AdminStores,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    #[cfg(test)]
    pub const ALL: [AppRoute; 11] = [
        AppRoute::Login,
        AppRoute::Signup,
        AppRoute::Root,
        AppRoute::Profile,
        AppRoute::Stores,
        AppRoute::MyRatings,
        AppRoute::MyStore,
        AppRoute::AdminDashboard,
        AppRoute::AdminUsers,
        AppRoute::AdminStores,
        AppRoute::NotFound,
    ];

    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        match path {
            "/" => Self::Root,
            "/login" => Self::Login,
            "/signup" => Self::Signup,
            "/profile" => Self::Profile,
            "/stores" => Self::Stores,
            "/my-ratings" => Self::MyRatings,
            "/my-store" => Self::MyStore,
            "/admin/dashboard" => Self::AdminDashboard,
            "/admin/users" => Self::AdminUsers,
            "/admin/stores" => Self::AdminStores,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::Root => "/",
            Self::Profile => "/profile",
            Self::Stores => "/stores",
            Self::MyRatings => "/my-ratings",
            Self::MyStore => "/my-store",
            Self::AdminDashboard => "/admin/dashboard",
            Self::AdminUsers => "/admin/users",
            Self::AdminStores => "/admin/stores",
            Self::NotFound => "/404",
        }
    }

    /// 登录、注册页面无需认证
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Login | Self::Signup)
    }

    /// **核心守卫配置：路由允许的角色**
    ///
    /// `None` 表示任何已认证用户都可访问。
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Self::Stores | Self::MyRatings => Some(&[Role::NormalUser]),
            Self::MyStore => Some(&[Role::StoreOwner]),
            Self::AdminDashboard | Self::AdminUsers | Self::AdminStores => Some(&[Role::Admin]),
            Self::Login | Self::Signup | Self::Root | Self::Profile | Self::NotFound => None,
        }
    }

    /// 角色对应的首页
    pub fn home_for(role: Role) -> Self {
        match role {
            Role::Admin => Self::AdminDashboard,
            Role::StoreOwner => Self::MyStore,
            Role::NormalUser => Self::Stores,
        }
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// 守卫 (Guard)
// =========================================================

/// 守卫的输入：是否加载中，以及已认证用户的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Access {
    pub is_loading: bool,
    /// 已认证时为 `Some`
    pub role: Option<Role>,
}

#[cfg(test)]
impl Access {
    pub fn anonymous() -> Self {
        Self {
            is_loading: false,
            role: None,
        }
    }

    pub fn authenticated(role: Role) -> Self {
        Self {
            is_loading: false,
            role: Some(role),
        }
    }
}

impl From<&SessionState> for Access {
    fn from(state: &SessionState) -> Self {
        Self {
            is_loading: state.is_loading,
            role: state.role(),
        }
    }
}

/// 守卫判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// 会话尚在加载，显示占位
    Pending,
    Render(AppRoute),
    Redirect(AppRoute),
}

/// 单步判定
pub fn check(route: AppRoute, access: Access) -> Guard {
    if access.is_loading {
        return Guard::Pending;
    }

    match (route, access.role) {
        (AppRoute::NotFound, _) => Guard::Redirect(AppRoute::Root),
        (route, Some(_)) if route.is_public() => Guard::Redirect(AppRoute::Root),
        (route, None) if route.is_public() => Guard::Render(route),
        (_, None) => Guard::Redirect(AppRoute::auth_failure_redirect()),
        (AppRoute::Root, Some(role)) => Guard::Redirect(AppRoute::home_for(role)),
        (_, Some(role)) => match route.allowed_roles() {
            Some(allowed) if !allowed.contains(&role) => {
                Guard::Redirect(AppRoute::home_for(role))
            }
            _ => Guard::Render(route),
        },
    }
}

/// 沿重定向链走到终点
///
/// 返回 `Render(route)` 表示目标可直接渲染；
/// 返回 `Redirect(route)` 时 `route` 即为最终落点。
pub fn resolve(route: AppRoute, access: Access) -> Guard {
    let mut current = route;
    for _ in 0..MAX_REDIRECTS {
        match check(current, access) {
            Guard::Pending => return Guard::Pending,
            Guard::Render(target) if target == route => return Guard::Render(target),
            Guard::Render(target) => return Guard::Redirect(target),
            Guard::Redirect(next) => current = next,
        }
    }
    log::error!("[Router] Redirect loop starting at {}", route);
    Guard::Redirect(AppRoute::auth_failure_redirect())
}

// =========================================================
// 导航链接 (Navigation)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub route: AppRoute,
    pub label: &'static str,
}

const fn link(route: AppRoute, label: &'static str) -> NavLink {
    NavLink { route, label }
}

/// 角色可见的导航链接，个人资料对所有角色可见
pub fn nav_links(role: Role) -> Vec<NavLink> {
    let mut links = match role {
        Role::Admin => vec![
            link(AppRoute::AdminDashboard, "Dashboard"),
            link(AppRoute::AdminUsers, "Users"),
            link(AppRoute::AdminStores, "Stores"),
        ],
        Role::NormalUser => vec![
            link(AppRoute::Stores, "Stores"),
            link(AppRoute::MyRatings, "My Ratings"),
        ],
        Role::StoreOwner => vec![link(AppRoute::MyStore, "My Store")],
    };
    links.push(link(AppRoute::Profile, "Profile"));
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protected_routes() -> impl Iterator<Item = AppRoute> {
        AppRoute::ALL
            .into_iter()
            .filter(|r| !r.is_public() && *r != AppRoute::NotFound)
    }

    #[test]
    fn test_path_round_trip() {
        for route in AppRoute::ALL {
            if route == AppRoute::NotFound {
                continue;
            }
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
        assert_eq!(AppRoute::from_path("/stores/"), AppRoute::Stores);
        assert_eq!(AppRoute::from_path(""), AppRoute::Root);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn test_loading_never_redirects() {
        let access = Access {
            is_loading: true,
            role: None,
        };
        for route in AppRoute::ALL {
            assert_eq!(resolve(route, access), Guard::Pending);
        }
    }

    #[test]
    fn test_unauthenticated_protected_routes_go_to_login() {
        for route in protected_routes() {
            assert_eq!(
                resolve(route, Access::anonymous()),
                Guard::Redirect(AppRoute::Login),
                "route {}",
                route
            );
        }
    }

    #[test]
    fn test_excluded_role_lands_on_its_home() {
        for role in Role::ALL {
            let access = Access::authenticated(role);
            for route in protected_routes() {
                let Some(allowed) = route.allowed_roles() else {
                    continue;
                };
                let expected = if allowed.contains(&role) {
                    Guard::Render(route)
                } else {
                    Guard::Redirect(AppRoute::home_for(role))
                };
                assert_eq!(resolve(route, access), expected, "{} as {}", route, role);
            }
        }
    }

    #[test]
    fn test_root_dispatches_by_role() {
        assert_eq!(
            resolve(AppRoute::Root, Access::authenticated(Role::Admin)),
            Guard::Redirect(AppRoute::AdminDashboard)
        );
        assert_eq!(
            resolve(AppRoute::Root, Access::authenticated(Role::StoreOwner)),
            Guard::Redirect(AppRoute::MyStore)
        );
        assert_eq!(
            resolve(AppRoute::Root, Access::authenticated(Role::NormalUser)),
            Guard::Redirect(AppRoute::Stores)
        );
        assert_eq!(
            resolve(AppRoute::Root, Access::anonymous()),
            Guard::Redirect(AppRoute::Login)
        );
    }

    #[test]
    fn test_public_pages() {
        assert_eq!(
            resolve(AppRoute::Signup, Access::anonymous()),
            Guard::Render(AppRoute::Signup)
        );
        assert_eq!(
            resolve(AppRoute::Login, Access::authenticated(Role::NormalUser)),
            Guard::Redirect(AppRoute::Stores)
        );
    }

    #[test]
    fn test_unknown_path_goes_through_root() {
        assert_eq!(
            check(AppRoute::NotFound, Access::anonymous()),
            Guard::Redirect(AppRoute::Root)
        );
        assert_eq!(
            resolve(AppRoute::NotFound, Access::authenticated(Role::StoreOwner)),
            Guard::Redirect(AppRoute::MyStore)
        );
    }

    #[test]
    fn test_profile_open_to_every_role() {
        for role in Role::ALL {
            assert_eq!(
                resolve(AppRoute::Profile, Access::authenticated(role)),
                Guard::Render(AppRoute::Profile)
            );
        }
    }

    #[test]
    fn test_nav_links_are_reachable_for_role() {
        for role in Role::ALL {
            let links = nav_links(role);
            assert_eq!(links.last().map(|l| l.route), Some(AppRoute::Profile));
            for link in links {
                assert_eq!(
                    resolve(link.route, Access::authenticated(role)),
                    Guard::Render(link.route)
                );
            }
        }
    }
}
