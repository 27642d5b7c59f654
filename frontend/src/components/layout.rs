use leptos::prelude::*;

use crate::auth::{logout, use_auth};
use crate::web::route::nav_links;
use crate::web::router::Link;

/// 受保护页面的共享布局：标题、角色导航、当前用户与注销
#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let auth = use_auth();
    let user = move || auth.state.with(|s| s.user().cloned());

    let links = move || {
        user()
            .map(|user| {
                nav_links(user.role)
                    .into_iter()
                    .map(|link| {
                        view! {
                            <li>
                                <Link to=link.route>{link.label}</Link>
                            </li>
                        }
                    })
                    .collect_view()
            })
    };

    // 注销后由路由服务根据访问状态重定向
    let on_logout = move |_: leptos::ev::MouseEvent| logout(&auth);

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <div class="navbar bg-base-100 shadow-xl px-4">
                <div class="flex-1 gap-2">
                    <span class="text-xl font-bold text-primary">"Store Rating Platform"</span>
                    <ul class="menu menu-horizontal px-1 hidden md:flex">{links}</ul>
                </div>
                <div class="flex-none gap-4">
                    {move || {
                        user()
                            .map(|user| {
                                view! {
                                    <div class="text-right hidden sm:block">
                                        <div class="font-semibold">{user.name}</div>
                                        <div class="badge badge-neutral badge-sm">{user.role.label()}</div>
                                    </div>
                                }
                            })
                    }}
                    <button on:click=on_logout class="btn btn-outline btn-error btn-sm">
                        "Logout"
                    </button>
                </div>
            </div>
            <main class="max-w-7xl mx-auto p-4 md:p-8 space-y-8">{children()}</main>
        </div>
    }
}
