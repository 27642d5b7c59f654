use leptos::prelude::*;
use leptos::task::spawn_local;
use rateboard_shared::DashboardStats;

use crate::auth::use_api;
use crate::components::widgets::{ErrorAlert, Spinner};
use crate::views::Loadable;

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let api = use_api();
    let stats = RwSignal::new(Loadable::<DashboardStats>::Loading);

    Effect::new(move |_| {
        let api = api.clone();
        spawn_local(async move {
            let result = api.dashboard_stats().await;
            stats.set(Loadable::from_result(result, "Failed to fetch dashboard stats"));
        });
    });

    view! {
        <h2 class="text-2xl font-bold">"Admin Dashboard"</h2>
        {move || match stats.get() {
            Loadable::Loading => view! { <Spinner /> }.into_any(),
            Loadable::Failed(msg) => view! { <ErrorAlert errors=vec![msg] /> }.into_any(),
            Loadable::Ready(stats) => view! {
                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-title">"Total Users"</div>
                        <div class="stat-value text-primary">{stats.total_users}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Total Stores"</div>
                        <div class="stat-value text-secondary">{stats.total_stores}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Total Ratings"</div>
                        <div class="stat-value text-accent">{stats.total_ratings}</div>
                    </div>
                </div>
            }
            .into_any(),
        }}
    }
}
