use leptos::prelude::*;
use leptos::task::spawn_local;
use rateboard_shared::{Rating, StoreDetails};

use crate::auth::use_api;
use crate::components::star_rating::StarRating;
use crate::components::widgets::{ErrorAlert, Spinner};
use crate::views::{Loadable, format_average, found};

/// 店主面板：商店信息、平均分与收到的评分
#[component]
pub fn MyStorePage() -> impl IntoView {
    let api = use_api();
    let details = RwSignal::new(Loadable::<Option<StoreDetails>>::Loading);

    Effect::new(move |_| {
        let api = api.clone();
        spawn_local(async move {
            let result = found(api.get_my_store().await);
            details.set(Loadable::from_result(result, "Failed to fetch store data"));
        });
    });

    move || match details.get() {
        Loadable::Loading => view! { <Spinner /> }.into_any(),
        Loadable::Failed(msg) => view! { <ErrorAlert errors=vec![msg] /> }.into_any(),
        Loadable::Ready(None) => view! {
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body items-center text-center">
                    <h2 class="card-title">"No store found"</h2>
                    <p class="text-base-content/70">
                        "No store is linked to your account yet. Contact an administrator."
                    </p>
                </div>
            </div>
        }
        .into_any(),
        Loadable::Ready(Some(details)) => view! { <StoreOverview details=details /> }.into_any(),
    }
}

#[component]
fn StoreOverview(details: StoreDetails) -> impl IntoView {
    let StoreDetails { store, ratings, .. } = details;
    let average_stars = store.average_rating.round() as u8;

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h2 class="card-title text-2xl">{store.name}</h2>
                <p class="text-base-content/70">{store.address}</p>
                <p class="text-sm opacity-70">{store.email}</p>
            </div>
        </div>

        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-title">"Average Rating"</div>
                <div class="stat-value text-primary">{format_average(Some(store.average_rating))}</div>
                <div class="stat-desc"><StarRating value=average_stars /></div>
            </div>
            <div class="stat">
                <div class="stat-title">"Total Ratings"</div>
                <div class="stat-value text-secondary">{store.total_ratings}</div>
            </div>
        </div>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <h3 class="card-title p-6 pb-2">"Ratings"</h3>
                <RatingList ratings=ratings />
            </div>
        </div>
    }
}

#[component]
fn RatingList(ratings: Vec<Rating>) -> impl IntoView {
    if ratings.is_empty() {
        return view! {
            <p class="text-center py-8 text-base-content/50">"No ratings yet."</p>
        }
        .into_any();
    }

    view! {
        <div class="overflow-x-auto w-full">
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"User"</th>
                        <th class="hidden md:table-cell">"Email"</th>
                        <th>"Rating"</th>
                        <th>"Date"</th>
                    </tr>
                </thead>
                <tbody>
                    {ratings
                        .into_iter()
                        .map(|rating| {
                            let date = rating.date_label();
                            view! {
                                <tr>
                                    <td class="font-semibold">{rating.user.name}</td>
                                    <td class="hidden md:table-cell">{rating.user.email.unwrap_or_default()}</td>
                                    <td><StarRating value=rating.rating /></td>
                                    <td class="text-sm opacity-70">{date}</td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
    .into_any()
}
