use leptos::prelude::*;
use leptos::task::spawn_local;
use rateboard_shared::Rating;

use crate::auth::use_api;
use crate::components::star_rating::StarRating;
use crate::components::widgets::{ErrorAlert, Spinner};
use crate::views::Loadable;

/// 当前用户提交过的评分
#[component]
pub fn MyRatingsPage() -> impl IntoView {
    let api = use_api();
    let ratings = RwSignal::new(Loadable::<Vec<Rating>>::Loading);

    Effect::new(move |_| {
        let api = api.clone();
        spawn_local(async move {
            let result = api.list_my_ratings().await;
            ratings.set(Loadable::from_result(result, "Failed to fetch your ratings"));
        });
    });

    let content = move || match ratings.get() {
        Loadable::Loading => view! { <Spinner /> }.into_any(),
        Loadable::Failed(msg) => view! { <ErrorAlert errors=vec![msg] /> }.into_any(),
        Loadable::Ready(list) if list.is_empty() => view! {
            <p class="text-center py-8 text-base-content/50">"You haven't rated any stores yet."</p>
        }
        .into_any(),
        Loadable::Ready(list) => view! {
            <div class="overflow-x-auto w-full">
                <table class="table table-zebra w-full">
                    <thead>
                        <tr>
                            <th>"Store"</th>
                            <th class="hidden md:table-cell">"Address"</th>
                            <th>"Rating"</th>
                            <th>"Date"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {list
                            .into_iter()
                            .map(|rating| {
                                let date = rating.date_label();
                                let (name, address) = rating
                                    .store
                                    .map(|s| (s.name, s.address))
                                    .unwrap_or_default();
                                view! {
                                    <tr>
                                        <td class="font-semibold">{name}</td>
                                        <td class="hidden md:table-cell">{address}</td>
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
        .into_any(),
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h2 class="card-title">"My Ratings"</h2>
                {content}
            </div>
        </div>
    }
}
