use leptos::prelude::*;
use leptos::task::spawn_local;
use rateboard_shared::Store;
use rateboard_shared::protocol::{ListStoresRequest, StoreSortField};

use crate::auth::use_api;
use crate::components::star_rating::StarRating;
use crate::components::widgets::{ErrorAlert, SortButton, Spinner};
use crate::views::{StoresModel, format_average};

/// 卡片的渲染键：评分或聚合变化时重新渲染
fn card_key(store: &Store) -> String {
    format!(
        "{}:{:?}:{}:{}",
        store.id, store.user_rating, store.total_ratings, store.average_rating
    )
}

/// 普通用户的商店列表
#[component]
pub fn StoresPage() -> impl IntoView {
    let api = use_api();
    let model = RwSignal::new(StoresModel::default());

    let fetch = Callback::new({
        let api = api.clone();
        move |req: ListStoresRequest| {
            let Some(ticket) = model.try_update(StoresModel::begin_fetch) else {
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                let result = api.list_stores(&req).await;
                model.update(|m| {
                    m.finish_fetch(ticket, result);
                });
            });
        }
    });

    // 搜索或排序变化时重新拉取
    let query = Memo::new(move |_| model.with(StoresModel::request));
    Effect::new(move |_| fetch.run(query.get()));

    let rate = Callback::new(move |(store_id, rating): (String, u8)| {
        let started = model
            .try_update(|m| m.begin_rating(&store_id))
            .unwrap_or(false);
        if !started {
            return;
        }
        let api = api.clone();
        spawn_local(async move {
            let result = api.submit_rating(&store_id, rating).await;
            let refetch = model
                .try_update(|m| m.finish_rating(&store_id, rating, result))
                .unwrap_or(false);
            if refetch {
                fetch.run(query.get_untracked());
            }
        });
    });

    let sort = Signal::derive(move || model.with(|m| m.sort));
    let on_sort = Callback::new(move |field: StoreSortField| model.update(|m| m.toggle_sort(field)));
    let errors = Signal::derive(move || model.with(|m| m.error.iter().cloned().collect::<Vec<_>>()));
    let is_empty = move || model.with(|m| m.is_empty());

    view! {
        <div class="space-y-6">
            <div class="flex flex-col md:flex-row md:items-center md:justify-between gap-4">
                <h2 class="text-2xl font-bold">"Stores"</h2>
                <div class="flex items-center gap-2">
                    <input
                        type="search"
                        placeholder="Search by name or address"
                        class="input input-bordered input-sm w-64"
                        prop:value=move || model.with(|m| m.search.clone())
                        on:input=move |ev| model.update(|m| m.set_search(event_target_value(&ev)))
                    />
                    <SortButton label="Name" field=StoreSortField::Name sort=sort on_toggle=on_sort />
                    <SortButton label="Address" field=StoreSortField::Address sort=sort on_toggle=on_sort />
                </div>
            </div>

            <ErrorAlert errors=errors />

            <Show when=move || model.with(|m| m.loading && m.stores.is_empty())>
                <Spinner />
            </Show>
            <Show when=is_empty>
                <p class="text-center py-8 text-base-content/50">"No stores found."</p>
            </Show>

            <div class="grid gap-4 md:grid-cols-2 lg:grid-cols-3">
                <For
                    each=move || model.with(|m| m.stores.clone())
                    key=card_key
                    children=move |store| {
                        let id = store.id.clone();
                        let submitting = Signal::derive({
                            let id = id.clone();
                            move || model.with(|m| m.is_submitting(&id))
                        });
                        let on_rate = Callback::new(move |rating: u8| rate.run((id.clone(), rating)));
                        let average = store.average_rating;
                        let average_stars = average.round() as u8;
                        let own = store.user_rating.unwrap_or(0);
                        view! {
                            <div class="card bg-base-100 shadow-xl">
                                <div class="card-body">
                                    <h3 class="card-title">{store.name}</h3>
                                    <p class="text-sm text-base-content/70">{store.address}</p>
                                    <div class="flex items-center gap-2 text-sm">
                                        <StarRating value=average_stars />
                                        <span>{format_average(Some(average))}</span>
                                        <span class="text-base-content/50">
                                            {format!("({} ratings)", store.total_ratings)}
                                        </span>
                                    </div>
                                    <div class="divider my-1"></div>
                                    <div class="flex items-center justify-between">
                                        <span class="text-sm">
                                            {match store.user_rating {
                                                Some(r) => format!("Your rating: {}", r),
                                                None => "Rate this store".to_string(),
                                            }}
                                        </span>
                                        <StarRating value=own disabled=submitting on_rate=on_rate />
                                    </div>
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </div>
    }
}
