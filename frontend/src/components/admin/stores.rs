use leptos::prelude::*;
use leptos::task::spawn_local;
use rateboard_shared::protocol::{AdminListStoresRequest, StoreSortField};
use rateboard_shared::validation::validate_new_store;

use crate::auth::use_api;
use crate::components::form_state::{NewStoreForm, Submission};
use crate::components::widgets::{ErrorAlert, Pager, SortButton, Spinner, TextField};
use crate::views::{AdminStoresModel, format_average};

/// 管理员：商店列表与新建商店
#[component]
pub fn AdminStoresPage() -> impl IntoView {
    let api = use_api();
    let model = RwSignal::new(AdminStoresModel::default());

    let fetch = Callback::new(move |req: AdminListStoresRequest| {
        let Some(ticket) = model.try_update(AdminStoresModel::begin_fetch) else {
            return;
        };
        let api = api.clone();
        spawn_local(async move {
            let result = api
                .list_admin_stores(&req)
                .await
                .map(|page| (page.stores, page.pagination));
            model.update(|m| {
                m.finish_fetch(ticket, result, "Failed to fetch stores");
            });
        });
    });

    let query = Memo::new(move |_| model.with(AdminStoresModel::request));
    Effect::new(move |_| fetch.run(query.get()));
    let reload = Callback::new(move |_: ()| fetch.run(query.get_untracked()));

    let sort = Signal::derive(move || model.with(|m| m.sort));
    let on_sort = Callback::new(move |field: StoreSortField| model.update(|m| m.toggle_sort(field)));
    let pagination = Signal::derive(move || model.with(|m| m.pagination));
    let errors = Signal::derive(move || model.with(|m| m.error.iter().cloned().collect::<Vec<_>>()));

    let rows = move || {
        model.with(|m| {
            m.items
                .iter()
                .cloned()
                .map(|store| {
                    let owner = store
                        .owner
                        .map(|o| format!("{} ({})", o.name, o.email))
                        .unwrap_or_else(|| "-".to_string());
                    view! {
                        <tr>
                            <td class="font-semibold">{store.name}</td>
                            <td>{store.email}</td>
                            <td class="hidden lg:table-cell">{store.address}</td>
                            <td class="hidden md:table-cell">{owner}</td>
                            <td>
                                {format_average(Some(store.average_rating))}
                                <span class="text-xs opacity-60">{format!(" ({})", store.total_ratings)}</span>
                            </td>
                        </tr>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <h2 class="text-2xl font-bold">"Stores"</h2>

        <CreateStoreCard on_created=reload />

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="p-6 pb-2">
                    <input
                        type="search"
                        placeholder="Search by name, email or address"
                        class="input input-bordered input-sm w-full md:w-72"
                        prop:value=move || model.with(|m| m.search.clone())
                        on:input=move |ev| model.update(|m| m.set_search(event_target_value(&ev)))
                    />
                </div>

                <ErrorAlert errors=errors />

                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th><SortButton label="Name" field=StoreSortField::Name sort=sort on_toggle=on_sort /></th>
                                <th><SortButton label="Email" field=StoreSortField::Email sort=sort on_toggle=on_sort /></th>
                                <th class="hidden lg:table-cell">
                                    <SortButton label="Address" field=StoreSortField::Address sort=sort on_toggle=on_sort />
                                </th>
                                <th class="hidden md:table-cell">"Owner"</th>
                                <th>
                                    <SortButton label="Rating" field=StoreSortField::AverageRating sort=sort on_toggle=on_sort />
                                </th>
                            </tr>
                        </thead>
                        <tbody>{rows}</tbody>
                    </table>
                </div>

                <Show when=move || model.with(|m| m.loading && m.items.is_empty())>
                    <Spinner />
                </Show>
                <Show when=move || model.with(|m| m.is_empty())>
                    <p class="text-center py-8 text-base-content/50">"No stores found."</p>
                </Show>

                <Pager
                    pagination=pagination
                    on_prev=Callback::new(move |_: ()| model.update(|m| {
                        m.prev_page();
                    }))
                    on_next=Callback::new(move |_: ()| model.update(|m| {
                        m.next_page();
                    }))
                />
            </div>
        </div>
    }
}

/// 新建商店，店主通过邮箱关联到已有用户
#[component]
fn CreateStoreCard(on_created: Callback<()>) -> impl IntoView {
    let api = use_api();
    let open = RwSignal::new(false);
    let form = NewStoreForm::new();
    let submission = Submission::new();
    let notice = RwSignal::new(Option::<String>::None);

    let close = move || {
        form.reset();
        submission.reset();
        open.set(false);
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let req = form.to_request();
        let problems = validate_new_store(&req);
        if !problems.is_empty() {
            submission.fail(problems.iter().map(ToString::to_string).collect());
            return;
        }
        if !submission.begin() {
            return;
        }

        let api = api.clone();
        spawn_local(async move {
            match api.create_store(&req).await {
                Ok(_) => {
                    log::info!("[Admin] Created store {}", req.name);
                    notice.set(Some(format!("Store {} created", req.name)));
                    close();
                    on_created.run(());
                }
                Err(e) => submission.fail(e.messages("Failed to create store")),
            }
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h3 class="card-title">"Add Store"</h3>
                    <Show when=move || !open.get()>
                        <button
                            class="btn btn-primary btn-sm"
                            on:click=move |_| {
                                notice.set(None);
                                open.set(true);
                            }
                        >
                            "New Store"
                        </button>
                    </Show>
                </div>

                <Show when=move || notice.get().is_some()>
                    <div role="alert" class="alert alert-success text-sm py-2">
                        <span>{move || notice.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <Show when=move || open.get()>
                    <form class="space-y-2" on:submit=on_submit.clone()>
                        <ErrorAlert errors=submission.errors />
                        <div class="grid gap-2 md:grid-cols-2">
                            <TextField id="new_store_name" label="Store name" value=form.name />
                            <TextField id="new_store_email" label="Store email" input_type="email" value=form.email />
                            <TextField
                                id="new_store_owner"
                                label="Owner email"
                                input_type="email"
                                placeholder="owner@example.com"
                                value=form.owner_email
                            />
                        </div>
                        <TextField id="new_store_address" label="Address" value=form.address multiline=true />
                        <div class="flex gap-2 justify-end pt-2">
                            <button type="button" class="btn btn-ghost" on:click=move |_| close()>
                                "Cancel"
                            </button>
                            <button class="btn btn-primary" disabled=move || submission.submitting.get()>
                                {move || if submission.submitting.get() { "Creating..." } else { "Create Store" }}
                            </button>
                        </div>
                    </form>
                </Show>
            </div>
        </div>
    }
}
