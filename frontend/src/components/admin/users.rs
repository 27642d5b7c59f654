use leptos::prelude::*;
use leptos::task::spawn_local;
use rateboard_shared::Role;
use rateboard_shared::protocol::{ListUsersRequest, UserSortField};
use rateboard_shared::validation::validate_new_user;

use crate::auth::use_api;
use crate::components::form_state::{NewUserForm, Submission};
use crate::components::widgets::{ErrorAlert, Pager, SortButton, Spinner, TextField};
use crate::views::{UsersModel, format_average};

/// 管理员：用户列表（搜索、角色筛选、排序、分页）与新建用户
#[component]
pub fn AdminUsersPage() -> impl IntoView {
    let api = use_api();
    let model = RwSignal::new(UsersModel::default());

    let fetch = Callback::new(move |req: ListUsersRequest| {
        let Some(ticket) = model.try_update(|m| m.list.begin_fetch()) else {
            return;
        };
        let api = api.clone();
        spawn_local(async move {
            let result = api
                .list_users(&req)
                .await
                .map(|page| (page.users, page.pagination));
            model.update(|m| {
                m.list.finish_fetch(ticket, result, "Failed to fetch users");
            });
        });
    });

    let query = Memo::new(move |_| model.with(UsersModel::request));
    Effect::new(move |_| fetch.run(query.get()));
    let reload = Callback::new(move |_: ()| fetch.run(query.get_untracked()));

    let sort = Signal::derive(move || model.with(|m| m.list.sort));
    let on_sort = Callback::new(move |field: UserSortField| model.update(|m| m.list.toggle_sort(field)));
    let pagination = Signal::derive(move || model.with(|m| m.list.pagination));
    let errors = Signal::derive(move || model.with(|m| m.list.error.iter().cloned().collect::<Vec<_>>()));

    let rows = move || {
        model.with(|m| {
            m.list
                .items
                .iter()
                .cloned()
                .map(|user| {
                    let rating = match user.role {
                        Role::StoreOwner => format_average(user.average_rating),
                        Role::Admin | Role::NormalUser => "-".to_string(),
                    };
                    let store = user.store.map(|s| s.name).unwrap_or_else(|| "-".to_string());
                    view! {
                        <tr>
                            <td class="font-semibold">{user.name}</td>
                            <td>{user.email}</td>
                            <td class="hidden lg:table-cell">{user.address}</td>
                            <td><span class="badge badge-outline">{user.role.label()}</span></td>
                            <td class="hidden md:table-cell">{store}</td>
                            <td>{rating}</td>
                        </tr>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <div class="flex items-center justify-between">
            <h2 class="text-2xl font-bold">"Users"</h2>
        </div>

        <CreateUserCard on_created=reload />

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="flex flex-col md:flex-row gap-2 p-6 pb-2">
                    <input
                        type="search"
                        placeholder="Search by name, email or address"
                        class="input input-bordered input-sm w-full md:w-72"
                        prop:value=move || model.with(|m| m.list.search.clone())
                        on:input=move |ev| model.update(|m| m.list.set_search(event_target_value(&ev)))
                    />
                    <select
                        class="select select-bordered select-sm"
                        on:change=move |ev| {
                            let role = Role::parse(&event_target_value(&ev));
                            model.update(|m| m.set_role(role));
                        }
                    >
                        <option value="">"All roles"</option>
                        {Role::ALL
                            .into_iter()
                            .map(|role| view! { <option value=role.as_str()>{role.label()}</option> })
                            .collect_view()}
                    </select>
                </div>

                <ErrorAlert errors=errors />

                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th><SortButton label="Name" field=UserSortField::Name sort=sort on_toggle=on_sort /></th>
                                <th><SortButton label="Email" field=UserSortField::Email sort=sort on_toggle=on_sort /></th>
                                <th class="hidden lg:table-cell">
                                    <SortButton label="Address" field=UserSortField::Address sort=sort on_toggle=on_sort />
                                </th>
                                <th><SortButton label="Role" field=UserSortField::Role sort=sort on_toggle=on_sort /></th>
                                <th class="hidden md:table-cell">"Store"</th>
                                <th>"Rating"</th>
                            </tr>
                        </thead>
                        <tbody>{rows}</tbody>
                    </table>
                </div>

                <Show when=move || model.with(|m| m.list.loading && m.list.items.is_empty())>
                    <Spinner />
                </Show>
                <Show when=move || model.with(|m| m.list.is_empty())>
                    <p class="text-center py-8 text-base-content/50">"No users found."</p>
                </Show>

                <Pager
                    pagination=pagination
                    on_prev=Callback::new(move |_: ()| model.update(|m| {
                        m.list.prev_page();
                    }))
                    on_next=Callback::new(move |_: ()| model.update(|m| {
                        m.list.next_page();
                    }))
                />
            </div>
        </div>
    }
}

/// 新建用户表单，成功后通知父组件刷新列表
#[component]
fn CreateUserCard(on_created: Callback<()>) -> impl IntoView {
    let api = use_api();
    let open = RwSignal::new(false);
    let form = NewUserForm::new();
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
        let problems = validate_new_user(&req);
        if !problems.is_empty() {
            submission.fail(problems.iter().map(ToString::to_string).collect());
            return;
        }
        if !submission.begin() {
            return;
        }

        let api = api.clone();
        spawn_local(async move {
            match api.create_user(&req).await {
                Ok(_) => {
                    log::info!("[Admin] Created user {}", req.email);
                    notice.set(Some(format!("User {} created", req.email)));
                    close();
                    on_created.run(());
                }
                Err(e) => submission.fail(e.messages("Failed to create user")),
            }
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h3 class="card-title">"Add User"</h3>
                    <Show when=move || !open.get()>
                        <button
                            class="btn btn-primary btn-sm"
                            on:click=move |_| {
                                notice.set(None);
                                open.set(true);
                            }
                        >
                            "New User"
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
                            <TextField id="new_user_name" label="Name" value=form.name />
                            <TextField id="new_user_email" label="Email" input_type="email" value=form.email />
                            <TextField id="new_user_password" label="Password" input_type="password" value=form.password />
                            <div class="form-control">
                                <label class="label" for="new_user_role">
                                    <span class="label-text">"Role"</span>
                                </label>
                                <select
                                    id="new_user_role"
                                    class="select select-bordered w-full"
                                    on:change=move |ev| {
                                        if let Some(role) = Role::parse(&event_target_value(&ev)) {
                                            form.role.set(role);
                                        }
                                    }
                                    prop:value=move || form.role.get().as_str()
                                >
                                    {Role::ALL
                                        .into_iter()
                                        .map(|role| view! { <option value=role.as_str()>{role.label()}</option> })
                                        .collect_view()}
                                </select>
                            </div>
                        </div>
                        <TextField id="new_user_address" label="Address" value=form.address multiline=true />
                        <div class="flex gap-2 justify-end pt-2">
                            <button type="button" class="btn btn-ghost" on:click=move |_| close()>
                                "Cancel"
                            </button>
                            <button class="btn btn-primary" disabled=move || submission.submitting.get()>
                                {move || if submission.submitting.get() { "Creating..." } else { "Create User" }}
                            </button>
                        </div>
                    </form>
                </Show>
            </div>
        </div>
    }
}
