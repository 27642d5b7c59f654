use leptos::prelude::*;
use leptos::task::spawn_local;
use rateboard_shared::validation::validate_password_change;

use crate::auth::{refresh_profile, use_api, use_auth};
use crate::components::form_state::{PasswordForm, Submission};
use crate::components::widgets::{ErrorAlert, TextField};

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();

    // 后台刷新资料，失败时保留本地记录
    Effect::new({
        let api = api.clone();
        move |_| {
            let api = api.clone();
            spawn_local(async move { refresh_profile(&auth, &api).await });
        }
    });

    let user = move || auth.state.with(|s| s.user().cloned());

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h2 class="card-title">"Profile"</h2>
                {move || {
                    user()
                        .map(|user| {
                            view! {
                                <div class="grid gap-3 md:grid-cols-2">
                                    <ProfileRow label="Name" value=user.name />
                                    <ProfileRow label="Email" value=user.email />
                                    <ProfileRow label="Address" value=user.address />
                                    <div>
                                        <div class="text-sm text-base-content/60">"Role"</div>
                                        <span class="badge badge-primary">{user.role.label()}</span>
                                    </div>
                                </div>
                            }
                        })
                }}
            </div>
        </div>

        <PasswordSection api=api />
    }
}

#[component]
fn ProfileRow(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div>
            <div class="text-sm text-base-content/60">{label}</div>
            <div class="font-semibold">{value}</div>
        </div>
    }
}

/// 修改密码：展开 / 收起，取消时重置表单
#[component]
fn PasswordSection(api: crate::api::Api) -> impl IntoView {
    let open = RwSignal::new(false);
    let form = PasswordForm::new();
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
        let mut problems: Vec<String> = validate_password_change(&req)
            .iter()
            .map(ToString::to_string)
            .collect();
        if !form.passwords_match() {
            problems.push("New passwords do not match".to_string());
        }
        if !problems.is_empty() {
            submission.fail(problems);
            return;
        }
        if !submission.begin() {
            return;
        }

        let api = api.clone();
        spawn_local(async move {
            match api.update_password(&req).await {
                Ok(res) => {
                    let message = if res.message.is_empty() {
                        "Password updated successfully".to_string()
                    } else {
                        res.message
                    };
                    notice.set(Some(message));
                    close();
                }
                Err(e) => submission.fail(e.messages("Failed to update password")),
            }
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h3 class="card-title">"Password"</h3>
                    <Show when=move || !open.get()>
                        <button
                            class="btn btn-outline btn-sm"
                            on:click=move |_| {
                                notice.set(None);
                                open.set(true);
                            }
                        >
                            "Change Password"
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
                        <TextField
                            id="current_password"
                            label="Current password"
                            input_type="password"
                            value=form.current_password
                        />
                        <TextField
                            id="new_password"
                            label="New password"
                            input_type="password"
                            value=form.new_password
                        />
                        <TextField
                            id="confirm_password"
                            label="Confirm new password"
                            input_type="password"
                            value=form.confirm_password
                        />
                        <div class="flex gap-2 justify-end pt-2">
                            <button type="button" class="btn btn-ghost" on:click=move |_| close()>
                                "Cancel"
                            </button>
                            <button class="btn btn-primary" disabled=move || submission.submitting.get()>
                                {move || if submission.submitting.get() { "Updating..." } else { "Update Password" }}
                            </button>
                        </div>
                    </form>
                </Show>
            </div>
        </div>
    }
}
