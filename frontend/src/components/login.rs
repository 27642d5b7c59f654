use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{login, use_api, use_auth};
use crate::components::form_state::{LoginForm, Submission};
use crate::components::widgets::{ErrorAlert, TextField};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();

    let form = LoginForm::new();
    let submission = Submission::new();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let req = form.to_request();
        if req.email.is_empty() || req.password.is_empty() {
            submission.fail(vec!["Please fill in all fields".to_string()]);
            return;
        }
        if !submission.begin() {
            return;
        }

        let api = api.clone();
        spawn_local(async move {
            match api.login(&req).await {
                Ok(res) => match login(&auth, res) {
                    Ok(()) => {
                        submission.finish();
                        router.navigate_to(AppRoute::Root);
                    }
                    Err(e) => submission.fail(vec![e.to_string()]),
                },
                Err(e) => submission.fail(e.messages("Login failed")),
            }
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Store Rating Platform"</h1>
                    <p class="text-base-content/70">"Sign in to your account"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert errors=submission.errors />

                        <TextField
                            id="email"
                            label="Email"
                            input_type="email"
                            placeholder="you@example.com"
                            value=form.email
                        />
                        <TextField
                            id="password"
                            label="Password"
                            input_type="password"
                            placeholder="••••••••"
                            value=form.password
                        />

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || submission.submitting.get()>
                                {move || if submission.submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign in".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Don't have an account? "
                            <Link to=AppRoute::Signup class="link link-primary">"Sign up"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
