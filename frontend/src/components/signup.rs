use leptos::prelude::*;
use leptos::task::spawn_local;
use rateboard_shared::validation::validate_signup;

use crate::auth::{login, use_api, use_auth};
use crate::components::form_state::{SignupForm, Submission};
use crate::components::widgets::{ErrorAlert, TextField};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// 注册页面，新账户默认为普通用户
#[component]
pub fn SignupPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();

    let form = SignupForm::new();
    let submission = Submission::new();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let req = form.to_request();
        let problems = validate_signup(&req);
        if !problems.is_empty() {
            submission.fail(problems.iter().map(ToString::to_string).collect());
            return;
        }
        if !submission.begin() {
            return;
        }

        let api = api.clone();
        spawn_local(async move {
            match api.signup(&req).await {
                Ok(res) => match login(&auth, res) {
                    Ok(()) => {
                        submission.finish();
                        router.navigate_to(AppRoute::Stores);
                    }
                    Err(e) => submission.fail(vec![e.to_string()]),
                },
                Err(e) => submission.fail(e.messages("Signup failed")),
            }
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-lg">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Create an account"</h1>
                    <p class="text-base-content/70">"Rate the stores you visit"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert errors=submission.errors />

                        <TextField id="name" label="Full name (20-60 characters)" value=form.name />
                        <TextField id="email" label="Email" input_type="email" value=form.email />
                        <TextField
                            id="password"
                            label="Password (8-16 characters, one uppercase, one special)"
                            input_type="password"
                            value=form.password
                        />
                        <TextField id="address" label="Address" value=form.address multiline=true />

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || submission.submitting.get()>
                                {move || if submission.submitting.get() { "Creating account..." } else { "Sign up" }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Already registered? "
                            <Link to=AppRoute::Login class="link link-primary">"Sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
