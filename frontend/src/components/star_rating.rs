use leptos::prelude::*;
use rateboard_shared::{MAX_RATING, MIN_RATING};

/// 五星评分
///
/// 传入 `on_rate` 时可点击，否则只读展示。
#[component]
pub fn StarRating(
    #[prop(into)] value: Signal<u8>,
    #[prop(into, optional)] disabled: MaybeProp<bool>,
    #[prop(optional)] on_rate: Option<Callback<u8>>,
) -> impl IntoView {
    let interactive = on_rate.is_some();

    let stars = (MIN_RATING..=MAX_RATING)
        .map(|star| {
            let tone = move || {
                if star <= value.get() {
                    "text-warning text-xl"
                } else {
                    "text-base-content/30 text-xl"
                }
            };
            let on_click = move |_: leptos::ev::MouseEvent| {
                if let Some(on_rate) = on_rate {
                    on_rate.run(star);
                }
            };

            view! {
                <button
                    type="button"
                    class=move || format!("btn btn-ghost btn-xs px-0.5 {}", tone())
                    aria-label=format!("{} star", star)
                    disabled=move || !interactive || disabled.get().unwrap_or(false)
                    on:click=on_click
                >
                    "★"
                </button>
            }
        })
        .collect_view();

    view! { <div class="flex items-center">{stars}</div> }
}
