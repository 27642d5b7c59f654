//! 通用小组件：输入框、错误提示、加载占位、排序按钮与分页

use leptos::prelude::*;
use rateboard_shared::PaginationInfo;
use rateboard_shared::protocol::{Sort, SortField};

/// 绑定到 `RwSignal<String>` 的输入框
#[component]
pub fn TextField(
    #[prop(into)] id: String,
    #[prop(into)] label: String,
    value: RwSignal<String>,
    #[prop(into, default = "text".to_string())] input_type: String,
    #[prop(into, optional)] placeholder: String,
    /// 多行输入（地址）
    #[prop(optional)]
    multiline: bool,
) -> impl IntoView {
    let input = if multiline {
        view! {
            <textarea
                id=id.clone()
                placeholder=placeholder
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=move || value.get()
                class="textarea textarea-bordered w-full"
                rows="3"
            ></textarea>
        }
        .into_any()
    } else {
        view! {
            <input
                id=id.clone()
                type=input_type
                placeholder=placeholder
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=move || value.get()
                class="input input-bordered w-full"
            />
        }
        .into_any()
    };

    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            {input}
        </div>
    }
}

/// 错误列表，为空时不渲染
#[component]
pub fn ErrorAlert(#[prop(into)] errors: Signal<Vec<String>>) -> impl IntoView {
    view! {
        <Show when=move || errors.with(|e| !e.is_empty())>
            <div role="alert" class="alert alert-error text-sm py-2">
                <ul class="list-none">
                    {move || {
                        errors
                            .get()
                            .into_iter()
                            .map(|msg| view! { <li>{msg}</li> })
                            .collect_view()
                    }}
                </ul>
            </div>
        </Show>
    }
}

#[component]
pub fn Spinner() -> impl IntoView {
    view! {
        <div class="flex justify-center py-12">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

/// 列头排序按钮，显示当前排序方向
#[component]
pub fn SortButton<F>(
    label: &'static str,
    field: F,
    #[prop(into)] sort: Signal<Sort<F>>,
    on_toggle: Callback<F>,
) -> impl IntoView
where
    F: SortField + Send + Sync + 'static,
{
    view! {
        <button type="button" class="btn btn-ghost btn-xs" on:click=move |_| on_toggle.run(field)>
            {label}
            <span class="ml-1">{move || sort.get().indicator(field)}</span>
        </button>
    }
}

/// 上一页 / 下一页
#[component]
pub fn Pager(
    #[prop(into)] pagination: Signal<PaginationInfo>,
    on_prev: Callback<()>,
    on_next: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="flex items-center justify-between p-4">
            <span class="text-sm text-base-content/70">
                {move || {
                    let p = pagination.get();
                    format!("Page {} of {} ({} total)", p.current_page.max(1), p.total_pages.max(1), p.total_count)
                }}
            </span>
            <div class="join">
                <button
                    class="join-item btn btn-sm"
                    disabled=move || !pagination.get().has_prev
                    on:click=move |_| on_prev.run(())
                >
                    "Previous"
                </button>
                <button
                    class="join-item btn btn-sm"
                    disabled=move || !pagination.get().has_next
                    on:click=move |_| on_next.run(())
                >
                    "Next"
                </button>
            </div>
        </div>
    }
}
