use leptos::prelude::*;

fn collect_files(files: Option<web_sys::FileList>) -> Vec<web_sys::File> {
    files
        .map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect())
        .unwrap_or_default()
}

/// Drop zone plus file picker for the recipe photo. Hands every selection to
/// `on_files` unfiltered, including drops made while an upload is running;
/// the caller checks limits and reports a busy uploader.
#[component]
pub fn ImageUploader(
    #[prop(into)] image_url: Signal<Option<String>>,
    #[prop(into)] status: Signal<Option<String>>,
    #[prop(into)] on_files: Callback<Vec<web_sys::File>>,
    #[prop(into)] on_remove: Callback<()>,
) -> impl IntoView {
    let (is_over, set_is_over) = signal(false);
    let file_input_id = "recipe-image-input";

    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        set_is_over.set(false);
        let files = collect_files(ev.data_transfer().and_then(|dt| dt.files()));
        on_files.run(files);
    };

    let on_input_change = move |ev: web_sys::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        let files = collect_files(input.files());
        // Allow picking the same file again after a rejection.
        input.set_value("");
        on_files.run(files);
    };

    view! {
        <Show
            when=move || image_url.get().is_some()
            fallback=move || view! {
                <div
                    class="drop-zone"
                    class:drop-zone-active=move || is_over.get()
                    class:drop-zone-loading=move || status.get().is_some()
                    on:dragover=move |ev: web_sys::DragEvent| {
                        ev.prevent_default();
                        set_is_over.set(true);
                    }
                    on:dragleave=move |_| set_is_over.set(false)
                    on:drop=on_drop
                >
                    {move || match status.get() {
                        Some(message) => view! {
                            <div class="drop-zone-loading-content">
                                <div class="spinner"></div>
                                <p>{message}</p>
                            </div>
                        }.into_any(),
                        None => view! {
                            <div class="drop-zone-content">
                                <p class="drop-main">"Add a photo of your dish"</p>
                                <label for=file_input_id class="btn btn-secondary">
                                    "Choose Image"
                                </label>
                                <input
                                    type="file"
                                    id=file_input_id
                                    accept="image/*"
                                    style="display: none"
                                    on:change=on_input_change
                                />
                                <p class="drop-formats">"One image, up to 10 MB"</p>
                            </div>
                        }.into_any(),
                    }}
                </div>
            }
        >
            <div class="image-preview">
                <img src=move || image_url.get().unwrap_or_default() alt="Recipe image" />
                <button type="button" class="btn btn-secondary image-remove" on:click=move |_| on_remove.run(())>
                    "Remove"
                </button>
            </div>
        </Show>
    }
}
