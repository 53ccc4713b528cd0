use leptos::prelude::*;

/// Profile picture, or the user's initials when there is none.
#[component]
pub fn Avatar(
    image_url: Option<String>,
    #[prop(into)] initials: String,
    #[prop(into)] alt: String,
) -> impl IntoView {
    match image_url {
        Some(src) => view! { <img class="avatar avatar-image" src=src alt=alt /> }.into_any(),
        None => view! { <div class="avatar avatar-fallback">{initials}</div> }.into_any(),
    }
}
