use leptos::prelude::*;

#[component]
pub fn BottomNav() -> impl IntoView {
    view! {
        <nav class="bottom-nav">
            <ul class="nav-list">
                <li class="nav-item">
                    <a href="/" class="nav-link">"Home"</a>
                </li>
                <li class="nav-item">
                    <a href="/create" class="nav-link nav-link-create">"Create"</a>
                </li>
                <li class="nav-item">
                    <a href="/profile" class="nav-link">"Profile"</a>
                </li>
            </ul>
        </nav>
    }
}
