use leptos::prelude::*;

use crate::app::AppContext;
use crate::components::bottom_nav::BottomNav;

/// Placeholder while the session is resolving. Takes no input.
#[component]
pub fn LoadingScreen() -> impl IntoView {
    view! {
        <div class="page status-screen">
            <div class="spinner"></div>
            <p>"Loading..."</p>
        </div>
        <BottomNav />
    }
}

/// Shown instead of a signed-in screen when nobody is signed in.
#[component]
pub fn LoginPrompt(#[prop(into)] message: String) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let on_login = move |_| {
        ctx.services.with_value(|s| s.navigator.redirect(&s.config.login_path));
    };

    view! {
        <div class="page status-screen">
            <h2>"Sign in to continue"</h2>
            <p class="page-description">{message}</p>
            <button class="btn btn-primary" on:click=on_login>"Log In"</button>
        </div>
        <BottomNav />
    }
}
