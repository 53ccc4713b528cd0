use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::hooks::use_navigate;
use leptos_router::path;
use wasm_bindgen_futures::spawn_local;

use crate::browser::{BrowserNavigator, FetchClient, TimeoutScheduler};
use crate::components::toaster::{ToastHub, ToastStack};
use crate::config::AppConfig;
use crate::pages::create_recipe::CreateRecipePage;
use crate::pages::home::HomePage;
use crate::pages::profile::ProfilePage;
use crate::query_cache::QueryCache;
use crate::services::Services;
use crate::session::{load_session, SessionState};

/// Shared by every page. Built once per app, never torn down.
#[derive(Clone, Copy)]
pub struct AppContext {
    pub services: StoredValue<Services<FetchClient>, LocalStorage>,
    pub session: RwSignal<SessionState>,
}

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    view! {
        <Router>
            <AppShell config=config />
        </Router>
    }
}

/// Lives inside the router so services can navigate.
#[component]
fn AppShell(config: AppConfig) -> impl IntoView {
    let toasts = ToastHub::new(config.toast_duration());
    let navigate = use_navigate();
    let services = Services {
        client: Rc::new(FetchClient::new(&config.api_base)),
        cache: QueryCache::new(),
        toasts: Rc::new(toasts),
        navigator: Rc::new(BrowserNavigator::new(move |path| {
            navigate(path, Default::default())
        })),
        scheduler: Rc::new(TimeoutScheduler),
        config,
    };

    let session = RwSignal::new(SessionState::loading());
    let ctx = AppContext {
        services: StoredValue::new_local(services),
        session,
    };
    provide_context(ctx);

    // Resolve who is signed in once per page load.
    spawn_local(async move {
        let Some(services) = ctx.services.try_get_value() else {
            return;
        };
        let state = load_session(&*services.client, &services.cache).await;
        session.try_set(state);
    });

    view! {
        <div class="app-layout">
            <main class="content">
                <Routes fallback=|| view! { <p class="not-found">"Page not found"</p> }>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/create") view=CreateRecipePage />
                    <Route path=path!("/profile") view=ProfilePage />
                </Routes>
            </main>
            <ToastStack hub=toasts />
        </div>
    }
}
