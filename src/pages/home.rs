use leptos::prelude::*;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::app::AppContext;
use crate::components::bottom_nav::BottomNav;
use crate::components::recipe_card::RecipeCard;
use crate::query_cache::{fetch_or_cached, CacheEvent, QueryKey};
use crate::view_state::profile::RecipeCard as Card;

#[derive(Debug, Clone, PartialEq, Eq)]
enum FeedState {
    Loading,
    Loaded(Vec<Card>),
    Failed(String),
}

/// Latest recipes from everyone. Reloads when the cached list is invalidated.
#[component]
pub fn HomePage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let feed = RwSignal::new(FeedState::Loading);

    let load = move || {
        let Some(services) = ctx.services.try_get_value() else {
            return;
        };
        spawn_local(async move {
            let client = &*services.client;
            let result =
                fetch_or_cached(&services.cache, QueryKey::recipes(), || api::list_recipes(client)).await;
            let next = match result {
                Ok(recipes) => FeedState::Loaded(recipes.iter().map(Card::from).collect()),
                Err(e) => {
                    warn!("Failed to load recipe feed: {}", e);
                    FeedState::Failed(e.to_string())
                }
            };
            feed.try_set(next);
        });
    };
    load();

    let subscription = ctx.services.try_with_value(|s| {
        s.cache.subscribe(move |event| match event {
            CacheEvent::Invalidated(prefix) if QueryKey::recipes().starts_with(prefix) => load(),
            CacheEvent::Cleared => load(),
            CacheEvent::Invalidated(_) => {}
        })
    });
    on_cleanup(move || {
        if let Some(id) = subscription {
            ctx.services.try_with_value(|s| s.cache.unsubscribe(id));
        }
    });

    view! {
        <div class="page home-page">
            <h2>"FoodBook"</h2>
            <p class="page-description">"Fresh recipes from the community."</p>

            {move || match feed.get() {
                FeedState::Loading => view! {
                    <div class="status-screen">
                        <div class="spinner"></div>
                    </div>
                }.into_any(),
                FeedState::Failed(message) => view! {
                    <p class="form-error">{format!("Couldn't load recipes: {}", message)}</p>
                }.into_any(),
                FeedState::Loaded(cards) if cards.is_empty() => view! {
                    <div class="empty-state">
                        <p>"No recipes yet."</p>
                        <a href="/create" class="btn btn-primary">"Share the first one"</a>
                    </div>
                }.into_any(),
                FeedState::Loaded(cards) => view! {
                    <div class="recipe-list">
                        {cards.into_iter().map(|card| view! { <RecipeCard card=card /> }).collect_view()}
                    </div>
                }.into_any(),
            }}
        </div>
        <BottomNav />
    }
}
