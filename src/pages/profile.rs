use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::browser::FetchClient;
use crate::components::avatar::Avatar;
use crate::components::bottom_nav::BottomNav;
use crate::components::recipe_card::RecipeCard;
use crate::components::status_screen::{LoadingScreen, LoginPrompt};
use crate::query_cache::CacheEvent;
use crate::view_state::auth::AuthGate;
use crate::view_state::profile::{ProfileController, RecipeList};

type Controller = StoredValue<Rc<ProfileController<FetchClient>>, LocalStorage>;

#[component]
pub fn ProfilePage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let revision = RwSignal::new(0u64);
    let services = ctx.services.get_value();
    let cache = services.cache.clone();
    let controller: Controller = StoredValue::new_local(Rc::new(ProfileController::new(
        services,
        move || {
            revision.try_update(|r| *r += 1);
        },
    )));

    // Mirror every session change into the controller.
    Effect::new(move |_| {
        let session = ctx.session.get();
        let Some(c) = controller.try_get_value() else {
            return;
        };
        spawn_local(async move { c.sync_session(session).await });
    });

    // Stale entries are read again. A clear only happens on logout, which leaves the page.
    let subscription = cache.subscribe(move |event| {
        if !matches!(event, CacheEvent::Invalidated(_)) {
            return;
        }
        let Some(c) = controller.try_get_value() else {
            return;
        };
        spawn_local(async move { c.refresh().await });
    });

    on_cleanup(move || {
        controller.try_with_value(|c| c.teardown());
        ctx.services.try_with_value(|s| s.cache.unsubscribe(subscription));
    });

    let loading = Memo::new(move |_| {
        revision.track();
        controller.try_with_value(|c| c.is_loading()).unwrap_or(true)
    });
    let gate = Memo::new(move |_| AuthGate::from_session(&ctx.session.get()));

    move || {
        if gate.get() == AuthGate::LoginRequired {
            return view! { <LoginPrompt message="Sign in to see your profile and recipes." /> }
                .into_any();
        }
        if loading.get() {
            return view! { <LoadingScreen /> }.into_any();
        }
        view! { <ProfileContent controller=controller revision=revision /> }.into_any()
    }
}

#[component]
fn ProfileContent(controller: Controller, revision: RwSignal<u64>) -> impl IntoView {
    let profile = move || {
        revision.track();
        controller.try_with_value(|c| c.view()).flatten()
    };

    let on_logout = move |_| {
        let Some(c) = controller.try_get_value() else {
            return;
        };
        spawn_local(async move { c.logout().await });
    };

    move || {
        let Some(summary) = profile() else {
            return view! { <LoadingScreen /> }.into_any();
        };

        let name = summary.display_name.clone();
        let recipes = match summary.recipes {
            RecipeList::Empty => view! {
                <div class="empty-state">
                    <p>"You haven't shared any recipes yet."</p>
                    <a href="/create" class="btn btn-primary">"Create your first recipe"</a>
                </div>
            }
            .into_any(),
            RecipeList::Cards(cards) => view! {
                <div class="recipe-list">
                    {cards.into_iter().map(|card| view! { <RecipeCard card=card /> }).collect_view()}
                </div>
            }
            .into_any(),
        };

        view! {
            <div class="page profile-page">
                <section class="profile-header">
                    <Avatar
                        image_url=summary.avatar_url
                        initials=summary.initials
                        alt=name
                    />
                    <h2 class="profile-name">{summary.display_name}</h2>
                    {summary.email.map(|email| view! { <p class="profile-email">{email}</p> })}
                    {summary.bio.map(|bio| view! { <p class="profile-bio">{bio}</p> })}

                    <div class="profile-stats">
                        <div class="stat">
                            <span class="stat-value">{summary.recipe_count}</span>
                            <span class="stat-label">"Recipes"</span>
                        </div>
                        <div class="stat">
                            <span class="stat-value">{summary.followers}</span>
                            <span class="stat-label">"Followers"</span>
                        </div>
                        <div class="stat">
                            <span class="stat-value">{summary.following}</span>
                            <span class="stat-label">"Following"</span>
                        </div>
                    </div>

                    <div class="profile-actions">
                        // Profile editing has no screen yet.
                        <button class="btn btn-secondary" on:click=|_| {}>"Edit Profile"</button>
                        <button class="btn btn-ghost" on:click=on_logout>"Logout"</button>
                    </div>
                </section>

                <section class="profile-recipes">
                    <h3>"My Recipes"</h3>
                    {summary.load_error.map(|e| view! { <p class="form-error">{format!("Couldn't load recipes: {}", e)}</p> })}
                    {recipes}
                </section>
            </div>
            <BottomNav />
        }
        .into_any()
    }
}
