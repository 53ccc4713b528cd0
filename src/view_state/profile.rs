//! State of the profile screen: session mirror, the user's own recipes, logout.

use std::cell::RefCell;

use tracing::{info, warn};

use crate::api;
use crate::error::ApiError;
use crate::models::RecipeSummary;
use crate::query_cache::{fetch_or_cached, QueryKey};
use crate::services::{Lifetime, RequestClient, Services};
use crate::session::SessionState;
use crate::view_state::auth::{react_to_unauthorized, PendingRedirects};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RecipesQuery {
    /// No user id known yet; nothing is requested.
    #[default]
    Disabled,
    Loading,
    Loaded(Vec<RecipeSummary>),
    Failed(ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileState {
    pub session: SessionState,
    pub recipes: RecipesQuery,
}

impl Default for ProfileState {
    fn default() -> Self {
        Self {
            session: SessionState::loading(),
            recipes: RecipesQuery::Disabled,
        }
    }
}

impl ProfileState {
    pub fn is_loading(&self) -> bool {
        self.session.loading || matches!(self.recipes, RecipesQuery::Loading)
    }

    fn session_absent(&self) -> bool {
        !self.session.loading && self.session.user.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub cook_time: Option<String>,
    pub servings: Option<String>,
    pub likes: u32,
}

impl From<&RecipeSummary> for RecipeCard {
    fn from(recipe: &RecipeSummary) -> Self {
        Self {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            image_url: recipe.image_url.clone().filter(|url| !url.is_empty()),
            cook_time: recipe.cook_time.clone().filter(|t| !t.is_empty()),
            servings: recipe.servings.clone().filter(|s| !s.is_empty()),
            likes: recipe.likes_count.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeList {
    Empty,
    Cards(Vec<RecipeCard>),
}

/// Everything the profile page renders once a user is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub display_name: String,
    pub initials: String,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub recipe_count: usize,
    pub followers: u32,
    pub following: u32,
    pub recipes: RecipeList,
    /// Set when the recipe list could not be loaded.
    pub load_error: Option<String>,
}

pub struct ProfileController<C: RequestClient> {
    services: Services<C>,
    state: RefCell<ProfileState>,
    lifetime: Lifetime,
    redirects: PendingRedirects,
    on_change: Box<dyn Fn()>,
}

impl<C: RequestClient> ProfileController<C> {
    pub fn new(services: Services<C>, on_change: impl Fn() + 'static) -> Self {
        Self {
            services,
            state: RefCell::new(ProfileState::default()),
            lifetime: Lifetime::new(),
            redirects: PendingRedirects::default(),
            on_change: Box::new(on_change),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> ProfileState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Mirror a new session value. Reacts once when the session turns out empty
    /// and starts the recipe query when a user id appears.
    pub async fn sync_session(&self, session: SessionState) {
        if !self.lifetime.is_alive() {
            return;
        }
        let (was_absent, previous_id) = {
            let state = self.state.borrow();
            (state.session_absent(), state.session.user_id().map(str::to_string))
        };
        let user_id = session.user_id().map(str::to_string);
        let user_changed = previous_id != user_id;

        self.update(|s| {
            s.session = session;
            if user_changed {
                s.recipes = if user_id.is_some() {
                    RecipesQuery::Loading
                } else {
                    RecipesQuery::Disabled
                };
            }
        });

        if !was_absent && self.state.borrow().session_absent() {
            info!("No signed-in user on the profile screen");
            react_to_unauthorized(&self.services, &self.lifetime, &self.redirects);
        }

        if let (true, Some(id)) = (user_changed, user_id) {
            self.load_recipes(id).await;
        }
    }

    /// Re-read the current user's recipes, e.g. after the cache entry went stale.
    pub async fn refresh(&self) {
        let user_id = self.state.borrow().session.user_id().map(str::to_string);
        if let Some(id) = user_id {
            self.load_recipes(id).await;
        }
    }

    async fn load_recipes(&self, user_id: String) {
        let client = &*self.services.client;
        let result = fetch_or_cached(
            &self.services.cache,
            QueryKey::user_recipes(&user_id),
            || api::list_user_recipes(client, &user_id),
        )
        .await;

        if !self.lifetime.is_alive() {
            return;
        }
        if self.state.borrow().session.user_id() != Some(user_id.as_str()) {
            // The session moved on while this request was out.
            return;
        }

        match result {
            Ok(recipes) => self.update(|s| s.recipes = RecipesQuery::Loaded(recipes)),
            Err(e) => {
                if e.is_unauthorized() {
                    react_to_unauthorized(&self.services, &self.lifetime, &self.redirects);
                } else {
                    warn!("Failed to load recipes for user {}: {}", user_id, e);
                }
                self.update(|s| s.recipes = RecipesQuery::Failed(e));
            }
        }
    }

    /// Render model, or `None` while there is no user to show.
    pub fn view(&self) -> Option<ProfileView> {
        let state = self.state.borrow();
        let user = state.session.user.as_ref()?;

        let (recipes, load_error) = match &state.recipes {
            RecipesQuery::Loaded(list) => (list.as_slice(), None),
            RecipesQuery::Failed(e) => (&[][..], Some(e.to_string())),
            RecipesQuery::Disabled | RecipesQuery::Loading => (&[][..], None),
        };
        let list = if recipes.is_empty() {
            RecipeList::Empty
        } else {
            RecipeList::Cards(recipes.iter().map(RecipeCard::from).collect())
        };

        Some(ProfileView {
            display_name: user.display_name(),
            initials: user.initials(),
            email: user.email.clone().filter(|e| !e.is_empty()),
            bio: user.bio.clone().filter(|b| !b.is_empty()),
            avatar_url: user.profile_image_url.clone().filter(|u| !u.is_empty()),
            recipe_count: recipes.len(),
            followers: user.followers_count.unwrap_or(0),
            following: user.following_count.unwrap_or(0),
            recipes: list,
            load_error,
        })
    }

    /// Best-effort server logout; the local session is dropped either way.
    pub async fn logout(&self) {
        info!("Logging out");
        if let Err(e) = api::logout(&*self.services.client).await {
            warn!("Logout request failed, clearing local session anyway: {}", e);
        }
        self.services.cache.clear();
        self.services.navigator.redirect("/");
    }

    pub fn teardown(&self) {
        self.lifetime.end();
        self.redirects.cancel_all();
    }

    fn update(&self, f: impl FnOnce(&mut ProfileState)) {
        if !self.lifetime.is_alive() {
            return;
        }
        f(&mut self.state.borrow_mut());
        (self.on_change)();
    }
}
