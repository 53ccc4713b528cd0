//! State and request lifecycle of the create-recipe screen.
//!
//! The controller owns the draft, runs at most one image upload and at most one
//! create request at a time, and reports every change through `on_change` so the
//! view can re-render.

use std::cell::RefCell;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api;
use crate::error::ApiError;
use crate::models::{Difficulty, RecipeField, RecipeFields, RecipeSummary};
use crate::query_cache::QueryKey;
use crate::services::{FileLike, Lifetime, RequestClient, Services, Toast};
use crate::validation::{self, FieldErrors};
use crate::view_state::auth::{react_to_unauthorized, PendingRedirects};
use crate::view_state::upload::{check_selection, UploadFailure, UploadOutcome, UploadPhase};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateRecipeState {
    pub fields: RecipeFields,
    /// UI-only selection, merged into the payload after validation.
    pub difficulty: Difficulty,
    pub image_url: Option<String>,
    pub errors: FieldErrors,
    pub upload: UploadPhase,
    pub submitting: bool,
    /// Set by the first submit attempt; from then on edits re-validate their field.
    pub submit_attempted: bool,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("A submission is already in flight")]
    InFlight,

    #[error("{} field(s) need attention", .0.len())]
    Invalid(FieldErrors),

    #[error("Not signed in")]
    Unauthorized,

    #[error(transparent)]
    Api(ApiError),
}

pub struct CreateRecipeController<C: RequestClient> {
    services: Services<C>,
    state: RefCell<CreateRecipeState>,
    lifetime: Lifetime,
    redirects: PendingRedirects,
    on_change: Box<dyn Fn()>,
}

impl<C: RequestClient> CreateRecipeController<C> {
    pub fn new(services: Services<C>, on_change: impl Fn() + 'static) -> Self {
        Self {
            services,
            state: RefCell::new(CreateRecipeState::default()),
            lifetime: Lifetime::new(),
            redirects: PendingRedirects::default(),
            on_change: Box::new(on_change),
        }
    }

    pub fn state(&self) -> CreateRecipeState {
        self.state.borrow().clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.borrow().submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            "Publishing..."
        } else {
            "Post"
        }
    }

    pub fn set_field(&self, field: RecipeField, value: String) {
        self.update(|s| {
            s.fields.set(field, value);
            if s.submit_attempted {
                let message = validation::validate_field(&s.fields, field);
                s.errors.set(field, message);
            }
        });
    }

    pub fn select_difficulty(&self, difficulty: Difficulty) {
        self.update(|s| s.difficulty = difficulty);
    }

    /// Detach the image from the draft. The stored object is left in place.
    pub fn remove_image(&self) {
        self.update(|s| s.image_url = None);
    }

    /// Leave the screen without saving; the draft is discarded.
    pub fn close(&self) {
        self.services.navigator.navigate("/");
    }

    /// Attach an image: check limits, obtain an upload URL, PUT the file, remember the URL.
    pub async fn attach_image(&self, files: Vec<C::File>) -> UploadOutcome {
        if !self.lifetime.is_alive() {
            return UploadOutcome::Cancelled;
        }
        if self.state.borrow().upload.is_busy() {
            debug!("Ignoring image selection while an upload is running");
            self.services.toasts.show(Toast::error(
                "Upload In Progress",
                "Please wait for the current image to finish uploading.",
            ));
            return UploadOutcome::Failure(UploadFailure::InProgress);
        }

        let file = match check_selection(&files) {
            Ok(Some(file)) => file,
            Ok(None) => return UploadOutcome::Cancelled,
            Err(failure) => {
                warn!("Image rejected: {}", failure);
                self.services
                    .toasts
                    .show(Toast::error("Image Not Added", failure.to_string()));
                return UploadOutcome::Failure(failure);
            }
        };

        self.update(|s| s.upload = UploadPhase::RequestingTarget);
        let client = &*self.services.client;

        let target = match api::request_upload_target(client).await {
            Ok(target) => target,
            Err(e) => {
                if !self.lifetime.is_alive() {
                    return UploadOutcome::Cancelled;
                }
                self.update(|s| s.upload = UploadPhase::Idle);
                if e.is_unauthorized() {
                    react_to_unauthorized(&self.services, &self.lifetime, &self.redirects);
                    return UploadOutcome::Failure(UploadFailure::Unauthorized);
                }
                warn!("Failed to get upload URL: {}", e);
                self.services.toasts.show(Toast::error(
                    "Upload Error",
                    "Failed to get upload URL. Please try again.",
                ));
                return UploadOutcome::Failure(UploadFailure::TargetUnavailable(e.to_string()));
            }
        };

        if !self.lifetime.is_alive() {
            return UploadOutcome::Cancelled;
        }
        self.update(|s| {
            s.upload = UploadPhase::Transferring {
                file_name: file.name(),
            }
        });

        if let Err(e) = api::upload_file(client, &target, file).await {
            if !self.lifetime.is_alive() {
                return UploadOutcome::Cancelled;
            }
            self.update(|s| s.upload = UploadPhase::Idle);
            warn!("Image transfer failed: {}", e);
            self.services.toasts.show(Toast::error(
                "Upload Error",
                "Failed to upload image. Please try again.",
            ));
            return UploadOutcome::Failure(UploadFailure::TransferFailed(e.to_string()));
        }

        if !self.lifetime.is_alive() {
            return UploadOutcome::Cancelled;
        }
        let url = target.upload_url;
        self.update(|s| {
            s.upload = UploadPhase::Idle;
            s.image_url = Some(url.clone());
        });
        info!("Recipe image uploaded");
        self.services.toasts.show(Toast::info(
            "Image Uploaded",
            "Your recipe image has been uploaded successfully.",
        ));
        UploadOutcome::Success(url)
    }

    /// Validate, then publish. At most one request is in flight per controller.
    /// `Ok(None)` means the backend accepted the recipe without echoing it back.
    pub async fn submit(&self) -> Result<Option<RecipeSummary>, SubmitError> {
        if self.is_submitting() {
            debug!("Ignoring submit while a previous one is in flight");
            return Err(SubmitError::InFlight);
        }

        let validated = {
            let state = self.state.borrow();
            validation::validate(&state.fields)
                .map(|fields| fields.into_recipe(state.difficulty, state.image_url.clone()))
        };
        let recipe = match validated {
            Ok(recipe) => recipe,
            Err(errors) => {
                self.update(|s| {
                    s.errors = errors.clone();
                    s.submit_attempted = true;
                });
                return Err(SubmitError::Invalid(errors));
            }
        };

        self.update(|s| {
            s.errors = FieldErrors::default();
            s.submit_attempted = true;
            s.submitting = true;
        });
        info!("Publishing recipe '{}'", recipe.title);

        let result = api::create_recipe(&*self.services.client, &recipe).await;
        let alive = self.lifetime.is_alive();
        self.update(|s| s.submitting = false);

        match result {
            Ok(created) => {
                if alive {
                    self.services.toasts.show(Toast::info(
                        "Recipe Created!",
                        "Your recipe has been published successfully.",
                    ));
                }
                // The backend changed whether or not this view is still mounted.
                self.services.cache.invalidate(&QueryKey::recipes());
                self.services.cache.invalidate(&QueryKey::new(["users"]));
                if alive {
                    self.services.navigator.navigate("/");
                }
                Ok(created)
            }
            Err(e) if e.is_unauthorized() => {
                if alive {
                    react_to_unauthorized(&self.services, &self.lifetime, &self.redirects);
                }
                Err(SubmitError::Unauthorized)
            }
            Err(e) => {
                warn!("Failed to create recipe: {}", e);
                if alive {
                    self.services.toasts.show(Toast::error(
                        "Error",
                        "Failed to create recipe. Please try again.",
                    ));
                }
                Err(SubmitError::Api(e))
            }
        }
    }

    /// The view is going away: drop pending redirects and ignore late responses.
    pub fn teardown(&self) {
        self.lifetime.end();
        self.redirects.cancel_all();
    }

    fn update(&self, f: impl FnOnce(&mut CreateRecipeState)) {
        if !self.lifetime.is_alive() {
            return;
        }
        f(&mut self.state.borrow_mut());
        (self.on_change)();
    }
}
