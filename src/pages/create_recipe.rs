use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::browser::FetchClient;
use crate::components::bottom_nav::BottomNav;
use crate::components::difficulty_toggle::DifficultyToggle;
use crate::components::image_uploader::ImageUploader;
use crate::components::status_screen::{LoadingScreen, LoginPrompt};
use crate::models::{Difficulty, RecipeField};
use crate::view_state::auth::AuthGate;
use crate::view_state::create_recipe::{CreateRecipeController, CreateRecipeState};
use crate::view_state::upload::UploadPhase;

type Controller = StoredValue<Rc<CreateRecipeController<FetchClient>>, LocalStorage>;

#[component]
pub fn CreateRecipePage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let revision = RwSignal::new(0u64);
    let services = ctx.services.get_value();
    let controller: Controller = StoredValue::new_local(Rc::new(CreateRecipeController::new(
        services,
        move || {
            revision.try_update(|r| *r += 1);
        },
    )));
    on_cleanup(move || {
        controller.try_with_value(|c| c.teardown());
    });

    let gate = Memo::new(move |_| AuthGate::from_session(&ctx.session.get()));

    move || match gate.get() {
        AuthGate::Loading => view! { <LoadingScreen /> }.into_any(),
        AuthGate::LoginRequired => {
            view! { <LoginPrompt message="You need to be signed in to share a recipe." /> }
                .into_any()
        }
        AuthGate::Ready => view! { <RecipeForm controller=controller revision=revision /> }.into_any(),
    }
}

fn snapshot(controller: Controller, revision: RwSignal<u64>) -> CreateRecipeState {
    revision.track();
    controller.try_with_value(|c| c.state()).unwrap_or_default()
}

#[component]
fn RecipeForm(controller: Controller, revision: RwSignal<u64>) -> impl IntoView {
    let state = move || snapshot(controller, revision);
    let submitting = move || state().submitting;

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(c) = controller.try_get_value() else {
            return;
        };
        spawn_local(async move {
            let _ = c.submit().await;
        });
    };

    let on_close = move |_| {
        controller.try_with_value(|c| c.close());
    };

    let difficulty = Signal::derive(move || state().difficulty);
    let on_difficulty = Callback::new(move |d: Difficulty| {
        controller.try_with_value(|c| c.select_difficulty(d));
    });

    let image_url = Signal::derive(move || state().image_url);
    let upload_status = Signal::derive(move || match state().upload {
        UploadPhase::Idle => None,
        UploadPhase::RequestingTarget => Some("Preparing upload...".to_string()),
        UploadPhase::Transferring { file_name } => Some(format!("Uploading {}...", file_name)),
    });
    let on_files = Callback::new(move |files: Vec<web_sys::File>| {
        let Some(c) = controller.try_get_value() else {
            return;
        };
        spawn_local(async move {
            c.attach_image(files).await;
        });
    });
    let on_remove = Callback::new(move |_: ()| {
        controller.try_with_value(|c| c.remove_image());
    });

    view! {
        <div class="page create-page">
            <header class="page-header">
                <button type="button" class="btn btn-ghost" aria-label="Close" on:click=on_close>
                    "\u{2715}"
                </button>
                <h2>"Create Recipe"</h2>
            </header>

            <form class="recipe-form" on:submit=on_submit>
                <ImageUploader
                    image_url=image_url
                    status=upload_status
                    on_files=on_files
                    on_remove=on_remove
                />

                <RecipeInput controller=controller revision=revision field=RecipeField::Title placeholder="What are you making?" />
                <RecipeInput
                    controller=controller
                    revision=revision
                    field=RecipeField::Description
                    placeholder="Tell us about this dish"
                    multiline=true
                />

                <div class="form-row">
                    <RecipeInput controller=controller revision=revision field=RecipeField::CookTime placeholder="e.g. 45 min" />
                    <RecipeInput controller=controller revision=revision field=RecipeField::Servings placeholder="e.g. 4" />
                </div>

                <div class="form-group">
                    <label class="form-label">"Difficulty"</label>
                    <DifficultyToggle selected=difficulty on_select=on_difficulty />
                </div>

                <RecipeInput
                    controller=controller
                    revision=revision
                    field=RecipeField::Ingredients
                    placeholder="One ingredient per line"
                    multiline=true
                />
                <RecipeInput
                    controller=controller
                    revision=revision
                    field=RecipeField::Instructions
                    placeholder="Step by step"
                    multiline=true
                />

                <button type="submit" class="btn btn-primary btn-block" disabled=submitting>
                    {move || {
                        revision.track();
                        controller.try_with_value(|c| c.submit_label()).unwrap_or("Post")
                    }}
                </button>
            </form>
        </div>
        <BottomNav />
    }
}

#[component]
fn RecipeInput(
    controller: Controller,
    revision: RwSignal<u64>,
    field: RecipeField,
    placeholder: &'static str,
    #[prop(optional)] multiline: bool,
) -> impl IntoView {
    let value = move || snapshot(controller, revision).fields.get(field).to_string();
    let error = move || {
        snapshot(controller, revision)
            .errors
            .get(field)
            .map(str::to_string)
    };
    let on_input = move |ev: leptos::ev::Event| {
        let text = event_target_value(&ev);
        controller.try_with_value(|c| c.set_field(field, text));
    };
    let input_id = format!("recipe-{}", field.label().to_lowercase().replace(' ', "-"));

    let control = if multiline {
        view! {
            <textarea
                id=input_id.clone()
                class="form-input form-textarea"
                rows="4"
                placeholder=placeholder
                prop:value=value
                on:input=on_input
            ></textarea>
        }
        .into_any()
    } else {
        view! {
            <input
                id=input_id.clone()
                type="text"
                class="form-input"
                placeholder=placeholder
                prop:value=value
                on:input=on_input
            />
        }
        .into_any()
    };

    view! {
        <div class="form-group" class:form-group-invalid=move || error().is_some()>
            <label class="form-label" for=input_id>{field.label()}</label>
            {control}
            {move || error().map(|message| view! { <p class="form-error">{message}</p> })}
        </div>
    }
}
