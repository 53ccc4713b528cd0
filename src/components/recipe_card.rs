use leptos::prelude::*;

use crate::view_state::profile::RecipeCard as Card;

#[component]
pub fn RecipeCard(card: Card) -> impl IntoView {
    let image = match card.image_url.clone() {
        Some(src) => {
            view! { <img class="recipe-card-image" src=src alt=card.title.clone() /> }.into_any()
        }
        None => view! { <div class="recipe-card-image recipe-card-placeholder">"No image"</div> }
            .into_any(),
    };

    view! {
        // Opening a recipe has no destination yet.
        <div class="recipe-card" on:click=|_| {}>
            {image}
            <div class="recipe-card-body">
                <h3 class="recipe-card-title">{card.title}</h3>
                <p class="recipe-card-description line-clamp-2">{card.description}</p>
                <div class="recipe-card-meta">
                    {card.cook_time.map(|t| view! { <span class="meta-item">{t}</span> })}
                    {card.servings.map(|s| view! { <span class="meta-item">{format!("{} servings", s)}</span> })}
                    <span class="meta-item meta-likes">{format!("{} likes", card.likes)}</span>
                </div>
            </div>
        </div>
    }
}
