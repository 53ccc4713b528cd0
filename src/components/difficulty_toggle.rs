use leptos::prelude::*;

use crate::models::Difficulty;

/// Exclusive easy/medium/hard selector.
#[component]
pub fn DifficultyToggle(
    #[prop(into)] selected: Signal<Difficulty>,
    #[prop(into)] on_select: Callback<Difficulty>,
) -> impl IntoView {
    view! {
        <div class="difficulty-toggle" role="radiogroup" aria-label="Difficulty">
            {Difficulty::ALL
                .into_iter()
                .map(|difficulty| {
                    view! {
                        <button
                            type="button"
                            role="radio"
                            class="difficulty-option"
                            class:difficulty-option-active=move || selected.get() == difficulty
                            aria-checked=move || (selected.get() == difficulty).to_string()
                            on:click=move |_| on_select.run(difficulty)
                        >
                            {difficulty.label()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}
