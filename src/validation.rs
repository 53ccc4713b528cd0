use std::collections::BTreeMap;

use crate::models::{Difficulty, NewRecipe, RecipeField, RecipeFields};

/// A check applied to one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Must contain something other than whitespace.
    Required,
    /// Free text, never rejected.
    Optional,
}

/// One entry of a form schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: RecipeField,
    pub rule: Rule,
    pub max_chars: Option<usize>,
}

/// Schema for the create-recipe form. Difficulty and image are not form fields;
/// they are merged in after validation by [`ValidatedFields::into_recipe`].
pub const RECIPE_SCHEMA: &[FieldRule] = &[
    FieldRule { field: RecipeField::Title, rule: Rule::Required, max_chars: Some(200) },
    FieldRule { field: RecipeField::Description, rule: Rule::Required, max_chars: None },
    FieldRule { field: RecipeField::CookTime, rule: Rule::Optional, max_chars: None },
    FieldRule { field: RecipeField::Servings, rule: Rule::Optional, max_chars: None },
    FieldRule { field: RecipeField::Ingredients, rule: Rule::Required, max_chars: None },
    FieldRule { field: RecipeField::Instructions, rule: Rule::Required, max_chars: None },
];

/// Per-field error messages, shown inline next to each input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<RecipeField, String>);

impl FieldErrors {
    pub fn get(&self, field: RecipeField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn fields(&self) -> impl Iterator<Item = RecipeField> + '_ {
        self.0.keys().copied()
    }

    pub(crate) fn set(&mut self, field: RecipeField, message: Option<String>) {
        match message {
            Some(msg) => {
                self.0.insert(field, msg);
            }
            None => {
                self.0.remove(&field);
            }
        }
    }
}

/// Form input that passed [`RECIPE_SCHEMA`]. Only [`validate`] produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFields(RecipeFields);

impl ValidatedFields {
    /// Second stage: merge the UI-only state that the schema does not see.
    pub fn into_recipe(self, difficulty: Difficulty, image_url: Option<String>) -> NewRecipe {
        let fields = self.0;
        NewRecipe {
            title: fields.title,
            description: fields.description,
            cook_time: fields.cook_time,
            servings: fields.servings,
            difficulty,
            ingredients: fields.ingredients,
            instructions: fields.instructions,
            image_url: image_url.filter(|url| !url.is_empty()),
        }
    }
}

/// Run every schema rule. All failing fields are reported at once.
pub fn validate(fields: &RecipeFields) -> Result<ValidatedFields, FieldErrors> {
    let mut errors = FieldErrors::default();
    for rule in RECIPE_SCHEMA {
        errors.set(rule.field, check(rule, fields.get(rule.field)));
    }

    if errors.is_empty() {
        Ok(ValidatedFields(fields.clone()))
    } else {
        Err(errors)
    }
}

/// Re-check a single field, e.g. while the user edits it after a failed submit.
pub fn validate_field(fields: &RecipeFields, field: RecipeField) -> Option<String> {
    RECIPE_SCHEMA
        .iter()
        .find(|rule| rule.field == field)
        .and_then(|rule| check(rule, fields.get(field)))
}

fn check(rule: &FieldRule, value: &str) -> Option<String> {
    if rule.rule == Rule::Required && value.trim().is_empty() {
        return Some(format!("{} is required", rule.field.label()));
    }

    if let Some(max) = rule.max_chars {
        let count = value.chars().count();
        if count > max {
            return Some(format!(
                "{} must be at most {} characters (currently {})",
                rule.field.label(),
                max,
                count
            ));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> RecipeFields {
        RecipeFields {
            title: "Shakshuka".into(),
            description: "Eggs in spicy tomato sauce".into(),
            cook_time: String::new(),
            servings: String::new(),
            ingredients: "eggs, tomatoes".into(),
            instructions: "simmer, crack eggs".into(),
        }
    }

    #[test]
    fn test_complete_form_passes() {
        assert!(validate(&filled()).is_ok());
    }

    #[test]
    fn test_each_required_field_is_reported() {
        for field in [
            RecipeField::Title,
            RecipeField::Description,
            RecipeField::Ingredients,
            RecipeField::Instructions,
        ] {
            let mut fields = filled();
            fields.set(field, String::new());
            let errors = validate(&fields).unwrap_err();
            assert_eq!(errors.len(), 1, "only {:?} should fail", field);
            assert!(errors.get(field).is_some());
        }
    }

    #[test]
    fn test_all_missing_fields_reported_together() {
        let errors = validate(&RecipeFields::default()).unwrap_err();
        let failed: Vec<_> = errors.fields().collect();
        assert_eq!(
            failed,
            vec![
                RecipeField::Title,
                RecipeField::Description,
                RecipeField::Ingredients,
                RecipeField::Instructions,
            ]
        );
        assert_eq!(errors.get(RecipeField::Title), Some("Recipe Name is required"));
    }

    #[test]
    fn test_whitespace_only_is_missing() {
        let mut fields = filled();
        fields.title = "   \n".into();
        assert!(validate(&fields).unwrap_err().get(RecipeField::Title).is_some());
    }

    #[test]
    fn test_optional_fields_never_fail() {
        let mut fields = filled();
        fields.cook_time = "x".repeat(5000);
        fields.servings = "a crowd".into();
        assert!(validate(&fields).is_ok());
        assert_eq!(validate_field(&fields, RecipeField::CookTime), None);
    }

    #[test]
    fn test_title_length_limit() {
        let mut fields = filled();
        fields.title = "é".repeat(200);
        assert!(validate(&fields).is_ok());

        fields.title.push('x');
        let msg = validate_field(&fields, RecipeField::Title).unwrap();
        assert!(msg.contains("200"), "unexpected message: {}", msg);
    }

    #[test]
    fn test_merge_adds_ui_state() {
        let validated = validate(&filled()).unwrap();
        let recipe = validated
            .clone()
            .into_recipe(Difficulty::Medium, Some("https://img/1".into()));
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert_eq!(recipe.image_url.as_deref(), Some("https://img/1"));
        assert_eq!(recipe.title, "Shakshuka");

        let without_image = validated.into_recipe(Difficulty::Easy, Some(String::new()));
        assert_eq!(without_image.image_url, None);
    }
}
