use serde::{Deserialize, Deserializer, Serialize};

/// Recipe difficulty. A draft always carries one of these; `Easy` until the user picks another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Text inputs of the create-recipe form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecipeField {
    Title,
    Description,
    CookTime,
    Servings,
    Ingredients,
    Instructions,
}

impl RecipeField {
    pub fn label(&self) -> &'static str {
        match self {
            RecipeField::Title => "Recipe Name",
            RecipeField::Description => "Description",
            RecipeField::CookTime => "Cook Time",
            RecipeField::Servings => "Servings",
            RecipeField::Ingredients => "Ingredients",
            RecipeField::Instructions => "Instructions",
        }
    }
}

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFields {
    pub title: String,
    pub description: String,
    pub cook_time: String,
    pub servings: String,
    pub ingredients: String,
    pub instructions: String,
}

impl RecipeFields {
    pub fn get(&self, field: RecipeField) -> &str {
        match field {
            RecipeField::Title => &self.title,
            RecipeField::Description => &self.description,
            RecipeField::CookTime => &self.cook_time,
            RecipeField::Servings => &self.servings,
            RecipeField::Ingredients => &self.ingredients,
            RecipeField::Instructions => &self.instructions,
        }
    }

    pub fn set(&mut self, field: RecipeField, value: String) {
        let slot = match field {
            RecipeField::Title => &mut self.title,
            RecipeField::Description => &mut self.description,
            RecipeField::CookTime => &mut self.cook_time,
            RecipeField::Servings => &mut self.servings,
            RecipeField::Ingredients => &mut self.ingredients,
            RecipeField::Instructions => &mut self.instructions,
        };
        *slot = value;
    }
}

/// Body of `POST /api/recipes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub cook_time: String,
    pub servings: String,
    pub difficulty: Difficulty,
    pub ingredients: String,
    pub instructions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Response of `POST /api/objects/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadTarget {
    #[serde(rename = "uploadUrl", alias = "uploadURL", alias = "upload_url")]
    pub upload_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "first_name")]
    pub first_name: String,
    #[serde(default, alias = "last_name")]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, alias = "profile_image_url")]
    pub profile_image_url: Option<String>,
    #[serde(default, alias = "followers_count")]
    pub followers_count: Option<u32>,
    #[serde(default, alias = "following_count")]
    pub following_count: Option<u32>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// First letter of first and last name, used when there is no avatar image.
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .next()
            .into_iter()
            .chain(self.last_name.chars().next())
            .collect()
    }
}

/// A recipe as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "cook_time")]
    pub cook_time: Option<String>,
    #[serde(default)]
    pub servings: Option<String>,
    #[serde(default, alias = "image_url")]
    pub image_url: Option<String>,
    #[serde(default, alias = "likes_count")]
    pub likes_count: Option<u32>,
}

/// Ids arrive as JSON numbers from some endpoints and strings from others.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Difficulty::Medium).unwrap(), "\"medium\"");
        assert_eq!(Difficulty::default(), Difficulty::Easy);
    }

    #[test]
    fn test_new_recipe_payload_is_camel_case() {
        let recipe = NewRecipe {
            title: "Pasta".into(),
            description: "Quick".into(),
            cook_time: "25 min".into(),
            servings: "4".into(),
            difficulty: Difficulty::Hard,
            ingredients: "noodles".into(),
            instructions: "boil".into(),
            image_url: None,
        };
        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["cookTime"], "25 min");
        assert_eq!(json["difficulty"], "hard");
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn test_upload_target_accepts_both_spellings() {
        let a: UploadTarget = serde_json::from_str(r#"{"uploadUrl":"https://s/a"}"#).unwrap();
        let b: UploadTarget = serde_json::from_str(r#"{"uploadURL":"https://s/b"}"#).unwrap();
        assert_eq!(a.upload_url, "https://s/a");
        assert_eq!(b.upload_url, "https://s/b");
    }

    #[test]
    fn test_recipe_summary_from_backend_snake_case() {
        let json = r#"{
            "id": 7,
            "title": "Soup",
            "description": "Warm",
            "cook_time": "1h",
            "servings": "2",
            "image_url": null,
            "likes_count": 3,
            "difficulty": "easy"
        }"#;
        let recipe: RecipeSummary = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.id, "7");
        assert_eq!(recipe.cook_time.as_deref(), Some("1h"));
        assert_eq!(recipe.likes_count, Some(3));
        assert_eq!(recipe.image_url, None);
    }

    #[test]
    fn test_user_initials_and_name() {
        let user: UserProfile =
            serde_json::from_str(r#"{"id":"u1","firstName":"Ada","lastName":"Lovelace"}"#).unwrap();
        assert_eq!(user.initials(), "AL");
        assert_eq!(user.display_name(), "Ada Lovelace");
        assert_eq!(user.followers_count, None);

        let nameless: UserProfile = serde_json::from_str(r#"{"id":1}"#).unwrap();
        assert_eq!(nameless.initials(), "");
        assert_eq!(nameless.id, "1");
    }
}
