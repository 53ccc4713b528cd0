use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::ApiError;
use crate::models::{NewRecipe, RecipeSummary, UploadTarget, UserProfile};
use crate::services::{Method, RequestClient};

// -- Backend paths --

pub const RECIPES_PATH: &str = "/api/recipes";
pub const UPLOAD_TARGET_PATH: &str = "/api/objects/upload";
pub const CURRENT_USER_PATH: &str = "/api/auth/user";
pub const LOGOUT_PATH: &str = "/api/logout";

pub fn user_recipes_path(user_id: &str) -> String {
    format!("/api/users/{}/recipes", user_id)
}

fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(ApiError::from)
}

// -- Typed request helpers --

/// The signed-in user. A 401 means nobody is signed in.
pub async fn current_user<C: RequestClient>(client: &C) -> Result<UserProfile, ApiError> {
    let value = client.send(Method::Get, CURRENT_USER_PATH, None).await?;
    decode(value)
}

/// Publish a recipe. Any 2xx means it is stored; the echoed recipe is returned
/// when the body has the expected shape.
pub async fn create_recipe<C: RequestClient>(
    client: &C,
    recipe: &NewRecipe,
) -> Result<Option<RecipeSummary>, ApiError> {
    let body = serde_json::to_value(recipe)?;
    let value = client.send(Method::Post, RECIPES_PATH, Some(body)).await?;
    match decode(value) {
        Ok(created) => Ok(Some(created)),
        Err(e) => {
            warn!("Recipe created, but the response body was not a recipe: {}", e);
            Ok(None)
        }
    }
}

/// Ask the backend for a one-shot URL to PUT an image to.
pub async fn request_upload_target<C: RequestClient>(client: &C) -> Result<UploadTarget, ApiError> {
    let value = client.send(Method::Post, UPLOAD_TARGET_PATH, None).await?;
    decode(value)
}

/// Transfer the file bytes to a target obtained from [`request_upload_target`].
pub async fn upload_file<C: RequestClient>(
    client: &C,
    target: &UploadTarget,
    file: &C::File,
) -> Result<(), ApiError> {
    client.put_file(&target.upload_url, file).await
}

pub async fn list_recipes<C: RequestClient>(client: &C) -> Result<Vec<RecipeSummary>, ApiError> {
    let value = client.send(Method::Get, RECIPES_PATH, None).await?;
    decode(value)
}

pub async fn list_user_recipes<C: RequestClient>(
    client: &C,
    user_id: &str,
) -> Result<Vec<RecipeSummary>, ApiError> {
    let value = client
        .send(Method::Get, &user_recipes_path(user_id), None)
        .await?;
    decode(value)
}

pub async fn logout<C: RequestClient>(client: &C) -> Result<(), ApiError> {
    client.send(Method::Post, LOGOUT_PATH, None).await.map(|_| ())
}
