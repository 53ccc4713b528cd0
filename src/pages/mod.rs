pub mod create_recipe;
pub mod home;
pub mod profile;
