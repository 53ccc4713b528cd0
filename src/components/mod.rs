pub mod avatar;
pub mod bottom_nav;
pub mod difficulty_toggle;
pub mod image_uploader;
pub mod recipe_card;
pub mod status_screen;
pub mod toaster;
