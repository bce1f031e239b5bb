pub mod category;
pub mod recipe;
