//! Repository implementations using SeaORM

pub mod category_repository;
pub mod recipe_repository;

pub use category_repository::SeaOrmCategoryRepository;
pub use recipe_repository::SeaOrmRecipeRepository;
