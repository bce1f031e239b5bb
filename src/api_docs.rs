use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::categories::list_categories,
        api::categories::create_category,
        api::categories::get_category,
        api::categories::update_category,
        api::categories::delete_category,
        api::categories::category_tree,
        api::categories::import_categories,
        api::categories::list_children,
        api::categories::integrity_report,
        api::recipes::create_recipe,
        api::recipes::get_recipe,
        api::recipes::update_recipe,
        api::recipes::delete_recipe,
        api::recipes::classify_recipe,
        api::export::export_data,
        api::export::export_recipes_csv,
    ),
    tags(
        (name = "recipe-catalog", description = "Recipe Catalog API")
    )
)]
pub struct ApiDoc;
