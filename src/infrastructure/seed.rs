//! Demo classification scheme, loaded through the regular import path

use crate::domain::DomainError;
use crate::modules::classification::ImportSummary;
use crate::services::category_service;
use crate::infrastructure::AppState;

const DEMO_SCHEME: &str = "\
1 Starters, 11 Soups, 111 Cold soups, 112 Broths
12 Salads, 121 Leaf salads, 122 Grain salads
2 Mains, 21 Meat, 211 Beef, 211.1 Braises, 211.2 Roasts, 212 Poultry
22 Fish, 221 White fish, 222 Shellfish
23 Vegetarian, 231 Pasta, 231.1 Baked pasta, 232 Curries
3 Baking, 31 Bread, 311 Yeasted, 311.1 Sourdough, 312 Flatbreads
32 Cakes, 321 Layer cakes, 322 Loaf cakes
4 Desserts, 41 Frozen, 42 Puddings
5 Drinks, 51 Cocktails, 52 Infusions
";

/// Import the demo scheme; already-present codes are left alone
pub async fn seed_demo_data(state: &AppState) -> Result<ImportSummary, DomainError> {
    category_service::import_categories(
        state.category_repo.as_ref(),
        &state.category_cache,
        DEMO_SCHEME,
    )
    .await
}
