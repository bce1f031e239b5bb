use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn execute(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        sql.to_owned(),
    ))
    .await
    .map(|_| ())
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Classification scheme
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            dewey_code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            level INTEGER NOT NULL,
            parent_code TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .await?;

    // No FK on parent_code: categories are often imported before their parents
    execute(
        db,
        "CREATE INDEX IF NOT EXISTS idx_categories_parent_code ON categories(parent_code)",
    )
    .await?;

    // Recipes
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            location TEXT,
            notes TEXT,
            rating INTEGER,
            tags TEXT NOT NULL DEFAULT '[]',
            classification_code TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .await?;

    execute(
        db,
        "CREATE INDEX IF NOT EXISTS idx_recipes_classification_code ON recipes(classification_code)",
    )
    .await?;

    tracing::debug!("Database migrations applied");

    Ok(())
}
