use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_restaurant_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, &config.admin_email, "admin123", "admin").await?;
    seed_menu(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_menu(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let existing: (i64,) = sqlx::query_as("SELECT count(*) FROM menu_categories")
        .fetch_one(pool)
        .await?;
    if existing.0 > 0 {
        println!("Menu already seeded");
        return Ok(());
    }

    let categories = vec![
        ("Starters", 0),
        ("Main Course", 1),
        ("Breads", 2),
        ("Beverages", 3),
    ];

    let mut category_ids = Vec::new();
    for (title, position) in categories {
        let row: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO menu_categories (id, title, position)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(position)
        .fetch_one(pool)
        .await?;
        category_ids.push(row.0);
    }

    let items: Vec<(usize, &str, &str, serde_json::Value, bool, bool)> = vec![
        (
            0,
            "Paneer Tikka",
            "Char-grilled cottage cheese with mint chutney",
            serde_json::json!([{"label": "Half", "price": 160}, {"label": "Full", "price": 280}]),
            true,
            true,
        ),
        (
            0,
            "Chicken 65",
            "Fiery fried chicken, curry leaf tempering",
            serde_json::json!([{"label": "Full", "price": 240}]),
            false,
            false,
        ),
        (
            1,
            "Biryani",
            "Dum-cooked with saffron and fried onion",
            serde_json::json!([{"label": "Half", "price": 180}, {"label": "Full", "price": 320}]),
            false,
            true,
        ),
        (
            1,
            "Dal Makhani",
            "Slow-simmered black lentils",
            serde_json::json!([{"label": "Full", "price": 220}]),
            true,
            false,
        ),
        (
            2,
            "Butter Naan",
            "",
            serde_json::json!([{"label": "Piece", "price": 45}]),
            true,
            false,
        ),
        (
            3,
            "Masala Chai",
            "",
            serde_json::json!([{"label": "Cup", "price": 30}]),
            true,
            false,
        ),
    ];

    for (position, (category_index, name, description, prices, is_veg, popular)) in
        items.into_iter().enumerate()
    {
        let description = if description.is_empty() {
            None
        } else {
            Some(description)
        };
        sqlx::query(
            r#"
            INSERT INTO menu_items (id, category_id, name, description, prices, is_veg, popular, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(category_ids[category_index])
        .bind(name)
        .bind(description)
        .bind(prices)
        .bind(is_veg)
        .bind(popular)
        .bind(position as i32)
        .execute(pool)
        .await?;
    }

    println!("Seeded menu");
    Ok(())
}
