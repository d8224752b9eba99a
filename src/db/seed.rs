use crate::domain::models::UserRole;
use anyhow::Result;
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use sqlx::PgPool;

/// Reference psychotypes offered by the admin question form.
const PSYCHOTYPES: &[(&str, &str)] = &[
    (
        "ПАРАНОИК",
        "Целеустремленные, упорные, часто одержимые идеей люди. Могут быть подозрительными и ригидными.",
    ),
    (
        "ЭПИЛЕПТОИД",
        "Педантичные, аккуратные, любят порядок. Могут быть вспыльчивыми и злопамятными.",
    ),
    (
        "ГИПЕРТИМ",
        "Энергичные, общительные, оптимистичные. Могут быть поверхностными и непостоянными.",
    ),
    (
        "ИСТЕРОИД",
        "Артистичные, демонстративные, жаждут внимания. Могут быть эгоцентричными.",
    ),
    (
        "ШИЗОИД",
        "Замкнутые, погруженные в себя, с богатым внутренним миром. Могут испытывать трудности в общении.",
    ),
    (
        "ПСИХАСТЕНОИД",
        "Тревожные, склонные к сомнениям и самоанализу. Тщательно обдумывают решения.",
    ),
    (
        "СЕНЗИТИВ",
        "Чувствительные, впечатлительные, робкие. Глубоко переживают критику.",
    ),
    (
        "ГИПОТИМ",
        "Склонные к пониженному настроению, пессимистичные, быстро утомляются.",
    ),
    (
        "КОНФОРМНЫЙ ТИП",
        "Ориентируются на мнение окружения, избегают перемен и конфликтов.",
    ),
    (
        "НЕУСТОЙЧИВЫЙ ТИП",
        "Легко поддаются влиянию, ищут развлечений, избегают длительных усилий.",
    ),
    (
        "АСТЕНИК",
        "Быстро истощаемые, раздражительные, склонные к ипохондрии.",
    ),
    (
        "ЛАБИЛЬНЫЙ ТИП",
        "Настроение меняется часто и резко, отзывчивы на знаки внимания.",
    ),
    (
        "ЦИКЛОИД",
        "Эмоционально неустойчивые, с перепадами настроения. Периоды активности сменяются апатией.",
    ),
];

pub async fn seed_all(pool: &PgPool) -> Result<()> {
    seed_psychotypes(pool).await?;
    seed_admin(pool).await?;
    Ok(())
}

async fn seed_psychotypes(pool: &PgPool) -> Result<()> {
    for (name, description) in PSYCHOTYPES {
        let exists: Option<(uuid::Uuid,)> =
            sqlx::query_as("SELECT id FROM psychotypes WHERE name = $1")
                .bind(name)
                .fetch_optional(pool)
                .await?;
        if exists.is_some() {
            continue;
        }

        sqlx::query("INSERT INTO psychotypes (name, description) VALUES ($1, $2)")
            .bind(name)
            .bind(description)
            .execute(pool)
            .await?;
        tracing::info!("Seeded psychotype {name}");
    }
    Ok(())
}

async fn seed_admin(pool: &PgPool) -> Result<()> {
    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());

    if super::find_user_by_username(pool, &username).await?.is_some() {
        return Ok(());
    }

    let salt = SaltString::generate(rand_core::OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hash error: {e}"))?
        .to_string();

    super::insert_user(pool, &username, &hash, UserRole::Admin).await?;
    tracing::info!("Seeded admin account '{username}'");
    Ok(())
}
