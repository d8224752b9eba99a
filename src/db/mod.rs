pub mod seed;

use crate::domain::models::{TestKind, UserRole};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub username: String,
    pub hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Psychotype {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub question: String,
    pub correct_answer: bool,
    pub psychotype_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Test {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: TestKind,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Question as shown to a user taking a test: no correct answer,
/// no psychotype attribution.
#[derive(Debug, Serialize, FromRow)]
pub struct TestQuestion {
    pub id: Uuid,
    pub question: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewResult {
    pub user_id: Uuid,
    pub test_id: Uuid,
    pub question_id: Uuid,
    pub user_answer: bool,
}

/// Report joined with its test title, the shape both retrieval
/// endpoints return.
#[derive(Debug, Serialize, FromRow)]
pub struct ReportView {
    #[serde(rename = "reportContent")]
    pub report_content: String,
    #[serde(rename = "testTitle")]
    pub test_title: String,
}

pub async fn find_user_by_username(pool: &PgPool, username: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        "SELECT id, username, hash, role, created_at FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn insert_user(
    pool: &PgPool,
    username: &str,
    hash: &str,
    role: UserRole,
) -> Result<DbUser> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (username, hash, role)
        VALUES ($1, $2, $3)
        RETURNING id, username, hash, role, created_at
        "#,
    )
    .bind(username)
    .bind(hash)
    .bind(role)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

pub async fn list_questions(pool: &PgPool) -> Result<Vec<Question>> {
    let questions = sqlx::query_as::<_, Question>(
        "SELECT id, question, correct_answer, psychotype_id, created_at FROM questions ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;
    Ok(questions)
}

pub async fn find_psychotype_by_name(pool: &PgPool, name: &str) -> Result<Option<Psychotype>> {
    let psychotype = sqlx::query_as::<_, Psychotype>(
        "SELECT id, name, description, created_at FROM psychotypes WHERE name = $1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(psychotype)
}

pub async fn insert_question(
    pool: &PgPool,
    question: &str,
    correct_answer: bool,
    psychotype_id: Uuid,
) -> Result<Question> {
    let created = sqlx::query_as::<_, Question>(
        r#"
        INSERT INTO questions (question, correct_answer, psychotype_id)
        VALUES ($1, $2, $3)
        RETURNING id, question, correct_answer, psychotype_id, created_at
        "#,
    )
    .bind(question)
    .bind(correct_answer)
    .bind(psychotype_id)
    .fetch_one(pool)
    .await?;
    Ok(created)
}

pub async fn list_tests(pool: &PgPool) -> Result<Vec<Test>> {
    let tests = sqlx::query_as::<_, Test>(
        "SELECT id, title, kind, description, created_at FROM tests ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;
    Ok(tests)
}

pub async fn find_test(pool: &PgPool, id: Uuid) -> Result<Option<Test>> {
    let test = sqlx::query_as::<_, Test>(
        "SELECT id, title, kind, description, created_at FROM tests WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(test)
}

/// Creates a test together with its join rows in one transaction.
pub async fn insert_test(
    pool: &PgPool,
    title: &str,
    kind: TestKind,
    description: Option<&str>,
    question_ids: &[Uuid],
) -> Result<Test> {
    let mut tx = pool.begin().await?;

    let test = sqlx::query_as::<_, Test>(
        r#"
        INSERT INTO tests (title, kind, description)
        VALUES ($1, $2, $3)
        RETURNING id, title, kind, description, created_at
        "#,
    )
    .bind(title)
    .bind(kind)
    .bind(description)
    .fetch_one(&mut *tx)
    .await?;

    for question_id in question_ids {
        sqlx::query("INSERT INTO test_questions (test_id, question_id) VALUES ($1, $2)")
            .bind(test.id)
            .bind(question_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(test)
}

pub async fn questions_for_test(pool: &PgPool, test_id: Uuid) -> Result<Vec<TestQuestion>> {
    let questions = sqlx::query_as::<_, TestQuestion>(
        r#"
        SELECT q.id, q.question
        FROM test_questions tq
        JOIN questions q ON q.id = tq.question_id
        WHERE tq.test_id = $1
        ORDER BY tq.created_at
        "#,
    )
    .bind(test_id)
    .fetch_all(pool)
    .await?;
    Ok(questions)
}

/// question_id -> psychotype_id for every question attached to the test.
pub async fn question_psychotypes_for_test(
    pool: &PgPool,
    test_id: Uuid,
) -> Result<HashMap<Uuid, Uuid>> {
    let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
        r#"
        SELECT q.id, q.psychotype_id
        FROM test_questions tq
        JOIN questions q ON q.id = tq.question_id
        WHERE tq.test_id = $1
        "#,
    )
    .bind(test_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().collect())
}

pub async fn psychotype_names(pool: &PgPool, ids: &[Uuid]) -> Result<HashMap<Uuid, String>> {
    let rows: Vec<(Uuid, String)> =
        sqlx::query_as("SELECT id, name FROM psychotypes WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().collect())
}

/// Appends answer rows as given. No dedup: resubmitting an attempt
/// creates a second set of rows.
pub async fn insert_results(pool: &PgPool, results: &[NewResult]) -> Result<()> {
    let mut tx = pool.begin().await?;
    for result in results {
        sqlx::query(
            r#"
            INSERT INTO results (user_id, test_id, question_id, user_answer)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(result.user_id)
        .bind(result.test_id)
        .bind(result.question_id)
        .bind(result.user_answer)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Every recorded answer of one test attempt, as (question_id, user_answer).
pub async fn answers_for_attempt(
    pool: &PgPool,
    test_id: Uuid,
    user_id: Uuid,
) -> Result<Vec<(Uuid, bool)>> {
    let rows: Vec<(Uuid, bool)> = sqlx::query_as(
        "SELECT question_id, user_answer FROM results WHERE test_id = $1 AND user_id = $2",
    )
    .bind(test_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn insert_report(
    pool: &PgPool,
    content: &str,
    user_id: Uuid,
    test_id: Uuid,
) -> Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO reports (content, user_id, test_id)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(content)
    .bind(user_id)
    .bind(test_id)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn reports_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<ReportView>> {
    let reports = sqlx::query_as::<_, ReportView>(
        r#"
        SELECT r.content AS report_content, t.title AS test_title
        FROM reports r
        JOIN tests t ON t.id = r.test_id
        WHERE r.user_id = $1
        ORDER BY r.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(reports)
}

pub async fn find_report(pool: &PgPool, id: Uuid) -> Result<Option<ReportView>> {
    let report = sqlx::query_as::<_, ReportView>(
        r#"
        SELECT r.content AS report_content, t.title AS test_title
        FROM reports r
        JOIN tests t ON t.id = r.test_id
        WHERE r.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(report)
}
