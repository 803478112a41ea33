use serde::{Deserialize, Serialize};
use sqlx::AnyPool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

pub struct NewQuestion<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub category: i64,
    pub difficulty: i64,
}

pub async fn count_questions(pool: &AnyPool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM questions
        "#,
    )
    .fetch_one(pool)
    .await
}

pub async fn get_questions_page(
    pool: &AnyPool,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty
        FROM questions
        ORDER BY id
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn get_all_questions(pool: &AnyPool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_question_by_id(pool: &AnyPool, id: i64) -> sqlx::Result<Question> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions WHERE questions.id = $1
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &AnyPool,
    category: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty
        FROM questions
        WHERE questions.category = $1
        ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

/// Folded form stored in `search_text`; SQL `LOWER()` only handles ASCII on SQLite.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Case-insensitive substring match on the question text.
pub async fn search_questions(pool: &AnyPool, term: &str) -> sqlx::Result<Vec<Question>> {
    let pattern = format!("%{}%", escape_like(&fold_case(term)));
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty
        FROM questions
        WHERE search_text LIKE $1 ESCAPE '\'
        ORDER BY id
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Questions in random order, optionally restricted to one category.
pub async fn get_shuffled_questions(
    pool: &AnyPool,
    category: Option<i64>,
) -> sqlx::Result<Vec<Question>> {
    match category {
        Some(category) => {
            sqlx::query_as::<_, Question>(
                r#"
                SELECT id, question, answer, category, difficulty
                FROM questions
                WHERE questions.category = $1
                ORDER BY RANDOM()
                "#,
            )
            .bind(category)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Question>(
                r#"
                SELECT id, question, answer, category, difficulty FROM questions ORDER BY RANDOM()
                "#,
            )
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn create_question(pool: &AnyPool, new: NewQuestion<'_>) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO questions (question, answer, category, difficulty, search_text)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(new.question)
    .bind(new.answer)
    .bind(new.category)
    .bind(new.difficulty)
    .bind(fold_case(new.question))
    .fetch_one(pool)
    .await
}

/// Fails with `RowNotFound` when there is no such question.
pub async fn delete_question(pool: &AnyPool, id: i64) -> sqlx::Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(sqlx::Error::RowNotFound);
    }
    Ok(())
}

/// Inserts or overwrites questions keeping their ids.
pub async fn import_questions(pool: &AnyPool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        let search_text = fold_case(&question.question);
        sqlx::query(
            r#"
            INSERT INTO questions (id, question, answer, category, difficulty, search_text)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                question = excluded.question,
                search_text = excluded.search_text,
                answer = excluded.answer,
                category = excluded.category,
                difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(question.question)
        .bind(question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .bind(search_text)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}
