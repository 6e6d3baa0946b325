//! Article database operations

use chrono::Utc;
use jfl_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor, SqlitePool};

use super::timestamp;
use crate::models::{Article, ArticleAuthor, ArticleUpdate, Id, NewArticle};

const ARTICLE_COLUMNS: &str = "id, doi, title, abstract, publication_year, journal_name, url, \
                               created_at, updated_at";

fn article_from_row(row: &SqliteRow) -> Result<Article> {
    Ok(Article {
        id: row.try_get("id")?,
        doi: row.try_get("doi")?,
        title: row.try_get("title")?,
        abstract_text: row.try_get("abstract")?,
        publication_year: row.try_get("publication_year")?,
        journal_name: row.try_get("journal_name")?,
        url: row.try_get("url")?,
        authors: Vec::new(),
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

/// Insert an article row, returning its id
///
/// A second article with the same DOI is a conflict.
pub async fn create_article<'e, E>(executor: E, article: &NewArticle) -> Result<Id>
where
    E: SqliteExecutor<'e>,
{
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO articles (
            doi, title, abstract, publication_year, journal_name, url, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&article.doi)
    .bind(&article.title)
    .bind(&article.abstract_text)
    .bind(article.publication_year)
    .bind(&article.journal_name)
    .bind(&article.url)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await
    .map_err(|e| Error::from(e).or_conflict(format!("article with DOI {} already exists", article.doi)))?;

    Ok(result.last_insert_rowid())
}

/// Link an author to an article at a 1-based position
pub async fn add_article_author<'e, E>(
    executor: E,
    article_id: Id,
    author_id: Id,
    author_order: i32,
) -> Result<Id>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO article_authors (article_id, author_id, author_order, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(article_id)
    .bind(author_id)
    .bind(author_order)
    .bind(Utc::now())
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Authors of an article in link order
pub async fn list_article_authors<'e, E>(executor: E, article_id: Id) -> Result<Vec<ArticleAuthor>>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query(
        r#"
        SELECT aa.author_id, au.name, aa.author_order, aa.note
        FROM article_authors aa
        JOIN authors au ON au.id = aa.author_id
        WHERE aa.article_id = ?
        ORDER BY aa.author_order
        "#,
    )
    .bind(article_id)
    .fetch_all(executor)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(ArticleAuthor {
                author_id: row.try_get("author_id")?,
                name: row.try_get("name")?,
                author_order: row.try_get("author_order")?,
                note: row.try_get("note")?,
            })
        })
        .collect()
}

async fn with_authors(pool: &SqlitePool, mut article: Article) -> Result<Article> {
    article.authors = list_article_authors(pool, article.id).await?;
    Ok(article)
}

/// Load article by id, with authors
pub async fn get_article(pool: &SqlitePool, id: Id) -> Result<Option<Article>> {
    let sql = format!("SELECT {} FROM articles WHERE id = ?", ARTICLE_COLUMNS);
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;

    match row {
        Some(row) => Ok(Some(with_authors(pool, article_from_row(&row)?).await?)),
        None => Ok(None),
    }
}

/// Load article by DOI, with authors
pub async fn get_article_by_doi(pool: &SqlitePool, doi: &str) -> Result<Option<Article>> {
    let sql = format!("SELECT {} FROM articles WHERE doi = ?", ARTICLE_COLUMNS);
    let row = sqlx::query(&sql).bind(doi).fetch_optional(pool).await?;

    match row {
        Some(row) => Ok(Some(with_authors(pool, article_from_row(&row)?).await?)),
        None => Ok(None),
    }
}

/// Whether an article with this id is stored
pub async fn article_exists<'e, E>(executor: E, id: Id) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM articles WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(found.is_some())
}

/// Whether an article with this DOI is stored
pub async fn doi_exists<'e, E>(executor: E, doi: &str) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM articles WHERE doi = ?")
        .bind(doi)
        .fetch_optional(executor)
        .await?;

    Ok(found.is_some())
}

/// All articles, newest first, with authors
pub async fn list_articles(pool: &SqlitePool) -> Result<Vec<Article>> {
    let sql = format!("SELECT {} FROM articles ORDER BY id DESC", ARTICLE_COLUMNS);
    let rows = sqlx::query(&sql).fetch_all(pool).await?;

    let mut articles = Vec::with_capacity(rows.len());
    for row in &rows {
        articles.push(with_authors(pool, article_from_row(row)?).await?);
    }

    Ok(articles)
}

/// Replace the editable fields of an article; false if no such article
pub async fn update_article<'e, E>(executor: E, id: Id, update: &ArticleUpdate) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE articles
        SET title = ?, abstract = ?, publication_year = ?, journal_name = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&update.title)
    .bind(&update.abstract_text)
    .bind(update.publication_year)
    .bind(&update.journal_name)
    .bind(Utc::now())
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete an article and (by cascade) its author links; false if no such article
pub async fn delete_article<'e, E>(executor: E, id: Id) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::authors::create_author;
    use jfl_common::db::init_memory_database;

    fn new_article(doi: &str) -> NewArticle {
        NewArticle {
            doi: doi.to_string(),
            title: "Test Article".to_string(),
            abstract_text: Some("Abstract".to_string()),
            publication_year: Some(2021),
            journal_name: None,
            url: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_load_article_with_authors() {
        let pool = init_memory_database().await.expect("Failed to create in-memory database");

        let id = create_article(&pool, &new_article("10.1/abc")).await.unwrap();
        let second = create_author(&pool, "Second Author").await.unwrap();
        let first = create_author(&pool, "First Author").await.unwrap();

        // Insert out of order; reads come back in link order
        add_article_author(&pool, id, second, 2).await.unwrap();
        add_article_author(&pool, id, first, 1).await.unwrap();

        let loaded = get_article_by_doi(&pool, "10.1/abc")
            .await
            .unwrap()
            .expect("Article not found");

        assert_eq!(loaded.id, id);
        assert_eq!(loaded.title, "Test Article");
        assert_eq!(loaded.publication_year, Some(2021));
        let names: Vec<_> = loaded.authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["First Author", "Second Author"]);
    }

    #[tokio::test]
    async fn test_existence_checks() {
        let pool = init_memory_database().await.unwrap();

        assert!(!doi_exists(&pool, "10.1/here").await.unwrap());
        let id = create_article(&pool, &new_article("10.1/here")).await.unwrap();

        assert!(doi_exists(&pool, "10.1/here").await.unwrap());
        assert!(!doi_exists(&pool, "10.1/elsewhere").await.unwrap());
        assert!(article_exists(&pool, id).await.unwrap());
        assert!(!article_exists(&pool, id + 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_doi_is_conflict() {
        let pool = init_memory_database().await.unwrap();

        create_article(&pool, &new_article("10.1/dup")).await.unwrap();
        let err = create_article(&pool, &new_article("10.1/dup")).await.unwrap_err();

        assert!(matches!(err, Error::Conflict(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_update_and_delete_article() {
        let pool = init_memory_database().await.unwrap();
        let id = create_article(&pool, &new_article("10.1/upd")).await.unwrap();

        let update = ArticleUpdate {
            title: "Renamed".to_string(),
            abstract_text: None,
            publication_year: Some(1999),
            journal_name: Some("Journal".to_string()),
        };
        assert!(update_article(&pool, id, &update).await.unwrap());
        assert!(!update_article(&pool, id + 100, &update).await.unwrap());

        let loaded = get_article(&pool, id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Renamed");
        assert_eq!(loaded.abstract_text, None);
        assert_eq!(loaded.doi, "10.1/upd");

        assert!(delete_article(&pool, id).await.unwrap());
        assert!(get_article(&pool, id).await.unwrap().is_none());
        assert!(!delete_article(&pool, id).await.unwrap());
    }
}
