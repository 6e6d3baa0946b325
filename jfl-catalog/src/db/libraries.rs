//! Library database operations
//!
//! The partial unique index on `libraries(owner_id) WHERE is_default = 1`
//! makes `insert_default_library_if_absent` an atomic create-if-absent.

use chrono::Utc;
use jfl_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor, SqlitePool};

use super::timestamp;
use crate::models::{Id, Library, LibraryArticle, NewLibrary, ReadingStatus};

const LIBRARY_COLUMNS: &str =
    "id, owner_id, name, description, is_public, is_default, created_at, updated_at";

fn library_from_row(row: &SqliteRow) -> Result<Library> {
    Ok(Library {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        is_public: row.try_get("is_public")?,
        is_default: row.try_get("is_default")?,
        articles: Vec::new(),
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
    })
}

fn library_article_from_row(row: &SqliteRow) -> Result<LibraryArticle> {
    let code: i64 = row.try_get("reading_status")?;
    let reading_status = ReadingStatus::from_code(code)
        .ok_or_else(|| Error::Internal(format!("unknown reading status code {}", code)))?;

    Ok(LibraryArticle {
        id: row.try_get("id")?,
        library_id: row.try_get("library_id")?,
        article_id: row.try_get("article_id")?,
        reading_status,
        notes: row.try_get("notes")?,
        date_added: timestamp(row, "date_added")?,
        article_title: row.try_get("title")?,
        doi: row.try_get("doi")?,
        publication_year: row.try_get("publication_year")?,
    })
}

/// Insert a library row, returning its id
pub async fn create_library<'e, E>(executor: E, library: &NewLibrary) -> Result<Id>
where
    E: SqliteExecutor<'e>,
{
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO libraries (
            owner_id, name, description, is_public, is_default, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(library.owner_id)
    .bind(&library.name)
    .bind(&library.description)
    .bind(library.is_public)
    .bind(library.is_default)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await
    .map_err(|e| {
        Error::from(e).or_conflict(format!("user {} already has a default library", library.owner_id))
    })?;

    Ok(result.last_insert_rowid())
}

/// Create the owner's default library unless one exists
///
/// Returns true when this call created it.
pub async fn insert_default_library_if_absent<'e, E>(executor: E, owner_id: Id) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let library = NewLibrary::default_for(owner_id);
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO libraries (
            owner_id, name, description, is_public, is_default, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(library.owner_id)
    .bind(&library.name)
    .bind(&library.description)
    .bind(library.is_public)
    .bind(library.is_default)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Entries of a library, oldest first, joined with article headline fields
pub async fn list_library_articles<'e, E>(executor: E, library_id: Id) -> Result<Vec<LibraryArticle>>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query(
        r#"
        SELECT la.id, la.library_id, la.article_id, la.reading_status, la.notes, la.date_added,
               a.title, a.doi, a.publication_year
        FROM library_articles la
        JOIN articles a ON a.id = la.article_id
        WHERE la.library_id = ?
        ORDER BY la.date_added, la.id
        "#,
    )
    .bind(library_id)
    .fetch_all(executor)
    .await?;

    rows.iter().map(library_article_from_row).collect()
}

async fn hydrate(pool: &SqlitePool, mut library: Library) -> Result<Library> {
    library.articles = list_library_articles(pool, library.id).await?;
    Ok(library)
}

/// Load library by id without its entries
pub async fn get_library_row<'e, E>(executor: E, id: Id) -> Result<Option<Library>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {} FROM libraries WHERE id = ?", LIBRARY_COLUMNS);
    let row = sqlx::query(&sql).bind(id).fetch_optional(executor).await?;
    row.as_ref().map(library_from_row).transpose()
}

/// Load library by id with its entries
pub async fn get_library(pool: &SqlitePool, id: Id) -> Result<Option<Library>> {
    match get_library_row(pool, id).await? {
        Some(library) => Ok(Some(hydrate(pool, library).await?)),
        None => Ok(None),
    }
}

/// Load the owner's default library with its entries
pub async fn get_default_library(pool: &SqlitePool, owner_id: Id) -> Result<Option<Library>> {
    let sql = format!(
        "SELECT {} FROM libraries WHERE owner_id = ? AND is_default = 1",
        LIBRARY_COLUMNS
    );
    let row = sqlx::query(&sql).bind(owner_id).fetch_optional(pool).await?;

    match row {
        Some(row) => Ok(Some(hydrate(pool, library_from_row(&row)?).await?)),
        None => Ok(None),
    }
}

/// All libraries of an owner in creation order, with entries
pub async fn list_libraries_by_owner(pool: &SqlitePool, owner_id: Id) -> Result<Vec<Library>> {
    let sql = format!(
        "SELECT {} FROM libraries WHERE owner_id = ? ORDER BY id",
        LIBRARY_COLUMNS
    );
    let rows = sqlx::query(&sql).bind(owner_id).fetch_all(pool).await?;

    let mut libraries = Vec::with_capacity(rows.len());
    for row in &rows {
        libraries.push(hydrate(pool, library_from_row(row)?).await?);
    }

    Ok(libraries)
}

/// An owner's non-default libraries in creation order, with entries
pub async fn list_other_libraries(pool: &SqlitePool, owner_id: Id) -> Result<Vec<Library>> {
    let sql = format!(
        "SELECT {} FROM libraries WHERE owner_id = ? AND is_default = 0 ORDER BY id",
        LIBRARY_COLUMNS
    );
    let rows = sqlx::query(&sql).bind(owner_id).fetch_all(pool).await?;

    let mut libraries = Vec::with_capacity(rows.len());
    for row in &rows {
        libraries.push(hydrate(pool, library_from_row(row)?).await?);
    }

    Ok(libraries)
}

/// Save an article into a library, returning the entry id
///
/// The same article twice in one library is a conflict.
pub async fn add_library_article<'e, E>(
    executor: E,
    library_id: Id,
    article_id: Id,
    reading_status: ReadingStatus,
    notes: Option<&str>,
) -> Result<Id>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO library_articles (library_id, article_id, reading_status, notes, date_added)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(library_id)
    .bind(article_id)
    .bind(reading_status.code())
    .bind(notes)
    .bind(Utc::now())
    .execute(executor)
    .await
    .map_err(|e| {
        Error::from(e).or_conflict(format!(
            "article {} is already in library {}",
            article_id, library_id
        ))
    })?;

    Ok(result.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::articles::create_article;
    use crate::models::NewArticle;
    use jfl_common::db::init_memory_database;

    fn named(owner_id: Id, name: &str) -> NewLibrary {
        NewLibrary {
            owner_id,
            name: name.to_string(),
            description: None,
            is_public: false,
            is_default: false,
        }
    }

    #[tokio::test]
    async fn test_default_library_created_once() {
        let pool = init_memory_database().await.unwrap();

        assert!(insert_default_library_if_absent(&pool, 1).await.unwrap());
        assert!(!insert_default_library_if_absent(&pool, 1).await.unwrap());

        let libraries = list_libraries_by_owner(&pool, 1).await.unwrap();
        assert_eq!(libraries.len(), 1);
        assert!(libraries[0].is_default);
        assert_eq!(libraries[0].name, "My Library");
        assert_eq!(
            libraries[0].description.as_deref(),
            Some("This is my default library.")
        );
    }

    #[tokio::test]
    async fn test_named_libraries_do_not_block_default() {
        let pool = init_memory_database().await.unwrap();

        create_library(&pool, &named(3, "Reading group")).await.unwrap();
        assert!(get_default_library(&pool, 3).await.unwrap().is_none());

        assert!(insert_default_library_if_absent(&pool, 3).await.unwrap());
        assert!(get_default_library(&pool, 3).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_other_libraries_exclude_default() {
        let pool = init_memory_database().await.unwrap();

        insert_default_library_if_absent(&pool, 6).await.unwrap();
        create_library(&pool, &named(6, "Thesis")).await.unwrap();
        create_library(&pool, &named(6, "Later")).await.unwrap();
        create_library(&pool, &named(7, "Not mine")).await.unwrap();

        let others = list_other_libraries(&pool, 6).await.unwrap();
        let names: Vec<_> = others.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Thesis", "Later"]);
        assert!(others.iter().all(|l| !l.is_default));
    }

    #[tokio::test]
    async fn test_library_entries_hydrated() {
        let pool = init_memory_database().await.unwrap();

        let library_id = create_library(&pool, &named(4, "Thesis")).await.unwrap();
        let article_id = create_article(
            &pool,
            &NewArticle {
                doi: "10.5/entry".to_string(),
                title: "Saved Paper".to_string(),
                abstract_text: None,
                publication_year: Some(2018),
                journal_name: None,
                url: None,
            },
        )
        .await
        .unwrap();

        add_library_article(&pool, library_id, article_id, ReadingStatus::Reading, Some("ch. 2"))
            .await
            .unwrap();
        let err = add_library_article(&pool, library_id, article_id, ReadingStatus::Read, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        let library = get_library(&pool, library_id).await.unwrap().unwrap();
        assert_eq!(library.articles.len(), 1);
        let entry = &library.articles[0];
        assert_eq!(entry.article_title, "Saved Paper");
        assert_eq!(entry.doi, "10.5/entry");
        assert_eq!(entry.reading_status, ReadingStatus::Reading);
        assert_eq!(entry.notes.as_deref(), Some("ch. 2"));
    }
}
