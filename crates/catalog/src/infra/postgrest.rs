//! Backend-backed Catalog Repositories
//!
//! Rows come back with embedded relations (`authors(...)`,
//! `categories(...)`, `books(...)`); the row structs here flatten them
//! into the entity shapes before anything crosses the domain boundary.
//! A missing relation flattens to a placeholder display name instead of
//! an error, because catalog rows with dangling foreign keys are a data
//! condition, not a fault.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use kernel::error::app_error::AppError;
use platform::postgrest::{BackendError, BackendExecutor, QuerySpec};

use crate::domain::entity::{
    Author, AuthorPatch, Book, BookPatch, BorrowedBook, Borrowing, BorrowingPatch, Category,
    CategoryPatch, NewAuthor, NewBook, NewBorrowing, NewCategory,
};
use crate::domain::repository::{
    AuthorRepository, BookRepository, BorrowingRepository, CategoryRepository,
};
use crate::domain::value_object::BorrowStatus;
use crate::error::{CatalogError, CatalogResult};

const BOOKS_TABLE: &str = "books";
const AUTHORS_TABLE: &str = "authors";
const CATEGORIES_TABLE: &str = "categories";
const BORROWINGS_TABLE: &str = "borrowings";

const BOOK_COLUMNS: &str = "id,title,description,isbn,published_date,cover_image,total_copies,\
                            available_copies,status,author_id,category_id,\
                            authors(id,authorname),categories(id,categoryname)";
const AUTHOR_COLUMNS: &str = "id,authorname,bio";
const CATEGORY_COLUMNS: &str = "id,categoryname,description";
const BORROWING_COLUMNS: &str =
    "id,user_id,book_id,borrow_date,due_date,return_date,status,books(id,title,cover_image)";

/// Display name used when a book has no author relation
const UNKNOWN_AUTHOR: &str = "Unknown Author";
/// Display name used when a book has no category relation
const UNCATEGORIZED: &str = "Uncategorized";

fn decode<T: serde::de::DeserializeOwned>(row: Value) -> CatalogResult<T> {
    serde_json::from_value(row).map_err(|e| BackendError::Decode(e).into())
}

fn encode<T: serde::Serialize>(payload: &T) -> CatalogResult<Value> {
    serde_json::to_value(payload).map_err(|e| BackendError::Decode(e).into())
}

#[derive(Deserialize)]
struct AuthorRel {
    authorname: String,
}

#[derive(Deserialize)]
struct CategoryRel {
    categoryname: String,
}

/// Wire shape of a book row, relations still nested.
#[derive(Deserialize)]
struct BookRow {
    id: i64,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    isbn: Option<String>,
    #[serde(default)]
    published_date: Option<NaiveDate>,
    #[serde(default)]
    cover_image: Option<String>,
    total_copies: i32,
    available_copies: i32,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    author_id: Option<i64>,
    #[serde(default)]
    category_id: Option<i64>,
    #[serde(default)]
    authors: Option<AuthorRel>,
    #[serde(default)]
    categories: Option<CategoryRel>,
}

impl BookRow {
    fn into_book(self) -> Book {
        Book {
            id: self.id,
            title: self.title,
            description: self.description,
            isbn: self.isbn,
            published_date: self.published_date,
            cover_image: self.cover_image,
            total_copies: self.total_copies,
            available_copies: self.available_copies,
            status: self.status,
            author_id: self.author_id,
            category_id: self.category_id,
            author: self
                .authors
                .map(|a| a.authorname)
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            category: self
                .categories
                .map(|c| c.categoryname)
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
        }
    }
}

/// Wire shape of a borrowing row, book relation still nested.
#[derive(Deserialize)]
struct BorrowingRow {
    id: i64,
    user_id: Uuid,
    book_id: i64,
    borrow_date: DateTime<Utc>,
    #[serde(default)]
    due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    return_date: Option<DateTime<Utc>>,
    #[serde(default)]
    status: BorrowStatus,
    #[serde(default)]
    books: Option<BorrowedBook>,
}

impl BorrowingRow {
    fn into_borrowing(self) -> Borrowing {
        Borrowing {
            id: self.id,
            user_id: self.user_id,
            book_id: self.book_id,
            borrow_date: self.borrow_date,
            due_date: self.due_date,
            return_date: self.return_date,
            status: self.status,
            book: self.books,
        }
    }
}

/// Book repository over the backend's `books` collection.
#[derive(Clone)]
pub struct PostgrestBookRepository<E>
where
    E: BackendExecutor,
{
    backend: Arc<E>,
}

impl<E> PostgrestBookRepository<E>
where
    E: BackendExecutor,
{
    pub fn new(backend: Arc<E>) -> Self {
        Self { backend }
    }

    async fn fetch_books(&self, spec: QuerySpec) -> CatalogResult<Vec<Book>> {
        let rows = self.backend.fetch_rows(spec).await?;
        rows.into_iter()
            .map(|row| Ok(decode::<BookRow>(row)?.into_book()))
            .collect()
    }
}

impl<E> BookRepository for PostgrestBookRepository<E>
where
    E: BackendExecutor + Sync,
{
    async fn list(&self) -> CatalogResult<Vec<Book>> {
        self.fetch_books(
            QuerySpec::select(BOOKS_TABLE)
                .columns(BOOK_COLUMNS)
                .order_asc("title"),
        )
        .await
    }

    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Book>> {
        let spec = QuerySpec::select(BOOKS_TABLE)
            .columns(BOOK_COLUMNS)
            .eq("id", id);
        match self.backend.fetch_single(spec).await {
            Ok(row) => Ok(Some(decode::<BookRow>(row)?.into_book())),
            Err(BackendError::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn search(&self, query: &str) -> CatalogResult<Vec<Book>> {
        self.fetch_books(
            QuerySpec::select(BOOKS_TABLE)
                .columns(BOOK_COLUMNS)
                .ilike("title", query)
                .order_asc("title"),
        )
        .await
    }

    async fn create(&self, book: &NewBook) -> CatalogResult<Book> {
        book.validate()?;
        let row = self
            .backend
            .fetch_single(QuerySpec::insert(BOOKS_TABLE, encode(book)?).columns(BOOK_COLUMNS))
            .await?;
        Ok(decode::<BookRow>(row)?.into_book())
    }

    async fn update(&self, id: i64, patch: &BookPatch) -> CatalogResult<Book> {
        if patch.is_empty() {
            return Err(AppError::bad_request("book patch is empty").into());
        }
        patch.validate()?;
        let row = self
            .backend
            .fetch_single(
                QuerySpec::update(BOOKS_TABLE, encode(patch)?)
                    .eq("id", id)
                    .columns(BOOK_COLUMNS),
            )
            .await?;
        Ok(decode::<BookRow>(row)?.into_book())
    }

    async fn delete(&self, id: i64) -> CatalogResult<()> {
        self.backend
            .execute(QuerySpec::delete(BOOKS_TABLE).eq("id", id))
            .await?;
        Ok(())
    }
}

/// Author repository over the backend's `authors` collection.
#[derive(Clone)]
pub struct PostgrestAuthorRepository<E>
where
    E: BackendExecutor,
{
    backend: Arc<E>,
}

impl<E> PostgrestAuthorRepository<E>
where
    E: BackendExecutor,
{
    pub fn new(backend: Arc<E>) -> Self {
        Self { backend }
    }
}

impl<E> AuthorRepository for PostgrestAuthorRepository<E>
where
    E: BackendExecutor + Sync,
{
    async fn list(&self) -> CatalogResult<Vec<Author>> {
        let rows = self
            .backend
            .fetch_rows(
                QuerySpec::select(AUTHORS_TABLE)
                    .columns(AUTHOR_COLUMNS)
                    .order_asc("authorname"),
            )
            .await?;
        rows.into_iter().map(decode).collect()
    }

    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Author>> {
        let spec = QuerySpec::select(AUTHORS_TABLE)
            .columns(AUTHOR_COLUMNS)
            .eq("id", id);
        match self.backend.fetch_single(spec).await {
            Ok(row) => Ok(Some(decode(row)?)),
            Err(BackendError::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn search(&self, query: &str) -> CatalogResult<Vec<Author>> {
        let rows = self
            .backend
            .fetch_rows(
                QuerySpec::select(AUTHORS_TABLE)
                    .columns(AUTHOR_COLUMNS)
                    .ilike("authorname", query)
                    .order_asc("authorname"),
            )
            .await?;
        rows.into_iter().map(decode).collect()
    }

    async fn create(&self, author: &NewAuthor) -> CatalogResult<Author> {
        author.validate()?;
        let row = self
            .backend
            .fetch_single(
                QuerySpec::insert(AUTHORS_TABLE, encode(author)?).columns(AUTHOR_COLUMNS),
            )
            .await?;
        decode(row)
    }

    async fn update(&self, id: i64, patch: &AuthorPatch) -> CatalogResult<Author> {
        if patch.is_empty() {
            return Err(AppError::bad_request("author patch is empty").into());
        }
        let row = self
            .backend
            .fetch_single(
                QuerySpec::update(AUTHORS_TABLE, encode(patch)?)
                    .eq("id", id)
                    .columns(AUTHOR_COLUMNS),
            )
            .await?;
        decode(row)
    }

    async fn delete(&self, id: i64) -> CatalogResult<()> {
        self.backend
            .execute(QuerySpec::delete(AUTHORS_TABLE).eq("id", id))
            .await?;
        Ok(())
    }
}

/// Category repository over the backend's `categories` collection.
#[derive(Clone)]
pub struct PostgrestCategoryRepository<E>
where
    E: BackendExecutor,
{
    backend: Arc<E>,
}

impl<E> PostgrestCategoryRepository<E>
where
    E: BackendExecutor,
{
    pub fn new(backend: Arc<E>) -> Self {
        Self { backend }
    }
}

impl<E> CategoryRepository for PostgrestCategoryRepository<E>
where
    E: BackendExecutor + Sync,
{
    async fn list(&self) -> CatalogResult<Vec<Category>> {
        let rows = self
            .backend
            .fetch_rows(
                QuerySpec::select(CATEGORIES_TABLE)
                    .columns(CATEGORY_COLUMNS)
                    .order_asc("categoryname"),
            )
            .await?;
        rows.into_iter().map(decode).collect()
    }

    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Category>> {
        let spec = QuerySpec::select(CATEGORIES_TABLE)
            .columns(CATEGORY_COLUMNS)
            .eq("id", id);
        match self.backend.fetch_single(spec).await {
            Ok(row) => Ok(Some(decode(row)?)),
            Err(BackendError::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn search(&self, query: &str) -> CatalogResult<Vec<Category>> {
        let rows = self
            .backend
            .fetch_rows(
                QuerySpec::select(CATEGORIES_TABLE)
                    .columns(CATEGORY_COLUMNS)
                    .ilike("categoryname", query)
                    .order_asc("categoryname"),
            )
            .await?;
        rows.into_iter().map(decode).collect()
    }

    async fn create(&self, category: &NewCategory) -> CatalogResult<Category> {
        category.validate()?;
        let row = self
            .backend
            .fetch_single(
                QuerySpec::insert(CATEGORIES_TABLE, encode(category)?).columns(CATEGORY_COLUMNS),
            )
            .await?;
        decode(row)
    }

    async fn update(&self, id: i64, patch: &CategoryPatch) -> CatalogResult<Category> {
        if patch.is_empty() {
            return Err(AppError::bad_request("category patch is empty").into());
        }
        let row = self
            .backend
            .fetch_single(
                QuerySpec::update(CATEGORIES_TABLE, encode(patch)?)
                    .eq("id", id)
                    .columns(CATEGORY_COLUMNS),
            )
            .await?;
        decode(row)
    }

    async fn delete(&self, id: i64) -> CatalogResult<()> {
        self.backend
            .execute(QuerySpec::delete(CATEGORIES_TABLE).eq("id", id))
            .await?;
        Ok(())
    }
}

/// Borrowing repository over the backend's `borrowings` collection.
#[derive(Clone)]
pub struct PostgrestBorrowingRepository<E>
where
    E: BackendExecutor,
{
    backend: Arc<E>,
}

impl<E> PostgrestBorrowingRepository<E>
where
    E: BackendExecutor,
{
    pub fn new(backend: Arc<E>) -> Self {
        Self { backend }
    }

    async fn apply(&self, id: i64, patch: &BorrowingPatch) -> CatalogResult<Borrowing> {
        let row = self
            .backend
            .fetch_single(
                QuerySpec::update(BORROWINGS_TABLE, encode(patch)?)
                    .eq("id", id)
                    .columns(BORROWING_COLUMNS),
            )
            .await?;
        Ok(decode::<BorrowingRow>(row)?.into_borrowing())
    }
}

impl<E> BorrowingRepository for PostgrestBorrowingRepository<E>
where
    E: BackendExecutor + Sync,
{
    async fn create(&self, borrowing: &NewBorrowing) -> CatalogResult<Borrowing> {
        let row = self
            .backend
            .fetch_single(
                QuerySpec::insert(BORROWINGS_TABLE, encode(borrowing)?)
                    .columns(BORROWING_COLUMNS),
            )
            .await?;
        let borrowing = decode::<BorrowingRow>(row)?.into_borrowing();
        tracing::info!(
            borrowing_id = borrowing.id,
            book_id = borrowing.book_id,
            "Borrowing created"
        );
        Ok(borrowing)
    }

    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Borrowing>> {
        let spec = QuerySpec::select(BORROWINGS_TABLE)
            .columns(BORROWING_COLUMNS)
            .eq("id", id);
        match self.backend.fetch_single(spec).await {
            Ok(row) => Ok(Some(decode::<BorrowingRow>(row)?.into_borrowing())),
            Err(BackendError::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn list_for_user(&self, user_id: Uuid) -> CatalogResult<Vec<Borrowing>> {
        let rows = self
            .backend
            .fetch_rows(
                QuerySpec::select(BORROWINGS_TABLE)
                    .columns(BORROWING_COLUMNS)
                    .eq("user_id", user_id)
                    .order_desc("borrow_date"),
            )
            .await?;
        rows.into_iter()
            .map(|row| Ok(decode::<BorrowingRow>(row)?.into_borrowing()))
            .collect()
    }

    async fn update(&self, id: i64, patch: &BorrowingPatch) -> CatalogResult<Borrowing> {
        if patch.is_empty() {
            return Err(AppError::bad_request("borrowing patch is empty").into());
        }
        self.apply(id, patch).await
    }

    async fn return_borrowing(&self, id: i64) -> CatalogResult<Borrowing> {
        let current = self.find_by_id(id).await?.ok_or(CatalogError::NotFound)?;
        if !current
            .status
            .is_valid_transition(BorrowStatus::Returned)
        {
            return Err(CatalogError::InvalidTransition(current.status));
        }

        let patch = BorrowingPatch {
            status: Some(BorrowStatus::Returned),
            return_date: Some(Utc::now()),
            ..Default::default()
        };
        let returned = self.apply(id, &patch).await?;
        tracing::info!(borrowing_id = returned.id, "Borrowing returned");
        Ok(returned)
    }
}
