//! Repository Traits
//!
//! Ports for the catalog tables. Implementations live in the
//! infrastructure layer and are responsible for flattening embedded
//! relations before an entity crosses this boundary.

use uuid::Uuid;

use crate::domain::entity::{
    Author, AuthorPatch, Book, BookPatch, Borrowing, BorrowingPatch, Category, CategoryPatch,
    NewAuthor, NewBook, NewBorrowing, NewCategory,
};
use crate::error::CatalogResult;

/// Book repository trait.
///
/// Single-entity lookups normalize the backend's "no row matched" signal
/// to `Ok(None)`; errors are reserved for genuine backend faults.
#[trait_variant::make(BookRepository: Send)]
pub trait LocalBookRepository {
    /// All books, ordered by title.
    async fn list(&self) -> CatalogResult<Vec<Book>>;

    /// Find one book by id.
    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Book>>;

    /// Case-insensitive substring search over titles, ordered by title.
    async fn search(&self, query: &str) -> CatalogResult<Vec<Book>>;

    /// Insert a book row and return the stored row.
    async fn create(&self, book: &NewBook) -> CatalogResult<Book>;

    /// Apply a partial update and return the stored row.
    async fn update(&self, id: i64, patch: &BookPatch) -> CatalogResult<Book>;

    /// Delete a book row.
    async fn delete(&self, id: i64) -> CatalogResult<()>;
}

/// Author repository trait.
#[trait_variant::make(AuthorRepository: Send)]
pub trait LocalAuthorRepository {
    /// All authors, ordered by name.
    async fn list(&self) -> CatalogResult<Vec<Author>>;

    /// Find one author by id.
    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Author>>;

    /// Case-insensitive substring search over names, ordered by name.
    async fn search(&self, query: &str) -> CatalogResult<Vec<Author>>;

    /// Insert an author row and return the stored row.
    async fn create(&self, author: &NewAuthor) -> CatalogResult<Author>;

    /// Apply a partial update and return the stored row.
    async fn update(&self, id: i64, patch: &AuthorPatch) -> CatalogResult<Author>;

    /// Delete an author row.
    async fn delete(&self, id: i64) -> CatalogResult<()>;
}

/// Category repository trait.
#[trait_variant::make(CategoryRepository: Send)]
pub trait LocalCategoryRepository {
    /// All categories, ordered by name.
    async fn list(&self) -> CatalogResult<Vec<Category>>;

    /// Find one category by id.
    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Category>>;

    /// Case-insensitive substring search over names, ordered by name.
    async fn search(&self, query: &str) -> CatalogResult<Vec<Category>>;

    /// Insert a category row and return the stored row.
    async fn create(&self, category: &NewCategory) -> CatalogResult<Category>;

    /// Apply a partial update and return the stored row.
    async fn update(&self, id: i64, patch: &CategoryPatch) -> CatalogResult<Category>;

    /// Delete a category row.
    async fn delete(&self, id: i64) -> CatalogResult<()>;
}

/// Borrowing repository trait.
#[trait_variant::make(BorrowingRepository: Send)]
pub trait LocalBorrowingRepository {
    /// Insert a borrowing row and return the stored row.
    async fn create(&self, borrowing: &NewBorrowing) -> CatalogResult<Borrowing>;

    /// Find one borrowing by id.
    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Borrowing>>;

    /// All borrowings for one user, most recent first, with the book
    /// relation embedded.
    async fn list_for_user(&self, user_id: Uuid) -> CatalogResult<Vec<Borrowing>>;

    /// Apply a partial update and return the stored row.
    async fn update(&self, id: i64, patch: &BorrowingPatch) -> CatalogResult<Borrowing>;

    /// Close out a loan: only legal from the borrowed state. Stamps the
    /// return date and flips the status.
    async fn return_borrowing(&self, id: i64) -> CatalogResult<Borrowing>;
}
