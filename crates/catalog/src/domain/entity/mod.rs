mod author;
mod book;
mod borrowing;
mod category;

pub use author::{Author, AuthorPatch, NewAuthor};
pub use book::{Book, BookPatch, NewBook};
pub use borrowing::{BorrowedBook, Borrowing, BorrowingPatch, NewBorrowing};
pub use category::{Category, CategoryPatch, NewCategory};
