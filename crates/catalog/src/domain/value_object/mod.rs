mod borrow_status;

pub use borrow_status::BorrowStatus;
