use kernel::prelude::entity::{Book, DestructBook};
use kernel::KernelError;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookDto {
    pub id: i64,
    pub title: String,
    pub isbn: String,
    pub author: String,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let DestructBook {
            id,
            title,
            isbn,
            author,
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            isbn: isbn.into(),
            author: author.into(),
        }
    }
}

pub struct GetBookDto {
    pub id: i64,
}

pub struct CreateBookDto {
    pub title: String,
    pub isbn: String,
    pub author: String,
}

/// `changes` holds the decoded request body. It is only inspected after the
/// book is known to exist, so a missing book wins over a malformed body.
pub struct UpdateBookDto {
    pub id: i64,
    pub changes: error_stack::Result<BookChangesDto, KernelError>,
}

/// Fields left as `None` keep their stored value.
pub struct BookChangesDto {
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub author: Option<String>,
}

pub struct DeleteBookDto {
    pub id: i64,
}
