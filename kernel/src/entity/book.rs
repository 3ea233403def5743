mod author;
mod id;
mod isbn;
mod title;

pub use self::{author::*, id::*, isbn::*, title::*};
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Book {
    id: BookId,
    title: BookTitle,
    isbn: BookIsbn,
    author: BookAuthor,
}

impl Book {
    pub fn new(id: BookId, title: BookTitle, isbn: BookIsbn, author: BookAuthor) -> Self {
        Self {
            id,
            title,
            isbn,
            author,
        }
    }
}

/// A book that has not been stored yet. Storage assigns the id.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct BookDraft {
    title: BookTitle,
    isbn: BookIsbn,
    author: BookAuthor,
}

impl BookDraft {
    pub fn new(title: BookTitle, isbn: BookIsbn, author: BookAuthor) -> Self {
        Self {
            title,
            isbn,
            author,
        }
    }

    pub fn into_book(self, id: BookId) -> Book {
        let DestructBookDraft {
            title,
            isbn,
            author,
        } = self.into_destruct();
        Book::new(id, title, isbn, author)
    }
}
