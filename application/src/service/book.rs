use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{BookAuthor, BookDraft, BookId, BookIsbn, BookTitle};
use kernel::KernelError;

use crate::transfer::{BookDto, CreateBookDto, DeleteBookDto, GetBookDto, UpdateBookDto};

fn book_not_found(id: &BookId) -> Report<KernelError> {
    Report::new(KernelError::NotFound).attach_printable(format!("book {} does not exist", id.as_ref()))
}

#[async_trait::async_trait]
pub trait GetAllBookService: 'static + Sync + Send + DependOnBookQuery {
    async fn get_all_books(&self) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let books = self.book_query().find_all(&mut connection).await?;
        Ok(books.into_iter().map(BookDto::from).collect())
    }
}

impl<T> GetAllBookService for T where T: DependOnBookQuery {}

#[async_trait::async_trait]
pub trait GetBookService: 'static + Sync + Send + DependOnBookQuery {
    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<BookDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        let book = self
            .book_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| book_not_found(&id))?;

        Ok(BookDto::from(book))
    }
}

impl<T> GetBookService for T where T: DependOnBookQuery {}

#[async_trait::async_trait]
pub trait CreateBookService: 'static + Sync + Send + DependOnBookModifier {
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<BookDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let draft = BookDraft::new(
            BookTitle::new(dto.title),
            BookIsbn::new(dto.isbn),
            BookAuthor::new(dto.author),
        );
        let id = self.book_modifier().create(&mut connection, &draft).await?;

        tracing::debug!("created book {}", id.as_ref());
        Ok(BookDto::from(draft.into_book(id)))
    }
}

impl<T> CreateBookService for T where T: DependOnBookModifier {}

#[async_trait::async_trait]
pub trait UpdateBookService:
    'static + Sync + Send + DependOnBookQuery + DependOnBookModifier
{
    async fn update_book(&self, dto: UpdateBookDto) -> error_stack::Result<BookDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        let mut book = self
            .book_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| book_not_found(&id))?;

        let changes = dto.changes?;
        book.substitute(|book| {
            if let Some(title) = changes.title {
                *book.title = BookTitle::new(title);
            }
            if let Some(isbn) = changes.isbn {
                *book.isbn = BookIsbn::new(isbn);
            }
            if let Some(author) = changes.author {
                *book.author = BookAuthor::new(author);
            }
        });

        self.book_modifier().update(&mut connection, &book).await?;

        tracing::debug!("updated book {}", id.as_ref());
        Ok(BookDto::from(book))
    }
}

impl<T> UpdateBookService for T where T: DependOnBookQuery + DependOnBookModifier {}

#[async_trait::async_trait]
pub trait DeleteBookService:
    'static + Sync + Send + DependOnBookQuery + DependOnBookModifier
{
    async fn delete_book(&self, dto: DeleteBookDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        let book = self
            .book_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| book_not_found(&id))?;

        self.book_modifier()
            .delete(&mut connection, book.id())
            .await?;

        tracing::debug!("deleted book {}", id.as_ref());
        Ok(())
    }
}

impl<T> DeleteBookService for T where T: DependOnBookQuery + DependOnBookModifier {}
