use error_stack::Report;
use sqlx::SqliteConnection;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{Book, BookAuthor, BookDraft, BookId, BookIsbn, BookTitle};
use kernel::KernelError;

use crate::database::sqlite::SqliteTransaction;
use crate::error::ConvertError;

pub struct SqliteBookRepository;

#[async_trait::async_trait]
impl BookQuery for SqliteBookRepository {
    type Transaction = SqliteTransaction;

    async fn find_all(
        &self,
        con: &mut SqliteTransaction,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        SqliteBookInternal::find_all(con).await
    }

    async fn find_by_id(
        &self,
        con: &mut SqliteTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        SqliteBookInternal::find_by_id(con, id).await
    }
}

#[async_trait::async_trait]
impl BookModifier for SqliteBookRepository {
    type Transaction = SqliteTransaction;

    async fn create(
        &self,
        con: &mut SqliteTransaction,
        book: &BookDraft,
    ) -> error_stack::Result<BookId, KernelError> {
        SqliteBookInternal::create(con, book).await
    }

    async fn update(
        &self,
        con: &mut SqliteTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        SqliteBookInternal::update(con, book).await
    }

    async fn delete(
        &self,
        con: &mut SqliteTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        SqliteBookInternal::delete(con, book_id).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: i64,
    title: String,
    isbn: String,
    author: String,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        Book::new(
            BookId::new(value.id),
            BookTitle::new(value.title),
            BookIsbn::new(value.isbn),
            BookAuthor::new(value.author),
        )
    }
}

fn ensure_affected(rows: u64, id: &BookId) -> error_stack::Result<(), KernelError> {
    if rows == 0 {
        return Err(Report::new(KernelError::NotFound)
            .attach_printable(format!("book {} does not exist", id.as_ref())));
    }
    Ok(())
}

pub(in crate::database) struct SqliteBookInternal;

impl SqliteBookInternal {
    async fn find_all(con: &mut SqliteConnection) -> error_stack::Result<Vec<Book>, KernelError> {
        let rows = sqlx::query_as::<_, BookRow>(
            // language=sqlite
            r#"
            SELECT id, title, isbn, author
            FROM books
            ORDER BY id
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn find_by_id(
        con: &mut SqliteConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=sqlite
            r#"
            SELECT id, title, isbn, author
            FROM books
            WHERE id = ?
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        let found = row.map(Book::from);
        Ok(found)
    }

    async fn create(
        con: &mut SqliteConnection,
        book: &BookDraft,
    ) -> error_stack::Result<BookId, KernelError> {
        let result = sqlx::query(
            // language=sqlite
            r#"
            INSERT INTO books (title, isbn, author)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(book.title().as_ref())
        .bind(book.isbn().as_ref())
        .bind(book.author().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(BookId::new(result.last_insert_rowid()))
    }

    async fn update(con: &mut SqliteConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        // language=sqlite
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = ?, isbn = ?, author = ?
            WHERE id = ?
            "#,
        )
        .bind(book.title().as_ref())
        .bind(book.isbn().as_ref())
        .bind(book.author().as_ref())
        .bind(book.id().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        ensure_affected(result.rows_affected(), book.id())
    }

    async fn delete(
        con: &mut SqliteConnection,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        // language=sqlite
        let result = sqlx::query(
            r#"
            DELETE FROM books
            WHERE id = ?
            "#,
        )
        .bind(book_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        ensure_affected(result.rows_affected(), book_id)
    }
}
