use crate::controller::Exhaust;
use application::transfer::BookDto;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

const BOOK_DELETED: &str = "Kitap silindi";

#[derive(Debug, Serialize)]
pub struct BookResponse {
    id: i64,
    #[serde(rename = "baslik")]
    title: String,
    isbn: String,
    #[serde(rename = "yazar")]
    author: String,
}

impl From<BookDto> for BookResponse {
    fn from(value: BookDto) -> Self {
        Self {
            id: value.id,
            title: value.title,
            isbn: value.isbn,
            author: value.author,
        }
    }
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

#[derive(Debug)]
pub struct CreatedBookResponse(BookResponse);

impl IntoResponse for CreatedBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, axum::Json(self.0)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedBookResponse {
    message: &'static str,
}

impl IntoResponse for DeletedBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct BookPresenter;

impl Exhaust<BookDto> for BookPresenter {
    type To = BookResponse;
    fn emit(&self, input: BookDto) -> Self::To {
        BookResponse::from(input)
    }
}

impl Exhaust<Vec<BookDto>> for BookPresenter {
    type To = axum::Json<Vec<BookResponse>>;
    fn emit(&self, input: Vec<BookDto>) -> Self::To {
        let result = input
            .into_iter()
            .map(BookResponse::from)
            .collect::<Vec<_>>();

        axum::Json::from(result)
    }
}

impl Exhaust<()> for BookPresenter {
    type To = DeletedBookResponse;
    fn emit(&self, _: ()) -> Self::To {
        DeletedBookResponse {
            message: BOOK_DELETED,
        }
    }
}

pub struct CreatedBookPresenter;

impl Exhaust<BookDto> for CreatedBookPresenter {
    type To = CreatedBookResponse;
    fn emit(&self, input: BookDto) -> Self::To {
        CreatedBookResponse(BookResponse::from(input))
    }
}
