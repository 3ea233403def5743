use crate::controller::TryIntake;
use application::transfer::{
    BookChangesDto, CreateBookDto, DeleteBookDto, GetBookDto, UpdateBookDto,
};
use axum::extract::rejection::JsonRejection;
use axum::Json;
use error_stack::{Report, ResultExt};
use kernel::{KernelError, PublicMessage};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    #[serde(rename = "baslik")]
    title: String,
    isbn: String,
    #[serde(rename = "yazar")]
    author: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    #[serde(rename = "baslik")]
    title: Option<String>,
    isbn: Option<String>,
    #[serde(rename = "yazar")]
    author: Option<String>,
}

#[derive(Debug)]
pub struct GetBookRequest {
    id: String,
}

impl GetBookRequest {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteBookRequest {
    id: String,
}

impl DeleteBookRequest {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

pub type JsonPayload<T> = Result<Json<T>, JsonRejection>;

// Ids are only ever assigned by storage, so anything that is not an integer cannot name a book.
fn parse_id(id: &str) -> error_stack::Result<i64, KernelError> {
    id.parse::<i64>()
        .change_context_lazy(|| KernelError::NotFound)
        .attach_printable_lazy(|| format!("{id} is not a book id"))
}

fn bind<T>(payload: JsonPayload<T>) -> error_stack::Result<T, KernelError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        let message = rejection.body_text();
        let report = Report::new(KernelError::Validation)
            .attach_printable(message.clone())
            .attach(PublicMessage::new(message));
        match rejection {
            JsonRejection::JsonDataError(_)
            | JsonRejection::JsonSyntaxError(_)
            | JsonRejection::MissingJsonContentType(_) => report,
            // body could not be read at all (e.g. over the size limit), keep axum's status
            other => report.attach(other.status()),
        }
    })
}

fn require_text(field: &str, value: &str) -> error_stack::Result<(), KernelError> {
    if value.trim().is_empty() {
        return Err(Report::new(KernelError::Validation)
            .attach(PublicMessage::new(format!("{field} boş olamaz"))));
    }
    Ok(())
}

pub struct BookTransformer;

impl TryIntake<JsonPayload<CreateBookRequest>> for BookTransformer {
    type To = CreateBookDto;
    type Error = Report<KernelError>;
    fn emit(&self, input: JsonPayload<CreateBookRequest>) -> Result<Self::To, Self::Error> {
        let input = bind(input)?;
        require_text("baslik", &input.title)?;
        require_text("yazar", &input.author)?;
        Ok(CreateBookDto {
            title: input.title,
            isbn: input.isbn,
            author: input.author,
        })
    }
}

impl TryIntake<(String, JsonPayload<UpdateBookRequest>)> for BookTransformer {
    type To = UpdateBookDto;
    type Error = Report<KernelError>;
    fn emit(
        &self,
        input: (String, JsonPayload<UpdateBookRequest>),
    ) -> Result<Self::To, Self::Error> {
        let (id, input) = input;
        let id = parse_id(&id)?;
        // reported only once the book is known to exist
        let changes = bind(input).and_then(|input| {
            if let Some(title) = &input.title {
                require_text("baslik", title)?;
            }
            if let Some(author) = &input.author {
                require_text("yazar", author)?;
            }
            Ok(BookChangesDto {
                title: input.title,
                isbn: input.isbn,
                author: input.author,
            })
        });
        Ok(UpdateBookDto { id, changes })
    }
}

impl TryIntake<GetBookRequest> for BookTransformer {
    type To = GetBookDto;
    type Error = Report<KernelError>;
    fn emit(&self, input: GetBookRequest) -> Result<Self::To, Self::Error> {
        Ok(GetBookDto {
            id: parse_id(&input.id)?,
        })
    }
}

impl TryIntake<DeleteBookRequest> for BookTransformer {
    type To = DeleteBookDto;
    type Error = Report<KernelError>;
    fn emit(&self, input: DeleteBookRequest) -> Result<Self::To, Self::Error> {
        Ok(DeleteBookDto {
            id: parse_id(&input.id)?,
        })
    }
}
