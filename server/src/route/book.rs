use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    BookTransformer, CreateBookRequest, DeleteBookRequest, GetBookRequest, JsonPayload,
    UpdateBookRequest,
};
use crate::response::{BookPresenter, CreatedBookPresenter};
use application::service::{
    CreateBookService, DeleteBookService, GetAllBookService, GetBookService, UpdateBookService,
};
use axum::extract::{Path, State};
use axum::routing::get;
use axum::Router;

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl BookRouter for Router<AppModule> {
    fn route_book(self) -> Self {
        self.route(
            "/kitaplar",
            get(|State(module): State<AppModule>| async move {
                Controller::new((), BookPresenter)
                    .bypass(|| module.sqlite().get_all_books())
                    .await
                    .map_err(ErrorStatus::from)
            })
            .post(
                |State(module): State<AppModule>,
                 payload: JsonPayload<CreateBookRequest>| async move {
                    let transformed = Controller::new(BookTransformer, CreatedBookPresenter)
                        .try_intake(payload)
                        .map_err(ErrorStatus::from)?;
                    transformed
                        .handle(|dto| async move { module.sqlite().create_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/kitaplar/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<String>| async move {
                    let transformed = Controller::new(BookTransformer, BookPresenter)
                        .try_intake(GetBookRequest::new(id))
                        .map_err(ErrorStatus::from)?;
                    transformed
                        .handle(|dto| async move { module.sqlite().get_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .put(
                |State(module): State<AppModule>,
                 Path(id): Path<String>,
                 payload: JsonPayload<UpdateBookRequest>| async move {
                    let transformed = Controller::new(BookTransformer, BookPresenter)
                        .try_intake((id, payload))
                        .map_err(ErrorStatus::from)?;
                    transformed
                        .handle(|dto| async move { module.sqlite().update_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>, Path(id): Path<String>| async move {
                    let transformed = Controller::new(BookTransformer, BookPresenter)
                        .try_intake(DeleteBookRequest::new(id))
                        .map_err(ErrorStatus::from)?;
                    transformed
                        .handle(|dto| async move { module.sqlite().delete_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}

#[cfg(test)]
mod test {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use driver::database::SqliteDatabase;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::handler::{AppModule, Handler};
    use crate::route::BookRouter;

    async fn app() -> Router {
        let sqlite = SqliteDatabase::connect("sqlite::memory:", 1)
            .await
            .expect("in-memory database");
        Router::new()
            .route_book()
            .with_state(AppModule::from(Handler::new(sqlite)))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create(app: &Router, body: Value) -> (StatusCode, Value) {
        call(app, Method::POST, "/kitaplar", Some(&body.to_string())).await
    }

    fn not_found() -> Value {
        json!({ "error": "Kitap bulunamadı" })
    }

    #[tokio::test]
    async fn create_then_get_returns_same_record() {
        let app = app().await;

        let (status, created) = create(&app, json!({"baslik": "A", "isbn": "111", "yazar": "X"})).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            created,
            json!({"id": 1, "baslik": "A", "isbn": "111", "yazar": "X"})
        );

        let (status, found) = call(&app, Method::GET, "/kitaplar/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn create_ignores_id_in_body() {
        let app = app().await;

        let (status, created) = create(
            &app,
            json!({"id": 42, "baslik": "Suç ve Ceza", "isbn": "9789750729869", "yazar": "Fyodor Dostoyevski"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], json!(1));
    }

    #[tokio::test]
    async fn duplicate_isbn_is_rejected_and_first_record_survives() {
        let app = app().await;

        let (status, first) = create(&app, json!({"baslik": "A", "isbn": "111", "yazar": "X"})).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = create(&app, json!({"baslik": "B", "isbn": "111", "yazar": "Y"})).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].is_string());

        let (status, found) = call(&app, Method::GET, "/kitaplar/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found, first);

        let (_, all) = call(&app, Method::GET, "/kitaplar", None).await;
        assert_eq!(all.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn list_returns_every_record_in_insertion_order() {
        let app = app().await;

        let (status, all) = call(&app, Method::GET, "/kitaplar", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all, json!([]));

        for (title, isbn) in [("A", "111"), ("B", "222"), ("C", "333")] {
            let (status, _) = create(&app, json!({"baslik": title, "isbn": isbn, "yazar": "X"})).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, first) = call(&app, Method::GET, "/kitaplar", None).await;
        assert_eq!(status, StatusCode::OK);
        let titles = first
            .as_array()
            .unwrap()
            .iter()
            .map(|book| book["baslik"].as_str().unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["A", "B", "C"]);

        let (_, second) = call(&app, Method::GET, "/kitaplar", None).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let app = app().await;

        let (status, body) = call(&app, Method::GET, "/kitaplar/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, not_found());

        let (status, body) = call(&app, Method::GET, "/kitaplar/abc", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, not_found());
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let app = app().await;

        let (status, body) = call(&app, Method::POST, "/kitaplar", Some("{\"baslik\": ")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, _) = create(&app, json!({"baslik": "A", "isbn": "111"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = create(&app, json!({"baslik": "", "isbn": "111", "yazar": "X"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = create(&app, json!({"baslik": "A", "isbn": "111", "yazar": null})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, all) = call(&app, Method::GET, "/kitaplar", None).await;
        assert_eq!(all, json!([]));
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found_and_creates_nothing() {
        let app = app().await;

        let body = json!({"baslik": "B"}).to_string();
        let (status, response) = call(&app, Method::PUT, "/kitaplar/1", Some(&body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(response, not_found());

        let (_, all) = call(&app, Method::GET, "/kitaplar", None).await;
        assert_eq!(all, json!([]));
    }

    #[tokio::test]
    async fn update_with_title_only_keeps_author_and_isbn() {
        let app = app().await;
        create(&app, json!({"baslik": "A", "isbn": "111", "yazar": "X"})).await;

        let body = json!({"baslik": "B"}).to_string();
        let (status, updated) = call(&app, Method::PUT, "/kitaplar/1", Some(&body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            updated,
            json!({"id": 1, "baslik": "B", "isbn": "111", "yazar": "X"})
        );

        let (_, found) = call(&app, Method::GET, "/kitaplar/1", None).await;
        assert_eq!(found, updated);
    }

    #[tokio::test]
    async fn update_applies_every_provided_field() {
        let app = app().await;
        create(&app, json!({"baslik": "Suç ve Ceza", "isbn": "9789750729869", "yazar": "Fyodor Dostoyevski"})).await;

        let body = json!({"baslik": "Savaş ve Barış", "isbn": "9789750719387", "yazar": "Lev Tolstoy"}).to_string();
        let (status, updated) = call(&app, Method::PUT, "/kitaplar/1", Some(&body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            updated,
            json!({"id": 1, "baslik": "Savaş ve Barış", "isbn": "9789750719387", "yazar": "Lev Tolstoy"})
        );
    }

    #[tokio::test]
    async fn update_to_taken_isbn_is_a_conflict() {
        let app = app().await;
        create(&app, json!({"baslik": "A", "isbn": "111", "yazar": "X"})).await;
        create(&app, json!({"baslik": "B", "isbn": "222", "yazar": "Y"})).await;

        let body = json!({"isbn": "111"}).to_string();
        let (status, _) = call(&app, Method::PUT, "/kitaplar/2", Some(&body)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, found) = call(&app, Method::GET, "/kitaplar/2", None).await;
        assert_eq!(found["isbn"], json!("222"));
    }

    #[tokio::test]
    async fn update_with_malformed_body_is_bad_request() {
        let app = app().await;
        create(&app, json!({"baslik": "A", "isbn": "111", "yazar": "X"})).await;

        let (status, _) = call(&app, Method::PUT, "/kitaplar/1", Some("not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_unknown_id_with_malformed_body_is_not_found() {
        let app = app().await;

        let (status, body) = call(&app, Method::PUT, "/kitaplar/99", Some("not json")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, not_found());

        let body = json!({"baslik": "  "}).to_string();
        let (status, _) = call(&app, Method::PUT, "/kitaplar/99", Some(&body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn oversized_body_is_payload_too_large() {
        let app = app().await;
        create(&app, json!({"baslik": "A", "isbn": "111", "yazar": "X"})).await;

        let huge = json!({"baslik": "B".repeat(3 * 1024 * 1024), "isbn": "222", "yazar": "Y"}).to_string();
        let (status, body) = call(&app, Method::POST, "/kitaplar", Some(&huge)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body["error"].is_string());

        let (status, _) = call(&app, Method::PUT, "/kitaplar/1", Some(&huge)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

        let (_, all) = call(&app, Method::GET, "/kitaplar", None).await;
        assert_eq!(all.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let app = app().await;
        create(&app, json!({"baslik": "A", "isbn": "111", "yazar": "X"})).await;

        let (status, body) = call(&app, Method::DELETE, "/kitaplar/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Kitap silindi"}));

        let (status, _) = call(&app, Method::GET, "/kitaplar/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = call(&app, Method::DELETE, "/kitaplar/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, not_found());
    }
}
