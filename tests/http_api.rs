#![cfg(feature = "http-api")]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};

use party_games_client::{
    config::ClientConfig,
    dao::api::{ApiReply, FormRequest, GameApi, config::ApiConfig, http::HttpGameApi},
    games::deck::{DeckGame, DeckVariant},
    services::controller::{Outcome, SessionController, SessionOptions},
    state::Overlay,
    view::{Region, recording::RecordingView},
};

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: String) -> HttpGameApi {
    HttpGameApi::new(ApiConfig::new(base_url)).unwrap()
}

async fn login() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, "session=abc123; Path=/")],
        Json(json!({ "ok": true })),
    )
}

async fn whoami(headers: HeaderMap) -> Json<Value> {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    Json(json!({ "cookie": cookie }))
}

async fn award(Form(form): Form<Vec<(String, String)>>) -> Json<Value> {
    Json(json!({ "received": form }))
}

fn router() -> Router {
    Router::new()
        .route("/login", get(login))
        .route("/whoami", get(whoami))
        .route("/gty/award", post(award))
        .route("/gty/next", post(|| async { StatusCode::NO_CONTENT }))
        .route(
            "/gty/undo",
            post(|| async { (StatusCode::BAD_REQUEST, "Nothing to undo") }),
        )
        .route(
            "/bluf/reveal",
            post(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "Nog niet iedereen heeft gestemd" })),
                )
            }),
        )
}

#[tokio::test]
async fn session_cookie_is_sent_on_later_requests() {
    let api = client(serve(router()).await);

    let before = api.get("/whoami").await.unwrap();
    assert_eq!(before, ApiReply::json(200, json!({ "cookie": null })));

    api.get("/login").await.unwrap();
    let after = api.get("/whoami").await.unwrap();
    assert_eq!(after.body.unwrap()["cookie"], "session=abc123");
}

#[tokio::test]
async fn form_fields_are_posted_in_order() {
    let api = client(serve(router()).await);
    let reply = api
        .post(FormRequest::new("/gty/award").field("team", 2).field("points", "1"))
        .await
        .unwrap();
    assert_eq!(reply.status, 200);
    assert_eq!(
        reply.body.unwrap()["received"],
        json!([["team", "2"], ["points", "1"]])
    );
}

#[tokio::test]
async fn no_content_and_plain_text_replies_have_no_body() {
    let api = client(serve(router()).await);

    assert_eq!(
        api.post(FormRequest::new("/gty/next")).await.unwrap(),
        ApiReply::empty(204)
    );

    let rejected = api.post(FormRequest::new("/gty/undo")).await.unwrap();
    assert_eq!(rejected, ApiReply::empty(400));
    assert_eq!(rejected.error_message(), None);
}

#[tokio::test]
async fn json_error_field_is_exposed() {
    let api = client(serve(router()).await);
    let reply = api.post(FormRequest::new("/bluf/reveal")).await.unwrap();
    assert_eq!(reply.status, 409);
    assert_eq!(
        reply.error_message().as_deref(),
        Some("Nog niet iedereen heeft gestemd")
    );
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_ignored() {
    let base = serve(router()).await;
    let api = client(format!("{base}/"));
    assert_eq!(api.get("/whoami").await.unwrap().status, 200);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(format!("http://{addr}"));
    assert!(api.get("/whoami").await.is_err());
}

async fn next_person(State(drawn): State<Arc<AtomicUsize>>) -> axum::response::Response {
    const PEOPLE: [&str; 2] = ["Marie Curie", "Johan Cruijff"];
    let number = drawn.fetch_add(1, Ordering::SeqCst);
    match PEOPLE.get(number) {
        Some(person) => Json(json!({
            "person": person,
            "number": number + 1,
            "total": PEOPLE.len()
        }))
        .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[tokio::test]
async fn deck_session_runs_until_the_deck_is_empty() {
    let drawn = Arc::new(AtomicUsize::new(0));
    let base = serve(
        Router::new()
            .route("/wbi/next", post(next_person))
            .with_state(drawn.clone()),
    )
    .await;

    let view = Arc::new(RecordingView::new());
    let controller = SessionController::new(
        DeckGame::new(DeckVariant::WhoAmI),
        Arc::new(client(base)),
        view.clone(),
        &ClientConfig::default(),
        SessionOptions::default(),
    );

    assert_eq!(controller.advance().await, Outcome::Applied);
    assert!(view.text(Region::Stage).contains("Marie Curie"));
    assert_eq!(controller.advance().await, Outcome::Applied);
    assert!(view.text(Region::Stage).contains("Johan Cruijff"));

    assert_eq!(controller.advance().await, Outcome::Exhausted);
    assert_eq!(controller.overlay(), Some(Overlay::Exhausted));
    assert!(view.text(Region::Stage).contains("Johan Cruijff"));
    assert_eq!(drawn.load(Ordering::SeqCst), 3);
}
