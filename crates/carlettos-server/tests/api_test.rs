//! Route tests against the embedded backend

use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use carlettos_chess::Board;
use carlettos_common::{AffectedRows, LeaderboardEntry, Task, Votes};
use carlettos_persistence::{ChessPersistence, EmbeddedPersistService, PersistenceService};
use carlettos_server::{
    api::route,
    middleware::Cors,
    model::{AppState, Configuration},
};
use tempfile::TempDir;

async fn create_test_state() -> (Arc<AppState>, TempDir) {
    let dir = TempDir::new().unwrap();
    let service = EmbeddedPersistService::open(dir.path()).unwrap();
    service.chess_init().await.unwrap();
    let persistence: Arc<dyn PersistenceService> = Arc::new(service);
    let state = AppState::new(Configuration::default(), persistence);
    (Arc::new(state), dir)
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(Cors)
                .app_data(web::Data::from($state.clone()))
                .configure(route::configure),
        )
        .await
    };
}

// ==================== Task Tests ====================

#[actix_web::test]
async fn test_task_lifecycle() {
    let (state, _dir) = create_test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::post().uri("/task/buy%20milk").to_request();
    let task: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(task.title, "buy milk");
    assert!(!task.completed);

    let req = test::TestRequest::get()
        .uri(&format!("/task/{}", task.id))
        .to_request();
    let found: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found, task);

    let req = test::TestRequest::patch()
        .uri(&format!("/task/{}", task.id))
        .to_request();
    let affected: AffectedRows = test::call_and_read_body_json(&app, req).await;
    assert_eq!(affected.rows_affected, 1);

    let req = test::TestRequest::get().uri("/tasks").to_request();
    let tasks: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tasks.len(), 1);
    assert!(tasks[0].completed);

    let req = test::TestRequest::delete()
        .uri(&format!("/task/{}", task.id))
        .to_request();
    let affected: AffectedRows = test::call_and_read_body_json(&app, req).await;
    assert_eq!(affected.rows_affected, 1);

    let req = test::TestRequest::get().uri("/tasks").to_request();
    let tasks: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert!(tasks.is_empty());
}

#[actix_web::test]
async fn test_tasks_listed_by_creation() {
    let (state, _dir) = create_test_state().await;
    let app = init_app!(state);

    for title in ["first", "second", "third"] {
        let req = test::TestRequest::post()
            .uri(&format!("/task/{}", title))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/tasks").to_request();
    let tasks: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
}

#[actix_web::test]
async fn test_missing_task() {
    let (state, _dir) = create_test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/task/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "'task:nope' not found");

    let req = test::TestRequest::patch().uri("/task/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ==================== Chess Tests ====================

#[actix_web::test]
async fn test_chess_round_trip() {
    let (state, _dir) = create_test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/chess").to_request();
    let board: Board = test::call_and_read_body_json(&app, req).await;
    assert_eq!(board, Board::default());

    let mut board = board;
    assert!(!board.on_click((4, 6)));
    assert!(board.on_click((4, 4)));

    let req = test::TestRequest::patch()
        .uri("/chess")
        .set_json(&board)
        .to_request();
    let stored: Board = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stored, board);

    let req = test::TestRequest::get().uri("/chess").to_request();
    let fetched: Board = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, board);
}

#[actix_web::test]
async fn test_chess_rejects_invalid_board() {
    let (state, _dir) = create_test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::patch()
        .uri("/chess")
        .set_payload("{\"pieces\": []}")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let short = Board {
        pieces: vec![None; 8],
        ..Board::default()
    };
    let req = test::TestRequest::patch()
        .uri("/chess")
        .set_json(&short)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/chess").to_request();
    let board: Board = test::call_and_read_body_json(&app, req).await;
    assert_eq!(board, Board::default());
}

#[actix_web::test]
async fn test_chess_board_in_path() {
    let (state, _dir) = create_test_state().await;
    let app = init_app!(state);

    let mut board = Board::default();
    board.on_click((1, 7));
    let json = serde_json::to_string(&board).unwrap();
    let encoded: String = json
        .bytes()
        .map(|b| match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' => (b as char).to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect();

    let req = test::TestRequest::patch()
        .uri(&format!("/chess/{}", encoded))
        .to_request();
    let stored: Board = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stored, board);
}

// ==================== Vote Tests ====================

#[actix_web::test]
async fn test_votes() {
    let (state, _dir) = create_test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/votes/alice").to_request();
    let votes: Votes = test::call_and_read_body_json(&app, req).await;
    assert_eq!(votes, Votes::empty("alice"));

    for vote_id in [1, 2, 2, 3, 4] {
        let req = test::TestRequest::patch()
            .uri(&format!("/votes/add/alice/{}", vote_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/votes/alice").to_request();
    let votes: Votes = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<usize> = votes.votes.iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let req = test::TestRequest::patch()
        .uri("/votes/remove/alice/2")
        .to_request();
    let votes: Votes = test::call_and_read_body_json(&app, req).await;
    assert!(!votes.contains(2));
    assert_eq!(votes.votes.len(), 2);
}

#[actix_web::test]
async fn test_vote_id_must_be_numeric() {
    let (state, _dir) = create_test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::patch()
        .uri("/votes/add/alice/first")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ==================== Leaderboard Tests ====================

#[actix_web::test]
async fn test_highscores_sorted() {
    let (state, _dir) = create_test_state().await;
    let app = init_app!(state);

    for (name, score) in [("ana", 1200), ("bruno", 5400), ("carla", 300)] {
        let req = test::TestRequest::post()
            .uri(&format!("/c2048/highscores/{}/{}/256/-4/12", name, score))
            .to_request();
        let entry: LeaderboardEntry = test::call_and_read_body_json(&app, req).await;
        assert_eq!(entry.name, name);
        assert_eq!(entry.min_energy, -4);
    }

    let req = test::TestRequest::get().uri("/c2048/highscores").to_request();
    let entries: Vec<LeaderboardEntry> = test::call_and_read_body_json(&app, req).await;
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["bruno", "ana", "carla"]);
}

// ==================== Health / CORS Tests ====================

#[actix_web::test]
async fn test_health() {
    let (state, _dir) = create_test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["storage_mode"], "embedded");
    assert_eq!(body["data"]["status"], "UP");
}

#[actix_web::test]
async fn test_metrics_without_recorder() {
    let (state, _dir) = create_test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_cors_headers() {
    let (state, _dir) = create_test_state().await;
    let app = init_app!(state);

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/tasks")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/tasks").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}
