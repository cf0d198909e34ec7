//! Shared chess board endpoints
//!
//! Every client plays on the same board. A client reads it, applies clicks
//! locally and writes the whole board back.

use actix_web::{HttpResponse, Scope, get, patch, web};
use carlettos_chess::Board;
use carlettos_persistence::{ChessGame, ChessPersistence};
use tracing::info;

use crate::{
    error::{AppError, CarlettosError},
    metrics,
    model::AppState,
};

const LOG_TARGET: &str = "carlettos_server::api";

pub fn routes() -> Scope {
    web::scope("/chess")
        .service(get_board)
        .service(update_board)
        .service(update_board_from_path)
}

/// Parse and check a board sent by a client
pub fn parse_board(raw: &[u8]) -> Result<Board, CarlettosError> {
    let board: Board = serde_json::from_slice(raw)
        .map_err(|e| CarlettosError::IllegalArgument(format!("invalid board: {}", e)))?;
    board.validate()?;
    Ok(board)
}

async fn store_board(data: &AppState, board: Board) -> Result<HttpResponse, AppError> {
    let game = data
        .persistence()
        .chess_update(ChessGame::new(board))
        .await
        .inspect_err(|_| metrics::record_storage_error("chess_update"))?;
    metrics::record_chess_update();
    info!(target: LOG_TARGET, turn = game.board.turn.name(), "chess board updated");

    Ok(HttpResponse::Ok().json(game.board))
}

#[get("")]
pub async fn get_board(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let persistence = data.persistence();
    let game = match persistence.chess_get().await? {
        Some(game) => game,
        None => persistence.chess_init().await?,
    };

    Ok(HttpResponse::Ok().json(game.board))
}

#[patch("")]
pub async fn update_board(
    data: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let board = parse_board(&body)?;
    store_board(&data, board).await
}

/// Older clients put the board JSON in the last path segment
#[patch("/{board:.*}")]
pub async fn update_board_from_path(
    data: web::Data<AppState>,
    board: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let board = parse_board(board.as_bytes())?;
    store_board(&data, board).await
}
