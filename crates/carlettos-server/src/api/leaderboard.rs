//! 2048 leaderboard endpoints

use actix_web::{HttpResponse, Scope, get, post, web};
use carlettos_common::LeaderboardEntry;
use carlettos_persistence::LeaderboardPersistence;
use tracing::info;

use crate::{error::AppError, metrics, model::AppState};

const LOG_TARGET: &str = "carlettos_server::api";

pub fn routes() -> Scope {
    web::scope("/c2048/highscores")
        .service(list_highscores)
        .service(add_highscore)
}

#[get("")]
pub async fn list_highscores(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let entries = data.persistence().highscore_find_all().await?;
    Ok(HttpResponse::Ok().json(entries))
}

#[post("/{name}/{score}/{max_tile}/{min_energy}/{max_energy}")]
pub async fn add_highscore(
    data: web::Data<AppState>,
    path: web::Path<(String, usize, usize, isize, isize)>,
) -> Result<HttpResponse, AppError> {
    let (name, score, max_tile, min_energy, max_energy) = path.into_inner();
    let entry = data
        .persistence()
        .highscore_add(LeaderboardEntry {
            name,
            score,
            max_tile,
            min_energy,
            max_energy,
        })
        .await
        .inspect_err(|_| metrics::record_storage_error("highscore_add"))?;
    metrics::record_highscore();
    info!(target: LOG_TARGET, name = %entry.name, score = entry.score, "highscore submitted");

    Ok(HttpResponse::Ok().json(entry))
}
