//! Vote endpoints

use actix_web::{HttpResponse, Scope, get, patch, web};
use carlettos_persistence::VotePersistence;
use tracing::info;

use crate::{error::AppError, metrics, model::AppState};

const LOG_TARGET: &str = "carlettos_server::api";

pub fn routes() -> Scope {
    web::scope("/votes")
        .service(add_vote)
        .service(remove_vote)
        .service(get_votes)
}

#[get("/{id}")]
pub async fn get_votes(
    data: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let votes = data.persistence().votes_get(&id).await?;
    Ok(HttpResponse::Ok().json(votes))
}

#[patch("/add/{id}/{vote_id}")]
pub async fn add_vote(
    data: web::Data<AppState>,
    path: web::Path<(String, usize)>,
) -> Result<HttpResponse, AppError> {
    let (id, vote_id) = path.into_inner();
    let votes = data.persistence().votes_add(&id, vote_id).await?;
    metrics::record_vote("add");
    info!(target: LOG_TARGET, voter = %id, vote_id, cast = votes.votes.len(), "vote cast");

    Ok(HttpResponse::Ok().json(votes))
}

#[patch("/remove/{id}/{vote_id}")]
pub async fn remove_vote(
    data: web::Data<AppState>,
    path: web::Path<(String, usize)>,
) -> Result<HttpResponse, AppError> {
    let (id, vote_id) = path.into_inner();
    let votes = data.persistence().votes_remove(&id, vote_id).await?;
    metrics::record_vote("remove");
    info!(target: LOG_TARGET, voter = %id, vote_id, "vote withdrawn");

    Ok(HttpResponse::Ok().json(votes))
}
