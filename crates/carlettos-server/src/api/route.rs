//! API routing configuration

use actix_web::web;

use super::{chess, health, leaderboard, task, vote};

/// Register every API route on the application
///
/// Routes:
/// - POST /task/{title} - Create a task
/// - GET /task/{id} - Get a task
/// - PATCH /task/{id} - Toggle a task
/// - DELETE /task/{id} - Delete a task
/// - GET /tasks - List tasks
/// - GET /chess - Get the shared board
/// - PATCH /chess - Replace the shared board
/// - PATCH /chess/{board} - Replace the shared board (board JSON in the path)
/// - GET /votes/{id} - Get the votes of a voter
/// - PATCH /votes/add/{id}/{vote_id} - Cast a vote
/// - PATCH /votes/remove/{id}/{vote_id} - Withdraw a vote
/// - POST /c2048/highscores/{name}/{score}/{max_tile}/{min_energy}/{max_energy} - Submit a score
/// - GET /c2048/highscores - Leaderboard
/// - GET /health - Storage status
/// - GET /metrics - Prometheus metrics
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(task::create_task)
        .service(task::get_task)
        .service(task::toggle_task)
        .service(task::delete_task)
        .service(task::list_tasks)
        .service(chess::routes())
        .service(vote::routes())
        .service(leaderboard::routes())
        .service(health::health)
        .service(health::prometheus_metrics);
}
