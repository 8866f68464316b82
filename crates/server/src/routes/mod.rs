pub mod attachments;
pub mod health;
pub mod insights;
pub mod streak;
pub mod subtasks;
pub mod tasks;

use axum::Router;

use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(health::router())
                .merge(tasks::router())
                .merge(subtasks::router())
                .merge(attachments::router())
                .merge(streak::router())
                .merge(insights::router()),
        )
        .with_state(state)
}
