use axum::{
    routing::{get, post},
    Router,
};
use diesel::{
    r2d2::{ConnectionManager, Pool},
    SqliteConnection,
};
use std::sync::Arc;
use tokio::net::TcpListener;

mod engine;
mod error;
mod ingest;
mod model;
mod routes;
mod schema;
mod srs;
mod store;

use engine::ReviewSessionEngine;
use store::SqliteReviewItemStore;

pub type AppEngine = ReviewSessionEngine<SqliteReviewItemStore>;

#[tokio::main]
async fn main() {
    // Database configuration
    dotenv::dotenv().ok();
    env_logger::init();
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://reviews.db".into());

    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .build(manager)
        .expect("Failed to create DB pool");

    let store = SqliteReviewItemStore::new(pool);
    if let Err(e) = store.init_schema() {
        eprintln!("Failed to initialize database schema: {}", e);
        std::process::exit(1);
    }

    let engine = Arc::new(ReviewSessionEngine::new(store));

    // Review scheduler API
    let app = Router::new()
        .route("/review-items", post(routes::ingest_review_item))
        .route("/review-items/due", get(routes::due_reviews))
        .route("/review-items/upcoming", get(routes::upcoming_reviews))
        .route("/review-items/{id}/complete", post(routes::complete_review))
        .route("/review-stats", get(routes::review_stats))
        .with_state(engine);

    // Start server
    let listener = match TcpListener::bind("127.0.0.1:5000").await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to address: {}", e);
            std::process::exit(1);
        }
    };

    println!("Review scheduler running on http://localhost:5000");

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
