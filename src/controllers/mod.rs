use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::error::ApiError;
use crate::AppState;

pub mod chatbot;
pub mod community;
pub mod greenpoints;
pub mod listings;
pub mod purchases;
pub mod quiz;
pub mod users;

const BODY_LIMIT: usize = 10 * 1024 * 1024;

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(BODY_LIMIT)
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into())
}

/// Registers every route. `quiz_stats` must come before `quiz_questions`,
/// whose path parameter would otherwise swallow `/stats`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(index)
        .service(health)
        .service(users::signup)
        .service(users::login)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::change_password)
        .service(listings::equipment)
        .service(listings::create_equipment)
        .service(listings::my_equipment)
        .service(listings::delete_equipment)
        .service(listings::byproducts)
        .service(listings::create_byproduct)
        .service(listings::my_byproducts)
        .service(listings::delete_byproduct)
        .service(quiz::quiz_stats)
        .service(quiz::submit_quiz)
        .service(quiz::quiz_questions)
        .service(purchases::rent_equipment)
        .service(purchases::buy_byproduct)
        .service(purchases::purchases)
        .service(community::channels)
        .service(community::channel_messages)
        .service(community::post_message)
        .service(chatbot::chatbot)
        .service(greenpoints::summary)
        .service(greenpoints::award_badge)
        .service(greenpoints::leaderboard);
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "message": "Route not found" }))
}

#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "KhetSathi Farming Platform API",
        "description": "Equipment rental and byproduct trading platform for farmers",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": {
                "signup": "POST /api/signup",
                "login": "POST /api/login",
                "profile": "GET /api/user"
            },
            "equipment": {
                "list": "GET /api/equipment",
                "add": "POST /api/equipment",
                "my_listings": "GET /api/my-equipment"
            },
            "byproducts": {
                "list": "GET /api/byproducts",
                "add": "POST /api/byproducts",
                "my_listings": "GET /api/my-byproducts"
            },
            "greenpoints": {
                "summary": "GET /api/greenpoints",
                "leaderboard": "GET /api/greenpoints/leaderboard"
            },
            "chatbot": "POST /api/chatbot",
            "health": "GET /api/health"
        },
        "documentation": "All endpoints except /api/health require Authorization header with Bearer token"
    }))
}

#[get("/api/health")]
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let database = match state.store.ping().await {
        Ok(()) => "Connected",
        Err(e) => {
            log::warn!("Health check could not reach the store: {e}");
            "Disconnected"
        }
    };
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
        "database": database,
        "message": "KhetSathi API Server is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
