use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::auth::AuthUser;
use crate::responder;

#[derive(Deserialize)]
pub struct ChatbotData {
    message: String,
}

#[post("/api/chatbot")]
pub async fn chatbot(_auth: AuthUser, data: web::Json<ChatbotData>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "response": responder::reply(&data.message) }))
}
