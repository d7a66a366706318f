use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::community::{channel, ChannelMessage, CHANNELS};
use crate::error::ApiError;

const MAX_MESSAGE_LENGTH: usize = 1000;

#[get("/api/community/channels")]
pub async fn channels(_auth: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(CHANNELS)
}

#[get("/api/community/channels/{channel_id}/messages")]
pub async fn channel_messages(_auth: AuthUser, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    channel(&path).ok_or(ApiError::NotFound("Channel"))?;
    Ok(HttpResponse::Ok().json(Vec::<ChannelMessage>::new()))
}

#[derive(Deserialize)]
pub struct PostMessageData {
    content: String,
}

#[post("/api/community/channels/{channel_id}/messages")]
pub async fn post_message(
    auth: AuthUser,
    path: web::Path<String>,
    data: web::Json<PostMessageData>,
) -> Result<HttpResponse, ApiError> {
    let channel = channel(&path).ok_or(ApiError::NotFound("Channel"))?;
    let content = data.into_inner().content.trim().to_string();
    if content.is_empty() {
        return Err(ApiError::Validation("Message content is required".to_string()));
    }
    if content.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(ApiError::Validation(format!(
            "Message must be at most {MAX_MESSAGE_LENGTH} characters"
        )));
    }

    Ok(HttpResponse::Created().json(ChannelMessage {
        channel_id: channel.id,
        author: auth.username,
        content,
        created_at: Utc::now(),
    }))
}
