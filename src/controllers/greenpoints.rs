use actix_web::{get, post, web, HttpResponse};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;
use serde::Deserialize;
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{Badge, BadgeResponse};
use crate::rewards;
use crate::store::StoreError;
use crate::AppState;

const MAX_BADGE_ID_LENGTH: usize = 64;

#[get("/api/greenpoints")]
pub async fn summary(state: web::Data<AppState>, auth: AuthUser) -> Result<HttpResponse, ApiError> {
    let user = state
        .store
        .find_user(&auth.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    let points = rewards::points_for(state.store.as_ref(), &user).await?;
    let badges: Vec<BadgeResponse> = state
        .store
        .badges_for(&user.id)
        .await?
        .iter()
        .map(BadgeResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "greenPoints": points.total_points,
        "quizPoints": points.quiz_points,
        "sellingPoints": points.selling_points,
        "rentingPoints": points.renting_points,
        "totalPoints": points.total_points,
        "badges": badges,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardBadgeData {
    badge_id: String,
}

#[post("/api/greenpoints/badges")]
pub async fn award_badge(
    state: web::Data<AppState>,
    auth: AuthUser,
    data: web::Json<AwardBadgeData>,
) -> Result<HttpResponse, ApiError> {
    let badge_id = data.into_inner().badge_id.trim().to_string();
    if badge_id.is_empty() || badge_id.len() > MAX_BADGE_ID_LENGTH {
        return Err(ApiError::Validation("A valid badgeId is required".to_string()));
    }
    state
        .store
        .find_user(&auth.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let badge = Badge {
        id: ObjectId::new(),
        user_id: auth.user_id,
        badge_id,
        earned_at: DateTime::now(),
    };
    state.store.insert_badge(&badge).await.map_err(|e| match e {
        StoreError::Duplicate => ApiError::Validation("Badge already earned".to_string()),
        other => other.into(),
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Badge earned successfully",
        "badge": BadgeResponse::from(&badge),
    })))
}

#[get("/api/greenpoints/leaderboard")]
pub async fn leaderboard(state: web::Data<AppState>, _auth: AuthUser) -> Result<HttpResponse, ApiError> {
    let board = rewards::leaderboard(state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(board))
}
