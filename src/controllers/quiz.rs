use std::collections::BTreeMap;

use actix_web::{get, post, web, HttpResponse};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;
use serde::Deserialize;
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::QuizAttempt;
use crate::quiz::questions;
use crate::rewards;
use crate::AppState;

#[get("/api/quiz/stats")]
pub async fn quiz_stats(state: web::Data<AppState>, auth: AuthUser) -> Result<HttpResponse, ApiError> {
    let attempts = state.store.quiz_attempts_for(&auth.user_id).await?;

    let total = attempts.len();
    let average = if total == 0 {
        0.0
    } else {
        attempts.iter().map(|a| a.score).sum::<f64>() / total as f64
    };
    let best = attempts.iter().map(|a| a.score).fold(0.0, f64::max);
    let points: i64 = attempts.iter().map(|a| a.points_earned).sum();
    let mut by_type = BTreeMap::new();
    for attempt in &attempts {
        *by_type.entry(attempt.quiz_type.as_str()).or_insert(0usize) += 1;
    }

    Ok(HttpResponse::Ok().json(json!({
        "totalQuizzes": total,
        "averageScore": average,
        "bestScore": best,
        "totalPointsEarned": points,
        "byType": by_type,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizData {
    quiz_type: String,
    score: f64,
    correct_answers: i32,
    total_questions: i32,
}

#[post("/api/quiz/submit")]
pub async fn submit_quiz(
    state: web::Data<AppState>,
    auth: AuthUser,
    data: web::Json<SubmitQuizData>,
) -> Result<HttpResponse, ApiError> {
    let data = data.into_inner();
    let quiz_type = data.quiz_type.trim().to_ascii_lowercase();
    if questions(&quiz_type).is_none() {
        return Err(ApiError::Validation(format!("Unknown quiz type: {}", data.quiz_type)));
    }
    if !(0.0..=100.0).contains(&data.score) {
        return Err(ApiError::Validation("Score must be between 0 and 100".to_string()));
    }
    if data.total_questions <= 0 || !(0..=data.total_questions).contains(&data.correct_answers) {
        return Err(ApiError::Validation("Invalid answer counts".to_string()));
    }

    let points_earned = rewards::quiz_points(data.score);
    let attempt = QuizAttempt {
        id: ObjectId::new(),
        user_id: auth.user_id,
        quiz_type,
        score: data.score,
        correct_answers: data.correct_answers,
        total_questions: data.total_questions,
        points_earned,
        completed_at: DateTime::now(),
    };
    state
        .store
        .add_green_points(&auth.user_id, points_earned)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    if let Err(e) = state.store.insert_quiz_attempt(&attempt).await {
        if let Err(undo) = state.store.add_green_points(&auth.user_id, -points_earned).await {
            log::error!("Could not take back {points_earned} points from {}: {undo}", auth.user_id);
        }
        return Err(e.into());
    }
    let user = state
        .store
        .find_user(&auth.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    let points = rewards::points_for(state.store.as_ref(), &user).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Quiz submitted successfully",
        "pointsEarned": points_earned,
        "greenPoints": points.total_points,
    })))
}

#[get("/api/quiz/{quiz_type}")]
pub async fn quiz_questions(
    _auth: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let quiz_type = path.into_inner().to_ascii_lowercase();
    let set = questions(&quiz_type).ok_or(ApiError::NotFound("Quiz"))?;
    Ok(HttpResponse::Ok().json(json!({
        "quizType": quiz_type,
        "questions": set,
    })))
}
