use actix_web::{get, post, put, web, HttpResponse};
use log::info;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{
    hash_password, issue_token, validate_password, verify_password, AuthError, AuthUser,
};
use crate::error::ApiError;
use crate::models::{ProfileUpdate, SessionUser, User, UserProfile};
use crate::store::StoreError;
use crate::AppState;

fn required(value: &str, field: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
pub struct SignupData {
    username: String,
    email: String,
    password: String,
    location: String,
}

//signup
#[post("/api/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    data: web::Json<SignupData>,
) -> Result<HttpResponse, ApiError> {
    let SignupData {
        username,
        email,
        password,
        location,
    } = data.into_inner();
    let username = required(&username, "Username")?;
    let email = required(&email, "Email")?;
    let location = required(&location, "Location")?;
    validate_password(&password)?;

    let password_hash = web::block(move || hash_password(&password)).await??;
    let user = User::new(username, email, password_hash, location);

    state.store.insert_user(&user).await.map_err(|e| match e {
        StoreError::Duplicate => {
            ApiError::Validation("User with this email or username already exists".to_string())
        }
        other => other.into(),
    })?;
    info!("New user created with id {}", user.id);

    let token = issue_token(&user, &state.config.jwt_secret, state.config.token_ttl_hours)?;
    Ok(HttpResponse::Created().json(json!({
        "message": "User created successfully",
        "token": token,
        "user": SessionUser::from(&user),
    })))
}

#[derive(Deserialize)]
pub struct LoginData {
    username: String,
    password: String,
}

//login, by username or email
#[post("/api/login")]
pub async fn login(
    state: web::Data<AppState>,
    data: web::Json<LoginData>,
) -> Result<HttpResponse, ApiError> {
    let LoginData { username, password } = data.into_inner();
    let user = state
        .store
        .find_user_by_login(username.trim())
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let hash = user.password.clone();
    web::block(move || verify_password(&password, &hash)).await??;

    let token = issue_token(&user, &state.config.jwt_secret, state.config.token_ttl_hours)?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Login successful",
        "token": token,
        "user": SessionUser::from(&user),
    })))
}

#[get("/api/user")]
pub async fn get_user(state: web::Data<AppState>, auth: AuthUser) -> Result<HttpResponse, ApiError> {
    let user = state
        .store
        .find_user(&auth.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(HttpResponse::Ok().json(UserProfile::from(&user)))
}

#[derive(Deserialize)]
pub struct UpdateProfileData {
    username: Option<String>,
    mobile: Option<String>,
    theme: Option<String>,
}

#[put("/api/user")]
pub async fn update_user(
    state: web::Data<AppState>,
    auth: AuthUser,
    data: web::Json<UpdateProfileData>,
) -> Result<HttpResponse, ApiError> {
    let data = data.into_inner();
    let update = ProfileUpdate {
        username: present(data.username),
        mobile: present(data.mobile),
        theme: present(data.theme),
    };

    let user = state
        .store
        .update_profile(&auth.user_id, &update)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate => ApiError::Validation("Username already taken".to_string()),
            other => other.into(),
        })?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Profile updated successfully",
        "user": UserProfile::from(&user),
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordData {
    current_password: String,
    new_password: String,
}

#[put("/api/user/password")]
pub async fn change_password(
    state: web::Data<AppState>,
    auth: AuthUser,
    data: web::Json<ChangePasswordData>,
) -> Result<HttpResponse, ApiError> {
    let ChangePasswordData {
        current_password,
        new_password,
    } = data.into_inner();
    let user = state
        .store
        .find_user(&auth.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let hash = user.password.clone();
    web::block(move || verify_password(&current_password, &hash))
        .await?
        .map_err(|_| ApiError::Validation("Current password is incorrect".to_string()))?;
    validate_password(&new_password)?;

    let new_hash = web::block(move || hash_password(&new_password)).await??;
    if !state.store.set_password(&user.id, &new_hash).await? {
        return Err(ApiError::NotFound("User"));
    }
    info!("Password changed for user {}", user.id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Password updated successfully" })))
}
