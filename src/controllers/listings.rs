use actix_web::{delete, get, post, web, HttpResponse};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;
use serde::Deserialize;
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{Listing, ListingKind, ListingResponse};
use crate::rewards;
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateListingData {
    name: String,
    description: String,
    price: f64,
    location: String,
    image: Option<String>,
    quantity: Option<String>,
}

fn non_empty(value: &str, field: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn responses(listings: &[Listing]) -> Vec<ListingResponse> {
    listings.iter().map(ListingResponse::from).collect()
}

fn json_key(kind: ListingKind) -> &'static str {
    match kind {
        ListingKind::Equipment => "equipment",
        ListingKind::ByProduct => "byproduct",
    }
}

async fn browse(state: &AppState, kind: ListingKind, auth: &AuthUser) -> Result<HttpResponse, ApiError> {
    let listings = state.store.available_listings(kind, &auth.user_id).await?;
    Ok(HttpResponse::Ok().json(responses(&listings)))
}

async fn owned(state: &AppState, kind: ListingKind, auth: &AuthUser) -> Result<HttpResponse, ApiError> {
    let listings = state.store.listings_by_owner(kind, &auth.user_id).await?;
    Ok(HttpResponse::Ok().json(responses(&listings)))
}

async fn create(
    state: &AppState,
    kind: ListingKind,
    auth: &AuthUser,
    data: CreateListingData,
) -> Result<HttpResponse, ApiError> {
    if !data.price.is_finite() || data.price < 0.0 {
        return Err(ApiError::Validation("Price must be a non-negative number".to_string()));
    }
    let quantity = match kind {
        ListingKind::ByProduct => Some(non_empty(data.quantity.as_deref().unwrap_or(""), "Quantity")?),
        ListingKind::Equipment => None,
    };

    let owner = state
        .store
        .find_user(&auth.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let listing = Listing {
        id: ObjectId::new(),
        name: non_empty(&data.name, "Name")?,
        description: non_empty(&data.description, "Description")?,
        price: data.price,
        quantity,
        location: non_empty(&data.location, "Location")?,
        image: data.image.filter(|i| !i.trim().is_empty()),
        owner_id: owner.id,
        owner_name: owner.username.clone(),
        is_available: true,
        created_at: DateTime::now(),
    };
    state.store.insert_listing(kind, &listing).await?;

    let points = rewards::points_for(state.store.as_ref(), &owner).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": format!("{} listed successfully", kind.label()),
        json_key(kind): ListingResponse::from(&listing),
        "greenPoints": points.total_points,
    })))
}

async fn remove(state: &AppState, kind: ListingKind, auth: &AuthUser, id: &str) -> Result<HttpResponse, ApiError> {
    let id = ObjectId::parse_str(id).map_err(|_| ApiError::NotFound(kind.label()))?;
    if !state.store.delete_listing(kind, &id, &auth.user_id).await? {
        return Err(ApiError::NotFound(kind.label()));
    }
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("{} listing deleted successfully", kind.label())
    })))
}

//equipment
#[get("/api/equipment")]
pub async fn equipment(state: web::Data<AppState>, auth: AuthUser) -> Result<HttpResponse, ApiError> {
    browse(&state, ListingKind::Equipment, &auth).await
}

#[post("/api/equipment")]
pub async fn create_equipment(
    state: web::Data<AppState>,
    auth: AuthUser,
    data: web::Json<CreateListingData>,
) -> Result<HttpResponse, ApiError> {
    create(&state, ListingKind::Equipment, &auth, data.into_inner()).await
}

#[get("/api/my-equipment")]
pub async fn my_equipment(state: web::Data<AppState>, auth: AuthUser) -> Result<HttpResponse, ApiError> {
    owned(&state, ListingKind::Equipment, &auth).await
}

#[delete("/api/equipment/{id}")]
pub async fn delete_equipment(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    remove(&state, ListingKind::Equipment, &auth, &path).await
}

//byproducts
#[get("/api/byproducts")]
pub async fn byproducts(state: web::Data<AppState>, auth: AuthUser) -> Result<HttpResponse, ApiError> {
    browse(&state, ListingKind::ByProduct, &auth).await
}

#[post("/api/byproducts")]
pub async fn create_byproduct(
    state: web::Data<AppState>,
    auth: AuthUser,
    data: web::Json<CreateListingData>,
) -> Result<HttpResponse, ApiError> {
    create(&state, ListingKind::ByProduct, &auth, data.into_inner()).await
}

#[get("/api/my-byproducts")]
pub async fn my_byproducts(state: web::Data<AppState>, auth: AuthUser) -> Result<HttpResponse, ApiError> {
    owned(&state, ListingKind::ByProduct, &auth).await
}

#[delete("/api/byproducts/{id}")]
pub async fn delete_byproduct(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    remove(&state, ListingKind::ByProduct, &auth, &path).await
}
