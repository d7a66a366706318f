//! Renting equipment and buying byproducts. A successful call takes the
//! listing off the market; no purchase ledger is kept, so the purchase
//! history is always empty.

use actix_web::{get, post, web, HttpResponse};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{ListingKind, ListingResponse};
use crate::AppState;

async fn take(state: &AppState, kind: ListingKind, auth: &AuthUser, id: &str) -> Result<ListingResponse, ApiError> {
    let id = ObjectId::parse_str(id.trim()).map_err(|_| ApiError::NotFound(kind.label()))?;
    let listing = state
        .store
        .take_listing(kind, &id, &auth.user_id)
        .await?
        .ok_or(ApiError::NotFound(kind.label()))?;
    log::info!("{} {} taken by {}", kind.label(), listing.id, auth.user_id);
    Ok(ListingResponse::from(&listing))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentEquipmentData {
    equipment_id: String,
}

#[post("/api/purchases/equipment")]
pub async fn rent_equipment(
    state: web::Data<AppState>,
    auth: AuthUser,
    data: web::Json<RentEquipmentData>,
) -> Result<HttpResponse, ApiError> {
    let equipment = take(&state, ListingKind::Equipment, &auth, &data.equipment_id).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "Equipment rented successfully",
        "equipment": equipment,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyByproductData {
    byproduct_id: String,
}

#[post("/api/purchases/byproduct")]
pub async fn buy_byproduct(
    state: web::Data<AppState>,
    auth: AuthUser,
    data: web::Json<BuyByproductData>,
) -> Result<HttpResponse, ApiError> {
    let byproduct = take(&state, ListingKind::ByProduct, &auth, &data.byproduct_id).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "ByProduct purchased successfully",
        "byproduct": byproduct,
    })))
}

#[get("/api/purchases")]
pub async fn purchases(_auth: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(Vec::<ListingResponse>::new())
}
