use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

fn default_theme() -> String {
    "light".to_string()
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    pub password: String,
    pub location: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub green_points: i64,
    pub created_at: DateTime,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String, location: String) -> Self {
        Self {
            id: ObjectId::new(),
            username,
            email,
            password: password_hash,
            location,
            mobile: String::new(),
            theme: default_theme(),
            green_points: 0,
            created_at: DateTime::now(),
        }
    }
}

/// Which of the two listing collections a listing lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingKind {
    Equipment,
    ByProduct,
}

impl ListingKind {
    pub fn collection(self) -> &'static str {
        match self {
            ListingKind::Equipment => "equipment",
            ListingKind::ByProduct => "byproducts",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ListingKind::Equipment => "Equipment",
            ListingKind::ByProduct => "ByProduct",
        }
    }
}

/// An equipment or byproduct listing. Byproducts carry a `quantity`,
/// equipment never does.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub owner_id: ObjectId,
    pub owner_name: String,
    #[serde(default = "default_available")]
    pub is_available: bool,
    pub created_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub badge_id: String,
    pub earned_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub quiz_type: String,
    pub score: f64,
    pub correct_answers: i32,
    pub total_questions: i32,
    pub points_earned: i64,
    pub completed_at: DateTime,
}

/// Partial profile update. `None` fields are left untouched.
#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub mobile: Option<String>,
    pub theme: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.mobile.is_none() && self.theme.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JWTClaim {
    pub user_id: String,
    pub username: String,
    pub iat: usize,
    pub exp: usize,
}

// What the API hands out. Ids become hex strings and the password hash
// never leaves the server.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub location: String,
    pub mobile: String,
    pub theme: String,
    pub green_points: i64,
    pub created_at: ChronoDateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_hex(),
            username: user.username.clone(),
            email: user.email.clone(),
            location: user.location.clone(),
            mobile: user.mobile.clone(),
            theme: user.theme.clone(),
            green_points: user.green_points,
            created_at: user.created_at.to_chrono(),
        }
    }
}

/// The short user summary returned next to a freshly issued token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub location: String,
    pub mobile: String,
    pub theme: String,
    pub green_points: i64,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_hex(),
            username: user.username.clone(),
            email: user.email.clone(),
            location: user.location.clone(),
            mobile: user.mobile.clone(),
            theme: user.theme.clone(),
            green_points: user.green_points,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub owner_id: String,
    pub owner_name: String,
    pub is_available: bool,
    pub created_at: ChronoDateTime<Utc>,
}

impl From<&Listing> for ListingResponse {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id.to_hex(),
            name: listing.name.clone(),
            description: listing.description.clone(),
            price: listing.price,
            quantity: listing.quantity.clone(),
            location: listing.location.clone(),
            image: listing.image.clone(),
            owner_id: listing.owner_id.to_hex(),
            owner_name: listing.owner_name.clone(),
            is_available: listing.is_available,
            created_at: listing.created_at.to_chrono(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeResponse {
    pub badge_id: String,
    pub earned_at: ChronoDateTime<Utc>,
}

impl From<&Badge> for BadgeResponse {
    fn from(badge: &Badge) -> Self {
        Self {
            badge_id: badge.badge_id.clone(),
            earned_at: badge.earned_at.to_chrono(),
        }
    }
}
