//! Persistence seam.
//!
//! Handlers talk to a `dyn Store`; `MongoStore` backs the running server and
//! `MemoryStore` stands in for it in tests. Both enforce uniqueness of
//! usernames, emails and `(user, badge)` pairs atomically, so callers never
//! check before they insert.

use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::models::{Badge, Listing, ListingKind, ProfileUpdate, QuizAttempt, User};

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("duplicate key")]
    Duplicate,

    #[error("database error: {0}")]
    Backend(#[from] mongodb::error::Error),
}

impl StoreError {
    /// The backend could not be reached. Anything else means it answered
    /// and refused.
    pub fn is_unreachable(&self) -> bool {
        match self {
            StoreError::Backend(e) => mongo::is_unreachable(e),
            StoreError::Duplicate => false,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    /// Round-trips to the backend; used by the health check.
    async fn ping(&self) -> StoreResult<()>;

    /// Fails with `StoreError::Duplicate` when the username or email is taken.
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    async fn find_user(&self, id: &ObjectId) -> StoreResult<Option<User>>;

    /// Looks a user up by username or by email.
    async fn find_user_by_login(&self, login: &str) -> StoreResult<Option<User>>;

    /// Applies the update and returns the updated user. Fails with
    /// `StoreError::Duplicate` when the new username belongs to someone else.
    async fn update_profile(&self, id: &ObjectId, update: &ProfileUpdate) -> StoreResult<Option<User>>;

    /// Returns false when no such user exists.
    async fn set_password(&self, id: &ObjectId, password_hash: &str) -> StoreResult<bool>;

    /// Atomically adds `delta` to the user's counter and returns the new value.
    async fn add_green_points(&self, id: &ObjectId, delta: i64) -> StoreResult<Option<i64>>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn insert_listing(&self, kind: ListingKind, listing: &Listing) -> StoreResult<()>;

    /// Available listings not owned by `viewer`, newest first.
    async fn available_listings(&self, kind: ListingKind, viewer: &ObjectId) -> StoreResult<Vec<Listing>>;

    /// Listings owned by `owner`, newest first.
    async fn listings_by_owner(&self, kind: ListingKind, owner: &ObjectId) -> StoreResult<Vec<Listing>>;

    async fn count_listings(&self, kind: ListingKind, owner: &ObjectId) -> StoreResult<u64>;

    /// Listing count per owner, for every owner with at least one listing.
    async fn listing_counts(&self, kind: ListingKind) -> StoreResult<HashMap<ObjectId, u64>>;

    /// Deletes the listing only if `owner` owns it. Returns whether it was deleted.
    async fn delete_listing(&self, kind: ListingKind, id: &ObjectId, owner: &ObjectId) -> StoreResult<bool>;

    /// Flips an available listing not owned by `renter` to unavailable in a
    /// single conditional update. Returns the updated listing, or `None` when
    /// the listing is missing, taken or the renter's own.
    async fn take_listing(&self, kind: ListingKind, id: &ObjectId, renter: &ObjectId) -> StoreResult<Option<Listing>>;

    /// Fails with `StoreError::Duplicate` when the user already holds the badge.
    async fn insert_badge(&self, badge: &Badge) -> StoreResult<()>;

    async fn badges_for(&self, user: &ObjectId) -> StoreResult<Vec<Badge>>;

    async fn insert_quiz_attempt(&self, attempt: &QuizAttempt) -> StoreResult<()>;

    async fn quiz_attempts_for(&self, user: &ObjectId) -> StoreResult<Vec<QuizAttempt>>;
}
