use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use log::{info, warn};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::ErrorKind::{
    Command, ConnectionPoolCleared, DnsResolve, Io, ServerSelection, Write,
};
use mongodb::error::WriteFailure;
use mongodb::options::{
    ClientOptions, FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument,
};
use mongodb::{Client, Collection, Database, IndexModel};
use tokio::sync::OnceCell;

use super::{Store, StoreError, StoreResult};
use crate::models::{Badge, Listing, ListingKind, ProfileUpdate, QuizAttempt, User};

const MONGOCOLLECTIONUSERS: &str = "users";
const MONGOCOLLECTIONBADGES: &str = "badges";
const MONGOCOLLECTIONQUIZ: &str = "quiz_attempts";
const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

/// True when the server could not be reached at all, as opposed to the
/// server refusing the operation.
pub(super) fn is_unreachable(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ServerSelection { .. } | Io(_) | ConnectionPoolCleared { .. } | DnsResolve { .. }
    )
}

fn classify(err: mongodb::error::Error) -> StoreError {
    if is_duplicate_key(&err) {
        StoreError::Duplicate
    } else {
        StoreError::Backend(err)
    }
}

fn newest_first() -> FindOptions {
    FindOptions::builder().sort(doc! { "createdAt": -1 }).build()
}

fn return_updated() -> FindOneAndUpdateOptions {
    FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build()
}

pub struct MongoStore {
    client: Client,
    db: Database,
    indexes: OnceCell<()>,
}

impl MongoStore {
    /// Builds the client. The driver connects lazily, so this succeeds even
    /// when the server is down; the health check reports it.
    pub async fn connect(uri: &str, database: &str) -> StoreResult<Self> {
        let mut client_options = ClientOptions::parse(uri).await?;
        client_options.app_name = Some("KhetSathi".to_string());
        client_options
            .server_selection_timeout
            .get_or_insert(Duration::from_secs(10));
        let client = Client::with_options(client_options)?;
        let db = client.database(database);
        Ok(Self {
            client,
            db,
            indexes: OnceCell::new(),
        })
    }

    /// Creates the unique indexes the store relies on for duplicate detection.
    ///
    /// Succeeds at most once; a failed attempt is retried on the next call.
    /// Writes that depend on uniqueness call this first, so they fail rather
    /// than go through unchecked while the indexes are missing.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        self.indexes.get_or_try_init(|| self.create_indexes()).await?;
        Ok(())
    }

    async fn create_indexes(&self) -> StoreResult<()> {
        let unique = || IndexOptions::builder().unique(true).build();

        let users = self.users();
        users
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "username": 1 })
                    .options(unique())
                    .build(),
                None,
            )
            .await?;
        users
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique())
                    .build(),
                None,
            )
            .await?;
        self.badges()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "userId": 1, "badgeId": 1 })
                    .options(unique())
                    .build(),
                None,
            )
            .await?;
        for kind in [ListingKind::Equipment, ListingKind::ByProduct] {
            self.listings(kind)
                .create_index(IndexModel::builder().keys(doc! { "ownerId": 1 }).build(), None)
                .await?;
        }
        self.quiz_attempts()
            .create_index(IndexModel::builder().keys(doc! { "userId": 1 }).build(), None)
            .await?;

        info!("MongoDB indexes in place");
        Ok(())
    }

    fn users(&self) -> Collection<User> {
        self.db.collection::<User>(MONGOCOLLECTIONUSERS)
    }

    fn listings(&self, kind: ListingKind) -> Collection<Listing> {
        self.db.collection::<Listing>(kind.collection())
    }

    fn badges(&self) -> Collection<Badge> {
        self.db.collection::<Badge>(MONGOCOLLECTIONBADGES)
    }

    fn quiz_attempts(&self) -> Collection<QuizAttempt> {
        self.db.collection::<QuizAttempt>(MONGOCOLLECTIONQUIZ)
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn ping(&self) -> StoreResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        self.ensure_indexes().await?;
        self.users().insert_one(user, None).await.map_err(classify)?;
        Ok(())
    }

    async fn find_user(&self, id: &ObjectId) -> StoreResult<Option<User>> {
        Ok(self.users().find_one(doc! { "_id": *id }, None).await?)
    }

    async fn find_user_by_login(&self, login: &str) -> StoreResult<Option<User>> {
        let filter = doc! { "$or": [ { "email": login }, { "username": login } ] };
        Ok(self.users().find_one(filter, None).await?)
    }

    async fn update_profile(&self, id: &ObjectId, update: &ProfileUpdate) -> StoreResult<Option<User>> {
        if update.is_empty() {
            return self.find_user(id).await;
        }
        if update.username.is_some() {
            self.ensure_indexes().await?;
        }
        let mut set = Document::new();
        if let Some(username) = &update.username {
            set.insert("username", username.as_str());
        }
        if let Some(mobile) = &update.mobile {
            set.insert("mobile", mobile.as_str());
        }
        if let Some(theme) = &update.theme {
            set.insert("theme", theme.as_str());
        }
        self.users()
            .find_one_and_update(doc! { "_id": *id }, doc! { "$set": set }, return_updated())
            .await
            .map_err(classify)
    }

    async fn set_password(&self, id: &ObjectId, password_hash: &str) -> StoreResult<bool> {
        let result = self
            .users()
            .update_one(
                doc! { "_id": *id },
                doc! { "$set": { "password": password_hash } },
                None,
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn add_green_points(&self, id: &ObjectId, delta: i64) -> StoreResult<Option<i64>> {
        let user = self
            .users()
            .find_one_and_update(
                doc! { "_id": *id },
                doc! { "$inc": { "greenPoints": delta } },
                return_updated(),
            )
            .await?;
        Ok(user.map(|u| u.green_points))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let cursor = self.users().find(None, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_listing(&self, kind: ListingKind, listing: &Listing) -> StoreResult<()> {
        let result = self.listings(kind).insert_one(listing, None).await?;
        info!("New {} listing inserted with id {}", kind.label(), result.inserted_id);
        Ok(())
    }

    async fn available_listings(&self, kind: ListingKind, viewer: &ObjectId) -> StoreResult<Vec<Listing>> {
        let filter = doc! { "ownerId": { "$ne": *viewer }, "isAvailable": true };
        let cursor = self.listings(kind).find(filter, newest_first()).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn listings_by_owner(&self, kind: ListingKind, owner: &ObjectId) -> StoreResult<Vec<Listing>> {
        let cursor = self
            .listings(kind)
            .find(doc! { "ownerId": *owner }, newest_first())
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count_listings(&self, kind: ListingKind, owner: &ObjectId) -> StoreResult<u64> {
        Ok(self
            .listings(kind)
            .count_documents(doc! { "ownerId": *owner }, None)
            .await?)
    }

    async fn listing_counts(&self, kind: ListingKind) -> StoreResult<HashMap<ObjectId, u64>> {
        let pipeline = vec![doc! { "$group": { "_id": "$ownerId", "count": { "$sum": 1 } } }];
        let mut cursor = self.listings(kind).aggregate(pipeline, None).await?;
        let mut counts = HashMap::new();
        while let Some(row) = cursor.try_next().await? {
            let Ok(owner) = row.get_object_id("_id") else {
                warn!("Skipping {} listings with a malformed owner", kind.label());
                continue;
            };
            let count = match row.get("count") {
                Some(Bson::Int32(n)) => u64::try_from(*n).unwrap_or(0),
                Some(Bson::Int64(n)) => u64::try_from(*n).unwrap_or(0),
                _ => 0,
            };
            counts.insert(owner, count);
        }
        Ok(counts)
    }

    async fn delete_listing(&self, kind: ListingKind, id: &ObjectId, owner: &ObjectId) -> StoreResult<bool> {
        let result = self
            .listings(kind)
            .delete_one(doc! { "_id": *id, "ownerId": *owner }, None)
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn take_listing(&self, kind: ListingKind, id: &ObjectId, renter: &ObjectId) -> StoreResult<Option<Listing>> {
        let filter = doc! { "_id": *id, "isAvailable": true, "ownerId": { "$ne": *renter } };
        Ok(self
            .listings(kind)
            .find_one_and_update(filter, doc! { "$set": { "isAvailable": false } }, return_updated())
            .await?)
    }

    async fn insert_badge(&self, badge: &Badge) -> StoreResult<()> {
        self.ensure_indexes().await?;
        self.badges().insert_one(badge, None).await.map_err(classify)?;
        Ok(())
    }

    async fn badges_for(&self, user: &ObjectId) -> StoreResult<Vec<Badge>> {
        let options = FindOptions::builder().sort(doc! { "earnedAt": 1 }).build();
        let cursor = self.badges().find(doc! { "userId": *user }, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_quiz_attempt(&self, attempt: &QuizAttempt) -> StoreResult<()> {
        self.quiz_attempts().insert_one(attempt, None).await?;
        Ok(())
    }

    async fn quiz_attempts_for(&self, user: &ObjectId) -> StoreResult<Vec<QuizAttempt>> {
        let cursor = self
            .quiz_attempts()
            .find(doc! { "userId": *user }, None)
            .await?;
        Ok(cursor.try_collect().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::DateTime;

    // Nothing listens on port 1, so every operation fails server selection.
    const DEAD_URI: &str = "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200";

    #[actix_rt::test]
    async fn unreachable_server_is_reported_as_such() {
        let store = MongoStore::connect(DEAD_URI, "khetsathi_test").await.unwrap();
        let err = store.ensure_indexes().await.unwrap_err();
        assert!(err.is_unreachable(), "{err}");
    }

    #[actix_rt::test]
    async fn failed_index_build_is_retried_and_blocks_badge_writes() {
        let store = MongoStore::connect(DEAD_URI, "khetsathi_test").await.unwrap();
        assert!(store.ensure_indexes().await.is_err());
        assert!(store.indexes.get().is_none());

        let badge = Badge {
            id: ObjectId::new(),
            user_id: ObjectId::new(),
            badge_id: "first-listing".to_string(),
            earned_at: DateTime::now(),
        };
        let err = store.insert_badge(&badge).await.unwrap_err();
        assert!(err.is_unreachable(), "{err}");
        assert!(store.indexes.get().is_none());
    }
}
