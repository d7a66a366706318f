use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::Mutex;

use super::{Store, StoreError, StoreResult};
use crate::models::{Badge, Listing, ListingKind, ProfileUpdate, QuizAttempt, User};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    equipment: Vec<Listing>,
    byproducts: Vec<Listing>,
    badges: Vec<Badge>,
    quiz_attempts: Vec<QuizAttempt>,
}

impl Collections {
    fn listings(&self, kind: ListingKind) -> &Vec<Listing> {
        match kind {
            ListingKind::Equipment => &self.equipment,
            ListingKind::ByProduct => &self.byproducts,
        }
    }

    fn listings_mut(&mut self, kind: ListingKind) -> &mut Vec<Listing> {
        match kind {
            ListingKind::Equipment => &mut self.equipment,
            ListingKind::ByProduct => &mut self.byproducts,
        }
    }

    fn user_mut(&mut self, id: &ObjectId) -> Option<&mut User> {
        self.users.iter_mut().find(|u| &u.id == id)
    }
}

/// In-process store. Every operation runs under one lock, which is what makes
/// the uniqueness checks atomic.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut listings: Vec<Listing>) -> Vec<Listing> {
    listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    listings
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut db = self.inner.lock().await;
        if db
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(StoreError::Duplicate);
        }
        db.users.push(user.clone());
        Ok(())
    }

    async fn find_user(&self, id: &ObjectId) -> StoreResult<Option<User>> {
        let db = self.inner.lock().await;
        Ok(db.users.iter().find(|u| &u.id == id).cloned())
    }

    async fn find_user_by_login(&self, login: &str) -> StoreResult<Option<User>> {
        let db = self.inner.lock().await;
        Ok(db
            .users
            .iter()
            .find(|u| u.username == login || u.email == login)
            .cloned())
    }

    async fn update_profile(&self, id: &ObjectId, update: &ProfileUpdate) -> StoreResult<Option<User>> {
        let mut db = self.inner.lock().await;
        if let Some(username) = &update.username {
            if db.users.iter().any(|u| &u.username == username && &u.id != id) {
                return Err(StoreError::Duplicate);
            }
        }
        let Some(user) = db.user_mut(id) else {
            return Ok(None);
        };
        if let Some(username) = &update.username {
            user.username = username.clone();
        }
        if let Some(mobile) = &update.mobile {
            user.mobile = mobile.clone();
        }
        if let Some(theme) = &update.theme {
            user.theme = theme.clone();
        }
        Ok(Some(user.clone()))
    }

    async fn set_password(&self, id: &ObjectId, password_hash: &str) -> StoreResult<bool> {
        let mut db = self.inner.lock().await;
        Ok(match db.user_mut(id) {
            Some(user) => {
                user.password = password_hash.to_string();
                true
            }
            None => false,
        })
    }

    async fn add_green_points(&self, id: &ObjectId, delta: i64) -> StoreResult<Option<i64>> {
        let mut db = self.inner.lock().await;
        Ok(db.user_mut(id).map(|user| {
            user.green_points += delta;
            user.green_points
        }))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.inner.lock().await.users.clone())
    }

    async fn insert_listing(&self, kind: ListingKind, listing: &Listing) -> StoreResult<()> {
        let mut db = self.inner.lock().await;
        db.listings_mut(kind).push(listing.clone());
        Ok(())
    }

    async fn available_listings(&self, kind: ListingKind, viewer: &ObjectId) -> StoreResult<Vec<Listing>> {
        let db = self.inner.lock().await;
        let listings = db
            .listings(kind)
            .iter()
            .filter(|l| l.is_available && &l.owner_id != viewer)
            .cloned()
            .collect();
        Ok(newest_first(listings))
    }

    async fn listings_by_owner(&self, kind: ListingKind, owner: &ObjectId) -> StoreResult<Vec<Listing>> {
        let db = self.inner.lock().await;
        let listings = db
            .listings(kind)
            .iter()
            .filter(|l| &l.owner_id == owner)
            .cloned()
            .collect();
        Ok(newest_first(listings))
    }

    async fn count_listings(&self, kind: ListingKind, owner: &ObjectId) -> StoreResult<u64> {
        let db = self.inner.lock().await;
        Ok(db.listings(kind).iter().filter(|l| &l.owner_id == owner).count() as u64)
    }

    async fn listing_counts(&self, kind: ListingKind) -> StoreResult<HashMap<ObjectId, u64>> {
        let db = self.inner.lock().await;
        let mut counts = HashMap::new();
        for listing in db.listings(kind) {
            *counts.entry(listing.owner_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn delete_listing(&self, kind: ListingKind, id: &ObjectId, owner: &ObjectId) -> StoreResult<bool> {
        let mut db = self.inner.lock().await;
        let listings = db.listings_mut(kind);
        let before = listings.len();
        listings.retain(|l| !(&l.id == id && &l.owner_id == owner));
        Ok(listings.len() < before)
    }

    async fn take_listing(&self, kind: ListingKind, id: &ObjectId, renter: &ObjectId) -> StoreResult<Option<Listing>> {
        let mut db = self.inner.lock().await;
        Ok(db
            .listings_mut(kind)
            .iter_mut()
            .find(|l| &l.id == id && l.is_available && &l.owner_id != renter)
            .map(|listing| {
                listing.is_available = false;
                listing.clone()
            }))
    }

    async fn insert_badge(&self, badge: &Badge) -> StoreResult<()> {
        let mut db = self.inner.lock().await;
        if db
            .badges
            .iter()
            .any(|b| b.user_id == badge.user_id && b.badge_id == badge.badge_id)
        {
            return Err(StoreError::Duplicate);
        }
        db.badges.push(badge.clone());
        Ok(())
    }

    async fn badges_for(&self, user: &ObjectId) -> StoreResult<Vec<Badge>> {
        let db = self.inner.lock().await;
        Ok(db.badges.iter().filter(|b| &b.user_id == user).cloned().collect())
    }

    async fn insert_quiz_attempt(&self, attempt: &QuizAttempt) -> StoreResult<()> {
        self.inner.lock().await.quiz_attempts.push(attempt.clone());
        Ok(())
    }

    async fn quiz_attempts_for(&self, user: &ObjectId) -> StoreResult<Vec<QuizAttempt>> {
        let db = self.inner.lock().await;
        Ok(db
            .quiz_attempts
            .iter()
            .filter(|a| &a.user_id == user)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::DateTime;

    fn user(name: &str) -> User {
        User::new(
            name.to_string(),
            format!("{name}@example.com"),
            "hash".to_string(),
            "Pune".to_string(),
        )
    }

    fn listing(owner: &User) -> Listing {
        Listing {
            id: ObjectId::new(),
            name: "Tractor".to_string(),
            description: "45 HP".to_string(),
            price: 1200.0,
            quantity: None,
            location: "Pune".to_string(),
            image: None,
            owner_id: owner.id,
            owner_name: owner.username.clone(),
            is_available: true,
            created_at: DateTime::now(),
        }
    }

    #[actix_rt::test]
    async fn rejects_taken_username_or_email() {
        let store = MemoryStore::new();
        store.insert_user(&user("ravi")).await.unwrap();

        let same_name = User::new("ravi".into(), "other@example.com".into(), "h".into(), "x".into());
        assert!(matches!(store.insert_user(&same_name).await, Err(StoreError::Duplicate)));

        let same_email = User::new("other".into(), "ravi@example.com".into(), "h".into(), "x".into());
        assert!(matches!(store.insert_user(&same_email).await, Err(StoreError::Duplicate)));
    }

    #[actix_rt::test]
    async fn renaming_onto_another_user_is_a_duplicate() {
        let store = MemoryStore::new();
        let ravi = user("ravi");
        store.insert_user(&ravi).await.unwrap();
        store.insert_user(&user("meena")).await.unwrap();

        let update = ProfileUpdate {
            username: Some("meena".to_string()),
            ..ProfileUpdate::default()
        };
        assert!(matches!(
            store.update_profile(&ravi.id, &update).await,
            Err(StoreError::Duplicate)
        ));

        let keep_own = ProfileUpdate {
            username: Some("ravi".to_string()),
            theme: Some("dark".to_string()),
            ..ProfileUpdate::default()
        };
        let updated = store.update_profile(&ravi.id, &keep_own).await.unwrap().unwrap();
        assert_eq!(updated.theme, "dark");
    }

    #[actix_rt::test]
    async fn listing_can_only_be_taken_once_and_not_by_owner() {
        let store = MemoryStore::new();
        let owner = user("owner");
        let renter = user("renter");
        let tractor = listing(&owner);
        store.insert_listing(ListingKind::Equipment, &tractor).await.unwrap();

        let own = store.take_listing(ListingKind::Equipment, &tractor.id, &owner.id).await.unwrap();
        assert!(own.is_none());

        let first = store.take_listing(ListingKind::Equipment, &tractor.id, &renter.id).await.unwrap();
        assert!(first.is_some_and(|l| !l.is_available));

        let second = store.take_listing(ListingKind::Equipment, &tractor.id, &renter.id).await.unwrap();
        assert!(second.is_none());
        assert!(store
            .available_listings(ListingKind::Equipment, &renter.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[actix_rt::test]
    async fn delete_requires_ownership() {
        let store = MemoryStore::new();
        let owner = user("owner");
        let stranger = user("stranger");
        let tractor = listing(&owner);
        store.insert_listing(ListingKind::Equipment, &tractor).await.unwrap();

        assert!(!store.delete_listing(ListingKind::Equipment, &tractor.id, &stranger.id).await.unwrap());
        assert!(store.delete_listing(ListingKind::Equipment, &tractor.id, &owner.id).await.unwrap());
        assert_eq!(store.count_listings(ListingKind::Equipment, &owner.id).await.unwrap(), 0);
    }

    #[actix_rt::test]
    async fn concurrent_badge_awards_admit_one() {
        let store = MemoryStore::new();
        let holder = ObjectId::new();
        let badge = || Badge {
            id: ObjectId::new(),
            user_id: holder,
            badge_id: "first-listing".to_string(),
            earned_at: DateTime::now(),
        };
        let (first, second) = (badge(), badge());
        let (a, b) = futures::join!(store.insert_badge(&first), store.insert_badge(&second));
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        assert_eq!(store.badges_for(&holder).await.unwrap().len(), 1);
    }
}
