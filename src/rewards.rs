//! GreenPoints breakdown and leaderboard.
//!
//! Listing points are derived from listing counts at read time; the stored
//! counter only ever receives quiz points.

use std::collections::HashMap;

use mongodb::bson::oid::ObjectId;
use serde::Serialize;

use crate::models::{ListingKind, User};
use crate::store::{Store, StoreResult};

pub const SELLING_POINTS_PER_LISTING: i64 = 15;
pub const RENTING_POINTS_PER_LISTING: i64 = 10;
pub const LEADERBOARD_SIZE: usize = 10;

fn as_points(count: u64, per_listing: i64) -> i64 {
    i64::try_from(count)
        .unwrap_or(i64::MAX)
        .saturating_mul(per_listing)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsBreakdown {
    pub quiz_points: i64,
    pub selling_points: i64,
    pub renting_points: i64,
    pub total_points: i64,
}

impl PointsBreakdown {
    pub fn new(stored_counter: i64, byproduct_listings: u64, equipment_listings: u64) -> Self {
        let selling_points = as_points(byproduct_listings, SELLING_POINTS_PER_LISTING);
        let renting_points = as_points(equipment_listings, RENTING_POINTS_PER_LISTING);
        Self {
            quiz_points: stored_counter,
            selling_points,
            renting_points,
            total_points: stored_counter
                .saturating_add(selling_points)
                .saturating_add(renting_points),
        }
    }
}

/// Points for a quiz scored out of 100: five per ten percent, rounded.
pub fn quiz_points(score: f64) -> i64 {
    (score / 10.0).round() as i64 * 5
}

pub async fn points_for(store: &dyn Store, user: &User) -> StoreResult<PointsBreakdown> {
    let byproducts = store.count_listings(ListingKind::ByProduct, &user.id).await?;
    let equipment = store.count_listings(ListingKind::Equipment, &user.id).await?;
    Ok(PointsBreakdown::new(user.green_points, byproducts, equipment))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: String,
    pub username: String,
    pub location: String,
    pub points: i64,
}

/// Sorts by points, highest first, and keeps the top entries. Equal scores
/// keep their incoming order.
pub fn rank(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| b.points.cmp(&a.points));
    entries.truncate(LEADERBOARD_SIZE);
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i + 1;
    }
    entries
}

pub async fn leaderboard(store: &dyn Store) -> StoreResult<Vec<LeaderboardEntry>> {
    let users = store.list_users().await?;
    let byproducts = store.listing_counts(ListingKind::ByProduct).await?;
    let equipment = store.listing_counts(ListingKind::Equipment).await?;
    let count = |counts: &HashMap<ObjectId, u64>, id: &ObjectId| {
        counts.get(id).copied().unwrap_or(0)
    };

    let entries = users
        .iter()
        .map(|user| {
            let points = PointsBreakdown::new(
                user.green_points,
                count(&byproducts, &user.id),
                count(&equipment, &user.id),
            );
            LeaderboardEntry {
                rank: 0,
                user_id: user.id.to_hex(),
                username: user.username.clone(),
                location: user.location.clone(),
                points: points.total_points,
            }
        })
        .collect();

    Ok(rank(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Listing;
    use crate::store::MemoryStore;
    use mongodb::bson::DateTime;

    fn entry(name: &str, points: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            rank: 0,
            user_id: ObjectId::new().to_hex(),
            username: name.to_string(),
            location: "Nashik".to_string(),
            points,
        }
    }

    #[test]
    fn breakdown_adds_listing_points_to_counter() {
        let points = PointsBreakdown::new(20, 1, 2);
        assert_eq!(points.selling_points, 15);
        assert_eq!(points.renting_points, 20);
        assert_eq!(points.quiz_points, 20);
        assert_eq!(points.total_points, 55);
    }

    #[test]
    fn quiz_points_round_half_up() {
        assert_eq!(quiz_points(0.0), 0);
        assert_eq!(quiz_points(44.0), 20);
        assert_eq!(quiz_points(45.0), 25);
        assert_eq!(quiz_points(100.0), 50);
    }

    #[test]
    fn rank_keeps_top_ten_descending() {
        let entries = (0..15).map(|i| entry(&format!("u{i}"), i * 7 % 11)).collect();
        let ranked = rank(entries);
        assert_eq!(ranked.len(), LEADERBOARD_SIZE);
        assert!(ranked.windows(2).all(|w| w[0].points >= w[1].points));
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[9].rank, 10);
    }

    #[test]
    fn rank_is_stable_for_ties() {
        let ranked = rank(vec![entry("a", 5), entry("b", 9), entry("c", 5)]);
        let names: Vec<_> = ranked.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn rank_of_nobody_is_empty() {
        assert!(rank(Vec::new()).is_empty());
    }

    #[actix_rt::test]
    async fn leaderboard_counts_listings_per_owner() {
        let store = MemoryStore::new();
        let mut seller = User::new("seller".into(), "s@example.com".into(), "h".into(), "Pune".into());
        seller.green_points = 5;
        let idle = User::new("idle".into(), "i@example.com".into(), "h".into(), "Pune".into());
        store.insert_user(&seller).await.unwrap();
        store.insert_user(&idle).await.unwrap();

        let husk = Listing {
            id: ObjectId::new(),
            name: "Rice husk".into(),
            description: "Dry".into(),
            price: 300.0,
            quantity: Some("2 tonnes".into()),
            location: "Pune".into(),
            image: None,
            owner_id: seller.id,
            owner_name: seller.username.clone(),
            is_available: true,
            created_at: DateTime::now(),
        };
        store.insert_listing(ListingKind::ByProduct, &husk).await.unwrap();

        let board = leaderboard(&store).await.unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].username, "seller");
        assert_eq!(board[0].points, 20);
        assert_eq!(board[1].points, 0);

        let mine = points_for(&store, &seller).await.unwrap();
        assert_eq!(mine, PointsBreakdown::new(5, 1, 0));
    }
}
