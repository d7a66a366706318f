//! Community channels. The channel list is fixed; message history has no
//! backing store yet, so reads are always empty and posts are echoed back.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Channel {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CHANNELS: &[Channel] = &[
    Channel {
        id: "general",
        name: "General",
        description: "Introduce yourself and talk about anything farming",
    },
    Channel {
        id: "equipment-sharing",
        name: "Equipment Sharing",
        description: "Coordinate rentals and ask about machines",
    },
    Channel {
        id: "byproducts-market",
        name: "ByProducts Market",
        description: "Find buyers and sellers for crop byproducts",
    },
    Channel {
        id: "sustainable-farming",
        name: "Sustainable Farming",
        description: "Share eco-friendly practices and tips",
    },
];

pub fn channel(id: &str) -> Option<&'static Channel> {
    CHANNELS.iter().find(|c| c.id == id)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMessage {
    pub channel_id: &'static str,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
