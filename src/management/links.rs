use std::collections::{HashMap, hash_map::Entry};

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{types::LinkEntry, warning};

/// Number of hex characters in a link id.
pub const LINK_ID_LEN: usize = 8;

/// Ids drawn from the generator before falling back to a full UUID.
pub const MAX_ISSUE_ATTEMPTS: usize = 16;

type Generator = Box<dyn Fn() -> String + Send + Sync>;

/// In-memory registry of shared links.
///
/// Maps a short link id to the sharer and the playlist they shared. Entries
/// are never updated or removed; they live as long as the process.
pub struct LinkRegistry {
    links: RwLock<HashMap<String, LinkEntry>>,
    generator: Generator,
}

impl Default for LinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self::with_generator(generate_link_id)
    }

    /// Registry drawing its ids from `generator` instead of random UUIDs.
    pub fn with_generator(generator: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self {
            links: RwLock::new(HashMap::new()),
            generator: Box::new(generator),
        }
    }

    /// Stores a new link for `playlist_id` shared by `owner_user_id` and
    /// returns its id.
    ///
    /// An id that is already taken is discarded and a new one drawn, so an
    /// existing link is never overwritten. After [`MAX_ISSUE_ATTEMPTS`]
    /// taken ids the link gets a full 32 character UUID instead.
    pub async fn issue(&self, owner_user_id: &str, playlist_id: &str) -> String {
        let mut links = self.links.write().await;
        let mut attempts = 0;
        loop {
            let link_id = if attempts < MAX_ISSUE_ATTEMPTS {
                (self.generator)()
            } else {
                Uuid::new_v4().simple().to_string()
            };
            attempts += 1;

            if let Entry::Vacant(slot) = links.entry(link_id.clone()) {
                slot.insert(LinkEntry {
                    link_id: link_id.clone(),
                    owner_user_id: owner_user_id.to_string(),
                    playlist_id: playlist_id.to_string(),
                    created_at: Utc::now(),
                });
                return link_id;
            }
            if attempts == MAX_ISSUE_ATTEMPTS {
                warning!("No free short link id after {} attempts", attempts);
            }
        }
    }

    pub async fn resolve(&self, link_id: &str) -> Option<LinkEntry> {
        self.links.read().await.get(link_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.links.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.links.read().await.is_empty()
    }
}

/// First eight hex digits of a random v4 UUID.
pub fn generate_link_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(LINK_ID_LEN);
    id
}
