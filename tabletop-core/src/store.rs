//! Room storage behind the registry

use crate::registry::Room;
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A room guarded by its own lock
pub type SharedRoom = Arc<Mutex<Room>>;

/// Where the registry keeps its rooms
pub trait GameStore: Send + Sync {
    fn get(&self, game_id: &str) -> Option<SharedRoom>;

    fn put(&self, game_id: String, room: SharedRoom);

    /// Returns the room that was removed, if any
    fn delete(&self, game_id: &str) -> Option<SharedRoom>;

    /// Every stored room, in no particular order
    fn rooms(&self) -> Vec<SharedRoom>;

    fn len(&self) -> usize {
        self.rooms().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory store; state is lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    rooms: RwLock<FxHashMap<String, SharedRoom>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryStore {
    fn get(&self, game_id: &str) -> Option<SharedRoom> {
        self.rooms.read().get(game_id).cloned()
    }

    fn put(&self, game_id: String, room: SharedRoom) {
        self.rooms.write().insert(game_id, room);
    }

    fn delete(&self, game_id: &str) -> Option<SharedRoom> {
        self.rooms.write().remove(game_id)
    }

    fn rooms(&self) -> Vec<SharedRoom> {
        self.rooms.read().values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.rooms.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;

    fn room(id: &str) -> SharedRoom {
        Arc::new(Mutex::new(Room::new(id, Game::new_checkers(id), 0)))
    }

    #[test]
    fn test_put_get_delete() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.put("a".to_string(), room("a"));
        store.put("b".to_string(), room("b"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").unwrap().lock().id(), "a");

        assert!(store.delete("a").is_some());
        assert!(store.delete("a").is_none());
        assert!(store.get("a").is_none());
        assert_eq!(store.rooms().len(), 1);
    }
}
