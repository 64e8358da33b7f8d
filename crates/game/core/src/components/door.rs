//! Door component.

/// Door state for corridor-placed door entities.
///
/// A door blocks movement iff it is closed and either visible (not secret,
/// or already discovered) or locked. An open door never blocks.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Door {
    pub is_closed: bool,
    pub is_locked: bool,
    pub is_secret: bool,
    pub is_discovered: bool,
    /// Key tag required to unlock, if locked.
    pub key_tag: Option<String>,
    /// Search difficulty for secret doors.
    pub search_dc: i32,
}

impl Door {
    pub fn closed() -> Self {
        Self {
            is_closed: true,
            is_locked: false,
            is_secret: false,
            is_discovered: false,
            key_tag: None,
            search_dc: 12,
        }
    }

    pub fn locked(key_tag: impl Into<String>) -> Self {
        Self {
            is_locked: true,
            key_tag: Some(key_tag.into()),
            ..Self::closed()
        }
    }

    pub fn secret(search_dc: i32) -> Self {
        Self {
            is_secret: true,
            search_dc,
            ..Self::closed()
        }
    }

    /// Whether this door currently blocks movement.
    pub fn blocks_movement(&self) -> bool {
        if !self.is_closed {
            return false;
        }
        let visible = !self.is_secret || self.is_discovered;
        visible || self.is_locked
    }

    /// Open an unlocked door. Returns false if locked.
    pub fn open(&mut self) -> bool {
        if self.is_locked {
            return false;
        }
        self.is_closed = false;
        true
    }

    pub fn close(&mut self) {
        self.is_closed = true;
    }

    /// Unlock with a matching key tag.
    pub fn unlock(&mut self, key_tag: &str) -> bool {
        match &self.key_tag {
            Some(tag) if tag == key_tag => {
                self.is_locked = false;
                true
            }
            _ => false,
        }
    }

    /// Reveal a secret door after a successful search.
    pub fn discover(&mut self) {
        self.is_discovered = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_door_never_blocks() {
        let mut door = Door::closed();
        assert!(door.blocks_movement());
        assert!(door.open());
        assert!(!door.blocks_movement());
    }

    #[test]
    fn locked_door_needs_matching_key() {
        let mut door = Door::locked("brass");
        assert!(!door.open());
        assert!(!door.unlock("iron"));
        assert!(door.unlock("brass"));
        assert!(door.open());
    }

    #[test]
    fn undiscovered_secret_door_does_not_block() {
        let mut door = Door::secret(14);
        assert!(!door.blocks_movement());
        door.discover();
        assert!(door.blocks_movement());
        door.open();
        assert!(!door.blocks_movement());
    }
}
