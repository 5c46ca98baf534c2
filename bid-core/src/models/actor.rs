use serde::{Deserialize, Serialize};

/// Identity under which repository calls are made.
///
/// Guest estimates and signed-in users' estimates live in separate
/// collections; repositories use [`Actor::scope_key`] to pick the right
/// one. The estimate engine itself never inspects the actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    Guest,
    User(String),
}

impl Actor {
    /// Stable storage key for this actor's estimate collection.
    pub fn scope_key(&self) -> String {
        match self {
            Self::Guest => "guest".to_string(),
            Self::User(id) => format!("user:{id}"),
        }
    }

    pub fn parse_scope_key(key: &str) -> Option<Self> {
        if key == "guest" {
            return Some(Self::Guest);
        }
        key.strip_prefix("user:").map(|id| Self::User(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn guest_scope_key_round_trips() {
        let key = Actor::Guest.scope_key();
        assert_eq!(key, "guest");
        assert_eq!(Actor::parse_scope_key(&key), Some(Actor::Guest));
    }

    #[test]
    fn user_scope_key_round_trips() {
        let actor = Actor::User("abc123".to_string());
        let key = actor.scope_key();
        assert_eq!(key, "user:abc123");
        assert_eq!(Actor::parse_scope_key(&key), Some(actor));
    }

    #[test]
    fn unknown_scope_key_is_rejected() {
        assert_eq!(Actor::parse_scope_key("admin:1"), None);
        assert_eq!(Actor::parse_scope_key(""), None);
    }
}
