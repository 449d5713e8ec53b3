use std::sync::{Arc, LazyLock};

use crate::config::AppConfig;

/// Collection holding game documents.
pub const GAME: &str = "game";
/// Collection holding per-player game statistics.
pub const GAME_STATS: &str = "game-stats";
/// Collection for pre-game load data (min/max players, ...). Not enabled yet.
pub const GAME_DATA: &str = "game-data";

/// Built-in allow-list used by [`CollectionRegistry::default`].
pub const DEFAULT_COLLECTIONS: [&str; 2] = [GAME, GAME_STATS];

static GLOBAL: LazyLock<Arc<CollectionRegistry>> =
    LazyLock::new(|| Arc::new(CollectionRegistry::default()));

/// Immutable set of collection names game models are allowed to target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRegistry {
    allowed: Vec<String>,
}

impl CollectionRegistry {
    /// Build a registry from `names`. Empty and duplicated names are skipped.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut allowed: Vec<String> = Vec::new();
        for name in names.into_iter().map(Into::into) {
            if !name.is_empty() && !allowed.contains(&name) {
                allowed.push(name);
            }
        }
        Self { allowed }
    }

    /// Build a registry from the collections listed in the application config.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.collections().iter().map(String::as_str))
    }

    /// Process-wide registry over [`DEFAULT_COLLECTIONS`], created on first use.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Whether `name` is an allowed collection. Matching is exact and case-sensitive.
    pub fn is_supported(&self, name: &str) -> bool {
        self.allowed.iter().any(|allowed| allowed == name)
    }

    /// Allowed collection names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(String::as_str)
    }
}

impl Default for CollectionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTIONS)
    }
}
