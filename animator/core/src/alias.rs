//! State name resolution
//!
//! External events arrive with whatever vocabulary the caller uses
//! ("editing", "grep", "done"). [`AliasResolver`] maps them onto the states
//! a character actually has, with a fixed precedence:
//!
//! 1. custom alias (set by the caller) if its target is a real state
//! 2. default alias if its target is a real state
//! 3. the name itself if it is a real state
//! 4. the idle state if the character has it
//! 5. the name unchanged
//!
//! Resolution is total: it never fails, it degrades to idle.

use std::collections::HashMap;

use crate::character::FrameCache;

/// Name of the idle state used when nothing else matches
pub const DEFAULT_IDLE_STATE: &str = "resting";

/// Built-in aliases from common agent activity names to character states
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    // Thinking -> calm idle
    ("think", "resting"),
    ("thinking", "resting"),
    // Tools and searching -> scanning
    ("bash", "read"),
    ("grep", "read"),
    ("glob", "read"),
    ("find", "read"),
    // Writing and editing
    ("edit", "write"),
    ("editing", "write"),
    ("writing", "write"),
    ("reading", "read"),
    // Success
    ("success", "approval"),
    ("complete", "approval"),
    ("done", "approval"),
    // Failure -> uncertain
    ("fail", "wait"),
    ("failed", "wait"),
    // Startup
    ("start", "arise"),
    ("startup", "arise"),
];

/// Recommended frame rates per state
///
/// Installed by `StateController::apply_recommended_fps`.
pub const RECOMMENDED_STATE_FPS: &[(&str, u32)] = &[
    ("resting", 2),
    ("wait", 3),
    ("read", 4),
    ("write", 4),
    ("search", 6),
    ("approval", 3),
    ("arise", 5),
];

/// Maps external names to canonical state names
#[derive(Clone, Debug)]
pub struct AliasResolver {
    custom: HashMap<String, String>,
    defaults: HashMap<String, String>,
    idle_state: String,
}

impl AliasResolver {
    /// Resolver with the built-in default table
    pub fn new(idle_state: impl Into<String>) -> Self {
        let defaults = DEFAULT_ALIASES
            .iter()
            .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
            .collect();
        Self::with_defaults(idle_state, defaults)
    }

    /// Resolver with an explicit default table
    pub fn with_defaults(idle_state: impl Into<String>, defaults: HashMap<String, String>) -> Self {
        Self {
            custom: HashMap::new(),
            defaults,
            idle_state: idle_state.into(),
        }
    }

    /// The fallback state name
    #[must_use]
    pub fn idle_state(&self) -> &str {
        &self.idle_state
    }

    /// Add or replace a custom alias
    pub fn set_alias(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.custom.insert(from.into(), to.into());
    }

    /// Remove a custom alias; defaults are never touched
    pub fn remove_alias(&mut self, from: &str) -> Option<String> {
        self.custom.remove(from)
    }

    /// Drop every custom alias
    pub fn clear_custom(&mut self) {
        self.custom.clear();
    }

    /// Snapshot of the custom table
    #[must_use]
    pub fn custom_aliases(&self) -> HashMap<String, String> {
        self.custom.clone()
    }

    /// Where `from` would point, custom first, without checking the target
    #[must_use]
    pub fn alias_target(&self, from: &str) -> Option<&str> {
        self.custom
            .get(from)
            .or_else(|| self.defaults.get(from))
            .map(String::as_str)
    }

    /// Resolve an external name against the states in `cache`
    #[must_use]
    pub fn resolve(&self, name: &str, cache: &FrameCache) -> String {
        if let Some(target) = self.custom.get(name) {
            if cache.has_state(target) {
                return target.clone();
            }
        }
        if let Some(target) = self.defaults.get(name) {
            if cache.has_state(target) {
                return target.clone();
            }
        }
        if cache.has_state(name) {
            return name.to_string();
        }
        if cache.has_state(&self.idle_state) {
            return self.idle_state.clone();
        }
        name.to_string()
    }

    /// Whether `name` is a real state or an alias of one
    ///
    /// Unlike [`resolve`](Self::resolve) this never falls back to idle.
    #[must_use]
    pub fn is_known(&self, name: &str, cache: &FrameCache) -> bool {
        if cache.has_state(name) {
            return true;
        }
        [self.custom.get(name), self.defaults.get(name)]
            .into_iter()
            .flatten()
            .any(|target| cache.has_state(target))
    }
}

impl Default for AliasResolver {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_STATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{CharacterDefinition, Frame};

    fn cache(states: &[&str]) -> FrameCache {
        let def = states.iter().fold(CharacterDefinition::new("c", 1, 1), |d, s| {
            d.with_state(*s, vec![Frame::new(["x"])])
        });
        FrameCache::new(&def)
    }

    #[test]
    fn test_default_alias_resolves() {
        let c = cache(&["resting", "write", "read"]);
        let r = AliasResolver::default();
        assert_eq!(r.resolve("editing", &c), "write");
        assert_eq!(r.resolve("grep", &c), "read");
    }

    #[test]
    fn test_custom_overrides_default() {
        let c = cache(&["resting", "write", "read"]);
        let mut r = AliasResolver::default();
        r.set_alias("grep", "write");
        assert_eq!(r.resolve("grep", &c), "write");

        r.remove_alias("grep");
        assert_eq!(r.resolve("grep", &c), "read");
    }

    #[test]
    fn test_custom_with_missing_target_falls_through() {
        let c = cache(&["resting", "read"]);
        let mut r = AliasResolver::default();
        r.set_alias("grep", "nonexistent");
        assert_eq!(r.resolve("grep", &c), "read");
    }

    #[test]
    fn test_literal_state_wins_over_fallback() {
        let c = cache(&["resting", "dance"]);
        let r = AliasResolver::default();
        assert_eq!(r.resolve("dance", &c), "dance");
    }

    #[test]
    fn test_default_target_missing_uses_idle() {
        // "done" -> "approval", which this character lacks
        let c = cache(&["resting"]);
        let r = AliasResolver::default();
        assert_eq!(r.resolve("done", &c), "resting");
        assert_eq!(r.resolve("garbage", &c), "resting");
    }

    #[test]
    fn test_no_idle_returns_input() {
        let c = cache(&["write"]);
        let r = AliasResolver::default();
        assert_eq!(r.resolve("garbage", &c), "garbage");
    }

    #[test]
    fn test_custom_idle_state() {
        let c = cache(&["sleep", "write"]);
        let r = AliasResolver::new("sleep");
        assert_eq!(r.resolve("???", &c), "sleep");
        assert_eq!(r.idle_state(), "sleep");
    }

    #[test]
    fn test_is_known() {
        let c = cache(&["resting", "write"]);
        let mut r = AliasResolver::default();
        assert!(r.is_known("write", &c));
        assert!(r.is_known("edit", &c));
        assert!(!r.is_known("grep", &c)); // default target "read" missing
        assert!(!r.is_known("garbage", &c));

        r.set_alias("busy", "write");
        assert!(r.is_known("busy", &c));
        assert_eq!(r.alias_target("busy"), Some("write"));
        assert_eq!(r.alias_target("done"), Some("approval"));

        r.clear_custom();
        assert!(r.custom_aliases().is_empty());
    }
}
