use anyhow::{Result, anyhow};
use dashmap::DashMap;
use doodle_core::{ProfileStore, complete_game, credit_coins, new_profile, record_best_streak};
use doodle_types::{GameCompletion, PlayerProfile, ProfileId};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Player profiles shared by every session in the process
#[derive(Default)]
pub struct ProfileRegistry {
    profiles: DashMap<ProfileId, PlayerProfile>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The profile stored under `id`. An id the registry has never issued
    /// gets a fresh profile under a new id rather than the caller's.
    pub fn get_or_create(&self, id: Option<ProfileId>) -> PlayerProfile {
        if let Some(profile) = id.and_then(|id| self.get(&id)) {
            return profile;
        }

        let profile = new_profile(Uuid::new_v4());
        info!("Creating profile {}", profile.id);
        self.profiles.insert(profile.id, profile.clone());
        profile
    }

    /// Drop a profile that never finished a game. Returns whether it was removed.
    pub fn evict_if_unplayed(&self, id: &ProfileId) -> bool {
        let removed = self
            .profiles
            .remove_if(id, |_, profile| profile.games_played == 0)
            .is_some();
        if removed {
            debug!("Evicted unplayed profile {}", id);
        }
        removed
    }

    pub fn get(&self, id: &ProfileId) -> Option<PlayerProfile> {
        self.profiles.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    fn update<T>(&self, id: &ProfileId, apply: impl FnOnce(&mut PlayerProfile) -> T) -> Result<T> {
        let mut entry = self
            .profiles
            .get_mut(id)
            .ok_or_else(|| anyhow!("Profile {} not found", id))?;
        Ok(apply(entry.value_mut()))
    }
}

/// A session's handle on its player's entry in the registry
#[derive(Clone)]
pub struct SharedProfileStore {
    registry: Arc<ProfileRegistry>,
    id: ProfileId,
}

impl SharedProfileStore {
    pub fn new(registry: Arc<ProfileRegistry>, id: ProfileId) -> Self {
        Self { registry, id }
    }
}

impl ProfileStore for SharedProfileStore {
    fn record_round_result(&mut self, coins_earned: u32) -> Result<()> {
        self.registry
            .update(&self.id, |profile| credit_coins(profile, coins_earned))
    }

    fn record_streak(&mut self, streak: u32) -> Result<()> {
        self.registry.update(&self.id, |profile| {
            record_best_streak(profile, streak);
        })
    }

    fn record_game_completion(
        &mut self,
        total_score: u32,
        rounds_played: u32,
    ) -> Result<GameCompletion> {
        self.registry.update(&self.id, |profile| {
            complete_game(profile, total_score, rounds_played)
        })
    }

    fn profile(&self) -> Result<PlayerProfile> {
        self.registry
            .get(&self.id)
            .ok_or_else(|| anyhow!("Profile {} not found", self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_is_stable() {
        let registry = ProfileRegistry::new();
        let created = registry.get_or_create(None);
        let again = registry.get_or_create(Some(created.id));

        assert_eq!(created.id, again.id);
        assert_eq!(created.created_at, again.created_at);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_id_gets_a_fresh_profile() {
        let registry = ProfileRegistry::new();
        let requested = Uuid::new_v4();
        let profile = registry.get_or_create(Some(requested));

        assert_ne!(profile.id, requested);
        assert!(registry.get(&requested).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_only_unplayed_profiles_are_evicted() {
        let registry = Arc::new(ProfileRegistry::new());
        let idle = registry.get_or_create(None).id;
        let played = registry.get_or_create(None).id;
        SharedProfileStore::new(registry.clone(), played)
            .record_game_completion(300, 5)
            .unwrap();

        assert!(registry.evict_if_unplayed(&idle));
        assert!(!registry.evict_if_unplayed(&played));
        assert!(!registry.evict_if_unplayed(&idle));
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&played).is_some());
    }

    #[test]
    fn test_store_writes_through_to_registry() {
        let registry = Arc::new(ProfileRegistry::new());
        let id = registry.get_or_create(None).id;
        let mut store = SharedProfileStore::new(registry.clone(), id);

        store.record_round_result(12).unwrap();
        store.record_streak(2).unwrap();
        let completion = store.record_game_completion(900, 5).unwrap();
        assert!(completion.is_new_high_score);

        let profile = registry.get(&id).unwrap();
        assert_eq!(profile.total_coins, 12);
        assert_eq!(profile.best_streak, 2);
        assert_eq!(profile.high_score, 900);
        assert_eq!(profile.experience, 90);
    }

    #[test]
    fn test_missing_profile_is_an_error() {
        let registry = Arc::new(ProfileRegistry::new());
        let mut store = SharedProfileStore::new(registry, Uuid::new_v4());
        assert!(store.record_round_result(5).is_err());
        assert!(store.profile().is_err());
    }
}
