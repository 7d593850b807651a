use std::collections::HashMap;

use crate::models::CommunityView;

/// State transitions accepted by [`CommunityState::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum CommunityAction {
    ReceivedCommunity(CommunityView),
    ReceivedTrendingCommunities(Vec<CommunityView>),
    ResetCommunities,
    SetFavorites(Vec<String>),
}

/// In-memory community cache, trending list and favorites of the active user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommunityState {
    community_by_handle: HashMap<String, CommunityView>,
    trending_communities: Vec<CommunityView>,
    favorites: Vec<String>,
}

impl CommunityState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: CommunityAction) {
        match action {
            CommunityAction::ReceivedCommunity(view) => self.receive_community(view),
            CommunityAction::ReceivedTrendingCommunities(list) => {
                self.receive_trending_communities(list)
            }
            CommunityAction::ResetCommunities => self.reset(),
            CommunityAction::SetFavorites(list) => self.set_favorites(list),
        }
    }

    /// Upsert a view under its handle; the last write wins.
    pub fn receive_community(&mut self, view: CommunityView) {
        self.community_by_handle.insert(view.handle(), view);
    }

    pub fn receive_trending_communities(&mut self, list: Vec<CommunityView>) {
        self.trending_communities = list;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_favorites(&mut self, list: Vec<String>) {
        self.favorites = list;
    }

    // ===== Read access =====

    pub fn community(&self, handle: &str) -> Option<&CommunityView> {
        self.community_by_handle.get(handle)
    }

    pub fn community_by_handle(&self) -> &HashMap<String, CommunityView> {
        &self.community_by_handle
    }

    pub fn trending_communities(&self) -> &[CommunityView] {
        &self.trending_communities
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    pub fn is_favorite(&self, handle: &str) -> bool {
        self.favorites.iter().any(|f| f == handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::community::fixtures::view;
    use crate::models::SubscribedType;

    #[test]
    fn test_receive_community_upserts_by_handle() {
        let mut state = CommunityState::new();
        let v = view(1, "rust", "programming.dev");
        state.receive_community(v.clone());
        assert_eq!(state.community("rust@programming.dev"), Some(&v));

        let mut updated = v.clone();
        updated.subscribed = SubscribedType::Subscribed;
        state.receive_community(updated.clone());
        assert_eq!(state.community_by_handle().len(), 1);
        assert_eq!(state.community("rust@programming.dev"), Some(&updated));
    }

    #[test]
    fn test_same_name_on_different_hosts_are_distinct() {
        let mut state = CommunityState::new();
        state.receive_community(view(1, "rust", "programming.dev"));
        state.receive_community(view(2, "rust", "lemmy.ml"));
        assert_eq!(state.community_by_handle().len(), 2);
    }

    #[test]
    fn test_trending_replaced_wholesale() {
        let mut state = CommunityState::new();
        state.receive_trending_communities(vec![view(1, "a", "x.y"), view(2, "b", "x.y")]);
        state.receive_trending_communities(vec![view(3, "c", "x.y")]);
        assert_eq!(state.trending_communities(), &[view(3, "c", "x.y")]);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut state = CommunityState::new();
        state.receive_community(view(1, "a", "x.y"));
        state.receive_trending_communities(vec![view(2, "b", "x.y")]);
        state.set_favorites(vec!["a@x.y".to_string()]);

        state.apply(CommunityAction::ResetCommunities);
        assert_eq!(state, CommunityState::default());
        assert!(state.favorites().is_empty());
        assert!(state.trending_communities().is_empty());
        assert!(state.community_by_handle().is_empty());
    }

    #[test]
    fn test_apply_dispatches_each_action() {
        let mut state = CommunityState::new();
        state.apply(CommunityAction::ReceivedCommunity(view(1, "a", "x.y")));
        state.apply(CommunityAction::ReceivedTrendingCommunities(vec![view(2, "b", "x.y")]));
        state.apply(CommunityAction::SetFavorites(vec!["a@x.y".to_string()]));

        assert!(state.community("a@x.y").is_some());
        assert_eq!(state.trending_communities().len(), 1);
        assert!(state.is_favorite("a@x.y"));
        assert!(!state.is_favorite("b@x.y"));
    }
}
