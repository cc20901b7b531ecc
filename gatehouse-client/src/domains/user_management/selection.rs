//! Multi-select working set, scoped to the loaded page

use gatehouse_model::{User, UserId};
use std::collections::BTreeSet;

/// Selected user ids
///
/// Every mutator takes the current page and ignores ids that are not on it,
/// so the set never holds an id the admin cannot see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<UserId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserId> {
        self.ids.iter()
    }

    pub fn to_vec(&self) -> Vec<UserId> {
        self.ids.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Flip one id; returns whether it is selected afterwards
    pub fn toggle(&mut self, id: &UserId, page: &[User]) -> bool {
        if self.ids.remove(id) {
            return false;
        }
        if page.iter().any(|user| &user.id == id) {
            self.ids.insert(id.clone());
            return true;
        }
        false
    }

    /// True when the page is non-empty and every row on it is selected
    pub fn is_all_selected(&self, page: &[User]) -> bool {
        !page.is_empty() && page.iter().all(|user| self.ids.contains(&user.id))
    }

    pub fn select_all(&mut self, page: &[User]) {
        self.ids = page.iter().map(|user| user.id.clone()).collect();
    }

    /// Clear when the whole page is selected, otherwise select the whole page
    pub fn toggle_all(&mut self, page: &[User]) {
        if self.is_all_selected(page) {
            self.ids.clear();
        } else {
            self.select_all(page);
        }
    }
}
