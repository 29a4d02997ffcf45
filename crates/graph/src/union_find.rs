//! Disjoint-set forest used to rederive clusters from scratch on every
//! `cluster_nodes` call (§4.2) - each user starts in its own singleton set.

use std::collections::HashMap;

pub struct UnionFind {
    parent: HashMap<String, String>,
}

impl UnionFind {
    pub fn new(user_ids: impl IntoIterator<Item = String>) -> Self {
        let parent = user_ids.into_iter().map(|id| (id.clone(), id)).collect();
        Self { parent }
    }

    pub fn find(&mut self, id: &str) -> String {
        let parent = self.parent.get(id).cloned().unwrap_or_else(|| id.to_string());
        if parent == id {
            return parent;
        }
        let root = self.find(&parent);
        self.parent.insert(id.to_string(), root.clone());
        root
    }

    pub fn union(&mut self, a: &str, b: &str) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent.insert(root_a, root_b);
        }
    }

    /// Groups every member by its root, returning only groups with more
    /// than one member (singleton clusters are elided, §3).
    pub fn non_singleton_groups(&mut self) -> HashMap<String, Vec<String>> {
        let ids: Vec<String> = self.parent.keys().cloned().collect();
        let mut groups: HashMap<String, Vec<String>> = HashMap::new();
        for id in ids {
            let root = self.find(&id);
            groups.entry(root).or_default().push(id);
        }
        groups.retain(|_, members| members.len() > 1);
        for members in groups.values_mut() {
            members.sort();
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_and_group() {
        let mut uf = UnionFind::new(["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()]);
        uf.union("a", "b");
        uf.union("b", "c");
        let groups = uf.non_singleton_groups();
        assert_eq!(groups.len(), 1);
        let (_, members) = groups.into_iter().next().unwrap();
        assert_eq!(members, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_singletons_elided() {
        let mut uf = UnionFind::new(["a".to_string(), "b".to_string()]);
        let groups = uf.non_singleton_groups();
        assert!(groups.is_empty());
    }
}
