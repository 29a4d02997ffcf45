//! `GraphEngine` - the in-memory undirected graph mirroring `users`+`links`
//! (§4.2, §5), held behind a `tokio::sync::RwLock` the way
//! `bibank_hooks::executor::TransactionExecutor` holds its
//! `Arc<RwLock<ComplianceEngine>>`: writers serialize against everyone,
//! readers run concurrently with each other.
//!
//! The store and the in-memory graph are mutated together under the same
//! write-lock acquisition so external observers never see them diverge
//! (§5).

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use riskguard_core::{Transaction, User};
use riskguard_store::{collections, Filter, Store};
use tokio::sync::RwLock;

use crate::error::GraphError;
use crate::types::{AnalyzeResult, Cluster, GraphRule, Link};
#[cfg(test)]
use crate::types::GraphOperator;
use crate::union_find::UnionFind;

struct GraphState {
    users: HashMap<String, User>,
    adjacency: HashMap<String, HashSet<String>>,
    links: HashMap<(String, String), Link>,
    graph_rules: HashMap<String, GraphRule>,
    clusters: HashMap<String, Cluster>,
    ready: bool,
}

impl GraphState {
    fn empty() -> Self {
        Self {
            users: HashMap::new(),
            adjacency: HashMap::new(),
            links: HashMap::new(),
            graph_rules: HashMap::new(),
            clusters: HashMap::new(),
            ready: false,
        }
    }
}

fn ensure_ready(state: &GraphState) -> Result<(), GraphError> {
    if state.ready {
        Ok(())
    } else {
        Err(GraphError::NotReady)
    }
}

fn link_key(source: &str, target: &str) -> String {
    format!("{source}:{target}")
}

pub struct GraphEngine {
    store: Arc<dyn Store>,
    state: RwLock<GraphState>,
}

impl GraphEngine {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store, state: RwLock::new(GraphState::empty()) }
    }

    /// One-time write-lock-held bulk load from `store` (§5). Concurrent
    /// requests that arrive during initialization block on the same lock
    /// rather than observing a half-loaded graph.
    pub async fn initialize(&self) -> Result<(), GraphError> {
        let mut state = self.state.write().await;
        *state = GraphState::empty();

        for doc in self.store.find(collections::USERS, &Filter::new()).await? {
            let user: User = serde_json::from_value(doc).map_err(|e| GraphError::Store(e.into()))?;
            state.adjacency.entry(user.user_id.clone()).or_default();
            state.users.insert(user.user_id.clone(), user);
        }

        for doc in self.store.find(collections::LINKS, &Filter::new()).await? {
            let link: Link = serde_json::from_value(doc).map_err(|e| GraphError::Store(e.into()))?;
            state.adjacency.entry(link.source.clone()).or_default().insert(link.target.clone());
            state.adjacency.entry(link.target.clone()).or_default().insert(link.source.clone());
            state.links.insert(Link::canonical_pair(&link.source, &link.target), link);
        }

        for doc in self.store.find(collections::GRAPH_RULES, &Filter::new()).await? {
            let rule: GraphRule = serde_json::from_value(doc).map_err(|e| GraphError::Store(e.into()))?;
            state.graph_rules.insert(rule.graph_rule_id.clone(), rule);
        }

        for doc in self.store.find(collections::CLUSTERS, &Filter::new()).await? {
            let cluster: Cluster = serde_json::from_value(doc).map_err(|e| GraphError::Store(e.into()))?;
            state.clusters.insert(cluster.cluster_id.clone(), cluster);
        }

        state.ready = true;
        tracing::info!(
            users = state.users.len(),
            links = state.links.len(),
            graph_rules = state.graph_rules.len(),
            "graph engine initialized"
        );
        Ok(())
    }

    // ---- writers -------------------------------------------------------

    pub async fn create_user(&self, user: User) -> Result<User, GraphError> {
        let user = user.with_derived_domain();
        let mut state = self.state.write().await;
        ensure_ready(&state)?;
        if state.users.contains_key(&user.user_id) {
            return Err(GraphError::UserAlreadyExists(user.user_id.clone()));
        }
        let doc = serde_json::to_value(&user).map_err(|e| GraphError::Store(e.into()))?;
        self.store.insert_one(collections::USERS, &user.user_id, doc).await?;
        state.adjacency.entry(user.user_id.clone()).or_default();
        state.users.insert(user.user_id.clone(), user.clone());
        Ok(user)
    }

    pub async fn update_user(&self, user_id: &str, user: User) -> Result<User, GraphError> {
        let user = user.with_derived_domain();
        let mut state = self.state.write().await;
        ensure_ready(&state)?;
        if !state.users.contains_key(user_id) {
            return Err(GraphError::UserNotFound(user_id.to_string()));
        }
        let doc = serde_json::to_value(&user).map_err(|e| GraphError::Store(e.into()))?;
        self.store.update_one(collections::USERS, user_id, doc).await?;
        state.users.insert(user_id.to_string(), user.clone());
        Ok(user)
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<(), GraphError> {
        let mut state = self.state.write().await;
        ensure_ready(&state)?;
        if !state.users.contains_key(user_id) {
            return Err(GraphError::UserNotFound(user_id.to_string()));
        }
        self.store.delete_one(collections::USERS, user_id).await?;

        let removed_pairs: Vec<(String, String)> = state
            .links
            .keys()
            .filter(|pair| pair.0 == user_id || pair.1 == user_id)
            .cloned()
            .collect();
        // Store first, then mirror into memory, so a mid-cascade store
        // failure leaves the graph no further rolled back than the store.
        for pair in &removed_pairs {
            self.store.delete_one(collections::LINKS, &link_key(&pair.0, &pair.1)).await?;
            state.links.remove(pair);
        }

        let neighbors = state.adjacency.remove(user_id).unwrap_or_default();
        for n in &neighbors {
            if let Some(set) = state.adjacency.get_mut(n) {
                set.remove(user_id);
            }
        }
        state.users.remove(user_id);
        Ok(())
    }

    pub async fn create_link(&self, link: Link) -> Result<Link, GraphError> {
        let mut state = self.state.write().await;
        ensure_ready(&state)?;
        for id in [&link.source, &link.target] {
            if !state.users.contains_key(id) {
                return Err(GraphError::UserNotFound(id.clone()));
            }
        }
        let pair = Link::canonical_pair(&link.source, &link.target);
        if state.links.contains_key(&pair) {
            return Err(GraphError::LinkAlreadyExists(pair.0, pair.1));
        }
        let doc = serde_json::to_value(&link).map_err(|e| GraphError::Store(e.into()))?;
        self.store.insert_one(collections::LINKS, &link_key(&pair.0, &pair.1), doc).await?;
        state.adjacency.entry(link.source.clone()).or_default().insert(link.target.clone());
        state.adjacency.entry(link.target.clone()).or_default().insert(link.source.clone());
        state.links.insert(pair, link.clone());
        Ok(link)
    }

    pub async fn delete_link(&self, source_id: &str, target_id: &str) -> Result<(), GraphError> {
        let mut state = self.state.write().await;
        ensure_ready(&state)?;
        let pair = Link::canonical_pair(source_id, target_id);
        if !state.links.contains_key(&pair) {
            return Err(GraphError::LinkNotFound(source_id.to_string(), target_id.to_string()));
        }
        self.store.delete_one(collections::LINKS, &link_key(&pair.0, &pair.1)).await?;
        state.links.remove(&pair);
        if let Some(set) = state.adjacency.get_mut(&pair.0) {
            set.remove(&pair.1);
        }
        if let Some(set) = state.adjacency.get_mut(&pair.1) {
            set.remove(&pair.0);
        }
        Ok(())
    }

    /// §4.2: for every unordered pair with no existing link, evaluate every
    /// `GraphRule` plus the always-on zip-code heuristic; additive, never
    /// removes existing links.
    pub async fn generate_links(&self) -> Result<Vec<Link>, GraphError> {
        let mut state = self.state.write().await;
        ensure_ready(&state)?;

        let mut user_ids: Vec<String> = state.users.keys().cloned().collect();
        user_ids.sort();
        let mut created = Vec::new();

        for i in 0..user_ids.len() {
            for j in (i + 1)..user_ids.len() {
                let (a, b) = (user_ids[i].clone(), user_ids[j].clone());
                let pair = Link::canonical_pair(&a, &b);
                if state.links.contains_key(&pair) {
                    continue;
                }

                let (reasons, rule_ids) = Self::evaluate_pairwise(&state, &a, &b);
                if reasons.is_empty() {
                    continue;
                }

                let link = Link {
                    source: pair.0.clone(),
                    target: pair.1.clone(),
                    weight: 0.5,
                    link_type: "multiple_rules".to_string(),
                    reasons,
                    rule_ids,
                };
                let doc = serde_json::to_value(&link).map_err(|e| GraphError::Store(e.into()))?;
                self.store.insert_one(collections::LINKS, &link_key(&pair.0, &pair.1), doc).await?;
                state.adjacency.entry(link.source.clone()).or_default().insert(link.target.clone());
                state.adjacency.entry(link.target.clone()).or_default().insert(link.source.clone());
                state.links.insert(pair, link.clone());
                created.push(link);
            }
        }

        tracing::debug!(created = created.len(), "generate_links finished");
        Ok(created)
    }

    fn evaluate_pairwise(state: &GraphState, a: &str, b: &str) -> (Vec<String>, Vec<String>) {
        let user_a = &state.users[a];
        let user_b = &state.users[b];
        let mut reasons = Vec::new();
        let mut rule_ids = Vec::new();

        for rule in state.graph_rules.values() {
            let left = user_a.field(&rule.field1);
            let right = rule.field2.as_ref().and_then(|f2| user_b.field(f2));
            if rule.matches_pair(left.as_ref(), right.as_ref()) {
                reasons.push(rule.description.clone());
                rule_ids.push(rule.graph_rule_id.clone());
            }
        }

        if !user_a.address_zip.is_empty() && user_a.address_zip == user_b.address_zip {
            reasons.push("zip_code_match".to_string());
            rule_ids.push("zip_code_match".to_string());
        }

        (reasons, rule_ids)
    }

    /// §4.2: rederive clusters from scratch via union-find, persisting only
    /// non-singleton clusters keyed by their lexicographically-smallest
    /// member id.
    pub async fn cluster_nodes(&self) -> Result<Vec<Cluster>, GraphError> {
        let mut state = self.state.write().await;
        ensure_ready(&state)?;

        let mut user_ids: Vec<String> = state.users.keys().cloned().collect();
        user_ids.sort();
        let mut uf = UnionFind::new(user_ids.clone());

        for i in 0..user_ids.len() {
            for j in (i + 1)..user_ids.len() {
                let (a, b) = (&user_ids[i], &user_ids[j]);
                if uf.find(a) == uf.find(b) {
                    continue;
                }
                let (reasons, _) = Self::evaluate_pairwise(&state, a, b);
                if !reasons.is_empty() {
                    uf.union(a, b);
                }
            }
        }

        let groups = uf.non_singleton_groups();
        let clusters: Vec<Cluster> = groups
            .into_values()
            .map(|mut members| {
                members.sort();
                let cluster_id = members[0].clone();
                Cluster { cluster_id, members }
            })
            .collect();

        self.store.delete_many(collections::CLUSTERS, &Filter::new()).await?;
        for cluster in &clusters {
            let doc = serde_json::to_value(cluster).map_err(|e| GraphError::Store(e.into()))?;
            self.store.insert_one(collections::CLUSTERS, &cluster.cluster_id, doc).await?;
        }

        state.clusters = clusters.iter().map(|c| (c.cluster_id.clone(), c.clone())).collect();
        Ok(clusters)
    }

    pub async fn create_graph_rule(&self, rule: GraphRule) -> Result<GraphRule, GraphError> {
        let mut state = self.state.write().await;
        ensure_ready(&state)?;
        let doc = serde_json::to_value(&rule).map_err(|e| GraphError::Store(e.into()))?;
        self.store.insert_one(collections::GRAPH_RULES, &rule.graph_rule_id, doc).await?;
        state.graph_rules.insert(rule.graph_rule_id.clone(), rule.clone());
        Ok(rule)
    }

    pub async fn update_graph_rule(&self, rule_id: &str, rule: GraphRule) -> Result<GraphRule, GraphError> {
        let mut state = self.state.write().await;
        ensure_ready(&state)?;
        if !state.graph_rules.contains_key(rule_id) {
            return Err(GraphError::GraphRuleNotFound(rule_id.to_string()));
        }
        let doc = serde_json::to_value(&rule).map_err(|e| GraphError::Store(e.into()))?;
        self.store.update_one(collections::GRAPH_RULES, rule_id, doc).await?;
        state.graph_rules.insert(rule_id.to_string(), rule.clone());
        Ok(rule)
    }

    /// Deleting a graph rule cascades to remove every link it produced,
    /// mirroring `delete_graph_rule_service`'s `rule_ids` scrub.
    pub async fn delete_graph_rule(&self, rule_id: &str) -> Result<(), GraphError> {
        let mut state = self.state.write().await;
        ensure_ready(&state)?;
        if !state.graph_rules.contains_key(rule_id) {
            return Err(GraphError::GraphRuleNotFound(rule_id.to_string()));
        }
        self.store.delete_one(collections::GRAPH_RULES, rule_id).await?;

        let affected: Vec<(String, String)> = state
            .links
            .iter()
            .filter(|(_, link)| link.rule_ids.iter().any(|id| id == rule_id))
            .map(|(pair, _)| pair.clone())
            .collect();

        // Store first, then memory, per pair - so a failure partway through
        // the cascade never leaves memory ahead of the store.
        for pair in &affected {
            self.store.delete_one(collections::LINKS, &link_key(&pair.0, &pair.1)).await?;
            state.links.remove(pair);
            if let Some(set) = state.adjacency.get_mut(&pair.0) {
                set.remove(&pair.1);
            }
            if let Some(set) = state.adjacency.get_mut(&pair.1) {
                set.remove(&pair.0);
            }
        }
        state.graph_rules.remove(rule_id);
        Ok(())
    }

    // ---- readers ---------------------------------------------------------

    /// Whether `initialize` has completed - used by the HTTP health check
    /// (§6: `503` "not initialized").
    pub async fn is_ready(&self) -> bool {
        self.state.read().await.ready
    }

    pub async fn get_graph_rule(&self, rule_id: &str) -> Result<GraphRule, GraphError> {
        let state = self.state.read().await;
        ensure_ready(&state)?;
        state
            .graph_rules
            .get(rule_id)
            .cloned()
            .ok_or_else(|| GraphError::GraphRuleNotFound(rule_id.to_string()))
    }

    pub async fn get_all_graph_rules(&self) -> Result<Vec<GraphRule>, GraphError> {
        let state = self.state.read().await;
        ensure_ready(&state)?;
        Ok(state.graph_rules.values().cloned().collect())
    }

    pub async fn read_user(&self, user_id: &str) -> Result<User, GraphError> {
        let state = self.state.read().await;
        ensure_ready(&state)?;
        state.users.get(user_id).cloned().ok_or_else(|| GraphError::UserNotFound(user_id.to_string()))
    }

    pub async fn read_link(&self, source_id: &str, target_id: &str) -> Result<Link, GraphError> {
        let state = self.state.read().await;
        ensure_ready(&state)?;
        let pair = Link::canonical_pair(source_id, target_id);
        state
            .links
            .get(&pair)
            .cloned()
            .ok_or_else(|| GraphError::LinkNotFound(source_id.to_string(), target_id.to_string()))
    }

    pub async fn get_all_links(&self) -> Result<Vec<Link>, GraphError> {
        let state = self.state.read().await;
        ensure_ready(&state)?;
        Ok(state.links.values().cloned().collect())
    }

    pub async fn get_all_clusters(&self) -> Result<Vec<Cluster>, GraphError> {
        let state = self.state.read().await;
        ensure_ready(&state)?;
        Ok(state.clusters.values().cloned().collect())
    }

    pub async fn get_cluster_by_id(&self, cluster_id: &str) -> Result<Cluster, GraphError> {
        let state = self.state.read().await;
        ensure_ready(&state)?;
        state
            .clusters
            .get(cluster_id)
            .cloned()
            .ok_or_else(|| GraphError::ClusterNotFound(cluster_id.to_string()))
    }

    pub async fn get_links_by_cluster(&self, cluster_id: &str) -> Result<Vec<Link>, GraphError> {
        let state = self.state.read().await;
        ensure_ready(&state)?;
        let cluster = state.clusters.get(cluster_id).ok_or_else(|| GraphError::ClusterNotFound(cluster_id.to_string()))?;
        let members: HashSet<&String> = cluster.members.iter().collect();
        Ok(state
            .links
            .values()
            .filter(|link| members.contains(&link.source) && members.contains(&link.target))
            .cloned()
            .collect())
    }

    /// §4.2 proximity analysis: BFS on the unweighted adjacency graph to
    /// the nearest `is_fraud=true` vertex, plus single-document graph-rule
    /// triggers against the user and (if given) the transaction.
    pub async fn analyze(
        &self,
        user_id: &str,
        transaction: Option<&Transaction>,
    ) -> Result<AnalyzeResult, GraphError> {
        let state = self.state.read().await;
        ensure_ready(&state)?;
        if !state.users.contains_key(user_id) {
            return Err(GraphError::UserNotFound(user_id.to_string()));
        }

        let fraud_ids: HashSet<&String> =
            state.users.values().filter(|u| u.is_fraud).map(|u| &u.user_id).collect();

        let dist = Self::bfs_distances(&state.adjacency, user_id);

        let mut best: Option<(u32, &String)> = None;
        for fraud_id in &fraud_ids {
            if let Some(&d) = dist.get(*fraud_id) {
                best = Some(match best {
                    None => (d, *fraud_id),
                    Some((bd, bid)) if d < bd || (d == bd && *fraud_id < bid) => (d, *fraud_id),
                    Some(current) => current,
                });
            }
        }

        let proximity_score = best.map(|(d, _)| 1.0 / (d as f64 + 1.0)).unwrap_or(0.0);
        let neighbors = state.adjacency.get(user_id).cloned().unwrap_or_default();
        let linked_fraud_count = neighbors.iter().filter(|n| fraud_ids.contains(n)).count() as u32;

        let user = &state.users[user_id];
        let mut triggered_rules = Vec::new();
        for rule in state.graph_rules.values() {
            let from_tx = transaction.and_then(|t| t.field(&rule.field1));
            let from_user = user.field(&rule.field1);
            if rule.matches_single(from_tx.as_ref()) || rule.matches_single(from_user.as_ref()) {
                triggered_rules.push(rule.name.clone());
            }
        }

        Ok(AnalyzeResult {
            user_id: user_id.to_string(),
            proximity_score,
            shortest_path_length_to_fraudster: best.map(|(d, _)| d),
            closest_fraudster: best.map(|(_, id)| id.clone()),
            linked_fraud_count,
            total_linked_nodes: neighbors.len() as u32,
            triggered_rules,
        })
    }

    fn bfs_distances(adjacency: &HashMap<String, HashSet<String>>, start: &str) -> HashMap<String, u32> {
        let mut dist = HashMap::new();
        dist.insert(start.to_string(), 0u32);
        let mut queue = VecDeque::new();
        queue.push_back(start.to_string());
        while let Some(current) = queue.pop_front() {
            let d = dist[&current];
            let Some(neighbors) = adjacency.get(&current) else { continue };
            let mut sorted: Vec<&String> = neighbors.iter().collect();
            sorted.sort();
            for n in sorted {
                if !dist.contains_key(n) {
                    dist.insert(n.clone(), d + 1);
                    queue.push_back(n.clone());
                }
            }
        }
        dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskguard_store::InMemoryStore;

    fn user(id: &str, zip: &str, is_fraud: bool) -> User {
        User {
            user_id: id.to_string(),
            full_name: id.to_string(),
            email: format!("{id}@example.com"),
            email_domain: String::new(),
            phone: "0812".to_string(),
            address_zip: zip.to_string(),
            address_city: "Bandung".to_string(),
            address_province: "Jawa Barat".to_string(),
            address_kecamatan: "Coblong".to_string(),
            is_fraud,
        }
    }

    async fn engine_with_users(users: Vec<User>) -> GraphEngine {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let engine = GraphEngine::new(store);
        engine.initialize().await.unwrap();
        for u in users {
            engine.create_user(u).await.unwrap();
        }
        engine
    }

    #[tokio::test]
    async fn test_not_ready_before_initialize() {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let engine = GraphEngine::new(store);
        let err = engine.read_user("U-1").await.unwrap_err();
        assert!(matches!(err, GraphError::NotReady));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_rejected() {
        let engine = engine_with_users(vec![user("U-1", "40123", false)]).await;
        let err = engine.create_user(user("U-1", "40123", false)).await.unwrap_err();
        assert!(matches!(err, GraphError::UserAlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_generate_links_zip_code_heuristic() {
        let engine = engine_with_users(vec![
            user("U-1", "40123", false),
            user("U-2", "40123", false),
            user("U-3", "99999", false),
        ])
        .await;

        let links = engine.generate_links().await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].reasons, vec!["zip_code_match".to_string()]);

        // additive: second call creates nothing new
        let links2 = engine.generate_links().await.unwrap();
        assert!(links2.is_empty());
    }

    #[tokio::test]
    async fn test_cluster_nodes_by_zip() {
        let engine = engine_with_users(vec![
            user("U-1", "1", false),
            user("U-2", "1", false),
            user("U-3", "2", false),
            user("U-4", "2", false),
        ])
        .await;

        let clusters = engine.cluster_nodes().await.unwrap();
        assert_eq!(clusters.len(), 2);
        let mut member_sets: Vec<Vec<String>> = clusters.into_iter().map(|c| c.members).collect();
        member_sets.sort();
        assert_eq!(
            member_sets,
            vec![vec!["U-1".to_string(), "U-2".to_string()], vec!["U-3".to_string(), "U-4".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_delete_user_cascades_links() {
        let engine =
            engine_with_users(vec![user("U-1", "40123", false), user("U-2", "40123", false)]).await;
        engine.generate_links().await.unwrap();
        assert_eq!(engine.get_all_links().await.unwrap().len(), 1);

        engine.delete_user("U-1").await.unwrap();
        assert!(engine.get_all_links().await.unwrap().is_empty());
        assert!(matches!(engine.read_user("U-1").await.unwrap_err(), GraphError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_analyze_proximity_to_fraudster() {
        let engine = engine_with_users(vec![
            user("U-1", "1", false),
            user("U-2", "2", false),
            user("U-3", "3", true),
        ])
        .await;
        engine.create_link(Link {
            source: "U-1".into(),
            target: "U-2".into(),
            weight: 0.5,
            link_type: "manual".into(),
            reasons: vec![],
            rule_ids: vec![],
        }).await.unwrap();
        engine.create_link(Link {
            source: "U-2".into(),
            target: "U-3".into(),
            weight: 0.5,
            link_type: "manual".into(),
            reasons: vec![],
            rule_ids: vec![],
        }).await.unwrap();

        let result = engine.analyze("U-1", None).await.unwrap();
        assert_eq!(result.shortest_path_length_to_fraudster, Some(2));
        assert_eq!(result.closest_fraudster, Some("U-3".to_string()));
        assert!((result.proximity_score - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(result.total_linked_nodes, 1);
        assert_eq!(result.linked_fraud_count, 0);
    }

    #[tokio::test]
    async fn test_delete_graph_rule_cascades_links() {
        let engine = engine_with_users(vec![user("U-1", "1", false), user("U-2", "2", false)]).await;
        let rule = GraphRule {
            graph_rule_id: "GR1".into(),
            name: "same phone".into(),
            description: "same phone number".into(),
            field1: "phone".into(),
            operator: GraphOperator::Equal,
            field2: Some("phone".into()),
            value: None,
        };
        engine.create_graph_rule(rule).await.unwrap();
        let links = engine.generate_links().await.unwrap();
        assert_eq!(links.len(), 1);

        engine.delete_graph_rule("GR1").await.unwrap();
        assert!(engine.get_all_links().await.unwrap().is_empty());
    }
}
