//! Condition evaluation for dialogue nodes.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named predicate implemented outside the dialogue engine.
///
/// The engine never looks inside `params`; it hands the whole leaf to the
/// predicate registered under `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafCondition {
    /// Registry key of the predicate.
    pub name: String,
    /// Free-form arguments for the predicate.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
}

impl LeafCondition {
    /// Create a leaf with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Map::new(),
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Get a string parameter.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }
}

/// A tree of predicates gating a dialogue node.
///
/// Each condition is owned by exactly one parent, so trees never share or
/// cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// An externally implemented predicate.
    Leaf(LeafCondition),
    /// True if at least one child is true. An empty group is false.
    Or(Vec<Condition>),
    /// True if every child is true. An empty group is true.
    And(Vec<Condition>),
}

impl Condition {
    /// Shorthand for a parameterless leaf.
    pub fn leaf(name: impl Into<String>) -> Self {
        Condition::Leaf(LeafCondition::new(name))
    }

    /// Evaluate the condition for the given participants.
    ///
    /// Children are evaluated in order and evaluation stops at the first
    /// child that decides the result.
    pub fn is_met<P: ?Sized, N: ?Sized>(
        &self,
        registry: &ConditionRegistry<P, N>,
        player: &P,
        npc: &N,
    ) -> bool {
        match self {
            Condition::Leaf(leaf) => registry.evaluate_leaf(leaf, player, npc),
            Condition::Or(children) => children.iter().any(|c| c.is_met(registry, player, npc)),
            Condition::And(children) => children.iter().all(|c| c.is_met(registry, player, npc)),
        }
    }
}

/// Node-level evaluation: every condition must hold. Empty is true.
pub fn conditions_met<P: ?Sized, N: ?Sized>(
    conditions: &[Condition],
    registry: &ConditionRegistry<P, N>,
    player: &P,
    npc: &N,
) -> bool {
    conditions.iter().all(|c| c.is_met(registry, player, npc))
}

/// Implementation of a leaf condition.
///
/// `player` is the participant considering the line; `npc` is the other
/// party of the conversation.
pub trait LeafPredicate<P: ?Sized, N: ?Sized> {
    /// Decide whether the leaf holds.
    fn is_met(&self, leaf: &LeafCondition, player: &P, npc: &N) -> bool;
}

impl<P: ?Sized, N: ?Sized, F> LeafPredicate<P, N> for F
where
    F: Fn(&LeafCondition, &P, &N) -> bool,
{
    fn is_met(&self, leaf: &LeafCondition, player: &P, npc: &N) -> bool {
        self(leaf, player, npc)
    }
}

/// Leaf predicates by name.
pub struct ConditionRegistry<P: ?Sized, N: ?Sized> {
    predicates: HashMap<String, Box<dyn LeafPredicate<P, N>>>,
}

impl<P: ?Sized, N: ?Sized> ConditionRegistry<P, N> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            predicates: HashMap::new(),
        }
    }

    /// Register a closure under `name`, replacing any previous predicate.
    pub fn register<F>(&mut self, name: impl Into<String>, predicate: F) -> &mut Self
    where
        F: Fn(&LeafCondition, &P, &N) -> bool + 'static,
    {
        self.predicates.insert(name.into(), Box::new(predicate));
        self
    }

    /// Register a predicate type under `name`, replacing any previous one.
    pub fn register_predicate<T>(&mut self, name: impl Into<String>, predicate: T) -> &mut Self
    where
        T: LeafPredicate<P, N> + 'static,
    {
        self.predicates.insert(name.into(), Box::new(predicate));
        self
    }

    /// Check if a predicate is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// Evaluate one leaf. Unregistered leaves are never met.
    pub fn evaluate_leaf(&self, leaf: &LeafCondition, player: &P, npc: &N) -> bool {
        match self.predicates.get(&leaf.name) {
            Some(predicate) => predicate.is_met(leaf, player, npc),
            None => {
                tracing::warn!(condition = %leaf.name, "no predicate registered for condition");
                false
            }
        }
    }
}

impl<P: ?Sized, N: ?Sized> Default for ConditionRegistry<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized, N: ?Sized> fmt::Debug for ConditionRegistry<P, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.predicates.keys().collect();
        names.sort();
        f.debug_struct("ConditionRegistry")
            .field("predicates", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashSet;
    use std::rc::Rc;

    use proptest::prelude::*;

    #[derive(Default)]
    struct Player {
        flags: HashSet<String>,
    }

    struct Npc;

    fn registry() -> ConditionRegistry<Player, Npc> {
        let mut registry = ConditionRegistry::new();
        registry
            .register("always", |_: &LeafCondition, _: &Player, _: &Npc| true)
            .register("never", |_: &LeafCondition, _: &Player, _: &Npc| false)
            .register("flag", |leaf: &LeafCondition, player: &Player, _: &Npc| {
                leaf.param_str("name")
                    .is_some_and(|name| player.flags.contains(name))
            });
        registry
    }

    fn flag(name: &str) -> Condition {
        Condition::Leaf(LeafCondition::new("flag").with_param("name", name))
    }

    #[test]
    fn leaf_dispatches_by_name() {
        let registry = registry();
        let mut player = Player::default();

        assert!(Condition::leaf("always").is_met(&registry, &player, &Npc));
        assert!(!Condition::leaf("never").is_met(&registry, &player, &Npc));

        assert!(!flag("met_smith").is_met(&registry, &player, &Npc));
        player.flags.insert("met_smith".to_string());
        assert!(flag("met_smith").is_met(&registry, &player, &Npc));
    }

    #[test]
    fn unregistered_leaf_is_not_met() {
        let registry = registry();
        let cond = Condition::leaf("has_gold");
        assert!(!cond.is_met(&registry, &Player::default(), &Npc));
    }

    #[test]
    fn empty_groups() {
        let registry = registry();
        let player = Player::default();
        assert!(Condition::And(Vec::new()).is_met(&registry, &player, &Npc));
        assert!(!Condition::Or(Vec::new()).is_met(&registry, &player, &Npc));
    }

    #[test]
    fn nested_groups() {
        let registry = registry();
        let mut player = Player::default();
        player.flags.insert("b".to_string());

        // a OR (b AND always)
        let cond = Condition::Or(vec![
            flag("a"),
            Condition::And(vec![flag("b"), Condition::leaf("always")]),
        ]);
        assert!(cond.is_met(&registry, &player, &Npc));

        player.flags.clear();
        assert!(!cond.is_met(&registry, &player, &Npc));
    }

    #[test]
    fn groups_short_circuit() {
        let calls = Rc::new(Cell::new(0));
        let mut registry = registry();
        let counter = Rc::clone(&calls);
        registry.register("counted", move |_: &LeafCondition, _: &Player, _: &Npc| {
            counter.set(counter.get() + 1);
            true
        });
        let player = Player::default();

        let or = Condition::Or(vec![Condition::leaf("always"), Condition::leaf("counted")]);
        assert!(or.is_met(&registry, &player, &Npc));
        assert_eq!(calls.get(), 0);

        let and = Condition::And(vec![Condition::leaf("never"), Condition::leaf("counted")]);
        assert!(!and.is_met(&registry, &player, &Npc));
        assert_eq!(calls.get(), 0);

        let and = Condition::And(vec![Condition::leaf("counted"), Condition::leaf("counted")]);
        assert!(and.is_met(&registry, &player, &Npc));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn node_level_and() {
        let registry = registry();
        let player = Player::default();
        assert!(conditions_met(&[], &registry, &player, &Npc));
        assert!(conditions_met(
            &[Condition::leaf("always"), Condition::leaf("always")],
            &registry,
            &player,
            &Npc
        ));
        assert!(!conditions_met(
            &[Condition::leaf("always"), Condition::leaf("never")],
            &registry,
            &player,
            &Npc
        ));
    }

    #[test]
    fn condition_json_shape() {
        let cond = Condition::Or(vec![flag("a"), Condition::And(Vec::new())]);
        let json = serde_json::to_value(&cond).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "or": [
                    { "leaf": { "name": "flag", "params": { "name": "a" } } },
                    { "and": [] }
                ]
            })
        );
        let back: Condition = serde_json::from_value(json).unwrap();
        assert_eq!(back, cond);
    }

    fn leaves(values: &[bool]) -> Vec<Condition> {
        values
            .iter()
            .map(|v| Condition::leaf(if *v { "always" } else { "never" }))
            .collect()
    }

    proptest! {
        #[test]
        fn and_is_all_or_is_any(values in proptest::collection::vec(any::<bool>(), 0..8)) {
            let registry = registry();
            let player = Player::default();
            let and = Condition::And(leaves(&values));
            let or = Condition::Or(leaves(&values));
            prop_assert_eq!(and.is_met(&registry, &player, &Npc), values.iter().all(|v| *v));
            prop_assert_eq!(or.is_met(&registry, &player, &Npc), values.iter().any(|v| *v));
        }
    }
}
