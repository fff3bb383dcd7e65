//! Method-name registry and serialization order.
//!
//! A [`Registry`] maps chain method names (and their aliases) to clauses and
//! records, per slot, which clause renders it and at what rank. It is built
//! once, then shared read-only behind an `Arc` by every query rooted on it.
//!
//! ```ignore
//! let mut registry = Registry::standard();
//! registry.register(Window);
//! let db = Query::with_registry(Arc::new(registry), Postgres);
//! ```

use crate::clause::{
    Clause, Columns, Database, Delete, FromClause, Group, Having, Insert, IntoClause, Join,
    Limit, Offset, Order, Prefix, Range, Returning, Select, Set, Table, Update, Values, Where, With,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// A slot's renderer and its rank.
#[derive(Clone)]
pub struct SlotEntry {
    pub order: u32,
    pub clause: Arc<dyn Clause>,
}

/// Method and slot tables.
#[derive(Clone, Default)]
pub struct Registry {
    methods: HashMap<String, Arc<dyn Clause>>,
    slots: HashMap<&'static str, SlotEntry>,
}

static STANDARD: LazyLock<Arc<Registry>> = LazyLock::new(|| Arc::new(Registry::standard()));

impl Registry {
    /// An empty registry. Queries need at least [`Database`] registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// All built-in clauses.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry
            .register(Database)
            .register(With)
            .register(Update)
            .register(Insert)
            .register(Delete)
            .register(Select)
            .register(Columns)
            .register(IntoClause)
            .register(Values)
            .register(FromClause)
            .register(Table)
            .register(Prefix)
            .register(Join)
            .register(Set)
            .register(Where)
            .register(Group)
            .register(Having)
            .register(Order)
            .register(Limit)
            .register(Offset)
            .register(Range)
            .register(Returning);
        registry
    }

    /// The process-wide standard registry, built on first use.
    pub fn shared_standard() -> Arc<Registry> {
        Arc::clone(&STANDARD)
    }

    /// Register `clause` under its method name and aliases.
    ///
    /// A clause with both a slot and a build order also becomes that slot's
    /// renderer, replacing any earlier one.
    pub fn register<C: Clause>(&mut self, clause: C) -> &mut Self {
        self.register_arc(Arc::new(clause))
    }

    pub fn register_arc(&mut self, clause: Arc<dyn Clause>) -> &mut Self {
        for name in std::iter::once(clause.method()).chain(clause.aliases().iter().copied()) {
            self.methods.insert(name.to_string(), Arc::clone(&clause));
        }
        if let (Some(slot), Some(order)) = (clause.slot(), clause.build_order()) {
            self.slots.insert(slot, SlotEntry { order, clause });
        }
        self
    }

    /// Clause registered under `method`.
    pub fn lookup(&self, method: &str) -> Option<Arc<dyn Clause>> {
        self.methods.get(method).cloned()
    }

    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Renderable slots, lowest build order first.
    pub fn render_order(&self) -> Vec<(&'static str, &SlotEntry)> {
        let mut entries: Vec<_> = self.slots.iter().map(|(slot, e)| (*slot, e)).collect();
        entries.sort_by_key(|(slot, e)| (e.order, *slot));
        entries
    }

    /// The root clause for new chains.
    pub(crate) fn root(&self) -> Arc<dyn Clause> {
        self.lookup("database")
            .unwrap_or_else(|| Arc::new(Database))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        methods.sort_unstable();
        let order: Vec<(&str, u32)> = self
            .render_order()
            .into_iter()
            .map(|(slot, e)| (slot, e.order))
            .collect();
        f.debug_struct("Registry")
            .field("methods", &methods)
            .field("slots", &order)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_render_order() {
        let registry = Registry::standard();
        let slots: Vec<&str> = registry.render_order().into_iter().map(|(s, _)| s).collect();
        assert_eq!(
            slots,
            vec![
                "with", "update", "insert", "delete", "select", "into", "from", "join", "set",
                "where", "group", "having", "order", "limit", "offset", "returning"
            ]
        );
    }

    #[test]
    fn aliases_resolve_to_the_same_clause() {
        let registry = Registry::standard();
        for (alias, method) in [("group_by", "group"), ("groupBy", "group"), ("orderBy", "order")] {
            assert_eq!(registry.lookup(alias).map(|c| c.method()), Some(method));
        }
        assert!(registry.lookup("frobnicate").is_none());
    }

    #[test]
    fn columns_does_not_take_over_select_slot() {
        let registry = Registry::standard();
        let (_, entry) = registry
            .render_order()
            .into_iter()
            .find(|(slot, _)| *slot == "select")
            .unwrap();
        assert_eq!(entry.clause.method(), "select");
        assert_eq!(entry.order, 20);
    }

    #[test]
    fn later_registration_replaces_slot_renderer() {
        #[derive(Debug)]
        struct LoudWhere;
        impl Clause for LoudWhere {
            fn method(&self) -> &'static str {
                "loud_where"
            }
            fn slot(&self) -> Option<&'static str> {
                Some("where")
            }
            fn build_order(&self) -> Option<u32> {
                Some(55)
            }
        }

        let mut registry = Registry::standard();
        registry.register(LoudWhere);
        let (_, entry) = registry
            .render_order()
            .into_iter()
            .find(|(slot, _)| *slot == "where")
            .unwrap();
        assert_eq!(entry.clause.method(), "loud_where");
        assert!(registry.contains("where"));
    }
}
