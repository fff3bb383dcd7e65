//! The build context accumulated along a chain.

use crate::error::QueryBuilderError;
use crate::fragment::Fragment;
use crate::value::Value;
use std::collections::BTreeMap;

/// One entry in a bind list.
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    /// A value known at build time.
    Value(Value),
    /// A placeholder whose value is supplied when the query runs.
    Deferred,
}

/// Which bind list a predicate writes to.
///
/// The lists are kept apart so the final parameter order is always
/// `SET`, then `WHERE`, then `HAVING`, whatever order the calls came in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindTarget {
    Set,
    Where,
    Having,
}

/// Slot fragments, bind lists and sideways state for one point in a chain.
///
/// Each node owns the context produced by folding its own contribution into
/// a clone of its parent's. Parents are never mutated.
#[derive(Debug, Clone, Default)]
pub struct Context {
    slots: BTreeMap<&'static str, Vec<Fragment>>,
    set_values: Vec<Bind>,
    where_values: Vec<Bind>,
    having_values: Vec<Bind>,
    held_values: Vec<Value>,
    placeholders: usize,
    table: Option<String>,
    prefix: Option<String>,
    columns: Vec<String>,
    generated_keys: bool,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragments in `slot`, if the slot is present (possibly empty).
    pub fn slot(&self, slot: &str) -> Option<&[Fragment]> {
        self.slots.get(slot).map(Vec::as_slice)
    }

    pub fn has_slot(&self, slot: &str) -> bool {
        self.slots.contains_key(slot)
    }

    /// Append fragments to `slot`, creating it if needed.
    ///
    /// Passing no fragments still marks the slot present.
    pub fn extend_slot(&mut self, slot: &'static str, fragments: Vec<Fragment>) {
        for fragment in &fragments {
            self.placeholders += fragment.param_count();
        }
        self.slots.entry(slot).or_default().extend(fragments);
    }

    /// Replace the fragments in `slot`. Used by clauses where the last call
    /// wins; their fragments carry no placeholders.
    pub fn replace_slot(&mut self, slot: &'static str, fragments: Vec<Fragment>) {
        for fragment in &fragments {
            self.placeholders += fragment.param_count();
        }
        self.slots.insert(slot, fragments);
    }

    /// Drop `slot` entirely. Only for slots whose fragments carry no
    /// placeholders.
    pub fn remove_slot(&mut self, slot: &str) {
        self.slots.remove(slot);
    }

    pub fn set_values(&self) -> &[Bind] {
        &self.set_values
    }

    pub fn where_values(&self) -> &[Bind] {
        &self.where_values
    }

    pub fn having_values(&self) -> &[Bind] {
        &self.having_values
    }

    fn list_mut(&mut self, target: BindTarget) -> &mut Vec<Bind> {
        match target {
            BindTarget::Set => &mut self.set_values,
            BindTarget::Where => &mut self.where_values,
            BindTarget::Having => &mut self.having_values,
        }
    }

    /// Push a bind entry onto `target`.
    pub fn bind(&mut self, target: BindTarget, bind: Bind) {
        self.list_mut(target).push(bind);
    }

    /// Fill the first deferred entry of `target` with `value`, or append it.
    pub fn fill(&mut self, target: BindTarget, value: Value) {
        let list = self.list_mut(target);
        match list.iter_mut().find(|b| matches!(b, Bind::Deferred)) {
            Some(slot) => *slot = Bind::Value(value),
            None => list.push(Bind::Value(value)),
        }
    }

    /// Keep `value` for placeholders a later `into` will emit.
    pub fn hold(&mut self, value: Value) {
        self.held_values.push(value);
    }

    /// Values held so far, in call order.
    pub fn held_values(&self) -> &[Value] {
        &self.held_values
    }

    pub fn take_held(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.held_values)
    }

    fn binds(&self) -> impl Iterator<Item = &Bind> {
        self.set_values
            .iter()
            .chain(&self.where_values)
            .chain(&self.having_values)
    }

    /// Total bind entries, literal and deferred.
    pub fn bind_count(&self) -> usize {
        self.set_values.len() + self.where_values.len() + self.having_values.len()
    }

    /// Bind entries still waiting for an execution-time value.
    pub fn deferred_count(&self) -> usize {
        self.binds().filter(|b| matches!(b, Bind::Deferred)).count()
    }

    /// Placeholder tokens emitted so far along the chain.
    pub fn placeholders(&self) -> usize {
        self.placeholders
    }

    /// Check that every placeholder has exactly one bind entry.
    pub fn check_binds(&self) -> Result<(), QueryBuilderError> {
        if self.placeholders != self.bind_count() {
            return Err(QueryBuilderError::BindMismatch {
                placeholders: self.placeholders,
                values: self.bind_count(),
            });
        }
        Ok(())
    }

    /// `set ++ where ++ having ++ extra`.
    ///
    /// Deferred entries take values from the front of `extra`; whatever is
    /// left over is appended. Values still held for a missing `into` follow
    /// the `set` list.
    pub fn all_values(&self, extra: &[Value]) -> Result<Vec<Value>, QueryBuilderError> {
        let expected = self.deferred_count();
        if extra.len() < expected {
            return Err(QueryBuilderError::MissingValues {
                expected,
                got: extra.len(),
            });
        }
        let mut extra = extra.iter();
        let mut out = Vec::with_capacity(self.bind_count() + self.held_values.len() + extra.len());
        let mut take = |out: &mut Vec<Value>, binds: &[Bind]| {
            for bind in binds {
                match bind {
                    Bind::Value(v) => out.push(v.clone()),
                    Bind::Deferred => {
                        if let Some(v) = extra.next() {
                            out.push(v.clone());
                        }
                    }
                }
            }
        };
        take(&mut out, &self.set_values);
        out.extend(self.held_values.iter().cloned());
        take(&mut out, &self.where_values);
        take(&mut out, &self.having_values);
        out.extend(extra.cloned());
        Ok(out)
    }

    /// Table that unqualified columns default to.
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn set_table(&mut self, table: impl Into<String>) {
        self.table = Some(table.into());
    }

    /// Alias prefix applied by `columns`.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = Some(prefix.into());
    }

    /// Column names recorded by `insert`.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn add_columns(&mut self, columns: impl IntoIterator<Item = String>) {
        self.columns.extend(columns);
    }

    /// Whether the statement should hand back generated keys.
    pub fn generated_keys(&self) -> bool {
        self.generated_keys
    }

    pub fn set_generated_keys(&mut self, on: bool) {
        self.generated_keys = on;
    }
}
