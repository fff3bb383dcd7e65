//! Chain nodes and their resolution.
//!
//! Every clause-method call adds one [`Node`] pointing at its parent. A node
//! never changes after construction except for its memoized [`Context`],
//! which is computed the first time it is asked for by cloning the parent's
//! context and folding in the node's own contribution.
//!
//! ```text
//! Database ── from("users") ── select("id email") ── where_(("name", "Bobby"))
//!   ctx0    ←      ctx1      ←        ctx2        ←          ctx3
//! ```

use crate::arg::Arg;
use crate::clause::{Clause, QueryKind};
use crate::context::{Bind, BindTarget, Context};
use crate::dialect::Dialect;
use crate::error::QueryBuilderError;
use crate::fragment::Fragment;
use crate::messages;
use crate::registry::Registry;
use crate::value::Value;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::trace;

/// One link in a query chain.
pub struct Node {
    parent: Option<Arc<Node>>,
    clause: Arc<dyn Clause>,
    args: Vec<Arg>,
    context: OnceLock<Arc<Context>>,
}

impl Node {
    /// Start a chain.
    pub fn root(clause: Arc<dyn Clause>) -> Arc<Node> {
        Arc::new(Node {
            parent: None,
            clause,
            args: Vec::new(),
            context: OnceLock::new(),
        })
    }

    /// Append a node for `clause` called with `args`.
    pub fn child(self: &Arc<Self>, clause: Arc<dyn Clause>, args: Vec<Arg>) -> Arc<Node> {
        Arc::new(Node {
            parent: Some(Arc::clone(self)),
            clause,
            args,
            context: OnceLock::new(),
        })
    }

    pub fn parent(&self) -> Option<&Arc<Node>> {
        self.parent.as_ref()
    }

    pub fn clause(&self) -> &dyn Clause {
        self.clause.as_ref()
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Number of nodes from the root to here, inclusive.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut cursor = self.parent.as_deref();
        while let Some(node) = cursor {
            depth += 1;
            cursor = node.parent.as_deref();
        }
        depth
    }

    /// The kind of statement started closest to the root, if any.
    pub fn query_kind(&self) -> Option<QueryKind> {
        let mut kind = self.clause.query_kind();
        let mut cursor = self.parent.as_deref();
        while let Some(node) = cursor {
            kind = node.clause.query_kind().or(kind);
            cursor = node.parent.as_deref();
        }
        kind
    }

    /// The fully merged context for this node.
    ///
    /// Unresolved ancestors are resolved root-first and memoized on the way
    /// down, so a second call returns the same `Arc` without re-running any
    /// clause. A node is always resolved against the dialect of the query
    /// that created it. Failed resolutions are not memoized.
    pub fn resolve_chain(&self, dialect: &dyn Dialect) -> Result<Arc<Context>, QueryBuilderError> {
        if let Some(ctx) = self.context.get() {
            return Ok(Arc::clone(ctx));
        }

        let mut pending = vec![self];
        let mut base = Arc::new(Context::new());
        let mut cursor = self.parent.as_deref();
        while let Some(node) = cursor {
            if let Some(ctx) = node.context.get() {
                base = Arc::clone(ctx);
                break;
            }
            pending.push(node);
            cursor = node.parent.as_deref();
        }

        for node in pending.into_iter().rev() {
            let ctx = node.resolve(&base, dialect)?;
            base = Arc::clone(node.context.get_or_init(|| Arc::new(ctx)));
        }
        Ok(base)
    }

    /// Fold this node's contribution into a copy of `parent`.
    pub fn resolve(
        &self,
        parent: &Context,
        dialect: &dyn Dialect,
    ) -> Result<Context, QueryBuilderError> {
        let clause = self.clause.as_ref();
        let mut context = parent.clone();

        let mut link = Link::new(clause, dialect, &mut context);
        clause.resolve_args(&mut link, &self.args)?;
        let fragments = link.into_fragments();

        if let Some(slot) = clause.slot() {
            if clause.replaces_slot() {
                context.replace_slot(slot, fragments);
            } else if !fragments.is_empty() || clause.always_render() {
                context.extend_slot(slot, fragments);
            }
        }

        trace!(
            target: "sqlchain.chain",
            method = clause.method(),
            args = self.args.len(),
            placeholders = context.placeholders(),
            "resolved node"
        );

        context.check_binds()?;
        Ok(context)
    }
}

/// Serialize a resolved context.
///
/// Slots render in ascending build order; absent slots and empty renders
/// are skipped, the rest joined by newlines. Placeholders are numbered last,
/// in the order they appear.
pub fn render(context: &Context, registry: &Registry, dialect: &dyn Dialect) -> String {
    let mut sql = String::new();
    let mut next = 0;
    for (slot, entry) in registry.render_order() {
        let Some(fragments) = context.slot(slot) else {
            continue;
        };
        let fragment = entry.clause.generate_sql(fragments, context);
        if fragment.is_empty() {
            continue;
        }
        if !sql.is_empty() {
            sql.push('\n');
        }
        fragment.render_into(dialect, &mut next, &mut sql);
    }
    sql
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("method", &self.clause.method())
            .field("args", &self.args)
            .field("resolved", &self.context.get().is_some())
            .field("parent", &self.parent.as_ref().map(|p| p.clause.method()))
            .finish()
    }
}

/// What a clause sees while resolving one node.
///
/// Collects the node's fragments and gives access to the dialect, the
/// context being built and the clause's message table.
pub struct Link<'a> {
    clause: &'a dyn Clause,
    dialect: &'a dyn Dialect,
    context: &'a mut Context,
    fragments: Vec<Fragment>,
}

impl<'a> Link<'a> {
    pub fn new(clause: &'a dyn Clause, dialect: &'a dyn Dialect, context: &'a mut Context) -> Self {
        Self {
            clause,
            dialect,
            context,
            fragments: Vec::new(),
        }
    }

    /// Canonical method name of the clause being resolved.
    pub fn method(&self) -> &'static str {
        self.clause.method()
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect
    }

    pub fn context(&self) -> &Context {
        &*self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut *self.context
    }

    /// Add a fragment to this node's contribution.
    pub fn push(&mut self, fragment: impl Into<Fragment>) {
        let fragment = fragment.into();
        if !fragment.is_empty() {
            self.fragments.push(fragment);
        }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }

    pub fn quote(&self, ident: &str) -> String {
        self.dialect.quote(ident)
    }

    pub fn quote_path(&self, path: &str) -> String {
        self.dialect.quote_path(path)
    }

    pub fn quote_table_column(&self, table: Option<&str>, column: &str) -> String {
        self.dialect.quote_table_column(table, column)
    }

    /// Record a bind value for a placeholder already pushed.
    pub fn bind(&mut self, target: BindTarget, value: Value) {
        self.context.bind(target, Bind::Value(value));
    }

    /// Record a placeholder whose value arrives at execution time.
    pub fn defer(&mut self, target: BindTarget) {
        self.context.bind(target, Bind::Deferred);
    }

    /// Build an [`QueryBuilderError::InvalidArgument`] from the message
    /// table entry `tag`. `<method>` is always available.
    pub fn fail(&self, tag: &str, vars: &[(&str, &str)]) -> QueryBuilderError {
        let method = self.method();
        match messages::lookup(method, self.clause.messages(), tag) {
            Ok(template) => {
                let mut all = Vec::with_capacity(vars.len() + 1);
                all.push(("method", method));
                all.extend_from_slice(vars);
                QueryBuilderError::InvalidArgument(messages::format(template, &all))
            }
            Err(err) => err,
        }
    }

    /// `array` error for a list of unexpected length.
    pub fn fail_list(&self, items: &[Arg]) -> QueryBuilderError {
        let n = items.len().to_string();
        self.fail("array", &[("n", n.as_str())])
    }

    /// `object` error naming the keys that were given.
    pub fn fail_object(&self, pairs: &[(String, Arg)]) -> QueryBuilderError {
        let keys = pairs
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        self.fail("object", &[("keys", keys.as_str())])
    }

    /// `arg` error quoting the argument.
    pub fn fail_arg(&self, arg: &Arg) -> QueryBuilderError {
        let arg = arg.to_string();
        self.fail("arg", &[("arg", arg.as_str())])
    }
}
