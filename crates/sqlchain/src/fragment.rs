//! SQL fragments with placeholder tokens.
//!
//! A [`Fragment`] stores SQL text and placeholder tokens separately. Tokens
//! are numbered only when the whole statement is rendered, in serialization
//! order, so `$n` indices always line up with the final bind list no matter
//! in which order the clauses were called.

use crate::dialect::Dialect;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Raw(String),
    Param,
}

/// Quoted SQL text plus placeholder tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct Fragment {
    parts: Vec<Part>,
}

impl Fragment {
    /// Create a fragment holding `sql`.
    pub fn new(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        if sql.is_empty() {
            return Self::empty();
        }
        Self {
            parts: vec![Part::Raw(sql)],
        }
    }

    /// Create an empty fragment.
    pub fn empty() -> Self {
        Self { parts: Vec::new() }
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }
        match self.parts.last_mut() {
            Some(Part::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(Part::Raw(sql.to_string())),
        }
        self
    }

    /// Append one placeholder token.
    pub fn push_param(&mut self) -> &mut Self {
        self.parts.push(Part::Param);
        self
    }

    /// Append `count` placeholder tokens separated by `sep`.
    pub fn push_params(&mut self, count: usize, sep: &str) -> &mut Self {
        for i in 0..count {
            if i > 0 {
                self.push(sep);
            }
            self.push_param();
        }
        self
    }

    /// Append another fragment.
    pub fn push_fragment(&mut self, other: &Fragment) -> &mut Self {
        for part in &other.parts {
            match part {
                Part::Raw(s) => {
                    self.push(s);
                }
                Part::Param => {
                    self.push_param();
                }
            }
        }
        self
    }

    /// Join fragments with `joint`.
    pub fn join(fragments: &[Fragment], joint: &str) -> Fragment {
        let mut out = Fragment::empty();
        for (i, fragment) in fragments.iter().enumerate() {
            if i > 0 {
                out.push(joint);
            }
            out.push_fragment(fragment);
        }
        out
    }

    /// Number of placeholder tokens.
    pub fn param_count(&self) -> usize {
        self.parts.iter().filter(|p| matches!(p, Part::Param)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Render into `out`, numbering placeholders from `*next + 1`.
    pub fn render_into(&self, dialect: &dyn Dialect, next: &mut usize, out: &mut String) {
        for part in &self.parts {
            match part {
                Part::Raw(s) => out.push_str(s),
                Part::Param => {
                    *next += 1;
                    out.push_str(&dialect.format_placeholder(*next));
                }
            }
        }
    }

    /// Render on its own, numbering placeholders from 1.
    pub fn to_sql(&self, dialect: &dyn Dialect) -> String {
        let mut out = String::new();
        let mut next = 0;
        self.render_into(dialect, &mut next, &mut out);
        out
    }
}

impl From<&str> for Fragment {
    fn from(s: &str) -> Self {
        Fragment::new(s)
    }
}

impl From<String> for Fragment {
    fn from(s: String) -> Self {
        Fragment::new(s)
    }
}
