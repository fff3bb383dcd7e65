//! `LIMIT`, `OFFSET` and `range`.
//!
//! Both render literal integers, not placeholders, and the last call wins.

use super::{Clause, field, only_keys};
use crate::arg::Arg;
use crate::chain::Link;
use crate::error::QueryBuilderError;
use crate::fragment::Fragment;
use crate::value::Value;

const LIMIT_SLOT: &str = "limit";
const OFFSET_SLOT: &str = "offset";

/// A non-negative integer from a number or numeric string.
fn count(link: &Link<'_>, arg: &Arg) -> Result<u64, QueryBuilderError> {
    arg.as_i64()
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| {
            let arg = arg.to_string();
            link.fail("value", &[("arg", arg.as_str())])
        })
}

fn resolve_count(link: &mut Link<'_>, arg: &Arg) -> Result<(), QueryBuilderError> {
    match arg {
        Arg::Null => Ok(()),
        Arg::Raw(sql) => {
            link.push(sql.as_str());
            Ok(())
        }
        Arg::Func(f) => f(link),
        other => {
            let n = count(link, other)?;
            link.push(n.to_string());
            Ok(())
        }
    }
}

/// `LIMIT n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Limit;

impl Clause for Limit {
    fn method(&self) -> &'static str {
        "limit"
    }

    fn slot(&self) -> Option<&'static str> {
        Some(LIMIT_SLOT)
    }

    fn build_order(&self) -> Option<u32> {
        Some(90)
    }

    fn keyword(&self) -> &'static str {
        "LIMIT"
    }

    fn replaces_slot(&self) -> bool {
        true
    }

    fn resolve_arg(&self, link: &mut Link<'_>, arg: &Arg) -> Result<(), QueryBuilderError> {
        resolve_count(link, arg)
    }
}

/// `OFFSET n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offset;

impl Clause for Offset {
    fn method(&self) -> &'static str {
        "offset"
    }

    fn slot(&self) -> Option<&'static str> {
        Some(OFFSET_SLOT)
    }

    fn build_order(&self) -> Option<u32> {
        Some(95)
    }

    fn keyword(&self) -> &'static str {
        "OFFSET"
    }

    fn replaces_slot(&self) -> bool {
        true
    }

    fn resolve_arg(&self, link: &mut Link<'_>, arg: &Arg) -> Result<(), QueryBuilderError> {
        resolve_count(link, arg)
    }
}

/// Row range written as `LIMIT` / `OFFSET`.
///
/// `range(from, to)` is inclusive: `range(10, 19)` is `LIMIT 10 OFFSET 10`.
/// `range(from)` is an offset with no limit. Each call replaces the whole
/// window left by earlier `limit`, `offset` or `range` calls. An object may
/// give `from`, `to`, `limit` and `offset`; explicit `limit` / `offset` win.
#[derive(Debug, Clone, Copy, Default)]
pub struct Range;

impl Range {
    fn span(
        &self,
        link: &mut Link<'_>,
        from: &Arg,
        to: Option<&Arg>,
    ) -> Result<(), QueryBuilderError> {
        let from = count(link, from)?;
        if let Some(to) = to {
            let end = count(link, to)?;
            if end < from {
                let arg = format!("{from}..{end}");
                return Err(link.fail("value", &[("arg", arg.as_str())]));
            }
            set(link, LIMIT_SLOT, end - from + 1);
        }
        set(link, OFFSET_SLOT, from);
        Ok(())
    }
}

fn set(link: &mut Link<'_>, slot: &'static str, n: u64) {
    link.context_mut()
        .replace_slot(slot, vec![Fragment::new(n.to_string())]);
}

impl Clause for Range {
    fn method(&self) -> &'static str {
        "range"
    }

    fn resolve_args(&self, link: &mut Link<'_>, args: &[Arg]) -> Result<(), QueryBuilderError> {
        if !args.is_empty() {
            let ctx = link.context_mut();
            ctx.remove_slot(LIMIT_SLOT);
            ctx.remove_slot(OFFSET_SLOT);
        }
        match args {
            [] => Ok(()),
            [from, to] => self.span(link, from, Some(to)),
            [arg] => self.resolve_arg(link, arg),
            _ => Err(link.fail_list(args)),
        }
    }

    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> Result<(), QueryBuilderError> {
        self.span(link, &Arg::Text(s.to_string()), None)
    }

    fn resolve_value(&self, link: &mut Link<'_>, v: &Value) -> Result<(), QueryBuilderError> {
        self.span(link, &Arg::Value(v.clone()), None)
    }

    fn resolve_list(&self, link: &mut Link<'_>, items: &[Arg]) -> Result<(), QueryBuilderError> {
        match items {
            [from] => self.span(link, from, None),
            [from, to] => self.span(link, from, Some(to)),
            _ => Err(link.fail_list(items)),
        }
    }

    fn resolve_object(
        &self,
        link: &mut Link<'_>,
        pairs: &[(String, Arg)],
    ) -> Result<(), QueryBuilderError> {
        if !only_keys(pairs, &["from", "to", "limit", "offset"]) || pairs.is_empty() {
            return Err(link.fail_object(pairs));
        }
        if let Some(from) = field(pairs, "from") {
            self.span(link, from, field(pairs, "to"))?;
        } else if field(pairs, "to").is_some() {
            return Err(link.fail_object(pairs));
        }
        if let Some(limit) = field(pairs, "limit") {
            let n = count(link, limit)?;
            set(link, LIMIT_SLOT, n);
        }
        if let Some(offset) = field(pairs, "offset") {
            let n = count(link, offset)?;
            set(link, OFFSET_SLOT, n);
        }
        Ok(())
    }
}
