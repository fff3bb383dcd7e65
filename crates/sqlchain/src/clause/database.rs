use super::Clause;
use crate::arg::Arg;
use crate::chain::Link;
use crate::error::QueryBuilderError;

/// Root of every chain. Contributes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Database;

impl Clause for Database {
    fn method(&self) -> &'static str {
        "database"
    }

    fn resolve_args(&self, _link: &mut Link<'_>, _args: &[Arg]) -> Result<(), QueryBuilderError> {
        Ok(())
    }
}
