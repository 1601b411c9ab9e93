//! Priority-ordered SQL generator registry
//!
//! Every statement kind maps to a list of candidate generators sorted by
//! descending priority. A generator bound to a dialect only applies when
//! the target dialect matches; unbound generators apply everywhere. The
//! first applicable generator produces the SQL.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

use sr_core::{ChangeLogContext, Dialect, DialectTag};

use crate::error::{SqlError, SqlResult};
use crate::sql::Sql;
use crate::statement::{Statement, StatementKind};
use crate::{standard, starrocks};

/// Renders a statement into zero or more SQL statements.
pub type GenerateFn = fn(&Statement, &GeneratorContext<'_>) -> SqlResult<Vec<Sql>>;

/// Inputs every generator receives besides the statement itself.
#[derive(Clone, Copy)]
pub struct GeneratorContext<'a> {
    pub dialect: &'a dyn Dialect,
    pub changelog: &'a ChangeLogContext,
}

impl<'a> GeneratorContext<'a> {
    pub fn new(dialect: &'a dyn Dialect, changelog: &'a ChangeLogContext) -> Self {
        Self { dialect, changelog }
    }

    pub fn changelog_table(&self) -> String {
        self.dialect
            .escape_table_name(&self.changelog.schema, &self.changelog.changelog_table)
    }

    pub fn lock_table(&self) -> String {
        self.dialect
            .escape_table_name(&self.changelog.schema, &self.changelog.lock_table)
    }
}

impl fmt::Debug for GeneratorContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorContext")
            .field("dialect", &self.dialect.tag())
            .field("changelog", self.changelog)
            .finish()
    }
}

/// One registered generator
#[derive(Clone, Copy)]
pub struct Generator {
    pub name: &'static str,
    pub kind: StatementKind,
    /// `None` applies to every dialect
    pub dialect: Option<DialectTag>,
    pub priority: i32,
    pub generate: GenerateFn,
}

impl Generator {
    /// Whether this generator may render statements for `dialect`
    pub fn supports(&self, dialect: DialectTag) -> bool {
        self.dialect.map_or(true, |d| d == dialect)
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("dialect", &self.dialect)
            .field("priority", &self.priority)
            .finish()
    }
}

/// Generators keyed by statement kind
#[derive(Debug, Clone, Default)]
pub struct GeneratorRegistry {
    generators: HashMap<StatementKind, Vec<Generator>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the generic MySQL generators only
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for generator in standard::generators() {
            registry.register(generator);
        }
        registry
    }

    /// Generic generators plus the StarRocks overrides
    pub fn with_starrocks() -> Self {
        let mut registry = Self::standard();
        for generator in starrocks::generators() {
            registry.register(generator);
        }
        registry
    }

    /// Add a generator. Candidates stay sorted by descending priority;
    /// equal priorities keep registration order.
    pub fn register(&mut self, generator: Generator) {
        let candidates = self.generators.entry(generator.kind).or_default();
        candidates.push(generator);
        candidates.sort_by_key(|g| Reverse(g.priority));
    }

    /// Candidates for `kind`, highest priority first
    pub fn generators(&self, kind: StatementKind) -> &[Generator] {
        self.generators.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// The generator that would render `kind` for `dialect`
    pub fn select(&self, kind: StatementKind, dialect: DialectTag) -> Option<&Generator> {
        self.generators(kind).iter().find(|g| g.supports(dialect))
    }

    pub fn supports(&self, kind: StatementKind, dialect: DialectTag) -> bool {
        self.select(kind, dialect).is_some()
    }

    /// Render `statement` with the highest-priority applicable generator.
    pub fn generate(
        &self,
        statement: &Statement,
        ctx: &GeneratorContext<'_>,
    ) -> SqlResult<Vec<Sql>> {
        let kind = statement.kind();
        let dialect = ctx.dialect.tag();
        let generator = self
            .select(kind, dialect)
            .ok_or(SqlError::NoGenerator { kind, dialect })?;

        log::debug!(
            "Generating {} for {} with {} (priority {})",
            kind,
            dialect,
            generator.name,
            generator.priority
        );
        (generator.generate)(statement, ctx)
    }
}

/// Error for a generator handed a statement it was not registered for.
pub(crate) fn mismatch(expected: StatementKind, statement: &Statement) -> SqlError {
    SqlError::StatementMismatch {
        expected,
        found: statement.kind(),
    }
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
