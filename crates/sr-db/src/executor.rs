//! Statement executor
//!
//! Resolves statements to SQL through the generator registry and runs
//! the fragments one after another on the database. No transaction is
//! opened; a failure part-way leaves earlier fragments applied.

use std::sync::Arc;

use sr_core::config::redact_url;
use sr_core::dialect::builtin_dialects;
use sr_core::{detect_dialect, ChangeLogContext, Config, DatabaseConnection, Dialect};
use sr_sql::{GeneratorContext, GeneratorRegistry, Sql, Statement};

use crate::error::{DbError, DbResult};
use crate::traits::{Database, Rows};

/// Runs generated SQL against one database for one migration run
pub struct Executor {
    db: Arc<dyn Database>,
    registry: GeneratorRegistry,
    dialect: &'static dyn Dialect,
    changelog: ChangeLogContext,
}

impl Executor {
    /// Executor using every built-in generator
    pub fn new(
        db: Arc<dyn Database>,
        dialect: &'static dyn Dialect,
        changelog: ChangeLogContext,
    ) -> Self {
        Self::with_registry(db, dialect, changelog, GeneratorRegistry::with_starrocks())
    }

    pub fn with_registry(
        db: Arc<dyn Database>,
        dialect: &'static dyn Dialect,
        changelog: ChangeLogContext,
        registry: GeneratorRegistry,
    ) -> Self {
        Self {
            db,
            registry,
            dialect,
            changelog,
        }
    }

    /// Executor for whichever built-in dialect recognises `db`
    pub fn detect(db: Arc<dyn Database>, changelog: ChangeLogContext) -> DbResult<Self> {
        let dialect = detect_dialect(db.connection(), &builtin_dialects()).ok_or_else(|| {
            DbError::UnsupportedDatabase(
                db.connection()
                    .url()
                    .map(|url| redact_url(&url))
                    .unwrap_or_else(|| db.db_type().to_string()),
            )
        })?;
        Ok(Self::new(db, dialect, changelog))
    }

    /// Executor configured from `config`; a configured dialect skips detection
    pub fn from_config(db: Arc<dyn Database>, config: &Config) -> DbResult<Self> {
        let changelog = config.changelog_context()?;
        match config.dialect {
            Some(tag) => Ok(Self::new(db, tag.dialect(), changelog)),
            None => Self::detect(db, changelog),
        }
    }

    pub fn db(&self) -> &dyn Database {
        self.db.as_ref()
    }

    pub fn dialect(&self) -> &'static dyn Dialect {
        self.dialect
    }

    pub fn changelog(&self) -> &ChangeLogContext {
        &self.changelog
    }

    pub fn context(&self) -> GeneratorContext<'_> {
        GeneratorContext::new(self.dialect, &self.changelog)
    }

    /// SQL the registry produces for `statement`
    pub fn generate(&self, statement: &Statement) -> DbResult<Vec<Sql>> {
        Ok(self.registry.generate(statement, &self.context())?)
    }

    /// Run every fragment of `statement` in order; returns total affected rows
    pub async fn execute(&self, statement: &Statement) -> DbResult<u64> {
        let mut affected = 0;
        for sql in self.generate(statement)? {
            log::debug!("Executing {}: {}", statement.kind(), sql);
            affected += self.db.execute(sql.text()).await?;
        }
        Ok(affected)
    }

    /// Run a statement that renders to exactly one query
    pub async fn query(&self, statement: &Statement) -> DbResult<Rows> {
        let mut fragments = self.generate(statement)?;
        if fragments.len() != 1 {
            return Err(DbError::Internal(format!(
                "{} rendered {} statements, expected one query",
                statement.kind(),
                fragments.len()
            )));
        }
        let sql = fragments.remove(0);
        log::debug!("Querying {}: {}", statement.kind(), sql);
        self.db.query_rows(sql.text()).await
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
