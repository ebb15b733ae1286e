/// Kind of SQL operation a query performs.
///
/// The kind decides the shape of the result: row-returning commands always
/// yield an ordered (possibly empty) row list, data-modification commands
/// yield no rows at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Command {
    /// Generic statement, treated as row-returning.
    #[default]
    Execute,
    Select,
    Insert,
    Update,
    Delete,
    /// Schema changes (CREATE, DROP, ALTER).
    Ddl,
}

impl Command {
    #[must_use]
    pub fn returns_rows(self) -> bool {
        matches!(self, Command::Execute | Command::Select)
    }
}

/// Opaque token for a statement prepared on one specific connection.
///
/// Tokens are only meaningful to the connection that issued them and become
/// unusable once the statement is closed or the connection disconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatementRef {
    pub(crate) connection: u64,
    pub(crate) statement: u64,
}

/// A single SQL operation, optionally bound to a prepared statement.
///
/// ```rust
/// use sqlite_middleware::prelude::*;
///
/// let update = Query::new("UPDATE users SET name = ?1 WHERE id = ?2").with_command(Command::Update);
/// assert_eq!(update.command(), Command::Update);
/// assert!(!update.is_prepared());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    statement: String,
    command: Option<Command>,
    statement_ref: Option<StatementRef>,
}

impl Query {
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            command: None,
            statement_ref: None,
        }
    }

    /// Attach a command hint.
    #[must_use]
    pub fn with_command(mut self, command: Command) -> Self {
        self.command = Some(command);
        self
    }

    #[must_use]
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// The command hint, defaulting to [`Command::Execute`].
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.unwrap_or_default()
    }

    #[must_use]
    pub fn statement_ref(&self) -> Option<StatementRef> {
        self.statement_ref
    }

    #[must_use]
    pub fn is_prepared(&self) -> bool {
        self.statement_ref.is_some()
    }

    pub(crate) fn prepared_as(mut self, statement_ref: StatementRef) -> Self {
        self.statement_ref = Some(statement_ref);
        self
    }

    pub(crate) fn take_ref(&mut self) -> Option<StatementRef> {
        self.statement_ref.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_defaults_to_row_returning_execute() {
        let query = Query::new("select 1");
        assert_eq!(query.command(), Command::Execute);
        assert!(query.command().returns_rows());
    }

    #[test]
    fn data_modification_commands_return_no_rows() {
        for command in [Command::Insert, Command::Update, Command::Delete, Command::Ddl] {
            assert!(!command.returns_rows(), "{command:?}");
        }
        assert!(Command::Select.returns_rows());
    }

    #[test]
    fn take_ref_clears_the_token() {
        let token = StatementRef {
            connection: 1,
            statement: 7,
        };
        let mut query = Query::new("select 1").prepared_as(token);
        assert_eq!(query.take_ref(), Some(token));
        assert!(!query.is_prepared());
        assert_eq!(query.take_ref(), None);
    }
}
