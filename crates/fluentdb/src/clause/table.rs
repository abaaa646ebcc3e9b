use crate::ident;

/// Target table: structured reference or raw SQL.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    source: TableSource,
    alias: Option<String>,
    prefix: String,
}

#[derive(Debug, Clone, PartialEq)]
enum TableSource {
    Named {
        database: Option<String>,
        name: Option<String>,
    },
    Raw(String),
}

impl Default for TableSource {
    fn default() -> Self {
        Self::Named {
            database: None,
            name: None,
        }
    }
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Parse `"table"`, `"db.table"` or `"db.table alias"`. Resets the prefix.
    pub fn parse(value: &str) -> Self {
        let mut table = Self::default();
        table.set_value(value);
        table
    }

    pub fn set_value(&mut self, value: &str) {
        let mut kw = ident::parse_keyword_text(value);
        let name = kw.keywords.pop();
        let database = kw.keywords.pop();
        self.source = TableSource::Named { database, name };
        self.alias = kw.alias;
        self.prefix.clear();
    }

    /// Point at a table, keeping the configured prefix.
    pub fn set_table(
        &mut self,
        name: impl Into<String>,
        alias: Option<String>,
        database: Option<String>,
    ) {
        self.source = TableSource::Named {
            database,
            name: Some(name.into()),
        };
        self.alias = alias;
    }

    pub fn set_raw(&mut self, sql: impl Into<String>, alias: Option<String>) {
        self.source = TableSource::Raw(sql.into());
        self.alias = alias;
    }

    pub fn set_database(&mut self, database: Option<String>) {
        match &mut self.source {
            TableSource::Named { database: db, .. } => *db = database,
            TableSource::Raw(_) => {
                self.source = TableSource::Named { database, name: None };
            }
        }
    }

    pub fn set_alias(&mut self, alias: Option<String>) {
        self.alias = alias;
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        match &self.source {
            TableSource::Named { name, .. } => name.as_deref(),
            TableSource::Raw(_) => None,
        }
    }

    pub fn database(&self) -> Option<&str> {
        match &self.source {
            TableSource::Named { database, .. } => database.as_deref(),
            TableSource::Raw(_) => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self.source, TableSource::Raw(_))
    }

    pub fn to_sql(&self) -> String {
        match &self.source {
            TableSource::Raw(sql) => match &self.alias {
                None => sql.clone(),
                Some(alias) => format!("({sql}) as {}", ident::quote_name(alias)),
            },
            TableSource::Named { database, name } => {
                let full = name.as_ref().map(|n| format!("{}{}", self.prefix, n));
                ident::keyword_to_text(
                    &[database.as_deref(), full.as_deref()],
                    self.alias.as_deref(),
                )
            }
        }
    }
}
