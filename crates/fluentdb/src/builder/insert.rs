use super::{Builder, BuiltSql};
use crate::error::{DbError, DbResult};
use crate::ident;
use crate::options::{QueryOptions, SaveData, SaveValue};
use crate::value::Value;

impl Builder<'_> {
    /// `insert [ignore ]into table[ partition] (cols) values(vals)`
    ///
    /// Uses `data` when given, otherwise the query's save data.
    pub fn insert(mut self, options: &QueryOptions, data: Option<&SaveData>) -> DbResult<BuiltSql> {
        let data = data.unwrap_or(&options.save_data);
        let mut columns = Vec::with_capacity(data.len());
        let mut values = Vec::with_capacity(data.len());

        for (field, value) in data.iter() {
            columns.push(ident::quote_field(field));
            values.push(self.save_value(field, value));
        }

        let sql = format!(
            "insert {}into {}{} ({}) values({})",
            ignore_keyword(options),
            options.table.to_sql(),
            self.parse_partition(options.partition.as_ref()),
            columns.join(","),
            values.join(",")
        );
        Ok(self.finish(sql))
    }

    /// `insert [ignore ]into table[ partition] (cols) values (row),(row)`
    ///
    /// Columns come from the first row; every row must provide them.
    pub fn batch_insert(mut self, options: &QueryOptions, rows: &[SaveData]) -> DbResult<BuiltSql> {
        let columns: Vec<&str> = rows.first().map(|r| r.keys().collect()).unwrap_or_default();

        let mut rendered_rows = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let mut values = Vec::with_capacity(columns.len());
            for column in &columns {
                let value = row.get(column).ok_or_else(|| {
                    DbError::invalid_argument(format!(
                        "batch insert row {i} is missing column '{column}'"
                    ))
                })?;
                values.push(self.generated_value(column, value));
            }
            rendered_rows.push(format!("({})", values.join(",")));
        }

        let sql = format!(
            "insert {}into {}{} ({}) values {}",
            ignore_keyword(options),
            options.table.to_sql(),
            self.parse_partition(options.partition.as_ref()),
            columns
                .iter()
                .map(|c| ident::quote_field(c))
                .collect::<Vec<_>>()
                .join(","),
            rendered_rows.join(",")
        );
        Ok(self.finish(sql))
    }

    /// Placeholder for a named save value: `:field` for plain identifiers,
    /// a generated name otherwise.
    pub(crate) fn save_value(&mut self, field: &str, value: &SaveValue) -> String {
        match value {
            SaveValue::Value(v) => {
                let candidate = format!(":{field}");
                let reusable =
                    ident::is_plain_identifier(field) && !self.binds.contains(&candidate);
                let name = if reusable {
                    candidate
                } else {
                    self.ctx.param_name()
                };
                self.bind(name, v)
            }
            other => self.generated_value(field, other),
        }
    }

    /// Placeholder or expression for a save value, never named after the field.
    pub(crate) fn generated_value(&mut self, field: &str, value: &SaveValue) -> String {
        match value {
            SaveValue::Value(v) => {
                let name = self.ctx.param_name();
                self.bind(name, v)
            }
            SaveValue::Raw(raw) => {
                self.binds.merge(raw.binds.clone());
                raw.sql.clone()
            }
            SaveValue::Increment(v) => self.step(field, "+", ":fip", v),
            SaveValue::Decrement(v) => self.step(field, "-", ":fdp", v),
        }
    }

    fn step(&mut self, field: &str, sign: &str, prefix: &str, value: &Value) -> String {
        let name = self.ctx.param_name_with(prefix);
        let sql = format!("{} {sign} {name}", ident::quote_field(field));
        self.bind(name, value);
        sql
    }

    fn bind(&mut self, name: String, value: &Value) -> String {
        self.binds.set(name.clone(), value.clone());
        name
    }
}

fn ignore_keyword(options: &QueryOptions) -> &'static str {
    if options.flag("ignore") { "ignore " } else { "" }
}
