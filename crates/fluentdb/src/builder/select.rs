use super::{Builder, BuiltSql};
use crate::clause::render_fields;
use crate::error::DbResult;
use crate::options::QueryOptions;

impl Builder<'_> {
    /// `select [distinct] fields from table [partition] [join] [where]
    /// [group by] [having] [order by] [limit] [lock]`
    pub fn select(mut self, options: &QueryOptions) -> DbResult<BuiltSql> {
        let distinct = if options.distinct { "distinct " } else { "" };
        let fields = render_fields(&options.fields, &mut self.ctx);
        let fields = self.take(fields);
        let table = options.table.to_sql();
        let partition = self.parse_partition(options.partition.as_ref());
        let joins = self.parse_join(&options.joins)?;
        let wheres = self.parse_where(&options.wheres)?;
        let groups = self.parse_group(&options.groups);
        let havings = self.parse_having(&options.havings)?;
        let orders = self.parse_order(&options.orders);
        let limit = self.parse_limit(options.offset, options.limit);
        let lock = options
            .lock
            .as_ref()
            .map(|l| l.render())
            .unwrap_or_default();

        let sql = format!(
            "select {distinct}{fields} from {table}{partition}{joins}{wheres}{groups}{havings}{orders}{limit}{lock}"
        );
        Ok(self.finish(sql))
    }
}
