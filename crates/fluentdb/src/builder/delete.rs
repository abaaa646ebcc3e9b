use super::{Builder, BuiltSql};
use crate::error::DbResult;
use crate::options::QueryOptions;

impl Builder<'_> {
    /// `delete from table[ partition][ where][ order by][ limit]`
    pub fn delete(mut self, options: &QueryOptions) -> DbResult<BuiltSql> {
        let table = options.table.to_sql();
        let partition = self.parse_partition(options.partition.as_ref());
        let wheres = self.parse_where(&options.wheres)?;
        let orders = self.parse_order(&options.orders);
        let limit = self.parse_limit(None, options.limit);

        let sql = format!("delete from {table}{partition}{wheres}{orders}{limit}");
        Ok(self.finish(sql))
    }
}
