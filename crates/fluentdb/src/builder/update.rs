use super::{Builder, BuiltSql};
use crate::error::DbResult;
use crate::ident;
use crate::options::{QueryOptions, SaveData};
use indexmap::IndexMap;

enum SetItem {
    Assign(String),
    /// Index into the JSON_SET groups.
    Json(usize),
}

impl Builder<'_> {
    /// `update table[ partition] set ...[ where][ order by][ limit]`
    pub fn update(mut self, options: &QueryOptions, data: Option<&SaveData>) -> DbResult<BuiltSql> {
        let data = data.unwrap_or(&options.save_data);
        let table = options.table.to_sql();
        let partition = self.parse_partition(options.partition.as_ref());
        let sets = self.parse_set(data);
        let wheres = self.parse_where(&options.wheres)?;
        let orders = self.parse_order(&options.orders);
        let limit = self.parse_limit(None, options.limit);

        let sql = format!("update {table}{partition} set {sets}{wheres}{orders}{limit}");
        Ok(self.finish(sql))
    }

    /// `replace into table[ partition] set ...`
    pub fn replace(
        mut self,
        options: &QueryOptions,
        data: Option<&SaveData>,
    ) -> DbResult<BuiltSql> {
        let data = data.unwrap_or(&options.save_data);
        let table = options.table.to_sql();
        let partition = self.parse_partition(options.partition.as_ref());
        let sets = self.parse_set(data);

        let sql = format!("replace into {table}{partition} set {sets}");
        Ok(self.finish(sql))
    }

    /// Assignment list. `col->path` keys on the same column are folded into
    /// one `JSON_SET` call at the position of the first such key.
    fn parse_set(&mut self, data: &SaveData) -> String {
        let mut items = Vec::with_capacity(data.len());
        let mut json: IndexMap<String, Vec<String>> = IndexMap::new();

        for (field, value) in data.iter() {
            if let Some((column, path)) = ident::split_json_field(field) {
                let placeholder = self.generated_value(field, value);
                let entry = json.entry(column);
                let index = entry.index();
                if matches!(entry, indexmap::map::Entry::Vacant(_)) {
                    items.push(SetItem::Json(index));
                }
                entry.or_default().push(format!("{path}, {placeholder}"));
                continue;
            }
            let placeholder = self.save_value(field, value);
            items.push(SetItem::Assign(format!(
                "{} = {placeholder}",
                ident::quote_field(field)
            )));
        }

        items
            .into_iter()
            .map(|item| match item {
                SetItem::Assign(sql) => sql,
                SetItem::Json(index) => {
                    let (column, paths) = json
                        .get_index(index)
                        .map(|(c, p)| (c.as_str(), p.join(", ")))
                        .unwrap_or_default();
                    format!("{column} = JSON_SET({column}, {paths})")
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}
