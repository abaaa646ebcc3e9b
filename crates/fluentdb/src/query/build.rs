use super::{BeforeBuild, Query};
use crate::builder::{Builder, BuiltSql};
use crate::clause::{BuildContext, Field, Order, Raw};
use crate::client::Pool;
use crate::error::DbResult;
use crate::options::SaveData;

impl<P: Pool> Query<P> {
    pub fn build_select_sql(&mut self) -> DbResult<String> {
        self.prepare_build();
        let built = Builder::new(&mut self.param_inc).select(&self.options);
        self.absorb(built)
    }

    /// Uses `data` when given, otherwise the fields set on the query.
    pub fn build_insert_sql(&mut self, data: Option<&SaveData>) -> DbResult<String> {
        self.prepare_build();
        let built = Builder::new(&mut self.param_inc).insert(&self.options, data);
        self.absorb(built)
    }

    pub fn build_batch_insert_sql(&mut self, rows: &[SaveData]) -> DbResult<String> {
        self.prepare_build();
        let built = Builder::new(&mut self.param_inc).batch_insert(&self.options, rows);
        self.absorb(built)
    }

    pub fn build_update_sql(&mut self, data: Option<&SaveData>) -> DbResult<String> {
        self.prepare_build();
        let built = Builder::new(&mut self.param_inc).update(&self.options, data);
        self.absorb(built)
    }

    pub fn build_replace_sql(&mut self, data: Option<&SaveData>) -> DbResult<String> {
        self.prepare_build();
        let built = Builder::new(&mut self.param_inc).replace(&self.options, data);
        self.absorb(built)
    }

    pub fn build_delete_sql(&mut self) -> DbResult<String> {
        self.prepare_build();
        let built = Builder::new(&mut self.param_inc).delete(&self.options);
        self.absorb(built)
    }

    /// Restart numbering and apply the deferred clause mutations once.
    fn prepare_build(&mut self) {
        self.param_inc = 0;
        for command in std::mem::take(&mut self.before_build) {
            match command {
                BeforeBuild::ScoreField { options, alias } => {
                    let score = options.render_score(&mut BuildContext::new(&mut self.param_inc));
                    self.options
                        .fields
                        .push(Field::raw(Raw::with_binds(score.sql, score.binds), alias));
                }
                BeforeBuild::ScoreOrder {
                    alias: Some(alias),
                    direction,
                    ..
                } => {
                    self.options.orders.push(Order::new(alias, direction));
                }
                BeforeBuild::ScoreOrder {
                    options,
                    alias: None,
                    direction,
                } => {
                    let score = options.render_score(&mut BuildContext::new(&mut self.param_inc));
                    self.options.orders.push(Order::raw(Raw::with_binds(
                        format!("({}) {}", score.sql, direction.as_str()),
                        score.binds,
                    )));
                }
            }
        }
    }

    fn absorb(&mut self, built: DbResult<BuiltSql>) -> DbResult<String> {
        let built = built?;
        self.binds.merge(built.binds);
        Ok(built.sql)
    }
}
