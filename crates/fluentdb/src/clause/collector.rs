use super::{LogicalOperator, Operand, Predicate, Raw};
use crate::ident;
use crate::param::Binds;
use crate::value::Value;

/// Fluent where-condition methods shared by [`Query`](crate::Query) and
/// bracket groups.
///
/// Implementors only provide [`WhereCollector::push_where`].
pub trait WhereCollector {
    fn push_where(&mut self, predicate: Predicate) -> &mut Self;

    /// `field op value`, joined with `and`.
    fn and_where(
        &mut self,
        field: impl Into<String>,
        operation: impl Into<String>,
        value: impl Into<Operand>,
    ) -> &mut Self {
        self.push_where(Predicate::new(field, operation, value, LogicalOperator::And))
    }

    /// `field op value`, joined with `or`.
    fn or_where(
        &mut self,
        field: impl Into<String>,
        operation: impl Into<String>,
        value: impl Into<Operand>,
    ) -> &mut Self {
        self.push_where(Predicate::new(field, operation, value, LogicalOperator::Or))
    }

    fn where_raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.push_where(Predicate::raw(Raw::new(sql), LogicalOperator::And))
    }

    fn or_where_raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.push_where(Predicate::raw(Raw::new(sql), LogicalOperator::Or))
    }

    /// Raw condition carrying its own binds.
    fn where_raw_with(
        &mut self,
        sql: impl Into<String>,
        logic: LogicalOperator,
        binds: impl Into<Binds>,
    ) -> &mut Self {
        self.push_where(Predicate::raw(Raw::with_binds(sql, binds), logic))
    }

    /// Group the conditions added by `build` inside parentheses.
    fn where_brackets<F>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut WhereGroup),
    {
        let mut group = WhereGroup::new();
        build(&mut group);
        self.push_where(Predicate::brackets(group.items, LogicalOperator::And))
    }

    fn or_where_brackets<F>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut WhereGroup),
    {
        let mut group = WhereGroup::new();
        build(&mut group);
        self.push_where(Predicate::brackets(group.items, LogicalOperator::Or))
    }

    /// `(sql)`, joined with `and`.
    fn where_brackets_raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.push_where(Predicate::brackets_raw(Raw::new(sql), LogicalOperator::And))
    }

    fn or_where_brackets_raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.push_where(Predicate::brackets_raw(Raw::new(sql), LogicalOperator::Or))
    }

    fn where_between(
        &mut self,
        field: impl Into<String>,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> &mut Self {
        self.push_where(between(field, "between", min, max, LogicalOperator::And))
    }

    fn or_where_between(
        &mut self,
        field: impl Into<String>,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> &mut Self {
        self.push_where(between(field, "between", min, max, LogicalOperator::Or))
    }

    fn where_not_between(
        &mut self,
        field: impl Into<String>,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> &mut Self {
        self.push_where(between(field, "not between", min, max, LogicalOperator::And))
    }

    fn or_where_not_between(
        &mut self,
        field: impl Into<String>,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> &mut Self {
        self.push_where(between(field, "not between", min, max, LogicalOperator::Or))
    }

    fn where_in(&mut self, field: impl Into<String>, values: impl Into<Operand>) -> &mut Self {
        self.push_where(Predicate::new(field, "in", values, LogicalOperator::And))
    }

    fn or_where_in(&mut self, field: impl Into<String>, values: impl Into<Operand>) -> &mut Self {
        self.push_where(Predicate::new(field, "in", values, LogicalOperator::Or))
    }

    fn where_not_in(&mut self, field: impl Into<String>, values: impl Into<Operand>) -> &mut Self {
        self.push_where(Predicate::new(field, "not in", values, LogicalOperator::And))
    }

    fn or_where_not_in(
        &mut self,
        field: impl Into<String>,
        values: impl Into<Operand>,
    ) -> &mut Self {
        self.push_where(Predicate::new(field, "not in", values, LogicalOperator::Or))
    }

    fn where_is_null(&mut self, field: &str) -> &mut Self {
        self.push_where(null_check(field, "is null", LogicalOperator::And))
    }

    fn or_where_is_null(&mut self, field: &str) -> &mut Self {
        self.push_where(null_check(field, "is null", LogicalOperator::Or))
    }

    fn where_is_not_null(&mut self, field: &str) -> &mut Self {
        self.push_where(null_check(field, "is not null", LogicalOperator::And))
    }

    fn or_where_is_not_null(&mut self, field: &str) -> &mut Self {
        self.push_where(null_check(field, "is not null", LogicalOperator::Or))
    }

    /// Conditions from a JSON object, rendered in brackets.
    ///
    /// ```ignore
    /// query.where_ex(json!({
    ///     "id": 1,
    ///     "and": { "id": ["in", [1]] },
    /// }));
    /// // where (`id` = :p1 and (`id` in (:p2)))
    /// ```
    fn where_ex(&mut self, condition: serde_json::Value) -> &mut Self {
        self.push_where(Predicate::ex(condition, LogicalOperator::And))
    }

    fn or_where_ex(&mut self, condition: serde_json::Value) -> &mut Self {
        self.push_where(Predicate::ex(condition, LogicalOperator::Or))
    }

    fn where_predicate(&mut self, predicate: Predicate) -> &mut Self {
        self.push_where(predicate)
    }
}

fn between(
    field: impl Into<String>,
    operation: &str,
    min: impl Into<Value>,
    max: impl Into<Value>,
    logic: LogicalOperator,
) -> Predicate {
    Predicate::new(field, operation, Operand::List(vec![min.into(), max.into()]), logic)
}

fn null_check(field: &str, suffix: &str, logic: LogicalOperator) -> Predicate {
    Predicate::raw(Raw::new(format!("{} {suffix}", ident::quote_field(field))), logic)
}

/// Collects the predicates of one bracket group.
#[derive(Debug, Clone, Default)]
pub struct WhereGroup {
    items: Vec<Predicate>,
}

impl WhereGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Predicate] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Predicate> {
        self.items
    }
}

impl WhereCollector for WhereGroup {
    fn push_where(&mut self, predicate: Predicate) -> &mut Self {
        self.items.push(predicate);
        self
    }
}
