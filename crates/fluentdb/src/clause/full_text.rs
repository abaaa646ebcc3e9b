use super::{BuildContext, Fragment, LogicalOperator, SortDir};

/// Search modifier placed inside `AGAINST (...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchModifier {
    NaturalLanguage,
    NaturalLanguageWithQueryExpansion,
    Boolean,
    QueryExpansion,
}

impl SearchModifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NaturalLanguage => "IN NATURAL LANGUAGE MODE",
            Self::NaturalLanguageWithQueryExpansion => {
                "IN NATURAL LANGUAGE MODE WITH QUERY EXPANSION"
            }
            Self::Boolean => "IN BOOLEAN MODE",
            Self::QueryExpansion => "WITH QUERY EXPANSION",
        }
    }
}

/// `MATCH (...) AGAINST (...)` search settings.
///
/// By default the search adds `score > 0` to the where list with `and`,
/// selects no score column and adds no ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct FullTextOptions {
    pub(crate) fields: Vec<String>,
    pub(crate) search_text: String,
    pub modifier: Option<SearchModifier>,
    pub min_score: f64,
    /// `None` skips the where predicate entirely.
    pub where_logic: Option<LogicalOperator>,
    /// `Some("")` selects the score expression without an alias.
    pub score_field_name: Option<String>,
    pub order_direction: Option<SortDir>,
}

impl Default for FullTextOptions {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            search_text: String::new(),
            modifier: None,
            min_score: 0.0,
            where_logic: Some(LogicalOperator::And),
            score_field_name: None,
            order_direction: None,
        }
    }
}

impl FullTextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_modifier(mut self, modifier: SearchModifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_where_logic(mut self, logic: Option<LogicalOperator>) -> Self {
        self.where_logic = logic;
        self
    }

    pub fn with_score_field_name(mut self, name: impl Into<String>) -> Self {
        self.score_field_name = Some(name.into());
        self
    }

    pub fn with_order_direction(mut self, direction: SortDir) -> Self {
        self.order_direction = Some(direction);
        self
    }

    pub(crate) fn set_target(&mut self, fields: Vec<String>, search_text: String) {
        self.fields = fields;
        self.search_text = search_text;
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// `MATCH (`a`,`b`) AGAINST (:pN[ modifier])`
    pub fn render_score(&self, ctx: &mut BuildContext<'_>) -> Fragment {
        let fields = self
            .fields
            .iter()
            .map(|f| ctx.quote_field(f))
            .collect::<Vec<_>>()
            .join(",");
        let name = ctx.param_name();
        let modifier = self
            .modifier
            .map(|m| format!(" {}", m.as_str()))
            .unwrap_or_default();

        let mut frag = Fragment::new(format!("MATCH ({fields}) AGAINST ({name}{modifier})"));
        frag.binds.set(name, self.search_text.as_str());
        frag
    }

    /// Score expression compared against the minimum score.
    pub fn render_condition(&self, ctx: &mut BuildContext<'_>) -> Fragment {
        let mut frag = self.render_score(ctx);
        let name = ctx.param_name();
        frag.sql.push_str(" > ");
        frag.sql.push_str(&name);
        frag.binds.set(name, self.min_score);
        frag
    }
}
