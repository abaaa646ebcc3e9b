use super::{BuildContext, Fragment, Raw};
use std::str::FromStr;

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    /// Seek operator that moves forward in this direction.
    pub(crate) fn seek_operator(self) -> &'static str {
        match self {
            SortDir::Asc => ">",
            SortDir::Desc => "<",
        }
    }
}

impl FromStr for SortDir {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            _ => Err(()),
        }
    }
}

/// A single ORDER BY item.
#[derive(Debug, Clone, PartialEq)]
pub enum Order {
    Column { field: String, direction: SortDir },
    Raw(Raw),
}

impl Order {
    pub fn new(field: impl Into<String>, direction: SortDir) -> Self {
        Self::Column {
            field: field.into(),
            direction,
        }
    }

    /// Create a raw SQL order item.
    pub fn raw(raw: Raw) -> Self {
        Self::Raw(raw)
    }

    pub fn render(&self, ctx: &mut BuildContext<'_>) -> Fragment {
        match self {
            Order::Column { field, direction } => {
                Fragment::new(format!("{} {}", ctx.quote_field(field), direction.as_str()))
            }
            Order::Raw(raw) => raw.to_fragment(),
        }
    }
}

/// A single GROUP BY item.
#[derive(Debug, Clone, PartialEq)]
pub enum Group {
    Column(String),
    Raw(Raw),
}

impl Group {
    pub fn render(&self, ctx: &mut BuildContext<'_>) -> Fragment {
        match self {
            Group::Column(field) => Fragment::new(ctx.quote_field(field)),
            Group::Raw(raw) => raw.to_fragment(),
        }
    }
}
