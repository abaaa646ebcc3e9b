use super::BuildContext;

/// MySQL partition selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Partition {
    Names(Vec<String>),
    Raw(String),
}

impl Partition {
    /// ` PARTITION(...)`, or nothing for an empty name list.
    pub fn render(&self, ctx: &mut BuildContext<'_>) -> String {
        match self {
            Partition::Names(names) if names.is_empty() => String::new(),
            Partition::Names(names) => {
                let names = names
                    .iter()
                    .map(|n| ctx.quote_name(n))
                    .collect::<Vec<_>>()
                    .join(",");
                format!(" PARTITION({names})")
            }
            Partition::Raw(sql) => format!(" PARTITION({sql})"),
        }
    }
}
