use std::sync::Arc;

use gpui::TextAlign;

use super::theme::{
    ANNOTATION_COLUMN_WIDTH, MIN_COLUMN_WIDTH, SELECT_COLUMN_WIDTH,
};

/// Stable identity of a grid column. Annotation columns are keyed by the
/// annotation name so user-set widths survive a range refresh.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    Select,
    Name,
    Description,
    CreatedAt,
    ErrorRate,
    RunCount,
    Latency,
    Cost,
    Tokens,
    Annotation(Arc<str>),
}

#[derive(Debug, Clone)]
pub struct GridColumn {
    pub key: ColumnKey,
    pub title: Arc<str>,
    pub default_width: f32,
    pub min_width: f32,
    pub align: TextAlign,
    pub resizable: bool,
}

fn fixed(key: ColumnKey, title: &str, default_width: f32, align: TextAlign) -> GridColumn {
    GridColumn {
        key,
        title: title.into(),
        default_width,
        min_width: MIN_COLUMN_WIDTH,
        align,
        resizable: true,
    }
}

/// Column set for the experiments listing: the fixed metric columns
/// followed by one column per annotation name, in the given order.
pub fn build_columns(annotation_names: &[Arc<str>]) -> Vec<GridColumn> {
    let mut columns = vec![
        GridColumn {
            key: ColumnKey::Select,
            title: "".into(),
            default_width: SELECT_COLUMN_WIDTH,
            min_width: SELECT_COLUMN_WIDTH,
            align: TextAlign::Left,
            resizable: false,
        },
        fixed(ColumnKey::Name, "Name", 220.0, TextAlign::Left),
        fixed(ColumnKey::Description, "Description", 180.0, TextAlign::Left),
        fixed(ColumnKey::CreatedAt, "Created", 150.0, TextAlign::Left),
        fixed(ColumnKey::ErrorRate, "Error rate", 90.0, TextAlign::Right),
        fixed(ColumnKey::RunCount, "Runs", 70.0, TextAlign::Right),
        fixed(ColumnKey::Latency, "Latency", 100.0, TextAlign::Right),
        fixed(ColumnKey::Cost, "Cost", 90.0, TextAlign::Right),
        fixed(ColumnKey::Tokens, "Tokens", 100.0, TextAlign::Right),
    ];

    for name in annotation_names {
        columns.push(GridColumn {
            key: ColumnKey::Annotation(name.clone()),
            title: name.clone(),
            default_width: ANNOTATION_COLUMN_WIDTH,
            min_width: MIN_COLUMN_WIDTH,
            align: TextAlign::Left,
            resizable: true,
        });
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotation_columns_follow_fixed_columns_in_order() {
        let names: Vec<Arc<str>> = vec!["correctness".into(), "helpfulness".into()];
        let columns = build_columns(&names);

        let annotation_keys: Vec<_> = columns
            .iter()
            .filter_map(|c| match &c.key {
                ColumnKey::Annotation(name) => Some(name.as_ref()),
                _ => None,
            })
            .collect();
        assert_eq!(annotation_keys, ["correctness", "helpfulness"]);
        assert_eq!(columns[0].key, ColumnKey::Select);
        assert!(!columns[0].resizable);
    }
}
