use std::collections::HashMap;

use super::columns::{ColumnKey, GridColumn};
use super::theme::DEFAULT_COLUMN_WIDTH;

/// A column drag in progress, anchored at the pointer position where it
/// started.
#[derive(Debug, Clone, Copy)]
pub struct ActiveResize {
    pub col_ix: usize,
    start_x: f32,
    start_width: f32,
}

/// Owns per-column pixel widths and the prefix-sum offsets derived from
/// them. The offsets and total are recomputed once per width change, so
/// the cost of a sizing update is O(columns) and never touches row data.
pub struct ColumnSizing {
    keys: Vec<ColumnKey>,
    widths: Vec<f32>,
    min_widths: Vec<f32>,
    /// Prefix sums for positioning: `[0, w0, w0+w1, ...]`.
    offsets: Vec<f32>,
    active: Option<ActiveResize>,
}

impl ColumnSizing {
    pub fn new(columns: &[GridColumn]) -> Self {
        let mut sizing = Self {
            keys: Vec::new(),
            widths: Vec::new(),
            min_widths: Vec::new(),
            offsets: vec![0.0],
            active: None,
        };
        sizing.rebuild(columns);
        sizing
    }

    /// Adopts a new column set, keeping user-set widths for columns whose
    /// key survives. Any drag in progress is dropped.
    pub fn rebuild(&mut self, columns: &[GridColumn]) {
        let previous: HashMap<ColumnKey, f32> = self
            .keys
            .iter()
            .cloned()
            .zip(self.widths.iter().copied())
            .collect();

        self.keys = columns.iter().map(|c| c.key.clone()).collect();
        self.min_widths = columns.iter().map(|c| c.min_width).collect();
        self.widths = columns
            .iter()
            .map(|c| previous.get(&c.key).copied().unwrap_or(c.default_width))
            .collect();
        self.active = None;
        self.recompute_offsets();
    }

    fn recompute_offsets(&mut self) {
        self.offsets.clear();
        self.offsets.push(0.0);
        let mut sum = 0.0;
        for width in &self.widths {
            sum += width;
            self.offsets.push(sum);
        }
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn width(&self, col_ix: usize) -> f32 {
        self.widths.get(col_ix).copied().unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    pub fn widths(&self) -> &[f32] {
        &self.widths
    }

    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    pub fn total_width(&self) -> f32 {
        *self.offsets.last().unwrap_or(&0.0)
    }

    /// Sets a column width, clamped to the column minimum. Returns whether
    /// anything changed.
    pub fn set_width(&mut self, col_ix: usize, width: f32) -> bool {
        let Some(current) = self.widths.get_mut(col_ix) else {
            return false;
        };
        let min = self.min_widths.get(col_ix).copied().unwrap_or(0.0);
        let clamped = width.max(min);
        if (*current - clamped).abs() < f32::EPSILON {
            return false;
        }
        *current = clamped;
        self.recompute_offsets();
        true
    }

    pub fn begin_resize(&mut self, col_ix: usize, pointer_x: f32) {
        if col_ix >= self.widths.len() {
            return;
        }
        self.active = Some(ActiveResize {
            col_ix,
            start_x: pointer_x,
            start_width: self.widths[col_ix],
        });
    }

    pub fn is_resizing(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_column(&self) -> Option<usize> {
        self.active.map(|a| a.col_ix)
    }

    /// Applies a pointer move to the active drag. Returns whether the
    /// width actually changed.
    pub fn resize_to(&mut self, pointer_x: f32) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let width = active.start_width + (pointer_x - active.start_x);
        self.set_width(active.col_ix, width)
    }

    /// Ends the drag, keeping the final width. Returns the resized column
    /// and its final width, if a drag was active.
    pub fn end_resize(&mut self) -> Option<(ColumnKey, f32)> {
        let active = self.active.take()?;
        let key = self.keys.get(active.col_ix)?.clone();
        Some((key, self.widths[active.col_ix]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::experiment_grid::columns::build_columns;
    use crate::ui::components::experiment_grid::theme::MIN_COLUMN_WIDTH;
    use std::sync::Arc;

    fn sizing() -> ColumnSizing {
        ColumnSizing::new(&build_columns(&[]))
    }

    #[test]
    fn offsets_are_prefix_sums_of_widths() {
        let sizing = sizing();
        let offsets = sizing.offsets();

        assert_eq!(offsets[0], 0.0);
        for ix in 0..sizing.len() {
            assert_eq!(offsets[ix + 1], offsets[ix] + sizing.width(ix));
        }
        assert_eq!(sizing.total_width(), *offsets.last().unwrap());
    }

    #[test]
    fn set_width_clamps_to_column_minimum() {
        let mut sizing = sizing();
        assert!(sizing.set_width(1, 10.0));
        assert_eq!(sizing.width(1), MIN_COLUMN_WIDTH);
    }

    #[test]
    fn drag_applies_pointer_delta_to_start_width() {
        let mut sizing = sizing();
        let start = sizing.width(1);

        sizing.begin_resize(1, 400.0);
        assert!(sizing.is_resizing());
        assert!(sizing.resize_to(450.0));
        assert_eq!(sizing.width(1), start + 50.0);

        // Moving back to the anchor restores the starting width.
        assert!(sizing.resize_to(400.0));
        assert_eq!(sizing.width(1), start);

        let (key, width) = sizing.end_resize().unwrap();
        assert_eq!(key, ColumnKey::Name);
        assert_eq!(width, start);
        assert!(!sizing.is_resizing());
    }

    #[test]
    fn resize_without_active_drag_is_a_no_op() {
        let mut sizing = sizing();
        assert!(!sizing.resize_to(500.0));
        assert!(sizing.end_resize().is_none());
    }

    #[test]
    fn rebuild_keeps_widths_for_surviving_keys() {
        let names: Vec<Arc<str>> = vec!["correctness".into()];
        let mut sizing = ColumnSizing::new(&build_columns(&names));
        sizing.set_width(1, 300.0);

        let more: Vec<Arc<str>> = vec!["correctness".into(), "helpfulness".into()];
        sizing.rebuild(&build_columns(&more));

        assert_eq!(sizing.width(1), 300.0);
        assert_eq!(sizing.len(), build_columns(&more).len());
    }
}
