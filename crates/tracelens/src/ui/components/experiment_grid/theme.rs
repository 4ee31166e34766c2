use gpui::{Pixels, px};

/// Height of each data row.
pub const ROW_HEIGHT: Pixels = px(32.0);

/// Height of the header row.
pub const HEADER_HEIGHT: Pixels = px(32.0);

/// Height of the status footer.
pub const FOOTER_HEIGHT: Pixels = px(28.0);

/// Horizontal padding inside cells.
pub const CELL_PADDING_X: Pixels = px(8.0);

/// Width of the scrollbar.
pub const SCROLLBAR_WIDTH: Pixels = px(12.0);

/// Width of the drag grip on a header cell's right edge.
pub const RESIZE_GRIP_WIDTH: Pixels = px(5.0);

/// Minimum width for a resizable column.
pub const MIN_COLUMN_WIDTH: f32 = 60.0;

/// Default width for a column without a specific default.
pub const DEFAULT_COLUMN_WIDTH: f32 = 120.0;

/// Width of the leading checkbox column. Not resizable.
pub const SELECT_COLUMN_WIDTH: f32 = 36.0;

/// Default width of a dynamic annotation score column.
pub const ANNOTATION_COLUMN_WIDTH: f32 = 140.0;

/// Rows are requested in pages of this size.
pub const PAGE_SIZE: usize = 100;

/// A fetch fires once the scroll position is within this many pixels of
/// the bottom of the loaded rows.
pub const FETCH_THRESHOLD: f32 = 300.0;
