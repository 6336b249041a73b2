/// Title the tray binary renders as a separator line.
pub const SEPARATOR_TITLE: &str = "<SEPARATOR>";

/// Sequence id sent with item updates that do not answer a specific click.
pub const UNATTRIBUTED_SEQ_ID: i64 = -1;

/// Longest rendered line (in characters) written to the log unshortened.
pub const LOG_LINE_LIMIT: usize = 500;

/// Stand-in for encoded icon payloads in log output.
pub const ICON_PLACEHOLDER: &str = "<ICON>";

/// First internal identity handed out to a menu item.
pub const FIRST_ITEM_ID: u32 = 1;
