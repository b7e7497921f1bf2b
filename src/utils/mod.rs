pub mod environment;
pub mod paths;
pub mod terminal;
pub mod timestamps;
pub mod walker;

pub use environment::{Workspace, resolve_workspace_root};
pub use paths::{is_hidden_name, path_exists, relative_display};
pub use terminal::sanitize_for_terminal;
pub use timestamps::{format_iso_millis, parse_timestamp, timestamp_from_value};
pub use walker::document_files;
