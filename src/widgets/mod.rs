pub mod command_input;
pub mod error_toast;
pub mod facet_bar;
pub mod footer;
pub mod help_overlay;
pub mod status_bar;
pub mod timeline_list;
