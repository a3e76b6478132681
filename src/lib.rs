pub mod action;
pub mod app;
pub mod config;
pub mod describe;
pub mod domain;
pub mod event;
pub mod facets;
pub mod input;
pub mod source;
pub mod stats;
pub mod taxonomy;
pub mod text;
pub mod theme;
pub mod timeline;
pub mod tui;
pub mod widgets;
pub mod worker;
