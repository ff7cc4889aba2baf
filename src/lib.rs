pub mod aggregate;
pub mod canvas;
pub mod dataset;
pub mod format;
pub mod geometry;
pub mod gui;
pub mod heatmap;
pub mod layout;
pub mod logging;
pub mod regions;
pub mod settings;
pub mod timeline;
pub mod tooltip;
