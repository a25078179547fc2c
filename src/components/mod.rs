pub mod dialog;
pub mod editor;
pub mod header;
pub mod status_bar;
pub mod tree;
