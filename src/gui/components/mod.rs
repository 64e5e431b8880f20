pub mod branding;
pub mod flow_editor;
pub mod preview_pane;
pub mod quote_editor;
pub mod simulator_selector;
