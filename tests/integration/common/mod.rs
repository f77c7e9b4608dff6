pub mod background_node;
pub mod constants;
