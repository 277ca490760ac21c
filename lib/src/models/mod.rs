pub mod node;

pub use node::{BookmarkNode, CreateDetails, NodeType};
