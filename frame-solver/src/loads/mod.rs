//! Load types

mod distributed;
mod node_load;

pub use distributed::{DistributedLoad, LoadSense};
pub use node_load::NodeLoad;
