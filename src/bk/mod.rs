mod enumerator;
mod ordering;
mod partition;
mod recorder;
mod search;
mod search_option;

pub use enumerator::{MaximalCliques, Outcome};
pub use ordering::VertexOrder;
pub use partition::{Extension, Partition, Window};
pub use recorder::*;
pub use search::{search_all, RunContext};
pub use search_option::{SearchOptions, VertexOrdering};
