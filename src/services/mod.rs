pub mod traversal;

pub use traversal::TraversalEngine;
