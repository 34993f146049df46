//! Comment- and order-preserving merge of a template document into a target.
//!
//! Two representations are read side by side: the parsed tree answers value
//! and structure questions, the raw text supplies comments and ignored
//! sections. Metadata is keyed by key path and replayed in template order.

pub mod comments;
pub mod ignored;
pub mod keypath;
pub mod tracker;
pub mod writer;

pub use comments::CommentMap;
pub use ignored::IgnoredSectionMap;
pub use keypath::DEFAULT_SEPARATOR;
pub use tracker::KeyPathTracker;
