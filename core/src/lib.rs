pub mod batch;
pub mod config;
pub mod export;
pub mod images;
pub mod normalize;
pub mod region;
pub mod resize;
pub mod segment;

pub use opencv;

pub use batch::{run, Batch, BatchSummary, ImageOutcome};
pub use config::{IndexTarget, RunConfig};
pub use region::{ImageProposals, Proposal, Region};
pub use segment::{SearchMode, SearchParams, Segmenter, SelectiveSearch};
