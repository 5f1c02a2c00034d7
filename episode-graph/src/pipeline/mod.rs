//! Extraction and ingestion pipeline.
//!
//! The stages in order:
//! 1. **Prompt**: render the extraction template around the input text
//! 2. **Extract**: one completion call, fence-strip, parse into an [`ExtractionEnvelope`]
//! 3. **Ingest**: ensure schema, write one JSON episode, release the store
//!
//! [`ExtractionEnvelope`]: crate::extraction::ExtractionEnvelope

pub mod extract;
pub mod ingest;

pub use extract::{parse_extraction, Extractor};
pub use ingest::{ingest, DEFAULT_SOURCE_DESCRIPTION};

use tracing::{error, info};

use crate::driver::GraphStore;
use crate::errors::Result;

/// Close `store`, then hand back `outcome`.
///
/// The operation's own error takes precedence over a failure to close; the
/// latter is only logged in that case.
pub(crate) async fn release<S: GraphStore, T>(store: &S, outcome: Result<T>) -> Result<T> {
    let closed = store.close().await;
    match (outcome, closed) {
        (Ok(value), Ok(())) => {
            info!("connection closed");
            Ok(value)
        }
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(op_err), Ok(())) => {
            info!("connection closed");
            Err(op_err)
        }
        (Err(op_err), Err(close_err)) => {
            error!(error = %close_err, "closing the store failed after an earlier error");
            Err(op_err)
        }
    }
}
