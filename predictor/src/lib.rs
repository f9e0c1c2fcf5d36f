//! Client side of the SMILES activity prediction service: the HTTP client,
//! the single and batch orchestrators and CSV export of batch results.

pub mod api;
pub mod batch;
pub mod export;
pub mod notice;
pub mod single;

pub use common::{models, smiles};
