//! # Providers Module
//!
//! Everything that talks to the outside world, and the orchestration built
//! on top of it.
//!
//! ## Components
//! - `traits`: `GenerativeClient` and `BackendClient` seams
//! - `gemini`: reqwest client for the remote generative API
//! - `backend`: reqwest client for the analysis backend
//! - `remote` / `local`: provider adapters
//! - `router`: mode-based dispatch and session state updates
//! - `batch`: sequential social-post analysis

pub mod backend;
pub mod batch;
pub mod gemini;
pub mod local;
pub mod remote;
pub mod router;
pub mod traits;

pub use backend::HttpBackend;
pub use batch::{BatchAnalyzer, BatchReport};
pub use gemini::GeminiClient;
pub use local::LocalProviderAdapter;
pub use remote::{RemoteOutcome, RemoteProviderAdapter};
pub use router::ProviderRouter;
pub use traits::{BackendClient, GenerativeClient};
