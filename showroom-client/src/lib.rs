//! Showroom Client - catalog synchronization engine
//!
//! Keeps local catalogs of vehicles, tyres and promotions in step with the
//! remote catalog service:
//!
//! - [`CatalogStore`]: local copy of one collection with write-through updates
//! - [`filter`]: pure filtering, search and pagination over a snapshot
//! - [`media`]: pending/committed media with all-or-nothing upload at submit
//! - [`MutationCoordinator`]: one create/update/delete at a time per record
//! - [`auth`]: the injected authorization gate

pub mod auth;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod filter;
pub mod http;
pub mod logger;
pub mod media;
pub mod remote;
pub mod session;
pub mod store;

pub use auth::{AuthorizationGate, Credential, SessionGate, StaticGate};
pub use config::ClientConfig;
pub use coordinator::{DeleteConfirmation, MutationCoordinator, MutationKind};
pub use error::{ClientError, ClientResult, SyncError, SyncResult};
pub use filter::{CatalogPage, ViewState};
pub use http::NetworkHttpClient;
pub use media::{HttpMediaUploader, LocalFile, MediaEntry, MediaPipeline, MediaUploader, PreviewRegistry};
pub use remote::{CatalogApi, RemoteCatalog};
pub use session::EditSession;
pub use store::{CatalogStore, LoadState};

// Re-export shared types for convenience
pub use shared::catalog::{Attribute, Facet, FilterCriteria, ProductFamily, Range};
pub use shared::models::{Promotion, PromotionDraft, Tyre, TyreDraft, Vehicle, VehicleDraft};
