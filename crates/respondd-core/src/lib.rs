// respondd-core: Aggregation pipeline between omada-api and the respondd publisher.

pub mod clients;
pub mod config;
pub mod convert;
pub mod error;
pub mod frequency;
pub mod location;
pub mod model;
pub mod neighbor;
pub mod record;
pub mod selector;
pub mod session;
pub mod snapshot;
pub mod ssid;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{
    ControllerConfig, DEFAULT_FALLBACK_DOMAIN, GeocoderConfig, PipelineConfig, SchemaMode,
    SnmpLocationPolicy, TlsVerification, TrafficSource,
};
pub use error::{CoreError, DecodeError};
pub use location::{LocationOutcome, LocationResolver};
pub use snapshot::{CyclePhase, SnapshotAssembler};

pub use model::{AccessPointRecord, Coordinates, MacAddress, NodeFeed, Snapshot};
