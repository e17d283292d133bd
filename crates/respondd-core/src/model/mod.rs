// ── Domain model ──
//
// Controller DTOs are converted into these types once, at the ingestion
// boundary (see `convert`). Everything downstream works on typed, normalized
// values.

pub mod client;
pub mod common;
pub mod device;
pub mod mac;
pub mod node;
pub mod record;
pub mod site;

pub use client::{Band, ClientSession};
pub use common::Coordinates;
pub use device::{DeviceStats, DeviceStatus, DeviceType, RadioCounters, RawDevice, SsidOverride};
pub use mac::MacAddress;
pub use node::{NodeFeed, NodeFeedEntry};
pub use record::{AccessPointRecord, Snapshot};
pub use site::Site;
