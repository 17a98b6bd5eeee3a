//! ThingSpeak channel client with per-channel update throttling.
//!
//! tspeak attaches channels with their write/read keys, pushes field
//! updates without exceeding the platform's per-channel rate limit, and
//! reads feeds, status updates, and user listings.
//!
//! # Crate Structure
//!
//! - [`transport`]: HTTP transport abstraction and reqwest implementation
//! - [`channel`]: Channel registry and per-channel update scheduler
//! - [`client`]: High-level client (attach, update, read)

/// Re-export transport types.
pub mod transport {
    pub use tspeak_transport::*;
}

/// Re-export channel registry and scheduler types.
pub mod channel {
    pub use tspeak_channel::*;
}

/// Re-export client types.
pub mod client {
    pub use tspeak_client::*;
}

pub use tspeak_client::{
    ChannelKeys, ClientConfig, ClientError, PendingUpdate, Query, Result, ThingSpeakClient,
};
