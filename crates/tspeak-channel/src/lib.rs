//! Channel registry and per-channel throttled update scheduling.
//!
//! This is the core of tspeak. A channel is attached once with its
//! credentials; in throttled mode each attached channel owns an
//! [`UpdateScheduler`] that serializes its updates:
//! - strict FIFO, one POST in flight per channel
//! - a fixed cool-down after each completion before the next dispatch
//! - transport failures are delivered, never retried, never stall the queue

pub mod ack;
pub mod channel;
pub mod config;
pub mod error;
pub mod registry;
pub mod scheduler;

pub use ack::is_positive_ack;
pub use channel::{Channel, ChannelKeys, ChannelState};
pub use config::{RegistryConfig, DEFAULT_UPDATE_TIMEOUT};
pub use error::{ChannelError, Result};
pub use registry::ChannelRegistry;
pub use scheduler::{
    dispatch_update, UpdateCompletion, UpdateResponder, UpdateScheduler, UpdateTask,
};
