//! Endpoint paths of the channel API.
//!
//! All URLs are plain concatenation onto the configured base URL.

use std::fmt;

use crate::error::ClientError;

/// Header carrying the channel write key on updates.
pub const API_KEY_HEADER: &str = "X-THINGSPEAKAPIKEY";

/// Number of data fields a channel has.
pub const FIELD_COUNT: u8 = 8;

/// A channel field number in `1..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(u8);

impl FieldId {
    pub fn new(field: u8) -> Result<Self, ClientError> {
        if (1..=FIELD_COUNT).contains(&field) {
            Ok(Self(field))
        } else {
            Err(ClientError::FieldOutOfRange(field))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for FieldId {
    type Error = ClientError;

    fn try_from(field: u8) -> Result<Self, Self::Error> {
        Self::new(field)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn update(base: &str) -> String {
    format!("{base}/update")
}

pub fn channel_feed(base: &str, channel: u64) -> String {
    format!("{base}/channels/{channel}/feed.json")
}

pub fn channel_feed_last(base: &str, channel: u64) -> String {
    format!("{base}/channels/{channel}/feed/last.json")
}

pub fn field_feed(base: &str, channel: u64, field: FieldId) -> String {
    format!("{base}/channels/{channel}/field/{field}.json")
}

pub fn field_feed_last(base: &str, channel: u64, field: FieldId) -> String {
    format!("{base}/channels/{channel}/field/{field}/last.json")
}

pub fn status_updates(base: &str, channel: u64) -> String {
    format!("{base}/channels/{channel}/status.json")
}

pub fn public_channels(base: &str) -> String {
    format!("{base}/channels/public.json")
}

pub fn user_info(base: &str, user: &str) -> String {
    format!("{base}/users/{user}.json")
}

pub fn user_channels(base: &str, user: &str) -> String {
    format!("{base}/users/{user}/channels.json")
}
