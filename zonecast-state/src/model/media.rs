//! Playlist and track references
//!
//! Thin references into the media catalog; resolving them to anything
//! playable is the streaming backend's job.

use serde::{Deserialize, Serialize};

/// Reference to a playlist in the media catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRef {
    /// Catalog identifier
    pub id: String,
    /// Human-readable playlist name
    pub name: String,
}

impl PlaylistRef {
    /// Create a new playlist reference
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Reference to a track in the media catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRef {
    /// Catalog identifier
    pub id: String,
    /// Track title
    pub title: String,
    /// Artist, if known
    pub artist: Option<String>,
}

impl TrackRef {
    /// Create a new track reference
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: None,
        }
    }

    /// Set the artist
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }
}
