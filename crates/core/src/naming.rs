//! Track audio storage naming convention.
//!
//! Generates deterministic object keys for track audio blobs from server-side
//! ids, so caller-supplied names never influence where bytes land.

use crate::types::DbId;

/// MIME type track uploads are signed for.
pub const TRACK_AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Object key for a track's audio blob.
///
/// Convention: `tracks/{artist_id}/{track_id}.mp3`
///
/// # Examples
///
/// ```
/// use waxwing_core::naming::track_audio_key;
///
/// assert_eq!(track_audio_key(7, 42), "tracks/7/42.mp3");
/// ```
pub fn track_audio_key(artist_id: DbId, track_id: DbId) -> String {
    format!("tracks/{artist_id}/{track_id}.mp3")
}
