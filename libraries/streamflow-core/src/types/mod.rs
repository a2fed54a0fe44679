mod ids;
mod track;

pub use ids::{PlaylistId, SessionKey, TrackId};
pub use track::{Track, UNKNOWN_ALBUM};
