//! StreamFlow Core
//!
//! Platform-agnostic domain types and collaborator traits shared by the
//! StreamFlow playback core and its HTTP backend client.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`, `PlaylistId`, `SessionKey`
//! - **Collaborator Traits**: `CredentialProvider`, `AudioTransport`, `SessionReporter`
//! - **Error Handling**: `CoreError` and `Result`
//!
//! The playback crate consumes these traits; the client crate implements them
//! against the REST backend. Tests implement them with in-memory fakes.
//!
//! # Example
//!
//! ```rust
//! use streamflow_core::{Track, TrackId};
//!
//! let track = Track::new("song-1", "Intro", "Some Artist", 183.5).with_album("Debut");
//!
//! assert_eq!(track.id, TrackId::new("song-1"));
//! assert_eq!(track.duration().as_secs(), 183);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CoreError, Result};
pub use traits::{AudioPayload, AudioTransport, CredentialProvider, SessionReporter, StaticCredentials};
pub use types::{PlaylistId, SessionKey, Track, TrackId, UNKNOWN_ALBUM};
