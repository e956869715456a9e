//! Client side of Spieltisch.
//!
//! A [`Synchronizer`] polls a session through a [`SessionTransport`] and
//! keeps a local mirror of it. While the user drags a token the mirror's
//! tokens are protected from stale polls; when the drag ends the whole
//! token collection is submitted. Failed requests become [`Notice`]s.
//!
//! Two transports ship: the in-process [`vtt_session::SessionGateway`] and
//! [`HttpTransport`] for a remote `vtt-server`.

pub mod config;
pub mod drag;
pub mod error;
pub mod http;
pub mod notice;
pub mod sync;
pub mod transport;

pub use config::SyncConfig;
pub use drag::DragState;
pub use error::{ClientError, ClientResult};
pub use http::HttpTransport;
pub use notice::{Notice, NoticeLevel, NoticeQueue};
pub use sync::{SyncCommand, Synchronizer};
pub use transport::SessionTransport;
