pub mod config;
pub mod cycle;
pub mod error;
pub mod export;
pub mod gateway;
pub mod io;
pub mod model;
pub mod normalize;
pub mod paths;
pub mod report;
pub mod status;
pub mod sync;

pub use error::{PersistError, PrayerError, Result, SchemaError, ValidationError};
pub use model::{Participant, Roster};
pub use sync::{MirrorStatus, Outcome, Session};
