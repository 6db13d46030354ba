//! Strategic deconfliction core: trajectory model and conflict detection.
//!
//! A [`Trajectory`] turns a waypoint list and a constant speed into a position
//! function of time. The [`DeconflictionEngine`] holds scheduled [`Flight`]s and
//! classifies a candidate as clear or conflicting.

pub mod conflict;
pub mod error;
pub mod models;
pub mod registry;
pub mod rules;
pub mod spatial;
pub mod trajectory;

pub use conflict::{first_conflict, sample_instants, DeconflictionEngine};
pub use error::{DeconflictionError, DeconflictionResult};
pub use models::{epoch_seconds, ConflictRecord, Flight, ValidationResult, Waypoint};
pub use registry::FlightRegistry;
pub use rules::ValidationConfig;
pub use spatial::{euclidean_distance, TimeWindow};
pub use trajectory::Trajectory;
