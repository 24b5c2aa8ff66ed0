//! Dispatch domain models.
//!
//! Provides the data the conflict checks read and the conflicts they
//! produce. Everything here is plain data: no I/O, no clocks.
//!
//! # Domain Mappings
//!
//! | u-dispatch | Paving | Snow Removal |
//! |------------|--------|--------------|
//! | Job | Driveway/Lot Contract | Route Visit |
//! | Asset | Paver/Roller/Truck | Plow/Salter |
//! | Crew | Paving/Prep/Seal Crew | Route Crew |
//! | Roster | Daily Crew Sheet | Storm Call-Out Sheet |

mod asset;
mod conflict;
mod geo;
mod job;
mod roster;
mod window;

pub use asset::{Asset, AssetStatus};
pub use conflict::{Conflict, DominoConflict, Severity};
pub use geo::GeoPoint;
pub use job::{CrewId, Job, JobStatus};
pub use roster::{Roster, StaffAvailabilityRecord};
pub use window::DateWindow;
