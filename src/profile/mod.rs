// ssprs-profile/src/profile/mod.rs

//! Cast data model and the algorithms that edit it.

mod dicts;
mod errors;
mod extend;
mod insert;
mod metadata;
#[allow(clippy::module_inception)]
mod profile;
mod profile_list;
mod samples;
mod thin;

pub use dicts::{DictError, Direction, Flag, ProbeType, SensorType, Source};
pub use errors::ProfileError;
pub use extend::ExtensionOutcome;
pub use insert::{InsertOutcome, InsertPosition};
pub use metadata::Metadata;
pub use profile::Profile;
pub use profile_list::ProfileList;
pub use samples::{SampleRow, Samples};
