pub mod identifier;
pub mod mapping;
pub mod record;
pub mod registry;

pub use identifier::{is_sequence_number, looks_like_case_number};
pub use mapping::KnownMapping;
pub use record::{PrecedentRecord, ResolutionFailure, ResolutionMeta, ResolutionOutcome};
pub use registry::RegistryConfig;
