//! Provincial Nominee Program catalogue and matching.

pub mod catalogue;
pub mod import;
pub mod matcher;

pub use catalogue::{AgeRange, PnpCatalogue, PnpProgram, ProgramRequirements, StreamType};
pub use import::{CatalogueImportError, PnpCatalogueImporter};
pub use matcher::{PnpMatcher, ProgramAssessment};
