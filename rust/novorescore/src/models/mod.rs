mod dataset;
mod enriched;
mod identification;
pub mod peptidoform;
mod psm;

pub use dataset::DatasetLabel;
pub use enriched::EnrichedIdentification;
pub use identification::{
    IdentificationRecord,
    LocatedIdentification,
    RunLocations,
    SpectrumKey,
    SpectrumMetadata,
};
pub use peptidoform::{
    Peptidoform,
    PeptidoformParsingError,
    Residue,
};
pub use psm::{
    FeatureBag,
    Psm,
};
