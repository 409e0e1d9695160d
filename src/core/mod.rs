//! Layer 0: the save document and the pure helpers around it.

mod clock;
mod entitlement;
pub mod merge;
mod save;
mod trial;

pub use clock::{SaveClock, WallMs};
pub use entitlement::{resolve, resolve_str, Community, Entitlement, ExportTier, InvalidPlan, Plan};
pub use save::{
    Flags, LanguagePack, Profile, SaveDocument, SaveMeta, SaveTelemetry, ScrollState, Theme,
    UiPrefs, BASELINE_LANGUAGE_REF, SAVE_SCHEMA_VERSION,
};
pub use trial::Trial;
