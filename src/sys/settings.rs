use std::path::PathBuf;

use thiserror::Error;

use crate::model::ExclusionList;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not access settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no settings location could be determined")]
    NoLocation,
}

/// Read side of the persisted configuration, as seen by the placement engine.
///
/// Change notification is delivered separately as
/// [`crate::actor::placer::Event::ExclusionListChanged`].
pub trait SettingsStore {
    fn exclusion_list(&self) -> Result<ExclusionList, SettingsError>;
}
