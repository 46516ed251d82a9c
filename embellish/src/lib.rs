pub mod badges;
pub mod error;
pub mod license;
pub mod manifest;
pub mod patcher;
pub mod pipeline;
pub mod repository;
pub mod settings;
pub mod template;

pub use error::{EmbellishError, ManifestError, Result};
pub use manifest::{PackageData, Stability};
pub use pipeline::{Embellished, Source, embellish, embellish_with, render, render_with};
pub use repository::Repository;
pub use settings::Settings;
