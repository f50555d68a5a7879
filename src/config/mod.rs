//! Where firetrack keeps its files, and the user settings stored there

pub mod paths;
pub mod settings;

pub use paths::FirePaths;
pub use settings::Settings;
