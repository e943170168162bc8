//! Generation - the static catalogs the engine starts from

mod content;
mod profiles;

pub use content::*;
pub use profiles::*;
