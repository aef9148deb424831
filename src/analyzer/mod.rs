use std::path::Path;

use anyhow::Result;

use crate::models::ModuleRef;

pub mod gomod;

pub trait Analyzer {
    fn analyze(&self, path: &Path) -> Result<Vec<ModuleRef>>;
}
