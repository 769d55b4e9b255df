// Wardrobe catalog source: a JSON array of garment records
use outfitx_core::{Catalog, CatalogLoadError, Garment, Vocabulary};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Loads catalogs from disk or any reader
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the catalog file
    pub fn load(&self) -> Result<Catalog, CatalogLoadError> {
        let file = File::open(&self.path)?;
        let catalog = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %self.path.display(),
            garments = catalog.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Catalog, CatalogLoadError> {
        let garments: Vec<Garment> = serde_json::from_reader(reader)?;
        Self::build(garments)
    }

    pub fn from_json(json: &str) -> Result<Catalog, CatalogLoadError> {
        let garments: Vec<Garment> = serde_json::from_str(json)?;
        Self::build(garments)
    }

    // Vocabulary drift is reported, not rejected: affected pairs are
    // skipped at search time
    fn build(garments: Vec<Garment>) -> Result<Catalog, CatalogLoadError> {
        let catalog = Catalog::new(garments)?;

        let vocabulary = Vocabulary::global();
        for garment in &catalog {
            for issue in vocabulary.validate(garment) {
                warn!(id = %garment.id, field = %issue.field, value = %issue.value, "Garment attribute outside vocabulary");
            }
        }

        Ok(catalog)
    }
}
