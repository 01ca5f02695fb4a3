//! Loading vendor offers and buyer goals from files for offline negotiation.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::validation::{self, ValidationError};
use crate::scoring::{BuyerGoals, VendorOffer};

#[derive(Debug)]
pub enum VendorImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    Invalid(ValidationError),
}

impl std::fmt::Display for VendorImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VendorImportError::Io(err) => write!(f, "failed to read vendor file: {}", err),
            VendorImportError::Csv(err) => write!(f, "invalid vendor CSV data: {}", err),
            VendorImportError::Json(err) => write!(f, "invalid vendor JSON data: {}", err),
            VendorImportError::Invalid(err) => write!(f, "rejected vendor data: {}", err),
        }
    }
}

impl std::error::Error for VendorImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VendorImportError::Io(err) => Some(err),
            VendorImportError::Csv(err) => Some(err),
            VendorImportError::Json(err) => Some(err),
            VendorImportError::Invalid(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for VendorImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for VendorImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for VendorImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<ValidationError> for VendorImportError {
    fn from(err: ValidationError) -> Self {
        Self::Invalid(err)
    }
}

/// Source layout of a vendor file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorFormat {
    Csv,
    Json,
}

impl VendorFormat {
    /// `.csv` files are read as CSV, everything else as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => VendorFormat::Csv,
            _ => VendorFormat::Json,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VendorDocument {
    List(Vec<VendorOffer>),
    Wrapped { vendors: Vec<VendorOffer> },
}

pub struct VendorImporter;

impl VendorImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<VendorOffer>, VendorImportError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, VendorFormat::from_path(path))
    }

    pub fn from_reader<R: Read>(
        reader: R,
        format: VendorFormat,
    ) -> Result<Vec<VendorOffer>, VendorImportError> {
        let vendors = match format {
            VendorFormat::Csv => {
                let mut csv_reader = csv::ReaderBuilder::new()
                    .trim(csv::Trim::All)
                    .from_reader(reader);
                csv_reader
                    .deserialize::<VendorOffer>()
                    .collect::<Result<Vec<_>, _>>()?
            }
            VendorFormat::Json => match serde_json::from_reader(reader)? {
                VendorDocument::List(vendors) => vendors,
                VendorDocument::Wrapped { vendors } => vendors,
            },
        };

        validation::vendors(&vendors)?;
        Ok(vendors)
    }

    pub fn goals_from_path<P: AsRef<Path>>(path: P) -> Result<BuyerGoals, VendorImportError> {
        let file = std::fs::File::open(path)?;
        let goals: BuyerGoals = serde_json::from_reader(file)?;
        validation::goals(&goals)?;
        Ok(goals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn csv_rows_become_offers() {
        let csv = "id,name,price,carbon,delivery,sustainability_score,willing_to_discount\n\
v-1, Coastal Mangroves ,20,10,3,8,true\n\
v-2,Peatland Trust,30,50,5,6,false\n";
        let vendors =
            VendorImporter::from_reader(Cursor::new(csv), VendorFormat::Csv).expect("import csv");

        assert_eq!(vendors.len(), 2);
        assert_eq!(vendors[0].name, "Coastal Mangroves");
        assert!(vendors[0].willing_to_discount);
        assert_eq!(vendors[1].carbon, 50.0);
    }

    #[test]
    fn json_accepts_bare_and_wrapped_lists() {
        let bare = r#"[{"id":"v-1","name":"A","price":10,"carbon":5,"delivery":2,"sustainability_score":7}]"#;
        let wrapped = format!(r#"{{"vendors": {bare}}}"#);

        let from_bare =
            VendorImporter::from_reader(Cursor::new(bare), VendorFormat::Json).expect("bare list");
        let from_wrapped = VendorImporter::from_reader(Cursor::new(wrapped), VendorFormat::Json)
            .expect("wrapped list");

        assert_eq!(from_bare, from_wrapped);
        assert!(!from_bare[0].willing_to_discount);
    }

    #[test]
    fn negative_values_are_rejected() {
        let csv = "id,name,price,carbon,delivery,sustainability_score\nv-1,A,-4,10,3,8\n";
        let err = VendorImporter::from_reader(Cursor::new(csv), VendorFormat::Csv)
            .expect_err("negative price");
        assert!(matches!(err, VendorImportError::Invalid(_)));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(VendorFormat::from_path(Path::new("offers.CSV")), VendorFormat::Csv);
        assert_eq!(VendorFormat::from_path(Path::new("offers.json")), VendorFormat::Json);
        assert_eq!(VendorFormat::from_path(Path::new("offers")), VendorFormat::Json);
    }
}
