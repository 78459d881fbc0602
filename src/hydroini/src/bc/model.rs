// hydroini/src/bc/model.rs

//! A whole boundary-conditions file.

use super::forcing::Forcing;
use super::{registry, FILE_TYPE, FILE_VERSION, GENERAL};
use crate::document::Document;
use crate::error::{IniError, Result};
use crate::schema::{flatten, flatten_with_options, interpret, FlattenOptions, TypedRecord};
use crate::WriteOptions;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The `[General]` block of a `.bc` file.
#[derive(Debug, Clone)]
pub struct General {
    pub file_version: String,
    pub file_type: String,
    source: Option<TypedRecord>,
}

impl Default for General {
    fn default() -> Self {
        Self {
            file_version: FILE_VERSION.to_string(),
            file_type: FILE_TYPE.to_string(),
            source: None,
        }
    }
}

impl PartialEq for General {
    fn eq(&self, other: &Self) -> bool {
        self.file_version == other.file_version && self.file_type == other.file_type
    }
}

impl General {
    fn to_record(&self) -> Result<TypedRecord> {
        let mut record = match &self.source {
            Some(source) => source.clone(),
            None => TypedRecord::new(registry()?.schema(GENERAL, None)?),
        };
        record.set("fileVersion", self.file_version.as_str())?;
        record.set("fileType", self.file_type.as_str())?;
        Ok(record)
    }
}

impl TryFrom<&TypedRecord> for General {
    type Error = IniError;

    fn try_from(record: &TypedRecord) -> Result<Self> {
        if !record.type_name().eq_ignore_ascii_case(GENERAL) {
            return Err(IniError::UnknownBlockType {
                header: record.header().to_string(),
                block_index: None,
            });
        }
        Ok(Self {
            file_version: record
                .get_str("fileVersion")
                .unwrap_or(FILE_VERSION)
                .to_string(),
            file_type: record.get_str("fileType").unwrap_or(FILE_TYPE).to_string(),
            source: Some(record.clone()),
        })
    }
}

/// A boundary-conditions file: general information and its forcings in
/// file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForcingModel {
    pub general: General,
    pub forcings: Vec<Forcing>,
    preamble: Vec<String>,
    /// Number of forcings written before `[General]`
    general_position: usize,
}

impl ForcingModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret a parsed document.
    ///
    /// Every `[Forcing]` must have a known function; use
    /// [`crate::schema::interpret_collecting`] with [`super::registry`] to
    /// skip the ones that do not.
    ///
    /// Only the first `[General]` block is kept. Any further one is logged
    /// and dropped, so it is not written back by [`Self::to_document`].
    pub fn from_document(document: &Document) -> Result<Self> {
        let records = interpret(document, registry()?)?;
        let mut model = Self {
            preamble: document.preamble().to_vec(),
            ..Self::default()
        };

        let mut has_general = false;
        for (index, record) in records.iter().enumerate() {
            if record.type_name().eq_ignore_ascii_case(GENERAL) {
                if has_general {
                    log::warn!("ignoring additional [General] block #{}", index);
                    continue;
                }
                model.general = General::try_from(record).map_err(|err| err.at_block(index))?;
                model.general_position = model.forcings.len();
                has_general = true;
            } else {
                let forcing = Forcing::try_from(record).map_err(|err| err.at_block(index))?;
                model.forcings.push(forcing);
            }
        }

        log::debug!(
            "read forcing model with {} forcing(s)",
            model.forcings.len()
        );
        Ok(model)
    }

    /// Convert back to a document.
    ///
    /// `[General]` goes where it was read, counted in forcings, and first for
    /// a new model or when forcings were removed since. A `[General]` block
    /// that was not read from a file is written with its version and type
    /// spelled out.
    pub fn to_document(&self) -> Result<Document> {
        let mut document = Document::new();
        for comment in &self.preamble {
            document.push_preamble(comment.clone());
        }

        let general_position = if self.general_position <= self.forcings.len() {
            self.general_position
        } else {
            0
        };
        let general = self.general.to_record()?;
        let options = FlattenOptions {
            write_defaults: self.general.source.is_none(),
        };
        let general = flatten_with_options(&general, general.schema(), &options)
            .map_err(|err| err.at_block(general_position))?;

        for (position, forcing) in self.forcings.iter().enumerate() {
            if position == general_position {
                document.push(general.clone());
            }
            let index = document.blocks().len();
            let block = forcing
                .to_record()
                .and_then(|record| flatten(&record, record.schema()))
                .map_err(|err| err.at_block(index))?;
            document.push(block);
        }
        if general_position == self.forcings.len() {
            document.push(general);
        }
        Ok(document)
    }

    /// First forcing with the given name.
    pub fn forcing(&self, name: &str) -> Option<&Forcing> {
        self.forcings.iter().find(|f| f.name == name)
    }

    pub fn push(&mut self, forcing: Forcing) -> &mut Self {
        self.forcings.push(forcing);
        self
    }

    pub fn to_ini_string(&self, options: &WriteOptions) -> Result<String> {
        crate::render_with_options(&self.to_document()?, options)
    }

    /// Read a `.bc` file.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_document(&crate::read(path)?)
    }

    /// Write a `.bc` file.
    pub fn write<P: AsRef<Path>>(&self, path: P, options: &WriteOptions) -> Result<()> {
        crate::write_with_options(&self.to_document()?, path, options)
    }
}

impl FromStr for ForcingModel {
    type Err = IniError;

    fn from_str(text: &str) -> Result<Self> {
        Self::from_document(&crate::parse(text)?)
    }
}

impl fmt::Display for ForcingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .to_ini_string(&WriteOptions::default())
            .map_err(|_| fmt::Error)?;
        write!(f, "{}", rendered)
    }
}
