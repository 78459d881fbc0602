// hydroini/src/bc/forcing.rs

//! Strongly typed `[Forcing]` blocks.

use super::{registry, FORCING};
use crate::error::{IniError, Result};
use crate::field_types::FieldValue;
use crate::schema::{DataTable, TypedRecord};
use std::str::FromStr;
use strum_macros::{AsRefStr, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumIter, EnumString, strum_macros::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum TimeInterpolation {
    #[strum(serialize = "linear")]
    Linear,
    #[strum(serialize = "blockFrom")]
    BlockFrom,
    #[strum(serialize = "blockTo")]
    BlockTo,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumIter, EnumString, strum_macros::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum VerticalInterpolation {
    #[strum(serialize = "linear")]
    Linear,
    #[strum(serialize = "log")]
    Log,
    #[strum(serialize = "block")]
    Block,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumIter, EnumString, strum_macros::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum VerticalPositionType {
    #[strum(serialize = "percBed")]
    PercentageBed,
    #[strum(serialize = "ZBed")]
    ZBed,
}

/// One `quantity`/`unit` pair of a forcing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityUnit {
    pub quantity: String,
    pub unit: String,
}

impl QuantityUnit {
    pub fn new<Q: Into<String>, U: Into<String>>(quantity: Q, unit: U) -> Self {
        Self {
            quantity: quantity.into(),
            unit: unit.into(),
        }
    }
}

/// The forcing function with the parameters that only it carries.
#[derive(Debug, Clone, PartialEq)]
pub enum ForcingFunction {
    TimeSeries {
        time_interpolation: TimeInterpolation,
        offset: f64,
        factor: f64,
    },
    Harmonic {
        factor: f64,
    },
    Astronomic {
        factor: f64,
    },
    HarmonicCorrection,
    AstronomicCorrection,
    T3D {
        offset: f64,
        factor: f64,
        vertical_positions: Vec<f64>,
        vertical_interpolation: VerticalInterpolation,
        vertical_position_type: VerticalPositionType,
    },
    QhTable,
    Constant {
        offset: f64,
        factor: f64,
    },
}

impl ForcingFunction {
    /// Value of the `function` key.
    pub fn name(&self) -> &'static str {
        match self {
            ForcingFunction::TimeSeries { .. } => "timeseries",
            ForcingFunction::Harmonic { .. } => "harmonic",
            ForcingFunction::Astronomic { .. } => "astronomic",
            ForcingFunction::HarmonicCorrection => "harmoniccorrection",
            ForcingFunction::AstronomicCorrection => "astronomiccorrection",
            ForcingFunction::T3D { .. } => "t3d",
            ForcingFunction::QhTable => "qhtable",
            ForcingFunction::Constant { .. } => "constant",
        }
    }

    /// A linear time series without scaling.
    pub fn time_series() -> Self {
        ForcingFunction::TimeSeries {
            time_interpolation: TimeInterpolation::Linear,
            offset: 0.0,
            factor: 1.0,
        }
    }
}

/// A `[Forcing]` block: a named boundary signal and its table.
#[derive(Debug, Clone)]
pub struct Forcing {
    pub name: String,
    pub function: ForcingFunction,
    pub quantities: Vec<QuantityUnit>,
    pub table: DataTable,
    /// Record this forcing was read from; keeps comments, extras and layout
    source: Option<TypedRecord>,
}

impl PartialEq for Forcing {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.function == other.function
            && self.quantities == other.quantities
            && self.table == other.table
    }
}

impl Forcing {
    pub fn new<S: Into<String>>(name: S, function: ForcingFunction) -> Self {
        Self {
            name: name.into(),
            function,
            quantities: Vec::new(),
            table: DataTable::new(),
            source: None,
        }
    }

    pub fn with_quantity<Q: Into<String>, U: Into<String>>(mut self, quantity: Q, unit: U) -> Self {
        self.quantities.push(QuantityUnit::new(quantity, unit));
        self
    }

    pub fn with_table(mut self, table: DataTable) -> Self {
        self.table = table;
        self
    }

    /// The record this forcing was read from, if any.
    pub fn source(&self) -> Option<&TypedRecord> {
        self.source.as_ref()
    }

    /// Convert back to a typed record.
    ///
    /// A forcing read from a file starts from its source record, so values
    /// that did not change keep their written form.
    pub fn to_record(&self) -> Result<TypedRecord> {
        let function = self.function.name();
        let mut record = match &self.source {
            Some(source) if source.variant() == Some(function) => source.clone(),
            _ => TypedRecord::new(registry()?.schema(FORCING, Some(function))?),
        };

        record.set("name", self.name.as_str())?;
        match &self.function {
            ForcingFunction::TimeSeries {
                time_interpolation,
                offset,
                factor,
            } => {
                record.set("timeInterpolation", time_interpolation.to_string())?;
                record.set("offset", *offset)?;
                record.set("factor", *factor)?;
            }
            ForcingFunction::Harmonic { factor } | ForcingFunction::Astronomic { factor } => {
                record.set("factor", *factor)?;
            }
            ForcingFunction::T3D {
                offset,
                factor,
                vertical_positions,
                vertical_interpolation,
                vertical_position_type,
            } => {
                record.set("offset", *offset)?;
                record.set("factor", *factor)?;
                record.set("verticalPositions", vertical_positions.clone())?;
                record.set("verticalInterpolation", vertical_interpolation.to_string())?;
                record.set("verticalPositionType", vertical_position_type.to_string())?;
            }
            ForcingFunction::Constant { offset, factor } => {
                record.set("offset", *offset)?;
                record.set("factor", *factor)?;
            }
            ForcingFunction::HarmonicCorrection
            | ForcingFunction::AstronomicCorrection
            | ForcingFunction::QhTable => {}
        }

        record.set_all(
            "quantity",
            self.quantities.iter().map(|q| q.quantity.clone()).collect(),
        )?;
        record.set_all(
            "unit",
            self.quantities.iter().map(|q| q.unit.clone()).collect(),
        )?;
        record.set_table(if self.table.is_empty() {
            None
        } else {
            Some(self.table.clone())
        });
        record.validate()?;
        Ok(record)
    }
}

impl TryFrom<&TypedRecord> for Forcing {
    type Error = IniError;

    fn try_from(record: &TypedRecord) -> Result<Self> {
        if !record.type_name().eq_ignore_ascii_case(FORCING) {
            return Err(IniError::UnknownBlockType {
                header: record.header().to_string(),
                block_index: None,
            });
        }

        let function = match record.variant().unwrap_or_default() {
            "timeseries" => ForcingFunction::TimeSeries {
                time_interpolation: parse_enum(record, "timeInterpolation")?,
                offset: float(record, "offset")?,
                factor: float(record, "factor")?,
            },
            "harmonic" => ForcingFunction::Harmonic {
                factor: float(record, "factor")?,
            },
            "astronomic" => ForcingFunction::Astronomic {
                factor: float(record, "factor")?,
            },
            "harmoniccorrection" => ForcingFunction::HarmonicCorrection,
            "astronomiccorrection" => ForcingFunction::AstronomicCorrection,
            "t3d" => ForcingFunction::T3D {
                offset: float(record, "offset")?,
                factor: float(record, "factor")?,
                vertical_positions: record
                    .get("verticalPositions")
                    .and_then(FieldValue::as_float_list)
                    .map(<[f64]>::to_vec)
                    .ok_or_else(|| missing(record, "verticalPositions"))?,
                vertical_interpolation: parse_enum(record, "verticalInterpolation")?,
                vertical_position_type: parse_enum(record, "verticalPositionType")?,
            },
            "qhtable" => ForcingFunction::QhTable,
            "constant" => ForcingFunction::Constant {
                offset: float(record, "offset")?,
                factor: float(record, "factor")?,
            },
            other => {
                return Err(IniError::UnknownVariant {
                    type_name: FORCING.to_string(),
                    field: super::FUNCTION.to_string(),
                    value: other.to_string(),
                    block_index: None,
                })
            }
        };

        let quantities = record
            .pairs("quantity", "unit")
            .into_iter()
            .map(|(quantity, unit)| QuantityUnit::new(quantity.to_string(), unit.to_string()))
            .collect();

        Ok(Self {
            name: record
                .get_str("name")
                .ok_or_else(|| missing(record, "name"))?
                .to_string(),
            function,
            quantities,
            table: record.table().cloned().unwrap_or_default(),
            source: Some(record.clone()),
        })
    }
}

fn missing(record: &TypedRecord, field: &str) -> IniError {
    IniError::missing_field(
        field.to_string(),
        record.header().to_string(),
        record.variant().map(str::to_string),
    )
}

fn float(record: &TypedRecord, field: &str) -> Result<f64> {
    record.get_f64(field).ok_or_else(|| missing(record, field))
}

fn parse_enum<E: FromStr>(record: &TypedRecord, field: &str) -> Result<E> {
    let text = record.get_str(field).ok_or_else(|| missing(record, field))?;
    E::from_str(text).map_err(|_| {
        IniError::type_coercion(field.to_string(), text.to_string(), "enumeration".to_string())
            .in_block(record.header(), record.variant())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::schema::interpret;

    const T3D: &str = "\
[Forcing]
name                  = river_t3d
function              = t3d
offset                = 0.0
factor                = 1.0
verticalPositions     = -10.0 -5.0 0.0
verticalInterpolation = LINEAR
verticalPositionType  = ZBed
quantity              = time
unit                  = minutes since 2015-01-01 00:00:00
quantity              = salinitybnd
unit                  = ppt
0.0    30.0    31.0    32.0
60.0   30.5    31.5    32.5
";

    fn forcing(text: &str) -> Forcing {
        let records = interpret(&parse(text).unwrap(), registry().unwrap()).unwrap();
        Forcing::try_from(&records[0]).unwrap()
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!(
            TimeInterpolation::from_str("BLOCKFROM").unwrap(),
            TimeInterpolation::BlockFrom
        );
        let name: &str = VerticalPositionType::ZBed.as_ref();
        assert_eq!(name, "ZBed");
        assert_eq!(VerticalInterpolation::Log.to_string(), "log");
        assert!(TimeInterpolation::from_str("cubic").is_err());
    }

    #[test]
    fn test_t3d_from_record() {
        let forcing = forcing(T3D);
        assert_eq!(forcing.name, "river_t3d");
        assert_eq!(
            forcing.function,
            ForcingFunction::T3D {
                offset: 0.0,
                factor: 1.0,
                vertical_positions: vec![-10.0, -5.0, 0.0],
                vertical_interpolation: VerticalInterpolation::Linear,
                vertical_position_type: VerticalPositionType::ZBed,
            }
        );
        assert_eq!(forcing.quantities[1], QuantityUnit::new("salinitybnd", "ppt"));
        assert_eq!(forcing.table.row_count(), 2);
        assert_eq!(forcing.table.column_count(), Some(4));
    }

    #[test]
    fn test_unchanged_forcing_keeps_record() {
        let forcing = forcing(T3D);
        let record = forcing.to_record().unwrap();
        assert_eq!(Some(&record), forcing.source());
        assert_eq!(
            record.values("verticalInterpolation")[0].raw_text(),
            "LINEAR"
        );
    }

    #[test]
    fn test_changed_function_builds_new_record() {
        let mut forcing = forcing(T3D);
        forcing.function = ForcingFunction::Constant {
            offset: 0.0,
            factor: 2.0,
        };
        forcing.quantities.truncate(1);
        forcing.table = DataTable::from_numeric(vec![vec![1.0]]).unwrap();
        let record = forcing.to_record().unwrap();
        assert_eq!(record.variant(), Some("constant"));
        assert_eq!(record.get_f64("factor"), Some(2.0));
        assert!(record.get("verticalPositions").is_none());
    }

    #[test]
    fn test_new_timeseries() {
        let forcing = Forcing::new("left", ForcingFunction::time_series())
            .with_quantity("time", "minutes since 2015-01-01 00:00:00")
            .with_quantity("waterlevelbnd", "m")
            .with_table(DataTable::from_numeric(vec![vec![0.0, 1.0], vec![60.0, 1.5]]).unwrap());
        let record = forcing.to_record().unwrap();
        assert_eq!(record.get_str("timeInterpolation"), Some("linear"));
        assert!(!record.is_present("offset"));
        assert_eq!(Forcing::try_from(&record).unwrap(), forcing);
    }

    #[test]
    fn test_timeseries_without_table_is_invalid() {
        let forcing = Forcing::new("left", ForcingFunction::time_series())
            .with_quantity("time", "minutes");
        assert_eq!(forcing.to_record().unwrap_err().category(), "table");
    }
}
