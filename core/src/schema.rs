//! Typed column schema for the uploaded well log and the model feature table.
//!
//! The model was trained against one exact feature ordering, so the order is
//! fixed here by declaration rather than looked up from strings at run time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Curves every upload must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputColumn {
    Zone,
    Depth,
    Dtco,
    Nphi,
    Rhob,
    Rla3,
    Rla5,
    Sgr,
}

impl InputColumn {
    pub const ALL: [InputColumn; 8] = [
        InputColumn::Zone,
        InputColumn::Depth,
        InputColumn::Dtco,
        InputColumn::Nphi,
        InputColumn::Rhob,
        InputColumn::Rla3,
        InputColumn::Rla5,
        InputColumn::Sgr,
    ];

    /// Column header as it appears in the uploaded table.
    pub fn name(self) -> &'static str {
        match self {
            InputColumn::Zone => "zone",
            InputColumn::Depth => "Depth",
            InputColumn::Dtco => "DTCO",
            InputColumn::Nphi => "NPHI",
            InputColumn::Rhob => "RHOB",
            InputColumn::Rla3 => "RLA3",
            InputColumn::Rla5 => "RLA5",
            InputColumn::Sgr => "SGR",
        }
    }
}

impl fmt::Display for InputColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a feature column's values come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureSource {
    /// Configured well identifier, identical on every row.
    WellConstant,
    /// 0-based row position.
    RowIndex,
    /// Smoothed input curve copied as-is.
    Copied(InputColumn),
    /// Natural log of a smoothed input curve through `log_or_zero`.
    LogOf(InputColumn),
}

/// Columns of the feature table in model order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureColumn {
    WellNumber,
    AbsDepth,
    Zone,
    Depth,
    Dtco,
    Nphi,
    Rhob,
    LogRla3,
    LogRla5,
    Sgr,
}

impl FeatureColumn {
    pub const SCHEMA: [FeatureColumn; 10] = [
        FeatureColumn::WellNumber,
        FeatureColumn::AbsDepth,
        FeatureColumn::Zone,
        FeatureColumn::Depth,
        FeatureColumn::Dtco,
        FeatureColumn::Nphi,
        FeatureColumn::Rhob,
        FeatureColumn::LogRla3,
        FeatureColumn::LogRla5,
        FeatureColumn::Sgr,
    ];

    pub const WIDTH: usize = Self::SCHEMA.len();

    pub fn name(self) -> &'static str {
        match self {
            FeatureColumn::WellNumber => "well number",
            FeatureColumn::AbsDepth => "abs depth",
            FeatureColumn::Zone => "zone",
            FeatureColumn::Depth => "Depth",
            FeatureColumn::Dtco => "DTCO",
            FeatureColumn::Nphi => "NPHI",
            FeatureColumn::Rhob => "RHOB",
            FeatureColumn::LogRla3 => "log(RLA3)",
            FeatureColumn::LogRla5 => "log(RLA5)",
            FeatureColumn::Sgr => "SGR",
        }
    }

    /// Position of the column inside the feature table.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn source(self) -> FeatureSource {
        match self {
            FeatureColumn::WellNumber => FeatureSource::WellConstant,
            FeatureColumn::AbsDepth => FeatureSource::RowIndex,
            FeatureColumn::Zone => FeatureSource::Copied(InputColumn::Zone),
            FeatureColumn::Depth => FeatureSource::Copied(InputColumn::Depth),
            FeatureColumn::Dtco => FeatureSource::Copied(InputColumn::Dtco),
            FeatureColumn::Nphi => FeatureSource::Copied(InputColumn::Nphi),
            FeatureColumn::Rhob => FeatureSource::Copied(InputColumn::Rhob),
            FeatureColumn::LogRla3 => FeatureSource::LogOf(InputColumn::Rla3),
            FeatureColumn::LogRla5 => FeatureSource::LogOf(InputColumn::Rla5),
            FeatureColumn::Sgr => FeatureSource::Copied(InputColumn::Sgr),
        }
    }

    /// True for columns whose values never vary within one run.
    pub fn is_constant_by_construction(self) -> bool {
        matches!(self.source(), FeatureSource::WellConstant)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::SCHEMA.iter().copied().find(|c| c.name() == name)
    }

    pub fn names() -> Vec<&'static str> {
        Self::SCHEMA.iter().map(|c| c.name()).collect()
    }
}

impl fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_schema_order_is_fixed() {
        assert_eq!(
            FeatureColumn::names(),
            vec![
                "well number",
                "abs depth",
                "zone",
                "Depth",
                "DTCO",
                "NPHI",
                "RHOB",
                "log(RLA3)",
                "log(RLA5)",
                "SGR"
            ]
        );
    }

    #[test]
    fn index_matches_schema_position() {
        for (pos, column) in FeatureColumn::SCHEMA.iter().enumerate() {
            assert_eq!(column.index(), pos);
        }
    }

    #[test]
    fn every_required_input_feeds_a_feature() {
        for input in InputColumn::ALL {
            let used = FeatureColumn::SCHEMA.iter().any(|c| match c.source() {
                FeatureSource::Copied(src) | FeatureSource::LogOf(src) => src == input,
                _ => false,
            });
            assert!(used, "{input} is never consumed");
        }
    }

    #[test]
    fn only_well_number_is_constant() {
        let constant: Vec<_> = FeatureColumn::SCHEMA
            .iter()
            .filter(|c| c.is_constant_by_construction())
            .collect();
        assert_eq!(constant, vec![&FeatureColumn::WellNumber]);
    }
}
