use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::math::stats::StatsHelper;
use crate::prelude::{ProcessingStage, StageError, StageResult};
use crate::processing::features::FeatureTable;
use crate::schema::FeatureColumn;
use crate::telemetry::log::LogManager;

/// Which data the scalers are fitted on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FitScope {
    /// Fit on the very table being transformed, synthetic columns included.
    /// This is the contract the pretrained model was built against.
    #[default]
    #[serde(rename = "self")]
    SelfFit,
    /// Use statistics captured from a reference distribution.
    Reference(ReferenceStatistics),
}

/// Per-column statistics in feature schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceStatistics {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl ReferenceStatistics {
    fn check_width(&self) -> StageResult<()> {
        let widths = [self.min.len(), self.max.len(), self.mean.len(), self.std.len()];
        if widths.iter().any(|&w| w != FeatureColumn::WIDTH) {
            return Err(StageError::InvalidConfig(format!(
                "reference statistics must have {} entries per field, got {:?}",
                FeatureColumn::WIDTH,
                widths
            )));
        }
        Ok(())
    }
}

/// What to do when a column cannot be standardized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Fail with `DegenerateColumn`. A single-zone upload has a constant
    /// `zone` column, so it needs `--allow-degenerate` to get predictions.
    #[default]
    Abort,
    /// Keep a unit scale so the centred column becomes all zeros.
    UnitScale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalingMethod {
    MinMax,
    Standard,
}

/// Feature table after column-wise rescaling; same columns, same order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledTable {
    pub method: ScalingMethod,
    pub values: Array2<f64>,
}

impl ScaledTable {
    pub fn column(&self, column: FeatureColumn) -> Vec<f64> {
        self.values.column(column.index()).to_vec()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }
}

/// Both scaled views of one feature table. Only `standardized` reaches the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledPair {
    pub min_max: ScaledTable,
    pub standardized: ScaledTable,
}

/// Fitted `[0, 1]` rescaler.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScaler {
    min: Array1<f64>,
    range: Array1<f64>,
}

impl MinMaxScaler {
    pub fn fit(values: &Array2<f64>) -> Self {
        let columns: Vec<Vec<f64>> = values.axis_iter(Axis(1)).map(|c| c.to_vec()).collect();
        let min: Vec<f64> = columns.iter().map(|c| StatsHelper::min(c)).collect();
        let max: Vec<f64> = columns.iter().map(|c| StatsHelper::max(c)).collect();
        Self::from_bounds(&min, &max)
    }

    fn from_bounds(min: &[f64], max: &[f64]) -> Self {
        let range = min
            .iter()
            .zip(max)
            .map(|(lo, hi)| {
                let span = hi - lo;
                if span == 0.0 {
                    1.0
                } else {
                    span
                }
            })
            .collect();
        Self {
            min: Array1::from(min.to_vec()),
            range: Array1::from_vec(range),
        }
    }

    pub fn transform(&self, values: &Array2<f64>) -> Array2<f64> {
        (values - &self.min) / &self.range
    }
}

/// Fitted zero-mean, unit-variance rescaler (population deviation).
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    pub fn fit(values: &Array2<f64>, policy: DegeneratePolicy) -> StageResult<Self> {
        let mut mean = Vec::with_capacity(values.ncols());
        let mut scale = Vec::with_capacity(values.ncols());
        for (feature, column) in FeatureColumn::SCHEMA.iter().zip(values.axis_iter(Axis(1))) {
            let samples = column.to_vec();
            mean.push(StatsHelper::mean(&samples));
            let std = if StatsHelper::is_constant(&samples) {
                Self::degenerate_scale(*feature, policy)?
            } else {
                StatsHelper::std_dev(&samples)
            };
            scale.push(std);
        }
        Ok(Self {
            mean: Array1::from_vec(mean),
            scale: Array1::from_vec(scale),
        })
    }

    fn from_reference(stats: &ReferenceStatistics, policy: DegeneratePolicy) -> StageResult<Self> {
        let mut scale = Vec::with_capacity(stats.std.len());
        for (feature, &std) in FeatureColumn::SCHEMA.iter().zip(&stats.std) {
            if std > 0.0 && std.is_finite() {
                scale.push(std);
            } else {
                scale.push(Self::degenerate_scale(*feature, policy)?);
            }
        }
        Ok(Self {
            mean: Array1::from(stats.mean.clone()),
            scale: Array1::from_vec(scale),
        })
    }

    fn degenerate_scale(feature: FeatureColumn, policy: DegeneratePolicy) -> StageResult<f64> {
        if feature.is_constant_by_construction() || policy == DegeneratePolicy::UnitScale {
            Ok(1.0)
        } else {
            Err(StageError::DegenerateColumn {
                column: feature.name().to_string(),
            })
        }
    }

    pub fn transform(&self, values: &Array2<f64>) -> Array2<f64> {
        (values - &self.mean) / &self.scale
    }
}

/// Fits min-max and standard scalers over the whole feature table.
pub struct ScalerPair {
    fit_scope: FitScope,
    policy: DegeneratePolicy,
    logger: LogManager,
}

impl ScalerPair {
    pub fn new(fit_scope: FitScope, policy: DegeneratePolicy) -> StageResult<Self> {
        if let FitScope::Reference(stats) = &fit_scope {
            stats.check_width()?;
        }
        Ok(Self {
            fit_scope,
            policy,
            logger: LogManager::new("scale"),
        })
    }

    fn fit(&self, values: &Array2<f64>) -> StageResult<(MinMaxScaler, StandardScaler)> {
        match &self.fit_scope {
            FitScope::SelfFit => Ok((
                MinMaxScaler::fit(values),
                StandardScaler::fit(values, self.policy)?,
            )),
            FitScope::Reference(stats) => Ok((
                MinMaxScaler::from_bounds(&stats.min, &stats.max),
                StandardScaler::from_reference(stats, self.policy)?,
            )),
        }
    }
}

impl ProcessingStage for ScalerPair {
    type Input = FeatureTable;
    type Output = ScaledPair;

    fn name(&self) -> &'static str {
        "scaler pair"
    }

    fn execute(&mut self, input: &FeatureTable) -> StageResult<ScaledPair> {
        let values = input.values();
        let (min_max, standard) = self.fit(values)?;

        let scope = match self.fit_scope {
            FitScope::SelfFit => "self",
            FitScope::Reference(_) => "reference",
        };
        self.logger.record(&format!(
            "fit scope {}, {} rows x {} columns, policy {:?}",
            scope,
            values.nrows(),
            values.ncols(),
            self.policy
        ));

        Ok(ScaledPair {
            min_max: ScaledTable {
                method: ScalingMethod::MinMax,
                values: min_max.transform(values),
            },
            standardized: ScaledTable {
                method: ScalingMethod::Standard,
                values: standard.transform(values),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rows vary in every column except `well number`.
    fn features(rows: usize) -> FeatureTable {
        let values = Array2::from_shape_fn((rows, FeatureColumn::WIDTH), |(r, c)| {
            if c == FeatureColumn::WellNumber.index() {
                5.0
            } else {
                (r as f64 + 1.0) * (c as f64 + 1.0) + ((r * c) % 3) as f64
            }
        });
        FeatureTable::from_values(values).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn min_max_maps_extremes_to_unit_interval() {
        let mut pair = ScalerPair::new(FitScope::SelfFit, DegeneratePolicy::Abort).unwrap();
        let scaled = pair.execute(&features(6)).unwrap();
        assert_eq!(scaled.min_max.shape(), (6, 10));

        for column in FeatureColumn::SCHEMA {
            let values = scaled.min_max.column(column);
            if column == FeatureColumn::WellNumber {
                assert!(values.iter().all(|&v| v == 0.0));
                continue;
            }
            assert!(close(StatsHelper::min(&values), 0.0));
            assert!(close(StatsHelper::max(&values), 1.0));
        }
    }

    #[test]
    fn standardized_columns_have_zero_mean_unit_std() {
        let mut pair = ScalerPair::new(FitScope::SelfFit, DegeneratePolicy::Abort).unwrap();
        let scaled = pair.execute(&features(7)).unwrap();
        assert_eq!(scaled.standardized.method, ScalingMethod::Standard);

        for column in FeatureColumn::SCHEMA.iter().skip(1) {
            let values = scaled.standardized.column(*column);
            assert!(close(StatsHelper::mean(&values), 0.0));
            assert!(close(StatsHelper::std_dev(&values), 1.0));
        }
    }

    #[test]
    fn missing_cells_are_skipped_when_fitting() {
        let mut values = features(6).values().clone();
        let dtco = FeatureColumn::Dtco.index();
        values[[3, dtco]] = f64::NAN;
        let table = FeatureTable::from_values(values).unwrap();

        let mut pair = ScalerPair::new(FitScope::SelfFit, DegeneratePolicy::Abort).unwrap();
        let scaled = pair.execute(&table).unwrap();

        let min_max = scaled.min_max.column(FeatureColumn::Dtco);
        assert!(min_max[3].is_nan());
        assert!(close(StatsHelper::min(&min_max), 0.0));
        assert!(close(StatsHelper::max(&min_max), 1.0));

        let standardized = scaled.standardized.column(FeatureColumn::Dtco);
        assert!(standardized[3].is_nan());
        assert_eq!(StatsHelper::count(&standardized), 5);
        assert!(close(StatsHelper::mean(&standardized), 0.0));
        assert!(close(StatsHelper::std_dev(&standardized), 1.0));

        let sgr = scaled.standardized.column(FeatureColumn::Sgr);
        assert!(sgr.iter().all(|v| v.is_finite()));
        assert!(close(StatsHelper::std_dev(&sgr), 1.0));
    }

    #[test]
    fn well_number_is_centred_to_zero() {
        let mut pair = ScalerPair::new(FitScope::SelfFit, DegeneratePolicy::Abort).unwrap();
        let scaled = pair.execute(&features(4)).unwrap();
        assert_eq!(
            scaled.standardized.column(FeatureColumn::WellNumber),
            vec![0.0; 4]
        );
    }

    #[test]
    fn constant_measured_column_aborts_by_default() {
        let mut values = features(5).values().clone();
        values.column_mut(FeatureColumn::Zone.index()).fill(3.0);
        let table = FeatureTable::from_values(values).unwrap();

        let mut pair = ScalerPair::new(FitScope::SelfFit, DegeneratePolicy::Abort).unwrap();
        match pair.execute(&table).unwrap_err() {
            StageError::DegenerateColumn { column } => assert_eq!(column, "zone"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unit_scale_policy_zeroes_constant_columns() {
        let mut values = features(5).values().clone();
        values.column_mut(FeatureColumn::Zone.index()).fill(3.0);
        let table = FeatureTable::from_values(values).unwrap();

        let mut pair = ScalerPair::new(FitScope::SelfFit, DegeneratePolicy::UnitScale).unwrap();
        let scaled = pair.execute(&table).unwrap();
        assert_eq!(scaled.standardized.column(FeatureColumn::Zone), vec![0.0; 5]);
        assert_eq!(scaled.min_max.column(FeatureColumn::Zone), vec![0.0; 5]);
    }

    #[test]
    fn reference_scope_uses_supplied_statistics() {
        let stats = ReferenceStatistics {
            min: vec![0.0; 10],
            max: vec![10.0; 10],
            mean: vec![1.0; 10],
            std: vec![2.0; 10],
        };
        let table = features(3);
        let mut pair =
            ScalerPair::new(FitScope::Reference(stats), DegeneratePolicy::Abort).unwrap();
        let scaled = pair.execute(&table).unwrap();

        let raw = table.values()[[2, 3]];
        assert!(close(scaled.min_max.values[[2, 3]], raw / 10.0));
        assert!(close(scaled.standardized.values[[2, 3]], (raw - 1.0) / 2.0));
    }

    #[test]
    fn reference_statistics_must_cover_schema() {
        let stats = ReferenceStatistics {
            min: vec![0.0; 8],
            max: vec![1.0; 10],
            mean: vec![0.0; 10],
            std: vec![1.0; 10],
        };
        assert!(matches!(
            ScalerPair::new(FitScope::Reference(stats), DegeneratePolicy::Abort),
            Err(StageError::InvalidConfig(_))
        ));
    }

    #[test]
    fn fit_scope_serializes_as_self() {
        assert_eq!(serde_json::to_string(&FitScope::SelfFit).unwrap(), "\"self\"");
        let policy: DegeneratePolicy = serde_json::from_str("\"unit_scale\"").unwrap();
        assert_eq!(policy, DegeneratePolicy::UnitScale);
    }
}
