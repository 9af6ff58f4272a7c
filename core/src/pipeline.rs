use crate::inference::RegressionModel;
use crate::prelude::{PipelineConfig, ProcessingStage, StageResult};
use crate::processing::{
    ColumnValidator, DepthProfile, FeatureEngineer, FeatureTable, InputTensor, PredictionVector,
    Predictor, ScaledPair, ScalerPair, SmoothedTable, Smoother, TensorShaper, ValidatedTable,
};
use crate::schema::FeatureColumn;
use crate::table::DataTable;

/// Every table produced before model invocation, kept for inspection.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub validated: ValidatedTable,
    pub smoothed: SmoothedTable,
    pub features: FeatureTable,
    pub scaled: ScaledPair,
    pub tensor: InputTensor,
}

impl PreparedRun {
    /// Smoothed depth values from the feature table.
    pub fn depth(&self) -> Vec<f64> {
        self.features.column(FeatureColumn::Depth).to_vec()
    }

    pub fn depth_profile(&self, predictions: &PredictionVector) -> DepthProfile {
        DepthProfile::pair(&self.depth(), predictions)
    }
}

/// Linear validate → smooth → engineer → scale → shape → predict chain.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> StageResult<Self> {
        // Reject bad parameters up front rather than mid-run.
        Smoother::new(config.alpha, config.weighting)?;
        ScalerPair::new(config.fit_scope.clone(), config.degenerate_policy)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn prepare(&self, raw: &DataTable) -> StageResult<PreparedRun> {
        let mut validator = ColumnValidator::new();
        let validated = validator.execute(raw)?;
        validator.cleanup();

        let mut smoother = Smoother::new(self.config.alpha, self.config.weighting)?;
        let smoothed = smoother.execute(&validated)?;
        smoother.cleanup();

        let mut engineer = FeatureEngineer::new(self.config.well_number);
        let features = engineer.execute(&smoothed)?;
        engineer.cleanup();

        let mut scalers =
            ScalerPair::new(self.config.fit_scope.clone(), self.config.degenerate_policy)?;
        let scaled = scalers.execute(&features)?;
        scalers.cleanup();

        let mut shaper = TensorShaper::new();
        let tensor = shaper.execute(&scaled.standardized)?;
        shaper.cleanup();

        Ok(PreparedRun {
            validated,
            smoothed,
            features,
            scaled,
            tensor,
        })
    }

    /// Runs the model; the model is released before returning.
    pub fn predict(
        &self,
        prepared: &PreparedRun,
        model: Box<dyn RegressionModel>,
    ) -> StageResult<PredictionVector> {
        let mut predictor = Predictor::new(model);
        let predictions = predictor.execute(&prepared.tensor);
        predictor.cleanup();
        predictions
    }
}
