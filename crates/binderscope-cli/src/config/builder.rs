use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use crate::cli::{AnalysisOptions, PredictArgs};
use crate::error::{CliError, Result};
use binderscope::engine::config::{AnalysisConfig, AnalysisConfigBuilder};
use binderscope::workflows::prediction::PredictorConfig;
use std::path::Path;
use std::str::FromStr;

/// Everything the `analyze` and `evaluate` commands need besides their inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub analysis: AnalysisConfig,
    pub hotspots: usize,
}

pub fn build_analysis_settings(options: &AnalysisOptions) -> Result<AnalysisSettings> {
    let defaults = DefaultsConfig::default();
    let file_config = load_file(options.config.as_deref())?;
    let mut file_config = apply_set_values(file_config, &options.set_values)?;

    let analysis_file = file_config.analysis.take().unwrap_or_default();
    let include_hetero = options.include_hetero
        || analysis_file
            .include_hetero
            .unwrap_or(defaults.include_hetero);

    let analysis = AnalysisConfigBuilder::new()
        .cutoff(
            options
                .cutoff
                .or(analysis_file.cutoff)
                .unwrap_or(defaults.cutoff),
        )
        .clash_threshold(
            options
                .clash_threshold
                .or(analysis_file.clash_threshold)
                .unwrap_or(defaults.clash_threshold),
        )
        .include_hetero(include_hetero)
        .spatial_index_min_pairs(
            analysis_file
                .spatial_index_min_pairs
                .unwrap_or(defaults.spatial_index_min_pairs),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let hotspots = file_config
        .report
        .and_then(|r| r.hotspots)
        .unwrap_or(defaults.hotspot_count);

    Ok(AnalysisSettings { analysis, hotspots })
}

pub fn build_predictor_config(args: &PredictArgs) -> Result<PredictorConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = load_file(args.config.as_deref())?;
    let prediction_file = file_config.prediction.unwrap_or_default();

    let model = args
        .model
        .clone()
        .or(prediction_file.model)
        .unwrap_or(defaults.model);
    let config = PredictorConfig::new(&model);
    Ok(match prediction_file.endpoint {
        Some(endpoint) => config.with_endpoint(&endpoint),
        None => config,
    })
}

fn load_file(path: Option<&Path>) -> Result<FileConfig> {
    match path {
        Some(path) => FileConfig::from_file(path),
        None => Ok(FileConfig::default()),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "analysis.cutoff" => {
                config.analysis.get_or_insert_with(Default::default).cutoff =
                    Some(parse_value(key, value, "float")?);
            }
            "analysis.clash-threshold" => {
                config
                    .analysis
                    .get_or_insert_with(Default::default)
                    .clash_threshold = Some(parse_value(key, value, "float")?);
            }
            "analysis.include-hetero" => {
                config
                    .analysis
                    .get_or_insert_with(Default::default)
                    .include_hetero = Some(parse_value(key, value, "boolean")?);
            }
            "analysis.spatial-index-min-pairs" => {
                config
                    .analysis
                    .get_or_insert_with(Default::default)
                    .spatial_index_min_pairs = Some(parse_value(key, value, "integer")?);
            }
            "report.hotspots" => {
                config.report.get_or_insert_with(Default::default).hotspots =
                    Some(parse_value(key, value, "integer")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
