use std::{fs, path::Path};

use burn::{
    module::Module,
    record::{CompactRecorder, Recorder},
    tensor::backend::Backend,
};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{Error, Result},
    models::sep_cnn,
    text::Vectorizer,
};

/// File name of the bundle manifest
pub static BUNDLE_FILE: &str = "bundle.json";

/// Weights file stem; the recorder appends its own extension
pub static WEIGHTS_STEM: &str = "model";

/// Bundle schema version; bumped on any incompatible layout change
pub const BUNDLE_VERSION: u32 = 1;

/// The persisted train/test contract
///
/// One manifest carries everything inference needs to agree with training:
/// the fitted vectorizer (vocabulary plus recorded padding length), the
/// network configuration, and the name of the weights file sitting next to
/// it. Loading fails fast instead of producing nonsensical predictions.
#[derive(Debug, Serialize, Deserialize)]
pub struct Bundle {
    /// Schema version of this bundle
    pub version: u32,

    /// Network configuration used to rebuild the module tree
    pub model: sep_cnn::Config,

    /// The fitted vectorizer state
    pub vectorizer: Vectorizer,

    /// Stem of the weights file within the bundle directory
    pub weights: String,
}

/// Persist the trained network and its vectorizer as one bundle
pub fn save<B: Backend>(
    dir: &Path,
    model_config: &sep_cnn::Config,
    vectorizer: &Vectorizer,
    model: sep_cnn::SepCnn<B>,
) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir.display().to_string(), e))?;

    CompactRecorder::new().record(model.into_record(), dir.join(WEIGHTS_STEM))?;

    let bundle = Bundle {
        version: BUNDLE_VERSION,
        model: model_config.clone(),
        vectorizer: vectorizer.clone(),
        weights: WEIGHTS_STEM.to_string(),
    };

    let manifest = dir.join(BUNDLE_FILE);
    let json = serde_json::to_string_pretty(&bundle)?;
    fs::write(&manifest, json).map_err(|e| Error::io(manifest.display().to_string(), e))?;

    log::info!("wrote artifact bundle to {}", dir.display());

    Ok(())
}

/// Reload a bundle and rebuild the trained network on the given device
pub fn load<B: Backend>(dir: &Path, device: &B::Device) -> Result<(Bundle, sep_cnn::SepCnn<B>)> {
    let manifest = dir.join(BUNDLE_FILE);
    let raw = fs::read_to_string(&manifest)
        .map_err(|e| Error::artifact(manifest.display().to_string(), e.to_string()))?;

    let bundle: Bundle = serde_json::from_str(&raw)
        .map_err(|e| Error::artifact(manifest.display().to_string(), e.to_string()))?;

    if bundle.version != BUNDLE_VERSION {
        return Err(Error::artifact(
            manifest.display().to_string(),
            format!(
                "bundle version {} is not supported (expected {BUNDLE_VERSION})",
                bundle.version
            ),
        ));
    }

    if bundle.model.num_features != bundle.vectorizer.num_features() {
        return Err(Error::ShapeMismatch(format!(
            "bundle expects {} features but its vectorizer provides {}",
            bundle.model.num_features,
            bundle.vectorizer.num_features(),
        )));
    }

    let weights = dir.join(&bundle.weights);
    let record = CompactRecorder::new()
        .load(weights.clone(), device)
        .map_err(|e| Error::artifact(weights.display().to_string(), e.to_string()))?;

    let model = bundle.model.init::<B>(device).load_record(record);

    log::info!(
        "loaded artifact bundle from {} (vocabulary {}, sequence length {})",
        dir.display(),
        bundle.vectorizer.vocab_size(),
        bundle.vectorizer.max_length(),
    );

    Ok((bundle, model))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    type TestBackend = burn::backend::NdArray<f32>;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("autodl-text-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn fitted() -> Vectorizer {
        Vectorizer::fit(&[
            "rust burns bright".to_string(),
            "bright ideas burn".to_string(),
        ])
        .unwrap()
    }

    #[test]
    fn round_trips_the_bundle() {
        let dir = temp_dir("round-trip");
        let device = Default::default();
        let vectorizer = fitted();
        let config = sep_cnn::Config::new(vectorizer.num_features(), 3).with_filters(4);
        let model = config.init::<TestBackend>(&device);

        save(&dir, &config, &vectorizer, model).unwrap();
        let (bundle, reloaded) = load::<TestBackend>(&dir, &device).unwrap();

        assert_eq!(bundle.version, BUNDLE_VERSION);
        assert_eq!(bundle.vectorizer, vectorizer);
        assert_eq!(bundle.model.num_classes, 3);
        assert_eq!(
            reloaded
                .forward_logits(burn::tensor::Tensor::zeros([1, 15], &device))
                .dims(),
            [1, 3]
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn fails_fast_when_the_manifest_is_missing() {
        let dir = temp_dir("no-manifest");
        let device = Default::default();

        let err = load::<TestBackend>(&dir, &device).unwrap_err();

        assert!(matches!(err, Error::ArtifactMissing { .. }));
    }

    #[test]
    fn fails_fast_when_the_weights_are_missing() {
        let dir = temp_dir("no-weights");
        let device = Default::default();
        let vectorizer = fitted();
        let config = sep_cnn::Config::new(vectorizer.num_features(), 3).with_filters(4);
        let model = config.init::<TestBackend>(&device);

        save(&dir, &config, &vectorizer, model).unwrap();
        fs::remove_file(dir.join(format!("{WEIGHTS_STEM}.mpk"))).unwrap();

        let err = load::<TestBackend>(&dir, &device).unwrap_err();
        assert!(matches!(err, Error::ArtifactMissing { .. }));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_a_bundle_whose_vocabulary_drifted() {
        let dir = temp_dir("drift");
        let device = Default::default();
        let vectorizer = fitted();
        // Network sized for a different vocabulary than the bundled one.
        let config = sep_cnn::Config::new(vectorizer.num_features() + 7, 3).with_filters(4);
        let model = config.init::<TestBackend>(&device);

        save(&dir, &config, &vectorizer, model).unwrap();

        let err = load::<TestBackend>(&dir, &device).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch(_)));

        let _ = fs::remove_dir_all(&dir);
    }
}
