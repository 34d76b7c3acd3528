// ============================================================
// Layer 6 — Encoder Store
// ============================================================
// Supplies the pretrained encoder for every training run.
//
//   - architecture: a JSON file written by burn's `Config::save`,
//     or the built-in defaults
//   - weights:      a full-precision burn record
//                   (MessagePack + gzip, `.mpk.gz`)
//
// Loading is type-safe: a record that does not match the
// configured architecture fails to load.
//
// Without weights the encoder is randomly initialised. Every
// run calls `load_encoder` again, so each transfer configuration
// starts from the same pretrained state.
//
// Reference: Burn Book §5 (Records)

use anyhow::Result;
use std::path::PathBuf;
use burn::{
    config::Config,
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};

use crate::ml::model::{TextEncoder, TextEncoderConfig};

/// Recorder for pretrained encoder weights. Full precision, so every
/// run restores exactly the stored values.
pub type EncoderRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

pub struct EncoderStore {
    config_path:  Option<PathBuf>,
    weights_path: Option<PathBuf>,
}

impl EncoderStore {
    pub fn new(config_path: Option<PathBuf>, weights_path: Option<PathBuf>) -> Self {
        Self { config_path, weights_path }
    }

    /// Encoder architecture: the configured JSON file, or `fallback`.
    pub fn encoder_config(&self, fallback: TextEncoderConfig) -> Result<TextEncoderConfig> {
        match &self.config_path {
            Some(path) => {
                let cfg = TextEncoderConfig::load(path).map_err(|e| {
                    anyhow::anyhow!("Cannot read encoder config '{}': {}", path.display(), e)
                })?;
                tracing::info!("Encoder config loaded from '{}'", path.display());
                Ok(cfg)
            }
            None => Ok(fallback),
        }
    }

    /// Build the encoder and restore pretrained weights when configured.
    pub fn load_encoder<B: Backend>(
        &self,
        config: &TextEncoderConfig,
        device: &B::Device,
    ) -> Result<TextEncoder<B>> {
        let encoder: TextEncoder<B> = config.init(device);

        let Some(path) = &self.weights_path else {
            tracing::warn!("No pretrained encoder weights configured — encoder is randomly initialised");
            return Ok(encoder);
        };

        let record = EncoderRecorder::new()
            .load(path.clone(), device)
            .map_err(|e| anyhow::anyhow!("Cannot load encoder weights '{}': {:?}", path.display(), e))?;
        tracing::debug!("Encoder weights restored from '{}'", path.display());
        Ok(encoder.load_record(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    fn small() -> TextEncoderConfig {
        TextEncoderConfig::new()
            .with_vocab_size(64)
            .with_max_seq_len(8)
            .with_d_model(8)
            .with_num_heads(2)
            .with_num_layers(1)
            .with_d_ff(16)
    }

    fn pooler(enc: &TextEncoder<TestBackend>) -> Vec<f32> {
        enc.pooler.weight.val().into_data().convert::<f32>().to_vec::<f32>().unwrap()
    }

    #[test]
    fn test_fallback_config_without_file() {
        let store = EncoderStore::new(None, None);
        let cfg = store.encoder_config(small()).unwrap();
        assert_eq!(cfg.d_model, 8);
    }

    #[test]
    fn test_config_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("encoder.json");
        small().with_num_layers(3).save(&path).unwrap();

        let store = EncoderStore::new(Some(path), None);
        let cfg = store.encoder_config(TextEncoderConfig::new()).unwrap();
        assert_eq!(cfg.num_layers, 3);
        assert_eq!(cfg.vocab_size, 64);
    }

    #[test]
    fn test_weights_restored_for_every_load() {
        let dir = tempfile::tempdir().unwrap();
        let device = Default::default();
        let pretrained: TextEncoder<TestBackend> = small().init(&device);
        let path = dir.path().join("encoder");
        EncoderRecorder::new()
            .record(pretrained.clone().into_record(), path.clone())
            .unwrap();

        let store = EncoderStore::new(None, Some(path));
        let a = store.load_encoder::<TestBackend>(&small(), &device).unwrap();
        let b = store.load_encoder::<TestBackend>(&small(), &device).unwrap();
        assert_eq!(pooler(&a), pooler(&pretrained));
        assert_eq!(pooler(&b), pooler(&pretrained));
    }

    #[test]
    fn test_missing_weights_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = EncoderStore::new(None, Some(dir.path().join("nope")));
        assert!(store.load_encoder::<TestBackend>(&small(), &Default::default()).is_err());
    }
}
