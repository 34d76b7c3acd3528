// ============================================================
// Layer 3 — Parameter Groups and Transfer Configurations
// ============================================================
// The multi-task model's parameters are partitioned into four
// groups. A transfer configuration assigns every group a
// trainable/frozen flag and a learning rate for one complete
// training run.
//
//   configuration      encoder      projection   class head   sentiment head
//   ─────────────────  ───────────  ───────────  ───────────  ──────────────
//   FullFineTune       2e-5         2e-5         2e-5         2e-5
//   HeadOnly           frozen       5e-5         5e-5         5e-5
//   SentimentHeadOnly  frozen       2e-5         frozen       2e-5
//   LayerWise          2e-5         5e-4         5e-4         5e-4
//
// Each configuration is a value, not a set of flags flipped on a
// shared model: the trainer builds a fresh model for every run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The independently freezable parts of the multi-task model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamGroup {
    Encoder,
    SharedProjection,
    ClassificationHead,
    SentimentHead,
}

impl ParamGroup {
    pub const ALL: [ParamGroup; 4] = [
        ParamGroup::Encoder,
        ParamGroup::SharedProjection,
        ParamGroup::ClassificationHead,
        ParamGroup::SentimentHead,
    ];
}

/// Training status of one parameter group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupSetting {
    pub group:     ParamGroup,
    pub trainable: bool,
    pub lr:        f64,
}

impl GroupSetting {
    fn train(group: ParamGroup, lr: f64) -> Self {
        Self { group, trainable: true, lr }
    }

    fn frozen(group: ParamGroup) -> Self {
        Self { group, trainable: false, lr: 0.0 }
    }
}

/// One of the four freezing configurations a run can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferConfig {
    /// All groups trainable, one learning rate.
    FullFineTune,
    /// Encoder frozen; projection and both heads trainable.
    HeadOnly,
    /// Encoder and classification head frozen.
    SentimentHeadOnly,
    /// All groups trainable, encoder at a lower rate than the rest.
    LayerWise,
}

impl TransferConfig {
    pub const ALL: [TransferConfig; 4] = [
        TransferConfig::FullFineTune,
        TransferConfig::HeadOnly,
        TransferConfig::SentimentHeadOnly,
        TransferConfig::LayerWise,
    ];

    /// The (group, trainable, lr) assignment for every parameter group,
    /// in `ParamGroup::ALL` order.
    pub fn groups(self) -> [GroupSetting; 4] {
        ParamGroup::ALL.map(|group| self.setting(group))
    }

    /// Setting for a single group.
    pub fn setting(self, group: ParamGroup) -> GroupSetting {
        use ParamGroup::{ClassificationHead, Encoder};
        match (self, group) {
            (TransferConfig::FullFineTune, _) => GroupSetting::train(group, 2e-5),

            (TransferConfig::HeadOnly, Encoder) => GroupSetting::frozen(group),
            (TransferConfig::HeadOnly, _)       => GroupSetting::train(group, 5e-5),

            (TransferConfig::SentimentHeadOnly, Encoder | ClassificationHead) => GroupSetting::frozen(group),
            (TransferConfig::SentimentHeadOnly, _) => GroupSetting::train(group, 2e-5),

            (TransferConfig::LayerWise, Encoder) => GroupSetting::train(group, 2e-5),
            (TransferConfig::LayerWise, _)       => GroupSetting::train(group, 5e-4),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TransferConfig::FullFineTune      => "full-fine-tune",
            TransferConfig::HeadOnly          => "head-only",
            TransferConfig::SentimentHeadOnly => "sentiment-head-only",
            TransferConfig::LayerWise         => "layer-wise",
        }
    }
}

impl fmt::Display for TransferConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransferConfig {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransferConfig::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = TransferConfig::ALL.iter().map(|c| c.name()).collect();
                anyhow::anyhow!("unknown configuration '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_config_lists_every_group_once() {
        for cfg in TransferConfig::ALL {
            let groups: Vec<ParamGroup> = cfg.groups().iter().map(|s| s.group).collect();
            assert_eq!(groups, ParamGroup::ALL.to_vec(), "{cfg}");
        }
    }

    #[test]
    fn test_head_only_freezes_encoder() {
        let enc = TransferConfig::HeadOnly.setting(ParamGroup::Encoder);
        assert!(!enc.trainable);
        let proj = TransferConfig::HeadOnly.setting(ParamGroup::SharedProjection);
        assert!(proj.trainable);
        assert_eq!(proj.lr, 5e-5);
    }

    #[test]
    fn test_sentiment_only_freezes_classification_head() {
        let cfg = TransferConfig::SentimentHeadOnly;
        assert!(!cfg.setting(ParamGroup::Encoder).trainable);
        assert!(!cfg.setting(ParamGroup::ClassificationHead).trainable);
        assert!(cfg.setting(ParamGroup::SharedProjection).trainable);
        assert!(cfg.setting(ParamGroup::SentimentHead).trainable);
    }

    #[test]
    fn test_layer_wise_encoder_lowest_rate() {
        let groups = TransferConfig::LayerWise.groups();
        assert!(groups.iter().all(|s| s.trainable));
        let enc_lr = TransferConfig::LayerWise.setting(ParamGroup::Encoder).lr;
        assert!(groups.iter().filter(|s| s.group != ParamGroup::Encoder).all(|s| s.lr > enc_lr));
    }

    #[test]
    fn test_full_fine_tune_single_rate() {
        let groups = TransferConfig::FullFineTune.groups();
        assert!(groups.iter().all(|s| s.trainable && s.lr == 2e-5));
    }

    #[test]
    fn test_parse_names() {
        for cfg in TransferConfig::ALL {
            assert_eq!(cfg.name().parse::<TransferConfig>().unwrap(), cfg);
        }
        assert!("everything".parse::<TransferConfig>().is_err());
    }
}
