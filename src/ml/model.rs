// ============================================================
// Layer 5 — Multi-Task Sentence Model
// ============================================================
// Shared encoder with two task heads:
//
//   input_ids, attention_mask  [batch, seq]
//       │
//       ▼
//   TextEncoder              → pooled sentence vector  [batch, d_model]
//       │
//       ▼
//   shared_projection        → Linear(d_model → 256)
//   L2 normalise             → shared embedding        [batch, 256]
//       │
//       ├──► classification_head  Linear(256 → 2)     → logits     [batch, 2]
//       └──► sentiment_head       Linear(256 → 1)     → sentiment  [batch]
//
// The encoder stands in for a pretrained BERT-style model: its
// contract is only "token ids + mask in, pooled vector out", and
// its weights can be loaded from a record (see infra::encoder_store).
//
// Reference: Devlin et al. (2019) BERT
//            Burn Book §3 (Building Blocks)

use burn::{
    nn::{
        attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{gelu, tanh},
};

use crate::domain::transfer::{ParamGroup, TransferConfig};
use crate::ml::loss::{multitask_loss, MultiTaskLoss};

/// Smallest norm used when normalising, so an all-zero vector stays finite.
const NORM_EPS: f64 = 1e-12;

// ─── Encoder ──────────────────────────────────────────────────────────────────

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct TextEncoderConfig {
    #[config(default = 30522)]
    pub vocab_size: usize,
    #[config(default = 128)]
    pub max_seq_len: usize,
    #[config(default = 256)]
    pub d_model: usize,
    #[config(default = 4)]
    pub num_heads: usize,
    #[config(default = 4)]
    pub num_layers: usize,
    #[config(default = 1024)]
    pub d_ff: usize,
    #[config(default = 0.1)]
    pub dropout: f64,
}

impl TextEncoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> TextEncoder<B> {
        let token_embedding    = EmbeddingConfig::new(self.vocab_size, self.d_model).init(device);
        let position_embedding = EmbeddingConfig::new(self.max_seq_len, self.d_model).init(device);
        let layers: Vec<EncoderBlock<B>> = (0..self.num_layers)
            .map(|_| self.build_encoder_block(device))
            .collect();
        TextEncoder {
            token_embedding,
            position_embedding,
            embedding_norm: LayerNormConfig::new(self.d_model).init(device),
            layers,
            pooler:  LinearConfig::new(self.d_model, self.d_model).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
        }
    }

    fn build_encoder_block<B: Backend>(&self, device: &B::Device) -> EncoderBlock<B> {
        let self_attn   = MultiHeadAttentionConfig::new(self.d_model, self.num_heads)
            .with_dropout(self.dropout)
            .init(device);
        let ffn_linear1 = LinearConfig::new(self.d_model, self.d_ff).init(device);
        let ffn_linear2 = LinearConfig::new(self.d_ff, self.d_model).init(device);
        let norm1   = LayerNormConfig::new(self.d_model).init(device);
        let norm2   = LayerNormConfig::new(self.d_model).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        EncoderBlock { self_attn, ffn_linear1, ffn_linear2, norm1, norm2, dropout }
    }
}

#[derive(Module, Debug)]
pub struct EncoderBlock<B: Backend> {
    pub self_attn:   MultiHeadAttention<B>,
    pub ffn_linear1: Linear<B>,
    pub ffn_linear2: Linear<B>,
    pub norm1:       LayerNorm<B>,
    pub norm2:       LayerNorm<B>,
    pub dropout:     Dropout,
}

impl<B: Backend> EncoderBlock<B> {
    /// `mask_pad` is true at padding positions, which attention ignores.
    pub fn forward(&self, x: Tensor<B, 3>, mask_pad: Tensor<B, 2, Bool>) -> Tensor<B, 3> {
        let attn_input  = MhaInput::self_attn(x.clone()).mask_pad(mask_pad);
        let attn_output = self.self_attn.forward(attn_input).context;
        let x = self.norm1.forward(x + self.dropout.forward(attn_output));
        let ffn_out = self.ffn_linear2.forward(gelu(self.ffn_linear1.forward(x.clone())));
        self.norm2.forward(x + self.dropout.forward(ffn_out))
    }
}

#[derive(Module, Debug)]
pub struct TextEncoder<B: Backend> {
    pub token_embedding:    Embedding<B>,
    pub position_embedding: Embedding<B>,
    pub embedding_norm:     LayerNorm<B>,
    pub layers:             Vec<EncoderBlock<B>>,
    pub pooler:             Linear<B>,
    pub dropout:            Dropout,
}

impl<B: Backend> TextEncoder<B> {
    /// input_ids, attention_mask: [batch, seq_len] → pooled: [batch, d_model]
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>, attention_mask: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let [batch_size, seq_len] = input_ids.dims();
        let device = input_ids.device();

        let tok_emb = self.token_embedding.forward(input_ids);
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &device)
            .unsqueeze::<2>()
            .expand([batch_size, seq_len]);
        let pos_emb = self.position_embedding.forward(positions);

        let mask_pad = attention_mask.equal_elem(0);

        let mut x = self.dropout.forward(self.embedding_norm.forward(tok_emb + pos_emb));
        for layer in &self.layers {
            x = layer.forward(x, mask_pad.clone());
        }

        // Pool on the [CLS] position, as BERT's pooler does.
        let [_, _, d_model] = x.dims();
        let cls = x
            .slice([0..batch_size, 0..1, 0..d_model])
            .reshape([batch_size, d_model]);
        tanh(self.pooler.forward(cls))
    }
}

// ─── Multi-task model ─────────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct MultiTaskConfig {
    pub encoder: TextEncoderConfig,
    #[config(default = 256)]
    pub embedding_dim: usize,
    #[config(default = 2)]
    pub num_classes: usize,
}

impl MultiTaskConfig {
    /// Attach fresh heads to an existing (e.g. pretrained) encoder.
    pub fn init_with_encoder<B: Backend>(&self, encoder: TextEncoder<B>, device: &B::Device) -> MultiTaskModel<B> {
        MultiTaskModel {
            encoder,
            shared_projection:   LinearConfig::new(self.encoder.d_model, self.embedding_dim).init(device),
            classification_head: LinearConfig::new(self.embedding_dim, self.num_classes).init(device),
            sentiment_head:      LinearConfig::new(self.embedding_dim, 1).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct MultiTaskModel<B: Backend> {
    pub encoder:             TextEncoder<B>,
    pub shared_projection:   Linear<B>,
    pub classification_head: Linear<B>,
    pub sentiment_head:      Linear<B>,
}

pub struct MultiTaskOutput<B: Backend> {
    /// [batch, num_classes]
    pub logits:    Tensor<B, 2>,
    /// [batch]
    pub sentiment: Tensor<B, 1>,
}

impl<B: Backend> MultiTaskModel<B> {
    /// Normalised shared embedding: [batch, embedding_dim], unit L2 norm per row.
    pub fn shared_embedding(&self, input_ids: Tensor<B, 2, Int>, attention_mask: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let pooled = self.encoder.forward(input_ids, attention_mask);
        l2_normalize(self.shared_projection.forward(pooled))
    }

    pub fn forward(&self, input_ids: Tensor<B, 2, Int>, attention_mask: Tensor<B, 2, Int>) -> MultiTaskOutput<B> {
        let embedding = self.shared_embedding(input_ids, attention_mask);
        let logits    = self.classification_head.forward(embedding.clone());
        let sentiment = self.sentiment_head.forward(embedding).squeeze::<1>(1);
        MultiTaskOutput { logits, sentiment }
    }

    /// Forward pass plus the equally weighted sum of both task losses.
    pub fn forward_loss(
        &self,
        input_ids:         Tensor<B, 2, Int>,
        attention_mask:    Tensor<B, 2, Int>,
        labels:            Tensor<B, 1, Int>,
        sentiment_targets: Tensor<B, 1>,
    ) -> MultiTaskLoss<B> {
        let output = self.forward(input_ids, attention_mask);
        multitask_loss(output.logits, output.sentiment, labels, sentiment_targets)
    }

    /// Stop gradient tracking for every group the configuration freezes.
    pub fn freeze_for(self, config: TransferConfig) -> Self {
        let frozen = |group| !config.setting(group).trainable;
        Self {
            encoder: if frozen(ParamGroup::Encoder) { self.encoder.no_grad() } else { self.encoder },
            shared_projection: if frozen(ParamGroup::SharedProjection) {
                self.shared_projection.no_grad()
            } else {
                self.shared_projection
            },
            classification_head: if frozen(ParamGroup::ClassificationHead) {
                self.classification_head.no_grad()
            } else {
                self.classification_head
            },
            sentiment_head: if frozen(ParamGroup::SentimentHead) {
                self.sentiment_head.no_grad()
            } else {
                self.sentiment_head
            },
        }
    }
}

/// Row-wise L2 normalisation: x / max(‖x‖₂, eps).
pub fn l2_normalize<B: Backend>(x: Tensor<B, 2>) -> Tensor<B, 2> {
    let norm = x.clone().powf_scalar(2.0).sum_dim(1).sqrt().clamp_min(NORM_EPS);
    x / norm
}
