use burn::{
    nn::{
        attention::{MultiHeadAttention, MultiHeadAttentionConfig},
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::backend::AutodiffBackend,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct SentenceClassifierConfig {
    pub vocab_size:        usize,
    pub max_seq_len:       usize,
    pub type_vocab_size:   usize,
    pub hidden_size:       usize,
    pub num_heads:         usize,
    pub num_layers:        usize,
    pub intermediate_size: usize,
    pub dropout:           f64,
    pub classes:           usize,
}

impl SentenceClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SentenceClassifier<B> {
        let encoder = self.build_encoder(device);
        // Head: dropout on the pooled output, then a straight
        // linear projection to the class count.
        let dropout    = DropoutConfig::new(self.dropout).init();
        let classifier = LinearConfig::new(self.hidden_size, self.classes).init(device);
        SentenceClassifier { encoder, dropout, classifier }
    }

    /// Build just the encoder — used when restoring pretrained
    /// encoder weights before the head exists.
    pub fn build_encoder<B: Backend>(&self, device: &B::Device) -> TransformerEncoder<B> {
        let token_embedding    = EmbeddingConfig::new(self.vocab_size, self.hidden_size).init(device);
        let position_embedding = EmbeddingConfig::new(self.max_seq_len, self.hidden_size).init(device);
        let segment_embedding  = EmbeddingConfig::new(self.type_vocab_size, self.hidden_size).init(device);
        let embed_norm = LayerNormConfig::new(self.hidden_size).init(device);
        let layers: Vec<EncoderBlock<B>> = (0..self.num_layers)
            .map(|_| self.build_encoder_block(device))
            .collect();
        let pooler  = LinearConfig::new(self.hidden_size, self.hidden_size).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        TransformerEncoder {
            token_embedding, position_embedding, segment_embedding,
            embed_norm, layers, pooler, dropout,
            hidden_size: self.hidden_size,
        }
    }

    fn build_encoder_block<B: Backend>(&self, device: &B::Device) -> EncoderBlock<B> {
        let self_attn   = MultiHeadAttentionConfig::new(self.hidden_size, self.num_heads)
            .with_dropout(self.dropout)
            .init(device);
        let ffn_linear1 = LinearConfig::new(self.hidden_size, self.intermediate_size).init(device);
        let ffn_linear2 = LinearConfig::new(self.intermediate_size, self.hidden_size).init(device);
        let norm1   = LayerNormConfig::new(self.hidden_size).init(device);
        let norm2   = LayerNormConfig::new(self.hidden_size).init(device);
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
    pub fn forward(&self, x: Tensor<B, 3>, pad_mask: Tensor<B, 2, Bool>) -> Tensor<B, 3> {
        use burn::nn::attention::MhaInput;
        let attn_input  = MhaInput::self_attn(x.clone()).mask_pad(pad_mask);
        let attn_output = self.self_attn.forward(attn_input).context;
        let x = self.norm1.forward(x + self.dropout.forward(attn_output));
        let ffn_out = self.ffn_linear2.forward(
            burn::tensor::activation::gelu(self.ffn_linear1.forward(x.clone()))
        );
        self.norm2.forward(x + self.dropout.forward(ffn_out))
    }
}

/// The pretrained part of the model: everything up to (and
/// including) the pooled [CLS] representation. A separate
/// module so its weights can be restored from the pretrained
/// bundle independently of the freshly initialised head.
#[derive(Module, Debug)]
pub struct TransformerEncoder<B: Backend> {
    pub token_embedding:    Embedding<B>,
    pub position_embedding: Embedding<B>,
    pub segment_embedding:  Embedding<B>,
    pub embed_norm:         LayerNorm<B>,
    pub layers:             Vec<EncoderBlock<B>>,
    pub pooler:             Linear<B>,
    pub dropout:            Dropout,
    pub hidden_size:        usize,
}

impl<B: Backend> TransformerEncoder<B> {
    /// input_ids, attention_mask, token_type_ids: [batch, seq_len]
    /// → pooled output: [batch, hidden_size]
    pub fn forward_pooled(
        &self,
        input_ids:      Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
        token_type_ids: Tensor<B, 2, Int>,
    ) -> Tensor<B, 2> {
        let [batch_size, seq_len] = input_ids.dims();

        let tok_emb = self.token_embedding.forward(input_ids);

        // Self-attention is permutation-invariant, so position must be injected explicitly.
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &tok_emb.device())
            .unsqueeze::<2>()
            .expand([batch_size, seq_len]);
        let pos_emb = self.position_embedding.forward(positions);
        let seg_emb = self.segment_embedding.forward(token_type_ids);

        let mut x = self.dropout.forward(
            self.embed_norm.forward(tok_emb + pos_emb + seg_emb)
        );

        // Padded positions must not attend or be attended to.
        let pad_mask = attention_mask.equal_elem(0);
        for layer in &self.layers {
            x = layer.forward(x, pad_mask.clone());
        }

        // Pooled output: tanh projection of the [CLS] position.
        let cls = x
            .slice([0..batch_size, 0..1, 0..self.hidden_size])
            .reshape([batch_size, self.hidden_size]);
        burn::tensor::activation::tanh(self.pooler.forward(cls))
    }
}

#[derive(Module, Debug)]
pub struct SentenceClassifier<B: Backend> {
    pub encoder:    TransformerEncoder<B>,
    pub dropout:    Dropout,
    pub classifier: Linear<B>,
}

impl<B: Backend> SentenceClassifier<B> {
    /// input_ids: [batch, seq_len] → logits: [batch, classes]
    pub fn forward(
        &self,
        input_ids:      Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
        token_type_ids: Tensor<B, 2, Int>,
    ) -> Tensor<B, 2> {
        let pooled = self.encoder.forward_pooled(input_ids, attention_mask, token_type_ids);
        self.classifier.forward(self.dropout.forward(pooled))
    }

    /// Forward pass plus cross-entropy loss against integer labels.
    pub fn forward_loss(
        &self,
        input_ids:      Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
        token_type_ids: Tensor<B, 2, Int>,
        labels:         Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>)
    where
        B: AutodiffBackend,
    {
        let logits = self.forward(input_ids, attention_mask, token_type_ids);
        let ce = burn::nn::loss::CrossEntropyLossConfig::new()
            .init(&logits.device());
        let loss = ce.forward(logits.clone(), labels);
        (loss, logits)
    }

    /// Swap in encoder weights restored from the pretrained bundle,
    /// keeping the freshly initialised classification head.
    pub fn with_encoder(mut self, encoder: TransformerEncoder<B>) -> Self {
        self.encoder = encoder;
        self
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn tiny_config() -> SentenceClassifierConfig {
        SentenceClassifierConfig::new(32, 8, 2, 16, 2, 1, 32, 0.1, 3)
    }

    #[test]
    fn test_forward_logits_shape() {
        let device = Default::default();
        let model: SentenceClassifier<TestBackend> = tiny_config().init(&device);

        let input_ids = Tensor::<TestBackend, 1, Int>::from_ints(
            [1, 2, 3, 4, 0, 0, 0, 0, 1, 5, 6, 4, 0, 0, 0, 0].as_slice(),
            &device,
        )
        .reshape([2, 8]);
        let mask = Tensor::<TestBackend, 1, Int>::from_ints(
            [1, 1, 1, 1, 0, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0, 0].as_slice(),
            &device,
        )
        .reshape([2, 8]);
        let segments = Tensor::<TestBackend, 2, Int>::zeros([2, 8], &device);

        let logits = model.forward(input_ids, mask, segments);
        assert_eq!(logits.dims(), [2, 3]);
    }

    #[test]
    fn test_pooled_output_shape_and_range() {
        let device = Default::default();
        let encoder: TransformerEncoder<TestBackend> = tiny_config().build_encoder(&device);

        let input_ids = Tensor::<TestBackend, 2, Int>::ones([4, 8], &device);
        let mask      = Tensor::<TestBackend, 2, Int>::ones([4, 8], &device);
        let segments  = Tensor::<TestBackend, 2, Int>::zeros([4, 8], &device);

        let pooled = encoder.forward_pooled(input_ids, mask, segments);
        assert_eq!(pooled.dims(), [4, 16]);

        // tanh keeps every pooled value in (-1, 1)
        let values: Vec<f32> = pooled.into_data().to_vec().unwrap();
        assert!(values.iter().all(|v| v.abs() <= 1.0));
    }
}
