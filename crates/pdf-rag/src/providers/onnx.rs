//! ONNX-based embedding generation
//!
//! Uses all-MiniLM-L6-v2 for 384-dimensional sentence embeddings, the model
//! the service embeds with when no Ollama embedding model is wanted.

use async_trait::async_trait;
use ndarray::{ArrayView2, ArrayView3};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tokenizers::Tokenizer;

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::pooling::masked_mean_normalized;

/// Session and tokenizer; inference needs exclusive access
struct OnnxModel {
    session: Session,
    tokenizer: Tokenizer,
    dimensions: usize,
    max_length: usize,
}

/// ONNX-based text embedder
pub struct OnnxEmbedder {
    model: Arc<Mutex<OnnxModel>>,
    dimensions: usize,
    batch_size: usize,
}

impl OnnxEmbedder {
    /// Create a new ONNX embedder, downloading the model on first use
    pub async fn new(config: &EmbeddingConfig) -> Result<Self> {
        tracing::info!("Initializing ONNX embedder with model: {}", config.model);

        std::fs::create_dir_all(&config.cache_dir).map_err(|e| {
            Error::Config(format!("Failed to create cache directory: {}", e))
        })?;

        let model_dir = config.cache_dir.join(&config.model);
        std::fs::create_dir_all(&model_dir)?;
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            download(&config.model, "onnx/model.onnx", &model_path).await?;
        }
        if !tokenizer_path.exists() {
            download(&config.model, "tokenizer.json", &tokenizer_path).await?;
        }

        let session = Session::builder()
            .map_err(|e| Error::embedding(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| Error::embedding(format!("Failed to set optimization level: {}", e)))?
            .with_intra_threads(4)
            .map_err(|e| Error::embedding(format!("Failed to set threads: {}", e)))?
            .commit_from_file(&model_path)
            .map_err(|e| Error::embedding(format!("Failed to load model: {}", e)))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| Error::embedding(format!("Failed to load tokenizer: {}", e)))?;

        let dimensions = config.dimensions();
        tracing::info!("ONNX embedder initialized ({} dimensions)", dimensions);

        Ok(Self {
            model: Arc::new(Mutex::new(OnnxModel {
                session,
                tokenizer,
                dimensions,
                max_length: config.max_length,
            })),
            dimensions,
            batch_size: config.batch_size,
        })
    }

    async fn run_batches(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let model = Arc::clone(&self.model);
        let batch_size = self.batch_size;

        tokio::task::spawn_blocking(move || {
            let mut model = model.lock();
            let mut all = Vec::with_capacity(texts.len());
            for batch in texts.chunks(batch_size) {
                let refs: Vec<&str> = batch.iter().map(String::as_str).collect();
                all.extend(model.embed_batch(&refs)?);
            }
            Ok::<_, Error>(all)
        })
        .await
        .map_err(|e| Error::internal(format!("Task join error: {}", e)))?
    }
}

impl OnnxModel {
    /// Tokenize, run the encoder, mean-pool over the attention mask, L2-normalise
    fn embed_batch(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let batch_size = texts.len();

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| Error::embedding(format!("Tokenization failed: {}", e)))?;

        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0)
            .min(self.max_length);

        let mut input_ids = vec![0i64; batch_size * max_len];
        let mut attention_mask = vec![0i64; batch_size * max_len];
        let mut token_type_ids = vec![0i64; batch_size * max_len];

        for (i, encoding) in encodings.iter().enumerate() {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            let types = encoding.get_type_ids();

            for j in 0..ids.len().min(max_len) {
                input_ids[i * max_len + j] = ids[j] as i64;
                attention_mask[i * max_len + j] = mask[j] as i64;
                token_type_ids[i * max_len + j] = types[j] as i64;
            }
        }

        let shape = vec![batch_size, max_len];
        let input_ids_tensor = Tensor::from_array((shape.clone(), input_ids.into_boxed_slice()))
            .map_err(|e| Error::embedding(format!("Input tensor creation failed: {}", e)))?;
        let attention_mask_tensor =
            Tensor::from_array((shape.clone(), attention_mask.clone().into_boxed_slice()))
                .map_err(|e| Error::embedding(format!("Attention mask tensor creation failed: {}", e)))?;
        let token_type_ids_tensor = Tensor::from_array((shape, token_type_ids.into_boxed_slice()))
            .map_err(|e| Error::embedding(format!("Token type tensor creation failed: {}", e)))?;

        let inputs = vec![
            ("input_ids", input_ids_tensor.into_dyn()),
            ("attention_mask", attention_mask_tensor.into_dyn()),
            ("token_type_ids", token_type_ids_tensor.into_dyn()),
        ];

        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| Error::embedding(format!("Inference failed: {}", e)))?;

        let output_iter: Vec<_> = outputs.iter().collect();
        let output = output_iter
            .iter()
            .find(|(name, _)| *name == "last_hidden_state")
            .or_else(|| output_iter.first())
            .map(|(_, v)| v)
            .ok_or_else(|| Error::embedding("No output tensor"))?;

        let (tensor_shape, tensor_data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::embedding(format!("Failed to extract tensor: {}", e)))?;

        let dims: Vec<usize> = tensor_shape.iter().map(|&d| d as usize).collect();
        let hidden_size = match dims.as_slice() {
            [b, t, h] if *b == batch_size && *t == max_len => *h,
            other => {
                return Err(Error::embedding(format!(
                    "Unexpected encoder output shape {:?}",
                    other
                )))
            }
        };
        if hidden_size != self.dimensions {
            return Err(Error::embedding(format!(
                "Model produces {} dimensions, configured for {}",
                hidden_size, self.dimensions
            )));
        }

        let hidden = ArrayView3::from_shape((batch_size, max_len, hidden_size), tensor_data)
            .map_err(|e| Error::embedding(format!("Bad hidden state layout: {}", e)))?;
        let mask = ArrayView2::from_shape((batch_size, max_len), attention_mask.as_slice())
            .map_err(|e| Error::embedding(format!("Bad attention mask layout: {}", e)))?;

        Ok(masked_mean_normalized(hidden, mask))
    }
}

#[async_trait]
impl EmbeddingProvider for OnnxEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.run_batches(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::embedding("Empty embedding result"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.run_batches(texts.to_vec()).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

/// Fetch a file from the sentence-transformers repository on Hugging Face
async fn download(model_name: &str, file: &str, path: &Path) -> Result<()> {
    let url = format!(
        "https://huggingface.co/sentence-transformers/{}/resolve/main/{}",
        model_name, file
    );

    tracing::info!("Downloading {} from: {}", file, url);

    let response = reqwest::get(&url)
        .await
        .map_err(|e| Error::embedding(format!("Failed to download {}: {}", file, e)))?;

    if !response.status().is_success() {
        return Err(Error::embedding(format!(
            "Download of {} failed: HTTP {}",
            file,
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::embedding(format!("Failed to read {}: {}", file, e)))?;

    tokio::fs::write(path, &bytes).await?;

    tracing::info!("Downloaded {} ({} bytes)", file, bytes.len());

    Ok(())
}
