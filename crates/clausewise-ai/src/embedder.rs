//! Sentence-transformers embeddings over ONNX Runtime.
//!
//! Vectors are the attention-weighted mean of the last hidden state, L2
//! normalized (all-MiniLM-L6-v2 gives 384 dims).

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use tokenizers::Tokenizer;
use tracing::info;

use crate::model::{SentenceEmbedder, normalize};
use crate::onnx::{InputBatch, open_model, trailing_dim};

/// Token window the MiniLM family was trained with.
const MAX_TOKENS: usize = 256;
const FALLBACK_DIM: usize = 384;

pub struct Embedder {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    dim: usize,
    model_id: String,
}

impl Embedder {
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let files = open_model(model_dir, MAX_TOKENS, true, &[], "sentence-embedder")?;
        let dim = files
            .session
            .outputs()
            .first()
            .and_then(|o| trailing_dim(o.dtype()))
            .unwrap_or(FALLBACK_DIM);

        info!(dim, model = %files.model_id, "embedding model loaded");
        Ok(Self {
            session: Mutex::new(files.session),
            tokenizer: files.tokenizer,
            dim,
            model_id: files.model_id,
        })
    }

    pub fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let mut out = self.encode(&[text])?;
        out.pop().ok_or_else(|| anyhow::anyhow!("embedder produced nothing for one input"))
    }

    fn encode(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;
        let batch = InputBatch::pack(&encodings);

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("embedding session lock poisoned"))?;
        let outputs = session.run(ort::inputs![
            "input_ids" => batch.ids_tensor()?,
            "attention_mask" => batch.mask_tensor()?,
            "token_type_ids" => batch.type_ids_tensor()?,
        ])?;

        let (shape, hidden) = outputs[0].try_extract_tensor::<f32>()?;
        let shape: &[i64] = shape;
        let [rows, steps, dim] = match shape {
            &[r, s, d] => [r as usize, s as usize, d as usize],
            other => anyhow::bail!("hidden state has rank {}, expected 3", other.len()),
        };
        anyhow::ensure!(
            rows == batch.rows && dim == self.dim && steps <= batch.width,
            "hidden state shape {shape:?} does not match batch {}x{} dim {}",
            batch.rows,
            batch.width,
            self.dim
        );

        Ok((0..rows)
            .map(|row| {
                let mask = &batch.mask[row * batch.width..row * batch.width + steps];
                let states = &hidden[row * steps * dim..(row + 1) * steps * dim];
                let mut v = mean_pool(states, mask, dim);
                normalize(&mut v);
                v
            })
            .collect())
    }
}

impl SentenceEmbedder for Embedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        self.encode(texts)
    }
}

/// Average the `dim`-wide rows of `states` whose mask entry is set.
fn mean_pool(states: &[f32], mask: &[i64], dim: usize) -> Vec<f32> {
    let mut sum = vec![0.0f32; dim];
    let mut weight = 0.0f32;
    for (row, &m) in states.chunks_exact(dim).zip(mask) {
        if m == 0 {
            continue;
        }
        let m = m as f32;
        for (acc, &x) in sum.iter_mut().zip(row) {
            *acc += x * m;
        }
        weight += m;
    }
    if weight > 0.0 {
        sum.iter_mut().for_each(|x| *x /= weight);
    }
    sum
}
