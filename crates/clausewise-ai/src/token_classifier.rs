//! ONNX token-classification NER (BERT-style `B-`/`I-` tagging).
//!
//! The model directory must contain `model.onnx`, `tokenizer.json` and the
//! Hugging Face `config.json` carrying the `id2label` map.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use serde::Deserialize;
use tokenizers::Tokenizer;
use tracing::info;

use clausewise_core::text;

use crate::model::{EntityModel, EntitySpan};
use crate::ner::{TaggedToken, aggregate_bio};
use crate::onnx::{InputBatch, open_model};

const MAX_TOKENS: usize = 512;

#[derive(Deserialize)]
struct ModelConfig {
    id2label: HashMap<String, String>,
}

pub struct OnnxNer {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    model_id: String,
}

impl OnnxNer {
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let files = open_model(model_dir, MAX_TOKENS, false, &["config.json"], "token-classifier")?;
        let config: ModelConfig =
            serde_json::from_str(&std::fs::read_to_string(model_dir.join("config.json"))?)?;
        let labels = label_table(&config.id2label)?;

        info!(labels = labels.len(), model = %files.model_id, "NER model loaded");
        Ok(Self {
            session: Mutex::new(files.session),
            tokenizer: files.tokenizer,
            labels,
            model_id: files.model_id,
        })
    }

    /// Tag one sentence. Offsets are relative to `sentence`.
    fn tag_sentence(&self, sentence: &str) -> anyhow::Result<Vec<TaggedToken>> {
        let encoding = self
            .tokenizer
            .encode(sentence, true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;
        if encoding.is_empty() {
            return Ok(Vec::new());
        }
        let batch = InputBatch::pack(std::slice::from_ref(&encoding));

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("NER session lock poisoned"))?;
        let outputs = session.run(ort::inputs![
            "input_ids" => batch.ids_tensor()?,
            "attention_mask" => batch.mask_tensor()?,
        ])?;

        // Logits: [1, seq_len, num_labels].
        let (shape, logits) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = shape;
        let num_labels = self.labels.len();
        anyhow::ensure!(
            dims.len() == 3 && dims[1] as usize == batch.width && dims[2] as usize == num_labels,
            "unexpected logits shape: {dims:?}"
        );

        Ok(logits
            .chunks_exact(num_labels)
            .zip(encoding.get_offsets())
            .map(|(row, &(start, end))| TaggedToken {
                tag: self.labels[argmax(row)].clone(),
                start,
                end,
            })
            .collect())
    }
}

impl EntityModel for OnnxNer {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn recognize(&self, text: &str) -> anyhow::Result<Vec<EntitySpan>> {
        let mut spans = Vec::new();
        for sentence in text::sentences(text) {
            let tags = self.tag_sentence(&sentence.text)?;
            spans.extend(aggregate_bio(&tags).into_iter().map(|s| EntitySpan {
                label: s.label,
                start: s.start + sentence.start,
                end: s.end + sentence.start,
            }));
        }
        Ok(spans)
    }
}

/// Dense label table indexed by class id.
fn label_table(id2label: &HashMap<String, String>) -> anyhow::Result<Vec<String>> {
    let mut labels = vec![String::new(); id2label.len()];
    for (id, label) in id2label {
        let idx: usize = id.parse().map_err(|_| anyhow::anyhow!("bad label id {id:?}"))?;
        anyhow::ensure!(idx < labels.len(), "label id {idx} out of range");
        labels[idx] = label.clone();
    }
    anyhow::ensure!(labels.iter().all(|l| !l.is_empty()), "id2label has gaps");
    Ok(labels)
}

fn argmax(row: &[f32]) -> usize {
    row.iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(bi, bv), (i, &v)| if v > bv { (i, v) } else { (bi, bv) })
        .0
}
