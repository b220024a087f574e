//! Shared plumbing for the ONNX-backed models: opening a model directory and
//! packing tokenizer output into `[batch, seq]` int64 tensors.

use std::path::{Path, PathBuf};

use ort::session::Session;
use ort::value::Tensor;
use tokenizers::{Encoding, PaddingParams, Tokenizer, TruncationParams};

/// A loaded session plus its tokenizer, named after the model directory.
pub(crate) struct ModelFiles {
    pub session: Session,
    pub tokenizer: Tokenizer,
    pub model_id: String,
}

/// Open `model.onnx` and `tokenizer.json` from `dir`. Every path in `extra`
/// must also exist.
pub(crate) fn open_model(
    dir: &Path,
    max_tokens: usize,
    pad: bool,
    extra: &[&str],
    fallback_id: &str,
) -> anyhow::Result<ModelFiles> {
    let onnx = dir.join("model.onnx");
    let tok = dir.join("tokenizer.json");
    let required: Vec<PathBuf> = [onnx.clone(), tok.clone()]
        .into_iter()
        .chain(extra.iter().map(|f| dir.join(f)))
        .collect();
    if let Some(missing) = required.iter().find(|p| !p.exists()) {
        anyhow::bail!("{} not found", missing.display());
    }

    let session = Session::builder()?.commit_from_file(&onnx)?;

    let mut tokenizer =
        Tokenizer::from_file(&tok).map_err(|e| anyhow::anyhow!("tokenizer {}: {e}", tok.display()))?;
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_tokens,
            ..Default::default()
        }))
        .map_err(|e| anyhow::anyhow!("tokenizer truncation: {e}"))?;
    if pad {
        tokenizer.with_padding(Some(PaddingParams::default()));
    }

    let model_id = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| fallback_id.to_string());

    Ok(ModelFiles {
        session,
        tokenizer,
        model_id,
    })
}

/// Row-major `[rows, width]` token inputs, zero padded.
pub(crate) struct InputBatch {
    pub rows: usize,
    pub width: usize,
    pub ids: Vec<i64>,
    pub mask: Vec<i64>,
    pub type_ids: Vec<i64>,
}

impl InputBatch {
    pub fn pack(encodings: &[Encoding]) -> Self {
        let rows = encodings.len();
        let width = encodings.iter().map(|e| e.len()).max().unwrap_or(0);
        let mut batch = Self {
            rows,
            width,
            ids: vec![0; rows * width],
            mask: vec![0; rows * width],
            type_ids: vec![0; rows * width],
        };
        for (row, enc) in encodings.iter().enumerate() {
            let base = row * width;
            copy_widened(&mut batch.ids[base..], enc.get_ids());
            copy_widened(&mut batch.mask[base..], enc.get_attention_mask());
            copy_widened(&mut batch.type_ids[base..], enc.get_type_ids());
        }
        batch
    }

    fn shape(&self) -> [i64; 2] {
        [self.rows as i64, self.width as i64]
    }

    pub fn ids_tensor(&self) -> anyhow::Result<Tensor<i64>> {
        Ok(Tensor::from_array((self.shape(), self.ids.clone().into_boxed_slice()))?)
    }

    pub fn mask_tensor(&self) -> anyhow::Result<Tensor<i64>> {
        Ok(Tensor::from_array((self.shape(), self.mask.clone().into_boxed_slice()))?)
    }

    pub fn type_ids_tensor(&self) -> anyhow::Result<Tensor<i64>> {
        Ok(Tensor::from_array((self.shape(), self.type_ids.clone().into_boxed_slice()))?)
    }
}

fn copy_widened(dst: &mut [i64], src: &[u32]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = i64::from(s);
    }
}

/// Last dimension of a tensor output, when the graph declares it.
pub(crate) fn trailing_dim(ty: &ort::value::ValueType) -> Option<usize> {
    match ty {
        ort::value::ValueType::Tensor { shape, .. } => {
            shape.last().copied().filter(|&d| d > 0).map(|d| d as usize)
        }
        _ => None,
    }
}
