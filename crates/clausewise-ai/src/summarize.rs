//! Extractive summary: the sentences closest to the document centroid.

use clausewise_core::Sentence;

use crate::model::{SentenceEmbedder, cosine_sim, normalize};

/// Default number of sentences kept by the local summarizer.
pub const DEFAULT_SUMMARY_SENTENCES: usize = 5;

/// Pick up to `max_sentences` sentences whose embeddings sit closest to the
/// mean embedding, and return them in document order joined by spaces.
pub fn centroid_summary(
    embedder: &dyn SentenceEmbedder,
    sentences: &[Sentence],
    max_sentences: usize,
) -> anyhow::Result<String> {
    if sentences.is_empty() || max_sentences == 0 {
        return Ok(String::new());
    }
    if sentences.len() <= max_sentences {
        return Ok(join(sentences.iter()));
    }

    let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
    let vectors = embedder.embed_batch(&texts)?;
    anyhow::ensure!(
        vectors.len() == sentences.len(),
        "embedder returned {} vectors for {} sentences",
        vectors.len(),
        sentences.len()
    );

    let dim = vectors.first().map(Vec::len).unwrap_or(0);
    let mut centroid = vec![0.0f32; dim];
    for v in &vectors {
        for (c, x) in centroid.iter_mut().zip(v) {
            *c += x;
        }
    }
    normalize(&mut centroid);

    let mut scored: Vec<(usize, f32)> = vectors
        .iter()
        .enumerate()
        .map(|(i, v)| (i, cosine_sim(v, &centroid)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    let mut chosen: Vec<usize> = scored.into_iter().take(max_sentences).map(|(i, _)| i).collect();
    chosen.sort_unstable();

    Ok(join(chosen.into_iter().map(|i| &sentences[i])))
}

fn join<'a>(sentences: impl Iterator<Item = &'a Sentence>) -> String {
    sentences.map(|s| s.text.as_str()).collect::<Vec<_>>().join(" ")
}
