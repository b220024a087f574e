//! Model seams. Heavy models are loaded once per process and shared behind
//! these traits, so the extractors can run against mocks in tests.

/// Fixed-dimension sentence embeddings.
///
/// Implementations must be safe to call from several requests at once;
/// stateful inference sessions serialise behind a mutex.
pub trait SentenceEmbedder: Send + Sync {
    /// Identifier reported in result metadata.
    fn model_id(&self) -> &str;

    fn dim(&self) -> usize;

    /// One vector per input, in input order.
    fn embed_batch(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// A labelled entity span. Offsets are bytes into the text passed to
/// [`EntityModel::recognize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub label: String,
    pub start: usize,
    pub end: usize,
}

/// Named-entity recognition over free text.
pub trait EntityModel: Send + Sync {
    fn model_id(&self) -> &str;

    fn recognize(&self, text: &str) -> anyhow::Result<Vec<EntitySpan>>;
}

/// Cosine similarity; zero when either vector has no magnitude.
pub fn cosine_sim(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na * nb)
}

/// L2-normalize a vector in place.
pub fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_parallel_vectors_is_one() {
        assert!((cosine_sim(&[2.0, 0.0], &[5.0, 0.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert!(cosine_sim(&[1.0, 0.0], &[0.0, 3.0]).abs() < 1e-6);
    }

    #[test]
    fn cosine_with_zero_vector() {
        assert_eq!(cosine_sim(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn normalize_to_unit_length() {
        let mut v = vec![3.0, 4.0];
        normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }
}
