use std::collections::{HashMap, HashSet};

use super::stopwords;

/// An L2-normalized TF-IDF document vector: (term index, weight) pairs
/// sorted by term index
pub type SparseVector = Vec<(u32, f64)>;

/// Converts text blobs into weighted term-frequency vectors over a bounded
/// vocabulary.
///
/// Replicates the weighting the original build used (scikit-learn's
/// `TfidfVectorizer` defaults): smoothed IDF `ln((1+N)/(1+df)) + 1`, raw
/// term counts for TF, and per-document L2 normalization so cosine
/// similarity downstream reduces to a plain dot product.
///
/// The vectorizer is fit exactly once per catalog build; the fitted
/// vocabulary is an implicit part of the build and is never persisted.
pub struct TfidfVectorizer {
    max_features: usize,
    vocabulary: HashMap<String, u32>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Creates a vectorizer with the given vocabulary cap
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
        }
    }

    /// Learns the vocabulary from the full corpus and transforms every
    /// document into its weighted vector. An empty blob yields a zero
    /// (empty) vector, never NaN.
    pub fn fit_transform(&mut self, documents: &[String]) -> Vec<SparseVector> {
        self.fit(documents);
        documents.iter().map(|doc| self.transform(doc)).collect()
    }

    /// Number of terms in the fitted vocabulary
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    fn fit(&mut self, documents: &[String]) {
        let n_docs = documents.len();
        let mut term_freq: HashMap<String, u64> = HashMap::new();
        let mut doc_freq: HashMap<String, u64> = HashMap::new();

        for doc in documents {
            let mut doc_terms: HashSet<String> = HashSet::new();
            for token in tokenize(doc) {
                *term_freq.entry(token.clone()).or_insert(0) += 1;
                doc_terms.insert(token);
            }
            for term in doc_terms {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        // Keep the most frequent terms; ties break alphabetically so the
        // vocabulary is identical from build to build.
        let mut ranked: Vec<(String, u64)> = term_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_features);

        self.vocabulary = ranked
            .into_iter()
            .enumerate()
            .map(|(idx, (term, _))| (term, idx as u32))
            .collect();

        self.idf = vec![0.0; self.vocabulary.len()];
        for (term, &idx) in &self.vocabulary {
            let df = doc_freq.get(term).copied().unwrap_or(0);
            // Smoothed IDF: every term behaves as if seen in one extra document
            self.idf[idx as usize] = ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0;
        }
    }

    fn transform(&self, document: &str) -> SparseVector {
        let mut counts: HashMap<u32, f64> = HashMap::new();
        for token in tokenize(document) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx as usize]))
            .collect();
        vector.sort_unstable_by_key(|&(idx, _)| idx);

        // L2-normalize; a document with no in-vocabulary terms stays a zero
        // vector rather than dividing by zero
        let norm = vector.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for entry in &mut vector {
                entry.1 /= norm;
            }
        }

        vector
    }
}

/// Lowercases and splits on non-alphanumeric boundaries, dropping stop
/// words and single-character tokens (matching the original tokenizer's
/// two-character minimum)
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| !stopwords::is_stop_word(t))
        .map(str::to_string)
        .collect()
}
