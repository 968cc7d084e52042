//! Fuzzy identifier resolution against a fixed set of registry names.

use serde::Serialize;

use super::similarity;

/// Resolver configuration.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Minimum score the best candidate must strictly exceed to resolve.
    pub match_threshold: f64,
    /// Minimum lead over the runner-up required to resolve.
    pub tie_break_margin: f64,
    /// How many candidates to report on an ambiguous resolution.
    pub candidate_count: usize,
    /// Minimum score for a name to appear in ranked candidate listings.
    pub floor_score: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            match_threshold: 70.0,
            tie_break_margin: 5.0,
            candidate_count: 3,
            floor_score: 30.0,
        }
    }
}

/// A registry name with its similarity score against a candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub name: String,
    pub score: f64,
}

/// A successful resolution of one identifier.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    /// The name as supplied by the caller.
    pub original: String,
    /// The verified registry name it resolved to.
    pub resolved: String,
    /// Confidence score (100 for an exact normalized match).
    pub score: f64,
    /// Other candidates considered, best first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<ScoredCandidate>,
}

/// Outcome of resolving one identifier.
#[derive(Debug, Clone)]
pub enum ResolveOutcome {
    /// Resolved to exactly one registry name.
    Match(Resolution),
    /// No candidate cleared the threshold and tie-break rule; the scored
    /// near-misses are reported so the caller can disambiguate.
    Ambiguous(Vec<ScoredCandidate>),
}

/// Resolves caller-supplied sheet/column names to actual identifiers.
///
/// Resolution is deterministic for a given registry snapshot and
/// candidate: exact normalized matches win outright, otherwise the
/// highest-scoring name wins only if it clears the threshold and leads
/// the runner-up by the configured margin.
#[derive(Debug, Clone, Default)]
pub struct NameResolver {
    config: ResolverConfig,
}

impl NameResolver {
    /// Create a resolver with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver with custom configuration.
    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `candidate` against `names`.
    pub fn resolve(&self, candidate: &str, names: &[&str]) -> ResolveOutcome {
        let normalized = similarity::normalize(candidate);

        // Exact normalized match short-circuits scoring entirely.
        if let Some(name) = names
            .iter()
            .find(|n| similarity::normalize(n) == normalized)
        {
            return ResolveOutcome::Match(Resolution {
                original: candidate.to_string(),
                resolved: (*name).to_string(),
                score: 100.0,
                alternatives: Vec::new(),
            });
        }

        let ranked = self.score_all(candidate, names);
        let Some(best) = ranked.first().cloned() else {
            return ResolveOutcome::Ambiguous(Vec::new());
        };
        let runner_up = ranked.get(1).map(|c| c.score).unwrap_or(0.0);

        if best.score > self.config.match_threshold
            && best.score - runner_up >= self.config.tie_break_margin
        {
            let alternatives = ranked
                .into_iter()
                .skip(1)
                .take(self.config.candidate_count.saturating_sub(1))
                .collect();
            ResolveOutcome::Match(Resolution {
                original: candidate.to_string(),
                resolved: best.name,
                score: best.score,
                alternatives,
            })
        } else {
            ResolveOutcome::Ambiguous(
                ranked
                    .into_iter()
                    .take(self.config.candidate_count)
                    .collect(),
            )
        }
    }

    /// Rank every name at or above the floor score, best first.
    ///
    /// Never fails; an empty list means nothing came close. Backs the
    /// `find_column_fuzzy` operation.
    pub fn rank(&self, candidate: &str, names: &[&str]) -> Vec<ScoredCandidate> {
        self.score_all(candidate, names)
            .into_iter()
            .filter(|c| c.score >= self.config.floor_score)
            .collect()
    }

    /// Score all names, sorted by score descending; ties keep registry
    /// order (stable sort) so results are deterministic.
    fn score_all(&self, candidate: &str, names: &[&str]) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> = names
            .iter()
            .map(|n| ScoredCandidate {
                name: (*n).to_string(),
                score: similarity::score(candidate, n),
            })
            .collect();
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored
    }
}

/// Format a candidate listing for failure messages, e.g.
/// `Revenue (87), Region (73)`.
pub fn describe_candidates(candidates: &[ScoredCandidate]) -> String {
    if candidates.is_empty() {
        return "no close candidates".to_string();
    }
    candidates
        .iter()
        .map(|c| format!("{} ({:.0})", c.name, c.score))
        .collect::<Vec<_>>()
        .join(", ")
}
