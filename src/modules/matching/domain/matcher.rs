use std::cmp::Ordering;

use super::match_pair::{Match, MetricPass};
use crate::log_debug;
use crate::modules::similarity::is_veto;

/// Multi-pass greedy bipartite assignment of values to candidates
///
/// Each pass scores every still-open pair with its metric. Only pairs whose
/// score clears the pass's bar are considered in that pass. A value commits to
/// its single best such candidate (earlier passes break ties) unless another
/// open value ranks the same candidate at least as highly. Ties are left for
/// the next pass. Vetoed pairs are dropped for good.
///
/// In lenient mode, values still open after the last pass take their best
/// remaining candidate with any positive evidence; strict mode leaves them open.
/// No randomness and no implicit sorting: identical input yields identical output.
pub struct Matcher<V, C> {
    passes: Vec<MetricPass<V, C>>,
    strict: bool,
    values: Vec<V>,
    candidates: Vec<C>,
}

struct PairState {
    scores: Vec<f32>,
    vetoed: bool,
}

impl<V: Clone, C: Clone> Matcher<V, C> {
    pub fn new(
        values: Vec<V>,
        candidates: Vec<C>,
        passes: Vec<MetricPass<V, C>>,
        strict: bool,
    ) -> Self {
        Self {
            passes,
            strict,
            values,
            candidates,
        }
    }

    /// Runs all passes and returns committed matches in value input order
    pub fn run(&mut self) -> Vec<Match<V, C>> {
        let value_count = self.values.len();
        let candidate_count = self.candidates.len();

        let mut pairs: Vec<Vec<PairState>> = (0..value_count)
            .map(|_| {
                (0..candidate_count)
                    .map(|_| PairState {
                        scores: Vec::with_capacity(self.passes.len()),
                        vetoed: false,
                    })
                    .collect()
            })
            .collect();
        let mut value_match: Vec<Option<usize>> = vec![None; value_count];
        let mut candidate_taken = vec![false; candidate_count];

        for (level, pass) in self.passes.iter().enumerate() {
            if value_match.iter().all(Option::is_some) || candidate_taken.iter().all(|t| *t) {
                break;
            }

            for (v, value) in self.values.iter().enumerate() {
                if value_match[v].is_some() {
                    continue;
                }
                for (c, candidate) in self.candidates.iter().enumerate() {
                    let pair = &mut pairs[v][c];
                    if candidate_taken[c] || pair.vetoed {
                        continue;
                    }
                    let score = pass.metric.score(value, candidate);
                    pair.scores.push(score);
                    pair.vetoed = is_veto(score);
                }
            }

            let mut committed = 0;
            loop {
                let round = self.commit_round(level, &pairs, &value_match, &candidate_taken);
                if round.is_empty() {
                    break;
                }
                for (v, c) in round {
                    value_match[v] = Some(c);
                    candidate_taken[c] = true;
                    committed += 1;
                }
            }

            log_debug!(
                "Matcher pass {} ({}): {} committed",
                level,
                pass.metric.name(),
                committed
            );
        }

        if !self.strict {
            self.commit_leftovers(&pairs, &mut value_match, &mut candidate_taken);
        }

        self.collect(value_match, candidate_taken)
    }

    /// Values no pass could assign, in input order
    pub fn remaining_values(&self) -> &[V] {
        &self.values
    }

    /// Candidates no value was assigned to, in input order
    pub fn remaining_candidates(&self) -> &[C] {
        &self.candidates
    }

    fn commit_round(
        &self,
        level: usize,
        pairs: &[Vec<PairState>],
        value_match: &[Option<usize>],
        candidate_taken: &[bool],
    ) -> Vec<(usize, usize)> {
        let acceptance = self.passes[level].acceptance;
        let eligible = |v: usize, c: usize| {
            let pair = &pairs[v][c];
            value_match[v].is_none()
                && !candidate_taken[c]
                && !pair.vetoed
                && pair
                    .scores
                    .get(level)
                    .map_or(false, |score| acceptance.accepts(*score))
        };
        let rank = |v: usize, c: usize, w: usize, d: usize| {
            compare_pass(&pairs[v][c].scores, &pairs[w][d].scores, level)
        };

        let tops: Vec<Vec<usize>> = (0..self.values.len())
            .map(|v| {
                let mut best: Vec<usize> = Vec::new();
                for c in (0..self.candidates.len()).filter(|&c| eligible(v, c)) {
                    match best.first() {
                        None => best.push(c),
                        Some(&b) => match rank(v, c, v, b) {
                            Ordering::Greater => best = vec![c],
                            Ordering::Equal => best.push(c),
                            Ordering::Less => {}
                        },
                    }
                }
                best
            })
            .collect();

        let mut commits = Vec::new();
        for (v, top) in tops.iter().enumerate() {
            let [c] = top.as_slice() else {
                continue;
            };
            let c = *c;

            let contested = tops.iter().enumerate().any(|(w, other_top)| {
                w != v && other_top.contains(&c) && rank(w, c, v, c) != Ordering::Less
            });
            if !contested {
                commits.push((v, c));
            }
        }
        commits
    }

    fn commit_leftovers(
        &self,
        pairs: &[Vec<PairState>],
        value_match: &mut [Option<usize>],
        candidate_taken: &mut [bool],
    ) {
        for v in 0..self.values.len() {
            if value_match[v].is_some() {
                continue;
            }

            let mut best: Option<usize> = None;
            for c in 0..self.candidates.len() {
                let pair = &pairs[v][c];
                if candidate_taken[c] || pair.vetoed || !pair.scores.iter().any(|s| *s > 0.0) {
                    continue;
                }
                let better = match best {
                    None => true,
                    Some(b) => compare_keys(&pair.scores, &pairs[v][b].scores) == Ordering::Greater,
                };
                if better {
                    best = Some(c);
                }
            }

            if let Some(c) = best {
                value_match[v] = Some(c);
                candidate_taken[c] = true;
            }
        }
    }

    fn collect(
        &mut self,
        value_match: Vec<Option<usize>>,
        candidate_taken: Vec<bool>,
    ) -> Vec<Match<V, C>> {
        let values = std::mem::take(&mut self.values);
        let candidates = std::mem::take(&mut self.candidates);

        let mut matches = Vec::new();
        for (value, assigned) in values.into_iter().zip(value_match) {
            match assigned {
                Some(c) => matches.push(Match::new(value, candidates[c].clone())),
                None => self.values.push(value),
            }
        }

        self.candidates = candidates
            .into_iter()
            .zip(candidate_taken)
            .filter_map(|(candidate, taken)| (!taken).then_some(candidate))
            .collect();

        matches
    }
}

/// Compares the scores of pass `level`, earlier passes break ties
fn compare_pass(a: &[f32], b: &[f32], level: usize) -> Ordering {
    let current = match (a.get(level), b.get(level)) {
        (Some(x), Some(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    };
    current.then_with(|| compare_keys(&a[..level.min(a.len())], &b[..level.min(b.len())]))
}

/// Compares score vectors pass by pass
fn compare_keys(a: &[f32], b: &[f32]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.partial_cmp(y).unwrap_or(Ordering::Equal) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::matching::domain::match_pair::Acceptance;
    use crate::modules::similarity::{Cascade, Metric, VETO};
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::Arc;

    type Pass = MetricPass<&'static str, &'static str>;

    fn equal_length() -> Metric<&'static str, &'static str> {
        Metric::new("Length", |v: &&str, c: &&str| if v.len() == c.len() { 1.0 } else { 0.0 })
    }

    fn first_char() -> Metric<&'static str, &'static str> {
        Metric::new("FirstChar", |v: &&str, c: &&str| {
            if v.chars().next() == c.chars().next() {
                1.0
            } else {
                0.0
            }
        })
    }

    #[test]
    fn test_unique_scores_match_identity() {
        let mut matcher = Matcher::new(
            vec!["a", "bb", "ccc"],
            vec!["zzz", "y", "xx"],
            vec![Pass::exact(equal_length())],
            true,
        );

        let matches = matcher.run();
        let pairs: Vec<_> = matches.iter().map(|m| (m.value, m.candidate)).collect();
        assert_eq!(pairs, vec![("a", "y"), ("bb", "xx"), ("ccc", "zzz")]);
        assert!(matcher.remaining_values().is_empty());
        assert!(matcher.remaining_candidates().is_empty());
    }

    #[test]
    fn test_ties_are_deferred_to_next_pass() {
        let mut matcher = Matcher::new(
            vec!["ab", "cd"],
            vec!["cx", "ay"],
            vec![Pass::exact(equal_length()), Pass::exact(first_char())],
            true,
        );

        let matches = matcher.run();
        let pairs: Vec<_> = matches.iter().map(|m| (m.value, m.candidate)).collect();
        assert_eq!(pairs, vec![("ab", "ay"), ("cd", "cx")]);
    }

    #[test]
    fn test_unresolved_tie_stays_unmatched_in_strict_mode() {
        let mut matcher = Matcher::new(
            vec!["ab", "cd"],
            vec!["xx", "yy"],
            vec![Pass::exact(equal_length())],
            true,
        );

        assert!(matcher.run().is_empty());
        assert_eq!(matcher.remaining_values(), &["ab", "cd"]);
        assert_eq!(matcher.remaining_candidates(), &["xx", "yy"]);
    }

    #[test]
    fn test_lenient_mode_assigns_leftovers_in_input_order() {
        let mut matcher = Matcher::new(
            vec!["ab", "cd"],
            vec!["xx", "yy"],
            vec![Pass::exact(equal_length())],
            false,
        );

        let matches = matcher.run();
        let pairs: Vec<_> = matches.iter().map(|m| (m.value, m.candidate)).collect();
        assert_eq!(pairs, vec![("ab", "xx"), ("cd", "yy")]);
    }

    #[test]
    fn test_lenient_mode_needs_some_evidence() {
        let mut matcher = Matcher::new(
            vec!["a"],
            vec!["xx"],
            vec![Pass::exact(equal_length())],
            false,
        );

        assert!(matcher.run().is_empty());
        assert_eq!(matcher.remaining_values(), &["a"]);
    }

    #[test]
    fn test_veto_is_never_accepted() {
        let veto = Metric::new("Veto", |_: &&str, _: &&str| VETO);
        let perfect = Metric::new("Perfect", |_: &&str, _: &&str| 1.0);

        let mut matcher = Matcher::new(
            vec!["a"],
            vec!["a"],
            vec![Pass::exact(veto), Pass::exact(perfect)],
            false,
        );

        assert!(matcher.run().is_empty());
        assert_eq!(matcher.remaining_candidates(), &["a"]);
    }

    #[test]
    fn test_stronger_value_wins_contested_candidate() {
        let closeness = Metric::new("Closeness", |v: &&str, c: &&str| {
            1.0 - (v.len() as f32 - c.len() as f32).abs() / 10.0
        });

        let mut matcher = Matcher::new(
            vec!["aaaa", "aaa"],
            vec!["xxx"],
            vec![Pass::at_least(closeness, 0.5)],
            true,
        );

        let matches = matcher.run();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].value, "aaa");
        assert_eq!(matcher.remaining_values(), &["aaaa"]);
    }

    #[test]
    fn test_bar_must_be_cleared() {
        let weak = Metric::new("Weak", |_: &&str, _: &&str| 0.3);
        let mut matcher = Matcher::new(
            vec!["a"],
            vec!["b"],
            vec![MetricPass::new(weak, Acceptance::AtLeast(0.5))],
            true,
        );

        assert!(matcher.run().is_empty());
    }

    #[test]
    fn test_later_pass_overrides_earlier_leader_below_bar() {
        let fuzzy = Metric::new("Fuzzy", |_: &&str, c: &&str| if *c == "A" { 0.4 } else { 0.3 });
        let exact = Metric::new("Exact", |_: &&str, c: &&str| if *c == "B" { 1.0 } else { 0.0 });

        let mut matcher = Matcher::new(
            vec!["v"],
            vec!["A", "B"],
            vec![Pass::at_least(fuzzy, 0.5), Pass::exact(exact)],
            true,
        );

        let matches = matcher.run();
        let pairs: Vec<_> = matches.iter().map(|m| (m.value, m.candidate)).collect();
        assert_eq!(pairs, vec![("v", "B")]);
        assert_eq!(matcher.remaining_candidates(), &["A"]);
    }

    #[test]
    fn test_earlier_passes_break_ties() {
        let first = Metric::new("First", |_: &&str, c: &&str| if *c == "B" { 0.9 } else { 0.6 });
        let flat = Metric::new("Flat", |_: &&str, _: &&str| 1.0);

        let mut matcher = Matcher::new(
            vec!["v"],
            vec!["A", "B"],
            vec![Pass::at_least(first, 0.95), Pass::exact(flat)],
            true,
        );

        let matches = matcher.run();
        assert_eq!(matches[0].candidate, "B");
    }

    #[test]
    fn test_cascade_short_circuits_discriminated_pairs() {
        let name_calls = Arc::new(AtomicUsize::new(0));
        let counter = name_calls.clone();
        let name = Metric::new("Name", move |_: &&str, _: &&str| {
            counter.fetch_add(1, AtomicOrdering::SeqCst);
            0.5
        });
        let length = Metric::new("Length", |v: &&str, c: &&str| {
            if v.len() == c.len() {
                1.0
            } else {
                VETO
            }
        });

        let mut matcher = Matcher::new(
            vec!["a", "bb"],
            vec!["xx", "y"],
            vec![Pass::exact(Cascade::of(vec![length, name]))],
            true,
        );

        assert_eq!(matcher.run().len(), 2);
        assert_eq!(name_calls.load(AtomicOrdering::SeqCst), 0);
    }

    #[test]
    fn test_later_passes_skip_committed_pairs() {
        let name_calls = Arc::new(AtomicUsize::new(0));
        let counter = name_calls.clone();
        let name = Metric::new("Name", move |_: &&str, _: &&str| {
            counter.fetch_add(1, AtomicOrdering::SeqCst);
            0.5
        });

        let mut matcher = Matcher::new(
            vec!["a", "bb"],
            vec!["xx", "y"],
            vec![Pass::exact(equal_length()), Pass::at_least(name, 0.5)],
            true,
        );

        assert_eq!(matcher.run().len(), 2);
        assert_eq!(name_calls.load(AtomicOrdering::SeqCst), 0);
    }

    #[test]
    fn test_each_value_matched_at_most_once() {
        let always = Metric::new("Always", |_: &&str, _: &&str| 1.0);
        let mut matcher = Matcher::new(
            vec!["a", "b", "c"],
            vec!["x", "y"],
            vec![Pass::exact(always)],
            false,
        );

        let matches = matcher.run();
        assert_eq!(matches.len(), 2);
        assert_ne!(matches[0].candidate, matches[1].candidate);
        assert_eq!(matcher.remaining_values(), &["c"]);
        for m in &matches {
            assert!(!matcher.remaining_values().contains(&m.value));
            assert!(!matcher.remaining_candidates().contains(&m.candidate));
        }
    }

    #[test]
    fn test_deterministic_for_identical_input() {
        let run = || {
            let mut matcher = Matcher::new(
                vec!["ab", "cd", "e"],
                vec!["yy", "xx", "z"],
                vec![Pass::exact(equal_length()), Pass::exact(first_char())],
                false,
            );
            matcher
                .run()
                .into_iter()
                .map(|m| (m.value, m.candidate))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
