use crate::modules::similarity::{NameNormalizer, NameSimilarity};

/// Picks an option without asking when the choice is obvious
///
/// A lone option is always taken. Among several, the option is taken when
/// it is the only one whose best name reaches `threshold` against the query.
pub fn auto_select<'a, T, N, I>(
    query: &str,
    options: &'a [T],
    names: N,
    similarity: &dyn NameSimilarity,
    threshold: f32,
) -> Option<usize>
where
    N: Fn(&'a T) -> I,
    I: Iterator<Item = &'a str>,
{
    match options.len() {
        0 => return None,
        1 => return Some(0),
        _ => {}
    }

    let normalizer = NameNormalizer::default_pipeline();
    let query = normalizer.normalize(query);

    let mut probable = options.iter().enumerate().filter(|&(_, option)| {
        names(option)
            .map(|name| similarity.calculate(&query, &normalizer.normalize(name)))
            .any(|score| score >= threshold as f64)
    });

    match (probable.next(), probable.next()) {
        (Some((index, _)), None) => Some(index),
        _ => None,
    }
}
