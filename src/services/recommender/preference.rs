use std::collections::HashMap;

use uuid::Uuid;

use super::clustering::ClusterAssignment;

/// Resolves the group a user's watch history points to
///
/// Each watched movie still present in the assignment votes for its group;
/// the group with the most votes wins. Movies watched but since removed from
/// the catalog are skipped. Returns `None` when no watched movie matched the
/// current catalog, which callers treat as "no usable preference signal".
///
/// Ties go to the lowest label value so the result never depends on map
/// iteration order.
pub fn dominant_group(watched: &[Uuid], assignment: &ClusterAssignment) -> Option<usize> {
    let mut votes: HashMap<usize, usize> = HashMap::new();
    for movie_id in watched {
        if let Some(label) = assignment.label_of(movie_id) {
            *votes.entry(label).or_insert(0) += 1;
        }
    }

    votes
        .into_iter()
        .max_by(|(label_a, count_a), (label_b, count_b)| {
            count_a.cmp(count_b).then(label_b.cmp(label_a))
        })
        .map(|(label, _)| label)
}
