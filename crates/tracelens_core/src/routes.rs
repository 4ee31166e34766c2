//! Paths handed to the navigation collaborator.

use crate::experiment::ExperimentId;

/// Compare view path with an ordered `experimentId` parameter list.
/// The first id is the baseline; the rest follow in selection order.
pub fn compare_path(ids: &[ExperimentId]) -> String {
    let mut path = String::from("/compare");
    for (ix, id) in ids.iter().enumerate() {
        path.push(if ix == 0 { '?' } else { '&' });
        path.push_str("experimentId=");
        path.push_str(&urlencoding::encode(id.as_str()));
    }
    path
}

/// Trace listing for the project an experiment ran against.
pub fn traces_path(project_id: &str) -> String {
    format!("/projects/{}/traces", urlencoding::encode(project_id))
}

/// Fixed-path CSV export for a single experiment.
pub fn experiment_export_path(id: &ExperimentId) -> String {
    format!("/exports/experiments/{}.csv", urlencoding::encode(id.as_str()))
}

/// Resolves a path against the configured endpoint.
pub fn absolute(endpoint: &str, path: &str) -> String {
    format!("{}{}", endpoint.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ExperimentId {
        ExperimentId::new(s)
    }

    #[test]
    fn compare_path_keeps_baseline_first() {
        let ids = [id("c"), id("a"), id("b")];
        assert_eq!(
            compare_path(&ids),
            "/compare?experimentId=c&experimentId=a&experimentId=b"
        );
    }

    #[test]
    fn compare_path_escapes_opaque_ids() {
        let ids = [id("exp/1 a")];
        assert_eq!(compare_path(&ids), "/compare?experimentId=exp%2F1%20a");
    }

    #[test]
    fn absolute_joins_without_doubling_slashes() {
        assert_eq!(
            absolute("http://localhost:6006/", "/compare?experimentId=x"),
            "http://localhost:6006/compare?experimentId=x"
        );
    }

    #[test]
    fn export_path_is_per_experiment() {
        assert_eq!(
            experiment_export_path(&id("exp-7")),
            "/exports/experiments/exp-7.csv"
        );
    }
}
