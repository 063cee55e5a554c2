use crate::cache::ResultCache;

/// Correlation-by-rank series derived from the cached records.
///
/// Built once from a cache snapshot and never mutated; callers drop it and
/// build a new one when the cache changes.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationChart {
    query: String,
    points: Vec<(f64, f64)>,
}

impl CorrelationChart {
    pub fn from_cache(cache: &ResultCache) -> Self {
        let points = cache
            .correlations()
            .enumerate()
            .map(|(rank, correlation)| ((rank + 1) as f64, correlation))
            .collect();

        Self {
            query: cache.query().to_string(),
            points,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// `(rank, correlation)` pairs, rank starting at 1
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// X axis upper bound
    pub fn max_rank(&self) -> f64 {
        self.points.len().max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::ResultRecord;

    #[test]
    fn test_points_follow_rank_order() {
        let mut cache = ResultCache::new();
        cache.reset("ocean");
        let records = [0.9, 0.5, 0.1]
            .iter()
            .enumerate()
            .map(|(i, c)| ResultRecord {
                link: format!("https://ocean.org/{i}"),
                title: format!("ocean {i}"),
                snippet: String::new(),
                correlation: *c,
            })
            .collect();
        cache.append(records, 3);

        let chart = CorrelationChart::from_cache(&cache);
        assert_eq!(chart.query(), "ocean");
        assert_eq!(chart.points(), &[(1.0, 0.9), (2.0, 0.5), (3.0, 0.1)]);
        assert_eq!(chart.max_rank(), 3.0);
    }

    #[test]
    fn test_empty_cache_gives_empty_chart() {
        let chart = CorrelationChart::from_cache(&ResultCache::new());
        assert!(chart.is_empty());
        assert_eq!(chart.max_rank(), 1.0);
    }
}
