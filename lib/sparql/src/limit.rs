use crate::plan::QueryPlan;
use spargebra::algebra::GraphPattern;
use spargebra::Query;
use tracing::debug;

/// Derives a plan whose results are capped at `limit` rows.
///
/// The limit is embedded in the query as a `LIMIT` clause. An existing `LIMIT` is only lowered,
/// never raised, and an `OFFSET` is kept. ASK and DESCRIBE plans are returned unchanged.
///
/// Note that for CONSTRUCT queries the limit caps the number of solutions, which may produce
/// more triples than `limit`.
pub fn with_limit(plan: &QueryPlan, limit: usize) -> QueryPlan {
    let query = match plan.query().clone() {
        Query::Select {
            dataset,
            pattern,
            base_iri,
        } => Query::Select {
            dataset,
            pattern: limit_pattern(pattern, limit),
            base_iri,
        },
        Query::Construct {
            template,
            dataset,
            pattern,
            base_iri,
        } => Query::Construct {
            template,
            dataset,
            pattern: limit_pattern(pattern, limit),
            base_iri,
        },
        query @ (Query::Ask { .. } | Query::Describe { .. }) => {
            debug!("Not limiting a {} query", plan.query_type());
            query
        }
    };
    QueryPlan::new(query)
}

fn limit_pattern(pattern: GraphPattern, limit: usize) -> GraphPattern {
    match pattern {
        GraphPattern::Slice {
            inner,
            start,
            length,
        } => GraphPattern::Slice {
            inner,
            start,
            length: Some(length.map_or(limit, |length| length.min(limit))),
        },
        pattern => GraphPattern::Slice {
            inner: Box::new(pattern),
            start: 0,
            length: Some(limit),
        },
    }
}
