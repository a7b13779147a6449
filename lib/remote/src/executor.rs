use crate::rows::{decode_graph, decode_solutions};
use crate::{EndpointError, QueryRows, RemoteQueryError, ResultTermMode};
use rdf_tabular_sparql::{
    classify, infer_schema, with_limit, QueryParser, QueryPlan, QueryType,
    UnsupportedQueryTypeError,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::debug;

/// The default timeout of a whole request, including reading the response.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// The `User-Agent` sent to endpoints by default.
pub const DEFAULT_USER_AGENT: &str = concat!("rdf-tabular/", env!("CARGO_PKG_VERSION"));

const GRAPH_MEDIA_TYPE: &str = "application/rdf+xml";
const SOLUTIONS_MEDIA_TYPE: &str = "application/sparql-results+json";

/// Options of a [RemoteQueryExecutor].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteQueryOptions {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for RemoteQueryOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Runs SPARQL queries against remote endpoints over the SPARQL protocol.
///
/// Each query is sent as a single `GET` request. The whole response is read and decoded before
/// the rows are returned. Failed requests are not retried.
///
/// The executor is cheap to clone and can be shared between tasks.
#[derive(Clone, Debug)]
pub struct RemoteQueryExecutor {
    client: Client,
    user_agent: String,
}

impl RemoteQueryExecutor {
    /// Creates an executor with the default options.
    pub fn new() -> Result<Self, RemoteQueryError> {
        Self::with_options(RemoteQueryOptions::default())
    }

    pub fn with_options(options: RemoteQueryOptions) -> Result<Self, RemoteQueryError> {
        let client = Client::builder().timeout(options.timeout).build()?;
        Ok(Self {
            client,
            user_agent: options.user_agent,
        })
    }

    /// Creates an executor that sends its requests with `client` and [DEFAULT_USER_AGENT].
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Sends `user_agent` as the `User-Agent` of all requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Runs `plan` against the endpoint at `endpoint`.
    ///
    /// If a `limit` is given, it is embedded in the query and at most `limit` rows are returned.
    /// SELECT rows follow the projection of the query. CONSTRUCT rows have a `subject`, a
    /// `predicate` and an `object` column.
    pub async fn execute(
        &self,
        endpoint: &str,
        plan: &QueryPlan,
        limit: Option<usize>,
        mode: ResultTermMode,
    ) -> Result<QueryRows, RemoteQueryError> {
        let query_type = classify(plan);
        let schema = infer_schema(plan)?;
        let plan = match limit {
            Some(limit) => with_limit(plan, limit),
            None => plan.clone(),
        };
        let url = Url::parse(endpoint).map_err(|error| RemoteQueryError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason: error.to_string(),
        })?;

        let media_type = match query_type {
            QueryType::Construct => GRAPH_MEDIA_TYPE,
            QueryType::Select { .. } | QueryType::Unsupported(_) => SOLUTIONS_MEDIA_TYPE,
        };
        debug!("Sending {query_type} query to {url}");
        let response = self
            .client
            .get(url)
            .query(&[("query", plan.to_sparql())])
            .header(CONTENT_TYPE, media_type)
            .header(ACCEPT, media_type)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(error) => {
                    debug!("Failed to read the body of the {status} response: {error}");
                    String::new()
                }
            };
            return Err(EndpointError::new(status, &body).into());
        }
        let body = response.bytes().await?;
        debug!("Received {} bytes with status {status}", body.len());

        let mut rows = match &query_type {
            QueryType::Select { variables } => decode_solutions(&body, &schema, variables, mode)?,
            QueryType::Construct => decode_graph(&body, &schema, mode)?,
            QueryType::Unsupported(form) => {
                return Err(UnsupportedQueryTypeError::new(*form).into());
            }
        };
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        Ok(QueryRows::new(schema, rows))
    }

    /// Parses `query` with the default [QueryParser] and runs it like
    /// [RemoteQueryExecutor::execute].
    pub async fn execute_str(
        &self,
        endpoint: &str,
        query: &str,
        limit: Option<usize>,
        mode: ResultTermMode,
    ) -> Result<QueryRows, RemoteQueryError> {
        let plan = QueryParser::default().parse(query)?;
        self.execute(endpoint, &plan, limit, mode).await
    }
}
