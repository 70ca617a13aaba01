pub mod coerce;
pub mod credential;
pub mod operation;
pub mod params;
pub mod parsing;
pub mod query;
pub mod table;
pub mod transport;

pub use credential::{CredentialSource, EnvCredential, StaticCredential};
pub use operation::{Operation, OperationSpec, Policy};
pub use params::{ParamValue, Params};
pub use parsing::{Document, Node, Record};
pub use query::{
    BaseElementQuery, ChildrenQuery, CikLookupQuery, ExtensionElementQuery, FactsQuery, NetworksQuery, Query,
    RelationshipsQuery,
};
pub use table::{Table, Value};
pub use transport::{HttpTransport, Request, Transport};

use log::info;

use crate::core::{Result, Settings};

/// Shape of an operation's result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Output {
    /// Harmonized table (numeric/date columns coerced for facts)
    #[default]
    Table,
    /// Parsed documents, one per remote call
    Raw,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    Table(Table),
    Documents(Vec<Document>),
}

impl QueryOutput {
    pub fn into_table(self) -> Option<Table> {
        match self {
            QueryOutput::Table(table) => Some(table),
            QueryOutput::Documents(_) => None,
        }
    }

    pub fn into_documents(self) -> Option<Vec<Document>> {
        match self {
            QueryOutput::Documents(docs) => Some(docs),
            QueryOutput::Table(_) => None,
        }
    }
}

/// Runs operations against the remote service: expands parameters, issues the
/// calls one after another and merges their results.
pub struct XbrlClient<T> {
    transport: T,
}

impl XbrlClient<HttpTransport> {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let credential = EnvCredential::new(settings.api_key_var.clone());
        Ok(Self::new(HttpTransport::new(settings, Box::new(credential))?))
    }

    pub fn from_env() -> Result<Self> {
        Self::from_settings(&Settings::from_env()?)
    }
}

impl<T: Transport> XbrlClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Executes `operation`. Calls run in order and the first failure aborts the
    /// whole operation.
    pub fn run(&self, operation: Operation, params: &Params, output: Output) -> Result<QueryOutput> {
        let spec = operation.spec();
        let requests = params::expand(spec, params)?;

        let mut documents = Vec::with_capacity(requests.len());
        for request in &requests {
            documents.push(self.transport.execute(request)?);
        }

        if output == Output::Raw {
            return Ok(QueryOutput::Documents(documents));
        }

        let mut table = table::harmonize(
            documents
                .iter()
                .map(|doc| parsing::flatten(doc, spec.record_element)),
        );
        if spec.coerce {
            coerce::coerce_facts(&mut table);
        }

        info!(
            "{}: {} call(s), {} row(s), {} column(s)",
            operation,
            requests.len(),
            table.len(),
            table.columns().len()
        );
        Ok(QueryOutput::Table(table))
    }

    pub fn query<Q: Query>(&self, query: &Q, output: Output) -> Result<QueryOutput> {
        self.run(Q::OPERATION, &query.params(), output)
    }

    pub fn base_element(&self, query: &BaseElementQuery, output: Output) -> Result<QueryOutput> {
        self.query(query, output)
    }

    pub fn cik_lookup(&self, query: &CikLookupQuery, output: Output) -> Result<QueryOutput> {
        self.query(query, output)
    }

    pub fn children(&self, query: &ChildrenQuery, output: Output) -> Result<QueryOutput> {
        self.query(query, output)
    }

    pub fn relationships(&self, query: &RelationshipsQuery, output: Output) -> Result<QueryOutput> {
        self.query(query, output)
    }

    pub fn extension_element(&self, query: &ExtensionElementQuery, output: Output) -> Result<QueryOutput> {
        self.query(query, output)
    }

    pub fn networks(&self, query: &NetworksQuery, output: Output) -> Result<QueryOutput> {
        self.query(query, output)
    }

    pub fn facts(&self, query: &FactsQuery, output: Output) -> Result<QueryOutput> {
        self.query(query, output)
    }
}
