//! Typed parameter sets, one per operation.
//!
//! ```no_run
//! use xbrlus::xbrl::{FactsQuery, Output, XbrlClient};
//!
//! # fn main() -> xbrlus::core::Result<()> {
//! let client = XbrlClient::from_env()?;
//! let query = FactsQuery::new()
//!     .cik(["0000320193", "0000789019"])
//!     .element("Assets")
//!     .year(2014u32)
//!     .period("Y");
//! let facts = client.facts(&query, Output::Table)?;
//! # Ok(())
//! # }
//! ```

use super::operation::Operation;
use super::params::{ParamValue, Params};

/// Parameter set bound to one operation.
pub trait Query {
    const OPERATION: Operation;

    fn params(&self) -> Params;
}

macro_rules! query {
    (
        $(#[$meta:meta])*
        $name:ident => $operation:ident {
            $($field:ident => $param:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            $(pub $field: Option<ParamValue>,)*
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            $(
                pub fn $field(mut self, value: impl Into<ParamValue>) -> Self {
                    self.$field = Some(value.into());
                    self
                }
            )*
        }

        impl Query for $name {
            const OPERATION: Operation = Operation::$operation;

            fn params(&self) -> Params {
                let mut params = Params::new();
                $(params.insert_opt($param, self.$field.clone());)*
                params
            }
        }
    };
}

query! {
    /// Base taxonomy element definitions. One call per element.
    BaseElementQuery => BaseElement {
        element => "Element",
        namespace => "Namespace",
    }
}

query! {
    /// Company identifiers by CIK or ticker. One call per identifier.
    CikLookupQuery => CikLookup {
        cik => "CIK",
        ticker => "Ticker",
    }
}

query! {
    /// Children of an element in a filing's relationship network.
    ChildrenQuery => Children {
        element => "Element",
        network => "Network",
        accession => "Accession",
        cik => "CIK",
    }
}

query! {
    /// Taxonomy relationships of an element.
    RelationshipsQuery => Relationships {
        element => "Element",
        network => "Network",
        linkbase => "Linkbase",
        year => "Year",
    }
}

query! {
    /// Company extension elements.
    ExtensionElementQuery => ExtensionElement {
        element => "Element",
        accession => "Accession",
        cik => "CIK",
    }
}

query! {
    /// Relationship networks of a filing. One call per accession number.
    NetworksQuery => Networks {
        accession => "Accession",
        cik => "CIK",
        year => "Year",
        period => "Period",
    }
}

query! {
    /// Reported fact values. CIK and Element lists are sent in a single call.
    FactsQuery => Facts {
        cik => "CIK",
        ticker => "Ticker",
        element => "Element",
        axis => "Axis",
        member => "Member",
        year => "Year",
        period => "Period",
        no_years => "NoYears",
        dim_reqd => "DimReqd",
        restated => "Restated",
        small => "Small",
    }
}
