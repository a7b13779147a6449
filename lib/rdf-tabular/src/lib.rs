#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod error;
pub mod io;

pub mod model {
    pub use rdf_tabular_model::*;
}

pub mod storage {
    pub use rdf_tabular_storage::*;
}

pub mod sparql {
    pub use rdf_tabular_sparql::*;
}

pub mod remote {
    pub use rdf_tabular_remote::*;
}
