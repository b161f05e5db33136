//! Domain labels, candidate validation and registrar lookups

pub mod registrar;
pub mod validator;

pub use registrar::{create_registrar, NameComRegistrar, OfflineRegistrar, Registrar};
#[cfg(feature = "rdap")]
pub use registrar::RdapRegistrar;
pub use validator::{DomainLabel, DomainValidator};
