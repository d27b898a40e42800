//! `td-network`: the generator's view of the external road network.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`registry`] | `BoundaryRegistry`, `BoundaryRegistryBuilder`, `EdgeSets`  |
//! | [`loader`]   | `load_registry_csv`, `load_registry_reader`                |
//! | [`assigner`] | `OdAssigner`                                               |
//! | [`error`]    | `InvalidEndpointError`, `NetworkError`, `NetworkResult<T>` |

pub mod assigner;
pub mod error;
pub mod loader;
pub mod registry;


pub use assigner::OdAssigner;
pub use error::{InvalidEndpointError, NetworkError, NetworkResult};
pub use loader::{load_registry_csv, load_registry_reader};
pub use registry::{BoundaryRegistry, BoundaryRegistryBuilder, EdgeSets};
