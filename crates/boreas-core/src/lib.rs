//! # Boreas Core
//!
//! Core data model for the Boreas controller framework.
//!
//! This crate provides the types that argument resolution works on:
//!
//! - [`HttpRequest`] - Inbound request with lazily parsed query and body
//! - [`ResponseHeaders`] - Headers collected before the controller runs
//! - [`ComponentMethod`] / [`ComponentMethodArgument`] - Declared controller methods
//! - [`ArgumentType`] - Runtime type descriptor with declared lineage
//! - [`Annotations`] - Type-keyed method metadata
//! - [`di::Container`] - Service container and [`di::Injectable`] construction

#![doc(html_root_url = "https://docs.rs/boreas-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod annotation;
pub mod di;
mod error;
mod method;
mod params;
mod request;
mod response;
mod route;
mod types;

pub use annotation::{Annotation, Annotations, MapQueryParameterAnnotation, RequestBodyAnnotation};
pub use error::{AlreadyAnnotated, BodyError};
pub use method::{
    ArgumentKey, ComponentMethod, ComponentMethodArgument, ComponentMethodBuilder, MethodId,
    MethodMetadata,
};
pub use params::Params;
pub use request::{HttpRequest, HttpRequestBuilder};
pub use response::{InvalidHeader, ResponseHeaders};
pub use route::{QueryVariable, RouteAnnotation, UrlTemplate};
pub use types::{readable_type_name, ArgumentType};
