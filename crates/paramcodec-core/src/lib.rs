//! Parameter Codec Core Library
//!
//! This library binds raw HTTP request data (query and form fields, cookies,
//! headers, path segments, JSON bodies, multipart files) to typed call
//! arguments on the server side, and encodes typed arguments back into
//! request fields on the client side.

pub mod adapter;
pub mod codec;
pub mod config;
pub mod convert;
pub mod descriptor;
pub mod error;
pub mod processor;
pub mod registry;
pub mod request;

pub use crate::{
    codec::OperationCodec,
    config::CodecConfig,
    convert::{Converter, DefaultConverter},
    descriptor::{ParamDescriptor, ParamLocation, ScalarType, TargetType},
    error::{Error, Result},
    processor::{ParamProcessor, ParamValue, ProcessorCreator},
    registry::ProcessorRegistry,
    request::{ClientRequest, FilePart, HttpServerRequest, RestClientRequest, ServerRequest},
};
