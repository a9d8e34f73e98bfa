//! Adapters turning framework-specific parameter declarations into descriptors.
//!
//! Each supported declaration dialect gets one [`ParamAdapter`]
//! implementation. The rest of the library only ever sees the resulting
//! [`ParamDescriptor`], so no dialect leaks past this module.

pub mod openapi;
pub mod spring;

use crate::descriptor::ParamDescriptor;

pub use openapi::{OpenApiAdapter, OpenApiParameter};
pub use spring::{SpringAdapter, SpringAnnotation, SpringParamDecl, DEFAULT_NONE};

/// Converts one declaration of a dialect into a canonical descriptor
pub trait ParamAdapter {
    type Declaration;

    fn descriptor(&self, declaration: &Self::Declaration) -> crate::Result<ParamDescriptor>;

    /// Convert every declaration, stopping at the first failure
    fn descriptors<'a, I>(&self, declarations: I) -> crate::Result<Vec<ParamDescriptor>>
    where
        I: IntoIterator<Item = &'a Self::Declaration>,
        Self::Declaration: 'a,
    {
        declarations
            .into_iter()
            .map(|declaration| self.descriptor(declaration))
            .collect()
    }
}
