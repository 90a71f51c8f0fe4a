//! Asynchronous rewriter
//!
//! The template is already asynchronous, so members are copied. Aggregates are made
//! `public async`, and wrapped streams are split with their bodies as written.

use super::split::{self, ConvertedParts, WrapperSplit};
use super::{Classified, CodegenError, MemberRewriter};
use crate::linqgen::ast::{AccessorDecl, Member};
use crate::linqgen::config::{NamingConvention, TypeMapping};

pub struct AsynchronousRewriter<'a> {
    naming: &'a NamingConvention,
    types: &'a TypeMapping,
}

impl<'a> AsynchronousRewriter<'a> {
    pub fn new(naming: &'a NamingConvention, types: &'a TypeMapping) -> Self {
        Self { naming, types }
    }
}

impl MemberRewriter for AsynchronousRewriter<'_> {
    fn naming(&self) -> &NamingConvention {
        self.naming
    }

    fn rewrite_aggregate(&self, method: &Classified, _owning_class: &str) -> Result<Vec<Member>, CodegenError> {
        let mut copied = method.method.clone();
        copied.decorators.clear();
        copied.modifiers = split::make_public_async(&method.method.modifiers);
        split::normalize_header(&mut copied);
        Ok(vec![Member::Method(copied)])
    }

    fn rewrite_stream(&self, method: &Classified, _owning_class: &str) -> Result<Vec<Member>, CodegenError> {
        let mut copied = method.method.clone();
        copied.decorators.clear();
        split::normalize_header(&mut copied);
        Ok(vec![Member::Method(copied)])
    }

    fn rewrite_wrapped_stream(
        &self,
        method: &Classified,
        owning_class: &str,
    ) -> Result<Vec<Member>, CodegenError> {
        WrapperSplit {
            owning_class,
            sequence_type: &self.types.async_sequence,
            async_impl: true,
        }
        .apply(
            method,
            self.naming,
            ConvertedParts {
                type_parameters: method.method.type_parameters.clone(),
                parameters: method.method.parameters.clone(),
                body: method.body.clone(),
            },
        )
    }

    fn rewrite_getter(&self, getter: &AccessorDecl, _owning_class: &str) -> Result<Vec<Member>, CodegenError> {
        let mut copied = getter.clone();
        copied.decorators.clear();
        split::normalize_accessor_header(&mut copied);
        Ok(vec![Member::Getter(copied)])
    }
}
