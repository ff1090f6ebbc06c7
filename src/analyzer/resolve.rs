// src/analyzer/resolve.rs
//
// 第二遍：作用域图已经完整，逐个 binding 计算 frame、解析引用并检查断言。

use super::ResolvedBinding;
use super::annotation::AnnotationBody;
use super::binder::{Binding, Reference, resolve_reference};
use super::frame::{FrameCheck, FrameResolver};
use super::scope::ScopeGraph;
use super::semantic_error::ResolveError;
use crate::config::NamespacePolicy;

pub(super) fn pass2_resolve_bindings(
    graph: &ScopeGraph,
    policy: NamespacePolicy,
    bindings: Vec<Binding>,
    errors: &mut Vec<ResolveError>,
) -> Result<Vec<ResolvedBinding>, ResolveError> {
    let resolver = FrameResolver::new(graph, policy);
    let mut resolved = Vec::with_capacity(bindings.len());

    for binding in bindings {
        // DetachedScope 说明作用域图本身有问题，整个翻译单元作废
        let frame = resolver.resolve_frame(&binding)?;

        let (reference, check) = match &binding.annotation.body {
            AnnotationBody::Note { reference } => match resolve_reference(graph, &binding, reference) {
                Ok(found) => (Some(found), None),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    errors.push(err);
                    (Some(Reference::Unresolved(reference.clone())), None)
                }
            },
            AnnotationBody::Frame(expected) => {
                let check = FrameCheck::new(expected, &frame);
                if !check.holds {
                    errors.push(ResolveError::FrameMismatch {
                        target: binding.annotation.target.clone(),
                        expected: expected.to_string(),
                        found: frame.to_string(),
                        span: binding.annotation.span.clone(),
                    });
                }
                (None, Some(check))
            }
        };

        tracing::debug!("`{}` (line {}) => {}", binding.annotation.target, binding.annotation.line, frame);
        resolved.push(ResolvedBinding {
            binding,
            frame,
            reference,
            check,
        });
    }

    Ok(resolved)
}
