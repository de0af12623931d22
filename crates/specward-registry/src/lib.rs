//! # specward-registry
//!
//! The type registry: validation rules derived from template documents.
//!
//! This crate provides:
//! - `SpecType` and `TypeRegistry` (the rule records)
//! - template introspection (primary `_meta` block, legacy placeholder fallback)
//! - content-stable registry persistence with a check mode
//! - template metadata completeness checking
//!
//! The registry is data, not code: it is built eagerly from the template
//! directory before any validation begins and is immutable afterwards.

pub mod cache;
pub mod introspect;
pub mod spec_type;
pub mod template_check;

pub use cache::{CacheError, CacheStatus, REGISTRY_STAMP_PREFIX, WriteOutcome};
pub use introspect::{IntrospectError, IntrospectOutcome, introspect_templates};
pub use spec_type::{
    DATA_EXTENSION, DEFAULT_REQUIRED_FIELDS, PROSE_EXTENSION, RegistryError, SpecType,
    TypeRegistry,
};
pub use template_check::{
    FAILURE_CLASS_DUPLICATE_PREFIX, FAILURE_CLASS_DUPLICATE_TYPE, FAILURE_CLASS_META_MISSING,
    FAILURE_CLASS_REGISTRY_STALE, TEMPLATE_CHECK_KIND, TemplateCheckReport, TemplateCheckSummary,
    check_templates,
};
