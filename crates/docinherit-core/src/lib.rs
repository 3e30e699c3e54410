//! DocInherit Core Types
//!
//! Foundational types shared by the documentation parser and the
//! inheritance engine:
//!
//! - **Identifiers**: interned type names ([`identifier::Id`])
//! - **Descriptors**: type shapes supplied by the metadata reader ([`descriptor::TypeDescriptor`])
//! - **Member keys**: documented element identities and reference parsing ([`member::MemberKey`])
//! - **Nodes**: documentation elements with mixed content ([`node`] module)
//! - **Fragments**: path-addressed trees with placeholder handling ([`fragment::Fragment`])
//! - **Trees**: per-type documentation ([`tree::DocumentationTree`])

pub mod descriptor;
pub mod fragment;
pub mod identifier;
pub mod member;
pub mod node;
pub mod path;
pub mod tree;
