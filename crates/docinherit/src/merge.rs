//! Inheritance merger.
//!
//! Types are merged in resolver order. For each type the root fragment is
//! processed first, then every member fragment, including members added
//! while merging. Each step takes the first placeholder in pre-order,
//! removes it and copies content from the nearest candidate that has
//! content at the placeholder's path.
//!
//! A type named by an explicit reference is merged on demand before it is
//! read, unless it is itself waiting on the current type. Content copied
//! from such a type may still hold placeholders; the loop picks them up
//! again, bounded by a per-fragment iteration budget.

use std::collections::HashSet;

use log::{debug, trace, warn};

use docinherit_core::{
    fragment::{Fragment, Placeholder},
    identifier::Id,
    member::MemberKey,
    node::Content,
    path::DocPath,
    tree::MemberFragment,
};
use docinherit_parser::error::{Diagnostic, ErrorCode};

use crate::{registry::TypeRegistry, store::DocumentationStore};

/// Extra iterations granted to every fragment on top of its placeholder
/// count times the candidate chain length.
const ITERATION_SLACK: usize = 16;

/// Result of merging a set of types.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    /// Placeholders removed, with or without substitution.
    pub replaced: usize,
    /// Problems found while merging, tagged with the type being merged.
    pub diagnostics: Vec<(Id, Diagnostic)>,
}

/// Merge the types of `order` in sequence.
pub fn merge(registry: &TypeRegistry, store: &mut DocumentationStore, order: &[Id]) -> MergeOutcome {
    let mut merger = Merger {
        registry,
        store,
        active: HashSet::new(),
        merged: HashSet::new(),
        outcome: MergeOutcome::default(),
    };
    for &type_name in order {
        merger.merge_type(type_name);
    }
    merger.outcome
}

/// Which fragment of a tree a placeholder lives in.
#[derive(Debug, Clone, Copy)]
enum Target {
    Root,
    Member(usize),
}

struct Merger<'a> {
    registry: &'a TypeRegistry,
    store: &'a mut DocumentationStore,
    /// Types whose merge is in progress.
    active: HashSet<Id>,
    merged: HashSet<Id>,
    outcome: MergeOutcome,
}

impl Merger<'_> {
    fn merge_type(&mut self, type_name: Id) {
        if self.merged.contains(&type_name) || !self.active.insert(type_name) {
            return;
        }

        let chain = self
            .registry
            .lookup(type_name)
            .map(|descriptor| self.registry.ancestor_chain(descriptor))
            .unwrap_or_default();
        for &ancestor in &chain {
            self.merge_type(ancestor);
        }

        trace!(type_name:%, chain:? = chain; "Merging type");
        self.drain(type_name, Target::Root, &chain);

        let mut index = 0;
        while self
            .store
            .tree(type_name)
            .is_some_and(|tree| index < tree.members().len())
        {
            self.drain(type_name, Target::Member(index), &chain);
            index += 1;
        }

        self.active.remove(&type_name);
        self.merged.insert(type_name);
    }

    /// Resolve placeholders in one fragment until none is left.
    fn drain(&mut self, type_name: Id, target: Target, chain: &[Id]) {
        let Some(initial) = self.fragment(type_name, target).map(Fragment::placeholder_count) else {
            return;
        };
        if initial == 0 {
            return;
        }
        let mut budget = initial * (chain.len() + 1) + ITERATION_SLACK;

        loop {
            let Some(placeholder) = self
                .fragment(type_name, target)
                .and_then(Fragment::find_placeholder)
            else {
                return;
            };

            if budget == 0 {
                self.give_up(type_name, target);
                return;
            }
            budget -= 1;

            if let Some(fragment) = self.fragment_mut(type_name, target) {
                fragment.remove_placeholder(&placeholder);
            }
            self.outcome.replaced += 1;

            let Some(candidates) = self.candidates(type_name, &placeholder, chain) else {
                continue;
            };

            match target {
                Target::Root => {
                    self.inherit_root(type_name, &placeholder, &candidates);
                    if placeholder.is_unqualified() {
                        self.inherit_members(type_name, None, &placeholder, &candidates);
                    }
                }
                Target::Member(index) => {
                    let Some(key) = self.member_key(type_name, index) else {
                        return;
                    };
                    self.inherit_members(type_name, Some(&key), &placeholder, &candidates);
                }
            }
        }
    }

    /// Types to search, nearest first.
    ///
    /// An explicit reference naming a registered type selects that type
    /// alone, merged first if needed. A reference that cannot be parsed
    /// selects nothing.
    fn candidates(&mut self, type_name: Id, placeholder: &Placeholder, chain: &[Id]) -> Option<Vec<Id>> {
        if let Some(reference) = placeholder.reference() {
            let Some(target) = placeholder.target() else {
                self.unresolved(type_name, placeholder, reference);
                return None;
            };
            if self.registry.lookup(target.type_name()).is_some() {
                self.merge_type(target.type_name());
                return Some(vec![target.type_name()]);
            }
            trace!(type_name:%, reference; "Referenced type not registered, searching ancestors");
        }
        Some(chain.iter().rev().copied().collect())
    }

    fn inherit_root(&mut self, type_name: Id, placeholder: &Placeholder, candidates: &[Id]) {
        let path = placeholder.path();
        let found = candidates.iter().find_map(|&candidate| {
            let tree = self.store.tree(candidate)?;
            content_at(tree.root(), path).map(|children| (candidate, children))
        });

        let Some((source, children)) = found else {
            if let Some(reference) = placeholder.reference() {
                self.unresolved(type_name, placeholder, reference);
            }
            return;
        };

        if let Some(tree) = self.store.tree_mut(type_name) {
            tree.root_mut().replace_at(path, children);
            tree.mark_changed();
            debug!(type_name:%, source:%, path:%; "Inherited type documentation");
        }
    }

    /// Copy matching member documentation from the candidates.
    ///
    /// With no `current` key every documented member of every candidate
    /// matches. Otherwise a base member matches when it is the explicit
    /// target or documents the same member as `current`.
    fn inherit_members(
        &mut self,
        type_name: Id,
        current: Option<&MemberKey>,
        placeholder: &Placeholder,
        candidates: &[Id],
    ) {
        let path = placeholder.path();
        let target = placeholder.target();

        let mut matches: Vec<MemberFragment> = Vec::new();
        for &candidate in candidates {
            let Some(tree) = self.store.tree(candidate) else {
                continue;
            };
            for base in tree.members() {
                let key = base.key();
                let is_match = match current {
                    None => true,
                    Some(current) => target.as_ref() == Some(key) || current.same_member(key),
                };
                if is_match && base.fragment().has_content_at(path) {
                    matches.push(base.clone());
                }
            }
        }

        if matches.is_empty() {
            if let (Some(reference), Some(_)) = (placeholder.reference(), current) {
                self.unresolved(type_name, placeholder, reference);
            }
            return;
        }

        for base in matches {
            let key = match current.and_then(MemberKey::member) {
                Some(member) => MemberKey::for_member(base.key().kind(), type_name, member),
                None => base.key().rehomed(type_name),
            };
            self.graft(type_name, key, &base, path);
        }
    }

    /// Place the content of `base` at `path` into the member `key`.
    fn graft(&mut self, type_name: Id, key: MemberKey, base: &MemberFragment, path: &DocPath) {
        let Some(tree) = self.store.tree_mut(type_name) else {
            return;
        };
        let positions = tree.positions_of(&key);

        let Some(&first) = positions.first() else {
            tree.push_member(base.rekeyed(key.clone()));
            tree.mark_changed();
            debug!(type_name:%, member:% = key, source:% = base.key(); "Inherited member documentation");
            return;
        };

        if positions.len() > 1 {
            warn!(member:% = key, entries = positions.len(); "Ambiguous member documentation, using the first entry");
            self.outcome.diagnostics.push((
                type_name,
                Diagnostic::warning(format!("`{key}` is documented {} times", positions.len()))
                    .with_code(ErrorCode::E301)
                    .with_help("only the first entry receives inherited documentation"),
            ));
        }

        let Some(member) = tree.member_mut(first) else {
            return;
        };
        if member.fragment().has_content_at(path) {
            trace!(member:% = key, path:%; "Member already documented");
            return;
        }
        if member.fragment_mut().copy_from(base.fragment(), path) {
            tree.mark_changed();
            debug!(type_name:%, member:% = key, source:% = base.key(), path:%; "Inherited member documentation");
        }
    }

    /// Drop every remaining placeholder of a fragment that keeps producing
    /// new ones.
    fn give_up(&mut self, type_name: Id, target: Target) {
        let Some(tree) = self.store.tree_mut(type_name) else {
            return;
        };
        let fragment = match target {
            Target::Root => tree.root_mut(),
            Target::Member(index) => match tree.member_mut(index) {
                Some(member) => member.fragment_mut(),
                None => return,
            },
        };
        while let Some(placeholder) = fragment.find_placeholder() {
            fragment.remove_placeholder(&placeholder);
        }
        tree.mark_changed();

        let location = match target {
            Target::Root => MemberKey::for_type(type_name).to_string(),
            Target::Member(index) => tree
                .member(index)
                .map_or_else(|| type_name.to_string(), |member| member.key().to_string()),
        };
        warn!(entry = location.as_str(); "Inheritance did not settle, dropping remaining placeholders");
        self.outcome.diagnostics.push((
            type_name,
            Diagnostic::warning(format!("inheritance for `{location}` did not settle"))
                .with_code(ErrorCode::E303)
                .with_help("check for `cref` references that point back at this entry"),
        ));
    }

    fn unresolved(&mut self, type_name: Id, placeholder: &Placeholder, reference: &str) {
        warn!(type_name:%, reference; "Unresolved inheritance reference");
        self.outcome.diagnostics.push((
            type_name,
            Diagnostic::warning(format!("nothing to inherit from `{reference}`"))
                .with_code(ErrorCode::E302)
                .with_help(format!(
                    "the placeholder at `{}` was removed without replacement",
                    placeholder.path()
                )),
        ));
    }

    fn fragment(&self, type_name: Id, target: Target) -> Option<&Fragment> {
        let tree = self.store.tree(type_name)?;
        match target {
            Target::Root => Some(tree.root()),
            Target::Member(index) => tree.member(index).map(MemberFragment::fragment),
        }
    }

    fn fragment_mut(&mut self, type_name: Id, target: Target) -> Option<&mut Fragment> {
        let tree = self.store.tree_mut(type_name)?;
        match target {
            Target::Root => Some(tree.root_mut()),
            Target::Member(index) => tree.member_mut(index).map(MemberFragment::fragment_mut),
        }
    }

    fn member_key(&self, type_name: Id, index: usize) -> Option<MemberKey> {
        self.store
            .tree(type_name)?
            .member(index)
            .map(|member| member.key().clone())
    }
}

/// Children of `source` at `path`, when there are any worth copying.
fn content_at(source: &Fragment, path: &DocPath) -> Option<Vec<Content>> {
    source
        .select(path)
        .filter(|node| node.has_content())
        .map(|node| node.children().to_vec())
}

#[cfg(test)]
mod tests {
    use docinherit_core::{
        descriptor::TypeDescriptor,
        member::MemberKind,
        node::Element,
        path::PathSegment,
    };

    use super::*;
    use crate::{
        config::AppConfig,
        registry::Module,
        resolver,
        store::DocumentedModule,
    };

    struct Fixture {
        registry: TypeRegistry,
        store: DocumentationStore,
        outcome: MergeOutcome,
    }

    fn run(types: Vec<TypeDescriptor>, source: &str) -> Fixture {
        let mut module = Module::new("Acme");
        for descriptor in types {
            module.add_type(descriptor);
        }
        let mut registry = TypeRegistry::new();
        registry.register(&module);

        let document = docinherit_parser::parse(source).unwrap();
        let modules = vec![DocumentedModule::new(module, document)];
        let (mut store, _) = DocumentationStore::load(&modules, &AppConfig::default());

        let order = resolver::sort(&registry, &store.type_names()).unwrap();
        let outcome = merge(&registry, &mut store, &order);
        Fixture {
            registry,
            store,
            outcome,
        }
    }

    fn text_at(fixture: &Fixture, key: &str, path: &[&str]) -> Option<String> {
        let key = MemberKey::parse(key).unwrap();
        let tree = fixture.store.tree(key.type_name())?;
        let fragment = if key.kind() == MemberKind::Type {
            tree.root()
        } else {
            tree.members().iter().find(|member| member.key() == &key)?.fragment()
        };
        let path = DocPath::from(path.iter().map(|name| PathSegment::new(*name)).collect::<Vec<_>>());
        fragment.select(&path).map(|node| node.text().trim().to_string())
    }

    #[test]
    fn test_root_placeholder_copies_everything() {
        let fixture = run(
            vec![
                TypeDescriptor::new("Acme.ClassA"),
                TypeDescriptor::new("Acme.ClassAB").with_base("Acme.ClassA"),
            ],
            r#"<doc><members>
                <member name="T:Acme.ClassA"><summary>ClassA-Class-Summary</summary><remarks>ClassA-Class-Remarks</remarks></member>
                <member name="P:Acme.ClassA.MyProperty"><summary>ClassA-MyProperty-Summary</summary><value>ClassA-MyProperty-Value</value></member>
                <member name="M:Acme.ClassA.MyMethod"><summary>ClassA-MyMethod-Summary</summary></member>
                <member name="T:Acme.ClassAB"><inheritdoc/></member>
            </members></doc>"#,
        );

        assert_eq!(fixture.outcome.replaced, 1);
        assert_eq!(text_at(&fixture, "T:Acme.ClassAB", &["summary"]).as_deref(), Some("ClassA-Class-Summary"));
        assert_eq!(text_at(&fixture, "T:Acme.ClassAB", &["remarks"]).as_deref(), Some("ClassA-Class-Remarks"));
        assert_eq!(
            text_at(&fixture, "P:Acme.ClassAB.MyProperty", &["value"]).as_deref(),
            Some("ClassA-MyProperty-Value")
        );
        assert_eq!(
            text_at(&fixture, "M:Acme.ClassAB.MyMethod", &["summary"]).as_deref(),
            Some("ClassA-MyMethod-Summary")
        );
        let tree = fixture.store.tree(Id::new("Acme.ClassAB")).unwrap();
        assert!(tree.is_changed());
        assert!(!tree.contains_placeholder());
        assert!(!fixture.store.tree(Id::new("Acme.ClassA")).unwrap().is_changed());
    }

    #[test]
    fn test_nested_placeholder_keeps_sibling_content() {
        let fixture = run(
            vec![
                TypeDescriptor::new("Acme.ClassA"),
                TypeDescriptor::new("Acme.ClassAG").with_base("Acme.ClassA"),
            ],
            r#"<doc><members>
                <member name="P:Acme.ClassA.MyProperty"><summary>ClassA-MyProperty-Summary</summary><value>ClassA-MyProperty-Value</value></member>
                <member name="P:Acme.ClassAG.MyProperty"><summary><inheritdoc/></summary><value>ClassAG-MyProperty-Value</value></member>
            </members></doc>"#,
        );

        assert_eq!(
            text_at(&fixture, "P:Acme.ClassAG.MyProperty", &["summary"]).as_deref(),
            Some("ClassA-MyProperty-Summary")
        );
        assert_eq!(
            text_at(&fixture, "P:Acme.ClassAG.MyProperty", &["value"]).as_deref(),
            Some("ClassAG-MyProperty-Value")
        );
        assert_eq!(fixture.store.tree(Id::new("Acme.ClassAG")).unwrap().members().len(), 1);
    }

    #[test]
    fn test_nearest_ancestor_wins() {
        let fixture = run(
            vec![
                TypeDescriptor::new("Acme.IShape"),
                TypeDescriptor::new("Acme.Shape").with_interface("Acme.IShape"),
                TypeDescriptor::new("Acme.Circle").with_base("Acme.Shape"),
            ],
            r#"<doc><members>
                <member name="T:Acme.IShape"><summary>interface</summary></member>
                <member name="T:Acme.Shape"><summary>shape</summary></member>
                <member name="T:Acme.Circle"><summary><inheritdoc/></summary></member>
            </members></doc>"#,
        );

        assert_eq!(text_at(&fixture, "T:Acme.Circle", &["summary"]).as_deref(), Some("shape"));
    }

    #[test]
    fn test_explicit_reference_takes_precedence() {
        let fixture = run(
            vec![
                TypeDescriptor::new("Acme.Base"),
                TypeDescriptor::new("Acme.Other"),
                TypeDescriptor::new("Acme.Derived").with_base("Acme.Base"),
            ],
            r#"<doc><members>
                <member name="T:Acme.Base"><summary>base</summary></member>
                <member name="T:Acme.Other"><summary>other</summary></member>
                <member name="T:Acme.Derived"><summary><inheritdoc cref="T:Acme.Other"/></summary></member>
            </members></doc>"#,
        );

        assert_eq!(text_at(&fixture, "T:Acme.Derived", &["summary"]).as_deref(), Some("other"));
        assert!(fixture.outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_overloads_follow_signature() {
        let fixture = run(
            vec![
                TypeDescriptor::new("Acme.ClassCA"),
                TypeDescriptor::new("Acme.ClassCB"),
            ],
            r#"<doc><members>
                <member name="M:Acme.ClassCA.MethodA(System.Int32)"><summary>int</summary></member>
                <member name="M:Acme.ClassCA.MethodA(System.String)"><summary>string</summary></member>
                <member name="M:Acme.ClassCB.MethodA(System.Int32)"><inheritdoc cref="T:Acme.ClassCA"/></member>
                <member name="M:Acme.ClassCB.MethodA(System.String)"><inheritdoc cref="T:Acme.ClassCA"/></member>
            </members></doc>"#,
        );

        assert_eq!(
            text_at(&fixture, "M:Acme.ClassCB.MethodA(System.Int32)", &["summary"]).as_deref(),
            Some("int")
        );
        assert_eq!(
            text_at(&fixture, "M:Acme.ClassCB.MethodA(System.String)", &["summary"]).as_deref(),
            Some("string")
        );
        assert_eq!(fixture.store.tree(Id::new("Acme.ClassCB")).unwrap().members().len(), 2);
    }

    #[test]
    fn test_member_reference_renames_source() {
        let fixture = run(
            vec![
                TypeDescriptor::new("Acme.ClassCA"),
                TypeDescriptor::new("Acme.ClassCB"),
            ],
            r#"<doc><members>
                <member name="M:Acme.ClassCA.MethodB"><summary>method b</summary></member>
                <member name="M:Acme.ClassCB.MethodC"><inheritdoc cref="M:Acme.ClassCA.MethodB"/></member>
            </members></doc>"#,
        );

        assert_eq!(
            text_at(&fixture, "M:Acme.ClassCB.MethodC", &["summary"]).as_deref(),
            Some("method b")
        );
        assert_eq!(fixture.store.tree(Id::new("Acme.ClassCB")).unwrap().members().len(), 1);
    }

    #[test]
    fn test_unresolved_reference_is_reported() {
        let fixture = run(
            vec![TypeDescriptor::new("Acme.Lonely")],
            r#"<doc><members>
                <member name="T:Acme.Lonely"><summary>kept</summary><remarks><inheritdoc cref="T:Acme.Missing"/></remarks></member>
                <member name="M:Acme.Lonely.Run"><inheritdoc cref="not a reference"/></member>
            </members></doc>"#,
        );

        let codes: Vec<_> = fixture
            .outcome
            .diagnostics
            .iter()
            .map(|(_, diag)| diag.code())
            .collect();
        assert_eq!(codes, vec![Some(ErrorCode::E302), Some(ErrorCode::E302)]);
        assert_eq!(fixture.outcome.replaced, 2);

        let tree = fixture.store.tree(Id::new("Acme.Lonely")).unwrap();
        assert!(!tree.contains_placeholder());
        assert!(!tree.is_changed());
        assert_eq!(text_at(&fixture, "T:Acme.Lonely", &["summary"]).as_deref(), Some("kept"));
        assert_eq!(text_at(&fixture, "T:Acme.Lonely", &["remarks"]), None);
    }

    #[test]
    fn test_forward_reference_is_resolved() {
        // Resolver order puts Acme.Early first, yet it borrows from Acme.Late.
        let fixture = run(
            vec![
                TypeDescriptor::new("Acme.Root"),
                TypeDescriptor::new("Acme.Late").with_base("Acme.Root"),
                TypeDescriptor::new("Acme.Early"),
            ],
            r#"<doc><members>
                <member name="T:Acme.Root"><summary>root</summary></member>
                <member name="T:Acme.Late"><inheritdoc/></member>
                <member name="T:Acme.Early"><inheritdoc cref="T:Acme.Late"/></member>
            </members></doc>"#,
        );

        let order: Vec<_> = resolver::sort(&fixture.registry, &fixture.store.type_names()).unwrap();
        let early = order.iter().position(|t| *t == "Acme.Early").unwrap();
        let late = order.iter().position(|t| *t == "Acme.Late").unwrap();
        assert!(early < late);

        assert_eq!(text_at(&fixture, "T:Acme.Early", &["summary"]).as_deref(), Some("root"));
        assert!(!fixture.store.trees().any(|tree| tree.contains_placeholder()));
    }

    #[test]
    fn test_reference_into_waiting_type_settles() {
        // Acme.Y keeps copying a placeholder from Acme.X while Acme.X waits on it.
        let fixture = run(
            vec![TypeDescriptor::new("Acme.Y"), TypeDescriptor::new("Acme.X")],
            r#"<doc><members>
                <member name="T:Acme.Y"><remarks><inheritdoc cref="T:Acme.X"/></remarks></member>
                <member name="T:Acme.X"><summary><inheritdoc cref="T:Acme.Y"/></summary><remarks>x <inheritdoc cref="T:Acme.X"/></remarks></member>
            </members></doc>"#,
        );

        let codes: Vec<_> = fixture
            .outcome
            .diagnostics
            .iter()
            .map(|(_, diag)| diag.code())
            .collect();
        assert!(codes.contains(&Some(ErrorCode::E303)));
        assert!(!fixture.store.trees().any(|tree| tree.contains_placeholder()));
        assert_eq!(text_at(&fixture, "T:Acme.X", &["remarks"]).as_deref(), Some("x"));
    }

    #[test]
    fn test_ambiguous_member_uses_first_entry() {
        let fixture = run(
            vec![
                TypeDescriptor::new("Acme.Base"),
                TypeDescriptor::new("Acme.Derived").with_base("Acme.Base"),
            ],
            r#"<doc><members>
                <member name="M:Acme.Base.Run"><summary>run</summary></member>
                <member name="M:Acme.Derived.Run"><inheritdoc/></member>
                <member name="M:Acme.Derived.Run"><remarks>second</remarks></member>
            </members></doc>"#,
        );

        let tree = fixture.store.tree(Id::new("Acme.Derived")).unwrap();
        assert_eq!(tree.members()[0].fragment().root().text().trim(), "run");
        assert_eq!(tree.members()[1].fragment().root().text().trim(), "second");
        assert!(
            fixture
                .outcome
                .diagnostics
                .iter()
                .any(|(_, diag)| diag.code() == Some(ErrorCode::E301))
        );
    }

    #[test]
    fn test_content_at_skips_blank_nodes() {
        let fragment = Fragment::new(
            Element::new("member")
                .with_child(Element::new("summary").with_text("  "))
                .with_child(Element::new("remarks").with_text("x")),
        );

        assert!(content_at(&fragment, &DocPath::from(vec![PathSegment::new("summary")])).is_none());
        assert!(content_at(&fragment, &DocPath::from(vec![PathSegment::new("remarks")])).is_some());
    }
}
