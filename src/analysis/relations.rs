// Relationship derivation: inheritance and usage edges per type
//
// Derivation is pure. The same directory and policy always give the same
// edges, in the order of the originating base types and members.

use crate::analysis::TypeDirectory;
use crate::config::{DiagramConfig, RealizationRule};
use crate::parser::{BaseType, MemberKind, TypeKind, TypeRecord};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

/// How a derived type relates to one of its bases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InheritanceStyle {
    Extends,
    Realizes,
}

/// `base` is extended or realized by `derived`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InheritanceEdge {
    pub base: String,
    pub derived: String,
    pub style: InheritanceStyle,
}

/// `user` holds a member of type `used`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageEdge {
    pub user: String,
    pub used: String,
}

/// All edges originating from one type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeEdges {
    pub inheritance: Vec<InheritanceEdge>,
    pub usage: Vec<UsageEdge>,
}

impl TypeEdges {
    pub fn is_empty(&self) -> bool {
        self.inheritance.is_empty() && self.usage.is_empty()
    }
}

/// Name prefixes that keep an edge out of the diagram
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnorePolicy {
    prefixes: Vec<String>,
}

impl IgnorePolicy {
    pub fn new<S: Into<String>>(prefixes: impl IntoIterator<Item = S>) -> Self {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// A policy that ignores nothing
    pub fn none() -> Self {
        Self::default()
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn matches(&self, name: &str) -> bool {
        self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }

    /// Whether an edge between `source` and `target` is suppressed
    pub fn suppresses(&self, source: &str, target: &str) -> bool {
        self.matches(source) || self.matches(target)
    }
}

/// `IShape`-style names: a capital `I` followed by another uppercase letter
pub fn looks_like_interface(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('I') && chars.next().is_some_and(char::is_uppercase)
}

/// Decides whether a base type is extended or realized
pub trait BaseClassifier: Send + Sync {
    fn classify(
        &self,
        base: &BaseType,
        derived: &TypeRecord,
        directory: &TypeDirectory,
    ) -> InheritanceStyle;
}

/// Purely syntactic rule based on [`looks_like_interface`]
#[derive(Debug, Clone, Copy, Default)]
pub struct NamingConvention;

impl BaseClassifier for NamingConvention {
    fn classify(&self, base: &BaseType, _: &TypeRecord, _: &TypeDirectory) -> InheritanceStyle {
        if looks_like_interface(&base.name) {
            InheritanceStyle::Realizes
        } else {
            InheritanceStyle::Extends
        }
    }
}

/// Uses kinds the extractor already knows before guessing from names.
///
/// Order: kind stated by the syntax, then the kind of a same-named record in
/// the directory, then the naming convention. Interfaces extend interfaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredKind;

impl BaseClassifier for DeclaredKind {
    fn classify(
        &self,
        base: &BaseType,
        derived: &TypeRecord,
        directory: &TypeDirectory,
    ) -> InheritanceStyle {
        if derived.is_interface() {
            return InheritanceStyle::Extends;
        }

        let known = base
            .declared
            .or_else(|| directory.get(base.bare_name()).map(|r| r.kind));

        match known {
            Some(TypeKind::Interface) => InheritanceStyle::Realizes,
            Some(TypeKind::Class) => InheritanceStyle::Extends,
            None => NamingConvention.classify(base, derived, directory),
        }
    }
}

/// Derives the edges of each type under an ignore policy
pub struct RelationshipDeriver {
    ignore: IgnorePolicy,
    classifier: Box<dyn BaseClassifier>,
    dedup_usage: bool,
    include_fields: bool,
}

impl RelationshipDeriver {
    /// Naming-convention classification, all members, duplicates kept
    pub fn new(ignore: IgnorePolicy) -> Self {
        Self {
            ignore,
            classifier: Box::new(NamingConvention),
            dedup_usage: false,
            include_fields: true,
        }
    }

    pub fn from_config(config: &DiagramConfig) -> Self {
        let deriver = Self::new(IgnorePolicy::new(config.ignore.iter().cloned()))
            .with_dedup_usage(config.dedup_usage)
            .with_fields(config.include_fields);

        match config.realization {
            RealizationRule::Naming => deriver,
            RealizationRule::Declared => deriver.with_classifier(DeclaredKind),
        }
    }

    pub fn with_classifier(mut self, classifier: impl BaseClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// Keep only the first usage edge per target type
    pub fn with_dedup_usage(mut self, dedup: bool) -> Self {
        self.dedup_usage = dedup;
        self
    }

    /// Whether fields, not just properties, produce usage edges
    pub fn with_fields(mut self, include: bool) -> Self {
        self.include_fields = include;
        self
    }

    pub fn ignore_policy(&self) -> &IgnorePolicy {
        &self.ignore
    }

    /// Edges of one type
    pub fn derive(&self, record: &TypeRecord, directory: &TypeDirectory) -> TypeEdges {
        let inheritance = record
            .base_types
            .iter()
            .filter(|base| !self.ignore.suppresses(&base.name, &record.name))
            .map(|base| InheritanceEdge {
                base: base.name.clone(),
                derived: record.name.clone(),
                style: self.classifier.classify(base, record, directory),
            })
            .collect();

        let mut seen = HashSet::new();
        let usage = record
            .members
            .iter()
            .filter(|m| self.include_fields || m.kind != MemberKind::Field)
            .filter(|m| !self.ignore.suppresses(&record.name, &m.declared_type))
            .filter(|m| !self.dedup_usage || seen.insert(m.declared_type.as_str()))
            .map(|m| UsageEdge {
                user: record.name.clone(),
                used: m.declared_type.clone(),
            })
            .collect();

        TypeEdges { inheritance, usage }
    }

    /// Edges of every type, in directory order
    pub fn derive_all(&self, directory: &TypeDirectory) -> Vec<TypeEdges> {
        let records: Vec<&TypeRecord> = directory.iter().collect();
        records
            .par_iter()
            .map(|record| self.derive(record, directory))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicatePolicy;
    use crate::parser::{Language, MemberRecord, ParsedUnit};
    use std::path::PathBuf;

    fn directory(types: Vec<TypeRecord>) -> TypeDirectory {
        let unit = ParsedUnit {
            path: PathBuf::from("Test.cs"),
            language: Language::CSharp,
            types,
        };
        TypeDirectory::build(vec![unit], DuplicatePolicy::Merge).0
    }

    fn circle() -> TypeRecord {
        let mut record = TypeRecord::new("Circle", TypeKind::Class, 1);
        record.base_types.push(BaseType::new("IShape"));
        record.base_types.push(BaseType::new("Shape"));
        record.members.push(MemberRecord::field("Radius", "double"));
        record.members.push(MemberRecord::field("Center", "Point"));
        record
    }

    #[test]
    fn test_looks_like_interface() {
        assert!(looks_like_interface("IShape"));
        assert!(looks_like_interface("IRepository<Order>"));
        assert!(!looks_like_interface("Shape"));
        assert!(!looks_like_interface("Item"));
        assert!(!looks_like_interface("I"));
        assert!(!looks_like_interface(""));
    }

    #[test]
    fn test_ignore_policy_prefix_match() {
        let policy = IgnorePolicy::new(["int", "Func"]);
        assert!(policy.matches("int"));
        assert!(policy.matches("int?"));
        assert!(policy.matches("Func<Task>"));
        assert!(!policy.matches("Point"));
        assert!(policy.suppresses("Order", "int"));
        assert!(policy.suppresses("Func", "Order"));
        assert!(!IgnorePolicy::none().matches("int"));
    }

    #[test]
    fn test_inheritance_styles_follow_naming() {
        let record = circle();
        let dir = directory(vec![record.clone()]);
        let edges = RelationshipDeriver::new(IgnorePolicy::none())
            .derive(&record, &dir);

        assert_eq!(
            edges.inheritance,
            vec![
                InheritanceEdge {
                    base: "IShape".to_string(),
                    derived: "Circle".to_string(),
                    style: InheritanceStyle::Realizes,
                },
                InheritanceEdge {
                    base: "Shape".to_string(),
                    derived: "Circle".to_string(),
                    style: InheritanceStyle::Extends,
                },
            ]
        );
    }

    #[test]
    fn test_usage_edges_skip_ignored_types() {
        let record = circle();
        let dir = directory(vec![record.clone()]);
        let edges = RelationshipDeriver::new(IgnorePolicy::new(["double"]))
            .derive(&record, &dir);

        assert_eq!(
            edges.usage,
            vec![UsageEdge {
                user: "Circle".to_string(),
                used: "Point".to_string(),
            }]
        );
    }

    #[test]
    fn test_ignored_base_emits_no_edge() {
        let mut record = TypeRecord::new("OrderController", TypeKind::Class, 1);
        record.base_types.push(BaseType::new("BaseController"));
        let dir = directory(vec![record.clone()]);

        let edges = RelationshipDeriver::new(IgnorePolicy::new(["BaseController"]))
            .derive(&record, &dir);
        assert!(edges.inheritance.is_empty());
    }

    #[test]
    fn test_ignored_source_suppresses_all_edges() {
        let mut record = TypeRecord::new("Controller", TypeKind::Class, 1);
        record.base_types.push(BaseType::new("Base"));
        record.members.push(MemberRecord::property("Service", "OrderService"));
        let dir = directory(vec![record.clone()]);

        let edges = RelationshipDeriver::new(IgnorePolicy::new(["Controller"]))
            .derive(&record, &dir);
        assert!(edges.is_empty());
    }

    #[test]
    fn test_duplicate_usage_kept_by_default() {
        let mut record = TypeRecord::new("Route", TypeKind::Class, 1);
        record.members.push(MemberRecord::property("From", "Point"));
        record.members.push(MemberRecord::property("To", "Point"));
        let dir = directory(vec![record.clone()]);

        let kept = RelationshipDeriver::new(IgnorePolicy::none())
            .derive(&record, &dir);
        assert_eq!(kept.usage.len(), 2);

        let deduped = RelationshipDeriver::new(IgnorePolicy::none())
            .with_dedup_usage(true)
            .derive(&record, &dir);
        assert_eq!(deduped.usage.len(), 1);
    }

    #[test]
    fn test_fields_can_be_excluded() {
        let mut record = TypeRecord::new("Order", TypeKind::Class, 1);
        record.members.push(MemberRecord::field("cache", "Cache"));
        record.members.push(MemberRecord::property("Customer", "Customer"));
        let dir = directory(vec![record.clone()]);

        let edges = RelationshipDeriver::new(IgnorePolicy::none())
            .with_fields(false)
            .derive(&record, &dir);
        let used: Vec<&str> = edges.usage.iter().map(|e| e.used.as_str()).collect();
        assert_eq!(used, vec!["Customer"]);
    }

    #[test]
    fn test_declared_kind_prefers_syntax_and_directory() {
        let mut record = TypeRecord::new("OrderService", TypeKind::Class, 1);
        record.base_types.push(BaseType::declared("Auditable", TypeKind::Interface));
        record.base_types.push(BaseType::new("Gateway<Order>"));
        record.base_types.push(BaseType::new("IUnknown"));
        let gateway = TypeRecord::new("Gateway", TypeKind::Interface, 1);
        let dir = directory(vec![record.clone(), gateway]);

        let edges = RelationshipDeriver::new(IgnorePolicy::none())
            .with_classifier(DeclaredKind)
            .derive(&record, &dir);
        let styles: Vec<InheritanceStyle> = edges.inheritance.iter().map(|e| e.style).collect();
        assert_eq!(
            styles,
            vec![
                InheritanceStyle::Realizes,
                InheritanceStyle::Realizes,
                InheritanceStyle::Realizes,
            ]
        );
    }

    #[test]
    fn test_declared_kind_interface_extends_interface() {
        let mut record = TypeRecord::new("IOrderDao", TypeKind::Interface, 1);
        record.base_types.push(BaseType::new("IDao"));
        let dir = directory(vec![record.clone()]);

        let edges = RelationshipDeriver::new(IgnorePolicy::none())
            .with_classifier(DeclaredKind)
            .derive(&record, &dir);
        assert_eq!(edges.inheritance[0].style, InheritanceStyle::Extends);
    }

    #[test]
    fn test_derive_all_follows_directory_order() {
        let mut first = TypeRecord::new("B", TypeKind::Class, 1);
        first.members.push(MemberRecord::property("A", "A"));
        let second = TypeRecord::new("A", TypeKind::Class, 2);
        let dir = directory(vec![first, second]);

        let edges = RelationshipDeriver::new(IgnorePolicy::none())
            .derive_all(&dir);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].usage[0].user, "B");
        assert!(edges[1].is_empty());
    }

    #[test]
    fn test_from_config() {
        let mut config = DiagramConfig::default();
        config.realization = RealizationRule::Declared;
        config.dedup_usage = true;
        let deriver = RelationshipDeriver::from_config(&config);
        assert!(deriver.ignore_policy().matches("string"));
        assert!(deriver.dedup_usage);
    }
}
