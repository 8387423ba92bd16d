// Type model extracted from object-oriented source files
//
// Records are created once by the declaration walk and never mutated after
// the directory is built. They are serializable for the JSON output.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Source language of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    CSharp,
    Java,
}

impl Language {
    /// Pick the language from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("cs") {
            Some(Language::CSharp)
        } else if ext.eq_ignore_ascii_case("java") {
            Some(Language::Java)
        } else {
            None
        }
    }
}

/// One input unit: an identifier plus its source text
#[derive(Debug, Clone, PartialEq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub text: String,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn language(&self) -> Option<Language> {
        Language::from_path(&self.path)
    }
}

/// The type records of one successfully parsed unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedUnit {
    pub path: PathBuf,
    pub language: Language,
    /// Declarations in textual order, nested ones flattened
    pub types: Vec<TypeRecord>,
}

/// Declaration form of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
}

/// A class- or interface-like declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRecord {
    /// Identifier as written, without namespace
    pub name: String,
    pub kind: TypeKind,
    /// Inheritance clause entries, left to right
    pub base_types: Vec<BaseType>,
    /// Property-like members of the direct body
    pub members: Vec<MemberRecord>,
    /// Line of the declaration header
    pub line: usize,
}

impl TypeRecord {
    pub fn new(name: &str, kind: TypeKind, line: usize) -> Self {
        Self {
            name: name.to_string(),
            kind,
            base_types: Vec::new(),
            members: Vec::new(),
            line,
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Union another declaration of the same type into this one.
    ///
    /// Base types dedup by token, members by identical type and name.
    /// First-seen order is kept; `kind` and `line` stay with `self`.
    pub fn merge(&mut self, other: TypeRecord) {
        for base in other.base_types {
            if !self.base_types.iter().any(|b| b.name == base.name) {
                self.base_types.push(base);
            }
        }
        for member in other.members {
            if !self.members.contains(&member) {
                self.members.push(member);
            }
        }
    }
}

/// One entry of an inheritance clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseType {
    /// Token as written, generic arguments included
    pub name: String,
    /// Kind implied by the syntax, when the language makes it explicit
    pub declared: Option<TypeKind>,
}

impl BaseType {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            declared: None,
        }
    }

    pub fn declared(name: &str, kind: TypeKind) -> Self {
        Self {
            name: name.trim().to_string(),
            declared: Some(kind),
        }
    }

    /// Name without generic arguments or qualifier (`Data.Repo<T>` -> `Repo`)
    pub fn bare_name(&self) -> &str {
        let unqualified = self.name.split('<').next().unwrap_or(&self.name).trim();
        unqualified.rsplit('.').next().unwrap_or(unqualified)
    }
}

/// Kind of property-like member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Property,
    Field,
}

/// A property or field declared in a type body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub name: String,
    /// Declared type as raw text
    pub declared_type: String,
    pub kind: MemberKind,
}

impl MemberRecord {
    pub fn property(name: &str, declared_type: &str) -> Self {
        Self {
            name: name.to_string(),
            declared_type: declared_type.trim().to_string(),
            kind: MemberKind::Property,
        }
    }

    pub fn field(name: &str, declared_type: &str) -> Self {
        Self {
            name: name.to_string(),
            declared_type: declared_type.trim().to_string(),
            kind: MemberKind::Field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_path() {
        assert_eq!(Language::from_path(Path::new("src/Foo.cs")), Some(Language::CSharp));
        assert_eq!(Language::from_path(Path::new("Foo.java")), Some(Language::Java));
        assert_eq!(Language::from_path(Path::new("LEGACY.CS")), Some(Language::CSharp));
        assert_eq!(Language::from_path(Path::new("Foo.py")), None);
        assert_eq!(Language::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_source_unit_language() {
        let unit = SourceUnit::new("a/OrderService.cs", "class OrderService {}");
        assert_eq!(unit.language(), Some(Language::CSharp));
    }

    #[test]
    fn test_type_record_new() {
        let record = TypeRecord::new("IShape", TypeKind::Interface, 3);
        assert!(record.is_interface());
        assert!(record.base_types.is_empty());
        assert!(record.members.is_empty());
        assert_eq!(record.line, 3);
    }

    #[test]
    fn test_base_type_trims_and_strips_generics() {
        let base = BaseType::new("  IRepository<Order, int> ");
        assert_eq!(base.name, "IRepository<Order, int>");
        assert_eq!(base.bare_name(), "IRepository");
        assert_eq!(base.declared, None);

        let qualified = BaseType::new("System.IDisposable");
        assert_eq!(qualified.bare_name(), "IDisposable");

        let plain = BaseType::declared("Shape", TypeKind::Class);
        assert_eq!(plain.bare_name(), "Shape");
        assert_eq!(plain.declared, Some(TypeKind::Class));
    }

    #[test]
    fn test_merge_unions_in_first_seen_order() {
        let mut first = TypeRecord::new("Foo", TypeKind::Class, 1);
        first.base_types.push(BaseType::new("IFoo"));
        first.members.push(MemberRecord::property("Bar", "Bar"));

        let mut second = TypeRecord::new("Foo", TypeKind::Interface, 9);
        second.base_types.push(BaseType::new("IFoo"));
        second.base_types.push(BaseType::new("IDisposable"));
        second.members.push(MemberRecord::property("Bar", "Bar"));
        second.members.push(MemberRecord::property("Baz", "Baz"));

        first.merge(second);

        assert_eq!(first.kind, TypeKind::Class);
        assert_eq!(first.line, 1);
        let bases: Vec<&str> = first.base_types.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(bases, vec!["IFoo", "IDisposable"]);
        let members: Vec<&str> = first.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(members, vec!["Bar", "Baz"]);
    }

    #[test]
    fn test_merge_keeps_same_type_different_name() {
        let mut first = TypeRecord::new("Foo", TypeKind::Class, 1);
        first.members.push(MemberRecord::property("Home", "Address"));
        let mut second = TypeRecord::new("Foo", TypeKind::Class, 1);
        second.members.push(MemberRecord::property("Work", "Address"));

        first.merge(second);
        assert_eq!(first.members.len(), 2);
    }

    #[test]
    fn test_serialization() {
        let mut record = TypeRecord::new("Circle", TypeKind::Class, 2);
        record.members.push(MemberRecord::field("Center", "Point"));
        let json = serde_json::to_string(&record).expect("serialize");
        assert!(json.contains("\"kind\":\"class\""));
        let parsed: TypeRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, record);
    }
}
