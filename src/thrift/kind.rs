use std::fmt;

/// The seven definition categories of the IDL.
///
/// The declaration order doubles as the category lookup order: when the same
/// name is declared under more than one kind, the kind listed earlier here
/// wins (see [`DefinitionStore::find_kind`](crate::thrift::DefinitionStore::find_kind)).
/// That tie-break is deliberate and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Typedef,
    Struct,
    Union,
    Exception,
    Enum,
    Service,
    Const,
}

impl DefinitionKind {
    /// Every kind, in the fixed lookup order.
    pub const ALL: [DefinitionKind; 7] = [
        DefinitionKind::Typedef,
        DefinitionKind::Struct,
        DefinitionKind::Union,
        DefinitionKind::Exception,
        DefinitionKind::Enum,
        DefinitionKind::Service,
        DefinitionKind::Const,
    ];

    /// The lower-case IDL keyword for this kind.
    pub const fn keyword(self) -> &'static str {
        match self {
            DefinitionKind::Typedef => "typedef",
            DefinitionKind::Struct => "struct",
            DefinitionKind::Union => "union",
            DefinitionKind::Exception => "exception",
            DefinitionKind::Enum => "enum",
            DefinitionKind::Service => "service",
            DefinitionKind::Const => "const",
        }
    }

    /// Inverse of [`keyword`](Self::keyword). Upstream parsers emit
    /// discriminators like `Struct`, so the match is case-insensitive.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let keyword = keyword.to_ascii_lowercase();
        DefinitionKind::ALL
            .into_iter()
            .find(|kind| kind.keyword() == keyword)
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_roundtrip() {
        for kind in DefinitionKind::ALL {
            assert_eq!(DefinitionKind::from_keyword(kind.keyword()), Some(kind));
        }
    }

    #[test]
    fn from_keyword_is_case_insensitive() {
        assert_eq!(
            DefinitionKind::from_keyword("Struct"),
            Some(DefinitionKind::Struct)
        );
        assert_eq!(
            DefinitionKind::from_keyword("TYPEDEF"),
            Some(DefinitionKind::Typedef)
        );
        assert_eq!(DefinitionKind::from_keyword("widget"), None);
    }

    #[test]
    fn lookup_order_is_fixed() {
        let keywords: Vec<_> = DefinitionKind::ALL
            .into_iter()
            .map(DefinitionKind::keyword)
            .collect();
        assert_eq!(
            keywords,
            ["typedef", "struct", "union", "exception", "enum", "service", "const"]
        );
    }
}
