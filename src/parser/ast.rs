//! Statement tree produced by the definition parser.
//!
//! Only the shapes the definition compiler inspects are modelled; every
//! other statement or expression collapses to an opaque `Other` node that
//! still carries its source line.

/// Top-level or namespace-level statement
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `namespace Name;` or `namespace Name { ... }`
    Namespace { name: String, body: Vec<Stmt> },
    /// `use A\B, C\D as E;`
    Use { items: Vec<UseItem> },
    /// `Ident:`
    Label { name: String },
    /// `<expr>;`
    Expression { expr: Expr },
    /// Anything the definition compiler does not inspect
    Other,
}

/// One imported class name of a `use` statement
#[derive(Debug, Clone, PartialEq)]
pub struct UseItem {
    /// Qualified name without a leading separator (`App\Models\User`)
    pub name: String,
    /// `as` alias, if given
    pub alias: Option<String>,
}

impl UseItem {
    /// Name the import is visible under in the importing file
    pub fn short_name(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.name.rsplit('\\').next().unwrap_or(&self.name),
        }
    }

    /// Fully-qualified name with a leading separator (`\App\Models\User`)
    pub fn fully_qualified(&self) -> String {
        format!("\\{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `match (subject) { arms }`
    Match(MatchExpr),
    /// `Name::class`
    ClassConst { class: String },
    /// `[items]` or `array(items)`
    Array { items: Vec<ArrayItem> },
    /// `$name`
    Variable { name: String },
    /// Anything else
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchExpr {
    pub subject: Box<Expr>,
    pub arms: Vec<MatchArm>,
}

/// `cond, cond => body`; a `default` arm has no conditions
#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    pub conditions: Vec<Expr>,
    pub body: Expr,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayItem {
    pub key: Option<Expr>,
    pub value: Expr,
}

impl Expr {
    pub fn new(kind: ExprKind, line: usize) -> Self {
        Self { kind, line }
    }

    pub fn as_match(&self) -> Option<&MatchExpr> {
        match &self.kind {
            ExprKind::Match(m) => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_item_short_name() {
        let plain = UseItem { name: "App\\Models\\User".into(), alias: None };
        assert_eq!(plain.short_name(), "User");
        assert_eq!(plain.fully_qualified(), "\\App\\Models\\User");

        let aliased = UseItem { name: "App\\Models\\User".into(), alias: Some("Account".into()) };
        assert_eq!(aliased.short_name(), "Account");

        let global = UseItem { name: "DateTime".into(), alias: None };
        assert_eq!(global.short_name(), "DateTime");
    }
}
