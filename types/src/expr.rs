//! Propositional expressions: atoms combined by conjunction and implication.
//!
//! Expressions are plain owned trees. Every constructor takes its operands by
//! value, so two expressions never share a sub-node and cloning is a deep copy.
//!
//! Equality is *key* equality: two expressions are equal iff their canonical
//! keys are equal. Keys carry no parentheses, so `A ∧ (B → C)` and
//! `(A ∧ B) → C` share the key `A∧B→C` and compare equal.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::symbol::{Symbol, SymbolError};

pub const CONJUNCTION_GLYPH: char = '∧';
pub const IMPLICATION_GLYPH: char = '→';

// ── Canonical key ────────────────────────────────────────────

/// Structural key of an expression.
///
/// atom → symbol; conjunction → `key(l)∧key(r)`; implication → `key(l)→key(r)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ExprKey(String);

impl ExprKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExprKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Expr ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawExpr", into = "RawExpr")]
pub enum Expr {
    Atom(Symbol),
    Conj(Box<Expr>, Box<Expr>),
    Imp(Box<Expr>, Box<Expr>),
}

impl Expr {
    #[must_use]
    pub fn atom(symbol: Symbol) -> Self {
        Self::Atom(symbol)
    }

    #[must_use]
    pub fn conj(left: Expr, right: Expr) -> Self {
        Self::Conj(Box::new(left), Box::new(right))
    }

    #[must_use]
    pub fn imp(left: Expr, right: Expr) -> Self {
        Self::Imp(Box::new(left), Box::new(right))
    }

    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(self, Self::Atom(_))
    }

    /// Number of nested binary nodes above the deepest atom.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Atom(_) => 0,
            Self::Conj(l, r) | Self::Imp(l, r) => 1 + l.depth().max(r.depth()),
        }
    }

    #[must_use]
    pub fn key(&self) -> ExprKey {
        let mut out = String::new();
        self.write_key(&mut out);
        ExprKey(out)
    }

    fn write_key(&self, out: &mut String) {
        match self {
            Self::Atom(symbol) => out.push_str(symbol.as_str()),
            Self::Conj(l, r) => {
                l.write_key(out);
                out.push(CONJUNCTION_GLYPH);
                r.write_key(out);
            }
            Self::Imp(l, r) => {
                l.write_key(out);
                out.push(IMPLICATION_GLYPH);
                r.write_key(out);
            }
        }
    }

    /// Human-readable text. Compound operands are always parenthesized;
    /// the expression itself only when `parenthesize` is set.
    #[must_use]
    pub fn display_text(&self, parenthesize: bool) -> String {
        let (l, glyph, r) = match self {
            Self::Atom(symbol) => return symbol.as_str().to_owned(),
            Self::Conj(l, r) => (l, CONJUNCTION_GLYPH, r),
            Self::Imp(l, r) => (l, IMPLICATION_GLYPH, r),
        };
        let body = format!("{} {glyph} {}", l.display_text(true), r.display_text(true));
        if parenthesize { format!("({body})") } else { body }
    }

    /// Rebuild an expression from any accepted wire shape.
    ///
    /// Accepted shapes:
    /// - canonical `{"kind": "atom"|"conj"|"imp", "sym", "left", "right"}`
    /// - legacy `{"type": "atom"|"and"|"imp", "v", "left", "right"}`
    /// - legacy bare string, read as an atom
    pub fn from_raw(raw: &RawExpr) -> Result<Self, ExprShapeError> {
        let node = match raw {
            RawExpr::Text(text) => return Ok(Self::Atom(Symbol::new(text.trim())?)),
            RawExpr::Node(node) => node,
        };
        let tag = node
            .kind
            .as_deref()
            .or(node.node_type.as_deref())
            .ok_or(ExprShapeError::MissingTag)?;
        match tag {
            "atom" => {
                let sym = node
                    .sym
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .or(node.v.as_deref())
                    .unwrap_or_default();
                Ok(Self::Atom(Symbol::new(sym)?))
            }
            "conj" | "and" => {
                let (l, r) = node.operands()?;
                Ok(Self::conj(l, r))
            }
            "imp" | "->" => {
                let (l, r) = node.operands()?;
                Ok(Self::imp(l, r))
            }
            other => Err(ExprShapeError::UnknownTag(other.to_owned())),
        }
    }

    /// Canonical wire shape.
    #[must_use]
    pub fn to_raw(&self) -> RawExpr {
        let node = match self {
            Self::Atom(symbol) => RawNode {
                kind: Some("atom".to_owned()),
                sym: Some(symbol.as_str().to_owned()),
                ..RawNode::default()
            },
            Self::Conj(l, r) => RawNode::binary("conj", l, r),
            Self::Imp(l, r) => RawNode::binary("imp", l, r),
        };
        RawExpr::Node(node)
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text(false))
    }
}

// ── Wire shapes ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprShapeError {
    #[error("expression has neither `kind` nor `type`")]
    MissingTag,
    #[error("unknown expression tag {0:?}")]
    UnknownTag(String),
    #[error("compound expression is missing its {0} operand")]
    MissingOperand(&'static str),
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

/// An expression as found in stored or legacy board data. Not validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawExpr {
    Text(String),
    Node(RawNode),
}

impl RawExpr {
    /// Every atom has a non-empty symbol and every compound node has two
    /// well-formed operands.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        Expr::from_raw(self).is_ok()
    }
}

impl From<Expr> for RawExpr {
    fn from(value: Expr) -> Self {
        value.to_raw()
    }
}

impl TryFrom<RawExpr> for Expr {
    type Error = ExprShapeError;

    fn try_from(value: RawExpr) -> Result<Self, Self::Error> {
        Self::from_raw(&value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sym: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<RawExpr>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<RawExpr>>,
}

impl RawNode {
    fn binary(kind: &str, left: &Expr, right: &Expr) -> Self {
        Self {
            kind: Some(kind.to_owned()),
            left: Some(Box::new(left.to_raw())),
            right: Some(Box::new(right.to_raw())),
            ..Self::default()
        }
    }

    fn operands(&self) -> Result<(Expr, Expr), ExprShapeError> {
        let left = self
            .left
            .as_deref()
            .ok_or(ExprShapeError::MissingOperand("left"))?;
        let right = self
            .right
            .as_deref()
            .ok_or(ExprShapeError::MissingOperand("right"))?;
        Ok((Expr::from_raw(left)?, Expr::from_raw(right)?))
    }
}
