//! Board lines: the four line variants and their legacy wire shape.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expr::{Expr, ExprKey, ExprShapeError, RawExpr};
use crate::ids::LineId;

// ── Kind ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// A fact present from the start or injected by replenishment.
    Antecedent,
    /// A fact produced by resolving a match.
    Derived,
    Implication,
    /// A compound fact. Never a match partner.
    Conjunction,
}

impl LineKind {
    /// Wire tag used in stored boards.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Antecedent => "ante",
            Self::Derived => "derived",
            Self::Implication => "imp",
            Self::Conjunction => "conj",
        }
    }

    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "ante" => Some(Self::Antecedent),
            "derived" => Some(Self::Derived),
            "imp" => Some(Self::Implication),
            "conj" => Some(Self::Conjunction),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_fact(self) -> bool {
        matches!(self, Self::Antecedent | Self::Derived)
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Line ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineContent {
    Antecedent(Expr),
    Derived(Expr),
    Implication { left: Expr, right: Expr },
    Conjunction { left: Expr, right: Expr },
}

/// One row of the board. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "RawLine")]
pub struct Line {
    id: LineId,
    content: LineContent,
}

impl Line {
    #[must_use]
    pub fn antecedent(id: LineId, expr: Expr) -> Self {
        Self {
            id,
            content: LineContent::Antecedent(expr),
        }
    }

    #[must_use]
    pub fn derived(id: LineId, expr: Expr) -> Self {
        Self {
            id,
            content: LineContent::Derived(expr),
        }
    }

    #[must_use]
    pub fn implication(id: LineId, left: Expr, right: Expr) -> Self {
        Self {
            id,
            content: LineContent::Implication { left, right },
        }
    }

    #[must_use]
    pub fn conjunction(id: LineId, left: Expr, right: Expr) -> Self {
        Self {
            id,
            content: LineContent::Conjunction { left, right },
        }
    }

    #[must_use]
    pub fn id(&self) -> &LineId {
        &self.id
    }

    #[must_use]
    pub fn content(&self) -> &LineContent {
        &self.content
    }

    #[must_use]
    pub fn kind(&self) -> LineKind {
        match self.content {
            LineContent::Antecedent(_) => LineKind::Antecedent,
            LineContent::Derived(_) => LineKind::Derived,
            LineContent::Implication { .. } => LineKind::Implication,
            LineContent::Conjunction { .. } => LineKind::Conjunction,
        }
    }

    /// The established expression of an antecedent or derived fact.
    #[must_use]
    pub fn fact(&self) -> Option<&Expr> {
        match &self.content {
            LineContent::Antecedent(expr) | LineContent::Derived(expr) => Some(expr),
            LineContent::Implication { .. } | LineContent::Conjunction { .. } => None,
        }
    }

    /// `(condition, consequence)` of an implication.
    #[must_use]
    pub fn implication_parts(&self) -> Option<(&Expr, &Expr)> {
        match &self.content {
            LineContent::Implication { left, right } => Some((left, right)),
            LineContent::Antecedent(_)
            | LineContent::Derived(_)
            | LineContent::Conjunction { .. } => None,
        }
    }

    /// Key this line offers to the pairing rule: a fact's expression key or
    /// an implication's left key. Conjunction facts offer none.
    #[must_use]
    pub fn match_key(&self) -> Option<ExprKey> {
        match &self.content {
            LineContent::Antecedent(expr) | LineContent::Derived(expr) => Some(expr.key()),
            LineContent::Implication { left, .. } => Some(left.key()),
            LineContent::Conjunction { .. } => None,
        }
    }

    /// Duplicate-detection key. The kind prefix keeps a fact and an
    /// implication over the same expression apart.
    #[must_use]
    pub fn line_key(&self) -> LineKey {
        let key = match &self.content {
            LineContent::Antecedent(expr) | LineContent::Derived(expr) => {
                format!("A:{}", expr.key())
            }
            LineContent::Implication { left, right } => {
                format!("I:{}->{}", left.key(), right.key())
            }
            LineContent::Conjunction { left, right } => {
                format!("C:{}&{}", left.key(), right.key())
            }
        };
        LineKey(key)
    }

    #[must_use]
    pub fn display_text(&self) -> String {
        match &self.content {
            LineContent::Antecedent(expr) | LineContent::Derived(expr) => expr.display_text(false),
            LineContent::Implication { left, right } => {
                format!("{} → {}", left.display_text(true), right.display_text(true))
            }
            LineContent::Conjunction { left, right } => {
                format!("{} ∧ {}", left.display_text(true), right.display_text(true))
            }
        }
    }

    /// Build a line from a stored shape that is already in canonical form.
    ///
    /// Legacy fields (`a`, `b`, `text`) are ignored here; the engine's
    /// validator folds them into canonical fields first.
    pub fn from_raw(raw: &RawLine) -> Result<Self, LineShapeError> {
        let id = raw
            .id
            .as_deref()
            .and_then(|id| LineId::parse(id).ok())
            .ok_or(LineShapeError::MissingId)?;
        let tag = raw.kind.as_deref().ok_or(LineShapeError::MissingKind)?;
        let kind =
            LineKind::parse(tag).ok_or_else(|| LineShapeError::UnknownKind(tag.to_owned()))?;
        let line = match kind {
            LineKind::Antecedent => Self::antecedent(id, operand(raw.expr.as_ref(), ExprRole::Fact)?),
            LineKind::Derived => Self::derived(id, operand(raw.expr.as_ref(), ExprRole::Fact)?),
            LineKind::Implication => Self::implication(
                id,
                operand(raw.left.as_ref(), ExprRole::Left)?,
                operand(raw.right.as_ref(), ExprRole::Right)?,
            ),
            LineKind::Conjunction => Self::conjunction(
                id,
                operand(raw.left.as_ref(), ExprRole::Left)?,
                operand(raw.right.as_ref(), ExprRole::Right)?,
            ),
        };
        Ok(line)
    }
}

fn operand(raw: Option<&RawExpr>, role: ExprRole) -> Result<Expr, LineShapeError> {
    let raw = raw.ok_or(LineShapeError::MissingExpression(role))?;
    Expr::from_raw(raw).map_err(|source| LineShapeError::Malformed { role, source })
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

/// Kind-prefixed structural key of a whole line (`A:`, `I:`, `C:`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineKey(String);

impl LineKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Wire shape ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprRole {
    Fact,
    Left,
    Right,
}

impl fmt::Display for ExprRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fact => "expr",
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineShapeError {
    #[error("line has no id")]
    MissingId,
    #[error("line has no kind")]
    MissingKind,
    #[error("unknown line kind {0:?}")]
    UnknownKind(String),
    #[error("line is missing its `{0}` expression")]
    MissingExpression(ExprRole),
    #[error("line has a malformed `{role}` expression: {source}")]
    Malformed {
        role: ExprRole,
        source: ExprShapeError,
    },
    #[error("line id is already used on this board")]
    DuplicateId,
}

/// A line as found in stored board data, canonical or legacy. Not validated.
///
/// Legacy shapes carry `a`/`b` symbol fields or a `text` field such as
/// `"A → B"` instead of `expr`/`left`/`right`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expr: Option<RawExpr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<RawExpr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<RawExpr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl RawLine {
    #[must_use]
    pub fn has_legacy_fields(&self) -> bool {
        self.a.is_some() || self.b.is_some() || self.text.is_some()
    }
}

impl From<Line> for RawLine {
    fn from(line: Line) -> Self {
        let kind = Some(line.kind().as_str().to_owned());
        let id = Some(String::from(line.id));
        match line.content {
            LineContent::Antecedent(expr) | LineContent::Derived(expr) => Self {
                id,
                kind,
                expr: Some(expr.to_raw()),
                ..Self::default()
            },
            LineContent::Implication { left, right } | LineContent::Conjunction { left, right } => {
                Self {
                    id,
                    kind,
                    left: Some(left.to_raw()),
                    right: Some(right.to_raw()),
                    ..Self::default()
                }
            }
        }
    }
}
