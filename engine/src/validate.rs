//! Structural validation of stored boards.
//!
//! Stored boards arrive as [`RawLine`]s, possibly in a legacy shape. Each
//! line is repaired by [`normalize`], then parsed into a [`Line`]. Lines that
//! still fail either abort the whole board ([`ValidationMode::Strict`]) or
//! are swapped for a fresh fact on a random atom ([`ValidationMode::Lenient`]).

use std::collections::HashSet;

use thiserror::Error;

use ponens_types::{
    CONJUNCTION_GLYPH, IMPLICATION_GLYPH, Line, LineId, LineShapeError, RawExpr, RawLine, RawNode,
};

use crate::board::Board;
use crate::dealer::Dealer;
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Replace malformed lines and keep going.
    #[default]
    Lenient,
    /// Fail on the first malformed line. Diagnostic and test use.
    Strict,
}

impl ValidationMode {
    #[must_use]
    pub const fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Lenient }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("board line {index} (id {id:?}) is malformed: {source}")]
pub struct StructuralError {
    pub index: usize,
    pub id: Option<String>,
    pub source: LineShapeError,
}

// ── Legacy repair ────────────────────────────────────────────

/// Fold legacy fields into canonical ones, then strip them.
///
/// - facts: `a` or `text` becomes `expr` as an atom
/// - implications: `a`+`b`, or `text` split on `→` / `->`
/// - conjunctions: `a`+`b`, or `text` split on `∧` / `&`
///
/// Canonical fields already present win. A `text` that does not split into
/// exactly two non-empty parts is dropped unrepaired.
pub fn normalize(raw: &mut RawLine) {
    let a = raw.a.take().filter(|value| !value.trim().is_empty());
    let b = raw.b.take().filter(|value| !value.trim().is_empty());
    let text = raw.text.take();

    match raw.kind.as_deref() {
        Some("ante" | "derived") => {
            if raw.expr.is_none()
                && let Some(sym) = a.or(text)
            {
                raw.expr = Some(atom_node(sym.trim()));
            }
        }
        Some("imp") => repair_operands(raw, a, b, text, IMPLICATION_GLYPH, "->"),
        Some("conj") => repair_operands(raw, a, b, text, CONJUNCTION_GLYPH, "&"),
        _ => {}
    }
}

fn repair_operands(
    raw: &mut RawLine,
    a: Option<String>,
    b: Option<String>,
    text: Option<String>,
    glyph: char,
    ascii: &str,
) {
    if raw.left.is_some() && raw.right.is_some() {
        return;
    }
    let operands = match (a, b) {
        (Some(a), Some(b)) => Some((a, b)),
        _ => text.and_then(|text| split_operands(&text, glyph, ascii)),
    };
    if let Some((left, right)) = operands {
        raw.left = Some(atom_node(left.trim()));
        raw.right = Some(atom_node(right.trim()));
    }
}

fn split_operands(text: &str, glyph: char, ascii: &str) -> Option<(String, String)> {
    let unified = text.replace(ascii, glyph.encode_utf8(&mut [0; 4]));
    let parts: Vec<&str> = unified
        .split(glyph)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    match parts.as_slice() {
        [left, right] => Some(((*left).to_owned(), (*right).to_owned())),
        _ => None,
    }
}

fn atom_node(sym: &str) -> RawExpr {
    RawExpr::Node(RawNode {
        kind: Some("atom".to_owned()),
        sym: Some(sym.to_owned()),
        ..RawNode::default()
    })
}

// ── Checks ───────────────────────────────────────────────────

/// Identity present, kind recognized, and every expression the kind needs
/// is well formed. Reads canonical fields only; call [`normalize`] first
/// for legacy shapes.
#[must_use]
pub fn is_well_formed(raw: &RawLine) -> bool {
    Line::from_raw(raw).is_ok()
}

/// A fact on a random atom, used in place of a malformed line.
pub fn safe_line<R: RandomSource>(dealer: &mut Dealer<R>) -> Line {
    let expr = dealer.atom();
    dealer.antecedent(expr)
}

/// Normalize and validate every line of a stored board.
///
/// Ingested `i<n>` ids advance the dealer's allocator so later lines never
/// collide with them. Duplicate ids count as malformed.
pub fn enforce_board<R: RandomSource>(
    raws: Vec<RawLine>,
    mode: ValidationMode,
    dealer: &mut Dealer<R>,
) -> Result<Board, StructuralError> {
    for id in raws
        .iter()
        .filter_map(|raw| raw.id.as_deref())
        .filter_map(|id| LineId::parse(id).ok())
    {
        dealer.observe(&id);
    }

    let mut seen: HashSet<LineId> = HashSet::with_capacity(raws.len());
    let mut lines = Vec::with_capacity(raws.len());
    for (index, mut raw) in raws.into_iter().enumerate() {
        normalize(&mut raw);
        let parsed = Line::from_raw(&raw).and_then(|line| {
            if seen.insert(line.id().clone()) {
                Ok(line)
            } else {
                Err(LineShapeError::DuplicateId)
            }
        });
        match parsed {
            Ok(line) => lines.push(line),
            Err(source) => {
                let error = StructuralError {
                    index,
                    id: raw.id,
                    source,
                };
                if mode == ValidationMode::Strict {
                    return Err(error);
                }
                let replacement = safe_line(dealer);
                tracing::warn!(%error, replacement = %replacement, "replacing malformed board line");
                seen.insert(replacement.id().clone());
                lines.push(replacement);
            }
        }
    }
    Ok(Board::new(lines))
}
