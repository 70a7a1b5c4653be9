//! Captured pieces held by each side.

use crate::{check_piece_counts, Owner, PieceCountError, PieceType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wire form of hands: `{ "b": { "P": 0, ... }, "w": { ... } }`.
type HandsRepr = BTreeMap<Owner, BTreeMap<PieceType, u32>>;

/// Per-side counts of captured pieces available to drop.
///
/// Kings are never held; their count always reads as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "HandsRepr", into = "HandsRepr")]
pub struct Hands {
    counts: [[u32; 7]; 2],
}

impl Hands {
    /// Empty hands for both sides.
    pub const fn empty() -> Self {
        Hands {
            counts: [[0; 7]; 2],
        }
    }

    /// Returns how many pieces of `kind` `owner` holds.
    #[inline]
    pub const fn count(&self, owner: Owner, kind: PieceType) -> u32 {
        match kind {
            PieceType::King => 0,
            _ => self.counts[owner.index()][kind.index()],
        }
    }

    /// Sets the count for `kind` in `owner`'s hand. Kings are ignored.
    #[inline]
    pub fn set(&mut self, owner: Owner, kind: PieceType, count: u32) {
        if kind.is_droppable() {
            self.counts[owner.index()][kind.index()] = count;
        }
    }

    /// Adds one piece of `kind` to `owner`'s hand. Kings are ignored.
    #[inline]
    pub fn add(&mut self, owner: Owner, kind: PieceType) {
        if kind.is_droppable() {
            self.counts[owner.index()][kind.index()] += 1;
        }
    }

    /// Removes one piece of `kind` from `owner`'s hand.
    ///
    /// Returns false (and changes nothing) if none is held.
    #[inline]
    pub fn remove(&mut self, owner: Owner, kind: PieceType) -> bool {
        if self.count(owner, kind) == 0 {
            return false;
        }
        self.counts[owner.index()][kind.index()] -= 1;
        true
    }

    /// Returns true if `owner` holds nothing.
    pub fn is_empty_for(&self, owner: Owner) -> bool {
        self.counts[owner.index()].iter().all(|&n| n == 0)
    }

    /// Returns true if neither side holds anything.
    pub fn is_empty(&self) -> bool {
        Owner::ALL.iter().all(|&o| self.is_empty_for(o))
    }

    /// Iterates `(kind, count)` for `owner`'s non-empty hand slots in drop order.
    pub fn held(&self, owner: Owner) -> impl Iterator<Item = (PieceType, u32)> + '_ {
        PieceType::HAND
            .iter()
            .map(move |&kind| (kind, self.count(owner, kind)))
            .filter(|&(_, n)| n > 0)
    }

    /// Writes the SFEN hand field (`-` when both hands are empty).
    pub fn to_sfen(&self) -> String {
        let mut out = String::new();
        for owner in Owner::ALL {
            for kind in PieceType::SFEN_HAND_ORDER {
                let n = self.count(owner, kind);
                if n > 1 {
                    out.push_str(&n.to_string());
                }
                if n > 0 {
                    out.push(kind.to_sfen_char(owner));
                }
            }
        }
        if out.is_empty() {
            "-".to_string()
        } else {
            out
        }
    }
}

/// Counts beyond what one set holds are rejected.
impl TryFrom<HandsRepr> for Hands {
    type Error = PieceCountError;

    fn try_from(repr: HandsRepr) -> Result<Self, Self::Error> {
        let mut hands = Hands::empty();
        for (owner, slots) in repr {
            for (kind, count) in slots {
                hands.set(owner, kind, count);
            }
        }
        check_piece_counts(std::iter::empty(), &hands)?;
        Ok(hands)
    }
}

impl From<Hands> for HandsRepr {
    fn from(hands: Hands) -> Self {
        Owner::ALL
            .iter()
            .map(|&owner| {
                let slots = PieceType::ALL
                    .iter()
                    .map(|&kind| (kind, hands.count(owner, kind)))
                    .collect();
                (owner, slots)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove() {
        let mut hands = Hands::empty();
        hands.add(Owner::First, PieceType::Pawn);
        hands.add(Owner::First, PieceType::Pawn);
        assert_eq!(hands.count(Owner::First, PieceType::Pawn), 2);
        assert!(hands.remove(Owner::First, PieceType::Pawn));
        assert_eq!(hands.count(Owner::First, PieceType::Pawn), 1);
        assert!(!hands.remove(Owner::Second, PieceType::Pawn));
    }

    #[test]
    fn kings_are_never_held() {
        let mut hands = Hands::empty();
        hands.add(Owner::First, PieceType::King);
        assert_eq!(hands.count(Owner::First, PieceType::King), 0);
        assert!(hands.is_empty());
    }

    #[test]
    fn sfen_hand_field() {
        let mut hands = Hands::empty();
        assert_eq!(hands.to_sfen(), "-");

        hands.add(Owner::First, PieceType::Pawn);
        hands.add(Owner::First, PieceType::Rook);
        hands.set(Owner::Second, PieceType::Pawn, 3);
        hands.add(Owner::Second, PieceType::Bishop);
        assert_eq!(hands.to_sfen(), "RPb3p");
    }

    #[test]
    fn held_iterates_in_drop_order() {
        let mut hands = Hands::empty();
        hands.add(Owner::Second, PieceType::Rook);
        hands.add(Owner::Second, PieceType::Pawn);
        let held: Vec<_> = hands.held(Owner::Second).collect();
        assert_eq!(held, vec![(PieceType::Pawn, 1), (PieceType::Rook, 1)]);
    }

    #[test]
    fn json_shape() {
        let json = r#"{"b":{"P":2,"L":0,"N":0,"S":0,"G":1,"B":0,"R":0,"K":0},"w":{"P":0,"L":0,"N":0,"S":0,"G":0,"B":0,"R":1,"K":0}}"#;
        let hands: Hands = serde_json::from_str(json).unwrap();
        assert_eq!(hands.count(Owner::First, PieceType::Pawn), 2);
        assert_eq!(hands.count(Owner::First, PieceType::Gold), 1);
        assert_eq!(hands.count(Owner::Second, PieceType::Rook), 1);
        assert_eq!(serde_json::to_string(&hands).unwrap(), json);
    }

    #[test]
    fn json_counts_are_bounded_like_sfen() {
        let err = serde_json::from_str::<Hands>(r#"{"b":{"P":19}}"#).unwrap_err();
        assert!(err.to_string().contains("a set has 18"), "{}", err);
        assert!(serde_json::from_str::<Hands>(r#"{"b":{"R":2},"w":{"R":1}}"#).is_err());

        let hands: Hands = serde_json::from_str(r#"{"b":{"P":9},"w":{"P":9}}"#).unwrap();
        assert_eq!(hands.to_sfen(), "9P9p");
    }
}
