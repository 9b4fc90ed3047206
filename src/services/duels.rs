//! Derivation of active duel pairings from the per-player duel flags of a snapshot.

use std::collections::{HashMap, HashSet};

use crate::state::live_match::PlayerState;

/// Duel type attached to a pairing after comparing both players' claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelKind<'a> {
    /// Both sides agree, or only one side stated a type.
    Known(&'a str),
    /// The two players report different types.
    Disputed {
        /// Type claimed by the pairing's `player`.
        player: &'a str,
        /// Type claimed by the pairing's `opponent`.
        opponent: &'a str,
    },
    /// Nobody reported a type.
    Unspecified,
}

/// One in-progress duel between two players of the same snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuelPairing<'a> {
    /// The first player in roster order claiming the duel.
    pub player: &'a PlayerState,
    /// The claimed opponent.
    pub opponent: &'a PlayerState,
    /// How the duel type was settled.
    pub kind: DuelKind<'a>,
}

impl DuelPairing<'_> {
    /// True when the opponent also reports dueling `player`.
    pub fn is_mutual(&self) -> bool {
        self.opponent.claimed_opponent() == Some(self.player.alias.as_str())
    }
}

/// Iterator over the duel pairings of a roster.
///
/// Each call to [`duel_pairings`] walks the roster afresh, so the result always reflects
/// the slice it was built from.
pub struct DuelPairings<'a> {
    players: std::slice::Iter<'a, PlayerState>,
    by_alias: HashMap<&'a str, &'a PlayerState>,
    emitted: HashSet<(&'a str, &'a str)>,
}

/// Pairings claimed in `players`. Claims naming an alias that is not on the roster, or
/// the claimant itself, are skipped.
pub fn duel_pairings(players: &[PlayerState]) -> DuelPairings<'_> {
    let mut by_alias = HashMap::with_capacity(players.len());
    for player in players {
        by_alias.entry(player.alias.as_str()).or_insert(player);
    }

    DuelPairings {
        players: players.iter(),
        by_alias,
        emitted: HashSet::new(),
    }
}

impl<'a> Iterator for DuelPairings<'a> {
    type Item = DuelPairing<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for player in self.players.by_ref() {
            let Some(opponent_alias) = player.claimed_opponent() else {
                continue;
            };
            if opponent_alias == player.alias {
                continue;
            }
            let Some(&opponent) = self.by_alias.get(opponent_alias) else {
                continue;
            };

            let key = pair_key(player.alias.as_str(), opponent.alias.as_str());
            if !self.emitted.insert(key) {
                continue;
            }

            return Some(DuelPairing {
                player,
                opponent,
                kind: resolve_kind(player, opponent),
            });
        }
        None
    }
}

fn pair_key<'a>(left: &'a str, right: &'a str) -> (&'a str, &'a str) {
    if left <= right {
        (left, right)
    } else {
        (right, left)
    }
}

/// The opponent's stated type only counts when the opponent is dueling `player` back.
fn resolve_kind<'a>(player: &'a PlayerState, opponent: &'a PlayerState) -> DuelKind<'a> {
    let own = player.duel_type.as_deref();
    let theirs = if opponent.claimed_opponent() == Some(player.alias.as_str()) {
        opponent.duel_type.as_deref()
    } else {
        None
    };

    match (own, theirs) {
        (Some(own), Some(theirs)) if own == theirs => DuelKind::Known(own),
        (Some(own), Some(theirs)) => DuelKind::Disputed {
            player: own,
            opponent: theirs,
        },
        (Some(kind), None) | (None, Some(kind)) => DuelKind::Known(kind),
        (None, None) => DuelKind::Unspecified,
    }
}
