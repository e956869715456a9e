//! The action reducer.
//!
//! [`apply_action`] maps `(session, action, now, rng)` to the next session.
//! It takes the clock reading and random source as arguments, so the same
//! inputs always produce the same document. Actions are assumed to have
//! passed [`Action::validate`]; over those the reducer is total.

use chrono::{DateTime, Utc};
use rand::Rng;

use vtt_core::collection::{find, insert_if_absent, remove_by_id, replace_existing, upsert};
use vtt_core::{Session, TokenKind};
use vtt_dice::{fresh_roll, push_roll, random_id};

use crate::action::Action;

/// The result of applying one action.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    /// The next session document.
    pub session: Session,
    /// False when the action was a no-op and `session` equals the input.
    pub changed: bool,
}

/// Apply one action to a session.
///
/// Changed documents get `lastUpdated = max(previous, now)`. No-ops (an
/// absent target, a duplicate insert, an already-pushed roll) return the
/// input untouched.
pub fn apply_action<R: Rng + ?Sized>(
    mut session: Session,
    action: Action,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Reduction {
    let changed = reduce(&mut session, action, now, rng);
    if changed {
        session.touch(now);
    }
    Reduction { session, changed }
}

fn reduce<R: Rng + ?Sized>(
    session: &mut Session,
    action: Action,
    now: DateTime<Utc>,
    rng: &mut R,
) -> bool {
    match action {
        Action::UpdateTokens { tokens } => {
            session.tokens = tokens;
            true
        }
        Action::UpsertToken(token) => {
            upsert(&mut session.tokens, token);
            true
        }
        Action::RollDice(request) => match fresh_roll(request, now, rng) {
            Ok(roll) => {
                session.dice_rolls.record(roll);
                true
            }
            // Pools are checked at the boundary.
            Err(_) => false,
        },
        Action::UpdateScene(patch) => {
            session.scene.apply_patch(patch);
            true
        }
        Action::JoinPlayer(join) => {
            if let Some(player) = session.player_mut(&join.id) {
                player.last_seen = now;
            } else {
                let is_owner = session.is_owner(&join.id);
                session.players.push(join.into_player(now, is_owner));
            }
            true
        }
        Action::UpdatePlayer { player_id, updates } => match session.player_mut(&player_id) {
            Some(player) => {
                player.apply_patch(updates);
                player.last_seen = now;
                true
            }
            None => false,
        },
        Action::AddCharacter(sheet) => insert_if_absent(&mut session.characters, sheet),
        Action::UpdateCharacter(sheet) => {
            upsert(&mut session.characters, sheet);
            true
        }
        Action::AddNpc(npc) => insert_if_absent(&mut session.npcs, npc),
        Action::UpdateNpc(npc) => replace_existing(&mut session.npcs, npc),
        Action::DeleteNpc { npc_id } => {
            let npc_removed = remove_by_id(&mut session.npcs, &npc_id).is_some();
            // A player token sharing the id stays.
            let npc_token = find(&session.tokens, &npc_id)
                .is_some_and(|token| token.kind == TokenKind::Npc);
            let token_removed = npc_token && remove_by_id(&mut session.tokens, &npc_id).is_some();
            npc_removed || token_removed
        }
        Action::UpdateTitle { title } => {
            session.title = title;
            true
        }
        Action::UpdateMusic { track } => {
            session.current_track = track;
            true
        }
        Action::UpdateSharedNotes { notes } => {
            session.shared_notes = notes;
            true
        }
        Action::UpdateDrawings { drawings } => {
            session.drawings = drawings;
            true
        }
        Action::SaveSceneToLib { mut scene } => {
            if scene.id.is_none() {
                scene.id = Some(random_id(rng));
            }
            session.scene_library.push(scene);
            true
        }
        Action::LoadSceneFromLib { scene_id } => {
            let found = session
                .scene_library
                .iter()
                .find(|scene| scene.id.as_deref() == Some(scene_id.as_str()))
                .cloned();
            match found {
                Some(scene) => {
                    session.scene = scene;
                    true
                }
                None => false,
            }
        }
        Action::UpdateTokenStatus { token_id, status } => match session.token_mut(&token_id) {
            Some(token) => {
                token.status = status;
                true
            }
            None => false,
        },
        Action::PushRoll { roll_id } => push(session, &roll_id, rng),
    }
}

/// Push a logged roll. When the roller's linked character exists, the
/// character takes one stress and the roll gains a stress die.
fn push<R: Rng + ?Sized>(session: &mut Session, roll_id: &str, rng: &mut R) -> bool {
    let Some(player_id) = session
        .dice_rolls
        .get(roll_id)
        .filter(|roll| !roll.pushed)
        .map(|roll| roll.player_id.clone())
    else {
        return false;
    };

    let character_id = session
        .character_of_player(&player_id)
        .map(|sheet| sheet.id.clone());

    let Some(roll) = session.dice_rolls.get_mut(roll_id) else {
        return false;
    };
    if push_roll(roll, character_id.is_some(), rng).is_err() {
        return false;
    }

    if let Some(sheet) = character_id
        .as_deref()
        .and_then(|id| session.character_mut(id))
    {
        sheet.stress = sheet.stress.saturating_add(1);
    }
    true
}
