//! Per-frame round update
//!
//! Order: advance balls, resolve block hits, advance and collect power-ups,
//! drop balls that left the field, then check for loss and win.

use super::ball::Ball;
use super::block::HitOutcome;
use super::power_up::{PowerUp, PowerUpKind};
use super::rng::RandomSource;
use super::state::{Phase, Round, RoundEvent};
use crate::consts::BLOCK_SCORE;

/// Advance the round by `dt` seconds. Does nothing outside Playing or while
/// the level layout is still loading.
pub fn tick<R: RandomSource>(round: &mut Round<R>, dt: f32) {
    if round.phase != Phase::Playing || round.awaiting_layout {
        return;
    }

    advance_balls(round, dt);
    resolve_block_hits(round);
    update_power_ups(round, dt);
    drop_lost_balls(round);

    round.highscore = round.highscore.max(round.score);
    check_round_end(round);
}

fn advance_balls<R: RandomSource>(round: &mut Round<R>, dt: f32) {
    let bounds = round.bounds;
    for ball in &mut round.balls {
        let contact = ball.update(dt, bounds, &round.paddle);
        if contact.paddle {
            round.events.push(RoundEvent::PaddleHit);
        }
    }
}

/// Each ball hits at most one block per frame: the first one in layout order
/// whose box overlaps it. Unbreakable blocks count as that first hit too.
fn resolve_block_hits<R: RandomSource>(round: &mut Round<R>) {
    let bounce = round.block_config.bounce;
    let spawn_chance = round.power_up_config.spawn_chance;

    for ball in &mut round.balls {
        let Some(index) = round.blocks.iter().position(|b| b.contains_ball(ball)) else {
            continue;
        };

        ball.bounce_off_block(bounce);

        match round.blocks[index].apply_hit(&mut round.rng, spawn_chance) {
            HitOutcome::Deflected => {
                round.events.push(RoundEvent::BlockHit { breakable: false });
            }
            HitOutcome::Damaged { .. } => {
                round.score += BLOCK_SCORE;
                round.events.push(RoundEvent::BlockHit { breakable: true });
            }
            HitOutcome::Destroyed { drop } => {
                round.score += BLOCK_SCORE;
                let block = round.blocks.remove(index);
                round.events.push(RoundEvent::BlockDestroyed);

                if let Some(kind) = drop {
                    log::debug!("{kind:?} dropped at {:?}", block.center());
                    round
                        .power_ups
                        .push(PowerUp::spawn(kind, block.center(), &round.power_up_config));
                    round.events.push(RoundEvent::PowerUpSpawned(kind));
                }
            }
        }
    }
}

fn update_power_ups<R: RandomSource>(round: &mut Round<R>, dt: f32) {
    for power_up in &mut round.power_ups {
        power_up.update(dt);
    }

    let paddle = &round.paddle;
    let floor = round.bounds.height;
    let mut collected = Vec::new();
    round.power_ups.retain(|p| {
        if p.check_capture(paddle) {
            collected.push(p.kind);
            false
        } else {
            !p.is_below(floor)
        }
    });

    for kind in collected {
        apply_pickup(round, kind);
    }
}

fn apply_pickup<R: RandomSource>(round: &mut Round<R>, kind: PowerUpKind) {
    match kind {
        PowerUpKind::ExtraBall => {
            let ball = Ball::above_paddle(&round.ball_config, &round.paddle);
            round.balls.push(ball);
        }
        PowerUpKind::PaddleGrow => {
            // never wider than the field
            let paddle = &mut round.paddle;
            let room = round.bounds.width - paddle.width - 2.0 * paddle.line_width;
            paddle.resize(round.paddle_grow_step.min(room).max(0.0));
            paddle.keep_within(round.bounds.width);
        }
    }
    log::debug!("Collected {kind:?}");
    round.events.push(RoundEvent::PowerUpCollected(kind));
}

fn drop_lost_balls<R: RandomSource>(round: &mut Round<R>) {
    let floor = round.bounds.height;
    let before = round.balls.len();
    round.balls.retain(|b| !b.is_below(floor));
    for _ in round.balls.len()..before {
        round.events.push(RoundEvent::BallLost);
    }
}

/// Loss wins ties: losing the last ball on the frame the last block breaks is a loss
fn check_round_end<R: RandomSource>(round: &mut Round<R>) {
    if round.balls.is_empty() {
        log::info!(
            "Round lost on level {} with score {} (best {})",
            round.level_index + 1,
            round.score,
            round.highscore
        );
        round.events.push(RoundEvent::GameOver {
            score: round.score,
            highscore: round.highscore,
        });
        round.score = 0;
        round.set_phase(Phase::Lost);
    } else if round.blocks.iter().all(|b| !b.counts_for_clear()) {
        let level = round.level_index;
        round.level_index = (level + 1) % round.level_count;
        log::info!("Level {} cleared with score {}", level + 1, round.score);
        round.events.push(RoundEvent::LevelCleared {
            level,
            next_level: round.level_index,
        });
        round.set_phase(Phase::Won);
    }
}
