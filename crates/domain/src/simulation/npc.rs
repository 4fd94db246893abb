//! NPC behavior state machine.
//!
//! Exactly one [`NpcBehavior`] is active at a time. Timed states carry their
//! own countdown, so a behavior and its timer can never disagree. Each frame
//! [`Npc::update`] dispatches on the current state; directives from the
//! dialogue oracle switch states through [`Npc::apply_directive`].
//!
//! | State             | Per tick                                  | Exit                                   |
//! |-------------------|-------------------------------------------|----------------------------------------|
//! | Idle              | face player when within notice range      | external only                          |
//! | ApproachingPlayer | step toward player, face movement         | inside stop range -> Idle, face player |
//! | SteppingBack      | step away (clamped), count down           | timer <= 0 -> Idle                     |
//! | Walking           | step toward target                        | within epsilon -> snap, Idle           |
//! | Emoting           | count down                                | timer <= 0 -> Idle                     |
//! | TurnedAway        | face away from player                     | external only                          |

use serde::{Deserialize, Serialize};

use super::movement::clamp_to_bounds;
use super::SimulationConfig;
use crate::value_objects::{BehaviorDirective, Direction, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NpcBehavior {
    #[default]
    Idle,
    Walking {
        target: Vec2,
    },
    ApproachingPlayer,
    SteppingBack {
        remaining: f32,
    },
    TurnedAway,
    Emoting {
        remaining: f32,
    },
}

impl NpcBehavior {
    pub fn name(&self) -> &'static str {
        match self {
            NpcBehavior::Idle => "idle",
            NpcBehavior::Walking { .. } => "walking",
            NpcBehavior::ApproachingPlayer => "approaching_player",
            NpcBehavior::SteppingBack { .. } => "stepping_back",
            NpcBehavior::TurnedAway => "turned_away",
            NpcBehavior::Emoting { .. } => "emoting",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, NpcBehavior::Idle)
    }
}

/// The non-player character's body and current behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub position: Vec2,
    pub direction: Direction,
    pub behavior: NpcBehavior,
}

impl Npc {
    pub fn spawn(position: Vec2) -> Self {
        Self {
            position,
            direction: Direction::Down,
            behavior: NpcBehavior::Idle,
        }
    }

    // =========================================================================
    // Triggers
    // =========================================================================

    pub fn approach(&mut self) {
        self.behavior = NpcBehavior::ApproachingPlayer;
    }

    pub fn step_back(&mut self, config: &SimulationConfig) {
        self.behavior = NpcBehavior::SteppingBack {
            remaining: config.step_back_duration,
        };
    }

    pub fn turn_away(&mut self) {
        self.behavior = NpcBehavior::TurnedAway;
    }

    pub fn emote(&mut self, config: &SimulationConfig) {
        self.behavior = NpcBehavior::Emoting {
            remaining: config.emote_duration,
        };
    }

    pub fn walk_to(&mut self, target: Vec2) {
        self.behavior = NpcBehavior::Walking { target };
    }

    pub fn idle(&mut self) {
        self.behavior = NpcBehavior::Idle;
    }

    /// Map an oracle directive onto a trigger.
    pub fn apply_directive(&mut self, directive: BehaviorDirective, config: &SimulationConfig) {
        match directive {
            BehaviorDirective::ApproachPlayer => self.approach(),
            BehaviorDirective::StepBack => self.step_back(config),
            BehaviorDirective::TurnAway => self.turn_away(),
            BehaviorDirective::Emote => self.emote(config),
            // Idle faces the player on the next tick when close enough.
            BehaviorDirective::FacePlayer | BehaviorDirective::Idle => self.idle(),
        }
    }

    // =========================================================================
    // Per-frame update
    // =========================================================================

    /// Advance one frame. Returns the previous behavior when the state changed.
    pub fn update(
        &mut self,
        player: Vec2,
        dt: f32,
        config: &SimulationConfig,
    ) -> Option<NpcBehavior> {
        let before = self.behavior;

        match self.behavior {
            NpcBehavior::Idle => {
                if self.position.distance_to(player) < config.notice_range() {
                    self.direction = Direction::from_vec(player - self.position);
                }
            }
            NpcBehavior::ApproachingPlayer => {
                let to_player = player - self.position;
                if self.position.distance_to(player) > config.approach_stop_range() {
                    let dir = to_player.normalized();
                    self.position = self.position + dir * (config.npc_speed * dt);
                    self.direction = Direction::from_vec(dir);
                } else {
                    self.behavior = NpcBehavior::Idle;
                    self.direction = Direction::from_vec(to_player);
                }
            }
            NpcBehavior::SteppingBack { remaining } => {
                let away = (self.position - player).normalized();
                self.position = clamp_to_bounds(
                    self.position + away * (config.npc_speed * dt),
                    config.character_radius,
                );
                let remaining = remaining - dt;
                self.behavior = if remaining <= 0.0 {
                    NpcBehavior::Idle
                } else {
                    NpcBehavior::SteppingBack { remaining }
                };
            }
            NpcBehavior::Walking { target } => {
                if self.position.distance_to(target) > config.arrive_epsilon {
                    let dir = (target - self.position).normalized();
                    self.position = self.position + dir * (config.npc_speed * dt);
                    self.direction = Direction::from_vec(dir);
                } else {
                    self.position = target;
                    self.behavior = NpcBehavior::Idle;
                }
            }
            NpcBehavior::Emoting { remaining } => {
                let remaining = remaining - dt;
                self.behavior = if remaining <= 0.0 {
                    NpcBehavior::Idle
                } else {
                    NpcBehavior::Emoting { remaining }
                };
            }
            NpcBehavior::TurnedAway => {
                self.direction = Direction::from_vec(self.position - player);
            }
        }

        (std::mem::discriminant(&before) != std::mem::discriminant(&self.behavior))
            .then_some(before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn cfg() -> SimulationConfig {
        SimulationConfig::default()
    }

    fn npc_at(x: f32, y: f32) -> Npc {
        Npc::spawn(Vec2::new(x, y))
    }

    mod idle {
        use super::*;

        #[test]
        fn faces_nearby_player() {
            let mut npc = npc_at(0.5, 0.5);
            let changed = npc.update(Vec2::new(0.6, 0.5), DT, &cfg());

            assert_eq!(changed, None);
            assert_eq!(npc.direction, Direction::Right);
            assert_eq!(npc.position, Vec2::new(0.5, 0.5));
        }

        #[test]
        fn ignores_distant_player() {
            let mut npc = npc_at(0.5, 0.5);
            npc.update(Vec2::new(0.9, 0.5), DT, &cfg());
            assert_eq!(npc.direction, Direction::Down);
        }
    }

    mod approaching {
        use super::*;

        #[test]
        fn walks_toward_player() {
            let mut npc = npc_at(0.2, 0.5);
            npc.approach();
            npc.update(Vec2::new(0.8, 0.5), 0.1, &cfg());

            assert!((npc.position.x - 0.212).abs() < 1e-6);
            assert_eq!(npc.direction, Direction::Right);
            assert_eq!(npc.behavior, NpcBehavior::ApproachingPlayer);
        }

        #[test]
        fn stops_inside_stop_range_and_faces_player() {
            let mut npc = npc_at(0.5, 0.5);
            npc.approach();
            let changed = npc.update(Vec2::new(0.5, 0.45), DT, &cfg());

            assert_eq!(changed, Some(NpcBehavior::ApproachingPlayer));
            assert!(npc.behavior.is_idle());
            assert_eq!(npc.direction, Direction::Up);
            assert_eq!(npc.position, Vec2::new(0.5, 0.5));
        }

        #[test]
        fn eventually_arrives() {
            let mut npc = npc_at(0.1, 0.1);
            npc.approach();
            let player = Vec2::new(0.8, 0.8);
            for _ in 0..2000 {
                if npc.behavior.is_idle() {
                    break;
                }
                npc.update(player, DT, &cfg());
            }
            assert!(npc.behavior.is_idle());
            assert!(npc.position.distance_to(player) <= cfg().approach_stop_range());
        }
    }

    mod stepping_back {
        use super::*;

        #[test]
        fn backs_away_then_idles() {
            let mut npc = npc_at(0.5, 0.5);
            npc.step_back(&cfg());
            let player = Vec2::new(0.5, 0.6);

            npc.update(player, 0.25, &cfg());
            assert!(npc.position.y < 0.5);
            assert!(matches!(npc.behavior, NpcBehavior::SteppingBack { .. }));

            let changed = npc.update(player, 0.25, &cfg());
            assert_eq!(changed.map(|b| b.name()), Some("stepping_back"));
            assert!(npc.behavior.is_idle());
        }

        #[test]
        fn is_clamped_to_bounds() {
            let mut npc = npc_at(0.03, 0.5);
            npc.step_back(&cfg());
            npc.update(Vec2::new(0.5, 0.5), 0.1, &cfg());
            assert!((npc.position.x - cfg().character_radius).abs() < 1e-6);
        }
    }

    mod walking {
        use super::*;

        #[test]
        fn steps_toward_target() {
            let mut npc = npc_at(0.5, 0.5);
            npc.walk_to(Vec2::new(0.5, 0.9));
            npc.update(Vec2::new(0.0, 0.0), 0.1, &cfg());

            assert!((npc.position.y - 0.512).abs() < 1e-6);
            assert_eq!(npc.direction, Direction::Down);
        }

        #[test]
        fn snaps_to_target_within_epsilon() {
            let mut npc = npc_at(0.5, 0.5);
            let target = Vec2::new(0.51, 0.5);
            npc.walk_to(target);
            let changed = npc.update(Vec2::ZERO, DT, &cfg());

            assert!(changed.is_some());
            assert_eq!(npc.position, target);
            assert!(npc.behavior.is_idle());
        }
    }

    mod emoting {
        use super::*;

        #[test]
        fn holds_still_for_duration() {
            let mut npc = npc_at(0.5, 0.5);
            npc.emote(&cfg());
            npc.update(Vec2::new(0.55, 0.5), 0.6, &cfg());
            assert!(matches!(npc.behavior, NpcBehavior::Emoting { .. }));
            assert_eq!(npc.position, Vec2::new(0.5, 0.5));

            npc.update(Vec2::new(0.55, 0.5), 0.4, &cfg());
            assert!(npc.behavior.is_idle());
        }
    }

    mod turned_away {
        use super::*;

        #[test]
        fn keeps_facing_away_until_told_otherwise() {
            let mut npc = npc_at(0.5, 0.5);
            npc.turn_away();
            for _ in 0..120 {
                npc.update(Vec2::new(0.6, 0.5), DT, &cfg());
            }
            assert_eq!(npc.behavior, NpcBehavior::TurnedAway);
            assert_eq!(npc.direction, Direction::Left);
        }
    }

    mod directives {
        use super::*;

        #[test]
        fn map_to_triggers() {
            let c = cfg();
            let mut npc = npc_at(0.5, 0.5);

            npc.apply_directive(BehaviorDirective::ApproachPlayer, &c);
            assert_eq!(npc.behavior, NpcBehavior::ApproachingPlayer);

            npc.apply_directive(BehaviorDirective::StepBack, &c);
            assert_eq!(npc.behavior, NpcBehavior::SteppingBack { remaining: 0.5 });

            npc.apply_directive(BehaviorDirective::Emote, &c);
            assert_eq!(npc.behavior, NpcBehavior::Emoting { remaining: 1.0 });

            npc.apply_directive(BehaviorDirective::TurnAway, &c);
            assert_eq!(npc.behavior, NpcBehavior::TurnedAway);

            npc.apply_directive(BehaviorDirective::FacePlayer, &c);
            assert!(npc.behavior.is_idle());

            npc.turn_away();
            npc.apply_directive(BehaviorDirective::from_label("moonwalk"), &c);
            assert!(npc.behavior.is_idle());
        }
    }

    #[test]
    fn every_state_yields_exactly_one_next_state() {
        let c = cfg();
        let states = [
            NpcBehavior::Idle,
            NpcBehavior::Walking { target: Vec2::new(0.2, 0.2) },
            NpcBehavior::Walking { target: Vec2::new(0.5, 0.5) },
            NpcBehavior::ApproachingPlayer,
            NpcBehavior::SteppingBack { remaining: 0.5 },
            NpcBehavior::SteppingBack { remaining: 0.0 },
            NpcBehavior::TurnedAway,
            NpcBehavior::Emoting { remaining: 1.0 },
            NpcBehavior::Emoting { remaining: -1.0 },
        ];
        let players = [Vec2::new(0.5, 0.52), Vec2::new(0.6, 0.5), Vec2::new(0.95, 0.95)];
        let dts = [0.0, DT, 0.1];

        for state in states {
            for player in players {
                for dt in dts {
                    let mut npc = npc_at(0.5, 0.5);
                    npc.behavior = state;
                    npc.update(player, dt, &c);

                    let next = npc.behavior;
                    let allowed = next.is_idle()
                        || std::mem::discriminant(&next) == std::mem::discriminant(&state);
                    assert!(allowed, "{state:?} -> {next:?} is not a table transition");
                    assert!(npc.position.is_finite());
                }
            }
        }
    }
}
