//! Wander behavior: amble between random targets with randomized rests

use voxbreak_core::{Clock, SimRng, Stopwatch};
use voxbreak_math::{direction_at_degrees, turn_toward, Vec2};

use super::{Action, BehaviorContext};

/// Degrees per second the wanderer can turn
const ROTATION_SPEED: f32 = 180.0;

/// Seconds spent resting between legs, plus or minus the deviance
const BASE_WAIT_TIME: f32 = 2.0;
const WAIT_DEVIANCE: f32 = 1.0;

/// A leg is abandoned after this long even if the target was never reached
const MAX_MOVE_TIME: f32 = 5.0;

/// Squared distance at which a target counts as reached
const ARRIVAL_THRESHOLD_SQUARED: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WanderState {
    Moving,
    Waiting,
}

/// The wander state machine
#[derive(Debug)]
pub struct Wander {
    state: WanderState,
    target: Vec2,
    state_timer: Stopwatch,
}

impl Wander {
    pub fn new(clock: &Clock) -> Self {
        let mut state_timer = Stopwatch::new(clock);
        // Start with a finished wait so the first update picks a target
        state_timer.set_interval(clock, 0.0);
        Self {
            state: WanderState::Waiting,
            target: Vec2::ZERO,
            state_timer,
        }
    }

    pub fn update(&mut self, ctx: &BehaviorContext, rng: &mut SimRng) -> Vec<Action> {
        match self.state {
            WanderState::Moving => self.update_moving(ctx, rng),
            WanderState::Waiting => self.update_waiting(ctx, rng),
        }
    }

    fn update_moving(&mut self, ctx: &BehaviorContext, rng: &mut SimRng) -> Vec<Action> {
        let to_target = self.target - ctx.owner.position.xz();

        if to_target.length_squared() < ARRIVAL_THRESHOLD_SQUARED
            || self.state_timer.has_interval_elapsed(ctx.clock)
        {
            self.begin_wait(ctx.clock, rng);
            return vec![Action::Decelerate];
        }

        // Turn gradually toward the target, then walk forward
        let goal = to_target.orientation_degrees();
        let new_orientation = turn_toward(ctx.owner.orientation, goal, ROTATION_SPEED * ctx.dt);

        vec![Action::Move {
            direction: direction_at_degrees(new_orientation),
            speed_override: None,
        }]
    }

    fn update_waiting(&mut self, ctx: &BehaviorContext, rng: &mut SimRng) -> Vec<Action> {
        if !self.state_timer.has_interval_elapsed(ctx.clock) {
            return vec![Action::Decelerate];
        }

        self.target = Vec2::new(
            rng.float_in_range(0.0, ctx.terrain.width() as f32 - 1.0),
            rng.float_in_range(0.0, ctx.terrain.depth() as f32 - 1.0),
        );
        self.state = WanderState::Moving;
        self.state_timer.set_interval(ctx.clock, MAX_MOVE_TIME);

        vec![Action::Decelerate]
    }

    /// Stop for a randomized breather before the next leg
    fn begin_wait(&mut self, clock: &Clock, rng: &mut SimRng) {
        let wait = rng.float_in_range(
            (BASE_WAIT_TIME - WAIT_DEVIANCE).max(0.0),
            BASE_WAIT_TIME + WAIT_DEVIANCE,
        );
        self.state = WanderState::Waiting;
        self.state_timer.set_interval(clock, wait);
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests_support::{context, owner_at};
    use super::*;
    use voxbreak_math::Vec3;

    #[test]
    fn test_first_update_picks_a_target_and_moves() {
        let clock = Clock::new();
        let mut rng = SimRng::from_seed(7);
        let terrain = crate::world::terrain::Terrain::flat(64, 64, 0);
        let nearby = [];
        let ctx = context(
            owner_at(Vec3::new(32.0, 0.0, 32.0)),
            None,
            &nearby,
            &terrain,
            &clock,
        );

        let mut behavior = Wander::new(&clock);
        behavior.update(&ctx, &mut rng);
        assert_eq!(behavior.state, WanderState::Moving);
        assert!(behavior.target.x >= 0.0 && behavior.target.x < 64.0);
    }

    #[test]
    fn test_moving_turns_toward_target() {
        let clock = Clock::new();
        let mut rng = SimRng::from_seed(7);
        let terrain = crate::world::terrain::Terrain::flat(64, 64, 0);
        let nearby = [];

        let mut behavior = Wander::new(&clock);
        behavior.state = WanderState::Moving;
        behavior.state_timer.set_interval(&clock, MAX_MOVE_TIME);
        // Target due north of the owner, who faces east
        behavior.target = Vec2::new(32.0, 60.0);

        let ctx = context(
            owner_at(Vec3::new(32.0, 0.0, 32.0)),
            None,
            &nearby,
            &terrain,
            &clock,
        );
        let actions = behavior.update(&ctx, &mut rng);

        let Action::Move { direction, .. } = actions[0] else {
            panic!("expected move");
        };
        // Rotation is rate-limited: after one frame the heading has moved
        // off east but not yet reached north
        let heading = direction.orientation_degrees();
        assert!(heading > 0.0 && heading < 90.0);
    }

    #[test]
    fn test_arrival_switches_to_randomized_wait() {
        let clock = Clock::new();
        let mut rng = SimRng::from_seed(7);
        let terrain = crate::world::terrain::Terrain::flat(64, 64, 0);
        let nearby = [];

        let mut behavior = Wander::new(&clock);
        behavior.state = WanderState::Moving;
        behavior.state_timer.set_interval(&clock, MAX_MOVE_TIME);
        behavior.target = Vec2::new(32.5, 32.5);

        let ctx = context(
            owner_at(Vec3::new(32.0, 0.0, 32.0)),
            None,
            &nearby,
            &terrain,
            &clock,
        );
        let actions = behavior.update(&ctx, &mut rng);
        assert_eq!(behavior.state, WanderState::Waiting);
        assert!(matches!(actions[0], Action::Decelerate));

        // The wait does not end on the very next frame
        let actions = behavior.update(&ctx, &mut rng);
        assert_eq!(behavior.state, WanderState::Waiting);
        assert!(matches!(actions[0], Action::Decelerate));
    }
}
