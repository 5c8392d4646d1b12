//! Voxel sprite animation playback
//!
//! The renderer is an external collaborator; the simulation only tracks
//! which clip an entity is playing and how far into it the playhead is.
//! Clip aliases are translated through the definition's animation set with
//! a silent fallback to the literal name, so behaviors can request "idle"
//! or "attack" without caring which character they run on.

use std::sync::Arc;

use voxbreak_defs::animation::{AnimationSet, PlayMode};

/// Per-entity animation playback state
#[derive(Debug, Clone)]
pub struct Animator {
    set: Option<Arc<AnimationSet>>,
    current_clip: String,
    play_mode: PlayMode,
    elapsed: f32,
}

impl Animator {
    /// Create an animator playing "idle"
    pub fn new(set: Option<Arc<AnimationSet>>) -> Self {
        let mut animator = Self {
            set,
            current_clip: String::new(),
            play_mode: PlayMode::Default,
            elapsed: 0.0,
        };
        animator.play("idle", PlayMode::Default);
        animator
    }

    /// Start playing the clip for `alias`, restarting if it is already
    /// playing; unknown aliases fall back to the literal name
    pub fn play(&mut self, alias: &str, mode: PlayMode) {
        let clip = match &self.set {
            Some(set) => set.translate(alias),
            None => alias,
        };

        if self.current_clip != clip {
            self.current_clip.clear();
            self.current_clip.push_str(clip);
            self.elapsed = 0.0;
        }
        self.play_mode = mode;
    }

    /// Advance the playhead
    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Clip currently playing
    pub fn current_clip(&self) -> &str {
        &self.current_clip
    }

    /// Play mode in effect
    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    /// Seconds into the current clip
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn set() -> Arc<AnimationSet> {
        Arc::new(AnimationSet {
            name: "grunt_anims".to_string(),
            aliases: HashMap::from([("walk".to_string(), "grunt_shamble".to_string())]),
        })
    }

    #[test]
    fn test_alias_translation() {
        let mut animator = Animator::new(Some(set()));
        animator.play("walk", PlayMode::Loop);
        assert_eq!(animator.current_clip(), "grunt_shamble");
        assert_eq!(animator.play_mode(), PlayMode::Loop);
    }

    #[test]
    fn test_missing_alias_falls_back_to_literal() {
        let mut animator = Animator::new(Some(set()));
        animator.play("attack", PlayMode::Default);
        assert_eq!(animator.current_clip(), "attack");
    }

    #[test]
    fn test_replay_same_clip_keeps_playhead() {
        let mut animator = Animator::new(None);
        animator.update(0.5);
        animator.play("idle", PlayMode::Default);
        assert_eq!(animator.elapsed(), 0.5);

        animator.play("walk", PlayMode::Default);
        assert_eq!(animator.elapsed(), 0.0);
    }
}
