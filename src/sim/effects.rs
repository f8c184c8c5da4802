//! Timed effects
//!
//! Power-ups and character abilities follow the same lifecycle: cancel
//! whatever occupied the slot (reverting its side effect), apply the new side
//! effect, revert it automatically when the remaining time runs out. Time only
//! passes through `tick`, so a paused session freezes every effect.

use serde::Serialize;

/// A side effect that can be applied and later reverted on some target
pub trait TimedEffect: Copy + PartialEq {
    type Target;

    fn apply(self, target: &mut Self::Target);
    fn revert(self, target: &mut Self::Target);
}

/// Handle identifying one activation of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EffectToken(u32);

/// The effect currently occupying a slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveEffect<E> {
    pub effect: E,
    /// Time left before automatic revert; `None` when the timer was cancelled
    pub remaining_ms: Option<f32>,
    pub token: EffectToken,
}

/// Holds at most one active effect
#[derive(Debug, Clone, Serialize)]
pub struct EffectSlot<E> {
    active: Option<ActiveEffect<E>>,
    next_token: u32,
}

impl<E> Default for EffectSlot<E> {
    fn default() -> Self {
        Self {
            active: None,
            next_token: 1,
        }
    }
}

impl<E: TimedEffect> EffectSlot<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ActiveEffect<E>> {
        self.active.as_ref()
    }

    pub fn current(&self) -> Option<E> {
        self.active.as_ref().map(|a| a.effect)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn remaining_ms(&self) -> Option<f32> {
        self.active.as_ref().and_then(|a| a.remaining_ms)
    }

    /// Replace whatever is active with `effect` for `duration_ms`.
    ///
    /// Returns the new token and the effect that was displaced (already
    /// reverted).
    pub fn activate(
        &mut self,
        effect: E,
        duration_ms: f32,
        target: &mut E::Target,
    ) -> (EffectToken, Option<E>) {
        let replaced = self.revert(target);
        effect.apply(target);

        let token = EffectToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        self.active = Some(ActiveEffect {
            effect,
            remaining_ms: Some(duration_ms.max(0.0)),
            token,
        });
        (token, replaced)
    }

    /// Stop the expiry timer of a specific activation. The side effect stays
    /// applied until `revert` or a replacing `activate`. Stale tokens are
    /// ignored.
    pub fn cancel(&mut self, token: EffectToken) -> bool {
        match self.active.as_mut() {
            Some(active) if active.token == token && active.remaining_ms.is_some() => {
                active.remaining_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Revert and clear the active effect, if any
    pub fn revert(&mut self, target: &mut E::Target) -> Option<E> {
        let active = self.active.take()?;
        active.effect.revert(target);
        Some(active.effect)
    }

    /// Advance the timer. Returns the effect if it expired (already reverted).
    pub fn tick(&mut self, dt_ms: f32, target: &mut E::Target) -> Option<E> {
        let active = self.active.as_mut()?;
        let remaining = active.remaining_ms.as_mut()?;
        *remaining -= dt_ms;
        if *remaining <= 0.0 {
            self.revert(target)
        } else {
            None
        }
    }

    /// Forget the active effect without reverting it (the target is being
    /// reset wholesale)
    pub fn clear(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Boost {
        Double,
        Triple,
    }

    impl TimedEffect for Boost {
        type Target = u32;

        fn apply(self, target: &mut u32) {
            *target *= match self {
                Boost::Double => 2,
                Boost::Triple => 3,
            };
        }

        fn revert(self, target: &mut u32) {
            *target /= match self {
                Boost::Double => 2,
                Boost::Triple => 3,
            };
        }
    }

    #[test]
    fn test_expires_after_duration() {
        let mut slot = EffectSlot::new();
        let mut value = 1;
        slot.activate(Boost::Double, 100.0, &mut value);
        assert_eq!(value, 2);

        assert_eq!(slot.tick(60.0, &mut value), None);
        assert_eq!(value, 2);
        assert_eq!(slot.remaining_ms(), Some(40.0));

        assert_eq!(slot.tick(60.0, &mut value), Some(Boost::Double));
        assert_eq!(value, 1);
        assert!(!slot.is_active());
    }

    #[test]
    fn test_replacement_reverts_first() {
        let mut slot = EffectSlot::new();
        let mut value = 1;
        let (first, _) = slot.activate(Boost::Double, 100.0, &mut value);
        let (second, replaced) = slot.activate(Boost::Triple, 100.0, &mut value);
        assert_eq!(replaced, Some(Boost::Double));
        assert_ne!(first, second);
        assert_eq!(value, 3);
        assert_eq!(slot.current(), Some(Boost::Triple));
    }

    #[test]
    fn test_cancel_keeps_effect_applied() {
        let mut slot = EffectSlot::new();
        let mut value = 1;
        let (token, _) = slot.activate(Boost::Double, 50.0, &mut value);
        assert!(slot.cancel(token));
        assert!(!slot.cancel(token));

        assert_eq!(slot.tick(1_000.0, &mut value), None);
        assert_eq!(value, 2);
        assert_eq!(slot.revert(&mut value), Some(Boost::Double));
        assert_eq!(value, 1);
    }

    #[test]
    fn test_stale_token_is_ignored() {
        let mut slot = EffectSlot::new();
        let mut value = 1;
        let (old, _) = slot.activate(Boost::Double, 50.0, &mut value);
        slot.activate(Boost::Triple, 50.0, &mut value);
        assert!(!slot.cancel(old));
        assert_eq!(slot.tick(50.0, &mut value), Some(Boost::Triple));
        assert_eq!(value, 1);
    }
}
