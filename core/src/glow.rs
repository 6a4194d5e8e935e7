//! Per-card float, scale and glow animation.
//!
//! Each card is in one of three glow states every frame:
//! - flashing: pinned at the flash intensity until its deadline, set by a click
//! - hovered: pulses at `pulse_base + pulse_amplitude * sin(t * pulse_frequency)`
//! - idle: decays toward zero by `ease_factor` per tick
//!
//! A running flash wins over both other states.

use crate::config::VaultConfig;
use crate::entity::Entity;
use crate::vec3::lerp_scalar;

/// What happened to a card's flash during one advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashStep {
    None,
    Holding,
    Ended,
}

/// Hover pulse value at elapsed time `t`.
pub fn pulse(t: f64, config: &VaultConfig) -> f64 {
    config.pulse_base + config.pulse_amplitude * (t * config.pulse_frequency).sin()
}

/// Holo overlay texture scroll at elapsed time `t`. Same for front and back.
pub fn holo_scroll(t: f64, config: &VaultConfig) -> f64 {
    t * config.holo_scroll_rate
}

/// Advance one card by one tick at elapsed time `t`.
pub fn advance_entity(
    entity: &mut Entity,
    t: f64,
    hovered: bool,
    config: &VaultConfig,
) -> FlashStep {
    entity.y_offset = config.float_amplitude * (t + entity.phase()).sin();

    let target_scale = if hovered { config.hover_scale } else { 1.0 };
    entity.scale = lerp_scalar(entity.scale, target_scale, config.ease_factor);

    if let Some(until) = entity.flash_until {
        if t >= until {
            entity.flash_until = None;
            entity.glow_front = 0.0;
            entity.glow_back = 0.0;
            return FlashStep::Ended;
        }
        entity.glow_front = config.flash_intensity;
        entity.glow_back = config.flash_intensity;
        return FlashStep::Holding;
    }

    if hovered {
        let p = pulse(t, config);
        entity.glow_front = p;
        entity.glow_back = p;
    } else {
        entity.glow_front = lerp_scalar(entity.glow_front, 0.0, config.ease_factor);
        entity.glow_back = lerp_scalar(entity.glow_back, 0.0, config.ease_factor);
    }
    FlashStep::None
}

/// Start (or re-arm) a click flash at time `now`. The latest call sets the deadline.
pub fn start_flash(entity: &mut Entity, now: f64, config: &VaultConfig) {
    entity.glow_front = config.flash_intensity;
    entity.glow_back = config.flash_intensity;
    entity.flash_until = Some(now + config.flash_duration);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityId, EntityRegistry};
    use crate::source::SourceItem;

    fn card() -> (EntityRegistry, VaultConfig) {
        let config = VaultConfig::default();
        let reg = EntityRegistry::from_sources(&[SourceItem::new("a.png")], &config);
        (reg, config)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "Expected {} to be close to {}",
            actual,
            expected
        );
    }

    #[test]
    fn one_hovered_tick_blends_scale_by_ease_factor() {
        let (mut reg, config) = card();
        let e = reg.get_mut(EntityId(0)).unwrap();
        advance_entity(e, 0.0, true, &config);
        assert_close(e.scale(), 1.025);
    }

    #[test]
    fn scale_converges_without_overshoot() {
        let (mut reg, config) = card();
        let e = reg.get_mut(EntityId(0)).unwrap();
        let mut prev = e.scale();
        for i in 0..400 {
            advance_entity(e, i as f64 / 60.0, true, &config);
            assert!(e.scale() <= config.hover_scale);
            assert!(e.scale() >= prev);
            prev = e.scale();
        }
        assert!((e.scale() - config.hover_scale).abs() < 1e-9);
    }

    #[test]
    fn scale_returns_to_rest_when_unhovered() {
        let (mut reg, config) = card();
        let e = reg.get_mut(EntityId(0)).unwrap();
        for _ in 0..100 {
            advance_entity(e, 0.0, true, &config);
        }
        for _ in 0..400 {
            advance_entity(e, 0.0, false, &config);
            assert!(e.scale() >= 1.0);
        }
        assert!((e.scale() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn float_offset_follows_phase() {
        let (mut reg, config) = card();
        let e = reg.get_mut(EntityId(0)).unwrap();
        advance_entity(e, 0.0, false, &config);
        assert_close(e.y_offset(), 0.0);
        advance_entity(e, std::f64::consts::FRAC_PI_2, false, &config);
        assert_close(e.y_offset(), config.float_amplitude);
    }

    #[test]
    fn hover_sets_pulse_directly() {
        let (mut reg, config) = card();
        let e = reg.get_mut(EntityId(0)).unwrap();
        let t = 0.3;
        advance_entity(e, t, true, &config);
        let expected = 0.3 + 0.3 * (t * 8.0).sin();
        assert_close(e.glow_front(), expected);
        assert_close(e.glow_back(), expected);
    }

    #[test]
    fn idle_glow_decays_toward_zero() {
        let (mut reg, config) = card();
        let e = reg.get_mut(EntityId(0)).unwrap();
        e.glow_front = 1.0;
        e.glow_back = 0.5;
        advance_entity(e, 0.0, false, &config);
        assert_close(e.glow_front(), 0.9);
        assert_close(e.glow_back(), 0.45);
    }

    #[test]
    fn flash_holds_then_resets_to_zero() {
        let (mut reg, config) = card();
        let e = reg.get_mut(EntityId(0)).unwrap();
        start_flash(e, 1.0, &config);
        assert_eq!(e.glow_front(), 3.0);

        // Hover would normally pulse, flash takes precedence.
        assert_eq!(advance_entity(e, 1.2, true, &config), FlashStep::Holding);
        assert_eq!(e.glow_front(), 3.0);
        assert_eq!(e.glow_back(), 3.0);

        assert_eq!(advance_entity(e, 1.5, false, &config), FlashStep::Ended);
        assert_eq!(e.glow_front(), 0.0);
        assert_eq!(e.glow_back(), 0.0);
        assert_eq!(e.flash_until(), None);
    }

    #[test]
    fn rearming_flash_extends_deadline() {
        let (mut reg, config) = card();
        let e = reg.get_mut(EntityId(0)).unwrap();
        start_flash(e, 1.0, &config);
        start_flash(e, 1.3, &config);
        assert_eq!(advance_entity(e, 1.6, false, &config), FlashStep::Holding);
        assert_eq!(advance_entity(e, 1.9, false, &config), FlashStep::Ended);
    }

    #[test]
    fn holo_scroll_is_linear_in_time() {
        let config = VaultConfig::default();
        assert_close(holo_scroll(2.0, &config), 0.3);
    }
}
