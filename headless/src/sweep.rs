//! Scripted pointer that exercises the vault like a restless visitor.
//!
//! The sweeper:
//! - moves the pointer left to right across the viewport, wobbling vertically
//! - clicks after a random pause
//! - now and then parks in a side region to spin the ring

use crate::frame_loop::FrameCommand;
use rand::Rng;
use vault_core::NavSide;

/// Pause between clicks (min, max) in seconds
const CLICK_DELAY: (f64, f64) = (0.4, 2.5);
/// Pause between side-region visits (min, max) in seconds
const NAV_DELAY: (f64, f64) = (3.0, 8.0);
/// Time spent in a side region (min, max) in seconds
const NAV_HOLD: (f64, f64) = (0.5, 2.0);

fn random_in(range: (f64, f64), rng: &mut impl Rng) -> f64 {
    range.0 + rng.gen::<f64>() * (range.1 - range.0)
}

/// An active visit to a side region
#[derive(Debug, Clone, Copy)]
struct NavVisit {
    side: NavSide,
    remaining: f64,
}

#[derive(Debug)]
pub struct PointerSweep {
    width: f64,
    height: f64,
    /// Seconds for one full left-to-right pass
    period: f64,
    elapsed: f64,
    next_click: f64,
    next_nav: f64,
    visit: Option<NavVisit>,
}

impl PointerSweep {
    pub fn new(width: f64, height: f64, period: f64, rng: &mut impl Rng) -> Self {
        Self {
            width,
            height,
            period: period.max(0.1),
            elapsed: 0.0,
            next_click: random_in(CLICK_DELAY, rng),
            next_nav: random_in(NAV_DELAY, rng),
            visit: None,
        }
    }

    /// Pointer position (pixels) at the current sweep time.
    pub fn pointer(&self) -> (f64, f64) {
        let phase = (self.elapsed / self.period).fract();
        let x = phase * self.width;
        let wobble = (phase * std::f64::consts::TAU).sin() * 0.15;
        let y = (0.5 + wobble) * self.height;
        (x, y)
    }

    pub fn is_navigating(&self) -> bool {
        self.visit.is_some()
    }

    /// Advance by `dt` seconds. Returns the commands to send this tick, in order.
    pub fn tick(&mut self, dt: f64, rng: &mut impl Rng) -> Vec<FrameCommand> {
        self.elapsed += dt;
        let mut commands = Vec::new();

        let (x, y) = self.pointer();
        commands.push(FrameCommand::PointerMoved { x, y });

        self.next_click -= dt;
        if self.next_click <= 0.0 {
            self.next_click = random_in(CLICK_DELAY, rng);
            commands.push(FrameCommand::Click);
        }

        match self.visit.as_mut() {
            Some(visit) => {
                visit.remaining -= dt;
                if visit.remaining <= 0.0 {
                    self.visit = None;
                    self.next_nav = random_in(NAV_DELAY, rng);
                    commands.push(FrameCommand::HoverLeave);
                }
            }
            None => {
                self.next_nav -= dt;
                if self.next_nav <= 0.0 {
                    let side = if rng.gen_bool(0.5) {
                        NavSide::Left
                    } else {
                        NavSide::Right
                    };
                    self.visit = Some(NavVisit {
                        side,
                        remaining: random_in(NAV_HOLD, rng),
                    });
                    commands.push(FrameCommand::HoverEnter(side));
                }
            }
        }

        commands
    }

    /// Side currently visited, if any.
    pub fn side(&self) -> Option<NavSide> {
        self.visit.map(|v| v.side)
    }
}
