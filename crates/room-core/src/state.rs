//! Per-target interaction state machines.
//!
//! Each target owns one tagged state value; a resolved click advances the
//! matching machine at most once and the resulting `Effect`s tell the
//! caller which external state to touch. The summon delay is driven by
//! `tick`, not a host timer, so the whole machine runs in native tests.

use crate::constants::SUMMON_DELAY_SEC;
use crate::registry::Target;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LampState {
    Off,
    On,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonitorState {
    Closed,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinState {
    Idle,
    Spinning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummonState {
    Hidden,
    Summoning,
    Visible,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RasenganState {
    Normal,
    Enlarged,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    LampChanged { on: bool },
    MonitorOpened { first_time: bool },
    MonitorShutDown,
    SpinChanged { spinning: bool },
    SummonStarted,
    SummonAppeared,
    SummonDismissed,
    RasenganChanged { enlarged: bool },
}

pub type Effects = SmallVec<[Effect; 2]>;

pub struct Interactions {
    pub lamp: LampState,
    pub monitor: MonitorState,
    pub spin: SpinState,
    pub summon: SummonState,
    pub rasengan: RasenganState,
    summon_remaining: f32,
    monitor_opened_before: bool,
}

impl Interactions {
    pub fn new() -> Self {
        Self {
            lamp: LampState::Off,
            monitor: MonitorState::Closed,
            spin: SpinState::Idle,
            summon: SummonState::Hidden,
            rasengan: RasenganState::Normal,
            summon_remaining: 0.0,
            monitor_opened_before: false,
        }
    }

    /// Advance the machine for one resolved click on `target`.
    pub fn click(&mut self, target: Target) -> Effects {
        let mut out = Effects::new();
        match target {
            Target::Lamp => {
                self.lamp = match self.lamp {
                    LampState::Off => LampState::On,
                    LampState::On => LampState::Off,
                };
                out.push(Effect::LampChanged {
                    on: self.lamp == LampState::On,
                });
            }
            Target::Monitor => {
                // Open never auto-exits via click; shutdown is external.
                if self.monitor == MonitorState::Closed {
                    self.monitor = MonitorState::Open;
                    let first_time = !self.monitor_opened_before;
                    self.monitor_opened_before = true;
                    out.push(Effect::MonitorOpened { first_time });
                }
            }
            Target::Naruto => {
                self.spin = match self.spin {
                    SpinState::Idle => SpinState::Spinning,
                    SpinState::Spinning => SpinState::Idle,
                };
                out.push(Effect::SpinChanged {
                    spinning: self.spin == SpinState::Spinning,
                });
            }
            Target::Sasuke => match self.summon {
                SummonState::Hidden => {
                    self.summon = SummonState::Summoning;
                    self.summon_remaining = SUMMON_DELAY_SEC;
                    out.push(Effect::SummonStarted);
                }
                SummonState::Summoning => {
                    // Not re-entrant: the pending completion time stays put.
                    log::debug!("[summon] click ignored while summoning");
                }
                SummonState::Visible => {
                    self.summon = SummonState::Hidden;
                    out.push(Effect::SummonDismissed);
                }
            },
            Target::Rasengan => {
                self.rasengan = match self.rasengan {
                    RasenganState::Normal => RasenganState::Enlarged,
                    RasenganState::Enlarged => RasenganState::Normal,
                };
                out.push(Effect::RasenganChanged {
                    enlarged: self.rasengan == RasenganState::Enlarged,
                });
            }
        }
        out
    }

    /// Per-frame advance; completes a pending summon once its delay runs out.
    pub fn tick(&mut self, dt_sec: f32) -> Effects {
        let mut out = Effects::new();
        if self.summon == SummonState::Summoning {
            self.summon_remaining -= dt_sec;
            if self.summon_remaining <= 0.0 {
                self.summon = SummonState::Visible;
                self.summon_remaining = 0.0;
                out.push(Effect::SummonAppeared);
            }
        }
        out
    }

    /// The external shutdown control (panel close / Escape).
    pub fn shutdown_monitor(&mut self) -> Effects {
        let mut out = Effects::new();
        if self.monitor == MonitorState::Open {
            self.monitor = MonitorState::Closed;
            out.push(Effect::MonitorShutDown);
        }
        out
    }

    /// Seconds left on a pending summon, if one is in flight.
    pub fn summon_pending(&self) -> Option<f32> {
        (self.summon == SummonState::Summoning).then_some(self.summon_remaining)
    }
}

impl Default for Interactions {
    fn default() -> Self {
        Self::new()
    }
}
