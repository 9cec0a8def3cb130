//! Handling of asynchronous backend signals.

use super::{InstancePhase, Registry};
use crate::backend::{PlaybackSignal, SignalKind};
use crate::error::SoundError;
use crate::fade::FadeCompletion;
use crate::host::LifecycleEvent;

impl Registry {
    /// Drain every pending backend signal.
    ///
    /// Returns the number of signals that referred to a live instance.
    /// Signals for instances that were already released are dropped.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(signal) = self.signal_rx.try_recv() {
            if self.handle_signal(signal) {
                handled += 1;
            }
        }
        if handled > 0 {
            self.changed();
        }
        handled
    }

    fn handle_signal(&mut self, signal: PlaybackSignal) -> bool {
        let id = signal.instance;
        let Some(instance) = self.instances.get_mut(&id) else {
            log::trace!("Ignoring {:?} for released instance {}", signal.kind, id);
            return false;
        };

        match signal.kind {
            SignalKind::Started => {
                let alias = instance.alias.clone();
                let announce = !instance.announced;
                instance.announced = true;

                let fade_in = match instance.phase {
                    InstancePhase::Pending => {
                        instance.phase = InstancePhase::Active;
                        Some((instance.target_volume, instance.fade_in))
                    }
                    InstancePhase::Resuming => {
                        instance.phase = InstancePhase::Active;
                        None
                    }
                    _ => None,
                };

                if announce {
                    self.emit(LifecycleEvent::Started, &alias);
                }
                if let Some((target, duration)) = fade_in {
                    if !duration.is_zero() {
                        self.fade_instance(id, target, duration, FadeCompletion::Hold);
                    }
                }
            }
            SignalKind::Rejected(reason) => {
                let alias = instance.alias.clone();
                self.release_instance(id);
                log::warn!("{}", SoundError::PlaybackRejected { alias: alias.clone(), reason });
                self.emit(LifecycleEvent::Failed, &alias);
            }
            SignalKind::Ended => {
                let alias = instance.alias.clone();
                self.emit(LifecycleEvent::Ended, &alias);
                self.release_instance(id);
            }
        }
        true
    }
}
