use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Sender};

use crate::types::WizardEvent;

/// Receives session notifications, including the final hand-off of the
/// captured points.
pub trait WizardObserver {
    fn notify(&mut self, event: WizardEvent);
}

impl WizardObserver for () {
    fn notify(&mut self, _event: WizardEvent) {}
}

impl<T: WizardObserver + ?Sized> WizardObserver for &mut T {
    fn notify(&mut self, event: WizardEvent) {
        (**self).notify(event);
    }
}

// Never blocks the UI thread; a full channel drops the event.
impl<M: RawMutex, const N: usize> WizardObserver for Sender<'_, M, WizardEvent, N> {
    fn notify(&mut self, event: WizardEvent) {
        if self.try_send(event).is_err() {
            log::warn!("calibration: event channel full, dropped {:?}", event);
        }
    }
}

impl<const N: usize> WizardObserver for heapless::Vec<WizardEvent, N> {
    fn notify(&mut self, event: WizardEvent) {
        if let Err(event) = self.push(event) {
            log::warn!("calibration: event buffer full, dropped {:?}", event);
        }
    }
}
