//! WiFi station transport over esp-radio.

use embassy_time::{with_timeout, Duration, Timer};
use esp_radio::wifi::WifiController;
use log::{debug, warn};

use crate::config::TRANSPORT_ATTEMPT_WINDOW_MS;
use crate::io::TransportLink;

/// [`TransportLink`] over the esp-radio station controller. Credentials are
/// applied by main before construction; this type only drives the
/// start/connect sequence.
pub struct WifiLink<'d> {
    controller: WifiController<'d>,
}

impl<'d> WifiLink<'d> {
    pub fn new(controller: WifiController<'d>) -> Self {
        Self { controller }
    }
}

impl TransportLink for WifiLink<'_> {
    /// One bounded association attempt. The radio keeps scanning in the
    /// background, so an attempt that times out may still complete later;
    /// `is_up` reports whatever the controller says.
    async fn attempt(&mut self) -> bool {
        if !self.controller.is_started().unwrap_or(false) {
            if let Err(err) = self.controller.start_async().await {
                warn!("wifi start failed: {:?}", err);
                Timer::after_millis(TRANSPORT_ATTEMPT_WINDOW_MS).await;
                return false;
            }
        }

        let window = Duration::from_millis(TRANSPORT_ATTEMPT_WINDOW_MS);
        match with_timeout(window, self.controller.connect_async()).await {
            Ok(Ok(())) => {
                // Give the association a moment to settle before the caller
                // reads link status.
                Timer::after_millis(100).await;
                true
            }
            Ok(Err(err)) => {
                debug!("wifi connect failed: {:?}", err);
                let _ = self.controller.disconnect_async().await;
                false
            }
            Err(_) => self.is_up(),
        }
    }

    fn is_up(&self) -> bool {
        matches!(self.controller.is_connected(), Ok(true))
    }
}
