//! Security monitor — sensor polling and the alert cycle.
//!
//! Runs as part of the scheduler tick so that at most one alert cycle is
//! in flight at a time. The hold between buzzer-on and buzzer-off blocks
//! only the scheduler task; request handlers keep serving.

use std::time::Duration;

use homectl_domain::event::EventKind;
use homectl_domain::pin::PinLevel;
use homectl_domain::time::{self, format_clock};

use crate::hub::Hub;
use crate::ports::{EventLog, PinDriver, StateStore};

impl<D, S, L> Hub<D, S, L>
where
    D: PinDriver + Send + Sync,
    S: StateStore + Clone + Send + Sync,
    L: EventLog + Send + Sync,
{
    /// One monitor pass: when the subsystem is armed and the sensor reads
    /// high, sound the buzzer for `hold`, record the alert, then silence
    /// the buzzer. Pin failures are logged and end the pass.
    pub(crate) async fn security_tick(&self, hold: Duration) {
        let security = self.registry.security();
        if !security.active {
            return;
        }

        let level = match self.actuator.read_pin(security.sensor_pin).await {
            Ok(level) => level,
            Err(err) => {
                tracing::error!(error = %err, "failed to read security sensor");
                return;
            }
        };
        if level != PinLevel::High {
            return;
        }

        if let Err(err) = self
            .actuator
            .set_pin(security.buzzer_pin, PinLevel::High)
            .await
        {
            tracing::error!(error = %err, "failed to sound buzzer");
            return;
        }

        let alert = format!(
            "[ALERT] 🚨 Suspicious activity detected by Home Security System at {}",
            format_clock(time::now())
        );
        tracing::warn!("suspicious activity detected by security system");
        self.center.notify(alert.clone()).await;
        self.center
            .log_event(EventKind::SecurityAlert, alert, None, None)
            .await;

        tokio::time::sleep(hold).await;
        if let Err(err) = self
            .actuator
            .set_pin(security.buzzer_pin, PinLevel::Low)
            .await
        {
            tracing::error!(error = %err, "failed to silence buzzer");
        }
    }
}
