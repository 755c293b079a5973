//! Rate-limited LimitlessLED RGBW driver.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use lumen_app::ports::BridgeDriver;
use lumen_domain::command::{Command, MAX_BRIGHTNESS, MIN_BRIGHTNESS, ZoneCommand, ZoneId};
use lumen_domain::error::{InvalidArgument, LumenError};

use crate::error::LimitlessError;
use crate::opcode::{self, Datagram};
use crate::transport::Transport;

/// Minimum spacing between two datagrams sent to the same bridge.
pub const MIN_SEND_INTERVAL: Duration = Duration::from_millis(100);

/// One RGBW bridge.
///
/// Color, white and brightness datagrams are preceded by the zone's power-on
/// datagram, which is how the bridge selects the zone they apply to.
pub struct LimitlessLed<T> {
    transport: T,
    last_send: Instant,
}

impl<T: Transport> LimitlessLed<T> {
    /// Wrap a transport. The spacing clock starts now, so the first datagram
    /// leaves at the earliest [`MIN_SEND_INTERVAL`] after construction.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            last_send: Instant::now(),
        }
    }

    /// # Errors
    ///
    /// Returns [`LimitlessError::Io`] when the datagram can't be sent.
    pub async fn power_on(&mut self, zone: ZoneId) -> Result<(), LimitlessError> {
        self.transmit(opcode::power_on(zone)).await
    }

    /// # Errors
    ///
    /// Returns [`LimitlessError::Io`] when the datagram can't be sent.
    pub async fn power_off(&mut self, zone: ZoneId) -> Result<(), LimitlessError> {
        self.transmit(opcode::power_off(zone)).await
    }

    /// # Errors
    ///
    /// Returns [`LimitlessError::Io`] when a datagram can't be sent.
    pub async fn set_white(&mut self, zone: ZoneId) -> Result<(), LimitlessError> {
        self.power_on(zone).await?;
        self.transmit(opcode::white(zone)).await
    }

    /// # Errors
    ///
    /// Returns [`LimitlessError::Io`] when a datagram can't be sent.
    pub async fn set_color(&mut self, zone: ZoneId, code: u8) -> Result<(), LimitlessError> {
        self.power_on(zone).await?;
        self.transmit(opcode::color(code)).await
    }

    /// The level is checked before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns [`LimitlessError::InvalidArgument`] for a level outside
    /// `2..=27` and [`LimitlessError::Io`] when a datagram can't be sent.
    pub async fn set_brightness(&mut self, zone: ZoneId, level: u8) -> Result<(), LimitlessError> {
        if !(MIN_BRIGHTNESS..=MAX_BRIGHTNESS).contains(&level) {
            return Err(InvalidArgument::Brightness(i64::from(level)).into());
        }
        self.power_on(zone).await?;
        self.transmit(opcode::brightness(level)).await
    }

    /// Dispatch one zone command to the matching operation.
    ///
    /// # Errors
    ///
    /// See the individual operations.
    pub async fn execute(&mut self, command: ZoneCommand) -> Result<(), LimitlessError> {
        let ZoneCommand { zone, command } = command;
        tracing::debug!(%zone, %command, "bridge command");
        match command {
            Command::PowerOn => self.power_on(zone).await,
            Command::PowerOff => self.power_off(zone).await,
            Command::White => self.set_white(zone).await,
            Command::Color(code) => self.set_color(zone, code).await,
            Command::Brightness(level) => self.set_brightness(zone, level).await,
        }
    }

    async fn transmit(&mut self, datagram: Datagram) -> Result<(), LimitlessError> {
        let ready_at = self.last_send + MIN_SEND_INTERVAL;
        let now = Instant::now();
        if ready_at > now {
            tracing::trace!(wait_ms = (ready_at - now).as_millis(), "waiting for bridge");
            tokio::time::sleep_until(ready_at).await;
        }
        self.transport.send(&datagram).await?;
        self.last_send = Instant::now();
        tracing::trace!(datagram = ?datagram, "datagram sent");
        Ok(())
    }
}

impl<T: Transport> BridgeDriver for LimitlessLed<T> {
    fn send(
        &mut self,
        command: ZoneCommand,
    ) -> impl Future<Output = Result<(), LumenError>> + Send {
        async move { self.execute(command).await.map_err(LumenError::from) }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    type Sent = Arc<Mutex<Vec<(Instant, Datagram)>>>;

    /// Records every datagram with the time it left.
    #[derive(Clone, Default)]
    struct RecordingTransport {
        sent: Sent,
        fail: bool,
    }

    impl Transport for RecordingTransport {
        fn send(&mut self, datagram: &Datagram) -> impl Future<Output = io::Result<()>> + Send {
            let result = if self.fail {
                Err(io::Error::new(io::ErrorKind::HostUnreachable, "unreachable"))
            } else {
                self.sent.lock().unwrap().push((Instant::now(), *datagram));
                Ok(())
            };
            async { result }
        }
    }

    fn zone(index: u8) -> ZoneId {
        ZoneId::new(index).unwrap()
    }

    fn datagrams(sent: &Sent) -> Vec<Datagram> {
        sent.lock().unwrap().iter().map(|(_, d)| *d).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn should_select_zone_before_color() {
        let transport = RecordingTransport::default();
        let mut driver = LimitlessLed::new(transport.clone());

        driver.set_color(zone(2), 170).await.unwrap();

        assert_eq!(
            datagrams(&transport.sent),
            vec![[0x47, 0x00, 0x55], [0x40, 170, 0x55]]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_space_datagrams_by_minimum_interval() {
        let transport = RecordingTransport::default();
        let start = Instant::now();
        let mut driver = LimitlessLed::new(transport.clone());

        driver.set_white(zone(1)).await.unwrap();
        driver.power_off(zone(4)).await.unwrap();

        let times: Vec<Instant> = transport.sent.lock().unwrap().iter().map(|(t, _)| *t).collect();
        assert_eq!(times.len(), 3);
        assert!(times[0] - start >= MIN_SEND_INTERVAL);
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= MIN_SEND_INTERVAL);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_wait_when_bridge_was_idle() {
        let transport = RecordingTransport::default();
        let mut driver = LimitlessLed::new(transport.clone());
        tokio::time::sleep(Duration::from_secs(1)).await;

        let before = Instant::now();
        driver.power_on(ZoneId::ALL).await.unwrap();

        let (sent_at, datagram) = transport.sent.lock().unwrap()[0];
        assert_eq!(sent_at, before);
        assert_eq!(datagram, [0x42, 0x00, 0x55]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_reject_brightness_before_selecting_zone() {
        let transport = RecordingTransport::default();
        let mut driver = LimitlessLed::new(transport.clone());

        let err = driver.set_brightness(zone(1), 28).await.unwrap_err();

        assert!(matches!(
            err,
            LimitlessError::InvalidArgument(InvalidArgument::Brightness(28))
        ));
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn should_execute_brightness_command() {
        let transport = RecordingTransport::default();
        let mut driver = LimitlessLed::new(transport.clone());

        BridgeDriver::send(&mut driver, ZoneCommand::new(zone(3), Command::Brightness(27)))
            .await
            .unwrap();

        assert_eq!(
            datagrams(&transport.sent),
            vec![[0x49, 0x00, 0x55], [0x4E, 27, 0x55]]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_report_send_failure_as_transport_error() {
        let transport = RecordingTransport {
            fail: true,
            ..RecordingTransport::default()
        };
        let mut driver = LimitlessLed::new(transport);

        let err = BridgeDriver::send(&mut driver, ZoneCommand::new(zone(1), Command::PowerOff))
            .await
            .unwrap_err();

        assert!(matches!(err, LumenError::Transport(_)));
    }
}
