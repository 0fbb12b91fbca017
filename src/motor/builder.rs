//! Builder pattern for SingleAxisStage.

use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::binding::MotionControlLibrary;
use crate::config::{validate_axis, validate_polling_interval, AxisConfig, StageConfig, StageEntry};
use crate::config::DEFAULT_POLLING_INTERVAL_MS;
use crate::connection::DeviceConnection;
use crate::error::{ConfigError, Error, Result};

use super::clock::Clock;
use super::stage::{SingleAxisStage, NAME_CAPACITY};

/// Builder for creating SingleAxisStage instances.
pub struct StageBuilder<'a, L, C, D>
where
    L: MotionControlLibrary,
    C: Clock,
    D: DelayNs,
{
    connection: &'a DeviceConnection<'a, L>,
    channel: u16,
    name: Option<String<NAME_CAPACITY>>,
    axis: Option<AxisConfig>,
    polling_interval_ms: u32,
    clock: Option<C>,
    delay: Option<D>,
}

impl<'a, L, C, D> StageBuilder<'a, L, C, D>
where
    L: MotionControlLibrary,
    C: Clock,
    D: DelayNs,
{
    /// Create a new builder for a stage on `connection`.
    pub fn new(connection: &'a DeviceConnection<'a, L>) -> Self {
        Self {
            connection,
            channel: 0,
            name: None,
            axis: None,
            polling_interval_ms: DEFAULT_POLLING_INTERVAL_MS,
            clock: None,
            delay: None,
        }
    }

    /// Set the controller channel.
    pub fn channel(mut self, channel: u16) -> Self {
        self.channel = channel;
        self
    }

    /// Set the name reported instead of the generated one.
    pub fn name(mut self, name: &str) -> Self {
        self.name = String::try_from(name).ok();
        self
    }

    /// Set the axis configuration.
    ///
    /// Defaults to the family defaults for the connection's serial number.
    pub fn axis(mut self, axis: AxisConfig) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Set the status polling interval in milliseconds.
    pub fn polling_interval_ms(mut self, interval_ms: u32) -> Self {
        self.polling_interval_ms = interval_ms;
        self
    }

    /// Set the clock used for the grace window.
    pub fn clock(mut self, clock: C) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: D) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Configure from a StageEntry.
    pub fn from_stage_entry(mut self, entry: &StageEntry) -> Self {
        self.channel = entry.channel;
        self.name = entry.name.clone();
        self.axis = Some(entry.axis_config());
        self
    }

    /// Configure from StageConfig by stage name.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage is not configured or belongs to a
    /// different controller than the builder's connection.
    pub fn from_config(self, config: &StageConfig, stage_name: &str) -> Result<Self> {
        let entry = config.stage(stage_name).ok_or_else(|| {
            Error::Config(ConfigError::StageNotFound(
                String::try_from(stage_name).unwrap_or_default(),
            ))
        })?;

        if entry.serial_number.as_str() != self.connection.serial_number() {
            return Err(Error::Config(ConfigError::InvalidSerialNumber(
                String::try_from(entry.serial_number.as_str()).unwrap_or_default(),
            )));
        }

        Ok(self
            .polling_interval_ms(config.polling_interval_ms)
            .from_stage_entry(entry))
    }

    /// Build the SingleAxisStage.
    ///
    /// Nothing is sent to the device until `initialize`.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock or delay is missing, or if the axis
    /// scale or polling interval is invalid.
    pub fn build(self) -> Result<SingleAxisStage<'a, L, C, D>> {
        let clock = self
            .clock
            .ok_or(Error::Config(ConfigError::MissingField("clock")))?;
        let delay = self
            .delay
            .ok_or(Error::Config(ConfigError::MissingField("delay")))?;

        let axis = self
            .axis
            .unwrap_or_else(|| AxisConfig::for_serial(self.connection.serial_number()));
        validate_axis(&axis)?;
        validate_polling_interval(self.polling_interval_ms)?;

        Ok(SingleAxisStage::new(
            self.connection,
            self.channel,
            self.name,
            axis,
            self.polling_interval_ms,
            clock,
            delay,
        ))
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal_mock::eh1::delay::NoopDelay;

    use super::*;
    use crate::binding::FakeLibrary;
    use crate::config::StageType;
    use crate::motor::clock::ManualClock;

    type Builder<'a> = StageBuilder<'a, FakeLibrary, ManualClock, NoopDelay>;

    #[test]
    fn test_missing_clock() {
        let lib = FakeLibrary::with_device("55000001");
        let conn = DeviceConnection::open(&lib, "55000001");
        let result = Builder::new(&conn).delay(NoopDelay::new()).build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField("clock")))
        ));
    }

    #[test]
    fn test_family_defaults() {
        let lib = FakeLibrary::with_device("55000001");
        let conn = DeviceConnection::open(&lib, "55000001");
        let stage = Builder::new(&conn)
            .clock(ManualClock::new(0))
            .delay(NoopDelay::new())
            .build()
            .unwrap();
        assert_eq!(stage.axis_config().stage_type, StageType::Rotational);
        assert_eq!(stage.axis_config().device_units_per_revolution, 49_152_000.0);
    }

    #[test]
    fn test_invalid_interval() {
        let lib = FakeLibrary::with_device("55000001");
        let conn = DeviceConnection::open(&lib, "55000001");
        let result = Builder::new(&conn)
            .polling_interval_ms(0)
            .clock(ManualClock::new(0))
            .delay(NoopDelay::new())
            .build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidPollingInterval(0)))
        ));
    }

    #[test]
    fn test_from_config() {
        let mut config = StageConfig::default();
        config.polling_interval_ms = 250;
        let entry = StageEntry {
            serial_number: String::try_from("55000001").unwrap(),
            channel: 1,
            name: None,
            stage_type: None,
            device_units_per_millimeter: None,
            device_units_per_revolution: Some(360_000.0),
        };
        config
            .stages
            .insert(String::try_from("rotator").unwrap(), entry)
            .unwrap();

        let lib = FakeLibrary::with_device("55000001");
        let conn = DeviceConnection::open(&lib, "55000001");
        let stage = Builder::new(&conn)
            .from_config(&config, "rotator")
            .unwrap()
            .clock(ManualClock::new(0))
            .delay(NoopDelay::new())
            .build()
            .unwrap();
        assert_eq!(stage.channel(), 1);
        assert_eq!(stage.axis_config().device_units_per_revolution, 360_000.0);

        assert!(Builder::new(&conn).from_config(&config, "missing").is_err());

        let other = DeviceConnection::open(&lib, "45000001");
        assert!(matches!(
            Builder::new(&other).from_config(&config, "rotator"),
            Err(Error::Config(ConfigError::InvalidSerialNumber(_)))
        ));
    }
}
