//! Command/data byte transport.
//!
//! The NT7538 tells commands from pixel data by the level of its A0
//! (data/command) line: low for a command byte, high for a data byte.
//! [`SpiInterface`] drives that line around an [`SpiDevice`], which owns
//! chip-select and asserts it for exactly one byte per transaction.

use core::convert::Infallible;

use display_interface::{DataFormat, DisplayError, WriteOnlyDataCommand};
use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal::spi::SpiDevice;

/// Byte-level link to the controller.
pub trait CommandInterface {
    /// Put the select lines in their idle state.
    fn init(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    /// Send one byte with the data/command line low.
    fn send_command(&mut self, byte: u8) -> Result<(), DisplayError>;

    /// Send one byte with the data/command line high.
    fn send_data(&mut self, byte: u8) -> Result<(), DisplayError>;

    /// Transport and select lines, for the configuration dump.
    fn description(&self) -> &'static str {
        "display-interface"
    }
}

/// 4-wire SPI interface: SCK, SDA, CS (inside `SPI`), and A0 (`DC`).
///
/// Configure the bus with [`SPI_SETTINGS`](crate::SPI_SETTINGS).
#[derive(Debug)]
pub struct SpiInterface<SPI, DC> {
    spi: SPI,
    dc: DC,
}

impl<SPI, DC> SpiInterface<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    /// Create the interface. No pin or bus traffic until
    /// [`init`](CommandInterface::init).
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self { spi, dc }
    }

    /// Return the SPI device and data/command pin.
    pub fn release(self) -> (SPI, DC) {
        (self.spi, self.dc)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.spi
            .write(&[byte])
            .map_err(|_| DisplayError::BusWriteError)
    }
}

impl<SPI, DC> CommandInterface for SpiInterface<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    fn init(&mut self) -> Result<(), DisplayError> {
        self.dc.set_high().map_err(|_| DisplayError::DCError)
    }

    fn send_command(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;
        let written = self.write_byte(byte);
        // Idle in data mode even when the write failed.
        let restored = self.dc.set_high().map_err(|_| DisplayError::DCError);
        written.and(restored)
    }

    fn send_data(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.write_byte(byte)
    }

    fn description(&self) -> &'static str {
        "4-wire SPI (CS Pin: SPI device, DC Pin: configured)"
    }
}

/// Adapter for any [`WriteOnlyDataCommand`] interface, one byte per call.
#[derive(Debug)]
pub struct DataCommand<DI>(pub DI);

impl<DI> CommandInterface for DataCommand<DI>
where
    DI: WriteOnlyDataCommand,
{
    fn send_command(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.0.send_commands(DataFormat::U8(&[byte]))
    }

    fn send_data(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.0.send_data(DataFormat::U8(&[byte]))
    }
}

/// Placeholder for an unconnected reset or backlight line.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    use embedded_hal::spi::{ErrorKind, Operation};

    /// Bus events in the order the controller would see them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Event {
        Dc(bool),
        Select,
        Byte(u8),
        Deselect,
    }

    pub type Log = Rc<RefCell<Vec<Event>>>;

    pub struct MockSpi {
        pub log: Log,
        pub fail: bool,
    }

    #[derive(Debug)]
    pub struct MockSpiError;

    impl embedded_hal::spi::Error for MockSpiError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    impl embedded_hal::spi::ErrorType for MockSpi {
        type Error = MockSpiError;
    }

    impl SpiDevice for MockSpi {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
            let mut log = self.log.borrow_mut();
            log.push(Event::Select);
            let result = if self.fail {
                Err(MockSpiError)
            } else {
                for op in operations.iter() {
                    if let Operation::Write(bytes) = op {
                        log.extend(bytes.iter().map(|&b| Event::Byte(b)));
                    }
                }
                Ok(())
            };
            log.push(Event::Deselect);
            result
        }
    }

    pub struct MockDc {
        pub log: Log,
    }

    impl ErrorType for MockDc {
        type Error = Infallible;
    }

    impl OutputPin for MockDc {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.log.borrow_mut().push(Event::Dc(false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.log.borrow_mut().push(Event::Dc(true));
            Ok(())
        }
    }

    fn spi_interface(fail: bool) -> (SpiInterface<MockSpi, MockDc>, Log) {
        let log: Log = Rc::default();
        let spi = MockSpi {
            log: log.clone(),
            fail,
        };
        let dc = MockDc { log: log.clone() };
        (SpiInterface::new(spi, dc), log)
    }

    #[test]
    fn init_idles_in_data_mode() {
        let (mut iface, log) = spi_interface(false);
        iface.init().unwrap();
        assert_eq!(*log.borrow(), [Event::Dc(true)]);
    }

    #[test]
    fn command_byte_is_framed_and_dc_restored() {
        let (mut iface, log) = spi_interface(false);
        iface.send_command(0xAF).unwrap();
        assert_eq!(
            *log.borrow(),
            [
                Event::Dc(false),
                Event::Select,
                Event::Byte(0xAF),
                Event::Deselect,
                Event::Dc(true),
            ]
        );
    }

    #[test]
    fn data_byte_is_sent_with_dc_high() {
        let (mut iface, log) = spi_interface(false);
        iface.send_data(0x5A).unwrap();
        iface.send_data(0xA5).unwrap();
        assert_eq!(
            *log.borrow(),
            [
                Event::Dc(true),
                Event::Select,
                Event::Byte(0x5A),
                Event::Deselect,
                Event::Dc(true),
                Event::Select,
                Event::Byte(0xA5),
                Event::Deselect,
            ]
        );
    }

    #[test]
    fn failed_command_still_restores_data_mode() {
        let (mut iface, log) = spi_interface(true);
        assert!(matches!(
            iface.send_command(0xE2),
            Err(DisplayError::BusWriteError)
        ));
        assert_eq!(log.borrow().last(), Some(&Event::Dc(true)));
        assert!(log.borrow().contains(&Event::Deselect));
    }

    #[test]
    fn release_returns_bus_and_dc_pin() {
        let (mut iface, log) = spi_interface(false);
        iface.send_data(0x01).unwrap();
        let (mut spi, mut dc) = iface.release();
        dc.set_low().unwrap();
        spi.write(&[0x02]).unwrap();
        assert_eq!(
            log.borrow()[4..],
            [
                Event::Dc(false),
                Event::Select,
                Event::Byte(0x02),
                Event::Deselect,
            ]
        );
    }

    struct MockWriteOnly {
        commands: Vec<u8>,
        data: Vec<u8>,
    }

    impl WriteOnlyDataCommand for MockWriteOnly {
        fn send_commands(&mut self, cmd: DataFormat<'_>) -> Result<(), DisplayError> {
            match cmd {
                DataFormat::U8(bytes) => self.commands.extend_from_slice(bytes),
                _ => return Err(DisplayError::DataFormatNotImplemented),
            }
            Ok(())
        }

        fn send_data(&mut self, buf: DataFormat<'_>) -> Result<(), DisplayError> {
            match buf {
                DataFormat::U8(bytes) => self.data.extend_from_slice(bytes),
                _ => return Err(DisplayError::DataFormatNotImplemented),
            }
            Ok(())
        }
    }

    #[test]
    fn data_command_adapter_forwards_bytes() {
        let mut iface = DataCommand(MockWriteOnly {
            commands: Vec::new(),
            data: Vec::new(),
        });
        iface.init().unwrap();
        iface.send_command(0xB0).unwrap();
        iface.send_data(0x11).unwrap();
        iface.send_command(0x10).unwrap();
        assert_eq!(iface.0.commands, [0xB0, 0x10]);
        assert_eq!(iface.0.data, [0x11]);
    }
}
