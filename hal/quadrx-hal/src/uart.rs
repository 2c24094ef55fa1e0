//! UART serial communication abstractions
//!
//! Frame configuration types shared by every UART driver, the baud-rate
//! divisor calculation for 16x-oversampling UARTs, and polled I/O traits.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been queued in the transmit FIFO.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Block until the transmitter has shifted out every queued bit
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read data from the UART
    ///
    /// Blocks until the buffer is filled.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Read a single byte from the UART
    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.read_blocking(&mut buf)?;
        Ok(buf[0])
    }
}

/// Combined UART interface
pub trait Uart: UartTx + UartRx {}

// Blanket implementation
impl<T: UartTx + UartRx> Uart for T {}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits per frame
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
    /// Transmit FIFO interrupt trigger level
    pub tx_fifo_level: FifoLevel,
    /// Receive FIFO interrupt trigger level
    pub rx_fifo_level: FifoLevel,
}

impl UartConfig {
    /// 115200 baud, 8N1, both FIFO triggers at 1/8
    pub const DEFAULT: Self = Self {
        baudrate: 115_200,
        data_bits: DataBits::Eight,
        parity: Parity::None,
        stop_bits: StopBits::One,
        tx_fifo_level: FifoLevel::OneEighth,
        rx_fifo_level: FifoLevel::OneEighth,
    };
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

/// FIFO fill level at which the FIFO interrupt triggers
///
/// Discriminants are the 3-bit field encoding shared by PL011-derived UARTs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FifoLevel {
    OneEighth = 0,
    OneQuarter = 1,
    Half = 2,
    ThreeQuarters = 3,
    SevenEighths = 4,
}

impl FifoLevel {
    /// Field encoding
    pub const fn bits(self) -> u32 {
        self as u32
    }
}

/// Integer and fractional baud-rate divisor pair
///
/// For a UART oversampling 16x, `BRD = clock / (16 * baud)`. The integer part
/// goes to IBRD and the fraction is stored in 1/64 steps, rounded to nearest:
/// `FBRD = round(frac(BRD) * 64)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaudDivisors {
    /// Integer divisor (16 bits)
    pub integer: u16,
    /// Fractional divisor in 1/64 units (6 bits)
    pub fractional: u8,
}

impl BaudDivisors {
    /// Compute divisors for `baud` at `clock_hz`
    ///
    /// Returns `None` if `baud` is zero or the integer divisor does not fit
    /// the 16-bit register (baud too low for the clock) or is zero (baud too
    /// high for the clock).
    pub const fn compute(clock_hz: u32, baud: u32) -> Option<Self> {
        if baud == 0 {
            return None;
        }

        // BRD * 64 = clock * 4 / baud; keep one extra bit for rounding
        let scaled = (clock_hz as u64 * 8) / baud as u64;
        let div64 = (scaled + 1) / 2;

        let integer = div64 / 64;
        if integer == 0 || integer > u16::MAX as u64 {
            return None;
        }

        Some(Self {
            integer: integer as u16,
            fractional: (div64 % 64) as u8,
        })
    }

    /// Baud rate these divisors actually produce at `clock_hz`
    pub fn actual_baud(&self, clock_hz: u32) -> u32 {
        let div64 = self.integer as u64 * 64 + self.fractional as u64;
        ((clock_hz as u64 * 4) / div64) as u32
    }
}
