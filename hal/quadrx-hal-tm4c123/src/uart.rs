//! UART driver for TM4C123
//!
//! Register configuration, the receive interrupt handler, and polled I/O for
//! the eight UART modules. Pin multiplexing lives in [`crate::gpio`]; the
//! board-level sequence that ties clocks, UARTs, pins and the NVIC together
//! lives in [`crate::board`].

use core::convert::Infallible;

use quadrx_core::SlotWriter;
use quadrx_hal::uart::{BaudDivisors, DataBits, Parity, StopBits, UartRx, UartTx};
use quadrx_hal::{InterruptHandler, Pin, Port, RegisterBus, UartConfig};

use crate::map::uart::*;

/// UART module identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartId {
    Uart0,
    Uart1,
    Uart2,
    Uart3,
    Uart4,
    Uart5,
    Uart6,
    Uart7,
}

impl UartId {
    /// All UART modules, in index order
    pub const ALL: [UartId; 8] = [
        UartId::Uart0,
        UartId::Uart1,
        UartId::Uart2,
        UartId::Uart3,
        UartId::Uart4,
        UartId::Uart5,
        UartId::Uart6,
        UartId::Uart7,
    ];

    /// Module number
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Base address of this module's register block
    pub const fn base(self) -> u32 {
        UART0_BASE + self.index() as u32 * BLOCK_SIZE
    }

    /// NVIC interrupt number
    pub const fn irq(self) -> u16 {
        match self {
            UartId::Uart0 => 5,
            UartId::Uart1 => 6,
            UartId::Uart2 => 33,
            UartId::Uart3 => 59,
            UartId::Uart4 => 60,
            UartId::Uart5 => 61,
            UartId::Uart6 => 62,
            UartId::Uart7 => 63,
        }
    }

    /// Bit in the UART clock-gate and peripheral-ready registers
    pub const fn gate_mask(self) -> u32 {
        1 << self.index()
    }

    /// Port-control function code that routes `pin` to this module's RX line
    ///
    /// Returns `None` if the pin cannot carry this module's receive signal.
    pub const fn rx_function(self, pin: Pin) -> Option<u8> {
        match (self, pin.port(), pin.index()) {
            (UartId::Uart0, Port::A, 0) => Some(1),
            (UartId::Uart1, Port::B, 0) => Some(1),
            (UartId::Uart1, Port::C, 4) => Some(2),
            (UartId::Uart2, Port::D, 6) => Some(1),
            (UartId::Uart3, Port::C, 6) => Some(1),
            (UartId::Uart4, Port::C, 4) => Some(1),
            (UartId::Uart5, Port::E, 4) => Some(1),
            (UartId::Uart6, Port::D, 4) => Some(1),
            (UartId::Uart7, Port::E, 0) => Some(1),
            _ => None,
        }
    }

    /// Port-control function code that routes `pin` to this module's TX line
    pub const fn tx_function(self, pin: Pin) -> Option<u8> {
        match (self, pin.port(), pin.index()) {
            (UartId::Uart0, Port::A, 1) => Some(1),
            (UartId::Uart1, Port::B, 1) => Some(1),
            (UartId::Uart1, Port::C, 5) => Some(2),
            (UartId::Uart2, Port::D, 7) => Some(1),
            (UartId::Uart3, Port::C, 7) => Some(1),
            (UartId::Uart4, Port::C, 5) => Some(1),
            (UartId::Uart5, Port::E, 5) => Some(1),
            (UartId::Uart6, Port::D, 5) => Some(1),
            (UartId::Uart7, Port::E, 1) => Some(1),
            _ => None,
        }
    }
}

/// Line-control register value for a frame configuration
///
/// FIFOs are always enabled.
pub const fn line_control(config: &UartConfig) -> u32 {
    let wlen = match config.data_bits {
        DataBits::Five => LCRH_WLEN_5,
        DataBits::Six => LCRH_WLEN_6,
        DataBits::Seven => LCRH_WLEN_7,
        DataBits::Eight => LCRH_WLEN_8,
    };
    let parity = match config.parity {
        Parity::None => 0,
        Parity::Even => LCRH_PEN | LCRH_EPS,
        Parity::Odd => LCRH_PEN,
    };
    let stop = match config.stop_bits {
        StopBits::One => 0,
        StopBits::Two => LCRH_STP2,
    };
    wlen | LCRH_FEN | parity | stop
}

/// Program one UART module and enable it
///
/// The module's clock must already be running. The enable write is the last
/// access to the module's register block, so the UART never runs with a
/// half-written configuration.
pub fn configure<B: RegisterBus>(
    bus: &mut B,
    uart: UartId,
    config: &UartConfig,
    divisors: BaudDivisors,
) {
    let base = uart.base();

    bus.clear_bits(base + CTL, CTL_UARTEN);

    bus.write(base + IBRD, divisors.integer as u32);
    bus.write(base + FBRD, divisors.fractional as u32);
    bus.write(base + LCRH, line_control(config));

    bus.clear_bits(base + IFLS, IFLS_TX_MASK | IFLS_RX_MASK);
    bus.set_bits(
        base + IFLS,
        config.tx_fifo_level.bits() | (config.rx_fifo_level.bits() << IFLS_RX_SHIFT),
    );

    bus.set_bits(base + IM, IM_RXIM | IM_TXIM | IM_RTIM);

    bus.set_bits(base + CTL, CTL_UARTEN | CTL_TXE | CTL_RXE);
}

/// Receive interrupt handler for one UART module
///
/// Owns the write capability for the module's sampler slot. Each serviced
/// interrupt moves exactly one byte; anything still in the FIFO raises the
/// interrupt again. Overrun, framing and parity errors are not checked.
#[derive(Debug)]
pub struct RxHandler<'a> {
    uart: UartId,
    slot: SlotWriter<'a>,
}

impl<'a> RxHandler<'a> {
    /// Bind a UART module to its sampler slot
    pub fn new(uart: UartId, slot: SlotWriter<'a>) -> Self {
        Self { uart, slot }
    }

    /// UART module this handler services
    pub fn uart(&self) -> UartId {
        self.uart
    }

    /// Sampler slot this handler writes
    pub fn slot_index(&self) -> usize {
        self.slot.index()
    }

    /// Service a receive or receive-timeout interrupt
    ///
    /// Returns `false` without touching the data register when neither
    /// condition is raised; a pending transmit interrupt is acknowledged so
    /// the line does not stay asserted. The interrupt is acknowledged before
    /// the data register is read.
    pub fn service<B: RegisterBus + ?Sized>(&self, bus: &mut B) -> bool {
        let base = self.uart.base();

        let status = bus.read(base + RIS);
        if status & (RIS_RXRIS | RIS_RTRIS) == 0 {
            if status & RIS_TXRIS != 0 {
                bus.write(base + ICR, ICR_TXIC);
            }
            return false;
        }

        bus.write(base + ICR, ICR_RXIC | ICR_RTIC);
        let byte = (bus.read(base + DR) & DR_DATA_MASK) as u8;
        self.slot.store(byte);
        true
    }
}

impl<B: RegisterBus + ?Sized> InterruptHandler<B> for RxHandler<'_> {
    fn irq(&self) -> u16 {
        self.uart.irq()
    }

    fn on_interrupt(&self, bus: &mut B) {
        self.service(bus);
    }
}

/// Polled UART I/O on an already configured module
pub struct BlockingUart<B> {
    bus: B,
    uart: UartId,
}

impl<B: RegisterBus> BlockingUart<B> {
    /// Wrap a configured UART module
    pub fn new(bus: B, uart: UartId) -> Self {
        Self { bus, uart }
    }

    /// Release the bus
    pub fn free(self) -> B {
        self.bus
    }
}

impl<B: RegisterBus> UartTx for BlockingUart<B> {
    type Error = Infallible;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        let base = self.uart.base();
        for &byte in data {
            self.bus.wait_clear(base + FR, FR_TXFF);
            self.bus.write(base + DR, byte as u32);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.bus.wait_clear(self.uart.base() + FR, FR_BUSY);
        Ok(())
    }
}

impl<B: RegisterBus> UartRx for BlockingUart<B> {
    type Error = Infallible;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let base = self.uart.base();
        for byte in buf.iter_mut() {
            self.bus.wait_clear(base + FR, FR_RXFE);
            *byte = (self.bus.read(base + DR) & DR_DATA_MASK) as u8;
        }
        Ok(buf.len())
    }
}
