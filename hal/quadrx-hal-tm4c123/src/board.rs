//! Board wiring
//!
//! A [`BoardConfig`] lists the receive channels in slot order. Everything in
//! it is `const`, so a bad pin assignment or an unreachable baud rate fails
//! the build rather than the boot.

use heapless::Vec;
use quadrx_core::{ReceiveSampler, SamplerError};
use quadrx_hal::uart::BaudDivisors;
use quadrx_hal::{Pin, Port, RegisterBus, UartConfig};

use crate::pll::BusFrequency;
use crate::sysctl::{self, ClockGates};
use crate::uart::{self, RxHandler, UartId};
use crate::{gpio, nvic};

/// A pin routed to a peripheral function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinFunction {
    pub pin: Pin,
    /// Port-control function code
    pub function: u8,
}

/// One monitored UART and its pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxChannel {
    pub uart: UartId,
    pub rx: PinFunction,
    pub tx: Option<PinFunction>,
}

impl RxChannel {
    /// Receive-only channel
    ///
    /// Panics (at compile time, in const context) if `rx` cannot carry the
    /// UART's receive signal.
    pub const fn rx_only(uart: UartId, rx: Pin) -> Self {
        let function = match uart.rx_function(rx) {
            Some(function) => function,
            None => panic!("pin cannot carry this UART's RX signal"),
        };
        Self {
            uart,
            rx: PinFunction { pin: rx, function },
            tx: None,
        }
    }

    /// Channel with the transmit pin wired as well
    pub const fn with_tx(uart: UartId, rx: Pin, tx: Pin) -> Self {
        let channel = Self::rx_only(uart, rx);
        let function = match uart.tx_function(tx) {
            Some(function) => function,
            None => panic!("pin cannot carry this UART's TX signal"),
        };
        Self {
            tx: Some(PinFunction { pin: tx, function }),
            ..channel
        }
    }
}

/// Complete receive-side configuration
///
/// Channel position is the sampler slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardConfig<const N: usize> {
    /// Clock feeding the UART modules (the system clock)
    pub uart_clock_hz: u32,
    pub uart: UartConfig,
    /// Divisors derived from `uart_clock_hz` and `uart.baudrate`
    pub divisors: BaudDivisors,
    pub channels: [RxChannel; N],
    /// NVIC priority for every receive interrupt (0-7)
    pub irq_priority: u8,
}

impl<const N: usize> BoardConfig<N> {
    /// Default NVIC priority for receive interrupts
    pub const DEFAULT_IRQ_PRIORITY: u8 = 2;

    /// Build a configuration, computing baud divisors at compile time
    ///
    /// Panics (at compile time, in const context) if the baud rate cannot be
    /// reached from `uart_clock_hz` or a UART appears twice.
    pub const fn new(uart_clock_hz: u32, uart: UartConfig, channels: [RxChannel; N]) -> Self {
        let divisors = match BaudDivisors::compute(uart_clock_hz, uart.baudrate) {
            Some(divisors) => divisors,
            None => panic!("baud rate unreachable from UART clock"),
        };

        let mut i = 0;
        while i < N {
            let mut j = i + 1;
            while j < N {
                if channels[i].uart.index() == channels[j].uart.index() {
                    panic!("UART used by more than one channel");
                }
                j += 1;
            }
            i += 1;
        }

        Self {
            uart_clock_hz,
            uart,
            divisors,
            channels,
            irq_priority: Self::DEFAULT_IRQ_PRIORITY,
        }
    }

    /// Clock gates for every UART and GPIO port the channels use
    pub const fn clock_gates(&self) -> ClockGates {
        let mut gates = ClockGates {
            uarts: 0,
            ports: 0,
            ssis: 0,
        };
        let mut i = 0;
        while i < N {
            let channel = &self.channels[i];
            gates.uarts |= channel.uart.gate_mask();
            gates.ports |= gpio::gate_mask(channel.rx.pin);
            if let Some(tx) = channel.tx {
                gates.ports |= gpio::gate_mask(tx.pin);
            }
            i += 1;
        }
        gates
    }

    /// Check if a UART module is one of the channels
    pub fn uses(&self, uart: UartId) -> bool {
        self.channels.iter().any(|c| c.uart == uart)
    }

    /// Slot index of a UART module's channel
    pub fn slot_of(&self, uart: UartId) -> Option<usize> {
        self.channels.iter().position(|c| c.uart == uart)
    }
}

/// Canonical four-channel monitor at 80 MHz, 115 200 8N1
///
/// | Slot | UART  | RX  |
/// |------|-------|-----|
/// | 0    | UART2 | PD6 |
/// | 1    | UART3 | PC6 |
/// | 2    | UART4 | PC4 |
/// | 3    | UART7 | PE0 |
pub const RX_MONITOR: BoardConfig<4> = BoardConfig::new(
    BusFrequency::Mhz80.hz(),
    UartConfig::DEFAULT,
    [
        RxChannel::rx_only(UartId::Uart2, Pin::new(Port::D, 6)),
        RxChannel::rx_only(UartId::Uart3, Pin::new(Port::C, 6)),
        RxChannel::rx_only(UartId::Uart4, Pin::new(Port::C, 4)),
        RxChannel::rx_only(UartId::Uart7, Pin::new(Port::E, 0)),
    ],
);

/// LCD data/command select
pub const LCD_DC: Pin = Pin::new(Port::A, 6);
/// LCD reset
pub const LCD_RESET: Pin = Pin::new(Port::A, 7);

/// Bring up every receive channel
///
/// Enables and waits for the UART and GPIO clocks, configures each UART
/// (enable last) followed by its pins, then unmasks the receive interrupts.
/// UART modules outside the configuration are never accessed. The system
/// clock must already be at `board.uart_clock_hz`.
pub fn configure<B: RegisterBus, const N: usize>(bus: &mut B, board: &BoardConfig<N>) {
    sysctl::enable(bus, board.clock_gates());

    for channel in board.channels.iter() {
        uart::configure(bus, channel.uart, &board.uart, board.divisors);

        gpio::configure_alternate(bus, channel.rx.pin, channel.rx.function);
        if let Some(tx) = channel.tx {
            gpio::configure_alternate(bus, tx.pin, tx.function);
        }
    }

    for channel in board.channels.iter() {
        nvic::set_priority(bus, channel.uart.irq(), board.irq_priority);
        nvic::enable_irq(bus, channel.uart.irq());
    }
}

/// Claim one receive handler per channel
///
/// Handler `i` writes slot `i`. Fails if the sampler has fewer slots than
/// the board has channels, or a slot was already claimed.
pub fn rx_handlers<'a, const N: usize, const M: usize>(
    board: &BoardConfig<N>,
    sampler: &'a ReceiveSampler<M>,
) -> Result<Vec<RxHandler<'a>, N>, SamplerError> {
    let mut handlers = Vec::new();
    for (slot, channel) in board.channels.iter().enumerate() {
        let handler = RxHandler::new(channel.uart, sampler.writer(slot)?);
        handlers
            .push(handler)
            .map_err(|_| SamplerError::IndexOutOfRange)?;
    }
    Ok(handlers)
}
