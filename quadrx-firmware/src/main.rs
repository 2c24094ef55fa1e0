//! quadrx - Four-channel UART receive monitor
//!
//! Firmware for the TM4C123GH6PM LaunchPad. UART2, UART3, UART4 and UART7
//! receive at 115 200 baud; each receive interrupt stores the newest byte in
//! that UART's sampler slot, and the main loop draws every slot on an
//! ST7735 LCD forever.

#![no_std]
#![no_main]

use core::cell::RefCell;

use cortex_m::interrupt::{self as critical, Mutex};
use cortex_m_rt::entry;
use defmt::*;
use heapless::Vec;
use tm4c123x::interrupt;
use {defmt_rtt as _, panic_probe as _};

use quadrx_core::{DisplaySink, Monitor, MonitorConfig, ReceiveSampler};
use quadrx_display::St7735;
use quadrx_hal::spi::{Mode, SpiConfig};
use quadrx_hal_tm4c123::board::{self, LCD_DC, LCD_RESET, RX_MONITOR};
use quadrx_hal_tm4c123::gpio::GpioOutput;
use quadrx_hal_tm4c123::pll::{self, BusFrequency};
use quadrx_hal_tm4c123::ssi::{self, Ssi0, SsiClock};
use quadrx_hal_tm4c123::{sysctl, RxHandler, UartId, VolatileBus};

mod delay;

use delay::CycleDelay;

/// Number of monitored UARTs
const CHANNELS: usize = 4;

/// System clock
const SYSCLK: BusFrequency = BusFrequency::Mhz80;

/// LCD SPI clock
const LCD_SPI_HZ: u32 = 8_000_000;

const _: () = assert!(RX_MONITOR.uart_clock_hz == SYSCLK.hz());
const _: () = assert!(SsiClock::compute(SYSCLK.hz(), LCD_SPI_HZ).is_some());

/// Newest byte per UART, written only from the receive interrupts
static SAMPLER: ReceiveSampler<CHANNELS> = ReceiveSampler::new();

/// Receive handlers, filled once before the interrupts are unmasked
static HANDLERS: Mutex<RefCell<Vec<RxHandler<'static>, CHANNELS>>> =
    Mutex::new(RefCell::new(Vec::new()));

/// Main entry point
#[entry]
fn main() -> ! {
    info!("quadrx firmware starting...");

    // SAFETY: single-core; the receive interrupts stay masked until
    // board::configure, and they only touch their own UART's registers
    let mut bus = unsafe { VolatileBus::new() };
    let mut delay = CycleDelay::new(SYSCLK.hz());

    // Clock first: every divisor below assumes it
    pll::init(&mut bus, SYSCLK);
    info!("System clock at {} Hz", SYSCLK.hz());

    // LCD on SSI0 (PA2/PA3/PA5), DC on PA6, reset on PA7
    sysctl::enable(&mut bus, ssi::GATES);
    ssi::configure_pins(&mut bus);
    let spi = unwrap!(Ssi0::new(
        bus,
        SYSCLK.hz(),
        &SpiConfig::new(LCD_SPI_HZ, Mode::Mode0)
    ));
    let dc = GpioOutput::new(bus, LCD_DC);
    let rst = GpioOutput::new(bus, LCD_RESET);

    let mut lcd = St7735::new(spi, dc, rst);
    match lcd.init(&mut delay).and_then(|()| lcd.clear()) {
        Ok(()) => info!("LCD initialized"),
        Err(e) => error!("LCD init failed: {}", e),
    }

    // Hand each receive interrupt its slot, then bring the UARTs up
    let handlers = unwrap!(board::rx_handlers(&RX_MONITOR, &SAMPLER));
    critical::free(|cs| {
        *HANDLERS.borrow(cs).borrow_mut() = handlers;
    });
    board::configure(&mut bus, &RX_MONITOR);
    info!(
        "Receiving on {} UARTs at {} baud",
        CHANNELS, RX_MONITOR.uart.baudrate
    );

    let monitor = Monitor::new(SAMPLER.reader(), MonitorConfig::default());
    let mut last_error = None;
    loop {
        let result = monitor.render(&mut lcd);
        if let Err(e) = result {
            // Log once per failure, not once per pass
            if last_error != Some(e) {
                warn!("Display update failed: {}", e);
            }
        }
        last_error = result.err();
    }
}

/// Run the receive handler bound to `uart`
fn service(uart: UartId) {
    critical::free(|cs| {
        // SAFETY: interrupts are disabled for the duration of the closure
        let mut bus = unsafe { VolatileBus::new() };
        for handler in HANDLERS.borrow(cs).borrow().iter() {
            if handler.uart() == uart {
                handler.service(&mut bus);
            }
        }
    });
}

#[interrupt]
fn UART2() {
    service(UartId::Uart2);
}

#[interrupt]
fn UART3() {
    service(UartId::Uart3);
}

#[interrupt]
fn UART4() {
    service(UartId::Uart4);
}

#[interrupt]
fn UART7() {
    service(UartId::Uart7);
}
