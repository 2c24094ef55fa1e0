//! ST7735 TFT Display Driver
//!
//! Driver for 128x160 ST7735R ("red tab") panels over SPI with separate
//! data/command and reset lines. 16-bit RGB565 colour, drawn straight to
//! panel RAM (no frame buffer).

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PointsIter, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use quadrx_core::traits::{DisplayError, DisplaySink, Half};

use crate::message::{format_message, row_of, ROW_HEIGHT};

/// Display dimensions
pub const WIDTH: u32 = 128;
pub const HEIGHT: u32 = 160;

/// ST7735 commands
#[allow(dead_code)]
mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVOFF: u8 = 0x20;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
    pub const FRMCTR1: u8 = 0xB1;
    pub const FRMCTR2: u8 = 0xB2;
    pub const FRMCTR3: u8 = 0xB3;
    pub const INVCTR: u8 = 0xB4;
    pub const PWCTR1: u8 = 0xC0;
    pub const PWCTR2: u8 = 0xC1;
    pub const PWCTR3: u8 = 0xC2;
    pub const PWCTR4: u8 = 0xC3;
    pub const PWCTR5: u8 = 0xC4;
    pub const VMCTR1: u8 = 0xC5;
    pub const GMCTRP1: u8 = 0xE0;
    pub const GMCTRN1: u8 = 0xE1;
}

/// One init step: command, parameters, settle time in milliseconds
type InitStep = (u8, &'static [u8], u32);

/// Red-tab initialization sequence
const INIT_SEQUENCE: &[InitStep] = &[
    (cmd::SWRESET, &[], 150),
    (cmd::SLPOUT, &[], 500),
    // Frame rate control: normal, idle, partial modes
    (cmd::FRMCTR1, &[0x01, 0x2C, 0x2D], 0),
    (cmd::FRMCTR2, &[0x01, 0x2C, 0x2D], 0),
    (cmd::FRMCTR3, &[0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D], 0),
    // No dot inversion
    (cmd::INVCTR, &[0x07], 0),
    (cmd::PWCTR1, &[0xA2, 0x02, 0x84], 0),
    (cmd::PWCTR2, &[0xC5], 0),
    (cmd::PWCTR3, &[0x0A, 0x00], 0),
    (cmd::PWCTR4, &[0x8A, 0x2A], 0),
    (cmd::PWCTR5, &[0x8A, 0xEE], 0),
    (cmd::VMCTR1, &[0x0E], 0),
    (cmd::INVOFF, &[], 0),
    // Row/column address order and BGR panel
    (cmd::MADCTL, &[0xC8], 0),
    // 16 bits per pixel
    (cmd::COLMOD, &[0x05], 0),
    (cmd::CASET, &[0x00, 0x00, 0x00, 0x7F], 0),
    (cmd::RASET, &[0x00, 0x00, 0x00, 0x9F], 0),
    (
        cmd::GMCTRP1,
        &[
            0x02, 0x1C, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2D, 0x29, 0x25, 0x2B, 0x39, 0x00, 0x01,
            0x03, 0x10,
        ],
        0,
    ),
    (
        cmd::GMCTRN1,
        &[
            0x03, 0x1D, 0x07, 0x06, 0x2E, 0x2C, 0x29, 0x2D, 0x2E, 0x2E, 0x37, 0x3F, 0x00, 0x00,
            0x02, 0x10,
        ],
        0,
    ),
    (cmd::NORON, &[], 10),
    (cmd::DISPON, &[], 100),
];

/// Pixels sent per SPI write when streaming a colour
const CHUNK_PIXELS: usize = 32;

/// ST7735 TFT driver
pub struct St7735<SPI, DC, RST> {
    spi: SPI,
    dc: DC,
    rst: RST,
    initialized: bool,
    foreground: Rgb565,
    background: Rgb565,
}

impl<SPI, DC, RST> St7735<SPI, DC, RST>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Create a new driver; call [`St7735::init`] before drawing
    pub fn new(spi: SPI, dc: DC, rst: RST) -> Self {
        Self {
            spi,
            dc,
            rst,
            initialized: false,
            foreground: Rgb565::YELLOW,
            background: Rgb565::BLACK,
        }
    }

    /// Check if the init sequence has run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Reset the panel and run the init sequence
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::Communication)?;
        delay.delay_ms(5);
        self.rst.set_low().map_err(|_| DisplayError::Communication)?;
        delay.delay_ms(5);
        self.rst.set_high().map_err(|_| DisplayError::Communication)?;
        delay.delay_ms(120);

        for &(command, params, settle_ms) in INIT_SEQUENCE {
            self.command(command, params)?;
            if settle_ms > 0 {
                delay.delay_ms(settle_ms);
            }
        }

        self.initialized = true;
        Ok(())
    }

    /// Turn the panel output on
    pub fn on(&mut self) -> Result<(), DisplayError> {
        self.check_ready()?;
        self.command(cmd::DISPON, &[])
    }

    /// Blank the panel; RAM contents are kept and reappear on [`St7735::on`]
    pub fn off(&mut self) -> Result<(), DisplayError> {
        self.check_ready()?;
        self.command(cmd::DISPOFF, &[])
    }

    /// Send a command followed by its parameters
    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Communication)?;
        self.spi.write(&[command]).map_err(|_| DisplayError::Communication)?;
        // DC is sampled on the last bit; the byte must be out before it flips
        self.spi.flush().map_err(|_| DisplayError::Communication)?;

        if !params.is_empty() {
            self.dc.set_high().map_err(|_| DisplayError::Communication)?;
            self.write_data(params)?;
        }
        Ok(())
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        self.spi.write(data).map_err(|_| DisplayError::Communication)?;
        self.spi.flush().map_err(|_| DisplayError::Communication)
    }

    /// Open a RAM write window over `area` (inclusive corners)
    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), DisplayError> {
        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.command(cmd::CASET, &[x0h, x0l, x1h, x1l])?;
        self.command(cmd::RASET, &[y0h, y0l, y1h, y1l])?;
        self.command(cmd::RAMWR, &[])?;
        self.dc.set_high().map_err(|_| DisplayError::Communication)
    }

    fn set_window_for(&mut self, area: &Rectangle) -> Result<bool, DisplayError> {
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(false);
        };
        self.set_window(
            area.top_left.x as u16,
            area.top_left.y as u16,
            bottom_right.x as u16,
            bottom_right.y as u16,
        )?;
        Ok(true)
    }

    fn check_ready(&self) -> Result<(), DisplayError> {
        if self.initialized {
            Ok(())
        } else {
            Err(DisplayError::NotInitialized)
        }
    }
}

fn color_bytes(color: Rgb565) -> [u8; 2] {
    RawU16::from(color).into_inner().to_be_bytes()
}

impl<SPI, DC, RST> OriginDimensions for St7735<SPI, DC, RST> {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl<SPI, DC, RST> DrawTarget for St7735<SPI, DC, RST>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    RST: OutputPin,
{
    type Color = Rgb565;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.check_ready()?;
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if !bounds.contains(point) {
                continue;
            }
            let (x, y) = (point.x as u16, point.y as u16);
            self.set_window(x, y, x, y)?;
            self.write_data(&color_bytes(color))?;
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.check_ready()?;
        let bounds = self.bounding_box();
        let clipped = area.intersection(&bounds);
        if clipped != *area {
            // Partly off-panel: fall back to per-pixel writes
            return self.draw_iter(
                area.points()
                    .zip(colors)
                    .map(|(point, color)| Pixel(point, color)),
            );
        }

        if !self.set_window_for(area)? {
            return Ok(());
        }

        let mut buf = [0u8; CHUNK_PIXELS * 2];
        let mut len = 0;
        for color in colors.into_iter().take(area.size.width as usize * area.size.height as usize)
        {
            buf[len..len + 2].copy_from_slice(&color_bytes(color));
            len += 2;
            if len == buf.len() {
                self.write_data(&buf)?;
                len = 0;
            }
        }
        if len > 0 {
            self.write_data(&buf[..len])?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.check_ready()?;
        let area = area.intersection(&self.bounding_box());
        if !self.set_window_for(&area)? {
            return Ok(());
        }

        let bytes = color_bytes(color);
        let mut buf = [0u8; CHUNK_PIXELS * 2];
        for pair in buf.chunks_exact_mut(2) {
            pair.copy_from_slice(&bytes);
        }

        let mut remaining = area.size.width as usize * area.size.height as usize;
        while remaining > 0 {
            let n = remaining.min(CHUNK_PIXELS);
            self.write_data(&buf[..n * 2])?;
            remaining -= n;
        }
        Ok(())
    }
}

impl<SPI, DC, RST> DisplaySink for St7735<SPI, DC, RST>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    RST: OutputPin,
{
    fn message(
        &mut self,
        half: Half,
        line: u8,
        label: &str,
        value: i32,
    ) -> Result<(), DisplayError> {
        self.check_ready()?;
        let row = row_of(half, line)?;
        let top = row as i32 * ROW_HEIGHT as i32;

        // Blank the row so a shorter value does not leave stale digits
        self.fill_solid(
            &Rectangle::new(Point::new(0, top), Size::new(WIDTH, ROW_HEIGHT)),
            self.background,
        )?;

        let style: MonoTextStyle<'_, Rgb565> = MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(self.foreground)
            .background_color(self.background)
            .build();
        let text = format_message(label, value);
        Text::with_baseline(&text, Point::new(0, top), style, Baseline::Top).draw(self)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        let background = self.background;
        DrawTarget::clear(self, background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Byte on the wire and whether DC was high (data) when it was sent
    type Wire = Rc<RefCell<Vec<(bool, u8)>>>;

    struct MockSpi {
        wire: Wire,
        dc: Rc<Cell<bool>>,
    }

    impl embedded_hal::spi::ErrorType for MockSpi {
        type Error = Infallible;
    }

    impl SpiBus<u8> for MockSpi {
        fn read(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
            words.fill(0);
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
            let dc = self.dc.get();
            self.wire.borrow_mut().extend(words.iter().map(|&w| (dc, w)));
            Ok(())
        }

        fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
            self.write(write)?;
            read.fill(0);
            Ok(())
        }

        fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
            let copy = words.to_vec();
            self.write(&copy)
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    struct MockPin {
        level: Rc<Cell<bool>>,
        toggles: Rc<Cell<u32>>,
    }

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.level.set(false);
            self.toggles.set(self.toggles.get() + 1);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.level.set(true);
            self.toggles.set(self.toggles.get() + 1);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockDelay {
        total_ns: u64,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    struct Harness {
        display: St7735<MockSpi, MockPin, MockPin>,
        wire: Wire,
        reset_toggles: Rc<Cell<u32>>,
    }

    fn harness() -> Harness {
        let wire: Wire = Rc::default();
        let dc = Rc::new(Cell::new(false));
        let spi = MockSpi {
            wire: wire.clone(),
            dc: dc.clone(),
        };
        let dc_pin = MockPin {
            level: dc,
            toggles: Rc::default(),
        };
        let reset_toggles = Rc::new(Cell::new(0));
        let rst_pin = MockPin {
            level: Rc::default(),
            toggles: reset_toggles.clone(),
        };
        Harness {
            display: St7735::new(spi, dc_pin, rst_pin),
            wire,
            reset_toggles,
        }
    }

    fn commands(wire: &Wire) -> Vec<u8> {
        wire.borrow()
            .iter()
            .filter(|(dc, _)| !dc)
            .map(|&(_, b)| b)
            .collect()
    }

    /// Parameter bytes that followed each occurrence of `command`
    fn params_of(wire: &Wire, command: u8) -> Vec<Vec<u8>> {
        let wire = wire.borrow();
        let mut out = Vec::new();
        for (i, &(dc, b)) in wire.iter().enumerate() {
            if !dc && b == command {
                let params = wire[i + 1..]
                    .iter()
                    .take_while(|(dc, _)| *dc)
                    .map(|&(_, b)| b)
                    .collect();
                out.push(params);
            }
        }
        out
    }

    fn initialized() -> Harness {
        let mut h = harness();
        h.display.init(&mut MockDelay::default()).unwrap();
        h.wire.borrow_mut().clear();
        h
    }

    #[test]
    fn test_init_sequence() {
        let mut h = harness();
        let mut delay = MockDelay::default();
        h.display.init(&mut delay).unwrap();

        let cmds = commands(&h.wire);
        assert_eq!(cmds.first(), Some(&cmd::SWRESET));
        assert_eq!(cmds.last(), Some(&cmd::DISPON));
        assert_eq!(cmds.len(), INIT_SEQUENCE.len());
        assert_eq!(params_of(&h.wire, cmd::MADCTL), [vec![0xC8]]);
        assert_eq!(params_of(&h.wire, cmd::COLMOD), [vec![0x05]]);
        assert_eq!(params_of(&h.wire, cmd::RASET), [vec![0, 0, 0, 0x9F]]);

        assert_eq!(h.reset_toggles.get(), 3);
        // Reset pulse plus every settle time
        assert_eq!(delay.total_ns, (5 + 5 + 120 + 150 + 500 + 10 + 100) * 1_000_000);
        assert!(h.display.is_initialized());
    }

    #[test]
    fn test_message_requires_init() {
        let mut h = harness();
        assert_eq!(
            h.display.message(Half::Top, 0, "Value: ", 1),
            Err(DisplayError::NotInitialized)
        );
        assert!(h.wire.borrow().is_empty());
    }

    #[test]
    fn test_off_then_on() {
        let mut h = initialized();
        h.display.off().unwrap();
        h.display.on().unwrap();

        assert_eq!(
            *h.wire.borrow(),
            [(false, cmd::DISPOFF), (false, cmd::DISPON)]
        );
    }

    #[test]
    fn test_on_off_require_init() {
        let mut h = harness();
        assert_eq!(h.display.off(), Err(DisplayError::NotInitialized));
        assert_eq!(h.display.on(), Err(DisplayError::NotInitialized));
        assert!(h.wire.borrow().is_empty());
    }

    #[test]
    fn test_message_rejects_line_out_of_range() {
        let mut h = initialized();
        assert_eq!(
            h.display.message(Half::Top, 4, "Value: ", 1),
            Err(DisplayError::InvalidCoordinates)
        );
        assert!(h.wire.borrow().is_empty());
    }

    #[test]
    fn test_message_bottom_half_row() {
        let mut h = initialized();
        h.display.message(Half::Bottom, 1, "Value: ", 65).unwrap();

        // Row 9 starts at y = 90; first window blanks the whole row
        let rows = params_of(&h.wire, cmd::RASET);
        assert_eq!(rows[0], vec![0, 90, 0, 99]);
        let cols = params_of(&h.wire, cmd::CASET);
        assert_eq!(cols[0], vec![0, 0, 0, 127]);
        // Every glyph lands inside the row
        for window in rows.iter() {
            assert!(window[1] >= 90 && window[3] <= 99);
        }
    }

    #[test]
    fn test_message_draws_text_pixels() {
        let mut h = initialized();
        h.display.message(Half::Top, 0, "Value: ", 65).unwrap();

        let yellow = color_bytes(Rgb565::YELLOW);
        let data: Vec<u8> = h
            .wire
            .borrow()
            .iter()
            .filter(|(dc, _)| *dc)
            .map(|&(_, b)| b)
            .collect();
        assert!(data.windows(2).any(|w| w == yellow));
    }

    #[test]
    fn test_fill_solid_streams_whole_area() {
        let mut h = initialized();
        h.display
            .fill_solid(
                &Rectangle::new(Point::new(10, 20), Size::new(5, 8)),
                Rgb565::RED,
            )
            .unwrap();

        let ramwr_data = params_of(&h.wire, cmd::RAMWR);
        assert_eq!(ramwr_data.len(), 1);
        assert_eq!(ramwr_data[0].len(), 5 * 8 * 2);
        assert_eq!(params_of(&h.wire, cmd::CASET), [vec![0, 10, 0, 14]]);
        assert_eq!(params_of(&h.wire, cmd::RASET), [vec![0, 20, 0, 27]]);
    }

    #[test]
    fn test_fill_solid_off_panel_is_noop() {
        let mut h = initialized();
        h.display
            .fill_solid(
                &Rectangle::new(Point::new(200, 200), Size::new(5, 5)),
                Rgb565::RED,
            )
            .unwrap();
        assert!(h.wire.borrow().is_empty());
    }

    #[test]
    fn test_pixels_outside_panel_skipped() {
        let mut h = initialized();
        h.display
            .draw_iter([
                Pixel(Point::new(-1, 0), Rgb565::WHITE),
                Pixel(Point::new(127, 159), Rgb565::WHITE),
                Pixel(Point::new(128, 0), Rgb565::WHITE),
            ])
            .unwrap();
        assert_eq!(params_of(&h.wire, cmd::CASET), [vec![0, 127, 0, 127]]);
    }

    #[test]
    fn test_clear_fills_panel() {
        let mut h = initialized();
        DisplaySink::clear(&mut h.display).unwrap();

        let data = params_of(&h.wire, cmd::RAMWR);
        assert_eq!(data[0].len(), (WIDTH * HEIGHT * 2) as usize);
    }
}
