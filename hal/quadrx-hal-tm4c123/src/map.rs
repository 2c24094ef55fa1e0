//! TM4C123GH6PM register map
//!
//! Absolute addresses for system-control registers, register offsets for the
//! per-instance blocks (UART, GPIO, SSI) and the bit fields the drivers use.
//! Values follow the TM4C123GH6PM datasheet (SPMS376E).

/// System control
pub mod sysctl {
    pub const BASE: u32 = 0x400F_E000;

    /// Raw interrupt status
    pub const RIS: u32 = BASE + 0x050;
    /// Run-mode clock configuration
    pub const RCC: u32 = BASE + 0x060;
    /// Run-mode clock configuration 2
    pub const RCC2: u32 = BASE + 0x070;

    /// GPIO run-mode clock gating
    pub const RCGCGPIO: u32 = BASE + 0x608;
    /// UART run-mode clock gating
    pub const RCGCUART: u32 = BASE + 0x618;
    /// SSI run-mode clock gating
    pub const RCGCSSI: u32 = BASE + 0x61C;

    /// GPIO peripheral ready
    pub const PRGPIO: u32 = BASE + 0xA08;
    /// UART peripheral ready
    pub const PRUART: u32 = BASE + 0xA18;
    /// SSI peripheral ready
    pub const PRSSI: u32 = BASE + 0xA1C;

    /// PLL lock raw interrupt status
    pub const RIS_PLLLRIS: u32 = 1 << 6;

    /// Crystal value field
    pub const RCC_XTAL_MASK: u32 = 0x1F << 6;
    /// 16 MHz crystal
    pub const RCC_XTAL_16MHZ: u32 = 0x15 << 6;

    /// Use RCC2 fields instead of RCC
    pub const RCC2_USERCC2: u32 = 1 << 31;
    /// Divide PLL as 400 MHz rather than 200 MHz
    pub const RCC2_DIV400: u32 = 1 << 30;
    /// SYSDIV2 plus SYSDIV2LSB, a 7-bit divisor field when DIV400 is set
    pub const RCC2_SYSDIV2_MASK: u32 = 0x7F << 22;
    pub const RCC2_SYSDIV2_SHIFT: u32 = 22;
    /// Power down PLL
    pub const RCC2_PWRDN2: u32 = 1 << 13;
    /// Bypass PLL
    pub const RCC2_BYPASS2: u32 = 1 << 11;
    /// Oscillator source field (0 = main oscillator)
    pub const RCC2_OSCSRC2_MASK: u32 = 0x7 << 4;
}

/// UART register block offsets and fields
pub mod uart {
    /// UART0 base; instances follow at 4 KiB strides
    pub const UART0_BASE: u32 = 0x4000_C000;
    pub const BLOCK_SIZE: u32 = 0x1000;

    /// Data
    pub const DR: u32 = 0x000;
    /// Flags
    pub const FR: u32 = 0x018;
    /// Integer baud-rate divisor
    pub const IBRD: u32 = 0x024;
    /// Fractional baud-rate divisor
    pub const FBRD: u32 = 0x028;
    /// Line control
    pub const LCRH: u32 = 0x02C;
    /// Control
    pub const CTL: u32 = 0x030;
    /// Interrupt FIFO level select
    pub const IFLS: u32 = 0x034;
    /// Interrupt mask
    pub const IM: u32 = 0x038;
    /// Raw interrupt status
    pub const RIS: u32 = 0x03C;
    /// Masked interrupt status
    pub const MIS: u32 = 0x040;
    /// Interrupt clear
    pub const ICR: u32 = 0x044;

    pub const DR_DATA_MASK: u32 = 0xFF;

    pub const FR_TXFE: u32 = 0x80;
    pub const FR_RXFF: u32 = 0x40;
    pub const FR_TXFF: u32 = 0x20;
    pub const FR_RXFE: u32 = 0x10;
    pub const FR_BUSY: u32 = 0x08;

    pub const LCRH_WLEN_5: u32 = 0x00;
    pub const LCRH_WLEN_6: u32 = 0x20;
    pub const LCRH_WLEN_7: u32 = 0x40;
    pub const LCRH_WLEN_8: u32 = 0x60;
    pub const LCRH_FEN: u32 = 0x10;
    pub const LCRH_STP2: u32 = 0x08;
    pub const LCRH_EPS: u32 = 0x04;
    pub const LCRH_PEN: u32 = 0x02;

    pub const CTL_UARTEN: u32 = 0x001;
    pub const CTL_TXE: u32 = 0x100;
    pub const CTL_RXE: u32 = 0x200;

    pub const IFLS_TX_MASK: u32 = 0x07;
    pub const IFLS_RX_MASK: u32 = 0x38;
    pub const IFLS_RX_SHIFT: u32 = 3;

    pub const IM_RXIM: u32 = 0x10;
    pub const IM_TXIM: u32 = 0x20;
    pub const IM_RTIM: u32 = 0x40;

    pub const RIS_RXRIS: u32 = 0x10;
    pub const RIS_TXRIS: u32 = 0x20;
    pub const RIS_RTRIS: u32 = 0x40;

    pub const ICR_RXIC: u32 = 0x10;
    pub const ICR_TXIC: u32 = 0x20;
    pub const ICR_RTIC: u32 = 0x40;
}

/// GPIO register block offsets (APB aperture)
pub mod gpio {
    use quadrx_hal::Port;

    /// Base address of a port's register block
    pub const fn port_base(port: Port) -> u32 {
        match port {
            Port::A => 0x4000_4000,
            Port::B => 0x4000_5000,
            Port::C => 0x4000_6000,
            Port::D => 0x4000_7000,
            Port::E => 0x4002_4000,
            Port::F => 0x4002_5000,
        }
    }

    pub const BLOCK_SIZE: u32 = 0x1000;

    /// Data; address bits [9:2] mask which pins an access touches
    pub const DATA: u32 = 0x000;
    /// Direction (1 = output)
    pub const DIR: u32 = 0x400;
    /// Alternate function select
    pub const AFSEL: u32 = 0x420;
    /// Digital enable
    pub const DEN: u32 = 0x51C;
    /// Commit lock
    pub const LOCK: u32 = 0x520;
    /// Commit
    pub const CR: u32 = 0x524;
    /// Analog mode select
    pub const AMSEL: u32 = 0x528;
    /// Port control (4-bit function code per pin)
    pub const PCTL: u32 = 0x52C;

    /// Value that unlocks the commit register
    pub const LOCK_KEY: u32 = 0x4C4F_434B;
}

/// Synchronous serial interface 0
pub mod ssi0 {
    pub const BASE: u32 = 0x4000_8000;

    pub const CR0: u32 = BASE + 0x000;
    pub const CR1: u32 = BASE + 0x004;
    pub const DR: u32 = BASE + 0x008;
    pub const SR: u32 = BASE + 0x00C;
    pub const CPSR: u32 = BASE + 0x010;

    /// Transmit FIFO empty
    pub const SR_TFE: u32 = 0x01;
    /// Transmit FIFO not full
    pub const SR_TNF: u32 = 0x02;
    /// Receive FIFO not empty
    pub const SR_RNE: u32 = 0x04;
    /// Busy
    pub const SR_BSY: u32 = 0x10;

    /// Port enable
    pub const CR1_SSE: u32 = 0x02;
    /// Slave mode select
    pub const CR1_MS: u32 = 0x04;

    pub const CR0_SCR_SHIFT: u32 = 8;
    pub const CR0_SPH: u32 = 0x80;
    pub const CR0_SPO: u32 = 0x40;
    /// Freescale SPI frame format (FRF = 0)
    pub const CR0_FRF_MOTO: u32 = 0x00;
    /// 8-bit data
    pub const CR0_DSS_8: u32 = 0x07;

    /// Receive FIFO depth
    pub const FIFO_DEPTH: usize = 8;
}

/// Nested vectored interrupt controller
pub mod nvic {
    /// Interrupt set-enable 0; EN1.. follow at 4-byte strides
    pub const EN0: u32 = 0xE000_E100;
    /// Interrupt priority 0; one byte per interrupt
    pub const PRI0: u32 = 0xE000_E400;
    /// Implemented priority bits sit at the top of each byte
    pub const PRI_SHIFT: u32 = 5;
}
