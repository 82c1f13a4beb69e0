//! ST7735 command set and power-up script

/// Controller opcodes
pub mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVOFF: u8 = 0x20;
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

/// MADCTL bits
pub mod madctl {
    /// Row address order
    pub const MY: u8 = 0x80;
    /// Column address order
    pub const MX: u8 = 0x40;
    /// Row/column exchange
    pub const MV: u8 = 0x20;
    /// RGB/BGR color order
    pub const RGB: u8 = 0x08;
}

/// One step of an initialization script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStep {
    /// Send an opcode followed by its argument bytes
    Command { op: u8, args: &'static [u8] },
    /// Wait
    Delay(u16),
}

const fn command(op: u8, args: &'static [u8]) -> InitStep {
    InitStep::Command { op, args }
}

/// Power-up sequence for the 80x160 panel
pub const INIT_SCRIPT: &[InitStep] = &[
    command(cmd::SWRESET, &[]),
    InitStep::Delay(15),
    command(cmd::SLPOUT, &[]),
    InitStep::Delay(50),
    // Frame rate: normal, idle, partial
    command(cmd::FRMCTR1, &[0x01, 0x2C, 0x2D]),
    command(cmd::FRMCTR2, &[0x01, 0x2C, 0x2D]),
    command(cmd::FRMCTR3, &[0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D]),
    // No inversion
    command(cmd::INVCTR, &[0x07]),
    command(cmd::PWCTR1, &[0xA2, 0x02, 0x84]),
    command(cmd::PWCTR2, &[0xC5]),
    command(cmd::PWCTR3, &[0x0A, 0x00]),
    command(cmd::PWCTR4, &[0x8A, 0x2A]),
    command(cmd::PWCTR5, &[0x8A, 0xEE]),
    command(cmd::VMCTR1, &[0x0E]),
    command(cmd::INVOFF, &[]),
    command(cmd::MADCTL, &[0xC8]),
    // 16 bits per pixel
    command(cmd::COLMOD, &[0x05]),
    command(cmd::CASET, &[0x00, 0x00, 0x00, 0x7F]),
    command(cmd::RASET, &[0x00, 0x00, 0x00, 0x9F]),
    command(
        cmd::GMCTRP1,
        &[
            0x02, 0x1C, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2D, 0x29, 0x25, 0x2B, 0x39, 0x00, 0x01,
            0x03, 0x10,
        ],
    ),
    command(
        cmd::GMCTRN1,
        &[
            0x03, 0x1D, 0x07, 0x06, 0x2E, 0x2C, 0x29, 0x2D, 0x2E, 0x2E, 0x37, 0x3F, 0x00, 0x00,
            0x02, 0x10,
        ],
    ),
    command(cmd::NORON, &[]),
    InitStep::Delay(10),
    command(cmd::DISPON, &[]),
    InitStep::Delay(10),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_shape() {
        let commands = INIT_SCRIPT
            .iter()
            .filter(|s| matches!(s, InitStep::Command { .. }))
            .count();
        let delay_ms: u32 = INIT_SCRIPT
            .iter()
            .map(|s| match s {
                InitStep::Delay(ms) => *ms as u32,
                _ => 0,
            })
            .sum();
        assert_eq!(commands, 21);
        assert_eq!(delay_ms, 85);
        assert_eq!(INIT_SCRIPT.first(), Some(&command(cmd::SWRESET, &[])));
        assert_eq!(INIT_SCRIPT.last(), Some(&InitStep::Delay(10)));
    }
}
