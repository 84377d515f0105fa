/// ST7789 command opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Instruction {
    ///< Software reset
    SwReset = 0x01,
    ///< Enter Sleep Mode
    SlpIn = 0x10,
    ///< Sleep Out
    SlpOut = 0x11,
    ///< Normal Display Mode ON
    NorOn = 0x13,
    ///< Display Inversion OFF
    InvOff = 0x20,
    ///< Display Inversion ON
    InvOn = 0x21,
    ///< Display OFF
    DispOff = 0x28,
    ///< Display ON
    DispOn = 0x29,
    ///< Column Address Set
    CaSet = 0x2A,
    ///< Row Address Set
    RaSet = 0x2B,
    ///< Memory Write
    RamWr = 0x2C,
    ///< Vertical Scrolling Definition
    VScrDef = 0x33,
    ///< Memory Access Control
    MadCtl = 0x36,
    ///< Vertical Scrolling Start Address
    VScSad = 0x37,
    ///< Interface Pixel Format
    ColMod = 0x3A,
}

impl Instruction {
    pub const fn opcode(self) -> u8 {
        self as u8
    }
}

///< Bottom to top
pub const MADCTL_MY: u8 = 0x80;
///< Right to left
pub const MADCTL_MX: u8 = 0x40;
///< Reverse Mode
pub const MADCTL_MV: u8 = 0x20;
///< Blue-Green-Red pixel order
pub const MADCTL_BGR: u8 = 0x08;
///< Red-Green-Blue pixel order
pub const MADCTL_RGB: u8 = 0x00;

///< 65K colors, 16 bit/pixel on the control interface
pub const COLOR_MODE_16BIT: u8 = 0x55;

pub struct InitCmd {
    pub cmd: Instruction,
    pub data: &'static [u8],
}

pub enum InitOp {
    Cmd(InitCmd),
    Delay(u32),
}

/// Power-on sequence. Delays are minimums.
pub const fn init_sequence(inversion: bool) -> [InitOp; 9] {
    [
        InitOp::Cmd(InitCmd {
            cmd: Instruction::SlpOut,
            data: &[],
        }),
        InitOp::Delay(120),
        InitOp::Cmd(InitCmd {
            cmd: Instruction::ColMod,
            data: &[COLOR_MODE_16BIT],
        }),
        InitOp::Delay(10),
        InitOp::Cmd(InitCmd {
            cmd: if inversion {
                Instruction::InvOn
            } else {
                Instruction::InvOff
            },
            data: &[],
        }),
        InitOp::Cmd(InitCmd {
            cmd: Instruction::NorOn,
            data: &[],
        }),
        InitOp::Delay(10),
        InitOp::Cmd(InitCmd {
            cmd: Instruction::DispOn,
            data: &[],
        }),
        InitOp::Delay(150),
    ]
}
