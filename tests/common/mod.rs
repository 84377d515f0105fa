#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use pibody_display::{DataMode, Transport};

pub const CASET: u8 = 0x2A;
pub const RASET: u8 = 0x2B;
pub const RAMWR: u8 = 0x2C;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Select,
    Deselect,
    Mode(DataMode),
    Write(Vec<u8>),
    Reset(bool),
    Backlight(bool),
    Delay(u32),
}

/// Transport that logs every call. Clones share the log.
#[derive(Clone, Default)]
pub struct Recorder {
    log: Rc<RefCell<Vec<Op>>>,
}

/// One programmed window and the pixel bytes streamed into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Window {
    pub x0: u16,
    pub x1: u16,
    pub y0: u16,
    pub y1: u16,
    pub chunks: Vec<usize>,
    pub bytes: Vec<u8>,
}

impl Window {
    pub fn width(&self) -> usize {
        (self.x1 - self.x0 + 1) as usize
    }

    pub fn height(&self) -> usize {
        (self.y1 - self.y0 + 1) as usize
    }
}

fn pair(data: &[u8]) -> (u16, u16) {
    (
        u16::from_be_bytes([data[0], data[1]]),
        u16::from_be_bytes([data[2], data[3]]),
    )
}

impl Recorder {
    pub fn ops(&self) -> Vec<Op> {
        self.log.borrow().clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    /// Every write with the D/C level it went out under.
    pub fn writes(&self) -> Vec<(DataMode, Vec<u8>)> {
        let mut mode = DataMode::Command;
        let mut out = Vec::new();
        for op in self.log.borrow().iter() {
            match op {
                Op::Mode(m) => mode = *m,
                Op::Write(bytes) => out.push((mode, bytes.clone())),
                _ => {}
            }
        }
        out
    }

    pub fn commands(&self) -> Vec<u8> {
        self.writes()
            .into_iter()
            .filter(|(mode, _)| *mode == DataMode::Command)
            .flat_map(|(_, bytes)| bytes)
            .collect()
    }

    /// Parameters that followed the first occurrence of `cmd`.
    pub fn params(&self, cmd: u8) -> Vec<u8> {
        let writes = self.writes();
        let Some(at) = writes
            .iter()
            .position(|(m, b)| *m == DataMode::Command && b[..] == [cmd])
        else {
            return Vec::new();
        };
        writes[at + 1..]
            .iter()
            .take_while(|(m, _)| *m == DataMode::Data)
            .flat_map(|(_, b)| b.clone())
            .collect()
    }

    pub fn windows(&self) -> Vec<Window> {
        let writes = self.writes();
        let mut windows: Vec<Window> = Vec::new();
        let (mut xs, mut ys) = ((0, 0), (0, 0));
        let mut streaming = false;
        let mut i = 0;
        while i < writes.len() {
            let (mode, bytes) = &writes[i];
            match (mode, bytes.as_slice()) {
                (DataMode::Command, [CASET]) => {
                    streaming = false;
                    xs = pair(&writes[i + 1].1);
                    i += 1;
                }
                (DataMode::Command, [RASET]) => {
                    streaming = false;
                    ys = pair(&writes[i + 1].1);
                    i += 1;
                }
                (DataMode::Command, [RAMWR]) => {
                    streaming = true;
                    windows.push(Window {
                        x0: xs.0,
                        x1: xs.1,
                        y0: ys.0,
                        y1: ys.1,
                        chunks: Vec::new(),
                        bytes: Vec::new(),
                    });
                }
                (DataMode::Command, _) => streaming = false,
                (DataMode::Data, data) => {
                    if streaming {
                        if let Some(w) = windows.last_mut() {
                            w.chunks.push(data.len());
                            w.bytes.extend_from_slice(data);
                        }
                    }
                }
            }
            i += 1;
        }
        windows
    }

    /// Select/deselect brackets, each as its list of inner ops.
    pub fn brackets(&self) -> Vec<Vec<Op>> {
        let mut out = Vec::new();
        let mut current: Option<Vec<Op>> = None;
        for op in self.log.borrow().iter() {
            match op {
                Op::Select => current = Some(Vec::new()),
                Op::Deselect => {
                    if let Some(b) = current.take() {
                        out.push(b);
                    }
                }
                other => {
                    if let Some(b) = current.as_mut() {
                        b.push(other.clone());
                    }
                }
            }
        }
        out
    }

    fn push(&self, op: Op) {
        self.log.borrow_mut().push(op);
    }
}

impl Transport for Recorder {
    type Error = ();

    fn select(&mut self) -> Result<(), ()> {
        self.push(Op::Select);
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), ()> {
        self.push(Op::Deselect);
        Ok(())
    }

    fn set_data_mode(&mut self, mode: DataMode) -> Result<(), ()> {
        self.push(Op::Mode(mode));
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), ()> {
        self.push(Op::Write(bytes.to_vec()));
        Ok(())
    }

    fn set_reset(&mut self, high: bool) -> Result<(), ()> {
        self.push(Op::Reset(high));
        Ok(())
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), ()> {
        self.push(Op::Backlight(on));
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.push(Op::Delay(ms));
    }
}

/// Transport whose bus dies after `writes` successful writes.
pub struct Flaky {
    pub writes: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub struct BusDown;

impl Transport for Flaky {
    type Error = BusDown;

    fn select(&mut self) -> Result<(), BusDown> {
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), BusDown> {
        Ok(())
    }

    fn set_data_mode(&mut self, _mode: DataMode) -> Result<(), BusDown> {
        Ok(())
    }

    fn write(&mut self, _bytes: &[u8]) -> Result<(), BusDown> {
        if self.writes == 0 {
            return Err(BusDown);
        }
        self.writes -= 1;
        Ok(())
    }

    fn set_reset(&mut self, _high: bool) -> Result<(), BusDown> {
        Ok(())
    }

    fn delay_ms(&mut self, _ms: u32) {}
}
